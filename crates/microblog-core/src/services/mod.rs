//! Domain services. Each takes the acting `User` explicitly and talks to
//! storage only through the ports.

mod accounts;
mod feed;
mod social;

pub use accounts::AccountService;
pub use feed::FeedService;
pub use social::SocialService;

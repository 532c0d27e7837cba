//! Domain entities - the core business objects.

mod page;
mod post;
mod user;

pub use page::{Page, PageRequest};
pub use post::{MAX_BODY_LEN, Post};
pub use user::{MAX_ABOUT_ME_LEN, MAX_EMAIL_LEN, MAX_USERNAME_LEN, MIN_PASSWORD_LEN, User, UserPatch};

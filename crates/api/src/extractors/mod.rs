//! Request extractors.

mod user_id;

pub use user_id::{USER_ID_HEADER, UserId};

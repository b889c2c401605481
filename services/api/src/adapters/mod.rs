pub mod catalog;
pub mod reviews;
pub mod sessions;
pub mod tokens;
pub mod users;

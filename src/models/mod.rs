pub mod photo;
pub mod post;
pub mod user;

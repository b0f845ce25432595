pub mod auth;
pub mod health;
pub mod photo;
pub mod post;
pub mod profile;
pub mod user;

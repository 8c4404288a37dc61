pub mod auth;
pub mod comments;
pub mod favorites;
pub mod gallery;
pub mod posts;
pub mod ratings;
pub mod stats;
pub mod users;

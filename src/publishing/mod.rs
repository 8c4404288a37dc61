pub mod domain;
pub mod repository;

pub use domain::{resolve_action, resolve_status, ModerationAction, PostStatus, Role, WorkflowError};
pub use repository::{
    Author, NewPost, PostQuery, PostRepository, PostSort, RepositoryError, SqlitePostRepository,
};

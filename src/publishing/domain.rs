// Domain types for the editorial workflow - pure, no side effects
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role. Assigned out-of-band by an administrator; the sole
/// authorization input for the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    Reader,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Reader => "reader",
        }
    }

    /// Staff roles may author posts; readers only engage with them.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Editor)
    }
}

impl FromStr for Role {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "editor" => Ok(Role::Editor),
            "reader" => Ok(Role::Reader),
            other => Err(WorkflowError::InvalidRole(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle stage of a review. New posts start in `Draft`; there is no
/// terminal state, posts may cycle indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Review,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Review => "review",
            PostStatus::Published => "published",
        }
    }
}

impl FromStr for PostStatus {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "review" => Ok(PostStatus::Review),
            "published" => Ok(PostStatus::Published),
            other => Err(WorkflowError::InvalidStatus(other.to_string())),
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Moderation actions on an existing post, distinct from the status a
/// post is saved with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationAction {
    /// Hand the post to the review queue.
    Submit,
    /// Make the post publicly visible.
    Publish,
    /// Pull the post back to draft.
    Unpublish,
}

impl FromStr for ModerationAction {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submit" => Ok(ModerationAction::Submit),
            "publish" => Ok(ModerationAction::Publish),
            "unpublish" => Ok(ModerationAction::Unpublish),
            other => Err(WorkflowError::InvalidAction(other.to_string())),
        }
    }
}

impl fmt::Display for ModerationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ModerationAction::Submit => "submit",
            ModerationAction::Publish => "publish",
            ModerationAction::Unpublish => "unpublish",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("you do not have permission to {0}")]
    Forbidden(String),

    #[error("unknown role: {0}")]
    InvalidRole(String),

    #[error("unknown post status: {0}")]
    InvalidStatus(String),

    #[error("unknown moderation action: {0}")]
    InvalidAction(String),
}

/// Decide the status a post may be persisted with.
///
/// Editors never reach `published` through their own save: a `published`
/// request quietly lands in `review` instead of being rejected. Admin
/// requests pass through unchanged. Readers cannot author posts at all.
/// A missing status means `draft`.
pub fn resolve_status(
    actor: Role,
    requested: Option<PostStatus>,
) -> Result<PostStatus, WorkflowError> {
    let requested = requested.unwrap_or(PostStatus::Draft);

    match actor {
        Role::Admin => Ok(requested),
        Role::Editor => Ok(match requested {
            PostStatus::Published => PostStatus::Review,
            other => other,
        }),
        Role::Reader => Err(WorkflowError::Forbidden("author posts".into())),
    }
}

/// Resolve a moderation action to the status it produces.
///
/// Actions are idempotent and do not inspect the post's current status:
/// submitting a post already in review leaves it in review. Publishing
/// and unpublishing are reserved for admins.
pub fn resolve_action(
    actor: Role,
    action: ModerationAction,
) -> Result<PostStatus, WorkflowError> {
    match (actor, action) {
        (Role::Reader, _) => Err(WorkflowError::Forbidden("moderate posts".into())),
        (_, ModerationAction::Submit) => Ok(PostStatus::Review),
        (Role::Admin, ModerationAction::Publish) => Ok(PostStatus::Published),
        (Role::Admin, ModerationAction::Unpublish) => Ok(PostStatus::Draft),
        (Role::Editor, ModerationAction::Publish) => {
            Err(WorkflowError::Forbidden("publish directly".into()))
        }
        (Role::Editor, ModerationAction::Unpublish) => {
            Err(WorkflowError::Forbidden("unpublish posts".into()))
        }
    }
}

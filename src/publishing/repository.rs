// Repository pattern - isolates all database side effects
use async_trait::async_trait;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::params;
use thiserror::Error;

use crate::db::models::Post;
use crate::publishing::domain::{
    resolve_action, resolve_status, ModerationAction, PostStatus, Role, WorkflowError,
};
use crate::state::DbPool;

const MIN_CONTENT_CHARS: usize = 50;
const MAX_CONTENT_CHARS: usize = 10_000;
const MAX_GENRES: usize = 5;
const EXCERPT_CHARS: usize = 297;
const MIN_SLUG_CHARS: usize = 3;
const MIN_AUTHOR_NAME_CHARS: usize = 2;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] r2d2::Error),

    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

// Store roles and statuses as their lowercase names so rows read back
// into the domain enums without a stringly-typed layer in between.

impl ToSql for Role {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: WorkflowError| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for PostStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for PostStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: WorkflowError| FromSqlError::Other(Box::new(e)))
    }
}

/// The user a write is attributed to, as resolved from the session.
#[derive(Debug, Clone)]
pub struct Author {
    pub id: String,
    pub name: String,
    pub role: Role,
}

/// Incoming post payload, shared by create and update.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub author_name: Option<String>,
    pub content: String,
    pub rating: f64,
    pub genres: Vec<String>,
    pub cover_image: Option<String>,
    pub publication_year: Option<i32>,
    pub slug: Option<String>,
    pub status: Option<PostStatus>,
}

impl NewPost {
    fn validate(&self) -> Result<(), RepositoryError> {
        if self.title.trim().is_empty() {
            return Err(RepositoryError::Invalid("title is required".into()));
        }
        let content_chars = self.content.chars().count();
        if content_chars < MIN_CONTENT_CHARS {
            return Err(RepositoryError::Invalid(format!(
                "content must be at least {} characters",
                MIN_CONTENT_CHARS
            )));
        }
        if content_chars > MAX_CONTENT_CHARS {
            return Err(RepositoryError::Invalid(format!(
                "content must be at most {} characters",
                MAX_CONTENT_CHARS
            )));
        }
        if !(1.0..=5.0).contains(&self.rating) {
            return Err(RepositoryError::Invalid(
                "rating must be between 1 and 5".into(),
            ));
        }
        if self.genres.is_empty() || self.genres.len() > MAX_GENRES {
            return Err(RepositoryError::Invalid(format!(
                "genre must have between 1 and {} entries",
                MAX_GENRES
            )));
        }
        if self.genres.iter().any(|g| g.trim().is_empty()) {
            return Err(RepositoryError::Invalid(
                "genre entries must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Turn a title into a URL slug: lowercase, runs of non-alphanumerics
/// collapse to single dashes, no leading or trailing dash.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Card-sized preview: the first 297 characters plus an ellipsis.
pub fn excerpt_of(content: &str) -> String {
    let mut excerpt: String = content.chars().take(EXCERPT_CHARS).collect();
    excerpt.push_str("...");
    excerpt
}

/// Sort order for post listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostSort {
    #[default]
    Latest,
    Popular,
}

/// Filters for post listings. `status: None` means no status filter,
/// which callers should only allow for staff.
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub status: Option<PostStatus>,
    pub genre: Option<String>,
    pub author_id: Option<String>,
    pub sort: PostSort,
    pub limit: u32,
}

impl PostQuery {
    pub fn published() -> Self {
        Self {
            status: Some(PostStatus::Published),
            limit: 10,
            ..Default::default()
        }
    }
}

/// Repository trait - all post persistence operations
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Create a post. The stored status is what the workflow gate
    /// resolves from the author's role, never the raw request.
    async fn create(&self, author: &Author, input: NewPost) -> Result<Post, RepositoryError>;

    /// Update a post. Only the author or an admin may edit, and the
    /// requested status passes through the gate again.
    async fn update(
        &self,
        actor: &Author,
        id: &str,
        input: NewPost,
    ) -> Result<Post, RepositoryError>;

    /// Fetch a post by id or slug.
    async fn find(&self, id_or_slug: &str) -> Result<Option<Post>, RepositoryError>;

    /// List posts matching the query.
    async fn list(&self, query: &PostQuery) -> Result<Vec<Post>, RepositoryError>;

    /// Apply a moderation action (submit / publish / unpublish).
    async fn moderate(
        &self,
        actor_role: Role,
        id: &str,
        action: ModerationAction,
    ) -> Result<Post, RepositoryError>;

    /// Delete a post. Returns false when no such post exists.
    async fn delete(&self, id: &str) -> Result<bool, RepositoryError>;
}

const POST_COLUMNS: &str = "id, slug, title, author_name, content, excerpt, genres, rating, \
     cover_image, publication_year, status, author_id, author_role, \
     likes_count, comments_count, created_at, updated_at";

fn row_to_post(row: &rusqlite::Row<'_>) -> rusqlite::Result<Post> {
    let genres_json: String = row.get(6)?;
    let genres: Vec<String> = serde_json::from_str(&genres_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Post {
        id: row.get(0)?,
        slug: row.get(1)?,
        title: row.get(2)?,
        author_name: row.get(3)?,
        content: row.get(4)?,
        excerpt: row.get(5)?,
        genres,
        rating: row.get(7)?,
        cover_image: row.get(8)?,
        publication_year: row.get(9)?,
        status: row.get(10)?,
        author_id: row.get(11)?,
        author_role: row.get(12)?,
        likes_count: row.get(13)?,
        comments_count: row.get(14)?,
        created_at: row.get(15)?,
        updated_at: row.get(16)?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// SQLite implementation
pub struct SqlitePostRepository {
    pool: DbPool,
}

impl SqlitePostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn load(&self, id_or_slug: &str) -> Result<Option<Post>, RepositoryError> {
        let conn = self.pool.get()?;
        let sql = format!(
            "SELECT {} FROM posts WHERE id = ?1 OR slug = ?1",
            POST_COLUMNS
        );
        match conn.query_row(&sql, params![id_or_slug], row_to_post) {
            Ok(post) => Ok(Some(post)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn require(&self, id: &str) -> Result<Post, RepositoryError> {
        self.load(id)?
            .ok_or_else(|| RepositoryError::NotFound(format!("post {}", id)))
    }
}

#[async_trait]
impl PostRepository for SqlitePostRepository {
    async fn create(&self, author: &Author, input: NewPost) -> Result<Post, RepositoryError> {
        input.validate()?;
        let status = resolve_status(author.role, input.status)?;

        let author_name = input
            .author_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&author.name)
            .to_string();
        if author_name.chars().count() < MIN_AUTHOR_NAME_CHARS {
            return Err(RepositoryError::Invalid(format!(
                "author name must be at least {} characters",
                MIN_AUTHOR_NAME_CHARS
            )));
        }

        let slug = input
            .slug
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| slugify(&input.title));
        if slug.chars().count() < MIN_SLUG_CHARS {
            return Err(RepositoryError::Invalid("generated slug is too short".into()));
        }

        let id = uuid::Uuid::now_v7().to_string();
        let genres_json = serde_json::to_string(&input.genres)?;
        let excerpt = excerpt_of(&input.content);

        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO posts (id, slug, title, author_name, content, excerpt, genres, \
             rating, cover_image, publication_year, status, author_id, author_role) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                id,
                slug,
                input.title.trim(),
                author_name,
                input.content,
                excerpt,
                genres_json,
                input.rating,
                input.cover_image,
                input.publication_year,
                status,
                author.id,
                author.role,
            ],
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepositoryError::Conflict(format!("slug {} is already in use", slug))
            } else {
                e.into()
            }
        })?;

        tracing::info!(post_id = %id, status = %status, "created post");
        self.require(&id)
    }

    async fn update(
        &self,
        actor: &Author,
        id: &str,
        input: NewPost,
    ) -> Result<Post, RepositoryError> {
        let existing = self.require(id)?;

        if actor.role != Role::Admin && existing.author_id != actor.id {
            return Err(WorkflowError::Forbidden("edit this post".into()).into());
        }

        input.validate()?;
        // Re-apply the gate on every edit; an absent status keeps the
        // current one but still goes through role resolution.
        let requested = input.status.or(Some(existing.status));
        let status = resolve_status(actor.role, requested)?;

        let author_name = input
            .author_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&existing.author_name)
            .to_string();

        let slug = input
            .slug
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(existing.slug);

        let genres_json = serde_json::to_string(&input.genres)?;
        let excerpt = excerpt_of(&input.content);

        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE posts SET slug = ?1, title = ?2, author_name = ?3, content = ?4, \
             excerpt = ?5, genres = ?6, rating = ?7, cover_image = ?8, \
             publication_year = ?9, status = ?10, updated_at = datetime('now') \
             WHERE id = ?11",
            params![
                slug,
                input.title.trim(),
                author_name,
                input.content,
                excerpt,
                genres_json,
                input.rating,
                input.cover_image,
                input.publication_year,
                status,
                existing.id,
            ],
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepositoryError::Conflict(format!("slug {} is already in use", slug))
            } else {
                e.into()
            }
        })?;

        self.require(&existing.id)
    }

    async fn find(&self, id_or_slug: &str) -> Result<Option<Post>, RepositoryError> {
        self.load(id_or_slug)
    }

    async fn list(&self, query: &PostQuery) -> Result<Vec<Post>, RepositoryError> {
        let conn = self.pool.get()?;

        let mut sql = format!("SELECT {} FROM posts WHERE 1=1", POST_COLUMNS);
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            values.push(Box::new(status));
        }
        if let Some(genre) = &query.genre {
            sql.push_str(
                " AND EXISTS (SELECT 1 FROM json_each(posts.genres) \
                 WHERE json_each.value = ?)",
            );
            values.push(Box::new(genre.clone()));
        }
        if let Some(author_id) = &query.author_id {
            sql.push_str(" AND author_id = ?");
            values.push(Box::new(author_id.clone()));
        }

        match query.sort {
            PostSort::Latest => sql.push_str(" ORDER BY created_at DESC"),
            PostSort::Popular => sql.push_str(" ORDER BY likes_count DESC, created_at DESC"),
        }
        sql.push_str(" LIMIT ?");
        values.push(Box::new(query.limit));

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(values.iter().map(|v| v.as_ref())),
            row_to_post,
        )?;

        let mut posts = Vec::new();
        for row in rows {
            posts.push(row?);
        }
        Ok(posts)
    }

    async fn moderate(
        &self,
        actor_role: Role,
        id: &str,
        action: ModerationAction,
    ) -> Result<Post, RepositoryError> {
        let status = resolve_action(actor_role, action)?;

        let conn = self.pool.get()?;
        let changed = conn.execute(
            "UPDATE posts SET status = ?1, updated_at = datetime('now') WHERE id = ?2",
            params![status, id],
        )?;
        if changed == 0 {
            return Err(RepositoryError::NotFound(format!("post {}", id)));
        }

        tracing::info!(post_id = %id, action = %action, status = %status, "moderated post");
        self.require(id)
    }

    async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        let conn = self.pool.get()?;
        let deleted = conn.execute("DELETE FROM posts WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn test_pool() -> DbPool {
        // A shared-cache, in-memory database keyed by a unique name so the
        // pool can hand out more than one connection (repository writes read
        // back through a second connection) while staying isolated per test.
        let uri = format!(
            "file:pub_repo_{}?mode=memory&cache=shared",
            uuid::Uuid::now_v7()
        );
        let manager = r2d2_sqlite::SqliteConnectionManager::file(uri);
        let pool = r2d2::Pool::builder().max_size(8).build(manager).unwrap();
        db::run_migrations(&pool).unwrap();
        pool
    }

    fn seed_user(pool: &DbPool, id: &str, role: Role) -> Author {
        let conn = pool.get().unwrap();
        conn.execute(
            "INSERT INTO users (id, email, name, password_hash, role) \
             VALUES (?1, ?2, ?3, 'x', ?4)",
            params![id, format!("{}@example.com", id), id, role],
        )
        .unwrap();
        Author {
            id: id.to_string(),
            name: id.to_string(),
            role,
        }
    }

    fn sample_post() -> NewPost {
        NewPost {
            title: "The Left Hand of Darkness".to_string(),
            content: "A thoughtful, patient novel about ice, politics and trust; \
                      easily one of the best science fiction books ever written."
                .to_string(),
            rating: 5.0,
            genres: vec!["Science Fiction".to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn editor_create_defaults_to_draft() {
        let pool = test_pool();
        let editor = seed_user(&pool, "editor", Role::Editor);
        let repo = SqlitePostRepository::new(pool);

        let post = repo.create(&editor, sample_post()).await.unwrap();
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.author_role, Role::Editor);
        assert_eq!(post.slug, "the-left-hand-of-darkness");
    }

    #[tokio::test]
    async fn editor_publish_request_lands_in_review() {
        let pool = test_pool();
        let editor = seed_user(&pool, "editor", Role::Editor);
        let repo = SqlitePostRepository::new(pool);

        let mut input = sample_post();
        input.status = Some(PostStatus::Published);
        let post = repo.create(&editor, input).await.unwrap();
        assert_eq!(post.status, PostStatus::Review);
    }

    #[tokio::test]
    async fn admin_may_publish_on_create() {
        let pool = test_pool();
        let admin = seed_user(&pool, "admin", Role::Admin);
        let repo = SqlitePostRepository::new(pool);

        let mut input = sample_post();
        input.status = Some(PostStatus::Published);
        let post = repo.create(&admin, input).await.unwrap();
        assert_eq!(post.status, PostStatus::Published);
    }

    #[tokio::test]
    async fn reader_cannot_create() {
        let pool = test_pool();
        let reader = seed_user(&pool, "reader", Role::Reader);
        let repo = SqlitePostRepository::new(pool);

        let err = repo.create(&reader, sample_post()).await.unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::Workflow(WorkflowError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn gate_is_reapplied_on_update() {
        let pool = test_pool();
        let admin = seed_user(&pool, "admin", Role::Admin);
        let editor = seed_user(&pool, "editor", Role::Editor);
        let repo = SqlitePostRepository::new(pool);

        // Editor writes it; admin publishes it.
        let post = repo.create(&editor, sample_post()).await.unwrap();
        let post = repo
            .moderate(Role::Admin, &post.id, ModerationAction::Publish)
            .await
            .unwrap();
        assert_eq!(post.status, PostStatus::Published);

        // The editor edits the live post without touching status; it may
        // not stay published on the editor's own authority.
        let updated = repo.update(&editor, &post.id, sample_post()).await.unwrap();
        assert_eq!(updated.status, PostStatus::Review);

        // The same edit by the admin keeps it published.
        let post = repo
            .moderate(Role::Admin, &updated.id, ModerationAction::Publish)
            .await
            .unwrap();
        let updated = repo.update(&admin, &post.id, sample_post()).await.unwrap();
        assert_eq!(updated.status, PostStatus::Published);
    }

    #[tokio::test]
    async fn only_author_or_admin_may_edit() {
        let pool = test_pool();
        let alice = seed_user(&pool, "alice", Role::Editor);
        let bob = seed_user(&pool, "bob", Role::Editor);
        let repo = SqlitePostRepository::new(pool);

        let post = repo.create(&alice, sample_post()).await.unwrap();
        let err = repo.update(&bob, &post.id, sample_post()).await.unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::Workflow(WorkflowError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn editor_cannot_moderate_to_published() {
        let pool = test_pool();
        let editor = seed_user(&pool, "editor", Role::Editor);
        let repo = SqlitePostRepository::new(pool);

        let post = repo.create(&editor, sample_post()).await.unwrap();
        let err = repo
            .moderate(Role::Editor, &post.id, ModerationAction::Publish)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::Workflow(WorkflowError::Forbidden(_))
        ));

        // Submit is allowed and idempotent.
        let post = repo
            .moderate(Role::Editor, &post.id, ModerationAction::Submit)
            .await
            .unwrap();
        assert_eq!(post.status, PostStatus::Review);
        let post = repo
            .moderate(Role::Editor, &post.id, ModerationAction::Submit)
            .await
            .unwrap();
        assert_eq!(post.status, PostStatus::Review);
    }

    #[tokio::test]
    async fn list_filters_by_status_genre_and_author() {
        let pool = test_pool();
        let admin = seed_user(&pool, "admin", Role::Admin);
        let editor = seed_user(&pool, "editor", Role::Editor);
        let repo = SqlitePostRepository::new(pool);

        let mut published = sample_post();
        published.status = Some(PostStatus::Published);
        repo.create(&admin, published).await.unwrap();

        let mut other = sample_post();
        other.title = "Piranesi".to_string();
        other.genres = vec!["Fantasy".to_string(), "Mystery".to_string()];
        repo.create(&editor, other).await.unwrap();

        let visible = repo.list(&PostQuery::published()).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].slug, "the-left-hand-of-darkness");

        let fantasy = repo
            .list(&PostQuery {
                genre: Some("Fantasy".to_string()),
                limit: 10,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(fantasy.len(), 1);
        assert_eq!(fantasy[0].slug, "piranesi");

        let by_editor = repo
            .list(&PostQuery {
                author_id: Some(editor.id.clone()),
                limit: 10,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_editor.len(), 1);
    }

    #[tokio::test]
    async fn popular_sort_orders_by_likes() {
        let pool = test_pool();
        let admin = seed_user(&pool, "admin", Role::Admin);
        let repo = SqlitePostRepository::new(pool.clone());

        let mut first = sample_post();
        first.status = Some(PostStatus::Published);
        let first = repo.create(&admin, first).await.unwrap();

        let mut second = sample_post();
        second.title = "Piranesi".to_string();
        second.status = Some(PostStatus::Published);
        let second = repo.create(&admin, second).await.unwrap();

        let conn = pool.get().unwrap();
        conn.execute(
            "UPDATE posts SET likes_count = 7 WHERE id = ?1",
            params![second.id],
        )
        .unwrap();

        let posts = repo
            .list(&PostQuery {
                status: Some(PostStatus::Published),
                sort: PostSort::Popular,
                limit: 10,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(posts[0].id, second.id);
        assert_eq!(posts[1].id, first.id);
    }

    #[tokio::test]
    async fn duplicate_slug_is_a_conflict() {
        let pool = test_pool();
        let admin = seed_user(&pool, "admin", Role::Admin);
        let repo = SqlitePostRepository::new(pool);

        repo.create(&admin, sample_post()).await.unwrap();
        let err = repo.create(&admin, sample_post()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn find_resolves_id_and_slug() {
        let pool = test_pool();
        let admin = seed_user(&pool, "admin", Role::Admin);
        let repo = SqlitePostRepository::new(pool);

        let post = repo.create(&admin, sample_post()).await.unwrap();
        assert!(repo.find(&post.id).await.unwrap().is_some());
        assert!(repo.find(&post.slug).await.unwrap().is_some());
        assert!(repo.find("no-such-post").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_went_away() {
        let pool = test_pool();
        let admin = seed_user(&pool, "admin", Role::Admin);
        let repo = SqlitePostRepository::new(pool);

        let post = repo.create(&admin, sample_post()).await.unwrap();
        assert!(repo.delete(&post.id).await.unwrap());
        assert!(!repo.delete(&post.id).await.unwrap());
    }

    #[test]
    fn validation_rejects_bad_input() {
        let mut short = sample_post();
        short.content = "too short".to_string();
        assert!(matches!(
            short.validate(),
            Err(RepositoryError::Invalid(_))
        ));

        let mut bad_rating = sample_post();
        bad_rating.rating = 6.0;
        assert!(matches!(
            bad_rating.validate(),
            Err(RepositoryError::Invalid(_))
        ));

        let mut no_genre = sample_post();
        no_genre.genres.clear();
        assert!(matches!(
            no_genre.validate(),
            Err(RepositoryError::Invalid(_))
        ));

        let mut too_many = sample_post();
        too_many.genres = (0..6).map(|i| format!("g{}", i)).collect();
        assert!(matches!(
            too_many.validate(),
            Err(RepositoryError::Invalid(_))
        ));

        assert!(sample_post().validate().is_ok());
    }

    #[test]
    fn slugify_matches_expected_shapes() {
        assert_eq!(slugify("The Left Hand of Darkness"), "the-left-hand-of-darkness");
        assert_eq!(slugify("  Dune!!  "), "dune");
        assert_eq!(slugify("C# in Depth, 4th Ed."), "c-in-depth-4th-ed");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn excerpt_truncates_long_content() {
        let long = "x".repeat(1000);
        let excerpt = excerpt_of(&long);
        assert_eq!(excerpt.chars().count(), 300);
        assert!(excerpt.ends_with("..."));
    }
}

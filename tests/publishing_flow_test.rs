//! Editorial lifecycle tests against a real database
//!
//! Covers the full draft -> review -> published -> draft cycle and the
//! role constraints on each step, through the same repository the HTTP
//! handlers use.

use rusqlite::params;
use tempfile::TempDir;

use bindery::db;
use bindery::publishing::{
    Author, ModerationAction, NewPost, PostQuery, PostRepository, PostStatus, RepositoryError,
    Role, SqlitePostRepository, WorkflowError,
};
use bindery::state::DbPool;

fn create_test_db() -> (TempDir, DbPool) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let pool = db::create_pool(&db_path).expect("Failed to create test database");
    db::run_migrations(&pool).expect("Failed to run migrations");
    (temp_dir, pool)
}

fn insert_user(pool: &DbPool, id: &str, role: Role) -> Author {
    let conn = pool.get().unwrap();
    conn.execute(
        "INSERT INTO users (id, email, name, password_hash, role) \
         VALUES (?1, ?2, ?3, 'x', ?4)",
        params![id, format!("{}@example.com", id), id, role.as_str()],
    )
    .unwrap();
    Author {
        id: id.to_string(),
        name: id.to_string(),
        role,
    }
}

fn review_of(title: &str) -> NewPost {
    NewPost {
        title: title.to_string(),
        content: "This review needs enough body to clear the minimum length check, \
                  so here are several considered sentences about the book in question."
            .to_string(),
        rating: 4.0,
        genres: vec!["Fiction".to_string()],
        ..Default::default()
    }
}

#[tokio::test]
async fn full_editorial_cycle() {
    let (_tmp, pool) = create_test_db();
    let editor = insert_user(&pool, "editor", Role::Editor);
    let admin = insert_user(&pool, "admin", Role::Admin);
    let repo = SqlitePostRepository::new(pool.clone());

    // Editor drafts a review.
    let post = repo.create(&editor, review_of("Middlemarch")).await.unwrap();
    assert_eq!(post.status, PostStatus::Draft);

    // Nothing shows up publicly yet.
    let public = repo.list(&PostQuery::published()).await.unwrap();
    assert!(public.is_empty());

    // Editor submits it for review.
    let post = repo
        .moderate(editor.role, &post.id, ModerationAction::Submit)
        .await
        .unwrap();
    assert_eq!(post.status, PostStatus::Review);

    // Still not public while pending.
    assert!(repo.list(&PostQuery::published()).await.unwrap().is_empty());

    // Admin approves.
    let post = repo
        .moderate(admin.role, &post.id, ModerationAction::Publish)
        .await
        .unwrap();
    assert_eq!(post.status, PostStatus::Published);

    let public = repo.list(&PostQuery::published()).await.unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].slug, "middlemarch");

    // Admin pulls it back; the cycle has no terminal state.
    let post = repo
        .moderate(admin.role, &post.id, ModerationAction::Unpublish)
        .await
        .unwrap();
    assert_eq!(post.status, PostStatus::Draft);
    assert!(repo.list(&PostQuery::published()).await.unwrap().is_empty());
}

#[tokio::test]
async fn editor_cannot_reach_published_on_any_path() {
    let (_tmp, pool) = create_test_db();
    let editor = insert_user(&pool, "editor", Role::Editor);
    let repo = SqlitePostRepository::new(pool);

    // Path 1: create with an explicit published status.
    let mut input = review_of("Beloved");
    input.status = Some(PostStatus::Published);
    let post = repo.create(&editor, input).await.unwrap();
    assert_eq!(post.status, PostStatus::Review);

    // Path 2: edit the post asking for published.
    let mut input = review_of("Beloved");
    input.status = Some(PostStatus::Published);
    let post = repo.update(&editor, &post.id, input).await.unwrap();
    assert_eq!(post.status, PostStatus::Review);

    // Path 3: the publish moderation action.
    let err = repo
        .moderate(editor.role, &post.id, ModerationAction::Publish)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::Workflow(WorkflowError::Forbidden(_))
    ));
}

#[tokio::test]
async fn editing_a_live_post_reapplies_the_gate() {
    let (_tmp, pool) = create_test_db();
    let editor = insert_user(&pool, "editor", Role::Editor);
    let admin = insert_user(&pool, "admin", Role::Admin);
    let repo = SqlitePostRepository::new(pool);

    let post = repo.create(&editor, review_of("Persuasion")).await.unwrap();
    let post = repo
        .moderate(admin.role, &post.id, ModerationAction::Publish)
        .await
        .unwrap();
    assert_eq!(post.status, PostStatus::Published);

    // An editor fixing a typo in a live post sends it back through
    // review; publication is always an admin decision.
    let updated = repo
        .update(&editor, &post.id, review_of("Persuasion"))
        .await
        .unwrap();
    assert_eq!(updated.status, PostStatus::Review);

    // The admin making the same edit does not disturb the status.
    let post = repo
        .moderate(admin.role, &updated.id, ModerationAction::Publish)
        .await
        .unwrap();
    let updated = repo
        .update(&admin, &post.id, review_of("Persuasion"))
        .await
        .unwrap();
    assert_eq!(updated.status, PostStatus::Published);
}

#[tokio::test]
async fn reader_is_rejected_before_any_write() {
    let (_tmp, pool) = create_test_db();
    let reader = insert_user(&pool, "reader", Role::Reader);
    let repo = SqlitePostRepository::new(pool.clone());

    let err = repo.create(&reader, review_of("Emma")).await.unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::Workflow(WorkflowError::Forbidden(_))
    ));

    // Nothing was persisted.
    let conn = pool.get().unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn status_filters_expose_the_review_queue() {
    let (_tmp, pool) = create_test_db();
    let editor = insert_user(&pool, "editor", Role::Editor);
    let admin = insert_user(&pool, "admin", Role::Admin);
    let repo = SqlitePostRepository::new(pool);

    repo.create(&editor, review_of("Draft One")).await.unwrap();
    let mut pending = review_of("Pending Two");
    pending.status = Some(PostStatus::Review);
    repo.create(&editor, pending).await.unwrap();
    let mut live = review_of("Live Three");
    live.status = Some(PostStatus::Published);
    repo.create(&admin, live).await.unwrap();

    let queue = repo
        .list(&PostQuery {
            status: Some(PostStatus::Review),
            limit: 10,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].slug, "pending-two");

    let everything = repo
        .list(&PostQuery {
            status: None,
            limit: 10,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(everything.len(), 3);
}

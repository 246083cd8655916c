//! Integration tests for the on-disk database layer.

use std::path::Path;

use spendwise::auth::duplicate_user_error;
use spendwise::config::Config;
use spendwise::date_utils::YearMonth;
use spendwise::db::queries::{budgets, sessions, users};
use spendwise::db::{create_pool, migrations};
use spendwise::error::AppError;
use spendwise::models::{NewBudget, NewUser};
use tempfile::TempDir;

fn disk_pool(dir: &TempDir) -> spendwise::db::DbPool {
    let pool = create_pool(&dir.path().join("data").join("test.db")).unwrap();
    let conn = pool.get().unwrap();
    migrations::run_migrations(&conn, Path::new("migrations")).unwrap();
    pool
}

fn new_user(conn: &rusqlite::Connection, name: &str) -> i64 {
    users::create_user(
        conn,
        &NewUser {
            username: name.into(),
            email: format!("{}@example.com", name),
            password_hash: "x".into(),
            user_type: "individual".into(),
        },
    )
    .unwrap()
}

#[test]
fn test_data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let pool = disk_pool(&dir);
        let conn = pool.get().unwrap();
        new_user(&conn, "alice");
    }

    let pool = disk_pool(&dir);
    let conn = pool.get().unwrap();
    assert_eq!(users::count_users(&conn).unwrap(), 1);
    assert!(users::find_by_username(&conn, "alice").unwrap().is_some());
}

#[test]
fn test_expired_session_is_not_found() {
    let dir = TempDir::new().unwrap();
    let pool = disk_pool(&dir);
    let conn = pool.get().unwrap();
    let user_id = new_user(&conn, "alice");

    sessions::create_session(&conn, "live", user_id, 7).unwrap();
    sessions::create_session(&conn, "stale", user_id, -1).unwrap();

    assert!(sessions::find_session_user(&conn, "live").unwrap().is_some());
    assert!(sessions::find_session_user(&conn, "stale").unwrap().is_none());
    assert_eq!(sessions::purge_expired(&conn).unwrap(), 1);
}

#[test]
fn test_reset_token_single_use() {
    let dir = TempDir::new().unwrap();
    let pool = disk_pool(&dir);
    let conn = pool.get().unwrap();
    let user_id = new_user(&conn, "alice");

    sessions::create_password_reset(&conn, "tok", user_id, 15).unwrap();
    assert_eq!(sessions::take_password_reset(&conn, "tok").unwrap(), Some(user_id));
    assert_eq!(sessions::take_password_reset(&conn, "tok").unwrap(), None);
}

#[test]
fn test_expired_reset_token_is_consumed() {
    let dir = TempDir::new().unwrap();
    let pool = disk_pool(&dir);
    let conn = pool.get().unwrap();
    let user_id = new_user(&conn, "alice");

    sessions::create_password_reset(&conn, "old", user_id, -1).unwrap();
    assert_eq!(sessions::take_password_reset(&conn, "old").unwrap(), None);

    let left: i64 = conn
        .query_row("SELECT COUNT(*) FROM password_resets", [], |row| row.get(0))
        .unwrap();
    assert_eq!(left, 0);
}

#[test]
fn test_duplicate_user_maps_to_validation() {
    let dir = TempDir::new().unwrap();
    let pool = disk_pool(&dir);
    let conn = pool.get().unwrap();
    new_user(&conn, "alice");

    let same_name = NewUser {
        username: "alice".into(),
        email: "other@example.com".into(),
        password_hash: "x".into(),
        user_type: "individual".into(),
    };
    let err = users::create_user(&conn, &same_name).unwrap_err();
    assert_eq!(users::unique_violation_column(&err), Some("username"));
    match duplicate_user_error(err, "already exists") {
        AppError::Validation(msg) => assert_eq!(msg, "Username already exists"),
        other => panic!("unexpected error: {:?}", other),
    }

    let same_email = NewUser {
        username: "bob".into(),
        email: "alice@example.com".into(),
        ..same_name
    };
    let err = users::create_user(&conn, &same_email).unwrap_err();
    match duplicate_user_error(err, "taken") {
        AppError::Validation(msg) => assert_eq!(msg, "Email taken"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_budget_unique_per_category_and_month() {
    let dir = TempDir::new().unwrap();
    let pool = disk_pool(&dir);
    let conn = pool.get().unwrap();
    let user_id = new_user(&conn, "alice");
    let month: YearMonth = "2024-03".parse().unwrap();

    for amount_cents in [10_000, 12_000] {
        budgets::upsert_budget(
            &conn,
            user_id,
            &NewBudget {
                category: "Food".into(),
                month,
                amount_cents,
            },
        )
        .unwrap();
    }

    let rows = budgets::list_budgets(&conn, user_id, month).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount_cents, 12_000);
}

#[tokio::test]
async fn test_build_app_on_disk() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        database_path: dir.path().join("spendwise.db"),
        ..Config::default()
    };

    let (state, _app) = spendwise::server::build_app(config).unwrap();
    let conn = state.db.get().unwrap();
    assert_eq!(users::count_users(&conn).unwrap(), 0);
}

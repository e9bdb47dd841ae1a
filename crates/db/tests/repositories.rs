//! Integration tests for the repository layer.
//!
//! Exercises the repositories against a real database:
//! - Username uniqueness and find-or-create
//! - Generated `duration_minutes`
//! - First-write-wins session and log endings
//! - List filters (exact, substring, month window, limit)

use chrono::{Duration, TimeZone, Utc};
use sqlx::PgPool;
use vrlog_core::types::Timestamp;
use vrlog_db::models::admin::CreateAdmin;
use vrlog_db::models::content_data::{CreateContentData, UpdateContentData};
use vrlog_db::models::session::{CreateSession, SessionFilter};
use vrlog_db::models::usage_log::{
    ContentLogFilter, CreateContentLog, CreateVrLog, UpdateVrLog, VrLogFilter,
};
use vrlog_db::models::user::{CreateUser, User};
use vrlog_db::repositories::{
    AdminRepo, ContentDataRepo, ContentLogRepo, SessionRepo, UserRepo, VrLogRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn at(hour: u32, min: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2024, 5, 10, hour, min, 0).unwrap()
}

fn new_user(name: &str) -> CreateUser {
    CreateUser {
        username: name.to_string(),
        password_hash: format!("identity-{name}"),
    }
}

async fn seed_user(pool: &PgPool, name: &str) -> User {
    UserRepo::create(pool, &new_user(name)).await.unwrap()
}

fn vr_log(device: &str, user_id: Option<uuid::Uuid>, start: Timestamp) -> CreateVrLog {
    CreateVrLog {
        device_id: device.to_string(),
        user_id,
        content_name: "Ocean Dive".to_string(),
        start_time: start,
        end_time: None,
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_username_rejected(pool: PgPool) {
    seed_user(&pool, "alice").await;
    let err = UserRepo::create(&pool, &new_user("alice")).await.unwrap_err();
    match err {
        sqlx::Error::Database(db) => {
            assert_eq!(db.code().as_deref(), Some("23505"));
            assert_eq!(db.constraint(), Some("uq_users_username"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_find_or_create_reuses_existing_user(pool: PgPool) {
    let first = UserRepo::find_or_create(&pool, &new_user("bob")).await.unwrap();
    let second = UserRepo::find_or_create(&pool, &new_user("bob")).await.unwrap();
    assert_eq!(first.id, second.id);
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = 'bob'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_username_is_none(pool: PgPool) {
    let found = UserRepo::find_by_username(&pool, "ghost").await.unwrap();
    assert!(found.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_upsert_replaces_hash(pool: PgPool) {
    let input = CreateAdmin {
        username: "root".to_string(),
        password_hash: "first".to_string(),
    };
    let created = AdminRepo::upsert(&pool, &input).await.unwrap();
    let updated = AdminRepo::upsert(
        &pool,
        &CreateAdmin {
            password_hash: "second".to_string(),
            ..input
        },
    )
    .await
    .unwrap();
    assert_eq!(created.id, updated.id);
    assert_eq!(updated.password_hash, "second");
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_session_end_keeps_first_logout(pool: PgPool) {
    let user = seed_user(&pool, "carol").await;
    let session = SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user.id,
            login_time: Some(at(9, 0)),
            logout_time: None,
        },
    )
    .await
    .unwrap();
    assert!(session.is_open());

    let first = SessionRepo::end(&pool, session.id, at(10, 0)).await.unwrap().unwrap();
    let second = SessionRepo::end(&pool, session.id, at(11, 0)).await.unwrap().unwrap();
    assert_eq!(first.logout_time, Some(at(10, 0)));
    assert_eq!(second.logout_time, Some(at(10, 0)));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_session_end_before_login_rejected(pool: PgPool) {
    let user = seed_user(&pool, "dave").await;
    let session = SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user.id,
            login_time: Some(at(9, 0)),
            logout_time: None,
        },
    )
    .await
    .unwrap();

    let err = SessionRepo::end(&pool, session.id, at(8, 0)).await.unwrap_err();
    match err {
        sqlx::Error::Database(db) => {
            assert_eq!(db.code().as_deref(), Some("23514"));
            assert_eq!(db.constraint(), Some("ck_user_sessions_interval"));
        }
        other => panic!("expected check violation, got {other:?}"),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_session_end_unknown_id_is_none(pool: PgPool) {
    let ended = SessionRepo::end(&pool, uuid::Uuid::new_v4(), at(10, 0)).await.unwrap();
    assert!(ended.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_session_list_filters_by_username(pool: PgPool) {
    let dana = seed_user(&pool, "dana").await;
    let dan = seed_user(&pool, "Daniel").await;
    for (user_id, hour) in [(dana.id, 8), (dan.id, 9), (dana.id, 10)] {
        SessionRepo::create(
            &pool,
            &CreateSession {
                user_id,
                login_time: Some(at(hour, 0)),
                logout_time: None,
            },
        )
        .await
        .unwrap();
    }

    let exact = SessionFilter {
        username: Some("dana".to_string()),
        limit: 100,
        ..Default::default()
    };
    let rows = SessionRepo::list(&pool, &exact).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].login_time, at(10, 0));

    let search = SessionFilter {
        user_search: Some("DAN".to_string()),
        limit: 2,
        ..Default::default()
    };
    assert_eq!(SessionRepo::list(&pool, &search).await.unwrap().len(), 2);
    assert_eq!(SessionRepo::list_intervals(&pool).await.unwrap().len(), 3);
}

// ---------------------------------------------------------------------------
// VR logs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_vr_log_duration_is_generated(pool: PgPool) {
    let log = VrLogRepo::create(&pool, &vr_log("Quest-01", None, at(9, 0)))
        .await
        .unwrap();
    assert_eq!(log.duration_minutes, None);
    assert_eq!(log.username, None);

    let ended = VrLogRepo::end(&pool, log.id, at(9, 45) + Duration::seconds(59))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ended.duration_minutes, Some(45));

    let edited = VrLogRepo::update(
        &pool,
        log.id,
        &UpdateVrLog {
            end_time: Some(at(11, 0)),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(edited.duration_minutes, Some(120));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_vr_log_list_filters(pool: PgPool) {
    let erin = seed_user(&pool, "erin").await;
    VrLogRepo::create(&pool, &vr_log("Quest-01", Some(erin.id), at(9, 0))).await.unwrap();
    VrLogRepo::create(&pool, &vr_log("quest-02", None, at(10, 0))).await.unwrap();
    VrLogRepo::create(&pool, &vr_log("Pico-01", None, at(11, 0))).await.unwrap();

    let search = VrLogFilter {
        device_search: Some("QUEST".to_string()),
        limit: 100,
        ..Default::default()
    };
    let rows = VrLogRepo::list(&pool, &search).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].device_id, "quest-02");

    let by_user = VrLogFilter {
        username: Some("erin".to_string()),
        limit: 100,
        ..Default::default()
    };
    let rows = VrLogRepo::list(&pool, &by_user).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].username.as_deref(), Some("erin"));

    let limited = VrLogFilter {
        limit: 1,
        ..Default::default()
    };
    assert_eq!(VrLogRepo::list(&pool, &limited).await.unwrap().len(), 1);
    assert!(VrLogRepo::list_completed(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_vr_log_end_before_start_rejected(pool: PgPool) {
    let mut input = vr_log("Quest-01", None, at(9, 0));
    input.end_time = Some(at(8, 0));
    assert!(VrLogRepo::create(&pool, &input).await.is_err());
}

// ---------------------------------------------------------------------------
// Content logs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_content_log_month_window_and_delete_all(pool: PgPool) {
    let frank = seed_user(&pool, "frank").await;
    let april = Utc.with_ymd_and_hms(2024, 4, 30, 12, 0, 0).unwrap();
    for start in [april, at(9, 0), at(10, 0)] {
        ContentLogRepo::create(
            &pool,
            &CreateContentLog {
                user_id: frank.id,
                content_name: "Museum".to_string(),
                start_time: start,
                end_time: Some(start + Duration::minutes(12)),
            },
        )
        .await
        .unwrap();
    }

    let may = ContentLogFilter {
        window: Some((
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        )),
        limit: 100,
        ..Default::default()
    };
    let rows = ContentLogRepo::list(&pool, &may).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.username == "frank"));
    assert!(rows.iter().all(|r| r.duration_minutes == Some(12)));

    assert_eq!(ContentLogRepo::delete_all(&pool).await.unwrap(), 3);
    assert!(ContentLogRepo::list_completed(&pool).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Content data
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_content_data_crud(pool: PgPool) {
    let created = ContentDataRepo::create(
        &pool,
        &CreateContentData {
            content_name: "Ocean Dive".to_string(),
            content_filename: Some("ocean.mp4".to_string()),
            description: None,
            file_size: Some(1024),
            file_type: Some("video/mp4".to_string()),
        },
    )
    .await
    .unwrap();

    let updated = ContentDataRepo::update(
        &pool,
        created.id,
        &UpdateContentData {
            description: Some("Reef tour".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.description.as_deref(), Some("Reef tour"));
    assert_eq!(updated.file_size, Some(1024));

    assert_eq!(ContentDataRepo::list(&pool, 10).await.unwrap().len(), 1);
    assert!(ContentDataRepo::delete(&pool, created.id).await.unwrap());
    assert!(ContentDataRepo::find_by_id(&pool, created.id).await.unwrap().is_none());
}

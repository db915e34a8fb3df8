//! Integration tests for user and fitness class CRUD.
//!
//! - Unique constraint violations mapped to `AlreadyExists`
//! - Partial updates
//! - Delete policy: bookings removed, slots released

use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime};
use fitstudio_core::error::CoreError;
use fitstudio_core::pagination::PageRequest;
use fitstudio_core::types::new_id;
use fitstudio_db::error::RepoError;
use fitstudio_db::ledger::CapacityLedger;
use fitstudio_db::models::booking::{BookingFilter, CreateBooking};
use fitstudio_db::models::fitness_class::{CreateFitnessClass, UpdateFitnessClass};
use fitstudio_db::models::user::{CreateUser, UpdateUser};
use fitstudio_db::repositories::{BookingRepo, FitnessClassRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(name: &str, email: &str) -> CreateUser {
    CreateUser {
        name: name.to_string(),
        email: email.to_string(),
    }
}

fn new_class(instructor: &str, hour: u32, slots: i32) -> CreateFitnessClass {
    CreateFitnessClass {
        name: "HIIT".to_string(),
        instructor: instructor.to_string(),
        class_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        start_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
        available_slots: slots,
        description: Some("Bring water".to_string()),
    }
}

fn booked_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_create_and_get(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("Priya", "priya@example.com"))
        .await
        .unwrap();
    let fetched = UserRepo::get(&pool, user.id).await.unwrap();
    assert_eq!(fetched.email, "priya@example.com");

    let by_email = UserRepo::find_by_email(&pool, "priya@example.com")
        .await
        .unwrap();
    assert_eq!(by_email.map(|u| u.id), Some(user.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_already_exists(pool: PgPool) {
    UserRepo::create(&pool, &new_user("One", "dup@example.com"))
        .await
        .unwrap();
    let result = UserRepo::create(&pool, &new_user("Two", "dup@example.com")).await;
    assert_matches!(result, Err(RepoError::Core(CoreError::AlreadyExists(_))));

    let all = UserRepo::list(&pool, &PageRequest::default()).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_partial_update(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("Old", "old@example.com"))
        .await
        .unwrap();
    let updated = UserRepo::update(
        &pool,
        user.id,
        &UpdateUser {
            name: Some("New".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.name, "New");
    assert_eq!(updated.email, "old@example.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_user_is_not_found(pool: PgPool) {
    let result = UserRepo::update(&pool, new_id(), &UpdateUser::default()).await;
    assert_matches!(
        result,
        Err(RepoError::Core(CoreError::NotFound { entity: "User", .. }))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_to_taken_email_already_exists(pool: PgPool) {
    UserRepo::create(&pool, &new_user("A", "a@example.com"))
        .await
        .unwrap();
    let b = UserRepo::create(&pool, &new_user("B", "b@example.com"))
        .await
        .unwrap();
    let result = UserRepo::update(
        &pool,
        b.id,
        &UpdateUser {
            email: Some("a@example.com".to_string()),
            ..Default::default()
        },
    )
    .await;
    assert_matches!(result, Err(RepoError::Core(CoreError::AlreadyExists(_))));
    assert_eq!(
        UserRepo::get(&pool, b.id).await.unwrap().email,
        "b@example.com"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_user_releases_booked_slots(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("Leaver", "leaver@example.com"))
        .await
        .unwrap();
    let other = UserRepo::create(&pool, &new_user("Stayer", "stayer@example.com"))
        .await
        .unwrap();
    let morning = FitnessClassRepo::create(&pool, &new_class("Ravi", 7, 2))
        .await
        .unwrap();
    let evening = FitnessClassRepo::create(&pool, &new_class("Ravi", 18, 2))
        .await
        .unwrap();
    for class_id in [morning.id, evening.id] {
        CapacityLedger::book(
            &pool,
            &CreateBooking {
                user_id: user.id,
                class_id,
            },
            booked_on(),
        )
        .await
        .unwrap();
    }
    CapacityLedger::book(
        &pool,
        &CreateBooking {
            user_id: other.id,
            class_id: morning.id,
        },
        booked_on(),
    )
    .await
    .unwrap();

    UserRepo::delete(&pool, user.id).await.unwrap();

    assert!(UserRepo::find_by_id(&pool, user.id).await.unwrap().is_none());
    assert_eq!(
        FitnessClassRepo::get(&pool, morning.id)
            .await
            .unwrap()
            .available_slots,
        1
    );
    assert_eq!(
        FitnessClassRepo::get(&pool, evening.id)
            .await
            .unwrap()
            .available_slots,
        2
    );
    let remaining = BookingRepo::list(&pool, &BookingFilter::default(), &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].user_id, other.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_missing_user_is_not_found(pool: PgPool) {
    let result = UserRepo::delete(&pool, new_id()).await;
    assert_matches!(result, Err(RepoError::Core(CoreError::NotFound { .. })));
}

// ---------------------------------------------------------------------------
// Fitness classes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_instructor_schedule_already_exists(pool: PgPool) {
    FitnessClassRepo::create(&pool, &new_class("Meera", 9, 10))
        .await
        .unwrap();
    let result = FitnessClassRepo::create(&pool, &new_class("Meera", 9, 5)).await;
    assert_matches!(
        result,
        Err(RepoError::Core(CoreError::AlreadyExists(msg)))
            if msg == "Instructor is already scheduled at that date and time"
    );

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM fitness_classes")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_class_partial_update(pool: PgPool) {
    let class = FitnessClassRepo::create(&pool, &new_class("Meera", 9, 10))
        .await
        .unwrap();
    let updated = FitnessClassRepo::update(
        &pool,
        class.id,
        &UpdateFitnessClass {
            available_slots: Some(25),
            start_time: NaiveTime::from_hms_opt(10, 30, 0),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.available_slots, 25);
    assert_eq!(updated.start_time, NaiveTime::from_hms_opt(10, 30, 0).unwrap());
    assert_eq!(updated.instructor, "Meera");
    assert_eq!(updated.description.as_deref(), Some("Bring water"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_class_update_onto_taken_schedule_already_exists(pool: PgPool) {
    FitnessClassRepo::create(&pool, &new_class("Meera", 9, 10))
        .await
        .unwrap();
    let later = FitnessClassRepo::create(&pool, &new_class("Meera", 11, 10))
        .await
        .unwrap();
    let result = FitnessClassRepo::update(
        &pool,
        later.id,
        &UpdateFitnessClass {
            start_time: NaiveTime::from_hms_opt(9, 0, 0),
            ..Default::default()
        },
    )
    .await;
    assert_matches!(result, Err(RepoError::Core(CoreError::AlreadyExists(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_negative_slots_rejected_by_check_constraint(pool: PgPool) {
    let result = FitnessClassRepo::create(&pool, &new_class("Meera", 9, -1)).await;
    assert_matches!(result, Err(RepoError::Database(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_class_removes_its_bookings(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("Member", "m@example.com"))
        .await
        .unwrap();
    let class = FitnessClassRepo::create(&pool, &new_class("Meera", 9, 3))
        .await
        .unwrap();
    let booking = CapacityLedger::book(
        &pool,
        &CreateBooking {
            user_id: user.id,
            class_id: class.id,
        },
        booked_on(),
    )
    .await
    .unwrap();

    FitnessClassRepo::delete(&pool, class.id).await.unwrap();

    assert!(FitnessClassRepo::find_by_id(&pool, class.id)
        .await
        .unwrap()
        .is_none());
    assert!(BookingRepo::find_by_id(&pool, booking.id)
        .await
        .unwrap()
        .is_none());
    assert!(UserRepo::find_by_id(&pool, user.id).await.unwrap().is_some());
}

use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    fitstudio_db::health_check(&pool).await.unwrap();

    for table in ["users", "fitness_classes", "bookings"] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// Unique constraints carry the names the error classifier matches on.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unique_constraint_names(pool: PgPool) {
    let names: Vec<(String,)> = sqlx::query_as(
        "SELECT conname::text FROM pg_constraint \
         WHERE contype = 'u' AND connamespace = 'public'::regnamespace \
         ORDER BY conname",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    let names: Vec<String> = names.into_iter().map(|(n,)| n).collect();

    assert_eq!(
        names,
        vec![
            fitstudio_core::booking::UQ_USER_CLASS_BOOKING,
            fitstudio_core::booking::UQ_INSTRUCTOR_SCHEDULE,
            fitstudio_core::booking::UQ_USER_EMAIL,
        ]
    );
}

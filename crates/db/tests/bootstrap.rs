use sqlx::PgPool;

/// Full bootstrap: migrate an empty database, check health and schema.
#[sqlx::test(migrations = false)]
async fn test_full_bootstrap(pool: PgPool) {
    vhc_db::run_migrations(&pool).await.unwrap();
    vhc_db::health_check(&pool).await.unwrap();

    let tables = [
        "sites",
        "inspection_templates",
        "customers",
        "vehicles",
        "dms_import_batches",
        "inspections",
        "organization_dms_settings",
        "dms_usage_counters",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// Migrations already applied are skipped on a second run.
#[sqlx::test(migrations = false)]
async fn test_migrations_rerun_is_noop(pool: PgPool) {
    vhc_db::run_migrations(&pool).await.unwrap();
    vhc_db::run_migrations(&pool).await.unwrap();

    let applied: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(applied.0, 8);
}

/// The pool built from `DATABASE_URL` reaches the server.
#[tokio::test]
async fn test_create_pool_connects() {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = vhc_db::create_pool(&url).await.unwrap();
    vhc_db::health_check(&pool).await.unwrap();
    pool.close().await;
}

//! Database module
//!
//! Connection and schema verification utilities. Schema DDL lives in
//! raw SQL files under migrations/.

use sqlx::PgPool;

/// Verify database connectivity
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;

    Ok(())
}

/// Check if required tables exist
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let required_tables = vec![
        "users",
        "accounts",
        "account_users",
        "cards",
        "loans",
        "bills",
        "penalties",
        "operations",
    ];

    for table in required_tables {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )
            "#,
        )
        .bind(table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    Ok(true)
}

/// Check that the configured house account is present. Commission and
/// penalty flows all post against it, so startup refuses to proceed
/// without it.
pub async fn check_house_account(
    pool: &PgPool,
    house_account_id: i32,
) -> Result<bool, sqlx::Error> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM accounts WHERE id = $1)")
        .bind(house_account_id)
        .fetch_one(pool)
        .await?;

    if !exists {
        tracing::error!(
            "House account {} does not exist. Please run database seed.",
            house_account_id
        );
        return Ok(false);
    }

    tracing::info!("House account verified: {}", house_account_id);
    Ok(true)
}

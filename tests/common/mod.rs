//! Common test utilities

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use bankcore::Config;

/// House account id seeded by [`setup_test_db`].
pub const HOUSE_ACCOUNT_ID: i32 = 1;

/// Setup test database - truncate tables and seed the house account
/// plus one test user.
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    let mut tx = pool.begin().await.expect("Failed to begin transaction");

    sqlx::query(
        "TRUNCATE TABLE operations, bills, penalties, loans, cards, \
         account_users, accounts, users RESTART IDENTITY CASCADE",
    )
    .execute(&mut *tx)
    .await
    .expect("Failed to clean up DB");

    // House account takes id 1
    sqlx::query(
        r#"
        INSERT INTO accounts (account_number, balance, yearly_interest_rate, status_id, registration_date)
        VALUES ('BY000000000000000001', 1000000, 0, 2, $1)
        "#,
    )
    .bind(Utc::now())
    .execute(&mut *tx)
    .await
    .expect("Failed to seed house account");

    sqlx::query(
        r#"
        INSERT INTO users (first_name, last_name, email)
        VALUES ('Test', 'User', 'test@example.com')
        "#,
    )
    .execute(&mut *tx)
    .await
    .expect("Failed to seed test user");

    tx.commit().await.expect("Failed to commit transaction");

    pool
}

/// Seed an unlocked account with the given balance; returns its id.
pub async fn seed_account(pool: &PgPool, number: &str, balance: Decimal) -> i32 {
    sqlx::query_scalar(
        r#"
        INSERT INTO accounts (account_number, balance, yearly_interest_rate, status_id, registration_date)
        VALUES ($1, $2, 0, 2, $3) RETURNING id
        "#,
    )
    .bind(number)
    .bind(balance)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .expect("Failed to seed account")
}

/// Seed an unlocked overdraft card owned by the test user. The balance
/// starts NULL, as a card that has never moved money would.
pub async fn seed_overdraft_card(pool: &PgPool, number: &str, overdraft_max: Decimal) -> i32 {
    sqlx::query_scalar(
        r#"
        INSERT INTO cards (number, cvc, pin, expiration_date, registration_date,
                           balance, overdraft_max, overdraft_interest_rate,
                           user_id, account_id, type_id, status_id)
        VALUES ($1, '123', '1234', '2030-01-01', $2, NULL, $3, 10, 1, NULL, 3, 2)
        RETURNING id
        "#,
    )
    .bind(number)
    .bind(Utc::now().date_naive())
    .bind(overdraft_max)
    .fetch_one(pool)
    .await
    .expect("Failed to seed card")
}

pub async fn card_balance(pool: &PgPool, id: i32) -> Option<Decimal> {
    sqlx::query_scalar("SELECT balance FROM cards WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("Failed to read card balance")
}

pub async fn account_balance(pool: &PgPool, id: i32) -> Decimal {
    sqlx::query_scalar("SELECT balance FROM accounts WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("Failed to read balance")
}

/// Configuration matching the seeded data, without touching the
/// environment.
pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        database_max_connections: 5,
        house_account_id: HOUSE_ACCOUNT_ID,
        loan_overdue_penalty_rate: Decimal::new(1, 2),
        transfer_commission_percent: Decimal::new(5, 0),
        loans_min_time_months: 6,
        loans_max_time_months: 120,
        loans_min_interest: Decimal::ONE,
        loans_max_interest: Decimal::new(30, 0),
        loans_min_value: Decimal::new(100, 0),
        loans_max_active: 3,
        account_requests_max: 2,
        bill_requests_max: 2,
        bill_hanging_months_limit: 3,
    }
}

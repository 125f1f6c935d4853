//! Integration tests for the scheduled ledger jobs
//!
//! Require a Postgres instance with the migrations applied and
//! DATABASE_URL set. Time is injected through a fixed clock so the
//! month arithmetic is deterministic. Each test truncates shared
//! tables, so run with `--test-threads=1`.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::PgPool;

use bankcore::clock::FixedClock;
use bankcore::jobs::{HangingBillsRemoval, LoanStatusCheck, MonthlyBillAssignment};
use bankcore::model::{BillStatus, LoanStatus};
use bankcore::repo::{BillRepository, LoanRepository, PenaltyRepository};
use bankcore::TransactionExecutor;

mod common;

async fn seed_loan(
    pool: &PgPool,
    account_id: i32,
    total: Decimal,
    issue: NaiveDate,
    due: NaiveDate,
    status: LoanStatus,
) -> i32 {
    sqlx::query_scalar(
        r#"
        INSERT INTO loans (single_payment_value, starting_value, total_payment_value,
                           yearly_interest_rate, issue_date, due_date, user_id,
                           account_id, status_id)
        VALUES (100, 1000, $1, 12, $2, $3, 1, $4, $5)
        RETURNING id
        "#,
    )
    .bind(total)
    .bind(issue)
    .bind(due)
    .bind(account_id)
    .bind(status.code())
    .fetch_one(pool)
    .await
    .expect("Failed to seed loan")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[tokio::test]
async fn test_monthly_job_bills_pending_loans() {
    let pool = common::setup_test_db().await;
    let account = common::seed_account(&pool, "BY100000000000000001", dec!(0)).await;
    let loan_id = seed_loan(
        &pool,
        account,
        dec!(1200),
        date(2026, 1, 15),
        date(2027, 1, 15),
        LoanStatus::Pending,
    )
    .await;

    let executor = TransactionExecutor::new(pool.clone());
    let job = MonthlyBillAssignment::new(
        LoanRepository::new(executor.clone()),
        BillRepository::new(executor.clone()),
        PenaltyRepository::new(executor.clone()),
        &common::test_config(),
        Arc::new(FixedClock::on(date(2026, 2, 1))),
    );

    let report = job.run().await.expect("job failed");
    assert_eq!(report.bills_created, 1);
    assert_eq!(report.penalties_created, 0);

    let bill_repo = BillRepository::new(executor);
    let bills = bill_repo.find_all().await.unwrap();
    let bill = bills.iter().find(|b| b.loan_id == Some(loan_id)).unwrap();
    assert_eq!(bill.value, dec!(100));
    assert_eq!(bill.status, BillStatus::Pending);
    assert_eq!(bill.payment_account_id, common::HOUSE_ACCOUNT_ID);
    assert_eq!(bill.bearer_id, 1);
    assert!(bill.penalty_id.is_none());

    // A second run in the same month (process restart on the 1st)
    // must not bill the loan again
    let report = job.run().await.expect("job failed");
    assert_eq!(report.bills_created, 0);
    let bills = bill_repo.find_all().await.unwrap();
    assert_eq!(
        bills.iter().filter(|b| b.loan_id == Some(loan_id)).count(),
        1
    );
}

#[tokio::test]
async fn test_monthly_job_penalizes_overdue_loans() {
    let pool = common::setup_test_db().await;
    let account = common::seed_account(&pool, "BY100000000000000002", dec!(0)).await;
    let loan_id = seed_loan(
        &pool,
        account,
        dec!(1200),
        date(2025, 1, 15),
        date(2026, 1, 15),
        LoanStatus::Overdue,
    )
    .await;

    let executor = TransactionExecutor::new(pool.clone());
    let job = MonthlyBillAssignment::new(
        LoanRepository::new(executor.clone()),
        BillRepository::new(executor.clone()),
        PenaltyRepository::new(executor.clone()),
        &common::test_config(),
        Arc::new(FixedClock::on(date(2026, 2, 1))),
    );

    let report = job.run().await.expect("job failed");
    assert_eq!(report.bills_created, 1);
    assert_eq!(report.penalties_created, 1);

    // Interest accrued on the outstanding total: 1200 grows by one
    // month's share of 12% yearly
    let loan = LoanRepository::new(executor.clone())
        .find_by_id(loan_id)
        .await
        .unwrap()
        .unwrap();
    assert!(loan.total_payment_value > dec!(1200));
    assert!(loan.total_payment_value < dec!(1212));

    let bills = BillRepository::new(executor.clone()).find_all().await.unwrap();
    let bill = bills.iter().find(|b| b.loan_id == Some(loan_id)).unwrap();
    assert!(bill.penalty_id.is_some());
    assert_eq!(bill.due_date, Some(date(2026, 3, 1)));

    // Penalty is starting_value x configured rate
    let penalty = PenaltyRepository::new(executor.clone())
        .find_by_id(bill.penalty_id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(penalty.value, dec!(10.00));
    assert_eq!(penalty.user_id, 1);

    // Re-running in the same month must not accrue a second time
    let total_after_first = loan.total_payment_value;
    let report = job.run().await.expect("job failed");
    assert_eq!(report.bills_created, 0);
    assert_eq!(report.penalties_created, 0);
    let loan = LoanRepository::new(executor)
        .find_by_id(loan_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loan.total_payment_value, total_after_first);
}

#[tokio::test]
async fn test_status_check_closes_and_marks_overdue() {
    let pool = common::setup_test_db().await;
    let account = common::seed_account(&pool, "BY100000000000000003", dec!(0)).await;

    let paid_loan = seed_loan(
        &pool,
        account,
        dec!(200),
        date(2025, 6, 1),
        date(2026, 6, 1),
        LoanStatus::Pending,
    )
    .await;
    let late_loan = seed_loan(
        &pool,
        account,
        dec!(500),
        date(2025, 1, 1),
        date(2026, 1, 1),
        LoanStatus::Pending,
    )
    .await;

    // Two closed bills fully cover the first loan's total
    for _ in 0..2 {
        sqlx::query(
            "INSERT INTO bills (value, issue_date, user_id, bearer_id, \
             payment_account_id, status_id, loan_id) \
             VALUES (100, $1, 1, 1, $2, $3, $4)",
        )
        .bind(date(2026, 1, 1))
        .bind(common::HOUSE_ACCOUNT_ID)
        .bind(BillStatus::Closed.code())
        .bind(paid_loan)
        .execute(&pool)
        .await
        .unwrap();
    }

    let executor = TransactionExecutor::new(pool.clone());
    let loans = LoanRepository::new(executor.clone());
    let job = LoanStatusCheck::new(
        loans.clone(),
        BillRepository::new(executor),
        Arc::new(FixedClock::on(date(2026, 2, 1))),
    );

    let report = job.run().await.expect("job failed");
    assert_eq!(report.loans_closed, 1);
    assert_eq!(report.loans_marked_overdue, 1);

    let paid = loans.find_by_id(paid_loan).await.unwrap().unwrap();
    assert_eq!(paid.status, LoanStatus::Closed);
    let late = loans.find_by_id(late_loan).await.unwrap().unwrap();
    assert_eq!(late.status, LoanStatus::Overdue);

    // Second run finds nothing left to do
    let report = job.run().await.expect("job failed");
    assert_eq!(report.loans_closed, 0);
    assert_eq!(report.loans_marked_overdue, 0);
}

#[tokio::test]
async fn test_hanging_bills_removal_deletes_old_unattached_bills() {
    let pool = common::setup_test_db().await;

    let insert_bill = |issue: NaiveDate, due: Option<NaiveDate>| {
        let pool = pool.clone();
        async move {
            let id: i32 = sqlx::query_scalar(
                "INSERT INTO bills (value, issue_date, due_date, user_id, bearer_id, \
                 payment_account_id, status_id) \
                 VALUES (10, $1, $2, 1, 1, $3, $4) RETURNING id",
            )
            .bind(issue)
            .bind(due)
            .bind(common::HOUSE_ACCOUNT_ID)
            .bind(BillStatus::Pending.code())
            .fetch_one(&pool)
            .await
            .unwrap();
            id
        }
    };

    let stale = insert_bill(date(2026, 1, 10), None).await;
    let recent = insert_bill(date(2026, 4, 10), None).await;
    // Old but scheduled: a due date exempts it from cleanup
    let scheduled = insert_bill(date(2026, 1, 10), Some(date(2026, 12, 1))).await;

    let executor = TransactionExecutor::new(pool.clone());
    let bills = BillRepository::new(executor);
    let job = HangingBillsRemoval::new(
        bills.clone(),
        &common::test_config(),
        Arc::new(FixedClock::on(date(2026, 5, 15))),
    );

    let report = job.run().await.expect("job failed");
    assert_eq!(report.bills_deleted, 1);

    assert!(bills.find_by_id(stale).await.unwrap().is_none());
    assert!(bills.find_by_id(recent).await.unwrap().is_some());
    assert!(bills.find_by_id(scheduled).await.unwrap().is_some());
}

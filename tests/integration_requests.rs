//! Integration tests for account and bill requests
//!
//! Require a Postgres instance with the migrations applied and
//! DATABASE_URL set. Each test truncates shared tables, so run with
//! `--test-threads=1`.

use std::sync::Arc;

use rust_decimal_macros::dec;

use bankcore::clock::SystemClock;
use bankcore::model::{AccountStatus, BillStatus};
use bankcore::repo::AccountRepository;
use bankcore::services::{AccountService, BillRequest, BillService};
use bankcore::{AppError, Precondition, TransactionExecutor};

mod common;

#[tokio::test]
async fn test_account_requests_capped_per_user() {
    let pool = common::setup_test_db().await;
    let executor = TransactionExecutor::new(pool);
    let accounts = AccountRepository::new(executor);
    let service = AccountService::new(accounts.clone(), &common::test_config(), Arc::new(SystemClock));

    // the configured cap is 2 pending accounts
    let first = service
        .open_account(1, "BY900000000000000001")
        .await
        .expect("first request failed");
    service
        .open_account(1, "BY900000000000000002")
        .await
        .expect("second request failed");

    let err = service
        .open_account(1, "BY900000000000000003")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Precondition(Precondition::TooManyAccountRequests)
    ));

    // approving one frees a slot
    accounts
        .update_status(first, AccountStatus::Unlocked)
        .await
        .unwrap();
    service
        .open_account(1, "BY900000000000000003")
        .await
        .expect("request after approval failed");

    // new accounts start pending and carry the owner link
    let account = accounts.find_by_id(first).await.unwrap().unwrap();
    assert_eq!(account.account_number, "BY900000000000000001");
    assert_eq!(accounts.owner_ids(first).await.unwrap(), vec![1]);
}

#[tokio::test]
async fn test_account_request_rejects_bad_or_taken_number() {
    let pool = common::setup_test_db().await;
    let executor = TransactionExecutor::new(pool);
    let service = AccountService::new(
        AccountRepository::new(executor),
        &common::test_config(),
        Arc::new(SystemClock),
    );

    let err = service.open_account(1, "not-a-number").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // the house account's number is already taken
    let err = service
        .open_account(1, "BY000000000000000001")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_bill_requests_capped_per_bearer() {
    let pool = common::setup_test_db().await;
    let executor = TransactionExecutor::new(pool);
    let bills = bankcore::repo::BillRepository::new(executor);
    let service = BillService::new(bills.clone(), &common::test_config(), Arc::new(SystemClock));

    let request = BillRequest {
        value: dec!(25),
        user_id: 1,
        bearer_id: 1,
        payment_account_id: common::HOUSE_ACCOUNT_ID,
        due_date: None,
        notice: Some("rent".into()),
    };

    let first = service.request_bill(&request).await.expect("first bill failed");
    service.request_bill(&request).await.expect("second bill failed");

    let err = service.request_bill(&request).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Precondition(Precondition::TooManyBillRequests)
    ));

    // closing one frees a slot
    bills.update_status(first, BillStatus::Closed).await.unwrap();
    service
        .request_bill(&request)
        .await
        .expect("bill after close failed");

    let bill = bills.find_by_id(first).await.unwrap().unwrap();
    assert_eq!(bill.value, dec!(25));
    assert_eq!(bill.notice.as_deref(), Some("rent"));
}

#[tokio::test]
async fn test_bill_request_rejects_non_positive_value() {
    let pool = common::setup_test_db().await;
    let executor = TransactionExecutor::new(pool);
    let service = BillService::new(
        bankcore::repo::BillRepository::new(executor),
        &common::test_config(),
        Arc::new(SystemClock),
    );

    let request = BillRequest {
        value: dec!(0),
        user_id: 1,
        bearer_id: 1,
        payment_account_id: common::HOUSE_ACCOUNT_ID,
        due_date: None,
        notice: None,
    };
    let err = service.request_bill(&request).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

//! Card repository

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::criteria::{CardField, Criteria, Param};
use crate::error::AppResult;
use crate::executor::{Statement, TransactionExecutor};
use crate::model::{Card, CardStatus, CardType};

const SELECT: &str = "SELECT * FROM cards";

const INSERT: &str = "INSERT INTO cards \
    (number, cvc, pin, expiration_date, registration_date, balance, \
     overdraft_max, overdraft_interest_rate, user_id, account_id, type_id, status_id) \
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING id";

const UPDATE_STATUS: &str = "UPDATE cards SET status_id = $1 WHERE id = $2";

#[derive(Debug, Clone)]
pub struct NewCard {
    pub number: String,
    pub cvc: String,
    pub pin: String,
    pub expiration_date: NaiveDate,
    pub registration_date: NaiveDate,
    /// Own balance; None for debit cards spending their linked account
    pub balance: Option<Decimal>,
    pub overdraft_max: Option<Decimal>,
    pub overdraft_interest_rate: Option<Decimal>,
    pub user_id: i32,
    pub account_id: Option<i32>,
    pub card_type: CardType,
    pub status: CardStatus,
}

#[derive(Debug, Clone)]
pub struct CardRepository {
    executor: TransactionExecutor,
}

impl CardRepository {
    pub fn new(executor: TransactionExecutor) -> Self {
        Self { executor }
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Card>> {
        let stmt = Statement::new(format!("{SELECT} WHERE id = $1"), vec![Param::Int(id)]);
        self.executor.query_single(&stmt).await
    }

    pub async fn find_by_number(&self, number: &str) -> AppResult<Option<Card>> {
        let stmt = Statement::new(
            format!("{SELECT} WHERE number = $1"),
            vec![Param::from(number)],
        );
        self.executor.query_single(&stmt).await
    }

    pub async fn find_all(&self) -> AppResult<Vec<Card>> {
        self.executor.query(&Statement::new(SELECT, vec![])).await
    }

    pub async fn find_by_criteria(&self, criteria: &Criteria<CardField>) -> AppResult<Vec<Card>> {
        let (sql, params) = criteria.generate_query(SELECT);
        self.executor.query(&Statement::new(sql, params)).await
    }

    pub async fn create(&self, card: &NewCard) -> AppResult<i32> {
        let stmt = Statement::returning_id(
            INSERT,
            vec![
                Param::from(card.number.clone()),
                Param::from(card.cvc.clone()),
                Param::from(card.pin.clone()),
                Param::Date(card.expiration_date),
                Param::Date(card.registration_date),
                Param::OptDecimal(card.balance),
                Param::OptDecimal(card.overdraft_max),
                Param::OptDecimal(card.overdraft_interest_rate),
                Param::Int(card.user_id),
                Param::OptInt(card.account_id),
                Param::SmallInt(card.card_type.code()),
                Param::SmallInt(card.status.code()),
            ],
        );
        let outcome = self.executor.update(&stmt).await?;
        outcome.require_generated_id()
    }

    pub async fn update_status(&self, id: i32, status: CardStatus) -> AppResult<u64> {
        let stmt = Statement::new(
            UPDATE_STATUS,
            vec![Param::SmallInt(status.code()), Param::Int(id)],
        );
        Ok(self.executor.update(&stmt).await?.rows_affected())
    }
}

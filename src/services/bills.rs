//! Bill issuance
//!
//! User-requested bills start PENDING; the number of pending bills one
//! bearer may accumulate is capped by configuration. Loan bills issued
//! by the scheduled jobs go through the repository directly and are not
//! subject to the cap.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::clock::Clock;
use crate::config::Config;
use crate::criteria::{BillField, Criteria, CriteriaValue};
use crate::error::{AppError, AppResult, Precondition};
use crate::model::BillStatus;
use crate::repo::{BillRepository, NewBill};

/// A user-initiated bill request
#[derive(Debug, Clone)]
pub struct BillRequest {
    pub value: Decimal,
    /// Who issues the bill
    pub user_id: i32,
    /// Who has to pay it
    pub bearer_id: i32,
    pub payment_account_id: i32,
    pub due_date: Option<NaiveDate>,
    pub notice: Option<String>,
}

#[derive(Clone)]
pub struct BillService {
    bills: BillRepository,
    max_pending: u32,
    clock: Arc<dyn Clock>,
}

impl BillService {
    pub fn new(bills: BillRepository, config: &Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            bills,
            max_pending: config.bill_requests_max,
            clock,
        }
    }

    /// Validate and create a requested bill. Returns the generated
    /// bill id.
    pub async fn request_bill(&self, request: &BillRequest) -> AppResult<i32> {
        if request.value <= Decimal::ZERO {
            return Err(AppError::Validation(format!(
                "bill value must be positive, got {}",
                request.value
            )));
        }

        let mut criteria = Criteria::new();
        criteria
            .add(BillField::Bearer, CriteriaValue::equals(request.bearer_id))
            .add(
                BillField::Status,
                CriteriaValue::equals(BillStatus::Pending.code()),
            );
        let pending = self.bills.find_by_criteria(&criteria).await?;
        if pending.len() >= self.max_pending as usize {
            return Err(Precondition::TooManyBillRequests.into());
        }

        let bill = NewBill {
            value: request.value,
            issue_date: self.clock.today(),
            due_date: request.due_date,
            user_id: request.user_id,
            bearer_id: request.bearer_id,
            payment_account_id: request.payment_account_id,
            status: BillStatus::Pending,
            penalty_id: None,
            loan_id: None,
            notice: request.notice.clone(),
        };
        let bill_id = self.bills.create(&bill).await?;

        tracing::info!(bill_id, bearer_id = request.bearer_id, "bill requested");
        Ok(bill_id)
    }
}

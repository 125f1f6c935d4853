//! Hanging bill cleanup
//!
//! Fires every 8 hours. A bill with no due date is monitored for
//! staleness: once it has stayed PENDING for the configured number of
//! whole months since issue, it is deleted.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};

use crate::clock::Clock;
use crate::config::Config;
use crate::criteria::{BillField, Criteria, CriteriaValue};
use crate::model::BillStatus;
use crate::repo::BillRepository;

use super::{JobError, JobReport};

pub struct HangingBillsRemoval {
    bills: BillRepository,
    months_limit: u32,
    clock: Arc<dyn Clock>,
}

impl HangingBillsRemoval {
    pub const ID: &'static str = "hanging-bills-removal";
    /// Every 8 hours
    pub const SCHEDULE: &'static str = "0 0 0/8 ? * * *";

    pub fn new(bills: BillRepository, config: &Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            bills,
            months_limit: config.bill_hanging_months_limit,
            clock,
        }
    }

    pub async fn run(&self) -> Result<JobReport, JobError> {
        let mut report = JobReport::new(Self::ID);
        let today = self.clock.today();

        let mut criteria = Criteria::new();
        criteria.add(
            BillField::Status,
            CriteriaValue::equals(BillStatus::Pending.code()),
        );

        for bill in self.bills.find_by_criteria(&criteria).await? {
            // bills with a due date are the status-check job's concern
            if bill.due_date.is_some() {
                continue;
            }
            if whole_months_between(bill.issue_date, today) >= self.months_limit as i32 {
                self.bills.delete(bill.id).await?;
                report.bills_deleted += 1;
                tracing::debug!(bill_id = bill.id, issued = %bill.issue_date, "hanging bill removed");
            }
        }

        Ok(report.finish(self.clock.now()))
    }
}

/// Whole months elapsed from `from` to `to`; a partial month does not
/// count
fn whole_months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    let mut months =
        (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32);
    if to.day() < from.day() {
        months -= 1;
    }
    months
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_whole_months_between() {
        assert_eq!(whole_months_between(date(2026, 1, 15), date(2026, 5, 15)), 4);
        // partial month does not count
        assert_eq!(whole_months_between(date(2026, 1, 15), date(2026, 5, 14)), 3);
        assert_eq!(whole_months_between(date(2026, 1, 15), date(2026, 3, 15)), 2);
        assert_eq!(whole_months_between(date(2026, 1, 1), date(2026, 1, 31)), 0);
        // across a year boundary
        assert_eq!(whole_months_between(date(2025, 11, 1), date(2026, 2, 1)), 3);
    }

    #[test]
    fn test_limit_boundary() {
        // with a 3-month limit: 4 months old is deleted, 2 months old is kept
        let today = date(2026, 5, 1);
        let limit = 3;
        assert!(whole_months_between(date(2026, 1, 1), today) >= limit);
        assert!(whole_months_between(date(2026, 3, 1), today) < limit);
    }
}

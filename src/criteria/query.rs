//! Criteria container and query generation

use std::fmt::Write;

use super::fields::CriteriaField;
use super::value::{CriteriaValue, Param};

/// Boolean operator applied uniformly across all predicates of one
/// criteria. Mixed-precedence grouping is deliberately unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Link {
    #[default]
    And,
    Or,
}

impl Link {
    fn joiner(self) -> &'static str {
        match self {
            Link::And => " AND ",
            Link::Or => " OR ",
        }
    }
}

/// A composable filter over one entity kind's fields
#[derive(Debug, Clone, PartialEq)]
pub struct Criteria<F> {
    link: Link,
    predicates: Vec<(F, CriteriaValue)>,
}

impl<F> Default for Criteria<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> Criteria<F> {
    /// All predicates joined with AND
    pub fn new() -> Self {
        Self {
            link: Link::And,
            predicates: Vec::new(),
        }
    }

    /// All predicates joined with OR
    pub fn any() -> Self {
        Self {
            link: Link::Or,
            predicates: Vec::new(),
        }
    }

    pub fn add(&mut self, field: F, value: CriteriaValue) -> &mut Self {
        self.predicates.push((field, value));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }
}

impl<F: CriteriaField> Criteria<F> {
    /// Append a WHERE clause to `base` and collect parameters in the
    /// order the fields were added. An empty criteria returns the base
    /// template unchanged.
    ///
    /// The base template must terminate without a trailing WHERE or
    /// semicolon so appending is always safe.
    pub fn generate_query(&self, base: &str) -> (String, Vec<Param>) {
        if self.predicates.is_empty() {
            return (base.to_string(), Vec::new());
        }

        let mut sql = String::with_capacity(base.len() + 32 * self.predicates.len());
        sql.push_str(base);
        sql.push_str(" WHERE ");

        let mut params = Vec::new();
        for (i, (field, value)) in self.predicates.iter().enumerate() {
            if i > 0 {
                sql.push_str(self.link.joiner());
            }
            match value {
                CriteriaValue::Equals(p) => {
                    params.push(p.clone());
                    write!(sql, "{} = ${}", field.column(), params.len()).expect("write to string");
                }
                CriteriaValue::Range(lo, hi) => {
                    params.push(lo.clone());
                    let lo_idx = params.len();
                    params.push(hi.clone());
                    write!(
                        sql,
                        "{} BETWEEN ${} AND ${}",
                        field.column(),
                        lo_idx,
                        params.len()
                    )
                    .expect("write to string");
                }
            }
        }

        (sql, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{BillField, LoanField};
    use rust_decimal_macros::dec;

    const BASE: &str = "SELECT * FROM bills";

    #[test]
    fn test_empty_criteria_returns_base_unchanged() {
        let criteria: Criteria<BillField> = Criteria::new();
        let (sql, params) = criteria.generate_query(BASE);
        assert_eq!(sql, BASE);
        assert!(params.is_empty());
    }

    #[test]
    fn test_single_equals_predicate() {
        let mut criteria = Criteria::new();
        criteria.add(BillField::Status, CriteriaValue::equals(1i16));

        let (sql, params) = criteria.generate_query(BASE);
        assert_eq!(sql, "SELECT * FROM bills WHERE status_id = $1");
        assert_eq!(params, vec![Param::SmallInt(1)]);
    }

    #[test]
    fn test_and_joins_predicates_in_insertion_order() {
        let mut criteria = Criteria::new();
        criteria
            .add(BillField::Loan, CriteriaValue::equals(17))
            .add(BillField::Value, CriteriaValue::equals(dec!(250)))
            .add(BillField::Status, CriteriaValue::equals(2i16));

        let (sql, params) = criteria.generate_query(BASE);
        assert_eq!(
            sql,
            "SELECT * FROM bills WHERE loan_id = $1 AND value = $2 AND status_id = $3"
        );
        assert_eq!(
            params,
            vec![
                Param::Int(17),
                Param::Decimal(dec!(250)),
                Param::SmallInt(2)
            ]
        );
    }

    #[test]
    fn test_or_criteria_uses_or_joiner() {
        let mut criteria = Criteria::any();
        criteria
            .add(BillField::User, CriteriaValue::equals(1))
            .add(BillField::Bearer, CriteriaValue::equals(1))
            .add(BillField::PaymentAccount, CriteriaValue::equals(9));

        let (sql, params) = criteria.generate_query(BASE);
        assert_eq!(
            sql,
            "SELECT * FROM bills WHERE user_id = $1 OR bearer_id = $2 OR payment_account_id = $3"
        );
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_range_contributes_two_ordered_params() {
        let mut criteria = Criteria::new();
        criteria
            .add(LoanField::Status, CriteriaValue::equals(1i16))
            .add(
                LoanField::TotalValue,
                CriteriaValue::between(dec!(100), dec!(1000)),
            );

        let (sql, params) = criteria.generate_query("SELECT * FROM loans");
        assert_eq!(
            sql,
            "SELECT * FROM loans WHERE status_id = $1 AND total_payment_value BETWEEN $2 AND $3"
        );
        assert_eq!(
            params,
            vec![
                Param::SmallInt(1),
                Param::Decimal(dec!(100)),
                Param::Decimal(dec!(1000))
            ]
        );
    }
}

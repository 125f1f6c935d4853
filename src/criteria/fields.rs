//! Field tags, one enum per filterable entity kind
//!
//! Each tag maps to its column name; the per-entity enums are what keep
//! criteria typed without reflection.

/// A filterable field of some entity kind
pub trait CriteriaField {
    fn column(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountField {
    Id,
    Number,
    Balance,
    InterestRate,
    Status,
}

impl CriteriaField for AccountField {
    fn column(&self) -> &'static str {
        match self {
            AccountField::Id => "id",
            AccountField::Number => "account_number",
            AccountField::Balance => "balance",
            AccountField::InterestRate => "yearly_interest_rate",
            AccountField::Status => "status_id",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardField {
    Id,
    Number,
    User,
    Account,
    Type,
    Status,
    ExpirationDate,
}

impl CriteriaField for CardField {
    fn column(&self) -> &'static str {
        match self {
            CardField::Id => "id",
            CardField::Number => "number",
            CardField::User => "user_id",
            CardField::Account => "account_id",
            CardField::Type => "type_id",
            CardField::Status => "status_id",
            CardField::ExpirationDate => "expiration_date",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanField {
    Id,
    User,
    Account,
    Card,
    Status,
    IssueDate,
    DueDate,
    SinglePaymentValue,
    TotalValue,
}

impl CriteriaField for LoanField {
    fn column(&self) -> &'static str {
        match self {
            LoanField::Id => "id",
            LoanField::User => "user_id",
            LoanField::Account => "account_id",
            LoanField::Card => "card_id",
            LoanField::Status => "status_id",
            LoanField::IssueDate => "issue_date",
            LoanField::DueDate => "due_date",
            LoanField::SinglePaymentValue => "single_payment_value",
            LoanField::TotalValue => "total_payment_value",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillField {
    Id,
    Value,
    User,
    Bearer,
    PaymentAccount,
    Status,
    Penalty,
    Loan,
    IssueDate,
    DueDate,
}

impl CriteriaField for BillField {
    fn column(&self) -> &'static str {
        match self {
            BillField::Id => "id",
            BillField::Value => "value",
            BillField::User => "user_id",
            BillField::Bearer => "bearer_id",
            BillField::PaymentAccount => "payment_account_id",
            BillField::Status => "status_id",
            BillField::Penalty => "penalty_id",
            BillField::Loan => "loan_id",
            BillField::IssueDate => "issue_date",
            BillField::DueDate => "due_date",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenaltyField {
    Id,
    Value,
    User,
    PaymentAccount,
    Type,
    Status,
}

impl CriteriaField for PenaltyField {
    fn column(&self) -> &'static str {
        match self {
            PenaltyField::Id => "id",
            PenaltyField::Value => "value",
            PenaltyField::User => "user_id",
            PenaltyField::PaymentAccount => "payment_account_id",
            PenaltyField::Type => "type_id",
            PenaltyField::Status => "status_id",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationField {
    Id,
    Type,
    Value,
    Account,
    TargetAccount,
    Card,
    TargetCard,
    Bill,
    Penalty,
    OperationDate,
}

impl CriteriaField for OperationField {
    fn column(&self) -> &'static str {
        match self {
            OperationField::Id => "id",
            OperationField::Type => "type_id",
            OperationField::Value => "value",
            OperationField::Account => "account_id",
            OperationField::TargetAccount => "target_account_id",
            OperationField::Card => "card_id",
            OperationField::TargetCard => "target_card_id",
            OperationField::Bill => "bill_id",
            OperationField::Penalty => "penalty_id",
            OperationField::OperationDate => "operation_date",
        }
    }
}

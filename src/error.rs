use crate::domain::payment::{PaymentId, PaymentMethod, PaymentStatus, TransitionError};
use miette::Diagnostic;
use rust_decimal::Decimal;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PaymentError>;

#[derive(Error, Debug, Diagnostic)]
pub enum PaymentError {
    #[error("Invalid payment method: {0}")]
    #[diagnostic(
        code(payflow::invalid_method),
        help("expected one of PIX, BOLETO, DEBITO, CREDITO")
    )]
    InvalidMethod(String),
    #[error("Card number is required for {0} payments")]
    #[diagnostic(code(payflow::missing_card_number))]
    MissingCardNumber(PaymentMethod),
    #[error("Invalid payment status: {0}")]
    #[diagnostic(
        code(payflow::invalid_status),
        help("expected one of PENDING, SUCCEEDED, FAILED, INACTIVE")
    )]
    InvalidStatus(String),
    #[error("Invalid amount {0}: must be at least 0.01")]
    #[diagnostic(code(payflow::invalid_amount))]
    InvalidAmount(Decimal),
    #[error("Invalid debit code: {0}")]
    #[diagnostic(code(payflow::invalid_debit_code))]
    InvalidDebitCode(String),
    #[error("Invalid sort: {0}")]
    #[diagnostic(
        code(payflow::invalid_sort),
        help("use <field>[,asc|desc] with field one of id, amount, debit_code")
    )]
    InvalidSort(String),
    #[error("Payment {0} not found")]
    #[diagnostic(code(payflow::not_found))]
    NotFound(PaymentId),
    #[error(transparent)]
    #[diagnostic(code(payflow::invalid_transition))]
    InvalidTransition(#[from] TransitionError),
    #[error("Only PENDING payments may be deactivated (payment {id} is {status})")]
    #[diagnostic(code(payflow::invalid_state))]
    InvalidState { id: PaymentId, status: PaymentStatus },
    #[error("New payments must be PENDING, got {0}")]
    #[diagnostic(code(payflow::not_pending))]
    NotPending(PaymentStatus),
    #[error("Command error: {0}")]
    CommandError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Storage error: {0}")]
    StorageError(Box<dyn std::error::Error + Send + Sync>),
}

impl PaymentError {
    /// Business rejections, as opposed to I/O or storage failures.
    pub fn is_domain(&self) -> bool {
        !matches!(
            self,
            Self::CsvError(_) | Self::IoError(_) | Self::StorageError(_)
        )
    }
}

impl From<serde_json::Error> for PaymentError {
    fn from(e: serde_json::Error) -> Self {
        Self::StorageError(Box::new(e))
    }
}

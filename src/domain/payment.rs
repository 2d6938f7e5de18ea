use crate::error::PaymentError;
use num_bigint::BigUint;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Storage-assigned identifier of a payment.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PaymentId(pub u64);

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for PaymentId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Identifies the debt being paid.
///
/// Debit codes are unbounded non-negative integers, so they are carried as a
/// `BigUint` and always serialized in their decimal string form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DebitCode(BigUint);

impl DebitCode {
    pub fn value(&self) -> &BigUint {
        &self.0
    }
}

impl From<u64> for DebitCode {
    fn from(code: u64) -> Self {
        Self(BigUint::from(code))
    }
}

impl FromStr for DebitCode {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<BigUint>()
            .map(Self)
            .map_err(|_| PaymentError::InvalidDebitCode(s.to_string()))
    }
}

impl fmt::Display for DebitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for DebitCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DebitCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A payment amount. Always at least one cent.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn minimum() -> Decimal {
        Decimal::new(1, 2)
    }

    pub fn new(value: Decimal) -> Result<Self, PaymentError> {
        if value >= Self::minimum() {
            Ok(Self(value))
        } else {
            Err(PaymentError::InvalidAmount(value))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = PaymentError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Pix,
    Boleto,
    Debito,
    Credito,
}

impl PaymentMethod {
    pub const ALL: [Self; 4] = [Self::Pix, Self::Boleto, Self::Debito, Self::Credito];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pix => "PIX",
            Self::Boleto => "BOLETO",
            Self::Debito => "DEBITO",
            Self::Credito => "CREDITO",
        }
    }

    /// Card-based methods must carry a card number.
    pub fn requires_card(&self) -> bool {
        matches!(self, Self::Debito | Self::Credito)
    }
}

impl FromStr for PaymentMethod {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == wanted)
            .ok_or_else(|| PaymentError::InvalidMethod(s.to_string()))
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Failed,
    Inactive,
}

/// Why a requested status change was refused, keyed on the current status.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid transition from PENDING to {requested}")]
    FromPending { requested: PaymentStatus },
    #[error("Payment already SUCCEEDED; its status is immutable")]
    AlreadySucceeded,
    #[error("A FAILED payment may only return to PENDING (requested {requested})")]
    FailedOnlyToPending { requested: PaymentStatus },
    #[error("Payment is INACTIVE; no operation permitted")]
    Inactive,
}

impl PaymentStatus {
    pub const ALL: [Self; 4] = [Self::Pending, Self::Succeeded, Self::Failed, Self::Inactive];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Inactive => "INACTIVE",
        }
    }

    /// Applies the status transition table.
    ///
    /// | current   | allowed next       |
    /// |-----------|--------------------|
    /// | PENDING   | SUCCEEDED, FAILED  |
    /// | SUCCEEDED | none               |
    /// | FAILED    | PENDING            |
    /// | INACTIVE  | none               |
    ///
    /// `PENDING -> INACTIVE` is not reachable here; it belongs to
    /// [`Payment::deactivate`].
    pub fn transition(self, requested: Self) -> Result<Self, TransitionError> {
        use PaymentStatus::*;

        match (self, requested) {
            (Pending, Succeeded | Failed) => Ok(requested),
            (Pending, _) => Err(TransitionError::FromPending { requested }),
            (Succeeded, _) => Err(TransitionError::AlreadySucceeded),
            (Failed, Pending) => Ok(Pending),
            (Failed, _) => Err(TransitionError::FailedOnlyToPending { requested }),
            (Inactive, _) => Err(TransitionError::Inactive),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| PaymentError::InvalidStatus(s.to_string()))
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payment attempt and its lifecycle status.
///
/// Everything except `status` is fixed at creation. `status` only moves
/// through [`Payment::update_status`] and [`Payment::deactivate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PaymentRecord")]
pub struct Payment {
    id: Option<PaymentId>,
    debit_code: DebitCode,
    tax_id: String,
    method: PaymentMethod,
    card_number: Option<String>,
    amount: Amount,
    status: PaymentStatus,
}

/// Stored form of a payment, checked before it becomes a [`Payment`].
#[derive(Deserialize)]
struct PaymentRecord {
    id: Option<PaymentId>,
    debit_code: DebitCode,
    tax_id: String,
    method: PaymentMethod,
    card_number: Option<String>,
    amount: Amount,
    status: PaymentStatus,
}

impl TryFrom<PaymentRecord> for Payment {
    type Error = PaymentError;

    fn try_from(record: PaymentRecord) -> Result<Self, Self::Error> {
        check_card(record.method, record.card_number.as_deref())?;
        Ok(Self {
            id: record.id,
            debit_code: record.debit_code,
            tax_id: record.tax_id,
            method: record.method,
            card_number: record.card_number,
            amount: record.amount,
            status: record.status,
        })
    }
}

fn check_card(method: PaymentMethod, card_number: Option<&str>) -> Result<(), PaymentError> {
    let has_card = card_number.is_some_and(|n| !n.trim().is_empty());
    if method.requires_card() && !has_card {
        return Err(PaymentError::MissingCardNumber(method));
    }
    Ok(())
}

impl Payment {
    /// Builds a new, unsaved `PENDING` payment.
    ///
    /// Fails with `MissingCardNumber` when a card-based method comes without
    /// a non-blank card number.
    pub fn new(
        debit_code: DebitCode,
        tax_id: String,
        method: PaymentMethod,
        card_number: Option<String>,
        amount: Amount,
    ) -> Result<Self, PaymentError> {
        check_card(method, card_number.as_deref())?;

        Ok(Self {
            id: None,
            debit_code,
            tax_id,
            method,
            card_number,
            amount,
            status: PaymentStatus::Pending,
        })
    }

    /// Stamps the storage-assigned id. Repository adapters call this on insert.
    pub fn with_id(mut self, id: PaymentId) -> Self {
        self.id = Some(id);
        self
    }

    /// An unsaved payment may only be inserted while still `PENDING`.
    pub fn check_insertable(&self) -> Result<(), PaymentError> {
        match (self.id, self.status) {
            (None, status) if status != PaymentStatus::Pending => {
                Err(PaymentError::NotPending(status))
            }
            _ => Ok(()),
        }
    }

    pub fn id(&self) -> Option<PaymentId> {
        self.id
    }

    pub fn debit_code(&self) -> &DebitCode {
        &self.debit_code
    }

    pub fn tax_id(&self) -> &str {
        &self.tax_id
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn card_number(&self) -> Option<&str> {
        self.card_number.as_deref()
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    /// Moves to `requested` if the transition table allows it.
    pub fn update_status(&mut self, requested: PaymentStatus) -> Result<(), TransitionError> {
        self.status = self.status.transition(requested)?;
        Ok(())
    }

    /// Soft-deletes the payment. Only `PENDING` payments qualify.
    ///
    /// Unsaved payments report id 0 in the error.
    pub fn deactivate(&mut self) -> Result<(), PaymentError> {
        if self.status != PaymentStatus::Pending {
            return Err(PaymentError::InvalidState {
                id: self.id.unwrap_or_default(),
                status: self.status,
            });
        }
        self.status = PaymentStatus::Inactive;
        Ok(())
    }
}

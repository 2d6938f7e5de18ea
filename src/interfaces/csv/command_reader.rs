use crate::application::lifecycle::CreatePaymentRequest;
use crate::domain::payment::{DebitCode, PaymentId};
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Create,
    UpdateStatus,
    Deactivate,
}

/// One CSV row. Which columns are required depends on `command`.
#[derive(Debug, Deserialize)]
struct CommandRecord {
    command: CommandKind,
    id: Option<u64>,
    debit_code: Option<DebitCode>,
    tax_id: Option<String>,
    method: Option<String>,
    card_number: Option<String>,
    amount: Option<String>,
    status: Option<String>,
}

/// A lifecycle operation requested by a batch file.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Create(CreatePaymentRequest),
    UpdateStatus { id: PaymentId, status: String },
    Deactivate { id: PaymentId },
}

fn required<T>(value: Option<T>, column: &str, kind: CommandKind) -> Result<T> {
    value.ok_or_else(|| PaymentError::CommandError(format!("{kind:?} requires `{column}`")))
}

impl TryFrom<CommandRecord> for Command {
    type Error = PaymentError;

    fn try_from(record: CommandRecord) -> Result<Self> {
        let kind = record.command;
        match kind {
            CommandKind::Create => {
                let raw_amount = required(record.amount, "amount", kind)?;
                let amount: Decimal = raw_amount.parse().map_err(|_| {
                    PaymentError::CommandError(format!("`{raw_amount}` is not a decimal amount"))
                })?;

                Ok(Command::Create(CreatePaymentRequest {
                    debit_code: required(record.debit_code, "debit_code", kind)?,
                    tax_id: required(record.tax_id, "tax_id", kind)?,
                    method: required(record.method, "method", kind)?,
                    card_number: record.card_number,
                    amount,
                    status: record.status,
                }))
            }
            CommandKind::UpdateStatus => Ok(Command::UpdateStatus {
                id: PaymentId(required(record.id, "id", kind)?),
                status: required(record.status, "status", kind)?,
            }),
            CommandKind::Deactivate => Ok(Command::Deactivate {
                id: PaymentId(required(record.id, "id", kind)?),
            }),
        }
    }
}

/// Reads lifecycle commands from a CSV source.
///
/// Expected header: `command,id,debit_code,tax_id,method,card_number,amount,status`.
/// Whitespace is trimmed and short rows are accepted; columns a command does
/// not use may be left empty.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily yields one result per row, so a bad row does not stop the rest.
    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader
            .into_deserialize::<CommandRecord>()
            .map(|record| Command::try_from(record?))
    }
}

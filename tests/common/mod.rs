#![allow(dead_code)]

use payflow::application::lifecycle::{CreatePaymentRequest, PaymentLifecycle};
use payflow::domain::payment::DebitCode;
use payflow::infrastructure::in_memory::InMemoryPaymentRepository;
use rust_decimal::Decimal;
use std::io::Write;
use tempfile::NamedTempFile;

pub const COMMANDS_HEADER: &str = "command,id,debit_code,tax_id,method,card_number,amount,status";

/// Writes a commands CSV (header included) to a temporary file.
pub fn commands_file(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{COMMANDS_HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

pub fn in_memory_lifecycle() -> PaymentLifecycle {
    PaymentLifecycle::new(Box::new(InMemoryPaymentRepository::new()))
}

pub fn create_request(
    debit_code: u64,
    tax_id: &str,
    method: &str,
    card_number: Option<&str>,
    amount: Decimal,
) -> CreatePaymentRequest {
    CreatePaymentRequest {
        debit_code: DebitCode::from(debit_code),
        tax_id: tax_id.to_string(),
        method: method.to_string(),
        card_number: card_number.map(str::to_string),
        amount,
        status: None,
    }
}

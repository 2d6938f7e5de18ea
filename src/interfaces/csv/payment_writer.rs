use crate::domain::payment::Payment;
use crate::error::Result;
use std::io::Write;

pub const HEADER: [&str; 7] = [
    "id",
    "debit_code",
    "tax_id",
    "method",
    "card_number",
    "amount",
    "status",
];

/// Writes payments as CSV rows, one per payment, after a fixed header.
pub struct PaymentWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> PaymentWriter<W> {
    pub fn new(sink: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(sink);
        Self { writer }
    }

    /// Writes the header even when `payments` is empty.
    pub fn write_payments<'a, I>(&mut self, payments: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Payment>,
    {
        self.writer.write_record(HEADER)?;
        for payment in payments {
            self.writer.serialize(payment)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

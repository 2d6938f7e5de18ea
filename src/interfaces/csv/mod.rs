pub mod command_reader;
pub mod payment_writer;

pub use command_reader::{Command, CommandReader};
pub use payment_writer::PaymentWriter;

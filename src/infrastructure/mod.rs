//! Repository adapters for the `PaymentRepository` port.

pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;

use crate::domain::ports::PaymentRepositoryBox;
use crate::error::Result;
use in_memory::InMemoryPaymentRepository;
use std::path::PathBuf;
use tracing::info;

/// Picks the repository for a run: RocksDB when a path is given and the
/// `storage-rocksdb` feature is compiled in, in-memory otherwise.
pub fn open_repository(db_path: Option<PathBuf>) -> Result<PaymentRepositoryBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => Ok(Box::new(self::rocksdb::RocksDBPaymentRepository::open(path)?)),
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(path) => {
            tracing::warn!(
                db_path = %path.display(),
                "Persistent storage requested via --db-path, but the 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage."
            );
            Ok(Box::new(InMemoryPaymentRepository::new()))
        }
        None => {
            info!("using in-memory payment storage");
            Ok(Box::new(InMemoryPaymentRepository::new()))
        }
    }
}

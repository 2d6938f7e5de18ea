use crate::domain::filter::PaymentFilter;
use crate::domain::page::{Page, PageRequest};
use crate::domain::payment::{Payment, PaymentId};
use crate::domain::ports::PaymentRepository;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

/// Column Family holding payments, keyed by big-endian id.
pub const CF_PAYMENTS: &str = "payments";

impl From<rocksdb::Error> for PaymentError {
    fn from(e: rocksdb::Error) -> Self {
        PaymentError::StorageError(Box::new(e))
    }
}

/// A persistent payment repository backed by RocksDB.
///
/// Values are JSON documents. Big-endian keys make RocksDB's key order the
/// same as id order, which is the storage-default order for listings.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>` and
/// id sequence).
#[derive(Clone)]
pub struct RocksDBPaymentRepository {
    db: Arc<DB>,
    last_id: Arc<AtomicU64>,
}

impl RocksDBPaymentRepository {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// The id sequence resumes after the highest id already stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_payments = ColumnFamilyDescriptor::new(CF_PAYMENTS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path.as_ref(), vec![cf_payments])?;

        let last_id = {
            let cf = db.cf_handle(CF_PAYMENTS).ok_or_else(missing_cf)?;
            match db.iterator_cf(cf, IteratorMode::End).next() {
                Some(item) => decode_key(&item?.0)?,
                None => 0,
            }
        };
        info!(path = %path.as_ref().display(), last_id, "opened payment store");

        Ok(Self {
            db: Arc::new(db),
            last_id: Arc::new(AtomicU64::new(last_id)),
        })
    }

    fn payments(&self) -> Result<&ColumnFamily> {
        self.db.cf_handle(CF_PAYMENTS).ok_or_else(missing_cf)
    }

    /// Every stored payment, in id order, that `keep` accepts.
    fn scan(&self, keep: impl Fn(&Payment) -> bool) -> Result<Vec<Payment>> {
        let cf = self.payments()?;
        let mut payments = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            let payment: Payment = serde_json::from_slice(&value)?;
            if keep(&payment) {
                payments.push(payment);
            }
        }
        Ok(payments)
    }
}

fn missing_cf() -> PaymentError {
    PaymentError::StorageError(Box::new(std::io::Error::other(
        "Payments column family not found",
    )))
}

fn decode_key(key: &[u8]) -> Result<u64> {
    let bytes: [u8; 8] = key.try_into().map_err(|_| {
        PaymentError::StorageError(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Malformed payment key of {} bytes", key.len()),
        )))
    })?;
    Ok(u64::from_be_bytes(bytes))
}

#[async_trait]
impl PaymentRepository for RocksDBPaymentRepository {
    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>> {
        let cf = self.payments()?;
        match self.db.get_cf(cf, id.0.to_be_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, payment: Payment) -> Result<Payment> {
        let cf = self.payments()?;
        let (id, payment) = match payment.id() {
            Some(id) => {
                if self.db.get_pinned_cf(cf, id.0.to_be_bytes())?.is_none() {
                    return Err(PaymentError::NotFound(id));
                }
                (id, payment)
            }
            None => {
                payment.check_insertable()?;
                let id = PaymentId(self.last_id.fetch_add(1, Ordering::SeqCst) + 1);
                (id, payment.with_id(id))
            }
        };

        let value = serde_json::to_vec(&payment)?;
        self.db.put_cf(cf, id.0.to_be_bytes(), value)?;
        debug!(payment_id = %id, status = %payment.status(), "stored payment");

        Ok(payment)
    }

    async fn find_all(&self, page: &PageRequest) -> Result<Page<Payment>> {
        Ok(page.paginate(self.scan(|_| true)?))
    }

    async fn find_by_filters(
        &self,
        filter: &PaymentFilter,
        page: &PageRequest,
    ) -> Result<Page<Payment>> {
        Ok(page.paginate(self.scan(|payment| filter.matches(payment))?))
    }
}

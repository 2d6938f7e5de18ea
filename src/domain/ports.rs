use super::filter::PaymentFilter;
use super::page::{Page, PageRequest};
use super::payment::{Payment, PaymentId};
use crate::error::Result;
use async_trait::async_trait;

/// Persistence port for payments.
///
/// Implementations own id assignment and make each single call atomic. A
/// `find_by_id` followed by `save` is not isolated: callers that update the
/// same payment concurrently must serialize those calls themselves, for
/// example inside a transaction or a per-payment lock.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>>;

    /// Inserts a payment without an id (assigning one) or replaces the stored
    /// payment with the same id.
    async fn save(&self, payment: Payment) -> Result<Payment>;

    async fn find_all(&self, page: &PageRequest) -> Result<Page<Payment>>;

    async fn find_by_filters(
        &self,
        filter: &PaymentFilter,
        page: &PageRequest,
    ) -> Result<Page<Payment>>;
}

pub type PaymentRepositoryBox = Box<dyn PaymentRepository>;

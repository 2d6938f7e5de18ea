use crate::domain::filter::PaymentFilter;
use crate::domain::page::{Page, PageRequest};
use crate::domain::payment::{Payment, PaymentId};
use crate::domain::ports::PaymentRepository;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct State {
    last_id: u64,
    payments: BTreeMap<PaymentId, Payment>,
}

/// A thread-safe in-memory payment repository.
///
/// Payments live in a `BTreeMap` keyed by id, so the storage-default order is
/// ascending id. Clones share the same state.
#[derive(Default, Clone)]
pub struct InMemoryPaymentRepository {
    state: Arc<RwLock<State>>,
}

impl InMemoryPaymentRepository {
    /// Creates a new, empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>> {
        let state = self.state.read().await;
        Ok(state.payments.get(&id).cloned())
    }

    async fn save(&self, payment: Payment) -> Result<Payment> {
        let mut state = self.state.write().await;
        let (id, payment) = match payment.id() {
            Some(id) if state.payments.contains_key(&id) => (id, payment),
            Some(id) => return Err(PaymentError::NotFound(id)),
            None => {
                payment.check_insertable()?;
                state.last_id += 1;
                let id = PaymentId(state.last_id);
                (id, payment.with_id(id))
            }
        };

        debug!(payment_id = %id, status = %payment.status(), "storing payment");
        state.payments.insert(id, payment.clone());
        Ok(payment)
    }

    async fn find_all(&self, page: &PageRequest) -> Result<Page<Payment>> {
        let state = self.state.read().await;
        Ok(page.paginate(state.payments.values().cloned().collect()))
    }

    async fn find_by_filters(
        &self,
        filter: &PaymentFilter,
        page: &PageRequest,
    ) -> Result<Page<Payment>> {
        let state = self.state.read().await;
        let matching = state
            .payments
            .values()
            .filter(|payment| filter.matches(payment))
            .cloned()
            .collect();
        Ok(page.paginate(matching))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::{Amount, DebitCode, PaymentMethod, PaymentStatus};
    use rust_decimal_macros::dec;

    async fn stored(repository: &InMemoryPaymentRepository) -> usize {
        let page = repository.find_all(&PageRequest::default()).await.unwrap();
        page.total_elements
    }

    fn pix(debit_code: u64) -> Payment {
        Payment::new(
            DebitCode::from(debit_code),
            "12345678900".to_string(),
            PaymentMethod::Pix,
            None,
            Amount::new(dec!(100.00)).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_save_assigns_sequential_ids() {
        let repository = InMemoryPaymentRepository::new();

        let first = repository.save(pix(1)).await.unwrap();
        let second = repository.save(pix(2)).await.unwrap();

        assert_eq!(first.id(), Some(PaymentId(1)));
        assert_eq!(second.id(), Some(PaymentId(2)));
        assert_eq!(stored(&repository).await, 2);
    }

    #[tokio::test]
    async fn test_save_updates_existing() {
        let repository = InMemoryPaymentRepository::new();
        let mut payment = repository.save(pix(1)).await.unwrap();

        payment.update_status(PaymentStatus::Failed).unwrap();
        repository.save(payment.clone()).await.unwrap();

        let found = repository.find_by_id(PaymentId(1)).await.unwrap().unwrap();
        assert_eq!(found, payment);
        assert_eq!(stored(&repository).await, 1);
    }

    #[tokio::test]
    async fn test_save_with_unknown_id_fails() {
        let repository = InMemoryPaymentRepository::new();
        let orphan = pix(1).with_id(PaymentId(42));

        assert!(matches!(
            repository.save(orphan).await,
            Err(PaymentError::NotFound(PaymentId(42)))
        ));
        assert_eq!(stored(&repository).await, 0);
    }

    #[tokio::test]
    async fn test_insert_requires_pending() {
        let repository = InMemoryPaymentRepository::new();

        for status in [PaymentStatus::Succeeded, PaymentStatus::Failed] {
            let mut payment = pix(1);
            payment.update_status(status).unwrap();
            assert!(matches!(
                repository.save(payment).await,
                Err(PaymentError::NotPending(s)) if s == status
            ));
        }

        let mut inactive = pix(1);
        inactive.deactivate().unwrap();
        assert!(repository.save(inactive).await.is_err());

        assert_eq!(stored(&repository).await, 0);
        let first = repository.save(pix(1)).await.unwrap();
        assert_eq!(first.id(), Some(PaymentId(1)));
    }

    #[tokio::test]
    async fn test_find_by_id_missing() {
        let repository = InMemoryPaymentRepository::new();
        assert!(repository.find_by_id(PaymentId(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_filters() {
        let repository = InMemoryPaymentRepository::new();
        repository.save(pix(123)).await.unwrap();
        repository.save(pix(456)).await.unwrap();
        repository.save(pix(123)).await.unwrap();

        let filter = PaymentFilter {
            debit_code: Some(DebitCode::from(123)),
            ..Default::default()
        };
        let page = repository
            .find_by_filters(&filter, &PageRequest::default())
            .await
            .unwrap();

        assert_eq!(page.total_elements, 2);
        let ids: Vec<_> = page.content.iter().filter_map(Payment::id).collect();
        assert_eq!(ids, vec![PaymentId(1), PaymentId(3)]);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let repository = InMemoryPaymentRepository::new();
        let clone = repository.clone();

        repository.save(pix(1)).await.unwrap();
        let page = clone.find_all(&PageRequest::default()).await.unwrap();
        assert_eq!(page.content.len(), 1);
    }
}

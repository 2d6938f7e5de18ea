use crate::domain::filter::PaymentFilter;
use crate::domain::page::{Page, PageRequest};
use crate::domain::payment::{Amount, DebitCode, Payment, PaymentId, PaymentMethod, PaymentStatus};
use crate::domain::ports::PaymentRepositoryBox;
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use tracing::{debug, info};

/// Input for [`PaymentLifecycle::create`].
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePaymentRequest {
    pub debit_code: DebitCode,
    pub tax_id: String,
    pub method: String,
    pub card_number: Option<String>,
    pub amount: Decimal,
    /// Accepted for compatibility with callers that send one; new payments
    /// always start as `PENDING`.
    pub status: Option<String>,
}

/// Input for [`PaymentLifecycle::filter`]. `None` means "any".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterRequest {
    pub debit_code: Option<DebitCode>,
    pub tax_id: Option<String>,
    pub status: Option<String>,
}

impl FilterRequest {
    /// Resolves the textual status. Blank counts as absent.
    pub fn into_filter(self) -> Result<PaymentFilter> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<PaymentStatus>()?),
        };

        Ok(PaymentFilter {
            debit_code: self.debit_code,
            tax_id: self.tax_id,
            status,
        })
    }
}

/// Manages the lifecycle of payment records.
///
/// `PaymentLifecycle` validates new payments, enforces the status state
/// machine and the deactivation rule, and delegates storage to the
/// repository. Each update is a read followed by a `save` on one payment and
/// is not isolated from concurrent updates to the same payment; run the
/// lifecycle behind a single writer or a transactional boundary when that
/// matters.
pub struct PaymentLifecycle {
    repository: PaymentRepositoryBox,
}

impl PaymentLifecycle {
    pub fn new(repository: PaymentRepositoryBox) -> Self {
        Self { repository }
    }

    /// Validates and stores a new `PENDING` payment.
    pub async fn create(&self, request: CreatePaymentRequest) -> Result<Payment> {
        let method: PaymentMethod = request.method.parse()?;
        let amount = Amount::new(request.amount)?;
        if let Some(status) = request.status.as_deref() {
            debug!(status, "ignoring caller-supplied status on create");
        }

        let payment = Payment::new(
            request.debit_code,
            request.tax_id,
            method,
            request.card_number,
            amount,
        )?;
        let saved = self.repository.save(payment).await?;

        info!(
            payment_id = ?saved.id(),
            method = %saved.method(),
            amount = %saved.amount().value(),
            "payment created"
        );
        Ok(saved)
    }

    pub async fn list(&self, page: &PageRequest) -> Result<Page<Payment>> {
        self.repository.find_all(page).await
    }

    pub async fn filter(&self, request: FilterRequest, page: &PageRequest) -> Result<Page<Payment>> {
        let filter = request.into_filter()?;
        if filter.is_empty() {
            return self.repository.find_all(page).await;
        }
        self.repository.find_by_filters(&filter, page).await
    }

    /// Moves a payment to `requested` along the transition table.
    pub async fn update_status(&self, id: PaymentId, requested: PaymentStatus) -> Result<Payment> {
        let mut payment = self.get(id).await?;
        let current = payment.status();

        payment.update_status(requested)?;
        let saved = self.repository.save(payment).await?;

        info!(payment_id = %id, from = %current, to = %requested, "payment status updated");
        Ok(saved)
    }

    /// Soft-deletes a `PENDING` payment by moving it to `INACTIVE`.
    pub async fn deactivate(&self, id: PaymentId) -> Result<()> {
        let mut payment = self.get(id).await?;

        payment.deactivate()?;
        self.repository.save(payment).await?;

        info!(payment_id = %id, "payment deactivated");
        Ok(())
    }

    pub async fn get(&self, id: PaymentId) -> Result<Payment> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(PaymentError::NotFound(id))
    }
}

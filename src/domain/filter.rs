use super::payment::{DebitCode, Payment, PaymentStatus};

/// Optional, ANDed criteria for payment lookups. An absent criterion matches
/// every payment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentFilter {
    pub debit_code: Option<DebitCode>,
    pub tax_id: Option<String>,
    pub status: Option<PaymentStatus>,
}

impl PaymentFilter {
    pub fn is_empty(&self) -> bool {
        self.debit_code.is_none() && self.tax_id.is_none() && self.status.is_none()
    }

    pub fn matches(&self, payment: &Payment) -> bool {
        self.debit_code
            .as_ref()
            .is_none_or(|code| code == payment.debit_code())
            && self
                .tax_id
                .as_deref()
                .is_none_or(|tax_id| tax_id == payment.tax_id())
            && self.status.is_none_or(|status| status == payment.status())
    }
}

//! Application layer containing the payment lifecycle rules.
//!
//! This module defines `PaymentLifecycle`, the entry point for creating,
//! listing, filtering, transitioning and deactivating payments. It owns no
//! storage itself and talks to persistence only through the
//! `PaymentRepository` port.

pub mod lifecycle;

//! Domain layer: the payment entity, its status state machine, lookup
//! criteria and the persistence port.

pub mod filter;
pub mod page;
pub mod payment;
pub mod ports;

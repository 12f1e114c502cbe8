//! Outbound adapters implementing the domain ports.

pub mod mileage;
pub mod persistence;

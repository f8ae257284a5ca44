//! Business logic services.

pub mod profit;
pub mod stock;
pub mod uploads;

//! Core types for Stockroom.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod stock;

pub use id::*;
pub use stock::{AdjustmentKind, StockError, StockLevel};

//! Stock counters and the adjustment arithmetic applied to them.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when applying an adjustment to a [`StockLevel`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockError {
    /// The adjustment amount is zero or negative.
    #[error("adjustment amount must be a positive integer, got {amount}")]
    NonPositiveAmount {
        /// The rejected amount.
        amount: i32,
    },
    /// The requested deduction exceeds the available stock.
    #[error("insufficient stock: available {available}, requested {requested}")]
    Insufficient {
        /// Units currently available.
        available: i32,
        /// Units requested for deduction.
        requested: i32,
    },
    /// A counter would leave the i32 range.
    #[error("stock counter overflow")]
    Overflow,
}

/// The kind of counter delta a stock adjustment applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    /// Units sold; increments the `sales` counter.
    Sales,
    /// Units discarded; increments the `waste` counter.
    Waste,
    /// Newly received inventory; increments the `quantity` counter.
    Restock,
}

impl AdjustmentKind {
    /// Returns the kind as a lowercase string, for logging.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sales => "sales",
            Self::Waste => "waste",
            Self::Restock => "restock",
        }
    }
}

impl fmt::Display for AdjustmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A product's stock counters.
///
/// `quantity` is the total ever stocked, `sales` the cumulative units sold,
/// `waste` the cumulative units discarded. Availability is derived, never
/// stored.
///
/// ## Invariant
///
/// `available() >= 0` after every accepted adjustment: sales and waste are
/// rejected when they would exceed availability, restocks only grow it. The
/// value is pure data; sequencing and persistence belong to the caller.
///
/// ## Examples
///
/// ```
/// use stockroom_core::{AdjustmentKind, StockLevel};
///
/// let level = StockLevel::new(50, 10, 5);
/// assert_eq!(level.available(), 35);
///
/// // Selling exactly what is available succeeds...
/// assert!(level.apply(AdjustmentKind::Sales, 35).is_ok());
///
/// // ...one more unit does not.
/// assert!(level.apply(AdjustmentKind::Sales, 36).is_err());
///
/// // Restocks are not capped.
/// assert!(level.apply(AdjustmentKind::Restock, 1_000).is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    /// Total units ever stocked.
    pub quantity: i32,
    /// Cumulative units sold.
    pub sales: i32,
    /// Cumulative units discarded.
    pub waste: i32,
}

impl StockLevel {
    /// Create a stock level from its three counters.
    #[must_use]
    pub const fn new(quantity: i32, sales: i32, waste: i32) -> Self {
        Self {
            quantity,
            sales,
            waste,
        }
    }

    /// Derived availability: `quantity - (sales + waste)`.
    #[must_use]
    pub const fn available(&self) -> i32 {
        self.quantity - (self.sales + self.waste)
    }

    /// Apply a single adjustment, returning the updated counters.
    ///
    /// Sales and waste are checked against [`available`](Self::available)
    /// before the delta lands, so repeated applications within one batch see
    /// the running total. Restocks carry no check.
    ///
    /// # Errors
    ///
    /// Returns `StockError::NonPositiveAmount` if `amount <= 0`,
    /// `StockError::Insufficient` if a sales/waste deduction exceeds the
    /// available stock, and `StockError::Overflow` if a counter would leave
    /// the i32 range.
    pub fn apply(self, kind: AdjustmentKind, amount: i32) -> Result<Self, StockError> {
        if amount <= 0 {
            return Err(StockError::NonPositiveAmount { amount });
        }

        if matches!(kind, AdjustmentKind::Sales | AdjustmentKind::Waste) {
            let available = self.available();
            if amount > available {
                return Err(StockError::Insufficient {
                    available,
                    requested: amount,
                });
            }
        }

        let bump = |counter: i32| counter.checked_add(amount).ok_or(StockError::Overflow);

        Ok(match kind {
            AdjustmentKind::Sales => Self {
                sales: bump(self.sales)?,
                ..self
            },
            AdjustmentKind::Waste => Self {
                waste: bump(self.waste)?,
                ..self
            },
            AdjustmentKind::Restock => Self {
                quantity: bump(self.quantity)?,
                ..self
            },
        })
    }
}

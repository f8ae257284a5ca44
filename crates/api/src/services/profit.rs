//! Profit calculation.
//!
//! Pure arithmetic over [`Decimal`], no store interaction. The result is
//! the distributable profit left after paying every salary, and it is
//! allowed to go negative when salaries exceed the profit.

use rust_decimal::Decimal;

/// Errors produced by profit calculation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProfitError {
    /// The salary list was empty.
    #[error("Invalid input. Provide an array of salaries and a profit value.")]
    EmptySalaries,

    /// A salary was negative.
    #[error("salary must not be negative, got {0}")]
    NegativeSalary(Decimal),

    /// The profit value was negative.
    #[error("profit must not be negative, got {0}")]
    NegativeProfit(Decimal),
}

/// Compute the profit remaining after paying the given salaries.
///
/// # Errors
///
/// Returns `ProfitError` if the salary list is empty or any input is
/// negative.
pub fn remaining_profit(salaries: &[Decimal], profit: Decimal) -> Result<Decimal, ProfitError> {
    if salaries.is_empty() {
        return Err(ProfitError::EmptySalaries);
    }
    if let Some(salary) = salaries.iter().find(|salary| **salary < Decimal::ZERO) {
        return Err(ProfitError::NegativeSalary(*salary));
    }
    if profit < Decimal::ZERO {
        return Err(ProfitError::NegativeProfit(profit));
    }

    let total: Decimal = salaries.iter().sum();
    Ok(profit - total)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_profit_subtracts_salaries() {
        let salaries = [
            Decimal::from(3000),
            Decimal::from(2000),
            Decimal::from(1000),
        ];
        let remaining = remaining_profit(&salaries, Decimal::from(10_000)).unwrap();
        assert_eq!(remaining, Decimal::from(4000));
    }

    #[test]
    fn test_remaining_profit_keeps_cents_exact() {
        let salaries = [Decimal::new(1050, 2), Decimal::new(25, 2)];
        let remaining = remaining_profit(&salaries, Decimal::new(2000, 2)).unwrap();
        assert_eq!(remaining, Decimal::new(925, 2));
    }

    #[test]
    fn test_remaining_profit_may_go_negative() {
        let salaries = [Decimal::from(6000)];
        let remaining = remaining_profit(&salaries, Decimal::from(5000)).unwrap();
        assert_eq!(remaining, Decimal::from(-1000));
    }

    #[test]
    fn test_empty_salaries_rejected() {
        let err = remaining_profit(&[], Decimal::from(5000)).unwrap_err();
        assert_eq!(err, ProfitError::EmptySalaries);
    }

    #[test]
    fn test_negative_salary_rejected() {
        let salaries = [Decimal::from(1000), Decimal::from(-50)];
        let err = remaining_profit(&salaries, Decimal::from(5000)).unwrap_err();
        assert_eq!(err, ProfitError::NegativeSalary(Decimal::from(-50)));
    }

    #[test]
    fn test_negative_profit_rejected() {
        let salaries = [Decimal::from(1000)];
        let err = remaining_profit(&salaries, Decimal::from(-1)).unwrap_err();
        assert_eq!(err, ProfitError::NegativeProfit(Decimal::from(-1)));
    }
}

//! Savings goal progress

use crate::display::report::format_bar;
use crate::error::{FinanceError, FinanceResult};
use crate::models::Money;

/// Goals below one currency unit are measured against one unit
const MIN_GOAL: Money = Money::from_cents(100);

/// Progress of current savings toward a goal
#[derive(Debug, Clone, PartialEq)]
pub struct SavingsProgress {
    pub description: String,
    pub goal: Money,
    pub current: Money,
    /// Fraction of the goal reached, clamped to `[0, 1]`
    pub fraction: f64,
    /// Amount still missing, zero once the goal is met
    pub remaining: Money,
}

impl SavingsProgress {
    pub fn new(current: Money, goal: Money, description: impl Into<String>) -> FinanceResult<Self> {
        if goal.is_negative() {
            return Err(FinanceError::Validation("Goal amount cannot be negative".into()));
        }

        let denominator = goal.max(MIN_GOAL);
        let fraction = (current.cents() as f64 / denominator.cents() as f64).clamp(0.0, 1.0);
        let remaining = (goal - current).max(Money::zero());

        Ok(Self {
            description: description.into().trim().to_string(),
            goal,
            current,
            fraction,
            remaining,
        })
    }

    pub fn is_reached(&self) -> bool {
        self.remaining.is_zero()
    }

    /// Format as a progress bar line
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        const BAR_WIDTH: usize = 30;

        let mut output = String::new();
        if !self.description.is_empty() {
            output.push_str(&format!("Goal: {}\n", self.description));
        }
        output.push_str(&format!(
            "[{}] {:.0}%\n",
            format_bar(self.fraction, 1.0, BAR_WIDTH),
            self.fraction * 100.0
        ));
        let saved = format!(
            "Saved {} of {}",
            self.current.format_with_symbol(currency_symbol),
            self.goal.format_with_symbol(currency_symbol)
        );
        if self.is_reached() {
            output.push_str(&format!("{}. Goal reached!\n", saved));
        } else {
            output.push_str(&format!(
                "{}, {} to go\n",
                saved,
                self.remaining.format_with_symbol(currency_symbol)
            ));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_halfway() {
        let progress =
            SavingsProgress::new(Money::from_cents(50_000), Money::from_cents(100_000), "Car").unwrap();
        assert!((progress.fraction - 0.5).abs() < 1e-9);
        assert_eq!(progress.remaining, Money::from_cents(50_000));
        assert!(!progress.is_reached());
    }

    #[test]
    fn test_clamped_above_goal() {
        let progress =
            SavingsProgress::new(Money::from_cents(300_000), Money::from_cents(100_000), "").unwrap();
        assert_eq!(progress.fraction, 1.0);
        assert!(progress.remaining.is_zero());
        assert!(progress.is_reached());
    }

    #[test]
    fn test_zero_goal_uses_minimum() {
        let progress = SavingsProgress::new(Money::from_cents(50), Money::zero(), "").unwrap();
        assert!((progress.fraction - 0.5).abs() < 1e-9);

        let progress = SavingsProgress::new(Money::zero(), Money::zero(), "").unwrap();
        assert_eq!(progress.fraction, 0.0);
    }

    #[test]
    fn test_negative_goal_rejected() {
        assert!(SavingsProgress::new(Money::zero(), Money::from_cents(-1), "")
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_format_terminal() {
        let progress =
            SavingsProgress::new(Money::from_cents(25_000), Money::from_cents(100_000), " Trip ").unwrap();
        let output = progress.format_terminal("$");
        assert!(output.contains("Goal: Trip"));
        assert!(output.contains("25%"));
        assert!(output.contains("$750.00 to go"));

        let done = SavingsProgress::new(Money::from_cents(120_000), Money::from_cents(100_000), "")
            .unwrap()
            .format_terminal("$");
        assert!(done.contains("Saved $1200.00 of $1000.00. Goal reached!"));
        assert!(!done.contains("to go"));
    }
}

//! Ordered threshold tables mapping a ratio to a status and message.

/// One row of a threshold table: applies when `ratio < upper`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier<S: 'static> {
    pub upper: f64,
    pub status: S,
    pub message: &'static str,
}

/// Tiers evaluated top-down; `ceiling` catches everything at or above the last bound.
#[derive(Debug, Clone, Copy)]
pub struct TierTable<S: 'static> {
    tiers: &'static [Tier<S>],
    ceiling: Tier<S>,
}

impl<S: Copy> TierTable<S> {
    pub const fn new(tiers: &'static [Tier<S>], ceiling: Tier<S>) -> Self {
        Self { tiers, ceiling }
    }

    pub fn classify(&self, ratio: f64) -> Tier<S> {
        self.tiers
            .iter()
            .find(|t| ratio < t.upper)
            .copied()
            .unwrap_or(self.ceiling)
    }

    pub fn tiers(&self) -> &'static [Tier<S>] {
        self.tiers
    }

    pub fn ceiling(&self) -> Tier<S> {
        self.ceiling
    }
}

/// Construct a table row.
pub const fn tier<S: 'static>(upper: f64, status: S, message: &'static str) -> Tier<S> {
    Tier {
        upper,
        status,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Level {
        Low,
        Mid,
        High,
    }

    const TABLE: TierTable<Level> = TierTable::new(
        &[tier(0.5, Level::Low, "low"), tier(1.0, Level::Mid, "mid")],
        tier(f64::INFINITY, Level::High, "high"),
    );

    #[test]
    fn test_bounds_are_exclusive() {
        assert_eq!(TABLE.classify(0.0).status, Level::Low);
        assert_eq!(TABLE.classify(0.4999).status, Level::Low);
        assert_eq!(TABLE.classify(0.5).status, Level::Mid);
        assert_eq!(TABLE.classify(1.0).status, Level::High);
        assert_eq!(TABLE.classify(7.0).message, "high");
    }

    #[test]
    fn test_nan_falls_to_ceiling() {
        assert_eq!(TABLE.classify(f64::NAN).status, Level::High);
    }
}

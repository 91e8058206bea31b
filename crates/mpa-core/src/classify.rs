use serde::{Deserialize, Serialize};

/// Staffing health of a market, derived from its active staff count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Healthy,
    Adequate,
    Low,
    Empty,
}

impl Tier {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Tier::Healthy => "healthy",
            Tier::Adequate => "adequate",
            Tier::Low => "low",
            Tier::Empty => "empty",
        }
    }

    /// Map-marker colour name for this tier.
    #[must_use]
    pub fn marker_color(self) -> &'static str {
        match self {
            Tier::Healthy => "green",
            Tier::Adequate => "blue",
            Tier::Low => "lightred",
            Tier::Empty => "red",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

/// Classify an active staff count. Total over all integers; anything at or
/// below zero is [`Tier::Empty`].
#[must_use]
pub fn classify(active_staff_count: i64) -> Tier {
    if active_staff_count > 2 {
        Tier::Healthy
    } else if active_staff_count > 1 {
        Tier::Adequate
    } else if active_staff_count == 1 {
        Tier::Low
    } else {
        Tier::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds() {
        assert_eq!(classify(0), Tier::Empty);
        assert_eq!(classify(1), Tier::Low);
        assert_eq!(classify(2), Tier::Adequate);
        assert_eq!(classify(3), Tier::Healthy);
        assert_eq!(classify(40), Tier::Healthy);
    }

    #[test]
    fn negative_counts_are_empty() {
        assert_eq!(classify(-1), Tier::Empty);
        assert_eq!(classify(i64::MIN), Tier::Empty);
    }

    #[test]
    fn marker_colors() {
        assert_eq!(Tier::Healthy.marker_color(), "green");
        assert_eq!(Tier::Adequate.marker_color(), "blue");
        assert_eq!(Tier::Low.marker_color(), "lightred");
        assert_eq!(Tier::Empty.marker_color(), "red");
    }

    #[test]
    fn tier_display() {
        assert_eq!(Tier::Healthy.to_string(), "healthy");
        assert_eq!(Tier::Empty.to_string(), "empty");
        assert_eq!(format!("{:<8}|", Tier::Low), "low     |");
    }
}

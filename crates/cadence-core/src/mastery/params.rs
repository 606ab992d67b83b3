//! Engine parameters
//!
//! Pacing policy as data: the maximum mastery level, the interval table
//! indexed by mastery, and the secondary sort key used when several cards
//! are equally due. Fixed for the lifetime of a session.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default maximum mastery level
pub const DEFAULT_MAX_MASTERY: u32 = 5;

/// Default interval table (session-index steps), indexed by mastery 0..=5
pub const DEFAULT_INTERVALS: [u64; 6] = [1, 2, 4, 8, 16, 32];

/// Secondary ordering between cards with the same `next_due`.
///
/// Catalog order is always the last resort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum TieBreak {
    /// Weakest card first
    #[default]
    LowestMastery,
    /// Card answered wrongly most often first
    MostWrong,
    /// Least practised card first
    FewestSeen,
}

impl TieBreak {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TieBreak::LowestMastery => "lowestMastery",
            TieBreak::MostWrong => "mostWrong",
            TieBreak::FewestSeen => "fewestSeen",
        }
    }
}

impl std::fmt::Display for TieBreak {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TieBreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "lowestmastery" => Ok(TieBreak::LowestMastery),
            "mostwrong" => Ok(TieBreak::MostWrong),
            "fewestseen" => Ok(TieBreak::FewestSeen),
            _ => Err(format!("Unknown tie-break: {}", s)),
        }
    }
}

/// Tunable engine parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineParams {
    /// Maximum mastery level (M); a card at M is mastered
    pub max_mastery: u32,
    /// Re-presentation delay per mastery level, `max_mastery + 1` entries
    pub intervals: Vec<u64>,
    /// Ordering among equally-due cards
    #[serde(default)]
    pub tie_break: TieBreak,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            max_mastery: DEFAULT_MAX_MASTERY,
            intervals: DEFAULT_INTERVALS.to_vec(),
            tie_break: TieBreak::default(),
        }
    }
}

impl EngineParams {
    /// Parameters with a doubling interval table (1, 2, 4, ...) up to `max_mastery`
    pub fn with_max_mastery(max_mastery: u32) -> Self {
        Self {
            max_mastery,
            intervals: (0..=max_mastery).map(|level| 1u64 << level.min(62)).collect(),
            tie_break: TieBreak::default(),
        }
    }

    /// Replace the interval table
    pub fn with_intervals(mut self, intervals: Vec<u64>) -> Self {
        self.intervals = intervals;
        self
    }

    /// Replace the tie-break key
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Check the parameters describe a usable policy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_mastery == 0 {
            return Err(ConfigError::ZeroMaxMastery);
        }

        let expected = self.max_mastery as usize + 1;
        if self.intervals.len() != expected {
            return Err(ConfigError::IntervalTableLength {
                expected,
                actual: self.intervals.len(),
            });
        }

        if let Some(level) = self
            .intervals
            .windows(2)
            .position(|pair| pair[1] <= pair[0])
        {
            return Err(ConfigError::IntervalTableNotIncreasing { level: level + 1 });
        }

        Ok(())
    }

    /// Interval for a mastery level.
    ///
    /// Levels past the table use the last entry so the lookup stays total.
    #[inline]
    pub fn interval(&self, mastery: u32) -> u64 {
        self.intervals
            .get(mastery as usize)
            .or_else(|| self.intervals.last())
            .copied()
            .unwrap_or(0)
    }

    /// Whether a mastery level counts as mastered
    #[inline]
    pub fn is_mastered(&self, mastery: u32) -> bool {
        mastery >= self.max_mastery
    }
}

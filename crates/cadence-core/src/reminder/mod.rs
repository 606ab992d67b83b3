//! Calendar Reminders
//!
//! A wall-clock reminder policy driven by the learner's own difficulty
//! rating after an answer. Independent of `next_due`: the mastery state
//! machine never reads or writes reminders.
//!
//! | Rating     | Offset  |
//! |------------|---------|
//! | `again`    | 10 min  |
//! | `veryHard` | 1 hour  |
//! | `hard`     | 1 day   |
//! | `normal`   | 3 days  |

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Learner's self-assessed difficulty after answering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReminderRating {
    /// Got it, with a lot of effort
    VeryHard,
    /// Got it, with some effort
    Hard,
    /// Did not know it
    Again,
    /// Knew it
    Normal,
}

impl ReminderRating {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderRating::VeryHard => "veryHard",
            ReminderRating::Hard => "hard",
            ReminderRating::Again => "again",
            ReminderRating::Normal => "normal",
        }
    }
}

impl std::fmt::Display for ReminderRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReminderRating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "veryhard" => Ok(ReminderRating::VeryHard),
            "hard" => Ok(ReminderRating::Hard),
            "again" => Ok(ReminderRating::Again),
            "normal" => Ok(ReminderRating::Normal),
            _ => Err(format!("Unknown rating: {}", s)),
        }
    }
}

/// Reminder status at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    /// Scheduled in the future
    Upcoming,
    /// Scheduled time has passed without completion
    Overdue,
    /// Marked done
    Completed,
}

impl ReminderStatus {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderStatus::Upcoming => "upcoming",
            ReminderStatus::Overdue => "overdue",
            ReminderStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for ReminderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// POLICY
// ============================================================================

fn default_again() -> i64 {
    10
}
fn default_very_hard() -> i64 {
    60
}
fn default_hard() -> i64 {
    24 * 60
}
fn default_normal() -> i64 {
    3 * 24 * 60
}
fn default_duration() -> i64 {
    15
}

/// Offsets (in minutes) from "now" per rating, plus event length
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderPolicy {
    /// Offset after an `again` rating
    #[serde(default = "default_again")]
    pub again_minutes: i64,
    /// Offset after a `veryHard` rating
    #[serde(default = "default_very_hard")]
    pub very_hard_minutes: i64,
    /// Offset after a `hard` rating
    #[serde(default = "default_hard")]
    pub hard_minutes: i64,
    /// Offset after a `normal` rating
    #[serde(default = "default_normal")]
    pub normal_minutes: i64,
    /// Length of the calendar event
    #[serde(default = "default_duration")]
    pub duration_minutes: i64,
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self {
            again_minutes: default_again(),
            very_hard_minutes: default_very_hard(),
            hard_minutes: default_hard(),
            normal_minutes: default_normal(),
            duration_minutes: default_duration(),
        }
    }
}

impl ReminderPolicy {
    /// Delay before the reminder for a rating
    pub fn offset(&self, rating: ReminderRating) -> Duration {
        let minutes = match rating {
            ReminderRating::Again => self.again_minutes,
            ReminderRating::VeryHard => self.very_hard_minutes,
            ReminderRating::Hard => self.hard_minutes,
            ReminderRating::Normal => self.normal_minutes,
        };
        Duration::minutes(minutes)
    }

    /// Place a reminder for `card_id` at `now + offset(rating)`
    pub fn schedule(
        &self,
        card_id: impl Into<String>,
        rating: ReminderRating,
        now: DateTime<Utc>,
    ) -> Reminder {
        Reminder {
            id: Uuid::new_v4().to_string(),
            card_id: card_id.into(),
            rating,
            at: now + self.offset(rating),
            duration_minutes: self.duration_minutes,
            completed_at: None,
        }
    }
}

// ============================================================================
// REMINDER
// ============================================================================

/// A placed calendar reminder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    /// Unique id
    pub id: String,
    /// Card the reminder is about
    pub card_id: String,
    /// Rating that produced it
    pub rating: ReminderRating,
    /// Start of the event
    pub at: DateTime<Utc>,
    /// Length of the event
    pub duration_minutes: i64,
    /// When it was marked done
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Reminder {
    /// End of the event
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.at + Duration::minutes(self.duration_minutes)
    }

    /// Mark as done
    pub fn complete(&mut self, now: DateTime<Utc>) {
        self.completed_at.get_or_insert(now);
    }

    /// Status as seen at `now`
    pub fn status(&self, now: DateTime<Utc>) -> ReminderStatus {
        if self.completed_at.is_some() {
            ReminderStatus::Completed
        } else if now > self.at {
            ReminderStatus::Overdue
        } else {
            ReminderStatus::Upcoming
        }
    }
}

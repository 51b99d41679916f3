use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::streak::{StreakState, StreakUpdate};
use crate::xp::{XpSource, DEFAULT_DAILY_GOAL};

pub type UserId = Uuid;
pub type TransactionId = Uuid;

pub const DEFAULT_MAX_HEARTS: u32 = 5;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    LessonComplete,
    QuizComplete,
}

/// A learning event reported to the ledger.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EarnEvent {
    pub source: EventSource,
    pub quiz_score: Option<u32>,
    pub lesson_id: Option<String>,
}

impl EarnEvent {
    pub fn lesson(lesson_id: impl Into<String>) -> Self {
        Self {
            source: EventSource::LessonComplete,
            quiz_score: None,
            lesson_id: Some(lesson_id.into()),
        }
    }

    pub fn quiz(score: u32, lesson_id: Option<String>) -> Self {
        Self {
            source: EventSource::QuizComplete,
            quiz_score: Some(score),
            lesson_id,
        }
    }
}

/// Durable per-user gamification record; the single source of truth.
///
/// `current_level` is a cached projection of `total_xp` and is recomputed on
/// every write, never asserted independently.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GamificationProfile {
    pub user_id: UserId,
    pub total_xp: u32,
    pub current_level: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_activity_date: Option<NaiveDate>,
    pub streak_freezes: u32,
    pub hearts: u32,
    pub max_hearts: u32,
    pub daily_goal: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GamificationProfile {
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            total_xp: 0,
            current_level: 1,
            current_streak: 0,
            longest_streak: 0,
            last_activity_date: None,
            streak_freezes: 0,
            hearts: DEFAULT_MAX_HEARTS,
            max_hearts: DEFAULT_MAX_HEARTS,
            daily_goal: DEFAULT_DAILY_GOAL,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn streak_state(&self) -> StreakState {
        StreakState {
            current_streak: self.current_streak,
            longest_streak: self.longest_streak,
            last_activity_date: self.last_activity_date,
            streak_freezes: self.streak_freezes,
        }
    }
}

/// Append-only audit row; one per XP component (base and bonus separately).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct XpTransaction {
    pub id: TransactionId,
    pub user_id: UserId,
    pub amount: i64,
    pub source: XpSource,
    pub source_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl XpTransaction {
    pub fn new(user_id: UserId, amount: i64, source: XpSource, source_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            amount,
            source,
            source_id,
            created_at: Utc::now(),
        }
    }
}

/// Rolling per-day XP counter, keyed by (user, date). `goal_met` is sticky:
/// once true for a date it stays true.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyXp {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub xp_earned: u32,
    pub goal_met: bool,
}

/// Result of one reported event, returned to the client for display and
/// reconciliation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EarnOutcome {
    pub xp_gained: u32,
    pub streak_bonus: u32,
    pub total_xp_gained: u32,
    pub new_total_xp: u32,
    pub new_level: u32,
    pub previous_level: u32,
    pub leveled_up: bool,
    pub streak: StreakUpdate,
}

/// Authoritative read model: profile fields plus today's daily counters.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    pub total_xp: u32,
    pub current_level: u32,
    pub daily_goal: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_activity_date: Option<NaiveDate>,
    pub streak_freezes: u32,
    pub hearts: u32,
    pub max_hearts: u32,
    pub daily_xp: u32,
    pub daily_goal_met: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyProgress {
    pub current: u32,
    pub goal: u32,
    pub percentage: u32,
    pub met: bool,
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::levels::{level_for_xp, xp_progress, XpProgress};
use crate::models::{DailyProgress, Snapshot, DEFAULT_MAX_HEARTS};
use crate::xp::{XpSource, DEFAULT_DAILY_GOAL};

/// Queued local XP gain awaiting its UI animation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct XpGainEvent {
    pub id: Uuid,
    pub amount: u32,
    pub source: XpSource,
    pub timestamp: DateTime<Utc>,
}

/// Client-side optimistic mirror of the ledger.
///
/// Explicitly constructed and passed around; every operation is a synchronous
/// state transition. The pending queue and the level-up flag are transient UI
/// state and are skipped by (de)serialization, which is what the local
/// persistence layer relies on.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientCache {
    pub total_xp: u32,
    pub current_level: u32,

    pub daily_xp: u32,
    pub daily_goal: u32,
    pub daily_goal_met: bool,
    pub last_daily_reset: Option<NaiveDate>,

    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_activity_date: Option<NaiveDate>,
    pub streak_freezes: u32,

    pub hearts: u32,
    pub max_hearts: u32,

    #[serde(skip)]
    pub pending_xp_gains: Vec<XpGainEvent>,
    #[serde(skip)]
    pub level_up_pending: Option<u32>,
}

impl Default for ClientCache {
    fn default() -> Self {
        Self {
            total_xp: 0,
            current_level: 1,
            daily_xp: 0,
            daily_goal: DEFAULT_DAILY_GOAL,
            daily_goal_met: false,
            last_daily_reset: None,
            current_streak: 0,
            longest_streak: 0,
            last_activity_date: None,
            streak_freezes: 0,
            hearts: DEFAULT_MAX_HEARTS,
            max_hearts: DEFAULT_MAX_HEARTS,
            pending_xp_gains: Vec::new(),
            level_up_pending: None,
        }
    }
}

impl ClientCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Optimistic local award; the only write path for anonymous users.
    /// Returns the id of the queued gain event.
    pub fn add_xp(&mut self, amount: u32, source: XpSource) -> Uuid {
        self.add_xp_on(Utc::now().date_naive(), amount, source)
    }

    pub fn add_xp_on(&mut self, today: NaiveDate, amount: u32, source: XpSource) -> Uuid {
        if self.last_daily_reset != Some(today) {
            self.daily_xp = 0;
            self.daily_goal_met = false;
        }
        self.total_xp += amount;
        self.daily_xp += amount;
        self.last_daily_reset = Some(today);

        let new_level = level_for_xp(self.total_xp);
        if new_level > self.current_level {
            self.level_up_pending = Some(new_level);
        }
        self.current_level = new_level;

        if self.daily_xp >= self.daily_goal {
            self.daily_goal_met = true;
        }

        let event = XpGainEvent {
            id: Uuid::new_v4(),
            amount,
            source,
            timestamp: Utc::now(),
        };
        let id = event.id;
        self.pending_xp_gains.push(event);
        id
    }

    /// Removes one queued gain once its animation has been triggered. Safe to
    /// call twice with the same id; the second call is a no-op.
    pub fn consume_xp_gain(&mut self, id: Uuid) -> bool {
        let before = self.pending_xp_gains.len();
        self.pending_xp_gains.retain(|g| g.id != id);
        self.pending_xp_gains.len() < before
    }

    /// Overwrites mirrored ledger fields with the authoritative snapshot.
    /// The level is always recomputed from the snapshot's XP; a transmitted
    /// level value is never trusted.
    pub fn reconcile(&mut self, snapshot: &Snapshot) {
        self.reconcile_on(Utc::now().date_naive(), snapshot)
    }

    pub fn reconcile_on(&mut self, today: NaiveDate, snapshot: &Snapshot) {
        self.total_xp = snapshot.total_xp;
        self.current_level = level_for_xp(snapshot.total_xp);
        self.daily_goal = snapshot.daily_goal;
        self.current_streak = snapshot.current_streak;
        self.longest_streak = snapshot.longest_streak;
        self.last_activity_date = snapshot.last_activity_date;
        self.streak_freezes = snapshot.streak_freezes;
        self.hearts = snapshot.hearts;
        self.max_hearts = snapshot.max_hearts;
        self.daily_xp = snapshot.daily_xp;
        self.daily_goal_met = snapshot.daily_goal_met;
        self.last_daily_reset = Some(today);
    }

    /// Idempotent daily rollover, run on app load without waiting for the
    /// server.
    pub fn ensure_daily_window_current(&mut self) {
        self.ensure_daily_window_current_on(Utc::now().date_naive())
    }

    pub fn ensure_daily_window_current_on(&mut self, today: NaiveDate) {
        if self.last_daily_reset != Some(today) {
            self.daily_xp = 0;
            self.daily_goal_met = false;
            self.last_daily_reset = Some(today);
        }
    }

    /// Local-only preference.
    pub fn set_daily_goal(&mut self, goal: u32) {
        self.daily_goal = goal.max(1);
    }

    /// Clears the level-up flag; returns the level that was pending.
    pub fn acknowledge_level_up(&mut self) -> Option<u32> {
        self.level_up_pending.take()
    }

    pub fn use_streak_freeze(&mut self) -> bool {
        if self.streak_freezes == 0 {
            return false;
        }
        self.streak_freezes -= 1;
        true
    }

    pub fn lose_heart(&mut self) -> bool {
        if self.hearts == 0 {
            return false;
        }
        self.hearts -= 1;
        true
    }

    pub fn regenerate_heart(&mut self) {
        self.hearts = (self.hearts + 1).min(self.max_hearts);
    }

    /// Back to the initial state (logout / explicit reset).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn xp_progress(&self) -> XpProgress {
        xp_progress(self.total_xp, self.current_level)
    }

    pub fn daily_progress(&self) -> DailyProgress {
        let goal = self.daily_goal.max(1);
        DailyProgress {
            current: self.daily_xp,
            goal,
            percentage: (((self.daily_xp as f64 / goal as f64) * 100.0).round() as u32).min(100),
            met: self.daily_goal_met,
        }
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreakState {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_activity_date: Option<NaiveDate>,
    pub streak_freezes: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreakUpdate {
    pub new_streak: u32,
    pub extended: bool,
    pub broken: bool,
    pub is_new_record: bool,
    pub freeze_used: bool,
}

/// Pure streak transition for one XP-earning event on `today`.
///
/// All comparisons are at day granularity. A freeze rescues exactly a one-day
/// gap (`days_since == 2`); longer gaps reset regardless of freeze count.
pub fn streak_update(today: NaiveDate, state: &StreakState) -> StreakUpdate {
    let Some(last) = state.last_activity_date else {
        // First activity ever
        return StreakUpdate {
            new_streak: 1,
            extended: true,
            broken: false,
            is_new_record: true,
            freeze_used: false,
        };
    };

    let days_since = (today - last).num_days();

    // Already active today (<= 0 also covers clock drift backwards)
    if days_since <= 0 {
        return StreakUpdate {
            new_streak: state.current_streak,
            extended: false,
            broken: false,
            is_new_record: false,
            freeze_used: false,
        };
    }

    if days_since == 1 {
        let new_streak = state.current_streak + 1;
        return StreakUpdate {
            new_streak,
            extended: true,
            broken: false,
            is_new_record: new_streak > state.longest_streak,
            freeze_used: false,
        };
    }

    if days_since == 2 && state.streak_freezes > 0 {
        let new_streak = state.current_streak + 1;
        return StreakUpdate {
            new_streak,
            extended: true,
            broken: false,
            is_new_record: new_streak > state.longest_streak,
            freeze_used: true,
        };
    }

    // Streak broken, a fresh one-day streak begins
    StreakUpdate {
        new_streak: 1,
        extended: true,
        broken: state.current_streak > 0,
        is_new_record: false,
        freeze_used: false,
    }
}

/// True when the user was active exactly yesterday and has not earned anything
/// today, i.e. the streak is about to lapse.
pub fn should_show_streak_warning(today: NaiveDate, last_activity_date: Option<NaiveDate>) -> bool {
    match last_activity_date {
        None => false,
        Some(last) => (today - last).num_days() == 1,
    }
}

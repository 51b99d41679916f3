use chrono::NaiveDate;
use learnquest_core::{level_for_xp, EarnOutcome, EventSource, Snapshot, StreakUpdate};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnXpRequest {
    pub source: EventSource,
    pub quiz_score: Option<u32>,
    pub lesson_id: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct EarnXpResponse {
    pub success: bool,
    pub data: EarnXpData,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnXpData {
    pub xp_gained: u32,
    pub streak_bonus: u32,
    pub total_xp_gained: u32,
    pub new_total_xp: u32,
    pub new_level: u32,
    pub leveled_up: bool,
    pub previous_level: u32,
    pub streak: StreakOut,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakOut {
    pub current: u32,
    pub extended: bool,
    pub broken: bool,
    pub is_new_record: bool,
    pub freeze_used: bool,
}

impl From<EarnOutcome> for EarnXpData {
    fn from(o: EarnOutcome) -> Self {
        Self {
            xp_gained: o.xp_gained,
            streak_bonus: o.streak_bonus,
            total_xp_gained: o.total_xp_gained,
            new_total_xp: o.new_total_xp,
            new_level: o.new_level,
            leveled_up: o.leveled_up,
            previous_level: o.previous_level,
            streak: StreakOut {
                current: o.streak.new_streak,
                extended: o.streak.extended,
                broken: o.streak.broken,
                is_new_record: o.streak.is_new_record,
                freeze_used: o.streak.freeze_used,
            },
        }
    }
}

impl From<EarnXpData> for EarnOutcome {
    fn from(d: EarnXpData) -> Self {
        Self {
            xp_gained: d.xp_gained,
            streak_bonus: d.streak_bonus,
            total_xp_gained: d.total_xp_gained,
            new_total_xp: d.new_total_xp,
            new_level: d.new_level,
            previous_level: d.previous_level,
            leveled_up: d.leveled_up,
            streak: StreakUpdate {
                new_streak: d.streak.current,
                extended: d.streak.extended,
                broken: d.streak.broken,
                is_new_record: d.streak.is_new_record,
                freeze_used: d.streak.freeze_used,
            },
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub profile: ProfileOut,
    pub daily: DailyOut,
}

#[derive(Serialize, Deserialize)]
pub struct ProfileOut {
    pub total_xp: u32,
    pub current_level: u32,
    pub daily_goal: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_activity_date: Option<NaiveDate>,
    pub streak_freezes: u32,
    pub hearts: u32,
    pub max_hearts: u32,
}

#[derive(Serialize, Deserialize)]
pub struct DailyOut {
    pub xp_earned: u32,
    pub goal_met: bool,
}

impl From<Snapshot> for SnapshotResponse {
    fn from(s: Snapshot) -> Self {
        Self {
            profile: ProfileOut {
                total_xp: s.total_xp,
                current_level: s.current_level,
                daily_goal: s.daily_goal,
                current_streak: s.current_streak,
                longest_streak: s.longest_streak,
                last_activity_date: s.last_activity_date,
                streak_freezes: s.streak_freezes,
                hearts: s.hearts,
                max_hearts: s.max_hearts,
            },
            daily: DailyOut {
                xp_earned: s.daily_xp,
                goal_met: s.daily_goal_met,
            },
        }
    }
}

impl From<SnapshotResponse> for Snapshot {
    fn from(r: SnapshotResponse) -> Self {
        Self {
            total_xp: r.profile.total_xp,
            // Never trust a transmitted level; derive it again.
            current_level: level_for_xp(r.profile.total_xp),
            daily_goal: r.profile.daily_goal,
            current_streak: r.profile.current_streak,
            longest_streak: r.profile.longest_streak,
            last_activity_date: r.profile.last_activity_date,
            streak_freezes: r.profile.streak_freezes,
            hearts: r.profile.hearts,
            max_hearts: r.profile.max_hearts,
            daily_xp: r.daily.xp_earned,
            daily_goal_met: r.daily.goal_met,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

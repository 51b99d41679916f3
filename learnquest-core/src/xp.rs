use serde::{Deserialize, Serialize};

pub const XP_LESSON_COMPLETE: u32 = 10;
pub const XP_QUIZ_PERFECT: u32 = 15;
pub const XP_QUIZ_GOOD: u32 = 10;
pub const XP_QUIZ_COMPLETE: u32 = 5;

/// Streak bonus per consecutive day, capped at a x10 multiplier.
pub const XP_STREAK_BONUS_PER_DAY: u32 = 5;
pub const STREAK_BONUS_CAP: u32 = 10;

pub const DAILY_GOAL_PRESETS: [u32; 4] = [10, 20, 30, 50];
pub const DEFAULT_DAILY_GOAL: u32 = 20;

pub const QUIZ_GOOD_SCORE: u32 = 70;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum XpSource {
    QuizPerfect,
    QuizGood,
    QuizComplete,
    LessonComplete,
    StreakBonus,
}

impl XpSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            XpSource::QuizPerfect => "quiz_perfect",
            XpSource::QuizGood => "quiz_good",
            XpSource::QuizComplete => "quiz_complete",
            XpSource::LessonComplete => "lesson_complete",
            XpSource::StreakBonus => "streak_bonus",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "quiz_perfect" => Some(XpSource::QuizPerfect),
            "quiz_good" => Some(XpSource::QuizGood),
            "quiz_complete" => Some(XpSource::QuizComplete),
            "lesson_complete" => Some(XpSource::LessonComplete),
            "streak_bonus" => Some(XpSource::StreakBonus),
            _ => None,
        }
    }
}

/// Tiered quiz award; even a failing attempt earns the base amount.
pub fn xp_for_quiz(score: u32) -> u32 {
    if score >= 100 {
        XP_QUIZ_PERFECT
    } else if score >= QUIZ_GOOD_SCORE {
        XP_QUIZ_GOOD
    } else {
        XP_QUIZ_COMPLETE
    }
}

pub fn quiz_source(score: u32) -> XpSource {
    if score >= 100 {
        XpSource::QuizPerfect
    } else if score >= QUIZ_GOOD_SCORE {
        XpSource::QuizGood
    } else {
        XpSource::QuizComplete
    }
}

pub fn xp_for_lesson() -> u32 {
    XP_LESSON_COMPLETE
}

/// Zero on day one of a streak; otherwise per-day bonus with a capped multiplier.
pub fn streak_bonus(new_streak: u32) -> u32 {
    if new_streak <= 1 {
        0
    } else {
        XP_STREAK_BONUS_PER_DAY * new_streak.min(STREAK_BONUS_CAP)
    }
}

use chrono::NaiveDate;
use learnquest_core::{
    level_for_xp, should_show_streak_warning, streak_bonus, streak_update, xp_for_lesson,
    xp_for_quiz, xp_progress, xp_required_for_next_level, StreakState, LEVEL_THRESHOLDS,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn level_curve_starts_at_one_and_is_monotonic() {
    assert_eq!(level_for_xp(0), 1);

    let mut prev = 0;
    for xp in (0..30_000).step_by(7) {
        let level = level_for_xp(xp);
        assert!(level >= prev, "level dropped at {xp} XP");
        prev = level;
    }
}

#[test]
fn level_boundaries_are_exact() {
    // Tabulated region and the extrapolated region past the table.
    for level in 1..40u32 {
        let next = xp_required_for_next_level(level);
        assert_eq!(level_for_xp(next - 1), level);
        assert_eq!(level_for_xp(next), level + 1);
    }
}

#[test]
fn levels_past_table_extrapolate_per_thousand() {
    let last = LEVEL_THRESHOLDS[LEVEL_THRESHOLDS.len() - 1];
    assert_eq!(level_for_xp(last), 25);
    assert_eq!(level_for_xp(last + 999), 25);
    assert_eq!(level_for_xp(last + 1000), 26);
    assert_eq!(level_for_xp(last + 2500), 27);
}

#[test]
fn xp_progress_within_band() {
    // Level 1 band is 0..50.
    let p = xp_progress(25, 1);
    assert_eq!(p.current, 25);
    assert_eq!(p.needed, 50);
    assert_eq!(p.percentage, 50);

    // Level 2 band is 50..120.
    let p = xp_progress(120, 2);
    assert_eq!(p.current, 70);
    assert_eq!(p.needed, 70);
    assert_eq!(p.percentage, 100);
}

#[test]
fn quiz_award_tiers() {
    assert_eq!(xp_for_quiz(100), 15);
    assert_eq!(xp_for_quiz(99), 10);
    assert_eq!(xp_for_quiz(70), 10);
    assert_eq!(xp_for_quiz(69), 5);
    assert_eq!(xp_for_quiz(0), 5);
    assert_eq!(xp_for_lesson(), 10);
}

#[test]
fn streak_bonus_is_zero_on_day_one_and_capped() {
    assert_eq!(streak_bonus(0), 0);
    assert_eq!(streak_bonus(1), 0);
    assert_eq!(streak_bonus(2), 10);
    assert_eq!(streak_bonus(6), 30);
    assert_eq!(streak_bonus(10), 50);
    assert_eq!(streak_bonus(250), 50);
}

#[test]
fn first_activity_initializes_streak() {
    let state = StreakState {
        current_streak: 0,
        longest_streak: 0,
        last_activity_date: None,
        streak_freezes: 0,
    };
    let up = streak_update(date(2026, 3, 10), &state);
    assert_eq!(up.new_streak, 1);
    assert!(up.extended);
    assert!(up.is_new_record);
    assert!(!up.broken);
    assert!(!up.freeze_used);
}

#[test]
fn same_day_is_idempotent() {
    let today = date(2026, 3, 10);
    let state = StreakState {
        current_streak: 4,
        longest_streak: 9,
        last_activity_date: Some(today),
        streak_freezes: 1,
    };
    let first = streak_update(today, &state);
    let second = streak_update(today, &state);
    assert_eq!(first, second);
    assert_eq!(first.new_streak, 4);
    assert!(!first.extended);
    assert!(!first.freeze_used);
}

#[test]
fn next_day_extends_and_tracks_record() {
    let state = StreakState {
        current_streak: 5,
        longest_streak: 5,
        last_activity_date: Some(date(2026, 3, 9)),
        streak_freezes: 0,
    };
    let up = streak_update(date(2026, 3, 10), &state);
    assert_eq!(up.new_streak, 6);
    assert!(up.extended);
    assert!(up.is_new_record);
    assert!(!up.broken);
}

#[test]
fn one_day_gap_with_freeze_saves_streak() {
    let state = StreakState {
        current_streak: 3,
        longest_streak: 8,
        last_activity_date: Some(date(2026, 3, 8)),
        streak_freezes: 1,
    };
    let up = streak_update(date(2026, 3, 10), &state);
    assert_eq!(up.new_streak, 4);
    assert!(up.extended);
    assert!(up.freeze_used);
    assert!(!up.broken);
    assert!(!up.is_new_record);
}

#[test]
fn one_day_gap_without_freeze_breaks() {
    let state = StreakState {
        current_streak: 3,
        longest_streak: 8,
        last_activity_date: Some(date(2026, 3, 8)),
        streak_freezes: 0,
    };
    let up = streak_update(date(2026, 3, 10), &state);
    assert_eq!(up.new_streak, 1);
    assert!(up.broken);
    assert!(!up.freeze_used);
}

#[test]
fn long_gap_breaks_even_with_freezes_held() {
    // A freeze only rescues exactly a one-day gap.
    let state = StreakState {
        current_streak: 4,
        longest_streak: 4,
        last_activity_date: Some(date(2026, 3, 5)),
        streak_freezes: 3,
    };
    let up = streak_update(date(2026, 3, 10), &state);
    assert_eq!(up.new_streak, 1);
    assert!(up.broken);
    assert!(!up.freeze_used);
    assert!(!up.is_new_record);
}

#[test]
fn breaking_a_zero_streak_is_not_broken() {
    let state = StreakState {
        current_streak: 0,
        longest_streak: 2,
        last_activity_date: Some(date(2026, 3, 1)),
        streak_freezes: 0,
    };
    let up = streak_update(date(2026, 3, 10), &state);
    assert_eq!(up.new_streak, 1);
    assert!(!up.broken);
}

#[test]
fn streak_warning_only_fires_after_exactly_one_day() {
    let today = date(2026, 3, 10);
    assert!(!should_show_streak_warning(today, None));
    assert!(!should_show_streak_warning(today, Some(today)));
    assert!(should_show_streak_warning(today, Some(date(2026, 3, 9))));
    assert!(!should_show_streak_warning(today, Some(date(2026, 3, 7))));
}

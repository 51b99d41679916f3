use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use crate::levels::level_for_xp;
use crate::repo::Repository;
use crate::streak::streak_update;
use crate::xp::{quiz_source, streak_bonus, xp_for_lesson, xp_for_quiz, XpSource};
use crate::{CoreError, DailyXp, EarnEvent, EarnOutcome, EventSource, GamificationProfile, Snapshot, UserId, XpTransaction};

/// Server-authoritative gamification ledger. All mutation goes through
/// [`Ledger::report_event`]; reads never create rows.
#[derive(Clone)]
pub struct Ledger {
    repo: Arc<dyn Repository>,
}

impl Ledger {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    pub async fn report_event(
        &self,
        user_id: UserId,
        event: &EarnEvent,
    ) -> Result<EarnOutcome, CoreError> {
        self.report_event_on(Utc::now().date_naive(), user_id, event)
            .await
    }

    /// Same as [`report_event`](Self::report_event) with an injected "today",
    /// used by tests and by callers that already normalized the date.
    pub async fn report_event_on(
        &self,
        today: NaiveDate,
        user_id: UserId,
        event: &EarnEvent,
    ) -> Result<EarnOutcome, CoreError> {
        // Base XP from the award policy; rejected before any persistence.
        let (base_xp, xp_source) = match event.source {
            EventSource::QuizComplete => {
                let score = event
                    .quiz_score
                    .ok_or(CoreError::Invalid("quiz_score is required for quiz_complete"))?;
                if score > 100 {
                    return Err(CoreError::Invalid("quiz_score must be 0..=100"));
                }
                (xp_for_quiz(score), quiz_source(score))
            }
            EventSource::LessonComplete => (xp_for_lesson(), XpSource::LessonComplete),
        };

        let profile = self
            .repo
            .get_profile(user_id)
            .await?
            .unwrap_or_else(|| GamificationProfile::new(user_id));

        let streak = streak_update(today, &profile.streak_state());

        let bonus = if streak.extended && streak.new_streak > 1 {
            streak_bonus(streak.new_streak)
        } else {
            0
        };

        let total_xp_gained = base_xp + bonus;
        let new_total_xp = profile.total_xp + total_xp_gained;
        let new_level = level_for_xp(new_total_xp);
        let previous_level = profile.current_level;
        let leveled_up = new_level > previous_level;

        // Single atomic upsert keyed by user id (step 6).
        let mut updated = profile.clone();
        updated.total_xp = new_total_xp;
        updated.current_level = new_level;
        updated.current_streak = streak.new_streak;
        updated.longest_streak = profile.longest_streak.max(streak.new_streak);
        updated.last_activity_date = Some(today);
        if streak.freeze_used {
            updated.streak_freezes = profile.streak_freezes.saturating_sub(1);
        }
        updated.updated_at = Utc::now();
        self.repo.upsert_profile(&updated).await?;

        // One audit row per XP component.
        let base_tx = XpTransaction::new(
            user_id,
            base_xp as i64,
            xp_source,
            event.lesson_id.clone(),
        );
        self.repo.insert_xp_transaction(&base_tx).await?;
        if bonus > 0 {
            let bonus_tx = XpTransaction::new(user_id, bonus as i64, XpSource::StreakBonus, None);
            self.repo.insert_xp_transaction(&bonus_tx).await?;
        }

        // Daily counter: rows are keyed by (user, date), so a new day starts
        // from zero implicitly. goal_met is sticky for the day.
        let prior = self.repo.get_daily_xp(user_id, today).await?;
        let prior_xp = prior.as_ref().map(|d| d.xp_earned).unwrap_or(0);
        let prior_met = prior.as_ref().map(|d| d.goal_met).unwrap_or(false);
        let xp_earned = prior_xp + total_xp_gained;
        let daily = DailyXp {
            user_id,
            date: today,
            xp_earned,
            goal_met: prior_met || xp_earned >= updated.daily_goal,
        };
        self.repo.upsert_daily_xp(&daily).await?;

        // Progress-tracking collaborator gets the base amount only.
        if let Some(lesson_id) = &event.lesson_id {
            self.repo.set_lesson_xp(user_id, lesson_id, base_xp).await?;
        }

        Ok(EarnOutcome {
            xp_gained: base_xp,
            streak_bonus: bonus,
            total_xp_gained,
            new_total_xp,
            new_level,
            previous_level,
            leveled_up,
            streak,
        })
    }

    pub async fn snapshot(&self, user_id: UserId) -> Result<Snapshot, CoreError> {
        self.snapshot_on(Utc::now().date_naive(), user_id).await
    }

    /// Read-only view; zeroed defaults when no profile row exists.
    pub async fn snapshot_on(
        &self,
        today: NaiveDate,
        user_id: UserId,
    ) -> Result<Snapshot, CoreError> {
        let profile = self
            .repo
            .get_profile(user_id)
            .await?
            .unwrap_or_else(|| GamificationProfile::new(user_id));
        let daily = self.repo.get_daily_xp(user_id, today).await?;
        Ok(Snapshot {
            total_xp: profile.total_xp,
            current_level: level_for_xp(profile.total_xp),
            daily_goal: profile.daily_goal,
            current_streak: profile.current_streak,
            longest_streak: profile.longest_streak,
            last_activity_date: profile.last_activity_date,
            streak_freezes: profile.streak_freezes,
            hearts: profile.hearts,
            max_hearts: profile.max_hearts,
            daily_xp: daily.as_ref().map(|d| d.xp_earned).unwrap_or(0),
            daily_goal_met: daily.as_ref().map(|d| d.goal_met).unwrap_or(false),
        })
    }
}

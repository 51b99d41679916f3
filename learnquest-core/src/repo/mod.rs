use chrono::NaiveDate;

use crate::{CoreError, DailyXp, GamificationProfile, UserId, XpTransaction};
use async_trait::async_trait;

pub mod memory;

pub use memory::MemoryRepo;

/// Keyed store consumed by the ledger. Upserts must be atomic create-or-update
/// on their key so concurrent same-user calls serialize at the storage layer.
#[async_trait]
pub trait Repository: Send + Sync {
    // Profiles
    async fn get_profile(&self, user_id: UserId) -> Result<Option<GamificationProfile>, CoreError>;
    async fn upsert_profile(&self, profile: &GamificationProfile) -> Result<(), CoreError>;

    // XP transactions (append-only)
    async fn insert_xp_transaction(&self, tx: &XpTransaction) -> Result<(), CoreError>;
    async fn list_xp_transactions(&self, user_id: UserId) -> Result<Vec<XpTransaction>, CoreError>;

    // Daily counters, keyed by (user, date)
    async fn get_daily_xp(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> Result<Option<DailyXp>, CoreError>;
    async fn upsert_daily_xp(&self, daily: &DailyXp) -> Result<(), CoreError>;

    // Progress-tracking collaborator: record the base XP earned for a lesson
    async fn set_lesson_xp(
        &self,
        user_id: UserId,
        lesson_id: &str,
        xp: u32,
    ) -> Result<(), CoreError>;
}

use chrono::NaiveDate;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::{CoreError, DailyXp, GamificationProfile, UserId, XpTransaction};
use async_trait::async_trait;

#[derive(Default)]
pub struct MemoryRepo {
    profiles: RwLock<HashMap<UserId, GamificationProfile>>,
    transactions: RwLock<HashMap<UserId, Vec<XpTransaction>>>,
    daily: RwLock<HashMap<(UserId, NaiveDate), DailyXp>>,
    lesson_xp: RwLock<HashMap<(UserId, String), u32>>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test/inspection helper for the progress collaborator.
    pub fn lesson_xp(&self, user_id: UserId, lesson_id: &str) -> Option<u32> {
        self.lesson_xp
            .read()
            .get(&(user_id, lesson_id.to_string()))
            .copied()
    }
}

#[async_trait]
impl crate::repo::Repository for MemoryRepo {
    async fn get_profile(&self, user_id: UserId) -> Result<Option<GamificationProfile>, CoreError> {
        Ok(self.profiles.read().get(&user_id).cloned())
    }

    async fn upsert_profile(&self, profile: &GamificationProfile) -> Result<(), CoreError> {
        self.profiles
            .write()
            .insert(profile.user_id, profile.clone());
        Ok(())
    }

    async fn insert_xp_transaction(&self, tx: &XpTransaction) -> Result<(), CoreError> {
        self.transactions
            .write()
            .entry(tx.user_id)
            .or_default()
            .push(tx.clone());
        Ok(())
    }

    async fn list_xp_transactions(&self, user_id: UserId) -> Result<Vec<XpTransaction>, CoreError> {
        Ok(self
            .transactions
            .read()
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_daily_xp(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> Result<Option<DailyXp>, CoreError> {
        Ok(self.daily.read().get(&(user_id, date)).cloned())
    }

    async fn upsert_daily_xp(&self, daily: &DailyXp) -> Result<(), CoreError> {
        self.daily
            .write()
            .insert((daily.user_id, daily.date), daily.clone());
        Ok(())
    }

    async fn set_lesson_xp(
        &self,
        user_id: UserId,
        lesson_id: &str,
        xp: u32,
    ) -> Result<(), CoreError> {
        self.lesson_xp
            .write()
            .insert((user_id, lesson_id.to_string()), xp);
        Ok(())
    }
}

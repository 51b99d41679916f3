use anyhow::{anyhow, Result};
use std::time::Duration;

use learnquest_core::{ClientCache, EarnEvent, EarnOutcome, Snapshot, UserId};

use crate::api::dto::{EarnXpRequest, EarnXpResponse, SnapshotResponse};
use crate::api::routes::USER_HEADER;

/// HTTP client for the sync protocol: push events, pull snapshots.
pub struct SyncClient {
    http: reqwest::Client,
    base_url: String,
    user_id: UserId,
}

impl SyncClient {
    pub fn new(base_url: impl Into<String>, user_id: UserId) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_id,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/gamification/earn-xp", self.base_url)
    }

    pub async fn report_event(&self, event: &EarnEvent) -> Result<EarnOutcome> {
        let body = EarnXpRequest {
            source: event.source.clone(),
            quiz_score: event.quiz_score,
            lesson_id: event.lesson_id.clone(),
        };
        let resp = self
            .http
            .post(self.endpoint())
            .header(USER_HEADER, self.user_id.to_string())
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(anyhow!("earn-xp failed with status {}", resp.status()));
        }
        let parsed: EarnXpResponse = resp.json().await?;
        Ok(parsed.data.into())
    }

    pub async fn fetch_snapshot(&self) -> Result<Snapshot> {
        let resp = self
            .http
            .get(self.endpoint())
            .header(USER_HEADER, self.user_id.to_string())
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(anyhow!("snapshot fetch failed with status {}", resp.status()));
        }
        let parsed: SnapshotResponse = resp.json().await?;
        Ok(parsed.into())
    }

    /// Push an already-locally-applied event, then reconcile the cache from
    /// the authoritative snapshot. On network failure the optimistic local
    /// state stays as the only record: log, no retry, caller is not blocked.
    pub async fn push_and_reconcile(
        &self,
        cache: &mut ClientCache,
        event: &EarnEvent,
    ) -> Option<EarnOutcome> {
        let outcome = match self.report_event(event).await {
            Ok(o) => o,
            Err(e) => {
                tracing::warn!("event not recorded on server, keeping local state: {e}");
                return None;
            }
        };
        match self.fetch_snapshot().await {
            Ok(snapshot) => cache.reconcile(&snapshot),
            Err(e) => {
                tracing::warn!("snapshot fetch failed after earn, keeping local state: {e}");
            }
        }
        Some(outcome)
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use learnquest_core::{
    repo::Repository, CoreError, DailyXp, GamificationProfile, UserId, XpSource, XpTransaction,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Row, SqlitePool,
};
use std::path::Path;
use std::str::FromStr;

pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    pub async fn open_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let opts = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .map_err(|_| CoreError::Storage("sqlite connect"))?;
        let repo = Self { pool };
        repo.ensure_schema().await?;
        Ok(repo)
    }

    pub async fn open_memory() -> Result<Self, CoreError> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|_| CoreError::Storage("sqlite connect"))?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .map_err(|_| CoreError::Storage("sqlite connect"))?;
        let repo = Self { pool };
        repo.ensure_schema().await?;
        Ok(repo)
    }

    async fn ensure_schema(&self) -> Result<(), CoreError> {
        // Create tables/indexes if they do not exist (mirrors migrations).
        const STMT: &str = r#"
        CREATE TABLE IF NOT EXISTS profiles (
          user_id             TEXT PRIMARY KEY,
          total_xp            INTEGER NOT NULL DEFAULT 0,
          current_level       INTEGER NOT NULL DEFAULT 1,
          current_streak      INTEGER NOT NULL DEFAULT 0,
          longest_streak      INTEGER NOT NULL DEFAULT 0,
          last_activity_date  TEXT,
          streak_freezes      INTEGER NOT NULL DEFAULT 0,
          hearts              INTEGER NOT NULL DEFAULT 5,
          max_hearts          INTEGER NOT NULL DEFAULT 5,
          daily_goal          INTEGER NOT NULL DEFAULT 20,
          created_at          TEXT NOT NULL,
          updated_at          TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS xp_transactions (
          id          TEXT PRIMARY KEY,
          user_id     TEXT NOT NULL,
          amount      INTEGER NOT NULL,
          source      TEXT NOT NULL,
          source_id   TEXT,
          created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS daily_xp (
          user_id    TEXT NOT NULL,
          date       TEXT NOT NULL,
          xp_earned  INTEGER NOT NULL DEFAULT 0,
          goal_met   INTEGER NOT NULL DEFAULT 0,
          PRIMARY KEY (user_id, date)
        );

        CREATE TABLE IF NOT EXISTS lesson_progress (
          user_id    TEXT NOT NULL,
          lesson_id  TEXT NOT NULL,
          xp_earned  INTEGER NOT NULL DEFAULT 0,
          PRIMARY KEY (user_id, lesson_id)
        );

        CREATE INDEX IF NOT EXISTS idx_xp_transactions_user_time ON xp_transactions (user_id, created_at);
        "#;

        // Execute statements one by one for compatibility.
        for chunk in STMT.split(';') {
            let sql = chunk.trim();
            if sql.is_empty() {
                continue;
            }
            sqlx::query(sql)
                .execute(&self.pool)
                .await
                .map_err(|_| CoreError::Storage("sqlite schema"))?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Repository for SqliteRepo {
    // ===== Profiles =====
    async fn get_profile(&self, user_id: UserId) -> Result<Option<GamificationProfile>, CoreError> {
        let row = sqlx::query(
            r#"SELECT user_id,total_xp,current_level,current_streak,longest_streak,
                      last_activity_date,streak_freezes,hearts,max_hearts,daily_goal,
                      created_at,updated_at
               FROM profiles WHERE user_id=?"#,
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|_| CoreError::Storage("read profile"))?;
        row.map(row_into_profile).transpose()
    }

    async fn upsert_profile(&self, profile: &GamificationProfile) -> Result<(), CoreError> {
        // Single atomic upsert keyed by user id; concurrent same-user calls
        // serialize here instead of losing updates.
        sqlx::query(
            r#"
            INSERT INTO profiles (
              user_id, total_xp, current_level, current_streak, longest_streak,
              last_activity_date, streak_freezes, hearts, max_hearts, daily_goal,
              created_at, updated_at
            )
            VALUES (?,?,?,?,?,?,?,?,?,?,?,?)
            ON CONFLICT(user_id) DO UPDATE SET
              total_xp=excluded.total_xp,
              current_level=excluded.current_level,
              current_streak=excluded.current_streak,
              longest_streak=excluded.longest_streak,
              last_activity_date=excluded.last_activity_date,
              streak_freezes=excluded.streak_freezes,
              hearts=excluded.hearts,
              max_hearts=excluded.max_hearts,
              daily_goal=excluded.daily_goal,
              updated_at=excluded.updated_at
            "#,
        )
        .bind(profile.user_id.to_string())
        .bind(profile.total_xp as i64)
        .bind(profile.current_level as i64)
        .bind(profile.current_streak as i64)
        .bind(profile.longest_streak as i64)
        .bind(profile.last_activity_date.map(date_to_str))
        .bind(profile.streak_freezes as i64)
        .bind(profile.hearts as i64)
        .bind(profile.max_hearts as i64)
        .bind(profile.daily_goal as i64)
        .bind(dt_to_str(profile.created_at))
        .bind(dt_to_str(profile.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|_| CoreError::Storage("upsert profile"))?;
        Ok(())
    }

    // ===== XP transactions =====
    async fn insert_xp_transaction(&self, tx: &XpTransaction) -> Result<(), CoreError> {
        sqlx::query(
            r#"INSERT INTO xp_transactions (id,user_id,amount,source,source_id,created_at)
               VALUES (?,?,?,?,?,?)"#,
        )
        .bind(tx.id.to_string())
        .bind(tx.user_id.to_string())
        .bind(tx.amount)
        .bind(tx.source.as_str())
        .bind(tx.source_id.clone())
        .bind(dt_to_str(tx.created_at))
        .execute(&self.pool)
        .await
        .map_err(|_| CoreError::Storage("insert transaction"))?;
        Ok(())
    }

    async fn list_xp_transactions(&self, user_id: UserId) -> Result<Vec<XpTransaction>, CoreError> {
        let rows = sqlx::query(
            r#"SELECT id,user_id,amount,source,source_id,created_at
               FROM xp_transactions WHERE user_id=? ORDER BY created_at ASC"#,
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|_| CoreError::Storage("list transactions"))?;
        let mut v = Vec::with_capacity(rows.len());
        for row in rows {
            v.push(XpTransaction {
                id: uuid_from_str(row.get::<String, _>("id"))?,
                user_id: uuid_from_str(row.get::<String, _>("user_id"))?,
                amount: row.get::<i64, _>("amount"),
                source: XpSource::parse(&row.get::<String, _>("source"))
                    .ok_or(CoreError::Invalid("source"))?,
                source_id: row.get::<Option<String>, _>("source_id"),
                created_at: dt_from_str(row.get::<String, _>("created_at"))?,
            });
        }
        Ok(v)
    }

    // ===== Daily counters =====
    async fn get_daily_xp(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> Result<Option<DailyXp>, CoreError> {
        let row = sqlx::query(
            "SELECT user_id,date,xp_earned,goal_met FROM daily_xp WHERE user_id=? AND date=?",
        )
        .bind(user_id.to_string())
        .bind(date_to_str(date))
        .fetch_optional(&self.pool)
        .await
        .map_err(|_| CoreError::Storage("read daily xp"))?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(DailyXp {
            user_id: uuid_from_str(row.get::<String, _>("user_id"))?,
            date: date_from_str(row.get::<String, _>("date"))?,
            xp_earned: row.get::<i64, _>("xp_earned") as u32,
            goal_met: row.get::<i64, _>("goal_met") != 0,
        }))
    }

    async fn upsert_daily_xp(&self, daily: &DailyXp) -> Result<(), CoreError> {
        sqlx::query(
            r#"
            INSERT INTO daily_xp (user_id,date,xp_earned,goal_met)
            VALUES (?,?,?,?)
            ON CONFLICT(user_id,date) DO UPDATE SET
              xp_earned=excluded.xp_earned,
              goal_met=excluded.goal_met
            "#,
        )
        .bind(daily.user_id.to_string())
        .bind(date_to_str(daily.date))
        .bind(daily.xp_earned as i64)
        .bind(bool_to_i(daily.goal_met))
        .execute(&self.pool)
        .await
        .map_err(|_| CoreError::Storage("upsert daily xp"))?;
        Ok(())
    }

    // ===== Lesson progress collaborator =====
    async fn set_lesson_xp(
        &self,
        user_id: UserId,
        lesson_id: &str,
        xp: u32,
    ) -> Result<(), CoreError> {
        sqlx::query(
            r#"
            INSERT INTO lesson_progress (user_id,lesson_id,xp_earned)
            VALUES (?,?,?)
            ON CONFLICT(user_id,lesson_id) DO UPDATE SET
              xp_earned=excluded.xp_earned
            "#,
        )
        .bind(user_id.to_string())
        .bind(lesson_id)
        .bind(xp as i64)
        .execute(&self.pool)
        .await
        .map_err(|_| CoreError::Storage("upsert lesson progress"))?;
        Ok(())
    }
}

// ===== Helpers =====
fn uuid_from_str(s: String) -> Result<uuid::Uuid, CoreError> {
    uuid::Uuid::parse_str(&s).map_err(|_| CoreError::Invalid("uuid"))
}

fn dt_to_str(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn dt_from_str(s: String) -> Result<DateTime<Utc>, CoreError> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map_err(|_| CoreError::Invalid("datetime"))
        .map(|dt| dt.with_timezone(&Utc))
}

fn date_to_str(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

fn date_from_str(s: String) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| CoreError::Invalid("date"))
}

fn bool_to_i(b: bool) -> i64 {
    if b {
        1
    } else {
        0
    }
}

fn row_into_profile(row: sqlx::sqlite::SqliteRow) -> Result<GamificationProfile, CoreError> {
    Ok(GamificationProfile {
        user_id: uuid_from_str(row.get::<String, _>("user_id"))?,
        total_xp: row.get::<i64, _>("total_xp") as u32,
        current_level: row.get::<i64, _>("current_level") as u32,
        current_streak: row.get::<i64, _>("current_streak") as u32,
        longest_streak: row.get::<i64, _>("longest_streak") as u32,
        last_activity_date: row
            .get::<Option<String>, _>("last_activity_date")
            .map(date_from_str)
            .transpose()?,
        streak_freezes: row.get::<i64, _>("streak_freezes") as u32,
        hearts: row.get::<i64, _>("hearts") as u32,
        max_hearts: row.get::<i64, _>("max_hearts") as u32,
        daily_goal: row.get::<i64, _>("daily_goal") as u32,
        created_at: dt_from_str(row.get::<String, _>("created_at"))?,
        updated_at: dt_from_str(row.get::<String, _>("updated_at"))?,
    })
}

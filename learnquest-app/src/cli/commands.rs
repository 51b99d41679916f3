use crate::api::server as api_server;
use crate::cli::opts::*;
use crate::client::SyncClient;

use anyhow::{bail, Result};
use learnquest_core::{
    quiz_source, should_show_streak_warning, xp_for_lesson, xp_for_quiz, ClientCache, EarnEvent,
    EarnOutcome, EventSource, Repository, XpSource, DAILY_GOAL_PRESETS,
};
use learnquest_json::paths::data_root;
use learnquest_json::CacheStore;
use learnquest_sqlite::SqliteRepo;
use std::path::PathBuf;
use std::sync::Arc;

pub async fn run_cli(args: Cli) -> Result<()> {
    match args.cmd.clone() {
        Command::Serve(cmd) => {
            let repo = open_repo(&args.store, args.db_path.clone()).await?;
            let addr: std::net::SocketAddr = cmd.addr.parse()?;
            api_server::run(repo, addr).await
        }
        Command::Earn(cmd) => earn_cmd(cmd).await,
        Command::Profile(cmd) => profile_cmd(cmd).await,
        Command::Sync(cmd) => sync_cmd(cmd).await,
        Command::Goal { goal } => goal_cmd(goal).await,
        Command::History { user } => {
            let repo = open_repo(&args.store, args.db_path.clone()).await?;
            history_cmd(repo, user).await
        }
        Command::Reset => reset_cmd().await,
    }
}

pub async fn open_repo(store: &StoreKind, db_path: Option<PathBuf>) -> Result<Arc<dyn Repository>> {
    match store {
        StoreKind::Memory => Ok(Arc::new(learnquest_core::MemoryRepo::new())),
        StoreKind::Sqlite => {
            let p = db_path.unwrap_or_else(|| data_root().join("learnquest.sqlite3"));
            if let Some(parent) = p.parent() {
                std::fs::create_dir_all(parent).ok();
            }
            let s = SqliteRepo::open_file(&p).await?;
            Ok(Arc::new(s))
        }
    }
}

async fn earn_cmd(cmd: EarnCmd) -> Result<()> {
    // Base XP via the award policy, for immediate local feedback.
    let (event, base_xp, xp_source) = match cmd.source {
        SourceKind::LessonComplete => (
            EarnEvent {
                source: EventSource::LessonComplete,
                quiz_score: None,
                lesson_id: cmd.lesson.clone(),
            },
            xp_for_lesson(),
            XpSource::LessonComplete,
        ),
        SourceKind::QuizComplete => {
            let Some(score) = cmd.score else {
                bail!("--score is required for quiz-complete");
            };
            if score > 100 {
                bail!("--score must be 0..=100");
            }
            (
                EarnEvent::quiz(score, cmd.lesson.clone()),
                xp_for_quiz(score),
                quiz_source(score),
            )
        }
    };

    let store = CacheStore::open_default()?;
    let mut cache = store.load().await?;
    cache.ensure_daily_window_current();

    // Optimistic local award first; for anonymous use this is the only record.
    let gain_id = cache.add_xp(base_xp, xp_source);
    println!("+{} XP ({})", base_xp, xp_source.as_str());

    if let (Some(server), Some(user)) = (cmd.remote.server.clone(), cmd.remote.user) {
        let client = SyncClient::new(server, user)?;
        if let Some(outcome) = client.push_and_reconcile(&mut cache, &event).await {
            print_outcome(&outcome);
        }
    }

    // The CLI displays the gain inline, so consume it immediately.
    cache.consume_xp_gain(gain_id);
    if let Some(level) = cache.acknowledge_level_up() {
        println!("level up! reached level {level}");
    }

    store.save(&cache).await?;
    Ok(())
}

fn print_outcome(outcome: &EarnOutcome) {
    if outcome.streak_bonus > 0 {
        println!(
            "+{} XP streak bonus (day {})",
            outcome.streak_bonus, outcome.streak.new_streak
        );
    }
    if outcome.streak.freeze_used {
        println!("streak freeze used");
    }
    if outcome.streak.broken {
        println!("streak broken, back to day 1");
    } else if outcome.streak.is_new_record {
        println!("new streak record: {} days", outcome.streak.new_streak);
    }
    println!(
        "server total: {} XP (level {})",
        outcome.new_total_xp, outcome.new_level
    );
}

async fn profile_cmd(cmd: ProfileCmd) -> Result<()> {
    let store = CacheStore::open_default()?;
    let mut cache = store.load().await?;
    cache.ensure_daily_window_current();

    if let (Some(server), Some(user)) = (cmd.remote.server, cmd.remote.user) {
        let client = SyncClient::new(server, user)?;
        match client.fetch_snapshot().await {
            Ok(snapshot) => {
                cache.reconcile(&snapshot);
                store.save(&cache).await?;
            }
            Err(e) => tracing::warn!("snapshot fetch failed, showing local state: {e}"),
        }
    }

    print_cache(&cache);
    Ok(())
}

fn print_cache(cache: &ClientCache) {
    let xp = cache.xp_progress();
    let daily = cache.daily_progress();
    println!("total XP:    {} (level {})", cache.total_xp, cache.current_level);
    println!(
        "next level:  {}/{} XP ({}%)",
        xp.current, xp.needed, xp.percentage
    );
    println!(
        "daily goal:  {}/{} XP ({}%){}",
        daily.current,
        daily.goal,
        daily.percentage,
        if daily.met { " met" } else { "" }
    );
    println!(
        "streak:      {} day(s), longest {}",
        cache.current_streak, cache.longest_streak
    );
    println!("freezes:     {}", cache.streak_freezes);
    println!("hearts:      {}/{}", cache.hearts, cache.max_hearts);
    let today = chrono::Utc::now().date_naive();
    if should_show_streak_warning(today, cache.last_activity_date) {
        println!("warning: earn XP today to keep your streak!");
    }
}

async fn sync_cmd(cmd: SyncCmd) -> Result<()> {
    let store = CacheStore::open_default()?;
    let mut cache = store.load().await?;
    let client = SyncClient::new(cmd.server, cmd.user)?;
    let snapshot = client.fetch_snapshot().await?;
    cache.reconcile(&snapshot);
    store.save(&cache).await?;
    println!("synced: {} XP (level {})", cache.total_xp, cache.current_level);
    Ok(())
}

async fn goal_cmd(goal: u32) -> Result<()> {
    if goal == 0 {
        bail!("goal must be positive (presets: {:?})", DAILY_GOAL_PRESETS);
    }
    let store = CacheStore::open_default()?;
    let mut cache = store.load().await?;
    cache.set_daily_goal(goal);
    store.save(&cache).await?;
    println!("daily goal set to {goal} XP");
    Ok(())
}

async fn history_cmd(repo: Arc<dyn Repository>, user: uuid::Uuid) -> Result<()> {
    let txs = repo.list_xp_transactions(user).await?;
    if txs.is_empty() {
        println!("no transactions");
        return Ok(());
    }
    for tx in txs {
        let source_id = tx.source_id.unwrap_or_else(|| "-".to_string());
        println!(
            "{}\t{:+}\t{}\t{}",
            tx.created_at.format("%Y-%m-%d %H:%M:%S"),
            tx.amount,
            tx.source.as_str(),
            source_id
        );
    }
    Ok(())
}

async fn reset_cmd() -> Result<()> {
    let store = CacheStore::open_default()?;
    store.clear().await?;
    println!("local cache cleared");
    Ok(())
}

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Clone, ValueEnum)]
pub enum StoreKind {
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum SourceKind {
    LessonComplete,
    QuizComplete,
}

#[derive(Debug, Parser, Clone)]
#[command(name = "learnquest", version, about = "LearnQuest gamification CLI/API")]
pub struct Cli {
    /// Ledger storage backend (applies to `serve` and `history`)
    #[arg(long, value_enum, default_value_t = StoreKind::Sqlite)]
    pub store: StoreKind,

    /// SQLite DB path when --store sqlite (defaults to app data dir)
    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Launch the gamification HTTP API
    Serve(ServeCmd),
    /// Report a learning event (optimistic local award, optional server sync)
    Earn(EarnCmd),
    /// Show the local gamification profile
    Profile(ProfileCmd),
    /// Pull the authoritative server snapshot into the local cache
    Sync(SyncCmd),
    /// Set the local daily XP goal (presets: 10, 20, 30, 50)
    Goal { goal: u32 },
    /// List the XP audit trail for a user (reads the ledger store directly)
    History { user: Uuid },
    /// Clear the local cache (logout)
    Reset,
}

#[derive(Debug, Args, Clone)]
pub struct ServeCmd {
    /// Bind address (host:port)
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub addr: String,
}

#[derive(Debug, Args, Clone)]
pub struct RemoteOpts {
    /// Base URL of the gamification API (e.g. http://127.0.0.1:8080)
    #[arg(long)]
    pub server: Option<String>,

    /// Authenticated user id for server sync
    #[arg(long)]
    pub user: Option<Uuid>,
}

#[derive(Debug, Args, Clone)]
pub struct EarnCmd {
    #[arg(long, value_enum)]
    pub source: SourceKind,

    /// Quiz score 0..=100 (required for quiz-complete)
    #[arg(long)]
    pub score: Option<u32>,

    /// Lesson identifier for progress tracking
    #[arg(long)]
    pub lesson: Option<String>,

    #[command(flatten)]
    pub remote: RemoteOpts,
}

#[derive(Debug, Args, Clone)]
pub struct ProfileCmd {
    #[command(flatten)]
    pub remote: RemoteOpts,
}

#[derive(Debug, Args, Clone)]
pub struct SyncCmd {
    /// Base URL of the gamification API
    #[arg(long)]
    pub server: String,

    /// Authenticated user id
    #[arg(long)]
    pub user: Uuid,
}

use directories::ProjectDirs;
use std::path::PathBuf;

pub fn data_root() -> PathBuf {
    // org = "learnquest", app = "LearnQuest"
    if let Some(pd) = ProjectDirs::from("com", "learnquest", "LearnQuest") {
        pd.data_dir().to_path_buf()
    } else {
        // Fallback: current dir
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
}

pub fn default_store_file() -> (PathBuf, PathBuf) {
    let root = data_root();
    let file = root.join("learnquest-cache.json");
    let backups = root.join("backups");
    (file, backups)
}

use chrono::{DateTime, Utc};
use learnquest_core::{ClientCache, CoreError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::task;

pub mod paths;

const FILE_VERSION: u32 = 1;

/// On-disk image of the durable cache subset. Transient fields (pending XP
/// gains, UI flags) are skipped by the cache's own serde attributes.
#[derive(Clone, Serialize, Deserialize)]
struct FileImage {
    version: u32,
    updated_at: DateTime<Utc>,
    cache: ClientCache,
}

/// Persistence adapter for the client gamification cache: atomic tempfile
/// writes with timestamped, rotated backups.
pub struct CacheStore {
    path: PathBuf,
    backups_dir: PathBuf,
    max_backups: usize,
}

impl CacheStore {
    pub fn open_default() -> Result<Self, CoreError> {
        let (file, backups) = paths::default_store_file();
        Self::open_with(file, backups, 10)
    }

    pub fn open_with(
        path: PathBuf,
        backups_dir: PathBuf,
        max_backups: usize,
    ) -> Result<Self, CoreError> {
        ensure_parent_dirs(&path)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            path,
            backups_dir,
            max_backups: max_backups.max(1),
        })
    }

    /// Rehydrates the cache from disk; a missing file yields the initial
    /// state rather than an error (first page load).
    pub async fn load(&self) -> Result<ClientCache, CoreError> {
        if !self.path.exists() {
            return Ok(ClientCache::new());
        }
        let p = self.path.clone();
        let img: FileImage = task::spawn_blocking(move || {
            let mut f = fs::File::open(&p)?;
            let mut buf = String::new();
            f.read_to_string(&mut buf)?;
            let v = serde_json::from_str::<FileImage>(&buf)?;
            Ok::<FileImage, std::io::Error>(v)
        })
        .await
        .map_err(|_| CoreError::Storage("io"))
        .and_then(|r| r.map_err(|_| CoreError::Storage("io")))?;
        Ok(img.cache)
    }

    pub async fn save(&self, cache: &ClientCache) -> Result<(), CoreError> {
        let img = FileImage {
            version: FILE_VERSION,
            updated_at: Utc::now(),
            cache: cache.clone(),
        };
        let path = self.path.clone();
        let backups = self.backups_dir.clone();
        let keep = self.max_backups;

        task::spawn_blocking(move || write_with_backup(&path, &backups, keep, &img))
            .await
            .map_err(|_| CoreError::Storage("io"))?
            .map_err(|_| CoreError::Storage("io"))?;
        Ok(())
    }

    /// Deletes the on-disk cache (explicit logout/reset).
    pub async fn clear(&self) -> Result<(), CoreError> {
        let p = self.path.clone();
        task::spawn_blocking(move || {
            if p.exists() {
                fs::remove_file(&p)?;
            }
            Ok::<(), std::io::Error>(())
        })
        .await
        .map_err(|_| CoreError::Storage("io"))?
        .map_err(|_| CoreError::Storage("io"))
    }
}

fn ensure_parent_dirs(path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    Ok(())
}

fn ensure_dir(path: &Path) -> Result<(), CoreError> {
    fs::create_dir_all(path).map_err(|_| CoreError::Storage("io"))
}

fn write_with_backup(
    path: &Path,
    backups_dir: &Path,
    max_backups: usize,
    img: &FileImage,
) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::create_dir_all(backups_dir)?;

    let json = serde_json::to_vec_pretty(img).expect("serialize");
    let mut tmp = NamedTempFile::new_in(path.parent().unwrap_or_else(|| Path::new(".")))?;
    tmp.write_all(&json)?;
    tmp.flush()?;
    let _ = fs::remove_file(path);
    tmp.persist(path)?;

    // Backup rotation
    let ts = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let backup_name = format!("learnquest-{ts}.json");
    let backup_path = backups_dir.join(backup_name);
    let mut btmp = NamedTempFile::new_in(backups_dir)?;
    btmp.write_all(&json)?;
    btmp.flush()?;
    let _ = fs::remove_file(&backup_path);
    btmp.persist(&backup_path)?;

    rotate_backups(backups_dir, max_backups)?;

    Ok(())
}

fn rotate_backups(dir: &Path, keep: usize) -> Result<(), std::io::Error> {
    let mut entries: Vec<_> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    entries.sort_by_key(|e| e.metadata().and_then(|m| m.modified()).ok());
    if entries.len() > keep {
        for e in &entries[0..entries.len() - keep] {
            let _ = fs::remove_file(e.path());
        }
    }
    Ok(())
}

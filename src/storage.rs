use crate::errors::TrackerError;
use crate::models::{AppData, Task};
use crate::progression::{Progression, WEEK_SLOTS};
use crate::tasks::TaskStore;
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::error;

pub const KEY_TASKS: &str = "tasks";
pub const KEY_LEVEL: &str = "level";
pub const KEY_STREAK: &str = "streak";
pub const KEY_TOTAL_COMPLETED: &str = "totalCompletedTasks";
pub const KEY_BADGES: &str = "badges";
pub const KEY_WEEK_DATA: &str = "weekData";

pub const ALL_KEYS: [&str; 6] = [
    KEY_TASKS,
    KEY_LEVEL,
    KEY_STREAK,
    KEY_TOTAL_COMPLETED,
    KEY_BADGES,
    KEY_WEEK_DATA,
];

/// Keyed JSON entries, one file per key under a data directory.
#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub async fn ensure_dir(&self) -> Result<(), TrackerError> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Reads every entry. Missing or unreadable entries fall back to defaults.
    pub async fn load(&self) -> AppData {
        let defaults = Progression::default();
        let tasks: Vec<Task> = self.load_entry(KEY_TASKS).await.unwrap_or_default();
        let level: u32 = self.load_entry(KEY_LEVEL).await.unwrap_or(defaults.level);
        let week_data: [u32; WEEK_SLOTS] = self
            .load_entry(KEY_WEEK_DATA)
            .await
            .unwrap_or(defaults.week_data);

        let mut badges: Vec<String> = self.load_entry(KEY_BADGES).await.unwrap_or_default();
        let mut seen = std::collections::HashSet::new();
        badges.retain(|badge| seen.insert(badge.clone()));

        AppData {
            tasks: TaskStore::new(tasks),
            progression: Progression {
                level: level.max(1),
                streak: self.load_entry(KEY_STREAK).await.unwrap_or(defaults.streak),
                total_completed_tasks: self
                    .load_entry(KEY_TOTAL_COMPLETED)
                    .await
                    .unwrap_or(defaults.total_completed_tasks),
                badges,
                week_data,
            },
        }
    }

    /// Writes every entry.
    pub async fn persist(&self, data: &AppData) -> Result<(), TrackerError> {
        let progression = &data.progression;
        self.write_entry(KEY_TASKS, &data.tasks).await?;
        self.write_entry(KEY_LEVEL, &progression.level).await?;
        self.write_entry(KEY_STREAK, &progression.streak).await?;
        self.write_entry(KEY_TOTAL_COMPLETED, &progression.total_completed_tasks)
            .await?;
        self.write_entry(KEY_BADGES, &progression.badges).await?;
        self.write_entry(KEY_WEEK_DATA, &progression.week_data).await?;
        Ok(())
    }

    /// Removes every entry. Entries that are already gone are fine.
    pub async fn clear(&self) -> Result<(), TrackerError> {
        for key in ALL_KEYS {
            match fs::remove_file(self.entry_path(key)).await {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    async fn load_entry<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.entry_path(key);
        match fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(value) => Some(value),
                Err(err) => {
                    error!("failed to parse {key} entry: {err}");
                    None
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                error!("failed to read {key} entry: {err}");
                None
            }
        }
    }

    async fn write_entry<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), TrackerError> {
        let payload = serde_json::to_vec(value)?;
        fs::write(self.entry_path(key), payload).await?;
        Ok(())
    }
}

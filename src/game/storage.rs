use std::{fs, path::PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Where the best score lives between runs. Loading never fails; anything unreadable is 0.
pub trait BestScoreStore {
    fn load(&self) -> u32;
    fn save(&mut self, best: u32) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Record {
    best: u32,
}

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl BestScoreStore for FileStore {
    fn load(&self) -> u32 {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("no best score at {}: {e}", self.path.display());
                return 0;
            },
        };
        match serde_json::from_str::<Record>(&raw) {
            Ok(record) => record.best,
            Err(e) => {
                warn!("ignoring unreadable best score at {}: {e}", self.path.display());
                0
            },
        }
    }

    fn save(&mut self, best: u32) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).wrap_err_with(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_string(&Record { best })?;
        fs::write(&self.path, json).wrap_err_with(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub stored: Option<u32>,
    pub writes: Vec<u32>,
    pub fail: bool,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with_best(best: u32) -> Self {
        Self { stored: Some(best), ..Self::default() }
    }
}

#[cfg(test)]
impl BestScoreStore for MemoryStore {
    fn load(&self) -> u32 {
        self.stored.unwrap_or(0)
    }

    fn save(&mut self, best: u32) -> Result<()> {
        if self.fail {
            color_eyre::eyre::bail!("store is read-only");
        }
        self.stored = Some(best);
        self.writes.push(best);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("flappy-rs-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_file_loads_zero() {
        let store = FileStore::new(scratch("missing").join("best.json"));
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn test_garbage_loads_zero() {
        let dir = scratch("garbage");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("best.json");
        fs::write(&path, "not a number").unwrap();
        assert_eq!(FileStore::new(&path).load(), 0);

        fs::write(&path, r#"{"best": -4}"#).unwrap();
        assert_eq!(FileStore::new(&path).load(), 0);
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_save_then_load() -> Result<()> {
        let dir = scratch("roundtrip");
        let path = dir.join("nested").join("best.json");
        let mut store = FileStore::new(&path);
        store.save(42)?;
        assert_eq!(fs::read_to_string(&path)?, r#"{"best":42}"#);
        assert_eq!(FileStore::new(&path).load(), 42);
        fs::remove_dir_all(dir).ok();
        Ok(())
    }
}

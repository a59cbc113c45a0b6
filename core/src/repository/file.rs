use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::Utc;

use crate::model::DentalDataMap;
use crate::repository::traits::{DataMapRepository, StoredDataMap};

const DEFAULT_FILE_NAME: &str = "data.json";

/// JSON file store for the last imported data map, kept under
/// `~/.dentadash` so view subcommands work across invocations.
#[derive(Clone)]
pub struct FileDataMapRepository {
    file_path: PathBuf,
}

impl FileDataMapRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut path = match base_dir {
            Some(dir) => dir,
            None => {
                let home_dir = dirs::home_dir()
                    .ok_or_else(|| anyhow!("Could not determine home directory"))?;
                home_dir.join(".dentadash")
            }
        };
        fs::create_dir_all(&path)?;
        path.push(DEFAULT_FILE_NAME);
        Ok(FileDataMapRepository { file_path: path })
    }
}

impl DataMapRepository for FileDataMapRepository {
    fn load(&self) -> Result<Option<StoredDataMap>> {
        if !self.file_path.exists() {
            return Ok(None);
        }
        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        let stored = serde_json::from_reader(reader)?;
        Ok(Some(stored))
    }

    fn save(&self, data: &DentalDataMap) -> Result<StoredDataMap> {
        let stored = StoredDataMap {
            imported_at: Utc::now(),
            data: data.clone(),
        };
        let file = File::create(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &stored)?;
        writer.flush()?;
        Ok(stored)
    }

    fn clear(&self) -> Result<()> {
        if self.file_path.exists() {
            fs::remove_file(&self.file_path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileDataMapRepository::new(Some(dir.path().to_path_buf())).unwrap();

        assert!(repo.load().unwrap().is_none());

        let map = demo::generate_data_map();
        let stored = repo.save(&map).unwrap();
        assert_eq!(stored.data, map);

        let loaded = repo.load().unwrap().expect("stored data should exist");
        assert_eq!(loaded.data, map);
        assert_eq!(loaded.imported_at, stored.imported_at);
    }

    #[test]
    fn save_replaces_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileDataMapRepository::new(Some(dir.path().to_path_buf())).unwrap();

        repo.save(&demo::generate_data_map()).unwrap();
        let second = demo::generate_data_map();
        repo.save(&second).unwrap();

        assert_eq!(repo.load().unwrap().unwrap().data, second);
    }

    #[test]
    fn clear_removes_the_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileDataMapRepository::new(Some(dir.path().to_path_buf())).unwrap();
        repo.save(&demo::generate_data_map()).unwrap();
        repo.clear().unwrap();
        assert!(repo.load().unwrap().is_none());
        // Clearing twice is fine.
        repo.clear().unwrap();
    }
}

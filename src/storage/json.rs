use std::{
    fs::{self, OpenOptions, rename, write},
    path::PathBuf,
};

use fs2::FileExt;
use serde_json::to_string_pretty;
use uuid::Uuid;

use crate::{
    models::document::Document,
    storage::{Storage, StorageError},
};

/// The whole document as one pretty-printed JSON blob at a fixed path,
/// overwritten wholesale after every mutation.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        PathBuf::from(format!("{}.{}", self.path.display(), suffix))
    }

    /// Keep the unparseable blob around before resetting, so a hand edit
    /// gone wrong is not lost silently.
    fn preserve_corrupt(&self, content: &str) {
        let _ = write(self.sibling("corrupt"), content);
    }

    /// Snapshot the previous blob next to the live file. Skipped when
    /// there is nothing to back up yet.
    fn backup_previous(&self) -> Result<(), StorageError> {
        if !self.path.exists() {
            return Ok(());
        }

        let backup_path = self.sibling("bak");
        fs::copy(&self.path, &backup_path).map_err(|e| StorageError::BackupFailed {
            path: backup_path,
            source: e,
        })?;
        Ok(())
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Document {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return Document::default();
        };

        match serde_json::from_str::<Document>(&content) {
            Ok(document) => document,
            Err(_) => {
                self.preserve_corrupt(&content);
                Document::default()
            }
        }
    }

    fn save(&self, document: &Document) -> Result<(), StorageError> {
        let json =
            to_string_pretty(document).map_err(|e| StorageError::SerializeFailed { source: e })?;

        let temp_path = self.sibling(&format!("tmp.{}", Uuid::new_v4()));
        write(&temp_path, json).map_err(|e| StorageError::SaveFailed {
            path: temp_path.clone(),
            source: e,
        })?;

        let lock_file_path = self.path.with_extension("lock");
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .open(&lock_file_path)
            .map_err(|e| StorageError::SaveFailed {
                path: lock_file_path.clone(),
                source: e,
            })?;
        lock_file
            .lock_exclusive()
            .map_err(|e| StorageError::SaveFailed {
                path: lock_file_path,
                source: e,
            })?;

        self.backup_previous()?;

        rename(&temp_path, &self.path).map_err(|e| StorageError::SaveFailed {
            path: self.path.clone(),
            source: e,
        })?;

        lock_file.unlock().map_err(|e| StorageError::SaveFailed {
            path: self.path.clone(),
            source: e,
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use jiff::Timestamp;

    fn fresh_dir(name: &str) -> PathBuf {
        let dir = PathBuf::from("/tmp").join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_round_trip_reproduces_every_field() {
        let dir = fresh_dir("projectsphere_roundtrip_test");
        let storage = JsonFileStorage::new(dir.join("store.json"));

        let mut document = Document::default();
        let p1 = &mut document.projects[0];
        p1.submission.link = String::from("https://github.com/group-a/attendance");
        p1.submission.note = String::from("Final build");
        p1.submission.submitted_at = Some(Timestamp::now());
        p1.submission.marks = Some(88);
        p1.submission.remark = Some(String::from("Well structured"));

        storage.save(&document).unwrap();
        let loaded = storage.load();

        assert_eq!(loaded, document);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_loads_default() {
        let dir = fresh_dir("projectsphere_missing_test");
        let storage = JsonFileStorage::new(dir.join("store.json"));

        let document = storage.load();

        assert_eq!(document.projects.len(), 2);
        assert_eq!(document.projects[0].id, "p1");
        assert_eq!(document.projects[1].id, "p2");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_malformed_blob_resets_to_default() {
        let dir = fresh_dir("projectsphere_malformed_test");
        let path = dir.join("store.json");
        fs::write(&path, "{ this is not valid json }").unwrap();

        let storage = JsonFileStorage::new(path.clone());
        let document = storage.load();

        assert_eq!(document, Document::default());
        assert!(
            dir.join("store.json.corrupt").exists(),
            "Corrupt blob should be preserved next to the store"
        );

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_blob_without_projects_sequence_resets_to_default() {
        let dir = fresh_dir("projectsphere_shape_test");
        let storage = JsonFileStorage::new(dir.join("store.json"));

        fs::write(dir.join("store.json"), r#"{"settings": {"theme": "dark"}}"#).unwrap();
        assert_eq!(storage.load(), Document::default());

        fs::write(dir.join("store.json"), r#"{"projects": 42}"#).unwrap();
        assert_eq!(storage.load(), Document::default());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_wire_format_uses_camel_case_keys() {
        let dir = fresh_dir("projectsphere_wire_test");
        let path = dir.join("store.json");
        let storage = JsonFileStorage::new(path.clone());

        storage.save(&Document::default()).unwrap();
        let content = fs::read_to_string(&path).unwrap();

        assert!(content.contains("\"dueDate\""));
        assert!(content.contains("\"submittedAt\""));
        assert!(content.contains("\"Group A\""));
        assert!(content.contains("\"On Track\""));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_second_save_keeps_a_backup_of_the_previous_blob() {
        let dir = fresh_dir("projectsphere_backup_test");
        let path = dir.join("store.json");
        let storage = JsonFileStorage::new(path.clone());

        let first = Document::default();
        storage.save(&first).unwrap();
        assert!(!dir.join("store.json.bak").exists());

        let mut second = Document::default();
        second.projects[0].progress = 99;
        storage.save(&second).unwrap();

        let backup: Document =
            serde_json::from_str(&fs::read_to_string(dir.join("store.json.bak")).unwrap()).unwrap();
        assert_eq!(backup, first);

        let live: Document = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(live, second);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_save_leaves_no_temp_files_behind() {
        let dir = fresh_dir("projectsphere_temp_test");
        let storage = JsonFileStorage::new(dir.join("store.json"));

        storage.save(&Document::default()).unwrap();

        let leftovers = fs::read_dir(&dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp."))
            .count();
        assert_eq!(leftovers, 0);

        fs::remove_dir_all(&dir).unwrap();
    }
}

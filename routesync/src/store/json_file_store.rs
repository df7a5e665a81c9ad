use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{SessionStore, StoreError};

/// session store persisted as a flat JSON object. writes replace the file
/// through a temporary sibling and a rename, so readers never observe a
/// partially applied multi-key update.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// opens the store at `path`. a missing file is an empty store. an
    /// unreadable or corrupt file is logged and treated as empty, which
    /// reads as "no session".
    pub fn open(path: &Path) -> JsonFileStore {
        let entries = match read_entries(path) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("discarding unreadable session store: {e}");
                BTreeMap::new()
            }
        };
        JsonFileStore {
            path: path.to_path_buf(),
            entries,
        }
    }

    /// writes `entries` to disk and adopts them once the write succeeded, so
    /// a failed write leaves memory matching the file.
    fn commit(&mut self, entries: BTreeMap<String, String>) -> Result<(), StoreError> {
        self.write(&entries)?;
        self.entries = entries;
        Ok(())
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::WriteError {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&tmp, bytes).map_err(|source| StoreError::WriteError {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| StoreError::WriteError {
            path: self.path.clone(),
            source,
        })
    }
}

fn read_entries(path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let s = std::fs::read_to_string(path).map_err(|source| StoreError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    if s.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    Ok(serde_json::from_str(&s)?)
}

impl SessionStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.clone();
        entries.insert(key.to_string(), value.to_string());
        self.commit(entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut entries = self.entries.clone();
        entries.remove(key);
        self.commit(entries)
    }

    fn remove_all(&mut self, keys: &[String]) -> Result<(), StoreError> {
        let mut entries = self.entries.clone();
        let removed = keys
            .iter()
            .filter(|k| entries.remove(k.as_str()).is_some())
            .count();
        if removed > 0 {
            self.commit(entries)?;
        }
        Ok(())
    }

    fn entries(&self) -> Result<Vec<(String, String)>, StoreError> {
        Ok(self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().expect("test invariant failed: could not create temp dir");
        let path = dir.path().join("session.json");
        {
            let mut store = JsonFileStore::open(&path);
            store.set("activeRouteId", "r1").expect("write succeeds");
            store.set("currentSegmentIndex", "2").expect("write succeeds");
        }
        let store = JsonFileStore::open(&path);
        assert_eq!(store.get("activeRouteId").unwrap(), Some(String::from("r1")));
        assert_eq!(
            store.get("currentSegmentIndex").unwrap(),
            Some(String::from("2"))
        );
    }

    #[test]
    fn test_remove_all() {
        let dir = tempfile::tempdir().expect("test invariant failed: could not create temp dir");
        let path = dir.path().join("session.json");
        let mut store = JsonFileStore::open(&path);
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.set("c", "3").unwrap();
        store
            .remove_all(&[String::from("a"), String::from("b"), String::from("zz")])
            .unwrap();
        let reopened = JsonFileStore::open(&path);
        assert_eq!(
            reopened.entries().unwrap(),
            vec![(String::from("c"), String::from("3"))]
        );
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().expect("test invariant failed: could not create temp dir");
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = JsonFileStore::open(&path);
        assert_eq!(store.get("activeRouteId").unwrap(), None);
    }

    #[test]
    fn test_creates_parent_directory() {
        let dir = tempfile::tempdir().expect("test invariant failed: could not create temp dir");
        let path = dir.path().join("nested").join("session.json");
        let mut store = JsonFileStore::open(&path);
        store.set("vehicleId", "v1").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_failed_set_leaves_memory_unchanged() {
        let dir = tempfile::tempdir().expect("test invariant failed: could not create temp dir");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let mut store = JsonFileStore::open(&blocker.join("session.json"));

        assert!(store.set("activeRouteId", "r1").is_err());
        assert_eq!(store.get("activeRouteId").unwrap(), None);
        assert!(store.entries().unwrap().is_empty());
    }

    #[test]
    fn test_failed_remove_keeps_value() {
        let dir = tempfile::tempdir().expect("test invariant failed: could not create temp dir");
        let path = dir.path().join("session.json");
        let mut store = JsonFileStore::open(&path);
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        // a directory in place of the temporary file makes every write fail
        std::fs::create_dir(path.with_extension("json.tmp")).unwrap();

        assert!(store.remove("a").is_err());
        assert!(store.remove_all(&[String::from("b")]).is_err());
        assert_eq!(store.get("a").unwrap(), Some(String::from("1")));
        assert_eq!(store.get("b").unwrap(), Some(String::from("2")));
        assert_eq!(
            JsonFileStore::open(&path).entries().unwrap(),
            store.entries().unwrap()
        );
    }
}

//! File-backed ledger store.

use crate::{DeploymentRecord, Error, Result};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name-keyed map of deployment records bound to a ledger file.
///
/// The in-memory map is authoritative while the process holds it; the file
/// is only touched by [`Ledger::open`] and [`Ledger::commit`].
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
    records: BTreeMap<String, DeploymentRecord>,
}

impl Ledger {
    /// Creates an empty ledger bound to `path` without touching the disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: BTreeMap::new(),
        }
    }

    /// Loads the ledger stored at `path`.
    ///
    /// A missing file yields an empty ledger bound to `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = match fs::read(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(target: "solar::ledger", path = %path.display(), "ledger file not found, starting empty");
                return Ok(Self::new(path));
            }
            Err(err) => return Err(Error::io(path, err)),
        };

        let records: BTreeMap<String, DeploymentRecord> = serde_json::from_slice(&content)
            .map_err(|source| Error::CorruptLedger {
                path: path.clone(),
                source,
            })?;

        debug!(
            target: "solar::ledger",
            path = %path.display(),
            records = records.len(),
            "ledger loaded"
        );

        Ok(Self { path, records })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records, confirmed or not.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ledger holds no record.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether a record is stored under `name`.
    pub fn exists(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Record stored under `name`.
    pub fn get(&self, name: &str) -> Option<&DeploymentRecord> {
        self.records.get(name)
    }

    /// Inserts `record` under `name`, replacing any previous record wholesale.
    ///
    /// Returns the replaced record.
    pub fn set(&mut self, name: impl Into<String>, record: DeploymentRecord) -> Option<DeploymentRecord> {
        self.records.insert(name.into(), record)
    }

    /// Marks the named record confirmed. Does not persist.
    pub fn confirm(&mut self, name: &str) -> Result<()> {
        let record = self
            .records
            .get_mut(name)
            .ok_or_else(|| Error::UnknownRecord(name.to_string()))?;
        record.mark_confirmed();
        Ok(())
    }

    /// Snapshot of every record still waiting for confirmation, with the
    /// key it is stored under.
    ///
    /// The key is what [`Ledger::confirm`] expects; it need not match the
    /// record's own name. The returned records are copies; later ledger
    /// mutations do not show up in them.
    pub fn unconfirmed_records(&self) -> Vec<(String, DeploymentRecord)> {
        self.records
            .iter()
            .filter(|(_, record)| !record.is_confirmed())
            .map(|(key, record)| (key.clone(), record.clone()))
            .collect()
    }

    /// All records ordered by creation time, ties broken by name.
    pub fn sorted_records(&self) -> Vec<&DeploymentRecord> {
        let mut records: Vec<&DeploymentRecord> = self.records.values().collect();
        records.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.name().cmp(b.name()))
        });
        records
    }

    /// Writes the whole ledger to its file.
    ///
    /// The content goes to a temporary sibling first and is renamed over the
    /// target, so readers see either the previous or the new file.
    pub fn commit(&self) -> Result<()> {
        let mut encoded = serde_json::to_vec_pretty(&self.records).map_err(Error::Serialization)?;
        encoded.push(b'\n');

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| Error::io(parent, err))?;
            }
        }

        let temp_path = temp_path(&self.path);
        if let Err(err) = write_synced(&temp_path, &encoded) {
            discard(&temp_path);
            return Err(Error::io(&temp_path, err));
        }

        // Rename to final path (atomic on POSIX systems)
        if let Err(err) = fs::rename(&temp_path, &self.path) {
            discard(&temp_path);
            return Err(Error::io(&self.path, err));
        }

        debug!(
            target: "solar::ledger",
            path = %self.path.display(),
            records = self.records.len(),
            bytes = encoded.len(),
            "ledger committed"
        );
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_synced(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content)?;
    file.sync_all()
}

fn discard(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        if err.kind() != ErrorKind::NotFound {
            warn!(target: "solar::ledger", path = %path.display(), error = %err, "failed to remove temporary ledger file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn record(name: &str, address: &[u8], secs: i64) -> DeploymentRecord {
        DeploymentRecord::new(name, name.to_lowercase(), address.to_vec(), vec![0xff])
            .with_created_at(Utc.timestamp_opt(secs, 0).unwrap())
    }

    #[test]
    fn open_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("solar.development.json");

        let ledger = Ledger::open(&path).unwrap();
        assert!(ledger.is_empty());
        assert_eq!(ledger.path(), path.as_path());
        assert!(!path.exists());
    }

    #[test]
    fn open_malformed_file_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(&path, "{ not json").unwrap();

        match Ledger::open(&path) {
            Err(Error::CorruptLedger { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected CorruptLedger, got {other:?}"),
        }
    }

    #[test]
    fn open_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(Ledger::open(dir.path()), Err(Error::Io { .. })));
    }

    #[test]
    fn set_replaces_wholesale() {
        let mut ledger = Ledger::new("unused.json");
        assert!(ledger.set("X", record("X", &[1], 10)).is_none());
        let previous = ledger.set("X", record("X", &[2], 20)).unwrap();

        assert_eq!(previous.address(), &[1]);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get("X").unwrap().address(), &[2]);
        assert_eq!(ledger.get("X").unwrap().created_at().timestamp(), 20);
    }

    #[test]
    fn confirm_unknown_leaves_ledger_unchanged() {
        let mut ledger = Ledger::new("unused.json");
        ledger.set("A", record("A", &[1], 10));

        let err = ledger.confirm("missing").unwrap_err();
        assert!(matches!(err, Error::UnknownRecord(ref name) if name == "missing"));
        assert_eq!(ledger.len(), 1);
        assert!(!ledger.get("A").unwrap().is_confirmed());
        assert!(!ledger.exists("missing"));
    }

    #[test]
    fn confirm_is_idempotent() {
        let mut ledger = Ledger::new("unused.json");
        ledger.set("A", record("A", &[1], 10));

        ledger.confirm("A").unwrap();
        ledger.confirm("A").unwrap();
        assert!(ledger.get("A").unwrap().is_confirmed());
        assert!(ledger.unconfirmed_records().is_empty());
    }

    #[test]
    fn unconfirmed_records_is_a_snapshot() {
        let mut ledger = Ledger::new("unused.json");
        ledger.set("A", record("A", &[1], 10));
        ledger.set("B", record("B", &[2], 20));
        ledger.confirm("B").unwrap();

        let snapshot = ledger.unconfirmed_records();
        ledger.confirm("A").unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].0, "A");
        assert!(!snapshot[0].1.is_confirmed());
    }

    #[test]
    fn unconfirmed_records_carry_their_key() {
        let mut ledger = Ledger::new("unused.json");
        ledger.set("Token@v2", record("Token", &[1], 10));

        let snapshot = ledger.unconfirmed_records();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].0, "Token@v2");
        assert_eq!(snapshot[0].1.name(), "Token");
        ledger.confirm(&snapshot[0].0).unwrap();
        assert!(ledger.get("Token@v2").unwrap().is_confirmed());
    }

    #[test]
    fn sorted_records_orders_by_time_then_name() {
        let mut ledger = Ledger::new("unused.json");
        ledger.set("c", record("c", &[3], 30));
        ledger.set("b", record("b", &[2], 10));
        ledger.set("a", record("a", &[1], 10));
        ledger.set("d", record("d", &[4], 5));

        let names: Vec<&str> = ledger.sorted_records().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn commit_leaves_no_temporary_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("ledger.json");

        let mut ledger = Ledger::open(&path).unwrap();
        ledger.set("A", record("A", &[1], 10));
        ledger.commit().unwrap();

        assert!(path.exists());
        assert!(!temp_path(&path).exists());
        let entries: Vec<_> = fs::read_dir(path.parent().unwrap()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn commit_writes_pretty_json_keyed_by_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.json");

        let mut ledger = Ledger::new(&path);
        ledger.set("Token", record("Token", &[0xab], 10));
        ledger.commit().unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n  \"Token\": {\n"));
        assert!(text.ends_with("}\n"));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["Token"]["address"], "ab");
        assert_eq!(value["Token"]["txid"], "ff");
    }

    #[test]
    fn temp_path_is_a_sibling() {
        assert_eq!(
            temp_path(Path::new("/data/solar.test.json")),
            PathBuf::from("/data/solar.test.json.tmp")
        );
        assert_eq!(
            temp_path(Path::new("solar.json")),
            PathBuf::from("solar.json.tmp")
        );
    }
}

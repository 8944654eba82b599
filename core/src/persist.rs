use crate::error::{Error, Result};
use crate::index::{DocId, InvertedIndex, Postings, TermEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// On-disk form of one term: `[df, {"doc_id": tf, ...}]`.
#[derive(Serialize)]
struct EntryRef<'a>(u32, &'a Postings);

#[derive(Deserialize)]
struct EntryOwned(u32, BTreeMap<DocId, u32>);

/// A JSON snapshot of an [`InvertedIndex`] at a fixed path.
pub struct IndexStore {
    path: PathBuf,
}

impl IndexStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn exists(&self) -> bool { self.path.is_file() }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    /// Write the snapshot through a temp file and rename it into place.
    pub fn persist(&self, index: &InvertedIndex) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let snapshot: BTreeMap<&str, EntryRef<'_>> =
            index.entries().iter().map(|(term, entry)| (term.as_str(), EntryRef(entry.df, &entry.postings))).collect();

        let tmp = self.tmp_path();
        let file = File::create(&tmp).map_err(|e| Error::io(&tmp, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &snapshot)
            .map_err(|e| Error::io(&tmp, e.into()))?;
        writer.flush().map_err(|e| Error::io(&tmp, e))?;
        drop(writer);
        fs::rename(&tmp, &self.path).map_err(|e| Error::io(&self.path, e))?;

        tracing::info!(path = %self.path.display(), terms = index.len(), "persisted index snapshot");
        Ok(())
    }

    /// Read and validate the snapshot. Any structural mismatch is reported as
    /// [`Error::DataCorruption`].
    pub fn load(&self) -> Result<InvertedIndex> {
        let buf = fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))?;
        let raw: BTreeMap<String, EntryOwned> =
            serde_json::from_str(&buf).map_err(|e| Error::corrupt(&self.path, e.to_string()))?;

        let mut terms = BTreeMap::new();
        for (term, EntryOwned(df, postings)) in raw {
            self.validate(&term, df, &postings)?;
            terms.insert(term, TermEntry { df, postings });
        }
        let index = InvertedIndex::from_entries(terms);
        tracing::info!(path = %self.path.display(), terms = index.len(), "loaded index snapshot");
        Ok(index)
    }

    fn validate(&self, term: &str, df: u32, postings: &Postings) -> Result<()> {
        if postings.is_empty() {
            return Err(Error::corrupt(&self.path, format!("term {term:?} has no postings")));
        }
        if df as usize != postings.len() {
            return Err(Error::corrupt(
                &self.path,
                format!("term {term:?} has df {df} but {} postings", postings.len()),
            ));
        }
        if postings.contains_key(&0) {
            return Err(Error::corrupt(&self.path, format!("term {term:?} lists document id 0")));
        }
        if let Some((doc_id, _)) = postings.iter().find(|(_, tf)| **tf == 0) {
            return Err(Error::corrupt(&self.path, format!("term {term:?} has zero frequency in document {doc_id}")));
        }
        Ok(())
    }

    /// Load the snapshot if one exists, otherwise build, persist and return a
    /// fresh index. An existing snapshot always wins, even if it is older than
    /// the collection it was built from.
    pub fn build_or_load<F>(&self, build: F) -> Result<InvertedIndex>
    where
        F: FnOnce() -> Result<InvertedIndex>,
    {
        if self.exists() {
            tracing::warn!(path = %self.path.display(), "reusing existing index snapshot; the collection is not re-read");
            return self.load();
        }
        self.rebuild(build)
    }

    /// Build and persist unconditionally, replacing any existing snapshot.
    pub fn rebuild<F>(&self, build: F) -> Result<InvertedIndex>
    where
        F: FnOnce() -> Result<InvertedIndex>,
    {
        let index = build()?;
        self.persist(&index)?;
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::build;
    use tempfile::tempdir;

    fn sample_index() -> InvertedIndex {
        let titles = BTreeMap::from([(1, vec!["wing".to_string()])]);
        let bodies = BTreeMap::from([
            (1, vec!["wing".to_string(), "shock".to_string()]),
            (12, vec!["shock".to_string()]),
        ]);
        build(&titles, &bodies)
    }

    #[test]
    fn round_trips_through_json() {
        let dir = tempdir().unwrap();
        let store = IndexStore::new(dir.path().join("index.json"));
        let index = sample_index();
        store.persist(&index).unwrap();
        assert_eq!(store.load().unwrap(), index);
        assert!(!store.tmp_path().exists());
    }

    #[test]
    fn writes_df_and_postings_pairs() {
        let dir = tempdir().unwrap();
        let store = IndexStore::new(dir.path().join("index.json"));
        store.persist(&sample_index()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(json["shock"], serde_json::json!([2, {"1": 1, "12": 1}]));
        assert_eq!(json["wing"], serde_json::json!([1, {"1": 2}]));
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let store = IndexStore::new(dir.path().join("nested/deeper/index.json"));
        store.persist(&InvertedIndex::new()).unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    fn corrupt_reason(contents: &str) -> String {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.json");
        fs::write(&path, contents).unwrap();
        match IndexStore::new(&path).load() {
            Err(Error::DataCorruption { reason, .. }) => reason,
            other => panic!("expected corruption, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_snapshots() {
        corrupt_reason("{not json");
        corrupt_reason(r#"["wing"]"#);
        corrupt_reason(r#"{"wing": {"df": 1, "postings": {"1": 1}}}"#);
        corrupt_reason(r#"{"wing": [1, {"one": 1}]}"#);
        corrupt_reason(r#"{"wing": [1, {"-3": 1}]}"#);
        corrupt_reason(r#"{"wing": [1, {"1": 1.5}]}"#);
    }

    #[test]
    fn rejects_inconsistent_entries() {
        assert!(corrupt_reason(r#"{"wing": [2, {"1": 1}]}"#).contains("df 2"));
        assert!(corrupt_reason(r#"{"wing": [0, {}]}"#).contains("no postings"));
        assert!(corrupt_reason(r#"{"wing": [1, {"0": 1}]}"#).contains("id 0"));
        assert!(corrupt_reason(r#"{"wing": [1, {"4": 0}]}"#).contains("zero frequency"));
    }

    #[test]
    fn missing_snapshot_is_io_error() {
        let dir = tempdir().unwrap();
        let err = IndexStore::new(dir.path().join("absent.json")).load().unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn build_or_load_builds_once() {
        let dir = tempdir().unwrap();
        let store = IndexStore::new(dir.path().join("index.json"));
        let first = store.build_or_load(|| Ok(sample_index())).unwrap();
        assert!(store.exists());
        let second = store.build_or_load(|| panic!("snapshot exists, builder must not run")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn rebuild_replaces_snapshot() {
        let dir = tempdir().unwrap();
        let store = IndexStore::new(dir.path().join("index.json"));
        store.persist(&sample_index()).unwrap();
        let fresh = store.rebuild(|| Ok(InvertedIndex::new())).unwrap();
        assert!(fresh.is_empty());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn corrupt_snapshot_is_not_rebuilt() {
        let dir = tempdir().unwrap();
        let store = IndexStore::new(dir.path().join("index.json"));
        fs::write(store.path(), "garbage").unwrap();
        let err = store.build_or_load(|| Ok(sample_index())).unwrap_err();
        assert!(matches!(err, Error::DataCorruption { .. }));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "garbage");
    }
}

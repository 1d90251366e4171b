use super::loader::{LoadOptions, PresetSnapshot, load};
use super::{PresetEntry, PresetError, PresetKind, StructuredPreset};
use parking_lot::{Mutex, RwLock};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Cached, reloadable view of a preset directory.
///
/// Readers get an `Arc` to an immutable snapshot. A reload builds the new
/// snapshot without holding the read lock and swaps it in, so a reader sees
/// either the old mapping or the new one, never a mix.
pub struct PresetStore {
    root: PathBuf,
    options: LoadOptions,
    snapshot: RwLock<Option<Arc<PresetSnapshot>>>,
    /// Serializes loads so concurrent first reads don't each walk the tree.
    load_lock: Mutex<()>,
}

impl PresetStore {
    pub fn new(root: impl Into<PathBuf>, options: LoadOptions) -> Self {
        Self {
            root: root.into(),
            options,
            snapshot: RwLock::new(None),
            load_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.read().is_some()
    }

    /// Current snapshot, loading it on first access.
    pub fn presets(&self) -> Result<Arc<PresetSnapshot>, PresetError> {
        if let Some(snapshot) = self.snapshot.read().as_ref() {
            return Ok(Arc::clone(snapshot));
        }

        let _guard = self.load_lock.lock();
        // Another caller may have finished loading while we waited.
        if let Some(snapshot) = self.snapshot.read().as_ref() {
            return Ok(Arc::clone(snapshot));
        }
        self.load_and_swap()
    }

    /// Rebuild the cache from disk and replace it wholesale.
    ///
    /// On error the previous snapshot stays in place.
    pub fn reload(&self) -> Result<Arc<PresetSnapshot>, PresetError> {
        let _guard = self.load_lock.lock();
        self.load_and_swap()
    }

    /// Drop the cached snapshot; the next read loads from disk.
    pub fn invalidate(&self) {
        debug!(root = %self.root.display(), "preset cache invalidated");
        *self.snapshot.write() = None;
    }

    pub fn get(&self, key: &str) -> Result<PresetEntry, PresetError> {
        self.presets()?
            .get(key)
            .cloned()
            .ok_or_else(|| PresetError::MissingKey(key.to_string()))
    }

    /// Text of a simple preset.
    pub fn get_text(&self, key: &str) -> Result<String, PresetError> {
        match self.get(key)? {
            PresetEntry::Simple { text } => Ok(text),
            other => Err(wrong_kind(key, PresetKind::Simple, &other)),
        }
    }

    pub fn get_structured(&self, key: &str) -> Result<StructuredPreset, PresetError> {
        match self.get(key)? {
            PresetEntry::Structured(preset) => Ok(preset),
            other => Err(wrong_kind(key, PresetKind::Structured, &other)),
        }
    }

    /// All keys in load order.
    pub fn keys(&self) -> Result<Vec<String>, PresetError> {
        Ok(self.presets()?.keys().map(str::to_string).collect())
    }

    pub fn keys_of(&self, kind: PresetKind) -> Result<Vec<String>, PresetError> {
        Ok(self.presets()?.keys_of(kind).map(str::to_string).collect())
    }

    fn load_and_swap(&self) -> Result<Arc<PresetSnapshot>, PresetError> {
        let snapshot = Arc::new(load(&self.root, &self.options)?);
        *self.snapshot.write() = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }
}

fn wrong_kind(key: &str, expected: PresetKind, actual: &PresetEntry) -> PresetError {
    PresetError::WrongKind {
        key: key.to_string(),
        expected,
        actual: actual.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn store_with(files: &[(&str, &str)]) -> (TempDir, PresetStore) {
        let tmp = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(tmp.path().join(name), content).unwrap();
        }
        let store = PresetStore::new(tmp.path(), LoadOptions::default());
        (tmp, store)
    }

    #[test]
    fn loads_lazily_on_first_read() {
        let (_tmp, store) = store_with(&[("styles.csv", "name,prompt\nink,ink drawing\n")]);
        assert!(!store.is_loaded());
        assert_eq!(store.get_text("styles: ink").unwrap(), "ink drawing");
        assert!(store.is_loaded());
    }

    #[test]
    fn missing_key_is_reported() {
        let (_tmp, store) = store_with(&[("styles.csv", "name,prompt\nink,ink drawing\n")]);
        let err = store.get("styles: oil").unwrap_err();
        assert!(matches!(err, PresetError::MissingKey(key) if key == "styles: oil"));
    }

    #[test]
    fn typed_accessors_check_kind() {
        let (_tmp, store) = store_with(&[
            ("styles.csv", "name,prompt\nink,ink drawing\n"),
            ("chars.json", r#"{ "hero": { "positive_prompt": "knight" } }"#),
        ]);
        assert_eq!(store.get_structured("chars: hero").unwrap().positive_prompt, "knight");
        let err = store.get_structured("styles: ink").unwrap_err();
        assert!(matches!(
            err,
            PresetError::WrongKind { expected: PresetKind::Structured, actual: PresetKind::Simple, .. }
        ));
    }

    #[test]
    fn reload_replaces_snapshot_wholesale() {
        let (tmp, store) = store_with(&[("styles.csv", "name,prompt\nink,ink drawing\n")]);
        let before = store.presets().unwrap();

        fs::write(tmp.path().join("styles.csv"), "name,prompt\noil,oil painting\n").unwrap();
        assert!(store.presets().unwrap().contains("styles: ink"));

        let after = store.reload().unwrap();
        assert!(!after.contains("styles: ink"));
        assert!(after.contains("styles: oil"));
        // Readers holding the old snapshot keep a consistent view.
        assert!(before.contains("styles: ink"));
    }

    #[test]
    fn failed_reload_keeps_previous_snapshot() {
        let (tmp, store) = store_with(&[("styles.csv", "name,prompt\nink,ink drawing\n")]);
        store.presets().unwrap();

        fs::write(tmp.path().join("broken.json"), "{").unwrap();
        assert!(store.reload().is_err());
        assert_eq!(store.get_text("styles: ink").unwrap(), "ink drawing");
    }

    #[test]
    fn invalidate_forces_reload() {
        let (tmp, store) = store_with(&[("styles.csv", "name,prompt\nink,ink drawing\n")]);
        store.presets().unwrap();
        fs::write(tmp.path().join("more.yml"), "sketch: pencil sketch\n").unwrap();

        store.invalidate();
        assert!(!store.is_loaded());
        assert_eq!(store.get_text("more: sketch").unwrap(), "pencil sketch");
    }

    #[test]
    fn concurrent_readers_share_one_snapshot() {
        let (_tmp, store) = store_with(&[("styles.csv", "name,prompt\nink,ink drawing\n")]);
        let store = Arc::new(store);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.presets().unwrap())
            })
            .collect();
        let snapshots: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for snapshot in &snapshots[1..] {
            assert!(Arc::ptr_eq(&snapshots[0], snapshot));
        }
    }
}

use crate::dlog;
use crate::types::Workout;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const WORKOUTS_KEY: &str = "workouts";

/// A string key-value slot store.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// One `<key>.json` file per slot inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates `dir` if needed.
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir).with_context(|| format!("creating data dir: {}", dir.display()))?;
        tracing::debug!(dir = %dir.display(), "file storage ready");
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key);
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading slot: {}", path.display())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key);

        // Write next to the target, then rename over it.
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("creating temp file in: {}", self.dir.display()))?;
        tmp.write_all(value.as_bytes())
            .with_context(|| format!("writing temp file: {}", tmp.path().display()))?;
        tmp.persist(&path)
            .with_context(|| format!("replacing slot: {}", path.display()))?;

        dlog!("slot_written key={key} bytes={}", value.len());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.slot_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing slot: {}", path.display())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.slots.remove(key);
        Ok(())
    }
}

/// Workouts in creation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutStore {
    workouts: Vec<Workout>,
}

impl WorkoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the slot; a missing slot or a JSON `null` is an empty store.
    pub fn load(storage: &impl Storage, key: &str) -> Result<Self> {
        let Some(raw) = storage.get(key)? else {
            dlog!("slot_empty key={key}");
            return Ok(Self::new());
        };

        let workouts: Option<Vec<Workout>> =
            serde_json::from_str(&raw).with_context(|| format!("parsing slot {key:?}"))?;
        let workouts = workouts.unwrap_or_default();
        tracing::info!(key, workouts = workouts.len(), "store loaded");

        Ok(Self { workouts })
    }

    /// Overwrites the slot with the whole store.
    pub fn save(&self, storage: &mut impl Storage, key: &str) -> Result<()> {
        let json = self.to_json()?;
        storage
            .set(key, &json)
            .with_context(|| format!("saving slot {key:?}"))?;
        dlog!("store_saved key={key} workouts={}", self.workouts.len());
        Ok(())
    }

    /// Removes the slot and empties the store.
    pub fn clear(&mut self, storage: &mut impl Storage, key: &str) -> Result<()> {
        storage
            .remove(key)
            .with_context(|| format!("clearing slot {key:?}"))?;
        self.workouts.clear();
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.workouts).context("serializing workouts")
    }

    pub fn push(&mut self, workout: Workout) {
        self.workouts.push(workout);
    }

    pub fn pop(&mut self) -> Option<Workout> {
        self.workouts.pop()
    }

    pub fn find(&self, id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Workout> {
        self.workouts.iter()
    }

    pub fn as_slice(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }
}

impl<'a> IntoIterator for &'a WorkoutStore {
    type Item = &'a Workout;
    type IntoIter = std::slice::Iter<'a, Workout>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coordinates, Extra, WorkoutInput};
    use crate::form::WorkoutForm;
    use chrono::{Local, TimeZone};

    fn sample(id: &str, extra: Extra) -> Workout {
        let at = Local.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        Workout::new(
            id.to_string(),
            at,
            Coordinates::new(48.85, 2.35),
            WorkoutInput {
                distance_km: 10.0,
                duration_min: 50.0,
                extra,
            },
        )
    }

    fn slot(storage: &MemoryStorage) -> String {
        storage.get(WORKOUTS_KEY).unwrap().unwrap()
    }

    #[test]
    fn missing_or_null_slot_is_empty() {
        let mut storage = MemoryStorage::new();
        assert!(WorkoutStore::load(&storage, WORKOUTS_KEY).unwrap().is_empty());

        storage.set(WORKOUTS_KEY, "null").unwrap();
        assert!(WorkoutStore::load(&storage, WORKOUTS_KEY).unwrap().is_empty());
    }

    #[test]
    fn malformed_slot_is_an_error() {
        let mut storage = MemoryStorage::new();
        storage.set(WORKOUTS_KEY, "{not json").unwrap();
        let err = WorkoutStore::load(&storage, WORKOUTS_KEY).unwrap_err();
        assert!(format!("{err:#}").contains("parsing slot"));
    }

    #[test]
    fn save_load_save_is_stable() {
        let mut store = WorkoutStore::new();
        store.push(sample("1000000001", Extra::Cadence(170.0)));
        store.push(sample("1000000002", Extra::Elevation(-35.5)));

        let mut storage = MemoryStorage::new();
        store.save(&mut storage, WORKOUTS_KEY).unwrap();
        let first = slot(&storage);

        let loaded = WorkoutStore::load(&storage, WORKOUTS_KEY).unwrap();
        assert_eq!(loaded, store);

        loaded.save(&mut storage, WORKOUTS_KEY).unwrap();
        assert_eq!(slot(&storage), first);
    }

    #[test]
    fn repeating_metrics_survive_reload_bit_for_bit() {
        let at = Local.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        let forms = [
            WorkoutForm::running("0.07", "31", "160"),
            WorkoutForm::running("3.3", "17", "172"),
            WorkoutForm::cycling("0.07", "31", "12"),
            WorkoutForm::cycling("99.97362086258775", "203", "410.5"),
        ];

        let mut store = WorkoutStore::new();
        for (i, form) in forms.iter().enumerate() {
            let input = form.validate().unwrap();
            let id = format!("{:010}", i + 1);
            store.push(Workout::new(id, at, Coordinates::new(-33.87, 151.21), input));
        }

        let mut storage = MemoryStorage::new();
        store.save(&mut storage, WORKOUTS_KEY).unwrap();
        let first = slot(&storage);
        assert!(first.contains("442.85714285714283"), "{first}");

        let loaded = WorkoutStore::load(&storage, WORKOUTS_KEY).unwrap();
        for (a, b) in loaded.iter().zip(store.iter()) {
            assert_eq!(a.metric().to_bits(), b.metric().to_bits(), "{}", a.id);
            assert_eq!(a.distance_km.to_bits(), b.distance_km.to_bits(), "{}", a.id);
        }
        assert_eq!(loaded, store);

        loaded.save(&mut storage, WORKOUTS_KEY).unwrap();
        assert_eq!(slot(&storage), first);
    }

    #[test]
    fn find_is_first_match_in_order() {
        let mut store = WorkoutStore::new();
        store.push(sample("a", Extra::Cadence(170.0)));
        store.push(sample("b", Extra::Elevation(12.0)));
        assert_eq!(store.find("b").unwrap().id, "b");
        assert!(store.find("c").is_none());
        let ids: Vec<_> = store.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn clear_removes_slot() {
        let mut storage = MemoryStorage::new();
        let mut store = WorkoutStore::new();
        store.push(sample("a", Extra::Cadence(170.0)));
        store.save(&mut storage, WORKOUTS_KEY).unwrap();

        store.clear(&mut storage, WORKOUTS_KEY).unwrap();
        assert!(store.is_empty());
        assert_eq!(storage.get(WORKOUTS_KEY).unwrap(), None);
    }

    #[test]
    fn file_storage_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(&tmp.path().join("data")).unwrap();
        assert_eq!(storage.get("k").unwrap(), None);

        storage.set("k", "[1]").unwrap();
        storage.set("k", "[2]").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("[2]"));
        assert!(storage.slot_path("k").is_file());

        storage.remove("k").unwrap();
        storage.remove("k").unwrap();
        assert_eq!(storage.get("k").unwrap(), None);
    }
}

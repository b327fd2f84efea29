//! Workout library
//!
//! A file-backed list of saved [`WorkoutDefinition`]s, stored as a single
//! JSON array with camelCase keys. The list order is the display order:
//! new workouts go to the front.
//!
//! Reading is deliberately forgiving. A corrupt file reads as an empty
//! library and individual entries that cannot be turned into a valid
//! definition are skipped, so one bad record never hides the rest.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::ConfigLimits;
use crate::error::LibraryError;
use crate::workout::{Exercise, TimingConfig, TimingSpec, WorkoutDefinition};

/// Default library file name, relative to the working directory.
pub const DEFAULT_LIBRARY_FILE: &str = "workouts.json";

/// File-backed workout store.
///
/// Every operation reads the file afresh and writes the whole list back;
/// the library holds no in-memory state besides its path and phase limit.
#[derive(Debug, Clone)]
pub struct WorkoutLibrary {
    path: PathBuf,
    max_phases: usize,
}

impl WorkoutLibrary {
    /// Opens the library at `path`. The file need not exist yet.
    ///
    /// The phase limit comes from [`ConfigLimits::default`].
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_phases: ConfigLimits::default().max_phases,
        }
    }

    /// Sets the largest phase count a stored workout may expand to.
    #[must_use]
    pub fn with_max_phases(mut self, max_phases: usize) -> Self {
        self.max_phases = max_phases;
        self
    }

    #[must_use]
    pub const fn max_phases(&self) -> usize {
        self.max_phases
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns all stored workouts in display order.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Io`] if the file exists but cannot be read.
    pub fn list(&self) -> Result<Vec<WorkoutDefinition>, LibraryError> {
        Ok(self.read_raw()?.map_or_else(Vec::new, |s| decode(&s, self.max_phases)))
    }

    /// Looks up a workout by id.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Io`] if the file cannot be read.
    pub fn get(&self, id: &str) -> Result<Option<WorkoutDefinition>, LibraryError> {
        Ok(self.list()?.into_iter().find(|w| w.id() == id))
    }

    /// Writes `[sample]` if the library file is missing or blank.
    ///
    /// Returns `true` when the sample was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or written.
    pub fn ensure_seeded(&self, sample: &WorkoutDefinition) -> Result<bool, LibraryError> {
        let blank = self
            .read_raw()?
            .is_none_or(|s| s.trim().is_empty());
        if blank {
            self.write(std::slice::from_ref(sample))?;
            tracing::info!(path = %self.path.display(), "seeded workout library");
        }
        Ok(blank)
    }

    /// Replaces the workout with the same id in place, or inserts it at
    /// the front.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or written.
    pub fn upsert(&self, def: &WorkoutDefinition) -> Result<(), LibraryError> {
        let mut all = self.list()?;
        if let Some(slot) = all.iter_mut().find(|w| w.id() == def.id()) {
            *slot = def.clone();
            tracing::debug!(id = def.id(), "replaced workout");
        } else {
            all.insert(0, def.clone());
            tracing::debug!(id = def.id(), "inserted workout");
        }
        self.write(&all)
    }

    /// Removes every workout with `id`. Returns how many were removed;
    /// an unknown id removes nothing and is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or written.
    pub fn delete(&self, id: &str) -> Result<usize, LibraryError> {
        let mut all = self.list()?;
        let before = all.len();
        all.retain(|w| w.id() != id);
        let removed = before - all.len();
        self.write(&all)?;
        tracing::debug!(id, removed, "deleted workout");
        Ok(removed)
    }

    /// Stores a copy of workout `id` under a new id and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::NotFound`] if no workout has that id.
    pub fn duplicate(&self, id: &str) -> Result<WorkoutDefinition, LibraryError> {
        let original = self.get(id)?.ok_or_else(|| LibraryError::NotFound { id: id.to_owned() })?;
        let copy = original.duplicate();
        self.upsert(&copy)?;
        Ok(copy)
    }

    /// Deletes the library file.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Io`] if the file exists but cannot be removed.
    pub fn clear_all(&self) -> Result<(), LibraryError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "cleared workout library");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn read_raw(&self) -> Result<Option<String>, LibraryError> {
        match std::fs::read_to_string(&self.path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes the list through a sibling temp file so readers never see a
    /// half-written array.
    fn write(&self, defs: &[WorkoutDefinition]) -> Result<(), LibraryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = encode(defs)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// Serializes definitions as a JSON array.
///
/// # Errors
///
/// Returns [`serde_json::Error`] if serialization fails.
pub fn encode(defs: &[WorkoutDefinition]) -> Result<String, serde_json::Error> {
    serde_json::to_string(defs)
}

/// Parses a JSON array of definitions, dropping anything unusable,
/// including entries that expand to more than `max_phases` phases.
///
/// Never fails: malformed JSON or a non-array root yields an empty list.
#[must_use]
pub fn decode(json: &str, max_phases: usize) -> Vec<WorkoutDefinition> {
    let Ok(Value::Array(items)) = serde_json::from_str::<Value>(json) else {
        tracing::warn!("workout library is not a JSON array; treating as empty");
        return Vec::new();
    };

    let decoded: Vec<_> = items
        .iter()
        .filter_map(|item| decode_entry(item, max_phases))
        .collect();
    if decoded.len() < items.len() {
        tracing::warn!(
            skipped = items.len() - decoded.len(),
            "skipped unreadable workout entries"
        );
    }
    decoded
}

fn decode_entry(value: &Value, max_phases: usize) -> Option<WorkoutDefinition> {
    let obj = value.as_object()?;
    let id = non_blank(obj.get("id"))?;
    let title = non_blank(obj.get("title"))?;
    let timing = decode_timing(obj.get("timing")?, max_phases)?;
    let exercise = obj.get("exercise").and_then(decode_exercise);
    WorkoutDefinition::with_id(id, title, timing, exercise).ok()
}

fn decode_timing(value: &Value, max_phases: usize) -> Option<TimingConfig> {
    let obj = value.as_object()?;
    let int = |key: &str| obj.get(key).and_then(as_int);
    let positive = |n: i64| u32::try_from(n).ok().filter(|&n| n > 0);
    let clamped = |key: &str| int(key).map_or(0, |n| u32::try_from(n.max(0)).unwrap_or(u32::MAX));

    let spec = TimingSpec {
        warmup_sec: clamped("warmupSec"),
        work_sec: positive(int("workSec")?)?,
        rest_between_reps_sec: clamped("restBetweenRepsSec"),
        reps_per_set: positive(int("repsPerSet").unwrap_or(1))?,
        rest_between_sets_sec: clamped("restBetweenSetsSec"),
        sets: positive(int("sets")?)?,
        cooldown_sec: clamped("cooldownSec"),
    };
    let timing = TimingConfig::new(spec).ok()?;
    timing.check_phase_limit(max_phases).ok()?;
    Some(timing)
}

fn decode_exercise(value: &Value) -> Option<Exercise> {
    let obj = value.as_object()?;
    let name = non_blank(obj.get("name"))?;
    let notes = obj.get("notes").and_then(Value::as_str).unwrap_or_default();
    Exercise::new(name, notes).ok()
}

fn non_blank(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Reads an integer leniently: JSON integers, truncated floats and numeric
/// strings all count.
#[allow(clippy::cast_possible_truncation)]
fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::sample_workout;

    const LIMIT: usize = 1000;

    fn temp_library() -> (tempfile::TempDir, WorkoutLibrary) {
        let dir = tempfile::tempdir().unwrap();
        let lib = WorkoutLibrary::open(dir.path().join("workouts.json"));
        (dir, lib)
    }

    fn titled(title: &str) -> WorkoutDefinition {
        let timing = *sample_workout().timing();
        WorkoutDefinition::new(title, timing, None).unwrap()
    }

    #[test]
    fn missing_file_lists_empty() {
        let (_dir, lib) = temp_library();
        assert!(lib.list().unwrap().is_empty());
    }

    #[test]
    fn seeding_only_happens_once() {
        let (_dir, lib) = temp_library();
        assert!(lib.ensure_seeded(&sample_workout()).unwrap());
        assert!(!lib.ensure_seeded(&titled("Other")).unwrap());
        let all = lib.list().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title(), "HIIT short");
    }

    #[test]
    fn blank_file_is_seeded() {
        let (_dir, lib) = temp_library();
        std::fs::write(lib.path(), "   ").unwrap();
        assert!(lib.ensure_seeded(&sample_workout()).unwrap());
    }

    #[test]
    fn upsert_inserts_at_front_and_replaces_in_place() {
        let (_dir, lib) = temp_library();
        let a = titled("A");
        let b = titled("B");
        lib.upsert(&a).unwrap();
        lib.upsert(&b).unwrap();
        let titles: Vec<_> = lib.list().unwrap().iter().map(|w| w.title().to_owned()).collect();
        assert_eq!(titles, vec!["B", "A"]);

        let renamed =
            WorkoutDefinition::with_id(a.id(), "A2", *a.timing(), None).unwrap();
        lib.upsert(&renamed).unwrap();
        let titles: Vec<_> = lib.list().unwrap().iter().map(|w| w.title().to_owned()).collect();
        assert_eq!(titles, vec!["B", "A2"]);
    }

    #[test]
    fn delete_unknown_id_is_not_an_error() {
        let (_dir, lib) = temp_library();
        let a = titled("A");
        lib.upsert(&a).unwrap();
        assert_eq!(lib.delete("nope").unwrap(), 0);
        assert_eq!(lib.delete(a.id()).unwrap(), 1);
        assert!(lib.list().unwrap().is_empty());
    }

    #[test]
    fn duplicate_copies_under_new_id() {
        let (_dir, lib) = temp_library();
        let a = titled("A");
        lib.upsert(&a).unwrap();
        let copy = lib.duplicate(a.id()).unwrap();
        assert_ne!(copy.id(), a.id());
        assert_eq!(copy.title(), "A (Copy)");
        assert_eq!(lib.list().unwrap()[0].id(), copy.id());
    }

    #[test]
    fn duplicate_unknown_id_fails() {
        let (_dir, lib) = temp_library();
        let err = lib.duplicate("ghost").unwrap_err();
        assert!(matches!(err, LibraryError::NotFound { id } if id == "ghost"));
    }

    #[test]
    fn clear_all_removes_file() {
        let (_dir, lib) = temp_library();
        lib.upsert(&titled("A")).unwrap();
        lib.clear_all().unwrap();
        assert!(!lib.path().exists());
        lib.clear_all().unwrap();
    }

    #[test]
    fn encodes_camel_case_with_null_exercise() {
        let json = encode(&[titled("A")]).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["timing"]["workSec"], 20);
        assert_eq!(value[0]["timing"]["restBetweenSetsSec"], 60);
        assert!(value[0]["exercise"].is_null());
    }

    #[test]
    fn decode_is_lenient() {
        let json = r#"[
            {"id": "ok", "title": "Good", "timing": {"workSec": 30, "sets": 2,
              "warmupSec": -5, "cooldownSec": "10"},
              "exercise": {"name": "  ", "notes": "x"}},
            {"id": "", "title": "No id", "timing": {"workSec": 30, "sets": 2}},
            {"id": "t", "title": "No timing"},
            {"id": "z", "title": "Zero work", "timing": {"workSec": 0, "sets": 2}},
            {"id": "r", "title": "Zero reps", "timing": {"workSec": 5, "sets": 2, "repsPerSet": 0}},
            42
        ]"#;
        let all = decode(json, LIMIT);
        assert_eq!(all.len(), 1);
        let w = &all[0];
        assert_eq!(w.id(), "ok");
        assert_eq!(w.timing().warmup_sec(), 0);
        assert_eq!(w.timing().cooldown_sec(), 10);
        assert_eq!(w.timing().reps_per_set(), 1);
        assert!(w.exercise().is_none());
    }

    #[test]
    fn oversized_entries_are_skipped() {
        let json = r#"[
            {"id": "big", "title": "Big", "timing": {"workSec": 20, "repsPerSet": 100000, "sets": 100000}},
            {"id": "ok", "title": "Ok", "timing": {"workSec": 20, "sets": 4, "restBetweenSetsSec": 60}}
        ]"#;
        let ids: Vec<_> = decode(json, LIMIT).iter().map(|w| w.id().to_owned()).collect();
        assert_eq!(ids, vec!["ok"]);
        assert!(decode(json, 6).is_empty());
    }

    #[test]
    fn list_applies_library_phase_limit() {
        let (_dir, lib) = temp_library();
        lib.upsert(&sample_workout()).unwrap();
        assert_eq!(lib.list().unwrap().len(), 1);
        let tight = lib.clone().with_max_phases(6);
        assert!(tight.list().unwrap().is_empty());
    }

    #[test]
    fn corrupt_json_decodes_empty() {
        assert!(decode("{not json", LIMIT).is_empty());
        assert!(decode(r#"{"id": "x"}"#, LIMIT).is_empty());
    }

    #[test]
    fn round_trips_through_file() {
        let (_dir, lib) = temp_library();
        let sample = sample_workout();
        lib.upsert(&sample).unwrap();
        assert_eq!(lib.get(sample.id()).unwrap(), Some(sample));
    }
}

use std::sync::Arc;

use super::Sequencer;
use crate::Result;
use crate::storage::Storage;
use crate::store::{Store, Subscription};

pub const DEFAULT_STORAGE_KEY: &str = "sequencer";

/// Loads saved state under `key` (or the defaults when nothing is saved),
/// marks it loaded, and keeps `storage` in sync with every later change.
///
/// A malformed saved value is returned as an error and nothing is
/// subscribed. Write failures after that are only logged.
pub fn init_sequencer(
    store: &Store<Sequencer>,
    storage: Arc<dyn Storage>,
    key: &str,
) -> Result<Subscription> {
    let mut sequencer = match storage.get_item(key)? {
        Some(json) => {
            let sequencer = Sequencer::from_json(&json)?;
            tracing::info!(
                key,
                tiles = sequencer.active_tiles().count(),
                "restored sequencer state"
            );
            sequencer
        }
        None => {
            tracing::info!(key, "no saved sequencer state, using defaults");
            Sequencer::default()
        }
    };
    sequencer.is_loaded = true;
    store.set(sequencer);

    let key = key.to_string();
    Ok(store.subscribe(move |sequencer| {
        match sequencer
            .to_json()
            .and_then(|json| storage.set_item(&key, &json))
        {
            Ok(()) => tracing::debug!(key = %key, "persisted sequencer state"),
            Err(e) => tracing::warn!(key = %key, error = %e, "failed to persist sequencer state"),
        }
    }))
}

pub fn reset_sequencer_controls(store: &Store<Sequencer>) {
    store.update(Sequencer::reset_controls);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::sequencer::SequencerControls;
    use crate::storage::{FileStorage, MemoryStorage, scratch_dir};
    use std::fs;

    fn setup() -> (Store<Sequencer>, Arc<MemoryStorage>) {
        (Store::new(Sequencer::default()), Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_init_without_saved_state() {
        let (store, storage) = setup();
        let _sub = init_sequencer(&store, storage.clone(), DEFAULT_STORAGE_KEY).unwrap();

        let seq = store.get();
        assert!(seq.is_loaded);
        assert!(seq.active_tiles().is_empty());
        assert_eq!(seq.controls(), &SequencerControls::default());
        assert!(storage.get_item(DEFAULT_STORAGE_KEY).unwrap().is_some());
    }

    #[test]
    fn test_changes_are_persisted_and_restored() {
        let (store, storage) = setup();
        let _sub = init_sequencer(&store, storage.clone(), "grid").unwrap();
        store.update(|s| s.toggle_tile(3, 2)).unwrap();
        store.update(|s| s.set_measures(4)).unwrap();

        let restored = Store::new(Sequencer::default());
        let _sub = init_sequencer(&restored, storage.clone(), "grid").unwrap();
        let seq = restored.get();
        assert!(seq.is_loaded);
        assert!(seq.is_active(3, 2));
        assert_eq!(seq.columns().len(), 16);
    }

    #[test]
    fn test_malformed_state_is_an_error() {
        let (store, storage) = setup();
        storage.set_item("grid", "{\"activeTiles\": [").unwrap();

        let result = init_sequencer(&store, storage.clone(), "grid");

        assert!(matches!(result, Err(Error::Json(_))));
        assert!(!store.get().is_loaded);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_out_of_range_state_is_an_error() {
        let (store, storage) = setup();
        let saved = [
            r#"{"rows":[],"columns":[],"stringScale":[],"activeTiles":{},"tonic":"C999999999","scale":[0],"measures":1,"octaves":1,"highlightMeasureStart":true}"#,
            r#"{"rows":[],"columns":[],"stringScale":[],"activeTiles":{},"tonic":"C3","scale":[0],"measures":18446744073709551615,"octaves":1,"highlightMeasureStart":true}"#,
            r#"{"rows":[],"columns":[],"stringScale":[],"activeTiles":{},"tonic":"C3","scale":[0],"measures":1,"octaves":1000000000,"highlightMeasureStart":true}"#,
        ];
        for json in saved {
            storage.set_item("grid", json).unwrap();
            assert!(init_sequencer(&store, storage.clone(), "grid").is_err(), "{}", json);
            assert!(!store.get().is_loaded);
            assert_eq!(store.subscriber_count(), 0);
        }
    }

    #[test]
    fn test_file_storage_survives_restart() {
        let dir = scratch_dir("restart");

        let store = Store::new(Sequencer::default());
        let sub = init_sequencer(&store, Arc::new(FileStorage::new(&dir)), "grid").unwrap();
        store.update(|s| s.toggle_tile(5, 6)).unwrap();
        store.update(|s| s.set_tonic("D#2".parse().unwrap())).unwrap();
        sub.unsubscribe();
        assert!(dir.join("grid.json").exists());

        let restored = Store::new(Sequencer::default());
        let _sub = init_sequencer(&restored, Arc::new(FileStorage::new(&dir)), "grid").unwrap();
        let seq = restored.get();
        assert!(seq.is_loaded);
        assert!(seq.is_active(5, 6));
        assert_eq!(seq.active_tiles().count(), 1);
        assert_eq!(seq.controls().tonic.to_string(), "D#2");
        assert_eq!(seq.string_scale().first().map(String::as_str), Some("D#2"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_unsubscribe_stops_persisting() {
        let (store, storage) = setup();
        let sub = init_sequencer(&store, storage.clone(), "grid").unwrap();
        sub.unsubscribe();
        storage.remove_item("grid").unwrap();

        store.update(|s| s.clear_tiles());

        assert_eq!(storage.get_item("grid").unwrap(), None);
    }

    #[test]
    fn test_reset_sequencer_controls() {
        let (store, storage) = setup();
        let _sub = init_sequencer(&store, storage.clone(), "grid").unwrap();
        store.update(|s| {
            s.set_tile(1, 1, true)?;
            s.set_octaves(2)
        })
        .unwrap();

        reset_sequencer_controls(&store);

        let seq = store.get();
        assert_eq!(seq.controls().octaves, 1);
        assert!(seq.is_active(1, 1));

        let saved = storage.get_item("grid").unwrap().unwrap();
        assert_eq!(Sequencer::from_json(&saved).unwrap().controls().octaves, 1);
    }
}

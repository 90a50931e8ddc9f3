use std::sync::{Arc, PoisonError, RwLock};

use lazy_static::lazy_static;
use log::debug;

use crate::app_settings::AppSettings;
use crate::features::Features;
use crate::store::{from_fn, Store};
use crate::toggle::ToggleState;

/// A shareable handle to whichever store backs the process-wide registry.
pub type SharedStore = Arc<dyn Store + Send + Sync>;

lazy_static! {
    static ref BACKING_STORAGE: RwLock<SharedStore> = RwLock::new(default_store());
}

fn default_store() -> SharedStore {
    Arc::new(AppSettings::default())
}

fn replace(store: SharedStore) {
    // The guarded value is always a complete binding, so a poisoned lock is still usable.
    let mut current = BACKING_STORAGE
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    *current = store;
}

/// Replace the backing storage used by [enabled], [disabled] and [state].
///
/// Intended for tests: substitute an in-memory store, then call [reset_default_backing_storage]
/// afterwards so the override does not leak into later queries in the same process. The store
/// is not validated; if it panics, the panic surfaces from the query that invoked it.
pub fn use_backing_storage<S>(store: S)
where
    S: Store + Send + Sync + 'static,
{
    debug!("using custom backing storage for feature toggles");
    replace(Arc::new(store));
}

/// Replace the backing storage with a lookup function. See [use_backing_storage].
pub fn use_backing_storage_fn<F>(lookup: F)
where
    F: Fn(&str) -> Option<String> + Send + Sync + 'static,
{
    use_backing_storage(from_fn(lookup));
}

/// Restore the default [AppSettings] backing storage, discarding any override.
pub fn reset_default_backing_storage() {
    debug!("resetting feature toggles to default backing storage");
    replace(default_store());
}

/// A registry over the backing storage bound right now.
///
/// Later calls to [use_backing_storage] do not affect the returned handle, so it can be used to
/// query several toggles against one consistent store.
pub fn current() -> Features<SharedStore> {
    // Clone out of the lock so the store runs unlocked; a panicking store cannot poison it.
    let store = BACKING_STORAGE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    Features::new(store)
}

/// Look up and interpret the toggle setting for `feature` in the process-wide backing storage.
pub fn state(feature: &str) -> ToggleState {
    current().state(feature)
}

/// Determine whether `feature` is specifically enabled by looking for a `"<feature>.Enabled"`
/// setting with the value `"true"`.
///
/// Use for features that are disabled by default.
pub fn enabled(feature: &str) -> bool {
    current().enabled(feature)
}

/// Determine whether `feature` has been specifically disabled by looking for a
/// `"<feature>.Enabled"` setting with the value `"false"`.
///
/// Use for features that are enabled by default. A missing or unrecognized setting is *not*
/// disabled, just as it is not enabled.
pub fn disabled(feature: &str) -> bool {
    current().disabled(feature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MapStore;
    use crate::test_common::{lock_global_store, PanickingStore};
    use std::env;
    use std::panic;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn override_scenario() {
        let _guard = lock_global_store();
        use_backing_storage(MapStore::from_iter([("Beta.Enabled", "true")]));

        assert!(enabled("Beta"));
        assert!(!disabled("Beta"));
        assert!(!enabled("Other"));
        assert!(!disabled("Other"));

        reset_default_backing_storage();
    }

    #[test]
    fn override_then_reset() {
        let _guard = lock_global_store();
        env::remove_var("X.Enabled");

        use_backing_storage_fn(|_| Some("false".to_string()));
        assert!(disabled("X"));

        reset_default_backing_storage();
        assert!(!disabled("X"));
        assert_eq!(state("X"), ToggleState::Unset);
    }

    #[test]
    fn reset_is_idempotent() {
        let _guard = lock_global_store();
        env::set_var("GlobalResetTwice.Enabled", "true");

        use_backing_storage(MapStore::new());
        assert!(!enabled("GlobalResetTwice"));

        reset_default_backing_storage();
        reset_default_backing_storage();
        assert!(enabled("GlobalResetTwice"));
        assert!(!disabled("GlobalResetTwice"));
    }

    #[test]
    fn default_store_reads_environment() {
        let _guard = lock_global_store();
        reset_default_backing_storage();
        env::set_var("GlobalDefaultOff.Enabled", "False");

        assert!(disabled("GlobalDefaultOff"));
        assert!(!enabled("GlobalDefaultOff"));
        assert!(!enabled("GlobalDefaultMissing"));
        assert!(!disabled("GlobalDefaultMissing"));
    }

    #[test]
    fn queries_the_enabled_key_once_per_call() {
        let _guard = lock_global_store();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        use_backing_storage_fn(move |key| {
            counter.fetch_add(1, Ordering::SeqCst);
            assert_eq!(key, "Payments.Enabled");
            Some("true".to_string())
        });

        assert!(enabled("Payments"));
        assert!(!disabled("Payments"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        reset_default_backing_storage();
    }

    #[test]
    fn current_handle_keeps_its_store() {
        let _guard = lock_global_store();
        use_backing_storage(MapStore::from_iter([("Beta.Enabled", "true")]));
        let snapshot = current();

        use_backing_storage(MapStore::new());
        assert!(snapshot.enabled("Beta"));
        assert!(!enabled("Beta"));

        reset_default_backing_storage();
    }

    #[test]
    fn store_panic_propagates_and_leaves_registry_usable() {
        let _guard = lock_global_store();
        use_backing_storage(PanickingStore);

        let result = panic::catch_unwind(|| enabled("Beta"));
        assert!(result.is_err());

        use_backing_storage(MapStore::from_iter([("Beta.Enabled", "true")]));
        assert!(enabled("Beta"));

        reset_default_backing_storage();
    }

    #[test]
    fn concurrent_queries_and_overrides() {
        let _guard = lock_global_store();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        if i % 2 == 0 {
                            use_backing_storage(MapStore::from_iter([("Beta.Enabled", "true")]));
                        } else {
                            // Whichever store is bound, Other is never set.
                            assert!(!enabled("Other"));
                            assert!(!disabled("Other"));
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread should not panic");
        }

        reset_default_backing_storage();
    }
}

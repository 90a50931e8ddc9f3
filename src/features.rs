use crate::app_settings::AppSettings;
use crate::store::Store;
use crate::toggle::{enabled_key, ToggleState};

/// A feature toggle registry over an explicit backing [Store].
///
/// Each feature is controlled by a single setting named `"<feature>.Enabled"`. Every query looks
/// the setting up again; nothing is cached between calls. Missing or malformed settings never
/// cause an error, they simply leave the toggle [ToggleState::Unset].
///
/// For the process-wide registry, see [crate::enabled], [crate::disabled] and
/// [crate::use_backing_storage].
#[derive(Clone, Debug)]
pub struct Features<S> {
    store: S,
}

impl Default for Features<AppSettings> {
    fn default() -> Self {
        Features::new(AppSettings::default())
    }
}

impl<S: Store> Features<S> {
    pub fn new(store: S) -> Self {
        Features { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Look up and interpret the toggle setting for `feature`.
    pub fn state(&self, feature: &str) -> ToggleState {
        let value = self.store.value(&enabled_key(feature));
        ToggleState::from_value(value.as_deref())
    }

    /// Determine whether `feature` has been explicitly enabled.
    ///
    /// Use for features that are off by default: anything other than a `"true"` setting
    /// (in any casing) reports `false`.
    pub fn enabled(&self, feature: &str) -> bool {
        self.state(feature).is_enabled()
    }

    /// Determine whether `feature` has been explicitly disabled.
    ///
    /// Use for features that are on by default: anything other than a `"false"` setting
    /// (in any casing) reports `false`. A missing setting is therefore neither enabled nor
    /// disabled.
    pub fn disabled(&self, feature: &str) -> bool {
        self.state(feature).is_disabled()
    }
}

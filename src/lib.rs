//! Feature toggles looked up in application settings.
//!
//! A feature `"Beta"` is controlled by the setting `"Beta.Enabled"`. Use [enabled] for features
//! that are off unless the setting is `"true"`, and [disabled] for features that are on unless
//! the setting is `"false"`. Missing or malformed settings make both report `false`.
//!
//! Settings are read from [AppSettings] by default. Tests can swap in another [Store] with
//! [use_backing_storage] and restore the default with [reset_default_backing_storage], or
//! construct an independent [Features] registry over any store.

mod app_settings;
mod features;
mod global;
mod store;
mod test_common;
mod toggle;

pub use app_settings::*;
pub use features::*;
pub use global::*;
pub use store::*;
pub use toggle::*;

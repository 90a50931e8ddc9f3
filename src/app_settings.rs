use std::env::{self, VarError};

use log::debug;

use crate::store::Store;

/// The default backing storage: named settings read from the application's environment.
///
/// Keys are looked up verbatim, so the toggle for `"Beta"` is the variable `Beta.Enabled`. A
/// prefix can be configured with [AppSettings::with_prefix] to keep toggles in an
/// application-specific namespace.
///
/// Every lookup reads the environment afresh; nothing is cached.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppSettings {
    prefix: Option<String>,
}

impl AppSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every setting as `prefix` followed by the requested key.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        AppSettings {
            prefix: Some(prefix.into()),
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    fn setting_name(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, key),
            None => key.to_string(),
        }
    }
}

impl Store for AppSettings {
    fn value(&self, key: &str) -> Option<String> {
        let name = self.setting_name(key);
        // env::var panics on names containing '=' or NUL; such settings can't exist anyway.
        if name.is_empty() || name.contains(['=', '\0']) {
            return None;
        }

        match env::var(&name) {
            Ok(value) => Some(value),
            Err(VarError::NotPresent) => None,
            Err(VarError::NotUnicode(_)) => {
                debug!("setting {} is not valid unicode, ignoring it", name);
                None
            }
        }
    }
}

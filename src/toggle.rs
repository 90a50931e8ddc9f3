use std::fmt::{self, Display};

use log::debug;
use serde::{Deserialize, Serialize};

/// Suffix appended to a feature name to form the key of its toggle setting.
pub const ENABLED_SUFFIX: &str = ".Enabled";

/// Build the backing-store key for `feature`, e.g. `"Payments"` becomes `"Payments.Enabled"`.
///
/// The feature name is used verbatim; it is not trimmed, case-folded or validated.
pub fn enabled_key(feature: &str) -> String {
    format!("{}{}", feature, ENABLED_SUFFIX)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseToggleError {
    Empty,
    Unrecognized(String),
}

impl Display for ParseToggleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseToggleError::Empty => write!(f, "toggle value cannot be empty"),
            ParseToggleError::Unrecognized(value) => {
                write!(f, "'{}' is not a recognized toggle value", value)
            }
        }
    }
}

impl std::error::Error for ParseToggleError {}

/// Parse a stored toggle value.
///
/// Only `"true"` and `"false"` are recognized, compared ASCII case-insensitively. Surrounding
/// whitespace is significant: unlike .NET's `bool.TryParse`, which trims whitespace and NUL
/// characters before comparing, `" true "` is not recognized here.
pub fn parse_toggle(value: &str) -> Result<bool, ParseToggleError> {
    if value.is_empty() {
        Err(ParseToggleError::Empty)
    } else if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ParseToggleError::Unrecognized(value.to_string()))
    }
}

/// The interpretation of a single toggle setting.
///
/// [crate::enabled] and [crate::disabled] are projections of this state. Note that they are not
/// negations of each other: for an [ToggleState::Unset] toggle both report `false`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ToggleState {
    /// The setting was explicitly `"true"`.
    Enabled,
    /// The setting was explicitly `"false"`.
    Disabled,
    /// The setting was missing, empty or not a recognized boolean.
    Unset,
}

impl ToggleState {
    pub fn from_value(value: Option<&str>) -> ToggleState {
        let value = match value {
            Some(value) => value,
            None => return ToggleState::Unset,
        };

        match parse_toggle(value) {
            Ok(true) => ToggleState::Enabled,
            Ok(false) => ToggleState::Disabled,
            Err(e) => {
                debug!("treating toggle as unset: {}", e);
                ToggleState::Unset
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        *self == ToggleState::Enabled
    }

    pub fn is_disabled(&self) -> bool {
        *self == ToggleState::Disabled
    }

    pub fn is_set(&self) -> bool {
        *self != ToggleState::Unset
    }
}

impl Display for ToggleState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ToggleState::Enabled => write!(f, "enabled"),
            ToggleState::Disabled => write!(f, "disabled"),
            ToggleState::Unset => write!(f, "unset"),
        }
    }
}

//! On/off flag as written in configuration files.

use crate::errors::{AtmError, AtmResult};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A feature flag that configuration files spell as `0` (off) or `1` (on).
///
/// Booleans are accepted as well. Any other value is rejected as an unrecognized flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Switch {
    #[default]
    Off,
    On,
}

impl Switch {
    pub fn is_on(self) -> bool {
        matches!(self, Switch::On)
    }

    /// Parse an integer flag, naming `parameter` in the error.
    pub fn from_flag(parameter: &str, flag: i64) -> AtmResult<Self> {
        match flag {
            0 => Ok(Switch::Off),
            1 => Ok(Switch::On),
            other => Err(AtmError::invalid(
                parameter,
                format!("unrecognized flag {}, expected 0 (off) or 1 (on)", other),
            )),
        }
    }
}

impl TryFrom<i64> for Switch {
    type Error = AtmError;

    fn try_from(flag: i64) -> AtmResult<Self> {
        Self::from_flag("flag", flag)
    }
}

impl From<bool> for Switch {
    fn from(value: bool) -> Self {
        if value {
            Switch::On
        } else {
            Switch::Off
        }
    }
}

impl From<Switch> for u8 {
    fn from(value: Switch) -> Self {
        match value {
            Switch::Off => 0,
            Switch::On => 1,
        }
    }
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

impl Serialize for Switch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*self))
    }
}

impl<'de> Deserialize<'de> for Switch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Flag {
            Integer(i64),
            Boolean(bool),
        }

        match Flag::deserialize(deserializer)? {
            Flag::Integer(flag) => Switch::try_from(flag).map_err(de::Error::custom),
            Flag::Boolean(value) => Ok(Switch::from(value)),
        }
    }
}

//! Serde adapters for `std::time::Duration` written as humantime strings
//! (`"300ms"`, `"10s"`, `"5m"`).
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use std::time::Duration;
//!
//! #[derive(Serialize, Deserialize)]
//! struct Timeouts {
//!     #[serde(with = "usersearch_utils::humantime_serde")]
//!     request: Duration,
//!     #[serde(default, with = "usersearch_utils::humantime_serde::option")]
//!     idle: Option<Duration>,
//! }
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserializer, Serializer, de};

struct DurationVisitor;

impl de::Visitor<'_> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a duration such as \"300ms\" or \"10s\"")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Duration, E> {
        humantime::parse_duration(v.trim())
            .map_err(|e| E::invalid_value(de::Unexpected::Str(v), &e.to_string().as_str()))
    }
}

/// Deserialize a humantime string into a `Duration`.
///
/// # Errors
/// Fails when the input is not a string or does not parse as a duration.
pub fn deserialize<'de, D>(d: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    d.deserialize_str(DurationVisitor)
}

/// Serialize a `Duration` as a humantime string.
///
/// # Errors
/// Propagates serializer errors.
pub fn serialize<S>(d: &Duration, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.collect_str(&humantime::format_duration(*d))
}

/// Same as the parent module for `Option<Duration>`; `null` maps to `None`.
pub mod option {
    use std::fmt;
    use std::time::Duration;

    use serde::{Deserializer, Serializer, de};

    struct OptionVisitor;

    impl<'de> de::Visitor<'de> for OptionVisitor {
        type Value = Option<Duration>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an optional duration such as \"90s\"")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D>(self, d: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            super::deserialize(d).map(Some)
        }
    }

    /// # Errors
    /// Fails when a present value does not parse as a duration.
    pub fn deserialize<'de, D>(d: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        d.deserialize_option(OptionVisitor)
    }

    /// # Errors
    /// Propagates serializer errors.
    #[allow(clippy::ref_option)]
    pub fn serialize<S>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match d {
            Some(d) => s.collect_str(&humantime::format_duration(*d)),
            None => s.serialize_none(),
        }
    }
}

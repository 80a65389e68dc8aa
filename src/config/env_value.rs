//! Deserializers for values read from the process environment.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};

struct PortValue;

impl<'de> Visitor<'de> for PortValue {
    type Value = u16;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a TCP port")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<u16, E> {
        u16::try_from(v).map_err(|_| E::custom(format!("invalid port '{}'", v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<u16, E> {
        u16::try_from(v).map_err(|_| E::custom(format!("invalid port '{}'", v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<u16, E> {
        if v.is_empty() {
            return Ok(super::DEFAULT_PORT);
        }
        v.parse::<u16>()
            .map_err(|_| E::custom(format!("invalid port '{}'", v)))
    }
}

/// A TCP port given as a number or as environment text; empty text falls
/// back to [`super::DEFAULT_PORT`].
pub fn port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(PortValue)
}

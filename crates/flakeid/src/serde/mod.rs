//! Serde support for [`SnowflakeId`].
//!
//! By default an ID serializes as its decimal **string**, so it survives
//! formats and consumers (JSON in a browser, for one) that cannot hold a full
//! 64-bit unsigned integer. Deserialization accepts either a decimal string or
//! a non-negative integer.
//!
//! Use [`as_native`] with `#[serde(with = "...")]` to write the raw integer
//! instead.

use core::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, Visitor},
};

use crate::SnowflakeId;

impl Serialize for SnowflakeId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(self)
    }
}

struct SnowflakeVisitor;

impl Visitor<'_> for SnowflakeVisitor {
    type Value = SnowflakeId;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a decimal string or unsigned 64-bit integer")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        v.parse().map_err(de::Error::custom)
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(SnowflakeId::from_raw(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        u64::try_from(v)
            .map(SnowflakeId::from_raw)
            .map_err(|_| de::Error::invalid_value(de::Unexpected::Signed(v), &self))
    }
}

impl<'de> Deserialize<'de> for SnowflakeId {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        d.deserialize_any(SnowflakeVisitor)
    }
}

/// Serialize a snowflake ID as its native integer representation.
pub mod as_native {
    use super::{Deserialize, Deserializer, Serialize, Serializer};
    use crate::SnowflakeId;

    /// Serialize a snowflake ID as its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        id.to_raw().serialize(s)
    }

    /// Deserialize a snowflake ID from its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails.
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(d).map(SnowflakeId::from_raw)
    }
}

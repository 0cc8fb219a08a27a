//! Date field codec for persisted documents.
//!
//! The document store keeps date fields as ISO-8601 strings, with the
//! empty string standing in for "unset". Translation to and from
//! `DateTime<Utc>` happens here, at the document boundary; stores and
//! view-models only ever see native date values.

use chrono::{DateTime, Utc};

/// Serde codec for `Option<DateTime<Utc>>` ⇄ ISO-8601-or-empty string.
///
/// Use with `#[serde(with = "crate::util::time::iso_opt", default)]`.
pub mod iso_opt {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize `None` as `""` and `Some` as an RFC 3339 string.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    #[allow(clippy::ref_option)]
    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            None => serializer.serialize_str(""),
        }
    }

    /// Deserialize `""`, `null`, or a missing field as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if a non-empty value is not valid ISO-8601.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") => Ok(None),
            Some(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(serde::de::Error::custom),
        }
    }
}

/// True when `start` and `end` are both set and ordered start-before-end.
///
/// A window with only one endpoint (or neither) is always acceptable.
#[must_use]
pub fn valid_window(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> bool {
    match (start, end) {
        (Some(s), Some(e)) => s < e,
        _ => true,
    }
}

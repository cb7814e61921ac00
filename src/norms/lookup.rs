//! Resolve-with-default lookups.
//!
//! Unknown construction types, seasons, cement types, formwork systems and
//! crew presets do not fail a calculation. They resolve to a documented
//! default and leave an [`AdvisoryKind::UnknownLookupKey`] advisory behind.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::{Advisory, AdvisoryKind};
use crate::{PlanError, PlanResult};

/// Outcome of a lookup: the value used and, on fallback, why.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    /// Key whose value was used.
    pub key: String,
    pub value: T,
    /// Set when the requested key was unknown.
    pub advisory: Option<Advisory>,
}

impl<T> Resolved<T> {
    /// Whether the default was substituted.
    pub fn is_fallback(&self) -> bool {
        self.advisory.is_some()
    }

    /// Moves any advisory into `sink` and returns the value.
    pub fn collect(self, sink: &mut Vec<Advisory>) -> T {
        if let Some(a) = self.advisory {
            sink.push(a);
        }
        self.value
    }
}

pub(crate) fn fallback_advisory(what: &str, requested: &str, default_key: &str) -> Advisory {
    Advisory::warn(
        AdvisoryKind::UnknownLookupKey,
        format!("unknown {what} '{requested}', using '{default_key}'"),
    )
}

/// Normalizes a user-supplied key: trimmed, lowercase, spaces and dashes
/// become underscores.
pub fn normalize_key(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Parses a closed-set key, substituting `default` when it does not parse.
pub fn parse_or_default<K>(what: &str, raw: &str, default: K) -> Resolved<K>
where
    K: FromStr + Copy + std::fmt::Display,
{
    match raw.parse::<K>() {
        Ok(value) => Resolved {
            key: value.to_string(),
            value,
            advisory: None,
        },
        Err(_) => Resolved {
            key: default.to_string(),
            value: default,
            advisory: Some(fallback_advisory(what, raw, &default.to_string())),
        },
    }
}

/// Looks `key` up in a named table, substituting `default_key` when absent.
///
/// Matching is exact first, then on the normalized form of both sides.
/// Fails only when the default itself is missing from the table.
pub fn lookup_or_default<'a, V>(
    table: &'a BTreeMap<String, V>,
    what: &str,
    key: &str,
    default_key: &str,
) -> PlanResult<Resolved<&'a V>> {
    if let Some((k, v)) = table.get_key_value(key) {
        return Ok(Resolved {
            key: k.clone(),
            value: v,
            advisory: None,
        });
    }

    let wanted = normalize_key(key);
    if let Some((k, v)) = table.iter().find(|(k, _)| normalize_key(k) == wanted) {
        return Ok(Resolved {
            key: k.clone(),
            value: v,
            advisory: None,
        });
    }

    let (k, v) = table.get_key_value(default_key).ok_or_else(|| {
        PlanError::ConfigurationMissing(format!("default {what} '{default_key}' not in table"))
    })?;
    Ok(Resolved {
        key: k.clone(),
        value: v,
        advisory: Some(fallback_advisory(what, key, default_key)),
    })
}

//! Core types for the metadata fuzzer library
//!
//! This module defines the metadata records that fuzzer functions randomize,
//! the time helpers used to normalize timestamps, and the library error type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Timestamp type used throughout the library
pub type Time = DateTime<Utc>;

/// Result type for library operations
pub type Result<T> = std::result::Result<T, FuzzerError>;

/// Nanoseconds in one second
const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Errors that can occur while configuring or running the fuzzer
#[derive(Debug, thiserror::Error)]
pub enum FuzzerError {
    #[error("Invalid fuzzer configuration: {0}")]
    InvalidConfig(String),
}

/// Kind and API version of a serialized object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMeta {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
}

/// Identity, versioning and lifecycle metadata of a managed resource
///
/// Map and list fields distinguish "absent" (`None`) from "present but
/// empty" (`Some` of an empty collection).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    /// Prefix used by the server to generate a unique name
    #[serde(default)]
    pub generate_name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub self_link: String,
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub resource_version: String,
    #[serde(default)]
    pub generation: i64,
    #[serde(default)]
    pub creation_timestamp: Option<Time>,
    #[serde(default)]
    pub deletion_timestamp: Option<Time>,
    #[serde(default)]
    pub deletion_grace_period_seconds: Option<i64>,
    #[serde(default)]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub annotations: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub owner_references: Option<Vec<OwnerReference>>,
    #[serde(default)]
    pub finalizers: Option<Vec<String>>,
    #[serde(default)]
    pub managed_fields: Option<Vec<ManagedFieldsEntry>>,
}

/// Reference from a dependent object to its owner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReference {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    pub uid: String,
    #[serde(default)]
    pub controller: Option<bool>,
    #[serde(default)]
    pub block_owner_deletion: Option<bool>,
}

/// Field ownership record written by the server on every apply/update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedFieldsEntry {
    #[serde(default)]
    pub manager: String,
    #[serde(default)]
    pub operation: String,
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub time: Option<Time>,
    #[serde(default)]
    pub fields_type: String,
    /// Serialized field set (opaque JSON document)
    #[serde(default)]
    pub fields_v1: Option<String>,
    #[serde(default)]
    pub subresource: String,
}

/// Metadata carried by list responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMeta {
    #[serde(default)]
    pub self_link: String,
    #[serde(default)]
    pub resource_version: String,
    #[serde(default, rename = "continue")]
    pub continue_token: String,
    #[serde(default)]
    pub remaining_item_count: Option<i64>,
}

/// Build a timestamp from seconds and nanoseconds since the epoch
///
/// Nanoseconds outside `[0, 1s)` are carried into the seconds part, so any
/// pair of `u32` values yields a valid time.
pub fn unix_time(sec: i64, nsec: i64) -> Time {
    let secs = sec.saturating_add(nsec.div_euclid(NANOS_PER_SEC));
    let nanos = nsec.rem_euclid(NANOS_PER_SEC) as u32;
    DateTime::from_timestamp(secs, nanos).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Truncate a timestamp to whole seconds, the precision RFC 3339 round-trips
pub fn rfc3339_copy(time: Time) -> Time {
    DateTime::from_timestamp(time.timestamp(), 0).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// True if the timestamp carries no sub-second component
pub fn is_canonical_time(time: &Time) -> bool {
    time.timestamp_subsec_nanos() == 0
}

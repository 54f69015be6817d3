//! Round-trip invariant checks for generated ObjectMeta records

use meta_fuzzer::types::is_canonical_time;
use meta_fuzzer::ObjectMeta;
use std::collections::BTreeMap;

/// A way in which a generated record would not survive a round trip
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("{0} is present but empty")]
    EmptyCollection(&'static str),

    #[error("{0} contains an empty key")]
    EmptyKey(&'static str),

    #[error("{0} has sub-second precision")]
    NonCanonicalTime(&'static str),

    #[error("server-managed field {0} is set")]
    ServerFieldSet(&'static str),

    #[error("serialization round trip changed the record")]
    RoundTrip,
}

/// Collect every violation found in `meta`
pub fn check_object_meta(meta: &ObjectMeta) -> Vec<Violation> {
    let mut violations = Vec::new();

    check_map("labels", &meta.labels, &mut violations);
    check_map("annotations", &meta.annotations, &mut violations);
    if meta.owner_references.as_ref().map_or(false, Vec::is_empty) {
        violations.push(Violation::EmptyCollection("ownerReferences"));
    }
    if meta.finalizers.as_ref().map_or(false, Vec::is_empty) {
        violations.push(Violation::EmptyCollection("finalizers"));
    }

    for (field, time) in [
        ("creationTimestamp", &meta.creation_timestamp),
        ("deletionTimestamp", &meta.deletion_timestamp),
    ] {
        if time.as_ref().map_or(false, |t| !is_canonical_time(t)) {
            violations.push(Violation::NonCanonicalTime(field));
        }
    }

    if !meta.self_link.is_empty() {
        violations.push(Violation::ServerFieldSet("selfLink"));
    }
    if meta.generation != 0 {
        violations.push(Violation::ServerFieldSet("generation"));
    }
    if meta.managed_fields.is_some() {
        violations.push(Violation::ServerFieldSet("managedFields"));
    }

    let round_trip = serde_json::to_string(meta)
        .ok()
        .and_then(|json| serde_json::from_str::<ObjectMeta>(&json).ok());
    if round_trip.as_ref() != Some(meta) {
        violations.push(Violation::RoundTrip);
    }

    violations
}

fn check_map(
    field: &'static str,
    map: &Option<BTreeMap<String, String>>,
    violations: &mut Vec<Violation>,
) {
    if let Some(entries) = map {
        if entries.is_empty() {
            violations.push(Violation::EmptyCollection(field));
        }
        if entries.contains_key("") {
            violations.push(Violation::EmptyKey(field));
        }
    }
}

//! ObjectMeta override combinator
//!
//! [`safe_fuzzer_funcs`] composes providers like [`merge_fuzzer_funcs`]
//! does, but removes every `fn(*ObjectMeta, Continue)` callback they return
//! and appends a single replacement at the end. Because the harness lets the
//! last registered function win, the replacement is the one that runs.
//!
//! The replacement randomizes all fields, then rewrites the fields the server
//! owns so that the result survives a serialization round trip unchanged:
//!
//! - `resource_version` and `uid` are regenerated,
//! - timestamps are regenerated at whole-second precision,
//! - `self_link`, `generation` and `managed_fields` are cleared,
//! - empty maps and lists become absent, and maps lose their `""` key.
//!
//! [`merge_fuzzer_funcs`]: crate::funcs::merge_fuzzer_funcs

use crate::codecs::CodecFactory;
use crate::fuzz::Continue;
use crate::funcs::{FuzzFunc, FuzzerFuncs};
use crate::signature::is_object_meta_fuzzer;
use crate::types::{rfc3339_copy, unix_time, ObjectMeta, Time};
use std::collections::BTreeMap;

/// Combine providers, replacing any ObjectMeta fuzzer with the override
///
/// Absent providers are skipped. The returned provider builds a fresh list
/// on every call; the last element is always the override and no other
/// element has the ObjectMeta shape.
pub fn safe_fuzzer_funcs(funcs: Vec<Option<FuzzerFuncs>>) -> FuzzerFuncs {
    Box::new(move |codecs: &CodecFactory| {
        let mut result = Vec::new();
        for provider in funcs.iter().flatten() {
            for f in provider(codecs) {
                if is_object_meta_fuzzer(&f) {
                    log::debug!("Dropping ObjectMeta fuzzer in favour of override");
                    continue;
                }
                result.push(f);
            }
        }
        result.push(object_meta_override());
        result
    })
}

/// The replacement `fn(*ObjectMeta, Continue)` callback
pub fn object_meta_override() -> FuzzFunc {
    FuzzFunc::object_meta(|meta, c| {
        c.fuzz_no_custom(meta);
        normalize_object_meta(meta, c);
    })
}

/// Rewrite server-owned fields of `meta` into round-trippable values
pub fn normalize_object_meta(meta: &mut ObjectMeta, c: &mut Continue<'_>) {
    meta.resource_version = c.rand_u64().to_string();
    meta.uid = c.rand_string();
    meta.self_link.clear();
    meta.generation = 0;
    meta.managed_fields = None;

    meta.creation_timestamp = Some(canonical_time(c));
    if meta.deletion_timestamp.is_some() {
        meta.deletion_timestamp = Some(canonical_time(c));
    }

    normalize_map(&mut meta.labels);
    normalize_map(&mut meta.annotations);
    if meta.owner_references.as_ref().map_or(false, Vec::is_empty) {
        meta.owner_references = None;
    }
    if meta.finalizers.as_ref().map_or(false, Vec::is_empty) {
        meta.finalizers = None;
    }
}

/// Random time in the `u32` second range, truncated to whole seconds
fn canonical_time(c: &mut Continue<'_>) -> Time {
    let sec = c.rand_u32();
    let nsec = c.rand_u32();
    rfc3339_copy(unix_time(sec as i64, nsec as i64))
}

fn normalize_map(map: &mut Option<BTreeMap<String, String>>) {
    if let Some(entries) = map {
        entries.remove("");
        if entries.is_empty() {
            *map = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FuzzerConfig;
    use crate::fuzz::FuzzState;
    use crate::fuzzer::FuncTable;
    use crate::types::is_canonical_time;

    fn with_continue(seed: u64, f: impl FnOnce(&mut Continue<'_>)) {
        let funcs = FuncTable::default();
        let mut state = FuzzState::from_config(&FuzzerConfig::new().with_seed(seed));
        let mut c = Continue::new(&mut state, &funcs);
        f(&mut c);
    }

    fn labels(pairs: &[(&str, &str)]) -> Option<BTreeMap<String, String>> {
        Some(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }

    fn provider(make: fn() -> Vec<FuzzFunc>) -> Option<FuzzerFuncs> {
        let funcs: FuzzerFuncs = Box::new(move |_codecs: &CodecFactory| make());
        Some(funcs)
    }

    #[test]
    fn test_empty_key_removed_from_labels() {
        with_continue(1, |c| {
            let mut meta = ObjectMeta {
                labels: labels(&[("", "x"), ("env", "prod")]),
                ..Default::default()
            };
            normalize_object_meta(&mut meta, c);
            assert_eq!(meta.labels, labels(&[("env", "prod")]));
        });
    }

    #[test]
    fn test_empty_maps_become_absent() {
        with_continue(2, |c| {
            let mut meta = ObjectMeta {
                labels: Some(BTreeMap::new()),
                annotations: labels(&[("", "only-empty-key")]),
                owner_references: Some(Vec::new()),
                finalizers: Some(Vec::new()),
                ..Default::default()
            };
            normalize_object_meta(&mut meta, c);
            assert_eq!(meta.labels, None);
            assert_eq!(meta.annotations, None);
            assert_eq!(meta.owner_references, None);
            assert_eq!(meta.finalizers, None);
        });
    }

    #[test]
    fn test_deletion_timestamp_presence_preserved() {
        with_continue(3, |c| {
            let mut deleted = ObjectMeta {
                deletion_timestamp: Some(unix_time(1_000, 123)),
                ..Default::default()
            };
            normalize_object_meta(&mut deleted, c);
            let ts = deleted.deletion_timestamp.expect("deletion timestamp kept");
            assert!(is_canonical_time(&ts));

            let mut live = ObjectMeta::default();
            normalize_object_meta(&mut live, c);
            assert_eq!(live.deletion_timestamp, None);
        });
    }

    #[test]
    fn test_server_fields_regenerated_or_cleared() {
        with_continue(4, |c| {
            let mut meta = ObjectMeta {
                self_link: "/api/v1/x".into(),
                generation: 9,
                managed_fields: Some(vec![Default::default()]),
                ..Default::default()
            };
            normalize_object_meta(&mut meta, c);
            assert!(meta.self_link.is_empty());
            assert_eq!(meta.generation, 0);
            assert_eq!(meta.managed_fields, None);
            assert!(meta.resource_version.parse::<u64>().is_ok());
            assert!(is_canonical_time(&meta.creation_timestamp.unwrap()));
        });
    }

    #[test]
    fn test_matching_callback_dropped_and_override_last() {
        let safe = safe_fuzzer_funcs(vec![provider(|| {
            vec![
                FuzzFunc::type_meta(|_t, _c| {}),
                FuzzFunc::object_meta(|_m, _c| {}),
                FuzzFunc::list_meta(|_l, _c| {}),
            ]
        })]);
        let funcs = safe(&CodecFactory::default());
        let shapes: Vec<_> = funcs.iter().map(FuzzFunc::shape_name).collect();
        assert_eq!(shapes, vec!["TypeMeta", "ListMeta", "ObjectMeta"]);
    }

    #[test]
    fn test_only_override_survives() {
        let safe = safe_fuzzer_funcs(vec![
            provider(|| vec![FuzzFunc::object_meta(|_m, _c| {})]),
            provider(Vec::new),
        ]);
        let funcs = safe(&CodecFactory::default());
        assert_eq!(funcs.len(), 1);
        assert!(is_object_meta_fuzzer(&funcs[0]));
    }

    #[test]
    fn test_absent_providers_are_no_ops() {
        let safe = safe_fuzzer_funcs(vec![None, None]);
        let funcs = safe(&CodecFactory::default());
        assert_eq!(funcs.len(), 1);
        assert!(is_object_meta_fuzzer(&funcs[0]));
    }
}

//! Default fuzzer functions for the metadata API types
//!
//! These are the upstream functions a test suite starts from. Their
//! ObjectMeta function keeps `self_link`, `generation` and `managed_fields`
//! random, which is why callers usually wrap them with
//! [`safe_fuzzer_funcs`](crate::combinator::safe_fuzzer_funcs).

use crate::codecs::CodecFactory;
use crate::funcs::{merge_fuzzer_funcs, FuzzFunc, FuzzerFuncs};
use crate::types::{rfc3339_copy, unix_time};

/// Functions shared by every API version
pub fn generic_fuzzer_funcs(_codecs: &CodecFactory) -> Vec<FuzzFunc> {
    vec![FuzzFunc::type_meta(|t, _c| {
        // Kind and API version are only set on the wire, never in memory
        t.kind.clear();
        t.api_version.clear();
    })]
}

/// Functions for the `meta.k8s.io/v1` types
pub fn v1_fuzzer_funcs(_codecs: &CodecFactory) -> Vec<FuzzFunc> {
    vec![
        FuzzFunc::type_meta(|t, _c| {
            t.kind.clear();
            t.api_version.clear();
        }),
        FuzzFunc::object_meta(|j, c| {
            c.fuzz_no_custom(j);

            j.resource_version = c.rand_u64().to_string();
            j.uid = c.rand_string();

            let (sec, nsec) = (c.rand_u32(), c.rand_u32());
            j.creation_timestamp = Some(rfc3339_copy(unix_time(sec as i64, nsec as i64)));
            if j.deletion_timestamp.is_some() {
                let (sec, nsec) = (c.rand_u32(), c.rand_u32());
                j.deletion_timestamp = Some(rfc3339_copy(unix_time(sec as i64, nsec as i64)));
            }

            if j.labels.as_ref().map_or(false, |l| l.is_empty()) {
                j.labels = None;
            } else if let Some(labels) = j.labels.as_mut() {
                labels.remove("");
            }
            if j.annotations.as_ref().map_or(false, |a| a.is_empty()) {
                j.annotations = None;
            } else if let Some(annotations) = j.annotations.as_mut() {
                annotations.remove("");
            }
            if j.owner_references.as_ref().map_or(false, Vec::is_empty) {
                j.owner_references = None;
            }
            if j.finalizers.as_ref().map_or(false, Vec::is_empty) {
                j.finalizers = None;
            }
        }),
        FuzzFunc::list_meta(|j, c| {
            j.resource_version = c.rand_u64().to_string();
            j.self_link = c.rand_string();
            j.remaining_item_count = Some(c.int63());
        }),
        FuzzFunc::managed_fields_entry(|j, c| {
            c.fuzz_no_custom(j);
            j.fields_v1 = None;
        }),
    ]
}

/// All metadata fuzzer functions, generic ones first
pub fn funcs() -> FuzzerFuncs {
    let generic: FuzzerFuncs = Box::new(generic_fuzzer_funcs);
    let v1: FuzzerFuncs = Box::new(v1_fuzzer_funcs);
    merge_fuzzer_funcs(vec![Some(generic), Some(v1)])
}

//! Metadata Fuzzer Library
//!
//! Custom randomization functions ("fuzzer functions") for the metadata
//! records of managed resources, and the plumbing to compose them safely.
//!
//! # Architecture
//!
//! - [`FuzzFunc`] tags every callback with the shape of the value it fills
//! - [`FuzzerFuncs`] providers produce callback lists for a [`CodecFactory`]
//! - [`safe_fuzzer_funcs`] merges providers and replaces any
//!   `fn(*ObjectMeta, Continue)` callback with one that keeps server-owned
//!   fields round-trippable
//! - [`Fuzzer`] registers the callbacks and generates values; for each
//!   shape the last registered callback wins
//! - [`describe_all`] reports the static shape of a callback list
//!
//! # Example Usage
//!
//! ```no_run
//! use meta_fuzzer::{metafuzzer, safe_fuzzer_funcs, CodecFactory, Fuzzer, FuzzerConfig, ObjectMeta};
//!
//! let codecs = CodecFactory::default();
//! let funcs = safe_fuzzer_funcs(vec![Some(metafuzzer::funcs())]);
//!
//! let mut fuzzer = Fuzzer::new(&FuzzerConfig::new().with_seed(1))
//!     .unwrap()
//!     .with_funcs(&codecs, &funcs);
//!
//! let meta: ObjectMeta = fuzzer.generate();
//! assert!(meta.labels.as_ref().map_or(true, |l| !l.is_empty()));
//! ```

// Public modules
pub mod codecs;
pub mod combinator;
pub mod config;
pub mod funcs;
pub mod fuzz;
pub mod fuzzer;
pub mod introspect;
pub mod metafuzzer;
pub mod signature;
pub mod types;

// Re-export main types for convenience
pub use codecs::CodecFactory;
pub use combinator::{normalize_object_meta, object_meta_override, safe_fuzzer_funcs};
pub use config::FuzzerConfig;
pub use funcs::{merge_fuzzer_funcs, FuzzFunc, FuzzerFuncs};
pub use fuzz::{Continue, Fuzz};
pub use fuzzer::{FuncTable, Fuzzer};
pub use introspect::{describe, describe_all, FuncReport, ParamReport};
pub use signature::{index_of_object_meta_fuzzer, is_object_meta_fuzzer, Kind, Signature, TypeDesc};
pub use types::{
    FuzzerError, ListMeta, ManagedFieldsEntry, ObjectMeta, OwnerReference, Result, Time, TypeMeta,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: the default registry is non-empty and has an ObjectMeta fuzzer
        let funcs = metafuzzer::funcs()(&CodecFactory::default());
        assert!(!funcs.is_empty());
        assert!(index_of_object_meta_fuzzer(&funcs).is_some());
    }
}

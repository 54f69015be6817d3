//! Randomized-value harness
//!
//! The [`Fuzzer`] owns the random state and a dispatch table of custom
//! functions. Registering a list of [`FuzzFunc`]s fills the table in order,
//! so for each shape the last registered function wins.

use crate::codecs::CodecFactory;
use crate::config::FuzzerConfig;
use crate::fuzz::{Continue, Fuzz, FuzzState};
use crate::funcs::{
    FuzzFunc, FuzzerFuncs, ListMetaFn, ManagedFieldsEntryFn, ObjectMetaFn, OwnerReferenceFn, TimeFn,
    TypeMetaFn,
};
use crate::types::Result;

/// Custom functions by target type, at most one per shape
#[derive(Default)]
pub struct FuncTable {
    pub(crate) type_meta: Option<TypeMetaFn>,
    pub(crate) object_meta: Option<ObjectMetaFn>,
    pub(crate) list_meta: Option<ListMetaFn>,
    pub(crate) managed_fields_entry: Option<ManagedFieldsEntryFn>,
    pub(crate) owner_reference: Option<OwnerReferenceFn>,
    pub(crate) time: Option<TimeFn>,
}

impl FuncTable {
    /// Install `f`, replacing any function previously registered for its shape
    ///
    /// Returns false if the entry cannot be dispatched (variadic callbacks
    /// and non-callable values).
    pub fn register(&mut self, f: FuzzFunc) -> bool {
        match f {
            FuzzFunc::TypeMeta(f) => self.type_meta = Some(f),
            FuzzFunc::ObjectMeta(f) => self.object_meta = Some(f),
            FuzzFunc::ListMeta(f) => self.list_meta = Some(f),
            FuzzFunc::ManagedFieldsEntry(f) => self.managed_fields_entry = Some(f),
            FuzzFunc::OwnerReference(f) => self.owner_reference = Some(f),
            FuzzFunc::Time(f) => self.time = Some(f),
            other @ (FuzzFunc::ObjectMetaVariadic(_) | FuzzFunc::Value(_)) => {
                log::debug!("Skipping non-dispatchable fuzzer entry: {:?}", other);
                return false;
            }
        }
        true
    }

    /// Number of shapes with a registered function
    pub fn len(&self) -> usize {
        [
            self.type_meta.is_some(),
            self.object_meta.is_some(),
            self.list_meta.is_some(),
            self.managed_fields_entry.is_some(),
            self.owner_reference.is_some(),
            self.time.is_some(),
        ]
        .iter()
        .filter(|registered| **registered)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Generates random values, honouring registered custom functions
pub struct Fuzzer {
    state: FuzzState,
    funcs: FuncTable,
}

impl Fuzzer {
    /// Create a fuzzer with no custom functions
    pub fn new(config: &FuzzerConfig) -> Result<Self> {
        config.validate()?;
        log::info!(
            "Creating fuzzer (seed: {:?}, nil chance: {}, elements: {}..={})",
            config.seed,
            config.nil_chance,
            config.min_elements,
            config.max_elements
        );
        Ok(Self {
            state: FuzzState::from_config(config),
            funcs: FuncTable::default(),
        })
    }

    /// Register every function a provider returns for `codecs`
    pub fn with_funcs(mut self, codecs: &CodecFactory, provider: &FuzzerFuncs) -> Self {
        let funcs = provider(codecs);
        let total = funcs.len();
        let mut registered = 0;
        for f in funcs {
            if self.funcs.register(f) {
                registered += 1;
            }
        }
        log::debug!(
            "Registered {} of {} fuzzer functions ({} shapes active)",
            registered,
            total,
            self.funcs.len()
        );
        self
    }

    /// Register a single custom function
    pub fn with_func(mut self, f: FuzzFunc) -> Self {
        self.funcs.register(f);
        self
    }

    /// Randomize `obj`, using the custom function for its type if any
    pub fn fuzz<T: Fuzz>(&mut self, obj: &mut T) {
        Continue::new(&mut self.state, &self.funcs).fuzz(obj);
    }

    /// Randomize `obj` without its top-level custom function
    pub fn fuzz_no_custom<T: Fuzz>(&mut self, obj: &mut T) {
        Continue::new(&mut self.state, &self.funcs).fuzz_no_custom(obj);
    }

    /// Produce a new random value
    pub fn generate<T: Fuzz + Default>(&mut self) -> T {
        let mut value = T::default();
        self.fuzz(&mut value);
        value
    }

    /// Registered custom functions
    pub fn funcs(&self) -> &FuncTable {
        &self.funcs
    }
}

//! Random source handed to fuzzer functions
//!
//! A [`Continue`] is the capability every callback receives: it supplies
//! pseudo-random primitives and can recursively fuzz nested values, either
//! honouring the registered custom functions ([`Continue::fuzz`]) or using
//! only the default randomization ([`Continue::fuzz_no_custom`]).

use crate::config::FuzzerConfig;
use crate::fuzzer::FuncTable;
use crate::types::{ListMeta, ManagedFieldsEntry, ObjectMeta, OwnerReference, Time, TypeMeta};
use chrono::DateTime;
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

/// Namespace the [`Continue`] type is declared in
pub const CONTINUE_PACKAGE: &str = module_path!();

/// Custom fuzzer function for values of type `T`
pub type CustomFn<T> = dyn Fn(&mut T, &mut Continue<'_>) + Send + Sync;

/// Mutable state shared by every callback of one fuzzing run
#[derive(Debug)]
pub struct FuzzState {
    rng: StdRng,
    nil_chance: f64,
    min_elements: usize,
    max_elements: usize,
    max_string_len: usize,
}

impl FuzzState {
    /// Create fuzz state from a (validated) configuration
    pub fn from_config(config: &FuzzerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            nil_chance: config.nil_chance,
            min_elements: config.min_elements,
            max_elements: config.max_elements,
            max_string_len: config.max_string_len,
        }
    }
}

/// Pseudo-random capability passed to fuzzer functions
pub struct Continue<'a> {
    state: &'a mut FuzzState,
    funcs: &'a FuncTable,
}

impl<'a> Continue<'a> {
    pub(crate) fn new(state: &'a mut FuzzState, funcs: &'a FuncTable) -> Self {
        Self { state, funcs }
    }

    /// Randomize `obj`, dispatching to the registered custom function for
    /// its type when there is one
    pub fn fuzz<T: Fuzz>(&mut self, obj: &mut T) {
        let funcs = self.funcs;
        match T::custom_func(funcs) {
            Some(custom) => custom(obj, self),
            None => obj.fuzz_no_custom(self),
        }
    }

    /// Randomize `obj` with its default randomization
    ///
    /// Only the top level skips custom functions; nested fields are fuzzed
    /// with [`Continue::fuzz`].
    pub fn fuzz_no_custom<T: Fuzz>(&mut self, obj: &mut T) {
        obj.fuzz_no_custom(self);
    }

    pub fn rand_u64(&mut self) -> u64 {
        self.state.rng.gen()
    }

    pub fn rand_u32(&mut self) -> u32 {
        self.state.rng.gen()
    }

    pub fn rand_bool(&mut self) -> bool {
        self.state.rng.gen()
    }

    /// Non-negative random `i64`
    pub fn int63(&mut self) -> i64 {
        self.state.rng.gen_range(0..=i64::MAX)
    }

    /// Random index in `[0, n)`; 0 when `n` is 0
    pub fn intn(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        self.state.rng.gen_range(0..n)
    }

    /// Random alphanumeric string, possibly empty
    pub fn rand_string(&mut self) -> String {
        let len = self.state.rng.gen_range(0..=self.state.max_string_len);
        (&mut self.state.rng)
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }

    /// Decide whether an optional value should be present
    pub fn should_fill(&mut self) -> bool {
        !self.state.rng.gen_bool(self.state.nil_chance)
    }

    /// Number of elements for a generated list or map
    pub fn element_count(&mut self) -> usize {
        self.state
            .rng
            .gen_range(self.state.min_elements..=self.state.max_elements)
    }

    /// Direct access to the underlying generator
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.state.rng
    }
}

/// Types that can be filled with random values
pub trait Fuzz: Sized {
    /// Default randomization of the value, ignoring any custom function
    /// registered for this type
    fn fuzz_no_custom(&mut self, c: &mut Continue<'_>);

    /// Custom function registered for this type, if any
    fn custom_func(_funcs: &FuncTable) -> Option<&CustomFn<Self>> {
        None
    }
}

impl Fuzz for String {
    fn fuzz_no_custom(&mut self, c: &mut Continue<'_>) {
        *self = c.rand_string();
    }
}

impl Fuzz for bool {
    fn fuzz_no_custom(&mut self, c: &mut Continue<'_>) {
        *self = c.rand_bool();
    }
}

impl Fuzz for i64 {
    fn fuzz_no_custom(&mut self, c: &mut Continue<'_>) {
        *self = c.rng().gen();
    }
}

impl Fuzz for u32 {
    fn fuzz_no_custom(&mut self, c: &mut Continue<'_>) {
        *self = c.rand_u32();
    }
}

impl Fuzz for u64 {
    fn fuzz_no_custom(&mut self, c: &mut Continue<'_>) {
        *self = c.rand_u64();
    }
}

impl<T: Fuzz + Default> Fuzz for Option<T> {
    fn fuzz_no_custom(&mut self, c: &mut Continue<'_>) {
        *self = if c.should_fill() {
            let mut value = T::default();
            c.fuzz(&mut value);
            Some(value)
        } else {
            None
        };
    }
}

impl<T: Fuzz + Default> Fuzz for Vec<T> {
    fn fuzz_no_custom(&mut self, c: &mut Continue<'_>) {
        let len = c.element_count();
        self.clear();
        for _ in 0..len {
            let mut value = T::default();
            c.fuzz(&mut value);
            self.push(value);
        }
    }
}

impl Fuzz for BTreeMap<String, String> {
    fn fuzz_no_custom(&mut self, c: &mut Continue<'_>) {
        let len = c.element_count();
        self.clear();
        for _ in 0..len {
            let key = c.rand_string();
            let value = c.rand_string();
            self.insert(key, value);
        }
    }
}

impl Fuzz for Time {
    fn fuzz_no_custom(&mut self, c: &mut Continue<'_>) {
        let secs = c.rand_u32() as i64;
        let nanos = c.rng().gen_range(0..1_000_000_000u32);
        if let Some(t) = DateTime::from_timestamp(secs, nanos) {
            *self = t;
        }
    }

    fn custom_func(funcs: &FuncTable) -> Option<&CustomFn<Self>> {
        funcs.time.as_deref()
    }
}

impl Fuzz for TypeMeta {
    fn fuzz_no_custom(&mut self, c: &mut Continue<'_>) {
        c.fuzz(&mut self.kind);
        c.fuzz(&mut self.api_version);
    }

    fn custom_func(funcs: &FuncTable) -> Option<&CustomFn<Self>> {
        funcs.type_meta.as_deref()
    }
}

impl Fuzz for ObjectMeta {
    fn fuzz_no_custom(&mut self, c: &mut Continue<'_>) {
        c.fuzz(&mut self.name);
        c.fuzz(&mut self.generate_name);
        c.fuzz(&mut self.namespace);
        c.fuzz(&mut self.self_link);
        c.fuzz(&mut self.uid);
        c.fuzz(&mut self.resource_version);
        c.fuzz(&mut self.generation);
        c.fuzz(&mut self.creation_timestamp);
        c.fuzz(&mut self.deletion_timestamp);
        c.fuzz(&mut self.deletion_grace_period_seconds);
        c.fuzz(&mut self.labels);
        c.fuzz(&mut self.annotations);
        c.fuzz(&mut self.owner_references);
        c.fuzz(&mut self.finalizers);
        c.fuzz(&mut self.managed_fields);
    }

    fn custom_func(funcs: &FuncTable) -> Option<&CustomFn<Self>> {
        funcs.object_meta.as_deref()
    }
}

impl Fuzz for OwnerReference {
    fn fuzz_no_custom(&mut self, c: &mut Continue<'_>) {
        c.fuzz(&mut self.api_version);
        c.fuzz(&mut self.kind);
        c.fuzz(&mut self.name);
        c.fuzz(&mut self.uid);
        c.fuzz(&mut self.controller);
        c.fuzz(&mut self.block_owner_deletion);
    }

    fn custom_func(funcs: &FuncTable) -> Option<&CustomFn<Self>> {
        funcs.owner_reference.as_deref()
    }
}

impl Fuzz for ManagedFieldsEntry {
    fn fuzz_no_custom(&mut self, c: &mut Continue<'_>) {
        c.fuzz(&mut self.manager);
        c.fuzz(&mut self.operation);
        c.fuzz(&mut self.api_version);
        c.fuzz(&mut self.time);
        c.fuzz(&mut self.fields_type);
        c.fuzz(&mut self.fields_v1);
        c.fuzz(&mut self.subresource);
    }

    fn custom_func(funcs: &FuncTable) -> Option<&CustomFn<Self>> {
        funcs.managed_fields_entry.as_deref()
    }
}

impl Fuzz for ListMeta {
    fn fuzz_no_custom(&mut self, c: &mut Continue<'_>) {
        c.fuzz(&mut self.self_link);
        c.fuzz(&mut self.resource_version);
        c.fuzz(&mut self.continue_token);
        c.fuzz(&mut self.remaining_item_count);
    }

    fn custom_func(funcs: &FuncTable) -> Option<&CustomFn<Self>> {
        funcs.list_meta.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funcs::FuzzFunc;

    fn state(seed: u64) -> FuzzState {
        FuzzState::from_config(&FuzzerConfig::new().with_seed(seed))
    }

    #[test]
    fn test_seeded_runs_are_deterministic() {
        let funcs = FuncTable::default();
        let (mut a, mut b) = (state(7), state(7));
        let mut meta_a = ObjectMeta::default();
        let mut meta_b = ObjectMeta::default();
        Continue::new(&mut a, &funcs).fuzz(&mut meta_a);
        Continue::new(&mut b, &funcs).fuzz(&mut meta_b);
        assert_eq!(meta_a, meta_b);
    }

    #[test]
    fn test_nil_chance_extremes() {
        let funcs = FuncTable::default();

        let mut always = FuzzState::from_config(&FuzzerConfig::new().with_seed(1).with_nil_chance(0.0));
        let mut value: Option<String> = None;
        Continue::new(&mut always, &funcs).fuzz(&mut value);
        assert!(value.is_some());

        let mut never = FuzzState::from_config(&FuzzerConfig::new().with_seed(1).with_nil_chance(1.0));
        let mut value = Some(String::from("x"));
        Continue::new(&mut never, &funcs).fuzz(&mut value);
        assert!(value.is_none());
    }

    #[test]
    fn test_element_count_in_range() {
        let funcs = FuncTable::default();
        let mut st = FuzzState::from_config(&FuzzerConfig::new().with_seed(3).with_elements(2, 4));
        let mut c = Continue::new(&mut st, &funcs);
        for _ in 0..100 {
            let mut list: Vec<String> = Vec::new();
            c.fuzz(&mut list);
            assert!((2..=4).contains(&list.len()));
        }
    }

    #[test]
    fn test_intn_zero_and_int63_non_negative() {
        let funcs = FuncTable::default();
        let mut st = state(5);
        let mut c = Continue::new(&mut st, &funcs);
        assert_eq!(c.intn(0), 0);
        for _ in 0..100 {
            assert!(c.int63() >= 0);
            assert!(c.intn(3) < 3);
        }
    }

    #[test]
    fn test_custom_func_dispatch() {
        let mut funcs = FuncTable::default();
        funcs.register(FuzzFunc::type_meta(|t, _c| {
            t.kind = "Custom".to_string();
        }));
        let mut st = state(9);
        let mut c = Continue::new(&mut st, &funcs);

        let mut t = TypeMeta::default();
        c.fuzz(&mut t);
        assert_eq!(t.kind, "Custom");

        let mut t = TypeMeta::default();
        c.fuzz_no_custom(&mut t);
        assert_ne!(t.kind, "Custom");
    }
}

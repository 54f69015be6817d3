//! Fuzzer functions and the providers that produce them
//!
//! A [`FuzzFunc`] is a custom randomization callback tagged with the shape
//! of the value it randomizes. A [`FuzzerFuncs`] provider produces a list of
//! them for a given codec context; providers compose with
//! [`merge_fuzzer_funcs`].

use crate::codecs::CodecFactory;
use crate::fuzz::{Continue, CustomFn};
use crate::signature::TypeDesc;
use crate::types::{ListMeta, ManagedFieldsEntry, ObjectMeta, OwnerReference, Time, TypeMeta};
use std::fmt;

/// Callback over `TypeMeta`
pub type TypeMetaFn = Box<CustomFn<TypeMeta>>;
/// Callback over `ObjectMeta` - the shape the override targets
pub type ObjectMetaFn = Box<CustomFn<ObjectMeta>>;
/// Callback over `ObjectMeta` taking trailing field names
pub type ObjectMetaVariadicFn = Box<dyn Fn(&mut ObjectMeta, &mut Continue<'_>, &[&str]) + Send + Sync>;
/// Callback over `ListMeta`
pub type ListMetaFn = Box<CustomFn<ListMeta>>;
/// Callback over `ManagedFieldsEntry`
pub type ManagedFieldsEntryFn = Box<CustomFn<ManagedFieldsEntry>>;
/// Callback over `OwnerReference`
pub type OwnerReferenceFn = Box<CustomFn<OwnerReference>>;
/// Callback over `Time`
pub type TimeFn = Box<CustomFn<Time>>;

/// A fuzzer function tagged with the shape it implements
pub enum FuzzFunc {
    TypeMeta(TypeMetaFn),
    ObjectMeta(ObjectMetaFn),
    /// Same target as [`FuzzFunc::ObjectMeta`] but a different contract:
    /// never dispatched by the harness and never overridden
    ObjectMetaVariadic(ObjectMetaVariadicFn),
    ListMeta(ListMetaFn),
    ManagedFieldsEntry(ManagedFieldsEntryFn),
    OwnerReference(OwnerReferenceFn),
    Time(TimeFn),
    /// A registry entry that is not callable
    Value(TypeDesc),
}

impl FuzzFunc {
    pub fn type_meta<F>(f: F) -> Self
    where
        F: Fn(&mut TypeMeta, &mut Continue<'_>) + Send + Sync + 'static,
    {
        FuzzFunc::TypeMeta(Box::new(f))
    }

    pub fn object_meta<F>(f: F) -> Self
    where
        F: Fn(&mut ObjectMeta, &mut Continue<'_>) + Send + Sync + 'static,
    {
        FuzzFunc::ObjectMeta(Box::new(f))
    }

    pub fn object_meta_variadic<F>(f: F) -> Self
    where
        F: Fn(&mut ObjectMeta, &mut Continue<'_>, &[&str]) + Send + Sync + 'static,
    {
        FuzzFunc::ObjectMetaVariadic(Box::new(f))
    }

    pub fn list_meta<F>(f: F) -> Self
    where
        F: Fn(&mut ListMeta, &mut Continue<'_>) + Send + Sync + 'static,
    {
        FuzzFunc::ListMeta(Box::new(f))
    }

    pub fn managed_fields_entry<F>(f: F) -> Self
    where
        F: Fn(&mut ManagedFieldsEntry, &mut Continue<'_>) + Send + Sync + 'static,
    {
        FuzzFunc::ManagedFieldsEntry(Box::new(f))
    }

    pub fn owner_reference<F>(f: F) -> Self
    where
        F: Fn(&mut OwnerReference, &mut Continue<'_>) + Send + Sync + 'static,
    {
        FuzzFunc::OwnerReference(Box::new(f))
    }

    pub fn time<F>(f: F) -> Self
    where
        F: Fn(&mut Time, &mut Continue<'_>) + Send + Sync + 'static,
    {
        FuzzFunc::Time(Box::new(f))
    }

    /// Short name of the shape this entry is tagged with
    pub fn shape_name(&self) -> &'static str {
        match self {
            FuzzFunc::TypeMeta(_) => "TypeMeta",
            FuzzFunc::ObjectMeta(_) => "ObjectMeta",
            FuzzFunc::ObjectMetaVariadic(_) => "ObjectMetaVariadic",
            FuzzFunc::ListMeta(_) => "ListMeta",
            FuzzFunc::ManagedFieldsEntry(_) => "ManagedFieldsEntry",
            FuzzFunc::OwnerReference(_) => "OwnerReference",
            FuzzFunc::Time(_) => "Time",
            FuzzFunc::Value(_) => "Value",
        }
    }

    /// True for every entry except [`FuzzFunc::Value`]
    pub fn is_callable(&self) -> bool {
        !matches!(self, FuzzFunc::Value(_))
    }
}

impl fmt::Debug for FuzzFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuzzFunc::Value(desc) => f.debug_tuple("Value").field(desc).finish(),
            other => write!(f, "{}(<fn>)", other.shape_name()),
        }
    }
}

/// A provider of fuzzer functions for a codec context
pub type FuzzerFuncs = Box<dyn Fn(&CodecFactory) -> Vec<FuzzFunc> + Send + Sync>;

/// Combine providers into one that returns all their functions in order
///
/// Absent providers are skipped. No function is filtered or replaced; the
/// harness decides precedence (last registered wins).
pub fn merge_fuzzer_funcs(funcs: Vec<Option<FuzzerFuncs>>) -> FuzzerFuncs {
    Box::new(move |codecs: &CodecFactory| {
        let mut result = Vec::new();
        for provider in funcs.iter().flatten() {
            result.extend(provider(codecs));
        }
        log::trace!("Merged {} fuzzer functions for scheme {}", result.len(), codecs.scheme);
        result
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(shapes: usize) -> FuzzerFuncs {
        Box::new(move |_codecs: &CodecFactory| {
            (0..shapes)
                .map(|_| FuzzFunc::type_meta(|t, _c| t.kind.clear()))
                .collect()
        })
    }

    #[test]
    fn test_merge_preserves_order_and_skips_absent() {
        let first: FuzzerFuncs = Box::new(|_codecs: &CodecFactory| {
            vec![FuzzFunc::list_meta(|_l, _c| {}), FuzzFunc::time(|_t, _c| {})]
        });
        let merged = merge_fuzzer_funcs(vec![Some(first), None, Some(provider(2))]);
        let funcs = merged(&CodecFactory::default());

        let shapes: Vec<_> = funcs.iter().map(FuzzFunc::shape_name).collect();
        assert_eq!(shapes, vec!["ListMeta", "Time", "TypeMeta", "TypeMeta"]);
    }

    #[test]
    fn test_merge_of_nothing_is_empty() {
        let merged = merge_fuzzer_funcs(vec![None, None]);
        assert!(merged(&CodecFactory::default()).is_empty());
    }

    #[test]
    fn test_debug_does_not_invoke() {
        let f = FuzzFunc::object_meta(|_m, _c| panic!("must not be called"));
        assert_eq!(format!("{:?}", f), "ObjectMeta(<fn>)");
        assert!(f.is_callable());
    }
}

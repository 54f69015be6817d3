//! Static shape descriptors and the ObjectMeta signature matcher
//!
//! Every [`FuzzFunc`] variant has a fixed [`Signature`] known at compile
//! time, so "what does this callback look like" is answered by a pattern
//! match rather than by inspecting values at runtime.

use crate::fuzz::CONTINUE_PACKAGE;
use crate::funcs::FuzzFunc;
use serde::Serialize;
use std::fmt;

/// Namespace of the versioned metadata API types
pub const META_V1_PACKAGE: &str = "meta.k8s.io/v1";

/// Coarse classification of a described type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Func,
    Ptr,
    Struct,
    Slice,
    Map,
    String,
    Int,
    Uint,
    Bool,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Func => "func",
            Kind::Ptr => "ptr",
            Kind::Struct => "struct",
            Kind::Slice => "slice",
            Kind::Map => "map",
            Kind::String => "string",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// Static description of a parameter or result type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDesc {
    /// Type name; empty for unnamed pointer/slice types
    pub name: &'static str,
    /// Declaring namespace; empty for built-in and unnamed types
    pub package: &'static str,
    pub kind: Kind,
    /// Pointee or element type
    pub elem: Option<&'static TypeDesc>,
}

impl TypeDesc {
    pub const fn named(name: &'static str, package: &'static str, kind: Kind) -> Self {
        Self {
            name,
            package,
            kind,
            elem: None,
        }
    }

    pub const fn builtin(name: &'static str, kind: Kind) -> Self {
        Self::named(name, "", kind)
    }

    pub const fn pointer(elem: &'static TypeDesc) -> Self {
        Self {
            name: "",
            package: "",
            kind: Kind::Ptr,
            elem: Some(elem),
        }
    }

    pub const fn slice(elem: &'static TypeDesc) -> Self {
        Self {
            name: "",
            package: "",
            kind: Kind::Slice,
            elem: Some(elem),
        }
    }

    fn is_named(&self, name: &str, package: &str) -> bool {
        self.name == name && self.package == package
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.elem) {
            (Kind::Ptr, Some(elem)) => write!(f, "*{}", elem),
            (Kind::Slice, Some(elem)) => write!(f, "[]{}", elem),
            _ if self.package.is_empty() => f.write_str(self.name),
            _ => write!(f, "{}.{}", self.package, self.name),
        }
    }
}

pub const STR: TypeDesc = TypeDesc::builtin("str", Kind::String);
pub const STR_SLICE: TypeDesc = TypeDesc::slice(&STR);
pub const CONTINUE: TypeDesc = TypeDesc::named("Continue", CONTINUE_PACKAGE, Kind::Struct);
pub const TYPE_META: TypeDesc = TypeDesc::named("TypeMeta", META_V1_PACKAGE, Kind::Struct);
pub const OBJECT_META: TypeDesc = TypeDesc::named("ObjectMeta", META_V1_PACKAGE, Kind::Struct);
pub const LIST_META: TypeDesc = TypeDesc::named("ListMeta", META_V1_PACKAGE, Kind::Struct);
pub const MANAGED_FIELDS_ENTRY: TypeDesc =
    TypeDesc::named("ManagedFieldsEntry", META_V1_PACKAGE, Kind::Struct);
pub const OWNER_REFERENCE: TypeDesc = TypeDesc::named("OwnerReference", META_V1_PACKAGE, Kind::Struct);
pub const TIME: TypeDesc = TypeDesc::named("Time", META_V1_PACKAGE, Kind::Struct);

/// Parameter and result shape of a callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<TypeDesc>,
    pub results: Vec<TypeDesc>,
    /// The last parameter accepts any number of values
    pub variadic: bool,
}

impl Signature {
    /// `fn(*target, Continue)`, the shape of every plain fuzzer function
    pub fn fuzzer(target: &'static TypeDesc) -> Self {
        Self {
            params: vec![TypeDesc::pointer(target), CONTINUE],
            results: Vec::new(),
            variadic: false,
        }
    }

    /// True only for exactly `fn(*ObjectMeta, Continue)`: two parameters,
    /// no results, not variadic, both parameter types from their expected
    /// namespaces
    pub fn is_object_meta_fuzzer(&self) -> bool {
        if self.params.len() != 2 || !self.results.is_empty() || self.variadic {
            return false;
        }
        let target = &self.params[0];
        let target_ok = target.kind == Kind::Ptr
            && target
                .elem
                .map_or(false, |elem| elem.is_named("ObjectMeta", META_V1_PACKAGE));
        let cont = &self.params[1];
        let cont_ok = cont.kind != Kind::Ptr && cont.is_named("Continue", CONTINUE_PACKAGE);
        target_ok && cont_ok
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("fn(")?;
        let last = self.params.len().saturating_sub(1);
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match (self.variadic && i == last, param.elem) {
                (true, Some(elem)) if param.kind == Kind::Slice => write!(f, "...{}", elem)?,
                _ => write!(f, "{}", param)?,
            }
        }
        f.write_str(")")?;
        match self.results.as_slice() {
            [] => Ok(()),
            [single] => write!(f, " -> {}", single),
            many => {
                f.write_str(" -> (")?;
                for (i, result) in many.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", result)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl FuzzFunc {
    /// Static signature of the callback, `None` for non-callable entries
    pub fn signature(&self) -> Option<Signature> {
        let sig = match self {
            FuzzFunc::TypeMeta(_) => Signature::fuzzer(&TYPE_META),
            FuzzFunc::ObjectMeta(_) => Signature::fuzzer(&OBJECT_META),
            FuzzFunc::ObjectMetaVariadic(_) => {
                let mut sig = Signature::fuzzer(&OBJECT_META);
                sig.params.push(STR_SLICE);
                sig.variadic = true;
                sig
            }
            FuzzFunc::ListMeta(_) => Signature::fuzzer(&LIST_META),
            FuzzFunc::ManagedFieldsEntry(_) => Signature::fuzzer(&MANAGED_FIELDS_ENTRY),
            FuzzFunc::OwnerReference(_) => Signature::fuzzer(&OWNER_REFERENCE),
            FuzzFunc::Time(_) => Signature::fuzzer(&TIME),
            FuzzFunc::Value(_) => return None,
        };
        Some(sig)
    }
}

/// Does `f` have exactly the `fn(*ObjectMeta, Continue)` shape?
///
/// Identity is structural: any callback tagged [`FuzzFunc::ObjectMeta`]
/// matches regardless of where it was defined. Variadic callbacks and
/// non-callable entries never match.
pub fn is_object_meta_fuzzer(f: &FuzzFunc) -> bool {
    matches!(f, FuzzFunc::ObjectMeta(_))
}

/// Position of the first `fn(*ObjectMeta, Continue)` callback in `funcs`
pub fn index_of_object_meta_fuzzer(funcs: &[FuzzFunc]) -> Option<usize> {
    funcs.iter().position(is_object_meta_fuzzer)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OTHER_OBJECT_META: TypeDesc = TypeDesc::named("ObjectMeta", "meta.k8s.io/v1beta1", Kind::Struct);
    const OTHER_CONTINUE: TypeDesc = TypeDesc::named("Continue", "other::fuzz", Kind::Struct);

    fn every_shape() -> Vec<FuzzFunc> {
        vec![
            FuzzFunc::type_meta(|_t, _c| {}),
            FuzzFunc::object_meta(|_m, _c| {}),
            FuzzFunc::object_meta_variadic(|_m, _c, _fields| {}),
            FuzzFunc::list_meta(|_l, _c| {}),
            FuzzFunc::managed_fields_entry(|_e, _c| {}),
            FuzzFunc::owner_reference(|_o, _c| {}),
            FuzzFunc::time(|_t, _c| {}),
            FuzzFunc::Value(OBJECT_META),
        ]
    }

    #[test]
    fn test_matcher_agrees_with_structural_check() {
        for f in every_shape() {
            let structural = f.signature().map_or(false, |s| s.is_object_meta_fuzzer());
            assert_eq!(is_object_meta_fuzzer(&f), structural, "shape {}", f.shape_name());
        }
    }

    #[test]
    fn test_match_is_structural_not_nominal() {
        fn defined_elsewhere() -> FuzzFunc {
            FuzzFunc::object_meta(|m, c| m.name = c.rand_string())
        }
        assert!(is_object_meta_fuzzer(&defined_elsewhere()));
        assert!(is_object_meta_fuzzer(&FuzzFunc::object_meta(|_m, _c| {})));
    }

    #[test]
    fn test_variadic_and_values_never_match() {
        assert!(!is_object_meta_fuzzer(&FuzzFunc::object_meta_variadic(|_m, _c, _f| {})));
        assert!(!is_object_meta_fuzzer(&FuzzFunc::Value(OBJECT_META)));
        assert!(!is_object_meta_fuzzer(&FuzzFunc::Value(TypeDesc::pointer(&OBJECT_META))));
    }

    #[test]
    fn test_wrong_namespace_or_name_rejected() {
        let wrong_target = Signature {
            params: vec![TypeDesc::pointer(&OTHER_OBJECT_META), CONTINUE],
            results: Vec::new(),
            variadic: false,
        };
        assert!(!wrong_target.is_object_meta_fuzzer());

        let wrong_continue = Signature {
            params: vec![TypeDesc::pointer(&OBJECT_META), OTHER_CONTINUE],
            results: Vec::new(),
            variadic: false,
        };
        assert!(!wrong_continue.is_object_meta_fuzzer());

        // Second parameter must be checked on its own, not as a repeat of the first
        let target_twice = Signature {
            params: vec![TypeDesc::pointer(&OBJECT_META), TypeDesc::pointer(&OBJECT_META)],
            results: Vec::new(),
            variadic: false,
        };
        assert!(!target_twice.is_object_meta_fuzzer());

        let by_value = Signature {
            params: vec![OBJECT_META, CONTINUE],
            results: Vec::new(),
            variadic: false,
        };
        assert!(!by_value.is_object_meta_fuzzer());
    }

    #[test]
    fn test_arity_results_and_variadic_rejected() {
        let mut sig = Signature::fuzzer(&OBJECT_META);
        assert!(sig.is_object_meta_fuzzer());

        sig.results.push(STR);
        assert!(!sig.is_object_meta_fuzzer());

        let mut sig = Signature::fuzzer(&OBJECT_META);
        sig.variadic = true;
        assert!(!sig.is_object_meta_fuzzer());

        let mut sig = Signature::fuzzer(&OBJECT_META);
        sig.params.pop();
        assert!(!sig.is_object_meta_fuzzer());
    }

    #[test]
    fn test_index_of_object_meta_fuzzer() {
        let funcs = every_shape();
        assert_eq!(index_of_object_meta_fuzzer(&funcs), Some(1));
        assert_eq!(index_of_object_meta_fuzzer(&funcs[2..]), None);
        assert_eq!(index_of_object_meta_fuzzer(&[]), None);
    }

    #[test]
    fn test_signature_display() {
        let sig = FuzzFunc::object_meta_variadic(|_m, _c, _f| {}).signature().unwrap();
        assert_eq!(
            sig.to_string(),
            format!("fn(*meta.k8s.io/v1.ObjectMeta, {}.Continue, ...str)", CONTINUE_PACKAGE)
        );
        let mut sig = Signature::fuzzer(&TIME);
        sig.results = vec![STR, TypeDesc::builtin("bool", Kind::Bool)];
        assert!(sig.to_string().ends_with(" -> (str, bool)"));
    }
}

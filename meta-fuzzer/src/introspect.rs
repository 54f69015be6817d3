//! Diagnostic description of fuzzer functions
//!
//! Reports are built from static signatures only. A callback is never
//! invoked while it is being described.

use crate::funcs::FuzzFunc;
use crate::signature::{Kind, TypeDesc};
use serde::Serialize;
use std::fmt;

/// Shape of one parameter or result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamReport {
    pub kind: Kind,
    pub type_name: String,
    pub package: String,
    /// Pointee (or element) name, for pointer and slice types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elem_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elem_package: Option<String>,
}

impl From<&TypeDesc> for ParamReport {
    fn from(desc: &TypeDesc) -> Self {
        Self {
            kind: desc.kind,
            type_name: desc.to_string(),
            package: desc.package.to_string(),
            elem_name: desc.elem.map(|e| e.name.to_string()),
            elem_package: desc.elem.map(|e| e.package.to_string()),
        }
    }
}

/// Static description of one registry entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FuncReport {
    pub index: usize,
    pub shape: &'static str,
    /// Full signature, or the value's type for non-callable entries
    pub signature: String,
    pub callable: bool,
    pub variadic: bool,
    /// True for the `fn(*ObjectMeta, Continue)` shape
    pub canonical: bool,
    pub params: Vec<ParamReport>,
    pub results: Vec<ParamReport>,
}

/// Describe a single entry
pub fn describe(index: usize, f: &FuzzFunc) -> FuncReport {
    match f.signature() {
        Some(sig) => FuncReport {
            index,
            shape: f.shape_name(),
            signature: sig.to_string(),
            callable: true,
            variadic: sig.variadic,
            canonical: sig.is_object_meta_fuzzer(),
            params: sig.params.iter().map(ParamReport::from).collect(),
            results: sig.results.iter().map(ParamReport::from).collect(),
        },
        None => {
            let value_type = match f {
                FuzzFunc::Value(desc) => desc.to_string(),
                _ => String::new(),
            };
            FuncReport {
                index,
                shape: f.shape_name(),
                signature: value_type,
                callable: false,
                variadic: false,
                canonical: false,
                params: Vec::new(),
                results: Vec::new(),
            }
        }
    }
}

/// Describe every entry of a list, in order
pub fn describe_all(funcs: &[FuzzFunc]) -> Vec<FuncReport> {
    funcs.iter().enumerate().map(|(i, f)| describe(i, f)).collect()
}

impl fmt::Display for FuncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.callable {
            return writeln!(f, "[{}] {} (not a function: {})", self.index, self.shape, self.signature);
        }
        writeln!(f, "[{}] {}", self.index, self.signature)?;
        writeln!(f, "    variadic: {}  canonical: {}", self.variadic, self.canonical)?;
        for (i, param) in self.params.iter().enumerate() {
            write!(f, "    in[{}]: {}", i, param.kind)?;
            match (&param.elem_name, &param.elem_package) {
                (Some(name), Some(pkg)) => writeln!(f, " -> {} ({})", name, pkg)?,
                _ => writeln!(f, " {} ({})", param.type_name, param.package)?,
            }
        }
        for (i, result) in self.results.iter().enumerate() {
            writeln!(f, "    out[{}]: {} {}", i, result.kind, result.type_name)?;
        }
        Ok(())
    }
}

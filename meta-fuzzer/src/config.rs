//! Fuzzer configuration types
//!
//! This module defines the knobs of the randomized-value harness. The
//! callback registry itself is not configured here - it is built from
//! fuzzer-function providers at runtime.

use crate::types::{FuzzerError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the fuzzing harness
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FuzzerConfig {
    /// Optional: fixed RNG seed (None = seed from entropy)
    #[serde(default)]
    pub seed: Option<u64>,

    /// Probability of leaving an optional field absent (default: 0.2)
    #[serde(default = "default_nil_chance")]
    pub nil_chance: f64,

    /// Minimum number of elements in generated lists and maps (default: 1)
    #[serde(default = "default_min_elements")]
    pub min_elements: usize,

    /// Maximum number of elements in generated lists and maps (default: 10)
    #[serde(default = "default_max_elements")]
    pub max_elements: usize,

    /// Maximum length of generated strings (default: 20)
    #[serde(default = "default_max_string_len")]
    pub max_string_len: usize,
}

fn default_nil_chance() -> f64 {
    0.2
}

fn default_min_elements() -> usize {
    1
}

fn default_max_elements() -> usize {
    10
}

fn default_max_string_len() -> usize {
    20
}

impl Default for FuzzerConfig {
    fn default() -> Self {
        Self {
            seed: None,
            nil_chance: default_nil_chance(),
            min_elements: default_min_elements(),
            max_elements: default_max_elements(),
            max_string_len: default_max_string_len(),
        }
    }
}

impl FuzzerConfig {
    /// Create a new fuzzer configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: fix the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method: set the chance of generating absent optionals
    pub fn with_nil_chance(mut self, nil_chance: f64) -> Self {
        self.nil_chance = nil_chance;
        self
    }

    /// Builder method: set the element count range for lists and maps
    pub fn with_elements(mut self, min: usize, max: usize) -> Self {
        self.min_elements = min;
        self.max_elements = max;
        self
    }

    /// Builder method: set the maximum generated string length
    pub fn with_max_string_len(mut self, len: usize) -> Self {
        self.max_string_len = len;
        self
    }

    /// Check that the configuration describes a usable harness
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.nil_chance) {
            return Err(FuzzerError::InvalidConfig(format!(
                "nil_chance must be within [0, 1], got {}",
                self.nil_chance
            )));
        }
        if self.min_elements > self.max_elements {
            return Err(FuzzerError::InvalidConfig(format!(
                "min_elements ({}) exceeds max_elements ({})",
                self.min_elements, self.max_elements
            )));
        }
        Ok(())
    }
}

//! Machine family extraction and static classification tables
//!
//! A "family" is the short code GCP uses for a compute SKU line (`n2d`, `t2a`,
//! ...), grouping many concrete instance sizes. Each family carries two fixed,
//! independent classifications: CPU architecture and workload category. Both
//! are static lookup tables, not derived data.

use clap::ValueEnum;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// CPU architecture of a machine family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Arch {
    Amd64,
    Arm,
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arch::Amd64 => write!(f, "amd64"),
            Arch::Arm => write!(f, "arm"),
        }
    }
}

impl Arch {
    /// Uppercase label used in the ComputeClass description.
    pub fn label(&self) -> &'static str {
        match self {
            Arch::Amd64 => "AMD64",
            Arch::Arm => "ARM",
        }
    }
}

const ARM_FAMILIES: &[&str] = &["t2a", "c4a"];

/// Ordered whole-word patterns, one per known family code.
///
/// Order matters for prefix-overlapping codes: `n2d` is tested before `n2`,
/// `c4a`/`c4d` before `c4`, and so on. The `\b` word boundary already keeps
/// `\bn2\b` from matching inside `n2d`, so no lookahead is needed.
const FAMILY_PATTERNS: &[&str] = &[
    "n2d", "n2", "n1", "n4", "e2", "c2d", "c2", "c3d", "c3", "c4a", "c4d", "c4", "t2a", "t2d",
    "m1", "m2", "m3", "m4", "a2", "a3", "g1", "g2", "h3", "z3",
];

static FAMILY_MATCHERS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    FAMILY_PATTERNS
        .iter()
        .map(|family| {
            let re = Regex::new(&format!(r"\b{}\b", family)).expect("static family pattern");
            (*family, re)
        })
        .collect()
});

/// Extract the machine family from a SKU description.
///
/// Returns the first matching family code, or `None` when no known family
/// token appears in the description. Pure and total.
pub fn extract(description: &str) -> Option<&'static str> {
    let desc = description.to_lowercase();
    FAMILY_MATCHERS
        .iter()
        .find(|(_, re)| re.is_match(&desc))
        .map(|(family, _)| *family)
}

/// Fixed architecture classification of a family.
pub fn arch_of(family: &str) -> Arch {
    if ARM_FAMILIES.contains(&family) {
        Arch::Arm
    } else {
        Arch::Amd64
    }
}

/// Workload categories, in canonical order.
pub const ALL_CATEGORIES: &[&str] = &[
    "general-purpose",
    "compute-optimised",
    "memory-optimised",
    "storage-optimised",
    "gpu",
];

/// Families belonging to a category tag.
///
/// An unrecognized tag maps to the empty set rather than an error, so a typo
/// in a category filter legitimately produces an empty result.
pub fn families_for(category: &str) -> &'static [&'static str] {
    match category {
        "general-purpose" => &["e2", "n1", "n2", "n2d", "n4", "t2d", "t2a"],
        "compute-optimised" => &["c2", "c2d", "c3", "c3d", "c4", "c4a", "c4d", "h3"],
        "memory-optimised" => &["m1", "m2", "m3", "m4"],
        "storage-optimised" => &["z3"],
        "gpu" => &["a2", "a3", "g1", "g2"],
        _ => &[],
    }
}

/// Short prefix used when building the generated metadata name.
pub fn abbreviate(category: &str) -> &str {
    match category {
        "general-purpose" => "gp",
        "compute-optimised" => "co",
        "memory-optimised" => "mo",
        "storage-optimised" => "so",
        "gpu" => "gpu",
        other => other,
    }
}

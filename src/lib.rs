//! gkecc library
//!
//! Core pipeline for generating cost-optimised GKE ComputeClass manifests
//! from GCP Cloud Billing catalog data.

pub mod auth;
pub mod billing;
pub mod cache;
pub mod compute;
pub mod costs;
pub mod error;
pub mod families;
pub mod generate;
pub mod labels;
pub mod output;
pub mod pricing;
pub mod validate;

// Re-export commonly used types
pub use costs::CostOption;
pub use families::Arch;
pub use generate::{GenerateOptions, OutputFormat};
pub use pricing::{FamilyPricing, PriceLineItem};

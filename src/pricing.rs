//! Pricing normalization
//!
//! Turns the raw SKU line items from the billing catalog into one
//! `FamilyPricing` per machine family, holding averaged hourly unit prices for
//! the four resource/purchase-option combinations.

use crate::families::{self, Arch};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// One price entry from the billing catalog. Also the cache record shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceLineItem {
    pub description: String,
    pub regions: Vec<String>,
    /// USD per core-hour or per GB-hour, depending on the description.
    pub price: f64,
}

/// Averaged hourly unit prices for one machine family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FamilyPricing {
    pub spot_core: f64,
    pub spot_ram: f64,
    pub ondemand_core: f64,
    pub ondemand_ram: f64,
}

#[derive(Default)]
struct PriceBuckets {
    spot_core: Vec<f64>,
    spot_ram: Vec<f64>,
    ondemand_core: Vec<f64>,
    ondemand_ram: Vec<f64>,
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Filter line items by region and architecture and average them per family.
///
/// A family appears in the result only when it has at least one matching line
/// item in all four buckets (spot/on-demand x core/RAM); partial data is
/// dropped silently.
pub fn normalize(
    items: &[PriceLineItem],
    region: &str,
    arch: Arch,
) -> BTreeMap<String, FamilyPricing> {
    let mut buckets: HashMap<&'static str, PriceBuckets> = HashMap::new();
    let mut matched = 0usize;

    for item in items {
        // Region is an exact (case-insensitive) match against the SKU's
        // region set, never a substring check.
        if !item.regions.iter().any(|r| r.eq_ignore_ascii_case(region)) {
            continue;
        }

        let desc = item.description.to_lowercase();
        let is_spot = desc.contains("spot") || desc.contains("preemptible");

        if !desc.contains("instance") {
            continue;
        }
        // Custom-machine SKUs are priced per-core/per-GB like predefined
        // machines, so counting them would double-weight the averages.
        if desc.contains("custom") {
            continue;
        }

        let is_core = desc.contains("core") && desc.contains("running");
        let is_ram = desc.contains("ram") && desc.contains("running");
        if !(is_core || is_ram) {
            continue;
        }

        let Some(family) = families::extract(&desc) else {
            continue;
        };

        if families::arch_of(family) != arch {
            continue;
        }

        matched += 1;
        let bucket = buckets.entry(family).or_default();
        match (is_spot, is_core) {
            (true, true) => bucket.spot_core.push(item.price),
            (true, false) => bucket.spot_ram.push(item.price),
            (false, true) => bucket.ondemand_core.push(item.price),
            (false, false) => bucket.ondemand_ram.push(item.price),
        }
    }

    debug!(
        "matched {} of {} pricing line items for {}/{}",
        matched,
        items.len(),
        region,
        arch
    );

    buckets
        .into_iter()
        .filter(|(_, b)| {
            !b.spot_core.is_empty()
                && !b.spot_ram.is_empty()
                && !b.ondemand_core.is_empty()
                && !b.ondemand_ram.is_empty()
        })
        .map(|(family, b)| {
            (
                family.to_string(),
                FamilyPricing {
                    spot_core: mean(&b.spot_core),
                    spot_ram: mean(&b.spot_ram),
                    ondemand_core: mean(&b.ondemand_core),
                    ondemand_ram: mean(&b.ondemand_ram),
                },
            )
        })
        .collect()
}

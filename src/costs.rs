//! Cost ranking and filtering
//!
//! Expands per-family pricing into costed spot/on-demand options for a
//! requested (vCPU, RAM) shape, sorts by total hourly cost, and applies the
//! category and daily-budget filters.

use crate::families;
use crate::pricing::FamilyPricing;
use std::collections::BTreeMap;

/// One costed choice: a machine family under a single purchase option.
#[derive(Debug, Clone, PartialEq)]
pub struct CostOption {
    pub family: String,
    pub spot: bool,
    /// Total USD per hour for the requested shape.
    pub hourly: f64,
    pub core_price: f64,
    pub ram_price: f64,
}

impl CostOption {
    pub fn daily(&self) -> f64 {
        self.hourly * 24.0
    }

    pub fn purchase_label(&self) -> &'static str {
        if self.spot {
            "spot"
        } else {
            "on-demand"
        }
    }
}

/// Emit two options (spot, on-demand) per family and sort ascending by total
/// hourly cost. A zero shape is legal and yields zero totals.
pub fn rank(
    pricing: &BTreeMap<String, FamilyPricing>,
    vcpus: u32,
    ram_gb: f64,
) -> Vec<CostOption> {
    let vcpus = vcpus as f64;
    let mut options = Vec::with_capacity(pricing.len() * 2);

    for (family, prices) in pricing {
        options.push(CostOption {
            family: family.clone(),
            spot: true,
            hourly: prices.spot_core * vcpus + prices.spot_ram * ram_gb,
            core_price: prices.spot_core,
            ram_price: prices.spot_ram,
        });
        options.push(CostOption {
            family: family.clone(),
            spot: false,
            hourly: prices.ondemand_core * vcpus + prices.ondemand_ram * ram_gb,
            core_price: prices.ondemand_core,
            ram_price: prices.ondemand_ram,
        });
    }

    options.sort_by(|a, b| a.hourly.total_cmp(&b.hourly));
    options
}

/// Keep options whose family belongs to at least one requested category.
/// An empty tag list passes everything through unchanged.
pub fn filter_by_category(options: Vec<CostOption>, categories: &[String]) -> Vec<CostOption> {
    if categories.is_empty() {
        return options;
    }
    options
        .into_iter()
        .filter(|opt| {
            categories
                .iter()
                .any(|c| families::families_for(c).contains(&opt.family.as_str()))
        })
        .collect()
}

/// Keep options whose projected daily cost fits the budget.
/// `None` passes everything through unchanged.
pub fn filter_by_max_cost(options: Vec<CostOption>, max_daily_usd: Option<f64>) -> Vec<CostOption> {
    match max_daily_usd {
        None => options,
        Some(max) => options.into_iter().filter(|o| o.daily() <= max).collect(),
    }
}

/// Relative cost against the cheapest surviving entry: `"cheapest"` for the
/// cheapest itself, otherwise the multiplier rounded to one decimal.
pub fn comparison(total: f64, cheapest: f64) -> String {
    if total <= cheapest {
        "cheapest".to_string()
    } else {
        format!("{:.1}x", total / cheapest)
    }
}

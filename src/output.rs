//! Output rendering
//!
//! Pure formatting over an already-ranked, already-filtered option list:
//! either the ComputeClass YAML document (built by string templating, since
//! the per-priority cost comments cannot be expressed through a YAML
//! serializer) or a plain comparison table.

use crate::costs::{self, CostOption};
use crate::families::{self, Arch};
use comfy_table::Table;
use std::collections::BTreeMap;

/// Everything the emitter needs besides the options themselves.
#[derive(Debug, Clone)]
pub struct DocumentMeta {
    pub region: String,
    pub arch: Arch,
    /// Category tags the list was filtered by; empty means unfiltered.
    pub categories: Vec<String>,
    pub max_daily_cost: Option<f64>,
    pub node_labels: BTreeMap<String, String>,
    /// Explicit metadata.name override.
    pub name: Option<String>,
    pub vcpus: u32,
    pub ram_gb: f64,
}

impl DocumentMeta {
    /// `metadata.name`: explicit override, else category abbreviations sorted
    /// alphabetically and joined with `-`, suffixed with the region.
    fn document_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        if self.categories.is_empty() {
            return self.region.clone();
        }
        let mut abbrevs: Vec<&str> = self
            .categories
            .iter()
            .map(|c| families::abbreviate(c))
            .collect();
        abbrevs.sort_unstable();
        format!("{}-{}", abbrevs.join("-"), self.region)
    }

    fn description(&self) -> String {
        let mut desc = self.arch.label().to_string();
        if !self.categories.is_empty() {
            let mut cats = self.categories.clone();
            cats.sort_unstable();
            desc.push_str(&format!(" {}", cats.join("+")));
        }
        desc.push_str(&format!(" for {}", self.region));
        if let Some(max) = self.max_daily_cost {
            desc.push_str(&format!(", max ${}/day", max));
        }
        desc
    }
}

/// Render the ComputeClass YAML document.
pub fn render_yaml(meta: &DocumentMeta, options: &[CostOption]) -> String {
    let cheapest_daily = options.first().map(|o| o.daily()).unwrap_or(0.0);
    let mut out = String::new();

    out.push_str("apiVersion: cloud.google.com/v1\n");
    out.push_str("kind: ComputeClass\n");
    out.push_str("metadata:\n");
    out.push_str(&format!("  name: {}\n", meta.document_name()));
    out.push_str("spec:\n");
    out.push_str(&format!("  description: \"{}\"\n", meta.description()));
    out.push_str("  whenUnsatisfiable: ScaleUpAnyway\n");
    out.push_str("  nodePoolAutoCreation:\n");
    out.push_str("    enabled: true\n");
    if !meta.node_labels.is_empty() {
        out.push_str("    nodeLabels:\n");
        for (key, value) in &meta.node_labels {
            out.push_str(&format!("      {}: \"{}\"\n", key, value));
        }
    }
    out.push_str("  priorities:\n");

    for option in options {
        out.push_str(&format!(
            "    - machineFamily: {}  # ${:.2}/day ({}vCPU+{}GB, {}, {})\n",
            option.family,
            option.daily(),
            meta.vcpus,
            meta.ram_gb,
            option.purchase_label(),
            costs::comparison(option.daily(), cheapest_daily),
        ));
        out.push_str(&format!("      spot: {}\n", option.spot));
    }

    out
}

/// Render the plain comparison table.
pub fn render_table(options: &[CostOption], vcpus: u32, ram_gb: f64) -> String {
    let cheapest_daily = options.first().map(|o| o.daily()).unwrap_or(0.0);

    let mut table = Table::new();
    table.set_header(vec!["Family", "Type", "Hourly", "Daily Cost", "Comparison"]);
    for option in options {
        table.add_row(vec![
            option.family.clone(),
            option.purchase_label().to_string(),
            format!("${:.5}/hr", option.hourly),
            format!("${:.2}/day", option.daily()),
            format!("({})", costs::comparison(option.daily(), cheapest_daily)),
        ]);
    }

    format!(
        "Options for {}vCPU+{}GB, cheapest first:\n{}\n",
        vcpus, ram_gb, table
    )
}

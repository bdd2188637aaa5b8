//! Machine-type compatibility validation
//!
//! Cross-checks candidate machine families against the live Compute Engine
//! machine-type catalog: a family is compatible with the requested shape when
//! either a predefined size matches it, or the family supports custom shapes
//! and the RAM/vCPU ratio is within the allowed range.

use crate::error::Result;
use async_trait::async_trait;
use std::collections::BTreeSet;
use tracing::debug;

/// RAM tolerance when matching a predefined size, in MB.
const PREDEFINED_RAM_TOLERANCE_MB: f64 = 512.0;

/// Families that accept arbitrary custom core/RAM shapes.
const CUSTOM_SHAPE_FAMILIES: &[&str] = &["e2", "n1", "n2", "n2d", "n4"];

/// Inclusive GB-per-vCPU range accepted for custom shapes.
const CUSTOM_RATIO_MIN: f64 = 0.9;
const CUSTOM_RATIO_MAX: f64 = 6.5;

/// One machine type from the Compute Engine catalog.
#[derive(Debug, Clone)]
pub struct MachineType {
    pub name: String,
    pub guest_cpus: u32,
    pub memory_mb: u64,
}

/// Seam over the live machine-type catalog, so validation can be exercised
/// without network access.
#[async_trait]
pub trait MachineTypeCatalog {
    async fn list_machine_types(&self, project: &str, zone: &str) -> Result<Vec<MachineType>>;
}

/// Determine which candidate families the platform can actually provision for
/// the requested shape.
///
/// The zone is derived as `<region>-a`. This assumes every region has an `-a`
/// zone, which holds for current GCP regions but is not guaranteed.
///
/// Families matching neither acceptance path are simply omitted from the
/// result; only catalog access failures propagate as errors.
pub async fn validate_compatibility<C: MachineTypeCatalog + ?Sized>(
    catalog: &C,
    project: &str,
    region: &str,
    vcpus: u32,
    ram_gb: f64,
    families: &BTreeSet<String>,
) -> Result<BTreeSet<String>> {
    let zone = format!("{}-a", region);
    let machine_types = catalog.list_machine_types(project, &zone).await?;
    debug!("{} machine types listed in {}", machine_types.len(), zone);

    let requested_mb = ram_gb * 1024.0;
    let mut compatible = BTreeSet::new();

    // Path (a): a predefined size with the exact core count and RAM within
    // tolerance exists for the family.
    for mt in &machine_types {
        let Some(family) = families
            .iter()
            .find(|f| mt.name.starts_with(&format!("{}-", f)))
        else {
            continue;
        };
        if mt.guest_cpus == vcpus
            && (mt.memory_mb as f64 - requested_mb).abs() <= PREDEFINED_RAM_TOLERANCE_MB
        {
            compatible.insert(family.clone());
        }
    }

    // Path (b): the family supports custom shapes and the ratio fits.
    if vcpus > 0 {
        let ratio = ram_gb / vcpus as f64;
        if (CUSTOM_RATIO_MIN..=CUSTOM_RATIO_MAX).contains(&ratio) {
            for family in families {
                if CUSTOM_SHAPE_FAMILIES.contains(&family.as_str()) {
                    compatible.insert(family.clone());
                }
            }
        }
    }

    Ok(compatible)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubCatalog {
        machine_types: Vec<MachineType>,
    }

    #[async_trait]
    impl MachineTypeCatalog for StubCatalog {
        async fn list_machine_types(&self, _project: &str, _zone: &str) -> Result<Vec<MachineType>> {
            Ok(self.machine_types.clone())
        }
    }

    fn mt(name: &str, cpus: u32, memory_mb: u64) -> MachineType {
        MachineType {
            name: name.to_string(),
            guest_cpus: cpus,
            memory_mb,
        }
    }

    fn family_set(families: &[&str]) -> BTreeSet<String> {
        families.iter().map(|f| f.to_string()).collect()
    }

    async fn run(
        catalog: &StubCatalog,
        vcpus: u32,
        ram_gb: f64,
        families: &[&str],
    ) -> BTreeSet<String> {
        validate_compatibility(catalog, "test-project", "us-central1", vcpus, ram_gb, &family_set(families))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_predefined_match() {
        let catalog = StubCatalog {
            machine_types: vec![
                mt("n2-standard-4", 4, 16384),
                mt("t2d-standard-4", 4, 16384),
            ],
        };
        // c2d has no predefined match and no custom-shape support.
        let result = run(&catalog, 4, 16.0, &["n2", "t2d", "c2d"]).await;
        assert_eq!(result, family_set(&["n2", "t2d"]));
    }

    #[tokio::test]
    async fn test_predefined_ram_tolerance() {
        let catalog = StubCatalog {
            machine_types: vec![mt("t2d-standard-4", 4, 16000)],
        };
        let result = run(&catalog, 4, 16.0, &["t2d"]).await;
        assert_eq!(result, family_set(&["t2d"]));

        // 1 GB off is outside the 512 MB tolerance.
        let catalog = StubCatalog {
            machine_types: vec![mt("t2d-standard-4", 4, 15360)],
        };
        let result = run(&catalog, 4, 16.0, &["t2d"]).await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_custom_shape_families() {
        let catalog = StubCatalog { machine_types: vec![] };
        let result = run(&catalog, 4, 16.0, &["n2", "n2d", "e2"]).await;
        assert_eq!(result, family_set(&["n2", "n2d", "e2"]));
    }

    #[tokio::test]
    async fn test_custom_ratio_out_of_range() {
        let catalog = StubCatalog { machine_types: vec![] };
        // 8 GB per vCPU is above the allowed range.
        let result = run(&catalog, 4, 32.0, &["n2", "n2d"]).await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_custom_ratio_boundaries() {
        let catalog = StubCatalog { machine_types: vec![] };

        // 0.9 GB/vCPU: accepted.
        assert_eq!(run(&catalog, 4, 3.6, &["n2"]).await, family_set(&["n2"]));
        // 6.5 GB/vCPU: accepted.
        assert_eq!(run(&catalog, 4, 26.0, &["n2"]).await, family_set(&["n2"]));
        // 0.875 GB/vCPU: rejected.
        assert!(run(&catalog, 4, 3.5, &["n2"]).await.is_empty());
        // 6.625 GB/vCPU: rejected.
        assert!(run(&catalog, 4, 26.5, &["n2"]).await.is_empty());
    }

    #[tokio::test]
    async fn test_mixed_predefined_and_custom() {
        let catalog = StubCatalog {
            machine_types: vec![mt("t2d-standard-4", 4, 16384)],
        };
        let result = run(&catalog, 4, 16.0, &["t2d", "n2", "n2d"]).await;
        assert_eq!(result, family_set(&["t2d", "n2", "n2d"]));
    }

    #[tokio::test]
    async fn test_no_matching_families() {
        let catalog = StubCatalog { machine_types: vec![] };
        let result = run(&catalog, 4, 16.0, &["c4a", "h3"]).await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_machine_types_ignored() {
        let catalog = StubCatalog {
            machine_types: vec![
                mt("n2-standard-4", 4, 16384),
                mt("unknown-type-4", 4, 16384),
            ],
        };
        let result = run(&catalog, 4, 16.0, &["t2d"]).await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_family_prefix_requires_separator() {
        // "n2d-standard-4" must not validate candidate "n2".
        let catalog = StubCatalog {
            machine_types: vec![mt("n2d-standard-4", 4, 16384)],
        };
        let result = validate_compatibility(
            &catalog,
            "test-project",
            "us-central1",
            4,
            32.0, // ratio 8.0 keeps the custom path out of the way
            &family_set(&["n2"]),
        )
        .await
        .unwrap();
        assert!(result.is_empty());
    }
}

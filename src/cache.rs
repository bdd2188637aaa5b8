//! Day-scoped SKU cache
//!
//! A single JSON document `{date: "YYYY-MM-DD", skus: [...]}` under the
//! per-user cache directory. The snapshot is valid only on the calendar day it
//! was written and is replaced wholesale on refresh. A stale, missing, or
//! malformed file is treated identically to "no cache" and never fails the
//! run.

use crate::pricing::PriceLineItem;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CACHE_FILE: &str = "skus.json";

#[derive(Serialize, Deserialize)]
struct CacheFile {
    date: String,
    skus: Vec<PriceLineItem>,
}

fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Per-user cache directory (`~/.cache/gkecc` on Linux).
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("gkecc")
}

/// Load the cached SKU snapshot if one was written today.
pub fn load_from(dir: &Path) -> Option<Vec<PriceLineItem>> {
    let path = dir.join(CACHE_FILE);
    if !path.exists() {
        return None;
    }

    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) => {
            warn!("failed to read SKU cache {}: {}", path.display(), e);
            return None;
        }
    };

    let cache: CacheFile = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("ignoring corrupted SKU cache {}: {}", path.display(), e);
            return None;
        }
    };

    if cache.date != today() {
        debug!("SKU cache dated {} is stale", cache.date);
        return None;
    }

    debug!("loaded {} SKUs from cache", cache.skus.len());
    Some(cache.skus)
}

/// Persist today's SKU snapshot. Best-effort: a write failure is logged and
/// the run continues without a cache.
pub fn save_to(dir: &Path, skus: &[PriceLineItem]) {
    let cache = CacheFile {
        date: today(),
        skus: skus.to_vec(),
    };

    match try_save(dir, &cache) {
        Ok(()) => debug!("cached {} SKUs in {}", skus.len(), dir.display()),
        Err(e) => warn!("failed to write SKU cache: {}", e),
    }
}

fn try_save(dir: &Path, cache: &CacheFile) -> crate::error::Result<()> {
    std::fs::create_dir_all(dir)?;
    let json = serde_json::to_string(cache)?;
    std::fs::write(dir.join(CACHE_FILE), json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_skus() -> Vec<PriceLineItem> {
        vec![PriceLineItem {
            description: "T2D Instance Core running in EMEA".to_string(),
            regions: vec!["europe-north1".to_string()],
            price: 0.0157,
        }]
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        save_to(dir.path(), &sample_skus());

        let loaded = load_from(dir.path()).expect("fresh cache loads");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].price, 0.0157);
    }

    #[test]
    fn test_load_missing_cache() {
        let dir = TempDir::new().unwrap();
        assert!(load_from(dir.path()).is_none());
    }

    #[test]
    fn test_load_stale_cache() {
        let dir = TempDir::new().unwrap();
        let stale = serde_json::json!({
            "date": "2020-01-01",
            "skus": [{"description": "T2D Instance Core running", "regions": ["europe-north1"], "price": 0.01}],
        });
        std::fs::write(dir.path().join(CACHE_FILE), stale.to_string()).unwrap();

        assert!(load_from(dir.path()).is_none());
    }

    #[test]
    fn test_load_corrupted_cache() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CACHE_FILE), "not json {").unwrap();
        assert!(load_from(dir.path()).is_none());

        // Well-formed JSON with missing keys is equally "no cache".
        std::fs::write(dir.path().join(CACHE_FILE), r#"{"skus": []}"#).unwrap();
        assert!(load_from(dir.path()).is_none());
    }

    #[test]
    fn test_save_replaces_wholesale() {
        let dir = TempDir::new().unwrap();
        save_to(dir.path(), &sample_skus());
        save_to(dir.path(), &[]);

        let loaded = load_from(dir.path()).expect("fresh cache loads");
        assert!(loaded.is_empty());
    }
}

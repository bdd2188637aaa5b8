//! Cloud Billing Catalog REST client
//!
//! Thin paginated client over `cloudbilling.googleapis.com`. Finds the
//! Compute Engine service and flattens its SKUs into `PriceLineItem`s, taking
//! the first pricing tier of the first pricing info as the hourly unit price
//! (`units + nanos / 1e9`).

use crate::error::{GkeccError, Result};
use crate::pricing::PriceLineItem;
use serde::Deserialize;
use tracing::{debug, info};

const DEFAULT_BASE_URL: &str = "https://cloudbilling.googleapis.com";
const PAGE_SIZE: u32 = 5000;

pub struct BillingClient {
    http: reqwest::Client,
    token: String,
    base_url: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceListResponse {
    #[serde(default)]
    services: Vec<Service>,
    #[serde(default)]
    next_page_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SkuListResponse {
    #[serde(default)]
    skus: Vec<Sku>,
    #[serde(default)]
    next_page_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Sku {
    #[serde(default)]
    description: String,
    #[serde(default)]
    service_regions: Vec<String>,
    #[serde(default)]
    pricing_info: Vec<PricingInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PricingInfo {
    pricing_expression: Option<PricingExpression>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PricingExpression {
    #[serde(default)]
    tiered_rates: Vec<TieredRate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TieredRate {
    unit_price: Option<UnitPrice>,
}

#[derive(Deserialize)]
struct UnitPrice {
    // The REST encoding renders int64 money units as a JSON string.
    #[serde(default)]
    units: Units,
    #[serde(default)]
    nanos: i64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Units {
    Text(String),
    Number(i64),
}

impl Default for Units {
    fn default() -> Self {
        Units::Number(0)
    }
}

impl Units {
    fn value(&self) -> i64 {
        match self {
            Units::Number(n) => *n,
            Units::Text(s) => s.parse().unwrap_or(0),
        }
    }
}

impl Sku {
    /// USD per hour from the first tier of the first pricing info.
    fn hourly_price(&self) -> Option<f64> {
        let tier = self
            .pricing_info
            .iter()
            .filter_map(|pi| pi.pricing_expression.as_ref())
            .flat_map(|pe| pe.tiered_rates.iter())
            .next()?;
        let unit_price = tier.unit_price.as_ref()?;
        Some(unit_price.units.value() as f64 + unit_price.nanos as f64 / 1e9)
    }
}

impl BillingClient {
    pub fn new(token: String) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL.to_string())
    }

    /// Base URL override, used by tests to point at a local mock server.
    pub fn with_base_url(token: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
            base_url,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| GkeccError::catalog("billing catalog unreachable", e))?
            .error_for_status()
            .map_err(|e| GkeccError::catalog("billing catalog request failed", e))?;

        response
            .json()
            .await
            .map_err(|e| GkeccError::catalog("invalid billing catalog response", e))
    }

    /// Locate the Compute Engine service in the billing catalog.
    pub async fn find_compute_service(&self) -> Result<Service> {
        let mut page_token = String::new();
        loop {
            let url = format!(
                "{}/v1/services?pageSize={}&pageToken={}",
                self.base_url, PAGE_SIZE, page_token
            );
            let page: ServiceListResponse = self.get_json(&url).await?;

            if let Some(service) = page
                .services
                .into_iter()
                .find(|s| s.display_name.contains("Compute Engine"))
            {
                info!("found service: {}", service.display_name);
                return Ok(service);
            }

            page_token = page.next_page_token;
            if page_token.is_empty() {
                return Err(GkeccError::Catalog {
                    message: "Compute Engine service not found".to_string(),
                    source: None,
                });
            }
        }
    }

    /// Fetch all SKUs of a service, flattened to priced line items. SKUs
    /// without a pricing tier are skipped.
    pub async fn list_skus(&self, service: &Service) -> Result<Vec<PriceLineItem>> {
        let mut items = Vec::new();
        let mut total = 0usize;
        let mut page_token = String::new();

        loop {
            let url = format!(
                "{}/v1/{}/skus?pageSize={}&pageToken={}",
                self.base_url, service.name, PAGE_SIZE, page_token
            );
            let page: SkuListResponse = self.get_json(&url).await?;

            total += page.skus.len();
            for sku in page.skus {
                let Some(price) = sku.hourly_price() else {
                    continue;
                };
                items.push(PriceLineItem {
                    description: sku.description,
                    regions: sku.service_regions,
                    price,
                });
            }

            page_token = page.next_page_token;
            if page_token.is_empty() {
                break;
            }
            debug!("fetched {} SKUs so far", total);
        }

        info!("fetched {} SKUs, {} with pricing", total, items.len());
        Ok(items)
    }
}

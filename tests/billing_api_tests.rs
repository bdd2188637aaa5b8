//! Billing catalog client tests against a local mock server: pagination,
//! the string-encoded money units in the REST payload, and transport failure
//! propagation.

use gkecc::billing::BillingClient;
use mockito::Matcher;

fn client(server: &mockito::ServerGuard) -> BillingClient {
    BillingClient::with_base_url("test-token".to_string(), server.url())
}

#[tokio::test]
async fn find_compute_service_follows_pagination() {
    let mut server = mockito::Server::new_async().await;

    let page1 = server
        .mock("GET", "/v1/services")
        .match_query(Matcher::UrlEncoded("pageToken".into(), "".into()))
        .with_body(
            serde_json::json!({
                "services": [
                    {"name": "services/aaaa", "displayName": "BigQuery"}
                ],
                "nextPageToken": "page-2"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let page2 = server
        .mock("GET", "/v1/services")
        .match_query(Matcher::UrlEncoded("pageToken".into(), "page-2".into()))
        .with_body(
            serde_json::json!({
                "services": [
                    {"name": "services/6F81-5844-456A", "displayName": "Compute Engine"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let service = client(&server).find_compute_service().await.unwrap();
    assert_eq!(service.name, "services/6F81-5844-456A");

    page1.assert_async().await;
    page2.assert_async().await;
}

#[tokio::test]
async fn missing_compute_service_is_a_catalog_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/services")
        .match_query(Matcher::Any)
        .with_body(serde_json::json!({"services": []}).to_string())
        .create_async()
        .await;

    let err = client(&server).find_compute_service().await.unwrap_err();
    assert!(err.to_string().contains("Compute Engine service not found"));
}

#[tokio::test]
async fn list_skus_paginates_and_skips_unpriced() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/v1/services/test/skus")
        .match_query(Matcher::UrlEncoded("pageToken".into(), "".into()))
        .with_body(
            serde_json::json!({
                "skus": [
                    {
                        "description": "T2D Instance Core running in EMEA",
                        "serviceRegions": ["europe-north1"],
                        "pricingInfo": [{
                            "pricingExpression": {
                                "tieredRates": [
                                    {"unitPrice": {"units": "0", "nanos": 15_700_000}}
                                ]
                            }
                        }]
                    },
                    {
                        "description": "Unpriced promo SKU",
                        "serviceRegions": ["europe-north1"],
                        "pricingInfo": []
                    }
                ],
                "nextPageToken": "page-2"
            })
            .to_string(),
        )
        .create_async()
        .await;

    server
        .mock("GET", "/v1/services/test/skus")
        .match_query(Matcher::UrlEncoded("pageToken".into(), "page-2".into()))
        .with_body(
            serde_json::json!({
                "skus": [{
                    "description": "T2D Instance Ram running in EMEA",
                    "serviceRegions": ["europe-north1"],
                    "pricingInfo": [{
                        "pricingExpression": {
                            "tieredRates": [
                                {"unitPrice": {"units": "1", "nanos": 500_000_000}}
                            ]
                        }
                    }]
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let service: gkecc::billing::Service = serde_json::from_value(serde_json::json!({
        "name": "services/test",
        "displayName": "Compute Engine"
    }))
    .unwrap();

    let skus = client(&server).list_skus(&service).await.unwrap();
    assert_eq!(skus.len(), 2);
    assert!((skus[0].price - 0.0157).abs() < 1e-12);
    assert_eq!(skus[1].price, 1.5);
}

#[tokio::test]
async fn transport_failure_propagates() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/services")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let err = client(&server).find_compute_service().await.unwrap_err();
    assert!(err.to_string().contains("billing catalog"));
}

//! HTTP-level behavior of the ARM client.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use carbon_azure::{ArmClient, AzureApiError, BillingApi, DateRange, StaticTokenCredential};

fn client(server: &MockServer) -> ArmClient {
    ArmClient::new(Arc::new(StaticTokenCredential::new("test-token")))
        .unwrap()
        .with_base_url(server.uri())
}

fn subscription_json(index: usize) -> serde_json::Value {
    json!({
        "id": format!("/subscriptions/sub-{index}"),
        "subscriptionId": format!("sub-{index}"),
        "displayName": format!("Subscription {index}"),
        "state": "Enabled"
    })
}

#[tokio::test]
async fn every_request_carries_the_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let subscriptions = client(&server).list_subscriptions().await.unwrap();
    assert!(subscriptions.is_empty());
}

#[tokio::test]
async fn pagination_follows_next_link_to_exhaustion() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .and(query_param("api-version", "2022-12-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [subscription_json(0)],
            "nextLink": format!("{}/subscriptions?page=2", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [subscription_json(1)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let subscriptions = client(&server).list_subscriptions().await.unwrap();

    let ids: Vec<&str> = subscriptions
        .iter()
        .map(|s| s.subscription_id.as_str())
        .collect();
    assert_eq!(ids, vec!["sub-0", "sub-1"]);
}

#[tokio::test]
async fn malformed_continuation_link_is_a_config_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [subscription_json(0)],
            "nextLink": "not a url"
        })))
        .mount(&server)
        .await;

    let error = client(&server).list_subscriptions().await.unwrap_err();
    assert!(matches!(error, AzureApiError::Config(_)));
}

#[tokio::test]
async fn auth_failures_surface_the_arm_error_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "code": "ExpiredAuthenticationToken", "message": "token expired" }
        })))
        .mount(&server)
        .await;

    let error = client(&server).list_subscriptions().await.unwrap_err();
    match error {
        AzureApiError::Auth(message) => assert_eq!(message, "token expired"),
        other => panic!("expected Auth error, got {other:?}"),
    }
}

#[tokio::test]
async fn not_found_and_generic_statuses_map_to_their_variants() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/subscriptions/gone/providers/Microsoft.Advisor/recommendations"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": "SubscriptionNotFound", "message": "no such subscription" }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/subscriptions/down/providers/Microsoft.Advisor/recommendations"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = client(&server);

    let not_found = client.recommendations("gone").await.unwrap_err();
    assert!(matches!(not_found, AzureApiError::NotFound(_)));

    let api = client.recommendations("down").await.unwrap_err();
    match api {
        AzureApiError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn usage_query_filters_on_the_date_range() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(
            "/subscriptions/sub-1/providers/Microsoft.Consumption/usageDetails",
        ))
        .and(query_param("api-version", "2021-10-01"))
        .and(query_param(
            "$filter",
            "properties/usageStart ge '2024-01-01' and properties/usageEnd le '2024-01-03'",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{
                "id": "/subscriptions/sub-1/providers/Microsoft.Consumption/usageDetails/u1",
                "name": "u1",
                "properties": {
                    "date": "2024-01-01T00:00:00Z",
                    "quantity": 24.0,
                    "cost": 1.5,
                    "consumedService": "Microsoft.Compute",
                    "resourceLocation": "uksouth"
                }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
    );

    let rows = client(&server).usage_rows("sub-1", &range).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].properties.consumed_service.as_deref(),
        Some("Microsoft.Compute")
    );
}

#[tokio::test]
async fn recommendations_parse_advisor_rows() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(
            "/subscriptions/sub-1/providers/Microsoft.Advisor/recommendations",
        ))
        .and(query_param("api-version", "2020-01-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{
                "id": "/subscriptions/sub-1/providers/Microsoft.Advisor/recommendations/r1",
                "name": "r1",
                "properties": {
                    "category": "Cost",
                    "impact": "Medium",
                    "impactedField": "Microsoft.Compute/virtualMachines",
                    "impactedValue": "vm-1",
                    "shortDescription": {
                        "problem": "Underutilized virtual machine",
                        "solution": "Rightsize to a smaller SKU"
                    },
                    "extendedProperties": { "targetSku": "Standard_B2s" }
                }
            }]
        })))
        .mount(&server)
        .await;

    let recommendations = client(&server).recommendations("sub-1").await.unwrap();

    assert_eq!(recommendations.len(), 1);
    assert_eq!(
        recommendations[0].properties.category.as_deref(),
        Some("Cost")
    );
    assert_eq!(
        recommendations[0]
            .properties
            .extended_properties
            .get("targetSku")
            .map(String::as_str),
        Some("Standard_B2s")
    );
}

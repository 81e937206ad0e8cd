//! HTTP role gating and the end-to-end reception flow
//!
//! - 401 for missing or invalid tokens, 403 for the wrong role
//! - Moderator registers a pickup point, employee runs a reception on it
//! - Pagination validation, health and Prometheus exposition

use axum::http::{Method, StatusCode};
use pickup_auth::UserRole;
use pickup_common::telemetry;
use serde_json::json;
use serial_test::serial;

use crate::common::{metric_value, send, send_text, TestApp};

mod test_role_gating {
    use super::*;

    #[tokio::test]
    #[serial]
    async fn test_missing_and_invalid_tokens_are_unauthorized() {
        let app = TestApp::new().await.unwrap();
        let router = app.test_router();
        let body = Some(json!({"city": "Moscow"}));

        let (status, json) = send(&router, Method::POST, "/pvz", None, body.clone()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"]["code"], "UNAUTHORIZED");

        let (status, _) = send(&router, Method::POST, "/pvz", Some("garbage"), body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        assert_eq!(app.count("pvzs").await, 0);
    }

    #[tokio::test]
    #[serial]
    async fn test_wrong_role_is_forbidden() {
        let app = TestApp::new().await.unwrap();
        let router = app.test_router();
        let pvz = app.create_pvz().await;

        let employee = app.token(UserRole::Employee);
        let client = app.token(UserRole::Client);
        let moderator = app.token(UserRole::Moderator);

        let (status, json) = send(
            &router,
            Method::POST,
            "/pvz",
            Some(&employee),
            Some(json!({"city": "Kazan"})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["error"]["code"], "FORBIDDEN");

        let (status, _) = send(
            &router,
            Method::POST,
            "/receptions",
            Some(&moderator),
            Some(json!({"pvzId": pvz.id})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(&router, Method::GET, "/pvz", Some(&client), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // Any role may read the flat list
        let (status, json) = send(&router, Method::GET, "/pvz/list", Some(&client), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 1);

        assert_eq!(app.count("receptions").await, 0);
    }
}

mod test_reception_flow {
    use super::*;

    #[tokio::test]
    #[serial]
    async fn test_full_reception_over_http() {
        let app = TestApp::new().await.unwrap();
        let router = app.test_router();
        let moderator = app.token(UserRole::Moderator);
        let employee = app.token(UserRole::Employee);

        let (status, pvz) = send(
            &router,
            Method::POST,
            "/pvz",
            Some(&moderator),
            Some(json!({"city": "saint petersburg"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(pvz["city"], "Saint Petersburg");
        let pvz_id = pvz["id"].as_str().unwrap().to_string();

        let (status, reception) = send(
            &router,
            Method::POST,
            "/receptions",
            Some(&employee),
            Some(json!({"pvzId": pvz_id})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let reception_id = reception["receptionId"].as_str().unwrap().to_string();

        let (status, json) = send(
            &router,
            Method::POST,
            "/receptions",
            Some(&employee),
            Some(json!({"pvzId": pvz_id})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"]["code"], "OPEN_RECEPTION_EXISTS");

        for product_type in ["electronics", "shoes"] {
            let (status, product) = send(
                &router,
                Method::POST,
                "/products",
                Some(&employee),
                Some(json!({"type": product_type, "pvzId": pvz_id})),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
            assert_eq!(product["type"], product_type);
            assert_eq!(product["receptionId"], reception_id.as_str());
        }

        let (status, json) = send(
            &router,
            Method::POST,
            &format!("/pvz/{}/delete_last_product", pvz_id),
            Some(&employee),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "product deleted successfully");

        let (status, json) = send(
            &router,
            Method::POST,
            &format!("/pvz/{}/close_last_reception", pvz_id),
            Some(&employee),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["receptionId"], reception_id.as_str());

        let (status, json) = send(
            &router,
            Method::POST,
            &format!("/pvz/{}/close_last_reception", pvz_id),
            Some(&employee),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "RECEPTION_NOT_FOUND");

        let (status, tree) = send(&router, Method::GET, "/pvz?page=1&limit=10", Some(&moderator), None).await;
        assert_eq!(status, StatusCode::OK);
        let products = tree[0]["receptions"][0]["products"].as_array().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0]["type"], "electronics");
        assert_eq!(tree[0]["receptions"][0]["reception"]["status"], "closed");

        let (status, optimized) = send(
            &router,
            Method::GET,
            "/pvz/optimized?page=1&limit=10",
            Some(&employee),
            None,
        ).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(optimized, tree);
    }

    #[tokio::test]
    #[serial]
    async fn test_malformed_input_is_rejected() {
        let app = TestApp::new().await.unwrap();
        let router = app.test_router();
        let employee = app.token(UserRole::Employee);
        let moderator = app.token(UserRole::Moderator);

        let (status, json) = send(
            &router,
            Method::POST,
            "/pvz/not-a-uuid/close_last_reception",
            Some(&employee),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "INVALID_REQUEST");

        let (status, json) = send(
            &router,
            Method::POST,
            "/pvz",
            Some(&moderator),
            Some(json!({"city": "Paris"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "INVALID_CITY");

        let (status, _) = send(
            &router,
            Method::GET,
            "/pvz?page=1&limit=10&startDate=2025-04-10T00:00:00Z&endDate=2025-04-01T00:00:00Z",
            Some(&moderator),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&router, Method::GET, "/pvz?page=abc", Some(&moderator), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn test_listing_requires_valid_pagination() {
        let app = TestApp::new().await.unwrap();
        let router = app.test_router();
        let moderator = app.token(UserRole::Moderator);

        for uri in [
            "/pvz",
            "/pvz?page=1",
            "/pvz?limit=10",
            "/pvz?page=0&limit=10",
            "/pvz?page=1&limit=0",
            "/pvz/optimized?page=0&limit=10",
            "/pvz/optimized?page=1&limit=0",
            "/pvz/optimized",
        ] {
            let (status, json) = send(&router, Method::GET, uri, Some(&moderator), None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(json["error"]["code"], "INVALID_REQUEST", "{}", uri);
        }
    }
}

mod test_infrastructure_routes {
    use super::*;

    #[tokio::test]
    #[serial]
    async fn test_health_and_metrics() {
        let app = TestApp::new().await.unwrap();
        let router = app.test_router();
        let moderator = app.token(UserRole::Moderator);

        let (status, body) = send_text(&router, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");

        let (_, before) = send_text(&router, "/metrics").await;

        let (status, _) = send(
            &router,
            Method::POST,
            "/pvz",
            Some(&moderator),
            Some(json!({"city": "Kazan"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, after) = send_text(&router, "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        for (name, delta) in [
            ("pvz_created_total", 1.0),
            ("receptions_created_total", 0.0),
            ("products_added_total", 0.0),
        ] {
            assert_eq!(
                metric_value(&after, name) - metric_value(&before, name),
                delta,
                "{}",
                name
            );
        }
        assert!(after.contains("# TYPE pvz_created_total counter"));
    }

    #[tokio::test]
    #[serial]
    async fn test_database_metrics_are_exported() {
        let app = TestApp::new().await.unwrap();
        let router = app.test_router();

        app.create_pvz().await;
        app.pvz.list_all_pvzs().await.unwrap();
        telemetry::record_pool_stats(&app.pool);

        let (status, body) = send_text(&router, "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("# TYPE db_query_duration_seconds histogram"));
        assert!(body.contains(r#"db_query_duration_seconds_count{query="create_pvz"}"#));
        assert!(body.contains(r#"db_query_duration_seconds_bucket{query="list_pvzs",le="+Inf"}"#));
        assert!(metric_value(&body, "db_active_connections") >= 1.0);
    }
}

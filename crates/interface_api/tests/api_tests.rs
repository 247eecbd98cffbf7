//! Router-level tests
//!
//! Each test builds the full router over in-memory stores and drives it
//! with `tower::ServiceExt::oneshot`.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use domain_claims::ports::memory::InMemoryClaimPort;
use domain_claims::ClaimMode;
use domain_items::ports::memory::InMemoryItemPort;
use interface_api::auth::create_token;
use interface_api::config::ApiConfig;
use interface_api::{create_router, AppState};

const ADMIN: &str = "john.doe@campus.edu";
const JANE: &str = "jane.smith@campus.edu";
const MIKE: &str = "mike.jones@campus.edu";

struct TestApp {
    router: Router,
    state: AppState,
}

impl TestApp {
    fn new(mode: ClaimMode) -> Self {
        let config = ApiConfig {
            jwt_secret: "api-test-secret".to_string(),
            claim_mode: mode,
            ..ApiConfig::default()
        };
        let state = AppState::new(
            Arc::new(InMemoryItemPort::new()),
            Arc::new(InMemoryClaimPort::new()),
            config,
        );
        Self {
            router: create_router(state.clone()),
            state,
        }
    }

    fn token(&self, email: &str) -> String {
        let user = self.state.users.find_by_email(email).unwrap();
        create_token(user, &self.state.config.jwt_secret, 3600).unwrap()
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        as_user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(email) = as_user {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(email)));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn get(&self, uri: &str, as_user: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, as_user, None).await
    }

    async fn post(&self, uri: &str, as_user: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(as_user), Some(body)).await
    }

    /// Reports the standard water bottle as found by Jane
    async fn report_bottle(&self) -> Value {
        let (status, body) = self.post("/api/v1/items", JANE, found_bottle()).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["item"].clone()
    }
}

fn found_bottle() -> Value {
    json!({
        "kind": "found",
        "name": "Water Bottle",
        "description": "Blue steel bottle with stickers",
        "category": "Personal Items",
        "location": "Library, 2nd floor",
        "dateFound": "2024-03-01T10:00:00Z",
        "reporterContact": "jane.smith@campus.edu",
        "questions": [
            { "question": "What color is it?", "answer": "Blue" },
            { "question": "What sticker is on it?", "answer": "Cat" }
        ]
    })
}

fn lost_bottle() -> Value {
    json!({
        "kind": "lost",
        "name": "Bottle",
        "description": "Lost my bottle near the library",
        "category": "Personal Items",
        "location": "Library",
        "dateLost": "2024-02-29T18:00:00Z",
        "reporterContact": "mike.jones@campus.edu"
    })
}

fn answers(item: &Value, replies: [&str; 2]) -> Value {
    let questions = item["questions"].as_array().unwrap();
    json!({
        "answers": questions
            .iter()
            .zip(replies)
            .map(|(q, reply)| json!({ "questionId": q["id"], "answer": reply }))
            .collect::<Vec<_>>()
    })
}

fn item_uri(item: &Value, suffix: &str) -> String {
    format!("/api/v1/items/{}{}", item["id"].as_str().unwrap(), suffix)
}

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_and_readiness() {
        let app = TestApp::new(ClaimMode::Review);

        let (status, body) = app.get("/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, body) = app.get("/health/ready", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
        assert_eq!(body["storage"], "memory");
    }
}

mod auth_tests {
    use super::*;

    #[tokio::test]
    async fn test_login_with_demo_user() {
        let app = TestApp::new(ClaimMode::Review);
        let (status, body) = app
            .send(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "email": "Jane.Smith@campus.edu", "password": "anything" })),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(body["user"]["name"], "Jane Smith");
        assert_eq!(body["user"]["role"], "user");
    }

    #[tokio::test]
    async fn test_login_rejects_unknown_and_malformed_email() {
        let app = TestApp::new(ClaimMode::Review);

        let (status, _) = app
            .send(Method::POST, "/api/v1/auth/login", None, Some(json!({ "email": "nobody@campus.edu" })))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = app
            .send(Method::POST, "/api/v1/auth/login", None, Some(json!({ "email": "not-an-email" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "email");
    }

    #[tokio::test]
    async fn test_protected_route_requires_bearer_token() {
        let app = TestApp::new(ClaimMode::Review);

        let (status, body) = app
            .send(Method::POST, "/api/v1/items", None, Some(found_bottle()))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Not authorized");

        let request = Request::builder()
            .uri("/api/v1/claims/mine")
            .header(header::AUTHORIZATION, "Bearer not-a-token")
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

mod item_tests {
    use super::*;

    #[tokio::test]
    async fn test_report_lost_item_returns_found_matches() {
        let app = TestApp::new(ClaimMode::Review);
        let found = app.report_bottle().await;

        let (status, body) = app.post("/api/v1/items", MIKE, lost_bottle()).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["item"]["status"], "lost");
        assert_eq!(body["item"]["isLostItem"], true);
        let matches = body["potentialMatches"].as_array().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["id"], found["id"]);
        assert!(matches[0]["questions"][0].get("answer").is_none());
    }

    #[tokio::test]
    async fn test_answers_visible_only_to_reporter() {
        let app = TestApp::new(ClaimMode::Review);
        let found = app.report_bottle().await;
        assert_eq!(found["questions"][0]["answer"], "Blue");

        let uri = item_uri(&found, "");
        let (_, anonymous) = app.get(&uri, None).await;
        let (_, stranger) = app.get(&uri, Some(MIKE)).await;
        let (_, reporter) = app.get(&uri, Some(JANE)).await;

        assert!(anonymous["questions"][0].get("answer").is_none());
        assert!(stranger["questions"][0].get("answer").is_none());
        assert_eq!(reporter["questions"][1]["answer"], "Cat");
    }

    #[tokio::test]
    async fn test_report_validation_names_field() {
        let app = TestApp::new(ClaimMode::Review);
        let mut report = found_bottle();
        report["questions"] = json!([{ "question": "Color?", "answer": "Blue" }]);

        let (status, body) = app.post("/api/v1/items", JANE, report).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "questions");
        assert!(body["message"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_listings_and_filters() {
        let app = TestApp::new(ClaimMode::Review);
        app.report_bottle().await;
        app.post("/api/v1/items", MIKE, lost_bottle()).await;

        let (_, all) = app.get("/api/v1/items", None).await;
        let (_, lost) = app.get("/api/v1/items/lost", None).await;
        let (_, found) = app.get("/api/v1/items/found", None).await;
        let (_, by_status) = app.get("/api/v1/items/status/lost", None).await;
        let (_, searched) = app.get("/api/v1/items?search=steel", None).await;

        assert_eq!(all.as_array().unwrap().len(), 2);
        assert_eq!(lost.as_array().unwrap().len(), 1);
        assert_eq!(found.as_array().unwrap().len(), 1);
        assert_eq!(by_status[0]["name"], "Bottle");
        assert_eq!(searched.as_array().unwrap().len(), 1);
        assert_eq!(searched[0]["name"], "Water Bottle");

        let (status, body) = app.get("/api/v1/items/status/misplaced", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "status");
    }

    #[tokio::test]
    async fn test_stats() {
        let app = TestApp::new(ClaimMode::Review);
        app.report_bottle().await;
        app.post("/api/v1/items", MIKE, lost_bottle()).await;

        let (status, body) = app.get("/api/v1/items/stats", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["statusCounts"]["total"], 2);
        assert_eq!(body["statusCounts"]["found"], 1);
        assert_eq!(body["statusCounts"]["lost"], 1);
        assert_eq!(body["categories"][0]["category"], "Personal Items");
        assert_eq!(body["categories"][0]["count"], 2);
        assert_eq!(body["recentItems"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_item_is_not_found() {
        let app = TestApp::new(ClaimMode::Review);
        let uri = format!("/api/v1/items/{}", uuid::Uuid::new_v4());

        let (status, body) = app.get(&uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Item not found");
    }

    #[tokio::test]
    async fn test_malformed_id_and_query_return_json_errors() {
        let app = TestApp::new(ClaimMode::Review);

        let (status, body) = app.get("/api/v1/items/not-an-id", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
        assert!(body["message"].as_str().is_some());

        let (status, body) = app
            .post("/api/v1/items/not-an-id/claim", MIKE, json!({ "answers": [] }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");

        let (status, body) = app.get("/api/v1/items?limit=lots", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_prefixed_item_id_resolves() {
        let app = TestApp::new(ClaimMode::Review);
        let found = app.report_bottle().await;
        let uri = format!("/api/v1/items/ITM-{}", found["id"].as_str().unwrap());

        let (status, body) = app.get(&uri, None).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["id"], found["id"]);
    }

    #[tokio::test]
    async fn test_non_owner_update_leaves_item_unchanged() {
        let app = TestApp::new(ClaimMode::Review);
        let found = app.report_bottle().await;
        let uri = item_uri(&found, "");

        let (status, _) = app
            .send(Method::PUT, &uri, Some(MIKE), Some(json!({ "name": "Mine now" })))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = app.send(Method::DELETE, &uri, Some(MIKE), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (_, current) = app.get(&uri, None).await;
        assert_eq!(current["name"], "Water Bottle");
    }

    #[tokio::test]
    async fn test_owner_update_and_delete() {
        let app = TestApp::new(ClaimMode::Review);
        let found = app.report_bottle().await;
        let uri = item_uri(&found, "");

        let (status, body) = app
            .send(Method::PUT, &uri, Some(JANE), Some(json!({ "location": "Front desk" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["location"], "Front desk");

        let (status, _) = app
            .send(Method::PUT, &uri, Some(JANE), Some(json!({ "status": "returned" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app.send(Method::DELETE, &uri, Some(ADMIN), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Item deleted");

        let (status, _) = app.get(&uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_mark_lost_item_matched() {
        let app = TestApp::new(ClaimMode::Review);
        let (_, body) = app.post("/api/v1/items", MIKE, lost_bottle()).await;
        let lost = body["item"].clone();

        let (status, body) = app.post(&item_uri(&lost, "/match"), MIKE, json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "matched");

        let (status, _) = app.post(&item_uri(&lost, "/match"), MIKE, json!({})).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }
}

mod claim_tests {
    use super::*;

    #[tokio::test]
    async fn test_review_flow_from_claim_to_return() {
        let app = TestApp::new(ClaimMode::Review);
        let found = app.report_bottle().await;

        let (status, body) = app
            .post(&item_uri(&found, "/claim"), MIKE, answers(&found, ["blue ", "CAT"]))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        assert_eq!(body["claim"]["status"], "pending");
        assert_eq!(body["item"]["status"], "found");
        let claim_id = body["claim"]["id"].clone();

        let (_, queue) = app.get("/api/v1/claims/review", Some(JANE)).await;
        assert_eq!(queue.as_array().unwrap().len(), 1);
        assert_eq!(queue[0]["allCorrect"], true);
        let (_, others_queue) = app.get("/api/v1/claims/review", Some(MIKE)).await;
        assert!(others_queue.as_array().unwrap().is_empty());

        let (status, item) = app
            .post(
                &item_uri(&found, "/review-claim"),
                JANE,
                json!({ "claimId": claim_id, "decision": "approve", "response": "Pick it up at the desk" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", item);
        assert_eq!(item["status"], "claimed");
        let mike_id = app.state.users.find_by_email(MIKE).unwrap().id;
        assert_eq!(item["claimedBy"], json!(mike_id));

        let (_, mine) = app.get("/api/v1/claims/mine", Some(MIKE)).await;
        assert_eq!(mine[0]["status"], "approved");
        assert_eq!(mine[0]["reporterResponse"], "Pick it up at the desk");

        let (status, _) = app.post(&item_uri(&found, "/return"), JANE, json!({})).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, item) = app.post(&item_uri(&found, "/return"), MIKE, json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(item["status"], "returned");
        assert!(item["returnedDate"].as_str().is_some());

        let (status, _) = app.post(&item_uri(&found, "/return"), MIKE, json!({})).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_reject_leaves_item_found() {
        let app = TestApp::new(ClaimMode::Review);
        let found = app.report_bottle().await;
        let (_, body) = app
            .post(&item_uri(&found, "/claim"), MIKE, answers(&found, ["Red", "Dog"]))
            .await;

        let (status, item) = app
            .post(
                &item_uri(&found, "/review-claim"),
                JANE,
                json!({ "claimId": body["claim"]["id"], "decision": "rejected" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(item["status"], "found");

        let (_, claims) = app.get(&item_uri(&found, "/claims"), Some(JANE)).await;
        assert_eq!(claims[0]["status"], "rejected");
    }

    #[tokio::test]
    async fn test_only_reporter_or_admin_reviews() {
        let app = TestApp::new(ClaimMode::Review);
        let found = app.report_bottle().await;
        let (_, body) = app
            .post(&item_uri(&found, "/claim"), MIKE, answers(&found, ["Blue", "Cat"]))
            .await;
        let review = json!({ "claimId": body["claim"]["id"], "decision": "approve" });

        let (status, _) = app.post(&item_uri(&found, "/review-claim"), MIKE, review.clone()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, item) = app.post(&item_uri(&found, "/review-claim"), ADMIN, review).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(item["status"], "claimed");
    }

    #[tokio::test]
    async fn test_duplicate_and_incomplete_claims() {
        let app = TestApp::new(ClaimMode::Review);
        let found = app.report_bottle().await;
        let uri = item_uri(&found, "/claim");

        let (status, body) = app.post(&uri, MIKE, json!({ "answers": [] })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "answers");

        let (status, _) = app.post(&uri, MIKE, answers(&found, ["Blue", "Cat"])).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = app.post(&uri, MIKE, answers(&found, ["Blue", "Cat"])).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_auto_verify_mode() {
        let app = TestApp::new(ClaimMode::AutoVerify);
        let found = app.report_bottle().await;
        let uri = item_uri(&found, "/claim");

        let (status, body) = app.post(&uri, MIKE, answers(&found, ["Green", "Cat"])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "answers");

        let (status, body) = app.post(&uri, MIKE, answers(&found, [" BLUE", "cat"])).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["claim"]["status"], "approved");
        assert_eq!(body["item"]["status"], "claimed");

        let (status, _) = app.post(&uri, ADMIN, answers(&found, ["Blue", "Cat"])).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_questions_locked_after_claim() {
        let app = TestApp::new(ClaimMode::Review);
        let found = app.report_bottle().await;
        app.post(&item_uri(&found, "/claim"), MIKE, answers(&found, ["Blue", "Cat"]))
            .await;

        let update = json!({
            "questions": [
                { "question": "Brand?", "answer": "Hydro" },
                { "question": "Size?", "answer": "1L" }
            ]
        });
        let (status, _) = app
            .send(Method::PUT, &item_uri(&found, ""), Some(JANE), Some(update))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }
}

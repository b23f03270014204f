//! HTTP router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//!
//! Layers (outermost → innermost):
//! 1. CORS (any origin) → 2. Access log → 3. Body limit → Handler
//! Uploaded photos are served from the upload directory under `/uploads`.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;
use crate::uploads::UPLOAD_ROUTE;

/// Five photos plus multipart overhead.
const MAX_BODY_BYTES: usize = 55 * 1024 * 1024;

/// Build the API router.
pub fn api_router(core: Arc<CoreState>) -> Router {
    let upload_dir = core.uploads().dir().to_path_buf();
    let ctx = ApiContext::new(core);

    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/diagnosis",
            get(endpoints::diagnosis::list).post(endpoints::diagnosis::create),
        )
        .route(
            "/diagnosis/:id",
            get(endpoints::diagnosis::detail)
                .patch(endpoints::diagnosis::update)
                .delete(endpoints::diagnosis::remove),
        )
        .route(
            "/diagnosis/:id/response",
            patch(endpoints::diagnosis::respond),
        )
        .route(
            "/diagnosis/:id/status",
            patch(endpoints::diagnosis::update_status),
        )
        .route(
            "/experts",
            get(endpoints::experts::list).post(endpoints::experts::create),
        )
        .route("/experts/:id", get(endpoints::experts::detail))
        .route(
            "/reservations",
            get(endpoints::reservations::list).post(endpoints::reservations::create),
        )
        .route(
            "/reservations/:id",
            get(endpoints::reservations::detail).delete(endpoints::reservations::remove),
        )
        .route(
            "/reservations/:id/confirm",
            patch(endpoints::reservations::confirm),
        )
        .route(
            "/reservations/:id/cancel",
            patch(endpoints::reservations::cancel),
        )
        .with_state(ctx);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api.nest_service(UPLOAD_ROUTE, ServeDir::new(upload_dir))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::analysis::{FixedAnalyzer, MockAnalyzer, RiskAssessment};
    use crate::experts;

    const BOUNDARY: &str = "voltcare-test-boundary";

    struct TestApp {
        router: Router,
        core: Arc<CoreState>,
        _uploads: tempfile::TempDir,
    }

    fn test_app() -> TestApp {
        let tmp = tempfile::tempdir().unwrap();
        let core = Arc::new(CoreState::for_tests(Box::new(MockAnalyzer), tmp.path()));
        TestApp {
            router: api_router(core.clone()),
            core,
            _uploads: tmp,
        }
    }

    impl TestApp {
        async fn send(&self, req: Request<Body>) -> Response {
            self.router.clone().oneshot(req).await.unwrap()
        }

        async fn json(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
            let builder = Request::builder().method(method).uri(uri);
            let req = match body {
                Some(b) => builder
                    .header("Content-Type", "application/json")
                    .body(Body::from(b.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };
            let response = self.send(req).await;
            let status = response.status();
            let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, value)
        }

        async fn submit(&self, fields: &[(&str, &str)], files: &[(&str, &[u8])]) -> (StatusCode, Value) {
            let response = self.send(multipart_request(fields, files)).await;
            let status = response.status();
            let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
            (status, serde_json::from_slice(&bytes).unwrap())
        }
    }

    fn multipart_request(fields: &[(&str, &str)], files: &[(&str, &[u8])]) -> Request<Body> {
        let mut body: Vec<u8> = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        for (filename, bytes) in files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{filename}\"\r\nContent-Type: image/jpeg\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/diagnosis")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    const KIM: &[(&str, &str)] = &[
        ("name", "Kim"),
        ("contact", "010-1111-2222"),
        ("symptoms", "power_off"),
        ("description", "breaker trips"),
    ];

    #[tokio::test]
    async fn health_is_ok() {
        let app = test_app();
        let (status, body) = app.json("GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = test_app();
        let response = app
            .send(Request::builder().uri("/nonexistent").body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn end_to_end_lifecycle() {
        let app = test_app();

        // Intake
        let (status, diag) = app.submit(KIM, &[]).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(diag["imageUrl"], json!([]));
        assert_eq!(diag["status"], "WAITING");
        let score = diag["riskScore"].as_i64().unwrap();
        assert!((70..=99).contains(&score));
        let id = diag["id"].as_i64().unwrap();

        // Expert response
        let (status, answered) = app
            .json(
                "PATCH",
                &format!("/diagnosis/{id}/response"),
                Some(json!({"expertComment": "replace wiring", "estimatedCost": 50000})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(answered["status"], "ANSWERED");
        assert_eq!(answered["estimatedCost"], 50000);
        assert_eq!(answered["expertComment"], "replace wiring");

        // Visit booking
        let (status, reservation) = app
            .json(
                "POST",
                "/reservations",
                Some(json!({"expertId": 1, "diagnosisId": id, "reservationDate": "2026-02-01"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(reservation["status"], "PENDING");
        assert_eq!(reservation["description"], "");
        let (_, diag) = app.json("GET", &format!("/diagnosis/{id}"), None).await;
        assert_eq!(diag["status"], "VISIT");

        // Cancellation
        let res_id = reservation["id"].as_i64().unwrap();
        let (status, canceled) = app
            .json("PATCH", &format!("/reservations/{res_id}/cancel"), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(canceled["status"], "CANCELED");
        let (_, diag) = app.json("GET", &format!("/diagnosis/{id}"), None).await;
        assert_eq!(diag["status"], "REJECTED");
    }

    #[tokio::test]
    async fn intake_uses_injected_analyzer() {
        let tmp = tempfile::tempdir().unwrap();
        let analyzer = FixedAnalyzer(RiskAssessment { score: 77, summary: "check panel".into() });
        let core = Arc::new(CoreState::for_tests(Box::new(analyzer), tmp.path()));
        let response = api_router(core).oneshot(multipart_request(KIM, &[])).await.unwrap();
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        let diag: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(diag["riskScore"], 77);
        assert_eq!(diag["aiAnalysis"], "check panel");
    }

    #[tokio::test]
    async fn intake_missing_field_is_400() {
        let app = test_app();
        let (status, body) = app.submit(&KIM[..3], &[]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
        assert!(body["error"]["message"].as_str().unwrap().contains("description"));
    }

    #[tokio::test]
    async fn intake_stores_and_serves_photos() {
        let app = test_app();
        let (status, diag) = app
            .submit(KIM, &[("outlet.jpg", &b"jpeg-bytes"[..]), ("panel.jpg", &b"more"[..])])
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let urls = diag["imageUrl"].as_array().unwrap();
        assert_eq!(urls.len(), 2);

        let url = urls[0].as_str().unwrap();
        assert!(url.starts_with("http://localhost:8000/uploads/"));
        assert!(url.ends_with(".jpg"));
        let path = url.trim_start_matches("http://localhost:8000");
        let response = app
            .send(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&bytes[..], b"jpeg-bytes");
    }

    #[tokio::test]
    async fn intake_rejects_sixth_file() {
        let app = test_app();
        let files: Vec<(&str, &[u8])> = (0..6).map(|_| ("p.jpg", &b"x"[..])).collect();
        let (status, body) = app.submit(KIM, &files).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
        let conn = app.core.lock_db().unwrap();
        assert!(crate::diagnosis::find_all(&conn).unwrap().is_empty());
    }

    #[tokio::test]
    async fn tracking_lookup_matches_on_digits() {
        let app = test_app();
        app.submit(KIM, &[]).await;
        let (_, other) = app
            .submit(
                &[
                    ("name", "Lee"),
                    ("contact", "01033334444"),
                    ("symptoms", "flickering"),
                    ("description", "lights flicker"),
                ],
                &[],
            )
            .await;
        assert_eq!(other["contact"], "01033334444");

        let (status, found) = app.json("GET", "/diagnosis?contact=010-3333-4444", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found.as_array().unwrap().len(), 1);
        assert_eq!(found[0]["name"], "Lee");

        let (_, all) = app.json("GET", "/diagnosis", None).await;
        assert_eq!(all.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn international_contact_keeps_every_digit() {
        let app = test_app();
        let (status, diag) = app
            .submit(
                &[
                    ("name", "Park"),
                    ("contact", "+82 10-1111-2222"),
                    ("symptoms", "power_off"),
                    ("description", "no power upstairs"),
                ],
                &[],
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(diag["contact"], "+82 10-1111-2222");

        let (_, found) = app.json("GET", "/diagnosis?contact=821011112222", None).await;
        assert_eq!(found.as_array().unwrap().len(), 1);
        // Same local digits without the country code is a different key.
        let (_, found) = app.json("GET", "/diagnosis?contact=010-1111-2222", None).await;
        assert!(found.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn contact_without_digits_is_accepted() {
        let app = test_app();
        let (status, diag) = app
            .submit(
                &[
                    ("name", "Choi"),
                    ("contact", "choi@example.com"),
                    ("symptoms", "flickering"),
                    ("description", "kitchen lights"),
                ],
                &[],
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(diag["contact"], "choi@example.com");

        let (_, found) = app.json("GET", "/diagnosis?contact=choi@example.com", None).await;
        assert_eq!(found.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_json_body_is_structured_400() {
        let app = test_app();
        let (status, body) = app
            .json("POST", "/reservations", Some(json!({"reservationDate": "2026-02-01"})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
        assert!(body["error"]["message"].as_str().unwrap().contains("expertId"));

        let (status, body) = app
            .json("POST", "/experts", Some(json!({"name": "Jung"})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");

        let response = app
            .send(
                Request::builder()
                    .method("PATCH")
                    .uri("/diagnosis/1/status")
                    .header("Content-Type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn intake_without_multipart_is_structured_400() {
        let app = test_app();
        let (status, body) = app
            .json("POST", "/diagnosis", Some(json!({"name": "Kim"})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn status_override_is_unchecked() {
        let app = test_app();
        let (_, diag) = app.submit(KIM, &[]).await;
        let id = diag["id"].as_i64().unwrap();

        let (status, updated) = app
            .json("PATCH", &format!("/diagnosis/{id}/status"), Some(json!({"status": "BOGUS"})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "BOGUS");
        let (_, fetched) = app.json("GET", &format!("/diagnosis/{id}"), None).await;
        assert_eq!(fetched["status"], "BOGUS");
    }

    #[tokio::test]
    async fn unknown_diagnosis_is_404() {
        let app = test_app();
        let (status, body) = app
            .json(
                "PATCH",
                "/diagnosis/999/response",
                Some(json!({"expertComment": "x", "estimatedCost": 1})),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");

        let (status, _) = app
            .json("PATCH", "/diagnosis/999/status", Some(json!({"status": "VISIT"})))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app.json("GET", "/diagnosis/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_numeric_id_is_400() {
        let app = test_app();
        let (status, body) = app.json("GET", "/diagnosis/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn diagnosis_edit_and_delete_are_placeholders() {
        let app = test_app();
        let (status, _) = app.json("DELETE", "/diagnosis/1", None).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        let (status, _) = app.json("PATCH", "/diagnosis/1", Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn reservation_confirm_then_cancel_conflicts() {
        let app = test_app();
        let (_, res) = app
            .json(
                "POST",
                "/reservations",
                Some(json!({"expertId": 2, "userId": 5, "reservationDate": "2026-02-01 10:00", "description": "outlet sparks"})),
            )
            .await;
        let id = res["id"].as_i64().unwrap();
        assert_eq!(res["userId"], 5);

        let (status, confirmed) = app
            .json(
                "PATCH",
                &format!("/reservations/{id}/confirm"),
                Some(json!({"estimatedCost": 90000, "expertNote": "bring breaker", "confirmedDate": "2026-02-02 09:00"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(confirmed["status"], "CONFIRMED");
        assert_eq!(confirmed["confirmedDate"], "2026-02-02 09:00");

        let (status, body) = app
            .json("PATCH", &format!("/reservations/{id}/cancel"), None)
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn reservation_unknown_is_404() {
        let app = test_app();
        let (status, _) = app.json("PATCH", "/reservations/5/cancel", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = app
            .json("PATCH", "/reservations/5/confirm", Some(json!({})))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = app.json("GET", "/reservations/5", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn reservations_list_newest_first_and_delete() {
        let app = test_app();
        let mut ids = Vec::new();
        for day in ["2026-02-01", "2026-02-02", "2026-02-03"] {
            let (_, res) = app
                .json("POST", "/reservations", Some(json!({"expertId": 1, "reservationDate": day})))
                .await;
            ids.push(res["id"].as_i64().unwrap());
        }

        let (_, listed) = app.json("GET", "/reservations", None).await;
        let listed: Vec<i64> = listed
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_i64().unwrap())
            .collect();
        ids.reverse();
        assert_eq!(listed, ids);

        let (status, _) = app.json("DELETE", &format!("/reservations/{}", ids[0]), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = app.json("DELETE", &format!("/reservations/{}", ids[0]), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn reservation_requires_date() {
        let app = test_app();
        let (status, body) = app
            .json("POST", "/reservations", Some(json!({"expertId": 1, "reservationDate": ""})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn experts_directory_round_trip() {
        let app = test_app();
        {
            let conn = app.core.lock_db().unwrap();
            experts::bootstrap(&conn).unwrap();
        }
        let (_, listed) = app.json("GET", "/experts", None).await;
        assert_eq!(listed.as_array().unwrap().len(), 4);
        assert!(listed[0].get("isCertified").is_some());

        let (status, created) = app
            .json(
                "POST",
                "/experts",
                Some(json!({"name": "Jung", "specialty": "Panel upgrade", "region": "Pangyo", "rating": 4.5, "reviewCount": 3, "isCertified": true})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_i64().unwrap();
        let (status, fetched) = app.json("GET", &format!("/experts/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["name"], "Jung");

        let (status, _) = app
            .json(
                "POST",
                "/experts",
                Some(json!({"name": "Bad", "specialty": "x", "region": "y", "rating": 7.0})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let app = test_app();
        let response = app
            .send(
                Request::builder()
                    .uri("/health")
                    .header("Origin", "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }
}

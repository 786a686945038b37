pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch},
    Router,
};

use crate::feedback::handlers as feedback;
use crate::state::AppState;
use crate::tracker::handlers as tracker;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Application tracker
        .route(
            "/api/v1/applications",
            get(tracker::handle_list_applications).post(tracker::handle_submit_application),
        )
        .route(
            "/api/v1/applications/:index/status",
            patch(tracker::handle_update_status),
        )
        .route(
            "/api/v1/artifacts/:file_name",
            get(tracker::handle_download_artifact),
        )
        // Feedback
        .route(
            "/api/v1/feedback",
            get(feedback::handle_list_feedback).post(feedback::handle_submit_feedback),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::config::Config;

    const BOUNDARY: &str = "inboxiq-test-boundary";

    struct Part<'a> {
        name: &'a str,
        file_name: Option<&'a str>,
        data: &'a [u8],
    }

    fn text<'a>(name: &'a str, value: &'a str) -> Part<'a> {
        Part {
            name,
            file_name: None,
            data: value.as_bytes(),
        }
    }

    fn file<'a>(name: &'a str, file_name: &'a str, data: &'a [u8]) -> Part<'a> {
        Part {
            name,
            file_name: Some(file_name),
            data,
        }
    }

    fn multipart_request(parts: &[Part<'_>]) -> Request<Body> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part.file_name {
                Some(file_name) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        part.name, file_name
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                        part.name
                    )
                    .as_bytes(),
                ),
            }
            body.extend_from_slice(part.data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri("/api/v1/applications")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = send(app, request).await;
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    fn test_app() -> (TempDir, Config, Router) {
        let dir = TempDir::new().unwrap();
        let config = Config::rooted_at(dir.path());
        let app = build_router(AppState::new(config.clone()));
        (dir, config, app)
    }

    fn acme_submission() -> Request<Body> {
        multipart_request(&[
            file("jd_file", "acme_pm.txt", b"We need a PM who ships."),
            file("resume_file", "resume_v1.pdf", b"%PDF-1.4 binary\x00\xff"),
            text("company_name", "Acme Corp"),
            text("job_title", "Product Manager"),
        ])
    }

    #[tokio::test]
    async fn test_health() {
        let (_dir, _config, app) = test_app();
        let (status, body) = send_json(&app, get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_empty_tracker_lists_nothing() {
        let (_dir, config, app) = test_app();
        let (status, body) = send_json(&app, get_request("/api/v1/applications")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["applications"], json!([]));
        assert!(!config.store.tracker_path.exists());
    }

    #[tokio::test]
    async fn test_submit_writes_artifacts_and_tracker_row() {
        let (_dir, config, app) = test_app();

        let (status, body) = send_json(&app, acme_submission()).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["index"], 0);
        assert_eq!(body["application"]["status"], "Applied");
        assert_eq!(body["application"]["resume_version"], "resume_v1.pdf");
        assert_eq!(
            body["application"]["summary_file"],
            "Acme_Corp_Product_Manager_summary.txt"
        );
        assert!(body["email"]
            .as_str()
            .unwrap()
            .contains("**Product Manager** role at **Acme Corp**"));

        assert_eq!(
            std::fs::read(config.data_dir.join("resume_v1.pdf")).unwrap(),
            b"%PDF-1.4 binary\x00\xff"
        );
        assert_eq!(
            std::fs::read_to_string(config.outputs_dir.join("Acme_Corp_Product_Manager_jd.txt"))
                .unwrap(),
            "We need a PM who ships."
        );
        assert!(config
            .outputs_dir
            .join("Acme_Corp_Product_Manager_email.txt")
            .exists());

        let csv = std::fs::read_to_string(&config.store.tracker_path).unwrap();
        assert!(csv.starts_with("Company,Title,Status,ResumeVersion,SummaryFile,EmailFile\n"));
        assert!(csv.contains("Acme Corp,Product Manager,Applied,resume_v1.pdf,"));
    }

    #[tokio::test]
    async fn test_resubmission_appends_duplicate_row() {
        let (_dir, _config, app) = test_app();
        send(&app, acme_submission()).await;
        let (_, second) = send_json(&app, acme_submission()).await;
        assert_eq!(second["index"], 1);

        let (_, body) = send_json(&app, get_request("/api/v1/applications")).await;
        let rows = body["applications"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["company"], rows[1]["company"]);
        assert_eq!(rows[1]["index"], 1);
    }

    #[tokio::test]
    async fn test_submit_requires_every_part() {
        let (_dir, config, app) = test_app();
        let request = multipart_request(&[
            file("jd_file", "jd.txt", b"text"),
            file("resume_file", "cv.pdf", b"pdf"),
            text("company_name", "   "),
            text("job_title", "PM"),
        ]);
        let (status, body) = send_json(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(!config.store.tracker_path.exists());
    }

    #[tokio::test]
    async fn test_submit_rejects_wrong_file_types() {
        let (_dir, _config, app) = test_app();
        let bad_jd = multipart_request(&[
            file("jd_file", "jd.pdf", b"%PDF"),
            file("resume_file", "cv.pdf", b"pdf"),
            text("company_name", "Acme"),
            text("job_title", "PM"),
        ]);
        assert_eq!(send(&app, bad_jd).await.0, StatusCode::BAD_REQUEST);

        let bad_resume = multipart_request(&[
            file("jd_file", "jd.txt", b"text"),
            file("resume_file", "cv.exe", b"MZ"),
            text("company_name", "Acme"),
            text("job_title", "PM"),
        ]);
        assert_eq!(send(&app, bad_resume).await.0, StatusCode::BAD_REQUEST);

        let non_utf8_jd = multipart_request(&[
            file("jd_file", "jd.txt", b"\xff\xfe\xfd"),
            file("resume_file", "cv.pdf", b"pdf"),
            text("company_name", "Acme"),
            text("job_title", "PM"),
        ]);
        assert_eq!(send(&app, non_utf8_jd).await.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_status_round_trip() {
        let (_dir, config, app) = test_app();
        send(&app, acme_submission()).await;

        let (status, body) = send_json(
            &app,
            json_request(
                Method::PATCH,
                "/api/v1/applications/0/status",
                json!({ "status": "Interviewing" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["status"], "Interviewing");
        assert_eq!(body["company"], "Acme Corp");

        let (_, list) = send_json(&app, get_request("/api/v1/applications")).await;
        assert_eq!(list["applications"][0]["status"], "Interviewing");
        assert_eq!(list["applications"][0]["resume_version"], "resume_v1.pdf");

        let csv = std::fs::read_to_string(&config.store.tracker_path).unwrap();
        assert!(csv.contains("Acme Corp,Product Manager,Interviewing,"));
    }

    #[tokio::test]
    async fn test_update_status_errors() {
        let (_dir, _config, app) = test_app();
        send(&app, acme_submission()).await;

        let (status, body) = send_json(
            &app,
            json_request(
                Method::PATCH,
                "/api/v1/applications/5/status",
                json!({ "status": "Offer" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");

        let (status, _) = send(
            &app,
            json_request(
                Method::PATCH,
                "/api/v1/applications/0/status",
                json!({ "status": "Ghosted" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_malformed_tracker_is_reported() {
        let (_dir, config, app) = test_app();
        std::fs::create_dir_all(&config.outputs_dir).unwrap();
        std::fs::write(
            &config.store.tracker_path,
            "Company,Title,Status,ResumeVersion,SummaryFile,EmailFile\nAcme,PM\n",
        )
        .unwrap();

        let (status, body) = send_json(&app, get_request("/api/v1/applications")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "MALFORMED_STORE");

        // The file is reported, not repaired.
        let (status, _) = send(&app, acme_submission()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(std::fs::read_to_string(&config.store.tracker_path)
            .unwrap()
            .ends_with("Acme,PM\n"));
    }

    #[tokio::test]
    async fn test_submit_against_malformed_tracker_writes_no_files() {
        let (_dir, config, app) = test_app();
        std::fs::create_dir_all(&config.outputs_dir).unwrap();
        std::fs::write(&config.store.tracker_path, "Company,Title\nAcme,PM,extra\n").unwrap();

        let (status, body) = send_json(&app, acme_submission()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "MALFORMED_STORE");

        for name in [
            "Acme_Corp_Product_Manager_jd.txt",
            "Acme_Corp_Product_Manager_summary.txt",
            "Acme_Corp_Product_Manager_email.txt",
        ] {
            assert!(!config.outputs_dir.join(name).exists(), "{name} was written");
        }
        assert!(!config.data_dir.join("resume_v1.pdf").exists());
    }

    #[tokio::test]
    async fn test_update_status_unchanged_leaves_file_untouched() {
        let (_dir, config, app) = test_app();
        std::fs::create_dir_all(&config.outputs_dir).unwrap();
        // Quoted the way this crate never writes it, so any rewrite would show.
        let seeded = "Company,Title,Status,ResumeVersion,SummaryFile,EmailFile\n\
                      \"Acme\",PM,Applied,r1.pdf,a.txt,b.txt\n";
        std::fs::write(&config.store.tracker_path, seeded).unwrap();

        let (status, body) = send_json(
            &app,
            json_request(
                Method::PATCH,
                "/api/v1/applications/0/status",
                json!({ "status": "Applied" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["status"], "Applied");
        assert_eq!(body["company"], "Acme");

        assert_eq!(
            std::fs::read_to_string(&config.store.tracker_path).unwrap(),
            seeded
        );
    }

    #[tokio::test]
    async fn test_download_artifact() {
        let (_dir, _config, app) = test_app();
        send(&app, acme_submission()).await;

        let response = app
            .clone()
            .oneshot(get_request(
                "/api/v1/artifacts/Acme_Corp_Product_Manager_summary.txt",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("Acme_Corp_Product_Manager_summary.txt"));

        let (status, _) = send(&app, get_request("/api/v1/artifacts/nope.txt")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            get_request("/api/v1/artifacts/..%2Fapplication_tracker.csv"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_feedback_submit_and_list() {
        let (_dir, config, app) = test_app();

        let (_, empty) = send_json(&app, get_request("/api/v1/feedback")).await;
        assert_eq!(empty["entries"], json!([]));
        assert_eq!(empty["average_rating"], Value::Null);

        let (status, body) = send_json(
            &app,
            json_request(
                Method::POST,
                "/api/v1/feedback",
                json!({ "role": "Job Seeker", "rating": 5, "comment": "Great, thanks!" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["index"], 0);
        assert_eq!(body["entry"]["name"], "");

        send(
            &app,
            json_request(
                Method::POST,
                "/api/v1/feedback",
                json!({ "name": "Robin", "role": "Recruiter", "rating": 2 }),
            ),
        )
        .await;

        let (_, list) = send_json(&app, get_request("/api/v1/feedback")).await;
        assert_eq!(list["entries"].as_array().unwrap().len(), 2);
        assert_eq!(list["entries"][1]["role"], "Recruiter");
        assert_eq!(list["average_rating"], 3.5);

        let csv = std::fs::read_to_string(&config.store.feedback_path).unwrap();
        assert!(csv.starts_with("Name,Role,Rating,Comment\n"));
        assert!(csv.contains(",Job Seeker,5,\"Great, thanks!\"\n"));
    }

    #[tokio::test]
    async fn test_feedback_rejects_out_of_range_rating() {
        let (_dir, config, app) = test_app();
        let (status, body) = send_json(
            &app,
            json_request(
                Method::POST,
                "/api/v1/feedback",
                json!({ "role": "Other", "rating": 9 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "INVALID_VALUE");
        assert!(!config.store.feedback_path.exists());
    }
}

#[cfg(test)]
mod tests {
    use crate::helpers::{Client, TestApp, make_test_app, make_test_app_with_session_ttl};
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use common::Verdict;
    use db::RecordId;
    use serde_json::{Value, json};
    use std::sync::atomic::Ordering;
    use std::time::Duration;
    use tower::ServiceExt;

    fn scenario_form() -> Value {
        json!({
            "student_id": "20230101",
            "answer_1": "입자 운동은 온도에 비례...",
            "answer_2": "압력과 부피는 반비례...",
            "answer_3": "전도는 직접 충돌..."
        })
    }

    #[tokio::test]
    async fn first_contact_issues_http_only_cookie() {
        let app = make_test_app().await;

        let response = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/session")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("grader_session="));
        assert!(cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn known_cookie_is_kept_and_unknown_cookie_is_replaced() {
        let app = make_test_app().await;
        let mut client = Client::new(&app);

        client.send(Method::GET, "/api/session", None).await;
        let issued = client.cookie().unwrap().to_string();
        client.send(Method::GET, "/api/session", None).await;
        assert_eq!(client.cookie(), Some(issued.as_str()));

        let forged_cookie = format!("grader_session={}", uuid::Uuid::new_v4());
        let mut forged = Client::with_cookie(&app, &forged_cookie);
        let (status, json) = forged
            .send(Method::GET, "/api/session", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "unsubmitted");
        assert_ne!(forged.cookie(), Some(forged_cookie.as_str()));
        assert_ne!(forged.cookie(), Some(issued.as_str()));
    }

    #[tokio::test]
    async fn scenario_a_submit_feedback_save() {
        let app = make_test_app().await;
        let mut client = Client::new(&app);

        let (status, json) = client
            .send(Method::POST, "/api/session/submit", Some(scenario_form()))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "submitted");
        assert_eq!(json["data"]["student_id"], "20230101");

        let (status, json) = client
            .send(Method::POST, "/api/session/feedback", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "graded");
        assert_eq!(json["data"]["score"], 3);
        let feedback = json["data"]["feedback"].as_array().unwrap();
        assert_eq!(feedback.len(), 3);
        for (i, entry) in feedback.iter().enumerate() {
            assert_eq!(entry["question_number"], i + 1);
            assert_eq!(entry["verdict"], "correct");
        }

        let (status, json) = client.send(Method::POST, "/api/session/save", None).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = json["data"]["record_id"].as_i64().unwrap();

        let stored = app.store.inner.find_by_id(RecordId(id)).await.unwrap().unwrap();
        assert_eq!(stored.student_id(), "20230101");
        assert_eq!(stored.answers()[1], "압력과 부피는 반비례...");
        assert!(stored.feedback().iter().all(|f| f.verdict == Verdict::Correct));
        assert_eq!(stored.score(), 3);

        assert_eq!(app.grader.calls(), 1);
        assert_eq!(app.store.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn scenario_b_blank_student_id_is_rejected_without_calls() {
        let app = make_test_app().await;
        let mut client = Client::new(&app);

        let mut form = scenario_form();
        form["student_id"] = json!("   ");
        let (status, json) = client
            .send(Method::POST, "/api/session/submit", Some(form))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["data"]["fields"], json!(["student_id"]));
        assert_eq!(json["message"], "Student ID is required");

        let (status, _) = client
            .send(Method::POST, "/api/session/feedback", None)
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        let (status, _) = client.send(Method::POST, "/api/session/save", None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        assert_eq!(app.grader.calls(), 0);
        assert_eq!(app.store.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_fields_are_all_reported() {
        let app = make_test_app().await;
        let mut client = Client::new(&app);

        let (status, json) = client
            .send(
                Method::POST,
                "/api/session/submit",
                Some(json!({ "student_id": "20230101", "answer_2": "x" })),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["data"]["fields"], json!(["answer_1", "answer_3"]));
    }

    #[tokio::test]
    async fn scenario_c_grading_failure_is_bad_gateway_and_nothing_is_saved() {
        let app = make_test_app().await;
        *app.grader.fail_on.lock().unwrap() = Some(2);
        let mut client = Client::new(&app);

        client
            .send(Method::POST, "/api/session/submit", Some(scenario_form()))
            .await;
        let (status, json) = client
            .send(Method::POST, "/api/session/feedback", None)
            .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["success"], false);
        assert!(json["message"].as_str().unwrap().contains("question 2"));

        let (_, json) = client.send(Method::GET, "/api/session", None).await;
        assert_eq!(json["data"]["status"], "submitted");
        assert_eq!(json["data"]["feedback"], json!([]));

        let (status, _) = client.send(Method::POST, "/api/session/save", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(app.store.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn repeated_feedback_and_save_do_not_repeat_calls() {
        let app = make_test_app().await;
        let mut client = Client::new(&app);

        client
            .send(Method::POST, "/api/session/submit", Some(scenario_form()))
            .await;
        let (_, first) = client
            .send(Method::POST, "/api/session/feedback", None)
            .await;
        let (status, second) = client
            .send(Method::POST, "/api/session/feedback", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["data"]["feedback"], second["data"]["feedback"]);
        assert_eq!(app.grader.calls(), 1);

        let (_, first) = client.send(Method::POST, "/api/session/save", None).await;
        let (status, second) = client.send(Method::POST, "/api/session/save", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(first["data"]["record_id"], second["data"]["record_id"]);
        assert_eq!(app.store.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_save_keeps_feedback_and_can_be_retried() {
        let app = make_test_app().await;
        let mut client = Client::new(&app);

        client
            .send(Method::POST, "/api/session/submit", Some(scenario_form()))
            .await;
        client
            .send(Method::POST, "/api/session/feedback", None)
            .await;

        *app.store.fail.lock().unwrap() = true;
        let (status, json) = client.send(Method::POST, "/api/session/save", None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(json["message"].as_str().unwrap().starts_with("Could not save"));

        let (_, json) = client.send(Method::GET, "/api/session", None).await;
        assert_eq!(json["data"]["status"], "graded");
        assert_eq!(json["data"]["feedback"].as_array().unwrap().len(), 3);
        assert_eq!(json["data"]["record_id"], Value::Null);

        *app.store.fail.lock().unwrap() = false;
        let (status, json) = client.send(Method::POST, "/api/session/save", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(json["data"]["record_id"].is_i64());
        assert_eq!(app.grader.calls(), 1);
    }

    #[tokio::test]
    async fn graded_session_needs_reset_before_resubmitting() {
        let app = make_test_app().await;
        let mut client = Client::new(&app);

        client
            .send(Method::POST, "/api/session/submit", Some(scenario_form()))
            .await;
        client
            .send(Method::POST, "/api/session/feedback", None)
            .await;

        let (status, _) = client
            .send(Method::POST, "/api/session/submit", Some(scenario_form()))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, json) = client.send(Method::DELETE, "/api/session", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "unsubmitted");

        let (status, _) = client
            .send(Method::POST, "/api/session/submit", Some(scenario_form()))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn sessions_do_not_share_state() {
        let app = make_test_app().await;
        let mut alice = Client::new(&app);
        let mut bob = Client::new(&app);

        alice
            .send(Method::POST, "/api/session/submit", Some(scenario_form()))
            .await;
        let (_, json) = bob.send(Method::GET, "/api/session", None).await;

        assert_eq!(json["data"]["status"], "unsubmitted");
        assert_ne!(alice.cookie(), bob.cookie());
    }

    async fn post_raw_submit(
        app: &TestApp,
        content_type: &str,
        body: &'static str,
    ) -> (StatusCode, Option<String>, Value) {
        let response = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/session/submit")
                    .header(header::CONTENT_TYPE, content_type)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, cookie, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn form_encoded_submit_gets_json_envelope_and_cookie() {
        let app = make_test_app().await;

        let (status, cookie, json) = post_raw_submit(
            &app,
            "application/x-www-form-urlencoded",
            "student_id=20230101&answer_1=a&answer_2=b&answer_3=c",
        )
        .await;

        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(json["success"], false);
        assert_eq!(json["data"]["fields"], json!([]));
        assert!(!json["message"].as_str().unwrap().is_empty());
        assert!(cookie.unwrap().starts_with("grader_session="));
        assert_eq!(app.grader.calls(), 0);
    }

    #[tokio::test]
    async fn malformed_json_submit_gets_json_envelope() {
        let app = make_test_app().await;

        let (status, cookie, json) =
            post_raw_submit(&app, "application/json", "{\"student_id\": ").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert!(cookie.is_some());
    }

    #[tokio::test]
    async fn rejected_body_leaves_session_unsubmitted() {
        let app = make_test_app().await;
        let mut client = Client::new(&app);
        client.send(Method::GET, "/api/session", None).await;

        let (status, json) = client
            .send(Method::POST, "/api/session/submit", Some(json!({ "student_id": 42 })))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["success"], false);

        let (_, json) = client.send(Method::GET, "/api/session", None).await;
        assert_eq!(json["data"]["status"], "unsubmitted");
    }

    #[tokio::test]
    async fn expired_session_cookie_gets_a_fresh_session() {
        let app = make_test_app_with_session_ttl(Duration::from_millis(50)).await;
        let mut client = Client::new(&app);
        client
            .send(Method::POST, "/api/session/submit", Some(scenario_form()))
            .await;
        let stale = client.cookie().unwrap().to_string();

        tokio::time::sleep(Duration::from_millis(120)).await;

        let (status, json) = client.send(Method::GET, "/api/session", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "unsubmitted");
        assert_ne!(client.cookie().unwrap(), stale);
    }
}

#[cfg(test)]
mod tests {
    use crate::helpers::{Client, make_test_app};
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn health_check_returns_ok_json() {
        let app = make_test_app().await;
        let mut client = Client::new(&app);

        let (status, json) = client.send(Method::GET, "/api/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["status"], "OK");
        assert_eq!(json["message"], "Health check passed");
        assert!(client.cookie().is_none(), "health check must not open a session");
    }
}

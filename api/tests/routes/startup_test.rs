#[cfg(test)]
mod tests {
    use api::startup::{StartupError, build_pipeline, session_timing};
    use serial_test::serial;
    use std::time::Duration;
    use util::config::AppConfig;

    fn configure_grading() {
        AppConfig::set_openai_api_key("test-key");
        AppConfig::set_rubric_path("");
        AppConfig::set_database_path("sqlite::memory:");
    }

    #[tokio::test]
    #[serial]
    async fn url_without_service_key_refuses_to_start() {
        configure_grading();
        AppConfig::set_supabase_url("https://example.supabase.co");
        AppConfig::set_supabase_service_role_key("");

        let result = build_pipeline().await;

        assert!(matches!(
            result,
            Err(StartupError::PartialRemoteTable {
                missing: "SUPABASE_SERVICE_ROLE_KEY"
            })
        ));
        AppConfig::reset();
    }

    #[tokio::test]
    #[serial]
    async fn service_key_without_url_refuses_to_start() {
        configure_grading();
        AppConfig::set_supabase_url("");
        AppConfig::set_supabase_service_role_key("service-role");

        let err = build_pipeline().await.err().unwrap();

        assert!(matches!(
            err,
            StartupError::PartialRemoteTable {
                missing: "SUPABASE_URL"
            }
        ));
        assert!(!err.to_string().contains("service-role"));
        AppConfig::reset();
    }

    #[tokio::test]
    #[serial]
    async fn no_remote_credentials_falls_back_to_local_database() {
        configure_grading();
        AppConfig::set_supabase_url("");
        AppConfig::set_supabase_service_role_key("");

        assert!(build_pipeline().await.is_ok());
        AppConfig::reset();
    }

    #[tokio::test]
    #[serial]
    async fn missing_api_key_refuses_to_start() {
        configure_grading();
        AppConfig::set_openai_api_key("");

        assert!(matches!(
            build_pipeline().await,
            Err(StartupError::Grading(_))
        ));
        AppConfig::reset();
    }

    #[test]
    #[serial]
    fn sweep_period_follows_session_ttl() {
        AppConfig::set_session_ttl_secs(120);
        assert_eq!(
            session_timing(),
            (Duration::from_secs(120), Duration::from_secs(30))
        );

        AppConfig::set_session_ttl_secs(7200);
        assert_eq!(session_timing().1, Duration::from_secs(300));
        AppConfig::reset();
    }
}

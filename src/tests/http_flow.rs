// Drives the real reqwest transport against a mock News API:
//  - token endpoint (GET auth/token/?developer_key=...) -> token payload
//  - resource endpoint (GET news/{id}) -> guarded by the bearer token

#[cfg(test)]
mod test {

    use httpmock::Method::GET;
    use httpmock::MockServer;
    use serde_json::json;

    use crate::cache::auth_payload::AuthPayload;
    use crate::config::settings::ClientConfig;
    use crate::errors::NewsApiError;
    use crate::helpers::time::now_i64;
    use crate::tests::common::params;
    use crate::TokenManager;

    #[tokio::test]
    async fn token_exchange_then_authorized_request() {
        let server = MockServer::start_async().await;
        let exp = now_i64() + 3600;
        let token_mock = server.mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/auth/token/")
                .query_param("developer_key", "dev-key");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"data": {"token": "t1", "exp": exp, "iss": server.url("/api/v1/auth/token")}}));
        }).await;
        let news_mock = server.mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/news/42")
                .query_param("foo", "bar")
                .header("Authorization", "Bearer t1");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"data": {"news_id": 42, "title": "Campus news"}}));
        }).await;

        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::new("dev-key")
            .with_endpoint(server.url("/api/v1"))
            .with_cache_dir(dir.path());
        let manager = TokenManager::new(config).await.expect("manager");

        let body = manager
            .authorized_get("news", &params(&[("id", "42"), ("foo", "bar")]))
            .await
            .expect("news");
        assert_eq!(body["data"]["title"], "Campus news");

        token_mock.assert_async().await;
        news_mock.assert_async().await;

        let cached: AuthPayload =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("payload.json")).unwrap()).unwrap();
        assert_eq!(cached.token, "t1");
        assert_eq!(cached.expires_at, exp);
    }

    #[tokio::test]
    async fn resource_error_status_is_request_failed() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/api/v1/auth/token/");
            then.status(200)
                .json_body(json!({"data": {"token": "t1", "exp": now_i64() + 3600}}));
        }).await;
        server.mock_async(|when, then| {
            when.method(GET).path("/api/v1/news");
            then.status(500).body("boom");
        }).await;

        let config = ClientConfig::new("dev-key").with_endpoint(server.url("/api/v1/"));
        let manager = TokenManager::new(config).await.expect("manager");

        let err = manager.authorized_get("news", &params(&[])).await.unwrap_err();
        assert!(matches!(err, NewsApiError::RequestFailed(500)));
    }

    #[tokio::test]
    async fn rejected_developer_key_is_authentication_error() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/api/v1/auth/token/");
            then.status(403).json_body(json!({"errors": ["Invalid developer key"]}));
        }).await;

        let config = ClientConfig::new("wrong").with_endpoint(server.url("/api/v1/"));
        let manager = TokenManager::new(config).await.expect("manager");

        let err = manager.ensure_valid_token().await.unwrap_err();
        assert!(matches!(err, NewsApiError::Authentication(detail) if detail == "Invalid developer key"));
    }

    #[tokio::test]
    async fn unreachable_api_is_transport_error() {
        // nothing listens on the discard port
        let config = ClientConfig::new("dev-key").with_endpoint("http://127.0.0.1:9/api/v1/");
        let manager = TokenManager::new(config).await.expect("manager");

        let err = manager.ensure_valid_token().await.unwrap_err();
        assert!(matches!(err, NewsApiError::Transport(_)));
    }
}

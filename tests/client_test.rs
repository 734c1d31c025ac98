use oauth2_client::testutils::{
    MockOAuthServer, RecordingTransport, MOCK_ACCESS_TOKEN, MOCK_CLIENT_ID, MOCK_CLIENT_SECRET,
    MOCK_CODE, MOCK_REFRESH_TOKEN,
};
use oauth2_client::{Client, Error, ProviderConfig};
use serde_json::json;

fn mock_config(server: &MockOAuthServer) -> ProviderConfig {
    ProviderConfig {
        authorize_url: server.url("/authorize"),
        token_url: server.url("/token"),
        refresh_url: server.url("/refresh"),
        revoke_url: server.url("/revoke"),
        userinfo_url: server.url("/userinfo"),
        client_id: MOCK_CLIENT_ID.to_string(),
        client_secret: MOCK_CLIENT_SECRET.to_string(),
        redirect_uri: "http://127.0.0.1:8080/oauth/callback".to_string(),
        scope: String::new(),
    }
}

#[tokio::test]
async fn test_full_flow() {
    let server = MockOAuthServer::start().await.unwrap();
    let client = Client::new(mock_config(&server));

    let auth_url = client.authorize_url(Some("state-1")).unwrap();
    let params: std::collections::HashMap<String, String> =
        auth_url.query_pairs().into_owned().collect();
    assert_eq!(params["state"], "state-1");
    assert_eq!(params["scope"], "get_user_info");
    assert_eq!(params["redirect_uri"], "http://127.0.0.1:8080/oauth/callback");

    let token = client.exchange_code(MOCK_CODE).await.unwrap();
    assert_eq!(token.access_token, MOCK_ACCESS_TOKEN);

    let profile = client.user_profile(&token.access_token).await.unwrap();
    assert_eq!(profile.user_name.as_deref(), Some("mock-user"));

    let raw = client.user_info(&token.access_token).await.unwrap();
    assert!(!raw.is_empty());

    let refreshed = client
        .refresh_token(token.refresh_token.as_deref().unwrap())
        .await
        .unwrap();
    assert_eq!(refreshed.access_token, "mock-access-token-2");

    let raw_refresh = client.refresh(MOCK_REFRESH_TOKEN).await.unwrap();
    assert!(!raw_refresh.is_empty());

    client.revoke(&token.access_token).await.unwrap();

    let paths: Vec<String> = server.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(
        paths,
        vec!["/token", "/userinfo", "/userinfo", "/refresh", "/refresh", "/revoke"]
    );
}

#[tokio::test]
async fn test_refresh_falls_back_to_token_url() {
    let transport = RecordingTransport::json(json!({ "access_token": "new" }));
    let config = ProviderConfig {
        token_url: "https://auth.example.com/token".to_string(),
        client_id: "abc".to_string(),
        client_secret: "xyz".to_string(),
        ..Default::default()
    };
    let client = Client::with_transport(config, transport.clone());

    let token = client.refresh_token("rt").await.unwrap();
    assert_eq!(token.access_token, "new");

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].path, "/token");
    assert_eq!(calls[0].authorization.as_deref(), Some("Basic YWJjOnh5eg=="));
}

#[tokio::test]
async fn test_missing_endpoints_fail_before_network() {
    let transport = RecordingTransport::json(json!({}));
    let config = ProviderConfig {
        client_id: "abc".to_string(),
        client_secret: "xyz".to_string(),
        ..Default::default()
    };
    let client = Client::with_transport(config, transport.clone());

    assert!(matches!(client.authorize_url(None), Err(Error::ServerUrl(_))));
    assert!(matches!(
        client.exchange_code("code").await,
        Err(Error::ServerUrl(_))
    ));
    assert!(matches!(client.revoke("tok").await, Err(Error::ServerUrl(_))));
    assert!(matches!(
        client.user_info("tok").await,
        Err(Error::ServerUrl(_))
    ));
    assert_eq!(transport.call_count(), 0);
}

#[test]
fn test_client_debug_hides_secret() {
    let config = ProviderConfig {
        client_id: "abc".to_string(),
        client_secret: "very-secret".to_string(),
        ..Default::default()
    };
    let client = Client::with_transport(config, RecordingTransport::json(json!({})));
    let debug = format!("{client:?}");
    assert!(debug.contains("abc"));
    assert!(!debug.contains("very-secret"));
}

use std::collections::HashMap;

use oauth2_client::{AuthorizeUrl, Error};

fn query(url: &url::Url) -> HashMap<String, String> {
    url.query_pairs().into_owned().collect()
}

#[test]
fn test_authorize_url_round_trip() {
    let auth_url = AuthorizeUrl::new("https://github.com/login/oauth/authorize", "567bcc7f")
        .with_redirect_uri("http://127.0.0.1:8080/oauth/callback")
        .with_state("a b&c=d")
        .with_scope("user read:user")
        .with_response_type("code")
        .build()
        .unwrap();

    assert_eq!(auth_url.host_str(), Some("github.com"));
    assert_eq!(auth_url.path(), "/login/oauth/authorize");

    let params = query(&auth_url);
    let expected: HashMap<String, String> = [
        ("client_id", "567bcc7f"),
        ("redirect_uri", "http://127.0.0.1:8080/oauth/callback"),
        ("state", "a b&c=d"),
        ("scope", "user read:user"),
        ("response_type", "code"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    assert_eq!(params, expected);
}

#[test]
fn test_authorize_url_is_percent_encoded() {
    let auth_url = AuthorizeUrl::new("https://auth.example.com/authorize", "abc")
        .with_redirect_uri("http://localhost:8080/callback")
        .build()
        .unwrap();

    let url_str = auth_url.as_str();
    assert!(url_str.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fcallback"));
    assert!(url_str.contains("response_type=code"));
    assert!(url_str.contains("scope=get_user_info"));
    assert!(url_str.contains("client_id=abc"));
}

#[test]
fn test_authorize_url_keeps_existing_query() {
    let auth_url = AuthorizeUrl::new("https://auth.example.com/authorize?prompt=consent", "abc")
        .build()
        .unwrap();
    let params = query(&auth_url);
    assert_eq!(params["prompt"], "consent");
    assert_eq!(params["client_id"], "abc");
}

#[test]
fn test_authorize_url_keeps_repeated_existing_params() {
    let auth_url =
        AuthorizeUrl::new("https://auth.example.com/authorize?resource=a&resource=b", "abc")
            .build()
            .unwrap();
    let resources: Vec<String> = auth_url
        .query_pairs()
        .filter(|(name, _)| name == "resource")
        .map(|(_, value)| value.into_owned())
        .collect();
    assert_eq!(resources, vec!["a", "b"]);
    assert_eq!(query(&auth_url)["client_id"], "abc");
}

#[test]
fn test_authorize_url_errors() {
    for server_url in ["", "   ", "not a url", "/relative/authorize"] {
        let err = AuthorizeUrl::new(server_url, "abc").build().unwrap_err();
        assert!(
            matches!(err, Error::ServerUrl(_)),
            "{server_url:?} gave {err}"
        );
    }

    let err = AuthorizeUrl::new("https://auth.example.com/authorize", "")
        .with_state("xyz")
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::ClientKey));
}

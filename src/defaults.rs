//! Values applied when the corresponding request setting is left blank.

/// `response_type` sent with authorization requests.
pub const AUTHORIZE_RESPONSE_TYPE: &str = "code";

/// `scope` sent with authorization requests.
pub const AUTHORIZE_SCOPE: &str = "get_user_info";

/// `grant_type` sent when exchanging an authorization code.
pub const ACCESS_TOKEN_GRANT_TYPE: &str = "authorization_code";

/// `grant_type` sent when refreshing a token.
pub const REFRESH_TOKEN_GRANT_TYPE: &str = "refresh_token";

/// `token_type_hint` sent when revoking a token.
pub const REVOKE_TOKEN_TYPE_HINT: &str = "access_token";

/// `Content-Type` used when a blank content type is configured.
pub const CONTENT_TYPE: &str = "application/json";

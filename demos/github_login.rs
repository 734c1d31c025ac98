//! Log in with GitHub.
//!
//! Register an OAuth app at <https://github.com/settings/developers> with the
//! callback `http://127.0.0.1:8080/oauth/callback`, then run
//!
//! ```text
//! cargo run --example github_login -- --client-id <id> --client-secret <secret>
//! ```
//!
//! and open <http://127.0.0.1:8080/>.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use clap::Parser;
use oauth2_client::{Client, HttpTransport, HttpTransportConfig, ProviderConfig};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// OAuth app client ID
    #[arg(short, long)]
    client_id: String,

    /// OAuth app client secret
    #[arg(short = 's', long)]
    client_secret: String,

    /// Scopes to request (space-separated)
    #[arg(long, default_value = "user read:user")]
    scope: String,

    /// Opaque state echoed back by GitHub
    #[arg(long, default_value = "xxxx")]
    state: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,
}

struct AppState {
    client: Client,
    state: String,
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: String,
    state: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let args = Args::parse();

    let config = ProviderConfig {
        authorize_url: "https://github.com/login/oauth/authorize".to_string(),
        token_url: "https://github.com/login/oauth/access_token".to_string(),
        userinfo_url: "https://api.github.com/user".to_string(),
        client_id: args.client_id,
        client_secret: args.client_secret,
        redirect_uri: format!("http://127.0.0.1:{}/oauth/callback", args.port),
        scope: args.scope,
        ..Default::default()
    };

    let transport = HttpTransport::with_config(
        HttpTransportConfig::default()
            .with_user_agent(concat!("github-login/", env!("CARGO_PKG_VERSION"))),
    )?;

    let app_state = Arc::new(AppState {
        client: Client::with_transport(config, transport),
        state: args.state,
    });

    let app = Router::new()
        .route("/", get(login))
        .route("/oauth/callback", get(callback))
        .with_state(app_state);

    let addr = format!("127.0.0.1:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn login(State(app): State<Arc<AppState>>) -> Response {
    match app.client.authorize_url(Some(&app.state)) {
        Ok(url) => Redirect::to(url.as_str()).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

async fn callback(
    State(app): State<Arc<AppState>>,
    Query(params): Query<CallbackQuery>,
) -> Response {
    if params.state.as_deref() != Some(app.state.as_str()) {
        return (StatusCode::BAD_REQUEST, "state mismatch").into_response();
    }

    info!("Received authorization code, exchanging for token...");
    let token = match app.client.exchange_code(&params.code).await {
        Ok(token) => token,
        Err(e) => {
            error!("Token exchange failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    match app.client.user_info(&token.access_token).await {
        Ok(body) => body.into_response(),
        Err(e) => {
            error!("User info request failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

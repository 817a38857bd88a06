//! CLI commands

use anyhow::{Context, Result};
use carryit_core::{ClientConfig, FileTokenStore, SignInView};
use carryit_http::{ApiClient, ApiRequest, SessionEvent, SessionState};
use clap::Subcommand;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login {
        /// Account email
        #[arg(long, env = "CARRYIT_EMAIL")]
        email: String,

        /// Account password
        #[arg(long, env = "CARRYIT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and clear the stored session
    Logout,

    /// Show the signed-in user's profile
    Whoami,

    /// Show the stored session state
    Status,

    /// Send an authenticated GET request and print the JSON response
    Get {
        /// API path, e.g. /tenants/overdue
        path: String,
    },
}

impl Commands {
    pub async fn execute(self, config: &ClientConfig) -> Result<()> {
        let token_file = config.token_file_path();
        let store = FileTokenStore::open(&token_file)
            .with_context(|| format!("Failed to open session file {}", token_file.display()))?;
        let client = ApiClient::from_config(config, Arc::new(store))?;
        let mut events = client.session().subscribe();

        let outcome = match self {
            Self::Login { email, password } => login(&client, &email, &password).await,
            Self::Logout => logout(&client).await,
            Self::Whoami => whoami(&client).await,
            Self::Status => {
                status(&client);
                Ok(())
            }
            Self::Get { path } => get(&client, path).await,
        };

        report_session_events(&mut events);
        outcome
    }
}

/// Report session events the user has to act on
///
/// Events are published before the failing request returns, so draining
/// after the command sees every one of them. Returns the sign-in view of
/// an expired session.
fn report_session_events(events: &mut broadcast::Receiver<SessionEvent>) -> Option<SignInView> {
    let mut expired = None;
    while let Ok(event) = events.try_recv() {
        match event {
            SessionEvent::Expired {
                entry_point,
                reason,
            } => {
                warn!(%reason, "Session expired");
                eprintln!(
                    "Session expired; sign in again ({} view)",
                    entry_point.path()
                );
                expired = Some(entry_point);
            }
            SessionEvent::Refreshed => info!("Access token refreshed"),
            SessionEvent::SignedIn | SessionEvent::SignedOut { .. } => {}
        }
    }
    expired
}

async fn login(client: &ApiClient, email: &str, password: &str) -> Result<()> {
    let response = client.login(email, password).await?;
    match response.user {
        Some(user) => println!("Signed in as {} ({:?})", user.display_name(), user.role),
        None => println!("Signed in as {email}"),
    }
    Ok(())
}

async fn logout(client: &ApiClient) -> Result<()> {
    let entry_point = client.logout().await?;
    println!("Signed out; next sign-in at {}", entry_point.path());
    Ok(())
}

async fn whoami(client: &ApiClient) -> Result<()> {
    let user = client.me().await?;
    println!("{}", serde_json::to_string_pretty(&user)?);
    Ok(())
}

fn status(client: &ApiClient) {
    let session = client.session();
    let state = session.state();
    println!("State: {state:?}");

    if state == SessionState::Unauthenticated {
        return;
    }
    if let Some(user) = session.user() {
        println!("User: {} <{}> ({:?})", user.display_name(), user.email, user.role);
    }
    match client.token_expiry() {
        Some(expiry) => println!(
            "Access token expires: {} ({})",
            expiry.to_rfc3339(),
            if client.is_token_valid() {
                "valid"
            } else {
                "expired"
            }
        ),
        None => println!("Access token expires: unknown"),
    }
    println!(
        "Refresh token: {}",
        if session.refresh_token().is_some() {
            "stored"
        } else {
            "missing"
        }
    );
}

async fn get(client: &ApiClient, path: String) -> Result<()> {
    let path = if path.starts_with('/') {
        path
    } else {
        format!("/{path}")
    };
    let body: JsonValue = client.execute(&ApiRequest::get(path)).await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

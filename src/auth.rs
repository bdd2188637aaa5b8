//! GCP access token resolution
//!
//! Both catalog clients authenticate with a bearer token. The token comes
//! from `GOOGLE_OAUTH_ACCESS_TOKEN` when set (useful in CI), otherwise from
//! the locally installed `gcloud` CLI's application-default credentials.

use crate::error::{GkeccError, Result};
use std::process::Command;
use tracing::debug;

/// Resolve a bearer token for the GCP REST APIs.
pub fn access_token() -> Result<String> {
    if let Ok(token) = std::env::var("GOOGLE_OAUTH_ACCESS_TOKEN") {
        if !token.trim().is_empty() {
            debug!("using access token from GOOGLE_OAUTH_ACCESS_TOKEN");
            return Ok(token.trim().to_string());
        }
    }

    if which::which("gcloud").is_err() {
        return Err(GkeccError::Auth(
            "gcloud not found. Install the Google Cloud CLI or set GOOGLE_OAUTH_ACCESS_TOKEN"
                .to_string(),
        ));
    }

    let output = Command::new("gcloud")
        .args(["auth", "application-default", "print-access-token"])
        .output()
        .map_err(|e| GkeccError::Auth(format!("failed to run gcloud: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GkeccError::Auth(format!(
            "gcloud could not produce a token: {}. Run 'gcloud auth application-default login'",
            stderr.trim()
        )));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(GkeccError::Auth("gcloud returned an empty token".to_string()));
    }
    Ok(token)
}

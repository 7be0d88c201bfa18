use std::time::Duration;

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Build a reqwest client for backend calls. Only the connect phase is
/// bounded; a slow generation is left to run for as long as it takes.
pub fn make_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default reqwest client");
            reqwest::Client::new()
        })
}

use std::time::Duration;

use tokio::time::Instant;

use crate::error::ClientError;

/// Per-probe timeout.
const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Poll `url` until the server answers or `timeout` elapses.
///
/// Any HTTP response counts as "up", whatever its status. Connection errors
/// and probe timeouts sleep `poll_interval` and retry.
pub async fn wait_for_server(
    http: &reqwest::Client,
    url: &str,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<(), ClientError> {
    let started = Instant::now();
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        match http.get(url).timeout(PROBE_TIMEOUT).send().await {
            Ok(resp) => {
                tracing::info!(
                    url,
                    status = resp.status().as_u16(),
                    attempts,
                    "Server is up"
                );
                return Ok(());
            }
            Err(e) => {
                tracing::debug!(url, attempts, error = %e, "Server not ready yet");
            }
        }

        if started.elapsed() + poll_interval > timeout {
            tracing::warn!(url, attempts, "Gave up waiting for server");
            return Err(ClientError::ServerUnreachable { waited: timeout });
        }
        tokio::time::sleep(poll_interval).await;
    }
}

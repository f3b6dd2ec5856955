use std::future::Future;
use tracing::debug;

/// True when a failed rate request may succeed if sent again: the server
/// could not be reached or answered with a 5xx status. Client errors such as
/// 404 are final.
pub fn is_transient(err: &reqwest::Error) -> bool {
    err.status().is_none_or(|status| status.is_server_error())
}

/// Runs `operation` up to `retries + 1` times, back to back, for as long as
/// `should_retry` accepts the error.
///
/// # Returns
/// Either the successful result or the error of the last attempt
pub async fn with_retry<F, Fut, T, E, P>(
    mut operation: F,
    retries: usize,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(err) => {
                if attempt > retries || !should_retry(&err) {
                    return Err(err);
                }
                debug!(
                    "Attempt {}/{} failed: {}. Retrying...",
                    attempt,
                    retries + 1,
                    err
                );
                attempt += 1;
            }
        }
    }
}

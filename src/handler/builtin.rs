//! Built-in control-plane handlers.
//!
//! - `ping` - liveness probe, responds with no payload
//! - `echo` - returns the request payload unchanged

use super::{CancellationToken, RequestHandler};
use async_trait::async_trait;

/// Liveness probe.
#[derive(Debug, Default, Clone, Copy)]
pub struct PingHandler;

#[async_trait]
impl RequestHandler for PingHandler {
    fn name(&self) -> &str {
        "ping"
    }

    async fn handle(
        &self,
        _payload: Option<&str>,
        _cancel: CancellationToken,
    ) -> anyhow::Result<Option<String>> {
        Ok(None)
    }
}

/// Returns the payload it was given.
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoHandler;

#[async_trait]
impl RequestHandler for EchoHandler {
    fn name(&self) -> &str {
        "echo"
    }

    async fn handle(
        &self,
        payload: Option<&str>,
        _cancel: CancellationToken,
    ) -> anyhow::Result<Option<String>> {
        Ok(payload.map(str::to_owned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping() {
        let response =
            tokio_test::block_on(PingHandler.handle(Some("ignored"), CancellationToken::new()));
        assert_eq!(response.unwrap(), None);
    }

    #[test]
    fn test_echo() {
        let response =
            tokio_test::block_on(EchoHandler.handle(Some("{\"a\":1}"), CancellationToken::new()));
        assert_eq!(response.unwrap().as_deref(), Some("{\"a\":1}"));

        let response = tokio_test::block_on(EchoHandler.handle(None, CancellationToken::new()));
        assert_eq!(response.unwrap(), None);
    }
}

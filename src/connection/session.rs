//! One client session on the control-plane listener.
//!
//! A session wraps its stream in `Framed<S, RequestCodec>` and answers each
//! decoded request before reading the next one, so responses leave in the
//! order requests arrived. Sessions are generic over the stream, which keeps
//! them usable with TCP sockets, Unix sockets or in-memory pipes.

use crate::dispatch::RequestManager;
use crate::protocol::{FrameError, RequestCodec, ResponseFrame};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

/// Listener-wide session counters.
#[derive(Debug, Default)]
pub struct ListenerStats {
    accepted: AtomicU64,
    open: AtomicU64,
    served: AtomicU64,
}

impl ListenerStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions started since the listener came up.
    pub fn connections_accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    /// Sessions currently running.
    pub fn open_connections(&self) -> u64 {
        self.open.load(Ordering::Relaxed)
    }

    /// Requests answered across all sessions.
    pub fn requests_served(&self) -> u64 {
        self.served.load(Ordering::Relaxed)
    }

    fn session_started(&self) -> OpenSession<'_> {
        self.accepted.fetch_add(1, Ordering::Relaxed);
        self.open.fetch_add(1, Ordering::Relaxed);
        OpenSession { stats: self }
    }
}

/// Keeps a session counted as open until dropped.
struct OpenSession<'a> {
    stats: &'a ListenerStats,
}

impl Drop for OpenSession<'_> {
    fn drop(&mut self) {
        self.stats.open.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Answers requests on `stream` until the peer closes it.
///
/// Returns `Ok(())` on a clean close at a line boundary. A malformed line,
/// a line cut off by the close, or an I/O failure ends the session with an
/// error.
pub async fn serve_connection<S>(
    stream: S,
    manager: &RequestManager,
    stats: &ListenerStats,
) -> Result<(), FrameError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut frames = Framed::new(stream, RequestCodec::new());

    while let Some(request) = frames.next().await {
        let request = request?;
        let response = manager
            .process_request(&request.name, request.payload.as_deref())
            .await;
        stats.served.fetch_add(1, Ordering::Relaxed);
        frames.send(ResponseFrame::from(response)).await?;
    }

    Ok(())
}

/// Runs one session to completion and logs how it ended.
///
/// Meant to be handed to `tokio::spawn` straight from the accept loop.
pub async fn handle_connection<S>(
    stream: S,
    peer: SocketAddr,
    manager: RequestManager,
    stats: Arc<ListenerStats>,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let _open = stats.session_started();
    info!(client = %peer, "Client connected");

    match serve_connection(stream, &manager, &stats).await {
        Ok(()) => info!(client = %peer, "Client disconnected"),
        Err(e) if e.is_disconnect() => debug!(client = %peer, error = %e, "Client went away"),
        Err(e) => warn!(client = %peer, error = %e, "Closing connection"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{handler_fn, EchoHandler, PingHandler, SharedHandler};
    use std::time::Duration;
    use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt, DuplexStream};

    fn manager() -> RequestManager {
        let failing = handler_fn("fail", |_payload, _cancel| async move {
            Err::<Option<String>, _>(anyhow::anyhow!("nope"))
        });
        RequestManager::new(
            vec![
                Arc::new(PingHandler) as SharedHandler,
                Arc::new(EchoHandler) as SharedHandler,
                failing as SharedHandler,
            ],
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    /// Writes `input`, closes the write side, and collects everything the
    /// session sends back along with how the session ended.
    async fn exchange(input: &[u8]) -> (String, Result<(), FrameError>) {
        let (mut client, server): (DuplexStream, DuplexStream) = duplex(64 * 1024);
        let manager = manager();
        let stats = ListenerStats::new();

        let session = async { serve_connection(server, &manager, &stats).await };
        let client_side = async {
            client.write_all(input).await.unwrap();
            client.shutdown().await.unwrap();
            let mut output = Vec::new();
            client.read_to_end(&mut output).await.unwrap();
            String::from_utf8(output).unwrap()
        };

        let (result, output) = tokio::join!(session, client_side);
        (output, result)
    }

    #[tokio::test]
    async fn test_ping() {
        let (output, result) = exchange(b"PING\r\n").await;
        assert_eq!(output, "200 -1\r\n");
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_echo_with_tab_separator() {
        let (output, _) = exchange(b"echo\t{\"k\":\"v\"}\n").await;
        assert_eq!(output, "200 9\r\n{\"k\":\"v\"}\r\n");
    }

    #[tokio::test]
    async fn test_unknown_and_failing_requests() {
        let (output, _) = exchange(b"restart\nfail\n").await;

        let (unknown, failing) = output.split_at(output.find("500 ").unwrap());
        assert!(unknown.starts_with("400 "), "got: {}", unknown);
        assert!(unknown.contains("ping"));
        assert!(unknown.contains("echo"));
        assert_eq!(failing, "500 18\r\n{\"message\":\"nope\"}\r\n");
    }

    #[tokio::test]
    async fn test_responses_follow_request_order() {
        let (output, result) = exchange(b"ping\necho one\necho two\n").await;
        assert_eq!(output, "200 -1\r\n200 3\r\none\r\n200 3\r\ntwo\r\n");
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_blank_line_reaches_dispatcher() {
        let (output, _) = exchange(b"\n").await;
        assert_eq!(
            output,
            "400 44\r\n{\"message\":\"request name must not be blank\"}\r\n"
        );
    }

    #[tokio::test]
    async fn test_close_mid_line_answers_complete_lines_first() {
        let (output, result) = exchange(b"ping\nech").await;
        assert_eq!(output, "200 -1\r\n");
        assert!(matches!(result, Err(FrameError::Io(_))));
    }

    #[tokio::test]
    async fn test_invalid_utf8_ends_session() {
        let (output, result) = exchange(b"\xff\xfe\nping\n").await;
        assert!(output.is_empty());
        assert!(matches!(result, Err(FrameError::Parse(_))));
    }

    #[tokio::test]
    async fn test_stats_across_sessions() {
        let manager = manager();
        let stats = Arc::new(ListenerStats::new());

        for _ in 0..2 {
            let (mut client, server) = duplex(4096);
            let task = tokio::spawn(handle_connection(
                server,
                peer(),
                manager.clone(),
                Arc::clone(&stats),
            ));

            client.write_all(b"ping\necho x\n").await.unwrap();
            client.shutdown().await.unwrap();
            let mut output = Vec::new();
            client.read_to_end(&mut output).await.unwrap();
            task.await.unwrap();
        }

        assert_eq!(stats.connections_accepted(), 2);
        assert_eq!(stats.open_connections(), 0);
        assert_eq!(stats.requests_served(), 4);
        assert_eq!(
            manager
                .stats()
                .requests_succeeded
                .load(Ordering::Relaxed),
            4
        );
    }

    #[tokio::test]
    async fn test_open_count_while_session_runs() {
        let stats = Arc::new(ListenerStats::new());
        let (mut client, server) = duplex(4096);
        let task = tokio::spawn(handle_connection(
            server,
            peer(),
            manager(),
            Arc::clone(&stats),
        ));

        client.write_all(b"ping\n").await.unwrap();
        let mut header = [0u8; 8];
        client.read_exact(&mut header).await.unwrap();
        assert_eq!(&header, b"200 -1\r\n");
        assert_eq!(stats.open_connections(), 1);

        drop(client);
        task.await.unwrap();
        assert_eq!(stats.open_connections(), 0);
    }
}

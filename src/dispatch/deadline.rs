//! Cooperative per-call deadline.
//!
//! [`run_with_deadline`] drives a future alongside a timer. When the timer
//! elapses first the cancellation token is fired, but the future is still
//! awaited to completion: the deadline is a signal to the handler, not a
//! forced abort. A handler that ignores the token can therefore run past the
//! deadline.
//!
//! The timer lives on the stack of the call and is dropped when the call
//! returns, so nothing outlives the dispatch that created it. Logging the
//! overrun is left to the caller, which knows the request name.

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Output of a future run under a deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deadlined<T> {
    /// What the future produced.
    pub output: T,
    /// True if the deadline elapsed before the future completed.
    pub deadline_exceeded: bool,
}

/// Awaits `future`, cancelling `cancel` once `max_timeout` has elapsed.
pub async fn run_with_deadline<F>(
    future: F,
    cancel: &CancellationToken,
    max_timeout: Duration,
) -> Deadlined<F::Output>
where
    F: Future,
{
    tokio::pin!(future);
    let timer = tokio::time::sleep(max_timeout);
    tokio::pin!(timer);

    let mut deadline_exceeded = false;

    loop {
        tokio::select! {
            biased;

            output = &mut future => {
                return Deadlined {
                    output,
                    deadline_exceeded,
                };
            }
            _ = &mut timer, if !deadline_exceeded => {
                deadline_exceeded = true;
                cancel.cancel();
            }
        }
    }
}

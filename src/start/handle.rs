//! Handle for an in-flight server start.

use std::sync::Arc;

use bytes::Bytes;
use futures::Stream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

use super::controller::StartController;
use crate::error::{StartError, StartOutcome};
use crate::traits::HttpError;

/// A running start operation.
///
/// Waiting for the outcome and cancelling are independent: `outcome`
/// consumes the handle, while any number of [`StartCanceller`]s taken from
/// it beforehand can stop the read from other tasks during the wait.
/// Dropping the handle (or the `outcome` future) abandons the start and stops
/// the read loop.
#[derive(Debug)]
pub struct StartHandle {
    id: Uuid,
    server: String,
    abandon: AbandonOnDrop,
    task: JoinHandle<Option<StartOutcome>>,
}

/// Cancels one start from anywhere; cheap to clone and `Send`.
#[derive(Debug, Clone)]
pub struct StartCanceller {
    id: Uuid,
    tx: Arc<watch::Sender<bool>>,
}

impl StartCanceller {
    /// Stop reading the stream. Safe to call more than once, and a no-op
    /// after the start has settled.
    pub fn cancel(&self) {
        // Fails only when the read loop has already finished
        let _ = self.tx.send(true);
    }

    /// Operation this canceller belongs to.
    pub fn id(&self) -> Uuid {
        self.id
    }
}

/// Signals cancellation when the owning handle or outcome future goes away.
#[derive(Debug)]
struct AbandonOnDrop(StartCanceller);

impl Drop for AbandonOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

impl StartHandle {
    /// Spawn the read loop for `body` on the current tokio runtime.
    pub fn spawn<S>(server: impl Into<String>, body: S) -> Self
    where
        S: Stream<Item = Result<Bytes, HttpError>> + Send + Unpin + 'static,
    {
        let id = Uuid::new_v4();
        let server = server.into();
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let span = tracing::info_span!("start", server = %server, op = %id);
        let controller = StartController::new(server.clone());
        let task = tokio::spawn(controller.drive(body, cancel_rx).instrument(span));

        Self {
            id,
            server,
            abandon: AbandonOnDrop(StartCanceller {
                id,
                tx: Arc::new(cancel_tx),
            }),
            task,
        }
    }

    /// Identifier used to correlate logs and pending-state entries.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    /// A canceller that stays usable while [`outcome`](Self::outcome) is
    /// being awaited.
    pub fn canceller(&self) -> StartCanceller {
        self.abandon.0.clone()
    }

    /// Stop reading the stream. Safe to call more than once, and a no-op
    /// after the start has settled.
    pub fn cancel(&self) {
        self.abandon.0.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the start to settle.
    ///
    /// Returns [`StartError::Cancelled`] if a cancel won the race against
    /// settlement.
    pub async fn outcome(self) -> StartOutcome {
        let StartHandle { abandon, task, .. } = self;

        let joined = task.await;
        drop(abandon);

        match joined {
            Ok(Some(outcome)) => outcome,
            Ok(None) => Err(StartError::Cancelled),
            Err(e) => Err(StartError::TaskFailed {
                message: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use std::time::Duration;

    fn chunks(parts: &[&'static str]) -> impl Stream<Item = Result<Bytes, HttpError>> + Unpin {
        stream::iter(
            parts
                .iter()
                .map(|p| Ok(Bytes::from_static(p.as_bytes())))
                .collect::<Vec<_>>(),
        )
    }

    #[tokio::test]
    async fn test_outcome_success() {
        let handle = StartHandle::spawn(
            "mc",
            chunks(&[
                "data: {\"type\":\"HEARTBEAT\"}\n\n",
                "data: {\"type\":\"DONE\",\"ports\":[25565]}\n",
            ]),
        );
        assert_eq!(handle.server(), "mc");
        assert_eq!(handle.outcome().await, Ok(vec![25565]));
    }

    #[tokio::test]
    async fn test_outcome_server_error() {
        let handle = StartHandle::spawn(
            "mc",
            chunks(&["data: {\"type\":\"ERROR\",\"message\":\"boom\"}\n"]),
        );
        assert_eq!(
            handle.outcome().await,
            Err(StartError::ServerReported {
                message: "boom".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_cancel_before_settlement() {
        let handle = StartHandle::spawn("mc", stream::pending::<Result<Bytes, HttpError>>());
        handle.cancel();
        handle.cancel();
        assert_eq!(handle.outcome().await, Err(StartError::Cancelled));
    }

    #[tokio::test]
    async fn test_cancel_after_settlement_keeps_outcome() {
        let handle = StartHandle::spawn(
            "mc",
            chunks(&["data: {\"type\":\"DONE\",\"ports\":[1,2,3]}\n"]),
        );
        while !handle.is_finished() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        handle.cancel();
        assert_eq!(handle.outcome().await, Ok(vec![1, 2, 3]));
    }

    fn channel_body() -> (
        tokio::sync::mpsc::UnboundedSender<Result<Bytes, HttpError>>,
        impl Stream<Item = Result<Bytes, HttpError>> + Send + Unpin + 'static,
    ) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<Result<Bytes, HttpError>>();
        let body = Box::pin(stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        }));
        (tx, body)
    }

    #[tokio::test]
    async fn test_cancel_while_outcome_is_awaited() {
        let (tx, body) = channel_body();
        let handle = StartHandle::spawn("mc", body);
        let canceller = handle.canceller();
        assert_eq!(canceller.id(), handle.id());

        tx.send(Ok(Bytes::from("data: {\"type\":\"HEARTBEAT\"}\n")))
            .unwrap();

        let waiter = tokio::spawn(handle.outcome());
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        tokio::spawn(async move { canceller.cancel() })
            .await
            .unwrap();

        let outcome = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("outcome resolves after cancel")
            .unwrap();
        assert_eq!(outcome, Err(StartError::Cancelled));
        drop(tx);
    }

    #[tokio::test]
    async fn test_canceller_outliving_handle_does_not_block_abandon() {
        let (tx, body) = channel_body();
        let handle = StartHandle::spawn("mc", body);
        let _canceller = handle.canceller();

        // Dropping the outcome future still stops the read loop
        let waiting = tokio::time::timeout(Duration::from_millis(10), handle.outcome()).await;
        assert!(waiting.is_err());

        tokio::time::timeout(Duration::from_secs(1), async {
            while !tx.is_closed() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("body dropped after abandon");
    }

    #[tokio::test]
    async fn test_handles_have_distinct_ids() {
        let a = StartHandle::spawn("a", stream::pending::<Result<Bytes, HttpError>>());
        let b = StartHandle::spawn("b", stream::pending::<Result<Bytes, HttpError>>());
        assert_ne!(a.id(), b.id());
        a.cancel();
        b.cancel();
    }
}

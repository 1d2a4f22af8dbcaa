//! Start-sequence state machine.
//!
//! The controller consumes body chunks in arrival order and settles exactly
//! one outcome:
//!
//! ```text
//! AwaitingFirstRead --chunk--> Streaming --DONE/ERROR/end/read error--> Settled
//!          \______________________end/read error_____________________/
//! ```
//!
//! [`StartController::drive`] runs the machine over a body stream with a
//! single in-flight read at a time.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{StartError, StartOutcome};
use crate::sse::{parse_frame_line, EventFrame, FrameDecoder};
use crate::traits::HttpError;

/// Where the controller is in the start sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartPhase {
    /// No chunk has been read yet
    AwaitingFirstRead,
    /// At least one chunk read, no terminal event yet
    Streaming,
    /// Outcome recorded; nothing else is processed
    Settled,
}

/// Whether the read loop should ask for another chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStep {
    Continue,
    Stop,
}

/// Drives one frame decoder for one start request.
#[derive(Debug)]
pub struct StartController {
    server: String,
    phase: StartPhase,
    decoder: FrameDecoder,
    outcome: Option<StartOutcome>,
    heartbeats: u64,
}

impl StartController {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            phase: StartPhase::AwaitingFirstRead,
            decoder: FrameDecoder::new(),
            outcome: None,
            heartbeats: 0,
        }
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn phase(&self) -> StartPhase {
        self.phase
    }

    pub fn is_settled(&self) -> bool {
        self.phase == StartPhase::Settled
    }

    /// Heartbeats seen so far.
    pub fn heartbeats(&self) -> u64 {
        self.heartbeats
    }

    pub fn outcome(&self) -> Option<&StartOutcome> {
        self.outcome.as_ref()
    }

    pub fn into_outcome(self) -> Option<StartOutcome> {
        self.outcome
    }

    /// Process one body chunk.
    ///
    /// Frames after a terminal frame in the same chunk are not looked at.
    pub fn on_chunk(&mut self, chunk: &[u8]) -> ReadStep {
        if self.is_settled() {
            return ReadStep::Stop;
        }
        if self.phase == StartPhase::AwaitingFirstRead {
            self.phase = StartPhase::Streaming;
        }

        for frame in self.decoder.feed(chunk) {
            if self.on_frame(frame) == ReadStep::Stop {
                return ReadStep::Stop;
            }
        }

        ReadStep::Continue
    }

    fn on_frame(&mut self, frame: EventFrame) -> ReadStep {
        match frame {
            EventFrame::Heartbeat => {
                self.heartbeats += 1;
                debug!(
                    server = %self.server,
                    heartbeats = self.heartbeats,
                    "Start heartbeat"
                );
                ReadStep::Continue
            }
            EventFrame::Done { ports } => {
                self.settle(Ok(ports));
                ReadStep::Stop
            }
            EventFrame::Error { message } => {
                self.settle(Err(StartError::ServerReported { message }));
                ReadStep::Stop
            }
        }
    }

    /// The body ended without a terminal frame.
    pub fn on_end(&mut self) {
        if self.is_settled() {
            return;
        }
        // The decoder never parses the unterminated tail on its own; flush it
        // here so a final frame sent without a newline still counts.
        if let Some(tail) = self.decoder.finish() {
            match parse_frame_line(&tail) {
                Ok(Some(frame)) => {
                    debug!(server = %self.server, kind = frame.kind(), "Flushed final frame");
                    self.on_frame(frame);
                }
                Ok(None) => {}
                Err(e) => warn!(
                    server = %self.server,
                    error = %e,
                    "Discarding malformed line at end of start stream"
                ),
            }
        }
        if !self.is_settled() {
            self.settle(Err(StartError::StreamTerminatedEarly));
        }
    }

    /// Reading the body failed.
    pub fn on_transport_error(&mut self, error: HttpError) {
        if self.is_settled() {
            return;
        }
        self.settle(Err(StartError::Transport(error)));
    }

    fn settle(&mut self, outcome: StartOutcome) {
        if self.outcome.is_some() {
            return;
        }
        match &outcome {
            Ok(ports) => info!(server = %self.server, ?ports, "Server start completed"),
            Err(e) => warn!(
                server = %self.server,
                code = e.error_code(),
                error = %e,
                "Server start failed"
            ),
        }
        self.outcome = Some(outcome);
        self.phase = StartPhase::Settled;
    }

    /// Read `body` until the start settles or `cancel` fires.
    ///
    /// Returns `None` when cancelled first; the body is dropped either way.
    /// A dropped cancel sender counts as cancellation.
    pub async fn drive<S>(
        mut self,
        mut body: S,
        mut cancel: watch::Receiver<bool>,
    ) -> Option<StartOutcome>
    where
        S: Stream<Item = Result<Bytes, HttpError>> + Unpin,
    {
        loop {
            let next = tokio::select! {
                biased;
                _ = cancelled(&mut cancel) => {
                    info!(server = %self.server, phase = ?self.phase, "Start cancelled");
                    return None;
                }
                next = body.next() => next,
            };

            let step = match next {
                Some(Ok(chunk)) => self.on_chunk(&chunk),
                Some(Err(e)) => {
                    self.on_transport_error(e);
                    ReadStep::Stop
                }
                None => {
                    self.on_end();
                    ReadStep::Stop
                }
            };

            if step == ReadStep::Stop {
                break;
            }
        }

        drop(body);
        self.into_outcome()
    }
}

async fn cancelled(rx: &mut watch::Receiver<bool>) {
    loop {
        let fired = *rx.borrow_and_update();
        if fired {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}

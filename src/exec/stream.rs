// src/exec/stream.rs

//! Consumer-facing handles returned by [`crate::launch`].

use std::future::poll_fn;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::{mpsc, oneshot};
use tokio_stream::Stream;

use crate::types::{ProcessReport, StreamEnd, StreamKind};

/// Ordered lines from one of the child's output pipes.
///
/// Delivery is demand-driven: the relay only hands a line over after this
/// side asked for one, so a line nobody pulled is dropped on cancellation
/// rather than buffered. A relay blocks while its line is not asked for, so
/// consumers should drain (or drop) every `LineStream` they receive.
///
/// Also usable as a `Stream<Item = String>`.
#[derive(Debug)]
pub struct LineStream {
    kind: StreamKind,
    demand: mpsc::Sender<()>,
    /// A request is outstanding; never more than one.
    requested: bool,
    lines: mpsc::Receiver<String>,
    end_rx: Option<oneshot::Receiver<StreamEnd>>,
    end: Option<StreamEnd>,
}

impl LineStream {
    pub(crate) fn new(
        kind: StreamKind,
        demand: mpsc::Sender<()>,
        lines: mpsc::Receiver<String>,
        end_rx: oneshot::Receiver<StreamEnd>,
    ) -> Self {
        Self {
            kind,
            demand,
            requested: false,
            lines,
            end_rx: Some(end_rx),
            end: None,
        }
    }

    pub fn kind(&self) -> StreamKind {
        self.kind
    }

    /// Next line, or `None` once the relay has closed the stream.
    pub async fn next_line(&mut self) -> Option<String> {
        poll_fn(|cx| self.poll_line(cx)).await
    }

    fn poll_line(&mut self, cx: &mut Context<'_>) -> Poll<Option<String>> {
        if !self.requested {
            // A closed demand channel means the relay is done; anything it
            // sent is still in `lines`.
            let _ = self.demand.try_send(());
            self.requested = true;
        }

        let polled = self.lines.poll_recv(cx);
        if polled.is_ready() {
            self.requested = false;
        }
        polled
    }

    /// Why the stream closed.
    ///
    /// The relay records its reason before closing, so this is `Some` as soon
    /// as [`next_line`](Self::next_line) has returned `None`. Before that it
    /// is usually `None`.
    pub fn end(&mut self) -> Option<&StreamEnd> {
        if self.end.is_none() {
            if let Some(rx) = self.end_rx.as_mut() {
                match rx.try_recv() {
                    Ok(end) => {
                        self.end = Some(end);
                        self.end_rx = None;
                    }
                    Err(oneshot::error::TryRecvError::Empty) => {}
                    Err(oneshot::error::TryRecvError::Closed) => {
                        self.end = Some(StreamEnd::Aborted);
                        self.end_rx = None;
                    }
                }
            }
        }
        self.end.as_ref()
    }

    /// Drain every remaining line and wait for the closure reason.
    pub async fn collect(mut self) -> (Vec<String>, StreamEnd) {
        let mut out = Vec::new();
        while let Some(line) = self.next_line().await {
            out.push(line);
        }

        let end = match (self.end.take(), self.end_rx.take()) {
            (Some(end), _) => end,
            (None, Some(rx)) => rx.await.unwrap_or(StreamEnd::Aborted),
            (None, None) => StreamEnd::Aborted,
        };
        (out, end)
    }
}

impl Stream for LineStream {
    type Item = String;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<String>> {
        self.get_mut().poll_line(cx)
    }
}

/// Resolves to the [`ProcessReport`] once the supervisor has reaped the
/// child. Dropping it does not affect the process or the relays.
#[derive(Debug)]
pub struct ExitHandle {
    rx: oneshot::Receiver<ProcessReport>,
}

impl ExitHandle {
    pub(crate) fn new(rx: oneshot::Receiver<ProcessReport>) -> Self {
        Self { rx }
    }

    /// `None` only if the supervisor task was lost (e.g. runtime shutdown).
    pub async fn wait(self) -> Option<ProcessReport> {
        self.rx.await.ok()
    }
}

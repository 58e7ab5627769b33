// src/exec/relay.rs

//! Line relay: one per output pipe.
//!
//! Reads the pipe incrementally, splits it on `\n` and hands each line to
//! the consumer's [`LineStream`]. A line is only sent once the consumer has
//! asked for it, so the line channel is empty whenever the relay is waiting.
//! Every relay ends by recording a [`StreamEnd`] and then closing its
//! channel, in that order, so a consumer that sees the end of the lines can
//! always read the reason.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::exec::stream::LineStream;
use crate::types::{StreamEnd, StreamKind};

/// Spawn a relay task for `reader`.
///
/// The returned handle resolves to the same `StreamEnd` the consumer sees.
pub(crate) fn spawn_relay<R>(
    kind: StreamKind,
    reader: R,
    cancel: CancellationToken,
    pid: Option<u32>,
) -> (LineStream, JoinHandle<StreamEnd>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    // One request, then one line: both slots are only ever used in turn.
    let (demand_tx, mut demand_rx) = mpsc::channel::<()>(1);
    let (tx, rx) = mpsc::channel::<String>(1);
    let (end_tx, end_rx) = oneshot::channel::<StreamEnd>();

    let handle = tokio::spawn(async move {
        let end = relay_lines(kind, reader, &mut demand_rx, &tx, &cancel).await;
        debug!(?pid, stream = %kind, end = %end, "line relay finished");

        // Reason first, then close the channel.
        let _ = end_tx.send(end.clone());
        drop(tx);
        end
    });

    (LineStream::new(kind, demand_tx, rx, end_rx), handle)
}

async fn relay_lines<R>(
    kind: StreamKind,
    reader: R,
    demand: &mut mpsc::Receiver<()>,
    tx: &mpsc::Sender<String>,
    cancel: &CancellationToken,
) -> StreamEnd
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = tokio::select! {
            biased;
            _ = cancel.cancelled() => return StreamEnd::Cancelled,
            read = reader.read_until(b'\n', &mut buf) => read,
        };

        match read {
            Ok(0) => return StreamEnd::Eof,
            Ok(_) => {}
            Err(e) => {
                warn!(stream = %kind, error = %e, "reading child output failed");
                return StreamEnd::read_failed(&e);
            }
        }

        let line = decode_line(&buf);
        trace!(stream = %kind, "{}", line);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(stream = %kind, "cancelled during handoff; dropping pending line");
                return StreamEnd::Cancelled;
            }
            wanted = demand.recv() => {
                if wanted.is_none() {
                    return StreamEnd::Detached;
                }
            }
        }

        // The consumer asked and holds no line, so this completes at once.
        if tx.send(line).await.is_err() {
            return StreamEnd::Detached;
        }
    }
}

/// Strip the `\n` terminator and one preceding `\r`, decoding lossily.
fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

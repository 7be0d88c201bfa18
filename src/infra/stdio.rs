//! Newline-delimited JSON-RPC over a byte stream (stdin/stdout in production).
//!
//! Each non-blank line is handled on its own task so a slow backend call does
//! not hold up later lines. Responses go out in completion order; the shared
//! writer is locked per line so concurrent replies never interleave.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tokio::task::JoinSet;

use crate::api::rpc::Dispatcher;
use crate::core::mcp;

type SharedWriter<W> = Arc<Mutex<W>>;

pub async fn serve_stdio(dispatcher: Dispatcher) -> std::io::Result<()> {
    tracing::info!("serving JSON-RPC on stdio");
    serve(dispatcher, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}

/// Runs until `reader` hits EOF, then waits for in-flight requests to answer.
pub async fn serve<R, W>(dispatcher: Dispatcher, mut reader: R, writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let writer: SharedWriter<W> = Arc::new(Mutex::new(writer));
    let mut tasks = JoinSet::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            tracing::info!("EOF received, draining in-flight requests");
            break;
        }
        if buf.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        // Bytes go to the decoder untouched; invalid UTF-8 is a parse error.
        let line = buf.clone();
        tracing::debug!(line = %String::from_utf8_lossy(&line).trim_end(), "received");

        let dispatcher = dispatcher.clone();
        let writer = writer.clone();
        tasks.spawn(async move {
            let resp = dispatcher.handle_bytes(&line).await;
            write_line(&writer, &mcp::encode(&resp)).await
        });

        while let Some(done) = tasks.try_join_next() {
            log_task_outcome(done);
        }
    }

    while let Some(done) = tasks.join_next().await {
        log_task_outcome(done);
    }
    Ok(())
}

async fn write_line<W>(writer: &SharedWriter<W>, line: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut w = writer.lock().await;
    w.write_all(line.as_bytes()).await?;
    w.flush().await?;
    tracing::debug!(line = %line.trim_end(), "sent");
    Ok(())
}

fn log_task_outcome(done: Result<std::io::Result<()>, tokio::task::JoinError>) {
    match done {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!(error = %e, "failed to write response"),
        Err(e) => tracing::error!(error = %e, "request task aborted"),
    }
}

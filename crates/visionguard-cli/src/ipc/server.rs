use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::unix::OwnedWriteHalf;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::broadcast::{error::RecvError, Receiver};
use visionguard_core::error::Result as CoreResult;
use visionguard_core::{ServiceHandle, StatusSnapshot};

use super::protocol::{Request, Response};

/// Longest request line accepted, newline included.
const MAX_REQUEST_BYTES: u64 = 64 * 1024;

/// Accept control connections until the task is aborted.
pub async fn serve(listener: UnixListener, handle: ServiceHandle) {
    loop {
        let stream = match listener.accept().await {
            Ok((stream, _)) => stream,
            Err(e) => {
                tracing::warn!(error = %e, "failed to accept control connection");
                tokio::time::sleep(Duration::from_millis(100)).await;
                continue;
            }
        };
        let handle = handle.clone();
        tokio::spawn(async move {
            if let Err(e) = connection(stream, handle).await {
                tracing::debug!(error = %e, "control connection ended");
            }
        });
    }
}

async fn connection(stream: UnixStream, handle: ServiceHandle) -> std::io::Result<()> {
    let (read, mut write) = stream.into_split();
    let mut reader = BufReader::new(read);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let n = (&mut reader)
            .take(MAX_REQUEST_BYTES)
            .read_until(b'\n', &mut buf)
            .await?;
        if n == 0 {
            return Ok(());
        }
        if n as u64 == MAX_REQUEST_BYTES && buf.last() != Some(&b'\n') {
            let message = format!("request longer than {MAX_REQUEST_BYTES} bytes");
            return write_response(&mut write, &Response::Error { message }).await;
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let request: Request = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                let message = format!("invalid request: {e}");
                write_response(&mut write, &Response::Error { message }).await?;
                continue;
            }
        };
        tracing::debug!(?request, "control request");

        match request {
            Request::Subscribe => return stream_status(&handle, &mut write).await,
            Request::Quit => {
                write_response(&mut write, &Response::Ack).await?;
                let _ = handle.shutdown();
                return Ok(());
            }
            request => {
                let response = dispatch(&handle, request)
                    .await
                    .unwrap_or_else(|e| Response::Error {
                        message: e.to_string(),
                    });
                write_response(&mut write, &response).await?;
            }
        }
    }
}

async fn dispatch(handle: &ServiceHandle, request: Request) -> CoreResult<Response> {
    Ok(match request {
        Request::GetStatus => Response::Status {
            status: handle.status().await?,
        },
        Request::SkipBreak => {
            handle.skip_break()?;
            Response::Ack
        }
        Request::GetSettings => Response::Settings {
            settings: handle.settings().await?,
        },
        Request::SetSettings { settings } => {
            handle.set_settings(settings).await?;
            Response::Ack
        }
        Request::GetStats => Response::Stats {
            stats: handle.stats().await?,
        },
        Request::Activate => {
            handle.activate()?;
            Response::Ack
        }
        Request::Subscribe | Request::Quit => Response::Error {
            message: "not a single-shot request".into(),
        },
    })
}

/// Current status, then one line per published snapshot until either side
/// goes away.
async fn stream_status(handle: &ServiceHandle, write: &mut OwnedWriteHalf) -> std::io::Result<()> {
    let (mut rx, status) = match subscribe(handle).await {
        Ok(pair) => pair,
        Err(e) => {
            let message = e.to_string();
            return write_response(write, &Response::Error { message }).await;
        }
    };
    write_response(write, &Response::Status { status }).await?;

    loop {
        match rx.recv().await {
            Ok(status) => write_response(write, &Response::Status { status }).await?,
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "status subscriber lagged");
            }
            Err(RecvError::Closed) => return Ok(()),
        }
    }
}

async fn subscribe(handle: &ServiceHandle) -> CoreResult<(Receiver<StatusSnapshot>, StatusSnapshot)> {
    let rx = handle.subscribe().await?;
    let status = handle.status().await?;
    Ok((rx, status))
}

async fn write_response(write: &mut OwnedWriteHalf, response: &Response) -> std::io::Result<()> {
    let mut line = serde_json::to_string(response).map_err(std::io::Error::other)?;
    line.push('\n');
    write.write_all(line.as_bytes()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{engine, Scripted};
    use tempfile::TempDir;
    use tokio::io::BufReader as AsyncBufReader;
    use visionguard_core::{Phase, PromptResponse, Service};

    struct Conn {
        lines: tokio::io::Lines<AsyncBufReader<tokio::net::unix::OwnedReadHalf>>,
        write: OwnedWriteHalf,
    }

    impl Conn {
        async fn open(path: &std::path::Path) -> Self {
            let (read, write) = UnixStream::connect(path).await.unwrap().into_split();
            Self {
                lines: AsyncBufReader::new(read).lines(),
                write,
            }
        }

        async fn send(&mut self, line: &str) {
            self.write.write_all(line.as_bytes()).await.unwrap();
            self.write.write_all(b"\n").await.unwrap();
        }

        async fn recv(&mut self) -> Response {
            let line = self.lines.next_line().await.unwrap().unwrap();
            serde_json::from_str(&line).unwrap()
        }
    }

    #[tokio::test]
    async fn requests_round_trip_over_the_socket() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("visionguard.sock");
        let listener = crate::ipc::bind(&path).unwrap();
        let notifier = Scripted::new(PromptResponse::Accepted);
        let (service, handle) = Service::new(engine(&dir, notifier));
        let service = tokio::spawn(service.run(std::future::pending()));
        let server = tokio::spawn(serve(listener, handle));

        let mut conn = Conn::open(&path).await;
        conn.send(r#"{"cmd":"get_status"}"#).await;
        let Response::Status { status } = conn.recv().await else {
            panic!("expected status");
        };
        assert_eq!(status.phase, Phase::Working);
        assert_eq!(status.seconds_remaining, 20 * 60);

        conn.send("not json").await;
        assert!(matches!(conn.recv().await, Response::Error { .. }));

        conn.send(r#"{"cmd":"get_settings"}"#).await;
        let Response::Settings { mut settings } = conn.recv().await else {
            panic!("expected settings");
        };
        settings.work_duration_minutes = 0;
        let request = serde_json::to_string(&Request::SetSettings { settings }).unwrap();
        conn.send(&request).await;
        let Response::Error { message } = conn.recv().await else {
            panic!("zero work duration must be rejected");
        };
        assert!(message.contains("work_duration_minutes"));

        conn.send(r#"{"cmd":"quit"}"#).await;
        assert_eq!(conn.recv().await, Response::Ack);

        service.await.unwrap();
        server.abort();
    }

    #[tokio::test]
    async fn subscribe_starts_with_the_current_status() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("visionguard.sock");
        let listener = crate::ipc::bind(&path).unwrap();
        let notifier = Scripted::new(PromptResponse::Accepted);
        let (service, handle) = Service::new(engine(&dir, notifier));
        let service = tokio::spawn(service.run(std::future::pending()));
        let server = tokio::spawn(serve(listener, handle.clone()));

        let mut conn = Conn::open(&path).await;
        conn.send(r#"{"cmd":"subscribe"}"#).await;
        let Response::Status { status } = conn.recv().await else {
            panic!("expected status");
        };
        assert_eq!(status.phase_total_seconds, 20 * 60);

        handle.shutdown().unwrap();
        service.await.unwrap();
        server.abort();
    }

    #[tokio::test]
    async fn oversized_request_is_refused_and_closed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("visionguard.sock");
        let listener = crate::ipc::bind(&path).unwrap();
        let notifier = Scripted::new(PromptResponse::Accepted);
        let (service, handle) = Service::new(engine(&dir, notifier));
        let service = tokio::spawn(service.run(std::future::pending()));
        let server = tokio::spawn(serve(listener, handle.clone()));

        let mut conn = Conn::open(&path).await;
        let flood = vec![b'a'; MAX_REQUEST_BYTES as usize];
        conn.write.write_all(&flood).await.unwrap();
        let Response::Error { message } = conn.recv().await else {
            panic!("expected an error");
        };
        assert!(message.contains("longer than"));
        assert!(conn.lines.next_line().await.unwrap().is_none());

        // Other connections are unaffected.
        let mut next = Conn::open(&path).await;
        next.send(r#"{"cmd":"get_status"}"#).await;
        assert!(matches!(next.recv().await, Response::Status { .. }));

        handle.shutdown().unwrap();
        service.await.unwrap();
        server.abort();
    }
}

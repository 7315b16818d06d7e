use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

use super::protocol::{Request, Response};
use super::socket_path;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("visionguard is not running ({path:?}): {source}")]
    NotRunning {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("daemon closed the connection")]
    Closed,

    #[error("{0}")]
    Daemon(String),

    #[error("unexpected response: {0:?}")]
    Unexpected(Response),
}

/// Blocking connection to the daemon's control socket.
pub struct Client {
    reader: BufReader<UnixStream>,
    writer: UnixStream,
}

impl Client {
    pub fn connect(path: &Path) -> Result<Self, ClientError> {
        let stream = UnixStream::connect(path).map_err(|source| ClientError::NotRunning {
            path: path.to_path_buf(),
            source,
        })?;
        let writer = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(stream),
            writer,
        })
    }

    pub fn connect_default() -> Result<Self, ClientError> {
        Self::connect(&socket_path())
    }

    pub fn send(&mut self, request: &Request) -> Result<(), ClientError> {
        let mut line = serde_json::to_string(request)?;
        line.push('\n');
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    /// Next line from the daemon.
    pub fn receive(&mut self) -> Result<Response, ClientError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(ClientError::Closed);
        }
        Ok(serde_json::from_str(line.trim())?)
    }

    /// Send `request` and wait for its answer. Daemon-side failures come back
    /// as [`ClientError::Daemon`].
    pub fn call(&mut self, request: &Request) -> Result<Response, ClientError> {
        self.send(request)?;
        match self.receive()? {
            Response::Error { message } => Err(ClientError::Daemon(message)),
            response => Ok(response),
        }
    }
}

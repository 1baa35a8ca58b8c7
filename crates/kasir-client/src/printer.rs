//! Receipt printer transport.
//!
//! Best effort: bytes are written in small chunks with a pause between
//! them and nothing confirms that the printer consumed them.

use crate::error::PrinterError;
use async_trait::async_trait;
use kasir_core::receipt::chunks;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CHUNK_SIZE: usize = 512;
pub const DEFAULT_CHUNK_DELAY: Duration = Duration::from_millis(50);

/// A byte sink that can be (re)connected.
#[async_trait]
pub trait PrinterTransport: Send {
    async fn connect(&mut self) -> Result<(), PrinterError>;

    fn is_connected(&self) -> bool;

    async fn write(&mut self, chunk: &[u8]) -> Result<(), PrinterError>;
}

/// Chunking and timing for a print job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintOptions {
    pub chunk_size: usize,
    #[serde(with = "millis")]
    pub chunk_delay: Duration,
    #[serde(with = "millis")]
    pub connect_timeout: Duration,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_delay: DEFAULT_CHUNK_DELAY,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

/// Connect, trying once more if the first attempt finds the printer
/// disconnected. Both attempts share one deadline.
pub async fn connect_with_timeout<T>(transport: &mut T, timeout: Duration) -> Result<(), PrinterError>
where
    T: PrinterTransport + ?Sized,
{
    let attempt = async {
        match transport.connect().await {
            Err(PrinterError::Disconnected) => {
                debug!("printer disconnected, reconnecting");
                transport.connect().await
            }
            other => other,
        }
    };
    match tokio::time::timeout(timeout, attempt).await {
        Ok(result) => result,
        Err(_) => {
            warn!(?timeout, "printer connection timed out");
            Err(PrinterError::ConnectTimeout(timeout))
        }
    }
}

/// Send `bytes` to the printer. Returns the number of bytes written.
pub async fn print_receipt<T>(
    transport: &mut T,
    bytes: &[u8],
    options: &PrintOptions,
) -> Result<usize, PrinterError>
where
    T: PrinterTransport + ?Sized,
{
    if !transport.is_connected() {
        connect_with_timeout(transport, options.connect_timeout).await?;
    }

    let mut written = 0;
    for (i, chunk) in chunks(bytes, options.chunk_size).enumerate() {
        if i > 0 && !options.chunk_delay.is_zero() {
            tokio::time::sleep(options.chunk_delay).await;
        }
        transport.write(chunk).await?;
        written += chunk.len();
    }
    info!(bytes = written, "receipt sent to printer");
    Ok(written)
}

/// Printer reached through a device node or file, such as a bound RFCOMM
/// serial port (`/dev/rfcomm0`) or a USB line printer (`/dev/usb/lp0`).
#[derive(Debug)]
pub struct DeviceTransport {
    path: PathBuf,
    file: Option<tokio::fs::File>,
}

impl DeviceTransport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn device_error(err: std::io::Error) -> PrinterError {
    match err.kind() {
        ErrorKind::NotFound | ErrorKind::BrokenPipe | ErrorKind::ConnectionReset | ErrorKind::NotConnected => {
            PrinterError::Disconnected
        }
        _ => PrinterError::Io(err),
    }
}

#[async_trait]
impl PrinterTransport for DeviceTransport {
    async fn connect(&mut self) -> Result<(), PrinterError> {
        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .open(&self.path)
            .await
            .map_err(device_error)?;
        debug!(path = %self.path.display(), "printer device opened");
        self.file = Some(file);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.file.is_some()
    }

    async fn write(&mut self, chunk: &[u8]) -> Result<(), PrinterError> {
        let file = self.file.as_mut().ok_or(PrinterError::NotConnected)?;
        let result = async {
            file.write_all(chunk).await?;
            file.flush().await
        }
        .await;
        if let Err(err) = result {
            self.file = None;
            return Err(device_error(err));
        }
        Ok(())
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

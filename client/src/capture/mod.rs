//! Camera capture and the capture-and-submit flow.
//!
//! SYSTEM CONTEXT
//! ==============
//! Registering an employee and clocking in both take one still image and post
//! it to one endpoint. `Camera` abstracts where the still comes from (a file
//! picked by the user, or an external capture program driving a webcam);
//! `flow` owns the trigger gate and outcome mapping.


pub mod flow;

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";
pub const DEFAULT_CAPTURE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("could not read image {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("could not start capture program {program}: {source}")]
    Spawn { program: String, source: std::io::Error },
    #[error("capture program {program} exited with {status}: {stderr}")]
    Program { program: String, status: String, stderr: String },
    #[error("capture program {program} gave no image within {}s", after.as_secs_f32())]
    TimedOut { program: String, after: Duration },
    #[error("camera produced an empty image")]
    Empty,
}

/// One still image ready to be attached to a multipart form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedImage {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: &'static str,
}

impl CapturedImage {
    /// Wrap raw bytes, inferring the content type from magic bytes first and
    /// the file extension second.
    ///
    /// # Errors
    ///
    /// Returns `Empty` for a zero-length image.
    pub fn new(bytes: Vec<u8>, file_name: impl Into<String>) -> Result<Self, CaptureError> {
        if bytes.is_empty() {
            return Err(CaptureError::Empty);
        }
        let file_name = file_name.into();
        let content_type = sniff_content_type(&bytes)
            .or_else(|| content_type_for_name(&file_name))
            .unwrap_or(FALLBACK_CONTENT_TYPE);
        Ok(Self { bytes, file_name, content_type })
    }
}

fn sniff_content_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        Some("image/png")
    } else {
        None
    }
}

fn content_type_for_name(name: &str) -> Option<&'static str> {
    let extension = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// A device that yields one still image per call.
#[async_trait]
pub trait Camera: Send + Sync {
    /// Take one picture.
    ///
    /// # Errors
    ///
    /// Returns an error when the device yields nothing usable.
    async fn capture(&self) -> Result<CapturedImage, CaptureError>;
}

/// A still picked from disk; the upload/file-input variant.
#[derive(Clone, Debug)]
pub struct FileCamera {
    path: PathBuf,
}

impl FileCamera {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Camera for FileCamera {
    async fn capture(&self) -> Result<CapturedImage, CaptureError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| CaptureError::Read { path: self.path.clone(), source })?;
        let file_name = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("photo.jpg")
            .to_owned();
        CapturedImage::new(bytes, file_name)
    }
}

/// An external program that writes one image to stdout, e.g.
/// `fswebcam --no-banner -` or `libcamera-still -o -`. A program still
/// running after `timeout` is killed.
#[derive(Clone, Debug)]
pub struct CommandCamera {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandCamera {
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args, timeout: DEFAULT_CAPTURE_TIMEOUT }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Split a shell-like command line on whitespace. Quoting is not
    /// supported.
    #[must_use]
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(ToOwned::to_owned);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }
}

#[async_trait]
impl Camera for CommandCamera {
    async fn capture(&self) -> Result<CapturedImage, CaptureError> {
        tracing::debug!(program = %self.program, "capturing from camera program");
        let mut command = Command::new(&self.program);
        command.args(&self.args).kill_on_drop(true);
        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                tracing::warn!(program = %self.program, "camera program timed out");
                CaptureError::TimedOut { program: self.program.clone(), after: self.timeout }
            })?
            .map_err(|source| CaptureError::Spawn { program: self.program.clone(), source })?;
        if !output.status.success() {
            return Err(CaptureError::Program {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        let file_name = match sniff_content_type(&output.stdout) {
            Some("image/png") => "capture.png",
            _ => "capture.jpg",
        };
        CapturedImage::new(output.stdout, file_name)
    }
}

/// Where a screen gets its photo from.
#[derive(Clone, Debug)]
pub enum PhotoSource {
    File(FileCamera),
    Command(CommandCamera),
}

impl PhotoSource {
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(FileCamera::new(path))
    }
}

#[async_trait]
impl Camera for PhotoSource {
    async fn capture(&self) -> Result<CapturedImage, CaptureError> {
        match self {
            Self::File(camera) => camera.capture().await,
            Self::Command(camera) => camera.capture().await,
        }
    }
}

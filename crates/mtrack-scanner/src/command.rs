//! Decoder-process scan source
//!
//! Runs an external QR decoder bound to a capture device (by default
//! `zbarcam --raw --nodisplay <device>`) and reads one decoded string per
//! stdout line. Releasing the capture kills the decoder before returning;
//! stderr chatter is drained and logged at `debug` while the decoder runs.

use crate::capture::{Capture, ScanOptions, ScanSource, VideoSurface};
use crate::error::ScannerError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tokio::sync::mpsc;

/// Placeholder replaced by the capture device in decoder arguments
pub const DEVICE_PLACEHOLDER: &str = "{device}";

/// Prefix some decoders put in front of QR payloads
const QR_PREFIX: &str = "QR-Code:";

/// Decoder program and arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderCommand {
    /// Program to run
    pub program: String,
    /// Arguments; `{device}` is replaced by the surface device
    pub args: Vec<String>,
    /// Extra arguments when `highlight_scan_region` is set
    pub scan_region_args: Vec<String>,
    /// Extra arguments when `highlight_code_outline` is set
    pub code_outline_args: Vec<String>,
    /// How long the decoder must stay up before the camera counts as acquired
    pub startup_grace_ms: u64,
}

impl DecoderCommand {
    /// Create decoder command
    #[inline]
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            scan_region_args: Vec::new(),
            code_outline_args: Vec::new(),
            startup_grace_ms: 250,
        }
    }

    /// With argument
    #[inline]
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// With startup grace period
    #[inline]
    #[must_use]
    pub fn with_startup_grace(mut self, grace: Duration) -> Self {
        self.startup_grace_ms = u64::try_from(grace.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// With arguments for the scan region overlay
    #[inline]
    #[must_use]
    pub fn with_scan_region_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scan_region_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// With arguments for the code outline overlay
    #[inline]
    #[must_use]
    pub fn with_code_outline_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.code_outline_args = args.into_iter().map(Into::into).collect();
        self
    }

    fn resolved_args(&self, surface: &VideoSurface, options: &ScanOptions) -> Vec<String> {
        let region = options
            .highlight_scan_region
            .then_some(self.scan_region_args.as_slice())
            .unwrap_or_default();
        let outline = options
            .highlight_code_outline
            .then_some(self.code_outline_args.as_slice())
            .unwrap_or_default();

        self.args
            .iter()
            .chain(region)
            .chain(outline)
            .map(|a| a.replace(DEVICE_PLACEHOLDER, surface.device()))
            .collect()
    }
}

impl Default for DecoderCommand {
    fn default() -> Self {
        Self::new("zbarcam")
            .arg("--raw")
            .arg("--nodisplay")
            .arg(DEVICE_PLACEHOLDER)
    }
}

/// Hardware-backed scan source driving a decoder process
#[derive(Debug, Clone, Default)]
pub struct CommandScanSource {
    command: DecoderCommand,
}

impl CommandScanSource {
    /// Create source for `command`
    #[inline]
    #[must_use]
    pub fn new(command: DecoderCommand) -> Self {
        Self { command }
    }

    /// Wait out the startup grace; a decoder that fails in that window never
    /// had the camera
    async fn await_startup(&self, child: &mut Child) -> Result<(), ScannerError> {
        let grace = Duration::from_millis(self.command.startup_grace_ms);
        let status = match tokio::time::timeout(grace, child.wait()).await {
            Err(_) => return Ok(()),
            Ok(Err(e)) => return Err(ScannerError::spawn(&self.command.program, e)),
            Ok(Ok(status)) => status,
        };

        if status.success() {
            // Decoder finished on its own; whatever it printed is still piped.
            return Ok(());
        }

        let mut stderr = String::new();
        if let Some(mut pipe) = child.stderr.take() {
            let _ = pipe.read_to_string(&mut stderr).await;
        }
        let stderr = stderr.trim().to_string();
        Err(classify_startup_failure(status.to_string(), stderr))
    }
}

#[async_trait]
impl ScanSource for CommandScanSource {
    async fn open(
        &self,
        surface: &VideoSurface,
        options: &ScanOptions,
    ) -> Result<Capture, ScannerError> {
        let args = self.command.resolved_args(surface, options);
        tracing::debug!(program = %self.command.program, ?args, "Launching decoder");

        let mut child = Command::new(&self.command.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ScannerError::spawn(&self.command.program, e))?;

        self.await_startup(&mut child).await?;

        let stdout = child.stdout.take().ok_or_else(|| {
            ScannerError::DeviceUnavailable("decoder stdout not captured".to_string())
        })?;
        let chatter = child.stderr.take().map(|stderr| tokio::spawn(drain_stderr(stderr)));

        let (tx, rx) = mpsc::channel(options.buffer.max(1));
        let reader = tokio::spawn(forward_codes(stdout, tx));

        let device = surface.device().to_string();
        tracing::info!(device = %device, "Camera acquired");
        Ok(Capture::new(rx, move || {
            if let Err(e) = child.start_kill() {
                tracing::debug!(error = %e, "Decoder already exited");
            }
            reader.abort();
            if let Some(chatter) = chatter {
                chatter.abort();
            }
            tracing::info!(device = %device, "Camera released");
        }))
    }
}

/// Pump decoded lines into the capture stream
async fn forward_codes(stdout: ChildStdout, tx: mpsc::Sender<String>) {
    let mut lines = BufReader::new(stdout).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let Some(code) = normalize_code(&line) else {
                    continue;
                };
                tracing::debug!(code = %code, "Decoded");
                if tx.send(code).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Decoder output unreadable");
                break;
            }
        }
    }
}

/// Keep the stderr pipe empty so a chatty decoder never blocks on it
async fn drain_stderr(stderr: ChildStderr) {
    let mut reader = BufReader::new(stderr);
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => {
                let text = String::from_utf8_lossy(&line);
                let text = text.trim();
                if !text.is_empty() {
                    tracing::debug!(line = %text, "Decoder stderr");
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "Decoder stderr unreadable");
                break;
            }
        }
    }
}

fn normalize_code(line: &str) -> Option<String> {
    let line = line.trim();
    let code = line.strip_prefix(QR_PREFIX).unwrap_or(line);
    if code.is_empty() {
        None
    } else {
        Some(code.to_string())
    }
}

fn classify_startup_failure(status: String, stderr: String) -> ScannerError {
    let lowered = stderr.to_lowercase();
    if lowered.contains("permission denied") || lowered.contains("not permitted") {
        ScannerError::PermissionDenied(stderr)
    } else if lowered.contains("no such file") || lowered.contains("no such device") {
        ScannerError::DeviceUnavailable(stderr)
    } else {
        ScannerError::ExitedEarly { status, stderr }
    }
}

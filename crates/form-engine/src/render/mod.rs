//! Fixed-layout (PDF) rendering through an external office converter
//!
//! The converter runs as a child process:
//! `<converter> --headless --convert-to pdf --outdir <dir> <input>`.
//! Callers block until it exits or the timeout elapses; on timeout the
//! converter's whole process group is killed and the child reaped before
//! the error is returned.

pub mod errors;

pub use errors::RenderError;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::{ChildStderr, Command};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{DEFAULT_CONVERTER, DEFAULT_RENDER_TIMEOUT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    pub converter: PathBuf,
    pub timeout: Duration,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            converter: PathBuf::from(DEFAULT_CONVERTER),
            timeout: DEFAULT_RENDER_TIMEOUT,
        }
    }
}

/// Produces a fixed-layout copy of a document next to it
pub trait FixedLayoutRenderer {
    fn render(&self, input: &Path) -> Result<PathBuf, RenderError>;
}

/// LibreOffice-compatible command-line converter
#[derive(Debug, Clone, Default)]
pub struct SofficeRenderer {
    config: RenderConfig,
}

impl SofficeRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }
}

impl FixedLayoutRenderer for SofficeRenderer {
    fn render(&self, input: &Path) -> Result<PathBuf, RenderError> {
        render_to_fixed_layout(input, &self.config)
    }
}

/// Blocking entry point. Runs the converter on a private current-thread
/// runtime, so it must not be called from inside an async task.
pub fn render_to_fixed_layout(input: &Path, config: &RenderConfig) -> Result<PathBuf, RenderError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(render_async(input, config))
}

pub async fn render_async(input: &Path, config: &RenderConfig) -> Result<PathBuf, RenderError> {
    let outdir = output_dir(input);
    let converter = config.converter.display().to_string();
    debug!("Rendering {} with {}", input.display(), converter);

    let mut command = std::process::Command::new(&config.converter);
    command
        .arg("--headless")
        .arg("--convert-to")
        .arg("pdf")
        .arg("--outdir")
        .arg(&outdir)
        .arg(input)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());
    // The converter's helpers join its group so a timeout can stop them all
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    let deadline = Instant::now() + config.timeout;
    let mut child = Command::from(command)
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                RenderError::RendererUnavailable(converter.clone())
            }
            _ => RenderError::Io(e),
        })?;
    let pid = child.id();

    let captured = Arc::new(Mutex::new(Vec::new()));
    let mut stderr_task = tokio::spawn(collect_stderr(child.stderr.take(), Arc::clone(&captured)));

    let status = match tokio::time::timeout_at(deadline, child.wait()).await {
        Ok(status) => status?,
        Err(_elapsed) => {
            warn!(
                "Renderer timed out after {:?} on {}",
                config.timeout,
                input.display()
            );
            kill_group(pid);
            // kill() also waits for the child, so it does not linger as a zombie
            child.kill().await?;
            stderr_task.abort();
            return Err(RenderError::RenderTimeout(config.timeout.as_millis() as u64));
        }
    };

    if !status.success() {
        // Leftover helpers may hold stderr open past the converter's exit
        if tokio::time::timeout_at(deadline, &mut stderr_task).await.is_err() {
            debug!("Converter stderr still open at the deadline");
            kill_group(pid);
            stderr_task.abort();
        }
        let stderr = captured_text(&captured);
        warn!("Renderer failed with {:?}: {}", status.code(), stderr);
        return Err(RenderError::RenderFailed {
            code: status.code(),
            stderr,
        });
    }
    stderr_task.abort();

    let output = expected_output(input, &outdir);
    if !output.exists() {
        return Err(RenderError::RenderOutputMissing(output.display().to_string()));
    }

    info!("Rendered {}", output.display());
    Ok(output)
}

async fn collect_stderr(stderr: Option<ChildStderr>, captured: Arc<Mutex<Vec<u8>>>) {
    let Some(mut stderr) = stderr else {
        return;
    };
    let mut chunk = [0u8; 4096];
    loop {
        match stderr.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                if let Ok(mut buf) = captured.lock() {
                    buf.extend_from_slice(&chunk[..n]);
                }
            }
        }
    }
}

fn captured_text(captured: &Mutex<Vec<u8>>) -> String {
    captured
        .lock()
        .map(|buf| String::from_utf8_lossy(&buf).trim().to_string())
        .unwrap_or_default()
}

/// SIGKILL every process in the converter's group
#[cfg(unix)]
fn kill_group(pid: Option<u32>) {
    let Some(pgid) = pid.and_then(|pid| libc::pid_t::try_from(pid).ok()) else {
        return;
    };
    unsafe {
        let _ = libc::kill(-pgid, libc::SIGKILL);
    }
}

#[cfg(not(unix))]
fn kill_group(_pid: Option<u32>) {}

fn output_dir(input: &Path) -> PathBuf {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// The converter names its output after the input's stem
fn expected_output(input: &Path, outdir: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or(input.as_os_str());
    let mut name = stem.to_os_string();
    name.push(".pdf");
    outdir.join(name)
}

//! External tracer: hand the bitmap to potrace and let it write the SVG.
//!
//! The tracing algorithm is entirely potrace's; this module only builds the
//! argument vector, runs the process, and turns its exit status into a
//! [`Png2SvgError`]. The [`Tracer`] trait is the seam tests use to swap in a
//! stub.
//!
//! ## Process contract
//!
//! ```text
//! potrace --svg [tuning flags] --output <svg> <bitmap>
//! ```
//!
//! Exit status 0 is success; anything else is fatal and is not retried.
//! potrace may leave a partial file at `<svg>` on failure; it is not removed.

use crate::config::TraceOptions;
use crate::error::Png2SvgError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// How often a running tool is polled when a timeout is configured.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// How long to wait for stderr after a time-limited tool has exited.
const STDERR_GRACE: Duration = Duration::from_millis(500);

/// Turns a bitmap file into a vector file.
pub trait Tracer: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &str;

    /// Read `bitmap` and write the vector image to `output`.
    fn trace(&self, bitmap: &Path, output: &Path) -> Result<(), Png2SvgError>;
}

/// [`Tracer`] backed by the `potrace` command-line tool.
#[derive(Debug, Clone)]
pub struct PotraceCli {
    program: PathBuf,
    options: TraceOptions,
    timeout: Option<Duration>,
}

impl PotraceCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            options: TraceOptions::default(),
            timeout: None,
        }
    }

    pub fn with_options(mut self, options: TraceOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The full argument vector (without the program itself).
    pub fn build_args(&self, bitmap: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["--svg".into()];
        args.extend(self.options.to_args().into_iter().map(OsString::from));
        args.push("--output".into());
        args.push(output.as_os_str().to_owned());
        args.push(bitmap.as_os_str().to_owned());
        args
    }

    fn launch_error(&self, e: std::io::Error) -> Png2SvgError {
        if e.kind() == std::io::ErrorKind::NotFound {
            Png2SvgError::ToolNotFound {
                tool: self.program.display().to_string(),
                hint: potrace_locate::install_hint().to_string(),
            }
        } else {
            Png2SvgError::ToolLaunchFailed {
                tool: self.program.display().to_string(),
                source: e,
            }
        }
    }
}

impl Tracer for PotraceCli {
    fn name(&self) -> &str {
        "potrace"
    }

    fn trace(&self, bitmap: &Path, output: &Path) -> Result<(), Png2SvgError> {
        let args = self.build_args(bitmap, output);
        debug!("Running {} {:?}", self.program.display(), args);

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.launch_error(e))?;

        // Drain stderr on its own thread so a chatty tool cannot fill the
        // pipe and block while we wait on it. The thread is never joined: a
        // wrapper script's grandchild can hold the pipe open after the tool
        // itself is gone.
        let (stderr_tx, stderr_rx) = mpsc::channel();
        if let Some(mut pipe) = child.stderr.take() {
            thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = pipe.read_to_end(&mut buf);
                let _ = stderr_tx.send(String::from_utf8_lossy(&buf).into_owned());
            });
        } else {
            drop(stderr_tx);
        }

        let status = match self.timeout {
            None => child.wait().map_err(|e| self.launch_error(e))?,
            Some(limit) => match wait_with_timeout(&mut child, limit)
                .map_err(|e| self.launch_error(e))?
            {
                Some(status) => status,
                None => {
                    warn!(
                        "{} exceeded {}s, killing it",
                        self.program.display(),
                        limit.as_secs()
                    );
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(Png2SvgError::ToolTimeout {
                        tool: self.program.display().to_string(),
                        secs: limit.as_secs(),
                    });
                }
            },
        };

        let stderr = match self.timeout {
            None => stderr_rx.recv().unwrap_or_default(),
            Some(_) => stderr_rx.recv_timeout(STDERR_GRACE).unwrap_or_default(),
        };
        if status.success() {
            if !stderr.trim().is_empty() {
                debug!("{} stderr: {}", self.program.display(), stderr.trim());
            }
            Ok(())
        } else {
            Err(Png2SvgError::ToolFailed {
                tool: self.program.display().to_string(),
                status: status.code(),
                stderr,
            })
        }
    }
}

/// Poll `child` until it exits or `limit` elapses. `Ok(None)` means timed out.
fn wait_with_timeout(child: &mut Child, limit: Duration) -> std::io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

static VERSION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+\.\d+(?:\.\d+)?)").unwrap());

/// Extract the first dotted version number from `potrace --version` output.
pub fn parse_version(text: &str) -> Option<String> {
    VERSION_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Run `<program> --version` and parse the result.
pub fn probe_version(program: &Path) -> Result<Option<String>, Png2SvgError> {
    let launch = PotraceCli::new(program);
    let out = Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .output()
        .map_err(|e| launch.launch_error(e))?;

    if !out.status.success() {
        return Err(Png2SvgError::ToolFailed {
            tool: program.display().to_string(),
            status: out.status.code(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        });
    }
    Ok(parse_version(&String::from_utf8_lossy(&out.stdout)))
}

//! # potrace-locate
//!
//! Find the [potrace](https://potrace.sourceforge.net) executable on the
//! host, so callers get an actionable "install potrace" message up front
//! instead of an opaque `No such file or directory` from `Command::spawn`.
//!
//! ## How it works
//!
//! On first call to [`locate_potrace`]:
//!
//! 1. If `POTRACE_PATH` is set and names an existing file, that file is used.
//! 2. Otherwise every directory in `PATH` is searched for the platform
//!    executable name (`potrace`, or `potrace.exe` on Windows).
//! 3. The result is memoised for the rest of the process.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use potrace_locate::{install_hint, locate_potrace};
//!
//! match locate_potrace() {
//!     Ok(path) => println!("potrace at {}", path.display()),
//!     Err(e) => eprintln!("{e}\n{}", install_hint()),
//! }
//! ```
//!
//! ## Platform support
//!
//! | OS      | Executable     | Install hint                      |
//! |---------|----------------|-----------------------------------|
//! | Linux   | `potrace`      | `sudo apt-get install potrace`    |
//! | macOS   | `potrace`      | `brew install potrace`            |
//! | Windows | `potrace.exe`  | download from potrace.sourceforge.net or use WSL |
//!
//! ## Environment variable overrides
//!
//! - `POTRACE_PATH` — path to an existing potrace binary; skips the PATH search.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use thiserror::Error;

// ── Public constants ─────────────────────────────────────────────────────────

/// Environment variable that pins the potrace executable.
pub const POTRACE_PATH_ENV: &str = "POTRACE_PATH";

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by potrace-locate operations.
#[derive(Error, Debug)]
pub enum LocateError {
    /// `POTRACE_PATH` was set but does not point at a file, and PATH had no match either.
    #[error("POTRACE_PATH '{path}' does not exist and '{name}' is not on PATH")]
    OverrideMissing { path: PathBuf, name: String },

    /// No PATH entry contains the executable.
    #[error("'{name}' was not found in any PATH directory ({searched} searched)")]
    NotOnPath { name: String, searched: usize },

    /// `PATH` is unset or empty.
    #[error("PATH is not set; cannot search for '{name}'")]
    NoPathVariable { name: String },
}

// ── Platform metadata ────────────────────────────────────────────────────────

/// File name of the potrace executable on the current platform.
pub fn executable_name() -> &'static str {
    if cfg!(windows) {
        "potrace.exe"
    } else {
        "potrace"
    }
}

/// Human-readable install instructions for the current platform.
pub fn install_hint() -> &'static str {
    match std::env::consts::OS {
        "macos" => "Install potrace with: brew install potrace",
        "windows" => {
            "Download potrace from https://potrace.sourceforge.net and add it to PATH, \
             or run under WSL"
        }
        _ => "Install potrace with: sudo apt-get install potrace (or your distribution's equivalent)",
    }
}

// ── Thread-safe singleton path cache ─────────────────────────────────────────

static RESOLVED_PATH: OnceLock<PathBuf> = OnceLock::new();

// ── Public API ───────────────────────────────────────────────────────────────

/// Returns `true` if [`locate_potrace`] would succeed.
pub fn is_potrace_available() -> bool {
    locate_potrace().is_ok()
}

/// Resolves the potrace executable.
///
/// - If `POTRACE_PATH` is set (and the file exists), that path is used.
/// - Otherwise each `PATH` directory is searched in order.
///
/// # Thread safety
///
/// Safe to call from multiple threads; a successful lookup is cached for the
/// process lifetime. Failures are not cached so a later install is picked up.
pub fn locate_potrace() -> Result<PathBuf, LocateError> {
    if let Some(path) = RESOLVED_PATH.get() {
        return Ok(path.clone());
    }

    let path = resolve_from(
        std::env::var_os(POTRACE_PATH_ENV),
        std::env::var_os("PATH"),
    )?;

    // Losing the race is fine: both threads resolved the same file.
    let _ = RESOLVED_PATH.set(path.clone());

    Ok(path)
}

/// Searches the directories of a `PATH`-style variable for `name`.
///
/// Returns the first candidate that is an executable file.
pub fn find_in_path(name: &str, path_var: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(path_var)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

// ── Internal helpers ─────────────────────────────────────────────────────────

fn resolve_from(
    override_path: Option<OsString>,
    path_var: Option<OsString>,
) -> Result<PathBuf, LocateError> {
    let name = executable_name();

    // 1. Environment variable override.
    let mut stale_override = None;
    if let Some(p) = override_path.filter(|p| !p.is_empty()) {
        let p = PathBuf::from(p);
        if p.is_file() {
            return Ok(p);
        }
        stale_override = Some(p);
    }

    // 2. PATH search.
    let path_var = match path_var.filter(|v| !v.is_empty()) {
        Some(v) => v,
        None => {
            return Err(match stale_override {
                Some(path) => LocateError::OverrideMissing {
                    path,
                    name: name.to_string(),
                },
                None => LocateError::NoPathVariable {
                    name: name.to_string(),
                },
            })
        }
    };

    if let Some(found) = find_in_path(name, &path_var) {
        return Ok(found);
    }

    Err(match stale_override {
        Some(path) => LocateError::OverrideMissing {
            path,
            name: name.to_string(),
        },
        None => LocateError::NotOnPath {
            name: name.to_string(),
            searched: std::env::split_paths(&path_var).count(),
        },
    })
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

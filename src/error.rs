use std::ffi::OsString;
use std::io;

use thiserror::Error;

/// Errors encountered while querying the host.
///
/// None of these ever reach callers of the public queries: they are either turned into a
/// warning for the [`DiagnosticSink`](crate::diagnostics::DiagnosticSink) or swallowed into an
/// empty result. The [`Display`](std::fmt::Display) text is exactly what the sink receives.
#[derive(Debug, Error)]
pub enum HostError {
    /// Both the fixed-buffer and the libc-allocated `getcwd` failed.
    #[error("can't determine working directory: {0}")]
    WorkingDirectory(io::Error),

    /// `/proc/self/exe` could not be read.
    #[error("Unable to read /proc/self/exe to obtain executable path: {0}")]
    ExecutablePath(io::Error),

    /// `getpwuid_r`/`getpwnam_r` reported an error (`ERANGE` included).
    #[error("identity lookup failed: {0}")]
    IdentityLookup(io::Error),

    /// Login names are passed to libc as C strings, so they can't contain NUL.
    #[error("login name `{0:?}` contains an interior NUL byte")]
    InvalidLogin(OsString),
}

//! The four host queries.
//!
//! Each query is independent, keeps no state between calls and never fails: it walks a fixed
//! fallback chain and settles on a default when the chain is exhausted.
//!
//! ```rust
//! use hostenv::diagnostics::MemorySink;
//! use hostenv::os::env::Env;
//! use hostenv::system_info::SystemInfo;
//!
//! let sink = MemorySink::new();
//! let info = SystemInfo::new()
//!     .with_env(Env::from_iter([("HOME", "/home/alice"), ("LOGNAME", "alice")]))
//!     .with_sink(&sink);
//!
//! assert_eq!(info.home_dir(""), std::path::Path::new("/home/alice"));
//! assert_eq!(info.user_name(), "alice");
//! assert!(info.current_dir().is_absolute());
//! assert!(sink.messages().is_empty());
//! ```

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::HostError;
use crate::os::env::{self, Env};
use crate::platform::{Host, Native};

/// Environmental variable overriding the home directory of the current user.
pub const HOME_VAR: &str = "HOME";

/// Environmental variables holding the user name, in priority order.
pub const USER_NAME_VARS: [&str; 4] = ["LOGNAME", "USER", "LNAME", "USERNAME"];

/// Returned by [`SystemInfo::current_dir`] when the working directory can't be determined.
pub const FALLBACK_CWD: &str = ".";

/// Where [`SystemInfo`] reads environmental variables from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EnvSource {
    /// The process environment, read again on every query.
    #[default]
    Process,
    /// A fixed snapshot.
    Snapshot(Env),
}

impl EnvSource {
    fn first_non_empty<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> Option<OsString> {
        match self {
            Self::Process => keys.into_iter().find_map(env::process_non_empty_os),
            Self::Snapshot(env) => env.first_non_empty_os(keys).map(OsStr::to_os_string),
        }
    }
}

/// Provider of host information.
///
/// Generic over where warnings go (`S`) and how the OS is queried (`H`). [`SystemInfo::new`]
/// gives the live process environment, [`TracingSink`] and the [`Native`] host.
#[derive(Debug, Clone, Default)]
pub struct SystemInfo<S = TracingSink, H = Native> {
    env: EnvSource,
    sink: S,
    host: H,
}

impl SystemInfo {
    /// Create provider with default configuration.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S, H> SystemInfo<S, H> {
    /// Read environmental variables from `env` instead of the process environment.
    pub fn with_env(self, env: Env) -> Self {
        Self {
            env: EnvSource::Snapshot(env),
            ..self
        }
    }

    /// Read environmental variables from the process environment again.
    pub fn with_process_env(self) -> Self {
        Self {
            env: EnvSource::Process,
            ..self
        }
    }

    /// Report warnings to `sink`.
    pub fn with_sink<T: DiagnosticSink>(self, sink: T) -> SystemInfo<T, H> {
        SystemInfo {
            env: self.env,
            sink,
            host: self.host,
        }
    }

    /// Query the OS through `host`.
    pub fn with_host<T: Host>(self, host: T) -> SystemInfo<S, T> {
        SystemInfo {
            env: self.env,
            sink: self.sink,
            host,
        }
    }

    /// Where environmental variables are read from.
    pub fn env(&self) -> &EnvSource {
        &self.env
    }

    /// Sink receiving warnings.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Host the OS is queried through.
    pub fn host(&self) -> &H {
        &self.host
    }
}

impl<S: DiagnosticSink, H: Host> SystemInfo<S, H> {
    /// Absolute path of the current working directory.
    ///
    /// A [`CWD_BUFFER_LEN`](crate::platform::CWD_BUFFER_LEN)-byte buffer is tried first, then a
    /// buffer allocated by libc, so long paths still resolve.
    ///
    /// # Returns
    /// The working directory, or [`FALLBACK_CWD`] after a warning if both attempts failed (for
    /// example when the directory was removed).
    pub fn current_dir(&self) -> PathBuf {
        let resolved = self.host.cwd_fixed().or_else(|err| {
            tracing::debug!(%err, "fixed-size getcwd failed, retrying with allocated buffer");
            self.host.cwd_dynamic()
        });
        match resolved {
            Ok(path) => path,
            Err(err) => {
                self.sink.warn(&HostError::WorkingDirectory(err).to_string());
                PathBuf::from(FALLBACK_CWD)
            }
        }
    }

    /// Home directory of `login`, or of the current user when `login` is empty.
    ///
    /// For the current user a non-empty `$HOME` wins. Otherwise the identity database is asked,
    /// by real uid for the current user and by name for anybody else.
    ///
    /// # Returns
    /// Empty path if nothing was found. No warning is reported.
    pub fn home_dir(&self, login: impl AsRef<OsStr>) -> PathBuf {
        let login = login.as_ref();
        if login.is_empty() {
            if let Some(home) = self.env.first_non_empty([HOME_VAR]) {
                return PathBuf::from(home);
            }
        }

        let record = if login.is_empty() {
            self.host.user_by_uid(self.host.real_uid())
        } else {
            self.host.user_by_name(login)
        };
        match record {
            Ok(Some(identity)) => identity.home,
            Ok(None) => PathBuf::new(),
            Err(err) => {
                tracing::debug!(%err, ?login, "home directory lookup failed");
                PathBuf::new()
            }
        }
    }

    /// Login name of the user running the process.
    ///
    /// [`USER_NAME_VARS`] are probed in order; if none is set the identity database is asked for
    /// the effective uid.
    ///
    /// # Returns
    /// Empty string if nothing was found. No warning is reported.
    pub fn user_name(&self) -> OsString {
        if let Some(name) = self.env.first_non_empty(USER_NAME_VARS) {
            return name;
        }

        match self.host.user_by_uid(self.host.effective_uid()) {
            Ok(Some(identity)) => identity.name,
            Ok(None) => OsString::new(),
            Err(err) => {
                tracing::debug!(%err, "user name lookup failed");
                OsString::new()
            }
        }
    }

    /// Absolute path of the running executable.
    ///
    /// # Returns
    /// Empty path on failure. On Linux the failure is also reported as a warning; on Darwin a
    /// path longer than the loader buffer silently comes back empty.
    pub fn executable_path(&self) -> PathBuf {
        self.host.executable_path().unwrap_or_else(|err| {
            self.sink.warn(&err.to_string());
            PathBuf::new()
        })
    }
}

//! Hostenv - best-effort information about the host a process runs on.
//!
//! Four queries are provided: the current working directory, the home directory of a user, the
//! login name of the current user and the path of the running executable. None of them fails:
//! each walks a fixed fallback chain and ends with a default (`"."` for the working directory,
//! an empty value for the rest). Degraded answers which deserve attention are reported through a
//! [`DiagnosticSink`](diagnostics::DiagnosticSink).
//!
//! The free functions below use the live process environment and report warnings through
//! [`tracing`]. Build a [`SystemInfo`] to change either.
//!
//! ```rust
//! let cwd = hostenv::current_dir();
//! let exe = hostenv::executable_path();
//! assert!(cwd.is_absolute());
//! assert!(exe.is_absolute());
//! println!("{} runs in {}", exe.display(), cwd.display());
//! ```
//!
//! Only Linux (and Android) and Darwin hosts are supported; other targets fail to compile.

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

pub mod diagnostics;
pub mod error;
pub mod os;
pub mod platform;
pub mod system_info;

pub use system_info::SystemInfo;

/// See [`SystemInfo::current_dir`].
pub fn current_dir() -> PathBuf {
    SystemInfo::new().current_dir()
}

/// See [`SystemInfo::home_dir`]. Pass an empty `login` for the current user.
pub fn home_dir(login: impl AsRef<OsStr>) -> PathBuf {
    SystemInfo::new().home_dir(login)
}

/// See [`SystemInfo::user_name`].
pub fn user_name() -> OsString {
    SystemInfo::new().user_name()
}

/// See [`SystemInfo::executable_path`].
pub fn executable_path() -> PathBuf {
    SystemInfo::new().executable_path()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::{Path, PathBuf};
    use std::sync::{Mutex, MutexGuard, PoisonError};

    static CWD_LOCK: Mutex<()> = Mutex::new(());

    /// Serializes tests which depend on the working directory and restores it on drop.
    pub(crate) struct CwdGuard {
        original: PathBuf,
        _lock: MutexGuard<'static, ()>,
    }

    impl CwdGuard {
        pub(crate) fn lock() -> Self {
            let lock = CWD_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
            let original = std::env::current_dir().expect("needed for tests");
            Self {
                original,
                _lock: lock,
            }
        }

        pub(crate) fn chdir(&self, path: &Path) {
            std::env::set_current_dir(path).expect("needed for tests");
        }
    }

    impl Drop for CwdGuard {
        fn drop(&mut self) {
            drop(std::env::set_current_dir(&self.original))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CwdGuard;

    #[test]
    fn free_functions_match_default_provider() {
        let _guard = CwdGuard::lock();
        let info = SystemInfo::new();
        assert_eq!(current_dir(), info.current_dir());
        assert_eq!(home_dir(""), info.home_dir(""));
        assert_eq!(user_name(), info.user_name());
        assert_eq!(executable_path(), info.executable_path());
    }

    #[test]
    fn home_env_is_honoured_by_free_function() {
        match std::env::var_os("HOME").filter(|home| !home.is_empty()) {
            Some(home) => assert_eq!(home_dir(""), PathBuf::from(home)),
            None => {
                let expected = os::identity::by_uid(os::identity::real_uid())
                    .ok()
                    .flatten()
                    .map(|identity| identity.home)
                    .unwrap_or_default();
                assert_eq!(home_dir(""), expected);
            }
        }
    }
}

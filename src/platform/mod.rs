//! Host capabilities behind the queries, with one strategy per supported platform family.
//!
//! [`Native`] is picked at build time: [`linux::Linux`] on Linux and Android,
//! [`darwin::Darwin`] on Apple targets. Any other target fails to compile.

use std::ffi::{CStr, OsStr, c_char};
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;
use std::ptr;

use crate::error::HostError;
use crate::os::identity::{self, Identity};

#[cfg(any(target_os = "linux", target_os = "android"))]
pub mod linux;

#[cfg(target_vendor = "apple")]
pub mod darwin;

/// Strategy for the current platform.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub type Native = linux::Linux;

/// Strategy for the current platform.
#[cfg(target_vendor = "apple")]
pub type Native = darwin::Darwin;

#[cfg(not(any(target_os = "linux", target_os = "android", target_vendor = "apple")))]
compile_error!("hostenv supports only Linux and Darwin hosts");

/// Size of the fixed buffer tried first by [`Host::cwd_fixed`].
pub const CWD_BUFFER_LEN: usize = 4096;

/// Every OS call [`SystemInfo`](crate::system_info::SystemInfo) makes.
///
/// The provided methods are the POSIX calls shared by all supported platforms; implementors only
/// have to say how to find the running executable.
pub trait Host {
    /// Working directory via `getcwd` into a [`CWD_BUFFER_LEN`]-byte stack buffer.
    fn cwd_fixed(&self) -> io::Result<PathBuf> {
        let mut buf = [0 as c_char; CWD_BUFFER_LEN];
        // SAFETY: `buf` is writable for `buf.len()` bytes.
        let ret = unsafe { libc::getcwd(buf.as_mut_ptr(), buf.len()) };
        if ret.is_null() {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: on success `getcwd` stored a NUL-terminated string in `buf`.
        Ok(path_from(unsafe { CStr::from_ptr(buf.as_ptr()) }))
    }

    /// Working directory via `getcwd(NULL, 0)`, which allocates exactly as much as it needs.
    fn cwd_dynamic(&self) -> io::Result<PathBuf> {
        // SAFETY: a null buffer with size 0 asks libc to allocate the result itself.
        let ret = unsafe { libc::getcwd(ptr::null_mut(), 0) };
        if ret.is_null() {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: `ret` is a NUL-terminated string allocated by libc.
        let path = path_from(unsafe { CStr::from_ptr(ret) });
        // SAFETY: `ret` came from libc's allocator and is not used afterwards.
        unsafe { libc::free(ret.cast()) };
        Ok(path)
    }

    /// Uid which launched the process.
    fn real_uid(&self) -> libc::uid_t {
        identity::real_uid()
    }

    /// Uid permission checks are made against.
    fn effective_uid(&self) -> libc::uid_t {
        identity::effective_uid()
    }

    /// Identity record of `uid`, `Ok(None)` when there is none.
    fn user_by_uid(&self, uid: libc::uid_t) -> Result<Option<Identity>, HostError> {
        identity::by_uid(uid)
    }

    /// Identity record of `login`, `Ok(None)` when there is none.
    fn user_by_name(&self, login: &OsStr) -> Result<Option<Identity>, HostError> {
        identity::by_name(login)
    }

    /// Absolute path of the running executable.
    ///
    /// An `Err` is reported as a warning, while `Ok` with an empty path is returned silently.
    fn executable_path(&self) -> Result<PathBuf, HostError>;
}

impl<H: Host + ?Sized> Host for &H {
    fn cwd_fixed(&self) -> io::Result<PathBuf> {
        (**self).cwd_fixed()
    }

    fn cwd_dynamic(&self) -> io::Result<PathBuf> {
        (**self).cwd_dynamic()
    }

    fn real_uid(&self) -> libc::uid_t {
        (**self).real_uid()
    }

    fn effective_uid(&self) -> libc::uid_t {
        (**self).effective_uid()
    }

    fn user_by_uid(&self, uid: libc::uid_t) -> Result<Option<Identity>, HostError> {
        (**self).user_by_uid(uid)
    }

    fn user_by_name(&self, login: &OsStr) -> Result<Option<Identity>, HostError> {
        (**self).user_by_name(login)
    }

    fn executable_path(&self) -> Result<PathBuf, HostError> {
        (**self).executable_path()
    }
}

fn path_from(raw: &CStr) -> PathBuf {
    PathBuf::from(OsStr::from_bytes(raw.to_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CwdGuard;
    use claim::assert_ok;

    #[test]
    fn fixed_and_dynamic_agree_with_std() {
        let _guard = CwdGuard::lock();
        let expected = assert_ok!(std::env::current_dir());
        assert_eq!(assert_ok!(Native::default().cwd_fixed()), expected);
        assert_eq!(assert_ok!(Native::default().cwd_dynamic()), expected);
    }

    #[test]
    fn fixed_buffer_fits_a_full_path_max() {
        assert!(CWD_BUFFER_LEN >= libc::PATH_MAX as usize);
    }

    #[test]
    fn native_uids_match_libc() {
        // SAFETY: plain syscalls without arguments.
        let (uid, euid) = unsafe { (libc::getuid(), libc::geteuid()) };
        assert_eq!(Native::default().real_uid(), uid);
        assert_eq!(Native::default().effective_uid(), euid);
    }

    #[test]
    fn executable_path_is_absolute() {
        let path = assert_ok!(Native::default().executable_path());
        assert!(path.is_absolute(), "{path:?} is not absolute");
    }
}

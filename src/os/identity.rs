//! Reentrant lookups in the user identity database (`/etc/passwd`, directory services, ...).
//!
//! Every lookup writes into a stack-local scratch buffer of [`LOOKUP_BUFFER_LEN`] bytes handed to
//! `getpwuid_r`/`getpwnam_r`, so lookups are safe to run from many threads at once.

use std::ffi::{CStr, CString, OsStr, OsString, c_char, c_int};
use std::io;
use std::mem::MaybeUninit;
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::PathBuf;
use std::ptr;

use crate::error::HostError;

/// Size of the scratch buffer for a single identity record.
///
/// Records which don't fit make the lookup fail with `ERANGE`, which callers treat as "not found".
pub const LOOKUP_BUFFER_LEN: usize = 2048;

/// Owned copy of the interesting fields of a `struct passwd`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    /// Numeric user id.
    pub uid: libc::uid_t,
    /// Login name (`pw_name`).
    pub name: OsString,
    /// Home directory (`pw_dir`).
    pub home: PathBuf,
}

/// Real user id of the process (who launched it).
pub fn real_uid() -> libc::uid_t {
    // SAFETY: `getuid` always succeeds and touches no memory of ours.
    unsafe { libc::getuid() }
}

/// Effective user id of the process (who permission checks are made against).
pub fn effective_uid() -> libc::uid_t {
    // SAFETY: `geteuid` always succeeds and touches no memory of ours.
    unsafe { libc::geteuid() }
}

/// Look up the record for `uid`.
///
/// # Returns
/// `Ok(None)` if there is no such user, `Err` if the lookup itself failed.
pub fn by_uid(uid: libc::uid_t) -> Result<Option<Identity>, HostError> {
    lookup(|record, buf, len, found| {
        // SAFETY: all pointers come from `lookup` and are valid for the duration of the call.
        unsafe { libc::getpwuid_r(uid, record, buf, len, found) }
    })
}

/// Look up the record for login name `login`.
///
/// # Returns
/// `Ok(None)` if there is no such user, `Err` if the lookup itself failed or `login` contains
/// a NUL byte.
///
/// # Examples
/// ```rust
/// use hostenv::os::identity;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// assert!(identity::by_name("no-such-user-for-doctest")?.is_none());
/// # Ok(())
/// # }
/// ```
pub fn by_name(login: impl AsRef<OsStr>) -> Result<Option<Identity>, HostError> {
    let login = login.as_ref();
    let c_login = CString::new(login.as_bytes())
        .map_err(|_| HostError::InvalidLogin(login.to_os_string()))?;
    lookup(|record, buf, len, found| {
        // SAFETY: `c_login` is NUL-terminated and outlives the call; the rest comes from `lookup`.
        unsafe { libc::getpwnam_r(c_login.as_ptr(), record, buf, len, found) }
    })
}

fn lookup(
    call: impl FnOnce(*mut libc::passwd, *mut c_char, usize, *mut *mut libc::passwd) -> c_int,
) -> Result<Option<Identity>, HostError> {
    let mut record = MaybeUninit::<libc::passwd>::uninit();
    let mut buf = [0 as c_char; LOOKUP_BUFFER_LEN];
    let mut found: *mut libc::passwd = ptr::null_mut();

    match call(record.as_mut_ptr(), buf.as_mut_ptr(), buf.len(), &raw mut found) {
        0 => {}
        // Some libcs report a missing entry as an error instead of a null result.
        libc::ENOENT | libc::ESRCH => return Ok(None),
        errno => return Err(HostError::IdentityLookup(io::Error::from_raw_os_error(errno))),
    }
    if found.is_null() {
        return Ok(None);
    }

    // SAFETY: on success `found` points to `record`, which is now initialised, and its string
    // fields point into `buf`. Both live until the end of this function.
    let record = unsafe { &*found };
    // SAFETY: see above.
    let (name, home) = unsafe { (owned(record.pw_name), owned(record.pw_dir)) };
    Ok(Some(Identity {
        uid: record.pw_uid,
        name,
        home: PathBuf::from(home),
    }))
}

/// Copy a possibly-null C string out of the scratch buffer.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string.
unsafe fn owned(ptr: *const c_char) -> OsString {
    if ptr.is_null() {
        return OsString::new();
    }
    // SAFETY: guaranteed by the caller.
    let bytes = unsafe { CStr::from_ptr(ptr) }.to_bytes();
    OsString::from_vec(bytes.to_vec())
}

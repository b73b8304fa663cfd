use std::ffi::OsStr;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

use crate::error::HostError;
use crate::platform::Host;

/// Size of the buffer `/proc/self/exe` is read into. One byte is kept for the terminator.
pub const EXECUTABLE_BUFFER_LEN: usize = 2048;

/// Linux (and Android) host: the executable is found through procfs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Linux;

impl Host for Linux {
    fn executable_path(&self) -> Result<PathBuf, HostError> {
        let mut buf = [0u8; EXECUTABLE_BUFFER_LEN];
        // SAFETY: the link name is NUL-terminated and `buf` is writable for `buf.len() - 1` bytes.
        let len = unsafe {
            libc::readlink(
                c"/proc/self/exe".as_ptr(),
                buf.as_mut_ptr().cast(),
                buf.len() - 1,
            )
        };
        // Negative means failure, with `errno` set.
        let Ok(len) = usize::try_from(len) else {
            return Err(HostError::ExecutablePath(io::Error::last_os_error()));
        };
        Ok(PathBuf::from(OsStr::from_bytes(&buf[..len])))
    }
}

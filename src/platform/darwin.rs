use std::ffi::{CStr, OsStr};
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

use crate::error::HostError;
use crate::platform::Host;

/// Size of the buffer handed to `_NSGetExecutablePath`.
pub const EXECUTABLE_BUFFER_LEN: u32 = 1024;

/// Darwin host: the executable is found through the dynamic loader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Darwin;

impl Host for Darwin {
    /// Never fails. If the path doesn't fit into [`EXECUTABLE_BUFFER_LEN`] bytes the loader
    /// leaves the buffer untouched and the result is an empty path, without any warning.
    fn executable_path(&self) -> Result<PathBuf, HostError> {
        let mut buf = [0u8; EXECUTABLE_BUFFER_LEN as usize];
        let mut size = EXECUTABLE_BUFFER_LEN;
        // SAFETY: `buf` is writable for `size` bytes and `size` is a valid `u32` location.
        let _ = unsafe { libc::_NSGetExecutablePath(buf.as_mut_ptr().cast(), &mut size) };
        let path = CStr::from_bytes_until_nul(&buf)
            .map(|raw| PathBuf::from(OsStr::from_bytes(raw.to_bytes())))
            .unwrap_or_default();
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::assert_ok;

    #[test]
    fn points_at_an_existing_file() {
        let ours = assert_ok!(Darwin.executable_path());
        assert!(ours.is_absolute());
        assert!(ours.is_file(), "{ours:?} is not a file");
    }
}

use std::{borrow::Cow, io, os::unix::ffi::OsStrExt, path::Path};

use libc::PATH_MAX;

/// A custom implementation to read a symlink while allowing for buffer reuse.
///
/// If successful, then a [`Cow`] will be returned referencing the contents of `buffer`.
pub(crate) fn read_link<'a>(path: &Path, buffer: &'a mut Vec<u8>) -> io::Result<Cow<'a, str>> {
    if buffer.len() < PATH_MAX as usize {
        buffer.resize(PATH_MAX as usize, 0);
    }

    read_link_into(path, buffer)
}

/// Reads the link target into `buffer` as is. A target that fills the whole
/// buffer may have been cut short, so that's an error.
fn read_link_into<'a>(path: &Path, buffer: &'a mut [u8]) -> io::Result<Cow<'a, str>> {
    let c_path = std::ffi::CString::new(path.as_os_str().as_bytes())?;

    // SAFETY: `readlink` writes at most `buffer.len()` bytes into `buffer`, and
    // the returned length is checked below before slicing.
    let len = unsafe {
        libc::readlink(
            c_path.as_ptr(),
            buffer.as_mut_ptr() as *mut libc::c_char,
            buffer.len(),
        )
    };

    if len < 0 {
        return Err(io::Error::last_os_error());
    }

    let len = len as usize;
    if len >= buffer.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("link target of {} is longer than {} bytes", path.display(), buffer.len()),
        ));
    }

    Ok(String::from_utf8_lossy(&buffer[..len]))
}

//! Host console and file I/O.

use core::{ffi::CStr, fmt, mem};

use aal::Register;
use lazy_static::lazy_static;
use spin::Mutex;

use crate::{call_direct, check, Error, Operation, Result};

/// Special path naming the host console in [`HostFile::open`].
pub const CONSOLE_PATH: &CStr = c":tt";

/// File access modes understood by `SYS_OPEN`, in protocol order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum OpenMode {
    /// `r`
    Read = 0,
    /// `rb`
    ReadBinary = 1,
    /// `r+`
    ReadUpdate = 2,
    /// `r+b`
    ReadUpdateBinary = 3,
    /// `w`
    Write = 4,
    /// `wb`
    WriteBinary = 5,
    /// `w+`
    WriteUpdate = 6,
    /// `w+b`
    WriteUpdateBinary = 7,
    /// `a`
    Append = 8,
    /// `ab`
    AppendBinary = 9,
    /// `a+`
    AppendUpdate = 10,
    /// `a+b`
    AppendUpdateBinary = 11,
}

impl OpenMode {
    const ALL: [OpenMode; 12] = [
        OpenMode::Read,
        OpenMode::ReadBinary,
        OpenMode::ReadUpdate,
        OpenMode::ReadUpdateBinary,
        OpenMode::Write,
        OpenMode::WriteBinary,
        OpenMode::WriteUpdate,
        OpenMode::WriteUpdateBinary,
        OpenMode::Append,
        OpenMode::AppendBinary,
        OpenMode::AppendUpdate,
        OpenMode::AppendUpdateBinary,
    ];

    /// Parses a C `fopen` mode string. Both `r+b` and `rb+` spellings are accepted.
    pub fn from_fopen(mode: &str) -> Option<Self> {
        let canonical = match mode {
            "rb+" => "r+b",
            "wb+" => "w+b",
            "ab+" => "a+b",
            m => m,
        };

        Self::ALL.iter().copied().find(|m| m.as_str() == canonical)
    }

    /// Returns the C `fopen` spelling of this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            OpenMode::Read => "r",
            OpenMode::ReadBinary => "rb",
            OpenMode::ReadUpdate => "r+",
            OpenMode::ReadUpdateBinary => "r+b",
            OpenMode::Write => "w",
            OpenMode::WriteBinary => "wb",
            OpenMode::WriteUpdate => "w+",
            OpenMode::WriteUpdateBinary => "w+b",
            OpenMode::Append => "a",
            OpenMode::AppendBinary => "ab",
            OpenMode::AppendUpdate => "a+",
            OpenMode::AppendUpdateBinary => "a+b",
        }
    }
}

/// A file (or console stream) opened on the host. Closed when dropped.
#[derive(Debug)]
pub struct HostFile {
    handle: Register,
}

impl HostFile {
    /// Opens `path` on the host.
    pub fn open(path: &CStr, mode: OpenMode) -> Result<Self> {
        let len = path.to_bytes().len();
        // SAFETY: `path` is NUL-terminated and outlives the call
        let r = unsafe { host_call!(Operation::Open, path.as_ptr(), mode, len) };

        check(r).map(|handle| Self { handle })
    }

    /// Opens the host console for reading.
    pub fn stdin() -> Result<Self> {
        Self::open(CONSOLE_PATH, OpenMode::Read)
    }

    /// Opens the host console for writing.
    pub fn stdout() -> Result<Self> {
        Self::open(CONSOLE_PATH, OpenMode::Write)
    }

    /// Opens the host console for appending, which hosts map to their standard error.
    pub fn stderr() -> Result<Self> {
        Self::open(CONSOLE_PATH, OpenMode::Append)
    }

    /// Wraps a handle obtained from the host by other means.
    pub fn from_raw_handle(handle: Register) -> Self {
        Self { handle }
    }

    /// Returns the host handle without closing it.
    pub fn into_raw_handle(self) -> Register {
        let handle = self.handle;
        mem::forget(self);
        handle
    }

    /// Returns the host handle.
    pub fn handle(&self) -> Register {
        self.handle
    }

    /// Writes part of `buf`, returning how many bytes the host accepted.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        // SAFETY: `buf` is valid for `buf.len()` bytes of reads
        let r = unsafe { host_call!(Operation::Write, self.handle, buf.as_ptr(), buf.len()) };

        // The host answers with the number of bytes it did *not* write
        let remaining = check(r)? as usize;
        buf.len().checked_sub(remaining).ok_or(Error::InvalidData)
    }

    /// Writes all of `buf`.
    pub fn write_all(&mut self, mut buf: &[u8]) -> Result<()> {
        while !buf.is_empty() {
            match self.write(buf)? {
                0 => return Err(Error::WriteZero),
                n => buf = &buf[n..],
            }
        }
        Ok(())
    }

    /// Reads into `buf`, returning how many bytes were read. `0` means end of file.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        // SAFETY: `buf` is valid for `buf.len()` bytes of writes
        let r = unsafe { host_call!(Operation::Read, self.handle, buf.as_mut_ptr(), buf.len()) };

        // The host answers with the number of bytes it did *not* read
        let remaining = check(r)? as usize;
        buf.len().checked_sub(remaining).ok_or(Error::InvalidData)
    }

    /// Fills `buf` completely.
    pub fn read_exact(&mut self, mut buf: &mut [u8]) -> Result<()> {
        while !buf.is_empty() {
            match self.read(buf)? {
                0 => return Err(Error::UnexpectedEof),
                n => buf = &mut buf[n..],
            }
        }
        Ok(())
    }

    /// Moves to the absolute byte offset `pos`.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        // SAFETY: no pointers are involved
        let r = unsafe { host_call!(Operation::Seek, self.handle, pos) };
        match r {
            0 => Ok(()),
            _ => Err(Error::last()),
        }
    }

    /// Returns the length of the file in bytes.
    pub fn len(&self) -> Result<usize> {
        // SAFETY: no pointers are involved
        let r = unsafe { host_call!(Operation::Flen, self.handle) };
        check(r).map(|n| n as usize)
    }

    /// Returns true if the file is empty.
    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|n| n == 0)
    }

    /// Returns true if the handle refers to an interactive device.
    pub fn is_tty(&self) -> Result<bool> {
        // SAFETY: no pointers are involved
        let r = unsafe { host_call!(Operation::IsTty, self.handle) };
        match r {
            1 => Ok(true),
            0 => Ok(false),
            _ => Err(Error::last()),
        }
    }

    /// Closes the file, reporting failures that dropping it would ignore.
    pub fn close(self) -> Result<()> {
        close_handle(self.into_raw_handle())
    }
}

impl Drop for HostFile {
    fn drop(&mut self) {
        close_handle(self.handle).ok();
    }
}

impl fmt::Write for HostFile {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_all(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

fn close_handle(handle: Register) -> Result<()> {
    // SAFETY: no pointers are involved
    let r = unsafe { host_call!(Operation::Close, handle) };
    match r {
        0 => Ok(()),
        _ => Err(Error::last()),
    }
}

/// Writes a NUL-terminated string to the debug console.
pub fn write0(s: &CStr) {
    // SAFETY: `s` is NUL-terminated and outlives the call
    unsafe { call_direct(Operation::Write0, s.as_ptr() as Register) };
}

/// Writes a single character to the debug console.
pub fn writec(c: u8) {
    // SAFETY: the host reads exactly one byte through the pointer
    unsafe { call_direct(Operation::WriteC, &c as *const u8 as Register) };
}

/// Reads a single character from the debug console, blocking until one is available.
pub fn readc() -> u8 {
    // SAFETY: no pointers are involved
    let r = unsafe { host_call!(Operation::ReadC) };
    r as u8
}

/// Deletes the file at `path` on the host.
pub fn remove(path: &CStr) -> Result<()> {
    let len = path.to_bytes().len();
    // SAFETY: `path` is NUL-terminated and outlives the call
    let r = unsafe { host_call!(Operation::Remove, path.as_ptr(), len) };
    match r {
        0 => Ok(()),
        _ => Err(Error::last()),
    }
}

/// Renames the file at `from` to `to` on the host.
pub fn rename(from: &CStr, to: &CStr) -> Result<()> {
    let (from_len, to_len) = (from.to_bytes().len(), to.to_bytes().len());
    // SAFETY: both paths are NUL-terminated and outlive the call
    let r = unsafe {
        host_call!(
            Operation::Rename,
            from.as_ptr(),
            from_len,
            to.as_ptr(),
            to_len
        )
    };
    match r {
        0 => Ok(()),
        _ => Err(Error::last()),
    }
}

/// Size of the stack buffer used to NUL-terminate console output.
const WRITE0_CHUNK: usize = 63;

/// Writes raw bytes with `SYS_WRITE0`, which needs no open handle.
///
/// Interior NUL bytes cannot be represented and are dropped.
fn write0_bytes(bytes: &[u8]) {
    let mut buf = [0u8; WRITE0_CHUNK + 1];

    for chunk in bytes
        .split(|&b| b == 0)
        .flat_map(|s| s.chunks(WRITE0_CHUNK))
    {
        buf[..chunk.len()].copy_from_slice(chunk);
        buf[chunk.len()] = 0;

        // SAFETY: `buf` is NUL-terminated and outlives the call
        unsafe { call_direct(Operation::Write0, buf.as_ptr() as Register) };
    }
}

/// A console on the debug host implementing [`fmt::Write`].
///
/// Output goes to the host stream the console was opened on. If the host refused to open it,
/// output falls back to `SYS_WRITE0` on the debug channel.
#[derive(Debug)]
pub struct HostConsole {
    file: Option<HostFile>,
}

impl HostConsole {
    /// Console writing to the host's standard output.
    pub fn stdout() -> Self {
        Self {
            file: HostFile::stdout().ok(),
        }
    }

    /// Console writing to the host's standard error.
    pub fn stderr() -> Self {
        Self {
            file: HostFile::stderr().ok(),
        }
    }

    /// Console writing to the debug channel only.
    pub fn debug() -> Self {
        Self { file: None }
    }

    /// Returns true if output goes through an open host stream.
    pub fn is_stream(&self) -> bool {
        self.file.is_some()
    }
}

impl fmt::Write for HostConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        match self.file.as_mut() {
            Some(file) => file.write_all(s.as_bytes()).map_err(|_| fmt::Error),
            None => {
                write0_bytes(s.as_bytes());
                Ok(())
            }
        }
    }
}

lazy_static! {
    static ref STDOUT: Mutex<HostConsole> = Mutex::new(HostConsole::stdout());
    static ref STDERR: Mutex<HostConsole> = Mutex::new(HostConsole::stderr());
}

/// Locks the standard output console.
#[cfg(test)]
pub(crate) fn lock_stdout() -> spin::MutexGuard<'static, HostConsole> {
    STDOUT.lock()
}

#[doc(hidden)]
pub fn _print(args: fmt::Arguments<'_>) {
    use fmt::Write;
    STDOUT.lock().write_fmt(args).ok();
}

#[doc(hidden)]
pub fn _eprint(args: fmt::Arguments<'_>) {
    use fmt::Write;
    STDERR.lock().write_fmt(args).ok();
}

#![allow(dead_code)]

use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
    ffi::CStr,
    os::raw::c_char,
    panic::{self, AssertUnwindSafe},
    rc::Rc,
    slice,
};

use aal::{
    host::{self, Monitor},
    Register, SemihostingParamBlock, SemihostingResponse,
};
use semihosting::Operation;

pub const STDIN: Register = 1;
pub const STDOUT: Register = 2;
pub const STDERR: Register = 3;
const FIRST_FILE: Register = 10;

pub const ENOENT: i32 = 2;
pub const EBADF: i32 = 9;
pub const EINVAL: i32 = 22;
pub const ENOSYS: i32 = 38;

pub const CLOCK_CENTISECONDS: Register = 250;
pub const TIME: Register = 1_700_000_000;
pub const ELAPSED: u64 = 0x1_0000_0042;
pub const TICKFREQ: Register = 1_000_000;
pub const HEAP: [Register; 4] = [0x4000_0000, 0x4800_0000, 0x5000_0000, 0x4f00_0000];

const OPERATIONS: [Operation; 24] = [
    Operation::Open,
    Operation::Close,
    Operation::WriteC,
    Operation::Write0,
    Operation::Write,
    Operation::Read,
    Operation::ReadC,
    Operation::IsError,
    Operation::IsTty,
    Operation::Seek,
    Operation::Flen,
    Operation::TmpNam,
    Operation::Remove,
    Operation::Rename,
    Operation::Clock,
    Operation::Time,
    Operation::System,
    Operation::Errno,
    Operation::GetCmdline,
    Operation::HeapInfo,
    Operation::Exit,
    Operation::ExitExtended,
    Operation::Elapsed,
    Operation::TickFreq,
];

#[derive(Debug)]
pub struct OpenFile {
    pub path: String,
    pub pos: usize,
    pub readable: bool,
    pub writable: bool,
    pub append: bool,
}

/// Everything the fake debug host has seen, shared with the test that attached it.
#[derive(Debug, Default)]
pub struct HostState {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Output of `SYS_WRITEC` and `SYS_WRITE0`.
    pub debug: Vec<u8>,
    pub stdin: VecDeque<u8>,
    pub files: HashMap<String, Vec<u8>>,
    pub open: HashMap<Register, OpenFile>,
    pub errno: i32,
    pub exit: Option<(Register, Register)>,
    pub calls: Vec<Operation>,
    pub commands: Vec<String>,
    pub cmdline: Vec<u8>,
    /// Refuse to open `:tt`.
    pub refuse_console: bool,
    /// Move at most this many bytes per read or write.
    pub max_transfer: Option<usize>,
    pub next_handle: Register,
}

impl HostState {
    /// Text printed on the standard output stream or the debug channel.
    pub fn console(&self) -> String {
        let mut text = String::from_utf8_lossy(&self.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&self.debug));
        text
    }

    pub fn file(&self, path: &str) -> Option<String> {
        self.files
            .get(path)
            .map(|data| String::from_utf8_lossy(data).into_owned())
    }

    fn fail(&mut self, errno: i32) -> SemihostingResponse {
        self.errno = errno;
        -1
    }

    fn transfer_limit(&self, len: usize) -> usize {
        self.max_transfer.map_or(len, |max| len.min(max))
    }
}

pub struct FakeHost(Rc<RefCell<HostState>>);

/// Attaches a fresh fake host to the current thread.
pub fn attach() -> Rc<RefCell<HostState>> {
    attach_with(HostState::default())
}

pub fn attach_with(state: HostState) -> Rc<RefCell<HostState>> {
    let state = Rc::new(RefCell::new(state));
    host::attach(Box::new(FakeHost(state.clone())));
    state
}

/// Runs `f`, which is expected to end the program through `SYS_EXIT`, and returns the
/// reported `(reason, status)`.
pub fn run_to_exit<F: FnOnce()>(state: &Rc<RefCell<HostState>>, f: F) -> (Register, Register) {
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    assert!(result.is_err(), "program did not exit");

    state.borrow().exit.expect("no exit reported")
}

unsafe fn words<const N: usize>(block: *mut SemihostingParamBlock) -> [Register; N] {
    unsafe { *(block as *const [Register; N]) }
}

unsafe fn bytes<'a>(ptr: Register, len: Register) -> &'a [u8] {
    unsafe { slice::from_raw_parts(ptr as *const u8, len) }
}

unsafe fn bytes_mut<'a>(ptr: Register, len: Register) -> &'a mut [u8] {
    unsafe { slice::from_raw_parts_mut(ptr as *mut u8, len) }
}

unsafe fn path(ptr: Register, len: Register) -> String {
    String::from_utf8_lossy(unsafe { bytes(ptr, len) }).into_owned()
}

/// Returns true for the `ADP_Stopped_*` reason codes, which never are valid block addresses.
fn is_stop_reason(value: Register) -> bool {
    (0x20000..=0x20031).contains(&value)
}

impl FakeHost {
    unsafe fn serve(&self, op: Operation, block: *mut SemihostingParamBlock) -> SemihostingResponse {
        let mut s = self.0.borrow_mut();

        match op {
            Operation::Open => {
                let [ptr, mode, len] = unsafe { words(block) };
                let name = unsafe { path(ptr, len) };

                if name == ":tt" {
                    if s.refuse_console {
                        return s.fail(ENOENT);
                    }
                    let handle = match mode / 4 {
                        0 => STDIN,
                        1 => STDOUT,
                        _ => STDERR,
                    };
                    return handle as SemihostingResponse;
                }

                let (kind, update) = (mode / 4, mode % 4 >= 2);
                match kind {
                    0 if !s.files.contains_key(&name) => return s.fail(ENOENT),
                    1 => {
                        s.files.insert(name.clone(), Vec::new());
                    }
                    2 => {
                        s.files.entry(name.clone()).or_default();
                    }
                    _ => {}
                }

                if s.next_handle < FIRST_FILE {
                    s.next_handle = FIRST_FILE;
                }
                let handle = s.next_handle;
                s.next_handle += 1;
                s.open.insert(
                    handle,
                    OpenFile {
                        path: name,
                        pos: 0,
                        readable: kind == 0 || update,
                        writable: kind != 0 || update,
                        append: kind == 2,
                    },
                );
                handle as SemihostingResponse
            }
            Operation::Close => {
                let [handle] = unsafe { words(block) };
                if handle == STDIN || handle == STDOUT || handle == STDERR {
                    return 0;
                }
                match s.open.remove(&handle) {
                    Some(_) => 0,
                    None => s.fail(EBADF),
                }
            }
            Operation::WriteC => {
                let c = unsafe { *(block as *const u8) };
                s.debug.push(c);
                0
            }
            Operation::Write0 => {
                let text = unsafe { CStr::from_ptr(block as *const c_char) };
                s.debug.extend_from_slice(text.to_bytes());
                0
            }
            Operation::Write => {
                let [handle, ptr, len] = unsafe { words(block) };
                let n = s.transfer_limit(len);
                let data = unsafe { bytes(ptr, n) };

                match handle {
                    STDOUT => s.stdout.extend_from_slice(data),
                    STDERR => s.stderr.extend_from_slice(data),
                    _ => {
                        if !s.open.get(&handle).map_or(false, |f| f.writable) {
                            return s.fail(EBADF);
                        }
                        let s = &mut *s;
                        let file = s.open.get_mut(&handle).unwrap();
                        let content = s.files.entry(file.path.clone()).or_default();
                        if file.append {
                            file.pos = content.len();
                        }
                        let end = file.pos + data.len();
                        if content.len() < end {
                            content.resize(end, 0);
                        }
                        content[file.pos..end].copy_from_slice(data);
                        file.pos = end;
                    }
                }
                (len - n) as SemihostingResponse
            }
            Operation::Read => {
                let [handle, ptr, len] = unsafe { words(block) };
                let buf = unsafe { bytes_mut(ptr, len) };
                let limit = s.transfer_limit(len);

                let n = if handle == STDIN {
                    let n = limit.min(s.stdin.len());
                    for (dst, src) in buf.iter_mut().zip(s.stdin.drain(..n)) {
                        *dst = src;
                    }
                    n
                } else {
                    if !s.open.get(&handle).map_or(false, |f| f.readable) {
                        return s.fail(EBADF);
                    }
                    let s = &mut *s;
                    let file = s.open.get_mut(&handle).unwrap();
                    let content = s.files.get(&file.path).map_or(&[][..], Vec::as_slice);
                    let rest = content.get(file.pos..).unwrap_or(&[]);
                    let n = limit.min(rest.len());
                    buf[..n].copy_from_slice(&rest[..n]);
                    file.pos += n;
                    n
                };
                (len - n) as SemihostingResponse
            }
            Operation::ReadC => match s.stdin.pop_front() {
                Some(c) => c as SemihostingResponse,
                None => s.fail(EINVAL),
            },
            Operation::IsTty => {
                let [handle] = unsafe { words(block) };
                if handle == STDIN || handle == STDOUT || handle == STDERR {
                    1
                } else if s.open.contains_key(&handle) {
                    0
                } else {
                    s.fail(EBADF)
                }
            }
            Operation::Seek => {
                let [handle, pos] = unsafe { words(block) };
                match s.open.get_mut(&handle) {
                    Some(file) => {
                        file.pos = pos;
                        0
                    }
                    None => s.fail(EBADF),
                }
            }
            Operation::Flen => {
                let [handle] = unsafe { words(block) };
                let len = s
                    .open
                    .get(&handle)
                    .map(|f| s.files.get(&f.path).map_or(0, Vec::len));
                match len {
                    Some(len) => len as SemihostingResponse,
                    None => s.fail(EBADF),
                }
            }
            Operation::Remove => {
                let [ptr, len] = unsafe { words(block) };
                let name = unsafe { path(ptr, len) };
                match s.files.remove(&name) {
                    Some(_) => 0,
                    None => s.fail(ENOENT),
                }
            }
            Operation::Rename => {
                let [from, from_len, to, to_len] = unsafe { words(block) };
                let (from, to) = unsafe { (path(from, from_len), path(to, to_len)) };
                match s.files.remove(&from) {
                    Some(data) => {
                        s.files.insert(to, data);
                        0
                    }
                    None => s.fail(ENOENT),
                }
            }
            Operation::Clock => CLOCK_CENTISECONDS as SemihostingResponse,
            Operation::Time => TIME as SemihostingResponse,
            Operation::System => {
                let [ptr, len] = unsafe { words(block) };
                let cmd = unsafe { path(ptr, len) };
                let status = if cmd == "false" { 1 } else { 0 };
                s.commands.push(cmd);
                status
            }
            Operation::Errno => s.errno as SemihostingResponse,
            Operation::GetCmdline => {
                let [ptr, len] = unsafe { words(block) };
                if s.cmdline.len() + 1 > len {
                    return s.fail(EINVAL);
                }
                let buf = unsafe { bytes_mut(ptr, len) };
                buf[..s.cmdline.len()].copy_from_slice(&s.cmdline);
                buf[s.cmdline.len()] = 0;
                unsafe { *block.add(1) = s.cmdline.len() };
                0
            }
            Operation::HeapInfo => {
                let [ptr] = unsafe { words(block) };
                unsafe { *(ptr as *mut [Register; 4]) = HEAP };
                0
            }
            Operation::Exit | Operation::ExitExtended => {
                // 32-bit targets pass an exit reason in place of the block, with no status
                let immediate = block as Register;
                let (reason, status) = if op == Operation::Exit && is_stop_reason(immediate) {
                    (immediate, 0)
                } else {
                    let [reason, status] = unsafe { words(block) };
                    (reason, status)
                };
                s.exit = Some((reason, status));
                drop(s);
                panic!("host exit: reason {:#x}, status {}", reason, status);
            }
            Operation::Elapsed => {
                unsafe { *block = ELAPSED as Register };
                0
            }
            Operation::TickFreq => TICKFREQ as SemihostingResponse,
            Operation::IsError | Operation::TmpNam => s.fail(ENOSYS),
        }
    }
}

impl Monitor for FakeHost {
    fn call_host(&mut self, reason: u32, block: *mut SemihostingParamBlock) -> SemihostingResponse {
        let op = match OPERATIONS.iter().copied().find(|op| u32::from(*op) == reason) {
            Some(op) => op,
            None => return self.0.borrow_mut().fail(ENOSYS),
        };
        self.0.borrow_mut().calls.push(op);

        unsafe { self.serve(op, block) }
    }
}

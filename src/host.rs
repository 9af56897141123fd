//! Simulated debug monitor for the host backend.
//!
//! When no architecture family is selected and the standard library is available, the portable
//! operations run against a [`Monitor`] attached to the calling thread instead of real hardware.
//! This is what lets layers built on top of this crate (and this crate's own tests) run on a
//! development machine.
//!
//! Monitors and traces are per thread, so independent tests never observe each other.

use std::{boxed::Box, cell::Cell, cell::RefCell};

use crate::{SemihostingParamBlock, SemihostingResponse};

/// A simulated debug host.
pub trait Monitor {
    /// Serves a semihosting request.
    ///
    /// `block` is passed exactly as the caller of [`call_host`](crate::call_host) provided it:
    /// depending on `reason` it is a pointer to a parameter block or an immediate value.
    fn call_host(&mut self, reason: u32, block: *mut SemihostingParamBlock)
        -> SemihostingResponse;

    /// Handles a breakpoint trap. Returning resumes execution after the breakpoint.
    fn breakpoint(&mut self) {}

    /// Simulates waiting for an interrupt.
    fn wait_for_interrupt(&mut self) {
        std::thread::yield_now();
    }
}

/// Count of the special operations executed by the current thread.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Trace {
    /// Number of `nop` instructions.
    pub nops: u64,
    /// Number of breakpoint traps.
    pub breakpoints: u64,
    /// Number of wait-for-interrupt instructions.
    pub waits: u64,
    /// Number of semihosting traps.
    pub host_calls: u64,
}

thread_local! {
    static MONITOR: RefCell<Option<Box<dyn Monitor>>> = RefCell::new(None);
    static TRACE: Cell<Trace> = Cell::new(Trace::default());
}

/// Attaches `monitor` to the current thread, returning the one previously attached.
pub fn attach(monitor: Box<dyn Monitor>) -> Option<Box<dyn Monitor>> {
    MONITOR.with(|m| m.borrow_mut().replace(monitor))
}

/// Detaches the monitor of the current thread.
pub fn detach() -> Option<Box<dyn Monitor>> {
    MONITOR.with(|m| m.borrow_mut().take())
}

/// Returns true if a monitor is attached to the current thread.
pub fn is_attached() -> bool {
    MONITOR.with(|m| m.borrow().is_some())
}

/// Returns the operations executed by the current thread so far.
pub fn trace() -> Trace {
    TRACE.with(Cell::get)
}

/// Clears the trace of the current thread.
pub fn reset_trace() {
    TRACE.with(|t| t.set(Trace::default()));
}

pub(crate) fn record<F>(f: F)
where
    F: FnOnce(&mut Trace),
{
    TRACE.with(|t| {
        let mut trace = t.get();
        f(&mut trace);
        t.set(trace);
    });
}

/// Runs `f` on the attached monitor, or returns `None` if there is none.
///
/// The monitor is detached for the duration of the call so it may itself issue host operations.
/// If it panics, it stays detached.
pub(crate) fn with_monitor<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut dyn Monitor) -> R,
{
    let mut monitor = MONITOR.with(|m| m.borrow_mut().take())?;
    let result = f(monitor.as_mut());

    MONITOR.with(|m| {
        let mut slot = m.borrow_mut();
        // Keep whatever the monitor may have attached in its place
        if slot.is_none() {
            *slot = Some(monitor);
        }
    });

    Some(result)
}

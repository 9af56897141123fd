//! Test harness for binaries running on a target under a semihosting debugger.
//!
//! Hook it up with `#![feature(custom_test_frameworks)]` and
//! `#![test_runner(semihosting::testing::test_runner)]`, and call [`report_failure`] from the
//! binary's panic handler.

use core::{
    fmt::{self, Write},
    panic::PanicInfo,
};

use crate::{io::HostConsole, process};

/// Utility trait for automagically printing a test function name before execution.
pub trait Testable {
    /// Runs the test function.
    fn run(&self);
}

impl<T> Testable for T
where
    T: Fn(),
{
    fn run(&self) {
        hprint!("test {} ... ", core::any::type_name::<T>());
        self();
        hprintln!("ok");
    }
}

/// Entry point for test harness.
pub fn test_runner(tests: &[&dyn Testable]) -> ! {
    hprintln!("Running {} tests", tests.len());

    for test in tests {
        test.run();
    }

    process::exit(0)
}

/// Reports a failed test and stops the target with a failure status.
///
/// The report goes through the debug channel: the panic may have struck while a console lock
/// was held.
pub fn report_failure(info: &PanicInfo<'_>) -> ! {
    fail(info)
}

fn fail(reason: &dyn fmt::Display) -> ! {
    let mut console = HostConsole::debug();
    writeln!(console, "FAILED\n{}", reason).ok();

    process::exit(1)
}

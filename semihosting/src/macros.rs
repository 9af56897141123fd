/// Prints to the host's standard output.
///
/// Equivalent to the [`hprintln!`] macro except that a newline is not printed
/// at the end of the message.
#[macro_export]
macro_rules! hprint {
    ($($arg:tt)*) => {
        $crate::io::_print(format_args!($($arg)*))
    };
}

/// Prints to the host's standard output, with a newline (`\n`).
#[macro_export]
macro_rules! hprintln {
    () => {
        $crate::hprint!("\n")
    };
    ($fmt:expr) => {
        $crate::hprint!(concat!($fmt, "\n"))
    };
    ($fmt:expr, $($arg:tt)+) => {
        $crate::hprint!(concat!($fmt, "\n"), $($arg)+)
    };
}

/// Prints to the host's standard error.
#[macro_export]
macro_rules! heprint {
    ($($arg:tt)*) => {
        $crate::io::_eprint(format_args!($($arg)*))
    };
}

/// Prints to the host's standard error, with a newline (`\n`).
#[macro_export]
macro_rules! heprintln {
    () => {
        $crate::heprint!("\n")
    };
    ($fmt:expr) => {
        $crate::heprint!(concat!($fmt, "\n"))
    };
    ($fmt:expr, $($arg:tt)+) => {
        $crate::heprint!(concat!($fmt, "\n"), $($arg)+)
    };
}

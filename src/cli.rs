//! Shared argument handling for the binaries.

use clap::Parser;

/// Parse the command line, exiting 1 on usage errors and 0 after
/// `--help` or `--version`.
pub fn parse_args<T: Parser>() -> T {
    T::try_parse().unwrap_or_else(|e| {
        let code = if e.use_stderr() { 1 } else { 0 };
        let _ = e.print();
        std::process::exit(code)
    })
}

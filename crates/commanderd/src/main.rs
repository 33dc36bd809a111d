//! Entrypoint for the command dispatch service.
//!
//! Delegates to [`commanderd::run_service`] and maps failures onto a non-zero
//! exit status after reporting them on stderr.

use std::error::Error;
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    match commanderd::run_service() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            // Nothing sensible remains to be done if stderr is gone.
            report(&mut io::stderr().lock(), &error).ok();
            ExitCode::FAILURE
        }
    }
}

fn report(out: &mut impl Write, error: &dyn Error) -> io::Result<()> {
    writeln!(out, "commanderd: {error}")?;
    let mut cause = error.source();
    while let Some(inner) = cause {
        writeln!(out, "  caused by: {inner}")?;
        cause = inner.source();
    }
    Ok(())
}

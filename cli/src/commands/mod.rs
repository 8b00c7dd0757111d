pub mod bugs;
pub mod catalog;
pub mod cli;
pub mod init;
pub mod tasks;

use serde::Serialize;

/// Results go to stdout as pretty JSON; diagnostics stay on stderr.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// Everything here goes to stderr: stdout is reserved for command payload
// (addresses, account listings) so it stays machine-readable.

pub mod logger {
    use std::fmt::Display;

    use colored::Colorize;

    use crate::config::global_config;

    pub fn intro(message: impl Display) {
        eprintln!("{}", message.to_string().bold());
    }

    pub fn info(message: impl Display) {
        eprintln!("{message}");
    }

    pub fn step(message: impl Display) {
        eprintln!("{} {message}", "::".cyan().bold());
    }

    /// Printed only when the process runs with `--verbose`.
    pub fn debug(message: impl Display) {
        if global_config().verbose {
            eprintln!("{}", message.to_string().dimmed());
        }
    }

    pub fn warn(message: impl Display) {
        eprintln!("{} {message}", "warning:".yellow().bold());
    }

    pub fn outro(message: impl Display) {
        eprintln!("{}", message.to_string().green().bold());
    }

    pub fn new_empty_line() {
        eprintln!();
    }
}

pub mod error {
    use colored::Colorize;

    use super::logger;

    /// Prints the full error chain. Exit-code handling stays with the caller.
    pub fn log_error(error: anyhow::Error) {
        logger::new_empty_line();
        eprintln!("{} {error}", "error:".red().bold());
        let mut causes = error.chain().skip(1).peekable();
        if causes.peek().is_some() {
            eprintln!("{}", "caused by:".red());
            for cause in causes {
                eprintln!("    {cause}");
            }
        }
    }
}

//! CLI command implementations

pub mod lookup;
pub mod options;
pub mod parse;

use crate::OutputFormat;
use hieraldap_core::LookupOptions;

/// Context passed to all commands
pub struct CommandContext {
    pub options: LookupOptions,
    pub output_format: OutputFormat,
    pub verbose: bool,
    pub quiet: bool,
}

impl CommandContext {
    /// Print info message if not quiet
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg);
        }
    }

    /// Print verbose message if verbose mode
    pub fn debug(&self, msg: &str) {
        if self.verbose {
            eprintln!("[DEBUG] {}", msg);
        }
    }

    /// Print error message
    pub fn error(&self, msg: &str) {
        eprintln!("{}", msg);
    }
}

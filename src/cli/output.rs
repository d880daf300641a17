//! Console output for the harness and config commands
//!
//! Styling comes from `console`, which drops colors when stdout is not a
//! terminal. Strategy reports bypass this and are printed verbatim.

use console::style;

/// Output handler for consistent CLI formatting
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    /// Create a new output handler
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        // Errors are always shown, even in quiet mode
        eprintln!("{} {}", style("✖").red(), message);
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    /// Print a verbose message (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.verbose && !self.quiet {
            println!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    /// Print a header framed by `=` rules
    pub fn banner(&self, lines: &[String], width: usize) {
        if self.quiet {
            return;
        }
        let rule = "=".repeat(width);
        println!("{}", style(&rule).bold());
        for line in lines {
            println!("{}", style(line).bold());
        }
        println!("{}", style(&rule).bold());
    }

    /// Print a section header with enhanced styling
    pub fn section_header(&self, title: &str, width: usize) {
        if !self.quiet {
            println!("\n{}", style("_".repeat(width)).dim());
            println!("{}", style(title).bold().cyan());
            println!("{}", style("_".repeat(width)).dim());
        }
    }

    /// Print a step in a process
    pub fn step(&self, step: &str) {
        if !self.quiet {
            println!("{} {}", style("❯").cyan(), step);
        }
    }

    /// Print pre-rendered text as-is
    pub fn raw(&self, text: &str) {
        if !self.quiet {
            print!("{text}");
            if !text.ends_with('\n') {
                println!();
            }
        }
    }

    /// Print captured stderr of a run that still succeeded
    pub fn dimmed(&self, text: &str) {
        if !self.quiet {
            for line in text.lines() {
                println!("  {}", style(line).dim());
            }
        }
    }

    /// Print a key-value pair with consistent styling
    pub fn key_value(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {} {}", style(key).dim(), style(value).white());
        }
    }

    /// Print blank line
    pub fn blank_line(&self) {
        if !self.quiet {
            println!();
        }
    }
}

//! Report output
//!
//! Per-entry messages, match totals and the run header. Everything is written
//! to a caller-supplied writer so the binary can target stdout and tests can
//! capture into a buffer.

use crate::config::{CompareConfig, WorkerCount};
use crate::scheduler::TreeComparison;
use crate::tree::{FileKind, FullComparison, Outcome};
use console::style;
use std::io::{self, Write};

/// Matched and total counts for files and directories
///
/// A total counts every entry where either side is of that kind, so a file
/// missing on one side still counts against the file total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub file_matches: u64,
    pub file_total: u64,
    pub dir_matches: u64,
    pub dir_total: u64,
}

impl Totals {
    /// Count one comparison
    pub fn add(&mut self, comparison: &FullComparison) {
        let partial = &comparison.partial;
        let matched = partial.outcome.is_match();

        if partial.involves(FileKind::File) {
            self.file_total += 1;
            if matched {
                self.file_matches += 1;
            }
        }
        if partial.involves(FileKind::Directory) {
            self.dir_total += 1;
            if matched {
                self.dir_matches += 1;
            }
        }
    }

    /// Totals over a whole result
    pub fn tally<'a>(comparisons: impl IntoIterator<Item = &'a FullComparison>) -> Self {
        let mut totals = Self::default();
        for comparison in comparisons {
            totals.add(comparison);
        }
        totals
    }
}

/// Human-readable line for one comparison
pub fn message(comparison: &FullComparison) -> String {
    let first = comparison.first_path.display();
    let second = comparison.second_path.display();

    match comparison.outcome() {
        Outcome::Match => format!("\"{}\" == \"{}\"", first, second),
        Outcome::MismatchType => {
            format!("\"{}\" is not of the same type as \"{}\"", first, second)
        }
        Outcome::MismatchContent => format!("\"{}\" differs from \"{}\"", first, second),
        Outcome::MismatchNeitherExists => format!("Neither \"{}\" nor \"{}\" exist", first, second),
        Outcome::MismatchOnlyFirstExists => {
            format!("\"{}\" exists, but \"{}\" does NOT exist", first, second)
        }
        Outcome::MismatchOnlySecondExists => {
            format!("\"{}\" does NOT exist, but \"{}\" does exist", first, second)
        }
    }
}

fn paint(text: String, good: bool, pretty: bool) -> String {
    if !pretty {
        return text;
    }
    let styled = style(text).bold().force_styling(true);
    if good {
        styled.green().to_string()
    } else {
        styled.red().to_string()
    }
}

/// Write every entry the config asks for, then the totals if requested
pub fn write_report<W: Write>(
    out: &mut W,
    result: &TreeComparison,
    config: &CompareConfig,
) -> io::Result<Totals> {
    let mut totals = Totals::default();

    for comparison in &result.comparisons {
        totals.add(comparison);
        let matched = comparison.outcome().is_match();
        if matched && !config.print_matches {
            continue;
        }
        writeln!(out, "{}", paint(message(comparison), matched, config.pretty))?;
    }

    if config.print_totals {
        write_totals(out, &totals)?;
    }

    Ok(totals)
}

/// Write the closing totals block
pub fn write_totals<W: Write>(out: &mut W, totals: &Totals) -> io::Result<()> {
    writeln!(out, "All done!")?;
    writeln!(
        out,
        "File byte-for-byte matches: {}/{}",
        totals.file_matches, totals.file_total
    )?;
    writeln!(
        out,
        "Directory matches: {}/{}",
        totals.dir_matches, totals.dir_total
    )
}

/// Print a header at the start of the comparison
pub fn print_header(config: &CompareConfig) {
    let workers = match config.workers {
        WorkerCount::Auto => format!("auto ({})", config.workers.resolve()),
        WorkerCount::Fixed(n) => n.to_string(),
    };

    println!();
    println!(
        "{} {}",
        style("cmp-tree").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("First:").bold(), config.first_root.display());
    println!("  {} {}", style("Second:").bold(), config.second_root.display());
    println!("  {} {}", style("Workers:").bold(), workers);
    println!("  {} {}", style("Backend:").bold(), config.backend.name());
    println!();
}

/// Warn about anything that makes the report incomplete
pub fn print_warnings(result: &TreeComparison) {
    if !result.enumeration_errors.is_empty() {
        eprintln!(
            "{} {} unreadable director{} skipped",
            style("Warning:").yellow().bold(),
            result.enumeration_errors.len(),
            if result.enumeration_errors.len() == 1 { "y" } else { "ies" }
        );
    }
    if !result.completed {
        eprintln!(
            "{} interrupted after {} comparisons",
            style("Warning:").yellow().bold(),
            result.comparisons.len()
        );
    }
}

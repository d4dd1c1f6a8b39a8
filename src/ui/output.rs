//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Results go to stdout one value per line; errors go to stderr as
//! `Error: <message>`. Formatting lives in `format_*` functions so it can
//! be tested without capturing stdout.

use std::fmt::Display;

use crate::client::ops::Term;
use crate::client::PartitionGroup;

/// Spaces between table columns.
const TABLE_PADDING: usize = 3;

/// Print a single result.
pub fn print(value: impl Display) {
    println!("{}", value);
}

/// Print each item on its own line.
pub fn print_lines<T: Display>(items: &[T]) {
    for item in items {
        println!("{}", item);
    }
}

/// Print an error message (always shown).
pub fn error(err: &anyhow::Error) {
    eprintln!("Error: {:#}", err);
}

/// Render the summary block for a partition group.
pub fn format_group(group: &PartitionGroup) -> String {
    format!(
        "Name:            {}\nNamespace:       {}\nPartitions:      {}\nPartitions Size: {}",
        group.name, group.namespace, group.partitions, group.partition_size
    )
}

/// Render an election term.
pub fn format_term(term: &Term) -> String {
    format!(
        "Term:       {}\nLeader:     {}\nCandidates: {}",
        term.term,
        term.leader.as_deref().unwrap_or(""),
        term.candidates.join(", ")
    )
}

/// Render rows as left-aligned columns.
///
/// Every column but the last is padded to its widest cell plus
/// [`TABLE_PADDING`]. The header row is counted when sizing columns even if
/// it is not printed, so output with and without headers lines up.
pub fn format_table(headers: &[&str], rows: &[Vec<String>], with_headers: bool) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            } else {
                widths.push(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let header_row: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let lines = with_headers
        .then_some(&header_row)
        .into_iter()
        .chain(rows.iter());

    for row in lines {
        let last = row.len().saturating_sub(1);
        for (i, cell) in row.iter().enumerate() {
            out.push_str(cell);
            if i < last {
                let pad = widths[i] - cell.chars().count() + TABLE_PADDING;
                out.extend(std::iter::repeat(' ').take(pad));
            }
        }
        out.push('\n');
    }
    out
}

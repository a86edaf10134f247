//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use unicode_width::UnicodeWidthStr;

use texcite_core::report::{FailedFile, FileSummary};
use texcite_core::HeadingNode;

/// Print an indented heading outline, skipping headings deeper than `max_level`.
pub fn print_outline(headings: &[HeadingNode], max_level: u8) {
    let visible: Vec<&HeadingNode> = headings.iter().filter(|h| h.level <= max_level).collect();
    if visible.is_empty() {
        println!("{}", "No headings found.".dimmed());
        return;
    }

    let base = visible.iter().map(|h| h.level).min().unwrap_or(0);
    let width = term_width();

    for heading in visible {
        let indent = "  ".repeat(usize::from(heading.level - base));
        let count = format!("{:>4}", heading.citations.len());
        let kind = format!("{:<13}", heading.kind.to_string());
        // indent + kind + count + line marker + separators
        let budget = width
            .saturating_sub(UnicodeWidthStr::width(indent.as_str()) + 13 + 4 + 12)
            .max(8);

        println!(
            "{}{} {} {} {}",
            indent,
            kind_colored(&kind, heading.level),
            pad_right(&truncate_visual(&heading.title, budget), budget),
            count_colored(&count, heading.citations.len()),
            format!("L{}", heading.line_number).dimmed()
        );
    }
}

/// Print per-file numbers as a table.
pub fn print_file_table(files: &[FileSummary]) {
    if files.is_empty() {
        println!("{}", "No files analyzed.".dimmed());
        return;
    }

    let path_width = term_width().saturating_sub(58).clamp(16, 60);

    println!(
        "{} {:>9} {:>9} {:>9} {:>17} {:>8}",
        pad_right("File", path_width),
        "Citations",
        "Commands",
        "Sentences",
        "Prose/List/Table",
        "Headings"
    );
    println!("{}", "─".repeat(path_width + 58));

    for file in files {
        let split = &file.sentence_breakdown;
        println!(
            "{} {:>9} {:>9} {:>9} {:>17} {:>8}",
            pad_right(&truncate_visual(&file.path, path_width), path_width),
            file.citations.to_string().cyan(),
            file.unique_citation_commands,
            file.sentences,
            format!("{}/{}/{}", split.prose, split.list_items, split.table_cells),
            file.headings
        );
    }
}

/// Print files that could not be fetched.
pub fn print_failed_files(failed: &[FailedFile]) {
    if failed.is_empty() {
        return;
    }

    println!();
    println!("{}", format!("Skipped {} file(s)", failed.len()).red().bold());
    for file in failed {
        println!("  {} {}", file.path.red(), file.reason.dimmed());
    }
}

/// Print citation keys wrapped to the terminal width.
pub fn print_keys(keys: &[String]) {
    for line in wrap_keys(keys, term_width().saturating_sub(2)) {
        println!("  {}", line);
    }
}

/// Join keys with ", " into lines no wider than `max_width`.
fn wrap_keys(keys: &[String], max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for key in keys {
        let key = if key.is_empty() { "(empty)" } else { key.as_str() };
        let candidate = if current.is_empty() {
            key.to_string()
        } else {
            format!("{}, {}", current, key)
        };

        if !current.is_empty() && UnicodeWidthStr::width(candidate.as_str()) > max_width {
            lines.push(format!("{},", current));
            current = key.to_string();
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn kind_colored(label: &str, level: u8) -> ColoredString {
    match level {
        0 => label.magenta().bold(),
        1 => label.blue().bold(),
        2 => label.cyan(),
        3 => label.normal(),
        _ => label.dimmed(),
    }
}

fn count_colored(label: &str, count: usize) -> ColoredString {
    match count {
        0 => label.dimmed(),
        1..=9 => label.green(),
        _ => label.yellow().bold(),
    }
}

/// Get terminal width, defaulting to 80.
fn term_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

/// Truncate a string respecting visual width.
fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 2 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("..");
    result
}

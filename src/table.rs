//! First-table extraction: locate a GFM table in the report and emit CSV.
//!
//! The review prompt asks the model to summarise its findings in a single
//! Markdown table, so only the *first* table in the report is ever exported.
//! Everything downstream (the CSV file offered to the user) hangs off this
//! module, which makes its escaping rules the correctness-critical part of
//! the crate:
//!
//! - Every literal `"` inside a cell is doubled, whether or not the cell
//!   ends up quoted.
//! - A cell is wrapped in quotes iff the *original* cell contains a comma,
//!   a quote, or a newline.
//! - Rows are joined with a single `\n`, header row first, no trailing
//!   newline, and the whole text is prefixed with U+FEFF. Excel and Google
//!   Sheets mis-decode non-ASCII CSV without the BOM, so it is a hard
//!   compatibility requirement.

use once_cell::sync::Lazy;
use regex::Regex;

/// Marker prepended to the CSV text so spreadsheet tools decode it as UTF-8.
pub const UTF8_BOM: char = '\u{FEFF}';

/// Default filename for the exported table.
pub const DEFAULT_CSV_FILENAME: &str = "paper_table_utf8.csv";

/// The first Markdown table of a report, parsed and pre-encoded.
///
/// Produced by [`extract_first_table`]. `rows` may be empty (a header-only
/// table); callers should only offer the CSV for download when at least one
/// body row exists.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TableExport {
    /// Header cell values, in column order. Not required to be unique.
    pub headers: Vec<String>,
    /// Body rows. Row widths are *not* validated against the header count;
    /// whatever the split produced is kept as-is.
    pub rows: Vec<Vec<String>>,
    /// The raw table block, separator row included, joined with `\n`.
    pub markdown: String,
    /// BOM-prefixed CSV rendition of headers + rows.
    pub csv: String,
}

// Any trimmed line framed by vertical bars with at least one char between.
static RE_TABLE_ROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\|.+\|$").unwrap());

// Separator row: two or more cells of `:?-{3,}:?`, bar-framed.
static RE_SEPARATOR_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\|\s*:?-{3,}:?\s*(\|\s*:?-{3,}:?\s*)+\|$").unwrap());

/// Split raw text into logical lines regardless of platform line endings.
///
/// Equivalent to splitting on `\r?\n`: lone `\r` characters inside a line
/// are preserved.
fn logical_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect()
}

/// Find the starting line index of the first Markdown table.
///
/// A table starts at the first adjacent pair where line `i` (trimmed) looks
/// like a header row and line `i + 1` (trimmed) is a separator row. The
/// leftmost qualifying pair wins; no backtracking afterwards.
fn locate_table(lines: &[&str]) -> Option<usize> {
    lines.windows(2).position(|pair| {
        RE_TABLE_ROW.is_match(pair[0].trim()) && RE_SEPARATOR_ROW.is_match(pair[1].trim())
    })
}

/// Collect the contiguous table block starting at `start`.
///
/// Scans forward and keeps every trimmed line still matching the generic
/// row pattern; the first non-matching line (blank lines included) ends the
/// block.
fn collect_block<'a>(lines: &[&'a str], start: usize) -> Vec<&'a str> {
    lines[start..]
        .iter()
        .map(|l| l.trim())
        .take_while(|l| RE_TABLE_ROW.is_match(l))
        .collect()
}

/// Split a table row into cell values.
///
/// The framing bars produce empty leading/trailing fragments, which are
/// dropped; the remaining fragments are whitespace-trimmed.
fn split_cells(line: &str) -> Vec<String> {
    let fragments: Vec<&str> = line.split('|').collect();
    if fragments.len() < 2 {
        return Vec::new();
    }
    fragments[1..fragments.len() - 1]
        .iter()
        .map(|c| c.trim().to_string())
        .collect()
}

/// Extract the first Markdown table from a report, or `None` when the text
/// contains no well-formed table.
///
/// Well-formed means a header row directly followed by a separator row; the
/// block then extends over every contiguous bar-framed line. Rows whose
/// cell count differs from the header's are kept untouched — the consuming
/// spreadsheet shows the mismatch rather than this crate guessing at a fix.
pub fn extract_first_table(markdown: &str) -> Option<TableExport> {
    if markdown.is_empty() {
        return None;
    }
    let lines = logical_lines(markdown);
    let start = locate_table(&lines)?;

    let block = collect_block(&lines, start);
    if block.len() < 2 {
        return None;
    }

    let headers = split_cells(block[0]);
    // block[1] is the separator row.
    let rows: Vec<Vec<String>> = block[2..].iter().map(|l| split_cells(l)).collect();
    let csv = encode_csv(&headers, &rows);

    Some(TableExport {
        headers,
        rows,
        markdown: block.join("\n"),
        csv,
    })
}

/// Escape one CSV cell.
///
/// Quotes are doubled unconditionally; the wrap decision is made on the
/// original cell value, not the doubled one.
fn escape_cell(cell: &str) -> String {
    let needs_wrap = cell.contains(',') || cell.contains('"') || cell.contains('\n');
    let doubled = cell.replace('"', "\"\"");
    if needs_wrap {
        format!("\"{doubled}\"")
    } else {
        doubled
    }
}

/// Encode headers + rows as BOM-prefixed CSV text.
///
/// Header row first, body rows in original order, rows joined with a single
/// `\n` and no trailing newline.
pub fn encode_csv(headers: &[String], rows: &[Vec<String>]) -> String {
    let header_line = headers
        .iter()
        .map(|c| escape_cell(c))
        .collect::<Vec<_>>()
        .join(",");
    let mut out = String::with_capacity(header_line.len() + 64);
    out.push(UTF8_BOM);
    out.push_str(&header_line);
    for row in rows {
        out.push('\n');
        let line = row.iter().map(|c| escape_cell(c)).collect::<Vec<_>>().join(",");
        out.push_str(&line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn plain_cells_pass_through() {
        let csv = encode_csv(&s(&["X", "Y"]), &[s(&["a", "b"]), s(&["c", "d"])]);
        assert_eq!(csv, "\u{FEFF}X,Y\na,b\nc,d");
    }

    #[test]
    fn comma_quote_newline_cells_are_wrapped() {
        assert_eq!(escape_cell(","), "\",\"");
        assert_eq!(escape_cell("\n"), "\"\n\"");
        assert_eq!(escape_cell("\""), "\"\"\"\"");
        assert_eq!(escape_cell("plain"), "plain");
    }

    #[test]
    fn quote_in_cell_is_doubled_and_wrapped() {
        assert_eq!(escape_cell("d\"e"), "\"d\"\"e\"");
    }

    #[test]
    fn spec_example_rows() {
        let csv = encode_csv(&s(&["X", "Y"]), &[s(&["a", "b,c"]), s(&["d\"e", "f"])]);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("\u{FEFF}X,Y"));
        assert_eq!(lines.next(), Some("a,\"b,c\""));
        assert_eq!(lines.next(), Some("\"d\"\"e\",f"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn no_trailing_newline() {
        let csv = encode_csv(&s(&["A"]), &[s(&["1"])]);
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn encoder_is_idempotent() {
        let headers = s(&["H1", "H2"]);
        let rows = vec![s(&["a,b", "c\"d"])];
        assert_eq!(encode_csv(&headers, &rows), encode_csv(&headers, &rows));
    }

    #[test]
    fn extracts_simple_table() {
        let md = "Intro text\n\n| A | B | C |\n| --- | --- | --- |\n| 1 | 2 | 3 |\n| 4 | 5 | 6 |\nnot a table row";
        let table = extract_first_table(md).expect("table should be found");
        assert_eq!(table.headers, s(&["A", "B", "C"]));
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], s(&["4", "5", "6"]));
        // The trailing non-table line must not leak into the block.
        assert!(!table.markdown.contains("not a table"));
        assert_eq!(table.markdown.lines().count(), 4);
    }

    #[test]
    fn table_block_ends_at_blank_line() {
        let md = "| A | B |\n| --- | --- |\n| 1 | 2 |\n\n| X | Y |";
        let table = extract_first_table(md).unwrap();
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn crlf_input_is_handled() {
        let md = "| A | B |\r\n| --- | --- |\r\n| 1 | 2 |\r\n";
        let table = extract_first_table(md).unwrap();
        assert_eq!(table.headers, s(&["A", "B"]));
        assert_eq!(table.rows, vec![s(&["1", "2"])]);
    }

    #[test]
    fn no_table_returns_none() {
        assert!(extract_first_table("").is_none());
        assert!(extract_first_table("just prose\nwith lines\n").is_none());
        // Header row with no separator is not a table.
        assert!(extract_first_table("| A | B |\nplain line").is_none());
    }

    #[test]
    fn single_column_separator_is_rejected() {
        // The separator pattern requires at least two cells.
        assert!(extract_first_table("| A |\n| --- |\n| 1 |").is_none());
    }

    #[test]
    fn separator_alignment_markers_accepted() {
        let md = "| L | C | R |\n| :--- | :---: | ---: |\n| a | b | c |";
        let table = extract_first_table(md).unwrap();
        assert_eq!(table.rows, vec![s(&["a", "b", "c"])]);
    }

    #[test]
    fn first_table_wins() {
        let md = "| A | B |\n| --- | --- |\n| 1 | 2 |\n\n| X | Y |\n| --- | --- |\n| 9 | 9 |";
        let table = extract_first_table(md).unwrap();
        assert_eq!(table.headers, s(&["A", "B"]));
    }

    #[test]
    fn ragged_rows_are_kept_as_split() {
        let md = "| A | B | C |\n| --- | --- | --- |\n| 1 | 2 |\n| 1 | 2 | 3 | 4 |";
        let table = extract_first_table(md).unwrap();
        assert_eq!(table.rows[0].len(), 2);
        assert_eq!(table.rows[1].len(), 4);
    }

    #[test]
    fn header_only_table_has_zero_rows() {
        let md = "| A | B |\n| --- | --- |";
        let table = extract_first_table(md).unwrap();
        assert!(table.rows.is_empty());
        assert_eq!(table.csv, "\u{FEFF}A,B");
    }

    #[test]
    fn csv_starts_with_bom() {
        let table = extract_first_table("| A | B |\n| --- | --- |\n| ä | ö |").unwrap();
        assert!(table.csv.starts_with(UTF8_BOM));
    }
}

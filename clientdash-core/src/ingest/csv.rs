//! Delimited-text parser for the spreadsheet export.
//!
//! The export is a header line followed by one line per order with five
//! positional columns: client, headshots, price, status, email.
//!
//! Parsing is best-effort and total. Malformed numbers degrade to zero, short
//! lines get empty trailing fields, and the only row ever dropped is one whose
//! client name is empty. Input is split into lines before tokenising, so a
//! quoted field cannot span lines.
//!
//! Quote handling is a simple toggle: every `"` flips quoted mode and is not
//! copied into the field. A doubled quote inside a quoted field therefore
//! disappears instead of producing a literal `"`.

use crate::types::ClientRecord;

/// Column delimiter
pub const DELIMITER: char = ',';

/// Columns mapped positionally onto [`ClientRecord`]
pub const FIELD_COUNT: usize = 5;

/// Outcome of parsing one export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSheet {
    /// Records in input order
    pub records: Vec<ClientRecord>,
    /// Non-blank data lines seen after the header
    pub rows_seen: usize,
    /// Lines dropped because the client name was empty
    pub rows_skipped: usize,
}

/// Parse a full export into records, dropping nameless rows.
pub fn parse_records(text: &str) -> Vec<ClientRecord> {
    parse_sheet(text).records
}

/// Parse a full export, keeping row counts for diagnostics.
pub fn parse_sheet(text: &str) -> ParsedSheet {
    let mut sheet = ParsedSheet::default();

    // First non-blank line is the header; its contents are never checked.
    for line in text.lines().filter(|l| !l.trim().is_empty()).skip(1) {
        sheet.rows_seen += 1;
        match parse_line(line) {
            Some(record) => sheet.records.push(record),
            None => sheet.rows_skipped += 1,
        }
    }

    sheet
}

/// Parse one data line. Returns `None` when the client name is empty.
pub fn parse_line(line: &str) -> Option<ClientRecord> {
    let mut fields = split_fields(line).into_iter();
    let mut next = || fields.next().unwrap_or_default();

    let client_name = next();
    if client_name.is_empty() {
        return None;
    }

    Some(ClientRecord {
        client_name,
        headshot_count: parse_count(&next()),
        price: parse_price(&next()),
        status: next(),
        email: next(),
    })
}

/// Split a line on [`DELIMITER`], treating delimiters inside quotes as text.
///
/// Every field is trimmed. Quote characters are consumed.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::with_capacity(FIELD_COUNT);
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            DELIMITER if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

/// Parse a leading integer, e.g. `"12"`, `" 7 photos"`.
///
/// Anything without leading digits, and any negative value, yields 0.
pub fn parse_count(token: &str) -> u32 {
    let token = token.trim_start();
    let (negative, rest) = match token.chars().next() {
        Some('-') => (true, &token[1..]),
        Some('+') => (false, &token[1..]),
        _ => (false, token),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];

    if digits.is_empty() || negative {
        return 0;
    }
    digits.parse().unwrap_or(u32::MAX)
}

/// Parse a currency-formatted amount, e.g. `"₹1,234.50"`.
///
/// Every character other than ASCII digits, `.` and `-` is removed first, so
/// currency glyphs, grouping separators, stray quotes and spaces vanish.
/// The longest numeric prefix of what remains is parsed; no digits yields 0.
pub fn parse_price(token: &str) -> f64 {
    let cleaned: String = token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    numeric_prefix(&cleaned)
        .and_then(|prefix| prefix.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Longest prefix shaped like `-?digits.digits` containing at least one digit.
fn numeric_prefix(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut end = usize::from(bytes.first() == Some(&b'-'));
    let mut seen_digit = false;
    let mut seen_dot = false;

    while let Some(&b) = bytes.get(end) {
        match b {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }

    seen_digit.then(|| &s[..end])
}

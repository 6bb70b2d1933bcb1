// src/csv.rs
use std::mem::take;

use crate::attendance::model::{SessionInfo, Student};

/* ---------------- Rendering ---------------- */

/// `Date,Class Name,"Lee, Jo","Doe, Al"` + newline. Names are quoted, never
/// escaped.
pub fn header_row(roster: &[Student]) -> String {
    let names: Vec<String> = roster
        .iter()
        .map(|s| format!("\"{}, {}\"", s.last_name, s.first_name))
        .collect();
    format!("Date,Class Name,{}\n", names.join(","))
}

/// One session: start time, quoted class name, then one token per student
/// in the session's own order.
pub fn session_row(info: &SessionInfo) -> String {
    let tokens: Vec<&str> = info.students.iter().map(|s| s.outcome().token()).collect();
    format!("{},\"{}\",{}\n", info.start_time, info.name, tokens.join(","))
}

/// Full attendance table. Total: any input renders.
pub fn render(sessions: &[SessionInfo], roster: &[Student]) -> String {
    let mut out = header_row(roster);
    for info in sessions {
        out.push_str(&session_row(info));
    }
    out
}

/* ---------------- Parsing ---------------- */

/// Minimal CSV/TSV parser (quotes + CRLF tolerant), used to lay the rendered
/// text out as a grid.
pub fn parse_rows(text: &str, sep: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = s!();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next(); // double-quote escape
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            c if c == sep && !in_quotes => {
                row.push(take(&mut field));
            }
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) { chars.next(); }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Flush a trailing row without newline.
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

/// Split parsed rows into (header, body).
pub fn split_header(mut rows: Vec<Vec<String>>) -> (Option<Vec<String>>, Vec<Vec<String>>) {
    if rows.is_empty() {
        return (None, rows);
    }
    let header = rows.remove(0);
    (Some(header), rows)
}

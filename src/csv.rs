// src/csv.rs
use std::io::{self, Write};
use std::mem::take;

/* ---------------- Parsing ---------------- */

/// Minimal CSV parser (quotes + CRLF tolerant). Blank lines are skipped.
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
                if !is_blank(&row) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Flush any trailing field/row even if quotes were unterminated.
    row.push(field);
    if !is_blank(&row) {
        rows.push(row);
    }

    rows
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first { write!(w, "{}", sep)?; } else { first = false; }
        if needs_quotes(cell, sep) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

pub fn rows_to_string(headers: &[String], rows: &[Vec<String>], sep: char) -> String {
    let mut buf: Vec<u8> = Vec::new();

    let _ = write_row(&mut buf, headers, sep);
    for r in rows {
        let _ = write_row(&mut buf, r, sep);
    }

    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}

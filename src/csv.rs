//! Quoted-CSV helpers for the metadata ledger and exports.
//!
//! Transcript text is free-form and may contain commas, quotes, and line
//! breaks, so rows are rendered with RFC 4180 quoting and parsed with a
//! small state machine rather than line splitting.

/// Render one record as a CSV line, quoting fields that need it
pub fn format_row(fields: &[&str]) -> String {
    let mut row = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            row.push(',');
        }
        if needs_quoting(field) {
            row.push('"');
            for c in field.chars() {
                if c == '"' {
                    row.push('"');
                }
                row.push(c);
            }
            row.push('"');
        } else {
            row.push_str(field);
        }
    }
    row.push('\n');
    row
}

fn needs_quoting(field: &str) -> bool {
    field.contains([',', '"', '\n', '\r'])
}

/// Parse a whole CSV document into records.
///
/// Quoted fields may span lines; a doubled quote inside a quoted field is a
/// literal quote. Malformed rows surface as records with the wrong field
/// count and are filtered by the caller.
pub fn parse(content: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }
    // Last record without a trailing newline
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    records
}

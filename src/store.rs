// Table store: each entity set persists as one flat file with a header row,
// rewritten in full on every mutation. A missing file is an empty table.
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::DeskError;

// Conversion between an entity and one row of its table.
pub trait Record: Sized {
    const TABLE: &'static str;
    const HEADER: &'static [&'static str];

    fn to_row(&self) -> Vec<String>;
    fn from_row(row: &[String]) -> Result<Self, DeskError>;
}

// Quote a field only when it would break the row structure. Feedback comments
// are the usual offenders (commas, quotes, newlines).
fn encode_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn encode_row(row: &[String]) -> String {
    row.iter()
        .map(|f| encode_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

// Decode a whole table file into records. Record breaks are newlines outside
// quotes; a quoted field may span physical lines, so this walks the full text
// rather than reading line by line.
fn decode_table(table: &'static str, text: &str) -> Result<Vec<Vec<String>>, DeskError> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    let mut quoted = false;

    while let Some(c) = chars.next() {
        if quoted {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    current.push('"');
                }
                '"' => quoted = false,
                _ => current.push(c),
            }
        } else {
            match c {
                '"' if current.is_empty() => quoted = true,
                ',' => fields.push(std::mem::take(&mut current)),
                '\r' if chars.peek() == Some(&'\n') => {}
                '\n' => {
                    fields.push(std::mem::take(&mut current));
                    records.push(std::mem::take(&mut fields));
                }
                _ => current.push(c),
            }
        }
    }
    if quoted {
        return Err(DeskError::MalformedRow {
            table,
            reason: "unterminated quote at end of file".to_string(),
        });
    }
    if !current.is_empty() || !fields.is_empty() {
        fields.push(current);
        records.push(fields);
    }
    // Blank lines decode to a single empty field; drop them.
    records.retain(|r| r.len() > 1 || !r[0].is_empty());
    Ok(records)
}

// Load a full table. A missing backing file yields an empty table; a present
// but malformed file is an error.
pub fn load<T: Record>(path: &Path) -> Result<Vec<T>, DeskError> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(table = T::TABLE, path = %path.display(), "no backing file, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let records = decode_table(T::TABLE, &text)?;
    let rows = records
        .into_iter()
        // Header row; columns are fixed by the record type.
        .skip(1)
        .map(|fields| T::from_row(&fields))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(table = T::TABLE, rows = rows.len(), "loaded table");
    Ok(rows)
}

// Rewrite a full table, then flush and fsync before returning.
pub fn save<T: Record>(path: &Path, rows: &[T]) -> Result<(), DeskError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let header: Vec<String> = T::HEADER.iter().map(|h| h.to_string()).collect();
    writeln!(writer, "{}", encode_row(&header))?;
    for row in rows {
        writeln!(writer, "{}", encode_row(&row.to_row()))?;
    }
    writer.flush()?;
    writer.get_ref().sync_all()?;
    debug!(table = T::TABLE, rows = rows.len(), "saved table");
    Ok(())
}

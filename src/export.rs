// Flat delimited dump of a store table
use rusqlite::types::ValueRef;

use crate::db::Store;
use crate::error::{Error, Result};

/// Tables the store manages. Table names cannot be bound as SQL
/// parameters, so export only accepts names from this list.
pub const EXPORTABLE_TABLES: [&str; 4] = ["clients", "technicians", "orders", "history"];

/// Dump every row of a table as CSV text: a header row of column names,
/// then one line per row. NULL renders as an empty field.
pub fn export_table(db: &Store, table: &str) -> Result<String> {
    if !EXPORTABLE_TABLES.contains(&table) {
        return Err(Error::UnknownTable(table.to_string()));
    }

    let conn = db.lock();
    let mut stmt = conn.prepare(&format!("SELECT * FROM {}", table))?;
    let headers: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let column_count = headers.len();

    let mut out = String::new();
    write_record(&mut out, headers.iter().map(String::as_str));

    let mut row_count = 0usize;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let fields: Vec<String> = (0..column_count)
            .map(|i| row.get_ref(i).map(render_value))
            .collect::<std::result::Result<_, _>>()?;
        write_record(&mut out, fields.iter().map(String::as_str));
        row_count += 1;
    }

    log::info!("Exported {} rows from {}", row_count, table);
    Ok(out)
}

fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(r) => r.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => String::from_utf8_lossy(b).into_owned(),
    }
}

fn write_record<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;
        if field.contains(['"', ',', '\n', '\r']) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out.push('\n');
}

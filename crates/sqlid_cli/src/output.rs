//! Rendering of computed `SQL_ID` values.

use std::io::{self, Write};

use serde::Serialize;
use sqlid_core::SqlId;

use crate::ReportFormat;

/// One computed result, as written in JSON mode.
#[derive(Serialize)]
struct Record<'a> {
    sql_id: SqlId,
    statement: &'a str,
}

/// Writes one result line in the requested format.
pub fn write_record(
    out: &mut impl Write,
    format: ReportFormat,
    sql_id: SqlId,
    statement: &str,
) -> io::Result<()> {
    match format {
        ReportFormat::Text => writeln!(out, "{sql_id}\t{statement}"),
        ReportFormat::Json => {
            let json = serde_json::to_string(&Record { sql_id, statement })?;
            writeln!(out, "{json}")
        }
    }
}

//! `sqlid check`: compare a statement against an expected `SQL_ID`.

use std::io::Write;

use sqlid_core::SqlId;

use crate::{CheckArgs, GlobalArgs};

/// Runs the `sqlid check` command.
///
/// Returns exit code 0 on a match, 1 on a mismatch and 2 when the expected
/// value is not a well-formed `SQL_ID`.
pub fn run(
    args: &CheckArgs,
    global: &GlobalArgs,
    out: &mut impl Write,
) -> Result<i32, Box<dyn std::error::Error>> {
    let expected: SqlId = match args.sql_id.parse() {
        Ok(id) => id,
        Err(e) => {
            eprintln!("error: '{}': {e}", args.sql_id);
            return Ok(2);
        }
    };

    let actual = sqlid_core::compute(&args.statement);
    if actual == expected {
        if !global.quiet {
            writeln!(out, "ok {actual}")?;
        }
        Ok(0)
    } else {
        if !global.quiet {
            writeln!(out, "mismatch: expected {expected}, computed {actual}")?;
        }
        Ok(1)
    }
}

//! `sqlid compute`: hash statements given on the command line.

use std::io::Write;

use crate::output::write_record;
use crate::ComputeArgs;

/// Runs the `sqlid compute` command. Always returns exit code 0.
pub fn run(args: &ComputeArgs, out: &mut impl Write) -> Result<i32, Box<dyn std::error::Error>> {
    for statement in &args.statements {
        let sql_id = sqlid_core::compute(statement);
        write_record(out, args.format, sql_id, statement)?;
    }
    Ok(0)
}

//! `sqlid batch`: hash a stream of statements through the lookup cache.
//!
//! Statements are read one per line; blank lines are skipped. Repeated
//! statements are served from a [`SqlIdLookup`] sized by the configuration
//! or `--capacity`.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use sqlid_cache::{NoDriver, SqlIdLookup};
use sqlid_config::SqlIdConfig;
use tracing::info;

use crate::output::write_record;
use crate::BatchArgs;

/// Runs the `sqlid batch` command. Returns exit code 0 once all input is consumed.
pub fn run(
    args: &BatchArgs,
    config: &SqlIdConfig,
    out: &mut impl Write,
) -> Result<i32, Box<dyn std::error::Error>> {
    match args.input.as_deref() {
        None | Some("-") => process(args, config, io::stdin().lock(), out),
        Some(path) => {
            let file = File::open(path).map_err(|e| format!("cannot open {path}: {e}"))?;
            process(args, config, BufReader::new(file), out)
        }
    }
}

fn process(
    args: &BatchArgs,
    config: &SqlIdConfig,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<i32, Box<dyn std::error::Error>> {
    let capacity = args.capacity.unwrap_or(config.cache.capacity);
    let lookup = SqlIdLookup::with_capacity(NoDriver, capacity)?;

    let mut statements = 0usize;
    for line in input.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let sql_id = lookup.sql_id_of_native(&line);
        write_record(out, args.format, sql_id, &line)?;
        statements += 1;
    }

    info!(
        statements,
        cached = lookup.cache().len(),
        capacity,
        "batch complete"
    );
    Ok(0)
}

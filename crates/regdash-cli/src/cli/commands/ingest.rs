use super::open_store;
use crate::cli::args::IngestArgs;
use crate::exit_codes::EXIT_SUCCESS;
use anyhow::Context;
use regdash_core::{IngestHandler, WindowResolver};
use std::io::Read;

pub fn run(args: IngestArgs) -> anyhow::Result<i32> {
    let body = if args.input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(&args.input)
            .with_context(|| format!("failed to read {}", args.input.display()))?
    };

    let store = open_store(&args.common)?;
    let report = IngestHandler::new(&store, WindowResolver::lab()).ingest_json(&body)?;
    println!("Added {}, updated {}.", report.added, report.updated);
    Ok(EXIT_SUCCESS)
}

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, info};
use seag_romtools::{
    display_path, first_difference, init_logging, read_input, NodeSummary, Status,
};

/// Print the element tree of firmware container images.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Images to parse; `-` reads stdin.
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Print a JSON summary instead of the indented dump.
    #[arg(long)]
    json: bool,

    /// Re-encode each tree and compare it with the input.
    #[arg(long)]
    check: bool,

    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                Status::Usage.into()
            } else {
                Status::Ok.into()
            };
        }
    };
    init_logging(args.verbose);

    let mut status = Status::Ok;
    for path in &args.files {
        let data = match read_input(path) {
            Ok(data) => data,
            Err(err) => {
                // unreadable inputs are skipped, as with a missing file
                eprintln!("Error: {err:#}");
                continue;
            }
        };
        if let Err(err) = parse_one(&args, path, &data) {
            eprintln!("Error: {}: {err:#}", display_path(path));
            status = Status::Input;
        }
    }
    status.into()
}

fn parse_one(args: &Args, path: &Path, data: &[u8]) -> Result<()> {
    debug!("{}: {} bytes", display_path(path), data.len());
    let root = seag_rom::parse(data).context("failed to decode image")?;

    if args.json {
        let summary = NodeSummary::from_element(&root).to_json()?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", seag_rom::dump_tree(&root));
    }

    if args.check {
        let encoded = root.serialize();
        if let Some(at) = first_difference(&encoded, data) {
            bail!(
                "round trip differs at offset {at:#x} ({} bytes in, {} bytes out)",
                data.len(),
                encoded.len()
            );
        }
        info!("{}: round trip ok", display_path(path));
    }
    Ok(())
}

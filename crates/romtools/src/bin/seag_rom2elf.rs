use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use log::info;
use seag_image::{rom_to_elf, Codecs, ImageOptions};
use seag_romtools::{
    display_path, init_logging, read_input, write_output, FailWith, Failure, Status,
};

/// Convert a firmware container image into an ELF32 file with one loadable
/// segment per File.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Image to convert; `-` reads stdin.
    #[arg(value_name = "INPUTFILE")]
    input: PathBuf,

    /// Where to write the ELF; stdout when absent or `-`.
    #[arg(value_name = "OUTPUTFILE")]
    output: Option<PathBuf>,

    /// Fold overlapping segments together.
    #[arg(long)]
    merge_overlaps: bool,

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

    match run(&args) {
        Ok(()) => Status::Ok.into(),
        Err(failure) => failure.report(),
    }
}

fn run(args: &Args) -> Result<(), Failure> {
    let data = read_input(&args.input).fail_with(Status::Input)?;

    // no decompressors ship with the tool; packed payloads are carried raw
    let codecs = Codecs::new();
    let options = ImageOptions {
        merge_overlaps: args.merge_overlaps,
    };
    let elf = rom_to_elf(&data, &codecs, &options)
        .with_context(|| format!("failed to convert {}", display_path(&args.input)))
        .fail_with(Status::Convert)?;

    write_output(args.output.as_deref(), &elf).fail_with(Status::Output)?;
    info!("wrote {} bytes of ELF", elf.len());
    Ok(())
}

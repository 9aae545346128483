use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use refcompare::{compare_files, Verdict};
use log::info;

/// Tool for comparing numeric benchmark output against a reference result
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Reference file path
    #[clap(value_name = "REFERENCE")]
    reference: PathBuf,

    /// Candidate file path
    #[clap(value_name = "CANDIDATE")]
    candidate: PathBuf,

    /// Ignore newlines: compare both files as a single logical line
    #[clap(short = 'i', long)]
    ignore_newlines: bool,

    /// Report failures with the legacy per-kind exit codes (3-7) instead of 1
    #[clap(long)]
    granular_exit_codes: bool,
}

/// Maps a verdict to the process exit code for the selected scheme
fn exit_code(verdict: &Verdict, granular: bool) -> u8 {
    match verdict {
        Verdict::Match(_) => 0,
        Verdict::Mismatch(kind) if granular => kind.legacy_exit_code(),
        Verdict::Mismatch(_) => 1,
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    info!(
        "comparing {:?} against reference {:?} (ignore_newlines: {})",
        args.candidate, args.reference, args.ignore_newlines
    );

    match compare_files(&args.reference, &args.candidate, args.ignore_newlines) {
        Ok(verdict) => ExitCode::from(exit_code(&verdict, args.granular_exit_codes)),
        Err(e) => {
            println!("ERROR: {:#}", e);
            ExitCode::from(2)
        }
    }
}

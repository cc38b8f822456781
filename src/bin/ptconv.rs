//! Command-line conversion utility.
//!
//! Reads one document from standard input, converts it between two of the
//! registered formats, and writes the result to standard output:
//!
//! ```text
//! ptconv --from xml --to json < config.xml > config.json
//! ```
//!
//! Exit codes: `0` on success, `1` for a missing or unknown format and for
//! any decode/encode failure. Diagnostics go to standard error; standard
//! output carries nothing but the converted document.

use clap::Parser;
use ptconv::{convert_str, Format};
use std::io::Read;
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "ptconv",
    about = "Convert hierarchical configuration data between XML, JSON, INI, and INFO formats",
    version
)]
struct Cli {
    /// Source format (xml, json, ini, info)
    #[arg(short = 'f', long, value_name = "FORMAT")]
    from: Option<String>,

    /// Destination format (xml, json, ini, info)
    #[arg(short = 't', long, value_name = "FORMAT")]
    to: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("ptconv: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    // Resolve both formats before touching any input, so a bad format
    // name never partially consumes the stream.
    let from = cli.from.ok_or("no source format specified (--from)")?;
    let from = Format::resolve(&from).map_err(|e| e.to_string())?;
    let to = cli.to.ok_or("no destination format specified (--to)")?;
    let to = Format::resolve(&to).map_err(|e| e.to_string())?;
    debug!(%from, %to, "formats resolved");

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .map_err(|e| format!("reading standard input: {e}"))?;
    debug!(bytes = input.len(), "input read");

    let output = convert_str(from, to, &input).map_err(|e| e.to_string())?;
    debug!(bytes = output.len(), "conversion done");

    println!("{output}");
    Ok(())
}

#[macro_use]
extern crate clap;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Arg;

fn main() -> ExitCode {
    let matches = app_from_crate!()
        .arg(
            Arg::with_name("INPUT")
                .help("Assembly source file (.asm)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .value_name("OUTPUT")
                .help("Binary image output path (defaults to INPUT with a .bin extension)"),
        )
        .arg(
            Arg::with_name("source_map")
                .long("source-map")
                .takes_value(true)
                .value_name("PATH")
                .help("Write a source map alongside the image"),
        )
        .arg(
            Arg::with_name("debug")
                .short("d")
                .long("debug")
                .help("Emit debug-level tracing to stderr"),
        )
        .get_matches();

    let filter = if matches.is_present("debug") {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let input = Path::new(matches.value_of("INPUT").unwrap());
    let output = matches.value_of("output").map(PathBuf::from);
    let source_map_path = matches.value_of("source_map").map(PathBuf::from);

    match run(input, output, source_map_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(input: &Path, output: Option<PathBuf>, source_map_path: Option<PathBuf>) -> Result<()> {
    if input.extension().and_then(|e| e.to_str()) != Some("asm") {
        anyhow::bail!("expected a .asm input file, got {}", input.display());
    }

    let source = fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;

    let (bytes, source_map) =
        jasm_asm::assemble(&source).with_context(|| format!("assembling {}", input.display()))?;

    let output = output.unwrap_or_else(|| input.with_extension("bin"));
    fs::write(&output, &bytes).with_context(|| format!("writing {}", output.display()))?;

    if let Some(map_path) = source_map_path {
        let map_bytes = jasm_asm::write_source_map(&source_map);
        fs::write(&map_path, &map_bytes)
            .with_context(|| format!("writing {}", map_path.display()))?;
    }

    tracing::debug!(bytes = bytes.len(), output = %output.display(), "assembly complete");
    Ok(())
}

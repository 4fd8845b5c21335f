#[macro_use]
extern crate clap;

mod shell;

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Arg;

fn main() -> ExitCode {
    let matches = app_from_crate!()
        .arg(
            Arg::with_name("INPUT")
                .help("Binary image to load before entering the shell (.bin)")
                .required(false)
                .index(1),
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

    let input = matches.value_of("INPUT").map(Path::new);

    match run(input) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(input: Option<&Path>) -> Result<()> {
    let mut shell = shell::stdio_shell();

    if let Some(path) = input {
        let data =
            fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        shell
            .load_initial(&data)
            .with_context(|| format!("loading {}", path.display()))?;
        tracing::debug!(path = %path.display(), len = data.len(), "loaded image");
    }

    shell.run().context("running debug shell")?;
    Ok(())
}

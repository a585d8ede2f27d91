//! `pii-obfuscator` binary.
//!
//! Reads one invocation document from stdin, writes the redacted file to
//! stdout. Exit codes: 0 success, 1 pipeline failure (`{"status":400}` on
//! stdout), 2 invalid input (message on stderr).

use std::io::{self, Read, Write};
use std::process::ExitCode;

use anyhow::Context;

use pii_obfuscator::config::RuntimeConfig;
use pii_obfuscator::logging::init_logger;
use pii_obfuscator::{obfuscate, ObfuscationResponse};

fn run() -> anyhow::Result<ExitCode> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read invocation JSON from stdin")?;

    let config = RuntimeConfig::from_env();
    let fetcher = config.scheme_fetcher();

    let response = match obfuscate(&input, &fetcher) {
        Ok(response) => response,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(ExitCode::from(2));
        }
    };

    let mut stdout = io::stdout().lock();
    let code = match response {
        ObfuscationResponse::Redacted(cursor) => {
            stdout
                .write_all(cursor.get_ref())
                .context("failed to write redacted output")?;
            ExitCode::SUCCESS
        }
        ObfuscationResponse::Failed(failure) => {
            serde_json::to_writer(&mut stdout, &failure).context("failed to write failure result")?;
            writeln!(stdout)?;
            ExitCode::from(1)
        }
    };
    stdout.flush()?;

    Ok(code)
}

fn main() -> ExitCode {
    init_logger();

    match run() {
        Ok(code) => code,
        Err(e) => {
            log::error!("FATAL error={:#}", e);
            ExitCode::FAILURE
        }
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use text_extractor::cli::{execute, Cli, CliOutput};

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    match execute(&cli) {
        Ok(CliOutput::Success(json)) => {
            println!("{}", json);
            Ok(())
        }
        Ok(CliOutput::Failure(json)) => {
            println!("{}", json);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

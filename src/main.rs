use std::io;
use std::process::ExitCode;
use std::sync::{Arc, mpsc};

use anyhow::Context;
use clap::Parser;
use ws_console::{Config, ConnectionManager, ConsolePrinter, Output, run_session, signal};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::parse();

    // wss:// needs a process-wide crypto provider; a second install is harmless.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let output = Output::stdout();
    match run(config, &output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output.line(format!("Error: {:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config, output: &Output) -> anyhow::Result<()> {
    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    signal::spawn_interrupt_listener(shutdown_tx.clone())
        .context("failed to install interrupt handler")?;

    let manager = Arc::new(ConnectionManager::new(
        config,
        ConsolePrinter::new(output.clone()),
    ));
    output.line(format!("Connecting to {}...", manager.url()));

    let end = run_session(
        manager,
        io::BufReader::new(io::stdin()),
        output,
        shutdown_tx,
        shutdown_rx,
    )?;
    log::info!("Session ended: {:?}", end);
    Ok(())
}

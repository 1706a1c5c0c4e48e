use std::io;
use std::path::Path;

use anyhow::Context;

use frontdesk::{DeskConfig, FrontDesk, Shell};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "frontdesk=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let config = match std::env::var("FRONTDESK_CONFIG") {
        Ok(path) => DeskConfig::load(Path::new(&path))
            .with_context(|| format!("loading config from {path}"))?,
        Err(_) => DeskConfig::default(),
    };

    let desk = FrontDesk::open(config).context("opening the front-desk tables")?;

    let stdin = io::stdin();
    let mut shell = Shell::new(desk, stdin.lock(), io::stdout());
    shell.run().context("running the interactive shell")?;
    Ok(())
}

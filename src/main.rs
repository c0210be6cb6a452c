mod cli;
mod color;
mod config;
mod life;
mod pipeline;
mod render;
mod server;

use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Command, GifArgs};
use config::Config;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = Config::load_or_default();

    match cli.command {
        Command::Gif(args) => write_gif(&args, &config),
        Command::Serve(args) => server::run(&args.apply(config)),
    }
}

fn write_gif(args: &GifArgs, config: &Config) -> Result<()> {
    let request = args.to_request(config)?;
    match &args.out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut sink = BufWriter::new(file);
            pipeline::run(&request, &mut sink)?;
            sink.flush()?;
            log::info!("wrote {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            pipeline::run(&request, stdout.lock())?;
        }
    }
    Ok(())
}

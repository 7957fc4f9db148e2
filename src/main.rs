use clap::{Parser, Subcommand};
use squish::config::{self, Config};
use squish::imaging::{self, Quality, RustBackend};
use squish::output;
use squish::session::{Session, SessionEvent, SessionOptions};
use squish::types::SourceImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "squish")]
#[command(about = "Shrink PNG and JPEG images with a single quality dial")]
#[command(long_about = "\
Shrink PNG and JPEG images with a single quality dial

Quality runs from 0 (smallest) to 100 (best). Below 80 the output is always
JPEG. PNG sources are also downscaled so their pixel count shrinks in
proportion to quality:

  holiday.png  1000x1000  @ 50  →  holiday_compressed.jpg  707x707
  photo.jpg    4000x3000  @ 30  →  photo_compressed.jpg    4000x3000

`squish tune` reads quality values from stdin, one per line, and recompresses
after each quiet period. The final result is saved when input ends.

Run 'squish gen-config' to generate a documented squish.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing squish.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compress an image once and save the result
    Compress {
        input: PathBuf,
        /// Quality percent, 0-100 (defaults to compression.quality)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=100))]
        quality: Option<u32>,
        /// Directory the compressed file is written to
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show type, dimensions and size of an image
    Inspect { input: PathBuf },
    /// Interactively tune quality from stdin, saving the final result
    Tune {
        input: PathBuf,
        /// Directory the compressed file is written to
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
    /// Print a stock squish.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Compress {
            input,
            quality,
            output: out_dir,
            json,
        } => {
            let config = config::load_config(&cli.config_dir)?;
            let backend = RustBackend::new();
            let source = SourceImage::open(&backend, &input, config.compression.max_pixels)?;
            let quality =
                Quality::from_percent(quality.unwrap_or(config.compression.quality));

            let image = imaging::compress(
                &backend,
                &source,
                quality,
                config.compression.resize_filter,
            )?;
            let saved = image.save(&source, &out_dir)?;

            if json {
                let report = output::CompressionReport::new(&source, &image, Some(&saved));
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_compress_output(&source, &image, Some(&saved));
            }
        }
        Command::Inspect { input } => {
            let config = config::load_config(&cli.config_dir)?;
            let source =
                SourceImage::open(&RustBackend::new(), &input, config.compression.max_pixels)?;
            output::print_inspect_output(&source);
        }
        Command::Tune {
            input,
            output: out_dir,
        } => {
            let config = config::load_config(&cli.config_dir)?;
            tune(&config, &input, &out_dir).await?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Run a session fed by stdin until EOF, then save whatever is on display.
async fn tune(
    config: &Config,
    input: &Path,
    out_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let backend = Arc::new(RustBackend::new());
    let source = SourceImage::open(backend.as_ref(), input, config.compression.max_pixels)?;
    output::print_inspect_output(&source);

    let (mut session, mut events) = Session::new(backend, SessionOptions::from_config(config));
    session.load(source);

    // Last request that produced a result or a failure. Once it matches the
    // session's latest request there is nothing left to wait for.
    let mut settled = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match line.parse::<u32>() {
                    Ok(percent) if percent <= 100 => {
                        session.set_quality(Quality::from_percent(percent));
                    }
                    _ => log::warn!("ignoring {:?}: expected a quality between 0 and 100", line),
                }
            }
            Some(event) = events.recv() => {
                println!("{}", output::format_session_event(&event));
                if !matches!(event, SessionEvent::Discarded { .. }) {
                    settled = Some(event.request());
                }
            }
        }
    }

    // Input is done; wait for the last request to settle unless it already has.
    while settled != session.latest_request() {
        let Some(event) = events.recv().await else { break };
        println!("{}", output::format_session_event(&event));
        if !matches!(event, SessionEvent::Discarded { .. }) {
            settled = Some(event.request());
        }
    }

    match (session.source(), session.current()) {
        (Some(source), Some(image)) => {
            let saved = image.save(&source, out_dir)?;
            output::print_compress_output(&source, &image, Some(&saved));
        }
        _ => log::warn!("no compressed result to save"),
    }
    Ok(())
}

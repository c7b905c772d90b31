use std::{io::Read as _, path::PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "posterkit", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a poster set (cover, content pages, ending).
    Render(RenderArgs),
    /// Print how marked-up text wraps, one display line per output line.
    Wrap(WrapArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Poster config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Render request JSON (title, texts, overrides).
    #[arg(long)]
    request: PathBuf,

    /// Seed for overlay randomness; wins over any seed in the config or request.
    #[arg(long)]
    seed: Option<u64>,

    /// Output root; the poster set is written to `<out>/<title>/`.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct WrapArgs {
    /// Visible characters per line.
    #[arg(long)]
    chars: usize,

    /// Text to wrap.
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,

    /// Read the text from a file. With neither `--text` nor `--file`, stdin is read.
    #[arg(long)]
    file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Wrap(args) => cmd_wrap(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = posterkit::PosterConfig::from_path(&args.config)?;
    let mut request = posterkit::RenderRequest::from_path(&args.request)?;
    if let Some(out) = args.out {
        request.overrides.output_dir = Some(out);
    }

    let result = posterkit::render_posters(&config, &request, args.seed)?;
    for path in &result.files {
        println!("{}", path.display());
    }
    Ok(())
}

fn cmd_wrap(args: WrapArgs) -> anyhow::Result<()> {
    let text = match (args.text, args.file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("read text '{}'", path.display()))?,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read text from stdin")?;
            buf
        }
    };

    for line in posterkit::wrap(&text, args.chars) {
        println!("{line}");
    }
    Ok(())
}

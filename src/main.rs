//! linemark - highlight source text in the terminal
//!
//! Without a file argument the built-in GML demo text is shown.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{debug, warn};

use linemark::config::Config;
use linemark::error::Result;
use linemark::render::{format_spans, split_lines, Painter};
use linemark::syntax::builtin::DEMO_TEXT;
use linemark::syntax::{LanguageMode, ModeRegistry};

#[derive(Parser, Debug)]
#[command(name = "linemark", version, about = "Incremental syntax highlighting for the terminal")]
struct Cli {
    /// File to highlight (defaults to the built-in demo)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Language mode, overriding detection by extension
    #[arg(short, long, value_name = "NAME")]
    mode: Option<String>,

    /// Style profile of the selected mode
    #[arg(short, long, value_name = "NAME")]
    profile: Option<String>,

    /// Directory of extra TOML language definitions
    #[arg(long, value_name = "DIR")]
    languages_dir: Option<PathBuf>,

    /// List available modes and their profiles, then exit
    #[arg(long)]
    list_modes: bool,

    /// Prefix lines with their numbers
    #[arg(short = 'n', long)]
    line_numbers: bool,

    /// Columns per tab stop
    #[arg(short, long, value_name = "COLS", value_parser = clap::value_parser!(u16).range(1..=16))]
    tab_width: Option<u16>,

    /// Print the classified spans instead of painting
    #[arg(long)]
    spans: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load();

    let mut registry = ModeRegistry::new();
    if let Some(dir) = cli.languages_dir.as_ref().or(config.languages_dir.as_ref()) {
        let loaded = registry.load_dir(dir)?;
        debug!("loaded {} language file(s) from {}", loaded, dir.display());
    }

    if cli.list_modes {
        for name in registry.names() {
            let mode = registry.require(name)?;
            println!(
                "{} [{}]: {}",
                name,
                mode.extensions().join(", "),
                mode.profiles().names().join(", ")
            );
        }
        return Ok(());
    }

    let text = match &cli.file {
        Some(path) => fs::read_to_string(path)?,
        None => DEMO_TEXT.to_string(),
    };

    let mode = select_mode(&registry, &cli)?;
    let mut profiles = mode.profiles().clone();
    match (&cli.profile, &config.profile) {
        (Some(name), _) => profiles.select(name)?,
        (None, Some(name)) => {
            if let Err(e) = profiles.select(name) {
                warn!("{} (mode {} keeps profile {})", e, mode.name(), profiles.active().name());
            }
        }
        (None, None) => {}
    }

    let lines = split_lines(&text);
    let mut marker = mode.marker();
    let tokens = marker.scan_all(&lines);

    if cli.spans {
        print!("{}", format_spans(mode.rules(), &lines, tokens));
        return Ok(());
    }

    let tab_width = cli.tab_width.map(usize::from).unwrap_or(config.tab_width);
    let painter = Painter::new(&profiles)
        .with_tab_width(tab_width)
        .with_line_numbers(cli.line_numbers || config.show_line_numbers);
    painter.paint(&mut io::stdout().lock(), &lines, tokens)
}

/// Pick the mode: explicit name, then file extension, then GML
fn select_mode<'a>(registry: &'a ModeRegistry, cli: &Cli) -> Result<&'a LanguageMode> {
    if let Some(name) = &cli.mode {
        return registry.require(name);
    }
    if let Some(mode) = cli.file.as_deref().and_then(|path| registry.detect(path)) {
        return Ok(mode);
    }
    registry.require("GML")
}

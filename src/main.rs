mod config;
mod diff;
mod error;
mod input;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::PathBuf;

use config::{
    ColorChoice, Colors, Config, HighlightMode, OutputFormat, ThemeMode, TotalWidth, WrapMode,
    DEFAULT_CONTEXT_LINES, DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_TAB_WIDTH,
};
use diff::tokenize::tokenize;
use render::{AnsiWriter, JsonWriter, Layout, RowWriter};

/// pdiff - Pretty side-by-side diff
#[derive(Parser, Debug)]
#[command(name = "pdiff")]
#[command(author, version, about, long_about = None)]
#[command(override_usage = "pdiff [OPTIONS] [--] <LEFT_FILE> <RIGHT_FILE>")]
struct Args {
    /// Old file, shown in the left pane
    #[arg(value_name = "LEFT_FILE")]
    left: PathBuf,

    /// New file, shown in the right pane
    #[arg(value_name = "RIGHT_FILE")]
    right: PathBuf,

    /// Highlight background instead of foreground (default)
    #[arg(short = 'b', long, overrides_with = "no_background")]
    background: bool,

    /// Highlight foreground instead of background
    #[arg(long, overrides_with = "background")]
    no_background: bool,

    /// Show line number columns (default)
    #[arg(short = 'l', long, overrides_with = "no_line_numbers")]
    line_numbers: bool,

    /// Hide line number columns
    #[arg(long, overrides_with = "line_numbers")]
    no_line_numbers: bool,

    /// Show sign columns (default)
    #[arg(short = 's', long, overrides_with = "no_signs")]
    signs: bool,

    /// Hide sign columns
    #[arg(long, overrides_with = "signs")]
    no_signs: bool,

    /// Expand tabs to N-column tab stops, 0 keeps tabs
    #[arg(
        short = 't',
        long = "expand-tabs",
        value_name = "N",
        default_value_t = DEFAULT_TAB_WIDTH
    )]
    tab_size: usize,

    /// Show N lines of context
    #[arg(
        short = 'U',
        long = "unified",
        value_name = "N",
        default_value_t = DEFAULT_CONTEXT_LINES
    )]
    context: usize,

    /// Show the whole file as context
    #[arg(short = 'W', long)]
    whole_file: bool,

    /// Fit output to N columns (default: autodetect)
    #[arg(short = 'w', long, value_name = "N")]
    width: Option<usize>,

    /// Cut long lines at the pane edge instead of wrapping them
    #[arg(long)]
    truncate: bool,

    /// Minimum similarity (0 to 1) for highlighting changes within a line
    #[arg(long, value_name = "RATIO", default_value_t = DEFAULT_SIMILARITY_THRESHOLD)]
    similarity: f64,

    /// When to use colors
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Ansi)]
    format: OutputFormat,
}

/// Resolve a `--flag` / `--no-flag` pair
fn flag(on: bool, off: bool, default: bool) -> bool {
    if on {
        true
    } else if off {
        false
    } else {
        default
    }
}

impl Args {
    fn config(&self, width: usize, theme: ThemeMode) -> Config {
        Config {
            context_lines: if self.whole_file { usize::MAX } else { self.context },
            tab_width: self.tab_size,
            width,
            line_numbers: flag(self.line_numbers, self.no_line_numbers, true),
            signs: flag(self.signs, self.no_signs, true),
            highlight: if flag(self.background, self.no_background, true) {
                HighlightMode::Background
            } else {
                HighlightMode::Foreground
            },
            wrap: if self.truncate {
                WrapMode::Truncate
            } else {
                WrapMode::Wrap
            },
            similarity_threshold: self.similarity,
            colors: Colors::for_theme(theme),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let width = args.width.map_or(TotalWidth::Auto, TotalWidth::Columns).resolve();
    let config = args.config(width, ThemeMode::detect());

    let stdout = io::stdout();
    let color = args.color.enabled(stdout.is_terminal());
    let out = BufWriter::new(stdout.lock());

    match run(&args, &config, out, color) {
        Err(e) if is_broken_pipe(&e) => Ok(()),
        other => other,
    }
}

/// Compare the two files named in `args` and write the rows to `out`
fn run(args: &Args, config: &Config, out: impl Write, color: bool) -> Result<()> {
    config.validate().map_err(error::Error::from)?;

    let old_text = input::read_text(&args.left)?;
    let new_text = input::read_text(&args.right)?;

    let old = tokenize(&old_text, config.tab_width);
    let new = tokenize(&new_text, config.tab_width);
    let hunks =
        diff::align_documents(&old, &new, config.context_lines, config.similarity_threshold);
    log::debug!(
        "{} hunks between {} and {}",
        hunks.len(),
        args.left.display(),
        args.right.display()
    );

    let layout = Layout::new(config, &hunks).map_err(error::Error::from)?;
    let rows = layout.render(
        &args.left.display().to_string(),
        &args.right.display().to_string(),
        &hunks,
    );

    match args.format {
        OutputFormat::Ansi => {
            AnsiWriter::new(out, layout, config.colors.clone(), config.highlight, color)
                .write_all_rows(&rows)
        }
        OutputFormat::Json => JsonWriter::new(out).write_all_rows(&rows),
    }
    .context("Failed to write output")
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(|e| e.kind() == io::ErrorKind::BrokenPipe)
}

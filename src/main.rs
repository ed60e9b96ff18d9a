//! textinput - edit a file in a full-screen terminal text input.
//!
//! # Usage
//!
//! ```bash
//! textinput query.sql
//! textinput --format json --max-popup-height 8 data.txt
//! textinput --no-mouse --save notes.md
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use textinput::app::App;
use textinput::config::{
    ConfigFlags, DEFAULT_MAX_POPUP_HEIGHT, ThemeMode, clear_config_flags, editors_config_path,
    global_config_path, load_config_flags, load_editor_impls, local_override_path,
    save_config_flags,
};
use textinput::external_editor::ExternalEditor;
use textinput::highlight::{HighlightBackground, TextFormat, set_background_mode};

/// A multi-line terminal text input with completion and external editing
#[derive(Parser, Debug)]
#[command(name = "textinput", version, about, long_about = None)]
struct Cli {
    /// File to edit (created on first save if missing)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Highlighting format (guessed from the extension by default)
    #[arg(long, value_enum)]
    format: Option<TextFormat>,

    /// Maximum number of rows a popup may use
    #[arg(long, value_name = "ROWS", value_parser = clap::value_parser!(u16).range(1..))]
    max_popup_height: Option<u16>,

    /// Force syntax highlight theme background (light or dark)
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,

    /// Write log events to a file
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,

    /// Do not capture the mouse
    #[arg(long)]
    no_mouse: bool,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

impl Cli {
    /// The flags given on this command line, in saveable form.
    fn flags(&self) -> ConfigFlags {
        ConfigFlags {
            no_mouse: self.no_mouse,
            format: self.format,
            max_popup_height: self.max_popup_height.map(usize::from),
            theme: self.theme,
            log: self.log.clone(),
        }
    }
}

fn init_logging(log: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    match log {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = cli.flags();

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log.as_deref())?;
    tracing::debug!(?effective, "effective flags");

    match effective.theme.unwrap_or(ThemeMode::Auto) {
        ThemeMode::Auto => set_background_mode(None),
        ThemeMode::Light => set_background_mode(Some(HighlightBackground::Light)),
        ThemeMode::Dark => set_background_mode(Some(HighlightBackground::Dark)),
    }

    let editors = load_editor_impls(&editors_config_path())?;
    ExternalEditor::install(editors);

    let mut app = App::new(cli.file)
        .with_max_popup_height(
            effective
                .max_popup_height
                .unwrap_or(DEFAULT_MAX_POPUP_HEIGHT),
        )
        .with_mouse(!effective.no_mouse);
    if let Some(format) = effective.format {
        app = app.with_format(format);
    }

    app.run().context("Application error")
}

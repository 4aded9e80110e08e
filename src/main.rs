use std::io::Write;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::Serialize;

use syntax_storage::cli::{CliArgs, OutputFormat};
use syntax_storage::config::StorageConfig;
use syntax_storage::syntax::{LanguageId, TreeSitterEngine};
use syntax_storage::theme::{self, Theme, ThemeSource};
use syntax_storage::{AttributeSet, TextStorage};

fn main() -> Result<()> {
    syntax_storage::tracing::init();

    let args = CliArgs::parse();

    if args.list_themes {
        for info in theme::list_available_themes() {
            let source = match info.source {
                ThemeSource::User => "user",
                ThemeSource::Builtin => "builtin",
            };
            println!("{:<20} {:<24} ({})", info.id, info.name, source);
        }
        return Ok(());
    }

    if args.list_languages {
        for lang in LanguageId::HIGHLIGHTED {
            println!("{:<10} {}", lang.name(), lang.display_name());
        }
        return Ok(());
    }

    let config = StorageConfig::load();
    let path = args
        .file_path()
        .ok_or_else(|| anyhow!("No input file given"))?;
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let theme_id = args.theme.as_deref().unwrap_or(&config.theme);
    let theme = theme::load_theme(theme_id).map_err(|e| anyhow!(e))?;
    let language = args
        .resolve_language(config.default_language())
        .map_err(|e| anyhow!(e))?;

    tracing::info!(
        "Highlighting {} as {:?} with theme {}",
        path.display(),
        language,
        theme.name
    );

    let engine = Arc::new(TreeSitterEngine::new(theme.clone()));
    let mut storage = TextStorage::with_mode(engine, config.execution);
    storage.replace_characters(0..0, &text)?;
    storage.set_language(language);

    if !storage.wait_for_idle(config.idle_timeout()) {
        tracing::warn!(
            "Highlighting did not settle within {:?}; output may be partially styled",
            config.idle_timeout()
        );
    }
    tracing::debug!("Highlight stats: {:?}", storage.stats());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Ansi => write_ansi(&mut out, &storage, &theme)?,
        OutputFormat::Json => write_json(&mut out, &storage)?,
        OutputFormat::Plain => write_plain(&mut out, &storage)?,
    }
    out.flush()?;

    Ok(())
}

fn write_ansi(out: &mut impl Write, storage: &TextStorage, theme: &Theme) -> Result<()> {
    let buffer = storage.buffer();
    for (range, attributes) in buffer.runs() {
        let text = buffer.substring(range).unwrap_or_default();
        write!(out, "{}{}\x1b[0m", ansi_prefix(attributes, theme), text)?;
    }
    Ok(())
}

fn ansi_prefix(attributes: &AttributeSet, theme: &Theme) -> String {
    let fg = attributes.foreground().unwrap_or(theme.foreground);
    let mut prefix = format!("\x1b[38;2;{};{};{}m", fg.r, fg.g, fg.b);
    if let Some(bg) = attributes.background() {
        prefix.push_str(&format!("\x1b[48;2;{};{};{}m", bg.r, bg.g, bg.b));
    }
    if attributes.contains(&syntax_storage::Attribute::Bold) {
        prefix.push_str("\x1b[1m");
    }
    if attributes.contains(&syntax_storage::Attribute::Italic) {
        prefix.push_str("\x1b[3m");
    }
    if attributes.contains(&syntax_storage::Attribute::Underline) {
        prefix.push_str("\x1b[4m");
    }
    prefix
}

#[derive(Serialize)]
struct RunOutput<'a> {
    start: usize,
    end: usize,
    text: String,
    attributes: &'a AttributeSet,
}

fn write_json(out: &mut impl Write, storage: &TextStorage) -> Result<()> {
    let buffer = storage.buffer();
    let runs: Vec<RunOutput<'_>> = buffer
        .runs()
        .map(|(range, attributes)| RunOutput {
            start: range.start,
            end: range.end,
            text: buffer.substring(range).unwrap_or_default(),
            attributes,
        })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &runs)?;
    writeln!(out)?;
    Ok(())
}

fn write_plain(out: &mut impl Write, storage: &TextStorage) -> Result<()> {
    let buffer = storage.buffer();
    for (range, attributes) in buffer.runs() {
        let class = attributes.token().unwrap_or("-");
        writeln!(out, "{:>6}..{:<6} {}", range.start, range.end, class)?;
    }
    Ok(())
}

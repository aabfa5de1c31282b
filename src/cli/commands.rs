use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use trouble_tags::error::Result;
use trouble_tags::host::{EventBus, FileWatcher, FsHost, PanelView};
use trouble_tags::panel::{PanelBody, PanelContent};
use trouble_tags::plugin::{TroubleTagsPlugin, TOGGLE_COMMAND_ID};
use trouble_tags::scanner::scan;
use trouble_tags::PanelConfig;

#[derive(Parser)]
#[command(name = "trouble-tags")]
#[command(about = "List #TODO/#FIXME/#BUG/#NOTE/#WARN markers of a document")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Print the tags of a note
    trouble-tags scan notes/today.md

    # Same, as JSON
    trouble-tags scan notes/today.md --format json

    # Keep a live panel in the terminal while editing
    trouble-tags watch notes/today.md
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a YAML panel configuration
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a document once and print its tags
    Scan {
        /// Document to scan
        file: PathBuf,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show the tag panel for a document and refresh it as the file changes
    Watch {
        /// Document to track
        file: PathBuf,

        /// Disable colored labels
        #[arg(long)]
        no_color: bool,
    },
}

pub fn load_config(path: Option<&Path>) -> Result<PanelConfig> {
    match path {
        Some(path) => PanelConfig::load(path),
        None => Ok(PanelConfig::default()),
    }
}

pub fn scan_file(file: &Path, format: &str) -> Result<()> {
    let text = std::fs::read_to_string(file)?;
    let hits = scan(&text);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    if hits.is_empty() {
        println!("No tags found");
        return Ok(());
    }

    for hit in &hits {
        println!("{:<6}{:<7}{}", hit.kind, hit.position_label(), hit.context);
    }
    Ok(())
}

/// Panel view that redraws into the terminal
pub struct TerminalView {
    color: bool,
}

impl TerminalView {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn format(&self, content: &PanelContent) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(name) = &content.filename {
            lines.push(name.clone());
        }

        match &content.body {
            PanelBody::Empty(message) => lines.push(message.to_string()),
            PanelBody::Rows(rows) => {
                for row in rows {
                    let label = if self.color {
                        format!("\x1b[{}m{:<6}\x1b[0m", row.style.ansi, row.style.label)
                    } else {
                        format!("{:<6}", row.style.label)
                    };
                    lines.push(format!("{}{:<7}{}", label, row.position, row.context));
                }
            }
        }

        lines
    }
}

impl PanelView for TerminalView {
    fn render(&mut self, content: &PanelContent) {
        let mut out = std::io::stdout().lock();
        if self.color {
            let _ = write!(out, "\x1b[2J\x1b[H");
        } else {
            let _ = writeln!(out, "---");
        }
        for line in self.format(content) {
            let _ = writeln!(out, "{}", line);
        }
        let _ = out.flush();
    }
}

pub async fn watch_file(file: &Path, config: PanelConfig, color: bool) -> Result<()> {
    let host = Arc::new(FsHost::new());
    let canonical = host.open(file)?;

    let events = EventBus::new();
    let _watcher = FileWatcher::new(&canonical, events.clone())?;

    let mut plugin = TroubleTagsPlugin::new(host, events.clone(), config, move || {
        TerminalView::new(color)
    });
    plugin.run_command(TOGGLE_COMMAND_ID).await?;

    tokio::signal::ctrl_c().await?;

    plugin.close_panel().await?;
    Ok(())
}

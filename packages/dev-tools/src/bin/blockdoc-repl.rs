//! Terminal REPL for the Blockdoc editor
//!
//! Drives an `EditorSession` from stdin so the keyboard state machine, the
//! debounced commits and the outline projection can be exercised without a
//! browser. Debounce timers keep running between commands; a commit is
//! reported as soon as its quiet period elapses.
//!
//! # Usage
//!
//! ```bash
//! # Start with the sample "API Documentation v2.1" document
//! cargo run --bin blockdoc-repl
//!
//! # Seed from a JSON block array or a markdown file
//! cargo run --bin blockdoc-repl -- --seed docs/guide.md
//!
//! # Load editor settings from a JSON file
//! cargo run --bin blockdoc-repl -- --config editor.json
//! ```
//!
//! `BLOCKDOC_DEBOUNCE_MS` and `BLOCKDOC_STRICT_REFERENCES` override the
//! configuration; `RUST_LOG` controls log output (default `info`).

use anyhow::{anyhow, bail, Context, Result};
use blockdoc_core::config::EditorConfig;
use blockdoc_core::editor::{
    CaretPosition, DueCommit, EditorEvent, EditorSession, EditorSurface, Key, KeyEvent,
    MenuAnchor, MenuItem, TargetRect,
};
use blockdoc_core::models::{seed, BlockId, Document};
use blockdoc_core::utils::{from_markdown, to_markdown};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Height of one rendered block row, used to synthesise key target rects
const ROW_HEIGHT: f64 = 24.0;
const ROW_WIDTH: f64 = 640.0;

const HELP: &str = "\
Commands:
  focus <id>               focus a block
  type <id> <text>         replace the block's text (\\n separates list items)
  key <id> <key> [shift]   press a key (enter, backspace, /, ...)
  menu                     open the insertion menu from the \"Add a block\" button
  pick <item>              choose text | heading | code | callout
  dismiss                  close the menu
  outline [id]             print the outline, or jump to a heading
  stats                    block, heading and code block counts
  show                     list blocks with their ids
  md | json                print the document
  publish                  flush drafts and publish
  help                     show this message
  quit                     flush drafts and exit";

/// Surface that reports focus and publish requests on stdout
#[derive(Debug, Default)]
struct TerminalSurface {
    focused: Option<BlockId>,
}

impl EditorSurface for TerminalSurface {
    fn focus(&mut self, id: &BlockId) {
        self.focused = Some(id.clone());
    }

    fn set_caret(&mut self, id: &BlockId, position: CaretPosition) {
        let at = match position {
            CaretPosition::Start => "start",
            CaretPosition::End => "end",
        };
        println!("  -> focus {} (caret at {})", id, at);
    }

    fn publish(&mut self, document: &Document) {
        println!("  -> publish intent for {} block(s)", document.len());
    }
}

struct Args {
    seed: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        seed: None,
        config: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--seed" => {
                args.seed = Some(iter.next().context("--seed requires a path")?.into());
            }
            "--config" => {
                args.config = Some(iter.next().context("--config requires a path")?.into());
            }
            "-h" | "--help" => {
                println!("Usage: blockdoc-repl [--seed <file.json|file.md>] [--config <file.json>]");
                std::process::exit(0);
            }
            other => bail!("unknown argument '{}'", other),
        }
    }
    Ok(args)
}

fn load_seed(path: &Path) -> Result<Document> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file {}", path.display()))?;

    let document = match path.extension().and_then(|ext| ext.to_str()) {
        Some("md") | Some("markdown") => from_markdown(&contents)?,
        _ => Document::from_json(&contents)
            .with_context(|| format!("failed to parse seed file {}", path.display()))?,
    };
    Ok(document)
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    let config = match path {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?
            .with_env_overrides()?,
        None => EditorConfig::from_env()?,
    };
    Ok(config)
}

/// What the loop woke up for
enum Step {
    Line(Option<String>),
    Commit(DueCommit),
}

/// Whether the loop should keep reading commands
enum Flow {
    Continue,
    Quit,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let config = load_config(args.config.as_deref())?;
    let document = match &args.seed {
        Some(path) => load_seed(path)?,
        None => seed::api_documentation(),
    };

    tracing::info!(
        "Starting blockdoc-repl with {} block(s), debounce {}ms",
        document.len(),
        config.debounce_ms
    );

    let mut session = EditorSession::new(document, config, TerminalSurface::default());
    println!("{}\n", HELP);
    print_blocks(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let step = tokio::select! {
            line = lines.next_line() => Step::Line(line?),
            Some(due) = session.next_commit() => Step::Commit(due),
        };

        match step {
            Step::Commit(due) => {
                let id = due.id.clone();
                if session.commit(due)?.handled {
                    println!("  -> committed block {}", id);
                }
            }
            Step::Line(None) => break,
            Step::Line(Some(line)) => match run_command(&mut session, line.trim()) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(err) => println!("error: {:#}", err),
            },
        }
    }

    session.shutdown()?;
    tracing::info!("Editor closed");
    Ok(())
}

fn run_command(session: &mut EditorSession<TerminalSurface>, line: &str) -> Result<Flow> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match command {
        "" => {}
        "help" => println!("{}", HELP),
        "quit" | "exit" => return Ok(Flow::Quit),
        "focus" => {
            session.dispatch(EditorEvent::Focused(block_arg(rest)?))?;
        }
        "type" => {
            let (id, text) = rest.split_once(' ').unwrap_or((rest, ""));
            let id = block_arg(id)?;
            session.dispatch(EditorEvent::Focused(id.clone()))?;
            session.dispatch(EditorEvent::Input {
                id,
                text: text.replace("\\n", "\n"),
            })?;
        }
        "key" => press_key(session, rest)?,
        "menu" => {
            let rows = session.state().document().len() as f64;
            session.dispatch(EditorEvent::AddBlockRequested {
                anchor: MenuAnchor::new(0.0, rows * ROW_HEIGHT + ROW_HEIGHT),
            })?;
            print_menu();
        }
        "pick" => {
            let item: MenuItem = rest.parse().map_err(|err: String| anyhow!(err))?;
            session.dispatch(EditorEvent::MenuItemSelected(item))?;
            print_blocks(session);
        }
        "dismiss" => {
            session.dispatch(EditorEvent::MenuDismissed)?;
        }
        "outline" if !rest.is_empty() => {
            session.dispatch(EditorEvent::OutlineSelected(block_arg(rest)?))?;
        }
        "outline" => {
            for entry in session.state().outline() {
                let indent = "  ".repeat(usize::from(entry.level.saturating_sub(1)));
                println!("{}{} [{}]", indent, entry.text, entry.id);
            }
        }
        "stats" => {
            let stats = session.state().stats();
            println!(
                "{} blocks, {} headings, {} code blocks",
                stats.blocks, stats.headings, stats.code_blocks
            );
        }
        "show" => print_blocks(session),
        "md" => print!("{}", to_markdown(session.state().document())),
        "json" => println!("{}", serde_json::to_string_pretty(session.state().document())?),
        "publish" => {
            session.dispatch(EditorEvent::PublishRequested)?;
        }
        other => bail!("unknown command '{}' (try 'help')", other),
    }
    Ok(Flow::Continue)
}

fn press_key(session: &mut EditorSession<TerminalSurface>, rest: &str) -> Result<()> {
    let mut parts = rest.split_whitespace();
    let id = block_arg(parts.next().unwrap_or(""))?;
    let name = parts.next().context("usage: key <id> <key> [shift]")?;
    let key = Key::from_name(name).with_context(|| format!("unknown key '{}'", name))?;
    let shift = parts.any(|part| part == "shift");

    let state = session.state();
    let is_empty = state
        .visible_text(&id)
        .map(|text| text.is_empty())
        .unwrap_or(false);
    let row = state.document().position(&id).unwrap_or(0) as f64;
    let rect = TargetRect {
        left: 0.0,
        top: row * ROW_HEIGHT,
        width: ROW_WIDTH,
        height: ROW_HEIGHT,
    };

    let mut event = KeyEvent::new(key).with_empty(is_empty).at(rect);
    if shift {
        event = event.with_shift();
    }

    let before = session.state().document().len();
    let transition = session.dispatch(EditorEvent::Key { id, event })?;

    if let Some(rejection) = &transition.rejection {
        println!("  -> rejected: {}", rejection);
    } else if !transition.handled {
        println!("  -> not handled by the editor");
    }
    if session.state().menu().is_open() {
        print_menu();
    }
    if session.state().document().len() != before {
        print_blocks(session);
    }
    Ok(())
}

fn block_arg(raw: &str) -> Result<BlockId> {
    if raw.is_empty() {
        bail!("missing block id");
    }
    Ok(BlockId::new(raw))
}

fn print_menu() {
    println!("  Insert block:");
    for item in MenuItem::ALL {
        println!("    {:<10} {}", item.title(), item.description());
    }
}

fn print_blocks(session: &EditorSession<TerminalSurface>) {
    let state = session.state();
    let focused = session.surface().focused.as_ref().or(state.focus());

    for block in state.document() {
        let marker = if Some(block.id()) == focused { ">" } else { " " };
        let text = state.visible_text(block.id()).unwrap_or_default();
        let pending = if state.draft(block.id()).is_some() { "*" } else { "" };
        println!(
            "{} {:<38} {:<8} {}{}",
            marker,
            block.id().as_str(),
            block.block_type().tag(),
            text.replace('\n', " | "),
            pending
        );
    }
}

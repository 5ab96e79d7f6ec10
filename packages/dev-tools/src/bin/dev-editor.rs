//! Headless Editor Driver
//!
//! Opens a page from a local libsql database, replays a JSON script of editor
//! events against it through the headless renderer, and prints the resulting
//! page as JSON. Useful for reproducing editing bugs without a UI.
//!
//! # Usage
//!
//! ```bash
//! # Edit the start page with a script file
//! cargo run --bin dev-editor -- start script.json
//!
//! # Script from stdin
//! echo '[{"type":"input","text":"Hi"},{"type":"key","key":"Enter"}]' | cargo run --bin dev-editor
//! ```
//!
//! # Script format
//!
//! A JSON array of events, applied in order with a `settle_frame` after each:
//!
//! ```json
//! [
//!   {"type": "click", "index": 0},
//!   {"type": "caret", "anchor": 2},
//!   {"type": "key", "key": "Enter"},
//!   {"type": "key", "key": {"Character": "x"}},
//!   {"type": "input", "text": "/image"},
//!   {"type": "upload", "index": 0, "path": "cat.png", "mimeType": "image/png"}
//! ]
//! ```
//!
//! # Environment Variables
//!
//! - `PAGEBLOCKS_CONFIG`: Path of a JSON `EditorConfig` (default: built-in defaults)
//! - `PAGEBLOCKS_DB`: libsql database path (default: `pageblocks-dev.db`)
//! - `PAGEBLOCKS_ASSETS`: Directory for uploaded images (default: `assets`)
//! - `PAGEBLOCKS_USER`: User id the pages belong to (default: `local`)
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use pageblocks_core::db::{ImageFile, LibsqlPageStore, LocalAssetStore, StaticIdentity};
use pageblocks_core::editor::{EditorSession, KeyResponse, NodeHandle};
use pageblocks_core::services::{load_initial_page, PageState};
use pageblocks_core::{EditorConfig, Key};
use serde::Deserialize;
use tokio::io::AsyncReadExt;

/// One scripted host event
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
enum ScriptEvent {
    Key {
        key: Key,
    },
    Input {
        text: String,
    },
    Click {
        index: usize,
    },
    /// Select in the focused block; `focus` defaults to `anchor`
    Caret {
        anchor: usize,
        focus: Option<usize>,
    },
    Command {
        entry: usize,
    },
    TitleEnter,
    AppendParagraph,
    Title {
        title: String,
    },
    Cover {
        cover: String,
    },
    Reorder {
        moved_id: String,
        target_id: String,
    },
    Emoji {
        index: usize,
        emoji: String,
    },
    Caption {
        node_id: String,
        caption: String,
    },
    Upload {
        index: usize,
        path: PathBuf,
        mime_type: String,
    },
}

async fn apply(
    session: &mut EditorSession,
    event: ScriptEvent,
) -> anyhow::Result<Option<KeyResponse>> {
    match event {
        ScriptEvent::Key { key } => return Ok(Some(session.handle_key(key).await?)),
        ScriptEvent::Input { text } => session.handle_input(&text)?,
        ScriptEvent::Click { index } => session.click(index),
        ScriptEvent::Caret { anchor, focus } => {
            let index = session
                .focused_index()
                .ok_or_else(|| anyhow::anyhow!("No block has focus"))?;
            let handle = session
                .registry()
                .get(index)
                .ok_or_else(|| anyhow::anyhow!("No block rendered at {}", index))?;
            handle.select(anchor, focus.unwrap_or(anchor));
        }
        ScriptEvent::Command { entry } => {
            return Ok(Some(session.select_command(entry).await?));
        }
        ScriptEvent::TitleEnter => {
            session.title_enter()?;
        }
        ScriptEvent::AppendParagraph => {
            session.append_paragraph()?;
        }
        ScriptEvent::Title { title } => {
            session.set_title(title)?;
        }
        ScriptEvent::Cover { cover } => {
            session.set_cover_image(cover)?;
        }
        ScriptEvent::Reorder {
            moved_id,
            target_id,
        } => {
            session.reorder(&moved_id, &target_id)?;
        }
        ScriptEvent::Emoji { index, emoji } => {
            session.set_emoji(index, emoji).await?;
        }
        ScriptEvent::Caption { node_id, caption } => {
            session.update_caption(&node_id, caption).await?;
        }
        ScriptEvent::Upload {
            index,
            path,
            mime_type,
        } => {
            let bytes = tokio::fs::read(&path).await?;
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            session
                .upload_image(index, Some(ImageFile::new(name, mime_type, bytes)))
                .await?;
        }
    }
    Ok(None)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let slug = args.next().unwrap_or_default();
    let script_path = args.next();

    let config = match env::var("PAGEBLOCKS_CONFIG") {
        Ok(path) => EditorConfig::from_json_file(&path).map_err(anyhow::Error::msg)?,
        Err(_) => EditorConfig::default(),
    };
    let db_path = env::var("PAGEBLOCKS_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("pageblocks-dev.db"));
    let assets_dir = env::var("PAGEBLOCKS_ASSETS")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("assets"));
    let user = env::var("PAGEBLOCKS_USER").unwrap_or_else(|_| "local".to_string());

    tracing::info!("Database: {}", db_path.display());
    tracing::info!("Assets: {}", assets_dir.display());

    let identity = Arc::new(StaticIdentity::user(user));
    let store = Arc::new(LibsqlPageStore::new(db_path, identity.clone(), config.clone()).await?);
    let page = load_initial_page(store.as_ref(), identity.as_ref(), &slug, &config).await?;

    let state = PageState::new(page, store, &config);
    let mut session = EditorSession::new(state, Arc::new(LocalAssetStore::new(assets_dir)));

    let script = match script_path {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin().read_to_string(&mut buffer).await?;
            buffer
        }
    };
    let events: Vec<ScriptEvent> = serde_json::from_str(&script)?;
    tracing::info!("Replaying {} events", events.len());

    for (step, event) in events.into_iter().enumerate() {
        match apply(&mut session, event).await {
            Ok(Some(response)) => {
                tracing::info!("Step {}: {}", step, serde_json::to_string(&response)?)
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Step {} failed: {}", step, e),
        }
        session.settle_frame();
    }

    let page = session.page();
    let stats = session.shutdown().await;
    tracing::info!(
        "Persisted {} snapshots ({} failed, {} superseded)",
        stats.persisted,
        stats.failed,
        stats.superseded
    );

    println!("{}", serde_json::to_string_pretty(page.as_ref())?);
    Ok(())
}

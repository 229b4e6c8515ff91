// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot subcommand handlers and their plain-text rendering.

use std::path::PathBuf;

use colored::Colorize;
use hive_agent::uploads::prepare_attachments;
use hive_agent::{HiveApp, SendRequest};
use hive_core::HiveError;
use hive_core::types::{ChatAttachment, ChatMessage, Feedback, KnowledgeBase, ModelTier, SharedInsight};

use crate::files::read_pending;

/// Options of a single chat turn from the command line.
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    pub reasoning: bool,
    pub web_search: bool,
    pub attach: Vec<PathBuf>,
}

pub async fn user_register(app: &HiveApp, username: &str) -> Result<(), HiveError> {
    let user = app.register(username).await?;
    println!("registered {} ({})", user.username.bold(), user.id);
    Ok(())
}

pub async fn user_login(app: &HiveApp, username: &str) -> Result<(), HiveError> {
    let user = app.login(username).await?;
    println!("{} ({})", user.username.bold(), user.id);
    Ok(())
}

pub async fn kb_list(app: &HiveApp) -> Result<(), HiveError> {
    let kbs = app.knowledge_bases().await;
    if kbs.is_empty() {
        println!("{}", "no knowledge bases".dimmed());
    }
    for kb in &kbs {
        println!("{}", render_knowledge_base(kb));
    }
    Ok(())
}

pub async fn kb_create(app: &HiveApp, name: &str) -> Result<(), HiveError> {
    let kb = app.create_knowledge_base(name).await?;
    println!("created {} ({})", kb.name.bold(), kb.id);
    Ok(())
}

pub async fn kb_delete(app: &HiveApp, kb_id: &str) -> Result<(), HiveError> {
    if app.delete_knowledge_base(kb_id).await? {
        println!("deleted {kb_id}");
    } else {
        println!("{}", format!("no knowledge base {kb_id}").dimmed());
    }
    Ok(())
}

pub async fn kb_files(app: &HiveApp, kb_id: &str) -> Result<(), HiveError> {
    let kb = app
        .knowledge_base(kb_id)
        .await
        .ok_or_else(|| HiveError::not_found("knowledge base", kb_id))?;
    if kb.files.is_empty() {
        println!("{}", "no files".dimmed());
    }
    for file in &kb.files {
        println!("{}  {}  {}  {} bytes", file.id, file.name, file.media_type, file.size);
    }
    Ok(())
}

/// Add files from disk. Oversized files are reported and skipped.
pub async fn kb_add(app: &HiveApp, kb_id: &str, paths: &[PathBuf]) -> Result<(), HiveError> {
    let mut pending = Vec::with_capacity(paths.len());
    for path in paths {
        pending.push(read_pending(path).await?);
    }
    let batch = app.add_files(kb_id, pending).await?;
    for file in &batch.accepted {
        println!("added {} ({})", file.name, file.id);
    }
    report_rejected(&batch.rejected);
    Ok(())
}

pub async fn kb_remove(app: &HiveApp, kb_id: &str, file_id: &str) -> Result<(), HiveError> {
    let kb = app.remove_file(kb_id, file_id).await?;
    println!("removed {file_id}; {} files left", kb.files.len());
    Ok(())
}

/// Read attachment paths and size-check them against the attachment ceiling.
///
/// Oversized files are reported and left out; the rest are returned.
pub async fn load_attachments(
    app: &HiveApp,
    paths: &[PathBuf],
) -> Result<Vec<ChatAttachment>, HiveError> {
    let mut pending = Vec::with_capacity(paths.len());
    for path in paths {
        pending.push(read_pending(path).await?);
    }
    let batch = prepare_attachments(pending, app.config().uploads.max_attachment_bytes);
    report_rejected(&batch.rejected);
    Ok(batch.accepted)
}

/// Print one line per file that was left out for size.
pub fn report_rejected(rejected: &[HiveError]) {
    for err in rejected {
        eprintln!("{}: {err}", "skipped".yellow());
    }
}

pub fn send_request(text: &str, attachments: Vec<ChatAttachment>, reasoning: bool, web_search: bool) -> SendRequest {
    let tier = if reasoning {
        ModelTier::Reasoning
    } else {
        ModelTier::Fast
    };
    SendRequest::text(text)
        .with_attachments(attachments)
        .with_tier(tier)
        .with_web_search(web_search)
}

pub async fn chat(
    app: &HiveApp,
    username: &str,
    kb_id: &str,
    text: &str,
    options: &ChatOptions,
) -> Result<(), HiveError> {
    let user = app.login(username).await?;
    let attachments = load_attachments(app, &options.attach).await?;
    let request = send_request(text, attachments, options.reasoning, options.web_search);
    let outcome = app.send(&user.id, kb_id, request).await?;
    report_rejected(&outcome.rejected);
    print_message(&outcome.answer);
    Ok(())
}

pub async fn history(app: &HiveApp, username: &str, kb_id: &str) -> Result<(), HiveError> {
    let user = app.login(username).await?;
    let turns = app.conversation(&user.id, kb_id).await;
    if turns.is_empty() {
        println!("{}", "no messages".dimmed());
    }
    for msg in &turns {
        print_message(msg);
    }
    Ok(())
}

pub async fn feedback(
    app: &HiveApp,
    username: &str,
    kb_id: &str,
    message_id: &str,
    tag: Feedback,
) -> Result<(), HiveError> {
    let user = app.login(username).await?;
    let outcome = app.feedback(&user.id, kb_id, message_id, tag).await?;
    println!("marked {message_id} {}", outcome.tag);
    if let Some(insight) = outcome.insight {
        println!("{}", format!("shared insight {} created", insight.id).green());
    }
    Ok(())
}

pub async fn insights(app: &HiveApp, limit: Option<usize>) -> Result<(), HiveError> {
    let insights = match limit {
        Some(n) => app.recent_insights(n).await,
        None => app.insights().await,
    };
    if insights.is_empty() {
        println!("{}", "no shared insights".dimmed());
    }
    for insight in &insights {
        println!("{}\n", render_insight(insight));
    }
    Ok(())
}

/// Store the API key, prompting without echo when none is given.
pub async fn set_api_key(app: &HiveApp, key: Option<String>) -> Result<(), HiveError> {
    let key = match key {
        Some(k) => k,
        None => {
            eprint!("Gemini API key: ");
            rpassword::read_password()
                .map_err(|e| HiveError::Internal(format!("failed to read API key: {e}")))?
        }
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(HiveError::Validation("API key must not be empty".into()));
    }
    app.settings().set_api_key(key).await?;
    println!("API key stored");
    Ok(())
}

/// Print a turn, with error turns in red on stderr.
pub fn print_message(msg: &ChatMessage) {
    let rendered = render_message(msg);
    if msg.is_error {
        eprintln!("{}", rendered.red());
    } else {
        println!("{rendered}");
    }
}

pub fn render_knowledge_base(kb: &KnowledgeBase) -> String {
    format!(
        "{}  {}  {} files, {} bytes",
        kb.id,
        kb.name,
        kb.files.len(),
        kb.total_bytes()
    )
}

/// `[role id] (feedback)` header, the text, then any attachments and sources.
pub fn render_message(msg: &ChatMessage) -> String {
    let mut out = format!("[{} {}]", msg.role, msg.id);
    if let Some(tag) = msg.feedback {
        out.push_str(&format!(" ({tag})"));
    }
    if msg.is_error {
        out.push_str(" error");
    }
    out.push('\n');
    out.push_str(&msg.text);
    if let Some(attachments) = &msg.attachments {
        for a in attachments {
            out.push_str(&format!("\n  attached: {} ({})", a.name, a.media_type));
        }
    }
    if let Some(citations) = &msg.citations {
        out.push_str("\n  sources:");
        for c in citations {
            out.push_str(&format!("\n  - {}: {}", c.source, c.context));
        }
    }
    out
}

pub fn render_insight(insight: &SharedInsight) -> String {
    format!("{} {}\n{}", insight.timestamp.format("%Y-%m-%d %H:%M"), insight.id, insight.content)
}

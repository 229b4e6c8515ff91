// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hive shell` command implementation.
//!
//! An interactive REPL holding one session: a logged-in user, a selected
//! knowledge base, the tier and web-search toggles, and attachments queued
//! for the next turn.

use std::path::PathBuf;

use colored::Colorize;
use hive_agent::HiveApp;
use hive_core::HiveError;
use hive_core::types::{ChatAttachment, Feedback, Role};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::commands::{
    load_attachments, print_message, render_knowledge_base, report_rejected, send_request,
};

/// One parsed line of shell input.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Quit,
    Help,
    ListKnowledgeBases,
    Use(String),
    History,
    ToggleReasoning,
    ToggleWeb,
    Attach(PathBuf),
    Feedback(Feedback, Option<String>),
    Message(String),
    Unknown(String),
    Empty,
}

/// Classify a line. Anything not starting with `/` is a message.
pub fn parse_line(line: &str) -> ShellCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ShellCommand::Empty;
    }
    let Some(command) = trimmed.strip_prefix('/') else {
        return ShellCommand::Message(trimmed.to_string());
    };
    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (command, None),
    };
    match (name, arg) {
        ("quit" | "exit", _) => ShellCommand::Quit,
        ("help", _) => ShellCommand::Help,
        ("kb", _) => ShellCommand::ListKnowledgeBases,
        ("use", Some(id)) => ShellCommand::Use(id.to_string()),
        ("history", _) => ShellCommand::History,
        ("reasoning", _) => ShellCommand::ToggleReasoning,
        ("web", _) => ShellCommand::ToggleWeb,
        ("attach", Some(path)) => ShellCommand::Attach(PathBuf::from(path)),
        ("up", id) => ShellCommand::Feedback(Feedback::Up, id.map(str::to_string)),
        ("down", id) => ShellCommand::Feedback(Feedback::Down, id.map(str::to_string)),
        _ => ShellCommand::Unknown(trimmed.to_string()),
    }
}

/// Toggles and queued attachments local to one shell.
#[derive(Debug, Default)]
struct ShellState {
    reasoning: bool,
    web_search: bool,
    pending: Vec<ChatAttachment>,
}

/// Runs the `hive shell` interactive REPL as `username`.
pub async fn run_shell(app: HiveApp, username: &str) -> Result<(), HiveError> {
    let user = app.login(username).await?;

    let mut rl = DefaultEditor::new()
        .map_err(|e| HiveError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "hive shell".bold().green());
    println!(
        "Logged in as {}. Type {} for commands, {} to exit.\n",
        user.username.bold(),
        "/help".yellow(),
        "/quit".yellow()
    );

    let mut state = ShellState::default();
    let prompt = format!("{}> ", "hive".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let command = parse_line(&line);
                match command {
                    ShellCommand::Quit => break,
                    ShellCommand::Empty => continue,
                    _ => {}
                }
                let _ = rl.add_history_entry(&line);

                if let Err(e) = handle_command(&app, &mut state, command).await {
                    eprintln!("{}: {e}", "error".red());
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                break;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                break;
            }
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    app.shutdown().await?;
    println!("{}", "goodbye".dimmed());
    Ok(())
}

async fn handle_command(
    app: &HiveApp,
    state: &mut ShellState,
    command: ShellCommand,
) -> Result<(), HiveError> {
    match command {
        ShellCommand::Quit | ShellCommand::Empty => {}
        ShellCommand::Help => print_help(),
        ShellCommand::ListKnowledgeBases => {
            let active = app.session().await.knowledge_base_id;
            for kb in app.knowledge_bases().await {
                let marker = if active.as_deref() == Some(kb.id.as_str()) { "*" } else { " " };
                println!("{marker} {}", render_knowledge_base(&kb));
            }
        }
        ShellCommand::Use(id) => {
            let kb = app.select_knowledge_base(&id).await?;
            println!("using {} ({} files)", kb.name.bold(), kb.files.len());
        }
        ShellCommand::History => {
            let (user_id, kb_id) = active_ids(app).await?;
            for msg in app.conversation(&user_id, &kb_id).await {
                print_message(&msg);
            }
        }
        ShellCommand::ToggleReasoning => {
            state.reasoning = !state.reasoning;
            let tier = if state.reasoning { "reasoning" } else { "fast" };
            println!("{}", format!("tier: {tier}").dimmed());
        }
        ShellCommand::ToggleWeb => {
            state.web_search = !state.web_search;
            let mode = if state.web_search { "on" } else { "off" };
            println!("{}", format!("web search: {mode}").dimmed());
        }
        ShellCommand::Attach(path) => {
            let mut loaded = load_attachments(app, &[path]).await?;
            for a in &loaded {
                println!("{}", format!("attached {} for the next message", a.name).dimmed());
            }
            state.pending.append(&mut loaded);
        }
        ShellCommand::Feedback(tag, id) => {
            let message_id = match id {
                Some(id) => id,
                None => last_model_turn(app).await?,
            };
            let outcome = app.feedback_active(&message_id, tag).await?;
            println!("{}", format!("marked {}", outcome.tag).dimmed());
            if outcome.insight.is_some() {
                println!("{}", "shared with the team".green());
            }
        }
        ShellCommand::Message(text) => {
            let attachments = std::mem::take(&mut state.pending);
            debug!(attachments = attachments.len(), "sending shell message");
            let request = send_request(&text, attachments, state.reasoning, state.web_search);
            let outcome = app.send_active(request).await?;
            report_rejected(&outcome.rejected);
            print_message(&outcome.answer);
        }
        ShellCommand::Unknown(line) => {
            eprintln!("{} {line}; try {}", "unknown command".yellow(), "/help".yellow());
        }
    }
    Ok(())
}

async fn active_ids(app: &HiveApp) -> Result<(String, String), HiveError> {
    let session = app.session().await;
    let user = session
        .user
        .ok_or_else(|| HiveError::Validation("no user is logged in".into()))?;
    let kb_id = session
        .knowledge_base_id
        .ok_or_else(|| HiveError::Validation("no knowledge base is selected; use /use <id>".into()))?;
    Ok((user.id, kb_id))
}

async fn last_model_turn(app: &HiveApp) -> Result<String, HiveError> {
    let (user_id, kb_id) = active_ids(app).await?;
    app.conversation(&user_id, &kb_id)
        .await
        .into_iter()
        .rev()
        .find(|m| m.role == Role::Model)
        .map(|m| m.id)
        .ok_or_else(|| HiveError::Validation("no answer to rate yet".into()))
}

fn print_help() {
    let rows = [
        ("/kb", "list knowledge bases"),
        ("/use <id>", "select a knowledge base"),
        ("/history", "show this conversation"),
        ("/reasoning", "toggle the reasoning tier"),
        ("/web", "toggle web search"),
        ("/attach <path>", "attach a file to the next message"),
        ("/up [id], /down [id]", "rate an answer (default: the latest)"),
        ("/quit", "exit"),
    ];
    for (cmd, what) in rows {
        println!("  {:<22} {what}", cmd.yellow());
    }
}

// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hive - a shared team knowledge layer over a generative model.
//!
//! This is the binary entry point for the `hive` command.

mod backend;
mod commands;
mod files;
mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use hive_core::HiveError;
use hive_core::types::Feedback;
use tracing_subscriber::EnvFilter;

use crate::backend::{BackendNeed, open_app};
use crate::commands::ChatOptions;

/// Hive - a shared team knowledge layer over a generative model.
#[derive(Parser, Debug)]
#[command(name = "hive", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Register or log in a user.
    #[command(subcommand)]
    User(UserCommand),
    /// Manage shared knowledge bases and their files.
    #[command(subcommand)]
    Kb(KbCommand),
    /// Ask one question in a knowledge base.
    Chat {
        #[arg(long)]
        user: String,
        #[arg(long)]
        kb: String,
        /// Use the reasoning tier instead of the fast tier.
        #[arg(long)]
        reasoning: bool,
        /// Let the model ground the answer with web search.
        #[arg(long)]
        web_search: bool,
        /// Attach a file to this turn only.
        #[arg(long = "attach", value_name = "PATH")]
        attach: Vec<PathBuf>,
        text: String,
    },
    /// Show a user's conversation in a knowledge base.
    History {
        #[arg(long)]
        user: String,
        #[arg(long)]
        kb: String,
    },
    /// Rate a model answer. Thumbs-up shares it as a team insight.
    Feedback {
        #[arg(long)]
        user: String,
        #[arg(long)]
        kb: String,
        message_id: String,
        #[arg(value_parser = parse_feedback)]
        tag: Feedback,
    },
    /// List shared insights, oldest first.
    Insights {
        /// Show only the most recent N.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Manage stored settings.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Launch an interactive REPL session.
    Shell {
        #[arg(long)]
        user: String,
    },
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Create a new user.
    Register { name: String },
    /// Check that a user exists.
    Login { name: String },
}

#[derive(Subcommand, Debug)]
enum KbCommand {
    /// List all knowledge bases.
    List,
    /// Create a knowledge base.
    Create { name: String },
    /// Delete a knowledge base.
    Delete { id: String },
    /// List the files in a knowledge base.
    Files { id: String },
    /// Upload files into a knowledge base.
    Add {
        id: String,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Remove one file from a knowledge base.
    Remove { id: String, file_id: String },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Store the Gemini API key. Prompts without echo when omitted.
    SetApiKey { key: Option<String> },
}

fn parse_feedback(s: &str) -> Result<Feedback, String> {
    s.parse::<Feedback>()
        .map_err(|_| format!("expected `up` or `down`, got `{s}`"))
}

impl Commands {
    fn backend_need(&self) -> BackendNeed {
        match self {
            Commands::Chat { .. } | Commands::Shell { .. } => BackendNeed::Required,
            _ => BackendNeed::Unused,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match hive_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            hive_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);

    let Some(command) = cli.command else {
        println!("hive: use --help for available commands");
        return;
    };

    if let Err(e) = run(config, command).await {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

async fn run(config: hive_config::HiveConfig, command: Commands) -> Result<(), HiveError> {
    let app = open_app(config, command.backend_need()).await?;

    match command {
        Commands::User(UserCommand::Register { name }) => commands::user_register(&app, &name).await?,
        Commands::User(UserCommand::Login { name }) => commands::user_login(&app, &name).await?,
        Commands::Kb(KbCommand::List) => commands::kb_list(&app).await?,
        Commands::Kb(KbCommand::Create { name }) => commands::kb_create(&app, &name).await?,
        Commands::Kb(KbCommand::Delete { id }) => commands::kb_delete(&app, &id).await?,
        Commands::Kb(KbCommand::Files { id }) => commands::kb_files(&app, &id).await?,
        Commands::Kb(KbCommand::Add { id, paths }) => commands::kb_add(&app, &id, &paths).await?,
        Commands::Kb(KbCommand::Remove { id, file_id }) => {
            commands::kb_remove(&app, &id, &file_id).await?
        }
        Commands::Chat {
            user,
            kb,
            reasoning,
            web_search,
            attach,
            text,
        } => {
            let options = ChatOptions {
                reasoning,
                web_search,
                attach,
            };
            commands::chat(&app, &user, &kb, &text, &options).await?
        }
        Commands::History { user, kb } => commands::history(&app, &user, &kb).await?,
        Commands::Feedback {
            user,
            kb,
            message_id,
            tag,
        } => commands::feedback(&app, &user, &kb, &message_id, tag).await?,
        Commands::Insights { limit } => commands::insights(&app, limit).await?,
        Commands::Config(ConfigCommand::SetApiKey { key }) => {
            commands::set_api_key(&app, key).await?
        }
        Commands::Shell { user } => return shell::run_shell(app, &user).await,
    }

    app.shutdown().await
}

/// Initialize the tracing subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hive={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

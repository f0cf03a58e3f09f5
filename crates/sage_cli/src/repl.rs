use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use sage_core::{Phase, SageConfig};
use sage_gateway::CompletionGateway;
use sage_reasoning::session_store::{JsonFileSessionStore, SessionStore};
use sage_reasoning::{HttpGatewayClient, RemoteCompletion, ReplySource, Resolver, RuleEngine, SubmitError};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Where remote replies come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A gateway reachable at `resolver.gateway_url`.
    Http,
    /// A gateway built in-process from the `[llm]` config.
    Embedded,
    /// No gateway at all.
    Local,
}

fn session_file(config: &SageConfig) -> PathBuf {
    config.resolver.session_file.clone().unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sage")
            .join("sessions.json")
    })
}

fn remote_for(config: &SageConfig, target: Target) -> Result<Option<Arc<dyn RemoteCompletion>>> {
    let timeout = Duration::from_secs(config.resolver.remote_timeout_secs);
    let remote: Arc<dyn RemoteCompletion> = match target {
        Target::Local => return Ok(None),
        Target::Embedded => Arc::new(CompletionGateway::from_config(&config.llm)?),
        Target::Http => Arc::new(HttpGatewayClient::new(
            &config.resolver.gateway_url,
            timeout,
        )?),
    };
    Ok(Some(remote))
}

pub async fn run(config: &SageConfig, target: Target, session_id: &str) -> Result<()> {
    let store: Arc<dyn SessionStore> = Arc::new(JsonFileSessionStore::new(session_file(config)));
    let resolver = Resolver::new(remote_for(config, target)?, RuleEngine::new())
        .with_timeout(Duration::from_secs(config.resolver.remote_timeout_secs))
        .with_store(store, session_id);

    if let Err(e) = resolver.restore().await {
        warn!("Could not restore session '{}': {}", session_id, e);
    }

    if config.resolver.probe_on_start || target == Target::Local {
        info!("Checking gateway...");
        match resolver.probe().await {
            Phase::Local => println!("Sage (offline mode). Type 'quit' to exit."),
            _ => println!("Sage online. Type 'quit' to exit."),
        }
    } else {
        println!("Sage ready. Type 'quit' to exit.");
    }

    let mut editor = DefaultEditor::new()?;
    loop {
        let line = match editor.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let trimmed = line.trim();
        if trimmed == "quit" || trimmed == "exit" {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(trimmed);

        match resolver.submit(trimmed).await {
            Ok(reply) => {
                let tag = match reply.source {
                    ReplySource::Remote => "",
                    ReplySource::Local => " (offline)",
                };
                println!("\nSage{}: {}\n", tag, reply.text);
            }
            Err(SubmitError::Empty) => continue,
            Err(e) => {
                error!("Submit failed: {}", e);
                println!("\n[System Error]: {}\n", e);
            }
        }
    }

    Ok(())
}

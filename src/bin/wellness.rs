//! Wellness CLI - Command-line interface for the wellness engine
//!
//! Commands:
//! - risk: Score a symptom selection
//! - report: Build a wellness report from JSON logs and symptom history
//! - alert: Evaluate the health alert for one user
//! - conditions: Search the condition table
//! - chat: Decode a captured chat completion stream

use async_trait::async_trait;
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use wellness_engine::alert::{CooldownStore, JsonFileCooldownStore, MemoryCooldownStore};
use wellness_engine::chat::{assemble, ChatStreamDecoder, StreamEvent};
use wellness_engine::store::{MemoryLogStore, MemorySymptomHistory, SymptomHistoryStore};
use wellness_engine::symptoms::conditions;
use wellness_engine::types::{LifestyleLog, SymptomCheck};
use wellness_engine::{
    report_from_json, AlertDelivery, AlertOutcome, AlertPayload, Collaborators, EngineConfig,
    EngineError, SymptomAssessor, UserProfile, WellnessProcessor, ENGINE_VERSION,
};

/// Wellness - symptom risk, lifestyle scores and health alerts
#[derive(Parser)]
#[command(name = "wellness")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Score symptoms and lifestyle logs into wellness reports", long_about = None)]
struct Cli {
    /// Engine configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a symptom selection
    Risk {
        /// Comma-separated symptom IDs, e.g. fever,cough
        #[arg(short, long, value_delimiter = ',', required = true)]
        symptoms: Vec<String>,
    },

    /// Build a wellness report envelope
    Report {
        /// JSON array of lifestyle logs
        #[arg(short, long)]
        logs: PathBuf,

        /// JSON array of symptom checks
        #[arg(long)]
        history: Option<PathBuf>,
    },

    /// Evaluate the health alert and send it when due
    Alert {
        /// JSON array of lifestyle logs
        #[arg(short, long)]
        logs: PathBuf,

        /// JSON array of symptom checks
        #[arg(long)]
        history: Option<PathBuf>,

        /// Alert recipient
        #[arg(short, long)]
        email: String,

        /// Recipient's full name
        #[arg(short, long)]
        name: Option<String>,

        /// User ID the cooldown marker is stored under
        #[arg(long, default_value_t = Uuid::nil())]
        user: Uuid,

        /// File holding cooldown markers between runs
        #[arg(long)]
        cooldown_file: Option<PathBuf>,

        /// Do not persist the cooldown marker
        #[arg(long)]
        dry_run: bool,
    },

    /// Search the condition table (lists featured conditions without a query)
    Conditions {
        query: Option<String>,
    },

    /// Decode a captured chat completion stream
    Chat {
        /// Stream capture (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string()));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), WellnessCliError> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Risk { symptoms } => cmd_risk(symptoms),

        Commands::Report { logs, history } => cmd_report(&logs, history.as_deref(), &config),

        Commands::Alert {
            logs,
            history,
            email,
            name,
            user,
            cooldown_file,
            dry_run,
        } => {
            let mut profile = UserProfile::new(email);
            profile.full_name = name;
            cmd_alert(
                &logs,
                history.as_deref(),
                profile,
                user,
                cooldown_file.as_deref(),
                dry_run,
                config,
            )
        }

        Commands::Conditions { query } => cmd_conditions(query.as_deref()),

        Commands::Chat { input } => cmd_chat(&input),
    }
}

fn cmd_risk(symptoms: Vec<String>) -> Result<(), WellnessCliError> {
    let symptoms: Vec<String> = symptoms
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let assessment = runtime.block_on(SymptomAssessor::offline().assess(&symptoms, None))?;

    print_json(&assessment)
}

fn cmd_report(
    logs: &Path,
    history: Option<&Path>,
    config: &EngineConfig,
) -> Result<(), WellnessCliError> {
    let logs_json = read_input(logs)?;
    let history_json = history.map(read_input).transpose()?;

    let envelope = report_from_json(&logs_json, history_json.as_deref(), config)?;
    println!("{}", envelope);
    Ok(())
}

/// Holds the payload instead of mailing it; the CLI has no mail transport
#[derive(Default)]
struct OutboxDelivery {
    outbox: Mutex<Option<AlertPayload>>,
}

impl OutboxDelivery {
    fn take(&self) -> Option<AlertPayload> {
        self.outbox.lock().ok().and_then(|mut outbox| outbox.take())
    }
}

#[async_trait]
impl AlertDelivery for OutboxDelivery {
    async fn deliver(&self, payload: &AlertPayload) -> Result<(), EngineError> {
        let mut outbox = self
            .outbox
            .lock()
            .map_err(|_| EngineError::DeliveryError("outbox lock poisoned".to_string()))?;
        *outbox = Some(payload.clone());
        Ok(())
    }
}

#[derive(Serialize)]
struct AlertRunOutput {
    user: Uuid,
    #[serde(flatten)]
    outcome: AlertOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<AlertPayload>,
}

fn cmd_alert(
    logs: &Path,
    history: Option<&Path>,
    profile: UserProfile,
    user: Uuid,
    cooldown_file: Option<&Path>,
    dry_run: bool,
    config: EngineConfig,
) -> Result<(), WellnessCliError> {
    let logs: Vec<LifestyleLog> = serde_json::from_str(&read_input(logs)?)?;
    let history: Vec<SymptomCheck> = match history {
        Some(path) => serde_json::from_str(&read_input(path)?)?,
        None => Vec::new(),
    };

    let cooldown: Arc<dyn CooldownStore> = match cooldown_file {
        Some(path) if !dry_run => Arc::new(JsonFileCooldownStore::new(path)),
        Some(path) => {
            // Dry runs honour an existing marker without writing a new one
            let store = MemoryCooldownStore::new();
            if let Some(sent_at) = JsonFileCooldownStore::new(path).load(user)? {
                store.save(user, sent_at)?;
            }
            Arc::new(store)
        }
        None => Arc::new(MemoryCooldownStore::new()),
    };

    let delivery = Arc::new(OutboxDelivery::default());
    let history_store = Arc::new(MemorySymptomHistory::new());
    for check in history.into_iter().filter(|c| !c.symptoms.is_empty()) {
        history_store.append_check(user, check)?;
    }

    let processor = WellnessProcessor::new(
        user,
        profile,
        config,
        Collaborators {
            logs: Arc::new(MemoryLogStore::new()),
            history: history_store,
            delivery: delivery.clone(),
            cooldown,
            analysis: None,
        },
    )?;
    for log in logs {
        processor.log_day(log)?;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let outcome = runtime.block_on(processor.evaluate_alert(Utc::now()))?;

    print_json(&AlertRunOutput {
        user,
        outcome,
        payload: delivery.take(),
    })
}

fn cmd_conditions(query: Option<&str>) -> Result<(), WellnessCliError> {
    let matches: Vec<&conditions::Condition> = match query {
        Some(q) => conditions::search(q),
        None => conditions::featured().iter().collect(),
    };
    print_json(&matches)
}

#[derive(Serialize)]
struct ChatOutput {
    text: String,
    done: bool,
    malformed_lines: usize,
}

fn cmd_chat(input: &Path) -> Result<(), WellnessCliError> {
    let mut raw = Vec::new();
    if input.as_os_str() == "-" {
        io::stdin().read_to_end(&mut raw)?;
    } else {
        raw = fs::read(input)?;
    }

    let mut decoder = ChatStreamDecoder::new();
    let mut events = decoder.push_bytes(&raw);
    events.extend(decoder.finish());

    let malformed_lines = events
        .iter()
        .filter(|e| matches!(e, StreamEvent::Malformed(_)))
        .count();

    print_json(&ChatOutput {
        text: assemble(&events),
        done: decoder.is_done(),
        malformed_lines,
    })
}

fn read_input(path: &Path) -> Result<String, WellnessCliError> {
    if path.as_os_str() == "-" {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content)?;
        Ok(content)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

/// Pretty JSON for terminals, compact JSON for pipes
fn print_json<T: Serialize>(value: &T) -> Result<(), WellnessCliError> {
    let json = if atty::is(atty::Stream::Stdout) {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum WellnessCliError {
    Io(io::Error),
    Json(serde_json::Error),
    Engine(EngineError),
}

impl From<io::Error> for WellnessCliError {
    fn from(e: io::Error) -> Self {
        WellnessCliError::Io(e)
    }
}

impl From<serde_json::Error> for WellnessCliError {
    fn from(e: serde_json::Error) -> Self {
        WellnessCliError::Json(e)
    }
}

impl From<EngineError> for WellnessCliError {
    fn from(e: EngineError) -> Self {
        WellnessCliError::Engine(e)
    }
}

#[derive(Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<WellnessCliError> for CliError {
    fn from(e: WellnessCliError) -> Self {
        match e {
            WellnessCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            WellnessCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            WellnessCliError::Engine(e) => {
                let (code, hint) = match &e {
                    EngineError::EmptySymptomSet => {
                        ("EMPTY_SYMPTOMS", "Pass at least one symptom ID")
                    }
                    EngineError::JsonError(_) => ("JSON_ERROR", "Check JSON syntax"),
                    EngineError::InvalidInput(_) => {
                        ("INVALID_INPUT", "Check log values are within their ranges")
                    }
                    EngineError::InvalidConfig(_) => {
                        ("INVALID_CONFIG", "Check the --config file")
                    }
                    EngineError::PersistenceError(_) => {
                        ("PERSISTENCE_ERROR", "Check the --cooldown-file path")
                    }
                    _ => ("ENGINE_ERROR", "Re-run with RUST_LOG=debug for details"),
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
        }
    }
}

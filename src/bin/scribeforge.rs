//! The `scribeforge` CLI: `process`, `batch`, `dry-run`, `status`, and
//! `config show|create` over the library's closed Extract-Plan-Execute-
//! Validate-Audit loop.
use clap::{Parser, Subcommand};
use scribeforge::auditor::RunStatus;
use scribeforge::config::PipelineConfig;
use scribeforge::localisation::LocalisationTables;
use scribeforge::orchestrator;
use scribeforge::planner::HttpModelClient;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "scribeforge", about = "Closed-loop, auditable DOCX transformation")]
struct Cli {
    /// Path to a JSON or YAML pipeline configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline against a single document.
    Process { docx: PathBuf, intent: String },
    /// Iterate every `*.docx` in a directory, running the full pipeline on each.
    Batch { dir: PathBuf, intent: String },
    /// Run Extractor + Planner only; write `plan.v1.json`, do not execute.
    DryRun { docx: PathBuf, intent: String },
    /// Print environment diagnostics.
    Status,
    /// Inspect or scaffold a pipeline configuration file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the configuration at `path`, or the defaults if `path` is omitted.
    Show {
        path: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Write a template configuration to `path`.
    Create { path: PathBuf },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("config error: {}", e);
            return ExitCode::from(1);
        },
    };

    match cli.command {
        Command::Process { docx, intent } => run_process(&docx, &intent, &config),
        Command::Batch { dir, intent } => run_batch(&dir, &intent, &config),
        Command::DryRun { docx, intent } => run_dry_run(&docx, &intent, &config),
        Command::Status => run_status(&config),
        Command::Config { action } => run_config(action),
    }
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig, scribeforge::PipelineError> {
    match path {
        Some(path) => PipelineConfig::load_from_path(path),
        None => Ok(PipelineConfig::default()),
    }
}

fn status_to_exit_code(status: RunStatus) -> ExitCode {
    match status {
        RunStatus::Success => ExitCode::from(0),
        RunStatus::FailedValidation => ExitCode::from(2),
        RunStatus::Rollback => ExitCode::from(3),
        RunStatus::InvalidPlan => ExitCode::from(4),
    }
}

fn build_client(config: &PipelineConfig) -> HttpModelClient {
    HttpModelClient::new(
        "https://api.openai.com/v1/chat/completions",
        config.model_id.clone(),
        config.temperature,
    )
}

fn run_process(docx: &Path, intent: &str, config: &PipelineConfig) -> ExitCode {
    let client = build_client(config);
    let localisation = LocalisationTables::with_builtin_defaults();
    match orchestrator::process_document(docx, intent, config, &client, &localisation) {
        Ok(outcome) => {
            println!("status: {}", outcome.status.as_str());
            println!("audit directory: {}", outcome.audit_directory.display());
            if let Some(output) = &outcome.output_path {
                println!("output: {}", output.display());
            }
            for warning in &outcome.warnings {
                eprintln!("warning: {}", warning.to_log_line());
            }
            for error in &outcome.errors {
                eprintln!("error: {}", error);
            }
            status_to_exit_code(outcome.status)
        },
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(1)
        },
    }
}

fn run_batch(dir: &Path, intent: &str, config: &PipelineConfig) -> ExitCode {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("error: reading {}: {}", dir.display(), e);
            return ExitCode::from(1);
        },
    };

    let client = build_client(config);
    let localisation = LocalisationTables::with_builtin_defaults();
    let mut summary_lines = Vec::new();
    let mut worst = RunStatus::Success;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "docx") {
            continue;
        }
        match orchestrator::process_document(&path, intent, config, &client, &localisation) {
            Ok(outcome) => {
                summary_lines.push(format!("{}: {}", path.display(), outcome.status.as_str()));
                if outcome.status != RunStatus::Success {
                    worst = outcome.status;
                }
            },
            Err(e) => {
                summary_lines.push(format!("{}: ERROR ({})", path.display(), e));
                worst = RunStatus::Rollback;
            },
        }
    }

    let summary_path = Path::new(&config.audit_dir).join("batch_summary.txt");
    if let Some(parent) = summary_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = std::fs::write(&summary_path, summary_lines.join("\n")) {
        eprintln!("warning: could not write batch summary: {}", e);
    }
    for line in &summary_lines {
        println!("{}", line);
    }

    status_to_exit_code(worst)
}

fn run_dry_run(docx: &Path, intent: &str, config: &PipelineConfig) -> ExitCode {
    let client = build_client(config);
    match orchestrator::plan_only(docx, intent, config, &client) {
        Ok(outcome) => {
            println!("audit directory: {}", outcome.audit_directory.display());
            status_to_exit_code(outcome.status)
        },
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(1)
        },
    }
}

fn run_status(config: &PipelineConfig) -> ExitCode {
    println!("model_id: {}", config.model_id);
    println!("audit_dir: {}", config.audit_dir);
    println!("monitoring_level: {:?}", config.monitoring_level);
    let api_key_present = std::env::var("OPENAI_API_KEY").is_ok();
    println!("OPENAI_API_KEY set: {}", api_key_present);
    match std::fs::metadata(&config.audit_dir) {
        Ok(_) => println!("audit directory reachable: yes"),
        Err(_) => println!("audit directory reachable: will be created on first run"),
    }
    ExitCode::from(0)
}

fn run_config(action: ConfigAction) -> ExitCode {
    match action {
        ConfigAction::Show { path, json } => {
            let config = match path {
                Some(path) => match PipelineConfig::load_from_path(&path) {
                    Ok(config) => config,
                    Err(e) => {
                        eprintln!("config error: {}", e);
                        return ExitCode::from(1);
                    },
                },
                None => PipelineConfig::default(),
            };
            let rendered = if json { config.to_json_pretty() } else { config.to_yaml() };
            match rendered {
                Ok(text) => {
                    println!("{}", text);
                    ExitCode::from(0)
                },
                Err(e) => {
                    eprintln!("error: {}", e);
                    ExitCode::from(1)
                },
            }
        },
        ConfigAction::Create { path } => {
            let config = PipelineConfig::default();
            match config.to_yaml() {
                Ok(text) => match std::fs::write(&path, text) {
                    Ok(()) => {
                        println!("wrote {}", path.display());
                        ExitCode::from(0)
                    },
                    Err(e) => {
                        eprintln!("error: writing {}: {}", path.display(), e);
                        ExitCode::from(1)
                    },
                },
                Err(e) => {
                    eprintln!("error: {}", e);
                    ExitCode::from(1)
                },
            }
        },
    }
}

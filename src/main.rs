/// Version injected at compile time via GCE_TRANSLATE_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("GCE_TRANSLATE_VERSION") {
    Some(v) => v,
    None => "dev",
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gce_translate::config::Config;
use gce_translate::gcp::client::GcpClient;
use gce_translate::gcp::compute::Instance;
use gce_translate::gcp::http::format_gcp_error;
use gce_translate::resolver::SelfLinkResolver;
use gce_translate::resource::drift;
use gce_translate::resource::registry::{canonicalize_scope, get_all_scope_aliases};
use gce_translate::resource::{InstanceConfig, InstanceState};
use gce_translate::translate::presence::ForceSend;
use gce_translate::translate::{expand_instance, flatten_instance};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Translate Compute Engine instance declarations to and from API shapes
#[derive(Parser, Debug)]
#[command(name = "gce-translate", version, about, long_about = None)]
struct Args {
    /// Default project for short resource names
    #[arg(short, long, global = true)]
    project: Option<String>,

    /// Default region for short subnetwork names
    #[arg(short, long, global = true)]
    region: Option<String>,

    /// Zone of the instance to fetch
    #[arg(short, long, global = true)]
    zone: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Expand a declarative instance file into a Compute API request body
    Expand {
        /// YAML or JSON instance declaration
        file: PathBuf,
    },
    /// Flatten a Compute API instance response into declarative YAML
    Flatten {
        /// JSON instance response
        file: PathBuf,
    },
    /// Report drift between a declaration and an instance response
    Diff {
        /// YAML or JSON instance declaration
        config: PathBuf,
        /// JSON instance response
        response: PathBuf,
    },
    /// Fetch a live instance and print it flattened, or diff it against a declaration
    Fetch {
        /// Instance name
        instance: String,
        /// Declaration to compare the live instance against
        #[arg(long)]
        against: Option<PathBuf>,
    },
    /// List the scope aliases accepted in service_account.scopes
    Scopes,
    /// Save the given --project, --region and --zone as defaults
    Defaults,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Cannot open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("gce-translate {} started with log level: {:?}", VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("gce-translate").join("gce-translate.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".gce-translate").join("gce-translate.log");
    }
    PathBuf::from("gce-translate.log")
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    // CLI > config file > gcloud defaults
    let config = Config::load();
    let project = args
        .project
        .clone()
        .unwrap_or_else(|| config.effective_project());
    let zone = args.zone.clone().unwrap_or_else(|| config.effective_zone());
    let region = args
        .region
        .clone()
        .unwrap_or_else(|| config.effective_region());

    tracing::info!("Using project: {}, region: {}, zone: {}", project, region, zone);
    let resolver = SelfLinkResolver::new(project.as_str(), region.as_str());

    match args.command {
        Command::Expand { file } => {
            let declared = InstanceConfig::load(&file)?;
            let request = expand_instance(&declared, &resolver)?;
            let force_send: Vec<&str> = request.scheduling.force_send_fields().iter().collect();
            tracing::debug!("scheduling force-send fields: {:?}", force_send);
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
        Command::Flatten { file } => {
            let response = load_instance(&file)?;
            let state = flatten_instance(&response, &resolver)?;
            print_state(&state)?;
        }
        Command::Diff { config, response } => {
            let declared = InstanceConfig::load(&config)?;
            let state = flatten_instance(&load_instance(&response)?, &resolver)?;
            return report_drift(&declared, &state);
        }
        Command::Fetch { instance, against } => {
            if project.is_empty() {
                return Err(anyhow::anyhow!(
                    "No GCP project configured. Set GOOGLE_CLOUD_PROJECT or use --project flag"
                ));
            }

            let client = GcpClient::new(&project, &zone).await?;
            let response = match client.get_instance(&instance).await {
                Ok(response) => response,
                Err(e) => {
                    eprintln!("Error: {}", format_gcp_error(&e));
                    return Err(e);
                }
            };
            let resolver = SelfLinkResolver::new(project.as_str(), client.get_region());
            let state = flatten_instance(&response, &resolver)?;

            match against {
                Some(path) => return report_drift(&InstanceConfig::load(&path)?, &state),
                None => print_state(&state)?,
            }
        }
        Command::Scopes => {
            for alias in get_all_scope_aliases() {
                println!("{:<20} {}", alias, canonicalize_scope(alias));
            }
        }
        Command::Defaults => {
            let mut saved = config.clone();
            if args.project.is_some() {
                saved.project_id = args.project.clone();
            }
            if args.region.is_some() {
                saved.region = args.region.clone();
            }
            if args.zone.is_some() {
                saved.zone = args.zone.clone();
            }
            saved.save().context("Failed to save defaults")?;
            match Config::config_path() {
                Some(path) => println!("Saved defaults to {}", path.display()),
                None => println!("No config directory; defaults not saved."),
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn load_instance(path: &Path) -> Result<Instance> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid instance response in {}", path.display()))
}

/// Print flattened state as YAML, headed by the address the instance answers on
fn print_state(state: &InstanceState) -> Result<()> {
    if let Some(host) = state.connection_host() {
        println!("# {} reachable at {}", state.name, host);
    }
    print!("{}", serde_yaml::to_string(state)?);
    Ok(())
}

/// Print drift and exit non-zero when there is any
fn report_drift(declared: &InstanceConfig, state: &InstanceState) -> Result<ExitCode> {
    let drifts = drift::detect(declared, state)?;
    if drifts.is_empty() {
        println!("No drift.");
        return Ok(ExitCode::SUCCESS);
    }
    for d in &drifts {
        println!("{}", d);
    }
    Ok(ExitCode::from(2))
}

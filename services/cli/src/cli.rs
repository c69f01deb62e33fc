use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

use bauportal::config::AppConfig;
use bauportal::error::AppError;
use bauportal::portal::AbortSignal;
use bauportal::telemetry;
use bauportal::workflows::document_check::{
    CompletenessCheck, CompletenessOutcome, DocumentCheckKind, DocumentCheckWorkflow,
    SubmissionOutcome,
};
use bauportal::workflows::geocode::{AddressResolver, NominatimClient};

use crate::demo::{run_demo, DemoArgs};
use crate::{infra, render};

#[derive(Parser, Debug)]
#[command(
    name = "Bauportal Client",
    about = "Drive the Bauantrag portal's document checks from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage the persisted session token
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },
    /// Upload a document and run a compliance check
    Check(CheckArgs),
    /// Request or poll the completeness check
    Completeness {
        #[command(subcommand)]
        command: CompletenessCommand,
    },
    /// Resolve a project address to map coordinates
    Geocode(GeocodeArgs),
    /// Run the full pipeline offline against canned portal responses
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    /// Store the bearer token the portal issued at login
    SetToken { token: String },
    /// Forget the stored token
    Clear,
}

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Which check to run
    #[arg(long, value_enum)]
    kind: CheckKindArg,
    /// Document to upload
    #[arg(long)]
    file: PathBuf,
    /// Project the analysis belongs to
    #[arg(long)]
    project_id: String,
    /// Voucher code unlocking a paid check
    #[arg(long)]
    voucher: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum CheckKindArg {
    BPlan,
    FireProtection,
}

impl From<CheckKindArg> for DocumentCheckKind {
    fn from(value: CheckKindArg) -> Self {
        match value {
            CheckKindArg::BPlan => DocumentCheckKind::BPlan,
            CheckKindArg::FireProtection => DocumentCheckKind::FireProtection,
        }
    }
}

#[derive(Subcommand, Debug)]
enum CompletenessCommand {
    /// Ask the backend to (re)check a submitted document
    Request {
        #[arg(long)]
        doc_id: String,
        #[arg(long)]
        project_name: String,
    },
    /// Poll the current completeness state of a project
    Status { project_id: String },
}

#[derive(Args, Debug)]
struct GeocodeArgs {
    /// Free-text project address
    address: String,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Session { command } => run_session(&config, command),
        Command::Check(args) => run_check(&config, args),
        Command::Completeness { command } => run_completeness(&config, command),
        Command::Geocode(args) => run_geocode(&config, args),
        Command::Demo(args) => run_demo(args),
    }
}

fn run_session(config: &AppConfig, command: SessionCommand) -> Result<(), AppError> {
    let store = infra::session_store(config);
    match command {
        SessionCommand::SetToken { token } => {
            store.store_token(&token)?;
            println!("Session token stored at {}", store.path().display());
        }
        SessionCommand::Clear => {
            store.clear_token()?;
            println!("Session token cleared");
        }
    }
    Ok(())
}

fn run_check(config: &AppConfig, args: CheckArgs) -> Result<(), AppError> {
    let kind = DocumentCheckKind::from(args.kind);
    info!(?kind, project_id = %args.project_id, "starting document check");

    let gateway = Arc::new(infra::build_gateway(config)?);
    let mut check = DocumentCheckWorkflow::new(kind, gateway);

    let candidate = infra::file_candidate(&args.file)?;
    check.select_file(candidate)?;

    println!("{}", check.descriptor().processing_message);
    let outcome = match args.voucher.as_deref() {
        Some(code) => check.submit_with_voucher(code, &args.project_id, AbortSignal::detached())?,
        None => check.submit(&args.project_id, AbortSignal::detached())?,
    };

    match outcome {
        SubmissionOutcome::Completed(report) => render::render_report(&report),
        SubmissionOutcome::Cancelled => println!("Submission cancelled"),
        SubmissionOutcome::Failed(message) => println!("Check failed: {message}"),
    }
    Ok(())
}

fn run_completeness(config: &AppConfig, command: CompletenessCommand) -> Result<(), AppError> {
    let gateway = Arc::new(infra::build_gateway(config)?);
    let mut check = CompletenessCheck::new(gateway);

    let outcome = match command {
        CompletenessCommand::Request {
            doc_id,
            project_name,
        } => check.request(&doc_id, &project_name),
        CompletenessCommand::Status { project_id } => check.refresh(&project_id),
    };

    match outcome {
        Ok(CompletenessOutcome::Completed(report)) => render::render_completeness(&report),
        Ok(CompletenessOutcome::Failed(message)) => println!("Completeness check failed: {message}"),
        Err(err) => println!("Completeness check unavailable: {err}"),
    }
    Ok(())
}

fn run_geocode(config: &AppConfig, args: GeocodeArgs) -> Result<(), AppError> {
    let resolver = NominatimClient::new(config.portal.geocode_url.clone())?;
    let place = resolver.resolve(&args.address)?;
    render::render_place(&args.address, &place);
    Ok(())
}

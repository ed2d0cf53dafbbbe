#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Sends the configured message to every address of the recipients file

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use graph_mailer::{
    domain::{
        auth::{Credentials, TokenProvider},
        campaign::{Campaign, RunReport},
        recipients::RecipientLoader,
        sending::SendClient,
    },
    infrastructure::{
        disify::DisifyValidator,
        graph::{GraphConfig, GraphMailer},
        http::build_client,
        identity::{IdentityConfig, MicrosoftIdentity},
        ledger::{export_failed, JsonLedger},
        settings::{load_env_file, DeliveryConfig},
        signals::shutdown_on_signal,
        templates::MessageConfig,
    },
};
use tracing::{error, info, warn};

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
#[clap(version, about)]
pub struct Args {
    /// The application registration
    #[clap(flatten)]
    pub identity: IdentityConfig,

    /// The Graph API and sending mailbox
    #[clap(flatten)]
    pub graph: GraphConfig,

    /// The message content
    #[clap(flatten)]
    pub message: MessageConfig,

    /// Files, pacing and retries
    #[clap(flatten)]
    pub delivery: DeliveryConfig,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    load_env_file().context("failed to load .env")?;

    tracing_subscriber::fmt::init();

    let args = Args::parse();

    run(args).await.inspect_err(|err| error!("{err:#}"))
}

#[mutants::skip]
async fn run(args: Args) -> Result<()> {
    let client = build_client(args.delivery.http_timeout())?;

    let credentials = Credentials {
        tenant_id: args.identity.tenant_id.clone(),
        client_id: args.identity.client_id.clone(),
        client_secret: args.identity.client_secret.clone(),
        sender: args.graph.sender.clone(),
    };

    let identity = Arc::new(MicrosoftIdentity::new(
        client.clone(),
        &args.identity.authority_url,
    ));
    let tokens = Arc::new(TokenProvider::new(identity, credentials));

    tokens
        .get_token()
        .await
        .context("failed to authenticate with Microsoft Graph")?;
    info!(sender = %args.graph.sender, "authenticated");

    let template = args
        .message
        .template(&std::env::current_dir()?)
        .await
        .context("failed to load message template")?;
    let attachment = args.message.attachment().await?;

    let loader = if args.delivery.validate_recipients {
        let validator = DisifyValidator::new(client.clone(), &args.delivery.validator_url)
            .context("invalid validator URL")?;

        RecipientLoader::with_validator(Arc::new(validator))
    } else {
        RecipientLoader::new()
    };

    let (recipients, stats) = loader.load(&args.delivery.recipients_file).await?;
    info!(
        lines = stats.total_lines,
        duplicates = stats.duplicates_removed,
        invalid = stats.format_invalid,
        rejected = stats.validator_rejected,
        unvalidated = stats.validator_unavailable,
        recipients = recipients.len(),
        "recipients ready"
    );

    if recipients.is_empty() {
        warn!("no valid recipients found");
    }

    let ledger = Arc::new(JsonLedger::open(&args.delivery.ledger_file).await?);

    let mailer = GraphMailer::new(client, &args.graph).context("invalid Graph URL")?;

    let client = SendClient::new(
        Arc::new(mailer),
        tokens,
        args.delivery.retry_policy(),
    );

    let campaign = Campaign::new(
        client,
        ledger,
        template,
        attachment,
        args.delivery.campaign_settings(),
    );

    let report = campaign.run(&recipients, shutdown_on_signal()).await?;

    print_summary(&report, &args.delivery.ledger_file);

    if let Some(path) = &args.delivery.failed_recipients_file {
        if let Err(err) = export_failed(&report, path).await {
            error!("{err:#}");
        }
    }

    Ok(())
}

#[mutants::skip]
fn print_summary(report: &RunReport, ledger_file: &Path) {
    let summary = &report.summary;

    println!();
    println!(
        "Run {} {}",
        summary.run_id,
        if summary.interrupted {
            "interrupted"
        } else {
            "finished"
        }
    );
    println!("  Sent:    {}", summary.sent);
    println!("  Failed:  {}", summary.failed);
    println!("  Skipped: {}", summary.skipped);
    println!("  Elapsed: {:.1}s", summary.total_elapsed_secs);
    println!("  Ledger:  {}", ledger_file.display());
}

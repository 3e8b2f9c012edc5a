//! Committee sync CLI
//!
//! Provisions mailing-list interests and campaigns for committees, lists what
//! exists in the audience, and sends updates through provisioned campaigns.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use provisioner_core::config::Config;
use provisioner_core::domains::audience::{self, Audience};
use provisioner_core::domains::campaigns::{campaign_for_committee, send_update};
use provisioner_core::domains::committees::CommitteeDirectory;
use provisioner_core::domains::provisioning::{ProvisionError, Provisioner};
use provisioner_core::kernel::{CommitteesSource, SyncDeps};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "committee-sync")]
#[command(about = "Provision mailing-list campaigns for committees")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the interest and campaign for a committee and record the mapping
    Provision { committee_id: i64 },

    /// List committees in the target jurisdiction
    Directory,

    /// List audience resources as CSV sections
    List {
        #[arg(value_enum, default_value_t = Resource::All)]
        resource: Resource,
    },

    /// Upload HTML content to a campaign and send it
    Send {
        /// Resolve the campaign from the mapping ledger
        #[arg(long, conflicts_with = "campaign", required_unless_present = "campaign")]
        committee: Option<i64>,

        #[arg(long)]
        campaign: Option<String>,

        #[arg(long)]
        html_file: PathBuf,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Resource {
    Tags,
    Campaigns,
    Groups,
    Segments,
    All,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,provisioner_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    let deps = SyncDeps::from_config(&config)?;

    match cli.command {
        Commands::Provision { committee_id } => provision(&config, deps, committee_id).await,
        Commands::Directory => directory(&config, &deps).await,
        Commands::List { resource } => list(&config, &deps, resource).await,
        Commands::Send {
            committee,
            campaign,
            html_file,
        } => send(&deps, committee, campaign, html_file).await,
    }
}

async fn build_directory(config: &Config, deps: &SyncDeps) -> Result<CommitteeDirectory> {
    let source = CommitteesSource::new(deps.committees.clone());
    CommitteeDirectory::build(
        &source,
        &config.target_jurisdiction,
        config.committees_page_size,
    )
    .await
    .context("Failed to fetch committees")
}

async fn provision(config: &Config, deps: SyncDeps, committee_id: i64) -> Result<()> {
    let directory = build_directory(config, &deps).await?;
    let provisioner = Provisioner::new(directory, deps.ledger, deps.mailing_list);

    match provisioner.provision(committee_id).await {
        Ok(record) => {
            println!(
                "{} {},{},{},{}",
                "Provisioned:".bright_green().bold(),
                record.committee_id,
                record.committee_name,
                record.campaign_id,
                record.interest_id
            );
            Ok(())
        }
        Err(e @ ProvisionError::AlreadyMapped { .. }) => {
            eprintln!("{} {}", "Skipped:".yellow().bold(), e);
            Err(e.into())
        }
        Err(e) if e.is_inconsistent() => {
            eprintln!("{}", "MANUAL CLEANUP REQUIRED".bright_red().bold());
            eprintln!("{}", e.to_string().red());
            Err(e.into())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to provision committee {}", committee_id)),
    }
}

async fn directory(config: &Config, deps: &SyncDeps) -> Result<()> {
    let directory = build_directory(config, deps).await?;

    let mut writer = csv::Writer::from_writer(io::stdout().lock());
    writer.write_record(["id", "name"])?;
    for committee in directory.iter() {
        writer.write_record([committee.id.to_string(), committee.name.clone()])?;
    }
    writer.flush()?;
    Ok(())
}

async fn list(config: &Config, deps: &SyncDeps, resource: Resource) -> Result<()> {
    let audience = Audience::new(
        deps.mailchimp.clone(),
        config.audience_id.clone(),
        config.mailchimp_page_size,
    );
    let all = resource == Resource::All;
    let mut out = io::stdout().lock();

    if all || resource == Resource::Tags {
        let tags = audience.tags().await.context("Failed to list tags")?;
        audience::write_tags(&mut out, &tags)?;
        writeln!(out)?;
    }
    if all || resource == Resource::Campaigns {
        let campaigns = audience.campaigns().await.context("Failed to list campaigns")?;
        audience::write_campaigns(&mut out, &campaigns)?;
        writeln!(out)?;
    }
    if all || resource == Resource::Groups {
        let groups = audience.groups().await.context("Failed to list groups")?;
        audience::write_groups(&mut out, &groups)?;
        writeln!(out)?;
    }
    if all || resource == Resource::Segments {
        let segments = audience.segments().await.context("Failed to list segments")?;
        audience::write_segments(&mut out, &segments)?;
    }

    Ok(())
}

async fn send(
    deps: &SyncDeps,
    committee: Option<i64>,
    campaign: Option<String>,
    html_file: PathBuf,
) -> Result<()> {
    let campaign_id = match (committee, campaign) {
        (_, Some(campaign_id)) => campaign_id,
        (Some(committee_id), None) => campaign_for_committee(&deps.ledger, committee_id)?,
        (None, None) => anyhow::bail!("either --committee or --campaign is required"),
    };

    let html = std::fs::read_to_string(&html_file)
        .with_context(|| format!("Failed to read {}", html_file.display()))?;

    send_update(deps.mailing_list.as_ref(), &campaign_id, &html).await?;

    println!("{} {}", "Sent campaign".bright_green().bold(), campaign_id);
    Ok(())
}

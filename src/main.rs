//! practice-concierge - scripted chat concierge
//!
//! Runs the chat widget for one of the practice's service-line subdomains in
//! the terminal, or drives it headless.

mod analytics;
mod calculator;
mod config;
mod engine;
mod headless;
mod models;
mod script;
mod tui;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use calculator::{Estimate, FinancingTerm, HandoffContext};
use config::Config;
use engine::ChatSession;
use models::Site;
use script::{catalog, ScriptTable};

#[derive(Parser)]
#[command(name = "practice-concierge")]
#[command(about = "Scripted chat concierge for the practice's subdomains", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Which dialog script to run.
#[derive(Args)]
struct ScriptArgs {
    /// Subdomain slug, host or URL (e.g. tmj, implants.gregpedromd.com)
    #[arg(short, long, value_parser = parse_site)]
    site: Option<Site>,

    /// Load the dialog script from a TOML file instead of the built-in one
    #[arg(long)]
    script: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat widget in the terminal
    Chat {
        #[command(flatten)]
        script: ScriptArgs,
    },

    /// Play a conversation without a UI and print the transcript
    Transcript {
        #[command(flatten)]
        script: ScriptArgs,

        /// Steps in order: a topic key (or chip id) picks that quick action,
        /// `say:<text>` types free text
        steps: Vec<String>,

        /// Print the transcript as JSON
        #[arg(long)]
        json: bool,

        /// Override the typing delay (milliseconds)
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Validate dialog scripts and report unreachable topics
    Scripts {
        /// Only check this subdomain's built-in script
        #[arg(short, long, value_parser = parse_site)]
        site: Option<Site>,

        /// Check TOML script files instead of the built-in scripts
        #[arg(long)]
        file: Vec<PathBuf>,
    },

    /// AboutFace treatment cost estimate
    Estimate {
        /// Treatment id (repeatable); omit to list treatments
        #[arg(short, long = "treatment")]
        treatments: Vec<String>,

        /// Financing term in months (6, 12, 18, 24, 36)
        #[arg(long, default_value_t = 12)]
        term: u32,

        /// Hand the estimate to the chat widget and print the conversation
        #[arg(long, value_enum)]
        handoff: Option<HandoffContext>,

        /// Override the typing delay for the hand-off (milliseconds)
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// List subdomains and their scripts
    Sites,

    /// Show or update the config file
    Configure {
        /// Site used when --site is omitted
        #[arg(long, value_parser = parse_site)]
        default_site: Option<Site>,

        /// Typing delay before each reply (milliseconds)
        #[arg(long)]
        typing_delay_ms: Option<u64>,

        /// Log analytics events
        #[arg(long)]
        analytics: Option<bool>,

        /// Source id reported when the widget opens
        #[arg(long)]
        chat_source: Option<String>,
    },
}

fn parse_site(raw: &str) -> Result<Site, String> {
    Site::from_slug(raw)
        .or_else(|| Site::from_host(raw))
        .ok_or_else(|| {
            let slugs: Vec<&str> = Site::ALL.iter().map(|s| s.slug()).collect();
            format!("unknown site '{}' (expected one of: {})", raw, slugs.join(", "))
        })
}

/// Route tracing output to stderr, or into `capture` while the TUI owns the
/// screen.
fn init_logging(verbose: bool, capture: Option<tui::LogRing>) {
    let filter = if verbose { "debug" } else { "info" };
    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()));

    match capture {
        Some(ring) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(ring),
            )
            .init(),
        None => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

fn load_script(site: Site, file: Option<&Path>) -> Result<ScriptTable> {
    match file {
        Some(path) => ScriptTable::load(path)
            .with_context(|| format!("Failed to load script {}", path.display())),
        None => catalog::for_site(site)
            .with_context(|| format!("Built-in script for {} is invalid", site)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let capture = matches!(cli.command, Commands::Chat { .. }).then(tui::LogRing::new);
    init_logging(cli.verbose, capture.clone());

    let config = Config::load()?;

    match cli.command {
        Commands::Chat { script } => {
            let site = script.site.unwrap_or(config.default_site);
            let table = load_script(site, script.script.as_deref())?;
            let session = ChatSession::new(table, config.analytics(), config.session_options());
            tui::run(session, site, capture.unwrap_or_default()).await?;
        }
        Commands::Transcript {
            script,
            steps,
            json,
            delay_ms,
        } => {
            let site = script.site.unwrap_or(config.default_site);
            let table = load_script(site, script.script.as_deref())?;
            let mut session = ChatSession::new(
                table,
                config.analytics(),
                session_options(&config, delay_ms),
            );
            let steps: Vec<headless::Step> =
                steps.iter().map(|s| headless::Step::parse(s)).collect();
            headless::play(&mut session, &steps).await?;
            headless::print_transcript(session.messages(), json)?;
        }
        Commands::Scripts { site, file } => {
            check_scripts(site, &file)?;
        }
        Commands::Estimate {
            treatments,
            term,
            handoff,
            delay_ms,
        } => {
            run_estimate(&config, &treatments, term, handoff, delay_ms).await?;
        }
        Commands::Sites => {
            list_sites()?;
        }
        Commands::Configure {
            default_site,
            typing_delay_ms,
            analytics,
            chat_source,
        } => {
            let mut config = config;
            let mut changed = false;
            if let Some(site) = default_site {
                config.default_site = site;
                changed = true;
            }
            if let Some(ms) = typing_delay_ms {
                config.typing_delay_ms = ms;
                changed = true;
            }
            if let Some(enabled) = analytics {
                config.analytics = enabled;
                changed = true;
            }
            if let Some(source) = chat_source {
                config.chat_source = source;
                changed = true;
            }

            let path = Config::config_path()?;
            if changed {
                config.save()?;
                println!("Saved {}", path.display());
            } else {
                println!("# {}", path.display());
            }
            print!(
                "{}",
                toml::to_string_pretty(&config).context("Failed to serialize config")?
            );
        }
    }

    Ok(())
}

fn session_options(config: &Config, delay_ms: Option<u64>) -> engine::SessionOptions {
    let mut options = config.session_options();
    if let Some(ms) = delay_ms {
        options.typing_delay = Duration::from_millis(ms);
    }
    options
}

fn check_scripts(site: Option<Site>, files: &[PathBuf]) -> Result<()> {
    if !files.is_empty() {
        for path in files {
            let table = ScriptTable::load(path)
                .with_context(|| format!("Invalid script {}", path.display()))?;
            report_script(&table);
        }
        return Ok(());
    }

    let sites = match site {
        Some(site) => vec![site],
        None => Site::ALL.to_vec(),
    };
    for site in sites {
        let table = catalog::for_site(site)
            .with_context(|| format!("Built-in script for {} is invalid", site))?;
        report_script(&table);
    }
    Ok(())
}

fn report_script(table: &ScriptTable) {
    println!(
        "{}: {} topics, welcome '{}', {} welcome options",
        table.name(),
        table.topics().len(),
        table.welcome().key,
        table.welcome().options.len()
    );
    let unreachable = table.unreachable_topics();
    if !unreachable.is_empty() {
        println!("  unreachable: {}", unreachable.join(", "));
    }
}

fn list_sites() -> Result<()> {
    println!(
        "{:<10} {:<28} {:<11} {:>6}  NAME",
        "SLUG", "HOST", "PATH", "TOPICS"
    );
    for site in Site::ALL {
        let table = catalog::for_site(site)?;
        println!(
            "{:<10} {:<28} {:<11} {:>6}  {}",
            site.slug(),
            site.host(),
            site.path(),
            table.topics().len(),
            site.display_name()
        );
    }
    Ok(())
}

async fn run_estimate(
    config: &Config,
    treatments: &[String],
    term: u32,
    handoff: Option<HandoffContext>,
    delay_ms: Option<u64>,
) -> Result<()> {
    let mut estimate = Estimate::new(Site::AboutFace)?;

    if treatments.is_empty() {
        println!("Available treatments:");
        for t in calculator::price_list(Site::AboutFace)? {
            println!(
                "  {:<20} {:<20} ${}",
                t.id,
                t.name,
                calculator::format_dollars(t.price)
            );
        }
        return Ok(());
    }

    for id in treatments {
        if estimate.selected().iter().any(|t| t.id == id.as_str()) {
            continue;
        }
        estimate.toggle(id)?;
    }
    estimate.set_term(FinancingTerm::try_from(term)?);

    for t in estimate.selected() {
        println!("{:<24} ${:>8}", t.name, calculator::format_dollars(t.price));
    }
    println!("{:<24} ${:>8}", "Total", calculator::format_dollars(estimate.total()));
    if estimate.financing_available() {
        println!(
            "Financing: ${}/month over {} months at {:.2}% APR",
            calculator::format_dollars(estimate.monthly_payment()),
            estimate.term().months(),
            calculator::FINANCING_APR * 100.0
        );
    } else {
        println!(
            "Financing available on totals of ${} or more",
            calculator::format_dollars(calculator::FINANCING_THRESHOLD)
        );
    }

    let Some(context) = handoff else {
        return Ok(());
    };

    let analytics = config.analytics();
    let mut session = ChatSession::new(
        catalog::for_site(Site::AboutFace)?,
        analytics.clone(),
        session_options(config, delay_ms),
    );
    estimate.hand_off(context, analytics.as_ref(), &session.trigger());
    session.settle().await;

    println!();
    headless::print_transcript(session.messages(), false)
}

//! kudos-cli: Command-line front end for the Kudos rules engine.
//!
//! Inspects the distribution and boost tables, and simulates burns and
//! reward events against an in-memory ledger persisted to a JSON state file.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use kudos_boost::{BoostStatus, MemoryBoostStore, TracingEventSink};
use kudos_core::clock::{ManualClock, SystemClock};
use kudos_core::constants::{BOOST_TIERS, SECONDS_PER_DAY, SUPPLY_TIERS};
use kudos_core::traits::{Clock, FixedSupply, SupplySource};
use kudos_core::types::{Amount, Asset, Timestamp, UserId};
use kudos_engine::{
    EngineConfig, LogFormat, MemoryLedger, RewardEngine, RewardEvent, RewardKind, StateFile,
};
use kudos_split::{split_payment, DistributionPolicy};
use serde::Serialize;
use tracing::debug;

/// Kudos command-line interface.
#[derive(Parser)]
#[command(name = "kudos-cli")]
#[command(version, about = "Supply-tiered reward splits and burn-to-boost multipliers.")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// State file (overrides `state_path` from config).
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the platform/uploader shares for a total supply.
    Distribution(DistributionArgs),
    /// Split a payment at a total supply.
    Split(SplitArgs),
    /// Print the distribution and boost tables.
    Tiers,
    /// Boost subcommands.
    Boost {
        #[command(subcommand)]
        action: BoostAction,
    },
    /// Simulated token ledger subcommands.
    Ledger {
        #[command(subcommand)]
        action: LedgerAction,
    },
    /// Process a reward event against the simulated ledger.
    Reward(RewardArgs),
}

#[derive(Subcommand)]
enum BoostAction {
    /// Burn tokens to open (or replace) a boost window.
    Burn(BurnArgs),
    /// Show a user's boost status and multiplier.
    Status(StatusArgs),
}

#[derive(Subcommand)]
enum LedgerAction {
    /// Credit simulated tokens to an account.
    Credit(CreditArgs),
    /// Show token balances and total supply.
    Show,
}

#[derive(Args)]
struct DistributionArgs {
    /// Total supply in tokens (decimals allowed).
    #[arg(long)]
    supply: Amount,
}

#[derive(Args)]
struct SplitArgs {
    /// Total supply in tokens.
    #[arg(long)]
    supply: Amount,
    /// Payment to split.
    #[arg(long)]
    payment: Amount,
}

#[derive(Args)]
struct BurnArgs {
    /// User identity (64 hex chars).
    #[arg(long)]
    user: UserId,
    /// Tokens to burn.
    #[arg(long)]
    amount: Amount,
    /// Unix time to burn at (default: now).
    #[arg(long)]
    now: Option<u64>,
}

#[derive(Args)]
struct StatusArgs {
    #[arg(long)]
    user: UserId,
    /// Unix time to evaluate at (default: now).
    #[arg(long)]
    now: Option<u64>,
}

#[derive(Args)]
struct CreditArgs {
    #[arg(long)]
    user: UserId,
    #[arg(long)]
    amount: Amount,
}

#[derive(Args)]
struct RewardArgs {
    /// pet, mint or reveal.
    #[arg(long)]
    kind: RewardKind,
    /// User earning the token reward.
    #[arg(long)]
    user: UserId,
    /// Uploader receiving the uploader leg.
    #[arg(long)]
    uploader: UserId,
    /// Base-currency payment.
    #[arg(long, default_value = "0")]
    payment: Amount,
    /// Override the ledger's total supply.
    #[arg(long)]
    supply: Option<Amount>,
    /// Unix time of the event (default: now).
    #[arg(long)]
    now: Option<u64>,
}

type CliEngine = RewardEngine<MemoryBoostStore, Arc<MemoryLedger>, TracingEventSink>;

/// State-backed engine plus the ledger it runs against.
struct Session {
    engine: CliEngine,
    ledger: Arc<MemoryLedger>,
    state_path: PathBuf,
}

impl Session {
    fn open(config: EngineConfig, now: Option<u64>, supply: Option<Amount>) -> Result<Self> {
        let state_path = config.state_path.clone();
        let state = StateFile::load(&state_path)
            .with_context(|| format!("failed to load state from {}", state_path.display()))?;
        let ledger = Arc::new(state.ledger().context("invalid ledger state")?);

        let clock: Arc<dyn Clock> = match now {
            Some(secs) => Arc::new(ManualClock::new(Timestamp(secs))),
            None => Arc::new(SystemClock),
        };
        let supply_source: Arc<dyn SupplySource> = match supply {
            Some(s) => Arc::new(FixedSupply(s)),
            None => ledger.clone(),
        };

        let engine = RewardEngine::new(
            config,
            state.boost_store(),
            ledger.clone(),
            TracingEventSink,
            supply_source,
            clock,
            ledger.clone(),
        );
        debug!(path = %state_path.display(), boosts = state.boosts.len(), "state loaded");

        Ok(Self {
            engine,
            ledger,
            state_path,
        })
    }

    fn save(&self) -> Result<()> {
        StateFile::capture(self.engine.registry().store(), &self.ledger)
            .save(&self.state_path)
            .with_context(|| format!("failed to save state to {}", self.state_path.display()))
    }
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text(value);
    }
    Ok(())
}

fn percent(bps: u64) -> String {
    format!("{}.{:02}%", bps / 100, bps % 100)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = EngineConfig::load(cli.config.as_deref()).context("failed to load config")?;
    if let Some(state) = cli.state.clone() {
        config.state_path = state;
    }
    init_logging(&config.log_level, config.log_format);

    match cli.command {
        Commands::Distribution(args) => cmd_distribution(args, cli.json),
        Commands::Split(args) => cmd_split(args, cli.json),
        Commands::Tiers => cmd_tiers(cli.json),
        Commands::Boost { action } => match action {
            BoostAction::Burn(args) => cmd_boost_burn(config, args, cli.json),
            BoostAction::Status(args) => cmd_boost_status(config, args, cli.json),
        },
        Commands::Ledger { action } => match action {
            LedgerAction::Credit(args) => cmd_ledger_credit(config, args, cli.json),
            LedgerAction::Show => cmd_ledger_show(config, cli.json),
        },
        Commands::Reward(args) => cmd_reward(config, args, cli.json),
    }
}

fn cmd_distribution(args: DistributionArgs, json: bool) -> Result<()> {
    let policy = DistributionPolicy::new();
    let dist = policy.get_distribution(args.supply);
    let tier = policy.tier_index(args.supply);

    #[derive(Serialize)]
    struct Out {
        supply: Amount,
        tier: usize,
        platform_bps: u64,
        uploader_bps: u64,
    }
    let out = Out {
        supply: args.supply,
        tier,
        platform_bps: dist.platform.bps(),
        uploader_bps: dist.uploader.bps(),
    };
    emit(json, &out, |o| {
        println!("Supply:   {}", o.supply);
        println!("Tier:     {}", o.tier);
        println!("Platform: {}", percent(o.platform_bps));
        println!("Uploader: {}", percent(o.uploader_bps));
    })
}

fn cmd_split(args: SplitArgs, json: bool) -> Result<()> {
    let dist = DistributionPolicy::new().get_distribution(args.supply);
    let split = split_payment(args.payment, dist)?;
    emit(json, &split, |s| {
        println!("Platform: {}", s.platform);
        println!("Uploader: {}", s.uploader);
    })
}

fn cmd_tiers(json: bool) -> Result<()> {
    #[derive(Serialize)]
    struct Out {
        supply_tiers: Vec<kudos_core::types::SupplyTier>,
        boost_tiers: Vec<kudos_core::types::BoostTier>,
    }
    let out = Out {
        supply_tiers: SUPPLY_TIERS.to_vec(),
        boost_tiers: BOOST_TIERS.to_vec(),
    };
    emit(json, &out, |o| {
        println!("Distribution tiers (total supply → platform / uploader):");
        for tier in &o.supply_tiers {
            let bound = match tier.upper_bound_inclusive {
                Some(b) => format!("<= {b}"),
                None => "above".to_string(),
            };
            println!(
                "  {:>14}  {} / {}",
                bound,
                percent(tier.platform_share.bps()),
                percent(tier.uploader_share.bps())
            );
        }
        println!("Boost tiers (burn → duration, tier multiplier):");
        for tier in &o.boost_tiers {
            println!(
                "  >= {:>8}  {:>2} days  {}x",
                tier.minimum_burn,
                tier.duration_secs / SECONDS_PER_DAY,
                tier.reward_multiplier
            );
        }
    })
}

fn cmd_boost_burn(config: EngineConfig, args: BurnArgs, json: bool) -> Result<()> {
    let session = Session::open(config, args.now, None)?;
    let grant = session
        .engine
        .burn_for_boost(&args.user, args.amount)
        .context("burn for boost failed")?;
    session.save()?;

    emit(json, &grant, |g| {
        println!("Burned:     {}", args.amount);
        println!("Duration:   {} days", g.duration_secs / SECONDS_PER_DAY);
        println!("Expires at: {}", g.new_expiration);
    })
}

fn cmd_boost_status(config: EngineConfig, args: StatusArgs, json: bool) -> Result<()> {
    let session = Session::open(config, args.now, None)?;
    let status = session.engine.boost_status(&args.user);
    let multiplier = session.engine.multiplier(&args.user);

    emit(json, &status, |s| {
        match s {
            BoostStatus::Inactive => println!("Status:     no boost"),
            BoostStatus::Active {
                expiration,
                remaining_secs,
                ..
            } => {
                println!("Status:     active");
                println!("Expires at: {expiration} ({remaining_secs}s left)");
            }
            BoostStatus::Expired { expired_at } => {
                println!("Status:     expired at {expired_at}");
            }
        }
        println!("Multiplier: {multiplier}x");
    })
}

fn cmd_ledger_credit(config: EngineConfig, args: CreditArgs, json: bool) -> Result<()> {
    let session = Session::open(config, None, None)?;
    session
        .ledger
        .credit(Asset::Token, &args.user, args.amount)
        .context("credit failed")?;
    session.save()?;

    let balance = session.ledger.balance(Asset::Token, &args.user);
    emit(json, &balance, |b| println!("Balance: {b}"))
}

fn cmd_ledger_show(config: EngineConfig, json: bool) -> Result<()> {
    let session = Session::open(config, None, None)?;

    #[derive(Serialize)]
    struct Out {
        total_supply: Amount,
        balances: Vec<(UserId, Amount)>,
    }
    let out = Out {
        total_supply: session.ledger.token_supply(),
        balances: session.ledger.token_balances(),
    };
    emit(json, &out, |o| {
        println!("Total supply: {}", o.total_supply);
        for (user, amount) in &o.balances {
            println!("  {user}  {amount}");
        }
    })
}

fn cmd_reward(config: EngineConfig, args: RewardArgs, json: bool) -> Result<()> {
    let session = Session::open(config, args.now, args.supply)?;
    let event = RewardEvent {
        kind: args.kind,
        user: args.user,
        uploader: args.uploader,
        payment: args.payment,
    };
    let outcome = session.engine.process(&event).context("reward failed")?;
    session.save()?;

    emit(json, &outcome, |o| {
        println!("Event:        {}", o.kind);
        println!("Total supply: {}", o.total_supply);
        println!(
            "Split:        platform {} ({}), uploader {} ({})",
            o.split.platform,
            percent(o.distribution.platform.bps()),
            o.split.uploader,
            percent(o.distribution.uploader.bps())
        );
        println!(
            "Token reward: {} x {} = {}",
            o.base_token_reward, o.multiplier, o.token_reward
        );
    })
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_logging(level_str: &str, format: LogFormat) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_burn_arguments() {
        let user = UserId([0xab; 32]).to_string();
        let cli = Cli::try_parse_from([
            "kudos-cli",
            "boost",
            "burn",
            "--user",
            user.as_str(),
            "--amount",
            "30000",
            "--now",
            "100",
        ])
        .unwrap();
        match cli.command {
            Commands::Boost {
                action: BoostAction::Burn(args),
            } => {
                assert_eq!(args.amount, Amount::from_tokens(30_000));
                assert_eq!(args.now, Some(100));
            }
            _ => panic!("expected boost burn"),
        }
    }

    #[test]
    fn rejects_bad_user() {
        assert!(Cli::try_parse_from(["kudos-cli", "boost", "status", "--user", "xyz"]).is_err());
    }

    #[test]
    fn percent_formats_bps() {
        assert_eq!(percent(4_500), "45.00%");
        assert_eq!(percent(2_525), "25.25%");
    }
}

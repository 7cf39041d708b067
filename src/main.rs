use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use swopcx::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct RatesOpts {
    /// Comma separated currency codes, e.g. USD,GBP
    symbols: String,

    /// Base currency, ignored on the free tier
    #[arg(short, long)]
    base: Option<String>,

    /// Skip the cache for this request
    #[arg(long)]
    no_cache: bool,

    /// Include rate source information
    #[arg(long)]
    meta: bool,
}

impl From<RatesOpts> for swopcx::RatesArgs {
    fn from(opts: RatesOpts) -> swopcx::RatesArgs {
        swopcx::RatesArgs {
            symbols: opts.symbols,
            base: opts.base,
            no_cache: opts.no_cache,
            meta: opts.meta,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the latest exchange rates
    Latest(RatesOpts),
    /// Display exchange rates for a past date
    Historical {
        /// Date as YYYY-MM-DD
        #[arg(short, long)]
        date: Option<String>,
        #[command(flatten)]
        rates: RatesOpts,
    },
    /// Display exchange rates for a range of dates
    Timeseries {
        /// First date as YYYY-MM-DD
        #[arg(long)]
        start: Option<String>,
        /// Last date as YYYY-MM-DD, defaults to today
        #[arg(long)]
        end: Option<String>,
        #[command(flatten)]
        rates: RatesOpts,
    },
    /// List supported currencies
    Currencies {
        /// Comma separated currency codes, all when omitted
        #[arg(default_value = "")]
        symbols: String,
        /// Skip the cache for this request
        #[arg(long)]
        no_cache: bool,
    },
    /// Convert an amount between two currencies
    Convert {
        amount: f64,
        from: String,
        to: String,
        /// Use rates of this date (YYYY-MM-DD) instead of the latest
        #[arg(short, long)]
        date: Option<String>,
        /// Base currency both rates are quoted against
        #[arg(short, long)]
        base: Option<String>,
        /// Skip the cache for this request
        #[arg(long)]
        no_cache: bool,
    },
}

impl From<Commands> for swopcx::AppCommand {
    fn from(cmd: Commands) -> swopcx::AppCommand {
        match cmd {
            Commands::Latest(rates) => swopcx::AppCommand::Latest(rates.into()),
            Commands::Historical { date, rates } => swopcx::AppCommand::Historical {
                date,
                rates: rates.into(),
            },
            Commands::Timeseries { start, end, rates } => swopcx::AppCommand::TimeSeries {
                start_date: start,
                end_date: end,
                rates: rates.into(),
            },
            Commands::Currencies { symbols, no_cache } => {
                swopcx::AppCommand::Currencies { symbols, no_cache }
            }
            Commands::Convert {
                amount,
                from,
                to,
                date,
                base,
                no_cache,
            } => swopcx::AppCommand::Convert {
                from,
                to,
                amount,
                date,
                base,
                no_cache,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => swopcx::cli::setup::setup().map(|path| {
            println!("Created default configuration at {}", path.display());
        }),
        Some(cmd) => swopcx::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

//! Qenus Gas Model - command-line entry point
//!
//! Prices the routes of a JSON scenario (a pool snapshot plus routes given as
//! indices into its pool list) against the configured gas cost constants.

use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::{Arg, Command};
use serde::Deserialize;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qenus_gas_model::{GasModelConfig, GasModelFactory};
use qenus_pools::{Chain, InMemoryPoolProvider, PoolSnapshot, Route, RouteQuote, Token, U256};

/// Pool snapshot plus the routes to price
#[derive(Debug, Deserialize)]
struct Scenario {
    #[serde(flatten)]
    snapshot: PoolSnapshot,
    routes: Vec<ScenarioRoute>,
}

#[derive(Debug, Deserialize)]
struct ScenarioRoute {
    /// Indices into the snapshot's pool list
    pools: Vec<usize>,
    #[serde(default)]
    initialized_ticks_crossed: Vec<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("gas-model")
        .version(qenus_gas_model::VERSION)
        .about("Qenus Gas Model - gas cost estimation for mixed swap routes")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path (defaults to layered config/ files and environment)"),
        )
        .arg(
            Arg::new("scenario")
                .short('s')
                .long("scenario")
                .value_name("FILE")
                .help("JSON scenario with pools and routes")
                .required_unless_present("generate-config"),
        )
        .arg(
            Arg::new("chain")
                .short('n')
                .long("chain")
                .value_name("CHAIN")
                .help("Chain to price on (defaults to the scenario's chain)"),
        )
        .arg(
            Arg::new("quote-token")
                .short('q')
                .long("quote-token")
                .value_name("SYMBOL|ADDRESS")
                .help("Token to express gas cost in (defaults to the wrapped native token)"),
        )
        .arg(
            Arg::new("gas-price")
                .short('g')
                .long("gas-price")
                .value_name("WEI")
                .help("Gas price in wei per gas unit")
                .default_value("30000000000"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)")
                .default_value("info"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("OUTPUT")
                .help("Write the default configuration to OUTPUT and exit"),
        )
        .get_matches();

    let log_level = matches
        .get_one::<String>("log-level")
        .map(String::as_str)
        .unwrap_or("info");
    init_logging(log_level);

    if let Some(output) = matches.get_one::<String>("generate-config") {
        GasModelConfig::default()
            .save_to_file(output)
            .with_context(|| format!("failed to write configuration to {}", output))?;
        info!(output = %output, "Wrote default configuration");
        return Ok(());
    }

    let config = load_config(matches.get_one::<String>("config"))?;
    let scenario_path = matches
        .get_one::<String>("scenario")
        .context("--scenario is required")?;
    let scenario = load_scenario(scenario_path)?;

    let chain = match matches.get_one::<String>("chain") {
        Some(name) => Chain::from_str(name)?,
        None => scenario.snapshot.chain,
    };
    if chain != scenario.snapshot.chain {
        bail!(
            "scenario pools are on {}, cannot price them on {}",
            scenario.snapshot.chain,
            chain
        );
    }

    let gas_price = matches
        .get_one::<String>("gas-price")
        .map(|s| U256::from_str(s))
        .transpose()
        .context("invalid gas price")?
        .unwrap_or(U256::ZERO);

    let quote_token = match matches.get_one::<String>("quote-token") {
        Some(token) => scenario.snapshot.token(token)?,
        None => config.network(chain)?.wrapped_native_token(chain),
    };

    info!(
        version = qenus_gas_model::VERSION,
        chain = %chain,
        quote_token = %quote_token,
        routes = scenario.routes.len(),
        "Starting Qenus Gas Model"
    );

    let provider = InMemoryPoolProvider::from_snapshot(&scenario.snapshot)
        .context("failed to load scenario pools")?;
    let quotes = build_quotes(&scenario)?;

    let factory = GasModelFactory::new(config);
    let model = factory
        .build_gas_model(chain, gas_price, &provider, &provider, &quote_token)
        .await
        .context("failed to build gas model")?;

    print_estimates(&model.estimate_many(&quotes), &quote_token, model.usd_token());
    Ok(())
}

/// Initialize logging
fn init_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => {
            eprintln!("Invalid log level: {}. Using 'info'", log_level);
            tracing::Level::INFO
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("qenus_gas_model={},qenus_pools={}", level, level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Load configuration from a file, or from the layered sources
fn load_config(path: Option<&String>) -> Result<GasModelConfig> {
    let config = match path {
        Some(path) => {
            info!(config_path = %path, "Loading configuration");
            GasModelConfig::from_file(path)
                .with_context(|| format!("failed to load configuration from {}", path))?
        }
        None => GasModelConfig::load().context("failed to load configuration")?,
    };
    Ok(config)
}

fn load_scenario<P: AsRef<Path>>(path: P) -> Result<Scenario> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse scenario {}", path.display()))
}

/// Resolve each scenario route against the snapshot's pools
fn build_quotes(scenario: &Scenario) -> Result<Vec<RouteQuote>> {
    let pools = scenario.snapshot.to_pools()?;

    scenario
        .routes
        .iter()
        .enumerate()
        .map(|(index, route)| {
            let hops = route
                .pools
                .iter()
                .map(|&i| {
                    pools
                        .get(i)
                        .cloned()
                        .with_context(|| format!("route {} references unknown pool {}", index, i))
                })
                .collect::<Result<Vec<_>>>()?;

            let route_path = Route::new(hops).with_context(|| format!("route {}", index))?;
            let quote = if route.initialized_ticks_crossed.is_empty() {
                RouteQuote::without_ticks(route_path)
            } else {
                RouteQuote::new(route_path, route.initialized_ticks_crossed.clone())
                    .with_context(|| format!("route {}", index))?
            };
            Ok(quote)
        })
        .collect()
}

fn print_estimates(
    results: &[qenus_gas_model::Result<qenus_gas_model::GasCostEstimate>],
    quote_token: &Token,
    usd_token: &Token,
) {
    for (index, result) in results.iter().enumerate() {
        match result {
            Ok(estimate) => println!(
                "route {}: {} gas | {} {} | {} {} | {} {}",
                index,
                estimate.gas_estimate,
                estimate.gas_cost_in_native.to_fixed(8),
                estimate.gas_cost_in_native.token().symbol,
                estimate.gas_cost_in_quote_token.to_fixed(8),
                quote_token.symbol,
                estimate.gas_cost_in_usd.to_fixed(4),
                usd_token.symbol,
            ),
            Err(e) => error!(route = index, error = %e, "Route could not be priced"),
        }
    }
}

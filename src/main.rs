use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use solar_estimator::config::{Config, ConfigOverrides};
use solar_estimator::estimator::SolarEstimator;
use solar_estimator::output::csv::{loans_to_csv, projection_to_csv};
use solar_estimator::output::json::render_json;
use solar_estimator::output::table::{
    render_loan_table, render_projection_table, render_regions_table, render_summary_table,
};
use solar_estimator::types::{EstimateInput, EstimateResult, PropertyType};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "solar-estimator",
    about = "Rooftop solar sizing, cost and savings estimates"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[arg(long = "loan-rate")]
    loan_rate: Option<f64>,
    #[arg(long = "tariff-growth")]
    tariff_growth: Option<f64>,
    #[arg(long = "consumption-growth")]
    consumption_growth: Option<f64>,
    #[arg(long)]
    lifespan: Option<u32>,
    #[arg(long = "fallback-tariff")]
    fallback_tariff: Option<f64>,
    #[arg(long = "inverter-year")]
    inverter_year: Option<u32>,
    #[arg(long = "cost-per-kw")]
    cost_per_kw: Option<f64>,
    /// Irradiation override as NAME=VALUE; repeatable.
    #[arg(long = "region", value_parser = parse_region_override)]
    regions: Vec<(String, f64)>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Args, Clone)]
struct InputArgs {
    /// JSON file holding an estimate input; flags override its fields.
    #[arg(long)]
    input: Option<PathBuf>,
    #[arg(long)]
    bill: Option<f64>,
    #[arg(long)]
    units: Option<f64>,
    #[arg(long = "rooftop-area")]
    rooftop_area: Option<f64>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long = "property-type")]
    property_type: Option<String>,
    #[arg(long = "no-subsidy")]
    no_subsidy: bool,
}

impl InputArgs {
    fn resolve(&self) -> Result<EstimateInput> {
        let mut input = match &self.input {
            Some(path) => read_input_file(path)?,
            None => EstimateInput::default(),
        };
        if let Some(bill) = self.bill {
            input.monthly_bill = bill;
        }
        if let Some(units) = self.units {
            input.monthly_units = units;
        }
        if let Some(area) = self.rooftop_area {
            input.rooftop_area = area;
        }
        if let Some(state) = &self.state {
            input.state = state.clone();
        }
        if let Some(raw) = &self.property_type {
            input.property_type = PropertyType::from_str(raw)?;
        }
        if self.no_subsidy {
            input.eligible_for_subsidy = false;
        }
        Ok(input)
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    Estimate {
        #[command(flatten)]
        input: InputArgs,
    },
    Loans {
        #[command(flatten)]
        input: InputArgs,
    },
    Projection {
        #[command(flatten)]
        input: InputArgs,
    },
    Regions,
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        loan_interest_rate: cli.loan_rate,
        tariff_increase_rate: cli.tariff_growth,
        consumption_growth_rate: cli.consumption_growth,
        lifespan_years: cli.lifespan,
        inverter_replacement_year: cli.inverter_year,
        cost_per_kw: cli.cost_per_kw,
        fallback_tariff_rate: cli.fallback_tariff,
        regions: (!cli.regions.is_empty()).then(|| cli.regions.iter().cloned().collect()),
    });

    if matches!(cli.command, Commands::Config { .. }) {
        return handle_config_command(&cli.command, &config, &config_path);
    }

    let estimator = SolarEstimator::new(config).context("configuration rejected")?;

    match &cli.command {
        Commands::Estimate { input } => {
            let result = run_estimate(&estimator, input)?;
            print_estimate(&result, cli.output)?;
        }
        Commands::Loans { input } => {
            let result = run_estimate(&estimator, input)?;
            match cli.output {
                OutputFormat::Table => println!("{}", render_loan_table(&result.loan_options)),
                OutputFormat::Json => println!("{}", render_json(&result.loan_options)?),
                OutputFormat::Csv => println!("{}", loans_to_csv(&result.loan_options)?),
            }
        }
        Commands::Projection { input } => {
            let result = run_estimate(&estimator, input)?;
            match cli.output {
                OutputFormat::Table => {
                    println!("{}", render_projection_table(&result.yearly_projection))
                }
                OutputFormat::Json => println!("{}", render_json(&result.yearly_projection)?),
                OutputFormat::Csv => println!("{}", projection_to_csv(&result.yearly_projection)?),
            }
        }
        Commands::Regions => {
            let regions = &estimator.config().irradiation.regions;
            match cli.output {
                OutputFormat::Table => println!("{}", render_regions_table(regions)),
                OutputFormat::Json | OutputFormat::Csv => {
                    if matches!(cli.output, OutputFormat::Csv) {
                        warn!("CSV output for regions not implemented, using JSON");
                    }
                    println!("{}", render_json(regions)?);
                }
            }
        }
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn run_estimate(estimator: &SolarEstimator, args: &InputArgs) -> Result<EstimateResult> {
    let input = args.resolve()?;
    info!(
        property_type = %input.property_type,
        state = %input.state,
        "running estimate"
    );
    estimator
        .estimate(&input)
        .context("estimate failed")
}

fn parse_region_override(raw: &str) -> Result<(String, f64)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected NAME=VALUE, got {raw}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("region name is empty in {raw}"));
    }
    let value = value
        .trim()
        .parse::<f64>()
        .with_context(|| format!("invalid irradiation in {raw}"))?;
    Ok((name.to_string(), value))
}

fn read_input_file(path: &Path) -> Result<EstimateInput> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed reading input: {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("failed parsing input JSON: {}", path.display()))
}

fn handle_config_command(command: &Commands, config: &Config, config_path: &Path) -> Result<()> {
    let Commands::Config { init, show } = command else {
        return Ok(());
    };
    if *init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if *show || !*init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn print_estimate(result: &EstimateResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", render_summary_table(result));
            println!("{}", render_loan_table(&result.loan_options));
        }
        OutputFormat::Json => println!("{}", render_json(result)?),
        OutputFormat::Csv => {
            warn!("CSV output for estimate covers the yearly projection only");
            println!("{}", projection_to_csv(&result.yearly_projection)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_region_override;

    #[test]
    fn parses_region_overrides() {
        let (name, value) = parse_region_override("Tamil Nadu=5.9").expect("valid override");
        assert_eq!(name, "Tamil Nadu");
        assert!((value - 5.9).abs() < 1e-12);
        assert!(parse_region_override("Goa").is_err());
        assert!(parse_region_override("=5.0").is_err());
        assert!(parse_region_override("Goa=sunny").is_err());
    }
}

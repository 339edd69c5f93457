use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::EstimateError;

pub const DEFAULT_REGION: &str = "default";
/// Longest system life the estimator will project, in years.
pub const MAX_LIFESPAN_YEARS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub irradiation: IrradiationConfig,
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub costs: CostsConfig,
    #[serde(default)]
    pub tariff: TariffConfig,
    #[serde(default)]
    pub growth: GrowthConfig,
    #[serde(default)]
    pub loan: LoanConfig,
    #[serde(default)]
    pub subsidy: SubsidyConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
}

/// Average daily irradiation per region, in kWh per installed kW per day.
///
/// Entries read from a config file are merged over the built-in table, so a
/// file only has to list the regions it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrradiationConfig {
    #[serde(
        default = "default_regions",
        deserialize_with = "merge_regions"
    )]
    pub regions: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_panel_efficiency")]
    pub panel_efficiency: f64,
    #[serde(default = "default_degradation_rate")]
    pub degradation_rate: f64,
    #[serde(default = "default_performance_ratio")]
    pub performance_ratio: f64,
    /// Rooftop area needed per installed kW, in square feet.
    #[serde(default = "default_space_per_kw")]
    pub space_per_kw: f64,
    #[serde(default = "default_lifespan_years")]
    pub lifespan_years: u32,
    #[serde(default = "default_inverter_replacement_year")]
    pub inverter_replacement_year: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostsConfig {
    #[serde(default = "default_cost_per_kw")]
    pub cost_per_kw: f64,
    #[serde(default = "default_inverter_cost_per_kw")]
    pub inverter_cost_per_kw: f64,
    /// Yearly operations and maintenance cost per installed kW.
    #[serde(default = "default_om_cost_per_kw")]
    pub om_cost_per_kw: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TariffConfig {
    /// Per-unit rate used when the input carries only one of bill or units.
    /// Without it such inputs are rejected.
    #[serde(default)]
    pub fallback_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthConfig {
    #[serde(default = "default_tariff_increase_rate")]
    pub tariff_increase_rate: f64,
    #[serde(default = "default_consumption_growth_rate")]
    pub consumption_growth_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanConfig {
    /// Annual rate; the monthly rate is this divided by 12.
    #[serde(default = "default_loan_interest_rate")]
    pub interest_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsidyConfig {
    #[serde(default = "default_residential_up_to_2kw")]
    pub residential_up_to_2kw: f64,
    #[serde(default = "default_residential_up_to_3kw")]
    pub residential_up_to_3kw: f64,
    #[serde(default = "default_residential_above_3kw")]
    pub residential_above_3kw: f64,
    #[serde(default)]
    pub commercial: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Grid emission factor in kg CO2 per kWh.
    #[serde(default = "default_co2_per_kwh")]
    pub co2_per_kwh: f64,
    #[serde(default = "default_trees_per_ton_co2")]
    pub trees_per_ton_co2: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub loan_interest_rate: Option<f64>,
    pub tariff_increase_rate: Option<f64>,
    pub consumption_growth_rate: Option<f64>,
    pub lifespan_years: Option<u32>,
    pub inverter_replacement_year: Option<u32>,
    pub cost_per_kw: Option<f64>,
    pub fallback_tariff_rate: Option<f64>,
    pub regions: Option<BTreeMap<String, f64>>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/solar-estimator/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        Self::from_toml_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))
    }

    pub fn from_toml_str(data: &str) -> Result<Self> {
        Ok(toml::from_str(data)?)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(rate) = overrides.loan_interest_rate {
            self.loan.interest_rate = rate;
        }
        if let Some(rate) = overrides.tariff_increase_rate {
            self.growth.tariff_increase_rate = rate;
        }
        if let Some(rate) = overrides.consumption_growth_rate {
            self.growth.consumption_growth_rate = rate;
        }
        if let Some(years) = overrides.lifespan_years {
            self.system.lifespan_years = years;
        }
        if let Some(year) = overrides.inverter_replacement_year {
            self.system.inverter_replacement_year = year;
        }
        if let Some(cost) = overrides.cost_per_kw {
            self.costs.cost_per_kw = cost;
        }
        if let Some(rate) = overrides.fallback_tariff_rate {
            self.tariff.fallback_rate = Some(rate);
        }
        if let Some(regions) = overrides.regions {
            self.irradiation.regions.extend(regions);
        }
    }

    /// Rejects values that would make the estimate divide by zero or
    /// produce meaningless figures.
    pub fn validate(&self) -> Result<(), EstimateError> {
        if !self.irradiation.regions.contains_key(DEFAULT_REGION) {
            return Err(EstimateError::invalid_config(format!(
                "irradiation table has no `{DEFAULT_REGION}` entry"
            )));
        }
        for (region, value) in &self.irradiation.regions {
            if !value.is_finite() || *value <= 0.0 {
                return Err(EstimateError::invalid_config(format!(
                    "irradiation for {region} must be positive, got {value}"
                )));
            }
        }
        let pr = self.system.performance_ratio;
        if !(pr > 0.0 && pr <= 1.0) {
            return Err(EstimateError::invalid_config(format!(
                "performance ratio must be in (0, 1], got {pr}"
            )));
        }
        if !(self.system.space_per_kw > 0.0) {
            return Err(EstimateError::invalid_config(
                "space per kW must be positive",
            ));
        }
        let lifespan = self.system.lifespan_years;
        if lifespan == 0 || lifespan > MAX_LIFESPAN_YEARS {
            return Err(EstimateError::invalid_config(format!(
                "system lifespan must be between 1 and {MAX_LIFESPAN_YEARS} years, got {lifespan}"
            )));
        }
        let inverter_year = self.system.inverter_replacement_year;
        if inverter_year == 0 || inverter_year > lifespan {
            return Err(EstimateError::invalid_config(format!(
                "inverter replacement year must be between 1 and {lifespan}, got {inverter_year}"
            )));
        }
        if !(0.0..1.0).contains(&self.system.degradation_rate) {
            return Err(EstimateError::invalid_config(format!(
                "degradation rate must be in [0, 1), got {}",
                self.system.degradation_rate
            )));
        }
        if let Some(rate) = self.tariff.fallback_rate {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(EstimateError::invalid_config(format!(
                    "fallback tariff rate must be positive, got {rate}"
                )));
            }
        }

        let non_negative = [
            ("panel efficiency", self.system.panel_efficiency),
            ("cost per kW", self.costs.cost_per_kw),
            ("inverter cost per kW", self.costs.inverter_cost_per_kw),
            ("O&M cost per kW", self.costs.om_cost_per_kw),
            ("tariff increase rate", self.growth.tariff_increase_rate),
            ("consumption growth rate", self.growth.consumption_growth_rate),
            ("loan interest rate", self.loan.interest_rate),
            ("residential subsidy up to 2 kW", self.subsidy.residential_up_to_2kw),
            ("residential subsidy up to 3 kW", self.subsidy.residential_up_to_3kw),
            ("residential subsidy above 3 kW", self.subsidy.residential_above_3kw),
            ("commercial subsidy", self.subsidy.commercial),
            ("CO2 per kWh", self.environment.co2_per_kwh),
            ("trees per ton CO2", self.environment.trees_per_ton_co2),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(EstimateError::invalid_config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn default_template() -> String {
        let template = r#"# Regions listed here are merged over the built-in table.
[irradiation.regions]
default = 5.0
Rajasthan = 5.7
Gujarat = 5.6

[system]
panel_efficiency = 0.19
degradation_rate = 0.005
performance_ratio = 0.8
space_per_kw = 100.0
lifespan_years = 25
inverter_replacement_year = 10

[costs]
cost_per_kw = 50000.0
inverter_cost_per_kw = 8000.0
om_cost_per_kw = 500.0

[tariff]
# fallback_rate = 8.0

[growth]
tariff_increase_rate = 0.05
consumption_growth_rate = 0.02

[loan]
interest_rate = 0.12

[subsidy]
residential_up_to_2kw = 30000.0
residential_up_to_3kw = 60000.0
residential_above_3kw = 78000.0
commercial = 0.0

[environment]
co2_per_kwh = 0.82
trees_per_ton_co2 = 50.0
"#;
        template.to_string()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            irradiation: IrradiationConfig::default(),
            system: SystemConfig::default(),
            costs: CostsConfig::default(),
            tariff: TariffConfig::default(),
            growth: GrowthConfig::default(),
            loan: LoanConfig::default(),
            subsidy: SubsidyConfig::default(),
            environment: EnvironmentConfig::default(),
        }
    }
}

impl Default for IrradiationConfig {
    fn default() -> Self {
        Self {
            regions: default_regions(),
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            panel_efficiency: default_panel_efficiency(),
            degradation_rate: default_degradation_rate(),
            performance_ratio: default_performance_ratio(),
            space_per_kw: default_space_per_kw(),
            lifespan_years: default_lifespan_years(),
            inverter_replacement_year: default_inverter_replacement_year(),
        }
    }
}

impl Default for CostsConfig {
    fn default() -> Self {
        Self {
            cost_per_kw: default_cost_per_kw(),
            inverter_cost_per_kw: default_inverter_cost_per_kw(),
            om_cost_per_kw: default_om_cost_per_kw(),
        }
    }
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            tariff_increase_rate: default_tariff_increase_rate(),
            consumption_growth_rate: default_consumption_growth_rate(),
        }
    }
}

impl Default for LoanConfig {
    fn default() -> Self {
        Self {
            interest_rate: default_loan_interest_rate(),
        }
    }
}

impl Default for SubsidyConfig {
    fn default() -> Self {
        Self {
            residential_up_to_2kw: default_residential_up_to_2kw(),
            residential_up_to_3kw: default_residential_up_to_3kw(),
            residential_above_3kw: default_residential_above_3kw(),
            commercial: 0.0,
        }
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            co2_per_kwh: default_co2_per_kwh(),
            trees_per_ton_co2: default_trees_per_ton_co2(),
        }
    }
}

fn merge_regions<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = BTreeMap::<String, f64>::deserialize(deserializer)?;
    let mut regions = default_regions();
    regions.extend(overrides);
    Ok(regions)
}

pub fn default_regions() -> BTreeMap<String, f64> {
    [
        (DEFAULT_REGION, 5.0),
        ("Andhra Pradesh", 5.5),
        ("Bihar", 4.8),
        ("Delhi", 5.1),
        ("Gujarat", 5.6),
        ("Haryana", 5.1),
        ("Karnataka", 5.4),
        ("Kerala", 4.8),
        ("Madhya Pradesh", 5.4),
        ("Maharashtra", 5.3),
        ("Odisha", 4.9),
        ("Punjab", 5.0),
        ("Rajasthan", 5.7),
        ("Tamil Nadu", 5.5),
        ("Telangana", 5.4),
        ("Uttar Pradesh", 5.0),
        ("West Bengal", 4.6),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value))
    .collect()
}

fn default_panel_efficiency() -> f64 {
    0.19
}

fn default_degradation_rate() -> f64 {
    0.005
}

fn default_performance_ratio() -> f64 {
    0.80
}

fn default_space_per_kw() -> f64 {
    100.0
}

fn default_lifespan_years() -> u32 {
    25
}

fn default_inverter_replacement_year() -> u32 {
    10
}

fn default_cost_per_kw() -> f64 {
    50_000.0
}

fn default_inverter_cost_per_kw() -> f64 {
    8_000.0
}

fn default_om_cost_per_kw() -> f64 {
    500.0
}

fn default_tariff_increase_rate() -> f64 {
    0.05
}

fn default_consumption_growth_rate() -> f64 {
    0.02
}

fn default_loan_interest_rate() -> f64 {
    0.12
}

fn default_residential_up_to_2kw() -> f64 {
    30_000.0
}

fn default_residential_up_to_3kw() -> f64 {
    60_000.0
}

fn default_residential_above_3kw() -> f64 {
    78_000.0
}

fn default_co2_per_kwh() -> f64 {
    0.82
}

fn default_trees_per_ton_co2() -> f64 {
    50.0
}

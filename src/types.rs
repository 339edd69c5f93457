use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::DEFAULT_REGION;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    #[default]
    Residential,
    Commercial,
}

impl PropertyType {
    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Residential => "residential",
            Self::Commercial => "commercial",
        }
    }
}

impl Display for PropertyType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_slug())
    }
}

#[derive(Debug, Error)]
#[error("unknown property type: {0}")]
pub struct PropertyTypeParseError(pub String);

impl FromStr for PropertyType {
    type Err = PropertyTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "residential" | "home" => Ok(Self::Residential),
            "commercial" | "business" => Ok(Self::Commercial),
            _ => Err(PropertyTypeParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateInput {
    #[serde(default)]
    pub property_type: PropertyType,
    #[serde(default)]
    pub monthly_bill: f64,
    #[serde(default)]
    pub monthly_units: f64,
    /// Usable rooftop area in square feet; 0 leaves the size unconstrained.
    #[serde(default)]
    pub rooftop_area: f64,
    #[serde(default = "default_state")]
    pub state: String,
    #[serde(default = "default_true")]
    pub eligible_for_subsidy: bool,
}

impl Default for EstimateInput {
    fn default() -> Self {
        Self {
            property_type: PropertyType::Residential,
            monthly_bill: 0.0,
            monthly_units: 0.0,
            rooftop_area: 0.0,
            state: default_state(),
            eligible_for_subsidy: true,
        }
    }
}

impl EstimateInput {
    pub fn new(monthly_bill: f64, monthly_units: f64) -> Self {
        Self {
            monthly_bill,
            monthly_units,
            ..Self::default()
        }
    }

    pub fn with_property_type(mut self, property_type: PropertyType) -> Self {
        self.property_type = property_type;
        self
    }

    pub fn with_rooftop_area(mut self, area: f64) -> Self {
        self.rooftop_area = area;
        self
    }

    pub fn with_state(mut self, state: &str) -> Self {
        self.state = state.to_string();
        self
    }

    pub fn with_subsidy(mut self, eligible: bool) -> Self {
        self.eligible_for_subsidy = eligible;
        self
    }
}

fn default_state() -> String {
    DEFAULT_REGION.to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResult {
    pub system_details: SystemDetails,
    pub financials: Financials,
    pub loan_options: Vec<LoanOption>,
    pub environmental_impact: EnvironmentalImpact,
    pub yearly_projection: Vec<YearlyProjectionEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemDetails {
    pub region: String,
    pub irradiation: f64,
    pub region_fallback: bool,
    pub tariff_rate: f64,
    pub monthly_consumption_kwh: f64,
    pub annual_consumption_kwh: f64,
    pub system_size_required_kw: f64,
    pub max_system_size_kw: Option<f64>,
    pub system_size_recommended_kw: f64,
    pub space_constrained: bool,
    pub space_required_sqft: f64,
    pub space_required_sqm: f64,
    pub space_used_sqft: f64,
    pub panel_efficiency: f64,
    pub daily_generation_kwh: f64,
    pub monthly_generation_kwh: f64,
    pub annual_generation_kwh: f64,
    pub max_solar_percentage: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SubsidyTier {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "0-2")]
    UpTo2Kw,
    #[serde(rename = "2-3")]
    UpTo3Kw,
    #[serde(rename = "3+")]
    Above3Kw,
}

impl Display for SubsidyTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::None => "none",
            Self::UpTo2Kw => "0-2",
            Self::UpTo3Kw => "2-3",
            Self::Above3Kw => "3+",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Financials {
    pub system_cost: f64,
    pub subsidy: f64,
    pub subsidy_tier: SubsidyTier,
    pub net_system_cost: f64,
    pub first_year_savings: f64,
    pub monthly_savings: f64,
    /// Lifetime savings with consumption held at today's level. The yearly
    /// projection grows consumption instead, so the two do not sum alike.
    pub total_savings: f64,
    pub payback_period_years: u32,
    /// `None` when the net cost is zero or negative.
    pub roi_percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanOption {
    pub tenure_months: u32,
    pub annual_interest_rate: f64,
    pub down_payment: f64,
    pub principal: f64,
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalImpact {
    pub co2_saved_annually_tons: f64,
    pub co2_saved_lifetime_tons: f64,
    pub trees_equivalent: u64,
    pub coal_saved_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyProjectionEntry {
    pub year: u32,
    pub generation_kwh: f64,
    pub consumption_kwh: f64,
    pub tariff_rate: f64,
    pub units_from_solar: f64,
    pub grid_units: f64,
    pub bill_without_solar: f64,
    pub bill_with_solar: f64,
    pub maintenance_cost: f64,
    /// Signed: the inverter replacement year can cost more than it saves.
    pub net_savings: f64,
    pub cumulative_cash_flow: f64,
}

/// Rounds a figure to two decimals for output.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        // Already integral at this magnitude.
        return value;
    }
    scaled.round() / 100.0
}

use std::collections::BTreeMap;

use tracing::warn;

use crate::config::{SystemConfig, DEFAULT_REGION};
use crate::error::EstimateError;
use crate::types::EstimateInput;

pub const SQFT_TO_SQM: f64 = 0.092903;
pub const DAYS_PER_YEAR: f64 = 365.0;
pub const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedConsumption {
    pub tariff_rate: f64,
    pub monthly_units: f64,
    pub annual_units: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionIrradiation {
    pub region: String,
    pub value: f64,
    pub fallback: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sizing {
    pub required_kw: f64,
    pub max_kw: Option<f64>,
    pub recommended_kw: f64,
    pub space_required_sqft: f64,
    pub space_used_sqft: f64,
    pub annual_generation_kwh: f64,
}

impl Sizing {
    pub fn space_constrained(&self) -> bool {
        self.recommended_kw < self.required_kw
    }
}

pub fn validate_input(input: &EstimateInput) -> Result<(), EstimateError> {
    let fields = [
        ("monthly bill", input.monthly_bill),
        ("monthly units", input.monthly_units),
        ("rooftop area", input.rooftop_area),
    ];
    for (name, value) in fields {
        if !value.is_finite() {
            return Err(EstimateError::invalid_input(format!(
                "{name} must be a finite number"
            )));
        }
        if value < 0.0 {
            return Err(EstimateError::invalid_input(format!(
                "{name} cannot be negative, got {value}"
            )));
        }
    }
    Ok(())
}

/// Derives the per-unit tariff and the monthly consumption from whichever of
/// bill and units the caller supplied.
///
/// With both present the tariff is `bill / units`. With only one of them the
/// missing value cannot be derived from the input alone, so the configured
/// fallback rate is used when there is one and the input is rejected when
/// there is not.
pub fn resolve_consumption(
    monthly_bill: f64,
    monthly_units: f64,
    fallback_rate: Option<f64>,
) -> Result<ResolvedConsumption, EstimateError> {
    let (tariff_rate, monthly_units) = match (monthly_bill > 0.0, monthly_units > 0.0) {
        (true, true) => (monthly_bill / monthly_units, monthly_units),
        (false, true) => {
            let rate = fallback_rate.ok_or_else(|| {
                EstimateError::invalid_input(
                    "monthly bill is required to derive the tariff rate from monthly units",
                )
            })?;
            (rate, monthly_units)
        }
        (true, false) => {
            let rate = fallback_rate.ok_or_else(|| {
                EstimateError::invalid_input(
                    "monthly units are required to derive consumption from the monthly bill",
                )
            })?;
            (rate, monthly_bill / rate)
        }
        (false, false) => {
            return Err(EstimateError::invalid_input(
                "either monthly bill or monthly units is required",
            ))
        }
    };

    Ok(ResolvedConsumption {
        tariff_rate,
        monthly_units,
        annual_units: monthly_units * MONTHS_PER_YEAR,
    })
}

pub fn lookup_irradiation(
    regions: &BTreeMap<String, f64>,
    region: &str,
) -> Result<RegionIrradiation, EstimateError> {
    if let Some(value) = regions.get(region) {
        return Ok(RegionIrradiation {
            region: region.to_string(),
            value: *value,
            fallback: false,
        });
    }
    let value = regions.get(DEFAULT_REGION).copied().ok_or_else(|| {
        EstimateError::invalid_config(format!(
            "irradiation table has no `{DEFAULT_REGION}` entry"
        ))
    })?;
    warn!(region, value, "unknown region, using default irradiation");
    Ok(RegionIrradiation {
        region: DEFAULT_REGION.to_string(),
        value,
        fallback: true,
    })
}

pub fn annual_generation(size_kw: f64, irradiation: f64, performance_ratio: f64) -> f64 {
    size_kw * irradiation * performance_ratio * DAYS_PER_YEAR
}

/// Sizes the array so its expected daily output matches average daily
/// consumption, capped by the roof when an area is given.
pub fn size_system(
    annual_consumption: f64,
    irradiation: f64,
    system: &SystemConfig,
    rooftop_area: f64,
) -> Sizing {
    let daily_consumption = annual_consumption / DAYS_PER_YEAR;
    let required_kw = daily_consumption / (irradiation * system.performance_ratio);

    let max_kw = (rooftop_area > 0.0).then(|| rooftop_area / system.space_per_kw);
    let recommended_kw = match max_kw {
        Some(max) => required_kw.min(max),
        None => required_kw,
    };

    Sizing {
        required_kw,
        max_kw,
        recommended_kw,
        space_required_sqft: required_kw * system.space_per_kw,
        space_used_sqft: recommended_kw * system.space_per_kw,
        annual_generation_kwh: annual_generation(
            recommended_kw,
            irradiation,
            system.performance_ratio,
        ),
    }
}

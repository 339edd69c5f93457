use crate::config::{CostsConfig, SubsidyConfig};
use crate::types::{PropertyType, SubsidyTier};

pub fn system_cost(size_kw: f64, costs: &CostsConfig) -> f64 {
    size_kw * (costs.cost_per_kw + costs.inverter_cost_per_kw)
}

/// Flat subsidy amount for the recommended size. Residential systems get a
/// tiered amount when the owner opts in; commercial systems always get the
/// commercial amount.
pub fn subsidy_for(
    size_kw: f64,
    property_type: PropertyType,
    eligible: bool,
    subsidy: &SubsidyConfig,
) -> (f64, SubsidyTier) {
    match property_type {
        PropertyType::Commercial => (subsidy.commercial, SubsidyTier::None),
        PropertyType::Residential if !eligible => (0.0, SubsidyTier::None),
        PropertyType::Residential => {
            if size_kw <= 2.0 {
                (subsidy.residential_up_to_2kw, SubsidyTier::UpTo2Kw)
            } else if size_kw <= 3.0 {
                (subsidy.residential_up_to_3kw, SubsidyTier::UpTo3Kw)
            } else {
                (subsidy.residential_above_3kw, SubsidyTier::Above3Kw)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Savings {
    pub first_year: f64,
    pub lifetime: f64,
}

/// Savings over the system life with consumption held at the current level.
/// Generation decays and the tariff escalates year over year.
pub fn lifetime_savings(
    annual_generation: f64,
    annual_consumption: f64,
    tariff_rate: f64,
    degradation_rate: f64,
    tariff_increase_rate: f64,
    lifespan_years: u32,
) -> Savings {
    let first_year = annual_generation.min(annual_consumption) * tariff_rate;
    let mut lifetime = 0.0;
    let mut generation = annual_generation;
    let mut tariff = tariff_rate;
    for _ in 0..lifespan_years {
        lifetime += generation.min(annual_consumption) * tariff;
        generation *= 1.0 - degradation_rate;
        tariff *= 1.0 + tariff_increase_rate;
    }
    Savings {
        first_year,
        lifetime,
    }
}

/// Whole years until first-year savings, escalated with the tariff, cover
/// the net cost. Generation decay is ignored here. Capped at the lifespan.
pub fn payback_period(
    first_year_savings: f64,
    net_cost: f64,
    tariff_increase_rate: f64,
    lifespan_years: u32,
) -> u32 {
    if net_cost <= 0.0 {
        return 0;
    }
    let mut cumulative = 0.0;
    let mut yearly = first_year_savings;
    for year in 1..=lifespan_years {
        cumulative += yearly;
        if cumulative >= net_cost {
            return year;
        }
        yearly *= 1.0 + tariff_increase_rate;
    }
    lifespan_years
}

pub fn roi_percentage(total_savings: f64, net_cost: f64) -> Option<f64> {
    if net_cost <= 0.0 {
        return None;
    }
    Some((total_savings - net_cost) / net_cost * 100.0)
}

use crate::config::EnvironmentConfig;
use crate::types::{round2, EnvironmentalImpact};

pub const COAL_KG_PER_KWH: f64 = 0.6;

pub fn environmental_impact(
    annual_generation: f64,
    lifespan_years: u32,
    environment: &EnvironmentConfig,
) -> EnvironmentalImpact {
    let co2_annual_tons = annual_generation * environment.co2_per_kwh / 1000.0;
    let co2_lifetime_tons = co2_annual_tons * f64::from(lifespan_years);
    let trees = (co2_lifetime_tons * environment.trees_per_ton_co2).round();

    EnvironmentalImpact {
        co2_saved_annually_tons: round2(co2_annual_tons),
        co2_saved_lifetime_tons: round2(co2_lifetime_tons),
        trees_equivalent: trees.max(0.0) as u64,
        coal_saved_kg: round2(annual_generation * COAL_KG_PER_KWH),
    }
}

use crate::config::Config;
use crate::types::{round2, YearlyProjectionEntry};

/// Year-one figures the projection compounds from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionBasis {
    pub system_size_kw: f64,
    pub annual_generation: f64,
    pub annual_consumption: f64,
    pub tariff_rate: f64,
    pub net_system_cost: f64,
}

/// Cash flow for every year of the system life. Unlike the lifetime savings
/// figure, consumption grows here at the configured rate.
pub fn yearly_projection(basis: &ProjectionBasis, config: &Config) -> Vec<YearlyProjectionEntry> {
    let lifespan = config.system.lifespan_years;
    let yearly_om = basis.system_size_kw * config.costs.om_cost_per_kw;
    let inverter_replacement = basis.system_size_kw * config.costs.inverter_cost_per_kw;

    let mut entries = Vec::with_capacity(lifespan as usize);
    let mut generation = basis.annual_generation;
    let mut consumption = basis.annual_consumption;
    let mut tariff = basis.tariff_rate;
    let mut cumulative = -basis.net_system_cost;

    for year in 1..=lifespan {
        let units_from_solar = generation.min(consumption);
        let grid_units = consumption - units_from_solar;
        let bill_without_solar = consumption * tariff;
        let bill_with_solar = grid_units * tariff;

        let mut maintenance = yearly_om;
        if year == config.system.inverter_replacement_year {
            maintenance += inverter_replacement;
        }
        let net_savings = bill_without_solar - bill_with_solar - maintenance;
        cumulative += net_savings;

        entries.push(YearlyProjectionEntry {
            year,
            generation_kwh: round2(generation),
            consumption_kwh: round2(consumption),
            tariff_rate: round2(tariff),
            units_from_solar: round2(units_from_solar),
            grid_units: round2(grid_units),
            bill_without_solar: round2(bill_without_solar),
            bill_with_solar: round2(bill_with_solar),
            maintenance_cost: round2(maintenance),
            net_savings: round2(net_savings),
            cumulative_cash_flow: round2(cumulative),
        });

        generation *= 1.0 - config.system.degradation_rate;
        consumption *= 1.0 + config.growth.consumption_growth_rate;
        tariff *= 1.0 + config.growth.tariff_increase_rate;
    }
    entries
}

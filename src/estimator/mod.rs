pub mod financials;
pub mod impact;
pub mod loan;
pub mod projection;
pub mod sizing;

use tracing::debug;

use crate::config::Config;
use crate::error::EstimateError;
use crate::types::{round2, EstimateInput, EstimateResult, Financials, SystemDetails};

use self::financials::{lifetime_savings, payback_period, roi_percentage, subsidy_for, system_cost};
use self::impact::environmental_impact;
use self::loan::loan_options;
use self::projection::{yearly_projection, ProjectionBasis};
use self::sizing::{
    lookup_irradiation, resolve_consumption, size_system, validate_input, DAYS_PER_YEAR,
    MONTHS_PER_YEAR, SQFT_TO_SQM,
};

/// Estimates a rooftop installation from a household's or business's usage.
///
/// The configuration is fixed at construction, so one estimator can serve
/// any number of calls, including from several threads at once.
#[derive(Debug, Clone)]
pub struct SolarEstimator {
    config: Config,
}

impl SolarEstimator {
    pub fn new(config: Config) -> Result<Self, EstimateError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn with_defaults() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn estimate(&self, input: &EstimateInput) -> Result<EstimateResult, EstimateError> {
        validate_input(input)?;
        let config = &self.config;
        let lifespan = config.system.lifespan_years;

        let consumption = resolve_consumption(
            input.monthly_bill,
            input.monthly_units,
            config.tariff.fallback_rate,
        )?;
        let irradiation = lookup_irradiation(&config.irradiation.regions, &input.state)?;
        let sizing = size_system(
            consumption.annual_units,
            irradiation.value,
            &config.system,
            input.rooftop_area,
        );
        let annual_generation = sizing.annual_generation_kwh;
        debug!(
            region = %irradiation.region,
            irradiation = irradiation.value,
            tariff = consumption.tariff_rate,
            required_kw = sizing.required_kw,
            recommended_kw = sizing.recommended_kw,
            "sized system"
        );

        let gross_cost = system_cost(sizing.recommended_kw, &config.costs);
        let (subsidy, subsidy_tier) = subsidy_for(
            sizing.recommended_kw,
            input.property_type,
            input.eligible_for_subsidy,
            &config.subsidy,
        );
        let net_cost = gross_cost - subsidy;

        let savings = lifetime_savings(
            annual_generation,
            consumption.annual_units,
            consumption.tariff_rate,
            config.system.degradation_rate,
            config.growth.tariff_increase_rate,
            lifespan,
        );
        let payback_years = payback_period(
            savings.first_year,
            net_cost,
            config.growth.tariff_increase_rate,
            lifespan,
        );
        ensure_finite(&[
            ("system size", sizing.required_kw),
            ("annual generation", annual_generation),
            ("system cost", gross_cost),
            ("net system cost", net_cost),
            ("first-year savings", savings.first_year),
            ("lifetime savings", savings.lifetime),
        ])?;
        debug!(
            gross_cost,
            subsidy,
            net_cost,
            first_year_savings = savings.first_year,
            payback_years,
            "computed financials"
        );

        let solar_share = (annual_generation / consumption.annual_units * 100.0).min(100.0);
        let system_details = SystemDetails {
            region: irradiation.region,
            irradiation: irradiation.value,
            region_fallback: irradiation.fallback,
            tariff_rate: round2(consumption.tariff_rate),
            monthly_consumption_kwh: round2(consumption.monthly_units),
            annual_consumption_kwh: round2(consumption.annual_units),
            system_size_required_kw: round2(sizing.required_kw),
            max_system_size_kw: sizing.max_kw.map(round2),
            system_size_recommended_kw: round2(sizing.recommended_kw),
            space_constrained: sizing.space_constrained(),
            space_required_sqft: round2(sizing.space_required_sqft),
            space_required_sqm: round2(sizing.space_required_sqft * SQFT_TO_SQM),
            space_used_sqft: round2(sizing.space_used_sqft),
            panel_efficiency: config.system.panel_efficiency,
            daily_generation_kwh: round2(annual_generation / DAYS_PER_YEAR),
            monthly_generation_kwh: round2(annual_generation / MONTHS_PER_YEAR),
            annual_generation_kwh: round2(annual_generation),
            max_solar_percentage: round2(solar_share),
        };

        let financials = Financials {
            system_cost: round2(gross_cost),
            subsidy: round2(subsidy),
            subsidy_tier,
            net_system_cost: round2(net_cost),
            first_year_savings: round2(savings.first_year),
            monthly_savings: round2(savings.first_year / MONTHS_PER_YEAR),
            total_savings: round2(savings.lifetime),
            payback_period_years: payback_years,
            roi_percentage: roi_percentage(savings.lifetime, net_cost).map(round2),
        };

        let yearly = yearly_projection(
            &ProjectionBasis {
                system_size_kw: sizing.recommended_kw,
                annual_generation,
                annual_consumption: consumption.annual_units,
                tariff_rate: consumption.tariff_rate,
                net_system_cost: net_cost,
            },
            config,
        );
        let loans = loan_options(net_cost, config.loan.interest_rate);
        for entry in &yearly {
            ensure_finite(&[
                ("yearly net savings", entry.net_savings),
                ("cumulative cash flow", entry.cumulative_cash_flow),
                ("bill without solar", entry.bill_without_solar),
            ])?;
        }
        for option in &loans {
            ensure_finite(&[
                ("monthly payment", option.monthly_payment),
                ("total loan payment", option.total_payment),
            ])?;
        }

        Ok(EstimateResult {
            system_details,
            financials,
            loan_options: loans,
            environmental_impact: environmental_impact(
                annual_generation,
                lifespan,
                &config.environment,
            ),
            yearly_projection: yearly,
        })
    }
}

/// Inputs that pass validation can still overflow once multiplied out.
fn ensure_finite(figures: &[(&str, f64)]) -> Result<(), EstimateError> {
    match figures.iter().find(|(_, value)| !value.is_finite()) {
        Some((name, _)) => Err(EstimateError::invalid_input(format!(
            "input too large to estimate: {name} is not a finite number"
        ))),
        None => Ok(()),
    }
}

impl Default for SolarEstimator {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::SolarEstimator;
    use crate::config::{Config, ConfigOverrides};
    use crate::error::EstimateError;
    use crate::types::{EstimateInput, PropertyType, SubsidyTier};

    fn rajasthan_home() -> EstimateInput {
        EstimateInput::new(3000.0, 300.0).with_state("Rajasthan")
    }

    #[test]
    fn rajasthan_household_lands_in_middle_tier() {
        let result = SolarEstimator::with_defaults()
            .estimate(&rajasthan_home())
            .expect("estimate");
        let details = &result.system_details;
        assert_eq!(details.tariff_rate, 10.0);
        assert_eq!(details.annual_consumption_kwh, 3600.0);
        assert_eq!(details.irradiation, 5.7);
        assert_eq!(details.system_size_required_kw, 2.16);
        assert_eq!(details.system_size_recommended_kw, 2.16);
        assert_eq!(details.max_solar_percentage, 100.0);

        let financials = &result.financials;
        assert_eq!(financials.subsidy, 60_000.0);
        assert_eq!(financials.subsidy_tier, SubsidyTier::UpTo3Kw);
        assert!(financials.net_system_cost > 0.0);
        assert_eq!(financials.first_year_savings, 36_000.0);
        assert_eq!(financials.monthly_savings, 3_000.0);
        assert!(financials.payback_period_years >= 1 && financials.payback_period_years <= 25);
        assert!(financials.roi_percentage.expect("roi") > 0.0);

        assert_eq!(result.loan_options.len(), 5);
        assert_eq!(result.yearly_projection.len(), 25);
    }

    #[test]
    fn rejects_input_without_bill_or_units() {
        let err = SolarEstimator::with_defaults()
            .estimate(&EstimateInput::default())
            .expect_err("must fail");
        assert!(matches!(err, EstimateError::InvalidInput(_)));
        assert!(err.to_string().contains("monthly bill or monthly units"));
    }

    #[test]
    fn rejects_negative_input() {
        let err = SolarEstimator::with_defaults()
            .estimate(&EstimateInput::new(3000.0, -300.0))
            .expect_err("must fail");
        assert!(matches!(err, EstimateError::InvalidInput(_)));
    }

    #[test]
    fn rejects_input_that_overflows() {
        let err = SolarEstimator::with_defaults()
            .estimate(&EstimateInput::new(1e300, 1e307))
            .expect_err("must fail");
        match err {
            EstimateError::InvalidInput(message) => {
                assert!(message.contains("input too large to estimate"))
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let huge_bill_only = SolarEstimator::with_defaults()
            .estimate(&EstimateInput::new(f64::MAX, f64::MAX / 1e10));
        assert!(matches!(huge_bill_only, Err(EstimateError::InvalidInput(_))));
    }

    #[test]
    fn rejects_invalid_config() {
        let mut config = Config::default();
        config.system.performance_ratio = 1.5;
        assert!(matches!(
            SolarEstimator::new(config),
            Err(EstimateError::InvalidConfig(_))
        ));
    }

    #[test]
    fn identical_calls_give_identical_results() {
        let estimator = SolarEstimator::with_defaults();
        let input = rajasthan_home().with_rooftop_area(180.0);
        let first = estimator.estimate(&input).expect("first");
        let second = estimator.estimate(&input).expect("second");
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).expect("json"),
            serde_json::to_string(&second).expect("json")
        );
    }

    #[test]
    fn roof_limits_the_system() {
        let result = SolarEstimator::with_defaults()
            .estimate(&rajasthan_home().with_rooftop_area(150.0))
            .expect("estimate");
        let details = &result.system_details;
        assert!(details.space_constrained);
        assert_eq!(details.max_system_size_kw, Some(1.5));
        assert_eq!(details.system_size_recommended_kw, 1.5);
        assert!(details.system_size_recommended_kw <= details.system_size_required_kw);
        assert_eq!(result.financials.subsidy_tier, SubsidyTier::UpTo2Kw);
        assert!(details.max_solar_percentage < 100.0);
    }

    #[test]
    fn commercial_property_gets_no_subsidy() {
        let input = rajasthan_home()
            .with_property_type(PropertyType::Commercial)
            .with_subsidy(true);
        let result = SolarEstimator::with_defaults()
            .estimate(&input)
            .expect("estimate");
        assert_eq!(result.financials.subsidy, 0.0);
        assert_eq!(
            result.financials.net_system_cost,
            result.financials.system_cost
        );
    }

    #[test]
    fn subsidy_above_cost_zeroes_loans() {
        let mut config = Config::default();
        config.subsidy.residential_up_to_2kw = 500_000.0;
        let estimator = SolarEstimator::new(config).expect("valid config");
        let result = estimator
            .estimate(&EstimateInput::new(1000.0, 100.0))
            .expect("estimate");
        assert!(result.financials.net_system_cost < 0.0);
        assert_eq!(result.financials.payback_period_years, 0);
        assert_eq!(result.financials.roi_percentage, None);
        assert!(result.loan_options.iter().all(|o| o.monthly_payment == 0.0));
        assert!(result.yearly_projection[0].cumulative_cash_flow > 0.0);
    }

    #[test]
    fn fallback_rate_resolves_bill_only_input() {
        let mut config = Config::default();
        config.apply_overrides(ConfigOverrides {
            fallback_tariff_rate: Some(8.0),
            ..ConfigOverrides::default()
        });
        let estimator = SolarEstimator::new(config).expect("valid config");
        let result = estimator
            .estimate(&EstimateInput::new(2400.0, 0.0))
            .expect("estimate");
        assert_eq!(result.system_details.monthly_consumption_kwh, 300.0);
        assert_eq!(result.system_details.tariff_rate, 8.0);

        let strict = SolarEstimator::with_defaults();
        assert!(strict.estimate(&EstimateInput::new(2400.0, 0.0)).is_err());
    }

    #[test]
    fn unknown_state_uses_default_irradiation() {
        let result = SolarEstimator::with_defaults()
            .estimate(&EstimateInput::new(3000.0, 300.0).with_state("Atlantis"))
            .expect("estimate");
        assert!(result.system_details.region_fallback);
        assert_eq!(result.system_details.irradiation, 5.0);
    }
}

use std::sync::Arc;
use std::thread;

use solar_estimator::config::{Config, ConfigOverrides};
use solar_estimator::estimator::SolarEstimator;
use solar_estimator::types::{EstimateInput, PropertyType, SubsidyTier};
use solar_estimator::EstimateError;

fn household(bill: f64, units: f64, state: &str) -> EstimateInput {
    EstimateInput::new(bill, units).with_state(state)
}

#[test]
fn rajasthan_scenario_matches_closed_form() {
    let estimator = SolarEstimator::with_defaults();
    let result = estimator
        .estimate(&household(3000.0, 300.0, "Rajasthan"))
        .expect("estimate");

    let expected_kw = 3600.0 / 365.0 / (5.7 * 0.80);
    let details = &result.system_details;
    assert!((details.system_size_required_kw - expected_kw).abs() < 0.005);
    assert_eq!(details.system_size_required_kw, details.system_size_recommended_kw);
    assert_eq!(result.financials.subsidy_tier, SubsidyTier::UpTo3Kw);
    assert_eq!(result.financials.subsidy, 60_000.0);

    let expected_cost = expected_kw * 58_000.0;
    assert!((result.financials.system_cost - expected_cost).abs() < 0.01);
    assert!((result.financials.net_system_cost - (expected_cost - 60_000.0)).abs() < 0.01);
}

#[test]
fn recommended_never_exceeds_required() {
    let estimator = SolarEstimator::with_defaults();
    for area in [0.0, 50.0, 150.0, 216.0, 400.0, 5_000.0] {
        for units in [100.0, 300.0, 900.0] {
            let input = household(units * 8.0, units, "Gujarat").with_rooftop_area(area);
            let result = estimator.estimate(&input).expect("estimate");
            let details = &result.system_details;
            assert!(details.system_size_recommended_kw <= details.system_size_required_kw);
            if area == 0.0 {
                assert_eq!(
                    details.system_size_recommended_kw,
                    details.system_size_required_kw
                );
                assert!(details.max_system_size_kw.is_none());
            }
        }
    }
}

#[test]
fn money_and_energy_figures_are_non_negative() {
    let estimator = SolarEstimator::with_defaults();
    let result = estimator
        .estimate(&household(4500.0, 500.0, "Karnataka").with_rooftop_area(250.0))
        .expect("estimate");

    let details = &result.system_details;
    let financials = &result.financials;
    for value in [
        details.annual_generation_kwh,
        details.space_required_sqft,
        details.space_required_sqm,
        financials.system_cost,
        financials.subsidy,
        financials.first_year_savings,
        financials.total_savings,
        result.environmental_impact.co2_saved_annually_tons,
        result.environmental_impact.coal_saved_kg,
    ] {
        assert!(value >= 0.0);
    }
    for entry in &result.yearly_projection {
        assert!(entry.generation_kwh >= 0.0);
        assert!(entry.bill_with_solar >= 0.0);
        assert!(entry.bill_with_solar <= entry.bill_without_solar);
        assert!(entry.maintenance_cost >= 0.0);
    }
    let first = &result.yearly_projection[0];
    assert!(first.cumulative_cash_flow > -financials.net_system_cost);
}

#[test]
fn commercial_ignores_subsidy_flag() {
    let estimator = SolarEstimator::with_defaults();
    for eligible in [true, false] {
        for units in [150.0, 300.0, 1_000.0] {
            let input = household(units * 9.0, units, "Delhi")
                .with_property_type(PropertyType::Commercial)
                .with_subsidy(eligible);
            let result = estimator.estimate(&input).expect("estimate");
            assert_eq!(result.financials.subsidy, 0.0);
        }
    }
}

#[test]
fn zero_interest_loans_have_no_interest() {
    let mut config = Config::default();
    config.apply_overrides(ConfigOverrides {
        loan_interest_rate: Some(0.0),
        ..ConfigOverrides::default()
    });
    let estimator = SolarEstimator::new(config).expect("valid config");
    let result = estimator
        .estimate(&household(3000.0, 300.0, "Rajasthan"))
        .expect("estimate");
    assert_eq!(result.loan_options.len(), 5);
    for option in &result.loan_options {
        assert_eq!(option.total_interest, 0.0);
        assert!(option.monthly_payment.is_finite());
    }
}

#[test]
fn missing_consumption_is_rejected() {
    let err = SolarEstimator::with_defaults()
        .estimate(&EstimateInput::new(0.0, 0.0).with_state("Rajasthan"))
        .expect_err("must fail");
    assert_eq!(
        err,
        EstimateError::InvalidInput("either monthly bill or monthly units is required".into())
    );
}

#[test]
fn shorter_lifespan_shortens_outputs() {
    let mut config = Config::default();
    config.apply_overrides(ConfigOverrides {
        lifespan_years: Some(5),
        inverter_replacement_year: Some(5),
        ..ConfigOverrides::default()
    });
    let estimator = SolarEstimator::new(config).expect("valid config");
    let result = estimator
        .estimate(&household(3000.0, 300.0, "Rajasthan"))
        .expect("estimate");
    assert_eq!(result.yearly_projection.len(), 5);
    assert!(result.financials.payback_period_years <= 5);
    let replacement_years: Vec<_> = result
        .yearly_projection
        .iter()
        .filter(|e| e.maintenance_cost > 10_000.0)
        .map(|e| e.year)
        .collect();
    assert_eq!(replacement_years, vec![5]);
}

#[test]
fn estimator_is_shareable_across_threads() {
    let estimator = Arc::new(SolarEstimator::with_defaults());
    let expected = estimator
        .estimate(&household(3000.0, 300.0, "Rajasthan"))
        .expect("estimate");

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let estimator = Arc::clone(&estimator);
            thread::spawn(move || {
                estimator
                    .estimate(&household(3000.0, 300.0, "Rajasthan"))
                    .expect("estimate")
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().expect("thread"), expected);
    }
}

#[test]
fn lifespan_shorter_than_inverter_year_is_rejected() {
    let mut config = Config::default();
    config.apply_overrides(ConfigOverrides {
        lifespan_years: Some(5),
        ..ConfigOverrides::default()
    });
    assert!(matches!(
        SolarEstimator::new(config),
        Err(EstimateError::InvalidConfig(_))
    ));
}

#[test]
fn oversized_input_is_rejected_not_rendered_as_null() {
    let err = SolarEstimator::with_defaults()
        .estimate(&EstimateInput::new(1e300, 1e307))
        .expect_err("overflowing input must fail");
    assert!(matches!(err, EstimateError::InvalidInput(_)));
    assert!(err.to_string().contains("input too large to estimate"));
}

use anyhow::Result;
use serde::Serialize;

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::render_json;
    use crate::estimator::SolarEstimator;
    use crate::types::EstimateInput;

    #[test]
    fn estimate_json_uses_camel_case_groups() {
        let result = SolarEstimator::with_defaults()
            .estimate(&EstimateInput::new(3000.0, 300.0).with_state("Rajasthan"))
            .expect("estimate");
        let raw = render_json(&result).expect("json");
        let value: Value = serde_json::from_str(&raw).expect("valid json");
        for key in [
            "systemDetails",
            "financials",
            "loanOptions",
            "environmentalImpact",
            "yearlyProjection",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["financials"]["subsidyTier"], "2-3");
        assert_eq!(value["loanOptions"].as_array().map(Vec::len), Some(5));
    }
}

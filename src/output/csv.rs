use anyhow::Result;

use crate::types::{LoanOption, YearlyProjectionEntry};

pub fn loans_to_csv(options: &[LoanOption]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "tenure_months",
        "annual_interest_rate",
        "down_payment",
        "principal",
        "monthly_payment",
        "total_payment",
        "total_interest",
    ])?;
    for option in options {
        writer.write_record([
            option.tenure_months.to_string(),
            format!("{:.4}", option.annual_interest_rate),
            format!("{:.2}", option.down_payment),
            format!("{:.2}", option.principal),
            format!("{:.2}", option.monthly_payment),
            format!("{:.2}", option.total_payment),
            format!("{:.2}", option.total_interest),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn projection_to_csv(entries: &[YearlyProjectionEntry]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "year",
        "generation_kwh",
        "consumption_kwh",
        "tariff_rate",
        "units_from_solar",
        "grid_units",
        "bill_without_solar",
        "bill_with_solar",
        "maintenance_cost",
        "net_savings",
        "cumulative_cash_flow",
    ])?;
    for entry in entries {
        writer.write_record([
            entry.year.to_string(),
            format!("{:.2}", entry.generation_kwh),
            format!("{:.2}", entry.consumption_kwh),
            format!("{:.2}", entry.tariff_rate),
            format!("{:.2}", entry.units_from_solar),
            format!("{:.2}", entry.grid_units),
            format!("{:.2}", entry.bill_without_solar),
            format!("{:.2}", entry.bill_with_solar),
            format!("{:.2}", entry.maintenance_cost),
            format!("{:.2}", entry.net_savings),
            format!("{:.2}", entry.cumulative_cash_flow),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

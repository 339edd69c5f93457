use std::collections::BTreeMap;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::types::{EstimateResult, LoanOption, YearlyProjectionEntry};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}

pub fn render_summary_table(result: &EstimateResult) -> String {
    let details = &result.system_details;
    let financials = &result.financials;
    let impact = &result.environmental_impact;

    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);

    let region = if details.region_fallback {
        format!("{} (fallback)", details.region)
    } else {
        details.region.clone()
    };
    let max_size = details
        .max_system_size_kw
        .map(|v| format!("{v:.2} kW"))
        .unwrap_or_else(|| "-".to_string());
    let rows = vec![
        ("Region", region),
        ("Irradiation", format!("{:.2} kWh/kW/day", details.irradiation)),
        ("Tariff", format!("{:.2} per unit", details.tariff_rate)),
        (
            "Annual consumption",
            format!("{:.2} kWh", details.annual_consumption_kwh),
        ),
        (
            "Required size",
            format!("{:.2} kW", details.system_size_required_kw),
        ),
        ("Roof limit", max_size),
        (
            "Recommended size",
            format!("{:.2} kW", details.system_size_recommended_kw),
        ),
        (
            "Space required",
            format!(
                "{:.2} sq ft ({:.2} m2)",
                details.space_required_sqft, details.space_required_sqm
            ),
        ),
        (
            "Annual generation",
            format!("{:.2} kWh", details.annual_generation_kwh),
        ),
        (
            "Solar share",
            format!("{:.2}%", details.max_solar_percentage),
        ),
        ("System cost", money(financials.system_cost)),
        (
            "Subsidy",
            format!("{} (tier {})", money(financials.subsidy), financials.subsidy_tier),
        ),
        ("Net cost", money(financials.net_system_cost)),
        ("First-year savings", money(financials.first_year_savings)),
        ("Monthly savings", money(financials.monthly_savings)),
        ("Lifetime savings", money(financials.total_savings)),
        (
            "Payback",
            format!("{} years", financials.payback_period_years),
        ),
        (
            "ROI",
            financials
                .roi_percentage
                .map(|v| format!("{v:.2}%"))
                .unwrap_or_else(|| "-".to_string()),
        ),
        (
            "CO2 avoided",
            format!(
                "{:.2} t/yr, {:.2} t lifetime",
                impact.co2_saved_annually_tons, impact.co2_saved_lifetime_tons
            ),
        ),
        ("Trees equivalent", impact.trees_equivalent.to_string()),
        ("Coal avoided", format!("{:.2} kg/yr", impact.coal_saved_kg)),
    ];
    for (label, value) in rows {
        table.add_row(vec![label.to_string(), value]);
    }
    table.to_string()
}

pub fn render_loan_table(options: &[LoanOption]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Tenure",
        "Down Payment",
        "Principal",
        "EMI",
        "Total Paid",
        "Interest",
    ]);
    for option in options {
        table.add_row(vec![
            format!("{} months", option.tenure_months),
            money(option.down_payment),
            money(option.principal),
            money(option.monthly_payment),
            money(option.total_payment),
            money(option.total_interest),
        ]);
    }
    table.to_string()
}

pub fn render_projection_table(entries: &[YearlyProjectionEntry]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Year",
        "Generation (kWh)",
        "Consumption (kWh)",
        "Tariff",
        "Bill w/o Solar",
        "Bill w/ Solar",
        "O&M",
        "Net Savings",
        "Cumulative",
    ]);
    for entry in entries {
        let cumulative = money(entry.cumulative_cash_flow);
        let cumulative_cell = if entry.cumulative_cash_flow < 0.0 {
            Cell::new(cumulative).fg(Color::Red)
        } else {
            Cell::new(cumulative).fg(Color::Green)
        };
        table.add_row(Row::from(vec![
            Cell::new(entry.year),
            Cell::new(format!("{:.2}", entry.generation_kwh)),
            Cell::new(format!("{:.2}", entry.consumption_kwh)),
            Cell::new(format!("{:.2}", entry.tariff_rate)),
            Cell::new(money(entry.bill_without_solar)),
            Cell::new(money(entry.bill_with_solar)),
            Cell::new(money(entry.maintenance_cost)),
            Cell::new(money(entry.net_savings)),
            cumulative_cell,
        ]));
    }
    table.to_string()
}

pub fn render_regions_table(regions: &BTreeMap<String, f64>) -> String {
    let mut table = new_table();
    table.set_header(vec!["Region", "Irradiation (kWh/kW/day)"]);
    for (region, value) in regions {
        table.add_row(vec![region.clone(), format!("{value:.2}")]);
    }
    table.to_string()
}

//! Fixed prompt and fallback texts for compliance reports.

use crate::kpi::EsgMetrics;

use super::ReportContext;

pub const SYSTEM_PROMPT: &str = "You are an ESG compliance expert for apparel manufacturing.";

pub fn render_prompt(metrics: &EsgMetrics, ctx: &ReportContext) -> String {
    let standard = &ctx.standard;
    format!(
        r#"You are an expert ESG compliance officer specializing in {standard} standards for the apparel manufacturing industry.

Generate a comprehensive ESG compliance report based on the following data:

**Reporting Period:** {start} to {end}

**Environmental Metrics:**
- Total Energy Consumption: {energy:.2} kWh
- Total Water Usage: {water:.2} liters
- Total Waste Generated: {waste:.2} kg
- Average Energy per Unit: {energy_per_unit:.2} kWh/unit
- Estimated Carbon Footprint: {carbon:.2} kg CO2
- Water Efficiency: {water_per_unit:.2} liters/unit
- Waste Recycled: {recycled:.1}%

**Instructions:**
1. Write in a formal, professional tone suitable for stakeholders and regulators
2. Follow {standard} reporting standards
3. Include an executive summary
4. Analyze the environmental performance
5. Provide actionable recommendations for improvement
6. Highlight achievements and areas of concern
7. Structure the report with clear sections and headings

Generate a detailed report (approximately 1000-1500 words):
"#,
        start = ctx.period_start,
        end = ctx.period_end,
        energy = metrics.total_energy_kwh,
        water = metrics.total_water_liters,
        waste = metrics.total_waste_kg,
        energy_per_unit = metrics.avg_energy_per_unit,
        carbon = metrics.carbon_footprint_estimate,
        water_per_unit = metrics.water_efficiency,
        recycled = metrics.waste_recycled_percentage,
    )
}

/// Report built from the numbers alone, used whenever the provider fails.
pub fn render_fallback(metrics: &EsgMetrics, ctx: &ReportContext) -> String {
    format!(
        r#"# {standard} ESG Compliance Report

**Reporting Period:** {start} to {end}

## Executive Summary
This report provides an overview of our environmental performance during the specified period.

## Environmental Performance

### Energy Consumption
- Total Energy: {energy:.2} kWh
- Average per Unit: {energy_per_unit:.2} kWh/unit
- Estimated Carbon Footprint: {carbon:.2} kg CO2

### Water Usage
- Total Water Consumption: {water:.2} liters
- Water Efficiency: {water_per_unit:.2} liters/unit

### Waste Management
- Total Waste Generated: {waste:.2} kg
- Waste Recycled: {recycled:.1}%

## Recommendations
1. Continue monitoring energy consumption patterns
2. Implement water-saving initiatives
3. Increase waste recycling efforts
4. Adopt renewable energy sources where possible

---
*Generated by ESG Analytics Service*
"#,
        standard = ctx.standard,
        start = ctx.period_start,
        end = ctx.period_end,
        energy = metrics.total_energy_kwh,
        energy_per_unit = metrics.avg_energy_per_unit,
        carbon = metrics.carbon_footprint_estimate,
        water = metrics.total_water_liters,
        water_per_unit = metrics.water_efficiency,
        waste = metrics.total_waste_kg,
        recycled = metrics.waste_recycled_percentage,
    )
}

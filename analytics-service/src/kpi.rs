use esg_client::domain::{CategoryAggregate, ProductionAggregate};
use serde::{Deserialize, Serialize};

/// Grid emission factor, kg CO2 per kWh.
pub const DEFAULT_EMISSION_FACTOR_KG_PER_KWH: f64 = 0.42;

/// Placeholder recycled-waste share. No recycling data feeds this yet; it is
/// reported as-is until a source exists.
pub const PLACEHOLDER_WASTE_RECYCLED_PERCENTAGE: f64 = 75.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KpiSettings {
    pub emission_factor_kg_per_kwh: f64,
    pub waste_recycled_percentage: f64,
}

impl Default for KpiSettings {
    fn default() -> Self {
        Self {
            emission_factor_kg_per_kwh: DEFAULT_EMISSION_FACTOR_KG_PER_KWH,
            waste_recycled_percentage: PLACEHOLDER_WASTE_RECYCLED_PERCENTAGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EsgMetrics {
    pub total_energy_kwh: f64,
    pub total_water_liters: f64,
    pub total_waste_kg: f64,
    pub avg_energy_per_unit: f64,
    pub carbon_footprint_estimate: f64,
    pub water_efficiency: f64,
    pub waste_recycled_percentage: f64,
}

/// Aggregates a report is computed from.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReportAggregates {
    pub energy: CategoryAggregate,
    pub water: CategoryAggregate,
    pub waste: CategoryAggregate,
    pub production: ProductionAggregate,
}

/// Derive the per-unit indicators. Zero production divides by one.
pub fn calculate(aggregates: &ReportAggregates, settings: &KpiSettings) -> EsgMetrics {
    let units = aggregates.production.total_units.max(1) as f64;
    let energy = aggregates.energy.total;
    let water = aggregates.water.total;

    EsgMetrics {
        total_energy_kwh: energy,
        total_water_liters: water,
        total_waste_kg: aggregates.waste.total,
        avg_energy_per_unit: energy / units,
        carbon_footprint_estimate: energy * settings.emission_factor_kg_per_kwh,
        water_efficiency: water / units,
        waste_recycled_percentage: settings.waste_recycled_percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregates(energy: f64, water: f64, waste: f64, units: i64) -> ReportAggregates {
        ReportAggregates {
            energy: CategoryAggregate { total: energy, average: 0.0, count: 1 },
            water: CategoryAggregate { total: water, average: 0.0, count: 1 },
            waste: CategoryAggregate { total: waste, average: 0.0, count: 1 },
            production: ProductionAggregate { total_units: units, run_count: 1 },
        }
    }

    #[test]
    fn zero_units_divides_by_one() {
        let m = calculate(&aggregates(1200.0, 800.0, 30.0, 0), &KpiSettings::default());
        assert_eq!(m.avg_energy_per_unit, 1200.0);
        assert_eq!(m.water_efficiency, 800.0);

        let m = calculate(&aggregates(1200.0, 800.0, 30.0, 1), &KpiSettings::default());
        assert_eq!(m.avg_energy_per_unit, 1200.0);
        assert_eq!(m.water_efficiency, 800.0);
    }

    #[test]
    fn per_unit_fields_divide_by_units() {
        let m = calculate(&aggregates(1200.0, 800.0, 30.0, 400), &KpiSettings::default());
        assert_eq!(m.avg_energy_per_unit, 3.0);
        assert_eq!(m.water_efficiency, 2.0);
        assert_eq!(m.total_waste_kg, 30.0);
    }

    #[test]
    fn carbon_footprint_uses_emission_factor() {
        for energy in [0.0, 1.0, 1234.56, -10.0] {
            let m = calculate(&aggregates(energy, 0.0, 0.0, 10), &KpiSettings::default());
            assert_eq!(m.carbon_footprint_estimate, energy * 0.42);
        }
    }

    #[test]
    fn empty_window_yields_zero_metrics_with_placeholder() {
        let m = calculate(&ReportAggregates::default(), &KpiSettings::default());
        assert_eq!(m.total_energy_kwh, 0.0);
        assert_eq!(m.avg_energy_per_unit, 0.0);
        assert_eq!(m.carbon_footprint_estimate, 0.0);
        assert_eq!(m.waste_recycled_percentage, PLACEHOLDER_WASTE_RECYCLED_PERCENTAGE);
    }
}

use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use ebike_twin::{
    core::{
        business_model::{BusinessModel, OwnershipMode},
        fleet::{Fleet, FleetSummary},
        pack::BatteryPack,
    },
    quantity::proportions::Percent,
    route::Topography,
    statistics::ExtractedParameters,
};
use itertools::Itertools;
use ordered_float::OrderedFloat;

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

pub fn build_parameters_table(parameters: &ExtractedParameters, pack: BatteryPack) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Parameter", "Value"]);
    table.add_row(vec![
        Cell::new("Mean daily distance"),
        Cell::new(parameters.mean_daily_distance).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Daily distance deviation"),
        Cell::new(parameters.std_daily_distance)
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Degradation constant"),
        Cell::new(format!("{:.6}", parameters.degradation_constant))
            .set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new(format!("Resistance at {:.0} V {:.0} Ah", pack.voltage, pack.capacity_ah)),
        Cell::new(format!("{:.4} Ω", parameters.resistance)).set_alignment(CellAlignment::Right),
    ]);
    table
}

pub fn build_topography_table(topography: &Topography) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Length", "Points", "Lowest", "Highest", "Ascent", "Descent", "Uphill"]);
    table.add_row(vec![
        Cell::new(topography.length),
        Cell::new(topography.n_points).add_attribute(Attribute::Dim),
        Cell::new(format!("{:.0} m", topography.min_elevation)),
        Cell::new(format!("{:.0} m", topography.max_elevation)),
        Cell::new(format!("{:.0} m", topography.ascent)).fg(Color::Red),
        Cell::new(format!("{:.0} m", topography.descent)).fg(Color::Green),
        Cell::new(Percent::from_proportion(topography.uphill_share)),
    ]);
    table
}

/// Business models from the cheapest to the most expensive per kilometer.
pub fn build_ranking_table(summaries: &[FleetSummary], best_model: Option<BusinessModel>) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Model", "Cost per km", "Verdict"]);
    let ranked = summaries
        .iter()
        .sorted_by_key(|summary| summary.cost_per_km.map(|cost| OrderedFloat(cost.0)));
    // `None` only shows up when nothing has been ridden:
    for summary in ranked {
        let is_best = Some(summary.model) == best_model;
        table.add_row(vec![
            Cell::new(summary.model).fg(summary.model.chemistry.color()),
            summary.cost_per_km.map_or_else(
                || Cell::new("n/a").add_attribute(Attribute::Dim),
                |cost| Cell::new(cost).set_alignment(CellAlignment::Right),
            ),
            if is_best {
                Cell::new("best").fg(Color::Green).add_attribute(Attribute::Bold)
            } else {
                Cell::new("")
            },
        ]);
    }
    table
}

pub fn build_fleets_table(summaries: &[FleetSummary]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Model", "Opex", "Capex", "Distance", "Swaps", "Health"]);
    for summary in summaries {
        table.add_row(vec![
            Cell::new(summary.model).fg(summary.model.chemistry.color()),
            Cell::new(summary.mean_opex).set_alignment(CellAlignment::Right),
            Cell::new(summary.mean_capex).set_alignment(CellAlignment::Right),
            Cell::new(summary.mean_distance)
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
            match summary.model.mode {
                OwnershipMode::Depot => Cell::new("-").add_attribute(Attribute::Dim),
                OwnershipMode::BaaS => {
                    Cell::new(summary.n_swaps).set_alignment(CellAlignment::Right)
                }
            },
            Cell::new(Percent::from_proportion(summary.mean_state_of_health))
                .set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Last logged day of every representative bike.
pub fn build_telemetry_table(fleets: &[Fleet]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Bike", "Day", "Health", "Consumption", "Capacity", "Total cost"]);
    for fleet in fleets {
        let Some(bike) = fleet.representative() else { continue };
        let Some(record) = bike.telemetry().last() else { continue };
        table.add_row(vec![
            Cell::new(bike.name()).fg(bike.profile().model.chemistry.color()),
            Cell::new(record.day).add_attribute(Attribute::Dim),
            Cell::new(record.state_of_health).set_alignment(CellAlignment::Right),
            Cell::new(record.energy_intensity).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1} Ah", record.capacity_ah)).set_alignment(CellAlignment::Right),
            Cell::new(record.cumulative_cost).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use ebike_twin::{
        core::{chemistry::Chemistry, simulation::run_fleet_simulation},
        quantity::{Quantity, cost::Cost, distance::Kilometers},
        route::{Route, Waypoint},
    };
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn summary(chemistry: Chemistry, mode: OwnershipMode, cost_per_km: f64) -> FleetSummary {
        FleetSummary {
            model: BusinessModel { chemistry, mode },
            mean_opex: Quantity(100.0),
            mean_capex: Cost::ZERO,
            mean_distance: Kilometers::from(100.0),
            cost_per_km: Some(Quantity(cost_per_km)),
            mean_state_of_health: 0.99,
            n_swaps: 3,
        }
    }

    #[test]
    fn ranking_starts_with_the_best() {
        let summaries = [
            summary(Chemistry::Sib, OwnershipMode::Depot, 2.5),
            summary(Chemistry::Lfp, OwnershipMode::BaaS, 1.5),
        ];
        let best = Some(summaries[1].model);
        let rendered = build_ranking_table(&summaries, best).to_string();
        let lfp = rendered.find("LFP BaaS").unwrap();
        let sib = rendered.find("SIB Owned").unwrap();
        assert!(lfp < sib, "{rendered}");
        assert!(rendered.contains("best"));
    }

    #[test]
    fn telemetry_lists_representatives() {
        let route = Route::try_from_waypoints((0..5).map(|index| Waypoint {
            latitude: f64::from(index) * 0.005,
            longitude: 36.8,
            elevation: Some(f64::from(index) * 5.0),
        }))
        .unwrap();
        let parameters = ExtractedParameters {
            mean_daily_distance: Kilometers::from(40.0),
            std_daily_distance: Kilometers::from(10.0),
            degradation_constant: 0.0001,
            resistance: 0.05,
        };
        let outcome = run_fleet_simulation()
            .parameters(&parameters)
            .route(&route)
            .grid_tariff(Quantity(16.0))
            .swap_fee(Quantity(206.0))
            .payload(200.0)
            .anxiety_min(Percent(20.0))
            .anxiety_max(Percent(35.0))
            .ambient_temperature(25.0)
            .n_days(2)
            .rng(&mut StdRng::seed_from_u64(42))
            .on_progress(|_| {})
            .fleet_size(2)
            .call()
            .unwrap();
        let rendered = build_telemetry_table(&outcome.fleets).to_string();
        for fleet in &outcome.fleets {
            assert!(rendered.contains(&format!("{} #0", fleet.model)), "{rendered}");
            assert!(!rendered.contains(&format!("{} #1", fleet.model)), "{rendered}");
        }
    }
}

use crate::models::{ClimateProjection, DatacenterLocation, SimulationResponse};

pub const START_YEAR: i32 = 2025;
pub const END_YEAR: i32 = 2100;

/// A scenario "ends" the first year survivability drops to this value.
const SURVIVABILITY_THRESHOLD: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Hpc,
    Colo,
    Standard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Size {
    Large,
    Medium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Coal,
    Renewable,
    Average,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: Kind,
    pub size: Size,
    pub region: Region,
}

/// Classifies a site by fixed rules over its free-text fields and latitude:
/// - kind: name+notes containing "hpc" -> Hpc, "colo" -> Colo, else Standard
/// - size: land price mentioning "2.5m" -> Large, else Medium
/// - region: latitude < 30 -> Coal, latitude > 45 -> Renewable, else Average
pub fn classify(loc: &DatacenterLocation) -> Classification {
    let text = format!("{} {}", loc.name, loc.notes).to_lowercase();
    let kind = if text.contains("hpc") {
        Kind::Hpc
    } else if text.contains("colo") {
        Kind::Colo
    } else {
        Kind::Standard
    };

    let size = if loc.land_price.to_lowercase().contains("2.5m") {
        Size::Large
    } else {
        Size::Medium
    };

    let region = if loc.latitude < 30.0 {
        Region::Coal
    } else if loc.latitude > 45.0 {
        Region::Renewable
    } else {
        Region::Average
    };

    Classification { kind, size, region }
}

/// Fraction of a degree Celsius one site contributes per year.
pub fn emission(class: Classification) -> f64 {
    let base = match class.kind {
        Kind::Hpc => 0.01,
        Kind::Colo => 0.007,
        Kind::Standard => 0.005,
    };
    let size = match class.size {
        Size::Large => 0.003,
        Size::Medium => 0.0,
    };
    let region = match class.region {
        Region::Coal => 0.002,
        Region::Renewable => -0.001,
        Region::Average => 0.0,
    };
    base + size + region
}

/// Summed warming contribution of a cart, constant across all years.
pub fn total_contribution(items: &[DatacenterLocation]) -> f64 {
    items.iter().map(|loc| emission(classify(loc))).sum()
}

fn year_fraction(year: i32) -> f64 {
    f64::from(year - START_YEAR) / f64::from(END_YEAR - START_YEAR)
}

/// Linear interpolation from 1.2 C in 2025 to 3.7 C in 2100.
pub fn baseline_temperature(year: i32) -> f64 {
    1.2 + year_fraction(year) * (3.7 - 1.2)
}

/// Linear decay from 1.0 in 2025 to 0.2 in 2100.
pub fn fossil_fuel_fraction(year: i32) -> f64 {
    1.0 - year_fraction(year) * (1.0 - 0.2)
}

/// 0-100 score combining warming and fossil depletion, clamped at zero.
pub fn survivability(total_temp: f64, fossil_fraction: f64) -> f64 {
    (100.0 - total_temp * 20.0 - (1.0 - fossil_fraction) * 40.0).max(0.0)
}

/// Runs the projection over the full year range, with and without the cart's
/// contribution. `total_time_to_end` is the year offset at which the with-cart
/// series first reaches the threshold (the full range length if it never
/// does); `time_datacenters_removed` is how many extra years the no-cart
/// scenario gets.
pub fn project(username: &str, items: &[DatacenterLocation]) -> SimulationResponse {
    let contribution = total_contribution(items);
    let years = (END_YEAR - START_YEAR + 1) as usize;

    let mut with_data_centers = Vec::with_capacity(years);
    let mut without_data_centers = Vec::with_capacity(years);
    let mut end_with: Option<i32> = None;
    let mut end_without: Option<i32> = None;

    for year in START_YEAR..=END_YEAR {
        let baseline = baseline_temperature(year);
        let fossil = fossil_fuel_fraction(year);

        let total = baseline + contribution;
        let surv = survivability(total, fossil);
        with_data_centers.push(ClimateProjection {
            year,
            baseline_temperature: baseline,
            data_center_contribution: contribution,
            total_temperature: total,
            fossil_fuel_reserves: fossil,
            survivability: surv.round() as i32,
        });
        if end_with.is_none() && surv <= SURVIVABILITY_THRESHOLD {
            end_with = Some(year - START_YEAR);
        }

        let surv_no_dc = survivability(baseline, fossil);
        without_data_centers.push(ClimateProjection {
            year,
            baseline_temperature: baseline,
            data_center_contribution: 0.0,
            total_temperature: baseline,
            fossil_fuel_reserves: fossil,
            survivability: surv_no_dc.round() as i32,
        });
        if end_without.is_none() && surv_no_dc <= SURVIVABILITY_THRESHOLD {
            end_without = Some(year - START_YEAR);
        }
    }

    let horizon = END_YEAR - START_YEAR;
    let total_time_to_end = end_with.unwrap_or(horizon);
    let time_without = end_without.unwrap_or(horizon);

    SimulationResponse {
        username: username.to_string(),
        with_data_centers,
        without_data_centers,
        total_time_to_end,
        time_datacenters_removed: time_without - total_time_to_end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(name: &str, notes: &str, land_price: &str, latitude: f64) -> DatacenterLocation {
        DatacenterLocation {
            latitude,
            longitude: -100.0,
            name: name.to_string(),
            land_price: land_price.to_string(),
            notes: notes.to_string(),
            ..DatacenterLocation::default()
        }
    }

    #[test]
    fn interpolation_endpoints_are_exact() {
        assert_eq!(baseline_temperature(2025), 1.2);
        assert_eq!(baseline_temperature(2100), 3.7);
        assert_eq!(fossil_fuel_fraction(2025), 1.0);
        assert!((fossil_fuel_fraction(2100) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn classification_follows_the_documented_rules() {
        let hpc = classify(&site("Spokane HPC Campus", "", "1M", 40.0));
        assert_eq!(hpc.kind, Kind::Hpc);

        let colo = classify(&site("Memphis Site", "former colo facility", "1M", 40.0));
        assert_eq!(colo.kind, Kind::Colo);

        let standard = classify(&site("Plain Site", "", "1M", 40.0));
        assert_eq!(standard.kind, Kind::Standard);

        assert_eq!(classify(&site("A", "", "2.5M", 40.0)).size, Size::Large);
        assert_eq!(classify(&site("A", "", "1.0M", 40.0)).size, Size::Medium);

        assert_eq!(classify(&site("A", "", "", 29.9)).region, Region::Coal);
        assert_eq!(classify(&site("A", "", "", 45.1)).region, Region::Renewable);
        assert_eq!(classify(&site("A", "", "", 37.0)).region, Region::Average);
    }

    #[test]
    fn emission_combines_kind_size_and_region() {
        // HPC + large + coal: 0.01 + 0.003 + 0.002
        let worst = Classification {
            kind: Kind::Hpc,
            size: Size::Large,
            region: Region::Coal,
        };
        assert!((emission(worst) - 0.015).abs() < 1e-12);

        // Standard + medium + renewable: 0.005 - 0.001
        let best = Classification {
            kind: Kind::Standard,
            size: Size::Medium,
            region: Region::Renewable,
        };
        assert!((emission(best) - 0.004).abs() < 1e-12);
    }

    #[test]
    fn survivability_decreases_with_temperature_and_clamps_at_zero() {
        let fossil = 0.6;
        let mut previous = f64::INFINITY;
        for tenths in 0..80 {
            let temp = f64::from(tenths) * 0.1;
            let surv = survivability(temp, fossil);
            assert!(surv <= previous);
            assert!(surv >= 0.0);
            previous = surv;
        }
        assert_eq!(survivability(10.0, 0.0), 0.0);
    }

    #[test]
    fn empty_cart_projects_identical_series() {
        let resp = project("alice", &[]);
        assert_eq!(resp.with_data_centers, resp.without_data_centers);
        assert_eq!(resp.time_datacenters_removed, 0);
        assert_eq!(resp.with_data_centers.len(), 76);
    }

    #[test]
    fn data_centers_never_extend_the_timeline() {
        let items: Vec<DatacenterLocation> = (0..40)
            .map(|i| site(&format!("HPC Site {i}"), "hpc", "2.5M", 25.0))
            .collect();
        let resp = project("bob", &items);

        // 40 worst-case sites add 0.6 C; the end arrives strictly earlier.
        assert!(resp.total_time_to_end < END_YEAR - START_YEAR);
        assert!(resp.time_datacenters_removed > 0);

        let first = &resp.with_data_centers[0];
        assert_eq!(first.year, START_YEAR);
        assert!((first.data_center_contribution - 0.6).abs() < 1e-9);
        assert!((first.total_temperature - 1.8).abs() < 1e-9);
    }

    #[test]
    fn contribution_is_constant_across_years() {
        let items = vec![site("A", "", "1M", 40.0)];
        let resp = project("carol", &items);
        for point in &resp.with_data_centers {
            assert!((point.data_center_contribution - 0.005).abs() < 1e-12);
            assert!(
                (point.total_temperature - point.baseline_temperature - 0.005).abs() < 1e-12
            );
        }
    }
}

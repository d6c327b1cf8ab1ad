use serde::{Deserialize, Serialize};

/// Incoming JSON for both /register and /login.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// An existing data center parsed from the line-oriented datacenters file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataCenter {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A candidate site from the possible-locations CSV. The free-text fields are
/// skipped in JSON when empty, so cart files and API responses stay compact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatacenterLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub land_price: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub electricity: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

/// Discovery view of a candidate site: coordinates only.
#[derive(Debug, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Everything about a candidate site except its coordinates.
#[derive(Debug, Serialize)]
pub struct PropertyDetails {
    pub location_name: String,
    pub land_price: String,
    pub electricity: String,
    pub notes: String,
}

/// A user's purchases plus the virtual money they have left. Persisted as one
/// JSON file per user under the cart directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub username: String,
    pub items: Vec<DatacenterLocation>,
    pub money_left: f64,
}

#[derive(Debug, Deserialize)]
pub struct UsernameQuery {
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PropertyQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub username: String,
    pub item: DatacenterLocation,
    pub cost: f64,
}

#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub username: String,
    pub index: usize,
}

/// One data point in the climate projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimateProjection {
    pub year: i32,
    pub baseline_temperature: f64,
    pub data_center_contribution: f64,
    pub total_temperature: f64,
    pub fossil_fuel_reserves: f64,
    pub survivability: i32,
}

/// Overall response from the simulation endpoint: the same projection run
/// with and without the user's data centers, plus how many years each
/// scenario keeps survivability above the threshold.
#[derive(Debug, Serialize)]
pub struct SimulationResponse {
    pub username: String,
    pub with_data_centers: Vec<ClimateProjection>,
    pub without_data_centers: Vec<ClimateProjection>,
    pub total_time_to_end: i32,
    pub time_datacenters_removed: i32,
}

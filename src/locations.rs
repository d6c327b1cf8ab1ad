use std::fs;
use std::path::PathBuf;

use tracing::warn;

use crate::error::ApiError;
use crate::models::{DataCenter, DatacenterLocation};

/// Tolerance for matching a candidate site by coordinates.
pub const COORD_EPSILON: f64 = 0.0001;

/// Read-only catalog over the two static location files. Both are re-read on
/// every request; the files are tiny and may be edited while the server runs.
pub struct LocationCatalog {
    datacenters_path: PathBuf,
    candidates_path: PathBuf,
}

impl LocationCatalog {
    pub fn new(datacenters_path: impl Into<PathBuf>, candidates_path: impl Into<PathBuf>) -> Self {
        Self {
            datacenters_path: datacenters_path.into(),
            candidates_path: candidates_path.into(),
        }
    }

    /// Parses the line-oriented datacenters file. Malformed lines are skipped
    /// with a warning, never fatal.
    pub fn list_all(&self) -> Result<Vec<DataCenter>, ApiError> {
        let contents = fs::read_to_string(&self.datacenters_path)?;
        let mut datacenters = Vec::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_datacenter_line(line) {
                Some(dc) => datacenters.push(dc),
                None => warn!(line, "skipping malformed datacenter line"),
            }
        }
        Ok(datacenters)
    }

    /// Parses the candidate-locations CSV, skipping the header row.
    pub fn list_candidates(&self) -> Result<Vec<DatacenterLocation>, ApiError> {
        let contents = fs::read_to_string(&self.candidates_path)?;
        let mut candidates = Vec::new();
        for (lineno, line) in contents.lines().enumerate() {
            if lineno == 0 {
                // header row
                continue;
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_candidate_row(line) {
                Some(loc) => candidates.push(loc),
                None => warn!(line, "skipping malformed candidate row"),
            }
        }
        Ok(candidates)
    }

    /// Linear scan over the candidates; the first site within epsilon on both
    /// axes wins.
    pub fn find_by_coordinates(&self, lat: f64, lng: f64) -> Result<DatacenterLocation, ApiError> {
        self.list_candidates()?
            .into_iter()
            .find(|loc| {
                (loc.latitude - lat).abs() < COORD_EPSILON
                    && (loc.longitude - lng).abs() < COORD_EPSILON
            })
            .ok_or(ApiError::LocationNotFound)
    }
}

/// Splits a datacenter line from the end: the last two fields are latitude
/// and longitude, and everything before them is the name, which may itself
/// contain commas.
fn parse_datacenter_line(line: &str) -> Option<DataCenter> {
    let (rest, longitude) = line.rsplit_once(',')?;
    let (name, latitude) = rest.rsplit_once(',')?;
    Some(DataCenter {
        name: name.to_string(),
        latitude: latitude.trim().parse().ok()?,
        longitude: longitude.trim().parse().ok()?,
    })
}

/// A candidate row: latitude,longitude,name,land_price,electricity,notes.
fn parse_candidate_row(line: &str) -> Option<DatacenterLocation> {
    let fields = split_csv_row(line);
    if fields.len() < 6 {
        return None;
    }
    let mut fields = fields.into_iter();
    Some(DatacenterLocation {
        latitude: fields.next()?.trim().parse().ok()?,
        longitude: fields.next()?.trim().parse().ok()?,
        name: fields.next()?,
        land_price: fields.next()?,
        electricity: fields.next()?,
        notes: fields.next()?,
    })
}

/// Minimal CSV field splitter: commas separate fields, double quotes group a
/// field containing commas, and `""` inside quotes is a literal quote.
fn split_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

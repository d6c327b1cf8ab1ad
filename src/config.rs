use std::env;
use std::path::PathBuf;

use tracing::warn;

/// Runtime settings, read from the environment (a `.env` file is loaded
/// first in `main`). Every variable has a default suited to running from the
/// repository root.
pub struct Config {
    pub port: u16,
    pub users_file: PathBuf,
    pub cart_dir: PathBuf,
    pub datacenters_file: PathBuf,
    pub candidates_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: port_or("PORT", 8080),
            users_file: path_or("USERS_FILE", "users.txt"),
            cart_dir: path_or("CART_DIR", "./carts"),
            datacenters_file: path_or("DATACENTERS_FILE", "us_datacenters.csv"),
            candidates_file: path_or("CANDIDATES_FILE", "us_possible_locations.csv"),
        }
    }
}

fn path_or(key: &str, default: &str) -> PathBuf {
    env::var(key).map(PathBuf::from).unwrap_or_else(|_| default.into())
}

fn port_or(key: &str, default: u16) -> u16 {
    match env::var(key) {
        Ok(value) => value.parse().unwrap_or_else(|_| {
            warn!(%key, %value, "not a valid port, using default");
            default
        }),
        Err(_) => default,
    }
}

use log::warn;
use std::path::PathBuf;

use crate::domain::Points;

#[derive(Debug, Clone)]
pub struct PairingSettings {
    pub bye_points: Points,
    pub default_round_count: u32,
    /// Search nodes explored per relaxation level before allowing one more repeat
    pub search_budget: usize,
}

impl Default for PairingSettings {
    fn default() -> Self {
        Self {
            bye_points: Points::ONE,
            default_round_count: 4,
            search_budget: 200_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

impl StorageSettings {
    pub fn players_dir(&self) -> PathBuf {
        self.data_dir.join("players")
    }

    pub fn tournaments_dir(&self) -> PathBuf {
        self.data_dir.join("tournaments")
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub pairing: PairingSettings,
    pub storage: StorageSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `CHESS_DATA_DIR`, `CHESS_BYE_POINTS` and `CHESS_DEFAULT_ROUNDS`
    pub fn from_env() -> Self {
        Self::new().with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup("CHESS_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup("CHESS_BYE_POINTS") {
            match parse_bye_points(&raw) {
                Some(points) => self.pairing.bye_points = points,
                None => warn!("Ignoring CHESS_BYE_POINTS={}: expected 0, 0.5 or 1", raw),
            }
        }

        if let Some(raw) = lookup("CHESS_DEFAULT_ROUNDS") {
            match raw.trim().parse::<u32>() {
                Ok(rounds) if rounds > 0 => self.pairing.default_round_count = rounds,
                _ => warn!("Ignoring CHESS_DEFAULT_ROUNDS={}: expected a positive number", raw),
            }
        }

        self
    }

    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.storage.data_dir = dir;
        }
        self
    }
}

fn parse_bye_points(raw: &str) -> Option<Points> {
    let value: f64 = raw.trim().parse().ok()?;
    Points::from_f64(value).filter(|points| *points <= Points::ONE)
}

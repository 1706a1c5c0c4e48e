// Desk configuration: where the five table files live. Defaults match the
// file names the previous system used, so an existing data directory keeps
// working.
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::DeskError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    pub data_dir: PathBuf,
    pub rooms_file: String,
    pub guests_file: String,
    pub reservations_file: String,
    pub housekeeping_file: String,
    pub feedback_file: String,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            rooms_file: "rooms.csv".to_string(),
            guests_file: "guests.csv".to_string(),
            reservations_file: "reservations.csv".to_string(),
            housekeeping_file: "housekeeping_schedule.csv".to_string(),
            feedback_file: "feedback.csv".to_string(),
        }
    }
}

impl DeskConfig {
    pub fn load(path: &Path) -> Result<Self, DeskError> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| DeskError::Config(format!("{}: {e}", path.display())))
    }

    pub fn rooms_path(&self) -> PathBuf {
        self.data_dir.join(&self.rooms_file)
    }

    pub fn guests_path(&self) -> PathBuf {
        self.data_dir.join(&self.guests_file)
    }

    pub fn reservations_path(&self) -> PathBuf {
        self.data_dir.join(&self.reservations_file)
    }

    pub fn housekeeping_path(&self) -> PathBuf {
        self.data_dir.join(&self.housekeeping_file)
    }

    pub fn feedback_path(&self) -> PathBuf {
        self.data_dir.join(&self.feedback_file)
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: dir.into(),
            ..Self::default()
        }
    }
}

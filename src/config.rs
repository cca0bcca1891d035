use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Admission Explorer";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8600";
const DATA_DIR_NAME: &str = "AdmissionExplorer";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "admission_explorer_lib=info,admission_explorer=info,tower_http=warn"
}

/// Get the application data directory (~/AdmissionExplorer/).
/// `None` when the platform has no home directory.
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DATA_DIR_NAME))
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No value for {0} and no home directory to derive a default from")]
    MissingValue(&'static str),
}

/// Command line, with environment fallbacks for every option.
#[derive(Debug, Clone, Parser)]
#[command(name = "admission-explorer", version, about = "Read-only explorer for hospital admissions")]
pub struct Cli {
    /// Clinical store (SQLite, opened read-only)
    #[arg(long = "db", env = "EXPLORER_DB", value_name = "PATH")]
    pub database_path: Option<PathBuf>,

    /// Document store holding discharge notes and ECG measurements
    #[arg(long = "documents-db", env = "EXPLORER_DOCUMENTS_DB", value_name = "PATH")]
    pub documents_path: Option<PathBuf>,

    /// Root of the ECG waveform tree (contains `files/`)
    #[arg(long = "ecg-base-folder", env = "EXPLORER_ECG_BASE", value_name = "DIR")]
    pub ecg_base_dir: Option<PathBuf>,

    #[arg(long = "bind", env = "EXPLORER_BIND", default_value = DEFAULT_BIND_ADDR)]
    pub bind_addr: SocketAddr,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerConfig {
    pub database_path: PathBuf,
    pub documents_path: PathBuf,
    pub ecg_base_dir: Option<PathBuf>,
    pub bind_addr: SocketAddr,
}

impl Cli {
    /// Fills unset store paths from the application data directory.
    pub fn into_config(self) -> Result<ExplorerConfig, ConfigError> {
        let data_dir = app_data_dir();
        let or_default = |value: Option<PathBuf>, file: &str, name: &'static str| {
            value
                .or_else(|| data_dir.as_ref().map(|dir| dir.join(file)))
                .ok_or(ConfigError::MissingValue(name))
        };

        Ok(ExplorerConfig {
            database_path: or_default(self.database_path, "mimic4.db", "--db")?,
            documents_path: or_default(self.documents_path, "documents.db", "--documents-db")?,
            ecg_base_dir: self.ecg_base_dir,
            bind_addr: self.bind_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir().unwrap();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with(DATA_DIR_NAME));
    }

    #[test]
    fn explicit_flags_are_used() {
        let cli = Cli::try_parse_from([
            "admission-explorer",
            "--db",
            "/data/mimic4.db",
            "--documents-db",
            "/data/notes.db",
            "--ecg-base-folder",
            "/data/ecg",
            "--bind",
            "0.0.0.0:9000",
        ])
        .unwrap();
        let config = cli.into_config().unwrap();

        assert_eq!(config.database_path, PathBuf::from("/data/mimic4.db"));
        assert_eq!(config.documents_path, PathBuf::from("/data/notes.db"));
        assert_eq!(config.ecg_base_dir, Some(PathBuf::from("/data/ecg")));
        assert_eq!(config.bind_addr, "0.0.0.0:9000".parse().unwrap());
    }

    #[test]
    fn store_paths_default_under_app_data() {
        let cli = Cli {
            database_path: None,
            documents_path: None,
            ecg_base_dir: None,
            bind_addr: DEFAULT_BIND_ADDR.parse().unwrap(),
        };
        let config = cli.into_config().unwrap();
        let data_dir = app_data_dir().unwrap();

        assert_eq!(config.database_path, data_dir.join("mimic4.db"));
        assert_eq!(config.documents_path, data_dir.join("documents.db"));
        assert_eq!(config.ecg_base_dir, None);
    }

    #[test]
    fn unparsable_bind_address_is_rejected() {
        let result = Cli::try_parse_from(["admission-explorer", "--bind", "localhost"]);
        assert!(result.is_err());
    }

    #[test]
    fn flag_without_value_is_rejected() {
        let result = Cli::try_parse_from(["admission-explorer", "--db"]);
        assert!(result.is_err());
    }

    #[test]
    fn default_filter_targets_this_crate() {
        assert!(default_log_filter().contains("admission_explorer_lib=info"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}

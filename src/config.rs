use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "NutriScan";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default remote insight backend for development builds.
pub const DEFAULT_REMOTE_URL: &str = "http://localhost:5000";

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "nutriscan=info"
}

/// Get the application data directory
/// ~/NutriScan/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("NutriScan")
}

/// Get the scan history database path
pub fn history_db_path() -> PathBuf {
    app_data_dir().join("scan_history.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("NutriScan"));
    }

    #[test]
    fn history_db_under_app_data() {
        let db = history_db_path();
        assert!(db.starts_with(app_data_dir()));
        assert!(db.ends_with("scan_history.db"));
    }

    #[test]
    fn app_version_is_set() {
        assert!(!APP_VERSION.is_empty());
    }
}

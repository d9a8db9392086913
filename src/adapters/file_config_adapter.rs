//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    /// A config with no sections; every lookup falls back to its default.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }

    fn section_entries(&self, section: &str) -> Vec<(String, String)> {
        let mut entries: Vec<(String, String)> = self
            .config
            .get_map_ref()
            .get(&section.to_lowercase())
            .map(|keys| {
                keys.iter()
                    .filter_map(|(k, v)| v.as_ref().map(|v| (k.clone(), v.clone())))
                    .collect()
            })
            .unwrap_or_default();
        entries.sort();
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[scan]
index = Nifty Bank
top_n = 3

[data]
source = csv
data_dir = ./prices
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("scan", "index"),
            Some("Nifty Bank".to_string())
        );
        assert_eq!(
            adapter.get_string("data", "data_dir"),
            Some("./prices".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[scan]\ntop_n = 5\n").unwrap();
        assert_eq!(adapter.get_string("scan", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_value_or_default() {
        let adapter =
            FileConfigAdapter::from_string("[scan]\ntop_n = 7\nlookback_days = abc\n").unwrap();
        assert_eq!(adapter.get_int("scan", "top_n", 0), 7);
        assert_eq!(adapter.get_int("scan", "missing", 42), 42);
        assert_eq!(adapter.get_int("scan", "lookback_days", 365), 365);
    }

    #[test]
    fn get_double_returns_value_or_default() {
        let adapter = FileConfigAdapter::from_string(
            "[scan]\nroe_threshold = 12.5\ndebt_to_equity_threshold = low\n",
        )
        .unwrap();
        assert_eq!(adapter.get_double("scan", "roe_threshold", 0.0), 12.5);
        assert_eq!(adapter.get_double("scan", "missing", 99.9), 99.9);
        assert_eq!(
            adapter.get_double("scan", "debt_to_equity_threshold", 1.0),
            1.0
        );
    }

    #[test]
    fn get_bool_accepts_common_spellings() {
        let adapter = FileConfigAdapter::from_string(
            "[web]\na = true\nb = yes\nc = 1\nd = false\ne = no\nf = 0\n",
        )
        .unwrap();
        assert!(adapter.get_bool("web", "a", false));
        assert!(adapter.get_bool("web", "b", false));
        assert!(adapter.get_bool("web", "c", false));
        assert!(!adapter.get_bool("web", "d", true));
        assert!(!adapter.get_bool("web", "e", true));
        assert!(!adapter.get_bool("web", "f", true));
        assert!(adapter.get_bool("web", "missing", true));
    }

    #[test]
    fn section_entries_sorted_by_key() {
        let adapter = FileConfigAdapter::from_string(
            "[universe]\nnifty_it = INFY.NS, TCS.NS\nnifty_bank = HDFCBANK.NS\n",
        )
        .unwrap();
        assert_eq!(
            adapter.section_entries("universe"),
            vec![
                ("nifty_bank".to_string(), "HDFCBANK.NS".to_string()),
                ("nifty_it".to_string(), "INFY.NS, TCS.NS".to_string()),
            ]
        );
        assert!(adapter.section_entries("fundamentals").is_empty());
    }

    #[test]
    fn empty_config_has_no_sections() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("scan", "index"), None);
        assert!(adapter.section_entries("scan").is_empty());
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[web]\nlisten = 0.0.0.0:8080\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("web", "listen"),
            Some("0.0.0.0:8080".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(result.is_err());
    }
}

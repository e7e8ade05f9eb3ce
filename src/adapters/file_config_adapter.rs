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

    /// Config with no sections; every lookup falls back to its default.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config
            .get(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, String> {
        match self.get_string(section, key) {
            Some(raw) => raw
                .parse()
                .map_err(|e| format!("invalid integer {:?}: {}", raw, e)),
            None => Ok(default),
        }
    }

    fn get_list(&self, section: &str, key: &str) -> Option<Vec<String>> {
        let raw = self.get_string(section, key)?;
        Some(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
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
[paths]
data_daily_path = /srv/quant/data_daily
factor_path = /srv/quant/factor

[factors]
momentum_window = 10
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("paths", "data_daily_path"),
            Some("/srv/quant/data_daily".to_string())
        );
        assert_eq!(adapter.get_int("factors", "momentum_window", 5), Ok(10));
    }

    #[test]
    fn get_string_returns_none_for_missing_or_blank() {
        let adapter = FileConfigAdapter::from_string("[paths]\nfactor_path =\n").unwrap();
        assert_eq!(adapter.get_string("paths", "factor_path"), None);
        assert_eq!(adapter.get_string("paths", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_default_for_missing_or_blank() {
        let adapter = FileConfigAdapter::from_string("[report]\ngroup_count =\n").unwrap();
        assert_eq!(adapter.get_int("report", "group_count", 10), Ok(10));
        assert_eq!(adapter.get_int("report", "tick_interval", 30), Ok(30));
    }

    #[test]
    fn get_int_rejects_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[factors]\nmomentum_window = 1O\n").unwrap();
        let err = adapter.get_int("factors", "momentum_window", 5).unwrap_err();
        assert!(err.contains("1O"));
    }

    #[test]
    fn get_list_splits_on_commas() {
        let adapter = FileConfigAdapter::from_string(
            "[factors]\nnames = momentum_5d, price_amplitude ,,volume_turnover_ratio\n",
        )
        .unwrap();
        assert_eq!(
            adapter.get_list("factors", "names"),
            Some(vec![
                "momentum_5d".to_string(),
                "price_amplitude".to_string(),
                "volume_turnover_ratio".to_string(),
            ])
        );
        assert_eq!(adapter.get_list("factors", "missing"), None);
    }

    #[test]
    fn empty_config_has_no_values() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("paths", "factor_path"), None);
        assert_eq!(adapter.get_int("factors", "momentum_window", 5), Ok(5));
    }

    #[test]
    fn from_file_reads_config() {
        let content = "[report]\noutput_path = /tmp/report\n";
        let file = create_temp_config(content);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("report", "output_path"),
            Some("/tmp/report".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/stockfactor.ini");
        assert!(result.is_err());
    }
}

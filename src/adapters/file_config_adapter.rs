//! Market config backed by an INI file.
//!
//! Section names are matched case-insensitively, so `[gin]` configures
//! symbol `GIN`.

use crate::domain::error::MarketError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    ini: Ini,
}

impl FileConfigAdapter {
    pub fn from_file(path: &Path) -> Result<Self, MarketError> {
        let mut ini = Ini::new();
        ini.load(path).map_err(|reason| MarketError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self { ini })
    }

    /// Parses INI text; `source_name` only labels errors.
    pub fn from_string(content: &str, source_name: &str) -> Result<Self, MarketError> {
        let mut ini = Ini::new();
        ini.read(content.to_string())
            .map_err(|reason| MarketError::ConfigParse {
                file: source_name.to_string(),
                reason,
            })?;
        Ok(Self { ini })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.ini.get(section, key)
    }

    /// Falls back to `default` when the key is absent or not an integer.
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        match self.ini.getint(section, key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(reason) => {
                tracing::warn!(section, key, default, %reason, "ignoring non-integer config value");
                default
            }
        }
    }
}

// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

pub mod cli;
pub mod logger;

use std::path::Path;

use crate::cli_shared::cli::Config;
use crate::utils::io::read_toml;
use anyhow::Context as _;

/// Reads the configuration file, or returns the defaults when none is given.
pub fn read_config(config_path: Option<&Path>) -> anyhow::Result<Config> {
    match config_path {
        Some(path) => {
            let toml = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read config file {}", path.display()))?;
            read_toml(&toml)
                .with_context(|| format!("invalid config file {}", path.display()))
        }
        None => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_config_default() {
        assert_eq!(read_config(None).unwrap(), Config::default());
    }

    #[test]
    fn read_config_with_path() {
        let mut config = Config::default();
        config.log.filter = "debug".into();
        let file = tempfile::NamedTempFile::new().unwrap();
        let toml = toml::to_string(&config).unwrap();
        std::fs::write(file.path(), toml).unwrap();

        assert_eq!(read_config(Some(file.path())).unwrap(), config);
    }

    #[test]
    fn read_config_missing_file() {
        let missing = Path::new("/definitely/not/here.toml");
        let err = read_config(Some(missing)).unwrap_err();
        assert!(err.to_string().contains("cannot read config file"));
    }
}

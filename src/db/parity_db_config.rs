// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use parity_db::CompressionType;
use serde::{Deserialize, Serialize};

/// `ParityDb` configuration exposed in the tool's config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParityDbConfig {
    pub enable_statistics: bool,
    pub compression_type: String,
}

impl Default for ParityDbConfig {
    fn default() -> Self {
        Self {
            enable_statistics: false,
            compression_type: "lz4".into(),
        }
    }
}

impl ParityDbConfig {
    pub fn compression_type(&self) -> anyhow::Result<CompressionType> {
        match self.compression_type.to_lowercase().as_str() {
            "lz4" => Ok(CompressionType::Lz4),
            "snappy" => Ok(CompressionType::Snappy),
            "none" => Ok(CompressionType::NoCompression),
            other => anyhow::bail!("unsupported compression type: {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compression_type_parsing() {
        let mut config = ParityDbConfig::default();
        assert_eq!(config.compression_type().unwrap(), CompressionType::Lz4);
        config.compression_type = "None".into();
        assert_eq!(
            config.compression_type().unwrap(),
            CompressionType::NoCompression
        );
        config.compression_type = "zstd".into();
        assert!(config.compression_type().is_err());
    }
}

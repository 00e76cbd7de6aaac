//! Daemon configuration.
//!
//! Stored as TOML. The `[bond]` table is rewritten whenever pairing
//! produces a new link key.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use hidlink::{BdAddr, HciChannel, LinkConfig, LinkKey};
use serde::{Deserialize, Serialize};

use crate::error::{DaemonError, Result};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    /// HCI device index (`hciN`)
    #[serde(default)]
    pub device_id: u16,

    #[serde(default)]
    pub channel: Channel,

    /// Overrides the socket's poll interval
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u32,

    /// Written to the controller; also makes the host discoverable
    #[serde(default)]
    pub local_name: Option<String>,

    #[serde(default)]
    pub bond: Option<Bond>,
}

/// The device we are paired with.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Bond {
    /// `AA:BB:CC:DD:EE:FF`
    pub address: String,
    /// 32 hex digits; empty until pairing completes
    #[serde(default)]
    pub link_key: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Exclusive access; the adapter must be down in the kernel
    #[default]
    User,
    Raw,
}

impl From<Channel> for HciChannel {
    fn from(channel: Channel) -> Self {
        match channel {
            Channel::User => HciChannel::User,
            Channel::Raw => HciChannel::Raw,
        }
    }
}

const fn default_poll_interval() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device_id: 0,
            channel: Channel::default(),
            poll_interval_ms: default_poll_interval(),
            local_name: None,
            bond: None,
        }
    }
}

impl Config {
    /// Loads configuration from disk or creates default if not exists.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = env::var("HIDLINK_CONFIG") {
            return Ok(PathBuf::from(path));
        }

        let config_dir = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
            PathBuf::from(config_home)
        } else if let Ok(home) = env::var("HOME") {
            PathBuf::from(home).join(".config")
        } else {
            return Err(DaemonError::ConfigDirNotFound);
        };

        Ok(config_dir.join("hidlink").join("config.toml"))
    }

    /// Link manager settings, with the stored bond parsed.
    pub fn link_config(&self) -> Result<LinkConfig> {
        let mut link = LinkConfig {
            local_name: self.local_name.clone().filter(|name| !name.is_empty()),
            ..LinkConfig::default()
        };

        if let Some(bond) = &self.bond {
            let address: BdAddr = bond.address.parse()?;
            let link_key = if bond.link_key.is_empty() {
                LinkKey::ZERO
            } else {
                bond.link_key.parse()?
            };
            link = link.with_bond(address, link_key);
        }

        Ok(link)
    }

    pub fn set_bond(&mut self, address: BdAddr, link_key: LinkKey) {
        self.bond = Some(Bond {
            address: address.to_string(),
            link_key: link_key.to_hex(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hidlink").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let link = config.link_config().unwrap();
        assert!(link.target.is_zero());
        assert!(link.link_key.is_zero());
        assert!(link.local_name.is_none());
    }

    #[test]
    fn test_bond_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let address: BdAddr = "11:22:33:44:55:66".parse().unwrap();
        let key: LinkKey = "000102030405060708090a0b0c0d0e0f".parse().unwrap();

        let mut config = Config {
            local_name: Some("hidlink".to_string()),
            ..Config::default()
        };
        config.set_bond(address, key);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        let link = loaded.link_config().unwrap();
        assert_eq!(link.target, address);
        assert_eq!(link.link_key, key);
        assert_eq!(link.local_name.as_deref(), Some("hidlink"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "device_id = 1\nchannel = \"raw\"\n\n[bond]\naddress = \"AA:BB:CC:DD:EE:FF\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.device_id, 1);
        assert_eq!(config.channel, Channel::Raw);
        assert_eq!(config.poll_interval_ms, 1);

        // An address without a key still targets the device but pairs again
        let link = config.link_config().unwrap();
        assert_eq!(link.target.bytes, [0xFF, 0xEE, 0xDD, 0xCC, 0xBB, 0xAA]);
        assert!(link.link_key.is_zero());
    }

    #[test]
    fn test_invalid_bond_is_rejected() {
        let config = Config {
            bond: Some(Bond {
                address: "not-an-address".to_string(),
                link_key: String::new(),
            }),
            ..Config::default()
        };
        assert!(matches!(
            config.link_config(),
            Err(DaemonError::Link(hidlink::Error::InvalidAddress(_)))
        ));
    }
}

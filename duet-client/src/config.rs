use crate::error::ConfigError;
use crate::transport::TransportConfig;
use duet_core::{IceServerConfig, SIGNAL_EVENT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default = "default_ice_servers")]
    pub ice_servers: Vec<IceServerConfig>,
    #[serde(default = "default_data_channel_label")]
    pub data_channel_label: String,
    #[serde(default = "default_signal_event")]
    pub signal_event: String,
    #[serde(default = "default_channel_prefix")]
    pub channel_prefix: String,
    #[serde(default = "default_history_page_size")]
    pub history_page_size: usize,
    #[serde(default = "default_command_buffer")]
    pub command_buffer: usize,
}

fn default_ice_servers() -> Vec<IceServerConfig> {
    vec![
        IceServerConfig::stun("stun:stun.l.google.com:19302"),
        IceServerConfig::stun("stun:stun1.l.google.com:19302"),
        IceServerConfig::turn(
            "turn:openrelay.metered.ca:80",
            "openrelayproject",
            "openrelayproject",
        ),
        IceServerConfig::turn(
            "turn:openrelay.metered.ca:443",
            "openrelayproject",
            "openrelayproject",
        ),
    ]
}

fn default_data_channel_label() -> String {
    "chat".to_owned()
}

fn default_signal_event() -> String {
    SIGNAL_EVENT.to_owned()
}

fn default_channel_prefix() -> String {
    "p2p-chat:".to_owned()
}

fn default_history_page_size() -> usize {
    50
}

fn default_command_buffer() -> usize {
    64
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            ice_servers: default_ice_servers(),
            data_channel_label: default_data_channel_label(),
            signal_event: default_signal_event(),
            channel_prefix: default_channel_prefix(),
            history_page_size: default_history_page_size(),
            command_buffer: default_command_buffer(),
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            ice_servers: self.ice_servers.clone(),
            data_channel_label: self.data_channel_label.clone(),
        }
    }
}

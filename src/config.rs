// Configuration management
//
// Loads and saves texture subsystem settings as TOML.

use crate::texture::{AllocationPolicy, TextureFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Default configuration file path
pub const CONFIG_FILE: &str = "texture_config.toml";

/// Texture subsystem configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    /// Memory settings
    pub memory: MemoryConfig,

    /// Image loader settings
    pub loader: LoaderConfig,
}

/// Memory configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Largest single buffer allocation in bytes (unset = unlimited)
    pub max_allocation_bytes: Option<u64>,
}

/// Image loader configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Format used when none is requested explicitly
    pub default_format: TextureFormat,

    /// Mark new textures as resident in video memory
    pub place_in_video_memory: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            default_format: TextureFormat::Rgba8888,
            place_in_video_memory: false,
        }
    }
}

impl TextureConfig {
    /// Allocation limits derived from the memory settings
    pub fn allocation_policy(&self) -> AllocationPolicy {
        AllocationPolicy {
            max_allocation_bytes: self.memory.max_allocation_bytes,
        }
    }

    /// Load configuration from a file, falling back to defaults
    ///
    /// Missing or unreadable files are not an error: a warning is logged and
    /// the default configuration is returned.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        Self::load_from(path).unwrap_or_else(|e| {
            tracing::warn!("Could not load config {} ({}), using defaults", path.display(), e);
            Self::default()
        })
    }

    /// Load configuration from a file
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, io::Error> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Save configuration to a file
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), io::Error> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)
    }
}

//! Configuration system for the memory controller model.
//!
//! This module defines all configuration structures used to parameterize the
//! controller. It provides:
//! 1. **Defaults:** Baseline DDR4-style timing, queue depth and address layout.
//! 2. **Structures:** Hierarchical config for the request queue, timing and address mapping.
//! 3. **Loading:** JSON parsing and validation.
//!
//! Configuration is fixed once the controller is built; nothing here is mutated at runtime.
//! All timing values are expressed in controller cycles.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::addr::{AddressField, AddressMapping};
use crate::common::error::ConfigError;

/// Default configuration constants for the controller.
mod defaults {
    use crate::common::addr::AddressField;

    /// Request queue capacity.
    pub const QUEUE_CAPACITY: usize = 16;

    /// RAS-to-CAS delay (ACT to RD/WR).
    pub const T_RCD: u64 = 12;

    /// Precharge delay (PRE to ACT).
    pub const T_RP: u64 = 10;

    /// CAS latency (RD/WR to first data).
    pub const T_CL: u64 = 12;

    /// Burst length in cycles.
    pub const T_BURST: u64 = 4;

    /// Activate-to-activate delay within one bank group.
    pub const T_RRD_L: u64 = 4;

    /// Activate-to-activate delay across bank groups.
    pub const T_RRD_S: u64 = 2;

    /// Column-to-column delay within one bank group.
    pub const T_CCD_L: u64 = 4;

    /// Column-to-column delay across bank groups.
    pub const T_CCD_S: u64 = 2;

    /// Unsuppressed cycles between two refresh windows.
    pub const REFRESH_INTERVAL: u64 = 7800;

    /// Length of a refresh window.
    pub const REFRESH_WINDOW: u64 = 350;

    /// Bank-group select bits [7:6].
    pub const BANK_GROUP: AddressField = AddressField::new(6, 2);

    /// Bank select bits [9:8].
    pub const BANK: AddressField = AddressField::new(8, 2);

    /// Column bits [17:10].
    pub const COLUMN: AddressField = AddressField::new(10, 8);

    /// Row bits [32:18].
    pub const ROW: AddressField = AddressField::new(18, 15);
}

/// Widest bank-group or bank field accepted; keeps the bank grid small.
const MAX_BANK_FIELD_BITS: u32 = 8;

/// Widest row or column field accepted.
const MAX_ROW_COLUMN_BITS: u32 = 32;

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use dramsched_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.queue.capacity, 16);
/// assert_eq!(config.timing.t_cl, 12);
/// ```
///
/// Partial JSON documents fall back to defaults field by field:
///
/// ```
/// use dramsched_core::config::Config;
///
/// let config = Config::from_json_str(r#"{
///     "queue": { "capacity": 4 },
///     "timing": { "t_rcd": 16, "refresh_interval": 1000 }
/// }"#).unwrap();
/// assert_eq!(config.queue.capacity, 4);
/// assert_eq!(config.timing.t_rcd, 16);
/// assert_eq!(config.timing.t_rp, 10);
/// assert_eq!(config.mapping.bank.shift, 8);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Request queue configuration.
    #[serde(default)]
    pub queue: QueueConfig,
    /// DRAM timing parameters.
    #[serde(default)]
    pub timing: TimingConfig,
    /// Physical address layout.
    #[serde(default)]
    pub mapping: MappingConfig,
}

impl Config {
    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Config::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks that the configuration describes a buildable controller.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue.capacity == 0 {
            return Err(ConfigError::Invalid(
                "queue.capacity must be at least 1".into(),
            ));
        }
        if self.timing.refresh_interval == 0 {
            return Err(ConfigError::Invalid(
                "timing.refresh_interval must be at least 1".into(),
            ));
        }
        if self.timing.refresh_window == 0 {
            return Err(ConfigError::Invalid(
                "timing.refresh_window must be at least 1".into(),
            ));
        }
        self.mapping.validate()
    }

    /// Returns the address mapping described by this configuration.
    pub const fn address_mapping(&self) -> AddressMapping {
        self.mapping.to_mapping()
    }
}

/// Request queue configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct QueueConfig {
    /// Maximum number of resident requests.
    #[serde(default = "QueueConfig::default_capacity")]
    pub capacity: usize,
}

impl QueueConfig {
    fn default_capacity() -> usize {
        defaults::QUEUE_CAPACITY
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::QUEUE_CAPACITY,
        }
    }
}

/// DRAM timing parameters, in controller cycles.
///
/// `_l` parameters apply when consecutive commands target the same bank group,
/// `_s` parameters when they target different bank groups.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimingConfig {
    /// RAS-to-CAS delay: ACT to the following RD/WR.
    #[serde(default = "TimingConfig::default_t_rcd")]
    pub t_rcd: u64,

    /// Precharge delay: PRE to the following ACT.
    #[serde(default = "TimingConfig::default_t_rp")]
    pub t_rp: u64,

    /// CAS latency: RD/WR to first data beat.
    #[serde(default = "TimingConfig::default_t_cl")]
    pub t_cl: u64,

    /// Data burst duration.
    #[serde(default = "TimingConfig::default_t_burst")]
    pub t_burst: u64,

    /// Activate-to-activate delay, same bank group.
    #[serde(default = "TimingConfig::default_t_rrd_l")]
    pub t_rrd_l: u64,

    /// Activate-to-activate delay, different bank group.
    #[serde(default = "TimingConfig::default_t_rrd_s")]
    pub t_rrd_s: u64,

    /// Column-to-column delay, same bank group.
    #[serde(default = "TimingConfig::default_t_ccd_l")]
    pub t_ccd_l: u64,

    /// Column-to-column delay, different bank group.
    #[serde(default = "TimingConfig::default_t_ccd_s")]
    pub t_ccd_s: u64,

    /// Unsuppressed cycles between refresh windows.
    #[serde(default = "TimingConfig::default_refresh_interval")]
    pub refresh_interval: u64,

    /// Length of each refresh window.
    #[serde(default = "TimingConfig::default_refresh_window")]
    pub refresh_window: u64,
}

impl TimingConfig {
    fn default_t_rcd() -> u64 {
        defaults::T_RCD
    }

    fn default_t_rp() -> u64 {
        defaults::T_RP
    }

    fn default_t_cl() -> u64 {
        defaults::T_CL
    }

    fn default_t_burst() -> u64 {
        defaults::T_BURST
    }

    fn default_t_rrd_l() -> u64 {
        defaults::T_RRD_L
    }

    fn default_t_rrd_s() -> u64 {
        defaults::T_RRD_S
    }

    fn default_t_ccd_l() -> u64 {
        defaults::T_CCD_L
    }

    fn default_t_ccd_s() -> u64 {
        defaults::T_CCD_S
    }

    fn default_refresh_interval() -> u64 {
        defaults::REFRESH_INTERVAL
    }

    fn default_refresh_window() -> u64 {
        defaults::REFRESH_WINDOW
    }

    /// Cycles a bank stays busy after issuing RD/WR (CAS latency plus burst).
    #[inline]
    pub const fn data_drain(&self) -> u64 {
        self.t_cl + self.t_burst
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            t_rcd: defaults::T_RCD,
            t_rp: defaults::T_RP,
            t_cl: defaults::T_CL,
            t_burst: defaults::T_BURST,
            t_rrd_l: defaults::T_RRD_L,
            t_rrd_s: defaults::T_RRD_S,
            t_ccd_l: defaults::T_CCD_L,
            t_ccd_s: defaults::T_CCD_S,
            refresh_interval: defaults::REFRESH_INTERVAL,
            refresh_window: defaults::REFRESH_WINDOW,
        }
    }
}

/// Physical address layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MappingConfig {
    /// Bank-group select field.
    #[serde(default = "MappingConfig::default_bank_group")]
    pub bank_group: AddressField,

    /// Bank select field.
    #[serde(default = "MappingConfig::default_bank")]
    pub bank: AddressField,

    /// Row field.
    #[serde(default = "MappingConfig::default_row")]
    pub row: AddressField,

    /// Column field.
    #[serde(default = "MappingConfig::default_column")]
    pub column: AddressField,
}

impl MappingConfig {
    const fn default_bank_group() -> AddressField {
        defaults::BANK_GROUP
    }

    const fn default_bank() -> AddressField {
        defaults::BANK
    }

    const fn default_row() -> AddressField {
        defaults::ROW
    }

    const fn default_column() -> AddressField {
        defaults::COLUMN
    }

    /// Converts the configuration into a decoder.
    pub const fn to_mapping(&self) -> AddressMapping {
        AddressMapping {
            bank_group: self.bank_group,
            bank: self.bank,
            row: self.row,
            column: self.column,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mapping = self.to_mapping();
        for (name, field) in mapping.fields() {
            let limit = match name {
                "bank_group" | "bank" => MAX_BANK_FIELD_BITS,
                _ => MAX_ROW_COLUMN_BITS,
            };
            if field.width > limit {
                return Err(ConfigError::Invalid(format!(
                    "mapping.{name} is {} bits wide; at most {limit} allowed",
                    field.width
                )));
            }
            if matches!(name, "row" | "column") && field.width == 0 {
                return Err(ConfigError::Invalid(format!(
                    "mapping.{name} must be at least 1 bit wide"
                )));
            }
            if field.shift >= u64::BITS || field.shift.saturating_add(field.width) > u64::BITS {
                return Err(ConfigError::Invalid(format!(
                    "mapping.{name} extends past bit 63"
                )));
            }
        }

        let fields = mapping.fields();
        for (i, (a_name, a)) in fields.iter().enumerate() {
            for (b_name, b) in &fields[i + 1..] {
                if a.mask() & b.mask() != 0 {
                    return Err(ConfigError::Invalid(format!(
                        "mapping.{a_name} overlaps mapping.{b_name}"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            bank_group: defaults::BANK_GROUP,
            bank: defaults::BANK,
            row: defaults::ROW,
            column: defaults::COLUMN,
        }
    }
}

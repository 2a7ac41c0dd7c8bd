//! Internal optimized configuration storage
//!
//! This module turns a [`DecoderConfig`] into the immutable state read by the
//! scan loop. Conversion happens once per scanner; nothing here changes while
//! a scan runs.

use super::{DecoderConfig, ScanDirections, ThresholdTuning};
use crate::{SymbolFamily, SymbolType};
use std::collections::HashMap;

/// Optimized internal storage for decoder configuration
#[derive(Debug, Clone)]
pub(crate) struct DecoderState {
    /// Per-symbology configuration indexed by SymbolType
    symbologies: HashMap<SymbolType, SymbologyConfig>,

    /// Decoder families in the order they are offered a window
    pub(crate) decoder_order: Vec<SymbolFamily>,

    /// Scanner-level configuration
    pub(crate) scanner: ScannerConfig,
}

/// Configuration for a single symbology
#[derive(Debug, Clone, Default)]
pub(crate) struct SymbologyConfig {
    /// Is this symbology enabled?
    pub(crate) enabled: bool,

    /// Checksum configuration
    pub(crate) checksum: ChecksumConfig,

    /// Length limits (None if unbounded)
    pub(crate) length_limits: Option<LengthLimits>,
}

/// Checksum configuration options
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ChecksumConfig {
    /// Validate the check character during decoding
    pub(crate) add_check: bool,

    /// Include the check character in decoded output
    pub(crate) emit_check: bool,
}

/// Length limit constraints, counted in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LengthLimits {
    pub(crate) min: u32,
    pub(crate) max: u32,
}

impl LengthLimits {
    fn contains(self, len: usize) -> bool {
        (self.min as usize..=self.max as usize).contains(&len)
    }
}

/// Scanner-level configuration
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScannerConfig {
    pub(crate) directions: ScanDirections,
    pub(crate) threshold: f64,
    pub(crate) concurrent_lines: u32,
    pub(crate) line_skip: u32,
    pub(crate) require_duplicates: bool,
    pub(crate) tuning: ThresholdTuning,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            directions: ScanDirections::ALL,
            threshold: 150.0,
            concurrent_lines: 4,
            line_skip: 8,
            require_duplicates: true,
            tuning: ThresholdTuning::default(),
        }
    }
}

impl Default for DecoderState {
    fn default() -> Self {
        (&DecoderConfig::new()).into()
    }
}

impl From<&DecoderConfig> for DecoderState {
    fn from(config: &DecoderConfig) -> Self {
        let global = config
            .global_length_limits
            .map(|(min, max)| LengthLimits { min, max });

        let mut symbologies = HashMap::new();
        for sym in SymbolType::ALL {
            // GS1-128 follows Code 128
            let source = match sym {
                SymbolType::Gs1_128 => SymbolType::Code128,
                other => other,
            };

            let mut sym_config = SymbologyConfig {
                enabled: config.enabled.contains(&source),
                length_limits: global,
                ..Default::default()
            };

            if let Some(&(add, emit)) = config.checksum_flags.get(&source) {
                sym_config.checksum = ChecksumConfig {
                    add_check: add,
                    emit_check: emit,
                };
            }

            if let Some(&(min, max)) = config.length_limits.get(&source) {
                sym_config.length_limits = Some(LengthLimits { min, max });
            }

            symbologies.insert(sym, sym_config);
        }

        Self {
            symbologies,
            decoder_order: config.decoder_order.clone(),
            scanner: ScannerConfig {
                directions: config.directions,
                threshold: f64::from(config.threshold),
                concurrent_lines: config.concurrent_lines,
                line_skip: config.line_skip,
                require_duplicates: config.require_duplicates,
                tuning: config.tuning,
            },
        }
    }
}

impl DecoderState {
    /// Check if a symbology is enabled
    pub(crate) fn is_enabled(&self, sym: SymbolType) -> bool {
        self.symbologies
            .get(&sym)
            .map(|c| c.enabled)
            .unwrap_or(false)
    }

    /// Get configuration for a symbology
    pub(crate) fn get(&self, sym: SymbolType) -> Option<&SymbologyConfig> {
        self.symbologies.get(&sym)
    }

    /// Check if any symbology decoded by `family` is enabled
    pub(crate) fn family_enabled(&self, family: SymbolFamily) -> bool {
        SymbolType::ALL
            .iter()
            .any(|&sym| sym.family() == family && self.is_enabled(sym))
    }

    /// Checksum settings of a symbology
    pub(crate) fn checksum(&self, sym: SymbolType) -> ChecksumConfig {
        self.get(sym).map(|c| c.checksum).unwrap_or_default()
    }

    /// Whether a decoded result may be reported
    pub(crate) fn accepts(&self, sym: SymbolType, data: &str) -> bool {
        match self.get(sym) {
            Some(c) if c.enabled => c
                .length_limits
                .map_or(true, |limits| limits.contains(data.chars().count())),
            _ => false,
        }
    }

    /// Whether a single observation of `sym` is trustworthy
    pub(crate) fn is_self_checking(&self, sym: SymbolType) -> bool {
        sym.has_checksum() || (sym == SymbolType::Code39 && self.checksum(sym).add_check)
    }
}

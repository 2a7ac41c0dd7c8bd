//! Type-safe configuration system for the linear decoders
//!
//! This module provides a compile-time verified configuration API that prevents
//! invalid configuration combinations. The type system ensures you can only
//! set configurations that are valid for each symbology; value ranges are
//! checked once, when the configuration is handed to
//! [`Scanner::with_config`](crate::Scanner::with_config).
//!
//! # Examples
//!
//! ## Valid Configuration
//!
//! ```
//! use bardecode::config::*;
//! use bardecode::DecoderConfig;
//!
//! let config = DecoderConfig::new()
//!     .enable(Ean13)
//!     .enable(Code39)
//!     .set_length_limits(Code39, 4, 20)   // ✓ Code39 supports variable length
//!     .set_checksum(Code39, true, false)  // ✓ Code39 has an optional mod-43 check
//!     .directions(ScanDirections::HORIZONTAL);
//! ```
//!
//! ## Type-Safe Compile Errors
//!
//! The following configurations will NOT compile:
//!
//! ```compile_fail
//! # use bardecode::config::*;
//! # use bardecode::DecoderConfig;
//! # let config = DecoderConfig::new();
//! // ❌ EAN-13 has fixed length, doesn't support length limits
//! config.set_length_limits(Ean13, 1, 20);
//! ```
//!
//! ```compile_fail
//! # use bardecode::config::*;
//! # use bardecode::DecoderConfig;
//! # let config = DecoderConfig::new();
//! // ❌ Interleaved 2 of 5 has no check character to configure
//! config.set_checksum(I25, true, false);
//! ```

use crate::{Error, Result, SymbolFamily, SymbolType};
use std::collections::{HashMap, HashSet};
use std::ops::{BitOr, BitOrAssign};

pub(crate) mod internal;
pub mod symbologies;

// Re-export symbology types for convenience
pub use symbologies::*;

// ============================================================================
// Configuration Value Types
// ============================================================================

/// Set of scan directions
///
/// The bit values are part of the public contract: left-right = 1,
/// top-down = 2, right-left = 4, bottom-up = 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanDirections(u8);

impl ScanDirections {
    pub const NONE: Self = Self(0);
    pub const LEFT_RIGHT: Self = Self(1);
    pub const TOP_DOWN: Self = Self(2);
    pub const RIGHT_LEFT: Self = Self(4);
    pub const BOTTOM_UP: Self = Self(8);
    pub const HORIZONTAL: Self = Self(1 | 4);
    pub const VERTICAL: Self = Self(2 | 8);
    pub const ALL: Self = Self(15);

    /// Build a direction set from its bitmask, ignoring unknown bits
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 15)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl Default for ScanDirections {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for ScanDirections {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ScanDirections {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Constants of the adaptive threshold used while tokenizing scan lines
///
/// These values are empirically tuned against real prints (blur, uneven
/// illumination, toner spread). They have no formal derivation; changing them
/// changes which images decode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdTuning {
    /// Lowest value the threshold may be nudged to
    pub min_threshold: f64,
    /// Highest value the threshold may be nudged to
    pub max_threshold: f64,
    /// Contrast margin against the running mean of the current run (full lines)
    pub line_contrast: f64,
    /// Margin against the previous sample's running mean (full lines)
    pub line_drift: f64,
    /// Dark run length after which a further darkening retunes (full lines)
    pub line_dark_reset: u32,
    /// Contrast margin against the running mean (single bar pulls)
    pub step_contrast: f64,
    /// Dark run length after which a further darkening retunes (single bar pulls)
    pub step_dark_reset: u32,
}

impl Default for ThresholdTuning {
    fn default() -> Self {
        Self {
            min_threshold: 80.0,
            max_threshold: 220.0,
            line_contrast: 30.0,
            line_drift: 40.0,
            line_dark_reset: 20,
            step_contrast: 50.0,
            step_dark_reset: 10,
        }
    }
}

// ============================================================================
// Capability Traits
// ============================================================================

/// Marker trait for symbologies that can be enabled/disabled
pub trait SupportsEnable: Symbology {}

/// Marker trait for symbologies with an optional check character
pub trait SupportsChecksum: Symbology {}

/// Marker trait for symbologies that support variable length limits
pub trait SupportsLengthLimits: Symbology {}

/// Base trait that all symbology types must implement
pub trait Symbology: Sized {
    /// The corresponding SymbolType enum value
    const TYPE: SymbolType;

    /// Human-readable name
    const NAME: &'static str;
}

// ============================================================================
// User-Facing Configuration Builder
// ============================================================================

/// Type-safe configuration builder for the decoders
///
/// # Example
/// ```
/// use bardecode::config::*;
///
/// let config = DecoderConfig::new()
///     .disable_all()
///     .enable(Code128)
///     .set_length_limits(Code128, 1, 48)
///     .threshold(140)
///     .line_skip(4)
///     .require_duplicates(false);
/// assert!(config.is_enabled(bardecode::SymbolType::Code128));
/// ```
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Which symbologies are enabled
    pub(crate) enabled: HashSet<SymbolType>,

    /// Checksum configuration: (add_check, emit_check)
    pub(crate) checksum_flags: HashMap<SymbolType, (bool, bool)>,

    /// Length limits: (min, max)
    pub(crate) length_limits: HashMap<SymbolType, (u32, u32)>,

    /// Length limits applying to every symbology without its own
    pub(crate) global_length_limits: Option<(u32, u32)>,

    /// Global scanner configuration
    pub(crate) directions: ScanDirections,
    pub(crate) threshold: u8,
    pub(crate) concurrent_lines: u32,
    pub(crate) line_skip: u32,
    pub(crate) require_duplicates: bool,
    pub(crate) decoder_order: Vec<SymbolFamily>,
    pub(crate) tuning: ThresholdTuning,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DecoderConfig {
    /// Create a new configuration with sensible defaults
    ///
    /// By default:
    /// - EAN-13, EAN-8, UPC-A, Code128 (and GS1-128), Code39 and I25 are enabled
    /// - all four scan directions are swept
    /// - the seed threshold is 150, 4 lines are averaged, every 8th line is scanned
    /// - non-checksummed symbols must be seen on two scan lines
    pub fn new() -> Self {
        let mut config = Self {
            enabled: HashSet::new(),
            checksum_flags: HashMap::new(),
            length_limits: HashMap::new(),
            global_length_limits: None,
            directions: ScanDirections::ALL,
            threshold: 150,
            concurrent_lines: 4,
            line_skip: 8,
            require_duplicates: true,
            decoder_order: SymbolFamily::DEFAULT_ORDER
                .into_iter()
                .filter(|family| family.is_available())
                .collect(),
            tuning: ThresholdTuning::default(),
        };

        // Enable every compiled-in symbology by default
        for sym in SymbolType::ALL {
            if sym != SymbolType::Gs1_128 && sym.family().is_available() {
                config.enabled.insert(sym);
            }
        }

        // Set default length limits for variable-length symbologies
        config.length_limits.insert(SymbolType::I25, (6, 256));
        config.length_limits.insert(SymbolType::Code39, (1, 256));

        config
    }

    // ========================================================================
    // Per-Symbology Configuration
    // ========================================================================

    /// Enable a symbology
    pub fn enable<S: Symbology + SupportsEnable>(mut self, _: S) -> Self {
        self.enabled.insert(S::TYPE);
        self
    }

    /// Disable a symbology
    pub fn disable<S: Symbology + SupportsEnable>(mut self, _: S) -> Self {
        self.enabled.remove(&S::TYPE);
        self
    }

    /// Disable all symbologies
    ///
    /// Useful when you want to start with a clean slate and only enable
    /// specific symbologies.
    pub fn disable_all(mut self) -> Self {
        self.enabled.clear();
        self
    }

    /// Check if a symbology is enabled
    pub fn is_enabled(&self, sym: SymbolType) -> bool {
        self.enabled.contains(&sym)
    }

    /// Configure the optional check character of a symbology
    ///
    /// # Arguments
    /// * `add_check` - Validate the check character during decoding
    /// * `emit_check` - Keep the check character in decoded data
    pub fn set_checksum<S: Symbology + SupportsChecksum>(
        mut self,
        _: S,
        add_check: bool,
        emit_check: bool,
    ) -> Self {
        self.checksum_flags.insert(S::TYPE, (add_check, emit_check));
        self
    }

    /// Set minimum and maximum length limits
    ///
    /// Only valid for variable-length symbologies.
    pub fn set_length_limits<S: Symbology + SupportsLengthLimits>(
        mut self,
        _: S,
        min: u32,
        max: u32,
    ) -> Self {
        self.length_limits.insert(S::TYPE, (min, max));
        self
    }

    // ========================================================================
    // Global Scanner Configuration
    // ========================================================================

    /// Length limits for every symbology without limits of its own
    pub fn length_limits(mut self, min: u32, max: u32) -> Self {
        self.global_length_limits = Some((min, max));
        self
    }

    /// Select the scan directions
    pub fn directions(mut self, directions: ScanDirections) -> Self {
        self.directions = directions;
        self
    }

    /// Seed binarization threshold, reset at the start of every scan line
    pub fn threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    /// Number of adjacent lines averaged into one sample
    pub fn concurrent_lines(mut self, lines: u32) -> Self {
        self.concurrent_lines = lines;
        self
    }

    /// Distance between two scanned line groups
    pub fn line_skip(mut self, lines: u32) -> Self {
        self.line_skip = lines;
        self
    }

    /// Require two observations of symbols without a check character
    pub fn require_duplicates(mut self, enabled: bool) -> Self {
        self.require_duplicates = enabled;
        self
    }

    /// Order in which decoders are offered each candidate position
    pub fn decoder_order(mut self, order: impl IntoIterator<Item = SymbolFamily>) -> Self {
        self.decoder_order = order.into_iter().collect();
        self
    }

    /// Replace the adaptive threshold constants
    pub fn threshold_tuning(mut self, tuning: ThresholdTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Check that the configuration can drive a scan
    pub fn validate(&self) -> Result<()> {
        fn invalid(msg: impl Into<String>) -> Result<()> {
            Err(Error::InvalidConfig(msg.into()))
        }

        if self.concurrent_lines == 0 {
            return invalid("concurrent_lines must be > 0");
        }
        if self.line_skip == 0 {
            return invalid("line_skip must be > 0");
        }
        if self.threshold == 0 {
            return invalid("threshold must be > 0");
        }
        if self.directions.is_empty() {
            return invalid("no scan direction selected");
        }
        if self.enabled.is_empty() {
            return invalid("no symbology enabled");
        }

        let mut seen = HashSet::new();
        for family in &self.decoder_order {
            if !seen.insert(*family) {
                return invalid(format!("{family:?} listed twice in decoder_order"));
            }
            if !family.is_available() {
                return invalid(format!("{family:?} decoder is not compiled in"));
            }
        }
        for sym in &self.enabled {
            if !sym.family().is_available() {
                return invalid(format!("{sym} decoder is not compiled in"));
            }
            if !seen.contains(&sym.family()) {
                return invalid(format!("{sym} is enabled but missing from decoder_order"));
            }
        }

        let limits = self.length_limits.values();
        for &(min, max) in limits.chain(self.global_length_limits.iter()) {
            if min > max {
                return invalid(format!("min length {min} exceeds max length {max}"));
            }
        }

        let t = &self.tuning;
        if !(0.0..=255.0).contains(&t.min_threshold)
            || !(0.0..=255.0).contains(&t.max_threshold)
            || t.min_threshold > t.max_threshold
        {
            return invalid("threshold clamps must satisfy 0 <= min <= max <= 255");
        }
        if t.line_contrast <= 0.0 || t.line_drift <= 0.0 || t.step_contrast <= 0.0 {
            return invalid("threshold margins must be positive");
        }

        Ok(())
    }
}

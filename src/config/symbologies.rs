//! Symbology type definitions and capability implementations
//!
//! This module defines zero-sized types for each supported symbology
//! and implements the appropriate capability traits.

use super::*;

// ============================================================================
// Symbology Type Definitions
// ============================================================================

/// EAN-8 barcode
#[derive(Debug, Clone, Copy)]
pub struct Ean8;

/// UPC-A barcode (EAN-13 with a leading zero)
#[derive(Debug, Clone, Copy)]
pub struct Upca;

/// EAN-13 barcode
#[derive(Debug, Clone, Copy)]
pub struct Ean13;

/// Interleaved 2 of 5
#[derive(Debug, Clone, Copy)]
pub struct I25;

/// Code 39
#[derive(Debug, Clone, Copy)]
pub struct Code39;

/// Code 128, together with its GS1-128 variant
#[derive(Debug, Clone, Copy)]
pub struct Code128;

// ============================================================================
// Symbology Trait Implementations
// ============================================================================

impl Symbology for Ean8 {
    const TYPE: SymbolType = SymbolType::Ean8;
    const NAME: &'static str = "EAN-8";
}

impl Symbology for Upca {
    const TYPE: SymbolType = SymbolType::Upca;
    const NAME: &'static str = "UPC-A";
}

impl Symbology for Ean13 {
    const TYPE: SymbolType = SymbolType::Ean13;
    const NAME: &'static str = "EAN-13";
}

impl Symbology for I25 {
    const TYPE: SymbolType = SymbolType::I25;
    const NAME: &'static str = "Interleaved 2 of 5";
}

impl Symbology for Code39 {
    const TYPE: SymbolType = SymbolType::Code39;
    const NAME: &'static str = "Code 39";
}

impl Symbology for Code128 {
    const TYPE: SymbolType = SymbolType::Code128;
    const NAME: &'static str = "Code 128";
}

// ============================================================================
// Capability Implementations
// ============================================================================

// SupportsEnable - all symbologies can be enabled/disabled
impl SupportsEnable for Ean8 {}
impl SupportsEnable for Upca {}
impl SupportsEnable for Ean13 {}
impl SupportsEnable for I25 {}
impl SupportsEnable for Code39 {}
impl SupportsEnable for Code128 {}

// SupportsChecksum - only Code 39 has an optional check character
impl SupportsChecksum for Code39 {}

// SupportsLengthLimits - variable-length symbologies only
impl SupportsLengthLimits for I25 {}
impl SupportsLengthLimits for Code39 {}
impl SupportsLengthLimits for Code128 {}

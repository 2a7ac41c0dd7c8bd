//! Barcode decoder implementations
//!
//! This module contains individual decoder implementations for the supported
//! linear barcode formats.

#[cfg(feature = "code128")]
pub(crate) mod code128;
#[cfg(feature = "code39")]
pub(crate) mod code39;
#[cfg(feature = "ean")]
pub(crate) mod ean;
#[cfg(feature = "i25")]
pub(crate) mod i25;

//! Linear barcode recognition
//!
//! This crate finds and decodes one-dimensional barcodes in 8-bit grayscale
//! rasters: EAN-13, EAN-8 and UPC-A, Code 128 (including GS1-128), Code 39
//! and Interleaved 2 of 5.
//!
//! The raster is swept along parallel scan lines. Every line group is
//! averaged, thresholded into alternating runs of dark and light pixels, and
//! each plausible quiet zone is offered to the enabled symbology decoders.
//! Results from all line groups are pooled, so a symbol crossing several
//! lines is reported once.
//!
//! # Example
//!
//! ```
//! use bardecode::{Image, Scanner};
//!
//! let data = vec![255u8; 320 * 240];
//! let image = Image::from_gray(&data, 320, 240).unwrap();
//!
//! let scanner = Scanner::new();
//! for symbol in scanner.scan(&image).unwrap() {
//!     println!("{}: {}", symbol.symbol_type(), symbol.data());
//! }
//! ```
//!
//! The bar tokens a scan works on are available through [`Tokenizer`].
//!
//! Any pixel source can be scanned by implementing [`Raster`]; with the
//! `image` feature, [`image::GrayImage`](::image::GrayImage) is supported
//! directly.

mod bars;
mod color;
pub mod config;
mod decoder;
mod decoders;
pub mod error;
pub mod image;
mod img_scanner;
mod line_scanner;
mod module_word;
mod sampler;
pub mod scanner;
pub mod symbol;

#[cfg(test)]
mod proptest_linear;
#[cfg(test)]
mod test_render;

// Re-export main types
pub use bars::Bar;
pub use color::Color;
pub use config::{DecoderConfig, ScanDirections, ThresholdTuning};
pub use error::{Error, Result};
pub use image::{Image, Raster};
pub use img_scanner::ImageScanner;
pub use line_scanner::Tokenizer;
pub use sampler::Orientation;
pub use scanner::Scanner;
pub use symbol::{Symbol, SymbolFamily, SymbolIterator, SymbolSet, SymbolType};

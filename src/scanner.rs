//! Image scanner for finding barcodes in 2D images

use crate::config::internal::DecoderState;
use crate::config::DecoderConfig;
use crate::decoder::Decoder;
use crate::image::Raster;
use crate::img_scanner::ImageScanner;
use crate::symbol::{Symbol, SymbolSet, SymbolType};
use crate::{Error, Result};
use std::collections::btree_map::{BTreeMap, Entry};
use tracing::debug;

/// Image scanner that can find barcodes in 2D images
///
/// A scanner is immutable once built and can be shared between threads. Every
/// scan owns its own sweeps.
///
/// # Example
/// ```
/// use bardecode::config::*;
/// use bardecode::{DecoderConfig, Image, Scanner};
///
/// // Create scanner with type-safe configuration
/// let config = DecoderConfig::new()
///     .disable_all()
///     .enable(Ean13)
///     .enable(Code39)
///     .set_length_limits(Code39, 4, 20)
///     .directions(ScanDirections::HORIZONTAL);
///
/// let scanner = Scanner::with_config(config).unwrap();
///
/// // Scan an image
/// let data = vec![255u8; 640 * 480];
/// let image = Image::from_gray(&data, 640, 480).unwrap();
/// let symbols = scanner.scan(&image).unwrap();
/// assert!(symbols.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Scanner {
    state: DecoderState,
    decoders: Vec<Decoder>,
}

impl Scanner {
    /// Create a new image scanner with default configuration
    ///
    /// For more control over the configuration, use [`Scanner::with_config()`].
    pub fn new() -> Self {
        Self::from_state(DecoderState::default())
    }

    /// Create a new image scanner with custom configuration
    ///
    /// Returns [`Error::InvalidConfig`] if the configuration cannot drive a
    /// scan, see [`DecoderConfig::validate`].
    ///
    /// # Example
    /// ```
    /// use bardecode::config::*;
    /// use bardecode::{DecoderConfig, Error, Scanner};
    ///
    /// let config = DecoderConfig::new().line_skip(0);
    /// assert!(matches!(Scanner::with_config(config), Err(Error::InvalidConfig(_))));
    /// ```
    pub fn with_config(config: DecoderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_state((&config).into()))
    }

    fn from_state(state: DecoderState) -> Self {
        let decoders = Decoder::configured(&state);
        Scanner { state, decoders }
    }

    /// Scan an image for barcodes
    ///
    /// Observations of all sweeps are pooled by symbology and data. Each
    /// pooled symbol keeps the position of its first observation, and its
    /// [`quality`](Symbol::quality) counts the observations. Symbologies
    /// without a check character must be seen at least twice unless
    /// duplicate observations are not required. The result is ordered by
    /// symbology, then data.
    pub fn scan<R: Raster + ?Sized>(&self, raster: &R) -> Result<SymbolSet> {
        let mut pool: BTreeMap<(SymbolType, String), Symbol> = BTreeMap::new();
        let mut observed = 0usize;

        for symbol in self.scan_iter(raster)? {
            observed += 1;
            match pool.entry((symbol.symbol_type, symbol.data.clone())) {
                Entry::Occupied(mut entry) => entry.get_mut().quality += 1,
                Entry::Vacant(entry) => {
                    entry.insert(symbol);
                }
            }
        }

        let pooled = pool.len();
        let symbols: Vec<Symbol> = pool
            .into_values()
            .filter(|symbol| self.is_trusted(symbol))
            .collect();

        debug!(
            width = raster.width(),
            height = raster.height(),
            observed,
            pooled,
            reported = symbols.len(),
            "scan complete"
        );

        Ok(SymbolSet::from_vec(symbols))
    }

    /// Scan an image lazily
    ///
    /// The returned iterator yields every raw observation as soon as it is
    /// decoded, without pooling. Scanning suspends between calls to `next`.
    pub fn scan_iter<'a, R: Raster + ?Sized>(
        &'a self,
        raster: &'a R,
    ) -> Result<ImageScanner<'a, R>> {
        if raster.width() == 0 || raster.height() == 0 {
            return Err(Error::EmptyImage);
        }
        Ok(ImageScanner::new(raster, &self.state, &self.decoders))
    }

    fn is_trusted(&self, symbol: &Symbol) -> bool {
        !self.state.scanner.require_duplicates
            || self.state.is_self_checking(symbol.symbol_type)
            || symbol.quality >= 2
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

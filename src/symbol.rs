//! Decoded symbols
//!
//! A [`Symbol`] is created only after a decoder has matched the full grammar
//! of a symbology and verified its checksum, and is never modified afterwards.

use std::fmt::Display;

// High-level Rust API types

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolType {
    Ean8,
    Upca,
    Ean13,
    I25,
    Code39,
    Code128,
    Gs1_128,
}

impl SymbolType {
    pub(crate) const ALL: [Self; 7] = [
        SymbolType::Ean8,
        SymbolType::Upca,
        SymbolType::Ean13,
        SymbolType::I25,
        SymbolType::Code39,
        SymbolType::Code128,
        SymbolType::Gs1_128,
    ];

    /// The decoder family that produces this symbology
    pub fn family(self) -> SymbolFamily {
        match self {
            Self::Ean8 | Self::Upca | Self::Ean13 => SymbolFamily::Ean,
            Self::Code128 | Self::Gs1_128 => SymbolFamily::Code128,
            Self::Code39 => SymbolFamily::Code39,
            Self::I25 => SymbolFamily::I25,
        }
    }

    /// Whether the symbology always carries a verified check character
    pub fn has_checksum(self) -> bool {
        !matches!(self, Self::Code39 | Self::I25)
    }
}

impl Display for SymbolType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Ean8 => "EAN-8",
                Self::Upca => "UPC-A",
                Self::Ean13 => "EAN-13",
                Self::I25 => "I2/5",
                Self::Code39 => "CODE-39",
                Self::Code128 => "CODE-128",
                Self::Gs1_128 => "GS1-128",
            }
        )
    }
}

/// Group of symbologies recognized by one decoder
///
/// Decoders are tried in a configurable order of families, see
/// [`DecoderConfig::decoder_order`](crate::DecoderConfig::decoder_order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolFamily {
    /// EAN-13, EAN-8 and UPC-A
    Ean,
    /// Code 128 and GS1-128
    Code128,
    /// Code 39
    Code39,
    /// Interleaved 2 of 5
    I25,
}

impl SymbolFamily {
    pub(crate) const DEFAULT_ORDER: [Self; 4] = [Self::Ean, Self::Code128, Self::Code39, Self::I25];

    /// Whether the decoder for this family was compiled in
    pub fn is_available(self) -> bool {
        match self {
            Self::Ean => cfg!(feature = "ean"),
            Self::Code128 => cfg!(feature = "code128"),
            Self::Code39 => cfg!(feature = "code39"),
            Self::I25 => cfg!(feature = "i25"),
        }
    }
}

/// A decoded barcode symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub(crate) symbol_type: SymbolType,
    pub(crate) data: String,
    pub(crate) x: u32,
    pub(crate) y: u32,
    pub(crate) quality: u32,
}

impl Symbol {
    pub(crate) fn new(symbol_type: SymbolType, data: String, x: u32, y: u32) -> Self {
        Symbol {
            symbol_type,
            data,
            x,
            y,
            quality: 1,
        }
    }

    /// Get the symbol type
    pub fn symbol_type(&self) -> SymbolType {
        self.symbol_type
    }

    /// Get the decoded data
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Pixel position where the symbol was first met
    ///
    /// `x` is the first pixel of the symbol in scan order and `y` the first
    /// row (or column, for vertical sweeps) of the scanned line group.
    pub fn position(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    /// Number of scan lines that decoded this exact symbol
    pub fn quality(&self) -> u32 {
        self.quality
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [type: {} at: ({},{})]",
            self.data, self.symbol_type, self.x, self.y
        )
    }
}

/// Iterator over symbols
pub struct SymbolIterator<'a> {
    iter: std::slice::Iter<'a, Symbol>,
}

impl<'a> Iterator for SymbolIterator<'a> {
    type Item = &'a Symbol;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// Collection of decoded symbols, one per distinct `(type, data)` pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolSet {
    symbols: Vec<Symbol>,
}

impl SymbolSet {
    pub(crate) fn from_vec(symbols: Vec<Symbol>) -> Self {
        Self { symbols }
    }

    /// Get an iterator over the symbols
    pub fn iter(&self) -> SymbolIterator<'_> {
        SymbolIterator {
            iter: self.symbols.iter(),
        }
    }

    /// Check if there are any symbols
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Get the number of symbols
    pub fn len(&self) -> usize {
        self.symbols.len()
    }
}

impl<'a> IntoIterator for &'a SymbolSet {
    type Item = &'a Symbol;
    type IntoIter = SymbolIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for SymbolSet {
    type Item = Symbol;
    type IntoIter = std::vec::IntoIter<Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.into_iter()
    }
}

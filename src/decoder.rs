//! Symbology decoder dispatch
//!
//! Every decoder reads the bars that follow a candidate quiet zone and either
//! recognizes one complete, checksum-verified symbol or rejects the window.
//! Decoders work on their own copy of the [`BarCursor`], so a rejection never
//! moves the caller's position.

use crate::bars::BarCursor;
use crate::config::internal::DecoderState;
use crate::{SymbolFamily, SymbolType};

#[cfg(feature = "code128")]
use crate::decoders::code128::Code128Decoder;
#[cfg(feature = "code39")]
use crate::decoders::code39::Code39Decoder;
#[cfg(feature = "ean")]
use crate::decoders::ean::EanDecoder;
#[cfg(feature = "i25")]
use crate::decoders::i25::I25Decoder;

/// A symbol recognized in a window of bars
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Decoded {
    pub(crate) symbol_type: SymbolType,
    pub(crate) text: String,
    /// Number of bars read, starting at the cursor handed to the decoder
    pub(crate) consumed: usize,
}

impl Decoded {
    pub(crate) fn new(symbol_type: SymbolType, text: String, consumed: usize) -> Self {
        Decoded {
            symbol_type,
            text,
            consumed,
        }
    }
}

/// Common contract of the symbology decoders
///
/// `quiet_px` is the length of the light run preceding the cursor. Each
/// decoder checks it against the width of its own start pattern.
pub(crate) trait SymbologyDecoder {
    /// Read a symbol in its natural orientation
    fn try_decode(&self, cursor: BarCursor<'_>, quiet_px: u32) -> Option<Decoded>;

    /// Read a mirrored symbol, starting from its end pattern
    fn try_reverse_decode(&self, _cursor: BarCursor<'_>, _quiet_px: u32) -> Option<Decoded> {
        None
    }
}

/// One configured decoder per enabled symbology family
#[derive(Debug, Clone)]
pub(crate) enum Decoder {
    #[cfg(feature = "ean")]
    Ean(EanDecoder),
    #[cfg(feature = "code128")]
    Code128(Code128Decoder),
    #[cfg(feature = "code39")]
    Code39(Code39Decoder),
    #[cfg(feature = "i25")]
    Code25Interleaved(I25Decoder),
}

impl Decoder {
    /// Decoder for `family`, or `None` if it is compiled out
    #[allow(unused_variables, unreachable_patterns)]
    fn for_family(family: SymbolFamily, state: &DecoderState) -> Option<Self> {
        match family {
            #[cfg(feature = "ean")]
            SymbolFamily::Ean => Some(Decoder::Ean(EanDecoder)),
            #[cfg(feature = "code128")]
            SymbolFamily::Code128 => Some(Decoder::Code128(Code128Decoder)),
            #[cfg(feature = "code39")]
            SymbolFamily::Code39 => Some(Decoder::Code39(Code39Decoder::new(
                state.checksum(SymbolType::Code39),
            ))),
            #[cfg(feature = "i25")]
            SymbolFamily::I25 => Some(Decoder::Code25Interleaved(I25Decoder)),
            _ => None,
        }
    }

    /// Decoders of all enabled families, in priority order
    pub(crate) fn configured(state: &DecoderState) -> Vec<Decoder> {
        state
            .decoder_order
            .iter()
            .filter(|&&family| state.family_enabled(family))
            .filter_map(|&family| Decoder::for_family(family, state))
            .collect()
    }

    pub(crate) fn family(&self) -> SymbolFamily {
        match self {
            #[cfg(feature = "ean")]
            Decoder::Ean(_) => SymbolFamily::Ean,
            #[cfg(feature = "code128")]
            Decoder::Code128(_) => SymbolFamily::Code128,
            #[cfg(feature = "code39")]
            Decoder::Code39(_) => SymbolFamily::Code39,
            #[cfg(feature = "i25")]
            Decoder::Code25Interleaved(_) => SymbolFamily::I25,
        }
    }

    fn inner(&self) -> &dyn SymbologyDecoder {
        match self {
            #[cfg(feature = "ean")]
            Decoder::Ean(d) => d,
            #[cfg(feature = "code128")]
            Decoder::Code128(d) => d,
            #[cfg(feature = "code39")]
            Decoder::Code39(d) => d,
            #[cfg(feature = "i25")]
            Decoder::Code25Interleaved(d) => d,
        }
    }
}

impl SymbologyDecoder for Decoder {
    fn try_decode(&self, cursor: BarCursor<'_>, quiet_px: u32) -> Option<Decoded> {
        self.inner().try_decode(cursor, quiet_px)
    }

    fn try_reverse_decode(&self, cursor: BarCursor<'_>, quiet_px: u32) -> Option<Decoded> {
        self.inner().try_reverse_decode(cursor, quiet_px)
    }
}

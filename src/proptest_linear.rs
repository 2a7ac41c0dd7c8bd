//! Property-based tests for the linear symbologies
//!
//! Random payloads are encoded to module sequences, turned into bars at
//! several module widths and decoded again, in scan order and mirrored.
//! Checksum properties mutate a valid symbol and expect a rejection.

use crate::bars::{Bar, BarCursor};
use crate::decoder::{Decoded, SymbologyDecoder};
use crate::decoders::code128::Code128Decoder;
use crate::decoders::code39::Code39Decoder;
use crate::decoders::ean::EanDecoder;
use crate::decoders::i25::I25Decoder;
use crate::test_render::{
    bars_from_modules, code128_from_values, code128_modules, code128_values, code39_modules,
    ean_modules, i25_modules, mirror, render_band, with_ean_check,
};
use crate::{DecoderConfig, Scanner, SymbolType};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

/// Decode `modules` in scan order, or mirrored with the reverse grammar
fn decode(
    decoder: &impl SymbologyDecoder,
    modules: &[bool],
    unit: u32,
    mirrored: bool,
) -> Option<Decoded> {
    let bars: Vec<Bar> = if mirrored {
        bars_from_modules(&mirror(modules), unit)
    } else {
        bars_from_modules(modules, unit)
    };
    let cursor = BarCursor::new(&bars, 0);
    if mirrored {
        decoder.try_reverse_decode(cursor, 10 * unit)
    } else {
        decoder.try_decode(cursor, 10 * unit)
    }
}

fn decoded_text(decoded: Option<Decoded>) -> Result<(SymbolType, String), TestCaseError> {
    decoded
        .map(|d| (d.symbol_type, d.text))
        .ok_or_else(|| TestCaseError::fail("symbol not decoded"))
}

proptest! {
    #[test]
    fn prop_ean13_roundtrip(
        payload in "[1-9][0-9]{11}",
        unit in 2u32..=4,
        mirrored in any::<bool>(),
    ) {
        let digits = with_ean_check(&payload);
        let decoded = decode(&EanDecoder, &ean_modules(&digits), unit, mirrored);
        prop_assert_eq!(decoded_text(decoded)?, (SymbolType::Ean13, digits));
    }

    #[test]
    fn prop_upca_roundtrip(payload in "[0-9]{11}", unit in 2u32..=4, mirrored in any::<bool>()) {
        let digits = with_ean_check(&format!("0{payload}"));
        let decoded = decode(&EanDecoder, &ean_modules(&digits), unit, mirrored);
        prop_assert_eq!(decoded_text(decoded)?, (SymbolType::Upca, digits[1..].to_string()));
    }

    #[test]
    fn prop_ean8_roundtrip(payload in "[0-9]{7}", unit in 2u32..=4, mirrored in any::<bool>()) {
        let digits = with_ean_check(&payload);
        let decoded = decode(&EanDecoder, &ean_modules(&digits), unit, mirrored);
        prop_assert_eq!(decoded_text(decoded)?, (SymbolType::Ean8, digits));
    }

    #[test]
    fn prop_code128_roundtrip(
        text in "[ -~]{1,30}",
        unit in 2u32..=4,
        mirrored in any::<bool>(),
    ) {
        let decoded = decode(&Code128Decoder, &code128_modules(&text, false), unit, mirrored);
        prop_assert_eq!(decoded_text(decoded)?, (SymbolType::Code128, text));
    }

    #[test]
    fn prop_gs1_128_roundtrip(digits in "([0-9]{2}){1,12}", unit in 2u32..=4) {
        let decoded = decode(&Code128Decoder, &code128_modules(&digits, true), unit, false);
        prop_assert_eq!(decoded_text(decoded)?, (SymbolType::Gs1_128, digits));
    }

    #[test]
    fn prop_code39_roundtrip(
        text in "[0-9A-Z. $/+%-]{1,20}",
        unit in 2u32..=4,
        mirrored in any::<bool>(),
    ) {
        let decoded = decode(&Code39Decoder::default(), &code39_modules(&text), unit, mirrored);
        prop_assert_eq!(decoded_text(decoded)?, (SymbolType::Code39, text));
    }

    #[test]
    fn prop_i25_roundtrip(
        digits in "([0-9]{2}){1,10}",
        unit in 2u32..=4,
        mirrored in any::<bool>(),
    ) {
        let decoded = decode(&I25Decoder, &i25_modules(&digits), unit, mirrored);
        prop_assert_eq!(decoded_text(decoded)?, (SymbolType::I25, digits));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// A crossing band of EAN-13 is reported once, at its first bar
    #[test]
    fn prop_scan_reports_ean13_once(payload in "[1-9][0-9]{11}", quiet in 20u32..60) {
        let digits = with_ean_check(&payload);
        let img = render_band(&ean_modules(&digits), 2, quiet, 80, 30..60);
        let symbols = Scanner::new().scan(&img)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert_eq!(symbols.len(), 1);
        let symbol = symbols.iter().next()
            .ok_or_else(|| TestCaseError::fail("no symbol"))?;
        prop_assert_eq!(symbol.symbol_type(), SymbolType::Ean13);
        prop_assert_eq!(symbol.data(), digits.as_str());
        prop_assert_eq!(symbol.position(), (quiet, 32));
    }

    /// Scanning is a pure function of the raster and the configuration
    #[test]
    fn prop_scan_is_idempotent(text in "[0-9A-Z]{1,8}", unit in 2u32..=3) {
        let img = render_band(&code39_modules(&text), unit, 30, 64, 8..56);
        let scanner = Scanner::with_config(DecoderConfig::new())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let first = scanner.scan(&img).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let second = scanner.scan(&img).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(first, second);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10_000))]

    /// Any single substituted digit breaks the mod-10 check
    #[test]
    fn prop_ean13_rejects_single_digit_error(
        payload in "[1-9][0-9]{11}",
        index in 0usize..13,
        delta in 1u8..10,
    ) {
        let mut digits = with_ean_check(&payload).into_bytes();
        digits[index] = b'0' + (digits[index] - b'0' + delta) % 10;
        let digits = String::from_utf8(digits).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert!(decode(&EanDecoder, &ean_modules(&digits), 2, false).is_none());
    }

    /// Any single substituted value breaks the mod-103 check
    #[test]
    fn prop_code128_rejects_single_value_error(
        text in "[ -~]{1,20}",
        index in any::<prop::sample::Index>(),
        delta in 1u8..95,
    ) {
        let mut values = code128_values(&text, false);
        // data values and the check value, never the start code
        let i = 1 + index.index(values.len() - 1);
        values[i] = if i == values.len() - 1 {
            (values[i] + delta) % 103
        } else {
            (values[i] + delta) % 95
        };
        prop_assert!(decode(&Code128Decoder, &code128_from_values(&values), 2, false).is_none());
    }
}

//! Bar colors
//!
//! This module provides the color of a run along a scan line.

use std::ops::Not;

/// Color of element: bar or space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Space = 0, // light area or space between bars
    Bar = 1,   // dark area or colored bar segment
}

impl Color {
    /// Color of a sample given its dark/light classification
    #[inline]
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            Self::Bar
        } else {
            Self::Space
        }
    }

    #[inline]
    pub fn is_bar(self) -> bool {
        self == Self::Bar
    }

    #[inline]
    pub fn is_space(self) -> bool {
        self == Self::Space
    }
}

impl Not for Color {
    type Output = Self;

    fn not(self) -> Self {
        match self {
            Self::Space => Self::Bar,
            Self::Bar => Self::Space,
        }
    }
}

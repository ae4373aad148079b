use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::BetError;

/// Pocket color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
    Green,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Black => "black",
            Color::Green => "green",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = BetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(Color::Red),
            "black" => Ok(Color::Black),
            "green" => Ok(Color::Green),
            other => Err(BetError::InvalidChoice {
                kind: super::BetKind::Color,
                value: other.to_string(),
            }),
        }
    }
}

/// Result of a single spin. Only ever embedded in a round event, never stored alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpinResult {
    pub number: u8,
    pub color: Color,
}

/// Fixed red/black partition of 1-36 used by a wheel for a whole run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// Standard European wheel layout.
    #[default]
    Canonical,
    /// Even numbers red, odd numbers black.
    Parity,
}

impl ColorScheme {
    /// Color of a pocket. 0 is always green.
    pub fn color_of(&self, number: u8) -> Color {
        if number == 0 {
            return Color::Green;
        }
        let red = match self {
            ColorScheme::Canonical => super::RED_NUMBERS.contains(&number),
            ColorScheme::Parity => number % 2 == 0,
        };
        if red {
            Color::Red
        } else {
            Color::Black
        }
    }
}

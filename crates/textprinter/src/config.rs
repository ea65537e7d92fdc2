use std::str::FromStr;

use crate::TextError;

/// Rows a prompt scroll moves per tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ScrollSpeed {
    Slow,
    #[default]
    Mid,
    Fast,
}

impl ScrollSpeed {
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(ScrollSpeed::Slow),
            1 => Some(ScrollSpeed::Mid),
            2 => Some(ScrollSpeed::Fast),
            _ => None,
        }
    }

    pub fn rows_per_tick(self) -> u16 {
        match self {
            ScrollSpeed::Slow => 1,
            ScrollSpeed::Mid => 2,
            ScrollSpeed::Fast => 4,
        }
    }
}

impl FromStr for ScrollSpeed {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slow" | "0" => Ok(ScrollSpeed::Slow),
            "mid" | "1" => Ok(ScrollSpeed::Mid),
            "fast" | "2" => Ok(ScrollSpeed::Fast),
            _ => Err(TextError::Parse(format!("unknown scroll speed {s:?}"))),
        }
    }
}

/// Player and host settings shared by all printers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TextConfig {
    /// Prompts advance on their own after a fixed delay.
    pub auto_scroll: bool,
    /// A fresh acknowledge press skips the per-character delay.
    pub can_speed_up: bool,
    pub alternate_down_arrow: bool,
    pub scroll_speed: ScrollSpeed,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            auto_scroll: false,
            can_speed_up: true,
            alternate_down_arrow: false,
            scroll_speed: ScrollSpeed::default(),
        }
    }
}

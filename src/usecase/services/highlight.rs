use crate::domain::entities::cell::{row_text, Row};

pub const HIGHLIGHT_SATURATION: u8 = 70;
pub const HIGHLIGHT_LIGHTNESS: u8 = 90;

/// Pale background for rows sharing a group-by value. Hues may collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightColor {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl HighlightColor {
    pub fn from_hue(hue: u16) -> Self {
        Self {
            hue,
            saturation: HIGHLIGHT_SATURATION,
            lightness: HIGHLIGHT_LIGHTNESS,
        }
    }

    pub fn css(&self) -> String {
        format!(
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// `h = h * 31 + unit` over UTF-16 code units, wrapping at 32 bits.
pub fn string_hash(value: &str) -> i32 {
    value.encode_utf16().fold(0_i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    })
}

pub fn hue_for(value: &str) -> u16 {
    (i64::from(string_hash(value)).abs() % 360) as u16
}

pub fn color_for(row: &Row, group_by: Option<&str>, enabled: bool) -> Option<HighlightColor> {
    if !enabled {
        return None;
    }
    let group_by = group_by?;
    let value = row_text(row, group_by).trim().to_lowercase();
    if value.is_empty() {
        return None;
    }
    Some(HighlightColor::from_hue(hue_for(&value)))
}

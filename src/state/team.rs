/// Team identity and per-team scoring state
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use super::inventory::Inventory;
use super::rules::{ScoringRules, ADJUSTMENT_POINTS};

/// Named colors accepted in addition to hex notation
const NAMED_COLORS: &[(&str, u32)] = &[
    ("black", 0x000000),
    ("white", 0xffffff),
    ("red", 0xff0000),
    ("green", 0x008000),
    ("lime", 0x00ff00),
    ("blue", 0x0000ff),
    ("navy", 0x000080),
    ("yellow", 0xffff00),
    ("gold", 0xffd700),
    ("orange", 0xffa500),
    ("purple", 0x800080),
    ("magenta", 0xff00ff),
    ("cyan", 0x00ffff),
    ("teal", 0x008080),
    ("pink", 0xffc0cb),
    ("brown", 0xa52a2a),
    ("gray", 0x808080),
    ("grey", 0x808080),
    ("silver", 0xc0c0c0),
    ("maroon", 0x800000),
    ("olive", 0x808000),
    ("crimson", 0xdc143c),
    ("skyblue", 0x87ceeb),
];

/// A validated RGB color, canonically rendered as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TeamColor(u32);

impl TeamColor {
    pub const fn from_rgb(rgb: u32) -> Self {
        Self(rgb & 0x00ff_ffff)
    }

    /// Parse `#rgb`, `#rrggbb`, `#aarrggbb` (alpha dropped) or a named color
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Some(hex) = input.strip_prefix('#') {
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return None;
            }
            let value = u32::from_str_radix(hex, 16).ok();
            return match hex.len() {
                3 => value.map(|v| {
                    let r = (v >> 8) & 0xf;
                    let g = (v >> 4) & 0xf;
                    let b = v & 0xf;
                    Self::from_rgb((r * 0x11) << 16 | (g * 0x11) << 8 | b * 0x11)
                }),
                6 | 8 => value.map(Self::from_rgb),
                _ => None,
            };
        }

        NAMED_COLORS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(input))
            .map(|&(_, rgb)| Self::from_rgb(rgb))
    }

    pub fn to_hex(self) -> String {
        format!("#{:06x}", self.0)
    }
}

impl std::fmt::Display for TeamColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for TeamColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid color: {value}"))
    }
}

impl From<TeamColor> for String {
    fn from(color: TeamColor) -> Self {
        color.to_hex()
    }
}

/// Normalize a team name for display
///
/// NFC-composes the text, collapses internal whitespace runs to one space,
/// trims, then truncates to `max_len` characters (0 = unlimited).
/// Returns `None` when nothing is left.
pub fn normalize_team_name(raw: &str, max_len: usize) -> Option<String> {
    let composed: String = raw.nfc().collect();
    let collapsed = composed.split_whitespace().collect::<Vec<_>>().join(" ");

    let name = if max_len > 0 && collapsed.chars().count() > max_len {
        collapsed.chars().take(max_len).collect::<String>().trim_end().to_string()
    } else {
        collapsed
    };

    (!name.is_empty()).then_some(name)
}

/// Everything the engine tracks for one team
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRecord {
    pub name: String,
    pub color: TeamColor,
    pub inventory: Inventory,
    /// Number of -5 infractions
    pub penalty: u64,
    /// Number of +5 credits
    pub bonus: u64,
}

impl TeamRecord {
    pub fn new(name: String, color: TeamColor) -> Self {
        Self {
            name,
            color,
            inventory: Inventory::new(),
            penalty: 0,
            bonus: 0,
        }
    }

    /// Inventory points minus penalties plus bonuses; may be negative
    ///
    /// Saturates at the `i64` bounds for adjustment counts that large.
    pub fn score(&self, rules: &ScoringRules) -> i64 {
        let adjustment =
            (i128::from(self.bonus) - i128::from(self.penalty)) * i128::from(ADJUSTMENT_POINTS);
        let score = i128::from(self.inventory.points(rules)) + adjustment;
        i64::try_from(score).unwrap_or(if score < 0 { i64::MIN } else { i64::MAX })
    }

    /// Zero inventory and adjustments, keep name and color
    pub fn reset_scoring(&mut self) {
        self.inventory.clear();
        self.penalty = 0;
        self.bonus = 0;
    }
}

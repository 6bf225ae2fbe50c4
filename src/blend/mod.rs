//! Blend policies: how a QR pixel and an art pixel combine into an output pixel.
//!
//! Every strategy shares the same two guards before its own branch runs:
//! - a pixel inside a protected region is the QR pixel, byte for byte
//! - a QR dark module is never brightened past the dark/light decision boundary

mod badge;

pub use badge::Badge;

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::{
    analysis::{PixelClass, PixelClassification},
    common::color::{brightness, lift, mix, scale, with_rgb, BLACK, NEUTRAL_FILL, WHITE},
};

// QR pixels darker than this are dark modules
pub const DARK_MODULE_MAX: f32 = 100.0;

// Hard dark/light split used where contrast is boosted
const MODULE_SPLIT: f32 = 128.0;

// Lowest channel value of light modules outside the badge
const OUTSIDE_BADGE_FLOOR: u8 = 180;

// Share of white mixed into badge background over light modules
const BADGE_BACKGROUND_LIFT: f32 = 0.45;

// Factor applied to badge background over dark modules
const BADGE_BACKGROUND_SHADE: f32 = 0.35;

// Strategy
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlendStrategy {
    /// Art shows faintly, and only inside light modules.
    #[default]
    Conservative,
    /// Steeper light-module ratios for more visible art; nothing below brightness 150 changes.
    ReadableArt,
    /// Art painted into a circular badge near the bottom-right corner, high contrast elsewhere.
    Badge,
    /// A flat 30% art wash over every light module brighter than 200.
    Classic,
}

impl BlendStrategy {
    pub const ALL: [BlendStrategy; 4] = [
        BlendStrategy::Conservative,
        BlendStrategy::ReadableArt,
        BlendStrategy::Badge,
        BlendStrategy::Classic,
    ];

    /// Whether the strategy places a badge on the canvas.
    pub fn uses_badge(self) -> bool {
        matches!(self, Self::Badge)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::ReadableArt => "readableArt",
            Self::Badge => "badge",
            Self::Classic => "classic",
        }
    }
}

impl std::str::FromStr for BlendStrategy {
    type Err = crate::ComposeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.name().eq_ignore_ascii_case(s))
            .ok_or(crate::ComposeError::InvalidOption("strategy"))
    }
}

// Zone
//------------------------------------------------------------------------------

/// Where a pixel falls relative to the placement of the chosen strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendZone {
    #[default]
    FullFrame,
    InsideBadge,
    BadgeRing,
    OutsideBadge,
}

// Input
//------------------------------------------------------------------------------

/// Everything a policy needs to decide one output pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendInput {
    pub qr: Rgba<u8>,
    /// `None` when the art lookup fell outside the art buffer.
    pub art: Option<Rgba<u8>>,
    pub class: PixelClassification,
    pub zone: BlendZone,
    pub qr_brightness: f32,
}

impl BlendInput {
    pub fn new(qr: Rgba<u8>, art: Option<Rgba<u8>>, class: PixelClassification, zone: BlendZone) -> Self {
        Self { qr, art, class, zone, qr_brightness: brightness(&qr) }
    }

    // Missed lookups read as neutral background
    fn art(&self) -> Rgba<u8> {
        self.art.unwrap_or(NEUTRAL_FILL)
    }

    fn content(&self) -> PixelClass {
        match self.art {
            Some(_) => self.class.content,
            None => PixelClass::Background,
        }
    }
}

// Policies
//------------------------------------------------------------------------------

pub fn blend(strategy: BlendStrategy, input: &BlendInput) -> Rgba<u8> {
    if input.class.protected {
        return input.qr;
    }

    match strategy {
        BlendStrategy::Conservative => conservative(input),
        BlendStrategy::ReadableArt => readable_art(input),
        BlendStrategy::Classic => classic(input),
        BlendStrategy::Badge => match input.zone {
            BlendZone::InsideBadge => badge_inside(input),
            BlendZone::BadgeRing => badge_ring(input),
            BlendZone::OutsideBadge | BlendZone::FullFrame => badge_outside(input),
        },
    }
}

// Blends art into light modules only. Ratios grow with brightness so the lightest modules,
// which have the most headroom, carry the most art.
fn light_module_blend(input: &BlendInput, ratios: &[(f32, f32)]) -> Rgba<u8> {
    if input.qr_brightness < DARK_MODULE_MAX {
        return input.qr;
    }
    match ratios.iter().find(|(min, _)| input.qr_brightness > *min) {
        Some(&(_, t)) => mix(&input.qr, &input.art(), t),
        None => input.qr,
    }
}

fn conservative(input: &BlendInput) -> Rgba<u8> {
    light_module_blend(input, &[(240.0, 0.2), (220.0, 0.1)])
}

fn readable_art(input: &BlendInput) -> Rgba<u8> {
    light_module_blend(input, &[(240.0, 0.6), (200.0, 0.4), (150.0, 0.2)])
}

fn classic(input: &BlendInput) -> Rgba<u8> {
    light_module_blend(input, &[(200.0, 0.3)])
}

fn badge_inside(input: &BlendInput) -> Rgba<u8> {
    let art = input.art();
    match input.content() {
        PixelClass::Subject => with_rgb(&input.qr, &art),
        PixelClass::Background if input.qr_brightness < MODULE_SPLIT => {
            with_rgb(&input.qr, &scale(&art, BADGE_BACKGROUND_SHADE))
        }
        PixelClass::Background => with_rgb(&input.qr, &mix(&art, &WHITE, BADGE_BACKGROUND_LIFT)),
    }
}

fn badge_ring(input: &BlendInput) -> Rgba<u8> {
    if input.qr_brightness < MODULE_SPLIT {
        with_rgb(&input.qr, &BLACK)
    } else {
        with_rgb(&input.qr, &WHITE)
    }
}

fn badge_outside(input: &BlendInput) -> Rgba<u8> {
    if input.qr_brightness < MODULE_SPLIT {
        with_rgb(&input.qr, &BLACK)
    } else {
        with_rgb(&input.qr, &lift(&input.art(), OUTSIDE_BADGE_FLOOR))
    }
}

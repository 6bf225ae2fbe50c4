//! Art generation seam.
//!
//! Image generation backends live outside the crate. They plug in through [`ArtGenerator`] and can
//! be wrapped in an [`ArtCache`] so repeated requests skip the backend.

mod prompt;

pub use prompt::{art_prompt, is_cat_prompt};

use std::{num::NonZeroUsize, str::FromStr};

use image::RgbaImage;
use lru::LruCache;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::error::{ComposeError, ComposeResult};

// Style
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtStyle {
    #[default]
    Normal,
    Cute,
    Cool,
    Elegant,
    Playful,
    Retro,
}

impl ArtStyle {
    pub const ALL: [ArtStyle; 6] = [
        ArtStyle::Normal,
        ArtStyle::Cute,
        ArtStyle::Cool,
        ArtStyle::Elegant,
        ArtStyle::Playful,
        ArtStyle::Retro,
    ];

    /// Phrase appended to prompts in this style. Empty for [`ArtStyle::Normal`].
    pub fn modifier(self) -> &'static str {
        match self {
            ArtStyle::Normal => "",
            ArtStyle::Cute => "kawaii, cute style, adorable, soft features, pastel colors, charming, sweet",
            ArtStyle::Cool => "cool design, sleek, confident, bold colors, modern style, edgy, dynamic",
            ArtStyle::Elegant => {
                "elegant design, sophisticated, refined, graceful, classy, luxurious, artistic"
            }
            ArtStyle::Playful => {
                "playful style, fun, energetic, vibrant colors, cheerful, whimsical, joyful"
            }
            ArtStyle::Retro => {
                "retro style, vintage design, nostalgic, classic colors, old-school aesthetic, timeless"
            }
        }
    }
}

impl FromStr for ArtStyle {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(ArtStyle::Normal),
            "cute" => Ok(ArtStyle::Cute),
            "cool" => Ok(ArtStyle::Cool),
            "elegant" => Ok(ArtStyle::Elegant),
            "playful" => Ok(ArtStyle::Playful),
            "retro" => Ok(ArtStyle::Retro),
            _ => Err(ComposeError::InvalidOption("style")),
        }
    }
}

// Request
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtRequest {
    pub prompt: String,
    #[serde(default)]
    pub style: ArtStyle,
    /// Side of the square image to generate.
    pub size: u32,
}

impl ArtRequest {
    pub fn new(prompt: impl Into<String>, style: ArtStyle, size: u32) -> Self {
        Self { prompt: prompt.into(), style, size }
    }

    /// Full prompt sent to the backend.
    pub fn enhanced_prompt(&self) -> String {
        art_prompt(&self.prompt, self.style)
    }
}

// Generator
//------------------------------------------------------------------------------

pub trait ArtGenerator {
    fn generate(&self, request: &ArtRequest) -> ComposeResult<RgbaImage>;
}

impl<F> ArtGenerator for F
where
    F: Fn(&ArtRequest) -> ComposeResult<RgbaImage>,
{
    fn generate(&self, request: &ArtRequest) -> ComposeResult<RgbaImage> {
        self(request)
    }
}

// Cache
//------------------------------------------------------------------------------

/// Bounded LRU cache in front of a generator. Failed generations are not cached.
pub struct ArtCache<G> {
    generator: G,
    entries: LruCache<ArtRequest, RgbaImage>,
    hits: u64,
    misses: u64,
}

impl<G: ArtGenerator> ArtCache<G> {
    pub fn new(generator: G, capacity: usize) -> ComposeResult<Self> {
        let cap = NonZeroUsize::new(capacity).ok_or(ComposeError::InvalidOption("capacity"))?;
        Ok(Self { generator, entries: LruCache::new(cap), hits: 0, misses: 0 })
    }

    pub fn get_or_generate(&mut self, request: &ArtRequest) -> ComposeResult<RgbaImage> {
        if let Some(img) = self.entries.get(request) {
            self.hits += 1;
            debug!(prompt = %request.prompt, "Art cache hit");
            return Ok(img.clone());
        }

        self.misses += 1;
        debug!(prompt = %request.prompt, style = ?request.style, size = request.size, "Generating art...");
        let img = self.generator.generate(request)?;
        if img.dimensions() != (request.size, request.size) {
            debug!(dims = ?img.dimensions(), "Generator returned non-square art");
        }
        self.entries.put(request.clone(), img.clone());
        Ok(img)
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

use serde::{Deserialize, Serialize};

use crate::{
    blend::BlendStrategy,
    common::error::{ComposeError, ComposeResult},
    geometry::SymbolGeometry,
};

pub const DEFAULT_CANVAS_SIZE: u32 = 1024;

// Upper bound on the canvas side, keeps a single buffer well under 1 GiB
pub const MAX_CANVAS_SIZE: u32 = 8192;

// Options
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompositionOptions {
    pub strategy: BlendStrategy,
    pub canvas_size: u32,
    /// Badge radius as a share of half the canvas, in `(0, 1]`.
    pub badge_radius_ratio: f32,
    /// Gap between the badge and the bottom-right edges as a share of the canvas, in `[0, 0.5)`.
    pub badge_inset_ratio: f32,
    /// Width of the high contrast ring around the badge as a share of the canvas, in `[0, 0.25)`.
    pub badge_ring_ratio: f32,
    pub geometry: SymbolGeometry,
}

impl Default for CompositionOptions {
    fn default() -> Self {
        Self {
            strategy: BlendStrategy::Conservative,
            canvas_size: DEFAULT_CANVAS_SIZE,
            badge_radius_ratio: 0.35,
            badge_inset_ratio: 0.06,
            badge_ring_ratio: 0.015,
            geometry: SymbolGeometry::default(),
        }
    }
}

impl CompositionOptions {
    pub fn new(strategy: BlendStrategy, canvas_size: u32) -> Self {
        Self { strategy, canvas_size, ..Default::default() }
    }

    pub fn builder() -> OptionsBuilder {
        OptionsBuilder { opts: Self::default() }
    }

    pub fn from_json(json: &str) -> ComposeResult<Self> {
        let opts: Self =
            serde_json::from_str(json).map_err(|_| ComposeError::InvalidOption("json"))?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> ComposeResult<()> {
        let s = self.canvas_size;
        if s == 0 {
            return Err(ComposeError::InvalidDimensions { width: s, height: s });
        }
        if s > MAX_CANVAS_SIZE {
            return Err(ComposeError::InvalidOption("canvasSize"));
        }
        if !self.geometry.is_valid() {
            return Err(ComposeError::InvalidOption("geometry"));
        }
        // Every module needs at least one pixel
        if self.geometry.grid_modules() > s {
            return Err(ComposeError::InvalidDimensions { width: s, height: s });
        }
        if !(self.badge_radius_ratio > 0.0 && self.badge_radius_ratio <= 1.0) {
            return Err(ComposeError::InvalidOption("badgeRadiusRatio"));
        }
        if !(0.0..0.5).contains(&self.badge_inset_ratio) {
            return Err(ComposeError::InvalidOption("badgeInsetRatio"));
        }
        if !(0.0..0.25).contains(&self.badge_ring_ratio) {
            return Err(ComposeError::InvalidOption("badgeRingRatio"));
        }
        Ok(())
    }
}

// Builder
//------------------------------------------------------------------------------

pub struct OptionsBuilder {
    opts: CompositionOptions,
}

impl OptionsBuilder {
    pub fn strategy(&mut self, strategy: BlendStrategy) -> &mut Self {
        self.opts.strategy = strategy;
        self
    }

    pub fn canvas_size(&mut self, canvas_size: u32) -> &mut Self {
        self.opts.canvas_size = canvas_size;
        self
    }

    pub fn badge_radius_ratio(&mut self, ratio: f32) -> &mut Self {
        self.opts.badge_radius_ratio = ratio;
        self
    }

    pub fn badge_inset_ratio(&mut self, ratio: f32) -> &mut Self {
        self.opts.badge_inset_ratio = ratio;
        self
    }

    pub fn badge_ring_ratio(&mut self, ratio: f32) -> &mut Self {
        self.opts.badge_ring_ratio = ratio;
        self
    }

    pub fn geometry(&mut self, geometry: SymbolGeometry) -> &mut Self {
        self.opts.geometry = geometry;
        self
    }

    pub fn build(&self) -> ComposeResult<CompositionOptions> {
        self.opts.validate()?;
        Ok(self.opts)
    }
}

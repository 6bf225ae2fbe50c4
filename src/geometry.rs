//! Canvas geometry of the underlying QR symbol and the regions that must survive composition
//! untouched.
//!
//! The compositor assumes a fixed symbol layout so that every module maps onto a known span of
//! canvas pixels. A canvas of `S` pixels holds a grid of `N = symbol_modules + 2 * quiet_zone`
//! modules and module `m` covers the pixel range `[ceil(m * S / N), ceil((m + 1) * S / N))`.

use serde::{Deserialize, Serialize};

// Finder patterns are 7x7 modules
const FINDER_MODULES: u32 = 7;

// Light separator inside the symbol plus one quiet-zone module outside it. Art blended into
// these light rings darkens them and the locator can no longer isolate the finder.
const FINDER_MARGIN: u32 = 1;

// Timing patterns start after the finder and its separator
const TIMING_OFFSET: u32 = 8;
const TIMING_ROW: u32 = 6;

// Only the first stretch of each timing strip is protected, which leaves the bottom-right of the
// canvas free for art. Degraded timing information is recovered by error correction.
const TIMING_RUN: u32 = 9;

// Rect
//------------------------------------------------------------------------------

/// Axis aligned rectangle in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// A zone of the canvas that is copied verbatim from the QR image.
pub type ProtectedRegion = Rect;

// Symbol geometry
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SymbolGeometry {
    /// Modules per side of the symbol itself, `17 + 4 * version`.
    pub symbol_modules: u32,
    /// Light modules around the symbol on every side.
    pub quiet_zone: u32,
}

impl Default for SymbolGeometry {
    fn default() -> Self {
        Self::for_version(3, 1)
    }
}

impl SymbolGeometry {
    pub fn new(symbol_modules: u32, quiet_zone: u32) -> Self {
        Self { symbol_modules, quiet_zone }
    }

    pub fn for_version(version: u32, quiet_zone: u32) -> Self {
        Self::new(17 + 4 * version, quiet_zone)
    }

    pub fn is_valid(&self) -> bool {
        (21..=177).contains(&self.symbol_modules)
            && (self.symbol_modules - 17) % 4 == 0
            && self.quiet_zone <= 16
    }

    /// Modules per side of the whole canvas, quiet zone included.
    pub fn grid_modules(&self) -> u32 {
        self.symbol_modules + 2 * self.quiet_zone
    }

    /// First pixel of grid module `m`. `module_edge(grid_modules)` equals `canvas`.
    #[inline]
    pub fn module_edge(&self, m: u32, canvas: u32) -> u32 {
        let n = self.grid_modules() as u64;
        ((m as u64 * canvas as u64 + n - 1) / n) as u32
    }

    /// Grid module containing pixel `px`.
    #[inline]
    pub fn module_at(&self, px: u32, canvas: u32) -> u32 {
        (px as u64 * self.grid_modules() as u64 / canvas as u64) as u32
    }

    /// Pixel rectangle covering grid modules `[c, c + w) x [r, r + h)`.
    pub fn module_rect(&self, c: u32, r: u32, w: u32, h: u32, canvas: u32) -> Rect {
        let x = self.module_edge(c, canvas);
        let y = self.module_edge(r, canvas);
        Rect::new(x, y, self.module_edge(c + w, canvas) - x, self.module_edge(r + h, canvas) - y)
    }

    // Region classifier
    //--------------------------------------------------------------------------

    /// Finder squares (top-left, top-right, bottom-left) followed by the shortened horizontal and
    /// vertical timing strips.
    ///
    /// Each finder square is widened by one module on every side, covering the separator and,
    /// when there is a quiet zone, its innermost module. With the default layout that is 9x9
    /// modules per finder.
    pub fn protected_regions(&self, canvas: u32) -> Vec<ProtectedRegion> {
        let qz = self.quiet_zone;
        let outer = qz.min(FINDER_MARGIN);
        let side = FINDER_MODULES + FINDER_MARGIN + outer;
        let near = qz - outer;
        let far = qz + self.symbol_modules - FINDER_MODULES - FINDER_MARGIN;
        let run = TIMING_RUN.min(self.symbol_modules.saturating_sub(2 * TIMING_OFFSET));

        let mut regions = vec![
            self.module_rect(near, near, side, side, canvas),
            self.module_rect(far, near, side, side, canvas),
            self.module_rect(near, far, side, side, canvas),
        ];
        if run > 0 {
            regions.push(self.module_rect(qz + TIMING_OFFSET, qz + TIMING_ROW, run, 1, canvas));
            regions.push(self.module_rect(qz + TIMING_ROW, qz + TIMING_OFFSET, 1, run, canvas));
        }
        regions
    }

    /// Grid `(column, row)` of the top-left module of each finder pattern: top-left, top-right,
    /// bottom-left.
    pub fn finder_origins(&self) -> [(u32, u32); 3] {
        let qz = self.quiet_zone;
        let far = qz + self.symbol_modules - FINDER_MODULES;
        [(qz, qz), (far, qz), (qz, far)]
    }

    /// Pixel rectangle of a finder pattern given its grid origin.
    pub fn finder_rect(&self, origin: (u32, u32), canvas: u32) -> Rect {
        self.module_rect(origin.0, origin.1, FINDER_MODULES, FINDER_MODULES, canvas)
    }

    /// Whether symbol module `(r, c)` (quiet zone excluded) belongs to a finder pattern.
    pub fn is_finder_module(&self, r: u32, c: u32) -> bool {
        let far = self.symbol_modules - FINDER_MODULES;
        (r < FINDER_MODULES && c < FINDER_MODULES)
            || (r < FINDER_MODULES && c >= far)
            || (r >= far && c < FINDER_MODULES)
    }
}

/// Protected regions of the default symbol layout on a `canvas x canvas` canvas.
pub fn compute_protected_regions(canvas: u32) -> Vec<ProtectedRegion> {
    SymbolGeometry::default().protected_regions(canvas)
}

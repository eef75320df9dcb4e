//! Correction for hosts whose image drawing primitive ignores the device pixel
//! ratio, which makes every drawn image come out scaled by it.
//!
//! The correction decorates [`PixelSurface::draw_image`](super::surface::PixelSurface::draw_image)
//! for the whole process. It is installed at most once: the first
//! [`install_draw_image_patch`] wins and later calls are no-ops, so the factor
//! can never compound.

use std::sync::OnceLock;

use log::{debug, info};

// Draw image arguments
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Copy, Clone)]
pub enum DrawImageArgs {
    /// Whole source into a destination rectangle.
    Dest { dx: f64, dy: f64, dw: f64, dh: f64 },
    /// Source region into a destination rectangle.
    Region { sx: f64, sy: f64, sw: f64, sh: f64, dx: f64, dy: f64, dw: f64, dh: f64 },
}

impl DrawImageArgs {
    pub fn dest(dx: f64, dy: f64, dw: f64, dh: f64) -> Self {
        Self::Dest { dx, dy, dw, dh }
    }

    pub fn region(src: [f64; 4], dest: [f64; 4]) -> Self {
        let [sx, sy, sw, sh] = src;
        let [dx, dy, dw, dh] = dest;
        Self::Region { sx, sy, sw, sh, dx, dy, dw, dh }
    }

    pub fn scaled(self, f: f64) -> Self {
        match self {
            Self::Dest { dx, dy, dw, dh } => Self::dest(dx * f, dy * f, dw * f, dh * f),
            Self::Region { sx, sy, sw, sh, dx, dy, dw, dh } => {
                Self::region([sx * f, sy * f, sw * f, sh * f], [dx * f, dy * f, dw * f, dh * f])
            }
        }
    }

    /// Source and destination rectangles, the source defaulting to the whole
    /// `w` x `h` image.
    pub fn resolve(self, w: u32, h: u32) -> ([f64; 4], [f64; 4]) {
        match self {
            Self::Dest { dx, dy, dw, dh } => ([0.0, 0.0, w as f64, h as f64], [dx, dy, dw, dh]),
            Self::Region { sx, sy, sw, sh, dx, dy, dw, dh } => ([sx, sy, sw, sh], [dx, dy, dw, dh]),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum SourceKind {
    /// Live pixel surface.
    Surface,
    /// Decoded static image.
    Image,
}

// Patch
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Copy, Clone)]
pub struct DrawImagePatch {
    factor: f64,
}

impl DrawImagePatch {
    pub fn new(device_pixel_ratio: f64) -> Self {
        let factor = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            1.0 / device_pixel_ratio
        } else {
            1.0
        };
        Self { factor }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Destination only calls and calls drawing a live surface get every
    /// pixel argument scaled.
    pub fn apply(&self, args: DrawImageArgs, source: SourceKind) -> DrawImageArgs {
        match (args, source) {
            (DrawImageArgs::Dest { .. }, _) | (_, SourceKind::Surface) => args.scaled(self.factor),
            _ => args,
        }
    }
}

/// Init-once holder for the patch.
pub struct PatchSlot(OnceLock<DrawImagePatch>);

impl PatchSlot {
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns whether this call installed the patch.
    pub fn install(&self, device_pixel_ratio: f64) -> bool {
        let installed = self.0.set(DrawImagePatch::new(device_pixel_ratio)).is_ok();
        if installed {
            info!("Installed draw image patch for device pixel ratio {device_pixel_ratio}");
        } else {
            debug!("Draw image patch already installed");
        }
        installed
    }

    pub fn get(&self) -> Option<&DrawImagePatch> {
        self.0.get()
    }
}

impl Default for PatchSlot {
    fn default() -> Self {
        Self::new()
    }
}

static DRAW_IMAGE_PATCH: PatchSlot = PatchSlot::new();

pub fn install_draw_image_patch(device_pixel_ratio: f64) -> bool {
    DRAW_IMAGE_PATCH.install(device_pixel_ratio)
}

pub fn draw_image_patch() -> Option<&'static DrawImagePatch> {
    DRAW_IMAGE_PATCH.get()
}

pub mod compat;
pub mod markup;
pub mod raster;
pub mod surface;
pub mod vector;

use log::debug;

pub use compat::{install_draw_image_patch, DrawImageArgs};
pub use markup::MarkupBackend;
pub use raster::RasterBackend;
pub use surface::{ImageSource, PixelSurface, StaticImage};
pub use vector::VectorBackend;

use crate::{
    common::{Palette, Symbol},
    host::Host,
};

/// Drawing strategy bound to one surface technology.
pub trait RenderBackend {
    /// Replaces whatever was painted before with `symbol`.
    fn paint(&mut self, symbol: &dyn Symbol);

    /// Swaps the live surface for a static image when the host supports it.
    /// No-op unless painted, and for backends without a pixel surface.
    fn export_image(&self);

    fn clear(&mut self);

    fn is_painted(&self) -> bool;
}

// Backend selection
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum BackendKind {
    Raster,
    Vector,
    Markup,
}

pub fn select(vector_requested: bool, host_supports_raster: bool) -> BackendKind {
    if vector_requested {
        BackendKind::Vector
    } else if host_supports_raster {
        BackendKind::Raster
    } else {
        BackendKind::Markup
    }
}


// Backend
//------------------------------------------------------------------------------

pub enum Backend {
    Raster(RasterBackend),
    Vector(VectorBackend),
    Markup(MarkupBackend),
}

impl Backend {
    pub fn new(kind: BackendKind, w: u32, h: u32, palette: Palette, host: &Host) -> Self {
        debug!("Using {kind:?} backend at {w}x{h}");
        match kind {
            BackendKind::Raster => Self::Raster(RasterBackend::new(w, h, palette, host)),
            BackendKind::Vector => Self::Vector(VectorBackend::new(palette)),
            BackendKind::Markup => Self::Markup(MarkupBackend::new(w, h, palette)),
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Raster(_) => BackendKind::Raster,
            Self::Vector(_) => BackendKind::Vector,
            Self::Markup(_) => BackendKind::Markup,
        }
    }

    pub fn as_raster(&self) -> Option<&RasterBackend> {
        match self {
            Self::Raster(be) => Some(be),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&VectorBackend> {
        match self {
            Self::Vector(be) => Some(be),
            _ => None,
        }
    }

    pub fn as_markup(&self) -> Option<&MarkupBackend> {
        match self {
            Self::Markup(be) => Some(be),
            _ => None,
        }
    }

    fn inner(&self) -> &dyn RenderBackend {
        match self {
            Self::Raster(be) => be,
            Self::Vector(be) => be,
            Self::Markup(be) => be,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn RenderBackend {
        match self {
            Self::Raster(be) => be,
            Self::Vector(be) => be,
            Self::Markup(be) => be,
        }
    }
}

impl RenderBackend for Backend {
    fn paint(&mut self, symbol: &dyn Symbol) {
        self.inner_mut().paint(symbol)
    }

    fn export_image(&self) {
        self.inner().export_image()
    }

    fn clear(&mut self) {
        self.inner_mut().clear()
    }

    fn is_painted(&self) -> bool {
        self.inner().is_painted()
    }
}

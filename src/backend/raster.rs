use std::{cell::RefCell, rc::Rc};

use log::{debug, warn};

use super::{
    compat::{install_draw_image_patch, DrawImageArgs},
    surface::{ImageSource, PixelSurface, StaticImage},
    RenderBackend,
};
use crate::{
    common::{Palette, RenderResult, Symbol},
    host::{CapabilityGate, Host},
};

pub const STATIC_IMAGE_ALT: &str = "Scan me!";

struct RasterState {
    surface: PixelSurface,
    image: StaticImage,
    painted: bool,
    // Bumped on every clear, export continuations of older paints are dropped
    generation: u64,
}

impl RasterState {
    fn clear(&mut self) {
        let (w, h) = (self.surface.width() as f64, self.surface.height() as f64);
        self.surface.clear_rect(0.0, 0.0, w, h);
        self.painted = false;
        self.generation += 1;
    }

    fn apply_export(&mut self, generation: u64) {
        if !self.painted || self.generation != generation {
            debug!("Discarding stale static image export");
            return;
        }

        match self.surface.to_data_url() {
            Ok(url) => {
                self.image.set_src(url);
                self.image.show();
                self.surface.hide();
            }
            Err(e) => warn!("Static image export failed, keeping live surface: {e}"),
        }
    }
}

// Raster backend
//------------------------------------------------------------------------------

/// Paints symbols onto a pixel surface and, when the host supports it,
/// swaps the surface for a static PNG snapshot.
pub struct RasterBackend {
    state: Rc<RefCell<RasterState>>,
    palette: Palette,
    gate: CapabilityGate,
    quirk: Option<f32>,
    w: u32,
    h: u32,
}

impl RasterBackend {
    pub fn new(w: u32, h: u32, palette: Palette, host: &Host) -> Self {
        let quirk = host.platform().draw_image_quirk();
        if quirk.is_some() {
            install_draw_image_patch(host.device_pixel_ratio());
        }

        let state = RasterState {
            surface: PixelSurface::new(w, h),
            image: StaticImage::new(STATIC_IMAGE_ALT),
            painted: false,
            generation: 0,
        };

        Self { state: Rc::new(RefCell::new(state)), palette, gate: host.gate().clone(), quirk, w, h }
    }

    pub fn quirk(&self) -> Option<f32> {
        self.quirk
    }

    /// Snapshot of the live surface. Detached from the backend, so holding it
    /// across the event loop or an export is fine.
    pub fn surface(&self) -> PixelSurface {
        self.state.borrow().surface.clone()
    }

    /// Snapshot of the static image element.
    pub fn image(&self) -> StaticImage {
        self.state.borrow().image.clone()
    }

    /// Composites whatever is currently shown, static image or live surface,
    /// onto a fresh surface.
    pub fn present(&self) -> RenderResult<PixelSurface> {
        let state = self.state.borrow();
        let mut screen = PixelSurface::new(self.w, self.h);
        let dest = DrawImageArgs::dest(0.0, 0.0, self.w as f64, self.h as f64);

        if state.image.is_visible() {
            if let Some(img) = state.image.decode()? {
                screen.draw_image(ImageSource::Image(&img), dest);
            }
        } else if state.surface.is_visible() {
            screen.draw_image(ImageSource::Surface(&state.surface), dest);
        }
        Ok(screen)
    }
}

impl RenderBackend for RasterBackend {
    fn paint(&mut self, symbol: &dyn Symbol) {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        state.image.hide();
        state.surface.show();
        state.clear();

        let n = symbol.module_count();
        let cell_w = self.w as f64 / n as f64;
        let cell_h = self.h as f64 / n as f64;
        let (rounded_w, rounded_h) = (cell_w.round(), cell_h.round());
        debug!("Painting {n}x{n} modules at {cell_w:.3}x{cell_h:.3}px");

        for r in 0..n {
            for c in 0..n {
                let clr = self.palette.select(symbol.is_dark(r, c)).rgba();
                let left = c as f64 * cell_w;
                let top = r as f64 * cell_h;
                state.surface.fill_rect(left, top, cell_w, cell_h, clr);

                // Half pixel offset outlines snap the seams between non
                // integer cells to whole pixels
                let (x, y) = (left.floor() + 0.5, top.floor() + 0.5);
                state.surface.stroke_rect(x, y, rounded_w, rounded_h, 1.0, clr);
                let (x, y) = (left.ceil() - 0.5, top.ceil() - 0.5);
                state.surface.stroke_rect(x, y, rounded_w, rounded_h, 1.0, clr);
            }
        }

        state.painted = true;
    }

    fn export_image(&self) {
        let generation = {
            let state = self.state.borrow();
            if !state.painted {
                return;
            }
            state.generation
        };

        let state = Rc::downgrade(&self.state);
        self.gate.probe(
            move || {
                if let Some(state) = state.upgrade() {
                    state.borrow_mut().apply_export(generation);
                }
            },
            || debug!("Static image export unsupported, keeping live surface"),
        );
    }

    fn clear(&mut self) {
        self.state.borrow_mut().clear();
    }

    fn is_painted(&self) -> bool {
        self.state.borrow().painted
    }
}

#[cfg(test)]
mod raster_backend_tests {
    use image::Rgba;

    use super::RasterBackend;
    use crate::{
        backend::RenderBackend,
        common::{ModuleGrid, Palette},
        host::{Capability, Host},
    };

    const DARK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const LIGHT: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn backend(host: &Host, w: u32, h: u32) -> RasterBackend {
        RasterBackend::new(w, h, Palette::new("#000000", "#ffffff").unwrap(), host)
    }

    fn corner_symbol() -> ModuleGrid {
        let mut grid = ModuleGrid::new(21);
        grid.set(0, 0, true);
        grid
    }

    #[test]
    fn test_single_dark_module() {
        let host = Host::headless();
        let mut be = backend(&host, 256, 256);
        be.paint(&corner_symbol());
        assert!(be.is_painted());

        // 256 / 21 = 12.19, the seam snaps to the 12th pixel
        let surface = be.surface();
        for (x, y, p) in surface.pixels().enumerate_pixels() {
            let exp = if x < 12 && y < 12 { DARK } else { LIGHT };
            assert_eq!(*p, exp, "pixel ({x}, {y})");
        }
    }

    #[test]
    fn test_non_square_surface() {
        let host = Host::headless();
        let mut be = backend(&host, 100, 50);
        be.paint(&ModuleGrid::from_fn(5, |r, c| (r + c) % 2 == 0));

        let surface = be.surface();
        for r in 0..5 {
            for c in 0..5 {
                let exp = if (r + c) % 2 == 0 { DARK } else { LIGHT };
                assert_eq!(surface.pixel(c * 20 + 10, r * 10 + 5), exp);
            }
        }
    }

    #[test]
    fn test_clear() {
        let host = Host::headless();
        let mut be = backend(&host, 64, 64);
        be.paint(&corner_symbol());
        be.clear();
        assert!(!be.is_painted());
        assert!(be.surface().pixels().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_export_unpainted_is_noop() {
        let host = Host::headless();
        let be = backend(&host, 64, 64);
        be.export_image();
        assert_eq!(host.events().pending(), 0);
        assert_eq!(host.gate().capability(), Capability::Unknown);
        assert!(be.surface().is_visible());
        assert!(!be.image().is_visible());
    }

    #[test]
    fn test_export_supported() {
        let host = Host::headless();
        let mut be = backend(&host, 42, 42);
        be.paint(&corner_symbol());
        be.export_image();
        assert!(be.surface().is_visible());

        host.events().run_until_idle();
        assert!(!be.surface().is_visible());
        assert!(be.image().is_visible());
        assert_eq!(be.image().alt(), "Scan me!");
        let img = be.image().decode().unwrap().unwrap();
        assert_eq!(&img, be.surface().pixels());
        assert_eq!(be.present().unwrap().pixels(), be.surface().pixels());
    }

    #[test]
    fn test_export_unsupported() {
        let host = Host::builder().data_urls(false).build();
        let mut be = backend(&host, 42, 42);
        be.paint(&corner_symbol());
        be.export_image();
        host.events().run_until_idle();

        assert!(be.surface().is_visible());
        assert!(!be.image().is_visible());
        assert_eq!(be.image().src(), None);
        assert_eq!(host.gate().capability(), Capability::Unsupported);
    }

    #[test]
    fn test_stale_export_discarded() {
        let host = Host::headless();
        let mut be = backend(&host, 42, 42);
        be.paint(&corner_symbol());
        be.export_image();
        be.clear();
        host.events().run_until_idle();

        assert!(be.surface().is_visible());
        assert!(!be.image().is_visible());
        assert_eq!(be.image().src(), None);
    }

    #[test]
    fn test_repaint_shows_live_surface() {
        let host = Host::headless();
        let mut be = backend(&host, 42, 42);
        be.paint(&corner_symbol());
        be.export_image();
        host.events().run_until_idle();
        assert!(be.image().is_visible());

        be.paint(&ModuleGrid::new(21));
        assert!(be.surface().is_visible());
        assert!(!be.image().is_visible());

        // Capability is cached, so the export now applies synchronously
        be.export_image();
        assert_eq!(host.events().pending(), 0);
        assert!(be.image().is_visible());
        assert!(!be.surface().is_visible());
    }

    #[test]
    fn test_dropped_backend() {
        let host = Host::headless();
        let mut be = backend(&host, 42, 42);
        be.paint(&corner_symbol());
        be.export_image();
        drop(be);
        host.events().run_until_idle();
        assert_eq!(host.gate().capability(), Capability::Supported);
    }

    #[test]
    fn test_snapshots_outlive_export() {
        let host = Host::headless();
        let mut be = backend(&host, 42, 42);
        be.paint(&corner_symbol());
        be.export_image();

        let surface = be.surface();
        let image = be.image();
        host.events().run_until_idle();
        assert!(surface.is_visible());
        assert!(!image.is_visible());
        assert!(be.image().is_visible());

        // Resolved capability, the continuation runs synchronously
        be.paint(&ModuleGrid::new(21));
        let image = be.image();
        be.export_image();
        assert!(!image.is_visible());
        assert!(be.image().is_visible());
        assert!(!be.surface().is_visible());
    }

    #[test]
    fn test_no_quirk_on_headless_host() {
        let host = Host::headless();
        assert_eq!(backend(&host, 8, 8).quirk(), None);
    }
}

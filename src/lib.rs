//! # qrpaint
//!
//! Renders finished QR symbols into a host document. The encoder is pluggable,
//! qrpaint only needs the module grid it produces, and takes care of drawing it
//! crisply on whatever surface the host offers.
//!
//! ## Features
//!
//! - **Raster backend**: Paints modules on an RGBA pixel surface with seam
//!   correction for module sizes that are not whole pixels
//! - **Static image export**: Swaps the live surface for a PNG data URL image once
//!   the host is known to support it, probed asynchronously exactly once per host
//! - **Vector & markup backends**: SVG when asked for, an HTML table when the host
//!   has no pixel context
//! - **Platform quirks**: Detects hosts with a broken image drawing primitive and
//!   patches it once per process
//!
//! ## Quick Start
//!
//! ```rust
//! use qrpaint::{ECLevel, Host, ModuleGrid, MountPoint, QRRenderer, RenderOptions, RenderResult};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Stand-in encoder, any `Fn(&str, ECLevel) -> RenderResult<impl Symbol>` works
//! let encoder = |text: &str, _ecl: ECLevel| -> RenderResult<ModuleGrid> {
//!     Ok(ModuleGrid::from_fn(21, |r, c| (r * c + text.len()) % 3 == 0))
//! };
//!
//! let host = Host::headless();
//! let mut opts = RenderOptions::new();
//! opts.width(128).height(128).color_dark("#1a1a1a");
//!
//! let mut qr = QRRenderer::new(&host, MountPoint::new("qrcode"), encoder, opts)?;
//! qr.render("https://example.com")?;
//! assert_eq!(qr.mount().label(), Some("https://example.com"));
//!
//! // The data url capability probe settles on the host event loop
//! host.events().run_until_idle();
//! let raster = qr.backend().as_raster().unwrap();
//! assert!(raster.image().is_visible());
//! assert!(!raster.surface().is_visible());
//! # Ok(())
//! # }
//! ```
//!
//! ## Backend Selection
//!
//! - **Vector**: only when `use_vector_backend` is set
//! - **Raster**: whenever the host has a 2D pixel context
//! - **Markup**: otherwise

pub mod backend;
pub(crate) mod common;
pub mod host;
pub mod renderer;

pub use backend::{Backend, BackendKind, PixelSurface, RenderBackend, StaticImage};
pub use common::data_url::{decode_data_url, encode_data_url};
pub use common::error::{RenderError, RenderResult};
pub use common::metadata::{Color, ECLevel, Palette};
pub use common::symbol::{Encoder, ModuleGrid, Symbol};
pub use host::{Host, MountPoint, Platform};
pub use renderer::{QRRenderer, RenderOptions};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    backend::{self, Backend, RenderBackend},
    common::{ECLevel, Encoder, Palette, RenderError, RenderResult},
    host::{Host, MountPoint, Platform},
    PixelSurface,
};

// Options
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub color_dark: String,
    pub color_light: String,
    #[serde(alias = "correctLevel")]
    pub ec_level: ECLevel,
    #[serde(alias = "useSVG")]
    pub use_vector_backend: bool,
    pub text: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            color_dark: "#000000".to_string(),
            color_light: "#ffffff".to_string(),
            ec_level: ECLevel::H,
            use_vector_backend: false,
            text: None,
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(&mut self, width: u32) -> &mut Self {
        self.width = width;
        self
    }

    pub fn height(&mut self, height: u32) -> &mut Self {
        self.height = height;
        self
    }

    pub fn color_dark(&mut self, color: &str) -> &mut Self {
        self.color_dark = color.to_string();
        self
    }

    pub fn color_light(&mut self, color: &str) -> &mut Self {
        self.color_light = color.to_string();
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn use_vector_backend(&mut self, vector: bool) -> &mut Self {
        self.use_vector_backend = vector;
        self
    }

    pub fn text(&mut self, text: &str) -> &mut Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn validate(&self) -> RenderResult<Palette> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidDimensions { width: self.width, height: self.height });
        }
        Palette::new(&self.color_dark, &self.color_light)
    }
}

impl From<&str> for RenderOptions {
    fn from(text: &str) -> Self {
        Self { text: Some(text.to_string()), ..Self::default() }
    }
}

#[cfg(test)]
mod render_options_tests {
    use super::RenderOptions;
    use crate::common::{ECLevel, RenderError};

    #[test]
    fn test_defaults() {
        let opts = RenderOptions::default();
        assert_eq!((opts.width, opts.height), (256, 256));
        assert_eq!(opts.color_dark, "#000000");
        assert_eq!(opts.color_light, "#ffffff");
        assert_eq!(opts.ec_level, ECLevel::H);
        assert!(!opts.use_vector_backend);
        assert_eq!(opts.text, None);
    }

    #[test]
    fn test_setters() {
        let mut opts = RenderOptions::new();
        opts.width(128).height(64).color_dark("#123").ec_level(ECLevel::L).text("hi");
        assert_eq!((opts.width, opts.height), (128, 64));
        assert_eq!(opts.color_dark, "#123");
        assert_eq!(opts.ec_level, ECLevel::L);
        assert_eq!(opts.text.as_deref(), Some("hi"));
        assert_eq!(RenderOptions::from("hi").text.as_deref(), Some("hi"));
    }

    #[test]
    fn test_deserialize_partial() {
        let json = r##"{ "width": 128, "colorDark": "#ff0000", "correctLevel": "M", "useSVG": true }"##;
        let opts: RenderOptions = serde_json::from_str(json).unwrap();
        assert_eq!(opts.width, 128);
        assert_eq!(opts.height, 256);
        assert_eq!(opts.color_dark, "#ff0000");
        assert_eq!(opts.color_light, "#ffffff");
        assert_eq!(opts.ec_level, ECLevel::M);
        assert!(opts.use_vector_backend);
    }

    #[test]
    fn test_validate() {
        assert!(RenderOptions::default().validate().is_ok());
        let err = RenderOptions::new().width(0).validate().unwrap_err();
        assert!(matches!(err, RenderError::InvalidDimensions { width: 0, height: 256 }));
        let err = RenderOptions::new().color_light("#ff").validate().unwrap_err();
        assert!(matches!(err, RenderError::InvalidColor(_)));
    }
}

// Renderer
//------------------------------------------------------------------------------

/// Renders texts as QR codes into a mount point, using the backend the host
/// and options call for.
pub struct QRRenderer<E: Encoder> {
    encoder: E,
    mount: MountPoint,
    options: RenderOptions,
    platform: Platform,
    backend: Backend,
}

impl<E: Encoder> QRRenderer<E> {
    pub fn new(host: &Host, mount: MountPoint, encoder: E, options: RenderOptions) -> RenderResult<Self> {
        let palette = options.validate()?;
        let kind = backend::select(options.use_vector_backend, host.supports_raster());
        let backend = Backend::new(kind, options.width, options.height, palette, host);

        let mut renderer = Self { encoder, mount, options, platform: host.platform(), backend };
        if let Some(text) = renderer.options.text.clone() {
            renderer.render(&text)?;
        }
        Ok(renderer)
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn mount(&self) -> &MountPoint {
        &self.mount
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn is_painted(&self) -> bool {
        self.backend.is_painted()
    }

    /// Encodes `text` and paints it, replacing the previous symbol. Encoder
    /// errors are returned as is and leave the current painting untouched.
    pub fn render(&mut self, text: &str) -> RenderResult<()> {
        let symbol = self.encoder.build(text, self.options.ec_level)?;
        self.mount.set_label(text);
        self.backend.paint(&symbol);
        self.export_image();
        Ok(())
    }

    /// Requests the static image swap. Skipped on platform versions known to
    /// be unable to present data URL images.
    pub fn export_image(&self) {
        if !self.platform.supports_image_export() {
            debug!("Skipping static image export on {:?}", self.platform);
            return;
        }
        self.backend.export_image();
    }

    pub fn clear(&mut self) {
        self.backend.clear();
    }

    /// What the mount point currently shows, for raster backends.
    pub fn screenshot(&self) -> RenderResult<Option<PixelSurface>> {
        self.backend.as_raster().map(|be| be.present()).transpose()
    }
}

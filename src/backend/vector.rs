use html_escape::encode_double_quoted_attribute as attr;

use super::RenderBackend;
use crate::common::{Palette, Symbol};

// Vector backend
//------------------------------------------------------------------------------

/// Paints symbols as an SVG document scaled to its container. Every dark
/// module reuses one templated unit rectangle.
pub struct VectorBackend {
    palette: Palette,
    svg: Option<String>,
}

impl VectorBackend {
    pub fn new(palette: Palette) -> Self {
        Self { palette, svg: None }
    }

    pub fn svg(&self) -> Option<&str> {
        self.svg.as_deref()
    }
}

impl RenderBackend for VectorBackend {
    fn paint(&mut self, symbol: &dyn Symbol) {
        self.clear();

        let n = symbol.module_count();
        let dark = attr(self.palette.dark.as_str());
        let light = attr(self.palette.light.as_str());

        let mut svg = format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" viewBox="0 0 {n} {n}" width="100%" height="100%" fill="{light}">"##
        );
        svg.push_str(&format!(r##"<rect fill="{light}" width="100%" height="100%"/>"##));
        svg.push_str(&format!(r##"<rect fill="{dark}" width="1" height="1" id="template"/>"##));
        for r in 0..n {
            for c in 0..n {
                if symbol.is_dark(r, c) {
                    svg.push_str(&format!(r##"<use x="{c}" y="{r}" xlink:href="#template"/>"##));
                }
            }
        }
        svg.push_str("</svg>");

        self.svg = Some(svg);
    }

    fn export_image(&self) {}

    fn clear(&mut self) {
        self.svg = None;
    }

    fn is_painted(&self) -> bool {
        self.svg.is_some()
    }
}

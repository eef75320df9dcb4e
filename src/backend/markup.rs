use html_escape::encode_double_quoted_attribute as attr;

use super::RenderBackend;
use crate::common::{Palette, Symbol};

const RESET: &str = "border:0;border-collapse:collapse;";

// Markup backend
//------------------------------------------------------------------------------

/// Fallback for hosts without a pixel context: one table cell per module,
/// whole pixel cells, centred in the requested box.
pub struct MarkupBackend {
    palette: Palette,
    w: u32,
    h: u32,
    html: Option<String>,
}

impl MarkupBackend {
    pub fn new(w: u32, h: u32, palette: Palette) -> Self {
        Self { palette, w, h, html: None }
    }

    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }
}

impl RenderBackend for MarkupBackend {
    fn paint(&mut self, symbol: &dyn Symbol) {
        self.clear();

        let n = symbol.module_count();
        let (w, h) = (self.w as usize, self.h as usize);
        // Empty symbols produce an empty table
        let cell_w = w.checked_div(n).unwrap_or(0);
        let cell_h = h.checked_div(n).unwrap_or(0);

        let margin_left = (w - cell_w * n) as f64 / 2.0;
        let margin_top = (h - cell_h * n) as f64 / 2.0;
        let margin = if margin_left > 0.0 && margin_top > 0.0 {
            format!("margin:{margin_top}px {margin_left}px;")
        } else {
            String::new()
        };

        let mut html = format!(r#"<table style="{RESET}{margin}">"#);
        for r in 0..n {
            html.push_str("<tr>");
            for c in 0..n {
                let clr = attr(self.palette.select(symbol.is_dark(r, c)).as_str());
                html.push_str(&format!(
                    r#"<td style="{RESET}padding:0;margin:0;width:{cell_w}px;height:{cell_h}px;background-color:{clr};"></td>"#
                ));
            }
            html.push_str("</tr>");
        }
        html.push_str("</table>");

        self.html = Some(html);
    }

    fn export_image(&self) {}

    fn clear(&mut self) {
        self.html = None;
    }

    fn is_painted(&self) -> bool {
        self.html.is_some()
    }
}

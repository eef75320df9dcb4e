use std::io::Cursor;

use image::{
    imageops::{self, FilterType},
    ImageFormat, Rgba, RgbaImage,
};
use imageproc::{drawing::draw_filled_rect_mut, rect::Rect};

use super::compat::{draw_image_patch, DrawImageArgs, SourceKind};
use crate::common::{decode_data_url, encode_data_url, RenderResult};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

// Pixel surface
//------------------------------------------------------------------------------

/// RGBA drawing surface with real valued rectangle primitives. Partially
/// covered pixels are blended by their covered area, like a 2D canvas
/// context does.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelSurface {
    buf: RgbaImage,
    visible: bool,
}

pub enum ImageSource<'a> {
    Surface(&'a PixelSurface),
    Image(&'a RgbaImage),
}

impl ImageSource<'_> {
    fn kind(&self) -> SourceKind {
        match self {
            Self::Surface(_) => SourceKind::Surface,
            Self::Image(_) => SourceKind::Image,
        }
    }

    fn pixels(&self) -> &RgbaImage {
        match self {
            Self::Surface(s) => &s.buf,
            Self::Image(img) => img,
        }
    }
}

impl PixelSurface {
    pub fn new(w: u32, h: u32) -> Self {
        Self { buf: RgbaImage::from_pixel(w, h, TRANSPARENT), visible: true }
    }

    pub fn width(&self) -> u32 {
        self.buf.width()
    }

    pub fn height(&self) -> u32 {
        self.buf.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.buf
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.buf.get_pixel(x, y)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba<u8>) {
        if ![x, y, w, h].iter().all(|v| v.is_finite()) {
            return;
        }
        let (x0, x1) = span(x, w, self.buf.width());
        let (y0, y1) = span(y, h, self.buf.height());
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        for py in y0.floor() as u32..y1.ceil() as u32 {
            let cov_y = y1.min(py as f64 + 1.0) - y0.max(py as f64);
            for px in x0.floor() as u32..x1.ceil() as u32 {
                let cov_x = x1.min(px as f64 + 1.0) - x0.max(px as f64);
                let pixel = self.buf.get_pixel_mut(px, py);
                *pixel = blend(*pixel, color, (cov_x * cov_y) as f32);
            }
        }
    }

    /// Strokes the outline of a rectangle with a band of `line_width` centred
    /// on it.
    pub fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, line_width: f64, color: Rgba<u8>) {
        let (x, w) = if w < 0.0 { (x + w, -w) } else { (x, w) };
        let (y, h) = if h < 0.0 { (y + h, -h) } else { (y, h) };
        let half = line_width / 2.0;

        // Horizontal bands own the corners
        self.fill_rect(x - half, y - half, w + line_width, line_width, color);
        self.fill_rect(x - half, y + h - half, w + line_width, line_width, color);
        if h > line_width {
            self.fill_rect(x - half, y + half, line_width, h - line_width, color);
            self.fill_rect(x + w - half, y + half, line_width, h - line_width, color);
        }
    }

    /// Resets every pixel touched by the rectangle to transparent.
    pub fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        if ![x, y, w, h].iter().all(|v| v.is_finite()) {
            return;
        }
        let (x0, x1) = span(x, w, self.buf.width());
        let (y0, y1) = span(y, h, self.buf.height());
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let rect = Rect::at(x0.floor() as i32, y0.floor() as i32)
            .of_size((x1.ceil() - x0.floor()) as u32, (y1.ceil() - y0.floor()) as u32);
        draw_filled_rect_mut(&mut self.buf, rect, TRANSPARENT);
    }

    /// Draws an image, scaled with nearest neighbour sampling. Goes through the
    /// process wide draw image patch when one is installed.
    pub fn draw_image(&mut self, source: ImageSource, args: DrawImageArgs) {
        let args = match draw_image_patch() {
            Some(patch) => patch.apply(args, source.kind()),
            None => args,
        };
        self.draw_image_unpatched(source.pixels(), args);
    }

    fn draw_image_unpatched(&mut self, img: &RgbaImage, args: DrawImageArgs) {
        let ([sx, sy, sw, sh], [dx, dy, dw, dh]) = args.resolve(img.width(), img.height());
        if ![sx, sy, sw, sh, dx, dy, dw, dh].iter().all(|v| v.is_finite()) {
            return;
        }
        let (sx0, sx1) = span(sx, sw, img.width());
        let (sy0, sy1) = span(sy, sh, img.height());
        let (dw, dh) = (dw.round(), dh.round());
        if sx0 >= sx1 || sy0 >= sy1 || dw < 1.0 || dh < 1.0 {
            return;
        }

        let (left, top) = (sx0.floor() as u32, sy0.floor() as u32);
        let region = imageops::crop_imm(
            img,
            left,
            top,
            sx1.ceil() as u32 - left,
            sy1.ceil() as u32 - top,
        )
        .to_image();
        let scaled = imageops::resize(&region, dw as u32, dh as u32, FilterType::Nearest);
        imageops::overlay(&mut self.buf, &scaled, dx.round() as i64, dy.round() as i64);
    }

    pub fn to_png(&self) -> RenderResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.buf.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    pub fn to_data_url(&self) -> RenderResult<String> {
        Ok(encode_data_url("image/png", &self.to_png()?))
    }
}

// Clamped [start, end) of a possibly negative length span
fn span(start: f64, len: f64, max: u32) -> (f64, f64) {
    let (a, b) = if len < 0.0 { (start + len, start) } else { (start, start + len) };
    (a.max(0.0), b.min(max as f64))
}

// Source-over compositing of `src` covering `coverage` of the pixel
fn blend(dst: Rgba<u8>, src: Rgba<u8>, coverage: f32) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    if sa >= 1.0 {
        return src;
    }
    if sa <= 0.0 {
        return dst;
    }

    let da = dst[3] as f32 / 255.0;
    let oa = sa + da * (1.0 - sa);
    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = (src[i] as f32 * sa + dst[i] as f32 * da * (1.0 - sa)) / oa;
        out[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (oa * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba(out)
}

#[cfg(test)]
mod pixel_surface_tests {
    use image::Rgba;

    use super::{blend, ImageSource, PixelSurface, TRANSPARENT};
    use crate::{backend::compat::DrawImageArgs, common::decode_data_url};

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn count(s: &PixelSurface, clr: Rgba<u8>) -> usize {
        s.pixels().pixels().filter(|&&p| p == clr).count()
    }

    #[test]
    fn test_fill_rect_aligned() {
        let mut s = PixelSurface::new(10, 10);
        s.fill_rect(2.0, 3.0, 4.0, 2.0, RED);
        assert_eq!(count(&s, RED), 8);
        assert_eq!(s.pixel(2, 3), RED);
        assert_eq!(s.pixel(5, 4), RED);
        assert_eq!(s.pixel(6, 4), TRANSPARENT);
        assert_eq!(s.pixel(2, 5), TRANSPARENT);
    }

    #[test]
    fn test_fill_rect_partial_coverage() {
        let mut s = PixelSurface::new(4, 4);
        s.fill_rect(0.5, 0.0, 1.0, 1.0, RED);
        assert_eq!(s.pixel(0, 0), Rgba([255, 0, 0, 128]));
        assert_eq!(s.pixel(1, 0), Rgba([255, 0, 0, 128]));
        s.fill_rect(0.0, 0.0, 1.0, 1.0, BLUE);
        assert_eq!(s.pixel(0, 0), BLUE);
    }

    #[test]
    fn test_fill_rect_clipped_and_negative() {
        let mut s = PixelSurface::new(4, 4);
        s.fill_rect(-2.0, -2.0, 4.0, 4.0, RED);
        assert_eq!(count(&s, RED), 4);
        s.fill_rect(4.0, 4.0, -1.0, -1.0, BLUE);
        assert_eq!(s.pixel(3, 3), BLUE);
        s.fill_rect(f64::NAN, 0.0, 1.0, 1.0, BLUE);
        assert_eq!(count(&s, BLUE), 1);
    }

    #[test]
    fn test_stroke_rect_half_pixel() {
        let mut s = PixelSurface::new(8, 8);
        s.stroke_rect(1.5, 1.5, 4.0, 4.0, 1.0, RED);
        // Outline of [1, 6) x [1, 6) with fully covered pixels only
        assert_eq!(count(&s, RED), 16);
        assert_eq!(s.pixels().pixels().filter(|p| p[3] != 0 && **p != RED).count(), 0);
        assert_eq!(s.pixel(1, 1), RED);
        assert_eq!(s.pixel(5, 5), RED);
        assert_eq!(s.pixel(3, 3), TRANSPARENT);
        assert_eq!(s.pixel(0, 0), TRANSPARENT);
    }

    #[test]
    fn test_clear_rect() {
        let mut s = PixelSurface::new(6, 6);
        s.fill_rect(0.0, 0.0, 6.0, 6.0, RED);
        s.clear_rect(1.0, 1.0, 2.0, 2.0);
        assert_eq!(count(&s, RED), 32);
        s.clear_rect(0.0, 0.0, 6.0, 6.0);
        assert_eq!(s, PixelSurface::new(6, 6));
    }

    #[test]
    fn test_draw_image_scaled() {
        let mut src = PixelSurface::new(2, 2);
        src.fill_rect(0.0, 0.0, 1.0, 1.0, RED);

        let mut dst = PixelSurface::new(8, 8);
        dst.draw_image_unpatched(src.pixels(), DrawImageArgs::dest(2.0, 2.0, 4.0, 4.0));
        assert_eq!(count(&dst, RED), 4);
        assert_eq!(dst.pixel(2, 2), RED);
        assert_eq!(dst.pixel(3, 3), RED);
        assert_eq!(dst.pixel(4, 4), TRANSPARENT);

        let mut dst = PixelSurface::new(8, 8);
        let args = DrawImageArgs::region([0.0, 0.0, 1.0, 1.0], [0.0, 0.0, 8.0, 8.0]);
        dst.draw_image_unpatched(src.pixels(), args);
        assert_eq!(count(&dst, RED), 64);
    }

    #[test]
    fn test_draw_image_without_patch() {
        let mut src = PixelSurface::new(4, 4);
        src.fill_rect(0.0, 0.0, 4.0, 4.0, BLUE);
        let mut dst = PixelSurface::new(4, 4);
        dst.draw_image(ImageSource::Surface(&src), DrawImageArgs::dest(0.0, 0.0, 4.0, 4.0));
        assert_eq!(dst, src);
    }

    #[test]
    fn test_data_url_export() {
        let mut s = PixelSurface::new(3, 2);
        s.fill_rect(0.0, 0.0, 1.0, 2.0, RED);
        let url = s.to_data_url().unwrap();
        assert!(url.starts_with("data:image/png;base64,"));

        let bytes = decode_data_url(&url).unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(&img, s.pixels());
    }

    #[test]
    fn test_blend() {
        assert_eq!(blend(BLUE, RED, 1.0), RED);
        assert_eq!(blend(BLUE, RED, 0.0), BLUE);
        assert_eq!(blend(BLUE, Rgba([255, 0, 0, 0]), 1.0), BLUE);
        assert_eq!(blend(TRANSPARENT, RED, 0.25), Rgba([255, 0, 0, 64]));
        assert_eq!(blend(BLUE, RED, 0.5), Rgba([128, 0, 128, 255]));
    }
}

// Static image
//------------------------------------------------------------------------------

/// Element presenting an exported snapshot of a pixel surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticImage {
    alt: String,
    src: Option<String>,
    visible: bool,
}

impl StaticImage {
    pub fn new(alt: &str) -> Self {
        Self { alt: alt.to_string(), src: None, visible: false }
    }

    pub fn alt(&self) -> &str {
        &self.alt
    }

    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    pub fn set_src(&mut self, src: String) {
        self.src = Some(src);
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn decode(&self) -> RenderResult<Option<RgbaImage>> {
        let Some(src) = &self.src else {
            return Ok(None);
        };
        let bytes = decode_data_url(src)?;
        Ok(Some(image::load_from_memory(&bytes)?.to_rgba8()))
    }
}

use super::error::RenderResult;
use super::metadata::ECLevel;

// Symbol
//------------------------------------------------------------------------------

/// A finished, square module grid handed over by an encoder. Renderers only
/// read it.
pub trait Symbol {
    fn module_count(&self) -> usize;

    fn is_dark(&self, r: usize, c: usize) -> bool;
}

impl<S: Symbol + ?Sized> Symbol for &S {
    fn module_count(&self) -> usize {
        (**self).module_count()
    }

    fn is_dark(&self, r: usize, c: usize) -> bool {
        (**self).is_dark(r, c)
    }
}

// Encoder
//------------------------------------------------------------------------------

/// Builds a symbol for a text at an error correction level. Fails with
/// [`RenderError::DataTooLarge`](super::error::RenderError::DataTooLarge) when
/// no supported capacity fits the input.
pub trait Encoder {
    type Symbol: Symbol;

    fn build(&self, text: &str, ecl: ECLevel) -> RenderResult<Self::Symbol>;
}

impl<F, S> Encoder for F
where
    F: Fn(&str, ECLevel) -> RenderResult<S>,
    S: Symbol,
{
    type Symbol = S;

    fn build(&self, text: &str, ecl: ECLevel) -> RenderResult<S> {
        self(text, ecl)
    }
}

// Module grid
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGrid {
    grid: Vec<bool>,
    w: usize,
}

impl ModuleGrid {
    pub fn new(w: usize) -> Self {
        debug_assert!(w >= 1, "Grid must have at least one module");

        Self { grid: vec![false; w * w], w }
    }

    pub fn from_fn(w: usize, f: impl Fn(usize, usize) -> bool) -> Self {
        let mut res = Self::new(w);
        for r in 0..w {
            for c in 0..w {
                res.grid[r * w + c] = f(r, c);
            }
        }
        res
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&&m| m).count()
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity(self.w * (self.w + 1) + 1);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                res.push(if self.get(i, j) { '#' } else { '.' });
            }
            res.push('\n');
        }
        res
    }

    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "row should be greater than or equal to w");
        debug_assert!(-w <= c && c < w, "column should be greater than or equal to w");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r * w + c) as _
    }

    pub fn get(&self, r: i16, c: i16) -> bool {
        self.grid[self.coord_to_index(r, c)]
    }

    pub fn set(&mut self, r: i16, c: i16, dark: bool) {
        let index = self.coord_to_index(r, c);
        self.grid[index] = dark;
    }
}

impl Symbol for ModuleGrid {
    fn module_count(&self) -> usize {
        self.w
    }

    fn is_dark(&self, r: usize, c: usize) -> bool {
        self.grid[r * self.w + c]
    }
}

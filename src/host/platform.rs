use once_cell::sync::Lazy;
use regex::Regex;

// Platform
//------------------------------------------------------------------------------

static FAMILY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)android").expect("valid regex"));
static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)android ([0-9]\.[0-9])").expect("valid regex"));

/// Highest platform version whose image drawing primitive ignores the device
/// pixel ratio.
pub const DRAW_IMAGE_QUIRK_MAX_VERSION: f32 = 2.1;

/// First platform version able to present data URL images.
pub const IMAGE_EXPORT_MIN_VERSION: f32 = 3.0;

/// Host platform identity, parsed from the host's identity string.
///
/// Only the Android family carries known quirks, so everything else is
/// [`Platform::Unknown`]. A family match without a readable version token is
/// treated as quirky with unknown severity.
#[derive(Debug, PartialEq, Copy, Clone)]
pub enum Platform {
    Unknown,
    Unversioned,
    Versioned(f32),
}

impl Platform {
    pub fn detect(identity: &str) -> Self {
        if !FAMILY_RE.is_match(identity) {
            return Self::Unknown;
        }

        VERSION_RE
            .captures(identity)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f32>().ok())
            .map_or(Self::Unversioned, Self::Versioned)
    }

    pub fn is_detected(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    pub fn version(self) -> Option<f32> {
        match self {
            Self::Versioned(v) => Some(v),
            _ => None,
        }
    }

    /// Version of the platform if its image drawing primitive needs the
    /// device pixel ratio correction.
    pub fn draw_image_quirk(self) -> Option<f32> {
        self.version().filter(|&v| v <= DRAW_IMAGE_QUIRK_MAX_VERSION)
    }

    pub fn supports_image_export(self) -> bool {
        match self {
            Self::Unknown => true,
            Self::Unversioned => false,
            Self::Versioned(v) => v >= IMAGE_EXPORT_MIN_VERSION,
        }
    }
}

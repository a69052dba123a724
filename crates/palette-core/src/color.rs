//! Color model with four color-space variants and the conversions between
//! them.
//!
//! [`Color`] is a tagged sum over [`Rgb`], [`Cmyk`], [`Hsb`] and [`Lab`].
//! Every variant converts to every space; conversions are total and
//! deterministic. Cross-space conversions that have no direct formula
//! compose through RGB.
//!
//! All intermediate math runs in `f64`; integer results are rounded
//! half-to-even and clamped to the channel's legal range. LAB goes through
//! gamma-decoded sRGB and CIE XYZ under the D65 illuminant.

use crate::{PaletteError, Result};
use std::fmt;
use std::str::FromStr;

/// The four color spaces the model understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    /// 8-bit red/green/blue.
    Rgb,
    /// Cyan/magenta/yellow/black ink percentages.
    Cmyk,
    /// Hue in degrees, saturation and brightness as percentages.
    Hsb,
    /// CIE L*a*b*.
    Lab,
}

impl ColorSpace {
    /// Canonical upper-case name of the color space.
    pub fn name(&self) -> &'static str {
        match self {
            ColorSpace::Rgb => "RGB",
            ColorSpace::Cmyk => "CMYK",
            ColorSpace::Hsb => "HSB",
            ColorSpace::Lab => "LAB",
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorSpace {
    type Err = PaletteError;

    /// Case-insensitive parse of the four canonical names.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RGB" => Ok(ColorSpace::Rgb),
            "CMYK" => Ok(ColorSpace::Cmyk),
            "HSB" => Ok(ColorSpace::Hsb),
            "LAB" => Ok(ColorSpace::Lab),
            _ => Err(PaletteError::UnknownColorSpace(s.to_string())),
        }
    }
}

/// A color in RGB space, 0-255 per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

/// A color in CMYK space, 0-100 per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cmyk {
    /// Cyan percentage.
    pub c: u8,
    /// Magenta percentage.
    pub m: u8,
    /// Yellow percentage.
    pub y: u8,
    /// Black (key) percentage.
    pub k: u8,
}

/// A color in HSB (HSV) space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hsb {
    /// Hue in degrees, 0-359.
    pub h: u16,
    /// Saturation percentage, 0-100.
    pub s: u8,
    /// Brightness percentage, 0-100.
    pub b: u8,
}

/// A color in CIE L*a*b* space, quantized to one unit per component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lab {
    /// Lightness, 0-100.
    pub l: i8,
    /// Green-red axis, -128 to 127.
    pub a: i8,
    /// Blue-yellow axis, -128 to 127.
    pub b: i8,
}

// D65 reference white.
const XN: f64 = 0.95047;
const YN: f64 = 1.0;
const ZN: f64 = 1.08883;

fn round_channel(v: f64, min: f64, max: f64) -> f64 {
    v.clamp(min, max).round_ties_even()
}

fn lab_f(t: f64) -> f64 {
    if t > 0.008856 {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

fn lab_f_inv(t: f64) -> f64 {
    if t > 0.206893 {
        t * t * t
    } else {
        (t - 16.0 / 116.0) / 7.787
    }
}

// sRGB gamma decode: display value to linear light.
fn srgb_decode(c: f64) -> f64 {
    if c > 0.04045 {
        ((c + 0.055) / 1.055).powf(2.4)
    } else {
        c / 12.92
    }
}

// sRGB gamma encode: linear light to display value.
fn srgb_encode(c: f64) -> f64 {
    if c > 0.0031308 {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    } else {
        12.92 * c
    }
}

impl Rgb {
    /// Creates an RGB color. All u8 values are valid.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Creates an RGB color from floats in [0, 1], clamped and scaled.
    pub fn from_float(r: f64, g: f64, b: f64) -> Self {
        Rgb {
            r: round_channel(r.clamp(0.0, 1.0) * 255.0, 0.0, 255.0) as u8,
            g: round_channel(g.clamp(0.0, 1.0) * 255.0, 0.0, 255.0) as u8,
            b: round_channel(b.clamp(0.0, 1.0) * 255.0, 0.0, 255.0) as u8,
        }
    }

    /// Parses a `#RRGGBB` hex string. The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(PaletteError::Format(format!(
                "invalid hex color: {hex}"
            )));
        }
        let parse = |s: &str| {
            u8::from_str_radix(s, 16)
                .map_err(|_| PaletteError::Format(format!("invalid hex color: {hex}")))
        };
        Ok(Rgb {
            r: parse(&digits[0..2])?,
            g: parse(&digits[2..4])?,
            b: parse(&digits[4..6])?,
        })
    }

    /// Formats as an upper-case `#RRGGBB` string.
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Identity.
    pub fn to_rgb(self) -> Rgb {
        self
    }

    /// Converts to CMYK. Pure black maps to `CMYK(0, 0, 0, 100)`.
    pub fn to_cmyk(self) -> Cmyk {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;

        let k = 1.0 - r.max(g).max(b);
        if k == 1.0 {
            return Cmyk { c: 0, m: 0, y: 0, k: 100 };
        }

        let c = (1.0 - r - k) / (1.0 - k);
        let m = (1.0 - g - k) / (1.0 - k);
        let y = (1.0 - b - k) / (1.0 - k);

        Cmyk {
            c: round_channel(c * 100.0, 0.0, 100.0) as u8,
            m: round_channel(m * 100.0, 0.0, 100.0) as u8,
            y: round_channel(y * 100.0, 0.0, 100.0) as u8,
            k: round_channel(k * 100.0, 0.0, 100.0) as u8,
        }
    }

    /// Converts to HSB via the classical max/min/delta formulas.
    pub fn to_hsb(self) -> Hsb {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let mut h = 0.0;
        let mut s = 0.0;
        if delta != 0.0 {
            s = delta / max;
            h = if max == r {
                60.0 * (((g - b) / delta) % 6.0)
            } else if max == g {
                60.0 * ((b - r) / delta + 2.0)
            } else {
                60.0 * ((r - g) / delta + 4.0)
            };
            if h < 0.0 {
                h += 360.0;
            }
        }

        Hsb {
            h: (h.round_ties_even() as u16) % 360,
            s: round_channel(s * 100.0, 0.0, 100.0) as u8,
            b: round_channel(max * 100.0, 0.0, 100.0) as u8,
        }
    }

    /// Converts to L*a*b* through gamma-decoded sRGB and XYZ under D65.
    pub fn to_lab(self) -> Lab {
        let r = srgb_decode(f64::from(self.r) / 255.0);
        let g = srgb_decode(f64::from(self.g) / 255.0);
        let b = srgb_decode(f64::from(self.b) / 255.0);

        let x = r * 0.4124564 + g * 0.3575761 + b * 0.1804375;
        let y = r * 0.2126729 + g * 0.7151522 + b * 0.0721750;
        let z = r * 0.0193339 + g * 0.1191920 + b * 0.9503041;

        let fx = lab_f(x / XN);
        let fy = lab_f(y / YN);
        let fz = lab_f(z / ZN);

        let l = 116.0 * fy - 16.0;
        let a = 500.0 * (fx - fy);
        let b2 = 200.0 * (fy - fz);

        Lab {
            l: round_channel(l, 0.0, 100.0) as i8,
            a: round_channel(a, -128.0, 127.0) as i8,
            b: round_channel(b2, -128.0, 127.0) as i8,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RGB({}, {}, {})", self.r, self.g, self.b)
    }
}

impl Cmyk {
    /// Creates a CMYK color; channels are clamped to 100.
    pub fn new(c: u8, m: u8, y: u8, k: u8) -> Self {
        Cmyk {
            c: c.min(100),
            m: m.min(100),
            y: y.min(100),
            k: k.min(100),
        }
    }

    /// Converts to RGB with the standard ink-removal formula.
    pub fn to_rgb(self) -> Rgb {
        let c = f64::from(self.c) / 100.0;
        let m = f64::from(self.m) / 100.0;
        let y = f64::from(self.y) / 100.0;
        let k = f64::from(self.k) / 100.0;

        Rgb {
            r: round_channel(255.0 * (1.0 - c) * (1.0 - k), 0.0, 255.0) as u8,
            g: round_channel(255.0 * (1.0 - m) * (1.0 - k), 0.0, 255.0) as u8,
            b: round_channel(255.0 * (1.0 - y) * (1.0 - k), 0.0, 255.0) as u8,
        }
    }

    /// Identity.
    pub fn to_cmyk(self) -> Cmyk {
        self
    }

    /// Converts through RGB.
    pub fn to_hsb(self) -> Hsb {
        self.to_rgb().to_hsb()
    }

    /// Converts through RGB.
    pub fn to_lab(self) -> Lab {
        self.to_rgb().to_lab()
    }
}

impl fmt::Display for Cmyk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CMYK({}%, {}%, {}%, {}%)",
            self.c, self.m, self.y, self.k
        )
    }
}

impl Hsb {
    /// Creates an HSB color; hue is taken modulo 360, the percentages are
    /// clamped to 100.
    pub fn new(h: u16, s: u8, b: u8) -> Self {
        Hsb {
            h: h % 360,
            s: s.min(100),
            b: b.min(100),
        }
    }

    /// Converts to RGB via six-segment hue reconstruction.
    pub fn to_rgb(self) -> Rgb {
        let h = f64::from(self.h);
        let s = f64::from(self.s) / 100.0;
        let v = f64::from(self.b) / 100.0;

        let chroma = v * s;
        let x = chroma * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = v - chroma;

        let (r, g, b) = match h {
            h if h < 60.0 => (chroma, x, 0.0),
            h if h < 120.0 => (x, chroma, 0.0),
            h if h < 180.0 => (0.0, chroma, x),
            h if h < 240.0 => (0.0, x, chroma),
            h if h < 300.0 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };

        Rgb {
            r: round_channel((r + m) * 255.0, 0.0, 255.0) as u8,
            g: round_channel((g + m) * 255.0, 0.0, 255.0) as u8,
            b: round_channel((b + m) * 255.0, 0.0, 255.0) as u8,
        }
    }

    /// Converts through RGB.
    pub fn to_cmyk(self) -> Cmyk {
        self.to_rgb().to_cmyk()
    }

    /// Identity.
    pub fn to_hsb(self) -> Hsb {
        self
    }

    /// Converts through RGB.
    pub fn to_lab(self) -> Lab {
        self.to_rgb().to_lab()
    }
}

impl fmt::Display for Hsb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HSB({}\u{00b0}, {}%, {}%)", self.h, self.s, self.b)
    }
}

impl Lab {
    /// Creates a L*a*b* color; L is clamped to [0, 100], a and b may hold
    /// any i8.
    pub fn new(l: i8, a: i8, b: i8) -> Self {
        Lab {
            l: l.clamp(0, 100),
            a,
            b,
        }
    }

    /// Converts to RGB by inverting the XYZ mapping and gamma-encoding.
    pub fn to_rgb(self) -> Rgb {
        let l = f64::from(self.l);
        let a = f64::from(self.a);
        let b = f64::from(self.b);

        let fy = (l + 16.0) / 116.0;
        let fx = a / 500.0 + fy;
        let fz = fy - b / 200.0;

        let x = lab_f_inv(fx) * XN;
        let y = lab_f_inv(fy) * YN;
        let z = lab_f_inv(fz) * ZN;

        let r = srgb_encode(x * 3.2404542 + y * -1.5371385 + z * -0.4985314);
        let g = srgb_encode(x * -0.9692660 + y * 1.8760108 + z * 0.0415560);
        let b2 = srgb_encode(x * 0.0556434 + y * -0.2040259 + z * 1.0572252);

        Rgb {
            r: round_channel(r.clamp(0.0, 1.0) * 255.0, 0.0, 255.0) as u8,
            g: round_channel(g.clamp(0.0, 1.0) * 255.0, 0.0, 255.0) as u8,
            b: round_channel(b2.clamp(0.0, 1.0) * 255.0, 0.0, 255.0) as u8,
        }
    }

    /// Converts through RGB.
    pub fn to_cmyk(self) -> Cmyk {
        self.to_rgb().to_cmyk()
    }

    /// Converts through RGB.
    pub fn to_hsb(self) -> Hsb {
        self.to_rgb().to_hsb()
    }

    /// Identity.
    pub fn to_lab(self) -> Lab {
        self
    }
}

impl fmt::Display for Lab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LAB({}, {}, {})", self.l, self.a, self.b)
    }
}

/// A color in one of the four supported spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// RGB variant.
    Rgb(Rgb),
    /// CMYK variant.
    Cmyk(Cmyk),
    /// HSB variant.
    Hsb(Hsb),
    /// L*a*b* variant.
    Lab(Lab),
}

impl Color {
    /// The space this color is stored in.
    pub fn color_space(&self) -> ColorSpace {
        match self {
            Color::Rgb(_) => ColorSpace::Rgb,
            Color::Cmyk(_) => ColorSpace::Cmyk,
            Color::Hsb(_) => ColorSpace::Hsb,
            Color::Lab(_) => ColorSpace::Lab,
        }
    }

    /// Converts to RGB (identity on the RGB variant).
    pub fn to_rgb(&self) -> Rgb {
        match self {
            Color::Rgb(c) => *c,
            Color::Cmyk(c) => c.to_rgb(),
            Color::Hsb(c) => c.to_rgb(),
            Color::Lab(c) => c.to_rgb(),
        }
    }

    /// Converts to CMYK (identity on the CMYK variant).
    pub fn to_cmyk(&self) -> Cmyk {
        match self {
            Color::Rgb(c) => c.to_cmyk(),
            Color::Cmyk(c) => *c,
            Color::Hsb(c) => c.to_cmyk(),
            Color::Lab(c) => c.to_cmyk(),
        }
    }

    /// Converts to HSB (identity on the HSB variant).
    pub fn to_hsb(&self) -> Hsb {
        match self {
            Color::Rgb(c) => c.to_hsb(),
            Color::Cmyk(c) => c.to_hsb(),
            Color::Hsb(c) => *c,
            Color::Lab(c) => c.to_hsb(),
        }
    }

    /// Converts to L*a*b* (identity on the LAB variant).
    pub fn to_lab(&self) -> Lab {
        match self {
            Color::Rgb(c) => c.to_lab(),
            Color::Cmyk(c) => c.to_lab(),
            Color::Hsb(c) => c.to_lab(),
            Color::Lab(c) => *c,
        }
    }

    /// Converts to the given space, returning the wrapped variant.
    pub fn converted_to(&self, space: ColorSpace) -> Color {
        match space {
            ColorSpace::Rgb => Color::Rgb(self.to_rgb()),
            ColorSpace::Cmyk => Color::Cmyk(self.to_cmyk()),
            ColorSpace::Hsb => Color::Hsb(self.to_hsb()),
            ColorSpace::Lab => Color::Lab(self.to_lab()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Rgb(c) => c.fmt(f),
            Color::Cmyk(c) => c.fmt(f),
            Color::Hsb(c) => c.fmt(f),
            Color::Lab(c) => c.fmt(f),
        }
    }
}

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Color::Rgb(c)
    }
}

impl From<Cmyk> for Color {
    fn from(c: Cmyk) -> Self {
        Color::Cmyk(c)
    }
}

impl From<Hsb> for Color {
    fn from(c: Hsb) -> Self {
        Color::Hsb(c)
    }
}

impl From<Lab> for Color {
    fn from(c: Lab) -> Self {
        Color::Lab(c)
    }
}

//! Hex parsing and HSL shading.

use crate::types::Rgb;

/// Hue in degrees `[0, 360)`, saturation and lightness in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Relative HSL change applied by [`adjust`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HslDelta {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Highlight used for the top and right bevel of a block.
pub const SHADE_TOP_RIGHT: HslDelta = HslDelta {
    h: 10.0,
    s: 0.10,
    l: 0.18,
};

/// Shadow used for the bottom and left bevel of a block.
pub const SHADE_BOTTOM_LEFT: HslDelta = HslDelta {
    h: -12.0,
    s: 0.05,
    l: -0.22,
};

/// Parse `#rgb` / `#rrggbb` (the `#` is optional).
///
/// Returns `None` for anything else, including non-hex digits.
pub fn parse_hex(input: &str) -> Option<Rgb> {
    let digits = input.trim().trim_start_matches('#');
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return None,
    };
    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}

pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = rgb.r as f64 / 255.0;
    let g = rgb.g as f64 / 255.0;
    let b = rgb.b as f64 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;
    let l = (max + min) / 2.0;

    if d == 0.0 {
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let s = d / (1.0 - (2.0 * l - 1.0).abs());
    let mut h = if max == r {
        ((g - b) / d) % 6.0
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    h *= 60.0;
    if h < 0.0 {
        h += 360.0;
    }
    Hsl { h, s, l }
}

pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let Hsl { h, s, l } = hsl;
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (rp, gp, bp) = match h {
        h if (0.0..60.0).contains(&h) => (c, x, 0.0),
        h if (60.0..120.0).contains(&h) => (x, c, 0.0),
        h if (120.0..180.0).contains(&h) => (0.0, c, x),
        h if (180.0..240.0).contains(&h) => (0.0, x, c),
        h if (240.0..300.0).contains(&h) => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb::new(channel(rp), channel(gp), channel(bp))
}

/// Shift a color in HSL space. Hue wraps, saturation and lightness clamp.
pub fn adjust(rgb: Rgb, delta: HslDelta) -> Rgb {
    let hsl = rgb_to_hsl(rgb);
    hsl_to_rgb(Hsl {
        h: (hsl.h + delta.h + 360.0) % 360.0,
        s: (hsl.s + delta.s).clamp(0.0, 1.0),
        l: (hsl.l + delta.l).clamp(0.0, 1.0),
    })
}

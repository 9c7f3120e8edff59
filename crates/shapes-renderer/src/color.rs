/// 8-bit straight-alpha colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self { Self { r, g, b, a: 255 } }
}

/// Parse a fill value: a CSS-style colour name, `#rrggbb` or `#rrggbbaa`.
pub fn parse_color(s: &str) -> Option<Rgba> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    let c = match s.to_ascii_lowercase().as_str() {
        "black"   => Rgba::BLACK,
        "white"   => Rgba::rgb(255, 255, 255),
        "red"     => Rgba::rgb(255, 0, 0),
        "green"   => Rgba::rgb(0, 128, 0),
        "lime"    => Rgba::rgb(0, 255, 0),
        "blue"    => Rgba::rgb(0, 0, 255),
        "yellow"  => Rgba::rgb(255, 255, 0),
        "orange"  => Rgba::rgb(255, 165, 0),
        "purple"  => Rgba::rgb(128, 0, 128),
        "pink"    => Rgba::rgb(255, 192, 203),
        "brown"   => Rgba::rgb(165, 42, 42),
        "cyan"    => Rgba::rgb(0, 255, 255),
        "magenta" => Rgba::rgb(255, 0, 255),
        "gray" | "grey" => Rgba::rgb(128, 128, 128),
        "none" | "transparent" => Rgba { r: 0, g: 0, b: 0, a: 0 },
        _ => return None,
    };
    Some(c)
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.is_ascii() || !matches!(hex.len(), 6 | 8) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let a = if hex.len() == 8 { byte(6)? } else { 255 };
    Some(Rgba { r: byte(0)?, g: byte(2)?, b: byte(4)?, a })
}

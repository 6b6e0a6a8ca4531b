use crate::foundation::core::Rgb8;

/// Parse `#RRGGBB` (leading `#` optional, case-insensitive).
///
/// Shorthand (`#fff`) and alpha (`#RRGGBBAA`) forms are rejected.
pub fn parse_hex_rgb(s: &str) -> Option<Rgb8> {
    let s = s.strip_prefix('#').unwrap_or(s);
    if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    fn hex_byte(pair: &str) -> Option<u8> {
        u8::from_str_radix(pair, 16).ok()
    }

    Some(Rgb8::new(
        hex_byte(&s[0..2])?,
        hex_byte(&s[2..4])?,
        hex_byte(&s[4..6])?,
    ))
}

/// Like [`parse_hex_rgb`], but malformed input renders as black instead of failing.
pub(crate) fn hex_rgb_or_black(s: &str) -> Rgb8 {
    parse_hex_rgb(s).unwrap_or_else(|| {
        tracing::warn!(color = s, "unparseable layer color, using black");
        Rgb8::BLACK
    })
}

use std::{borrow::Cow, collections::HashMap};

use parley::fontique::GenericFamily;

use crate::{
    foundation::error::{WatermarkError, WatermarkResult},
    render::surface::FontSpec,
};

/// Family substituted when nothing in a requested list is installed.
pub const FALLBACK_FAMILY: &str = "sans-serif";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// One entry of a CSS-style family list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FamilyName {
    /// A concrete family such as `Noto Sans SC`.
    Named(String),
    /// A generic keyword such as `sans-serif`.
    Generic(GenericFamily),
}

/// Outcome of matching a family list against the installed fonts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontResolution {
    /// First family in the list that is available.
    Resolved(String),
    /// Nothing matched; text renders with [`FALLBACK_FAMILY`].
    Fallback,
}

/// Split a CSS `font-family` value into its entries.
///
/// Quoted entries are always concrete names; unquoted generic keywords map to
/// [`FamilyName::Generic`]. Empty entries are dropped.
pub fn parse_family_list(list: &str) -> Vec<FamilyName> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut quoted = false;

    let mut flush = |current: &mut String, quoted: &mut bool| {
        let name = current.trim();
        if !name.is_empty() {
            let entry = match (*quoted, generic_family(name)) {
                (false, Some(generic)) => FamilyName::Generic(generic),
                _ => FamilyName::Named(name.to_string()),
            };
            out.push(entry);
        }
        current.clear();
        *quoted = false;
    };

    for ch in list.chars() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(ch);
                quoted = true;
            }
            (None, ',') => flush(&mut current, &mut quoted),
            (None, c) => current.push(c),
        }
    }
    flush(&mut current, &mut quoted);
    out
}

fn generic_family(name: &str) -> Option<GenericFamily> {
    let generic = match name.to_ascii_lowercase().as_str() {
        "serif" => GenericFamily::Serif,
        "sans-serif" => GenericFamily::SansSerif,
        "monospace" => GenericFamily::Monospace,
        "cursive" => GenericFamily::Cursive,
        "fantasy" => GenericFamily::Fantasy,
        "system-ui" => GenericFamily::SystemUi,
        "emoji" => GenericFamily::Emoji,
        "math" => GenericFamily::Math,
        _ => return None,
    };
    Some(generic)
}

/// Installed fonts plus the shaping and glyph caches built on top of them.
///
/// Not `Sync`; batch rendering gives each worker its own book.
pub struct FontBook {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    resolutions: HashMap<String, FontResolution>,
    render_fonts: HashMap<(u64, u32), vello_cpu::peniko::FontData>,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl FontBook {
    /// Font book over the system font collection.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            resolutions: HashMap::new(),
            render_fonts: HashMap::new(),
        }
    }

    /// Register font file bytes (TTF/OTF/TTC). Returns the family names they provide.
    pub fn register_font(&mut self, font_bytes: Vec<u8>) -> WatermarkResult<Vec<String>> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes), None);
        if families.is_empty() {
            return Err(WatermarkError::validation(
                "no font families registered from font bytes",
            ));
        }

        let mut names = Vec::with_capacity(families.len());
        for (id, _) in families {
            let name = self
                .font_ctx
                .collection
                .family_name(id)
                .ok_or_else(|| WatermarkError::validation("registered font family has no name"))?;
            names.push(name.to_string());
        }
        self.resolutions.clear();
        tracing::debug!(?names, "registered font families");
        Ok(names)
    }

    /// Match a family list against the installed fonts. Results are cached.
    pub fn resolve(&mut self, family_list: &str) -> FontResolution {
        if let Some(hit) = self.resolutions.get(family_list) {
            return hit.clone();
        }

        let mut resolution = FontResolution::Fallback;
        for family in parse_family_list(family_list) {
            match family {
                FamilyName::Generic(_) => {
                    resolution = FontResolution::Resolved(family_list_entry(&family));
                    break;
                }
                FamilyName::Named(name) => {
                    if self.font_ctx.collection.family_by_name(&name).is_some() {
                        resolution = FontResolution::Resolved(name);
                        break;
                    }
                }
            }
        }
        if resolution == FontResolution::Fallback {
            tracing::warn!(
                family = family_list,
                fallback = FALLBACK_FAMILY,
                "no requested font family is available"
            );
        }

        self.resolutions
            .insert(family_list.to_string(), resolution.clone());
        resolution
    }

    /// Shape a single unwrapped line of text.
    pub fn layout(
        &mut self,
        text: &str,
        font: &FontSpec,
        brush: TextBrushRgba8,
    ) -> WatermarkResult<parley::Layout<TextBrushRgba8>> {
        let size_px = font.size_px as f32;
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(WatermarkError::validation(
                "font size must be finite and > 0",
            ));
        }

        let stack: Cow<'static, str> = match self.resolve(&font.family) {
            FontResolution::Resolved(_) => Cow::Owned(font.family.clone()),
            FontResolution::Fallback => Cow::Borrowed(FALLBACK_FAMILY),
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(stack),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Advance width of `text`, the widest line if it contains breaks.
    pub fn measure(&mut self, text: &str, font: &FontSpec) -> WatermarkResult<f64> {
        let layout = self.layout(text, font, TextBrushRgba8::default())?;
        let advance = layout
            .lines()
            .map(|line| line.metrics().advance)
            .fold(0.0f32, f32::max);
        Ok(f64::from(advance))
    }

    /// Rasterizer font handle for a shaped run's font, keyed by blob id and face index.
    pub(crate) fn render_font(
        &mut self,
        blob_id: u64,
        bytes: &[u8],
        index: u32,
    ) -> vello_cpu::peniko::FontData {
        self.render_fonts
            .entry((blob_id, index))
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(bytes.to_vec()),
                    index,
                )
            })
            .clone()
    }
}

fn family_list_entry(family: &FamilyName) -> String {
    match family {
        FamilyName::Named(name) => name.clone(),
        FamilyName::Generic(generic) => generic_keyword(*generic).to_string(),
    }
}

fn generic_keyword(generic: GenericFamily) -> &'static str {
    match generic {
        GenericFamily::Serif => "serif",
        GenericFamily::Monospace => "monospace",
        GenericFamily::Cursive => "cursive",
        GenericFamily::Fantasy => "fantasy",
        GenericFamily::SystemUi => "system-ui",
        GenericFamily::Emoji => "emoji",
        GenericFamily::Math => "math",
        _ => FALLBACK_FAMILY,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/fonts.rs"]
mod tests;

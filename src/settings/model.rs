use std::{marker::PhantomData, path::Path};

use anyhow::Context;
use serde::Deserialize;

use crate::foundation::error::{WatermarkError, WatermarkResult};

/// Default enhancement intensity when none is configured.
pub const DEFAULT_ENHANCE_INTENSITY: u32 = 50;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Complete watermark configuration for one image.
///
/// Settings are plain data: they can be built in code, or loaded from JSON with
/// [`WatermarkSettings::from_json_str`] / [`WatermarkSettings::from_path`]. A render never
/// mutates them.
pub struct WatermarkSettings {
    /// How the output canvas size is derived from the source size.
    pub resize_mode: ResizeMode,
    /// Target long edge for [`ResizeMode::FixedLongEdge`].
    pub resize_long_edge: u32,
    /// Target width for [`ResizeMode::Manual`]; `None` or zero keeps the native width.
    pub resize_width: Option<u32>,
    /// Target height for [`ResizeMode::Manual`]; `None` or zero keeps the native height.
    pub resize_height: Option<u32>,
    /// Apply the contrast/saturation/brightness boost to the base image.
    pub auto_enhance: bool,
    /// Enhancement strength in `[0, 100]`.
    pub enhance_intensity: Option<u32>,
    /// The primary watermark layer.
    pub main: LayerSettings,
    /// The secondary layer, optionally placed relative to `main`.
    ///
    /// Absent keys inside `sub` take [`LayerSettings::default_sub`] values.
    #[serde(deserialize_with = "deserialize_sub")]
    pub sub: LayerSettings,
}

impl Default for WatermarkSettings {
    fn default() -> Self {
        Self {
            resize_mode: ResizeMode::Original,
            resize_long_edge: 1920,
            resize_width: Some(0),
            resize_height: Some(0),
            auto_enhance: false,
            enhance_intensity: Some(DEFAULT_ENHANCE_INTENSITY),
            main: LayerSettings::default(),
            sub: LayerSettings::default_sub(),
        }
    }
}

impl WatermarkSettings {
    /// Parse settings from a JSON string. Absent keys take their defaults.
    pub fn from_json_str(json: &str) -> WatermarkResult<Self> {
        serde_json::from_str(json).map_err(|e| WatermarkError::serde(e.to_string()))
    }

    /// Read and parse a JSON settings file.
    pub fn from_path(path: impl AsRef<Path>) -> WatermarkResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read settings '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> WatermarkResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| WatermarkError::serde(e.to_string()))
    }

    /// Effective enhancement intensity, clamped to `[0, 100]`.
    pub fn enhance_intensity(&self) -> u32 {
        self.enhance_intensity
            .unwrap_or(DEFAULT_ENHANCE_INTENSITY)
            .min(100)
    }

    /// Check every field against its documented range.
    pub fn validate(&self) -> WatermarkResult<()> {
        if self.resize_mode == ResizeMode::FixedLongEdge && self.resize_long_edge == 0 {
            return Err(WatermarkError::validation(
                "resizeLongEdge must be > 0 in fixed-long-edge mode",
            ));
        }
        if let Some(i) = self.enhance_intensity
            && i > 100
        {
            return Err(WatermarkError::validation(
                "enhanceIntensity must be in [0, 100]",
            ));
        }
        self.main.validate("main")?;
        self.sub.validate("sub")?;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Output size policy.
pub enum ResizeMode {
    /// Keep the native size.
    #[default]
    Original,
    /// Scale so the longer side equals `resizeLongEdge`, preserving aspect.
    FixedLongEdge,
    /// Use `resizeWidth` x `resizeHeight` verbatim; aspect is not enforced.
    Manual,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
/// One cell of the 3x3 anchor grid.
pub enum Anchor {
    /// Top edge, left edge.
    TopLeft,
    /// Top edge, horizontally centered.
    TopCenter,
    /// Top edge, right edge.
    TopRight,
    /// Vertically centered, left edge.
    CenterLeft,
    /// Centered on both axes.
    Center,
    /// Vertically centered, right edge.
    CenterRight,
    /// Bottom edge, left edge.
    BottomLeft,
    /// Bottom edge, horizontally centered.
    BottomCenter,
    /// Bottom edge, right edge.
    BottomRight,
}

impl Anchor {
    /// All nine anchors in row-major order.
    pub const ALL: [Anchor; 9] = [
        Anchor::TopLeft,
        Anchor::TopCenter,
        Anchor::TopRight,
        Anchor::CenterLeft,
        Anchor::Center,
        Anchor::CenterRight,
        Anchor::BottomLeft,
        Anchor::BottomCenter,
        Anchor::BottomRight,
    ];

    /// Horizontal component.
    pub fn horizontal(self) -> AxisAnchor {
        match self {
            Anchor::TopLeft | Anchor::CenterLeft | Anchor::BottomLeft => AxisAnchor::Start,
            Anchor::TopCenter | Anchor::Center | Anchor::BottomCenter => AxisAnchor::Center,
            Anchor::TopRight | Anchor::CenterRight | Anchor::BottomRight => AxisAnchor::End,
        }
    }

    /// Vertical component.
    pub fn vertical(self) -> AxisAnchor {
        match self {
            Anchor::TopLeft | Anchor::TopCenter | Anchor::TopRight => AxisAnchor::Start,
            Anchor::CenterLeft | Anchor::Center | Anchor::CenterRight => AxisAnchor::Center,
            Anchor::BottomLeft | Anchor::BottomCenter | Anchor::BottomRight => AxisAnchor::End,
        }
    }
}

/// Anchor position along a single axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisAnchor {
    /// Left or top.
    Start,
    /// Centered.
    Center,
    /// Right or bottom.
    End,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Horizontal alignment of a linked layer against the main layer's box.
pub enum LinkAlignment {
    /// Share the main layer's left edge.
    #[default]
    Left,
    /// Center under the main layer.
    Center,
    /// Share the main layer's right edge.
    Right,
}

/// Anchor-grid placement with inward offsets in design pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorPlacement {
    /// Grid cell.
    pub anchor: Anchor,
    /// Inward horizontal displacement (ignored for horizontally centered anchors).
    pub offset_x: f64,
    /// Inward vertical displacement (ignored for vertically centered anchors).
    pub offset_y: f64,
}

/// Placement relative to the main layer's resolved box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkPlacement {
    /// Horizontal alignment against the main box.
    pub alignment: LinkAlignment,
    /// Vertical gap below the main box in design pixels; negative values overlap.
    pub spacing: f64,
}

/// Where a layer is drawn.
///
/// A linked placement keeps its own anchor so it can fall back when there is no main
/// box to follow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    /// Positioned on the anchor grid.
    Absolute(AnchorPlacement),
    /// Positioned below the main layer, with an anchor-grid fallback.
    Linked {
        /// Relative placement.
        link: LinkPlacement,
        /// Used when the main layer is disabled or measures empty.
        fallback: AnchorPlacement,
    },
}

impl Placement {
    /// The anchor-grid placement: the absolute one, or a linked layer's fallback.
    pub fn anchor(&self) -> &AnchorPlacement {
        match self {
            Placement::Absolute(a) => a,
            Placement::Linked { fallback, .. } => fallback,
        }
    }

    /// Relative placement, if linked.
    pub fn link(&self) -> Option<&LinkPlacement> {
        match self {
            Placement::Absolute(_) => None,
            Placement::Linked { link, .. } => Some(link),
        }
    }
}

/// Protection panel drawn behind a layer's text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackgroundSettings {
    /// Draw the panel at all.
    pub enabled: bool,
    /// Opacity of the panel's opaque middle, `[0, 1]`.
    pub opacity: f64,
    /// Fade width and shadow control, `[0, 50]` design units.
    pub blur: f64,
    /// Padding around the text box in design pixels.
    pub padding: f64,
}

/// One text watermark layer.
///
/// Size-like fields are in design pixels (authored against a 1000px long edge).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "LayerSettingsDef<MainDefaults>", into = "LayerSettingsDef<MainDefaults>")]
pub struct LayerSettings {
    /// A disabled layer contributes nothing, regardless of other fields.
    pub enabled: bool,
    /// Text to draw; any Unicode.
    pub text: String,
    /// Font size in design pixels.
    pub font_size: f64,
    /// CSS-style family list, e.g. `"'Noto Sans SC', sans-serif"`.
    pub font_family: String,
    /// `#RRGGBB` fill color.
    pub color: String,
    /// Text opacity, `[0, 1]`.
    pub opacity: f64,
    /// Background panel.
    pub background: BackgroundSettings,
    /// Placement.
    pub placement: Placement,
}

impl Default for LayerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            text: "在此输入水印".to_string(),
            font_size: 48.0,
            font_family: "'Noto Sans SC', sans-serif".to_string(),
            color: "#ffffff".to_string(),
            opacity: 0.9,
            background: BackgroundSettings {
                enabled: false,
                opacity: 0.6,
                blur: 20.0,
                padding: 15.0,
            },
            placement: Placement::Absolute(AnchorPlacement {
                anchor: Anchor::BottomRight,
                offset_x: 20.0,
                offset_y: 20.0,
            }),
        }
    }
}

impl LayerSettings {
    /// Default secondary layer: disabled, smaller, linked under the main layer.
    pub fn default_sub() -> Self {
        let base = Self::default();
        Self {
            enabled: false,
            text: "副标题 / 第二行水印".to_string(),
            font_size: 24.0,
            placement: Placement::Linked {
                link: LinkPlacement {
                    alignment: LinkAlignment::Left,
                    spacing: 10.0,
                },
                fallback: AnchorPlacement {
                    anchor: Anchor::BottomRight,
                    offset_x: 20.0,
                    offset_y: 80.0,
                },
            },
            ..base
        }
    }

    /// Whether this layer produces any output. Checked before any other field.
    pub fn is_drawable(&self) -> bool {
        self.enabled && !self.text.is_empty()
    }

    fn validate(&self, name: &str) -> WatermarkResult<()> {
        fn unit(name: &str, field: &str, v: f64) -> WatermarkResult<()> {
            if !(0.0..=1.0).contains(&v) {
                return Err(WatermarkError::validation(format!(
                    "{name}.{field} must be in [0, 1]"
                )));
            }
            Ok(())
        }
        fn finite(name: &str, field: &str, v: f64) -> WatermarkResult<()> {
            if !v.is_finite() {
                return Err(WatermarkError::validation(format!(
                    "{name}.{field} must be finite"
                )));
            }
            Ok(())
        }

        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(WatermarkError::validation(format!(
                "{name}.fontSize must be finite and > 0"
            )));
        }
        unit(name, "opacity", self.opacity)?;
        unit(name, "bgOpacity", self.background.opacity)?;
        if !(0.0..=50.0).contains(&self.background.blur) {
            return Err(WatermarkError::validation(format!(
                "{name}.bgBlur must be in [0, 50]"
            )));
        }
        if !self.background.padding.is_finite() || self.background.padding < 0.0 {
            return Err(WatermarkError::validation(format!(
                "{name}.bgPadding must be finite and >= 0"
            )));
        }
        let anchor = self.placement.anchor();
        finite(name, "offsetX", anchor.offset_x)?;
        finite(name, "offsetY", anchor.offset_y)?;
        if let Some(link) = self.placement.link() {
            finite(name, "linkSpacing", link.spacing)?;
        }
        Ok(())
    }
}

/// Source of the values that absent JSON keys take.
trait LayerDefaults {
    fn defaults() -> LayerSettings;
}

struct MainDefaults;

impl LayerDefaults for MainDefaults {
    fn defaults() -> LayerSettings {
        LayerSettings::default()
    }
}

struct SubDefaults;

impl LayerDefaults for SubDefaults {
    fn defaults() -> LayerSettings {
        LayerSettings::default_sub()
    }
}

fn deserialize_sub<'de, D>(deserializer: D) -> Result<LayerSettings, D::Error>
where
    D: serde::Deserializer<'de>,
{
    LayerSettingsDef::<SubDefaults>::deserialize(deserializer).map(LayerSettings::from)
}

/// Flat wire form of [`LayerSettings`], field-for-field with the JSON keys.
///
/// `K` picks the defaults for absent keys, so a partial `sub` object fills in from the
/// secondary-layer defaults rather than the main layer's.
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LayerSettingsDef<K> {
    enabled: bool,
    text: String,
    font_size: f64,
    font_family: String,
    color: String,
    opacity: f64,
    bg_enabled: bool,
    bg_opacity: f64,
    bg_blur: f64,
    bg_padding: f64,
    position: Anchor,
    offset_x: f64,
    offset_y: f64,
    is_linked_to_main: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    link_alignment: Option<LinkAlignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    link_spacing: Option<f64>,
    #[serde(skip)]
    defaults: PhantomData<K>,
}

impl<K: LayerDefaults> Default for LayerSettingsDef<K> {
    fn default() -> Self {
        K::defaults().into()
    }
}

impl<K> From<LayerSettingsDef<K>> for LayerSettings {
    fn from(d: LayerSettingsDef<K>) -> Self {
        let anchor = AnchorPlacement {
            anchor: d.position,
            offset_x: d.offset_x,
            offset_y: d.offset_y,
        };
        let placement = if d.is_linked_to_main {
            Placement::Linked {
                link: LinkPlacement {
                    alignment: d.link_alignment.unwrap_or_default(),
                    spacing: d.link_spacing.unwrap_or(0.0),
                },
                fallback: anchor,
            }
        } else {
            Placement::Absolute(anchor)
        };

        Self {
            enabled: d.enabled,
            text: d.text,
            font_size: d.font_size,
            font_family: d.font_family,
            color: d.color,
            opacity: d.opacity,
            background: BackgroundSettings {
                enabled: d.bg_enabled,
                opacity: d.bg_opacity,
                blur: d.bg_blur,
                padding: d.bg_padding,
            },
            placement,
        }
    }
}

impl<K> From<LayerSettings> for LayerSettingsDef<K> {
    fn from(l: LayerSettings) -> Self {
        let anchor = *l.placement.anchor();
        let link = l.placement.link().copied();
        Self {
            enabled: l.enabled,
            text: l.text,
            font_size: l.font_size,
            font_family: l.font_family,
            color: l.color,
            opacity: l.opacity,
            bg_enabled: l.background.enabled,
            bg_opacity: l.background.opacity,
            bg_blur: l.background.blur,
            bg_padding: l.background.padding,
            position: anchor.anchor,
            offset_x: anchor.offset_x,
            offset_y: anchor.offset_y,
            is_linked_to_main: link.is_some(),
            link_alignment: link.map(|l| l.alignment),
            link_spacing: link.map(|l| l.spacing),
            defaults: PhantomData,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/settings/model.rs"]
mod tests;

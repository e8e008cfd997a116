//! Render profiles: canvas size, layout fractions, font scale, and colors.

use std::path::Path;

use anyhow::{Context, Result};
use image::Rgba;
use serde::{Deserialize, Serialize};

use super::layout::LayoutFractions;

/// Colors used by every drawing stage, as RGBA.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: [u8; 4],
    pub title: [u8; 4],
    pub waveform: [u8; 4],
    pub placeholder_fill: [u8; 4],
    pub placeholder_border: [u8; 4],
    pub placeholder_text: [u8; 4],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: [255, 255, 255, 255],
            title: [51, 51, 51, 255],
            waveform: [26, 26, 26, 255],
            placeholder_fill: [240, 240, 240, 255],
            placeholder_border: [204, 204, 204, 255],
            placeholder_text: [102, 102, 102, 255],
        }
    }
}

impl Palette {
    pub fn rgba(c: [u8; 4]) -> Rgba<u8> {
        Rgba(c)
    }
}

/// Resolution and scale constants for one output target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderProfile {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub fractions: LayoutFractions,
    /// Title font size as a fraction of canvas width
    pub font_scale: f32,
    pub palette: Palette,
}

impl Default for RenderProfile {
    fn default() -> Self {
        Self::print()
    }
}

impl RenderProfile {
    /// On-screen preview: same proportions as print at 1/6 the size.
    pub fn preview() -> Self {
        Self {
            name: "preview".into(),
            width: 600,
            height: 400,
            ..Self::print()
        }
    }

    /// Final purchasable asset.
    pub fn print() -> Self {
        Self {
            name: "print".into(),
            width: 3600,
            height: 2400,
            fractions: LayoutFractions::default(),
            font_scale: 0.024,
            palette: Palette::default(),
        }
    }

    /// Look up a built-in profile by name.
    pub fn named(name: &str) -> Option<Self> {
        match name {
            "preview" => Some(Self::preview()),
            "print" => Some(Self::print()),
            _ => None,
        }
    }

    /// Load a profile from JSON. Missing fields take the print defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile: {}", path.display()))?;
        let profile: RenderProfile = serde_json::from_str(&data)
            .with_context(|| format!("Invalid profile JSON: {}", path.display()))?;
        if profile.width == 0 || profile.height == 0 {
            anyhow::bail!("Profile {} has a zero canvas dimension", path.display());
        }
        if let Some(field) = profile.fractions.out_of_range() {
            anyhow::bail!("Profile {}: fraction `{}` must be within [0, 1]", path.display(), field);
        }
        if !profile.font_scale.is_finite() || profile.font_scale <= 0.0 {
            anyhow::bail!("Profile {}: font_scale must be positive", path.display());
        }
        Ok(profile)
    }

    /// Title font size in pixels.
    pub fn font_size(&self) -> f32 {
        self.font_scale * self.width as f32
    }
}

use std::{collections::HashMap, fs, path::Path};

use anyhow::{anyhow, Context, Result};
use textbox_core::TextMetrics;

struct LoadedFont {
    font: fontdue::Font,
    px: f32,
}

/// Fonts rasterized by fontdue, keyed by the font ids used in text options.
pub struct FontRegistry {
    fonts: HashMap<String, LoadedFont>,
    default_font: Option<String>,
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRegistry {
    pub fn new() -> Self {
        Self { fonts: HashMap::new(), default_font: None }
    }

    /// Parses a ttf/otf font and registers it at pixel size `px`.
    pub fn insert_bytes(&mut self, id: &str, bytes: &[u8], px: f32) -> Result<()> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| anyhow!("failed to parse font {}: {}", id, e))?;
        if self.default_font.is_none() {
            self.default_font = Some(id.to_string());
        }
        self.fonts.insert(id.to_string(), LoadedFont { font, px });
        Ok(())
    }

    /// Loads every font file of `dir`, keyed by file stem. Unreadable or broken
    /// fonts are logged and skipped. Returns how many fonts were loaded.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>, px: f32) -> Result<usize> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).with_context(|| format!("read font directory {:?}", dir))?;

        let mut paths: Vec<_> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .map(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();
        if paths.is_empty() {
            log::warn!("No fonts found in {:?}", dir);
        }

        let mut loaded = 0;
        for path in paths {
            let Some(id) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };
            let bytes = match fs::read(&path) {
                Ok(bytes) if !bytes.is_empty() => bytes,
                Ok(_) => {
                    log::warn!("Font file is empty: {}", path.display());
                    continue;
                }
                Err(e) => {
                    log::error!("Failed to read font {}: {}", path.display(), e);
                    continue;
                }
            };
            match self.insert_bytes(&id, &bytes, px) {
                Ok(()) => loaded += 1,
                Err(e) => log::error!("{:#}", e),
            }
        }
        Ok(loaded)
    }

    pub fn set_default_font(&mut self, id: &str) -> bool {
        if self.fonts.contains_key(id) {
            self.default_font = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn default_font(&self) -> Option<&str> {
        self.default_font.as_deref()
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    pub fn font_ids(&self) -> impl Iterator<Item = &str> {
        self.fonts.keys().map(String::as_str)
    }

    /// The font registered as `id`, or the default font when `id` is unknown.
    pub fn get_font(&self, id: &str) -> Option<(&fontdue::Font, f32)> {
        self.fonts
            .get(id)
            .or_else(|| self.default_font.as_ref().and_then(|d| self.fonts.get(d)))
            .map(|f| (&f.font, f.px))
    }
}

impl TextMetrics for FontRegistry {
    fn measure(&self, text: &str, font: &str) -> Option<f32> {
        let (font, px) = self.get_font(font)?;
        Some(text.chars().map(|ch| font.metrics(ch, px).advance_width).sum())
    }

    fn line_height(&self, font: &str) -> Option<f32> {
        let (font, px) = self.get_font(font)?;
        font.horizontal_line_metrics(px).map(|m| m.new_line_size)
    }
}

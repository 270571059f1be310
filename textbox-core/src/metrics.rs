/// Measures rendered text.
///
/// `None` means the font cannot be measured at all, which the wrapper reports as
/// [`TextError::MetricsUnavailable`](crate::TextError::MetricsUnavailable).
pub trait TextMetrics {
    /// Pixel width of `text` rendered in `font`.
    fn measure(&self, text: &str, font: &str) -> Option<f32>;

    /// Distance between baselines, if the provider knows it.
    fn line_height(&self, _font: &str) -> Option<f32> {
        None
    }
}

impl<T: TextMetrics + ?Sized> TextMetrics for &T {
    fn measure(&self, text: &str, font: &str) -> Option<f32> {
        (**self).measure(text, font)
    }

    fn line_height(&self, font: &str) -> Option<f32> {
        (**self).line_height(font)
    }
}

impl<T: TextMetrics + ?Sized> TextMetrics for Box<T> {
    fn measure(&self, text: &str, font: &str) -> Option<f32> {
        (**self).measure(text, font)
    }

    fn line_height(&self, font: &str) -> Option<f32> {
        (**self).line_height(font)
    }
}

/// Every character has the same advance, like the fixed-width tile fonts of
/// handheld-era RPGs.
#[derive(Debug, Clone)]
pub struct MonospaceMetrics {
    advance: f32,
    line_height: f32,
    // `None` accepts any font id
    fonts: Option<Vec<String>>,
}

impl MonospaceMetrics {
    pub fn new(advance: f32, line_height: f32) -> Self {
        Self { advance, line_height, fonts: None }
    }

    /// Restricts the provider to the given font ids; others are unavailable.
    pub fn with_fonts<I, S>(mut self, fonts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fonts = Some(fonts.into_iter().map(Into::into).collect());
        self
    }

    fn knows(&self, font: &str) -> bool {
        self.fonts.as_ref().map_or(true, |fonts| fonts.iter().any(|f| f == font))
    }
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::new(6.0, 16.0)
    }
}

impl TextMetrics for MonospaceMetrics {
    fn measure(&self, text: &str, font: &str) -> Option<f32> {
        self.knows(font).then(|| text.chars().count() as f32 * self.advance)
    }

    fn line_height(&self, font: &str) -> Option<f32> {
        self.knows(font).then_some(self.line_height)
    }
}

use std::ops::Range;

use crate::{
    foundation::core::Rgba8,
    foundation::error::{MemoriesError, MemoriesResult},
};

/// Smallest selectable body font size, in page units.
pub const MIN_FONT_SIZE: f32 = 12.0;
/// Largest selectable body font size, in page units.
pub const MAX_FONT_SIZE: f32 = 48.0;
/// Body font size for new pages.
pub const DEFAULT_FONT_SIZE: f32 = 18.0;
/// Family name used when no explicit family was chosen.
pub const DEFAULT_FONT_FAMILY: &str = "System";

const FORMAT_TAG: &str = "memories.rich-text";
const FORMAT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size: f32,
    #[serde(default)]
    pub bold: bool,
}

impl FontSpec {
    /// Font with `size` clamped into the selectable range.
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        let size = if size.is_finite() {
            size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
        } else {
            DEFAULT_FONT_SIZE
        };
        Self {
            family: family.into(),
            size,
            bold: false,
        }
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn is_default_family(&self) -> bool {
        self.family == DEFAULT_FONT_FAMILY
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE)
    }
}

/// Character attributes of a rich-text span.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextStyle {
    pub font: FontSpec,
    pub color: Rgba8,
}

impl TextStyle {
    pub fn new(font: FontSpec, color: Rgba8) -> Self {
        Self { font, color }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: FontSpec::default(),
            color: Rgba8::BLACK,
        }
    }
}

/// A run of `len` bytes sharing one style.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StyleRun {
    pub len: usize,
    pub style: TextStyle,
}

/// Text with contiguous style runs that cover it exactly.
///
/// Offsets and ranges are UTF-8 byte offsets and must fall on char boundaries.
/// Runs are never empty and adjacent runs never share a style.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RichText {
    text: String,
    runs: Vec<StyleRun>,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct RichTextWire {
    format: String,
    version: u32,
    text: String,
    runs: Vec<StyleRun>,
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain(text: impl Into<String>, style: TextStyle) -> Self {
        let text = text.into();
        let runs = if text.is_empty() {
            Vec::new()
        } else {
            vec![StyleRun {
                len: text.len(),
                style,
            }]
        };
        Self { text, runs }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn runs(&self) -> &[StyleRun] {
        &self.runs
    }

    /// Byte range and style of every run, in order.
    pub fn spans(&self) -> impl Iterator<Item = (Range<usize>, &TextStyle)> + '_ {
        let mut start = 0;
        self.runs.iter().map(move |run| {
            let range = start..start + run.len;
            start += run.len;
            (range, &run.style)
        })
    }

    /// Style of the character starting at `offset`; at the end of the text, the
    /// style of the last character.
    pub fn style_at(&self, offset: usize) -> Option<&TextStyle> {
        let at = if offset >= self.text.len() {
            self.text.len().checked_sub(1)?
        } else {
            offset
        };
        self.spans()
            .find(|(range, _)| range.contains(&at))
            .map(|(_, style)| style)
    }

    pub fn apply_style(&mut self, range: Range<usize>, style: &TextStyle) -> MemoriesResult<()> {
        self.check_range(&range)?;
        if range.is_empty() {
            return Ok(());
        }
        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        for run in &mut self.runs[first..last] {
            run.style = style.clone();
        }
        self.normalize();
        Ok(())
    }

    pub fn insert_text(&mut self, at: usize, text: &str, style: TextStyle) -> MemoriesResult<()> {
        self.check_offset(at)?;
        if text.is_empty() {
            return Ok(());
        }
        let idx = self.split_at(at);
        self.text.insert_str(at, text);
        self.runs.insert(
            idx,
            StyleRun {
                len: text.len(),
                style,
            },
        );
        self.normalize();
        Ok(())
    }

    pub fn delete_range(&mut self, range: Range<usize>) -> MemoriesResult<()> {
        self.check_range(&range)?;
        if range.is_empty() {
            return Ok(());
        }
        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        self.runs.drain(first..last);
        self.text.replace_range(range, "");
        self.normalize();
        Ok(())
    }

    /// Encode into the portable rich-text blob stored on pages.
    pub fn to_bytes(&self) -> MemoriesResult<Vec<u8>> {
        let wire = RichTextWire {
            format: FORMAT_TAG.to_string(),
            version: FORMAT_VERSION,
            text: self.text.clone(),
            runs: self.runs.clone(),
        };
        Ok(serde_json::to_vec(&wire)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> MemoriesResult<Self> {
        let wire: RichTextWire = serde_json::from_slice(bytes)?;
        if wire.format != FORMAT_TAG {
            return Err(MemoriesError::serde(format!(
                "unknown rich text format '{}'",
                wire.format
            )));
        }
        if wire.version != FORMAT_VERSION {
            return Err(MemoriesError::serde(format!(
                "unsupported rich text version {}",
                wire.version
            )));
        }

        let mut pos = 0usize;
        for run in &wire.runs {
            if run.len == 0 {
                return Err(MemoriesError::serde("rich text contains an empty run"));
            }
            pos = pos
                .checked_add(run.len)
                .ok_or_else(|| MemoriesError::serde("rich text run length overflow"))?;
            if !wire.text.is_char_boundary(pos) {
                return Err(MemoriesError::serde(
                    "rich text run does not end on a char boundary",
                ));
            }
        }
        if pos != wire.text.len() {
            return Err(MemoriesError::serde(format!(
                "rich text runs cover {pos} bytes but text has {}",
                wire.text.len()
            )));
        }

        let mut out = Self {
            text: wire.text,
            runs: wire.runs,
        };
        out.normalize();
        Ok(out)
    }

    fn check_offset(&self, offset: usize) -> MemoriesResult<()> {
        if offset > self.text.len() || !self.text.is_char_boundary(offset) {
            return Err(MemoriesError::validation(format!(
                "offset {offset} is not a char boundary of a {}-byte text",
                self.text.len()
            )));
        }
        Ok(())
    }

    fn check_range(&self, range: &Range<usize>) -> MemoriesResult<()> {
        if range.start > range.end {
            return Err(MemoriesError::validation(format!(
                "text range {range:?} is reversed"
            )));
        }
        self.check_offset(range.start)?;
        self.check_offset(range.end)
    }

    /// Ensure a run boundary at `offset`; returns the index of the run starting there.
    fn split_at(&mut self, offset: usize) -> usize {
        let mut pos = 0usize;
        for i in 0..self.runs.len() {
            if pos == offset {
                return i;
            }
            let len = self.runs[i].len;
            if offset < pos + len {
                let head = offset - pos;
                let tail = StyleRun {
                    len: len - head,
                    style: self.runs[i].style.clone(),
                };
                self.runs[i].len = head;
                self.runs.insert(i + 1, tail);
                return i + 1;
            }
            pos += len;
        }
        self.runs.len()
    }

    fn normalize(&mut self) {
        self.runs.retain(|r| r.len > 0);
        let mut merged: Vec<StyleRun> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            match merged.last_mut() {
                Some(prev) if prev.style == run.style => prev.len += run.len,
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/rich_text.rs"]
mod tests;

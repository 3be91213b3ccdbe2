//! Boundary between decoded text and the assembler.
//!
//! A [`LineSource`] (file, clipboard, test fixture ...) hands over decoded
//! text; [`split_lines`] separates the header block and drops blank lines,
//! keeping the 1-based physical number of every line that survives.

use anyhow::Result;

/// only this many leading physical lines are scanned for headers
pub const HEADER_SCAN_LINES: usize = 10;

const HEADER_PREFIXES: [&str; 4] = ["User:", "Account:", "Client version:", "OS version:"];

/// Trait for whatever supplies the decoded text of a log.
///
/// Reading happens outside the core; implementations own the I/O and report
/// failures through `anyhow`.
pub trait LineSource {
    /// human-readable name for log messages (a path, "stdin", ...)
    fn name(&self) -> String;

    /// the full decoded text
    fn read_text(&mut self) -> Result<String>;
}

/// in-memory source, handy for tests and for hosts that already hold the text
pub struct TextSource {
    name: String,
    text: String,
}

impl TextSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl LineSource for TextSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn read_text(&mut self) -> Result<String> {
        Ok(self.text.clone())
    }
}

/// one non-blank, non-header physical line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based physical line number
    pub number: usize,
    pub text: String,
}

impl SourceLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// recognized header lines, in file order; passed through untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderFields {
    fields: Vec<(String, String)>,
}

impl HeaderFields {
    /// value for a header name such as `"Client version"`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// result of [`split_lines`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitLines {
    pub headers: HeaderFields,
    pub lines: Vec<SourceLine>,
}

fn header_field(trimmed: &str) -> Option<(String, String)> {
    HEADER_PREFIXES.iter().find_map(|prefix| {
        trimmed.strip_prefix(prefix).map(|value| {
            (
                prefix.trim_end_matches(':').to_string(),
                value.trim().to_string(),
            )
        })
    })
}

/// split decoded text into header fields and numbered content lines
pub fn split_lines(text: &str) -> SplitLines {
    split_line_seq(text.lines())
}

/// same as [`split_lines`] for text that is already split into lines
pub fn split_line_seq<I, S>(lines: I) -> SplitLines
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut split = SplitLines::default();

    for (idx, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if idx < HEADER_SCAN_LINES
            && let Some(field) = header_field(trimmed)
        {
            split.headers.fields.push(field);
            continue;
        }

        split.lines.push(SourceLine::new(idx + 1, line));
    }

    log::debug!(
        "split {} content lines, {} header fields",
        split.lines.len(),
        split.headers.len()
    );

    split
}

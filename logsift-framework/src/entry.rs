use logsift_parser::{LineFormat, LogLevel};

/// one structured, possibly multi-line, log record
///
/// entries are built once by the assembler and never mutated afterwards
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// 0-based position in the assembled sequence
    pub id: usize,
    /// original text, continuation lines joined with `\n`
    pub raw: String,
    /// primary display text, continuation lines joined with `\n`
    pub message: String,
    pub timestamp: Option<String>,
    pub timestamp_ms: Option<i64>,
    pub display_date: Option<String>,
    pub display_time: Option<String>,
    pub level: Option<LogLevel>,
    pub module: Option<String>,
    pub thread: Option<String>,
    pub process: Option<String>,
    pub source_file: Option<String>,
    pub source_line: Option<u32>,
    pub format: LineFormat,
    pub metadata: Vec<(String, String)>,
    /// 1-based physical line of the first line
    pub line_number: usize,
    pub original_line_numbers: Vec<usize>,
}

impl Entry {
    /// a bare entry holding only a message; the assembler fills in the rest
    pub fn new(id: usize, line_number: usize, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            id,
            raw: message.clone(),
            message,
            timestamp: None,
            timestamp_ms: None,
            display_date: None,
            display_time: None,
            level: None,
            module: None,
            thread: None,
            process: None,
            source_file: None,
            source_line: None,
            format: LineFormat::Generic,
            metadata: Vec::new(),
            line_number,
            original_line_numbers: vec![line_number],
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_timestamp_ms(mut self, millis: i64) -> Self {
        self.timestamp_ms = Some(millis);
        self
    }

    pub fn get_metadata(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_multiline(&self) -> bool {
        self.original_line_numbers.len() > 1
    }

    /// first non-empty line of the message, trimmed
    pub fn preview(&self) -> &str {
        self.message
            .split('\n')
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("")
    }
}

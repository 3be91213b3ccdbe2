use crate::{formats::LineFormat, level::LogLevel};

/// best-effort structured fields extracted from one physical line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub format: LineFormat,
    pub level: Option<LogLevel>,
    pub module: Option<String>,
    pub thread: Option<String>,
    pub process: Option<String>,
    pub source_file: Option<String>,
    pub source_line: Option<u32>,
    pub message: String,
    /// format-specific extras (account, user, project ...), in line order
    pub metadata: Vec<(String, String)>,
}

impl ParsedLine {
    pub fn new(format: LineFormat, message: impl Into<String>) -> Self {
        Self {
            format,
            level: None,
            module: None,
            thread: None,
            process: None,
            source_file: None,
            source_line: None,
            message: message.into(),
            metadata: Vec::new(),
        }
    }

    /// a record with only the message populated
    pub fn degraded(line: &str) -> Self {
        Self::new(LineFormat::Generic, line)
    }

    pub fn with_level(mut self, level: Option<LogLevel>) -> Self {
        self.level = level;
        self
    }

    pub fn with_module(mut self, module: Option<&str>) -> Self {
        self.module = non_empty(module);
        self
    }

    pub fn with_thread(mut self, thread: Option<&str>) -> Self {
        self.thread = non_empty(thread);
        self
    }

    pub fn with_process(mut self, process: Option<&str>) -> Self {
        self.process = non_empty(process);
        self
    }

    pub fn with_source(mut self, file: Option<&str>, line: Option<&str>) -> Self {
        self.source_file = non_empty(file);
        self.source_line = line.and_then(|l| l.trim().parse().ok());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((key.into(), value.into()));
        self
    }

    pub fn get_metadata(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

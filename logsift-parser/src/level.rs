use std::fmt;

/// severity of a log line, from most to least severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// map a single level letter (logcat / linux style) to a level
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'E' | 'F' | 'A' => Some(Self::Error),
            'W' => Some(Self::Warning),
            'I' => Some(Self::Info),
            'D' => Some(Self::Debug),
            'V' | 'T' => Some(Self::Trace),
            _ => None,
        }
    }

    /// map a level word or single letter, case-insensitive
    ///
    /// chromium-style `VERBOSE1`, `VERBOSE2` ... collapse to trace
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        let mut chars = token.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Self::from_letter(c);
        }

        let lower = token.to_ascii_lowercase();
        match lower.as_str() {
            "error" | "err" | "fatal" | "critical" | "crit" | "severe" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warning),
            "info" | "notice" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            "trace" | "verbose" => Some(Self::Trace),
            _ if lower.starts_with("verbose")
                && lower["verbose".len()..].chars().all(|c| c.is_ascii_digit()) =>
            {
                Some(Self::Trace)
            }
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters() {
        assert_eq!(LogLevel::from_letter('e'), Some(LogLevel::Error));
        assert_eq!(LogLevel::from_letter('W'), Some(LogLevel::Warning));
        assert_eq!(LogLevel::from_letter('V'), Some(LogLevel::Trace));
        assert_eq!(LogLevel::from_letter('X'), None);
    }

    #[test]
    fn test_words() {
        assert_eq!(LogLevel::from_token("ERROR"), Some(LogLevel::Error));
        assert_eq!(LogLevel::from_token("Warn"), Some(LogLevel::Warning));
        assert_eq!(LogLevel::from_token("notice"), Some(LogLevel::Info));
        assert_eq!(LogLevel::from_token("VERBOSE1"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::from_token("Routing"), None);
        assert_eq!(LogLevel::from_token(""), None);
    }

    #[test]
    fn test_ordering_is_by_severity() {
        assert!(LogLevel::Error < LogLevel::Warning);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }
}

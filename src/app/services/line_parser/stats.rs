//! Parsing statistics for verification-statistics files

/// Per-file parsing statistics
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ParseStats {
    /// Total number of data lines encountered
    pub total_lines: usize,

    /// Number of records successfully parsed
    pub records_parsed: usize,

    /// Number of lines skipped (too few identity tokens, unknown line type)
    pub lines_skipped: usize,

    /// List of parsing errors for debugging
    pub errors: Vec<String>,
}

impl ParseStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self {
            total_lines: 0,
            records_parsed: 0,
            lines_skipped: 0,
            errors: Vec::new(),
        }
    }

    /// Calculate success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_lines == 0 {
            0.0
        } else {
            (self.records_parsed as f64 / self.total_lines as f64) * 100.0
        }
    }

    /// Fold another file's statistics into this one
    pub fn merge(&mut self, other: &ParseStats) {
        self.total_lines += other.total_lines;
        self.records_parsed += other.records_parsed;
        self.lines_skipped += other.lines_skipped;
        self.errors.extend(other.errors.iter().cloned());
    }
}

impl Default for ParseStats {
    fn default() -> Self {
        Self::new()
    }
}

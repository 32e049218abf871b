//! Cached timestamp parsing
//!
//! Verification files repeat the same handful of timestamps on every line, so
//! each worker keeps a parse cache. Placeholder tokens beginning `F` or `O`
//! stand in for unknown times and map to a fixed epoch date.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::Result;
use crate::constants::CURRENT_TS_FORMAT;

/// Per-worker timestamp parser with a string-keyed cache
#[derive(Debug, Default)]
pub struct DateParser {
    cache: HashMap<String, DateTime<Utc>>,
}

impl DateParser {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    /// Parse a current-format timestamp (`YYYYMMDD_HHMMSS`)
    pub fn parse_current(&mut self, token: &str) -> Result<DateTime<Utc>> {
        if let Some(parsed) = self.cached(token) {
            return Ok(parsed);
        }
        let parsed = NaiveDateTime::parse_from_str(token, CURRENT_TS_FORMAT)?.and_utc();
        self.cache.insert(token.to_string(), parsed);
        Ok(parsed)
    }

    /// Parse a legacy-format timestamp (`YYYYMMDDHH`)
    pub fn parse_legacy(&mut self, token: &str) -> Result<DateTime<Utc>> {
        if let Some(parsed) = self.cached(token) {
            return Ok(parsed);
        }
        // pad to full resolution so one format string covers both families
        let padded = format!("{}0000", token);
        let parsed = NaiveDateTime::parse_from_str(&padded, "%Y%m%d%H%M%S")?.and_utc();
        self.cache.insert(token.to_string(), parsed);
        Ok(parsed)
    }

    fn cached(&mut self, token: &str) -> Option<DateTime<Utc>> {
        if let Some(parsed) = self.cache.get(token) {
            return Some(*parsed);
        }
        if token.starts_with('F') || token.starts_with('O') {
            let placeholder = placeholder_date();
            self.cache.insert(token.to_string(), placeholder);
            return Some(placeholder);
        }
        None
    }
}

/// Fixed date substituted for forecast/observation placeholder tokens
fn placeholder_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_parse_current_format() {
        let mut parser = DateParser::new();
        let parsed = parser.parse_current("20190601_120000").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2019, 6, 1, 12, 0, 0).unwrap());
        // second call hits the cache
        assert_eq!(parser.parse_current("20190601_120000").unwrap(), parsed);
    }

    #[test]
    fn test_parse_legacy_format() {
        let mut parser = DateParser::new();
        let parsed = parser.parse_legacy("2019060112").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2019, 6, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_placeholder_tokens() {
        let mut parser = DateParser::new();
        let epoch = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parser.parse_current("FCST").unwrap(), epoch);
        assert_eq!(parser.parse_legacy("OBS").unwrap(), epoch);
    }

    #[test]
    fn test_malformed_timestamp_is_error() {
        let mut parser = DateParser::new();
        assert!(parser.parse_current("2019-06-01").is_err());
        assert!(parser.parse_legacy("junk").is_err());
    }
}

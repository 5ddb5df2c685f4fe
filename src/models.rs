use std::collections::HashSet;
use std::str::FromStr;

use csv::QuoteStyle;

/// Column to dedup on: a 0-based field index or a header title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelector {
    Index(usize),
    Name(String),
}

impl FromStr for ColumnSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("column selector must not be empty".to_string());
        }
        match s.parse::<usize>() {
            Ok(index) => Ok(ColumnSelector::Index(index)),
            Err(_) => Ok(ColumnSelector::Name(s.to_string())),
        }
    }
}

/// Field quoting policy, selected on the command line by number.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum QuotingMode {
    #[default]
    Minimal,
    All,
    NonNumeric,
    None,
}

impl QuotingMode {
    pub fn quote_style(self) -> QuoteStyle {
        match self {
            QuotingMode::Minimal => QuoteStyle::Necessary,
            QuotingMode::All => QuoteStyle::Always,
            QuotingMode::NonNumeric => QuoteStyle::NonNumeric,
            QuotingMode::None => QuoteStyle::Never,
        }
    }

    /// Whether quote characters are interpreted while reading.
    pub fn reads_quotes(self) -> bool {
        !matches!(self, QuotingMode::None)
    }
}

impl FromStr for QuotingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(QuotingMode::Minimal),
            "1" => Ok(QuotingMode::All),
            "2" => Ok(QuotingMode::NonNumeric),
            "3" => Ok(QuotingMode::None),
            _ => Err(format!(
                "invalid quoting mode {s:?} (expected 0: minimal, 1: all, 2: non-numeric, 3: none)"
            )),
        }
    }
}

/// Keys already emitted during a run. Grows monotonically, never shrinks.
#[derive(Debug, Default)]
pub struct SeenSet {
    keys: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> SeenSet {
        SeenSet {
            keys: HashSet::new(),
        }
    }

    /// Returns true if the key was not seen before, i.e. the line should be emitted.
    pub fn first_seen(&mut self, key: String) -> bool {
        self.keys.insert(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

/// Line counts for the end-of-run report.
#[derive(Debug, Default)]
pub struct Stats {
    pub total: u64,
    pub emitted: u64,
    pub duplicates: u64,
    pub ignored: u64,
}

impl Stats {
    pub fn new() -> Stats {
        Stats::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_parses_digits_as_index() {
        assert_eq!("3".parse(), Ok(ColumnSelector::Index(3)));
        assert_eq!("0".parse(), Ok(ColumnSelector::Index(0)));
    }

    #[test]
    fn selector_parses_anything_else_as_name() {
        assert_eq!("id".parse(), Ok(ColumnSelector::Name("id".to_string())));
        assert_eq!("-1".parse(), Ok(ColumnSelector::Name("-1".to_string())));
    }

    #[test]
    fn selector_rejects_empty() {
        assert!("".parse::<ColumnSelector>().is_err());
    }

    #[test]
    fn quoting_mode_numeric_mapping() {
        assert_eq!("0".parse(), Ok(QuotingMode::Minimal));
        assert_eq!("1".parse(), Ok(QuotingMode::All));
        assert_eq!("2".parse(), Ok(QuotingMode::NonNumeric));
        assert_eq!("3".parse(), Ok(QuotingMode::None));
        assert!("4".parse::<QuotingMode>().is_err());
    }

    #[test]
    fn seen_set_reports_first_occurrence_only() {
        let mut seen = SeenSet::new();
        assert!(seen.first_seen("a".to_string()));
        assert!(seen.first_seen("b".to_string()));
        assert!(!seen.first_seen("a".to_string()));
        assert_eq!(seen.len(), 2);
    }
}

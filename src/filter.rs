// src/filter.rs

use crate::dates::{self, CalendarDate};
use crate::models::{FilterSpec, LogEntry};
use std::collections::HashSet;

/// A date bound after normalization. `Unparsable` matches no entry.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Bound {
    Open,
    At(CalendarDate),
    Unparsable,
}

impl Bound {
    fn from_wire(raw: Option<&str>) -> Bound {
        match dates::to_canonical(raw) {
            None => Bound::Open,
            Some(s) => match dates::parse_canonical(Some(&s)) {
                Some(d) => Bound::At(d),
                None => Bound::Unparsable,
            },
        }
    }
}

/// A `FilterSpec` with its needle lower-cased and date bounds parsed once.
#[derive(Debug)]
pub struct CompiledFilter<'a> {
    spec: &'a FilterSpec,
    needle: Option<String>,
    from: Bound,
    to: Bound,
}

impl<'a> CompiledFilter<'a> {
    pub fn new(spec: &'a FilterSpec) -> Self {
        Self {
            spec,
            needle: spec.description_contains.as_deref().map(str::to_lowercase),
            from: Bound::from_wire(spec.date_from.as_deref()),
            to: Bound::from_wire(spec.date_to.as_deref()),
        }
    }

    /// All set constraints must hold.
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(m) = &self.spec.machine {
            if entry.machine != *m {
                return false;
            }
        }
        if let Some(l) = &self.spec.line {
            if entry.line != *l {
                return false;
            }
        }
        if let Some(o) = &self.spec.operator {
            if entry.operator != *o {
                return false;
            }
        }
        if let Some(needle) = &self.needle {
            if !entry.description.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }
        self.date_in_range(&entry.date)
    }

    fn date_in_range(&self, raw: &str) -> bool {
        if self.from == Bound::Open && self.to == Bound::Open {
            return true;
        }
        // An empty stored date would read as EPOCH; treat it as unparsable instead.
        let date = match (raw.is_empty(), dates::parse_canonical(Some(raw))) {
            (false, Some(d)) => d,
            _ => return false,
        };
        let after_from = match self.from {
            Bound::Open => true,
            Bound::At(from) => date >= from,
            Bound::Unparsable => false,
        };
        let before_to = match self.to {
            Bound::Open => true,
            Bound::At(to) => date <= to,
            Bound::Unparsable => false,
        };
        after_from && before_to
    }
}

/// Returns the entries matching `spec`, in their original order.
pub fn apply(entries: &[LogEntry], spec: &FilterSpec) -> Vec<LogEntry> {
    if spec.is_empty() {
        return entries.to_vec();
    }
    let filter = CompiledFilter::new(spec);
    entries
        .iter()
        .filter(|e| filter.matches(e))
        .cloned()
        .collect()
}

/// Identifiers of the entries matching `spec`.
pub fn matching_ids(entries: &[LogEntry], spec: &FilterSpec) -> HashSet<i64> {
    let filter = CompiledFilter::new(spec);
    entries
        .iter()
        .filter(|e| filter.matches(e))
        .map(|e| e.id)
        .collect()
}

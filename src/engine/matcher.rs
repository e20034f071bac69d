//! Timestamp matching shared by agent curves and baseline projection.
//!
//! A lookup at `d` resolves an exact key first. Failing that, it considers the
//! keys on the same calendar day: the last one not after `d`, or the day's
//! earliest key when every candidate is later than `d`.

use crate::domain::timestamp::date_part;
use crate::domain::Timestamp;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug)]
pub struct PointIndex<'a, T> {
    points: &'a BTreeMap<Timestamp, T>,
    by_day: HashMap<&'a str, Vec<&'a Timestamp>>,
}

impl<'a, T> PointIndex<'a, T> {
    pub fn new(points: &'a BTreeMap<Timestamp, T>) -> Self {
        let mut by_day: HashMap<&str, Vec<&Timestamp>> = HashMap::new();
        // BTreeMap iteration keeps each day's keys ascending.
        for key in points.keys() {
            by_day.entry(key.date_part()).or_default().push(key);
        }
        Self { points, by_day }
    }

    /// Point stored at exactly `at`.
    pub fn exact(&self, at: &str) -> Option<(&'a Timestamp, &'a T)> {
        self.points.get_key_value(at)
    }

    /// Same-day point for `at`: the last key `<= at`, else the day's first key.
    pub fn same_day(&self, at: &str) -> Option<(&'a Timestamp, &'a T)> {
        let candidates = self.by_day.get(date_part(at))?;
        let key = candidates
            .iter()
            .rev()
            .find(|k| k.as_str() <= at)
            .or_else(|| candidates.first())?;
        self.points.get_key_value(key.as_str())
    }

    /// Value at `at` via exact match, then same-day match.
    ///
    /// `value_of` may decline a point (e.g. an empty snapshot); an exact
    /// point without a value still lets the same-day rule try.
    pub fn resolve<F>(&self, at: &str, value_of: F) -> Option<f64>
    where
        F: Fn(&T) -> Option<f64>,
    {
        if let Some(v) = self.exact(at).and_then(|(_, p)| value_of(p)) {
            return Some(v);
        }
        self.same_day(at).and_then(|(_, p)| value_of(p))
    }

    /// Values over `axis`, carrying the last resolved value forward across
    /// dates with no match. Leading dates before any match are `None`.
    pub fn forward_fill<F>(&self, axis: &[Timestamp], value_of: F) -> Vec<Option<f64>>
    where
        F: Fn(&T) -> Option<f64>,
    {
        let mut last_value = None;
        axis.iter()
            .map(|date| {
                if let Some(v) = self.resolve(date.as_str(), &value_of) {
                    last_value = Some(v);
                }
                last_value
            })
            .collect()
    }
}

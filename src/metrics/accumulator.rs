use crate::fmt::Number;

use super::{Aggregation, Value};

/// The running value of one stat identity.
///
/// An accumulator with no accepted updates since creation or its last reset
/// is invisible: it reports nothing, and its value is meaningless (always 0).
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulator {
    name: String,
    identity: String,
    value: f64,
    updates: u64,
}

impl Accumulator {
    pub fn new(name: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identity: identity.into(),
            value: 0.0,
            updates: 0,
        }
    }

    /// Base name of the metric this stat belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full identity, `name` or `name{tags}`.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Number of updates accepted since creation or the last reset.
    pub fn update_count(&self) -> u64 {
        self.updates
    }

    /// Fold `v` into the running value. Returns whether the value was accepted;
    /// anything [`Value::usable`] rejects leaves the accumulator untouched.
    pub fn apply(&mut self, aggregation: Aggregation, v: impl Into<Value>) -> bool {
        let Some(v) = v.into().usable() else {
            return false;
        };
        self.updates += 1;
        let first = self.updates == 1;
        match aggregation {
            Aggregation::Set => self.value = v,
            Aggregation::Count => self.value += v,
            Aggregation::Min => {
                if first || v < self.value {
                    self.value = v;
                }
            }
            Aggregation::Max => {
                if first || v > self.value {
                    self.value = v;
                }
            }
            Aggregation::Avg => {
                self.value = if first {
                    v
                } else {
                    let n = self.updates as f64;
                    (self.value * (n - 1.0) + v) / n
                };
            }
        }
        true
    }

    /// Last write wins.
    pub fn set(&mut self, v: impl Into<Value>) -> bool {
        self.apply(Aggregation::Set, v)
    }

    /// Add `n`, which may be negative.
    pub fn count(&mut self, n: impl Into<Value>) -> bool {
        self.apply(Aggregation::Count, n)
    }

    pub fn min(&mut self, v: impl Into<Value>) -> bool {
        self.apply(Aggregation::Min, v)
    }

    pub fn max(&mut self, v: impl Into<Value>) -> bool {
        self.apply(Aggregation::Max, v)
    }

    /// Running arithmetic mean, computed without keeping history.
    pub fn avg(&mut self, v: impl Into<Value>) -> bool {
        self.apply(Aggregation::Avg, v)
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
        self.updates = 0;
    }

    /// The exposition line for this stat, or an empty string if nothing was
    /// recorded since the last reset.
    pub fn report(&self) -> String {
        if self.updates == 0 {
            return String::new();
        }
        format!("{} {}\n", self.identity, Number(self.value))
    }
}

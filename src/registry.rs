use parking_lot::Mutex;
use std::{collections::hash_map::Entry, fmt::Write, sync::LazyLock};

use crate::{
    metrics::{Accumulator, Aggregation, MetricDefinition, TagsOrValue, Value},
    tags::resolve_identity,
    utils::{HashMap, HashSet},
};

pub static DEFAULT_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

#[derive(Default)]
struct Inner {
    /// Accumulators keyed by identity, `name` or `name{tags}`.
    stats: HashMap<String, Accumulator>,
    /// Declared metadata keyed by base name.
    defs: HashMap<String, MetricDefinition>,
}

/// A store of named, optionally tagged stats that renders them in the
/// Prometheus text exposition format.
///
/// Nothing here ever fails. Unusable values are dropped, unknown stats read
/// as `None` and deleting something that isn't there does nothing; a metrics
/// path should never take down the code it is measuring.
///
/// NOTE: The whole registry sits behind one lock. [`Registry::report`] has to
/// see every accumulator at the same instant while it resets them, so
/// per-stat locking would buy us nothing.
#[derive(Default)]
pub struct Registry {
    inner: Mutex<Inner>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            inner: Default::default(),
        }
    }

    /// Declare the kind and help text of the metric `name`, replacing any
    /// previous declaration wholesale. Pass `""` to leave either one unset.
    /// Existing values are untouched.
    pub fn declare(&self, name: &str, kind: &str, help: &str) {
        tracing::debug!(message = "declared metric", name, kind, help);
        self.inner
            .lock()
            .defs
            .insert(name.to_string(), MetricDefinition::new(kind, help));
    }

    /// Forget the declaration of `name`. Its stats keep reporting, just
    /// without headers, and are zeroed on report like any undeclared stat.
    pub fn undeclare(&self, name: &str) -> bool {
        let removed = self.inner.lock().defs.remove(name).is_some();
        if removed {
            tracing::debug!(message = "undeclared metric", name);
        }
        removed
    }

    pub fn definition(&self, name: &str) -> Option<MetricDefinition> {
        self.inner.lock().defs.get(name).cloned()
    }

    /// Look up or create the accumulator for `name` + `tags` and fold `value`
    /// into it. The accumulator is created even when the value is dropped.
    fn update(&self, aggregation: Aggregation, name: &str, tags: &TagsOrValue, value: Value) {
        let identity = resolve_identity(name, tags.tags());
        let mut inner = self.inner.lock();
        let acc = match inner.stats.entry(identity) {
            Entry::Occupied(oe) => oe.into_mut(),
            Entry::Vacant(ve) => {
                tracing::trace!(message = "created stat", identity = %ve.key());
                let acc = Accumulator::new(name, ve.key().clone());
                ve.insert(acc)
            }
        };
        if !acc.apply(aggregation, value) {
            tracing::trace!(
                message = "dropped unusable value",
                identity = acc.identity(),
                ?aggregation,
                ?value
            );
        }
    }

    /// Record the current reading of a stat, last write wins.
    ///
    /// `tags` is either the tag set or, when the stat is untagged, the value
    /// itself: `set("x", 3, ())` is `set("x", (), 3)`.
    pub fn set(&self, name: &str, tags: impl Into<TagsOrValue>, value: impl Into<Value>) {
        let tags = tags.into();
        let value = tags.resolve_value(value.into());
        self.update(Aggregation::Set, name, &tags, value);
    }

    /// Add to a stat. Without a number in either slot this adds 1, so
    /// `count("requests", (), ())` and `count("requests", [("code", 200)], ())`
    /// are both increments.
    pub fn count(&self, name: &str, tags: impl Into<TagsOrValue>, value: impl Into<Value>) {
        let tags = tags.into();
        let value = tags.resolve_count(value.into());
        self.update(Aggregation::Count, name, &tags, value);
    }

    /// Track the lowest value seen in the report window.
    pub fn min(&self, name: &str, tags: impl Into<TagsOrValue>, value: impl Into<Value>) {
        let tags = tags.into();
        let value = tags.resolve_value(value.into());
        self.update(Aggregation::Min, name, &tags, value);
    }

    /// Track the highest value seen in the report window.
    pub fn max(&self, name: &str, tags: impl Into<TagsOrValue>, value: impl Into<Value>) {
        let tags = tags.into();
        let value = tags.resolve_value(value.into());
        self.update(Aggregation::Max, name, &tags, value);
    }

    /// Track the mean of the values seen in the report window.
    pub fn avg(&self, name: &str, tags: impl Into<TagsOrValue>, value: impl Into<Value>) {
        let tags = tags.into();
        let value = tags.resolve_value(value.into());
        self.update(Aggregation::Avg, name, &tags, value);
    }

    /// Current value of a stat, or `None` if it has never been touched or was
    /// deleted. Never creates the stat.
    pub fn read(&self, name: &str, tags: impl Into<TagsOrValue>) -> Option<f64> {
        let identity = resolve_identity(name, tags.into().tags());
        self.inner.lock().stats.get(&identity).map(Accumulator::value)
    }

    /// A copy of a stat's accumulator.
    pub fn stat(&self, name: &str, tags: impl Into<TagsOrValue>) -> Option<Accumulator> {
        let identity = resolve_identity(name, tags.into().tags());
        self.inner.lock().stats.get(&identity).cloned()
    }

    /// Remove a stat entirely. The next update recreates it from zero, even
    /// for counters.
    pub fn delete_stat(&self, name: &str, tags: impl Into<TagsOrValue>) -> bool {
        let identity = resolve_identity(name, tags.into().tags());
        self.inner.lock().stats.remove(&identity).is_some()
    }

    /// Zero a single stat in place.
    pub fn reset_stat(&self, name: &str, tags: impl Into<TagsOrValue>) {
        let identity = resolve_identity(name, tags.into().tags());
        if let Some(acc) = self.inner.lock().stats.get_mut(&identity) {
            acc.reset();
        }
    }

    /// Zero every stat. Declarations are kept.
    pub fn reset_all(&self) {
        for acc in self.inner.lock().stats.values_mut() {
            acc.reset();
        }
    }

    /// Every known identity, in report order.
    pub fn identities(&self) -> Vec<String> {
        let mut identities: Vec<String> = self.inner.lock().stats.keys().cloned().collect();
        identities.sort_unstable();
        identities
    }

    pub fn len(&self) -> usize {
        self.inner.lock().stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render every stat updated since the last report and start a new report
    /// window.
    ///
    /// Stats are emitted in byte-wise identity order. The first stat of each
    /// base name to produce a line brings the `# TYPE`/`# HELP` headers of its
    /// metric, preceded by a blank line unless it opens the output. After
    /// rendering, every stat not declared as a `counter` is zeroed.
    pub fn report(&self) -> String {
        let mut inner = self.inner.lock();
        let Inner { stats, defs } = &mut *inner;

        let mut sorted: Vec<&mut Accumulator> = stats.values_mut().collect();
        sorted.sort_unstable_by(|a, b| a.identity().cmp(b.identity()));

        let mut described: HashSet<String> = HashSet::default();
        let mut output = String::new();
        for acc in sorted {
            let def = defs.get(acc.name());
            let line = acc.report();
            if !line.is_empty() && !described.contains(acc.name()) {
                if !output.is_empty() {
                    output.push('\n');
                }
                if let Some(def) = def {
                    // Writing into a String can't fail.
                    if !def.kind.is_empty() {
                        let _ = writeln!(output, "# TYPE {} {}", acc.name(), def.kind);
                    }
                    if !def.help.is_empty() {
                        let _ = writeln!(output, "# HELP {} {}", acc.name(), def.help);
                    }
                }
                described.insert(acc.name().to_string());
            }
            output.push_str(&line);

            if !def.is_some_and(MetricDefinition::is_counter) {
                acc.reset();
            }
        }
        output
    }
}

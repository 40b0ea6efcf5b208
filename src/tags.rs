//! Tag sets and the mapping from `(name, tags)` to a stat identity.
//!
//! An identity is the bare metric name, or `name{k1=v1,k2=v2}` when tags are
//! present. Pairs are serialized in the order the caller supplied them; we
//! never sort, so `{a=1,b=2}` and `{b=2,a=1}` are two different stats.

use std::fmt::{Display, Write};

use smallvec::SmallVec;

/// Most metrics carry a handful of labels, keep them on the stack.
pub type TagPairs = SmallVec<[(String, String); 8]>;

/// The tag set attached to an update, read or delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Tags {
    /// No tags, the identity is the bare metric name.
    #[default]
    None,
    /// A pre-formatted `k=v,k2=v2` label string, used verbatim.
    Labels(String),
    /// Ordered key/value pairs.
    Pairs(TagPairs),
}

impl Tags {
    /// Build a tag set from ordered pairs, normalising an empty list to [`Tags::None`].
    pub fn pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Display,
        V: Display,
    {
        let pairs: TagPairs = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        if pairs.is_empty() {
            Tags::None
        } else {
            Tags::Pairs(pairs)
        }
    }

    /// Build a tag set from a pre-formatted label string, normalising `""` to [`Tags::None`].
    pub fn labels(labels: impl Into<String>) -> Self {
        let labels = labels.into();
        if labels.is_empty() {
            Tags::None
        } else {
            Tags::Labels(labels)
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Tags::None => true,
            Tags::Labels(l) => l.is_empty(),
            Tags::Pairs(p) => p.is_empty(),
        }
    }
}

/// Resolve the identity of the stat `name` carrying `tags`.
///
/// This is called on every update and read, and never fails: a tag set that
/// serializes to nothing collapses to the bare name.
pub fn resolve_identity(name: &str, tags: &Tags) -> String {
    match tags {
        Tags::None => name.to_string(),
        Tags::Labels(labels) if labels.is_empty() => name.to_string(),
        Tags::Labels(labels) => {
            let mut identity = String::with_capacity(name.len() + labels.len() + 2);
            identity.push_str(name);
            identity.push('{');
            identity.push_str(labels);
            identity.push('}');
            identity
        }
        Tags::Pairs(pairs) if pairs.is_empty() => name.to_string(),
        Tags::Pairs(pairs) => {
            let mut identity = String::with_capacity(name.len() + 16 * pairs.len());
            identity.push_str(name);
            identity.push('{');
            for (i, (k, v)) in pairs.iter().enumerate() {
                if i > 0 {
                    identity.push(',');
                }
                // Writing into a String can't fail.
                let _ = write!(identity, "{k}={v}");
            }
            identity.push('}');
            identity
        }
    }
}

impl From<()> for Tags {
    fn from(_: ()) -> Self {
        Tags::None
    }
}

impl From<&str> for Tags {
    fn from(labels: &str) -> Self {
        Tags::labels(labels)
    }
}

impl From<String> for Tags {
    fn from(labels: String) -> Self {
        Tags::labels(labels)
    }
}

impl From<&String> for Tags {
    fn from(labels: &String) -> Self {
        Tags::labels(labels.as_str())
    }
}

impl<K: Display, V: Display, const N: usize> From<[(K, V); N]> for Tags {
    fn from(pairs: [(K, V); N]) -> Self {
        Tags::pairs(pairs)
    }
}

impl<K: Display, V: Display> From<&[(K, V)]> for Tags {
    fn from(pairs: &[(K, V)]) -> Self {
        Tags::pairs(pairs.iter().map(|(k, v)| (k, v)))
    }
}

impl<K: Display, V: Display> From<Vec<(K, V)>> for Tags {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Tags::pairs(pairs)
    }
}

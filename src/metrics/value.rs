use crate::tags::Tags;

/// A value handed to an update call.
///
/// Update calls accept anything that converts into a `Value`. Values that are
/// not usable numbers are carried through rather than rejected at the call
/// site, since the accumulator drops them silently.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Value {
    /// No value was passed. The tags slot may be carrying it instead.
    #[default]
    Absent,
    Number(f64),
    /// Something that does not parse as a number.
    NotANumber,
}

impl Value {
    /// The number to aggregate, if this is one.
    ///
    /// Accepts exactly what `v >= -inf` accepts: every finite or infinite
    /// float, but never `NaN`.
    pub fn usable(self) -> Option<f64> {
        match self {
            Value::Number(v) if v >= f64::NEG_INFINITY => Some(v),
            _ => None,
        }
    }

    pub fn is_absent(self) -> bool {
        matches!(self, Value::Absent)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Absent
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Absent, Into::into)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        s.trim()
            .parse::<f64>()
            .map_or(Value::NotANumber, Value::Number)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::from(s.as_str())
    }
}

macro_rules! impl_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Number(v as f64)
                }
            }

            impl From<$t> for TagsOrValue {
                fn from(v: $t) -> Self {
                    TagsOrValue::Value(Value::from(v))
                }
            }
        )*
    };
}

impl_from_number!(f64, f32, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// The second positional argument of an update call: either the tag set or,
/// for the tagless shorthand, the value itself.
///
/// `registry.set("x", 5, ())` and `registry.set("x", (), 5)` both set the
/// untagged stat `x` to 5.
#[derive(Debug, Clone, PartialEq)]
pub enum TagsOrValue {
    Tags(Tags),
    Value(Value),
}

static NO_TAGS: Tags = Tags::None;

impl TagsOrValue {
    /// The tags used to resolve the identity. A value in the tags slot
    /// resolves to the bare name.
    pub fn tags(&self) -> &Tags {
        match self {
            TagsOrValue::Tags(tags) => tags,
            TagsOrValue::Value(_) => &NO_TAGS,
        }
    }

    /// Pick the value to aggregate: the explicit `value` when one was passed,
    /// otherwise whatever sits in the tags slot.
    ///
    /// A tag set standing in for the value is not a number, except that a
    /// missing tag set is just as absent as the missing value.
    pub fn resolve_value(&self, value: Value) -> Value {
        if !value.is_absent() {
            return value;
        }
        match self {
            TagsOrValue::Value(v) => *v,
            TagsOrValue::Tags(Tags::None) => Value::Absent,
            TagsOrValue::Tags(_) => Value::NotANumber,
        }
    }

    /// Like [`TagsOrValue::resolve_value`], but increments by one when the
    /// caller gave no explicit delta and the tags slot holds no number.
    pub fn resolve_count(&self, value: Value) -> Value {
        match (value, self) {
            (Value::Absent, TagsOrValue::Tags(_)) => Value::Number(1.0),
            _ => self.resolve_value(value),
        }
    }
}

impl From<Tags> for TagsOrValue {
    fn from(tags: Tags) -> Self {
        TagsOrValue::Tags(tags)
    }
}

impl From<Value> for TagsOrValue {
    fn from(v: Value) -> Self {
        TagsOrValue::Value(v)
    }
}

impl From<()> for TagsOrValue {
    fn from(_: ()) -> Self {
        TagsOrValue::Tags(Tags::None)
    }
}

impl From<&str> for TagsOrValue {
    fn from(labels: &str) -> Self {
        TagsOrValue::Tags(Tags::from(labels))
    }
}

impl From<String> for TagsOrValue {
    fn from(labels: String) -> Self {
        TagsOrValue::Tags(Tags::from(labels))
    }
}

impl From<&String> for TagsOrValue {
    fn from(labels: &String) -> Self {
        TagsOrValue::Tags(Tags::from(labels))
    }
}

impl<K: std::fmt::Display, V: std::fmt::Display, const N: usize> From<[(K, V); N]>
    for TagsOrValue
{
    fn from(pairs: [(K, V); N]) -> Self {
        TagsOrValue::Tags(Tags::from(pairs))
    }
}

impl<K: std::fmt::Display, V: std::fmt::Display> From<&[(K, V)]> for TagsOrValue {
    fn from(pairs: &[(K, V)]) -> Self {
        TagsOrValue::Tags(Tags::from(pairs))
    }
}

impl<K: std::fmt::Display, V: std::fmt::Display> From<Vec<(K, V)>> for TagsOrValue {
    fn from(pairs: Vec<(K, V)>) -> Self {
        TagsOrValue::Tags(Tags::from(pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable() {
        assert_eq!(Value::from(1).usable(), Some(1.0));
        assert_eq!(Value::from(-2.5).usable(), Some(-2.5));
        assert_eq!(Value::from(f64::NEG_INFINITY).usable(), Some(f64::NEG_INFINITY));
        assert_eq!(Value::from(f64::INFINITY).usable(), Some(f64::INFINITY));
        assert_eq!(Value::from(f64::NAN).usable(), None);
        assert_eq!(Value::from("ZZ").usable(), None);
        assert_eq!(Value::Absent.usable(), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(Value::from("12.5"), Value::Number(12.5));
        assert_eq!(Value::from(" 3 "), Value::Number(3.0));
        assert_eq!(Value::from("ZZ"), Value::NotANumber);
        assert_eq!(Value::from(String::from("-1")), Value::Number(-1.0));
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(None::<f64>), Value::Absent);
        assert_eq!(Value::from(Some(4u8)), Value::Number(4.0));
    }

    #[test]
    fn test_resolve_value() {
        assert_eq!(TagsOrValue::from(1).resolve_value(Value::Absent), Value::Number(1.0));
        assert_eq!(
            TagsOrValue::from("a=1,b=2").resolve_value(Value::from(2)),
            Value::Number(2.0)
        );
        assert_eq!(
            TagsOrValue::from(f64::NEG_INFINITY).resolve_value(Value::Absent),
            Value::Number(f64::NEG_INFINITY)
        );
        assert_eq!(TagsOrValue::from("a=1").resolve_value(Value::Absent), Value::NotANumber);
        assert_eq!(TagsOrValue::from(()).resolve_value(Value::Absent), Value::Absent);
    }

    #[test]
    fn test_resolve_count_defaults_to_one() {
        assert_eq!(TagsOrValue::from(()).resolve_count(Value::Absent), Value::Number(1.0));
        assert_eq!(TagsOrValue::from("a=1").resolve_count(Value::Absent), Value::Number(1.0));
        assert_eq!(TagsOrValue::from(5).resolve_count(Value::Absent), Value::Number(5.0));
        // An explicit non-numeric delta is dropped, not replaced.
        assert_eq!(TagsOrValue::from("").resolve_count(Value::from("ZZ")), Value::NotANumber);
    }

    #[test]
    fn test_numeric_tags_resolve_to_no_tags() {
        assert_eq!(TagsOrValue::from(42).tags(), &Tags::None);
        assert_eq!(TagsOrValue::from([("a", 1)]).tags(), &Tags::from([("a", 1)]));
    }
}

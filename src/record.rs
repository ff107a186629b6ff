use std::borrow::Cow;
use std::fmt;

/// Fixed-point decimal: `raw / 10^places`, rendered with exactly `places`
/// decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fixed {
    raw: i64,
    places: u8,
}

impl Fixed {
    pub const fn new(raw: i64, places: u8) -> Self {
        Self { raw, places }
    }

    pub const fn raw(self) -> i64 {
        self.raw
    }

    pub const fn places(self) -> u8 {
        self.places
    }

    pub fn to_f64(self) -> f64 {
        self.raw as f64 / 10f64.powi(self.places as i32)
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = 10i64.pow(self.places as u32);
        let sign = if self.raw < 0 { "-" } else { "" };
        let abs = self.raw.unsigned_abs();
        let whole = abs / scale as u64;
        if self.places == 0 {
            return write!(f, "{sign}{whole}");
        }
        let frac = abs % scale as u64;
        write!(f, "{sign}{whole}.{frac:0width$}", width = self.places as usize)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Fixed(Fixed),
    /// Enumeration label, or a hex rendering of a raw value outside the table.
    Label(Cow<'static, str>),
    Text(String),
    /// Sentinel raw value: the quantity is not available.
    NotApplicable,
    List(Vec<Value>),
    /// Attribute updates for one named display element.
    Attributes(Vec<(&'static str, Value)>),
}

impl Value {
    pub fn label(s: &'static str) -> Self {
        Value::Label(Cow::Borrowed(s))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Label(s) => Some(s),
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Fixed> for Value {
    fn from(v: Fixed) -> Self {
        Value::Fixed(v)
    }
}

macro_rules! int_value {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(v as i64)
            }
        })*
    };
}

int_value!(u8, u16, u32, i8, i16, i32, i64);

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::NotApplicable, Into::into)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(true) => f.write_str("YES"),
            Value::Bool(false) => f.write_str("NO"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Fixed(v) => write!(f, "{v}"),
            Value::Label(s) => f.write_str(s),
            Value::Text(s) => write!(f, "\"{s}\""),
            Value::NotApplicable => f.write_str("---"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Attributes(attrs) => {
                f.write_str("{")?;
                for (i, (key, value)) in attrs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, " {key}: {value}")?;
                }
                f.write_str(" }")
            }
        }
    }
}

/// Ordered field → value mapping produced by one successful decode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalRecord {
    fields: Vec<(&'static str, Value)>,
}

impl SignalRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &'static str, value: impl Into<Value>) -> &mut Self {
        self.fields.push((name, value.into()));
        self
    }

    pub fn with(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.fields.iter().map(|(n, v)| (*n, v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(feature = "serde")]
mod ser {
    use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

    use super::{SignalRecord, Value};

    fn serialize_pairs<S: Serializer>(
        pairs: &[(&'static str, Value)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(pairs.len()))?;
        for (k, v) in pairs {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }

    impl Serialize for Value {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Value::Bool(b) => serializer.serialize_bool(*b),
                Value::Int(v) => serializer.serialize_i64(*v),
                // Keep the decimal count: a float would lose it.
                Value::Fixed(v) => serializer.collect_str(v),
                Value::Label(s) => serializer.serialize_str(s),
                Value::Text(s) => serializer.serialize_str(s),
                Value::NotApplicable => serializer.serialize_none(),
                Value::List(items) => {
                    let mut seq = serializer.serialize_seq(Some(items.len()))?;
                    for item in items {
                        seq.serialize_element(item)?;
                    }
                    seq.end()
                }
                Value::Attributes(attrs) => serialize_pairs(attrs, serializer),
            }
        }
    }

    impl Serialize for SignalRecord {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serialize_pairs(&self.fields, serializer)
        }
    }
}

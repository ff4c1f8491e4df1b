use std::{cmp::Ordering, collections::BTreeMap, fs, path::Path, str::FromStr};

use fixed::types::I64F64;
use serde::{
    ser::{SerializeMap, SerializeSeq},
    Serialize,
};
use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};
use serde_yaml::{Number as YamlNumber, Value as YamlValue};
use toml::Value as TomlValue;

use crate::{fs::extension, Date, Error};

/// We use [`std::collections::BTreeMap`] as our default map structure.
pub type Map<K, V> = BTreeMap<K, V>;

/// The fixed-point number type that we use for representing floating point
/// values. This is currently a 128-bit number, with 64 bits for representing
/// the integer part and another 64 bits for representing the floating point
/// part. Unlike `f64`, it is totally ordered, which keeps sorting simple.
pub type Fixed = I64F64;

/// Describes the type of a [`Value`], mostly for error reporting.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueType {
    /// The element type of an empty array or map.
    Unknown,
    Null,
    Bool,
    Signed,
    Unsigned,
    Fixed,
    String,
    Date,
    /// An array of the given type.
    Array(Box<ValueType>),
    /// A map of string values to the given type.
    Map(Box<ValueType>),
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::Null => write!(f, "Null"),
            Self::Bool => write!(f, "Bool"),
            Self::Signed => write!(f, "Int"),
            Self::Unsigned => write!(f, "Uint"),
            Self::Fixed => write!(f, "Fixed"),
            Self::String => write!(f, "String"),
            Self::Date => write!(f, "Date"),
            Self::Array(t) => write!(f, "Array<{}>", t),
            Self::Map(t) => write!(f, "Map<{}>", t),
        }
    }
}

/// The supported file formats from which we can load [`Value`] instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SupportedFormat {
    Json,
    Yaml,
    Toml,
}

impl SupportedFormat {
    /// Detect the format of a file from its extension.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let ext =
            extension(path).ok_or_else(|| Error::CannotDetermineFileType(path.to_path_buf()))?;
        Self::from_str(&ext)
    }
}

impl FromStr for SupportedFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Ok(match lower.as_ref() {
            "json" => Self::Json,
            "yaml" | "yml" => Self::Yaml,
            "toml" => Self::Toml,
            _ => return Err(Error::UnsupportedFileType(s.to_string())),
        })
    }
}

/// A dynamically typed field value.
///
/// Records are loaded from loosely typed sources, so every field is one of
/// these. Dates usually arrive as strings; see [`Value::as_date`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Null,
    Bool(bool),
    Signed(i64),
    Unsigned(u64),
    Fixed(Fixed),
    String(String),
    Date(Date),
    Array(Vec<Value>),
    Map(Map<String, Value>),
}

impl Value {
    /// Attempts to create a new value by parsing it from a string using the
    /// given format.
    pub fn load_as(fmt: SupportedFormat, content: &str) -> Result<Self, Error> {
        match fmt {
            SupportedFormat::Json => Self::try_from(serde_json::from_str::<JsonValue>(content)?),
            SupportedFormat::Yaml => Self::try_from(serde_yaml::from_str::<YamlValue>(content)?),
            SupportedFormat::Toml => Self::try_from(toml::from_str::<TomlValue>(content)?),
        }
    }

    /// Attempts to create a new value by loading it from the given file.
    /// Automatically detects the file format and parses/converts it
    /// accordingly.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let fmt = SupportedFormat::from_path(path)
            .map_err(|e| Error::LoadFromFile(path.to_path_buf(), Box::new(e)))?;
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Io(format!("while trying to read from {}", path.display()), e))?;
        Self::load_as(fmt, &content).map_err(|e| Error::LoadFromFile(path.to_path_buf(), Box::new(e)))
    }

    /// Interpret a raw string, e.g. from the command line, as a scalar value.
    ///
    /// Integers become numbers, `true`/`false` become booleans and anything
    /// else is kept as a string.
    pub fn parse_scalar(s: &str) -> Self {
        if let Ok(u) = s.parse::<u64>() {
            Self::Unsigned(u)
        } else if let Ok(i) = s.parse::<i64>() {
            Self::Signed(i)
        } else if let Ok(b) = s.parse::<bool>() {
            Self::Bool(b)
        } else {
            Self::String(s.to_string())
        }
    }

    /// Best-effort guess at the type of this value. Empty arrays and maps
    /// have elements of [`ValueType::Unknown`] type.
    pub fn get_type(&self) -> ValueType {
        match self {
            Self::Null => ValueType::Null,
            Self::Bool(_) => ValueType::Bool,
            Self::Signed(_) => ValueType::Signed,
            Self::Unsigned(_) => ValueType::Unsigned,
            Self::Fixed(_) => ValueType::Fixed,
            Self::String(_) => ValueType::String,
            Self::Date(_) => ValueType::Date,
            Self::Array(inner) => ValueType::Array(Box::new(
                inner
                    .first()
                    .map(Self::get_type)
                    .unwrap_or(ValueType::Unknown),
            )),
            Self::Map(inner) => ValueType::Map(Box::new(
                inner
                    .values()
                    .next()
                    .map(Self::get_type)
                    .unwrap_or(ValueType::Unknown),
            )),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(arr) => Some(arr.as_slice()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns this value as a date, parsing it if it is a string.
    pub fn as_date(&self) -> Option<Date> {
        match self {
            Self::Date(d) => Some(*d),
            Self::String(s) => Date::from_str(s).ok(),
            _ => None,
        }
    }

    /// Whether this value contains the given text. The needle is expected to
    /// already be lowercase.
    ///
    /// Only strings, and arrays of them, carry text.
    pub fn contains_text(&self, needle: &str) -> bool {
        match self {
            Self::String(s) => s.to_lowercase().contains(needle),
            Self::Array(arr) => arr.iter().any(|el| el.contains_text(needle)),
            _ => false,
        }
    }

    /// Exact matching as used by field selectors: the values are equal, or
    /// this value is an array holding the other as one of its elements.
    pub fn matches(&self, other: &Value) -> bool {
        if self.loose_eq(other) {
            return true;
        }
        match self {
            Self::Array(arr) => arr.iter().any(|el| el.loose_eq(other)),
            _ => false,
        }
    }

    /// Equality that ignores how a number or a date happens to be stored, so
    /// `Signed(1)` equals `Unsigned(1)` and `Date(2023-10-15)` equals
    /// `String("2023-10-15")`. Strings are compared case-sensitively.
    pub fn loose_eq(&self, other: &Value) -> bool {
        self.compare(other) == Ordering::Equal
    }

    /// Total ordering over values, used for sorting.
    ///
    /// Values of different kinds are ranked null < bool < number <
    /// string/date < array < map. Numbers compare numerically regardless of
    /// representation. Dates compare against strings through their ISO form.
    pub fn compare(&self, other: &Value) -> Ordering {
        if let Some(ord) = compare_numbers(self, other) {
            return ord;
        }
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::String(a), Self::String(b)) => a.cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::Date(a), Self::String(b)) => a.to_string().as_str().cmp(b.as_str()),
            (Self::String(a), Self::Date(b)) => a.as_str().cmp(b.to_string().as_str()),
            (Self::Array(a), Self::Array(b)) => compare_seq(a.iter(), b.iter()),
            (Self::Map(a), Self::Map(b)) => {
                for ((ka, va), (kb, vb)) in a.iter().zip(b.iter()) {
                    let ord = ka.cmp(kb).then_with(|| va.compare(vb));
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Signed(_) | Self::Unsigned(_) | Self::Fixed(_) => 2,
            Self::String(_) | Self::Date(_) => 3,
            Self::Array(_) => 4,
            Self::Map(_) => 5,
        }
    }

    fn integer(&self) -> Option<i128> {
        match self {
            Self::Signed(i) => Some(i128::from(*i)),
            Self::Unsigned(u) => Some(i128::from(*u)),
            _ => None,
        }
    }
}

fn compare_numbers(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Fixed(x), Value::Fixed(y)) => Some(x.cmp(y)),
        (Value::Fixed(x), other) => other.integer().map(|i| compare_fixed_int(*x, i)),
        (other, Value::Fixed(y)) => other.integer().map(|i| compare_fixed_int(*y, i).reverse()),
        _ => match (a.integer(), b.integer()) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => None,
        },
    }
}

fn compare_fixed_int(f: Fixed, i: i128) -> Ordering {
    match Fixed::checked_from_num(i) {
        Some(fi) => f.cmp(&fi),
        // The integer lies outside the fixed-point range altogether.
        None if i > 0 => Ordering::Less,
        None => Ordering::Greater,
    }
}

fn compare_seq<'a, I>(mut a: I, mut b: I) -> Ordering
where
    I: Iterator<Item = &'a Value>,
{
    loop {
        match (a.next(), b.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = x.compare(y);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Signed(i) => write!(f, "{}", i),
            Self::Unsigned(u) => write!(f, "{}", u),
            Self::Fixed(x) => write!(f, "{}", x),
            Self::String(s) => write!(f, "{}", s),
            Self::Date(d) => write!(f, "{}", d),
            Self::Array(_) | Self::Map(_) => write!(f, "{}", JsonValue::from(self.clone())),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Signed(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Signed(i)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Self::Unsigned(u)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Date> for Value {
    fn from(d: Date) -> Self {
        Self::Date(d)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}

impl From<Map<String, Value>> for Value {
    fn from(m: Map<String, Value>) -> Self {
        Self::Map(m)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Signed(i) => serializer.serialize_i64(*i),
            Value::Unsigned(u) => serializer.serialize_u64(*u),
            Value::Fixed(f) => serializer.serialize_f64(f.to_num::<f64>()),
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(d) => serializer.serialize_str(&d.to_string()),
            Value::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for el in arr {
                    seq.serialize_element(el)?;
                }
                seq.end()
            }
            Value::Map(m) => {
                let mut sm = serializer.serialize_map(Some(m.len()))?;
                for (k, v) in m {
                    sm.serialize_entry(k, v)?;
                }
                sm.end()
            }
        }
    }
}

impl From<Value> for JsonValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => Self::Null,
            Value::Bool(b) => JsonValue::Bool(b),
            Value::Signed(i) => i.into(),
            Value::Unsigned(u) => u.into(),
            Value::Fixed(f) => f.to_num::<f64>().into(),
            Value::String(s) => JsonValue::String(s),
            Value::Date(d) => JsonValue::String(d.to_string()),
            Value::Array(arr) => JsonValue::Array(arr.into_iter().map(Into::into).collect()),
            Value::Map(m) => JsonValue::Object(JsonMap::from_iter(
                m.into_iter().map(|(k, v)| (k, v.into())),
            )),
        }
    }
}

impl TryFrom<JsonValue> for Value {
    type Error = Error;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        Ok(match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => Self::try_from(n)?,
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(arr) => Self::Array(
                arr.into_iter()
                    .map(TryInto::try_into)
                    .collect::<Result<Vec<Self>, Error>>()?,
            ),
            JsonValue::Object(obj) => Self::Map(
                obj.into_iter()
                    .map(|(k, v)| Ok((k, v.try_into()?)))
                    .collect::<Result<Map<String, Self>, Error>>()?,
            ),
        })
    }
}

impl TryFrom<JsonNumber> for Value {
    type Error = Error;

    fn try_from(value: JsonNumber) -> Result<Self, Self::Error> {
        if let Some(i) = value.as_i64() {
            Ok(Self::Signed(i))
        } else if let Some(u) = value.as_u64() {
            Ok(Self::Unsigned(u))
        } else {
            fixed_from_f64(value.as_f64().unwrap_or(f64::NAN))
        }
    }
}

impl TryFrom<YamlValue> for Value {
    type Error = Error;

    fn try_from(value: YamlValue) -> Result<Self, Self::Error> {
        Ok(match value {
            YamlValue::Null => Self::Null,
            YamlValue::Bool(b) => Self::Bool(b),
            YamlValue::Number(n) => Self::try_from(n)?,
            YamlValue::String(s) => Self::String(s),
            YamlValue::Sequence(seq) => Self::Array(
                seq.into_iter()
                    .map(TryInto::try_into)
                    .collect::<Result<Vec<Self>, Error>>()?,
            ),
            YamlValue::Mapping(m) => Self::Map(
                m.into_iter()
                    .map(|(k, v)| match k {
                        YamlValue::String(k) => Ok((k, v.try_into()?)),
                        _ => Err(Error::ObjectKeysMustBeStrings),
                    })
                    .collect::<Result<Map<String, Self>, Error>>()?,
            ),
        })
    }
}

impl TryFrom<YamlNumber> for Value {
    type Error = Error;

    fn try_from(value: YamlNumber) -> Result<Self, Self::Error> {
        if let Some(i) = value.as_i64() {
            Ok(Self::Signed(i))
        } else if let Some(u) = value.as_u64() {
            Ok(Self::Unsigned(u))
        } else {
            fixed_from_f64(value.as_f64().unwrap_or(f64::NAN))
        }
    }
}

impl TryFrom<TomlValue> for Value {
    type Error = Error;

    fn try_from(value: TomlValue) -> Result<Self, Self::Error> {
        Ok(match value {
            TomlValue::String(s) => Self::String(s),
            TomlValue::Integer(i) => Self::Signed(i),
            TomlValue::Float(f) => fixed_from_f64(f)?,
            TomlValue::Boolean(b) => Self::Bool(b),
            // Local dates parse into dates; anything with a time component is
            // kept verbatim.
            TomlValue::Datetime(dt) => {
                let s = dt.to_string();
                match Date::from_str(&s) {
                    Ok(d) => Self::Date(d),
                    Err(_) => Self::String(s),
                }
            }
            TomlValue::Array(arr) => Self::Array(
                arr.into_iter()
                    .map(TryInto::try_into)
                    .collect::<Result<Vec<Self>, Error>>()?,
            ),
            TomlValue::Table(t) => Self::Map(
                t.into_iter()
                    .map(|(k, v)| Ok((k, Self::try_from(v)?)))
                    .collect::<Result<Map<String, Self>, Error>>()?,
            ),
        })
    }
}

fn fixed_from_f64(f: f64) -> Result<Value, Error> {
    Fixed::checked_from_num(f)
        .map(Value::Fixed)
        .ok_or(Error::NumberOutOfRange(f))
}

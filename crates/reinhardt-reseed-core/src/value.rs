//! Cell values and key values.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde_json::Value;

/// A single table cell.
///
/// A float holding a whole number in `i64` range equals the matching integer,
/// so a key written as `1.0` still matches a key written as `1`. Other floats
/// compare and hash by bit pattern so that values can key hash maps; `NaN`
/// equals itself.
#[derive(Debug, Clone)]
pub enum CellValue {
	/// SQL NULL.
	Null,
	/// Boolean.
	Bool(bool),
	/// Integer.
	Integer(i64),
	/// Floating point number.
	Float(f64),
	/// Text.
	Text(String),
}

impl CellValue {
	/// Returns true for NULL.
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}
}

/// The identity a [`CellValue`] compares and hashes by.
#[derive(PartialEq, Eq, Hash)]
enum Identity<'a> {
	Null,
	Bool(bool),
	Integer(i64),
	FloatBits(u64),
	Text(&'a str),
}

impl CellValue {
	fn identity(&self) -> Identity<'_> {
		match self {
			Self::Null => Identity::Null,
			Self::Bool(value) => Identity::Bool(*value),
			Self::Integer(value) => Identity::Integer(*value),
			Self::Float(value) => {
				whole_number(*value).map_or(Identity::FloatBits(value.to_bits()), Identity::Integer)
			}
			Self::Text(value) => Identity::Text(value),
		}
	}
}

/// Returns the integer a float holds exactly, if any.
fn whole_number(value: f64) -> Option<i64> {
	// `i64::MAX as f64` rounds up to 2^63, which no longer fits.
	let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
	(in_range && value.fract() == 0.0).then_some(value as i64)
}

impl PartialEq for CellValue {
	fn eq(&self, other: &Self) -> bool {
		self.identity() == other.identity()
	}
}

impl Eq for CellValue {}

impl Hash for CellValue {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.identity().hash(state);
	}
}

impl fmt::Display for CellValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Null => f.write_str("NULL"),
			Self::Bool(value) => write!(f, "{}", value),
			Self::Integer(value) => write!(f, "{}", value),
			Self::Float(value) => write!(f, "{}", value),
			Self::Text(value) => write!(f, "'{}'", value.replace('\'', "''")),
		}
	}
}

impl TryFrom<&Value> for CellValue {
	type Error = String;

	fn try_from(value: &Value) -> Result<Self, Self::Error> {
		match value {
			Value::Null => Ok(Self::Null),
			Value::Bool(value) => Ok(Self::Bool(*value)),
			Value::Number(number) => {
				if let Some(integer) = number.as_i64() {
					Ok(Self::Integer(integer))
				} else if number.is_u64() {
					Err(format!("integer {} is out of range", number))
				} else {
					number
						.as_f64()
						.map(Self::Float)
						.ok_or_else(|| format!("unsupported number {}", number))
				}
			}
			Value::String(text) => Ok(Self::Text(text.clone())),
			Value::Array(_) => Err("arrays cannot be stored in a cell".to_string()),
			Value::Object(_) => Err("objects cannot be stored in a cell".to_string()),
		}
	}
}

impl From<i64> for CellValue {
	fn from(value: i64) -> Self {
		Self::Integer(value)
	}
}

impl From<i32> for CellValue {
	fn from(value: i32) -> Self {
		Self::Integer(value.into())
	}
}

impl From<bool> for CellValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<f64> for CellValue {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<&str> for CellValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for CellValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Null, Into::into)
	}
}

/// The values of a key's columns for one row, in key order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyValue(Vec<CellValue>);

impl KeyValue {
	/// Creates a key value.
	pub fn new(values: Vec<CellValue>) -> Self {
		Self(values)
	}

	/// Returns the values in key order.
	pub fn values(&self) -> &[CellValue] {
		&self.0
	}

	/// Returns true if any component is NULL.
	///
	/// Such a key never references anything.
	pub fn has_null(&self) -> bool {
		self.0.iter().any(CellValue::is_null)
	}
}

impl fmt::Display for KeyValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("(")?;
		for (index, value) in self.0.iter().enumerate() {
			if index > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{}", value)?;
		}
		f.write_str(")")
	}
}

impl FromIterator<CellValue> for KeyValue {
	fn from_iter<I: IntoIterator<Item = CellValue>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

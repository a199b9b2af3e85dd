//! Field-keyed marshaling contract for the data-model types.
//!
//! The core does not define a wire format. It defines a structured
//! read/write contract — named scalar fields bracketed by a type name
//! and a version tag — that external serializers implement. Readers
//! declare an accepted version range, permitting forward-compatible
//! schema evolution. [`MarshalStore`] is the in-memory reference
//! implementation used by round-trip tests.

use std::error::Error;
use std::fmt;

use indexmap::IndexMap;

/// Destination for named scalar fields.
///
/// Implementations must preserve field order; readers may rely on it.
pub trait MarshalWriter {
    /// Open a type block with its schema version.
    fn begin(&mut self, type_name: &str, version: i32);
    /// Close the current type block.
    fn end(&mut self, type_name: &str);
    /// Write a named `f64` field.
    fn write_f64(&mut self, name: &str, v: f64);
    /// Write a named `i32` field.
    fn write_i32(&mut self, name: &str, v: i32);
    /// Write a named `usize` field.
    fn write_usize(&mut self, name: &str, v: usize);
}

/// Source of named scalar fields.
pub trait MarshalReader {
    /// Open a type block, accepting versions in `[min_version, max_version]`.
    ///
    /// Returns the stored version on success.
    fn begin(
        &mut self,
        type_name: &str,
        min_version: i32,
        max_version: i32,
    ) -> Result<i32, MarshalError>;
    /// Close the current type block.
    fn end(&mut self, type_name: &str) -> Result<(), MarshalError>;
    /// Read a named `f64` field.
    fn read_f64(&mut self, name: &str) -> Result<f64, MarshalError>;
    /// Read a named `i32` field.
    fn read_i32(&mut self, name: &str) -> Result<i32, MarshalError>;
    /// Read a named `usize` field.
    fn read_usize(&mut self, name: &str) -> Result<usize, MarshalError>;
}

/// A type that can round-trip through the marshaling contract.
pub trait Marshalable: Sized {
    /// Type name written into the block header.
    const TYPE_NAME: &'static str;

    /// Write every field, bracketed by a version tag.
    fn marshal(&self, w: &mut dyn MarshalWriter);

    /// Reconstruct from named fields.
    fn unmarshal(r: &mut dyn MarshalReader) -> Result<Self, MarshalError>;
}

/// Errors from reading marshaled data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarshalError {
    /// A named field was absent.
    MissingField {
        /// Fully qualified field name.
        name: String,
    },
    /// A named field held a different scalar kind than requested.
    WrongFieldType {
        /// Fully qualified field name.
        name: String,
    },
    /// The stored version is outside the reader's accepted range.
    VersionOutOfRange {
        /// Type whose block was being opened.
        type_name: String,
        /// Version found in the data.
        version: i32,
        /// Minimum accepted version.
        min_version: i32,
        /// Maximum accepted version.
        max_version: i32,
    },
    /// Block open/close calls did not nest properly.
    BadNesting {
        /// Description of the mismatch.
        detail: String,
    },
}

impl fmt::Display for MarshalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { name } => write!(f, "missing field '{name}'"),
            Self::WrongFieldType { name } => write!(f, "field '{name}' has wrong type"),
            Self::VersionOutOfRange {
                type_name,
                version,
                min_version,
                max_version,
            } => write!(
                f,
                "{type_name} version {version} outside accepted range \
                 [{min_version}, {max_version}]"
            ),
            Self::BadNesting { detail } => write!(f, "bad block nesting: {detail}"),
        }
    }
}

impl Error for MarshalError {}

/// Scalar value kinds storable in a [`MarshalStore`].
#[derive(Clone, Copy, Debug, PartialEq)]
enum Scalar {
    F64(f64),
    I32(i32),
    USize(usize),
}

/// In-memory, insertion-ordered field store.
///
/// Field keys are `"Type.field"`; version tags are stored under the
/// bare type name. Used as the reference implementation in round-trip
/// tests and by collaborators that stage fields before encoding.
#[derive(Clone, Debug, Default)]
pub struct MarshalStore {
    fields: IndexMap<String, Scalar>,
    open: Vec<String>,
}

impl MarshalStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored fields, version tags included.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the store holds no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn key(&self, name: &str) -> String {
        match self.open.last() {
            Some(type_name) => format!("{type_name}.{name}"),
            None => name.to_string(),
        }
    }

    fn get(&self, name: &str) -> Result<Scalar, MarshalError> {
        let key = self.key(name);
        self.fields
            .get(&key)
            .copied()
            .ok_or(MarshalError::MissingField { name: key })
    }
}

impl MarshalWriter for MarshalStore {
    fn begin(&mut self, type_name: &str, version: i32) {
        self.fields.insert(type_name.to_string(), Scalar::I32(version));
        self.open.push(type_name.to_string());
    }

    fn end(&mut self, type_name: &str) {
        match self.open.pop() {
            Some(open) if open == type_name => {}
            open => panic!(
                "marshal end('{type_name}') does not match open block {open:?}"
            ),
        }
    }

    fn write_f64(&mut self, name: &str, v: f64) {
        let key = self.key(name);
        self.fields.insert(key, Scalar::F64(v));
    }

    fn write_i32(&mut self, name: &str, v: i32) {
        let key = self.key(name);
        self.fields.insert(key, Scalar::I32(v));
    }

    fn write_usize(&mut self, name: &str, v: usize) {
        let key = self.key(name);
        self.fields.insert(key, Scalar::USize(v));
    }
}

impl MarshalReader for MarshalStore {
    fn begin(
        &mut self,
        type_name: &str,
        min_version: i32,
        max_version: i32,
    ) -> Result<i32, MarshalError> {
        let version = match self.fields.get(type_name) {
            Some(Scalar::I32(v)) => *v,
            Some(_) => {
                return Err(MarshalError::WrongFieldType {
                    name: type_name.to_string(),
                })
            }
            None => {
                return Err(MarshalError::MissingField {
                    name: type_name.to_string(),
                })
            }
        };
        if version < min_version || version > max_version {
            return Err(MarshalError::VersionOutOfRange {
                type_name: type_name.to_string(),
                version,
                min_version,
                max_version,
            });
        }
        self.open.push(type_name.to_string());
        Ok(version)
    }

    fn end(&mut self, type_name: &str) -> Result<(), MarshalError> {
        match self.open.pop() {
            Some(open) if open == type_name => Ok(()),
            open => Err(MarshalError::BadNesting {
                detail: format!("end('{type_name}') does not match open block {open:?}"),
            }),
        }
    }

    fn read_f64(&mut self, name: &str) -> Result<f64, MarshalError> {
        match self.get(name)? {
            Scalar::F64(v) => Ok(v),
            _ => Err(MarshalError::WrongFieldType { name: self.key(name) }),
        }
    }

    fn read_i32(&mut self, name: &str) -> Result<i32, MarshalError> {
        match self.get(name)? {
            Scalar::I32(v) => Ok(v),
            _ => Err(MarshalError::WrongFieldType { name: self.key(name) }),
        }
    }

    fn read_usize(&mut self, name: &str) -> Result<usize, MarshalError> {
        match self.get(name)? {
            Scalar::USize(v) => Ok(v),
            _ => Err(MarshalError::WrongFieldType { name: self.key(name) }),
        }
    }
}

//! Schema declarations for record tables.
//!
//! A schema is the ordered list of field names every record in a table carries.
//! Fields may additionally declare a value kind, which is checked whenever a value
//! enters the table (append, update, or load through `load_with_schema`).

use std::collections::HashSet;

use crate::store::{Record, StoreError};

/// The kind of value a field accepts. Values are always stored as text on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer { min: i64, max: i64 },
    Choice(&'static [&'static str]),
}

impl FieldKind {
    /// Returns the reason a value is rejected, or `None` if it is accepted.
    pub fn rejection(&self, value: &str) -> Option<String> {
        match self {
            FieldKind::Text => None,
            FieldKind::Integer { min, max } => match value.trim().parse::<i64>() {
                Ok(n) if (*min..=*max).contains(&n) => None,
                Ok(n) => Some(format!("{n} is outside {min}..={max}")),
                Err(_) => Some("not an integer".to_string()),
            },
            FieldKind::Choice(options) => {
                if options.contains(&value) {
                    None
                } else {
                    Some(format!("expected one of: {}", options.join(", ")))
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
}

impl Field {
    pub fn text(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Text,
        }
    }

    pub fn integer(name: &str, min: i64, max: i64) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Integer { min, max },
        }
    }

    pub fn choice(name: &str, options: &'static [&'static str]) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Choice(options),
        }
    }
}

/// Ordered, fixed set of fields shared by every record of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Builds an all-text schema from bare field names, as found in a file header
    /// or in the first record appended to an empty table.
    pub fn untyped<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            fields: names.into_iter().map(|n| Field::text(n.as_ref())).collect(),
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns the first duplicated field name, if any.
    pub fn duplicate_name(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.field_names().find(|name| !seen.insert(*name))
    }

    /// Checks that `record` carries exactly this schema's fields and that every value
    /// satisfies its field kind. Returns the record with its fields in schema order.
    pub fn conform(&self, record: Record) -> Result<Record, StoreError> {
        let mismatch = || StoreError::SchemaMismatch {
            expected: self.field_names().map(String::from).collect(),
            found: record.field_names().map(String::from).collect(),
        };

        if record.len() != self.len() || record.duplicate_name().is_some() {
            return Err(mismatch());
        }

        let mut ordered = Record::new();
        for field in &self.fields {
            let value = record.get(&field.name).ok_or_else(mismatch)?;
            self.check_value(field, value)?;
            ordered = ordered.with(field.name.as_str(), value);
        }
        Ok(ordered)
    }

    pub(crate) fn check_value(&self, field: &Field, value: &str) -> Result<(), StoreError> {
        match field.kind.rejection(value) {
            None => Ok(()),
            Some(reason) => Err(StoreError::InvalidValue {
                field: field.name.clone(),
                value: value.to_string(),
                reason,
            }),
        }
    }
}

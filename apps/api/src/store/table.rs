use std::collections::HashSet;

use crate::store::{Schema, StoreError};

/// One row: an ordered list of (field name, value) pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. Does not deduplicate; a repeated name is caught when the
    /// record is appended to a table.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn duplicate_name(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.field_names().find(|name| !seen.insert(*name))
    }

    fn set(&mut self, name: &str, value: String) -> bool {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => {
                *v = value;
                true
            }
            None => false,
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// An ordered sequence of records sharing one schema.
///
/// A table loaded from a missing file has no schema until the first append.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    schema: Option<Schema>,
    records: Vec<Record>,
}

impl Table {
    /// Empty table whose schema is fixed by the first appended record.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Empty table with a declared schema.
    pub fn with_schema(schema: Schema) -> Self {
        Self {
            schema: Some(schema),
            records: Vec::new(),
        }
    }

    /// Assembles a table from rows already known to match `schema` in order and arity.
    pub(crate) fn from_parts(schema: Schema, records: Vec<Record>) -> Self {
        Self {
            schema: Some(schema),
            records,
        }
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns a new table with `record` after the last existing record.
    ///
    /// On a schema-less table the record's own fields become the schema.
    pub fn append(&self, record: Record) -> Result<Table, StoreError> {
        let schema = match &self.schema {
            Some(schema) => schema.clone(),
            None => {
                if record.is_empty() || record.duplicate_name().is_some() {
                    return Err(StoreError::SchemaMismatch {
                        expected: Vec::new(),
                        found: record.field_names().map(String::from).collect(),
                    });
                }
                Schema::untyped(record.field_names())
            }
        };

        let record = schema.conform(record)?;
        let mut records = Vec::with_capacity(self.records.len() + 1);
        records.extend(self.records.iter().cloned());
        records.push(record);

        Ok(Table {
            schema: Some(schema),
            records,
        })
    }

    /// Returns a new table with `field` of the record at `index` set to `value`.
    pub fn update_field(
        &self,
        index: usize,
        field: &str,
        value: impl Into<String>,
    ) -> Result<Table, StoreError> {
        if index >= self.records.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }
        // A non-empty table always has a schema.
        let schema = self
            .schema
            .as_ref()
            .ok_or(StoreError::SchemaNotEstablished)?;
        let declared = schema
            .field(field)
            .ok_or_else(|| StoreError::UnknownField(field.to_string()))?;

        let value = value.into();
        schema.check_value(declared, &value)?;

        let mut next = self.clone();
        next.records[index].set(field, value);
        Ok(next)
    }
}

use std::sync::Arc;

use crate::error::RecordError;
use crate::schema::RecordSchema;
use crate::value::Value;

/// Record instance bound to a record schema.
///
/// Holds one slot per field position; `None` means the field was never set.
/// Created per decode/convert call and handed to the caller afterwards.
#[derive(Debug, Clone)]
pub struct Record {
    schema: Arc<RecordSchema>,
    values: Vec<Option<Value>>,
}

impl Record {
    /// Fresh instance, every field unset.
    pub fn new(schema: Arc<RecordSchema>) -> Self {
        let values = vec![None; schema.len()];
        Self { schema, values }
    }

    /// Instance seeded from a prior one.
    ///
    /// Values are carried over by field name, so a prior instance of an
    /// older or newer shape still seeds whatever fields the two share.
    pub fn seeded(schema: Arc<RecordSchema>, old: &Record) -> Self {
        if Arc::ptr_eq(&schema, &old.schema) || *schema == *old.schema {
            return Self {
                schema,
                values: old.values.clone(),
            };
        }
        let values = schema
            .fields
            .iter()
            .map(|f| old.get_by_name(&f.name).cloned())
            .collect();
        Self { schema, values }
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    /// Value at `name`/`pos`; `Ok(None)` when the field is unset.
    pub fn get(&self, name: &str, pos: usize) -> Result<Option<&Value>, RecordError> {
        self.check(name, pos)?;
        Ok(self.values[pos].as_ref())
    }

    pub fn put(&mut self, name: &str, pos: usize, value: Value) -> Result<(), RecordError> {
        self.check(name, pos)?;
        self.values[pos] = Some(value);
        Ok(())
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        let field = self.schema.field(name)?;
        self.values[field.position].as_ref()
    }

    /// True when no field has been set.
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// `(field name, value)` in position order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.schema
            .fields
            .iter()
            .zip(&self.values)
            .map(|(f, v)| (f.name.as_str(), v.as_ref()))
    }

    /// JSON object keyed by field name; unset fields render as `null`.
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .iter()
            .map(|(name, v)| {
                (
                    name.to_string(),
                    v.map(Value::to_json).unwrap_or(serde_json::Value::Null),
                )
            })
            .collect();
        serde_json::Value::Object(map)
    }

    fn check(&self, name: &str, pos: usize) -> Result<(), RecordError> {
        let field = self
            .schema
            .field(name)
            .ok_or_else(|| RecordError::UnknownField {
                record: self.schema.name.clone(),
                field: name.to_string(),
            })?;
        if field.position != pos {
            return Err(RecordError::PositionMismatch {
                record: self.schema.name.clone(),
                field: name.to_string(),
                expected: field.position,
                actual: pos,
            });
        }
        Ok(())
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.schema, &other.schema) || self.schema == other.schema)
            && self.values == other.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;

    fn schema(names: &[&str]) -> Arc<RecordSchema> {
        Arc::new(
            RecordSchema::new(
                "r",
                names.iter().map(|n| (n.to_string(), Schema::int32(), None)),
            )
            .unwrap(),
        )
    }

    #[test]
    fn fresh_record_is_unset() {
        let r = Record::new(schema(&["a", "b"]));
        assert!(r.is_empty());
        assert_eq!(r.get("a", 0).unwrap(), None);
        assert_eq!(r.to_json(), serde_json::json!({"a": null, "b": null}));
    }

    #[test]
    fn put_checks_name_and_position() {
        let mut r = Record::new(schema(&["a", "b"]));
        r.put("b", 1, Value::Int(7)).unwrap();
        assert_eq!(r.get_by_name("b"), Some(&Value::Int(7)));

        let err = r.put("b", 0, Value::Int(1)).unwrap_err();
        assert!(matches!(err, RecordError::PositionMismatch { expected: 1, actual: 0, .. }));
        let err = r.put("zz", 0, Value::Int(1)).unwrap_err();
        assert!(matches!(err, RecordError::UnknownField { .. }));
    }

    #[test]
    fn seeded_carries_values_by_name() {
        let mut old = Record::new(schema(&["a", "b"]));
        old.put("a", 0, Value::Int(1)).unwrap();
        old.put("b", 1, Value::Int(2)).unwrap();

        let same = Record::seeded(old.schema().clone(), &old);
        assert_eq!(same, old);

        let wider = Record::seeded(schema(&["b", "c", "a"]), &old);
        assert_eq!(wider.get("b", 0).unwrap(), Some(&Value::Int(2)));
        assert_eq!(wider.get("c", 1).unwrap(), None);
        assert_eq!(wider.get("a", 2).unwrap(), Some(&Value::Int(1)));
    }
}

use recast_api::{Field, RecordSchema, Schema};

/// Where the value of a reader field comes from.
#[derive(Debug)]
pub enum FieldSource<'s> {
    /// The writer serialized this field. `skip` lists the writer-only
    /// fields encoded immediately before it.
    Written {
        skip: Vec<&'s Schema>,
        writer: &'s Schema,
    },
    /// The writer's schema has no such field.
    Absent,
}

#[derive(Debug)]
pub struct ResolvedField<'s> {
    pub field: &'s Field,
    pub source: FieldSource<'s>,
}

/// Reader fields in the order the writer encoded them.
#[derive(Debug)]
pub struct FieldOrder<'s> {
    pub fields: Vec<ResolvedField<'s>>,
    /// Writer-only fields after the last shared one.
    pub trailing: Vec<&'s Schema>,
}

/// Resolve the read order of `reader`'s fields against the `writer` encoding.
///
/// Shared fields (matched by name) come first, in writer order. Reader
/// fields the writer never declared follow, in reader order.
pub fn read_field_order<'s>(writer: &'s RecordSchema, reader: &'s RecordSchema) -> FieldOrder<'s> {
    let mut fields = Vec::with_capacity(reader.len());
    let mut seen = vec![false; reader.len()];
    let mut skip = Vec::new();

    for wf in &writer.fields {
        match reader.field(&wf.name) {
            Some(rf) => {
                seen[rf.position] = true;
                fields.push(ResolvedField {
                    field: rf,
                    source: FieldSource::Written {
                        skip: std::mem::take(&mut skip),
                        writer: &wf.schema,
                    },
                });
            }
            None => skip.push(&wf.schema),
        }
    }

    for rf in &reader.fields {
        if !seen[rf.position] {
            fields.push(ResolvedField {
                field: rf,
                source: FieldSource::Absent,
            });
        }
    }

    FieldOrder {
        fields,
        trailing: skip,
    }
}

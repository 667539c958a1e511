use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::DatabaseError;

pub const TRAINING_ITEMS: &str = "training_content";
pub const EMPLOYEES: &str = "employees";
pub const QUIZZES: &str = "assessments";
pub const QUIZ_RESULTS: &str = "employee_assessment_results";
pub const CERTIFICATES: &str = "certificates";

/// A stored record: the store-assigned identity plus its JSON body.
///
/// Bodies never carry their own `id`; it is injected when the document is
/// decoded into a model.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub body: Value,
}

impl Document {
    pub fn new(id: Uuid, body: Value) -> Self {
        Self { id, body }
    }

    pub fn into_record<T: DeserializeOwned>(self) -> Result<T, DatabaseError> {
        let mut body = match self.body {
            Value::Object(map) => map,
            other => {
                return Err(DatabaseError::InvalidInput(format!(
                    "document {} is not an object: {}",
                    self.id, other
                )))
            }
        };
        body.insert("id".to_string(), Value::String(self.id.to_string()));
        Ok(serde_json::from_value(Value::Object(body))?)
    }
}

/// Serialize a record into a storable body, dropping any `id` field.
pub fn to_body<T: Serialize>(record: &T) -> Result<Value, DatabaseError> {
    let mut value = serde_json::to_value(record)?;
    match value.as_object_mut() {
        Some(map) => {
            map.remove("id");
            Ok(value)
        }
        None => Err(DatabaseError::InvalidInput(
            "records must serialize to JSON objects".to_string(),
        )),
    }
}

/// Conjunction of top-level field equalities. Only scalar values are
/// supported; array fields are not matched element-wise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    /// Matches every document in the collection.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn matches(&self, body: &Value) -> bool {
        self.conditions
            .iter()
            .all(|(field, expected)| body.get(field) == Some(expected))
    }

    /// The filter as a JSON object, suitable for `jsonb @>` containment.
    pub fn to_containment(&self) -> Value {
        let map: Map<String, Value> = self.conditions.iter().cloned().collect();
        Value::Object(map)
    }
}

/// A single field-level write applied by [`DocumentStore::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    Set { field: String, value: Value },
    /// Append `value` to the array at `field` unless it is already present.
    ArrayUnion { field: String, value: Value },
    Increment { field: String, by: i64 },
}

impl Patch {
    pub fn set(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Patch::Set {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn array_union(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Patch::ArrayUnion {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn increment(field: impl Into<String>, by: i64) -> Self {
        Patch::Increment {
            field: field.into(),
            by,
        }
    }

    /// Apply the patch to an in-memory body.
    pub fn apply(&self, body: &mut Map<String, Value>) -> Result<(), DatabaseError> {
        match self {
            Patch::Set { field, value } => {
                body.insert(field.clone(), value.clone());
            }
            Patch::ArrayUnion { field, value } => {
                let slot = body
                    .entry(field.clone())
                    .or_insert_with(|| Value::Array(Vec::new()));
                if slot.is_null() {
                    *slot = Value::Array(Vec::new());
                }
                let items = slot.as_array_mut().ok_or_else(|| {
                    DatabaseError::InvalidInput(format!("field `{}` is not an array", field))
                })?;
                if !items.contains(value) {
                    items.push(value.clone());
                }
            }
            Patch::Increment { field, by } => {
                let current = match body.get(field) {
                    None | Some(Value::Null) => 0,
                    Some(v) => v.as_i64().ok_or_else(|| {
                        DatabaseError::InvalidInput(format!("field `{}` is not an integer", field))
                    })?,
                };
                body.insert(field.clone(), Value::from(current + by));
            }
        }
        Ok(())
    }
}

/// The persistence capability the portal runs on: a collection-scoped
/// document store with no cross-document transactions.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: Uuid) -> Result<Option<Document>, DatabaseError>;

    /// Documents matching `filter`, in insertion order.
    async fn query(&self, collection: &str, filter: &Filter)
        -> Result<Vec<Document>, DatabaseError>;

    async fn add(&self, collection: &str, record: Value) -> Result<Uuid, DatabaseError>;

    /// Apply `patches` in order. Fails with `NotFound` if the document does
    /// not exist.
    async fn update(
        &self,
        collection: &str,
        id: Uuid,
        patches: &[Patch],
    ) -> Result<(), DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;
}

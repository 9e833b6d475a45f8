use super::models::{ArrayValue, Document, MapValue, Value, ValueType};
use super::snapshot::DocumentSnapshot;
use super::FirestoreError;
use crate::core::parse_error_response;
use reqwest::{header, StatusCode};
use reqwest_middleware::ClientWithMiddleware;
use serde::de::Error as _;
use serde::Serialize;
use serde_json::Value as Json;
use std::collections::HashMap;
use std::fmt;
use url::Url;

fn conversion_error(msg: String) -> FirestoreError {
    FirestoreError::SerializationError(serde_json::Error::custom(msg))
}

/// Decodes a Firestore field map into a JSON object.
pub(crate) fn fields_into_json(fields: HashMap<String, Value>) -> Result<Json, FirestoreError> {
    fields
        .into_iter()
        .map(|(name, value)| Ok((name, value.into_json()?)))
        .collect::<Result<serde_json::Map<_, _>, FirestoreError>>()
        .map(Json::Object)
}

/// Encodes a serializable struct as the `fields` of a document.
pub(crate) fn fields_from_serializable<T: Serialize>(
    value: &T,
) -> Result<HashMap<String, Value>, FirestoreError> {
    match serde_json::to_value(value)? {
        Json::Object(map) => map
            .into_iter()
            .map(|(name, v)| Ok((name, Value::from_json(v)?)))
            .collect(),
        other => Err(conversion_error(format!(
            "documents must be JSON objects, got {}",
            other
        ))),
    }
}

impl Value {
    /// Timestamps, bytes and references come back as their string form.
    pub(crate) fn into_json(self) -> Result<Json, FirestoreError> {
        let json = match self.value_type {
            ValueType::StringValue(s)
            | ValueType::TimestampValue(s)
            | ValueType::BytesValue(s)
            | ValueType::ReferenceValue(s) => Json::String(s),
            ValueType::IntegerValue(s) => {
                let n: i64 = s
                    .parse()
                    .map_err(|e| conversion_error(format!("bad integerValue '{}': {}", s, e)))?;
                Json::from(n)
            }
            ValueType::DoubleValue(d) => serde_json::Number::from_f64(d)
                .map(Json::Number)
                .ok_or_else(|| conversion_error(format!("bad doubleValue {}", d)))?,
            ValueType::BooleanValue(b) => Json::Bool(b),
            ValueType::NullValue(()) => Json::Null,
            ValueType::MapValue(map) => fields_into_json(map.fields)?,
            ValueType::ArrayValue(array) => Json::Array(
                array
                    .values
                    .into_iter()
                    .map(Value::into_json)
                    .collect::<Result<_, _>>()?,
            ),
            ValueType::GeoPointValue(point) => serde_json::json!({
                "latitude": point.latitude,
                "longitude": point.longitude,
            }),
        };
        Ok(json)
    }

    /// Whole numbers become `integerValue`, other numbers `doubleValue`.
    pub(crate) fn from_json(json: Json) -> Result<Self, FirestoreError> {
        let value_type = match json {
            Json::Null => ValueType::NullValue(()),
            Json::Bool(b) => ValueType::BooleanValue(b),
            Json::String(s) => ValueType::StringValue(s),
            Json::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => ValueType::IntegerValue(i.to_string()),
                (None, Some(d)) => ValueType::DoubleValue(d),
                (None, None) => return Err(conversion_error(format!("unsupported number {}", n))),
            },
            Json::Array(items) => ValueType::ArrayValue(ArrayValue {
                values: items
                    .into_iter()
                    .map(Value::from_json)
                    .collect::<Result<_, _>>()?,
            }),
            Json::Object(map) => ValueType::MapValue(MapValue {
                fields: map
                    .into_iter()
                    .map(|(name, v)| Ok((name, Value::from_json(v)?)))
                    .collect::<Result<_, FirestoreError>>()?,
            }),
        };
        Ok(Value { value_type })
    }
}

/// A reference to a single document, e.g. `app_config/android`.
#[derive(Clone)]
pub struct DocumentReference<'a> {
    pub(crate) client: &'a ClientWithMiddleware,
    pub(crate) path: String,
}

impl<'a> DocumentReference<'a> {
    /// The last path segment, i.e. the document ID.
    pub fn id(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }

    /// Reads the document. A missing document yields a snapshot whose
    /// `exists()` is `false`, not an error.
    pub async fn get(&self) -> Result<DocumentSnapshot<'a>, FirestoreError> {
        let response = self.client.get(&self.path).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(DocumentSnapshot::missing(self.clone()));
        }

        if !response.status().is_success() {
            return Err(FirestoreError::ApiError(
                parse_error_response(response, "Get document failed").await,
            ));
        }

        let doc: Document = response.json().await?;
        Ok(DocumentSnapshot::found(self.clone(), doc))
    }

    /// Writes `value` with merge semantics: only the top-level fields present
    /// in `value` are replaced, every other field of the document is kept.
    /// The document is created if it does not exist.
    pub async fn set_merge<T: Serialize>(&self, value: &T) -> Result<(), FirestoreError> {
        let fields = fields_from_serializable(value)?;

        let mut url = Url::parse(&self.path)
            .map_err(|e| FirestoreError::ApiError(format!("Invalid document URL: {}", e)))?;
        {
            let mut field_paths: Vec<&String> = fields.keys().collect();
            field_paths.sort();
            let mut query = url.query_pairs_mut();
            for field in field_paths {
                query.append_pair("updateMask.fieldPaths", field);
            }
        }

        let body = serde_json::to_vec(&serde_json::json!({ "fields": fields }))?;

        let response = self
            .client
            .patch(url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FirestoreError::ApiError(
                parse_error_response(response, "Set document failed").await,
            ));
        }

        Ok(())
    }

    /// Deletes the document. Deleting a document that does not exist succeeds.
    pub async fn delete(&self) -> Result<(), FirestoreError> {
        let response = self.client.delete(&self.path).send().await?;

        if !response.status().is_success() {
            return Err(FirestoreError::ApiError(
                parse_error_response(response, "Delete document failed").await,
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for DocumentReference<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentReference").field("path", &self.path).finish()
    }
}

/// A reference to a top-level collection, e.g. `users`.
#[derive(Clone)]
pub struct CollectionReference<'a> {
    pub(crate) client: &'a ClientWithMiddleware,
    pub(crate) path: String,
}

impl<'a> CollectionReference<'a> {
    pub fn doc(&self, document_id: &str) -> DocumentReference<'a> {
        DocumentReference {
            client: self.client,
            path: format!("{}/{}", self.path, document_id),
        }
    }
}

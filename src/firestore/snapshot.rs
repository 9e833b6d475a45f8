use super::models::{Document, ValueType};
use super::reference::{fields_into_json, DocumentReference};
use super::FirestoreError;
use serde::de::DeserializeOwned;

/// A snapshot of a document in Firestore.
///
/// It contains data read from a document in your Firestore database.
/// The data can be extracted with `.data()`.
#[derive(Debug, Clone)]
pub struct DocumentSnapshot<'a> {
    pub(crate) id: String,
    pub(crate) reference: DocumentReference<'a>,
    pub(crate) document: Option<Document>,
}

impl<'a> DocumentSnapshot<'a> {
    pub(crate) fn found(reference: DocumentReference<'a>, document: Document) -> Self {
        Self {
            id: reference.id().to_string(),
            reference,
            document: Some(document),
        }
    }

    pub(crate) fn missing(reference: DocumentReference<'a>) -> Self {
        Self {
            id: reference.id().to_string(),
            reference,
            document: None,
        }
    }

    /// The ID of the document.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The `DocumentReference` for the document.
    pub fn reference(&self) -> &DocumentReference<'a> {
        &self.reference
    }

    /// Returns `true` if the document exists.
    pub fn exists(&self) -> bool {
        self.document.is_some()
    }

    /// The time the document was last updated. Returns `None` if the document does not exist.
    pub fn update_time(&self) -> Option<&str> {
        self.document.as_ref().and_then(|d| d.update_time.as_deref())
    }

    /// Retrieves all fields in the document as a specific type.
    ///
    /// Returns `Ok(None)` if the document does not exist.
    pub fn data<T: DeserializeOwned>(&self) -> Result<Option<T>, FirestoreError> {
        if let Some(doc) = &self.document {
            let serde_value = fields_into_json(doc.fields.clone())?;
            let obj = serde_json::from_value(serde_value)?;
            Ok(Some(obj))
        } else {
            Ok(None)
        }
    }

    /// Retrieves a top-level field converted to `T`.
    pub fn get_field<T: DeserializeOwned>(&self, field: &str) -> Result<Option<T>, FirestoreError> {
        match self.document.as_ref().and_then(|doc| doc.fields.get(field)) {
            Some(value) => {
                let serde_value = value.clone().into_json()?;
                Ok(Some(serde_json::from_value(serde_value)?))
            }
            None => Ok(None),
        }
    }

    /// The raw wire value of a top-level field.
    pub fn field(&self, field: &str) -> Option<&ValueType> {
        self.document
            .as_ref()
            .and_then(|doc| doc.fields.get(field))
            .map(|value| &value.value_type)
    }

    /// The Firestore type tag of a top-level field, e.g. `"integer"` or `"string"`.
    pub fn field_type(&self, field: &str) -> Option<&'static str> {
        self.field(field).map(ValueType::type_name)
    }
}

/// A `QuerySnapshot` contains zero or more `DocumentSnapshot` objects.
#[derive(Debug, Clone)]
pub struct QuerySnapshot<'a> {
    pub(crate) documents: Vec<DocumentSnapshot<'a>>,
    pub(crate) read_time: Option<String>,
}

impl<'a> QuerySnapshot<'a> {
    /// The documents in this snapshot, in the order the backend returned them.
    pub fn documents(&self) -> &[DocumentSnapshot<'a>] {
        &self.documents
    }

    /// The number of documents in the snapshot.
    pub fn size(&self) -> usize {
        self.documents.len()
    }

    /// The time this snapshot was read.
    pub fn read_time(&self) -> Option<&str> {
        self.read_time.as_deref()
    }

    /// Iterates over the document snapshots.
    pub fn iter(&self) -> std::slice::Iter<'_, DocumentSnapshot<'a>> {
        self.documents.iter()
    }
}

//! Form schema type

use ahash::AHashMap;
use chrono::{DateTime, Utc};

use crate::error::Error;
use crate::field::Field;

/// A named, ordered collection of fields
///
/// Field order is display order only. Derived fields are always computed
/// from the entered values, never from each other.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FormSchema {
    /// Schema identifier
    pub id: String,
    /// Name shown in the saved-forms list
    pub name: String,
    /// Fields in display order
    pub fields: Vec<Field>,
    /// Creation time
    #[cfg_attr(feature = "serde", serde(default = "Utc::now"))]
    pub created_at: DateTime<Utc>,
}

impl FormSchema {
    /// Create an empty schema stamped with the current time
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            fields: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Append a field
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Get a field by id
    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Iterate over derived fields in display order
    pub fn derived_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_derived)
    }

    /// Check the derivation setup of the whole schema
    ///
    /// Reports duplicate ids, and for each derived field: a missing formula,
    /// parents that do not exist, the field listing itself, and parents that
    /// are derived themselves. Chains of derived fields are rejected rather
    /// than ordered.
    pub fn derivation_issues(&self) -> Vec<Error> {
        let mut issues = Vec::new();

        let mut by_id: AHashMap<&str, &Field> = AHashMap::with_capacity(self.fields.len());
        for field in &self.fields {
            if by_id.insert(field.id.as_str(), field).is_some() {
                issues.push(Error::DuplicateFieldId(field.id.clone()));
            }
        }

        for field in self.derived_fields() {
            if field.formula_text().is_none() {
                issues.push(Error::MissingFormula(field.id.clone()));
            }

            for parent in &field.parent_field_ids {
                if *parent == field.id {
                    issues.push(Error::SelfReference(field.id.clone()));
                    continue;
                }
                match by_id.get(parent.as_str()) {
                    None => issues.push(Error::UnknownParent {
                        field: field.id.clone(),
                        parent: parent.clone(),
                    }),
                    Some(p) if p.is_derived => issues.push(Error::DerivedParent {
                        field: field.id.clone(),
                        parent: parent.clone(),
                    }),
                    Some(_) => {}
                }
            }
        }

        issues
    }
}

//! Domain types
//!
//! `Brand` is the only record the server manages. `BrandForm` is the shape
//! both the add and edit forms must submit.

use std::collections::HashMap;
use std::fmt;

use crate::http::form::{self, FormError};

/// Store-assigned brand identifier (hex string of the document id)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BrandId(String);

impl BrandId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BrandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
    pub description: String,
}

/// Submitted add/edit form
///
/// Both fields must be present. Empty values are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandForm {
    pub name: String,
    pub description: String,
}

impl BrandForm {
    /// Parse an `application/x-www-form-urlencoded` body
    pub fn from_urlencoded(body: &[u8]) -> Result<Self, FormError> {
        let mut fields: HashMap<String, String> = form::parse_urlencoded(body)?;
        Ok(Self {
            name: take_field(&mut fields, "name")?,
            description: take_field(&mut fields, "description")?,
        })
    }
}

fn take_field(fields: &mut HashMap<String, String>, name: &'static str) -> Result<String, FormError> {
    fields.remove(name).ok_or(FormError::MissingField(name))
}

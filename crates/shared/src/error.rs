use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{domain::Field, protocol::ACCOUNT_NOT_CREATED_MESSAGE};

/// Server-side field errors, keyed by wire field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// `400 Bad Request` body of the register endpoint.
///
/// Rule violations come back as `{ "data": {..}, "message": ".." }`; unexpected
/// failures as `{ "error": ".." }`. Both shapes decode into this struct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRejection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<FieldErrors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RegisterRejection {
    pub fn from_field_errors(data: FieldErrors) -> Self {
        Self {
            data: Some(data),
            message: Some(ACCOUNT_NOT_CREATED_MESSAGE.to_string()),
            error: None,
        }
    }

    pub fn from_error(error: impl Into<String>) -> Self {
        Self {
            data: None,
            message: None,
            error: Some(error.into()),
        }
    }

    /// First message per known field; unknown keys are dropped.
    pub fn field_messages(&self) -> BTreeMap<Field, String> {
        let Some(data) = &self.data else {
            return BTreeMap::new();
        };

        data.iter()
            .filter_map(|(key, messages)| {
                let field = Field::from_key(key)?;
                let first = messages.first()?;
                Some((field, first.clone()))
            })
            .collect()
    }
}

use serde::{Deserialize, Serialize};

use crate::feature::Feature;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EditOutcome {
    pub fn succeeded(object_id: i64) -> Self {
        Self {
            success: true,
            object_id: Some(object_id),
            error: None,
        }
    }

    pub fn failed(object_id: Option<i64>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            object_id,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Add,
    Update,
    Delete,
}

impl EditKind {
    pub fn request_key(&self) -> &'static str {
        match self {
            EditKind::Add => "adds",
            EditKind::Update => "updates",
            EditKind::Delete => "deletes",
        }
    }

    pub fn result_key(&self) -> &'static str {
        match self {
            EditKind::Add => "addResults",
            EditKind::Update => "updateResults",
            EditKind::Delete => "deleteResults",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditBatch {
    pub kind: EditKind,
    pub object_id_field: String,
    pub features: Vec<Feature>,
}

impl EditBatch {
    pub fn single(kind: EditKind, object_id_field: &str, feature: Feature) -> Self {
        Self {
            kind,
            object_id_field: object_id_field.to_string(),
            features: vec![feature],
        }
    }
}

pub mod layer;

use serde::Serialize;

use crate::geometry::Geometry;

pub use layer::{ApiKey, FeatureLayerRef};

/// Field name to scalar value (string, number, boolean or null).
pub type AttributeSet = serde_json::Map<String, serde_json::Value>;

pub type ObjectId = u64;

/// Edit payload for one feature, serialized in Esri JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    pub attributes: AttributeSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
}

impl Feature {
    /// Attribute-only update: the caller's attributes with the identity field forced to
    /// `object_id`, and no geometry.
    pub fn attribute_update(
        mut attributes: AttributeSet,
        object_id_field: &str,
        object_id: ObjectId,
    ) -> Self {
        attributes.insert(object_id_field.to_string(), object_id.into());
        Self {
            attributes,
            geometry: None,
        }
    }

    pub fn geometry_update(object_id_field: &str, object_id: ObjectId, geometry: Geometry) -> Self {
        Self {
            geometry: Some(geometry),
            ..Self::identity(object_id_field, object_id)
        }
    }

    pub fn identity(object_id_field: &str, object_id: ObjectId) -> Self {
        let mut attributes = AttributeSet::new();
        attributes.insert(object_id_field.to_string(), object_id.into());
        Self {
            attributes,
            geometry: None,
        }
    }

    /// New feature. The identity field is assigned by the service, so a caller-provided
    /// value for it is dropped.
    pub fn addition(mut attributes: AttributeSet, object_id_field: &str, geometry: Geometry) -> Self {
        if attributes.remove(object_id_field).is_some() {
            log::debug!(
                "Dropping caller value for server-assigned field {}",
                object_id_field
            );
        }
        Self {
            attributes,
            geometry: Some(geometry),
        }
    }

    pub fn object_id(&self, object_id_field: &str) -> Option<ObjectId> {
        self.attributes
            .get(object_id_field)
            .and_then(|value| value.as_u64())
    }
}

/// A feature as read back from the service. The geometry is kept in the service's own
/// JSON form since query results may hold shapes the gateway never writes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRecord {
    pub attributes: AttributeSet,
    pub geometry: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub total_features: usize,
    pub features: Vec<FeatureRecord>,
}

impl From<Vec<FeatureRecord>> for QueryResult {
    fn from(features: Vec<FeatureRecord>) -> Self {
        Self {
            total_features: features.len(),
            features,
        }
    }
}

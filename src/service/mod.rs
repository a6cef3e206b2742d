pub mod layer;
pub mod rest;
#[cfg(test)]
pub mod testing;

use crate::{
    edits::{EditBatch, EditOutcome},
    error::GatewayResult,
    feature::{FeatureLayerRef, QueryResult},
};

pub use layer::FeatureLayer;
pub use rest::RestFeatureService;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerInfo {
    pub object_id_field: String,
    pub name: Option<String>,
}

/// The remote feature service. Every call carries the layer and its credential
/// explicitly; implementations hold no per-invocation state.
///
/// Failures are reported as `LayerUnavailable` for metadata and query calls and as
/// `EditFailed` for edit calls.
pub trait FeatureService {
    fn layer_info(&self, layer: &FeatureLayerRef) -> GatewayResult<LayerInfo>;

    fn query(&self, layer: &FeatureLayerRef, where_clause: &str) -> GatewayResult<QueryResult>;

    /// Submit one batch and return one outcome per submitted feature, in submission order.
    fn apply_edits(
        &self,
        layer: &FeatureLayerRef,
        batch: &EditBatch,
    ) -> GatewayResult<Vec<EditOutcome>>;
}

use crate::{
    edits::{interpret_outcomes, EditBatch, EditKind, EditVerdict},
    error::{GatewayError, GatewayResult},
    feature::{AttributeSet, Feature, FeatureLayerRef, ObjectId, QueryResult},
    geometry::Geometry,
};

use super::{FeatureService, LayerInfo};

/// Handle on one feature layer for the duration of a single tool invocation.
///
/// Layer metadata is resolved on first use and kept only as long as the handle lives.
/// Every edit is sent as a batch holding exactly one feature.
pub struct FeatureLayer<'s, S: FeatureService + ?Sized> {
    service: &'s S,
    layer: FeatureLayerRef,
    info: Option<LayerInfo>,
}

impl<'s, S: FeatureService + ?Sized> FeatureLayer<'s, S> {
    pub fn new(service: &'s S, layer: FeatureLayerRef) -> Self {
        Self {
            service,
            layer,
            info: None,
        }
    }

    pub fn object_id_field(&mut self) -> GatewayResult<String> {
        if let Some(info) = &self.info {
            return Ok(info.object_id_field.clone());
        }
        log::debug!("Resolving metadata for layer {}", self.layer.url());
        let info = self.service.layer_info(&self.layer)?;
        if info.object_id_field.is_empty() {
            return Err(GatewayError::LayerUnavailable(format!(
                "no identity field could be resolved for {}",
                self.layer.url()
            )));
        }
        let field = info.object_id_field.clone();
        log::debug!(
            "Layer {} uses identity field {}",
            info.name.as_deref().unwrap_or("(unnamed)"),
            field
        );
        self.info = Some(info);
        Ok(field)
    }

    pub fn query(&mut self, where_clause: &str) -> GatewayResult<QueryResult> {
        self.object_id_field()?;
        log::debug!("Querying {} where {}", self.layer.url(), where_clause);
        self.service.query(&self.layer, where_clause)
    }

    pub fn update_attributes(
        &mut self,
        object_id: ObjectId,
        attributes: AttributeSet,
    ) -> GatewayResult<EditVerdict> {
        let field = self.object_id_field()?;
        let feature = Feature::attribute_update(attributes, &field, object_id);
        self.submit(EditKind::Update, &field, feature)
    }

    pub fn update_geometry(
        &mut self,
        object_id: ObjectId,
        geometry: Geometry,
    ) -> GatewayResult<EditVerdict> {
        let field = self.object_id_field()?;
        log::debug!("Replacing {:?} geometry of feature {}", geometry.kind(), object_id);
        let feature = Feature::geometry_update(&field, object_id, geometry);
        self.submit(EditKind::Update, &field, feature)
    }

    pub fn delete(&mut self, object_id: ObjectId) -> GatewayResult<EditVerdict> {
        let field = self.object_id_field()?;
        let feature = Feature::identity(&field, object_id);
        self.submit(EditKind::Delete, &field, feature)
    }

    pub fn add(&mut self, attributes: AttributeSet, geometry: Geometry) -> GatewayResult<EditVerdict> {
        let field = self.object_id_field()?;
        let feature = Feature::addition(attributes, &field, geometry);
        self.submit(EditKind::Add, &field, feature)
    }

    fn submit(
        &self,
        kind: EditKind,
        object_id_field: &str,
        feature: Feature,
    ) -> GatewayResult<EditVerdict> {
        let batch = EditBatch::single(kind, object_id_field, feature);
        log::debug!("Submitting {} to {}", kind.request_key(), self.layer.url());
        let outcomes = self.service.apply_edits(&self.layer, &batch)?;
        Ok(interpret_outcomes(outcomes))
    }
}

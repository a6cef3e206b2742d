use std::cell::{Cell, RefCell};

use crate::{
    edits::{EditBatch, EditKind, EditOutcome},
    error::{GatewayError, GatewayResult},
    feature::{ApiKey, FeatureLayerRef, FeatureRecord, QueryResult},
};

use super::{FeatureService, LayerInfo};

pub fn test_layer() -> FeatureLayerRef {
    FeatureLayerRef::new(
        "https://services.example.com/arcgis/rest/services/Assets/FeatureServer/0"
            .parse()
            .unwrap(),
        ApiKey::new("test-key"),
    )
}

/// Records every call and answers with canned results.
pub struct RecordingService {
    object_id_field: Option<String>,
    outcomes: Option<Vec<EditOutcome>>,
    fail_edits: bool,
    features: Vec<FeatureRecord>,
    layer_info_calls: Cell<usize>,
    queries: RefCell<Vec<String>>,
    batches: RefCell<Vec<EditBatch>>,
}

impl RecordingService {
    pub fn new(object_id_field: &str) -> Self {
        Self {
            object_id_field: Some(object_id_field.to_string()),
            outcomes: None,
            fail_edits: false,
            features: Vec::new(),
            layer_info_calls: Cell::new(0),
            queries: RefCell::new(Vec::new()),
            batches: RefCell::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            object_id_field: None,
            ..Self::new("")
        }
    }

    pub fn with_outcomes(mut self, outcomes: Vec<EditOutcome>) -> Self {
        self.outcomes = Some(outcomes);
        self
    }

    pub fn with_failing_edits(mut self) -> Self {
        self.fail_edits = true;
        self
    }

    pub fn with_features(mut self, features: Vec<FeatureRecord>) -> Self {
        self.features = features;
        self
    }

    pub fn layer_info_calls(&self) -> usize {
        self.layer_info_calls.get()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }

    pub fn batches(&self) -> Vec<EditBatch> {
        self.batches.borrow().clone()
    }

    pub fn network_calls(&self) -> usize {
        self.layer_info_calls() + self.queries.borrow().len() + self.batches.borrow().len()
    }
}

impl FeatureService for RecordingService {
    fn layer_info(&self, _layer: &FeatureLayerRef) -> GatewayResult<LayerInfo> {
        self.layer_info_calls.set(self.layer_info_calls.get() + 1);
        match &self.object_id_field {
            Some(field) => Ok(LayerInfo {
                object_id_field: field.clone(),
                name: Some("Assets".to_string()),
            }),
            None => Err(GatewayError::LayerUnavailable(
                "Invalid URL".to_string(),
            )),
        }
    }

    fn query(&self, _layer: &FeatureLayerRef, where_clause: &str) -> GatewayResult<QueryResult> {
        self.queries.borrow_mut().push(where_clause.to_string());
        Ok(QueryResult::from(self.features.clone()))
    }

    fn apply_edits(
        &self,
        _layer: &FeatureLayerRef,
        batch: &EditBatch,
    ) -> GatewayResult<Vec<EditOutcome>> {
        self.batches.borrow_mut().push(batch.clone());
        if self.fail_edits {
            return Err(GatewayError::EditFailed(
                "connection reset".to_string(),
            ));
        }
        Ok(match &self.outcomes {
            Some(outcomes) => outcomes.clone(),
            None => (1..=batch.features.len() as i64)
                .map(EditOutcome::succeeded)
                .collect(),
        })
    }
}

/// Keeps features in memory and understands the `1=1` and `<field> = <id>` predicates.
pub struct InMemoryService {
    object_id_field: String,
    records: RefCell<Vec<FeatureRecord>>,
    next_object_id: Cell<u64>,
}

impl InMemoryService {
    pub fn new(object_id_field: &str) -> Self {
        Self {
            object_id_field: object_id_field.to_string(),
            records: RefCell::new(Vec::new()),
            next_object_id: Cell::new(1),
        }
    }

    fn id_of(&self, record: &FeatureRecord) -> Option<u64> {
        record
            .attributes
            .get(&self.object_id_field)
            .and_then(|value| value.as_u64())
    }

    fn matches(&self, record: &FeatureRecord, where_clause: &str) -> bool {
        if where_clause.trim() == "1=1" {
            return true;
        }
        match where_clause.split_once('=') {
            Some((field, value)) if field.trim() == self.object_id_field => {
                value.trim().parse::<u64>().ok() == self.id_of(record)
            }
            _ => false,
        }
    }
}

impl FeatureService for InMemoryService {
    fn layer_info(&self, _layer: &FeatureLayerRef) -> GatewayResult<LayerInfo> {
        Ok(LayerInfo {
            object_id_field: self.object_id_field.clone(),
            name: None,
        })
    }

    fn query(&self, _layer: &FeatureLayerRef, where_clause: &str) -> GatewayResult<QueryResult> {
        let features: Vec<FeatureRecord> = self
            .records
            .borrow()
            .iter()
            .filter(|record| self.matches(record, where_clause))
            .cloned()
            .collect();
        Ok(QueryResult::from(features))
    }

    fn apply_edits(
        &self,
        _layer: &FeatureLayerRef,
        batch: &EditBatch,
    ) -> GatewayResult<Vec<EditOutcome>> {
        let mut records = self.records.borrow_mut();
        let mut outcomes = Vec::new();
        for feature in &batch.features {
            let geometry = feature
                .geometry
                .as_ref()
                .map(|geometry| serde_json::to_value(geometry).unwrap());
            match batch.kind {
                EditKind::Add => {
                    let object_id = self.next_object_id.get();
                    self.next_object_id.set(object_id + 1);
                    let mut attributes = feature.attributes.clone();
                    attributes.insert(self.object_id_field.clone(), object_id.into());
                    records.push(FeatureRecord {
                        attributes,
                        geometry,
                    });
                    outcomes.push(EditOutcome::succeeded(object_id as i64));
                }
                EditKind::Update | EditKind::Delete => {
                    let object_id = feature.object_id(&self.object_id_field);
                    let position = records
                        .iter()
                        .position(|record| self.id_of(record) == object_id);
                    let object_id = object_id.map(|id| id as i64);
                    match (position, batch.kind) {
                        (None, _) => {
                            outcomes.push(EditOutcome::failed(object_id, "Feature not found"))
                        }
                        (Some(position), EditKind::Delete) => {
                            records.remove(position);
                            outcomes.push(EditOutcome {
                                success: true,
                                object_id,
                                error: None,
                            });
                        }
                        (Some(position), _) => {
                            let record = &mut records[position];
                            for (key, value) in &feature.attributes {
                                record.attributes.insert(key.clone(), value.clone());
                            }
                            if geometry.is_some() {
                                record.geometry = geometry;
                            }
                            outcomes.push(EditOutcome {
                                success: true,
                                object_id,
                                error: None,
                            });
                        }
                    }
                }
            }
        }
        Ok(outcomes)
    }
}

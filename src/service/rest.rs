use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use crate::{
    edits::{EditBatch, EditKind, EditOutcome},
    error::{GatewayError, GatewayResult},
    feature::{AttributeSet, FeatureLayerRef, FeatureRecord, QueryResult},
};

use super::{FeatureService, LayerInfo};

const OID_FIELD_TYPE: &str = "esriFieldTypeOID";

/// Feature service reached over its REST API.
///
/// All requests are form-encoded POSTs so the credential stays out of URLs (and out of
/// any transport error that quotes one).
pub struct RestFeatureService {
    client: reqwest::blocking::Client,
}

impl RestFeatureService {
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::blocking::Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    fn post_form(&self, url: Url, form: &[(&str, &str)]) -> reqwest::Result<String> {
        self.client
            .post(url)
            .form(form)
            .send()?
            .error_for_status()?
            .text()
    }
}

impl FeatureService for RestFeatureService {
    fn layer_info(&self, layer: &FeatureLayerRef) -> GatewayResult<LayerInfo> {
        let body = self
            .post_form(
                layer.url().clone(),
                &[("f", "json"), ("token", layer.api_key().as_str())],
            )
            .map_err(|err| GatewayError::LayerUnavailable(err.to_string()))?;
        parse_layer_info(&body)
    }

    fn query(&self, layer: &FeatureLayerRef, where_clause: &str) -> GatewayResult<QueryResult> {
        let body = self
            .post_form(
                layer.endpoint("query")?,
                &[
                    ("where", where_clause),
                    ("outFields", "*"),
                    ("returnGeometry", "true"),
                    ("f", "json"),
                    ("token", layer.api_key().as_str()),
                ],
            )
            .map_err(|err| GatewayError::LayerUnavailable(err.to_string()))?;
        parse_query_response(&body)
    }

    fn apply_edits(
        &self,
        layer: &FeatureLayerRef,
        batch: &EditBatch,
    ) -> GatewayResult<Vec<EditOutcome>> {
        let payload = edit_payload(batch)?;
        let body = self
            .post_form(
                layer.endpoint("applyEdits")?,
                &[
                    ("f", "json"),
                    ("token", layer.api_key().as_str()),
                    (batch.kind.request_key(), payload.as_str()),
                ],
            )
            .map_err(|err| GatewayError::EditFailed(err.to_string()))?;
        parse_edit_response(batch.kind, &body)
    }
}

/// Error object the service embeds in an otherwise successful HTTP response.
#[derive(Deserialize, Debug)]
struct ServiceError {
    code: Option<i64>,
    message: Option<String>,
    description: Option<String>,
    #[serde(default)]
    details: Vec<String>,
}

impl ServiceError {
    fn describe(&self) -> String {
        let mut text = self
            .description
            .as_deref()
            .or(self.message.as_deref())
            .unwrap_or("unknown service error")
            .to_string();
        if let Some(code) = self.code {
            text.push_str(&format!(" (code {})", code));
        }
        if !self.details.is_empty() {
            text.push_str(&format!(": {}", self.details.join("; ")));
        }
        text
    }
}

#[derive(Deserialize, Debug)]
struct FieldInfo {
    name: String,
    #[serde(rename = "type")]
    field_type: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct LayerMetadata {
    object_id_field: Option<String>,
    #[serde(default)]
    fields: Vec<FieldInfo>,
    name: Option<String>,
    error: Option<ServiceError>,
}

fn parse_layer_info(body: &str) -> GatewayResult<LayerInfo> {
    let metadata: LayerMetadata = serde_json::from_str(body).map_err(|err| {
        GatewayError::LayerUnavailable(format!("unreadable layer metadata, {}", err))
    })?;
    if let Some(error) = metadata.error {
        return Err(GatewayError::LayerUnavailable(error.describe()));
    }
    let object_id_field = metadata
        .object_id_field
        .filter(|field| !field.is_empty())
        .or_else(|| {
            metadata
                .fields
                .into_iter()
                .find(|field| field.field_type.as_deref() == Some(OID_FIELD_TYPE))
                .map(|field| field.name)
        })
        .ok_or_else(|| {
            GatewayError::LayerUnavailable("layer has no identity field".to_string())
        })?;
    Ok(LayerInfo {
        object_id_field,
        name: metadata.name,
    })
}

#[derive(Deserialize, Debug)]
struct RawFeature {
    #[serde(default)]
    attributes: Option<AttributeSet>,
    #[serde(default)]
    geometry: Option<serde_json::Value>,
}

#[derive(Deserialize, Debug)]
struct QueryResponse {
    #[serde(default)]
    features: Vec<RawFeature>,
    error: Option<ServiceError>,
}

fn parse_query_response(body: &str) -> GatewayResult<QueryResult> {
    let response: QueryResponse = serde_json::from_str(body).map_err(|err| {
        GatewayError::LayerUnavailable(format!("unreadable query response, {}", err))
    })?;
    if let Some(error) = response.error {
        return Err(GatewayError::LayerUnavailable(error.describe()));
    }
    let features: Vec<FeatureRecord> = response
        .features
        .into_iter()
        .map(|feature| FeatureRecord {
            attributes: feature.attributes.unwrap_or_default(),
            geometry: feature.geometry,
        })
        .collect();
    Ok(QueryResult::from(features))
}

fn edit_payload(batch: &EditBatch) -> GatewayResult<String> {
    match batch.kind {
        EditKind::Delete => {
            let object_ids = batch
                .features
                .iter()
                .map(|feature| {
                    feature
                        .object_id(&batch.object_id_field)
                        .map(|object_id| object_id.to_string())
                        .ok_or_else(|| {
                            GatewayError::EditFailed(format!(
                                "feature to delete has no {} attribute",
                                batch.object_id_field
                            ))
                        })
                })
                .collect::<GatewayResult<Vec<String>>>()?;
            Ok(object_ids.join(","))
        }
        EditKind::Add | EditKind::Update => serde_json::to_string(&batch.features)
            .map_err(|err| GatewayError::EditFailed(format!("could not encode features, {}", err))),
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawEditResult {
    #[serde(default)]
    success: bool,
    object_id: Option<i64>,
    error: Option<ServiceError>,
}

impl From<RawEditResult> for EditOutcome {
    fn from(value: RawEditResult) -> Self {
        EditOutcome {
            success: value.success,
            object_id: value.object_id,
            error: value.error.map(|error| error.describe()),
        }
    }
}

fn parse_edit_response(kind: EditKind, body: &str) -> GatewayResult<Vec<EditOutcome>> {
    let mut response: serde_json::Value = serde_json::from_str(body).map_err(|err| {
        GatewayError::EditFailed(format!("unreadable applyEdits response, {}", err))
    })?;
    if let Some(error) = response.get("error").filter(|error| !error.is_null()) {
        let error: ServiceError = serde_json::from_value(error.clone()).map_err(|err| {
            GatewayError::EditFailed(format!("unreadable service error, {}", err))
        })?;
        return Err(GatewayError::EditFailed(error.describe()));
    }
    let results = match response.get_mut(kind.result_key()) {
        Some(results) => results.take(),
        None => return Ok(Vec::new()),
    };
    let results: Vec<RawEditResult> = serde_json::from_value(results).map_err(|err| {
        GatewayError::EditFailed(format!("unreadable {}, {}", kind.result_key(), err))
    })?;
    Ok(results.into_iter().map(EditOutcome::from).collect())
}

use serde_json::Value;

use crate::{
    error::{GatewayError, GatewayResult},
    geometry::{builder::build_geometry, Geometry, GeometryKind},
    service::{FeatureLayer, FeatureService},
};

use super::{
    args::{self, Arguments},
    ToolName, ToolResponse,
};

/// Run one tool invocation to completion.
///
/// Arguments are validated before the service is touched, and every failure is turned into
/// a `success: false` response instead of being returned.
pub fn call_tool<S: FeatureService + ?Sized>(
    service: &S,
    name: &str,
    arguments: &Value,
) -> ToolResponse {
    log::info!("Calling tool {}", name);
    match run_tool(service, name, arguments) {
        Ok(response) => {
            if !response.success {
                log::warn!(
                    "Tool {} did not succeed: {}",
                    name,
                    response.details.as_deref().unwrap_or("no details")
                );
            }
            response
        }
        Err(error) => {
            log::warn!("Tool {} failed: {}", name, error);
            ToolResponse::from_error(&error)
        }
    }
}

fn run_tool<S: FeatureService + ?Sized>(
    service: &S,
    name: &str,
    arguments: &Value,
) -> GatewayResult<ToolResponse> {
    let tool =
        ToolName::from_name(name).ok_or_else(|| GatewayError::UnknownTool(name.to_string()))?;
    let empty = Arguments::new();
    let args = match arguments {
        Value::Null => &empty,
        Value::Object(args) => args,
        _ => {
            return Err(GatewayError::invalid_argument(
                "arguments",
                "must be an object",
            ))
        }
    };

    match tool {
        ToolName::Query => query(service, args),
        ToolName::UpdateFeatureAttributes => update_attributes(service, args),
        ToolName::UpdatePointGeometry => update_geometry(service, args, GeometryKind::Point),
        ToolName::UpdateLineGeometry => update_geometry(service, args, GeometryKind::Polyline),
        ToolName::UpdatePolygonGeometry => update_geometry(service, args, GeometryKind::Polygon),
        ToolName::DeleteFeature => delete_feature(service, args),
        ToolName::AddPointFeature => add_feature(service, args, GeometryKind::Point),
        ToolName::AddLineFeature => add_feature(service, args, GeometryKind::Polyline),
        ToolName::AddPolygonFeature => add_feature(service, args, GeometryKind::Polygon),
    }
}

fn geometry(args: &Arguments, kind: GeometryKind) -> GatewayResult<Geometry> {
    let input = args::geometry_input(args, kind)?;
    let spatial_reference = args::spatial_reference(args)?;
    Ok(build_geometry(&input, spatial_reference))
}

fn query<S: FeatureService + ?Sized>(service: &S, args: &Arguments) -> GatewayResult<ToolResponse> {
    let layer = args::layer_ref(args)?;
    let where_clause = args::where_clause(args)?;
    let result = FeatureLayer::new(service, layer).query(&where_clause)?;
    log::info!("Query returned {} features", result.total_features);
    Ok(result.into())
}

fn update_attributes<S: FeatureService + ?Sized>(
    service: &S,
    args: &Arguments,
) -> GatewayResult<ToolResponse> {
    let layer = args::layer_ref(args)?;
    let object_id = args::object_id(args)?;
    let attributes = args::attributes(args)?;
    let verdict = FeatureLayer::new(service, layer).update_attributes(object_id, attributes)?;
    Ok(verdict.into())
}

fn update_geometry<S: FeatureService + ?Sized>(
    service: &S,
    args: &Arguments,
    kind: GeometryKind,
) -> GatewayResult<ToolResponse> {
    let layer = args::layer_ref(args)?;
    let object_id = args::object_id(args)?;
    let geometry = geometry(args, kind)?;
    let verdict = FeatureLayer::new(service, layer).update_geometry(object_id, geometry)?;
    Ok(verdict.into())
}

fn delete_feature<S: FeatureService + ?Sized>(
    service: &S,
    args: &Arguments,
) -> GatewayResult<ToolResponse> {
    let layer = args::layer_ref(args)?;
    let object_id = args::object_id(args)?;
    let verdict = FeatureLayer::new(service, layer).delete(object_id)?;
    Ok(verdict.into())
}

fn add_feature<S: FeatureService + ?Sized>(
    service: &S,
    args: &Arguments,
    kind: GeometryKind,
) -> GatewayResult<ToolResponse> {
    let layer = args::layer_ref(args)?;
    let attributes = args::attributes(args)?;
    let geometry = geometry(args, kind)?;
    let verdict = FeatureLayer::new(service, layer).add(attributes, geometry)?;
    Ok(verdict.into())
}

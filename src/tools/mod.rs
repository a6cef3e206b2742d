pub mod args;
pub mod dispatch;
pub mod response;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::geometry::GeometryKind;

pub use dispatch::call_tool;
pub use response::ToolResponse;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    Query,
    UpdateFeatureAttributes,
    UpdatePointGeometry,
    UpdateLineGeometry,
    UpdatePolygonGeometry,
    DeleteFeature,
    AddPointFeature,
    AddLineFeature,
    AddPolygonFeature,
}

impl ToolName {
    pub const ALL: [ToolName; 9] = [
        ToolName::Query,
        ToolName::UpdateFeatureAttributes,
        ToolName::UpdatePointGeometry,
        ToolName::UpdateLineGeometry,
        ToolName::UpdatePolygonGeometry,
        ToolName::DeleteFeature,
        ToolName::AddPointFeature,
        ToolName::AddLineFeature,
        ToolName::AddPolygonFeature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::Query => "query",
            ToolName::UpdateFeatureAttributes => "updateFeatureAttributes",
            ToolName::UpdatePointGeometry => "updatePointGeometry",
            ToolName::UpdateLineGeometry => "updateLineGeometry",
            ToolName::UpdatePolygonGeometry => "updatePolygonGeometry",
            ToolName::DeleteFeature => "deleteFeature",
            ToolName::AddPointFeature => "addPointFeature",
            ToolName::AddLineFeature => "addLineFeature",
            ToolName::AddPolygonFeature => "addPolygonFeature",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.as_str() == name)
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolName::Query => "query Arcgis Online FeatureLayer Element",
            ToolName::UpdateFeatureAttributes => {
                "Update only the attributes of an existing feature in an ArcGIS Online FeatureLayer"
            }
            ToolName::UpdatePointGeometry => {
                "Update only the geometry of an existing point feature using latitude and longitude"
            }
            ToolName::UpdateLineGeometry => {
                "Update only the geometry of an existing line feature using an array of coordinates"
            }
            ToolName::UpdatePolygonGeometry => {
                "Update only the geometry of an existing polygon feature using an array of coordinates"
            }
            ToolName::DeleteFeature => "Delete a feature from an ArcGIS Online FeatureLayer",
            ToolName::AddPointFeature => {
                "Add a new point feature to an ArcGIS Online FeatureLayer using latitude and longitude"
            }
            ToolName::AddLineFeature => {
                "Add a new line feature to an ArcGIS Online FeatureLayer using an array of coordinates"
            }
            ToolName::AddPolygonFeature => {
                "Add a new polygon feature to an ArcGIS Online FeatureLayer using an array of coordinates"
            }
        }
    }

    pub fn geometry_kind(&self) -> Option<GeometryKind> {
        match self {
            ToolName::UpdatePointGeometry | ToolName::AddPointFeature => Some(GeometryKind::Point),
            ToolName::UpdateLineGeometry | ToolName::AddLineFeature => Some(GeometryKind::Polyline),
            ToolName::UpdatePolygonGeometry | ToolName::AddPolygonFeature => {
                Some(GeometryKind::Polygon)
            }
            ToolName::Query | ToolName::UpdateFeatureAttributes | ToolName::DeleteFeature => None,
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.as_str().to_string(),
            description: self.description().to_string(),
            input_schema: input_schema(*self),
        }
    }
}

pub fn tool_definitions() -> Vec<ToolDefinition> {
    ToolName::ALL.iter().map(ToolName::definition).collect()
}

fn coordinates_property(kind: GeometryKind) -> Value {
    let vertices = match kind {
        GeometryKind::Polygon => "polygon",
        _ => "line",
    };
    json!({
        "type": "array",
        "minItems": kind.min_vertices(),
        "description": format!("Array of coordinates for the {} vertices", vertices),
        "items": {
            "type": "object",
            "required": ["latitude", "longitude"],
            "properties": {
                "latitude": {"type": "number", "description": "Latitude (Y coordinate)"},
                "longitude": {"type": "number", "description": "Longitude (X coordinate)"}
            }
        }
    })
}

fn input_schema(tool: ToolName) -> Value {
    let mut properties = serde_json::Map::new();
    let mut required = vec!["url", "apikey"];
    properties.insert(
        "url".to_string(),
        json!({"type": "string", "description": "Feature layer URL"}),
    );
    properties.insert(
        "apikey".to_string(),
        json!({"type": "string", "description": "ArcGIS Online API key (required for execution)"}),
    );

    match tool {
        ToolName::Query => {
            properties.insert(
                "where".to_string(),
                json!({
                    "type": "string",
                    "default": args::DEFAULT_WHERE,
                    "description": "SQL WHERE clause for filtering features"
                }),
            );
        }
        ToolName::UpdateFeatureAttributes
        | ToolName::UpdatePointGeometry
        | ToolName::UpdateLineGeometry
        | ToolName::UpdatePolygonGeometry
        | ToolName::DeleteFeature => {
            let verb = match tool {
                ToolName::DeleteFeature => "delete",
                _ => "update",
            };
            properties.insert(
                "objectId".to_string(),
                json!({
                    "type": "integer",
                    "minimum": 1,
                    "description": format!("Object ID of the feature to {}", verb)
                }),
            );
            required.push("objectId");
        }
        ToolName::AddPointFeature | ToolName::AddLineFeature | ToolName::AddPolygonFeature => {}
    }

    match tool {
        ToolName::UpdateFeatureAttributes => {
            properties.insert(
                "attributes".to_string(),
                json!({"type": "object", "description": "Updated feature attributes"}),
            );
            required.push("attributes");
        }
        ToolName::AddPointFeature | ToolName::AddLineFeature | ToolName::AddPolygonFeature => {
            properties.insert(
                "attributes".to_string(),
                json!({"type": "object", "description": "Feature attributes"}),
            );
            required.push("attributes");
        }
        _ => {}
    }

    match tool.geometry_kind() {
        Some(GeometryKind::Point) => {
            properties.insert(
                "latitude".to_string(),
                json!({"type": "number", "minimum": -90, "maximum": 90,
                       "description": "Latitude (Y coordinate)"}),
            );
            properties.insert(
                "longitude".to_string(),
                json!({"type": "number", "minimum": -180, "maximum": 180,
                       "description": "Longitude (X coordinate)"}),
            );
            required.extend(["latitude", "longitude"]);
        }
        Some(kind) => {
            properties.insert("coordinates".to_string(), coordinates_property(kind));
            required.push("coordinates");
        }
        None => {}
    }
    if tool.geometry_kind().is_some() {
        properties.insert(
            "wkid".to_string(),
            json!({
                "type": "integer",
                "default": crate::geometry::coordinate::WGS84_WKID,
                "description": "Spatial reference WKID (default: 4326 WGS84)"
            }),
        );
    }

    json!({
        "type": "object",
        "required": required,
        "properties": properties
    })
}

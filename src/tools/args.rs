use std::ops::RangeInclusive;

use reqwest::Url;
use serde_json::Value;

use crate::{
    error::{GatewayError, GatewayResult},
    feature::{ApiKey, AttributeSet, FeatureLayerRef, ObjectId},
    geometry::{Coordinate, GeometryInput, GeometryKind, SpatialReference},
};

pub type Arguments = serde_json::Map<String, Value>;

pub const DEFAULT_WHERE: &str = "1=1";

const LATITUDE_RANGE: RangeInclusive<f64> = -90.0..=90.0;
const LONGITUDE_RANGE: RangeInclusive<f64> = -180.0..=180.0;
// Largest integer a JSON number can carry without losing precision.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn present<'a>(args: &'a Arguments, key: &str) -> Option<&'a Value> {
    args.get(key).filter(|value| !value.is_null())
}

fn required<'a>(args: &'a Arguments, key: &str) -> GatewayResult<&'a Value> {
    present(args, key).ok_or_else(|| GatewayError::invalid_argument(key, "is required"))
}

pub fn layer_ref(args: &Arguments) -> GatewayResult<FeatureLayerRef> {
    let url = url(args)?;
    let api_key = api_key(args)?;
    Ok(FeatureLayerRef::new(url, api_key))
}

pub fn url(args: &Arguments) -> GatewayResult<Url> {
    let text = required(args, "url")?
        .as_str()
        .ok_or_else(|| GatewayError::invalid_argument("url", "must be a string"))?
        .trim();
    if text.is_empty() {
        return Err(GatewayError::invalid_argument("url", "must not be empty"));
    }
    let url = Url::parse(text)
        .map_err(|err| GatewayError::invalid_argument("url", format!("is not a valid URL, {}", err)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(GatewayError::invalid_argument(
            "url",
            format!("must use http or https, not {}", scheme),
        )),
    }
}

/// An absent, null or empty key is a missing credential.
pub fn api_key(args: &Arguments) -> GatewayResult<ApiKey> {
    match present(args, "apikey") {
        None => Err(GatewayError::MissingCredential),
        Some(Value::String(key)) if key.is_empty() => Err(GatewayError::MissingCredential),
        Some(Value::String(key)) => Ok(ApiKey::new(key.as_str())),
        Some(_) => Err(GatewayError::invalid_argument("apikey", "must be a string")),
    }
}

fn positive_integer(value: &Value, field: &str) -> GatewayResult<u64> {
    let invalid = || GatewayError::invalid_argument(field, "must be a positive integer");
    let number = match value {
        Value::Number(number) => number,
        _ => return Err(invalid()),
    };
    if let Some(integer) = number.as_u64() {
        return if integer > 0 { Ok(integer) } else { Err(invalid()) };
    }
    match number.as_f64() {
        Some(float) if float > 0.0 && float.fract() == 0.0 && float <= MAX_SAFE_INTEGER => {
            Ok(float as u64)
        }
        _ => Err(invalid()),
    }
}

pub fn object_id(args: &Arguments) -> GatewayResult<ObjectId> {
    positive_integer(required(args, "objectId")?, "objectId")
}

pub fn spatial_reference(args: &Arguments) -> GatewayResult<SpatialReference> {
    match present(args, "wkid") {
        None => Ok(SpatialReference::default()),
        Some(value) => {
            let wkid = positive_integer(value, "wkid")?;
            let wkid = u32::try_from(wkid)
                .map_err(|_| GatewayError::invalid_argument("wkid", "is out of range"))?;
            Ok(SpatialReference::new(wkid))
        }
    }
}

pub fn where_clause(args: &Arguments) -> GatewayResult<String> {
    match present(args, "where") {
        None => {
            log::warn!(
                "No where clause given, querying all features with {}",
                DEFAULT_WHERE
            );
            Ok(DEFAULT_WHERE.to_string())
        }
        Some(Value::String(clause)) => Ok(clause.clone()),
        Some(_) => Err(GatewayError::invalid_argument("where", "must be a string")),
    }
}

pub fn attributes(args: &Arguments) -> GatewayResult<AttributeSet> {
    let attributes = required(args, "attributes")?
        .as_object()
        .ok_or_else(|| GatewayError::invalid_argument("attributes", "must be an object"))?;
    for (key, value) in attributes {
        if value.is_array() || value.is_object() {
            return Err(GatewayError::invalid_argument(
                format!("attributes.{}", key),
                "must be a string, number, boolean or null",
            ));
        }
    }
    Ok(attributes.clone())
}

fn ranged_number(
    args: &Arguments,
    key: &str,
    field: &str,
    range: &RangeInclusive<f64>,
) -> GatewayResult<f64> {
    let value = present(args, key)
        .ok_or_else(|| GatewayError::invalid_argument(field, "is required"))?
        .as_f64()
        .ok_or_else(|| GatewayError::invalid_argument(field, "must be a number"))?;
    if !range.contains(&value) {
        return Err(GatewayError::invalid_argument(
            field,
            format!(
                "{} is outside [{}, {}]",
                value,
                range.start(),
                range.end()
            ),
        ));
    }
    Ok(value)
}

fn coordinate_at(args: &Arguments, prefix: &str) -> GatewayResult<Coordinate> {
    let field = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", prefix, key)
        }
    };
    let latitude = ranged_number(args, "latitude", &field("latitude"), &LATITUDE_RANGE)?;
    let longitude = ranged_number(args, "longitude", &field("longitude"), &LONGITUDE_RANGE)?;
    Ok(Coordinate::new(latitude, longitude))
}

/// The `coordinates` array, checked for the kind's minimum cardinality before any
/// element is inspected.
pub fn coordinates(args: &Arguments, kind: GeometryKind) -> GatewayResult<Vec<Coordinate>> {
    let items = required(args, "coordinates")?
        .as_array()
        .ok_or_else(|| GatewayError::invalid_argument("coordinates", "must be an array"))?;
    let required = kind.min_vertices();
    if items.len() < required {
        return Err(GatewayError::InsufficientVertices {
            field: "coordinates",
            required,
            actual: items.len(),
        });
    }
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let prefix = format!("coordinates[{}]", index);
            let item = item.as_object().ok_or_else(|| {
                GatewayError::invalid_argument(
                    prefix.as_str(),
                    "must be an object with latitude and longitude",
                )
            })?;
            coordinate_at(item, &prefix)
        })
        .collect()
}

pub fn geometry_input(args: &Arguments, kind: GeometryKind) -> GatewayResult<GeometryInput> {
    match kind {
        GeometryKind::Point => Ok(GeometryInput::Point(coordinate_at(args, "")?)),
        GeometryKind::Polyline => Ok(GeometryInput::Polyline(coordinates(args, kind)?)),
        GeometryKind::Polygon => Ok(GeometryInput::Polygon(coordinates(args, kind)?)),
    }
}

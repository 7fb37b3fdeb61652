use serde::{Deserialize, Deserializer, Serialize};

/// Geographic point. Serialized on the wire as a two-element
/// `[lat, lon]` array, matching the routing service's body shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(coord: Coordinate) -> Self {
        (coord.lat, coord.lon)
    }
}

/// User routing preferences, snapshotted when a request is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePreferences {
    pub elevation_sensitivity: u8,
    pub avoid_obstacles: bool,
}

impl Default for RoutePreferences {
    fn default() -> Self {
        Self {
            elevation_sensitivity: 5,
            avoid_obstacles: true,
        }
    }
}

/// Body of `POST /api/accessible_route`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub elevation_pref: u8,
    pub obstacle_pref: bool,
}

impl RouteRequest {
    pub fn new(origin: Coordinate, destination: Coordinate, prefs: RoutePreferences) -> Self {
        Self {
            origin,
            destination,
            elevation_pref: prefs.elevation_sensitivity,
            obstacle_pref: prefs.avoid_obstacles,
        }
    }
}

/// One turn-by-turn instruction, anchored to a point of the route path
/// by `node_index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionStep {
    pub text: String,
    pub distance: f64,
    pub node_index: usize,
}

/// Routing service response. The service reports application-level
/// failures through the `error` field regardless of transport status,
/// so every field is optional and validation happens at the caller.
/// Directions are advisory: a malformed `directions` value is dropped
/// here instead of failing a body that carries a usable route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<Vec<Coordinate>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_directions"
    )]
    pub directions: Option<Vec<DirectionStep>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn lenient_directions<'de, D>(deserializer: D) -> Result<Option<Vec<DirectionStep>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MaybeSteps {
        Steps(Vec<DirectionStep>),
        #[allow(dead_code)]
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<MaybeSteps>::deserialize(deserializer)? {
        Some(MaybeSteps::Steps(steps)) => Some(steps),
        _ => None,
    })
}

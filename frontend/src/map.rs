use serde::Serialize;
use serde_wasm_bindgen::to_value;
use shared::Coordinate;
use wasm_bindgen::prelude::{wasm_bindgen, JsValue};

/// Zoom applied when the viewport jumps to a focused direction step.
pub const STEP_FOCUS_ZOOM: f64 = 18.0;
/// Zoom applied when an endpoint resolves from search or geolocation.
pub const PLACE_ZOOM: f64 = 15.0;
/// Padding around the route when fitting the viewport to it.
pub const ROUTE_FIT_PADDING_PX: u32 = 50;

#[wasm_bindgen(module = "/leaflet_map.js")]
extern "C" {
    #[wasm_bindgen(js_name = initMap)]
    fn init_map_js(style: JsValue);
    #[wasm_bindgen(js_name = setCenter)]
    fn set_center_js(center: JsValue, zoom: f64);
    #[wasm_bindgen(js_name = fitBounds)]
    fn fit_bounds_js(coords: JsValue, padding_px: u32);
    #[wasm_bindgen(js_name = updateEndpointMarkers)]
    fn update_endpoint_markers_js(origin: JsValue, destination: JsValue);
    #[wasm_bindgen(js_name = updateRoute)]
    fn update_route_js(coords: JsValue);
    #[wasm_bindgen(js_name = highlightPoint)]
    fn highlight_point_js(point: JsValue);
    #[wasm_bindgen(js_name = clearHighlight)]
    fn clear_highlight_js();
    #[wasm_bindgen(js_name = requestCurrentPosition)]
    pub fn request_current_position(role: &str);
}

/// One-time visual configuration handed to the JS map at startup,
/// instead of mutating icon defaults as an import side effect.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapStyle {
    pub initial_center: Coordinate,
    pub initial_zoom: f64,
    pub route_color: String,
    pub route_weight: u32,
    pub route_opacity: f64,
    pub origin_marker_class: String,
    pub destination_marker_class: String,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            initial_center: Coordinate {
                lat: 39.7518908,
                lon: -105.2158803,
            },
            initial_zoom: 13.0,
            route_color: "#1a73e8".into(),
            route_weight: 5,
            route_opacity: 0.7,
            origin_marker_class: "origin-marker".into(),
            destination_marker_class: "destination-marker".into(),
        }
    }
}

/// View commands consumed by the map rendering surface. The core only
/// ever drives the map through this trait; the wasm implementation
/// forwards to `leaflet_map.js`.
pub trait MapView {
    fn set_center(&self, center: Coordinate, zoom: f64);
    fn fit_bounds(&self, coords: &[Coordinate], padding_px: u32);
    fn highlight_point(&self, point: Coordinate);
    fn clear_highlight(&self);
    fn render_endpoints(&self, origin: Option<Coordinate>, destination: Option<Coordinate>);
    fn render_route(&self, path: &[Coordinate]);
}

pub struct LeafletView;

impl LeafletView {
    pub fn init(style: &MapStyle) {
        if let Ok(value) = to_value(style) {
            init_map_js(value);
        }
    }
}

impl MapView for LeafletView {
    fn set_center(&self, center: Coordinate, zoom: f64) {
        if let Ok(value) = to_value(&center) {
            set_center_js(value, zoom);
        }
    }

    fn fit_bounds(&self, coords: &[Coordinate], padding_px: u32) {
        if let Ok(value) = to_value(coords) {
            fit_bounds_js(value, padding_px);
        }
    }

    fn highlight_point(&self, point: Coordinate) {
        if let Ok(value) = to_value(&point) {
            highlight_point_js(value);
        }
    }

    fn clear_highlight(&self) {
        clear_highlight_js();
    }

    fn render_endpoints(&self, origin: Option<Coordinate>, destination: Option<Coordinate>) {
        let origin = origin
            .and_then(|coord| to_value(&coord).ok())
            .unwrap_or(JsValue::NULL);
        let destination = destination
            .and_then(|coord| to_value(&coord).ok())
            .unwrap_or(JsValue::NULL);
        update_endpoint_markers_js(origin, destination);
    }

    fn render_route(&self, path: &[Coordinate]) {
        if let Ok(value) = to_value(path) {
            update_route_js(value);
        }
    }
}

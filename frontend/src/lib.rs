use seed::{prelude::*, virtual_dom::AtValue, *};
use serde::Deserialize;
use shared::{Coordinate, RouteResponse};
use wasm_bindgen::{prelude::wasm_bindgen, JsCast};

pub mod directions;
pub mod endpoints;
pub mod error;
pub mod map;
pub mod prefs;
pub mod request;

use crate::directions::DirectionsNavigator;
use crate::endpoints::{ActiveSlotTracker, EndpointResolver, EndpointRole};
use crate::error::{GeolocationError, RequestError};
use crate::map::{LeafletView, MapStyle, MapView, PLACE_ZOOM};
use crate::prefs::{PreferencesStore, MAX_ELEVATION_SENSITIVITY, MIN_ELEVATION_SENSITIVITY};
use crate::request::{PendingRequest, RequestState, RouteRequestController};

fn api_root() -> String {
    if let Some(url) = option_env!("FRONTEND_API_ROOT") {
        return url.trim_end_matches('/').to_string();
    }
    "http://localhost:8000/api/accessible_route".to_string()
}

pub struct Model {
    resolver: EndpointResolver,
    tracker: ActiveSlotTracker,
    prefs: PreferencesStore,
    controller: RouteRequestController,
    navigator: DirectionsNavigator,
    map: LeafletView,
    geolocation_error: Option<String>,
    step_error: Option<String>,
    show_options: bool,
    show_directions: bool,
}

pub enum Msg {
    InputFocused(EndpointRole),
    PlaceSelected {
        role: EndpointRole,
        geometry: Option<Coordinate>,
        label: String,
    },
    MapClicked {
        lat: f64,
        lon: f64,
    },
    UseMyLocation(EndpointRole),
    LocationResolved {
        role: EndpointRole,
        result: Result<Coordinate, GeolocationError>,
    },
    ClearEndpoint(EndpointRole),
    SwapEndpoints,
    ElevationChanged(String),
    ObstaclesToggled,
    ToggleOptions,
    Submit,
    RouteFetched {
        generation: u64,
        result: Result<RouteResponse, RequestError>,
    },
    FocusStep(usize),
    CloseDirections,
    Noop,
}

#[derive(Deserialize)]
struct MapClickPayload {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct PlaceSelectedPayload {
    role: EndpointRole,
    label: String,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

#[derive(Deserialize)]
struct GeolocationPayload {
    role: EndpointRole,
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct GeolocationFailurePayload {
    role: EndpointRole,
    code: u16,
}

fn event_detail<T: serde::de::DeserializeOwned>(event: web_sys::Event) -> Option<T> {
    let event = event.dyn_into::<web_sys::CustomEvent>().ok()?;
    serde_wasm_bindgen::from_value(event.detail()).ok()
}

pub fn init(_: Url, orders: &mut impl Orders<Msg>) -> Model {
    orders.stream(streams::window_event(Ev::from("map-click"), |event| {
        match event_detail::<MapClickPayload>(event) {
            Some(payload) => Msg::MapClicked {
                lat: payload.lat,
                lon: payload.lon,
            },
            None => Msg::Noop,
        }
    }));
    orders.stream(streams::window_event(Ev::from("place-selected"), |event| {
        match event_detail::<PlaceSelectedPayload>(event) {
            Some(payload) => Msg::PlaceSelected {
                role: payload.role,
                geometry: match (payload.lat, payload.lon) {
                    (Some(lat), Some(lon)) => Some(Coordinate { lat, lon }),
                    _ => None,
                },
                label: payload.label,
            },
            None => Msg::Noop,
        }
    }));
    orders.stream(streams::window_event(
        Ev::from("geolocation-result"),
        |event| match event_detail::<GeolocationPayload>(event) {
            Some(payload) => Msg::LocationResolved {
                role: payload.role,
                result: Ok(Coordinate {
                    lat: payload.lat,
                    lon: payload.lon,
                }),
            },
            None => Msg::Noop,
        },
    ));
    orders.stream(streams::window_event(
        Ev::from("geolocation-error"),
        |event| match event_detail::<GeolocationFailurePayload>(event) {
            Some(payload) => Msg::LocationResolved {
                role: payload.role,
                result: Err(geolocation_error_from_code(payload.code)),
            },
            None => Msg::Noop,
        },
    ));

    Model {
        resolver: EndpointResolver::default(),
        tracker: ActiveSlotTracker::default(),
        prefs: PreferencesStore::default(),
        controller: RouteRequestController::default(),
        navigator: DirectionsNavigator::default(),
        map: LeafletView,
        geolocation_error: None,
        step_error: None,
        show_options: false,
        show_directions: false,
    }
}

/// Browser PositionError codes: 1 is PERMISSION_DENIED, everything
/// else (POSITION_UNAVAILABLE, TIMEOUT) counts as unavailable.
fn geolocation_error_from_code(code: u16) -> GeolocationError {
    if code == 1 {
        GeolocationError::Denied
    } else {
        GeolocationError::Unavailable
    }
}

pub fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    match msg {
        Msg::InputFocused(role) => {
            model.tracker.set_active(role);
        }
        Msg::PlaceSelected {
            role,
            geometry,
            label,
        } => {
            if model.resolver.resolve_from_search(role, geometry, label) {
                if let Some(coordinate) = model.resolver.coordinate(role) {
                    model.map.set_center(coordinate, PLACE_ZOOM);
                }
                sync_map(model);
            }
        }
        Msg::MapClicked { lat, lon } => {
            web_sys::console::debug_1(
                &format!("[frontend] map click lat={lat:.5} lon={lon:.5}").into(),
            );
            let tapped = model
                .resolver
                .resolve_from_map_tap(&model.tracker, Coordinate { lat, lon });
            if tapped.is_some() {
                sync_map(model);
            }
        }
        Msg::UseMyLocation(role) => {
            map::request_current_position(role.as_str());
        }
        Msg::LocationResolved { role, result } => match result {
            Ok(coordinate) => {
                web_sys::console::debug_1(
                    &format!(
                        "[frontend] geolocation fix for {} at ({:.5},{:.5})",
                        role.as_str(),
                        coordinate.lat,
                        coordinate.lon
                    )
                    .into(),
                );
                model.resolver.resolve_from_device_location(role, coordinate);
                model.map.set_center(coordinate, PLACE_ZOOM);
                model.geolocation_error = None;
                sync_map(model);
            }
            Err(err) => {
                model.geolocation_error = Some(err.to_string());
            }
        },
        Msg::ClearEndpoint(role) => {
            model.resolver.clear(role);
            sync_map(model);
        }
        Msg::SwapEndpoints => {
            let pending = swap_endpoints(model);
            sync_map(model);
            if let Some(pending) = pending {
                orders.perform_cmd(send_route_request(pending));
            }
        }
        Msg::ElevationChanged(value) => {
            if let Ok(value) = value.trim().parse::<u8>() {
                model.prefs.set_elevation_sensitivity(value);
            }
        }
        Msg::ObstaclesToggled => {
            let flipped = !model.prefs.avoid_obstacles();
            model.prefs.set_avoid_obstacles(flipped);
        }
        Msg::ToggleOptions => {
            model.show_options = !model.show_options;
        }
        Msg::Submit => {
            submit_route(model, orders);
        }
        Msg::RouteFetched { generation, result } => {
            let applied = model.controller.apply_response(
                generation,
                result,
                &mut model.navigator,
                &model.map,
            );
            if !applied {
                web_sys::console::debug_1(
                    &format!("[frontend] dropped superseded route response #{generation}").into(),
                );
                return;
            }
            if matches!(model.controller.state(), RequestState::Success(_)) {
                model.step_error = None;
                model.show_directions = !model.navigator.is_empty();
                sync_map(model);
            }
        }
        Msg::FocusStep(index) => {
            match model
                .navigator
                .focus_step(index, model.controller.path(), &model.map)
            {
                Ok(()) => model.step_error = None,
                Err(err) => model.step_error = Some(err.to_string()),
            }
        }
        Msg::CloseDirections => {
            model.show_directions = false;
            model.navigator.clear_focus();
            model.map.clear_highlight();
        }
        Msg::Noop => {}
    }
}

/// Builds the next submission from current state. One-shot errors from
/// earlier actions are dropped first, so the error line always reflects
/// the newest user action.
fn prepare_submission(model: &mut Model) -> Option<PendingRequest> {
    model.geolocation_error = None;
    model.step_error = None;
    model.controller.submit(
        model.resolver.coordinate(EndpointRole::Origin),
        model.resolver.coordinate(EndpointRole::Destination),
        model.prefs.snapshot(),
    )
}

/// Swaps the two slots and, when a route is on screen, prepares the
/// follow-up submission with the swapped ends.
fn swap_endpoints(model: &mut Model) -> Option<PendingRequest> {
    model.resolver.swap();
    if model.controller.route().is_some() {
        prepare_submission(model)
    } else {
        None
    }
}

fn submit_route(model: &mut Model, orders: &mut impl Orders<Msg>) {
    if let Some(pending) = prepare_submission(model) {
        orders.perform_cmd(send_route_request(pending));
    }
}

async fn send_route_request(pending: PendingRequest) -> Msg {
    let PendingRequest {
        generation,
        payload,
    } = pending;
    web_sys::console::debug_1(
        &format!(
            "[frontend] route request #{generation} origin=({:.5},{:.5}) destination=({:.5},{:.5})",
            payload.origin.lat, payload.origin.lon, payload.destination.lat, payload.destination.lon
        )
        .into(),
    );
    // The status line is deliberately not checked: the service reports
    // application failures through the body's `error` field.
    let result = match Request::new(api_root()).method(Method::Post).json(&payload) {
        Err(err) => Err(RequestError::Network(format!("{err:?}"))),
        Ok(request) => match request.fetch().await {
            Err(err) => Err(RequestError::Network(format!("{err:?}"))),
            Ok(raw) => match raw.json::<RouteResponse>().await {
                Ok(response) => Ok(response),
                Err(err) => Err(RequestError::InvalidResponse(format!("{err:?}"))),
            },
        },
    };

    Msg::RouteFetched { generation, result }
}

/// Re-derives every map layer from current state, so markers, the
/// route polyline and the step highlight always reflect the slots, the
/// accepted result and the focused step.
fn sync_map(model: &Model) {
    model.map.render_endpoints(
        model.resolver.coordinate(EndpointRole::Origin),
        model.resolver.coordinate(EndpointRole::Destination),
    );
    model.map.render_route(model.controller.path());
    match model.navigator.focused_point(model.controller.path()) {
        Some(point) => model.map.highlight_point(point),
        None => model.map.clear_highlight(),
    }
}

fn error_line(model: &Model) -> Option<String> {
    if let Some(err) = &model.geolocation_error {
        return Some(err.clone());
    }
    if let Some(err) = &model.step_error {
        return Some(err.clone());
    }
    match model.controller.state() {
        RequestState::Error { message, .. } => Some(message.clone()),
        _ => None,
    }
}

pub fn view(model: &Model) -> Node<Msg> {
    div![
        C!["app-container"],
        view_planner(model),
        view_directions_panel(model),
    ]
}

fn view_planner(model: &Model) -> Node<Msg> {
    div![
        C!["planner"],
        view_endpoint_row(
            model,
            EndpointRole::Origin,
            "Choose starting point, or click on the map"
        ),
        view_endpoint_row(model, EndpointRole::Destination, "Choose destination..."),
        div![
            C!["planner-actions"],
            button![
                C!["swap-btn"],
                "⇅ Swap",
                ev(Ev::Click, |event| {
                    event.prevent_default();
                    Msg::SwapEndpoints
                }),
            ],
            button![
                C!["options-toggle"],
                if model.show_options {
                    "Hide options"
                } else {
                    "Show options"
                },
                ev(Ev::Click, |event| {
                    event.prevent_default();
                    Msg::ToggleOptions
                }),
            ],
            button![
                C!["submit-btn"],
                if model.controller.is_loading() {
                    "Loading..."
                } else {
                    "Directions"
                },
                attrs! {
                    At::Disabled => bool_attr(
                        model.controller.is_loading() || !model.resolver.both_resolved()
                    ),
                },
                ev(Ev::Click, |event| {
                    event.prevent_default();
                    Msg::Submit
                }),
            ],
        ],
        div![
            C!["my-location"],
            button![
                "📍 My location as start",
                ev(Ev::Click, |event| {
                    event.prevent_default();
                    Msg::UseMyLocation(EndpointRole::Origin)
                }),
            ],
            button![
                "📍 My location as destination",
                ev(Ev::Click, |event| {
                    event.prevent_default();
                    Msg::UseMyLocation(EndpointRole::Destination)
                }),
            ],
        ],
        if model.show_options {
            view_options(model)
        } else {
            empty![]
        },
        if let Some(error) = error_line(model) {
            p![C!["error"], error]
        } else {
            empty![]
        },
    ]
}

fn view_endpoint_row(model: &Model, role: EndpointRole, placeholder: &str) -> Node<Msg> {
    let slot = model.resolver.slot(role);
    div![
        C!["endpoint-row", role.as_str()],
        input![
            attrs! {
                At::Value => slot.label.as_str(),
                At::Placeholder => placeholder,
                At::AutoComplete => "off",
                At::SpellCheck => "false",
            },
            ev(Ev::Focus, move |_| Msg::InputFocused(role)),
        ],
        if slot.label.is_empty() {
            empty![]
        } else {
            button![
                C!["clear-btn"],
                "×",
                ev(Ev::Click, move |event| {
                    event.prevent_default();
                    Msg::ClearEndpoint(role)
                }),
            ]
        },
    ]
}

fn view_options(model: &Model) -> Node<Msg> {
    fieldset![
        C!["options"],
        legend!["Options"],
        div![
            C!["option-row"],
            label!["Elevation Sensitivity:"],
            input![
                attrs! {
                    At::Type => "range",
                    At::Min => MIN_ELEVATION_SENSITIVITY.to_string(),
                    At::Max => MAX_ELEVATION_SENSITIVITY.to_string(),
                    At::Value => model.prefs.elevation_sensitivity().to_string(),
                },
                input_ev(Ev::Input, Msg::ElevationChanged),
            ],
            span![model.prefs.elevation_sensitivity().to_string()],
        ],
        div![
            C!["option-row"],
            label![
                input![
                    attrs! {
                        At::Type => "checkbox",
                        At::Checked => bool_attr(model.prefs.avoid_obstacles()),
                    },
                    ev(Ev::Change, |_| Msg::ObstaclesToggled),
                ],
                span!["Avoid Obstacles"],
            ],
        ],
    ]
}

fn view_directions_panel(model: &Model) -> Node<Msg> {
    if !model.show_directions || model.navigator.is_empty() {
        return empty![];
    }

    let steps = model.navigator.steps().iter().enumerate().map(|(index, step)| {
        div![
            C![
                "direction-step",
                IF!(model.navigator.focused() == Some(index) => "active")
            ],
            ev(Ev::Click, move |_| Msg::FocusStep(index)),
            span![C!["step-number"], (index + 1).to_string()],
            div![
                C!["step-body"],
                div![C!["step-text"], step.text.clone()],
                if step.distance > 0.0 {
                    div![C!["step-distance"], format_distance(step.distance)]
                } else {
                    empty![]
                },
            ],
        ]
    });

    div![
        C!["directions-panel"],
        div![
            C!["directions-header"],
            h2!["Directions"],
            button![
                "×",
                ev(Ev::Click, |event| {
                    event.prevent_default();
                    Msg::CloseDirections
                }),
            ],
        ],
        div![C!["directions-list"], steps],
    ]
}

fn bool_attr(value: bool) -> AtValue {
    if value {
        AtValue::Some("true".into())
    } else {
        AtValue::Ignored
    }
}

fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{meters:.0} m")
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    LeafletView::init(&MapStyle::default());
    App::start("app", init, update, view);
}

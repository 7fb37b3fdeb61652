use shared::{Coordinate, DirectionStep, RoutePreferences, RouteRequest, RouteResponse};

use crate::directions::DirectionsNavigator;
use crate::error::RequestError;
use crate::map::{MapView, ROUTE_FIT_PADDING_PX};

/// Lifecycle of the latest route request. `Validating` is only
/// observable inside `submit`, which runs to completion; the loop
/// re-enters `Validating` on every new submission, from any state.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestState {
    #[default]
    Idle,
    Validating,
    Loading(u64),
    Success(u64),
    Error { generation: u64, message: String },
}

/// A validated request waiting to be dispatched, tagged with the
/// generation that will identify its response.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub generation: u64,
    pub payload: RouteRequest,
}

/// An accepted route. Replaced wholesale by a newer success, never
/// mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    pub path: Vec<Coordinate>,
    pub steps: Vec<DirectionStep>,
}

/// Validates endpoint readiness, hands out generation-tagged requests
/// and applies responses, discarding any response that a later
/// submission has superseded.
#[derive(Debug, Default)]
pub struct RouteRequestController {
    state: RequestState,
    generation: u64,
    route: Option<RouteResult>,
}

impl RouteRequestController {
    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn route(&self) -> Option<&RouteResult> {
        self.route.as_ref()
    }

    pub fn path(&self) -> &[Coordinate] {
        self.route.as_ref().map_or(&[], |route| &route.path)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, RequestState::Loading(_))
    }

    /// Validates the endpoints and, when both are resolved, allocates
    /// the next generation and returns the request for dispatch. A
    /// missing endpoint short-circuits to `Error` with no network call.
    pub fn submit(
        &mut self,
        origin: Option<Coordinate>,
        destination: Option<Coordinate>,
        prefs: RoutePreferences,
    ) -> Option<PendingRequest> {
        self.state = RequestState::Validating;
        let (Some(origin), Some(destination)) = (origin, destination) else {
            self.state = RequestState::Error {
                generation: self.generation,
                message: RequestError::MissingEndpoint.to_string(),
            };
            return None;
        };
        self.generation += 1;
        self.state = RequestState::Loading(self.generation);
        Some(PendingRequest {
            generation: self.generation,
            payload: RouteRequest::new(origin, destination, prefs),
        })
    }

    /// Applies a response for the given generation. A response that no
    /// longer matches the latest issued generation is discarded and
    /// every piece of state is left untouched; the return value says
    /// whether the response was applied. On success the previous
    /// result is dropped, the steps go to the navigator and the
    /// viewport is fitted to the new path. On failure the previous
    /// result stays.
    pub fn apply_response(
        &mut self,
        generation: u64,
        result: Result<RouteResponse, RequestError>,
        navigator: &mut DirectionsNavigator,
        map: &dyn MapView,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        match result {
            Err(err) => self.fail(generation, err.to_string()),
            Ok(response) => {
                // The service reports application failures in-band.
                if let Some(message) = response.error {
                    self.fail(generation, message);
                    return true;
                }
                match validate_route(response.route) {
                    Err(err) => self.fail(generation, err.to_string()),
                    Ok(path) => {
                        let steps = response.directions.unwrap_or_default();
                        navigator.set_steps(steps.clone());
                        map.fit_bounds(&path, ROUTE_FIT_PADDING_PX);
                        self.route = Some(RouteResult { path, steps });
                        self.state = RequestState::Success(generation);
                    }
                }
            }
        }
        true
    }

    fn fail(&mut self, generation: u64, message: String) {
        self.state = RequestState::Error {
            generation,
            message,
        };
    }
}

fn validate_route(route: Option<Vec<Coordinate>>) -> Result<Vec<Coordinate>, RequestError> {
    match route {
        Some(path) if !path.is_empty() => Ok(path),
        Some(_) => Err(RequestError::InvalidResponse("empty route".into())),
        None => Err(RequestError::InvalidResponse("missing route".into())),
    }
}

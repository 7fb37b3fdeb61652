use shared::RoutePreferences;

pub const MIN_ELEVATION_SENSITIVITY: u8 = 1;
pub const MAX_ELEVATION_SENSITIVITY: u8 = 10;

/// Holds the user's routing preferences. Elevation sensitivity is
/// clamped into `[1, 10]` at the setter; the stored value is always in
/// range. Requests read a snapshot at submit time, so later edits do
/// not touch an in-flight or completed request.
#[derive(Debug, Default)]
pub struct PreferencesStore {
    prefs: RoutePreferences,
}

impl PreferencesStore {
    pub fn set_elevation_sensitivity(&mut self, value: u8) {
        self.prefs.elevation_sensitivity =
            value.clamp(MIN_ELEVATION_SENSITIVITY, MAX_ELEVATION_SENSITIVITY);
    }

    pub fn elevation_sensitivity(&self) -> u8 {
        self.prefs.elevation_sensitivity
    }

    pub fn set_avoid_obstacles(&mut self, value: bool) {
        self.prefs.avoid_obstacles = value;
    }

    pub fn avoid_obstacles(&self) -> bool {
        self.prefs.avoid_obstacles
    }

    pub fn snapshot(&self) -> RoutePreferences {
        self.prefs
    }
}

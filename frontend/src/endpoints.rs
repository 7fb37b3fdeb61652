use serde::Deserialize;
use shared::Coordinate;

/// Label written by a completed device-location resolution.
pub const DEVICE_LOCATION_LABEL: &str = "My Location";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointRole {
    Origin,
    Destination,
}

impl EndpointRole {
    pub fn as_str(self) -> &'static str {
        match self {
            EndpointRole::Origin => "origin",
            EndpointRole::Destination => "destination",
        }
    }
}

/// One of the two endpoint slots. Created unset at startup and
/// overwritten, never destroyed, by resolution events. The label may
/// lag the coordinate only while a resolution is in flight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndpointSlot {
    pub coordinate: Option<Coordinate>,
    pub label: String,
}

/// Tracks which slot, if any, the next map tap should fill. Set when
/// an endpoint input gains focus; read, not cleared, by tap resolution.
#[derive(Debug, Default)]
pub struct ActiveSlotTracker {
    active: Option<EndpointRole>,
}

impl ActiveSlotTracker {
    pub fn set_active(&mut self, role: EndpointRole) {
        self.active = Some(role);
    }

    pub fn active(&self) -> Option<EndpointRole> {
        self.active
    }
}

/// Owns the origin and destination slots and resolves each from one of
/// three input modalities. Resolutions for the same role may race; the
/// last one to complete wins, regardless of which was issued first.
#[derive(Debug, Default)]
pub struct EndpointResolver {
    origin: EndpointSlot,
    destination: EndpointSlot,
}

impl EndpointResolver {
    pub fn slot(&self, role: EndpointRole) -> &EndpointSlot {
        match role {
            EndpointRole::Origin => &self.origin,
            EndpointRole::Destination => &self.destination,
        }
    }

    fn slot_mut(&mut self, role: EndpointRole) -> &mut EndpointSlot {
        match role {
            EndpointRole::Origin => &mut self.origin,
            EndpointRole::Destination => &mut self.destination,
        }
    }

    pub fn coordinate(&self, role: EndpointRole) -> Option<Coordinate> {
        self.slot(role).coordinate
    }

    /// Applies a place-search selection. A selection without geometry
    /// is a no-op, not an error. Returns whether the slot was written.
    pub fn resolve_from_search(
        &mut self,
        role: EndpointRole,
        geometry: Option<Coordinate>,
        label: impl Into<String>,
    ) -> bool {
        let Some(coordinate) = geometry else {
            return false;
        };
        let slot = self.slot_mut(role);
        slot.coordinate = Some(coordinate);
        slot.label = label.into();
        true
    }

    /// Applies a map tap to whichever role the tracker designates
    /// active. No active role means the tap is dropped. Returns the
    /// role that was written.
    pub fn resolve_from_map_tap(
        &mut self,
        tracker: &ActiveSlotTracker,
        coordinate: Coordinate,
    ) -> Option<EndpointRole> {
        let role = tracker.active()?;
        let slot = self.slot_mut(role);
        slot.coordinate = Some(coordinate);
        slot.label = tap_label(coordinate);
        Some(role)
    }

    /// Applies a completed device-location fix. The async half of the
    /// call, including its failure modes, lives with the caller.
    pub fn resolve_from_device_location(&mut self, role: EndpointRole, coordinate: Coordinate) {
        let slot = self.slot_mut(role);
        slot.coordinate = Some(coordinate);
        slot.label = DEVICE_LOCATION_LABEL.to_string();
    }

    pub fn clear(&mut self, role: EndpointRole) {
        *self.slot_mut(role) = EndpointSlot::default();
    }

    /// Exchanges the two slots in a single observable step.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.origin, &mut self.destination);
    }

    pub fn both_resolved(&self) -> bool {
        self.origin.coordinate.is_some() && self.destination.coordinate.is_some()
    }
}

/// Display label for a tapped point, six decimal digits per axis.
pub fn tap_label(coordinate: Coordinate) -> String {
    format!("{:.6}, {:.6}", coordinate.lat, coordinate.lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate { lat, lon }
    }

    #[test]
    fn slots_start_unset() {
        let resolver = EndpointResolver::default();
        assert_eq!(resolver.coordinate(EndpointRole::Origin), None);
        assert_eq!(resolver.coordinate(EndpointRole::Destination), None);
        assert_eq!(resolver.slot(EndpointRole::Origin).label, "");
        assert!(!resolver.both_resolved());
    }

    #[test]
    fn search_resolution_writes_coordinate_and_label_together() {
        let mut resolver = EndpointResolver::default();
        let written = resolver.resolve_from_search(
            EndpointRole::Origin,
            Some(coord(39.75, -105.22)),
            "Golden, CO",
        );
        assert!(written);
        let slot = resolver.slot(EndpointRole::Origin);
        assert_eq!(slot.coordinate, Some(coord(39.75, -105.22)));
        assert_eq!(slot.label, "Golden, CO");
    }

    #[test]
    fn search_selection_without_geometry_is_a_no_op() {
        let mut resolver = EndpointResolver::default();
        resolver.resolve_from_search(EndpointRole::Origin, Some(coord(1.0, 2.0)), "First");

        let written = resolver.resolve_from_search(EndpointRole::Origin, None, "Second");
        assert!(!written);
        let slot = resolver.slot(EndpointRole::Origin);
        assert_eq!(slot.coordinate, Some(coord(1.0, 2.0)));
        assert_eq!(slot.label, "First");
    }

    #[test]
    fn map_tap_fills_the_active_slot() {
        let mut resolver = EndpointResolver::default();
        let mut tracker = ActiveSlotTracker::default();
        tracker.set_active(EndpointRole::Destination);

        let role = resolver.resolve_from_map_tap(&tracker, coord(39.751891, -105.215880));
        assert_eq!(role, Some(EndpointRole::Destination));
        let slot = resolver.slot(EndpointRole::Destination);
        assert_eq!(slot.coordinate, Some(coord(39.751891, -105.215880)));
        assert_eq!(slot.label, "39.751891, -105.215880");
    }

    #[test]
    fn map_tap_without_active_slot_is_dropped() {
        let mut resolver = EndpointResolver::default();
        let tracker = ActiveSlotTracker::default();

        let role = resolver.resolve_from_map_tap(&tracker, coord(1.0, 2.0));
        assert_eq!(role, None);
        assert!(!resolver.both_resolved());
    }

    #[test]
    fn map_tap_does_not_consume_the_active_slot() {
        let mut resolver = EndpointResolver::default();
        let mut tracker = ActiveSlotTracker::default();
        tracker.set_active(EndpointRole::Origin);

        resolver.resolve_from_map_tap(&tracker, coord(1.0, 1.0));
        resolver.resolve_from_map_tap(&tracker, coord(2.0, 2.0));
        assert_eq!(
            resolver.coordinate(EndpointRole::Origin),
            Some(coord(2.0, 2.0))
        );
    }

    #[test]
    fn device_location_overwrites_like_any_other_resolution() {
        let mut resolver = EndpointResolver::default();
        resolver.resolve_from_search(EndpointRole::Origin, Some(coord(1.0, 1.0)), "Somewhere");
        resolver.resolve_from_device_location(EndpointRole::Origin, coord(39.75, -105.22));

        let slot = resolver.slot(EndpointRole::Origin);
        assert_eq!(slot.coordinate, Some(coord(39.75, -105.22)));
        assert_eq!(slot.label, DEVICE_LOCATION_LABEL);
    }

    #[test]
    fn last_completing_resolution_wins() {
        // A slow geolocation fix landing after a search selection
        // overwrites it, by policy.
        let mut resolver = EndpointResolver::default();
        resolver.resolve_from_search(EndpointRole::Origin, Some(coord(1.0, 1.0)), "Typed");
        resolver.resolve_from_device_location(EndpointRole::Origin, coord(2.0, 2.0));
        assert_eq!(
            resolver.slot(EndpointRole::Origin).label,
            DEVICE_LOCATION_LABEL
        );

        // And the reverse order leaves the search selection in place.
        let mut resolver = EndpointResolver::default();
        resolver.resolve_from_device_location(EndpointRole::Origin, coord(2.0, 2.0));
        resolver.resolve_from_search(EndpointRole::Origin, Some(coord(1.0, 1.0)), "Typed");
        assert_eq!(resolver.slot(EndpointRole::Origin).label, "Typed");
    }

    #[test]
    fn clear_resets_coordinate_and_label() {
        let mut resolver = EndpointResolver::default();
        resolver.resolve_from_search(EndpointRole::Origin, Some(coord(1.0, 1.0)), "Somewhere");
        resolver.clear(EndpointRole::Origin);
        assert_eq!(resolver.slot(EndpointRole::Origin), &EndpointSlot::default());
    }

    #[test]
    fn swap_exchanges_both_fields_atomically() {
        let mut resolver = EndpointResolver::default();
        resolver.resolve_from_search(EndpointRole::Origin, Some(coord(1.0, 1.0)), "A");
        resolver.resolve_from_search(EndpointRole::Destination, Some(coord(2.0, 2.0)), "B");

        resolver.swap();

        let origin = resolver.slot(EndpointRole::Origin);
        let destination = resolver.slot(EndpointRole::Destination);
        assert_eq!(origin.coordinate, Some(coord(2.0, 2.0)));
        assert_eq!(origin.label, "B");
        assert_eq!(destination.coordinate, Some(coord(1.0, 1.0)));
        assert_eq!(destination.label, "A");
        assert_ne!(origin, destination);
    }

    #[test]
    fn swap_with_one_unset_slot_moves_the_gap() {
        let mut resolver = EndpointResolver::default();
        resolver.resolve_from_search(EndpointRole::Origin, Some(coord(1.0, 1.0)), "A");

        resolver.swap();

        assert_eq!(resolver.coordinate(EndpointRole::Origin), None);
        assert_eq!(
            resolver.coordinate(EndpointRole::Destination),
            Some(coord(1.0, 1.0))
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_tap_label_reparses_to_the_tapped_point(
                lat in -90.0..=90.0,
                lon in -180.0..=180.0,
            ) {
                let label = tap_label(Coordinate { lat, lon });
                let mut parts = label.split(", ");
                let lat_back: f64 = parts.next().unwrap().parse().unwrap();
                let lon_back: f64 = parts.next().unwrap().parse().unwrap();
                prop_assert!(parts.next().is_none());
                // Six printed decimals bound the rounding error.
                prop_assert!((lat - lat_back).abs() <= 5e-7);
                prop_assert!((lon - lon_back).abs() <= 5e-7);
            }

            #[test]
            fn prop_swap_is_an_involution(
                a_lat in -90.0..=90.0,
                a_lon in -180.0..=180.0,
                b_lat in -90.0..=90.0,
                b_lon in -180.0..=180.0,
            ) {
                let mut resolver = EndpointResolver::default();
                resolver.resolve_from_search(
                    EndpointRole::Origin,
                    Some(Coordinate { lat: a_lat, lon: a_lon }),
                    "A",
                );
                resolver.resolve_from_search(
                    EndpointRole::Destination,
                    Some(Coordinate { lat: b_lat, lon: b_lon }),
                    "B",
                );
                let before = (
                    resolver.slot(EndpointRole::Origin).clone(),
                    resolver.slot(EndpointRole::Destination).clone(),
                );
                resolver.swap();
                resolver.swap();
                let after = (
                    resolver.slot(EndpointRole::Origin).clone(),
                    resolver.slot(EndpointRole::Destination).clone(),
                );
                prop_assert_eq!(before, after);
            }
        }
    }
}

//! Per-source route and station construction.
//!
//! Each data source forms station ids and builds routes slightly
//! differently. Rather than specialising a common loader per source, the
//! loader is handed a [`RouteFactory`] for the source it is reading.

use crate::domain::{AgencyId, CallingPointPattern, Route, RouteId, Station, StationId, TransportMode};

use super::RouteAssignments;

/// The capabilities a data source provides to the import pipeline.
pub trait RouteFactory {
    /// Whatever the source's parser yields for one route.
    type RouteInput;

    /// Default mode for routes from this source.
    fn mode(&self) -> TransportMode;

    /// Normalise a raw station reference from the source.
    fn form_station_id(&self, raw: &str) -> StationId;

    fn create_station(&self, raw_id: &str, name: &str) -> Station {
        Station::new(self.form_station_id(raw_id), name.trim())
    }

    /// Build a route, or `None` if the input cannot be mapped to one.
    fn create_route(&self, input: &Self::RouteInput) -> Option<Route>;
}

/// A route row as read from a GTFS `routes.txt`.
#[derive(Debug, Clone)]
pub struct GtfsRouteRecord {
    pub route_id: String,
    pub agency_id: String,
    pub short_name: String,
    pub long_name: String,
    pub route_type: u16,
}

/// Routes from GTFS feeds keep the feed's own route id.
#[derive(Debug, Clone)]
pub struct GtfsRouteFactory {
    mode: TransportMode,
    stop_prefix: Option<String>,
}

impl GtfsRouteFactory {
    /// A factory for a feed whose routes default to `mode`.
    pub fn new(mode: TransportMode) -> Self {
        Self {
            mode,
            stop_prefix: None,
        }
    }

    /// Strip a feed-wide prefix from stop ids (e.g. NaPTAN `"9400ZZ"`).
    pub fn with_stop_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.stop_prefix = Some(prefix.into());
        self
    }
}

impl RouteFactory for GtfsRouteFactory {
    type RouteInput = GtfsRouteRecord;

    fn mode(&self) -> TransportMode {
        self.mode
    }

    fn form_station_id(&self, raw: &str) -> StationId {
        let trimmed = raw.trim();
        let id = self
            .stop_prefix
            .as_deref()
            .and_then(|prefix| trimmed.strip_prefix(prefix))
            .unwrap_or(trimmed);
        StationId::new(id)
    }

    fn create_route(&self, input: &GtfsRouteRecord) -> Option<Route> {
        if input.route_id.trim().is_empty() {
            return None;
        }
        let mode = TransportMode::from_gtfs_route_type(input.route_type).unwrap_or(self.mode);
        let name = if input.long_name.trim().is_empty() {
            input.short_name.trim()
        } else {
            input.long_name.trim()
        };
        Some(Route::new(
            RouteId::flat(input.route_id.trim()),
            name,
            AgencyId::new(input.agency_id.trim()),
            mode,
        ))
    }
}

/// Rail routes take their identity from the calling-point assigner.
#[derive(Debug, Clone)]
pub struct RailRouteFactory {
    assignments: RouteAssignments,
}

impl RailRouteFactory {
    pub fn new(assignments: RouteAssignments) -> Self {
        Self { assignments }
    }

    pub fn assignments(&self) -> &RouteAssignments {
        &self.assignments
    }
}

impl RouteFactory for RailRouteFactory {
    type RouteInput = CallingPointPattern;

    fn mode(&self) -> TransportMode {
        TransportMode::Train
    }

    /// TIPLOCs are upper-case and sometimes space padded in CIF extracts.
    fn form_station_id(&self, raw: &str) -> StationId {
        StationId::new(raw.trim().to_ascii_uppercase())
    }

    fn create_route(&self, pattern: &CallingPointPattern) -> Option<Route> {
        let id = self.assignments.composite_for(pattern)?;
        let name = format!("{} to {}", id.begin(), id.end());
        Some(Route::new(
            RouteId::Composite(id.clone()),
            name,
            id.agency().clone(),
            TransportMode::Train,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::RouteIdAssigner;

    fn record(route_id: &str, route_type: u16) -> GtfsRouteRecord {
        GtfsRouteRecord {
            route_id: route_id.to_string(),
            agency_id: "METL".to_string(),
            short_name: "Blue".to_string(),
            long_name: "Bury - Piccadilly".to_string(),
            route_type,
        }
    }

    #[test]
    fn gtfs_keeps_flat_id() {
        let factory = GtfsRouteFactory::new(TransportMode::Tram);
        let route = factory.create_route(&record("METLBLUE:I:", 0)).unwrap();
        assert_eq!(route.id, RouteId::flat("METLBLUE:I:"));
        assert_eq!(route.name, "Bury - Piccadilly");
        assert_eq!(route.agency, AgencyId::new("METL"));
        assert_eq!(route.mode, TransportMode::Tram);
    }

    #[test]
    fn gtfs_mode_from_route_type_with_fallback() {
        let factory = GtfsRouteFactory::new(TransportMode::Tram);
        assert_eq!(factory.create_route(&record("R1", 3)).unwrap().mode, TransportMode::Bus);
        assert_eq!(factory.create_route(&record("R2", 6)).unwrap().mode, TransportMode::Tram);
    }

    #[test]
    fn gtfs_short_name_when_long_name_blank() {
        let factory = GtfsRouteFactory::new(TransportMode::Bus);
        let mut input = record("R1", 3);
        input.long_name = "  ".to_string();
        assert_eq!(factory.create_route(&input).unwrap().name, "Blue");
    }

    #[test]
    fn gtfs_blank_route_id_rejected() {
        let factory = GtfsRouteFactory::new(TransportMode::Bus);
        assert!(factory.create_route(&record(" ", 3)).is_none());
    }

    #[test]
    fn gtfs_station_prefix_stripped() {
        let factory = GtfsRouteFactory::new(TransportMode::Tram).with_stop_prefix("9400ZZ");
        assert_eq!(factory.form_station_id("9400ZZMAPIC").as_str(), "MAPIC");
        assert_eq!(factory.form_station_id("1800SB12345").as_str(), "1800SB12345");
        let station = factory.create_station(" 9400ZZMASTP ", " St Peter's Square ");
        assert_eq!(station.id.as_str(), "MASTP");
        assert_eq!(station.name, "St Peter's Square");
    }

    #[test]
    fn rail_uses_assigned_identity() {
        let vt = AgencyId::new("VT");
        let pattern = CallingPointPattern::from_ids(vt.clone(), ["MNCRPIC", "STKP", "EUSTON"]);
        let unknown = CallingPointPattern::from_ids(vt, ["CREWE", "EUSTON"]);
        let assignments = RouteIdAssigner::new().assign([pattern.clone()]);
        let factory = RailRouteFactory::new(assignments);

        let route = factory.create_route(&pattern).unwrap();
        assert_eq!(route.id.to_string(), "MNCRPIC:EUSTON:VT:1");
        assert_eq!(route.name, "MNCRPIC to EUSTON");
        assert_eq!(route.mode, TransportMode::Train);
        assert!(factory.create_route(&unknown).is_none());
    }

    #[test]
    fn rail_station_ids_normalised() {
        let factory = RailRouteFactory::new(RouteAssignments::default());
        assert_eq!(factory.form_station_id(" stkp   ").as_str(), "STKP");
        assert_eq!(factory.mode(), TransportMode::Train);
    }
}

//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Line, Station};
use crate::path::RoutePlan;

/// Request to register a station.
#[derive(Debug, Deserialize)]
pub struct CreateStationRequest {
    /// Station display name
    pub name: String,
}

/// Request to rename a station.
#[derive(Debug, Deserialize)]
pub struct UpdateStationRequest {
    /// New display name
    pub name: String,
}

/// A station in responses.
#[derive(Debug, Serialize)]
pub struct StationResponse {
    /// Station id
    pub id: i64,

    /// Station display name
    pub name: String,
}

/// Request to create a line together with its first section.
#[derive(Debug, Deserialize)]
pub struct CreateLineRequest {
    /// Line display name
    pub name: String,

    /// Line display color
    pub color: String,

    /// Up station of the first section
    pub up_station_id: i64,

    /// Down station of the first section
    pub down_station_id: i64,

    /// Distance of the first section
    pub distance: u32,
}

/// Request to update a line's display info.
#[derive(Debug, Deserialize)]
pub struct UpdateLineRequest {
    /// New display name
    pub name: String,

    /// New display color
    pub color: String,
}

/// A line in responses.
#[derive(Debug, Serialize)]
pub struct LineResponse {
    /// Line id
    pub id: i64,

    /// Line display name
    pub name: String,

    /// Line display color
    pub color: String,

    /// Stations the line visits, up terminal first
    pub stations: Vec<StationResponse>,
}

/// Request to attach a section to a line.
#[derive(Debug, Deserialize)]
pub struct CreateSectionRequest {
    /// Up station of the new section
    pub up_station_id: i64,

    /// Down station of the new section
    pub down_station_id: i64,

    /// Section distance
    pub distance: u32,
}

/// Query parameters for removing a station from a line.
#[derive(Debug, Deserialize)]
pub struct RemoveSectionParams {
    /// Station to remove
    pub station_id: i64,
}

/// Query parameters for a route search.
#[derive(Debug, Deserialize)]
pub struct PathQuery {
    /// Station id to start from
    pub source: i64,

    /// Station id to reach
    pub target: i64,
}

/// A computed route in responses.
#[derive(Debug, Serialize)]
pub struct PathResponse {
    /// Stations visited, in travel order
    pub stations: Vec<StationResponse>,

    /// Summed distance over the route
    pub distance: u64,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl StationResponse {
    /// Create from a domain Station.
    pub fn from_station(station: &Station) -> Self {
        Self {
            id: station.id().0,
            name: station.name().to_string(),
        }
    }
}

impl LineResponse {
    /// Create from a domain Line.
    pub fn from_line(line: &Line) -> Self {
        Self {
            id: line.id().0,
            name: line.name().to_string(),
            color: line.color().to_string(),
            stations: line
                .stations()
                .iter()
                .map(StationResponse::from_station)
                .collect(),
        }
    }
}

impl PathResponse {
    /// Create from a computed route.
    pub fn from_plan(plan: &RoutePlan) -> Self {
        Self {
            stations: plan
                .stations
                .iter()
                .map(StationResponse::from_station)
                .collect(),
            distance: plan.total_distance,
        }
    }
}

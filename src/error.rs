use thiserror::Error;

use crate::graph::VertexId;

/// Fatal for the whole run: no graph is built from a document that fails here.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("malformed network document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("station {station:?} on line {line:?} has no coordinate field")]
    MissingCoordinate { line: String, station: String },

    #[error("station {station:?} on line {line:?} has malformed coordinate {value:?}, expected \"lon,lat\"")]
    MalformedCoordinate {
        line: String,
        station: String,
        value: String,
    },
}

/// Local to a single query; the graph stays usable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("no such station {0:?}")]
    UnknownStation(String),

    #[error("vertex id {id} is outside the graph (0..{len})")]
    VertexOutOfRange { id: VertexId, len: usize },

    #[error("no route from {from:?} to {to:?}")]
    NoPath { from: String, to: String },
}

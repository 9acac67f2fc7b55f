//! Shortest routes over a metro network.
//!
//! A line/station JSON document is flattened into ordered [`StationRecord`]s, stations are
//! deduplicated by name into a [`Graph`] whose directed edges join consecutive stations on
//! the same line (weighted by great-circle distance in whole meters), and Dijkstra answers
//! route queries over it.

pub mod dijkstra;
pub mod error;
pub mod geo;
pub mod graph;
pub mod ingest;
pub mod network;

pub use dijkstra::{Path, Routes, ShortestPaths};
pub use error::{IngestError, QueryError};
pub use geo::Coordinate;
pub use graph::{Graph, Meters, Vertex, VertexId};
pub use ingest::StationRecord;
pub use network::{Route, SubwayNetwork};

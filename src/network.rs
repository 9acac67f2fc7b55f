use crate::dijkstra::{self, ShortestPaths};
use crate::error::{IngestError, QueryError};
use crate::graph::{Graph, Meters, VertexId};
use crate::ingest::{self, StationRecord};

/// A route between two named stations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub distance: Meters,
    /// Origin first, destination last.
    pub stations: Vec<String>,
}

/// Ingested network plus its station graph, queried by station name.
#[derive(Debug)]
pub struct SubwayNetwork {
    pub name: String,
    pub id: String,
    records: Vec<StationRecord>,
    graph: Graph,
}

impl SubwayNetwork {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, IngestError> {
        let (document, records) = ingest::ingest(bytes)?;
        let graph = Graph::build(&records);
        Ok(Self {
            name: document.name,
            id: document.id,
            records,
            graph,
        })
    }

    pub fn records(&self) -> &[StationRecord] {
        &self.records
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    fn station(&self, name: &str) -> Result<VertexId, QueryError> {
        self.graph
            .vertex_id(name)
            .ok_or_else(|| QueryError::UnknownStation(name.to_owned()))
    }

    fn names(&self, path: &[VertexId]) -> Vec<String> {
        path.iter()
            .filter_map(|&v| self.graph.vertex(v))
            .map(|v| v.name.clone())
            .collect()
    }

    fn no_path(from: &str, to: &str) -> QueryError {
        QueryError::NoPath {
            from: from.to_owned(),
            to: to.to_owned(),
        }
    }

    pub fn route(&self, from: &str, to: &str) -> Result<Route, QueryError> {
        let (source, dest) = (self.station(from)?, self.station(to)?);
        let path = dijkstra::shortest_path(&self.graph, source, dest)?
            .ok_or_else(|| Self::no_path(from, to))?;
        Ok(Route {
            distance: path.distance,
            stations: self.names(&path.vertices),
        })
    }

    /// Every equally-short route, at most `limit`.
    pub fn routes(&self, from: &str, to: &str, limit: usize) -> Result<Vec<Route>, QueryError> {
        let (source, dest) = (self.station(from)?, self.station(to)?);
        let routes = dijkstra::all_shortest_paths(&self.graph, source, dest, limit)?
            .ok_or_else(|| Self::no_path(from, to))?;
        Ok(routes
            .paths
            .iter()
            .map(|p| Route {
                distance: routes.distance,
                stations: self.names(p),
            })
            .collect())
    }

    pub fn search(&self, from: &str) -> Result<ShortestPaths, QueryError> {
        dijkstra::shortest_paths(&self.graph, self.station(from)?)
    }

    /// Distance from `from` to every station, in vertex order. `None` is unreachable.
    pub fn distances_from(&self, from: &str) -> Result<Vec<(&str, Option<Meters>)>, QueryError> {
        let search = self.search(from)?;
        Ok(self
            .graph
            .vertices()
            .iter()
            .map(|v| (v.name.as_str(), search.distance(v.id)))
            .collect())
    }
}

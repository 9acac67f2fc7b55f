use fnv::FnvHashMap;
use tracing::{debug, trace};

use crate::geo::Coordinate;
use crate::ingest::StationRecord;

pub type VertexId = usize;
/// Edge weights and path lengths, in whole meters.
pub type Meters = u64;

/// A deduplicated station.
#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
    pub id: VertexId,
    pub name: String,
    /// Coordinate of the first record seen with this name.
    pub coordinate: Coordinate,
}

/// Directed, integer-weighted station graph. Read-only once built.
#[derive(Debug, Default)]
pub struct Graph {
    vertices: Vec<Vertex>,
    index: FnvHashMap<String, VertexId>,
    arcs: Vec<FnvHashMap<VertexId, Meters>>,
    edge_count: usize,
}

impl Graph {
    /// Build from records in source order.
    ///
    /// Names are assigned ids in order of first appearance. An edge is added from each
    /// record to the next one when both are on the same line, weighted by the truncated
    /// great-circle distance between the two records' own coordinates. When the same
    /// ordered pair of stations is adjacent more than once, the last weight wins.
    pub fn build(records: &[StationRecord]) -> Self {
        let mut graph = Graph::default();
        let ids: Vec<VertexId> = records.iter().map(|r| graph.intern(r)).collect();

        for (pair, id_pair) in records.windows(2).zip(ids.windows(2)) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.line != b.line {
                continue;
            }
            // `as` truncates toward zero; NaN maps to 0.
            let weight = a.coordinate.distance_to(&b.coordinate) as Meters;
            let (u, v) = (id_pair[0], id_pair[1]);
            if let Some(old) = graph.arcs[u].insert(v, weight) {
                trace!(from = %a.name, to = %b.name, old, new = weight, "edge weight overwritten");
            } else {
                graph.edge_count += 1;
            }
        }

        debug!(
            records = records.len(),
            vertices = graph.vertices.len(),
            edges = graph.edge_count,
            "built station graph"
        );
        graph
    }

    fn intern(&mut self, record: &StationRecord) -> VertexId {
        if let Some(&id) = self.index.get(&record.name) {
            return id;
        }
        let id = self.vertices.len();
        self.vertices.push(Vertex {
            id,
            name: record.name.clone(),
            coordinate: record.coordinate,
        });
        self.index.insert(record.name.clone(), id);
        self.arcs.push(FnvHashMap::default());
        id
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of distinct directed edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    pub fn vertex_id(&self, name: &str) -> Option<VertexId> {
        self.index.get(name).copied()
    }

    pub fn weight(&self, from: VertexId, to: VertexId) -> Option<Meters> {
        self.arcs.get(from)?.get(&to).copied()
    }

    /// Outgoing edges of `from`; empty for ids outside the graph.
    pub fn arcs(&self, from: VertexId) -> impl Iterator<Item = (VertexId, Meters)> + '_ {
        self.arcs
            .get(from)
            .into_iter()
            .flat_map(|m| m.iter().map(|(&v, &w)| (v, w)))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(line: &str, name: &str, lat: f64, lon: f64) -> StationRecord {
        StationRecord {
            line: line.to_owned(),
            name: name.to_owned(),
            coordinate: Coordinate::new(lat, lon),
        }
    }

    fn weight_by_name(g: &Graph, from: &str, to: &str) -> Option<Meters> {
        g.weight(g.vertex_id(from)?, g.vertex_id(to)?)
    }

    #[test]
    fn dedups_by_name() {
        let records = vec![
            record("1", "A", 30.00, 114.00),
            record("1", "B", 30.01, 114.00),
            record("1", "C", 30.02, 114.00),
            record("2", "B", 30.50, 114.50), // shared station, different coordinate
            record("2", "D", 30.01, 114.01),
            record("3", "A", 30.00, 114.00),
        ];
        let g = Graph::build(&records);
        assert_eq!(g.len(), 4);
        for r in &records {
            let id = g.vertex_id(&r.name).unwrap();
            assert!(id < g.len());
            assert_eq!(g.vertex(id).unwrap().name, r.name);
        }
        assert_eq!(g.vertex_id("A"), Some(0));
        assert_eq!(g.vertex_id("D"), Some(3));
        // first-seen coordinate wins
        assert_eq!(g.vertex(1).unwrap().coordinate, Coordinate::new(30.01, 114.00));
    }

    #[test]
    fn edges_only_between_consecutive_same_line_records() {
        let records = vec![
            record("1", "A", 30.00, 114.00),
            record("1", "B", 30.01, 114.00),
            record("2", "C", 30.02, 114.00),
            record("2", "D", 30.03, 114.00),
        ];
        let g = Graph::build(&records);
        assert_eq!(g.edge_count(), 2);
        assert!(weight_by_name(&g, "A", "B").is_some());
        assert!(weight_by_name(&g, "C", "D").is_some());
        // line boundary
        assert_eq!(weight_by_name(&g, "B", "C"), None);
        // directed
        assert_eq!(weight_by_name(&g, "B", "A"), None);
        // terminal
        assert_eq!(g.arcs(g.vertex_id("D").unwrap()).count(), 0);
    }

    #[test]
    fn weights_are_truncated_meters() {
        let records = vec![record("1", "A", 0.0, 0.0), record("1", "B", 1.0, 0.0)];
        let g = Graph::build(&records);
        // 111194.926... m
        assert_eq!(weight_by_name(&g, "A", "B"), Some(111_194));
    }

    #[test]
    fn edge_uses_record_coordinates_not_vertex_coordinates() {
        let records = vec![
            record("1", "A", 0.0, 0.0),
            record("2", "A", 10.0, 0.0),
            record("2", "B", 11.0, 0.0),
        ];
        let g = Graph::build(&records);
        assert_eq!(weight_by_name(&g, "A", "B"), Some(111_194));
    }

    #[test]
    fn later_duplicate_edge_overwrites() {
        let records = vec![
            record("1", "A", 0.0, 0.0),
            record("1", "B", 1.0, 0.0),
            record("2", "A", 0.0, 0.0),
            record("2", "B", 2.0, 0.0),
        ];
        let g = Graph::build(&records);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(weight_by_name(&g, "A", "B"), Some(222_389));
    }

    #[test]
    fn short_lines_contribute_no_edges() {
        let g = Graph::build(&[record("1", "A", 0.0, 0.0), record("2", "B", 0.0, 1.0)]);
        assert_eq!(g.len(), 2);
        assert_eq!(g.edge_count(), 0);
        let empty = Graph::build(&[]);
        assert!(empty.is_empty());
        assert_eq!(empty.arcs(0).count(), 0);
    }

    #[test]
    fn rebuild_is_isomorphic_by_name() {
        let records = vec![
            record("1", "A", 30.00, 114.00),
            record("1", "B", 30.01, 114.02),
            record("1", "C", 30.03, 114.01),
            record("2", "C", 30.03, 114.01),
            record("2", "A", 30.00, 114.00),
        ];
        let g1 = Graph::build(&records);
        let g2 = Graph::build(&records);
        assert_eq!(g1.len(), g2.len());
        assert_eq!(g1.edge_count(), g2.edge_count());
        for u in g1.vertices() {
            for (v, w) in g1.arcs(u.id) {
                let name = &g1.vertex(v).unwrap().name;
                assert_eq!(weight_by_name(&g2, &u.name, name), Some(w));
            }
        }
    }
}

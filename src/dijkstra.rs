use std::cmp::Reverse;

use priority_queue::PriorityQueue;
use tracing::trace;

use crate::error::QueryError;
use crate::graph::{Graph, Meters, VertexId};

/// Min-priority frontier keyed by vertex, supporting decrease-key.
type Frontier = PriorityQueue<VertexId, Reverse<Meters>>;

/// A single shortest path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    pub distance: Meters,
    /// Source first, destination last.
    pub vertices: Vec<VertexId>,
}

/// Every equally-short path between one pair of vertices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Routes {
    pub distance: Meters,
    pub paths: Vec<Vec<VertexId>>,
}

/// Result of a single-source search. `None` distances are unreachable vertices.
#[derive(Clone, Debug)]
pub struct ShortestPaths {
    source: VertexId,
    dist: Vec<Option<Meters>>,
    pred: Vec<Option<VertexId>>,
}

impl ShortestPaths {
    pub fn source(&self) -> VertexId {
        self.source
    }

    pub fn distance(&self, dest: VertexId) -> Option<Meters> {
        self.dist.get(dest).copied().flatten()
    }

    pub fn distances(&self) -> &[Option<Meters>] {
        &self.dist
    }

    pub fn reachable(&self) -> usize {
        self.dist.iter().filter(|d| d.is_some()).count()
    }

    /// Walk predecessors back from `dest`. `None` when `dest` is unreachable or out of range.
    pub fn path(&self, dest: VertexId) -> Option<Path> {
        let distance = self.distance(dest)?;
        let mut vertices = vec![dest];
        let mut current = dest;
        while current != self.source {
            current = self.pred[current]?;
            vertices.push(current);
        }
        vertices.reverse();
        Some(Path { distance, vertices })
    }
}

fn check_vertex(graph: &Graph, id: VertexId) -> Result<(), QueryError> {
    if id < graph.len() {
        Ok(())
    } else {
        Err(QueryError::VertexOutOfRange {
            id,
            len: graph.len(),
        })
    }
}

/// Dijkstra from `source` to all vertices, tracking one predecessor per vertex.
pub fn shortest_paths(graph: &Graph, source: VertexId) -> Result<ShortestPaths, QueryError> {
    check_vertex(graph, source)?;
    let n = graph.len();
    let mut dist: Vec<Option<Meters>> = vec![None; n];
    let mut pred: Vec<Option<VertexId>> = vec![None; n];
    let mut finalized = vec![false; n];
    let mut frontier = Frontier::new();

    dist[source] = Some(0);
    frontier.push(source, Reverse(0));

    while let Some((u, Reverse(cost))) = frontier.pop() {
        finalized[u] = true;
        for (v, w) in graph.arcs(u) {
            if finalized[v] {
                continue;
            }
            let next = cost.saturating_add(w);
            if dist[v].map_or(true, |d| next < d) {
                dist[v] = Some(next);
                pred[v] = Some(u);
                frontier.push_increase(v, Reverse(next));
            }
        }
    }

    Ok(ShortestPaths { source, dist, pred })
}

/// Shortest path between two vertices. `Ok(None)` when `dest` cannot be reached.
pub fn shortest_path(
    graph: &Graph,
    source: VertexId,
    dest: VertexId,
) -> Result<Option<Path>, QueryError> {
    check_vertex(graph, dest)?;
    Ok(shortest_paths(graph, source)?.path(dest))
}

/// Every shortest path from `source` to `dest`, at most `limit` of them (at least one).
///
/// A vertex keeps every predecessor that reaches it at its final distance, as long as the
/// vertex was still on the frontier at the time. Ties across a zero-weight edge into an
/// already finalized vertex are not recorded, which keeps the predecessor relation acyclic.
/// Such routes are not enumerated: if `s -> v` and `s -> w` both cost `d` and `w -> v`
/// costs 0, only `s -> v` is returned when `v` is finalized before `w` is expanded. The
/// search also stops once `dest` is finalized.
pub fn all_shortest_paths(
    graph: &Graph,
    source: VertexId,
    dest: VertexId,
    limit: usize,
) -> Result<Option<Routes>, QueryError> {
    check_vertex(graph, source)?;
    check_vertex(graph, dest)?;
    let n = graph.len();
    let mut dist: Vec<Option<Meters>> = vec![None; n];
    let mut preds: Vec<Vec<VertexId>> = vec![Vec::new(); n];
    let mut finalized = vec![false; n];
    let mut frontier = Frontier::new();

    dist[source] = Some(0);
    frontier.push(source, Reverse(0));

    while let Some((u, Reverse(cost))) = frontier.pop() {
        finalized[u] = true;
        if u == dest {
            break;
        }
        for (v, w) in graph.arcs(u) {
            if finalized[v] {
                continue;
            }
            let next = cost.saturating_add(w);
            match dist[v] {
                Some(d) if next > d => {}
                Some(d) if next == d => preds[v].push(u),
                _ => {
                    dist[v] = Some(next);
                    preds[v].clear();
                    preds[v].push(u);
                    frontier.push_increase(v, Reverse(next));
                }
            }
        }
    }

    let Some(distance) = dist[dest] else {
        return Ok(None);
    };
    let paths = enumerate_paths(&preds, source, dest, limit.max(1));
    trace!(source, dest, distance, paths = paths.len(), "enumerated shortest paths");
    Ok(Some(Routes { distance, paths }))
}

/// Depth-first over the predecessor DAG, from `dest` back to `source`.
fn enumerate_paths(
    preds: &[Vec<VertexId>],
    source: VertexId,
    dest: VertexId,
    limit: usize,
) -> Vec<Vec<VertexId>> {
    let mut paths = Vec::new();
    let mut stack = vec![vec![dest]];
    while let Some(mut partial) = stack.pop() {
        if paths.len() >= limit {
            break;
        }
        let Some(&head) = partial.last() else {
            continue;
        };
        if head == source {
            partial.reverse();
            paths.push(partial);
            continue;
        }
        // reversed so the first recorded predecessor is explored first
        for &p in preds[head].iter().rev() {
            let mut next = partial.clone();
            next.push(p);
            stack.push(next);
        }
    }
    paths
}

//! Resource-allocation graph types and operations

use banker_types::AllocationState;
use serde::{Serialize, Serializer};
use std::fmt;

/// Kind of graph node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Process,
    Resource,
}

/// Node identifier, rendered as `P<i>` or `R<j>`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub kind: NodeKind,
    pub index: usize,
}

impl NodeId {
    /// Node for process `index`
    #[must_use]
    pub fn process(index: usize) -> Self {
        Self {
            kind: NodeKind::Process,
            index,
        }
    }

    /// Node for resource type `index`
    #[must_use]
    pub fn resource(index: usize) -> Self {
        Self {
            kind: NodeKind::Resource,
            index,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NodeKind::Process => write!(f, "P{}", self.index),
            NodeKind::Resource => write!(f, "R{}", self.index),
        }
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Graph node
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub kind: NodeKind,
}

/// Edge kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// `Rj -> Pi`: process `i` holds units of resource `j`
    Assignment,
    /// `Pi -> Rj`: process `i` may still ask for resource `j`
    Request,
}

/// Directed edge
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct GraphEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub kind: EdgeKind,
}

/// Resource-allocation graph
///
/// Processes come first in node order, then resources. Assignment edges are
/// listed before request edges, each group in process-major order.
#[derive(Clone, Debug, Serialize)]
pub struct AllocationGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    #[serde(skip)]
    processes: usize,
    /// Adjacency list over node positions
    #[serde(skip)]
    adjacency: Vec<Vec<usize>>,
}

/// Derive the allocation graph of `state`
#[must_use]
pub fn build_graph(state: &AllocationState) -> AllocationGraph {
    let processes = state.processes();
    let resources = state.resources();

    let nodes = (0..processes)
        .map(NodeId::process)
        .chain((0..resources).map(NodeId::resource))
        .map(|id| GraphNode { id, kind: id.kind })
        .collect();

    let mut graph = AllocationGraph {
        nodes,
        edges: Vec::new(),
        processes,
        adjacency: vec![Vec::new(); processes + resources],
    };

    for (process, row) in state.allocation().iter().enumerate() {
        for (resource, &held) in row.iter().enumerate() {
            if held > 0 {
                graph.add_edge(
                    NodeId::resource(resource),
                    NodeId::process(process),
                    EdgeKind::Assignment,
                );
            }
        }
    }

    for (process, row) in state.need_matrix().iter().enumerate() {
        for (resource, &need) in row.iter().enumerate() {
            if need > 0 {
                graph.add_edge(
                    NodeId::process(process),
                    NodeId::resource(resource),
                    EdgeKind::Request,
                );
            }
        }
    }

    tracing::debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "allocation graph built"
    );
    graph
}

impl AllocationGraph {
    /// All nodes, processes first
    #[must_use]
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// All edges, assignment edges first
    #[must_use]
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// `Rj -> Pi` edges
    pub fn assignment_edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges
            .iter()
            .filter(|edge| edge.kind == EdgeKind::Assignment)
    }

    /// `Pi -> Rj` edges
    pub fn request_edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges
            .iter()
            .filter(|edge| edge.kind == EdgeKind::Request)
    }

    /// Nodes reachable from `node` over one edge
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.position(node)
            .and_then(|pos| self.adjacency.get(pos))
            .into_iter()
            .flatten()
            .map(|&pos| self.nodes[pos].id)
    }

    /// Check for cycles using DFS
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        self.find_cycle().is_some()
    }

    /// First cycle found by a depth-first search in node order
    ///
    /// The cycle is returned starting at the node where it closes. A cycle is
    /// a deadlock indicator only: with multi-unit resources a cyclic graph can
    /// still be safe.
    #[must_use]
    pub fn find_cycle(&self) -> Option<Vec<NodeId>> {
        let mut visited = vec![false; self.nodes.len()];
        let mut on_stack = vec![false; self.nodes.len()];
        let mut path = Vec::new();

        for start in 0..self.nodes.len() {
            if !visited[start] {
                if let Some(cycle) =
                    self.find_cycle_util(start, &mut visited, &mut on_stack, &mut path)
                {
                    return Some(cycle.into_iter().map(|pos| self.nodes[pos].id).collect());
                }
            }
        }
        None
    }

    /// Utility function for cycle detection
    fn find_cycle_util(
        &self,
        node: usize,
        visited: &mut [bool],
        on_stack: &mut [bool],
        path: &mut Vec<usize>,
    ) -> Option<Vec<usize>> {
        visited[node] = true;
        on_stack[node] = true;
        path.push(node);

        for &next in &self.adjacency[node] {
            if on_stack[next] {
                let start = path.iter().position(|&pos| pos == next)?;
                return Some(path[start..].to_vec());
            }
            if !visited[next] {
                if let Some(cycle) = self.find_cycle_util(next, visited, on_stack, path) {
                    return Some(cycle);
                }
            }
        }

        path.pop();
        on_stack[node] = false;
        None
    }

    fn position(&self, node: NodeId) -> Option<usize> {
        let pos = match node.kind {
            NodeKind::Process => node.index,
            NodeKind::Resource => self.processes + node.index,
        };
        (pos < self.nodes.len() && self.nodes[pos].id == node).then_some(pos)
    }

    fn add_edge(&mut self, from: NodeId, to: NodeId, kind: EdgeKind) {
        if let (Some(from_pos), Some(to_pos)) = (self.position(from), self.position(to)) {
            self.adjacency[from_pos].push(to_pos);
            self.edges.push(GraphEdge { from, to, kind });
        }
    }
}

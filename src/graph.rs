use rustc_hash::{FxHashMap, FxHashSet};

/// A hashtag vertex and the ids of its co-occurring neighbors.
#[derive(Debug, Clone)]
struct Node {
    tag: String,
    neighbors: Vec<u32>,
}

/// Undirected hashtag co-occurrence graph built incrementally as posts are
/// consumed.
///
/// Tags are interned into a node vector, so vertex iteration follows
/// insertion order. Adjacency is recorded on both endpoints with per-list
/// dedup: the degree of a vertex is the number of distinct tags it has
/// co-occurred with, and the edge-set view collapses `{a,b}` pairs
/// regardless of which side is walked first.
///
/// Mutation is check-then-act and assumes a single writer.
#[derive(Debug, Default)]
pub struct HashtagGraph {
    ids: FxHashMap<String, u32>,
    nodes: Vec<Node>,
}

impl HashtagGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `tag` as a vertex with an empty adjacency list, returning its
    /// id. Idempotent: an existing vertex is returned untouched.
    pub fn add_vertex(&mut self, tag: &str) -> u32 {
        if let Some(&id) = self.ids.get(tag) {
            return id;
        }
        let id = self.nodes.len() as u32;
        self.ids.insert(tag.to_string(), id);
        self.nodes.push(Node {
            tag: tag.to_string(),
            neighbors: Vec::new(),
        });
        id
    }

    /// Records a co-occurrence between `u` and `v`, creating either vertex
    /// as needed. Repeated pairs do not produce parallel edges.
    pub fn add_edge(&mut self, u: &str, v: &str) {
        if u == v {
            return; // no self-loops
        }
        let u_id = self.add_vertex(u);
        let v_id = self.add_vertex(v);

        if !self.nodes[u_id as usize].neighbors.contains(&v_id) {
            self.nodes[u_id as usize].neighbors.push(v_id);
        }
        if !self.nodes[v_id as usize].neighbors.contains(&u_id) {
            self.nodes[v_id as usize].neighbors.push(u_id);
        }
    }

    /// Folds one post's hashtag set into the graph.
    ///
    /// A post needs at least two distinct hashtags to produce an edge;
    /// anything less is a no-op. Tags are sorted before the pairwise
    /// expansion so vertex insertion order stays deterministic even though
    /// the extracted set iterates in arbitrary order.
    pub fn ingest_post_tags(&mut self, tags: &FxHashSet<String>) {
        if tags.len() < 2 {
            return;
        }
        let mut sorted: Vec<&String> = tags.iter().collect();
        sorted.sort();

        for (i, u) in sorted.iter().enumerate() {
            for v in &sorted[i + 1..] {
                self.add_edge(u, v);
            }
        }
    }

    /// Degree of a vertex: adjacency length plus the vertex's occurrences in
    /// its own list. The self-occurrence term is always zero under the
    /// no-self-loop invariant and exists only as a safeguard.
    pub fn degree(&self, tag: &str) -> Option<usize> {
        let &id = self.ids.get(tag)?;
        let neighbors = &self.nodes[id as usize].neighbors;
        Some(neighbors.len() + neighbors.iter().filter(|&&n| n == id).count())
    }

    /// Mean vertex degree, or `None` for the empty graph.
    pub fn average_degree(&self) -> Option<f64> {
        if self.nodes.is_empty() {
            return None;
        }
        let total: usize = self
            .nodes
            .iter()
            .enumerate()
            .map(|(id, n)| {
                n.neighbors.len() + n.neighbors.iter().filter(|&&i| i == id as u32).count()
            })
            .sum();
        Some(total as f64 / self.nodes.len() as f64)
    }

    /// Vertices in first-seen order.
    pub fn vertices(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.tag.as_str())
    }

    pub fn vertex_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Edge-set view: each unordered `{u,v}` pair exactly once, in the order
    /// first encountered walking vertices by insertion order.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        let mut seen: FxHashSet<(u32, u32)> = FxHashSet::default();
        let mut edges = Vec::new();

        for (id, node) in self.nodes.iter().enumerate() {
            let id = id as u32;
            for &neighbor in &node.neighbors {
                let key = (id.min(neighbor), id.max(neighbor));
                if seen.insert(key) {
                    edges.push((node.tag.as_str(), self.nodes[neighbor as usize].tag.as_str()));
                }
            }
        }

        edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges().len()
    }
}

//! Disjoint-set union stored in recorded tables.
//!
//! The parent and size arrays live in [`Table`]s, so every `find` step and
//! every link shows up in the event log.

use stepgraph_core::{RecordingGraph, Result, Table, TableConfig};

/// Union-find with path compression and union by size.
#[derive(Debug)]
pub struct DisjointSets {
    parent: Table<usize>,
    size: Table<usize>,
}

impl DisjointSets {
    /// Declare the backing tables on a graph that is still being built.
    pub fn declare<V, E>(graph: &mut RecordingGraph<V, E>, n: usize) -> Result<Self> {
        let parent = graph.create_table(
            TableConfig::new("DSU Parent", 1, n, 0usize)
                .with_headers("", "Vertex")
                .with_index_labels(),
        )?;
        let size = graph.create_table(
            TableConfig::new("DSU Size", 1, n, 0usize)
                .with_headers("", "Vertex")
                .with_index_labels(),
        )?;
        Ok(Self { parent, size })
    }

    /// Put every element in its own singleton set.
    pub fn make_sets(&mut self) -> Result<()> {
        for v in 0..self.parent.columns() {
            self.parent.set(0, v, v)?;
            self.size.set(0, v, 1)?;
        }
        Ok(())
    }

    /// Representative of `v`'s set, compressing the path walked.
    pub fn find(&mut self, v: usize) -> Result<usize> {
        let mut root = v;
        loop {
            let p = self.parent.get(0, root)?;
            if p == root {
                break;
            }
            root = p;
        }

        let mut current = v;
        while current != root {
            let next = self.parent.get(0, current)?;
            if next != root {
                self.parent.set(0, current, root)?;
            }
            current = next;
        }
        Ok(root)
    }

    /// Merge the sets of `a` and `b`. Returns `false` if they were already
    /// in the same set.
    pub fn union(&mut self, a: usize, b: usize) -> Result<bool> {
        let mut a = self.find(a)?;
        let mut b = self.find(b)?;
        if a == b {
            return Ok(false);
        }
        let (size_a, size_b) = (self.size.get(0, a)?, self.size.get(0, b)?);
        if size_a < size_b {
            std::mem::swap(&mut a, &mut b);
        }
        self.parent.set(0, b, a)?;
        self.size.set(0, a, size_a + size_b)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepgraph_topology::GraphInput;

    fn sets(n: usize) -> (RecordingGraph, DisjointSets) {
        let mut graph: RecordingGraph = RecordingGraph::new(&GraphInput::new(n, Vec::new(), false)).unwrap();
        let mut dsu = DisjointSets::declare(&mut graph, n).unwrap();
        graph.finalize().unwrap();
        dsu.make_sets().unwrap();
        (graph, dsu)
    }

    #[test]
    fn singletons_are_their_own_roots() {
        let (_, mut dsu) = sets(4);
        for v in 0..4 {
            assert_eq!(dsu.find(v).unwrap(), v);
        }
    }

    #[test]
    fn union_merges_once() {
        let (_, mut dsu) = sets(4);
        assert!(dsu.union(0, 1).unwrap());
        assert!(!dsu.union(1, 0).unwrap());
        assert_eq!(dsu.find(0).unwrap(), dsu.find(1).unwrap());
        assert_ne!(dsu.find(0).unwrap(), dsu.find(2).unwrap());
    }

    #[test]
    fn union_by_size_keeps_larger_root() {
        let (_, mut dsu) = sets(5);
        dsu.union(0, 1).unwrap();
        dsu.union(0, 2).unwrap();
        let big = dsu.find(0).unwrap();
        dsu.union(3, 0).unwrap();
        assert_eq!(dsu.find(3).unwrap(), big);
        assert_eq!(dsu.size.row(0).unwrap()[big], 4);
    }

    #[test]
    fn find_compresses_paths() {
        let (_, mut dsu) = sets(4);
        // Build a chain 3 -> 2 -> 1 -> 0 by hand
        dsu.parent.set(0, 3, 2).unwrap();
        dsu.parent.set(0, 2, 1).unwrap();
        dsu.parent.set(0, 1, 0).unwrap();

        assert_eq!(dsu.find(3).unwrap(), 0);
        assert_eq!(dsu.parent.row(0).unwrap(), &[0, 0, 0, 0]);
    }

    #[test]
    fn operations_are_recorded() {
        let (graph, mut dsu) = sets(3);
        let before = graph.event_count();
        dsu.union(0, 2).unwrap();
        assert!(graph.event_count() > before);
    }
}

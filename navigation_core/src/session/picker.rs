//! Endpoint selection for new sessions.

use petgraph::graph::NodeIndex;
use rand_core::{OsRng, RngCore};

use crate::relationship_graph::RelationshipGraph;

/// Chooses initial and destination characters.
pub trait EndpointPicker: Send {
    /// Pick a node, different from `exclude` when one is given.
    ///
    /// Returns `None` if the graph has no eligible node.
    fn pick(&mut self, graph: &RelationshipGraph, exclude: Option<NodeIndex>) -> Option<NodeIndex>;
}

/// Uniform random picker.
///
/// Draws uniformly over all nodes, retrying up to `max_attempts` times to
/// avoid the excluded node, then falls back to the first other node in graph
/// order so that small graphs always terminate.
#[derive(Debug, Clone)]
pub struct UniformPicker<R> {
    rng: R,
    max_attempts: usize,
}

/// Random draws before falling back to a scan.
pub const DEFAULT_PICK_ATTEMPTS: usize = 8;

impl UniformPicker<OsRng> {
    /// Picker backed by the operating system's random source.
    pub fn from_entropy() -> Self {
        Self::new(OsRng)
    }
}

impl<R: RngCore> UniformPicker<R> {
    /// Create a picker over the given random source.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            max_attempts: DEFAULT_PICK_ATTEMPTS,
        }
    }

    /// Set the number of random draws before the fallback scan.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

impl<R: RngCore + Send> EndpointPicker for UniformPicker<R> {
    fn pick(&mut self, graph: &RelationshipGraph, exclude: Option<NodeIndex>) -> Option<NodeIndex> {
        let count = graph.node_count();
        if count == 0 {
            return None;
        }

        for _ in 0..self.max_attempts {
            let candidate = graph.node_at(uniform_index(&mut self.rng, count))?;
            if Some(candidate) != exclude {
                return Some(candidate);
            }
        }

        graph
            .nodes()
            .map(|(idx, _)| idx)
            .find(|idx| Some(*idx) != exclude)
    }
}

/// Uniform index in `0..len`. `len` must be non-zero.
pub(crate) fn uniform_index(rng: &mut impl RngCore, len: usize) -> usize {
    (rng.next_u64() % len as u64) as usize
}

#[cfg(test)]
pub(crate) mod test_rng {
    use rand_core::{impls, Error, RngCore};

    /// Replays a fixed sequence of values, cycling forever.
    #[derive(Debug, Clone)]
    pub struct SequenceRng {
        values: Vec<u64>,
        position: usize,
    }

    impl SequenceRng {
        pub fn new(values: Vec<u64>) -> Self {
            Self { values, position: 0 }
        }
    }

    impl RngCore for SequenceRng {
        fn next_u32(&mut self) -> u32 {
            self.next_u64() as u32
        }

        fn next_u64(&mut self) -> u64 {
            let value = self.values[self.position % self.values.len()];
            self.position += 1;
            value
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            impls::fill_bytes_via_next(self, dest)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }
}

use std::collections::HashMap;
use std::fmt;

/// Handle for a distinct sensation. Only meaningful within the `StateSpace`
/// that minted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(usize);

impl StateId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Bit pattern of a sensation, used as the hash key. Zero is normalized so
/// that -0.0 and 0.0 land on the same state, matching float equality.
fn key_of(sensation: &[f32]) -> Vec<u32> {
    sensation
        .iter()
        .map(|&v| if v == 0.0 { 0 } else { v.to_bits() })
        .collect()
}

/// Append-only set of every distinct sensation seen so far.
#[derive(Debug, Default)]
pub struct StateSpace {
    states: Vec<Vec<f32>>,
    index: HashMap<Vec<u32>, StateId>,
    dimensions: Option<usize>,
}

impl StateSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty space that already expects sensations of `dimensions` features.
    pub fn with_dimensions(dimensions: usize) -> Self {
        StateSpace {
            dimensions: Some(dimensions),
            ..Self::default()
        }
    }

    /// Returns the id of an equal sensation seen before, or stores this one
    /// under a fresh id.
    ///
    /// # Panics
    /// If the sensation length differs from the first sensation ever stored.
    pub fn canonicalize(&mut self, sensation: &[f32]) -> StateId {
        self.check_dimensions(sensation);
        let key = key_of(sensation);
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = StateId(self.states.len());
        self.states.push(sensation.to_vec());
        self.index.insert(key, id);
        self.dimensions.get_or_insert(sensation.len());
        id
    }

    /// Like `canonicalize` but never inserts.
    pub fn lookup(&self, sensation: &[f32]) -> Option<StateId> {
        self.index.get(&key_of(sensation)).copied()
    }

    pub fn features(&self, id: StateId) -> &[f32] {
        &self.states[id.0]
    }

    /// Feature count fixed by the first sensation, if any.
    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// States in the order they were first seen.
    pub fn iter(&self) -> impl Iterator<Item = (StateId, &[f32])> + '_ {
        self.states
            .iter()
            .enumerate()
            .map(|(i, s)| (StateId(i), s.as_slice()))
    }

    fn check_dimensions(&self, sensation: &[f32]) {
        if let Some(dims) = self.dimensions {
            assert_eq!(
                dims,
                sensation.len(),
                "sensation has {} features, expected {}",
                sensation.len(),
                dims
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_sensation_same_state() {
        let mut space = StateSpace::new();
        let a = space.canonicalize(&[1.0, 2.0, 3.0]);
        let b = space.canonicalize(&vec![1.0, 2.0, 3.0]);
        assert_eq!(a, b);
        assert_eq!(1, space.len());
        assert_eq!(Some(3), space.dimensions());
    }

    #[test]
    fn test_single_component_difference() {
        let mut space = StateSpace::new();
        let base = [0.5, 1.0, -2.0];
        let base_id = space.canonicalize(&base);
        for i in 0..base.len() {
            let mut other = base;
            other[i] += 0.25;
            let id = space.canonicalize(&other);
            assert_ne!(base_id, id, "component {} collided", i);
        }
        assert_eq!(4, space.len());
    }

    #[test]
    fn test_signed_zero_is_one_state() {
        let mut space = StateSpace::new();
        let a = space.canonicalize(&[0.0, 1.0]);
        let b = space.canonicalize(&[-0.0, 1.0]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_features_and_lookup() {
        let mut space = StateSpace::new();
        let id = space.canonicalize(&[4.0, 7.0]);
        assert_eq!(&[4.0, 7.0], space.features(id));
        assert_eq!(Some(id), space.lookup(&[4.0, 7.0]));
        assert_eq!(None, space.lookup(&[7.0, 4.0]));
        assert_eq!(1, space.len());
    }

    #[test]
    #[should_panic(expected = "expected 2")]
    fn test_dimension_mismatch_panics() {
        let mut space = StateSpace::new();
        space.canonicalize(&[1.0, 2.0]);
        space.canonicalize(&[1.0, 2.0, 3.0]);
    }

    #[test]
    #[should_panic(expected = "expected 3")]
    fn test_with_dimensions_fixes_length_up_front() {
        let mut space = StateSpace::with_dimensions(3);
        assert_eq!(Some(3), space.dimensions());
        assert!(space.is_empty());
        space.canonicalize(&[1.0, 2.0]);
    }
}

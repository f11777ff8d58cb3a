use std::collections::HashMap;

use crate::canonical::StateId;

/// Q(s, a) for every state seen, one row of `num_actions` values per state.
/// Rows appear the first time a state is touched and are never removed.
#[derive(Debug)]
pub struct ValueTable {
    num_actions: usize,
    initial_value: f32,
    rows: HashMap<StateId, Vec<f32>>,
}

impl ValueTable {
    pub fn new(num_actions: usize, initial_value: f32) -> Self {
        ValueTable {
            num_actions,
            initial_value,
            rows: HashMap::new(),
        }
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    pub fn initial_value(&self) -> f32 {
        self.initial_value
    }

    /// Row for `state`, filled with the initial value on first access.
    pub fn row_for(&mut self, state: StateId) -> &mut [f32] {
        let (num_actions, initial_value) = (self.num_actions, self.initial_value);
        self.rows
            .entry(state)
            .or_insert_with(|| vec![initial_value; num_actions])
    }

    /// Row for `state` if it has been created.
    pub fn row(&self, state: StateId) -> Option<&[f32]> {
        self.rows.get(&state).map(Vec::as_slice)
    }

    pub fn value_of(&mut self, state: StateId, action: usize) -> f32 {
        self.row_for(state)[action]
    }

    pub fn set_value(&mut self, state: StateId, action: usize, value: f32) {
        self.row_for(state)[action] = value;
    }

    pub fn max_value(&mut self, state: StateId) -> f32 {
        max_of(self.row_for(state))
    }

    /// Installs a row read back from a saved policy.
    pub(crate) fn insert_row(&mut self, state: StateId, row: Vec<f32>) {
        debug_assert_eq!(row.len(), self.num_actions);
        self.rows.insert(state, row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub(crate) fn max_of(row: &[f32]) -> f32 {
    row.iter().copied().fold(f32::NEG_INFINITY, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::StateSpace;

    #[test]
    fn test_row_created_on_first_access() {
        let mut space = StateSpace::new();
        let s = space.canonicalize(&[1.0]);
        let mut table = ValueTable::new(3, 0.5);
        assert!(table.row(s).is_none());
        assert_eq!(&[0.5, 0.5, 0.5], table.row_for(s));
        assert_eq!(1, table.len());
    }

    #[test]
    fn test_set_then_get() {
        let mut space = StateSpace::new();
        let s = space.canonicalize(&[1.0]);
        let mut table = ValueTable::new(3, 0.0);
        table.set_value(s, 2, 1.5);
        assert_eq!(1.5, table.value_of(s, 2));
        assert_eq!(0.0, table.value_of(s, 0));
        assert_eq!(1.5, table.max_value(s));
    }

    #[test]
    fn test_mutated_row_is_not_reinitialized() {
        let mut space = StateSpace::new();
        let s = space.canonicalize(&[2.0]);
        let mut table = ValueTable::new(2, -1.0);
        table.set_value(s, 0, 3.0);
        table.row_for(s);
        table.row_for(s);
        assert_eq!(&[3.0, -1.0], table.row(s).unwrap());
        assert_eq!(1, table.len());
    }

    #[test]
    fn test_max_of_negative_row() {
        assert_eq!(-2.0, max_of(&[-3.0, -2.0, -7.5]));
    }
}

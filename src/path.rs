//! Realized path values plus the observation cursor.

/// `values[0]` is the initial value; `values[j]` is the value at `t_j`.
///
/// `observation_index` counts committed observations: 0 after a reset, `d`
/// after a whole-path generation, +1 per sequential step.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    values: Vec<f64>,
    observation_index: usize,
}

impl Path {
    pub fn new(x0: f64, d: usize) -> Self {
        let mut values = vec![0.0; d + 1];
        values[0] = x0;
        Self {
            values,
            observation_index: 0,
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn value(&self, j: usize) -> f64 {
        self.values[j]
    }

    /// Number of steps `d`.
    pub fn dimension(&self) -> usize {
        self.values.len() - 1
    }

    pub fn observation_index(&self) -> usize {
        self.observation_index
    }

    /// Last committed value.
    pub fn current(&self) -> f64 {
        self.values[self.observation_index]
    }

    pub fn terminal(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    pub fn is_complete(&self) -> bool {
        self.observation_index == self.dimension()
    }

    pub(crate) fn reset(&mut self, x0: f64) {
        self.values[0] = x0;
        self.observation_index = 0;
    }

    pub(crate) fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    pub(crate) fn mark_complete(&mut self) {
        self.observation_index = self.dimension();
    }

    /// Commit `value` at the next index and return it.
    pub(crate) fn push_observation(&mut self, value: f64) -> f64 {
        self.observation_index += 1;
        self.values[self.observation_index] = value;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_path() {
        let path = Path::new(2.5, 3);
        assert_eq!(path.values(), &[2.5, 0.0, 0.0, 0.0]);
        assert_eq!(path.observation_index(), 0);
        assert_eq!(path.current(), 2.5);
        assert!(!path.is_complete());
    }

    #[test]
    fn test_cursor_moves() {
        let mut path = Path::new(0.0, 2);
        assert_eq!(path.push_observation(1.0), 1.0);
        assert_eq!(path.observation_index(), 1);
        path.push_observation(3.0);
        assert!(path.is_complete());
        assert_eq!(path.terminal(), 3.0);

        path.reset(-1.0);
        assert_eq!(path.observation_index(), 0);
        assert_eq!(path.current(), -1.0);
    }
}

//! Fixed cyclic ordering with modulo indexing.

use crate::allocation::{Activity, Scores};

/// A fixed ordered sequence walked with wrap-around indices.
///
/// Holds no cursor of its own: callers keep the current index and ask the
/// cycle for the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityCycle<T> {
    order: Vec<T>,
}

impl<T: Clone> PriorityCycle<T> {
    pub fn new(order: Vec<T>) -> Self {
        Self { order }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.order.get(index)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.order
    }

    /// Index after `index`, wrapping to 0. Always 0 for an empty cycle.
    pub fn advance(&self, index: usize) -> usize {
        if self.order.is_empty() {
            return 0;
        }
        (index + 1) % self.order.len()
    }

    /// The sequence reordered to start at `index` (taken modulo the length).
    pub fn rotate_from(&self, index: usize) -> Vec<T> {
        if self.order.is_empty() {
            return Vec::new();
        }
        let start = index % self.order.len();
        self.order[start..]
            .iter()
            .chain(&self.order[..start])
            .cloned()
            .collect()
    }
}

impl PriorityCycle<Activity> {
    /// Activities with a positive score, highest score first and ties broken
    /// by name.
    pub fn by_weight(goal: &Scores) -> Self {
        let mut order: Vec<(&Activity, u64)> = goal
            .iter()
            .filter(|&(_, &score)| score > 0)
            .map(|(act, &score)| (act, score))
            .collect();
        order.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        Self::new(order.into_iter().map(|(act, _)| act.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_wraps() {
        let cycle = PriorityCycle::new(vec!["A", "B", "C"]);
        assert_eq!(cycle.advance(0), 1);
        assert_eq!(cycle.advance(1), 2);
        assert_eq!(cycle.advance(2), 0);
    }

    #[test]
    fn test_advance_empty() {
        let cycle: PriorityCycle<&str> = PriorityCycle::new(Vec::new());
        assert_eq!(cycle.advance(0), 0);
        assert!(cycle.rotate_from(3).is_empty());
    }

    #[test]
    fn test_rotate_from() {
        let cycle = PriorityCycle::new(vec!["A", "B", "C", "D"]);
        assert_eq!(cycle.rotate_from(0), vec!["A", "B", "C", "D"]);
        assert_eq!(cycle.rotate_from(2), vec!["C", "D", "A", "B"]);
        assert_eq!(cycle.rotate_from(5), vec!["B", "C", "D", "A"]);
        // The cycle itself is untouched.
        assert_eq!(cycle.as_slice(), &["A", "B", "C", "D"]);
    }

    #[test]
    fn test_full_lap_returns_to_start() {
        let cycle = PriorityCycle::new(vec![1, 2, 3, 4, 5]);
        let mut index = 3;
        for _ in 0..cycle.len() {
            index = cycle.advance(index);
        }
        assert_eq!(index, 3);
    }

    #[test]
    fn test_by_weight_orders_descending_with_name_tiebreak() {
        let goal: Scores = [("X", 4), ("Y", 5), ("B", 4), ("Z", 0)]
            .into_iter()
            .map(|(a, s)| (a.to_string(), s))
            .collect();
        let cycle = PriorityCycle::by_weight(&goal);
        assert_eq!(cycle.as_slice(), &["Y", "B", "X"]);
    }
}

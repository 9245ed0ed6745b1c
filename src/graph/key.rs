//! Canonical keys for unordered pairs

use serde::{Deserialize, Serialize};

/// An unordered pair stored with the smaller element first.
///
/// `UnorderedPair::new(a, b) == UnorderedPair::new(b, a)`, so the derived
/// `Hash`/`Ord` are enough to use it as a map key for undirected edges
/// and for community pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnorderedPair<T> {
    low: T,
    high: T,
}

impl<T: Ord + Copy> UnorderedPair<T> {
    pub fn new(a: T, b: T) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn low(&self) -> T {
        self.low
    }

    pub fn high(&self) -> T {
        self.high
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_pair_is_canonical() {
        let a = UnorderedPair::new(7u32, 3);
        let b = UnorderedPair::new(3u32, 7);
        assert_eq!(a, b);
        assert_eq!(a.low(), 3);
        assert_eq!(a.high(), 7);

        let mut map = HashMap::new();
        map.insert(a, "edge");
        assert_eq!(map.get(&b), Some(&"edge"));
    }
}

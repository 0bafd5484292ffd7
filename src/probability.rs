use std::cmp::Ordering;
use std::fmt;

/// Exact mine probability: the fraction of valid assignments in which a cell
/// is a mine. Kept as an integer ratio so that comparisons against 1/2 never
/// go through floating point.
#[derive(Debug, Clone, Copy, Eq)]
pub struct Probability {
    mines: u64,
    total: u64,
}

impl Probability {
    /// `mines` valid assignments out of `total` place a mine here.
    /// `total` must be non-zero and at least `mines`.
    pub fn new(mines: u64, total: u64) -> Self {
        debug_assert!(total > 0, "probability denominator must be non-zero");
        debug_assert!(mines <= total);
        Self { mines, total }
    }

    pub const ZERO: Probability = Probability { mines: 0, total: 1 };
    pub const ONE: Probability = Probability { mines: 1, total: 1 };

    pub fn mine_count(&self) -> u64 {
        self.mines
    }

    pub fn total_count(&self) -> u64 {
        self.total
    }

    pub fn is_zero(&self) -> bool {
        self.mines == 0
    }

    pub fn is_one(&self) -> bool {
        self.mines == self.total
    }

    /// Exact equality against 1/2, the integer way: 2 * mines == total.
    pub fn is_half(&self) -> bool {
        2 * self.mines == self.total
    }

    pub fn as_f64(&self) -> f64 {
        self.mines as f64 / self.total as f64
    }
}

impl PartialEq for Probability {
    fn eq(&self, other: &Self) -> bool {
        // Cross-multiplied so 1/2 == 2/4. Counts are bounded by the
        // enumeration budget, so u128 cannot overflow here.
        (self.mines as u128) * (other.total as u128) == (other.mines as u128) * (self.total as u128)
    }
}

impl PartialOrd for Probability {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Probability {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = (self.mines as u128) * (other.total as u128);
        let rhs = (other.mines as u128) * (self.total as u128);
        lhs.cmp(&rhs)
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.mines, self.total)
    }
}

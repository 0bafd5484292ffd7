#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The 8-neighborhood. Takes `self` by value so the iterator owns its
    /// origin and can be returned from functions holding a temporary.
    pub fn neighbors(self) -> impl Iterator<Item = Position> {
        (-1..=1).flat_map(move |dr| {
            (-1..=1).filter_map(move |dc| {
                if dr == 0 && dc == 0 {
                    None
                } else {
                    Some(Position::new(self.row + dr, self.col + dc))
                }
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_creation() {
        let pos = Position::new(5, 10);
        assert_eq!(pos.row, 5);
        assert_eq!(pos.col, 10);
    }

    #[test]
    fn test_neighbors() {
        let pos = Position::new(1, 1);
        let neighbors: Vec<Position> = pos.neighbors().collect();

        assert_eq!(neighbors.len(), 8);
        assert!(neighbors.contains(&Position::new(0, 0)));
        assert!(neighbors.contains(&Position::new(0, 1)));
        assert!(neighbors.contains(&Position::new(0, 2)));
        assert!(neighbors.contains(&Position::new(1, 0)));
        assert!(neighbors.contains(&Position::new(1, 2)));
        assert!(neighbors.contains(&Position::new(2, 0)));
        assert!(neighbors.contains(&Position::new(2, 1)));
        assert!(neighbors.contains(&Position::new(2, 2)));
    }

    #[test]
    fn test_neighbors_outlive_the_source_position() {
        fn neighbors_of(row: i32, col: i32) -> impl Iterator<Item = Position> {
            Position::new(row, col).neighbors()
        }
        assert_eq!(neighbors_of(0, 0).count(), 8);
    }

    #[test]
    fn test_ordering_is_row_major() {
        assert!(Position::new(0, 5) < Position::new(1, 0));
        assert!(Position::new(2, 1) < Position::new(2, 3));
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Active cells, keyed column first then row. Only `true` cells are kept
/// after an edit, but `false` entries read from storage are tolerated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveTiles(BTreeMap<usize, BTreeMap<usize, bool>>);

impl ActiveTiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, column: usize, row: usize) -> bool {
        self.0
            .get(&column)
            .and_then(|rows| rows.get(&row))
            .copied()
            .unwrap_or(false)
    }

    pub fn set(&mut self, column: usize, row: usize, active: bool) {
        if active {
            self.0.entry(column).or_default().insert(row, true);
        } else if let Some(rows) = self.0.get_mut(&column) {
            rows.remove(&row);
            if rows.is_empty() {
                self.0.remove(&column);
            }
        }
    }

    pub fn toggle(&mut self, column: usize, row: usize) -> bool {
        let active = !self.is_active(column, row);
        self.set(column, row, active);
        active
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// `(column, row)` of every active cell, in column then row order.
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.iter().flat_map(|(&column, rows)| {
            rows.iter()
                .filter(|&(_, &active)| active)
                .map(move |(&row, _)| (column, row))
        })
    }

    pub fn count(&self) -> usize {
        self.iter_active().count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut tiles = ActiveTiles::new();
        assert!(tiles.toggle(3, 1));
        assert!(tiles.is_active(3, 1));
        assert!(!tiles.toggle(3, 1));
        assert!(!tiles.is_active(3, 1));
        assert!(tiles.is_empty());
    }

    #[test]
    fn test_iter_active_order() {
        let mut tiles = ActiveTiles::new();
        tiles.set(5, 0, true);
        tiles.set(1, 4, true);
        tiles.set(1, 2, true);
        assert_eq!(tiles.iter_active().collect::<Vec<_>>(), vec![(1, 2), (1, 4), (5, 0)]);
        assert_eq!(tiles.count(), 3);
    }

    #[test]
    fn test_json_shape() {
        let mut tiles = ActiveTiles::new();
        tiles.set(2, 6, true);
        assert_eq!(serde_json::to_string(&tiles).unwrap(), r#"{"2":{"6":true}}"#);

        let read: ActiveTiles = serde_json::from_str(r#"{"1":{"0":true,"3":false}}"#).unwrap();
        assert!(read.is_active(1, 0));
        assert!(!read.is_active(1, 3));
        assert_eq!(read.count(), 1);
    }
}

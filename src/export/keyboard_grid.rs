//! Fixed-size key grid shared by the renderers.

use crate::models::{GridPos, Key, Layer, LayoutProfile};

/// A layer's keys placed on the profile's grid.
///
/// The grid always has `profile.grid_columns()` × `profile.grid_rows()`
/// cells; cells without a key stay `None` and render as blank space. Keys
/// whose position falls outside the grid are ignored.
#[derive(Debug)]
pub struct KeyGrid<'a> {
    columns: usize,
    rows: usize,
    cells: Vec<Option<&'a Key>>,
}

impl<'a> KeyGrid<'a> {
    /// Places the keys of `layer` on the grid of `profile`.
    #[must_use]
    pub fn new(layer: &'a Layer, profile: &LayoutProfile) -> Self {
        let columns = profile.grid_columns();
        let rows = profile.grid_rows();
        let mut cells = vec![None; columns * rows];

        for key in &layer.keys {
            if key.x < columns && key.y < rows {
                cells[key.y * columns + key.x] = Some(key);
            }
        }

        Self {
            columns,
            rows,
            cells,
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Key at a cell, if any.
    #[must_use]
    pub fn get(&self, pos: GridPos) -> Option<&'a Key> {
        if pos.col >= self.columns || pos.row >= self.rows {
            return None;
        }
        self.cells[pos.row * self.columns + pos.col]
    }

    /// Iterates all cells row by row.
    pub fn cells(&self) -> impl Iterator<Item = (GridPos, Option<&'a Key>)> + '_ {
        self.cells.iter().enumerate().map(move |(idx, key)| {
            (GridPos::new(idx % self.columns, idx / self.columns), *key)
        })
    }

    /// Iterates only the occupied cells.
    pub fn keys(&self) -> impl Iterator<Item = (GridPos, &'a Key)> + '_ {
        self.cells().filter_map(|(pos, key)| key.map(|k| (pos, k)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_places_keys_and_blanks() {
        let profile = LayoutProfile::sofle();
        let mut layer = Layer::new("base", "Base");
        layer.add_key(Key::new("&kp Q", GridPos::new(0, 0)));
        layer.add_key(Key::new("&kp ENTER", GridPos::new(14, 4)));
        layer.add_key(Key::new("&kp X", GridPos::new(40, 0)));

        let grid = KeyGrid::new(&layer, &profile);

        assert_eq!(grid.columns(), 15);
        assert_eq!(grid.rows(), 5);
        assert_eq!(grid.cells().count(), 75);
        assert_eq!(grid.keys().count(), 2);
        assert_eq!(grid.get(GridPos::new(0, 0)).unwrap().primary_label(), "Q");
        assert_eq!(grid.get(GridPos::new(14, 4)).unwrap().primary_label(), "ENTER");
        assert!(grid.get(GridPos::new(6, 0)).is_none());
        assert!(grid.get(GridPos::new(99, 0)).is_none());
    }

    #[test]
    fn test_empty_layer_is_all_blank() {
        let layer = Layer::new("empty", "Empty");
        let grid = KeyGrid::new(&layer, &LayoutProfile::sofle());

        assert!(grid.cells().all(|(_, key)| key.is_none()));
    }
}

//! Physical layout profiles and linear index to grid mapping.
//!
//! A profile describes one physical keyboard shape: how many keys it has,
//! how its linear key positions fold into rows, where the split halves
//! separate, and how the thumb row divides into left and right clusters. It
//! also carries the position table used when a keymap's sources define no
//! position symbols of their own.
//!
//! ```text
//! ╭────────────────────────┬────────────────────────╮
//! │  0  1  2  3  4  5      │      6  7  8  9 10 11  │
//! │ 12 13 14 15 16 17      │     18 19 20 21 22 23  │
//! │ 24 25 26 27 28 29      │     30 31 32 33 34 35  │
//! │ 36 37 38 39 40 41      │     42 43 44 45 46 47  │
//! ╰── 48 49 50 51 52       │     53 54 55 56 57 58 59
//! ```

use serde::{Deserialize, Serialize};

/// Name of the profile used when none is configured.
pub const DEFAULT_PROFILE: &str = "sofle";

/// Position table for the Sofle: two 4×6 halves, two encoder positions and
/// five thumb keys per side.
#[rustfmt::skip]
const SOFLE_POSITIONS: &[(&str, u32)] = &[
    ("LN0", 5), ("LN1", 4), ("LN2", 3), ("LN3", 2), ("LN4", 1), ("LN5", 0),
    ("RN0", 6), ("RN1", 7), ("RN2", 8), ("RN3", 9), ("RN4", 10), ("RN5", 11),
    ("LT0", 17), ("LT1", 16), ("LT2", 15), ("LT3", 14), ("LT4", 13), ("LT5", 12),
    ("RT0", 18), ("RT1", 19), ("RT2", 20), ("RT3", 21), ("RT4", 22), ("RT5", 23),
    ("LM0", 29), ("LM1", 28), ("LM2", 27), ("LM3", 26), ("LM4", 25), ("LM5", 24),
    ("RM0", 30), ("RM1", 31), ("RM2", 32), ("RM3", 33), ("RM4", 34), ("RM5", 35),
    ("LB0", 41), ("LB1", 40), ("LB2", 39), ("LB3", 38), ("LB4", 37), ("LB5", 36),
    ("LEC", 42), ("REC", 43),
    ("RB0", 44), ("RB1", 45), ("RB2", 46), ("RB3", 47), ("RB4", 48), ("RB5", 49),
    ("LH0", 54), ("LH1", 53), ("LH2", 52), ("LH3", 51), ("LH4", 50),
    ("RH0", 55), ("RH1", 56), ("RH2", 57), ("RH3", 58), ("RH4", 59),
];

/// Cell in the rendered key grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    /// Column (0-based, includes the visual gap between halves)
    pub col: usize,
    /// Row (0-based, the thumb row is last)
    pub row: usize,
}

impl GridPos {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// Physical layout profile.
///
/// # Validation
///
/// - `row_width` must be even and non-zero (two equal halves)
/// - `key_count` must be at least `row_width * main_rows`
/// - `thumb_split` must not exceed the thumb row size
/// - the right thumb cluster must start at or after the end of the left one
/// - fallback position indices must be unique and below `key_count`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutProfile {
    /// Profile identifier (e.g., "sofle")
    pub name: String,
    /// Total number of key positions
    pub key_count: usize,
    /// Keys per main row across both halves
    pub row_width: usize,
    /// Number of main (non-thumb) rows
    pub main_rows: usize,
    /// Empty columns inserted between the two halves
    pub half_gap: usize,
    /// Number of thumb-row keys belonging to the left cluster
    pub thumb_split: usize,
    /// Grid column where the right thumb cluster starts
    pub right_thumb_start: usize,
    /// Position table substituted when no position symbols are found
    pub fallback_positions: Vec<(String, u32)>,
}

impl Default for LayoutProfile {
    fn default() -> Self {
        Self::sofle()
    }
}

impl LayoutProfile {
    /// The built-in Sofle profile (60 positions).
    #[must_use]
    pub fn sofle() -> Self {
        Self {
            name: DEFAULT_PROFILE.to_string(),
            key_count: 60,
            row_width: 12,
            main_rows: 4,
            half_gap: 2,
            thumb_split: 5,
            right_thumb_start: 8,
            fallback_positions: SOFLE_POSITIONS
                .iter()
                .map(|(name, idx)| ((*name).to_string(), *idx))
                .collect(),
        }
    }

    /// Looks up a built-in profile by name.
    #[must_use]
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "sofle" => Some(Self::sofle()),
            _ => None,
        }
    }

    /// Names of all built-in profiles.
    #[must_use]
    pub fn builtin_names() -> &'static [&'static str] {
        &["sofle"]
    }

    /// Number of keys in the main block (all rows above the thumb row).
    #[must_use]
    pub const fn main_key_count(&self) -> usize {
        self.row_width.saturating_mul(self.main_rows)
    }

    /// Maps a linear key index to its grid cell.
    ///
    /// Returns `None` for indices outside the profile's key count.
    ///
    /// # Examples
    ///
    /// ```
    /// use keymapviz::models::{GridPos, LayoutProfile};
    ///
    /// let profile = LayoutProfile::sofle();
    /// assert_eq!(profile.position(6), Some(GridPos::new(8, 0)));
    /// assert_eq!(profile.position(48), Some(GridPos::new(0, 4)));
    /// assert_eq!(profile.position(60), None);
    /// ```
    #[must_use]
    pub fn position(&self, index: usize) -> Option<GridPos> {
        if index >= self.key_count {
            return None;
        }

        let main = self.main_key_count();
        if index < main {
            let row = index / self.row_width;
            let mut col = index % self.row_width;
            if col >= self.row_width / 2 {
                col += self.half_gap;
            }
            return Some(GridPos::new(col, row));
        }

        let thumb = index - main;
        let col = if thumb < self.thumb_split {
            thumb
        } else {
            thumb - self.thumb_split + self.right_thumb_start
        };
        Some(GridPos::new(col, self.main_rows))
    }

    /// Number of grid columns needed to place every key of the profile.
    #[must_use]
    pub fn grid_columns(&self) -> usize {
        (0..self.key_count)
            .filter_map(|idx| self.position(idx))
            .map(|pos| pos.col + 1)
            .max()
            .unwrap_or(0)
    }

    /// Number of grid rows (main rows plus the thumb row).
    #[must_use]
    pub const fn grid_rows(&self) -> usize {
        if self.key_count > self.main_key_count() {
            self.main_rows + 1
        } else {
            self.main_rows
        }
    }

    /// Validates the profile parameters.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.row_width == 0 || self.row_width % 2 != 0 {
            anyhow::bail!(
                "Profile '{}': row_width must be a non-zero even number (got {})",
                self.name,
                self.row_width
            );
        }

        let Some(main_keys) = self.row_width.checked_mul(self.main_rows) else {
            anyhow::bail!(
                "Profile '{}': row_width {} x main_rows {} is too large",
                self.name,
                self.row_width,
                self.main_rows
            );
        };

        if self.key_count < main_keys {
            anyhow::bail!(
                "Profile '{}': key_count {} is smaller than the main block ({main_keys} keys)",
                self.name,
                self.key_count
            );
        }

        let thumb_keys = self.key_count - main_keys;
        if self.thumb_split > thumb_keys {
            anyhow::bail!(
                "Profile '{}': thumb_split {} exceeds thumb row size {}",
                self.name,
                self.thumb_split,
                thumb_keys
            );
        }

        if thumb_keys > self.thumb_split && self.right_thumb_start < self.thumb_split {
            anyhow::bail!(
                "Profile '{}': right_thumb_start {} overlaps the left thumb cluster (columns 0..{})",
                self.name,
                self.right_thumb_start,
                self.thumb_split
            );
        }

        let mut seen = std::collections::HashSet::new();
        for (name, idx) in &self.fallback_positions {
            if *idx as usize >= self.key_count {
                anyhow::bail!(
                    "Profile '{}': fallback position {name} = {idx} is out of range",
                    self.name
                );
            }
            if !seen.insert(*idx) {
                anyhow::bail!(
                    "Profile '{}': fallback index {idx} is assigned more than once",
                    self.name
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_block_positions() {
        let profile = LayoutProfile::sofle();
        assert_eq!(profile.position(0), Some(GridPos::new(0, 0)));
        assert_eq!(profile.position(5), Some(GridPos::new(5, 0)));
        assert_eq!(profile.position(6), Some(GridPos::new(8, 0)));
        assert_eq!(profile.position(11), Some(GridPos::new(13, 0)));
        assert_eq!(profile.position(12), Some(GridPos::new(0, 1)));
        assert_eq!(profile.position(47), Some(GridPos::new(13, 3)));
    }

    #[test]
    fn test_thumb_row_split_after_five() {
        let profile = LayoutProfile::sofle();
        assert_eq!(profile.position(48), Some(GridPos::new(0, 4)));
        assert_eq!(profile.position(52), Some(GridPos::new(4, 4)));
        assert_eq!(profile.position(53), Some(GridPos::new(8, 4)));
        assert_eq!(profile.position(59), Some(GridPos::new(14, 4)));
    }

    #[test]
    fn test_thumb_split_is_a_parameter() {
        let profile = LayoutProfile {
            thumb_split: 6,
            ..LayoutProfile::sofle()
        };
        assert_eq!(profile.position(53), Some(GridPos::new(5, 4)));
        assert_eq!(profile.position(54), Some(GridPos::new(8, 4)));
        assert_eq!(profile.position(59), Some(GridPos::new(13, 4)));
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let profile = LayoutProfile::sofle();
        assert_eq!(profile.position(60), None);
        assert_eq!(profile.position(1000), None);
    }

    #[test]
    fn test_grid_dimensions() {
        let profile = LayoutProfile::sofle();
        assert_eq!(profile.grid_columns(), 15);
        assert_eq!(profile.grid_rows(), 5);

        for idx in 0..profile.key_count {
            let pos = profile.position(idx).unwrap();
            assert!(pos.col < profile.grid_columns());
            assert!(pos.row < profile.grid_rows());
        }
    }

    #[test]
    fn test_sofle_fallback_table() {
        let profile = LayoutProfile::sofle();
        assert_eq!(profile.fallback_positions.len(), 60);

        let mut indices: Vec<u32> = profile.fallback_positions.iter().map(|(_, i)| *i).collect();
        indices.sort_unstable();
        assert_eq!(indices, (0..60).collect::<Vec<u32>>());
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        let odd = LayoutProfile {
            row_width: 11,
            ..LayoutProfile::sofle()
        };
        assert!(odd.validate().is_err());

        let split = LayoutProfile {
            thumb_split: 13,
            ..LayoutProfile::sofle()
        };
        assert!(split.validate().is_err());

        let overlap = LayoutProfile {
            right_thumb_start: 2,
            ..LayoutProfile::sofle()
        };
        assert!(overlap.validate().is_err());

        let adjacent = LayoutProfile {
            right_thumb_start: 5,
            ..LayoutProfile::sofle()
        };
        assert!(adjacent.validate().is_ok());

        let mut dup = LayoutProfile::sofle();
        dup.fallback_positions.push(("XX0".to_string(), 0));
        assert!(dup.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_main_block() {
        let huge = LayoutProfile {
            row_width: usize::MAX - 1,
            main_rows: 4,
            ..LayoutProfile::sofle()
        };
        let err = huge.validate().unwrap_err();
        assert!(err.to_string().contains("too large"));
        assert_eq!(huge.main_key_count(), usize::MAX);
    }

    #[test]
    fn test_builtin_lookup() {
        assert!(LayoutProfile::builtin("sofle").is_some());
        assert!(LayoutProfile::builtin("corne").is_none());
        assert_eq!(LayoutProfile::builtin_names(), &["sofle"]);
    }
}

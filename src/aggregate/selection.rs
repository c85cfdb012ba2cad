use super::GroupedRow;

/// Which groups survive ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    /// Every group, in key order
    #[default]
    All,
    /// The `k` groups with the largest measure, largest first
    Top(usize),
    /// The `k` groups with the smallest measure, smallest first
    Bottom(usize),
}

impl Selection {
    /// Rank key-ordered rows in place
    ///
    /// The sort is stable, so groups with equal measure stay in key order.
    pub fn apply(&self, rows: &mut Vec<GroupedRow>) {
        match *self {
            Self::All => {}
            Self::Top(k) => {
                rows.sort_by(|a, b| b.value.cmp(&a.value));
                rows.truncate(k);
            }
            Self::Bottom(k) => {
                rows.sort_by(|a, b| a.value.cmp(&b.value));
                rows.truncate(k);
            }
        }
    }
}

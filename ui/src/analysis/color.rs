//! Stable colors for community ids.
//!
//! `color_for` hashes the id's UTF-16 code units with the classic
//! `hash * 31 + unit` rolling hash in wrapping `i32` arithmetic, then indexes
//! [`PALETTE`] with `|hash| mod PALETTE.len()`. The result depends on nothing
//! but the id string.

use std::fmt;

/// Ordered categorical palette (d3 "category10").
pub const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// A `#rrggbb` color taken from [`PALETTE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(&'static str);

impl Color {
    pub fn hex(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

pub fn color_for(group_id: &str) -> Color {
    Color(PALETTE[palette_index(group_id)])
}

fn palette_index(group_id: &str) -> usize {
    let hash = group_id
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)));
    (hash.unsigned_abs() % PALETTE.len() as u32) as usize
}

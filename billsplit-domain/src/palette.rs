//! Member color tags.

/// Colors handed out to members in join order.
pub const PALETTE: [&str; 10] = [
    "#f87171", "#fb923c", "#facc15", "#4ade80", "#2dd4bf", "#38bdf8", "#818cf8", "#c084fc",
    "#f472b6", "#a3a3a3",
];

/// Color for the member at `index` (0-based join order). Wraps around the palette.
pub fn color_for_index(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

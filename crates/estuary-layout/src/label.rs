//! Node label placement.
//!
//! End columns label outwards when the inset leaves room, everything else labels towards the
//! middle. A label facing a neighbouring column that is too close flips to the roomier side.

use crate::config::LabelConfig;
use crate::model::{LabelSide, NodeLabel, TextAnchor};
use crate::solver::Scales;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Towards column-axis origin.
    Before,
    After,
}

impl Direction {
    fn flip(self) -> Self {
        match self {
            Self::Before => Self::After,
            Self::After => Self::Before,
        }
    }
}

/// Free space between the bars of `column` and whatever is next in `dir`.
fn gap(scales: &Scales, column: usize, dir: Direction) -> f64 {
    let positions = &scales.column_positions;
    let x0 = positions[column];
    let x1 = x0 + scales.node_thickness;
    match dir {
        Direction::Before if column > 0 => x0 - (positions[column - 1] + scales.node_thickness),
        Direction::Before => x0,
        Direction::After if column + 1 < positions.len() => positions[column + 1] - x1,
        Direction::After => scales.breadth - x1,
    }
}

fn choose_side(scales: &Scales, column: usize, cfg: &LabelConfig) -> (LabelSide, Direction) {
    let n = scales.column_positions.len();
    let x0 = scales.column_positions[column];
    let centre = x0 + scales.node_thickness / 2.0;
    let outward = if centre < scales.breadth / 2.0 {
        Direction::Before
    } else {
        Direction::After
    };

    let is_end = column == 0 || column + 1 == n;
    if is_end && gap(scales, column, outward) >= cfg.room {
        return (LabelSide::Outside, outward);
    }

    let inward = outward.flip();
    if gap(scales, column, inward) < cfg.min_gap
        && gap(scales, column, outward) > gap(scales, column, inward)
    {
        return (LabelSide::Outside, outward);
    }
    (LabelSide::Inside, inward)
}

/// Rounds to two decimals and prints without trailing zeros (`15`, `0.6`, `124.73`).
pub fn format_value(value: f64) -> String {
    let v = (value * 100.0).round() / 100.0;
    if v == 0.0 { "0".to_string() } else { v.to_string() }
}

pub fn label_text(name: &str, value: f64, cfg: &LabelConfig) -> String {
    if cfg.show_values {
        format!(
            "{name}\n{}{}{}",
            cfg.prefix,
            format_value(value),
            cfg.suffix
        )
    } else {
        name.to_string()
    }
}

pub(crate) fn place_label(
    scales: &Scales,
    column: usize,
    name: &str,
    value: f64,
    y0: f64,
    y1: f64,
    cfg: &LabelConfig,
) -> NodeLabel {
    let (side, dir) = choose_side(scales, column, cfg);
    let x0 = scales.column_positions[column];
    let (x, anchor) = match dir {
        Direction::Before => (x0 - cfg.offset, TextAnchor::End),
        Direction::After => (x0 + scales.node_thickness + cfg.offset, TextAnchor::Start),
    };
    NodeLabel {
        side,
        anchor,
        x,
        y: (y0 + y1) / 2.0,
        text: label_text(name, value, cfg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::solver::solve;

    fn scales(columns: usize, breadth: f64, inset: f64) -> Scales {
        let cfg = SolverConfig {
            column_inset: inset,
            ..SolverConfig::default()
        };
        solve(&vec![1; columns], &vec![1.0; columns], 100.0, breadth, &cfg).unwrap()
    }

    fn label(s: &Scales, column: usize) -> NodeLabel {
        place_label(s, column, "n", 1.0, 0.0, 10.0, &LabelConfig::default())
    }

    #[test]
    fn two_columns_without_inset_label_inwards() {
        let s = scales(2, 600.0, 0.0);
        let left = label(&s, 0);
        assert_eq!((left.side, left.anchor), (LabelSide::Inside, TextAnchor::Start));
        assert_eq!(left.x, 16.0);
        let right = label(&s, 1);
        assert_eq!((right.side, right.anchor), (LabelSide::Inside, TextAnchor::End));
        assert_eq!(right.x, 584.0);
        assert_eq!(right.y, 5.0);
    }

    #[test]
    fn end_columns_label_outwards_when_the_inset_has_room() {
        let s = scales(2, 600.0, 100.0);
        let left = label(&s, 0);
        assert_eq!((left.side, left.anchor), (LabelSide::Outside, TextAnchor::End));
        assert_eq!(left.x, 94.0);
        let right = label(&s, 1);
        assert_eq!((right.side, right.anchor), (LabelSide::Outside, TextAnchor::Start));
    }

    #[test]
    fn crowded_interior_columns_flip_away_from_their_neighbour() {
        let cfg = SolverConfig::default();
        let mut s = solve(&[1; 4], &[1.0; 4], 100.0, 500.0, &cfg).unwrap();
        s.column_positions = vec![0.0, 200.0, 230.0, 490.0];

        // Only 20px to the next column, 190px back towards the first one.
        let crowded = label(&s, 1);
        assert_eq!((crowded.side, crowded.anchor), (LabelSide::Outside, TextAnchor::End));
        assert_eq!(crowded.x, 194.0);

        let roomy = label(&s, 2);
        assert_eq!((roomy.side, roomy.anchor), (LabelSide::Inside, TextAnchor::Start));
        assert_eq!(roomy.x, 246.0);
    }

    #[test]
    fn value_lines_use_prefix_and_suffix() {
        let cfg = LabelConfig {
            prefix: "$".to_string(),
            suffix: "M".to_string(),
            ..LabelConfig::default()
        };
        assert_eq!(label_text("Coal", 124.729, &cfg), "Coal\n$124.73M");
        let plain = LabelConfig {
            show_values: false,
            ..LabelConfig::default()
        };
        assert_eq!(label_text("Coal", 1.0, &plain), "Coal");
        assert_eq!(format_value(15.0), "15");
        assert_eq!(format_value(-0.001), "0");
    }
}

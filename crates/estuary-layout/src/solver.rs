//! Shared value scale and column geometry.
//!
//! One linear value scale serves the whole diagram so flow widths compare across columns. The
//! densest column decides the node padding; the busiest column decides the scale; every other
//! column spreads its nodes over the full extent with its own padding.

use crate::config::SolverConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    pub domain: [f64; 2],
    pub range: [f64; 2],
}

impl LinearScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    /// Maps `v` from the domain onto the range. A collapsed domain maps everything to `range[0]`.
    pub fn apply(&self, v: f64) -> f64 {
        let span = self.domain[1] - self.domain[0];
        if !(span > 0.0) {
            return self.range[0];
        }
        self.range[0] + (v - self.domain[0]) * (self.range[1] - self.range[0]) / span
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scales {
    /// Pixels along the value axis.
    pub extent: f64,
    /// Pixels along the column axis.
    pub breadth: f64,
    pub node_thickness: f64,
    /// Gap between adjacent nodes in the densest column.
    pub node_padding: f64,
    /// `[0, max(column totals)] -> [0, extent left after padding]`.
    pub value: LinearScale,
    /// Column index onto the leading edge of the column's bars.
    pub column: LinearScale,
    pub column_paddings: Vec<f64>,
    pub column_positions: Vec<f64>,
}

impl Scales {
    /// Thickness of a flow (or node) of the given value.
    pub fn thickness(&self, value: f64) -> f64 {
        self.value.apply(value).max(0.0)
    }
}

pub fn solve(
    column_lengths: &[usize],
    column_totals: &[f64],
    available_extent: f64,
    available_breadth: f64,
    config: &SolverConfig,
) -> Result<Scales> {
    config.validate()?;
    if column_lengths.len() != column_totals.len() {
        return Err(Error::StatsMismatch {
            lengths: column_lengths.len(),
            totals: column_totals.len(),
        });
    }
    if column_lengths.is_empty() {
        return Err(Error::NoColumns);
    }
    if !available_extent.is_finite() || !available_breadth.is_finite() {
        return Err(Error::InvalidArea {
            message: format!("extent {available_extent} x breadth {available_breadth}"),
        });
    }
    let extent = available_extent.max(0.0);
    let breadth = available_breadth.max(0.0);

    let max_len = column_lengths.iter().copied().max().unwrap_or(0);
    let node_padding = if max_len > 1 {
        let gaps = (max_len - 1) as f64;
        (extent * config.padding_ratio / gaps)
            .clamp(config.min_node_padding, config.max_node_padding)
            .min(extent / gaps)
    } else {
        0.0
    };
    let remaining = (extent - max_len.saturating_sub(1) as f64 * node_padding).max(0.0);

    let max_total = column_totals
        .iter()
        .copied()
        .filter(|t| t.is_finite())
        .fold(0.0_f64, f64::max);
    let value = LinearScale::new([0.0, max_total], [0.0, remaining]);

    let column_paddings = column_lengths
        .iter()
        .zip(column_totals)
        .map(|(&len, &total)| {
            if len <= 1 {
                return 0.0;
            }
            let total = if total.is_finite() { total.max(0.0) } else { 0.0 };
            ((extent - value.apply(total)) / (len - 1) as f64).max(0.0)
        })
        .collect::<Vec<_>>();

    let n = column_lengths.len();
    let node_thickness = config.node_thickness.min(breadth / n as f64).max(0.0);
    let inset = config
        .column_inset
        .min(((breadth - node_thickness) / 2.0).max(0.0));
    let first = inset;
    let last = if n > 1 {
        (breadth - inset - node_thickness).max(first)
    } else {
        first
    };
    let column = LinearScale::new([0.0, n.saturating_sub(1) as f64], [first, last]);
    let column_positions = (0..n).map(|c| column.apply(c as f64)).collect::<Vec<_>>();

    tracing::debug!(
        max_len,
        max_total,
        node_padding,
        remaining,
        node_thickness,
        "solved flow diagram scales"
    );

    Ok(Scales {
        extent,
        breadth,
        node_thickness,
        node_padding,
        value,
        column,
        column_paddings,
        column_positions,
    })
}

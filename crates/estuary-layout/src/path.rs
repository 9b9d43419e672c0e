//! Link centre-lines.
//!
//! A link leaves the trailing edge of its source bar and enters the leading edge of its target
//! bar; both control points sit halfway along the column axis (the classic Sankey S-curve).

use crate::config::Orientation;
use crate::model::{LinkPath, to_screen};
use std::fmt::Write as _;

pub(crate) fn link_path(
    orientation: Orientation,
    source_x1: f64,
    target_x0: f64,
    source_mid: f64,
    target_mid: f64,
    width: f64,
) -> LinkPath {
    let mx = (source_x1 + target_x0) / 2.0;
    LinkPath {
        start: to_screen(orientation, source_x1, source_mid),
        control1: to_screen(orientation, mx, source_mid),
        control2: to_screen(orientation, mx, target_mid),
        end: to_screen(orientation, target_x0, target_mid),
        width,
    }
}

impl LinkPath {
    /// SVG path data: `M x,y C x,y x,y x,y` with at most three fractional digits.
    pub fn to_svg_d(&self) -> String {
        let mut out = String::with_capacity(64);
        let _ = write!(
            &mut out,
            "M{},{}C{},{},{},{},{},{}",
            fmt_path(self.start.x),
            fmt_path(self.start.y),
            fmt_path(self.control1.x),
            fmt_path(self.control1.y),
            fmt_path(self.control2.x),
            fmt_path(self.control2.y),
            fmt_path(self.end.x),
            fmt_path(self.end.y),
        );
        out
    }
}

fn fmt_path(v: f64) -> String {
    // Round half-up to three digits and print without trailing zeros or `-0`.
    if !v.is_finite() || v.abs() < 0.0005 {
        return "0".to_string();
    }
    let r = (v * 1000.0 + 0.5).floor() / 1000.0;
    if r.abs() < 0.0005 {
        return "0".to_string();
    }
    let mut s = format!("{r:.3}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

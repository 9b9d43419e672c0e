//! Typed layout configuration resolved from the `sankey` section of a [`FlowConfig`].

use crate::order::LinkOrder;
use crate::{Error, Result};
use estuary_core::FlowConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    /// Columns run left to right; values stack top to bottom.
    #[default]
    Horizontal,
    /// Columns run top to bottom; values stack left to right.
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// `(extent, breadth)`: pixels along the value axis and along the column axis.
    pub fn extents(&self, orientation: Orientation) -> (f64, f64) {
        match orientation {
            Orientation::Horizontal => (self.height, self.width),
            Orientation::Vertical => (self.width, self.height),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverConfig {
    /// Share of the value extent reserved for gaps in the densest column.
    pub padding_ratio: f64,
    pub min_node_padding: f64,
    pub max_node_padding: f64,
    /// Bar size along the column axis.
    pub node_thickness: f64,
    /// Space kept free before the first and after the last column (room for outside labels).
    pub column_inset: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            padding_ratio: 0.12,
            min_node_padding: 0.0,
            max_node_padding: 25.0,
            node_thickness: 10.0,
            column_inset: 0.0,
        }
    }
}

impl SolverConfig {
    /// Rejects values the padding clamp cannot handle (NaN bounds, `min > max`).
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.padding_ratio) {
            return Err(Error::InvalidConfig {
                message: format!("paddingRatio must be in [0, 1), got {}", self.padding_ratio),
            });
        }
        check_non_negative(&[
            ("minNodePadding", self.min_node_padding),
            ("maxNodePadding", self.max_node_padding),
            ("nodeThickness", self.node_thickness),
            ("columnInset", self.column_inset),
        ])?;
        if self.min_node_padding > self.max_node_padding {
            return Err(Error::InvalidConfig {
                message: format!(
                    "minNodePadding ({}) exceeds maxNodePadding ({})",
                    self.min_node_padding, self.max_node_padding
                ),
            });
        }
        Ok(())
    }
}

fn check_non_negative(values: &[(&str, f64)]) -> Result<()> {
    for &(key, v) in values {
        if !(v.is_finite() && v >= 0.0) {
            return Err(Error::InvalidConfig {
                message: format!("{key} must be a finite, non-negative number, got {v}"),
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelConfig {
    /// Distance between a bar and its label.
    pub offset: f64,
    /// Free space an end column needs before its label may go outside.
    pub room: f64,
    /// Labels flip sides when the gap to the neighbouring column is narrower than this.
    pub min_gap: f64,
    pub show_values: bool,
    pub prefix: String,
    pub suffix: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            offset: 6.0,
            room: 80.0,
            min_gap: 60.0,
            show_values: true,
            prefix: String::new(),
            suffix: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    pub area: Size,
    pub orientation: Orientation,
    pub solver: SolverConfig,
    pub labels: LabelConfig,
    pub link_order: LinkOrder,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            area: Size::new(600.0, 400.0),
            orientation: Orientation::Horizontal,
            solver: SolverConfig::default(),
            labels: LabelConfig::default(),
            link_order: LinkOrder::Value,
        }
    }
}

impl LayoutConfig {
    /// Reads `sankey.*` keys, falling back to defaults for anything missing.
    pub fn from_config(cfg: &FlowConfig) -> Result<Self> {
        let d = Self::default();
        let num = |key: &str, fallback: f64| cfg.get_f64(&format!("sankey.{key}")).unwrap_or(fallback);

        let orientation = match cfg.get_str("sankey.orientation") {
            None | Some("horizontal") => Orientation::Horizontal,
            Some("vertical") => Orientation::Vertical,
            Some(other) => {
                return Err(Error::InvalidConfig {
                    message: format!("unknown orientation {other:?}"),
                });
            }
        };
        let link_order = match cfg.get_str("sankey.linkOrder") {
            None => d.link_order,
            Some(raw) => LinkOrder::parse(raw).ok_or_else(|| Error::InvalidConfig {
                message: format!("unknown link order {raw:?}"),
            })?,
        };

        let out = Self {
            area: Size::new(num("width", d.area.width), num("height", d.area.height)),
            orientation,
            solver: SolverConfig {
                padding_ratio: num("paddingRatio", d.solver.padding_ratio),
                min_node_padding: num("minNodePadding", d.solver.min_node_padding),
                max_node_padding: num("maxNodePadding", d.solver.max_node_padding),
                node_thickness: num("nodeThickness", d.solver.node_thickness),
                column_inset: num("columnInset", d.solver.column_inset),
            },
            labels: LabelConfig {
                offset: num("labelOffset", d.labels.offset),
                room: num("labelRoom", d.labels.room),
                min_gap: num("minLabelGap", d.labels.min_gap),
                show_values: cfg
                    .get_bool("sankey.showValues")
                    .unwrap_or(d.labels.show_values),
                prefix: cfg
                    .get_str("sankey.prefix")
                    .map(str::to_string)
                    .unwrap_or(d.labels.prefix),
                suffix: cfg
                    .get_str("sankey.suffix")
                    .map(str::to_string)
                    .unwrap_or(d.labels.suffix),
            },
            link_order,
        };
        out.validate()?;
        Ok(out)
    }

    pub fn validate(&self) -> Result<()> {
        self.solver.validate()?;
        check_non_negative(&[
            ("width", self.area.width),
            ("height", self.area.height),
            ("labelOffset", self.labels.offset),
            ("labelRoom", self.labels.room),
            ("minLabelGap", self.labels.min_gap),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_section_yields_defaults() {
        let cfg = LayoutConfig::from_config(&FlowConfig::default()).unwrap();
        assert_eq!(cfg, LayoutConfig::default());
    }

    #[test]
    fn sankey_keys_override_defaults() {
        let cfg = FlowConfig::from_value(json!({
            "sankey": {
                "width": 800,
                "height": "300",
                "orientation": "vertical",
                "paddingRatio": 0.2,
                "showValues": false,
                "prefix": "$",
                "linkOrder": "node"
            }
        }));
        let cfg = LayoutConfig::from_config(&cfg).unwrap();
        assert_eq!(cfg.area, Size::new(800.0, 300.0));
        assert_eq!(cfg.orientation, Orientation::Vertical);
        assert_eq!(cfg.solver.padding_ratio, 0.2);
        assert!(!cfg.labels.show_values);
        assert_eq!(cfg.labels.prefix, "$");
        assert_eq!(cfg.link_order, LinkOrder::OppositeNode);
        assert_eq!(cfg.area.extents(cfg.orientation), (800.0, 300.0));
    }

    #[test]
    fn invalid_values_are_rejected() {
        for bad in [
            json!({ "sankey": { "paddingRatio": 1.5 } }),
            json!({ "sankey": { "orientation": "diagonal" } }),
            json!({ "sankey": { "linkOrder": "random" } }),
            json!({ "sankey": { "nodeThickness": -1 } }),
            json!({ "sankey": { "minNodePadding": 30, "maxNodePadding": 10 } }),
        ] {
            let result = LayoutConfig::from_config(&FlowConfig::from_value(bad.clone()));
            assert!(
                matches!(result, Err(Error::InvalidConfig { .. })),
                "{bad} should be rejected"
            );
        }
    }
}

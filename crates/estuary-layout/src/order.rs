//! Link ordering used for stacking links on a node and for paint order.
//!
//! Comparators only decide the primary key. Ties are always broken by link creation order, so
//! equal inputs stack identically on every pass.

use crate::highlight::HighlightSet;
use estuary_core::{Link, LinkId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// What a comparator gets to see of a link.
#[derive(Debug, Clone, Copy)]
pub struct LinkView<'a> {
    pub id: LinkId,
    pub link: &'a Link,
    /// Top of the source node along the value axis.
    pub source_y0: f64,
    /// Top of the target node along the value axis.
    pub target_y0: f64,
}

pub trait LinkComparator {
    fn compare(&self, a: &LinkView<'_>, b: &LinkView<'_>) -> Ordering;
}

impl<F> LinkComparator for F
where
    F: Fn(&LinkView<'_>, &LinkView<'_>) -> Ordering,
{
    fn compare(&self, a: &LinkView<'_>, b: &LinkView<'_>) -> Ordering {
        self(a, b)
    }
}

fn f64_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Built-in orderings, selectable from configuration (`sankey.linkOrder`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LinkOrder {
    /// Ascending by value: small flows first, so large flows paint on top.
    #[default]
    Value,
    ValueDescending,
    /// By the position of the far end; keeps links at a node from crossing each other.
    OppositeNode,
}

impl LinkOrder {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "value" => Some(Self::Value),
            "valueDesc" | "valueDescending" => Some(Self::ValueDescending),
            "node" | "oppositeNode" => Some(Self::OppositeNode),
            _ => None,
        }
    }
}

impl LinkComparator for LinkOrder {
    fn compare(&self, a: &LinkView<'_>, b: &LinkView<'_>) -> Ordering {
        match self {
            Self::Value => f64_cmp(a.link.value, b.link.value),
            Self::ValueDescending => f64_cmp(b.link.value, a.link.value),
            // Links sharing a source differ by target, and vice versa, so one lexicographic key
            // serves both ends.
            Self::OppositeNode => f64_cmp(a.target_y0, b.target_y0)
                .then_with(|| f64_cmp(a.source_y0, b.source_y0)),
        }
    }
}

/// Moves highlighted links after all others, keeping `inner` order within each group.
pub struct HighlightLast<'a, C> {
    pub inner: C,
    pub highlight: &'a HighlightSet,
}

impl<'a, C> HighlightLast<'a, C> {
    pub fn new(inner: C, highlight: &'a HighlightSet) -> Self {
        Self { inner, highlight }
    }
}

impl<C: LinkComparator> LinkComparator for HighlightLast<'_, C> {
    fn compare(&self, a: &LinkView<'_>, b: &LinkView<'_>) -> Ordering {
        let ha = self.highlight.contains_link(a.id);
        let hb = self.highlight.contains_link(b.id);
        ha.cmp(&hb).then_with(|| self.inner.compare(a, b))
    }
}

/// Sorts `ids` with `comparator`, breaking ties by creation order.
pub(crate) fn sort_links<C>(ids: &mut [LinkId], views: &[LinkView<'_>], comparator: &C)
where
    C: LinkComparator + ?Sized,
{
    ids.sort_by(|a, b| {
        comparator
            .compare(&views[a.0], &views[b.0])
            .then_with(|| a.cmp(b))
    });
}

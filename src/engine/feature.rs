// src/engine/feature.rs
//! Per-feature evaluation as a small state machine.
//!
//! ```text
//! Unresolved ── from_link ──▶ LinkFound ── judge ──▶ Validated | Rejected
//!            └─────────────▶ LinkMissing ─ finish ─▶ (rejected evidence)
//! ```
//!
//! Every transition is a pure function; the sequencer does the page work in
//! between and hands the result to `judge` as a `FollowOutcome`.

use super::types::{EvidenceItem, Feature};

/// What following a candidate link produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FollowOutcome {
    /// Navigation failed (timeout, DNS, refused, ...).
    Unreachable { reason: String },
    /// Loaded, but the page is a soft 404.
    NotFound { url: String },
    /// Loaded and validated. `hit_url` is the evidence URL on success.
    Checked { hit_url: String, passed: bool, reason: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeatureState {
    Unresolved,
    LinkFound { href: String },
    LinkMissing,
    Validated(EvidenceItem),
    Rejected(EvidenceItem),
}

impl FeatureState {
    /// Unresolved -> LinkFound | LinkMissing
    pub fn from_link(link: Option<String>) -> Self {
        match link {
            Some(href) if !href.is_empty() => FeatureState::LinkFound { href },
            _ => FeatureState::LinkMissing,
        }
    }

    /// LinkFound -> Validated | Rejected. Other states pass through untouched.
    pub fn judge(self, feature: Feature, outcome: FollowOutcome) -> Self {
        let FeatureState::LinkFound { href } = self else { return self };
        let label = feature.short();
        match outcome {
            FollowOutcome::Unreachable { reason } => {
                FeatureState::Rejected(EvidenceItem::missing(format!("{label}: リンク先に到達できず（{href}: {reason}）")))
            }
            FollowOutcome::NotFound { url } => {
                FeatureState::Rejected(EvidenceItem::missing(format!("{label}: 404エラー（{url}）")))
            }
            FollowOutcome::Checked { hit_url, passed: true, reason } => {
                FeatureState::Validated(EvidenceItem::found(hit_url, format!("{label}: 有（{reason}）")))
            }
            FollowOutcome::Checked { passed: false, reason, .. } => {
                FeatureState::Rejected(EvidenceItem::missing(format!("{label}: 内容なし（{reason}）")))
            }
        }
    }

    /// Collapse to evidence. Always yields a non-empty note.
    pub fn finish(self, feature: Feature) -> EvidenceItem {
        let label = feature.short();
        match self {
            FeatureState::Validated(item) | FeatureState::Rejected(item) => item,
            FeatureState::LinkMissing => EvidenceItem::missing(format!("{label}: リンク未検出")),
            FeatureState::LinkFound { href } => EvidenceItem::missing(format!("{label}: リンク先未確認（{href}）")),
            FeatureState::Unresolved => EvidenceItem::missing(format!("{label}: 未評価")),
        }
    }
}

/// Evidence for a feature the current mode does not evaluate.
pub fn skipped(feature: Feature, mode_label: &str) -> EvidenceItem {
    EvidenceItem::missing(format!("{}: {mode_label}では対象外", feature.short()))
}

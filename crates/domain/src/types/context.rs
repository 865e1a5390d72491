//! Browsing context and the period derived from it

use serde::{Deserialize, Serialize};

use crate::impl_keyword_conversions;

/// Kind of a context frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextKind {
    Day,
    Month,
    Year,
    Task,
}

impl_keyword_conversions!(ContextKind {
    Day => "day",
    Month => "month",
    Year => "year",
    Task => "task",
});

impl ContextKind {
    /// The period granularity for temporal kinds.
    pub fn period_kind(self) -> Option<PeriodKind> {
        match self {
            Self::Day => Some(PeriodKind::Day),
            Self::Month => Some(PeriodKind::Month),
            Self::Year => Some(PeriodKind::Year),
            Self::Task => None,
        }
    }
}

/// Where in the hierarchy the user is browsing.
///
/// Deserializes from either a bare label array (`["ClientA", "ProjectX"]`,
/// a task context) or an object `{ "type": "month", "start": 1704067200000 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ContextRepr")]
pub struct Context {
    #[serde(rename = "type")]
    pub kind: ContextKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
}

impl Context {
    /// Hierarchical label-path context.
    pub fn task(path: Vec<String>) -> Self {
        Self { kind: ContextKind::Task, start: None, path }
    }

    /// Temporal context anchored at `start` (epoch milliseconds).
    pub fn period(kind: PeriodKind, start: i64) -> Self {
        Self { kind: kind.into(), start: Some(start), path: Vec::new() }
    }

    /// Whether this context is day/month/year typed and anchored.
    pub fn is_temporal(&self) -> bool {
        self.kind.period_kind().is_some() && self.start.is_some()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ContextRepr {
    Path(Vec<String>),
    Object {
        #[serde(rename = "type")]
        kind: ContextKind,
        #[serde(default)]
        start: Option<i64>,
        #[serde(default)]
        path: Vec<String>,
    },
}

impl From<ContextRepr> for Context {
    fn from(repr: ContextRepr) -> Self {
        match repr {
            ContextRepr::Path(path) => Self::task(path),
            ContextRepr::Object { kind, start, path } => Self { kind, start, path },
        }
    }
}

/// Coarse date granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Day,
    Month,
    Year,
}

impl_keyword_conversions!(PeriodKind {
    Day => "day",
    Month => "month",
    Year => "year",
});

impl From<PeriodKind> for ContextKind {
    fn from(kind: PeriodKind) -> Self {
        match kind {
            PeriodKind::Day => Self::Day,
            PeriodKind::Month => Self::Month,
            PeriodKind::Year => Self::Year,
        }
    }
}

/// Date scope derived from a context; `value` is the canonical start of the
/// day, month or year in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    #[serde(rename = "type")]
    pub kind: PeriodKind,
    pub value: i64,
}

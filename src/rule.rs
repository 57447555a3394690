//! Rules: the unit of computation a node evaluates once per tick. A rule
//! pairs a target collection with an operation describing how its output
//! rows are applied, plus a thunk that (re-)builds the operator tree fresh
//! against the current tick's collection snapshots.

use crate::ra::LineagedRow;

/// How a rule's output rows are applied to its target collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOp {
    /// Merge output rows in immediately, visible to later rules this tick.
    ImmediateMerge,
    /// Queue output rows to merge in at the start of the next tick.
    DeferredMerge,
    /// Queue output rows to delete at the start of the next tick.
    DeferredDelete,
}

/// One rule in a node's rule list.
pub struct Rule {
    pub rule_number: i64,
    pub target_collection: String,
    pub op: RuleOp,
    /// A rule that only ever fires on the node's first tick.
    pub bootstrap: bool,
    /// The rule's source text, recorded verbatim with the lineage client so
    /// a derived fact's history can be traced back to the rule that wrote
    /// it, not just its number.
    pub source: String,
    evaluate: Box<dyn Fn() -> Vec<LineagedRow>>,
}

impl Rule {
    /// `evaluate` closes over whatever collection handles the rule scans;
    /// see [`crate::node::FluentBuilder::table`] and friends, which hand
    /// back a clonable handle for exactly this purpose.
    pub fn new(
        rule_number: i64,
        target_collection: impl Into<String>,
        op: RuleOp,
        bootstrap: bool,
        source: impl Into<String>,
        evaluate: impl Fn() -> Vec<LineagedRow> + 'static,
    ) -> Self {
        Rule {
            rule_number,
            target_collection: target_collection.into(),
            op,
            bootstrap,
            source: source.into(),
            evaluate: Box::new(evaluate),
        }
    }

    /// Re-evaluate this rule's operator tree against the collections it
    /// closes over, returning this tick's output rows.
    pub fn evaluate(&self) -> Vec<LineagedRow> {
        (self.evaluate)()
    }
}

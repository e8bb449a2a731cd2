//! The fixed data-flow rules between node kinds.
//!
//! Wiring an upstream node to a downstream one copies some of the upstream outputs into
//! the downstream inputs and gives the downstream node a fixed set of outputs. Which
//! outputs are copied, how many the upstream node must have, and what the downstream
//! node produces is decided by one row of the [`PropagationTable`].
//!
//! Propagation happens once, when the connection is made. Changing the upstream node
//! afterwards does not refresh nodes that are already wired to it.

use crate::graph::{Node, NodeKind};
use crate::image::ImageResolver;

/// Which source outputs become the destination's inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSelection {
    /// Every source output, in order.
    All,
    /// The source outputs at these indices, in this order.
    Indices(&'static [usize]),
    /// The first `n` source outputs.
    Prefix(usize),
}

impl InputSelection {
    fn indices(self, available: usize) -> Vec<usize> {
        match self {
            InputSelection::All => (0..available).collect(),
            InputSelection::Indices(indices) => indices.to_vec(),
            InputSelection::Prefix(n) => (0..n.min(available)).collect(),
        }
    }
}

/// One row of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropagationRule {
    pub source: NodeKind,
    pub destination: NodeKind,
    pub inputs: InputSelection,
    /// The rule only applies when the source has at least this many outputs.
    pub min_source_outputs: usize,
    /// Outputs the destination ends up with, resolved one by one.
    pub outputs: &'static [&'static str],
}

/// What `on_connect` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationOutcome {
    /// Destination inputs and outputs were overwritten.
    Applied,
    /// No row for this (source, destination) pair.
    NoRule,
    /// A row exists but the source does not have enough outputs yet.
    NotReady { required: usize, available: usize },
}

const STAGE1_OUTPUTS: &[&str] = &[
    "images/debug_full_mask.png",
    "images/background.png",
    "images/output_no_bg.png",
];

const STAGE2_OUTPUTS: &[&str] = &["images/lama_output.png"];

const STAGE3_OUTPUTS: &[&str] = &["images/output.png"];

const STAGE4_OUTPUTS: &[&str] = &[
    "images/360_view_001_000deg_from_000deg.png",
    "images/360_view_002_045deg_from_060deg.png",
    "images/360_view_003_090deg_from_090deg.png",
    "images/360_view_004_135deg_from_090deg.png",
    "images/360_view_005_180deg_from_180deg.png",
    "images/360_view_006_225deg_from_240deg.png",
    "images/360_view_007_270deg_from_270deg.png",
    "images/360_view_008_315deg_from_000deg.png",
    "images/ultrafast_360.gif",
];

const STAGE5_OUTPUTS: &[&str] = &["images/step05_sc_2025-08-11.gif"];

/// Rule table keyed by (source kind, destination kind).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropagationTable {
    rules: Vec<PropagationRule>,
}

impl Default for PropagationTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl PropagationTable {
    /// The image pipeline: Origin feeds Stage1 and Stage3, Stage1 feeds Stage2 and
    /// Stage4, Stage4 feeds Stage5.
    pub fn standard() -> Self {
        use NodeKind::*;
        let rule = |source, destination, inputs, min_source_outputs, outputs| PropagationRule {
            source,
            destination,
            inputs,
            min_source_outputs,
            outputs,
        };
        Self {
            rules: vec![
                rule(Origin, Stage1, InputSelection::All, 0, STAGE1_OUTPUTS),
                rule(Stage1, Stage2, InputSelection::Indices(&[0, 1]), 2, STAGE2_OUTPUTS),
                rule(Origin, Stage3, InputSelection::All, 0, STAGE3_OUTPUTS),
                rule(Stage1, Stage4, InputSelection::Indices(&[2]), 3, STAGE4_OUTPUTS),
                rule(Stage4, Stage5, InputSelection::Prefix(8), 8, STAGE5_OUTPUTS),
            ],
        }
    }

    pub fn rules(&self) -> &[PropagationRule] {
        &self.rules
    }

    pub fn lookup(&self, source: NodeKind, destination: NodeKind) -> Option<&PropagationRule> {
        self.rules
            .iter()
            .find(|rule| rule.source == source && rule.destination == destination)
    }
}

/// Applies the table to connect/disconnect events.
#[derive(Debug, Clone, Default)]
pub struct PropagationEngine {
    table: PropagationTable,
}

impl PropagationEngine {
    pub fn new(table: PropagationTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &PropagationTable {
        &self.table
    }

    /// Run the rule for `source → destination`, if there is one and it is ready.
    ///
    /// On success the destination inputs become copies of the selected source outputs
    /// (handles included), and its outputs are replaced by the rule's fixed list. Any
    /// other outcome leaves the destination untouched.
    pub fn on_connect(
        &self,
        source: &Node,
        destination: &mut Node,
        resolver: &ImageResolver,
    ) -> PropagationOutcome {
        let Some(rule) = self.table.lookup(source.kind(), destination.kind()) else {
            log::debug!("no propagation rule {} -> {}", source.kind(), destination.kind());
            return PropagationOutcome::NoRule;
        };

        let available = source.output_images().len();
        if available < rule.min_source_outputs {
            log::debug!(
                "{} -> {} not ready: {} of {} source outputs",
                rule.source,
                rule.destination,
                available,
                rule.min_source_outputs
            );
            return PropagationOutcome::NotReady { required: rule.min_source_outputs, available };
        }

        destination.input_images = source.output_images().select(rule.inputs.indices(available));
        destination.output_images = resolver.resolve_all(rule.outputs.iter().copied());
        log::debug!(
            "propagated {} -> {}: {} inputs, {} outputs",
            rule.source,
            rule.destination,
            destination.input_images.len(),
            destination.output_images.len()
        );
        PropagationOutcome::Applied
    }

    /// Clear what the downstream node received.
    ///
    /// Inputs always go; outputs stay while the node still feeds something, and the
    /// Origin keeps its outputs regardless.
    pub fn on_disconnect(&self, downstream: &mut Node, has_outgoing: bool) {
        downstream.input_images.clear();
        if !has_outgoing && !downstream.kind().is_origin() {
            downstream.output_images.clear();
        }
        log::debug!(
            "disconnected {} (outputs kept: {})",
            downstream.title(),
            !downstream.output_images.is_empty()
        );
    }
}

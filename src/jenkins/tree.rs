use indexmap::IndexMap;
use log::debug;

use crate::error::{JenlogsError, Result};

use super::types::{
    BuildDescription, FlowNode, FLOW_GRAPH_ACTION_CLASS, STEP_ATOM_CLASS, STEP_END_CLASS,
    STEP_START_CLASS, WORKFLOW_RUN_CLASS,
};

/// Marker prefix Jenkins puts on the start node of a parallel branch.
const BRANCH_MARKER: &str = "Branch: ";

/// Branch label for nodes that sit outside any parallel branch.
const NO_BRANCH: &str = "_";

/// Classification of one execution node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Structural stage/parallel delimiter; never log-bearing.
    Grouping,
    /// Atomic step that produced its own console output segment.
    Action,
}

/// Classifies a flow-graph node class name.
///
/// Returns `None` for node classes that are not part of the step tree
/// (e.g. flow start/end bookkeeping nodes).
pub fn classify(class: &str) -> Option<NodeKind> {
    match class {
        STEP_ATOM_CLASS => Some(NodeKind::Action),
        STEP_START_CLASS | STEP_END_CLASS => Some(NodeKind::Grouping),
        _ => None,
    }
}

/// One classified node of the execution tree.
#[derive(Debug, Clone)]
pub struct ExecutionNode {
    pub kind: NodeKind,
    pub id: String,
    pub display_name: String,
    pub icon_color: String,
    pub parents: Vec<String>,
    pub url: String,
}

/// A build's pipeline execution tree.
///
/// The server returns the flow graph as a flat node list with parent
/// links; the list is in document order, which for a completed build is
/// the depth-first order of the executed pipeline. The map preserves
/// that order, so iteration doubles as the traversal.
#[derive(Debug, Default)]
pub struct ExecutionTree {
    nodes: IndexMap<String, ExecutionNode>,
}

impl ExecutionTree {
    /// Extracts the execution tree from a build description.
    ///
    /// The description must be a workflow run carrying a flow-graph
    /// action; anything else means the build is not a pipeline build or
    /// the API contract changed, and is reported as a malformed response.
    pub fn from_build(description: &BuildDescription) -> Result<Self> {
        if description.class != WORKFLOW_RUN_CLASS {
            return Err(JenlogsError::MalformedResponse(format!(
                "Expected class {WORKFLOW_RUN_CLASS}, got {}",
                description.class
            )));
        }

        let flow_graph = description
            .actions
            .iter()
            .find(|action| action.class.as_deref() == Some(FLOW_GRAPH_ACTION_CLASS))
            .ok_or_else(|| {
                JenlogsError::MalformedResponse(format!(
                    "Couldn't find class {FLOW_GRAPH_ACTION_CLASS} in actions"
                ))
            })?;

        let flow_nodes = flow_graph.nodes.as_deref().ok_or_else(|| {
            JenlogsError::MalformedResponse("Flow graph action carries no nodes".to_string())
        })?;

        Ok(Self::from_flow_nodes(flow_nodes))
    }

    /// Builds the tree from raw flow nodes, keeping document order.
    pub fn from_flow_nodes(flow_nodes: &[FlowNode]) -> Self {
        let mut nodes = IndexMap::new();
        for raw in flow_nodes {
            let Some(kind) = classify(&raw.class) else {
                debug!("Skipping non-step node {} ({})", raw.id, raw.class);
                continue;
            };
            nodes.insert(
                raw.id.clone(),
                ExecutionNode {
                    kind,
                    id: raw.id.clone(),
                    display_name: raw.display_name.clone(),
                    icon_color: raw.icon_color.clone(),
                    parents: raw.parents.clone(),
                    url: raw.url.clone(),
                },
            );
        }
        Self { nodes }
    }

    /// Iterates the nodes in server document order.
    pub fn iter(&self) -> impl Iterator<Item = &ExecutionNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Name of the parallel branch a node belongs to.
    ///
    /// Branch start nodes are labelled `Branch: <name>`; every other
    /// node inherits the branch of its first parent. Nodes outside any
    /// branch resolve to `_`.
    pub fn branch_name(&self, node: &ExecutionNode) -> String {
        if let Some(name) = node.display_name.strip_prefix(BRANCH_MARKER) {
            return name.to_string();
        }

        let mut current = node;
        loop {
            let Some(parent_id) = current.parents.first() else {
                return NO_BRANCH.to_string();
            };
            let Some(parent) = self.nodes.get(parent_id) else {
                return NO_BRANCH.to_string();
            };
            if let Some(name) = parent.display_name.strip_prefix(BRANCH_MARKER) {
                return name.to_string();
            }
            current = parent;
        }
    }
}

/// Test fixtures shared by the tree, resolver and client tests.
#[cfg(test)]
pub(crate) mod fixtures {
    use super::super::types::{FlowNode, STEP_ATOM_CLASS, STEP_END_CLASS, STEP_START_CLASS};

    pub(crate) fn flow_node(
        id: &str,
        class: &str,
        name: &str,
        color: &str,
        parents: &[&str],
    ) -> FlowNode {
        FlowNode {
            class: class.to_string(),
            id: id.to_string(),
            display_name: name.to_string(),
            icon_color: color.to_string(),
            parents: parents.iter().map(|p| p.to_string()).collect(),
            url: format!("/job/app/7/execution/node/{id}/"),
        }
    }

    /// Stage "build" -> [compile (blue)], stage "test" -> parallel
    /// [unit (blue), integration (red)].
    pub(crate) fn sample_nodes() -> Vec<FlowNode> {
        vec![
            flow_node("2", STEP_START_CLASS, "Start of Pipeline", "blue", &[]),
            flow_node("3", STEP_START_CLASS, "build", "blue", &["2"]),
            flow_node("4", STEP_ATOM_CLASS, "compile", "blue", &["3"]),
            flow_node("5", STEP_END_CLASS, "build", "blue", &["4"]),
            flow_node("6", STEP_START_CLASS, "test", "red", &["5"]),
            flow_node("7", STEP_START_CLASS, "Execute in parallel :", "red", &["6"]),
            flow_node("8", STEP_START_CLASS, "Branch: unit", "blue", &["7"]),
            flow_node("9", STEP_START_CLASS, "Branch: integration", "red", &["7"]),
            flow_node("10", STEP_ATOM_CLASS, "unit", "blue", &["8"]),
            flow_node("11", STEP_ATOM_CLASS, "integration", "red", &["9"]),
            flow_node("12", STEP_END_CLASS, "unit", "blue", &["10"]),
            flow_node("13", STEP_END_CLASS, "integration", "red", &["11"]),
            flow_node("14", STEP_END_CLASS, "test", "red", &["12", "13"]),
        ]
    }
}

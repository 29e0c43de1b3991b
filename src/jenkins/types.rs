use serde::Deserialize;

pub const WORKFLOW_RUN_CLASS: &str = "org.jenkinsci.plugins.workflow.job.WorkflowRun";
pub const FLOW_GRAPH_ACTION_CLASS: &str =
    "org.jenkinsci.plugins.workflow.job.views.FlowGraphAction";

pub const STEP_START_CLASS: &str = "org.jenkinsci.plugins.workflow.cps.nodes.StepStartNode";
pub const STEP_ATOM_CLASS: &str = "org.jenkinsci.plugins.workflow.cps.nodes.StepAtomNode";
pub const STEP_END_CLASS: &str = "org.jenkinsci.plugins.workflow.cps.nodes.StepEndNode";

/// Top-level build description returned by `<build>/api/json?depth=2`.
///
/// Only the fields the resolver needs are modelled; the raw payload is
/// kept separately for the `build_info.json` artifact.
#[derive(Debug, Deserialize)]
pub struct BuildDescription {
    #[serde(rename = "_class")]
    pub class: String,

    #[serde(default)]
    pub actions: Vec<BuildAction>,
}

/// One entry of the build's `actions` list.
///
/// The list is heterogeneous; only the flow-graph action carries `nodes`.
#[derive(Debug, Deserialize)]
pub struct BuildAction {
    #[serde(rename = "_class", default)]
    pub class: Option<String>,

    #[serde(default)]
    pub nodes: Option<Vec<FlowNode>>,
}

/// One raw node of the flow graph, in server document order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowNode {
    #[serde(rename = "_class")]
    pub class: String,

    /// Server-assigned node id, unique within one build
    pub id: String,

    pub display_name: String,

    /// Status encoding (e.g. "blue", "red", "aborted")
    pub icon_color: String,

    /// Ids of this node's parents in the flow graph
    #[serde(default)]
    pub parents: Vec<String>,

    /// Server-relative URL of the node's detail page
    pub url: String,
}

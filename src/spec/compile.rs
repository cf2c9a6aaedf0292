//! Graph builders for the three specification kinds.
//!
//! Node ids are positional: `CU3` is the third readable use case, `RNF1` the
//! first non-functional requirement. They are not stable across edits that
//! add, remove or reorder entries.

use super::graph::{DiagramEdge, DiagramNode, DiagramSubgraph, SpecGraph};
use super::{load_items, split_actors, Requirement, SpecKind, UseCase, UserStory};
use crate::graph::format::Layout;
use ahash::AHashSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Titles and edge labels written into specification graphs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GraphLabels {
    pub actors: String,
    pub use_cases: String,
    pub functional: String,
    pub non_functional: String,
    pub other: String,
    pub stories: String,
    pub values: String,
    /// Edge from an actor to an object it takes part in
    pub participates: String,
    /// Edge from a story to its business value
    pub value: String,
}

impl Default for GraphLabels {
    fn default() -> Self {
        Self {
            actors: "Actores".to_string(),
            use_cases: "Casos de Uso".to_string(),
            functional: "Requisitos Funcionales".to_string(),
            non_functional: "Requisitos No Funcionales".to_string(),
            other: "Otros Requisitos".to_string(),
            stories: "Historias de Usuario".to_string(),
            values: "Valor de Negocio".to_string(),
            participates: "participa".to_string(),
            value: "valor".to_string(),
        }
    }
}

/// Options shared by the specification graph builders
#[derive(Debug, Clone, Default)]
pub struct SpecGraphOptions {
    pub layout: Layout,
    pub labels: GraphLabels,
}

const NON_FUNCTIONAL_FORMS: [&str; 6] = [
    "no funcional",
    "no_funcional",
    "no-funcional",
    "non-functional",
    "nonfunctional",
    "non functional",
];

/// Requirement bucket, decided by substring match on the `tipo` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementClass {
    Functional,
    NonFunctional,
    Other,
}

impl RequirementClass {
    pub const ALL: [RequirementClass; 3] = [
        RequirementClass::Functional,
        RequirementClass::NonFunctional,
        RequirementClass::Other,
    ];

    /// "No funcional" contains "funcional", so the negative forms are checked first
    pub fn classify(kind: &str) -> Self {
        let lower = kind.to_lowercase();
        if NON_FUNCTIONAL_FORMS.iter().any(|p| lower.contains(p)) {
            RequirementClass::NonFunctional
        } else if lower.contains("funcional") || lower.contains("functional") {
            RequirementClass::Functional
        } else {
            RequirementClass::Other
        }
    }

    pub fn id_prefix(self) -> &'static str {
        match self {
            RequirementClass::Functional => "RF",
            RequirementClass::NonFunctional => "RNF",
            RequirementClass::Other => "RO",
        }
    }

    fn subgraph_id(self) -> &'static str {
        match self {
            RequirementClass::Functional => "funcionales",
            RequirementClass::NonFunctional => "no_funcionales",
            RequirementClass::Other => "otros",
        }
    }

    fn title(self, labels: &GraphLabels) -> &str {
        match self {
            RequirementClass::Functional => &labels.functional,
            RequirementClass::NonFunctional => &labels.non_functional,
            RequirementClass::Other => &labels.other,
        }
    }
}

/// Compile a raw specification payload of the given kind
pub fn compile_spec(kind: SpecKind, payload: &Value, options: &SpecGraphOptions) -> String {
    let graph = match kind {
        SpecKind::UseCases => build_use_case_graph(&load_items::<UseCase>(payload), options),
        SpecKind::Requirements => {
            build_requirement_graph(&load_items::<Requirement>(payload), options)
        }
        SpecKind::UserStories => {
            build_user_story_graph(&load_items::<UserStory>(payload), options)
        }
    };
    graph.render()
}

pub fn compile_use_cases(items: &[UseCase], options: &SpecGraphOptions) -> String {
    build_use_case_graph(items, options).render()
}

pub fn compile_requirements(items: &[Requirement], options: &SpecGraphOptions) -> String {
    build_requirement_graph(items, options).render()
}

pub fn compile_user_stories(items: &[UserStory], options: &SpecGraphOptions) -> String {
    build_user_story_graph(items, options).render()
}

/// Actors, use cases, and actor → use case edges
pub fn build_use_case_graph(items: &[UseCase], options: &SpecGraphOptions) -> SpecGraph {
    let labels = &options.labels;
    let mut graph = SpecGraph::new(options.layout);
    let mut cases = DiagramSubgraph::new("casos_uso", labels.use_cases.as_str());
    let mut members = Vec::with_capacity(items.len());

    for (i, uc) in items.iter().enumerate() {
        let id = format!("CU{}", i + 1);
        cases
            .nodes
            .push(DiagramNode::with_priority(id.as_str(), &uc.name, uc.priority.as_deref()));
        members.push((id, split_actors(&uc.actors)));
    }

    let (actors, edges) = link_actors(&members, labels);
    graph.push_subgraph(actors);
    graph.push_subgraph(cases);
    graph.edges = edges;

    debug!(use_cases = items.len(), nodes = graph.node_count(), "Built use case graph");
    graph
}

/// Actors, requirements bucketed by class, and actor → requirement edges
pub fn build_requirement_graph(items: &[Requirement], options: &SpecGraphOptions) -> SpecGraph {
    let labels = &options.labels;
    let mut graph = SpecGraph::new(options.layout);
    let mut members = Vec::with_capacity(items.len());
    let mut buckets = Vec::with_capacity(RequirementClass::ALL.len());

    for class in RequirementClass::ALL {
        let mut sub = DiagramSubgraph::new(class.subgraph_id(), class.title(labels));
        let in_class = items
            .iter()
            .filter(|r| RequirementClass::classify(&r.kind) == class);

        for (i, req) in in_class.enumerate() {
            let id = format!("{}{}", class.id_prefix(), i + 1);
            sub.nodes.push(DiagramNode::with_priority(
                id.as_str(),
                req.label(),
                req.priority.as_deref(),
            ));
            members.push((id, split_actors(&req.actors)));
        }
        buckets.push(sub);
    }

    let (actors, edges) = link_actors(&members, labels);
    graph.push_subgraph(actors);
    for sub in buckets {
        graph.push_subgraph(sub);
    }
    graph.edges = edges;

    debug!(requirements = items.len(), nodes = graph.node_count(), "Built requirement graph");
    graph
}

/// Roles, stories, role → story edges, and story → value edges when any
/// story carries a business value
pub fn build_user_story_graph(items: &[UserStory], options: &SpecGraphOptions) -> SpecGraph {
    let labels = &options.labels;
    let mut graph = SpecGraph::new(options.layout);
    let mut stories = DiagramSubgraph::new("historias", labels.stories.as_str());
    let mut members = Vec::with_capacity(items.len());

    for (i, story) in items.iter().enumerate() {
        let id = format!("HU{}", i + 1);
        stories.nodes.push(DiagramNode::with_priority(
            id.as_str(),
            &story.title,
            story.priority.as_deref(),
        ));
        members.push((id, split_actors(&story.role)));
    }

    let (actors, mut edges) = link_actors(&members, labels);

    let mut values: Vec<f64> = items.iter().filter_map(|s| s.business_value).collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values.dedup();

    let mut value_nodes = DiagramSubgraph::new("valores", labels.values.as_str());
    for (i, value) in values.iter().enumerate() {
        value_nodes
            .nodes
            .push(DiagramNode::new(format!("V{}", i + 1), format_value(*value)));
    }

    for (i, story) in items.iter().enumerate() {
        let Some(value) = story.business_value else {
            continue;
        };
        if let Some(pos) = values.iter().position(|v| *v == value) {
            edges.push(DiagramEdge::new(
                format!("HU{}", i + 1),
                format!("V{}", pos + 1),
                labels.value.as_str(),
            ));
        }
    }

    graph.push_subgraph(actors);
    graph.push_subgraph(stories);
    graph.push_subgraph(value_nodes);
    graph.edges = edges;

    debug!(stories = items.len(), values = values.len(), "Built user story graph");
    graph
}

/// Distinct actors in first-seen order (`A1`, `A2`, ...) and one edge from each
/// actor to every member naming it
fn link_actors(
    members: &[(String, Vec<&str>)],
    labels: &GraphLabels,
) -> (DiagramSubgraph, Vec<DiagramEdge>) {
    let mut actors = DiagramSubgraph::new("actores", labels.actors.as_str());
    let mut seen: AHashSet<&str> = AHashSet::new();
    let mut order: Vec<(&str, String)> = Vec::new();

    for (_, names) in members {
        for &name in names {
            if seen.insert(name) {
                let id = format!("A{}", order.len() + 1);
                actors.nodes.push(DiagramNode::new(id.as_str(), name));
                order.push((name, id));
            }
        }
    }

    let mut edges = Vec::new();
    for (actor, actor_id) in &order {
        for (member_id, names) in members {
            if names.contains(actor) {
                edges.push(DiagramEdge::new(
                    actor_id.as_str(),
                    member_id.as_str(),
                    labels.participates.as_str(),
                ));
            }
        }
    }

    (actors, edges)
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

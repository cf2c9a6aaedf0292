//! Intermediate flowchart structures and their Mermaid rendering.

use crate::graph::format::{escape_label, Layout};
use std::fmt::Write;

/// One node of a specification graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramNode {
    /// Synthetic id such as `CU1` or `A2`
    pub id: String,
    pub label: String,
}

impl DiagramNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// Label of a domain object: its name, plus `[priority]` when present
    pub fn with_priority(id: impl Into<String>, name: &str, priority: Option<&str>) -> Self {
        let label = match priority.map(str::trim).filter(|p| !p.is_empty()) {
            Some(p) => format!("{} [{}]", name.trim(), p),
            None => name.trim().to_string(),
        };
        Self::new(id, label)
    }
}

/// Named group of nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramSubgraph {
    pub id: String,
    pub title: String,
    pub nodes: Vec<DiagramNode>,
}

impl DiagramSubgraph {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            nodes: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Labeled edge between two node ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramEdge {
    pub from: String,
    pub to: String,
    pub label: String,
}

impl DiagramEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            label: label.into(),
        }
    }
}

/// A complete specification graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecGraph {
    pub layout: Layout,
    pub subgraphs: Vec<DiagramSubgraph>,
    pub edges: Vec<DiagramEdge>,
}

impl SpecGraph {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            subgraphs: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Add a subgraph; empty ones are dropped
    pub fn push_subgraph(&mut self, subgraph: DiagramSubgraph) {
        if !subgraph.is_empty() {
            self.subgraphs.push(subgraph);
        }
    }

    pub fn node_count(&self) -> usize {
        self.subgraphs.iter().map(|s| s.nodes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    /// Render as Mermaid flowchart source. A graph without nodes renders as `""`.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let mut output = String::new();
        let _ = writeln!(output, "graph {}", self.layout.as_mermaid());

        for subgraph in &self.subgraphs {
            let _ = writeln!(
                output,
                "    subgraph {}[\"{}\"]",
                subgraph.id,
                escape_label(&subgraph.title)
            );
            for node in &subgraph.nodes {
                let _ = writeln!(output, "        {}[\"{}\"]", node.id, escape_label(&node.label));
            }
            output.push_str("    end\n");
        }

        for edge in &self.edges {
            let _ = writeln!(
                output,
                "    {} -->|{}| {}",
                edge.from,
                escape_edge_label(&edge.label),
                edge.to
            );
        }

        output
    }
}

/// Edge labels sit between pipes and cannot be quoted
fn escape_edge_label(s: &str) -> String {
    escape_label(s).replace('|', "#124;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_layout() {
        let mut graph = SpecGraph::new(Layout::LR);
        let mut sub = DiagramSubgraph::new("actores", "Actores");
        sub.nodes.push(DiagramNode::new("A1", "Cliente"));
        graph.push_subgraph(sub);
        graph.push_subgraph(DiagramSubgraph::new("vacio", "Vacío"));

        assert_eq!(
            graph.render(),
            "graph LR\n    subgraph actores[\"Actores\"]\n        A1[\"Cliente\"]\n    end\n"
        );
    }

    #[test]
    fn test_priority_label() {
        assert_eq!(
            DiagramNode::with_priority("CU1", "Comprar ", Some("Alta")).label,
            "Comprar [Alta]"
        );
        assert_eq!(
            DiagramNode::with_priority("CU1", "Comprar", Some("  ")).label,
            "Comprar"
        );
    }

    #[test]
    fn test_edge_label_escaping() {
        assert_eq!(escape_edge_label("a|b \"c\""), "a#124;b #quot;c#quot;");
    }

    #[test]
    fn test_empty_graph() {
        assert_eq!(SpecGraph::default().render(), "");
    }
}

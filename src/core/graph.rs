use petgraph::{
    graph::{EdgeIndex, NodeIndex},
    Directed, Graph,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use super::resolver::{basename, dirname, PathResolver};
use super::table::{strip_root, FileTable};
use crate::parsers::{script_extension, ImportScanner};

pub const MAX_NODES: usize = 200;
pub const MAX_EDGES: usize = 400;

/// Architectural role of a file, used for coloring
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Api,
    Component,
    Page,
    Utility,
    Hook,
    Server,
    Other,
}

impl Role {
    /// First matching rule wins. Directory segments are compared
    /// case-insensitively; the file name only matters for the page rule.
    pub fn classify(path: &str) -> Role {
        let dirs: Vec<String> = dirname(path)
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_ascii_lowercase)
            .collect();
        let has = |names: &[&str]| dirs.iter().any(|dir| names.contains(&dir.as_str()));

        if has(&["api"]) {
            Role::Api
        } else if has(&["components", "component"]) {
            Role::Component
        } else if has(&["pages", "app"]) || is_page_file(path) {
            Role::Page
        } else if has(&["lib", "utils"]) {
            Role::Utility
        } else if has(&["hooks"]) {
            Role::Hook
        } else if has(&["server"]) {
            Role::Server
        } else {
            Role::Other
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Api => "api",
            Role::Component => "component",
            Role::Page => "page",
            Role::Utility => "utility",
            Role::Hook => "hook",
            Role::Server => "server",
            Role::Other => "other",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `page.tsx`, `page.js`, ...
fn is_page_file(path: &str) -> bool {
    let name = basename(path);
    script_extension(name).is_some_and(|ext| {
        name.len() == "page.".len() + ext.len() && name[..4].eq_ignore_ascii_case("page")
    })
}

/// Basename with a known script extension stripped
pub fn label_for(path: &str) -> String {
    let name = basename(path);
    match script_extension(name) {
        Some(ext) => name[..name.len() - ext.len() - 1].to_string(),
        None => name.to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub full_path: String,
    pub role: Role,
    pub folder: String,
}

impl GraphNode {
    pub fn new(path: &str) -> Self {
        Self::with_role(path, Role::classify(path))
    }

    pub fn with_role(path: &str, role: Role) -> Self {
        let folder = match dirname(path) {
            "" => ".",
            dir => dir,
        };
        Self {
            id: path.to_string(),
            label: label_for(path),
            full_path: path.to_string(),
            role,
            folder: folder.to_string(),
        }
    }
}

/// "source imports target"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

impl GraphEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Counts before truncation
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphTotals {
    pub nodes: usize,
    pub edges: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphResult {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub total: GraphTotals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl GraphResult {
    pub fn with_warning(mut self, warning: Option<String>) -> Self {
        self.warning = warning;
        self
    }
}

/// Caps applied to the returned node and edge lists
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GraphLimits {
    pub max_nodes: usize,
    pub max_edges: usize,
}

impl Default for GraphLimits {
    fn default() -> Self {
        Self {
            max_nodes: MAX_NODES,
            max_edges: MAX_EDGES,
        }
    }
}

pub type ImportGraph = Graph<GraphNode, GraphEdge, Directed>;

/// Accumulates nodes (deduplicated by path key) and edges (not deduplicated)
/// in construction order.
pub struct GraphBuilder {
    graph: ImportGraph,
    node_map: HashMap<String, NodeIndex>,
    limits: GraphLimits,
    root: Option<String>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::with_limits(GraphLimits::default())
    }

    pub fn with_limits(limits: GraphLimits) -> Self {
        Self {
            graph: Graph::new(),
            node_map: HashMap::new(),
            limits,
            root: None,
        }
    }

    /// Keys start with `root/`; roles are classified without it
    pub fn with_root(mut self, root: Option<&str>) -> Self {
        self.root = root.map(str::to_string);
        self
    }

    /// Build the import graph of every file in `table`
    pub fn from_table(table: &FileTable, limits: GraphLimits) -> GraphResult {
        let mut builder = Self::with_limits(limits).with_root(table.root());
        let resolver = PathResolver::new(table);
        let scanner = ImportScanner::new();

        for file in table.iter() {
            let source = builder.add_node(&file.path);
            for specifier in scanner.scan(&file.content) {
                match resolver.resolve(specifier, &file.path) {
                    Some(target_key) => {
                        let target = builder.add_node(&target_key);
                        builder.add_edge(source, target);
                    }
                    None => debug!(importer = %file.path, specifier, "unresolved import"),
                }
            }
        }

        builder.build()
    }

    /// Returns the existing index when `path` was already added
    pub fn add_node(&mut self, path: &str) -> NodeIndex {
        if let Some(&index) = self.node_map.get(path) {
            return index;
        }
        let role = Role::classify(strip_root(path, self.root.as_deref()));
        let index = self.graph.add_node(GraphNode::with_role(path, role));
        self.node_map.insert(path.to_string(), index);
        index
    }

    pub fn add_edge(&mut self, source: NodeIndex, target: NodeIndex) -> EdgeIndex {
        let edge = GraphEdge::new(
            self.graph[source].id.clone(),
            self.graph[target].id.clone(),
        );
        self.graph.add_edge(source, target, edge)
    }

    pub fn get_node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    pub fn graph(&self) -> &ImportGraph {
        &self.graph
    }

    /// Truncate to the configured limits, keeping the first entries in
    /// construction order
    pub fn build(self) -> GraphResult {
        let total = GraphTotals {
            nodes: self.graph.node_count(),
            edges: self.graph.edge_count(),
        };

        let nodes = self
            .graph
            .node_weights()
            .take(self.limits.max_nodes)
            .cloned()
            .collect();
        let edges = self
            .graph
            .edge_weights()
            .take(self.limits.max_edges)
            .cloned()
            .collect();

        GraphResult {
            nodes,
            edges,
            total,
            warning: None,
        }
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_strip_script_extensions_only() {
        assert_eq!(label_for("src/app/page.tsx"), "page");
        assert_eq!(label_for("src/lib/db.server.ts"), "db.server");
        assert_eq!(label_for("src/styles/app.css"), "app.css");
    }

    #[test]
    fn folder_of_root_file_is_dot() {
        assert_eq!(GraphNode::new("middleware.ts").folder, ".");
        assert_eq!(GraphNode::new("src/middleware.ts").folder, "src");
    }

    #[test]
    fn page_file_convention() {
        assert!(is_page_file("src/routes/page.tsx"));
        assert!(is_page_file("Page.js"));
        assert!(!is_page_file("src/routes/pages.tsx"));
        assert!(!is_page_file("src/routes/page-simple.tsx"));
    }
}

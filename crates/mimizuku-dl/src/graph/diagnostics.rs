//! グラフの整合性検査とダンプ

use super::{CompletionGraph, NodeId};
use crate::ReasonerError;
use std::collections::BTreeSet;
use std::fmt::Write;

impl CompletionGraph {
    /// Check the structural invariants of the graph
    pub fn validate(&self) -> Result<(), ReasonerError> {
        let violation = |msg: String| Err(ReasonerError::InvariantViolation(msg));
        let tables = self.tables();
        let node_count = tables.nodes.len();
        let branch_count = tables.branches.len() as i32;

        let mut nodes_before = 0;
        for (index, branch) in tables.branches.iter().enumerate() {
            if branch.index as usize != index {
                return violation(format!("branch {} stored at position {}", branch.index, index));
            }
            if branch.node_count() < nodes_before || branch.node_count() > node_count {
                return violation(format!(
                    "branch {} opened with {} nodes, graph has {}",
                    index,
                    branch.node_count(),
                    node_count
                ));
            }
            nodes_before = branch.node_count();
        }
        if self.branch >= branch_count.max(1) {
            return violation(format!(
                "current branch {} beyond a stack of {}",
                self.branch, branch_count
            ));
        }

        for (name, id) in &tables.names {
            if id.index() >= node_count || tables.nodes[id.index()].name != *name {
                return violation(format!("name {} does not resolve to its node", name));
            }
        }

        for (index, node) in tables.nodes.iter().enumerate() {
            if node.id.index() != index {
                return violation(format!("node {} stored at position {}", node.id, index));
            }

            for (concept, ds) in node.types() {
                if ds.max() >= branch_count.max(1) {
                    return violation(format!(
                        "{} on {} depends on missing branch {}",
                        concept,
                        node.id,
                        ds.max()
                    ));
                }
            }

            if let Some(out) = node.out_edges() {
                for edge in out.iter() {
                    if edge.from != node.id || edge.to.index() >= node_count {
                        return violation(format!("dangling edge {} -{}-> {}", edge.from, edge.role, edge.to));
                    }
                    if edge.role.inverse {
                        return violation(format!("edge {} -{}-> {} stored backwards", edge.from, edge.role, edge.to));
                    }
                    if tables.nodes[edge.to.index()]
                        .in_edges()
                        .find(edge.from, &edge.role, edge.to)
                        .is_none()
                    {
                        return violation(format!(
                            "edge {} -{}-> {} missing from the in-edges of its target",
                            edge.from, edge.role, edge.to
                        ));
                    }
                }
            }

            for edge in node.in_edges().iter() {
                let source = match tables.nodes.get(edge.from.index()) {
                    Some(source) if edge.to == node.id => source,
                    _ => {
                        return violation(format!("dangling edge {} -{}-> {}", edge.from, edge.role, edge.to))
                    }
                };
                if source
                    .out_edges()
                    .and_then(|out| out.find(edge.from, &edge.role, edge.to))
                    .is_none()
                {
                    return violation(format!(
                        "edge {} -{}-> {} missing from the out-edges of its source",
                        edge.from, edge.role, edge.to
                    ));
                }
            }

            for other in node.differences().keys() {
                if other.index() >= node_count {
                    return violation(format!("{} is different from missing node {}", node.id, other));
                }
            }

            let mut seen = BTreeSet::new();
            let mut current = node.id;
            while let Some((target, _)) = tables.nodes[current.index()].merged_to() {
                if !seen.insert(current) || target.index() >= node_count {
                    return violation(format!("broken merge chain from {}", node.id));
                }
                current = *target;
            }
        }

        Ok(())
    }

    /// Human-readable dump of every node, its label and its edges
    pub fn print_tree(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "completion graph: {} nodes, branch {}/{}",
            self.node_count(),
            self.branch(),
            self.branch_count()
        );

        for node in self.nodes() {
            let _ = write!(out, "{} {}", node.id, node.name);
            if let Some((target, ds)) = node.merged_to() {
                let _ = writeln!(out, " => {} {}", target, ds);
                continue;
            }
            if let Some(parent) = node.parent() {
                let _ = write!(out, " (parent {})", parent);
            }
            let _ = writeln!(out);

            for (concept, ds) in node.types() {
                let _ = writeln!(out, "    : {} {}", concept, ds);
            }
            if let Some(edges) = node.out_edges() {
                for edge in edges.iter() {
                    let _ = writeln!(out, "    -{}-> {} {}", edge.role, edge.to, edge.depends);
                }
            }
            let different: Vec<String> = node.differences().keys().map(NodeId::to_string).collect();
            if !different.is_empty() {
                let _ = writeln!(out, "    != {}", different.join(", "));
            }
        }

        if let Some(clash) = self.clash() {
            let _ = writeln!(out, "clash: {}", clash);
        }
        out
    }
}

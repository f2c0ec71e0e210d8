//! Variable hierarchy as a trie over delimiter-split segments.

use std::collections::BTreeMap;

use ia_store::RecordStore;

use crate::{HierarchyError, HierarchyResult};

pub const DEFAULT_DELIMITER: &str = "|";

pub fn validate_delimiter(delimiter: &str) -> HierarchyResult<()> {
    if delimiter.is_empty() {
        return Err(HierarchyError::EmptyDelimiter);
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
struct TreeNode {
    children: BTreeMap<String, TreeNode>,
    /// The variable ending at this node exists in the data.
    present: bool,
}

/// Trie of variable names.
///
/// `"Primary Energy|Coal"` is stored as the path
/// `["Primary Energy", "Coal"]`. Intermediate nodes exist even when the
/// variable they spell is absent from the data; lookups that return
/// variables only report present ones.
#[derive(Debug, Clone)]
pub struct VariableTree {
    root: TreeNode,
    delimiter: String,
    len: usize,
}

impl Default for VariableTree {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl VariableTree {
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            root: TreeNode::default(),
            delimiter: delimiter.into(),
            len: 0,
        }
    }

    pub fn from_variables<'a>(variables: impl IntoIterator<Item = &'a str>, delimiter: &str) -> Self {
        let mut tree = Self::new(delimiter);
        for variable in variables {
            tree.insert(variable);
        }
        tree
    }

    pub fn from_store(store: &RecordStore, delimiter: &str) -> Self {
        Self::from_variables(store.variables(), delimiter)
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Number of present variables.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, variable: &str) {
        let mut node = &mut self.root;
        for segment in variable.split(self.delimiter.as_str()) {
            node = node.children.entry(segment.to_string()).or_default();
        }
        if !node.present {
            node.present = true;
            self.len += 1;
        }
    }

    fn node(&self, variable: &str) -> Option<&TreeNode> {
        let mut node = &self.root;
        for segment in variable.split(self.delimiter.as_str()) {
            node = node.children.get(segment)?;
        }
        Some(node)
    }

    pub fn contains(&self, variable: &str) -> bool {
        self.node(variable).is_some_and(|n| n.present)
    }

    fn join(&self, parent: &str, segment: &str) -> String {
        format!("{parent}{}{segment}", self.delimiter)
    }

    /// Present variables exactly one level below `variable`.
    pub fn children(&self, variable: &str) -> Vec<String> {
        let Some(node) = self.node(variable) else {
            return Vec::new();
        };
        node.children
            .iter()
            .filter(|(_, child)| child.present)
            .map(|(segment, _)| self.join(variable, segment))
            .collect()
    }

    /// Present variables at any depth below `variable`, in sorted order.
    pub fn descendants(&self, variable: &str) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(node) = self.node(variable) {
            self.collect(node, variable, &mut out);
        }
        out.sort();
        out
    }

    fn collect(&self, node: &TreeNode, prefix: &str, out: &mut Vec<String>) {
        for (segment, child) in &node.children {
            let name = self.join(prefix, segment);
            if child.present {
                out.push(name.clone());
            }
            self.collect(child, &name, out);
        }
    }

    /// Number of delimiters in the name (top-level variables have depth 0).
    pub fn depth(&self, variable: &str) -> usize {
        variable.matches(self.delimiter.as_str()).count()
    }

    pub fn parent<'v>(&self, variable: &'v str) -> Option<&'v str> {
        variable
            .rfind(self.delimiter.as_str())
            .map(|pos| &variable[..pos])
    }

    /// Deepest depth among present variables.
    pub fn max_depth(&self) -> Option<usize> {
        self.variables().iter().map(|v| self.depth(v)).max()
    }

    /// Every present variable, sorted.
    pub fn variables(&self) -> Vec<String> {
        let mut out = Vec::new();
        for (segment, child) in &self.root.children {
            if child.present {
                out.push(segment.clone());
            }
            self.collect(child, segment, &mut out);
        }
        out.sort();
        out
    }

    pub fn variables_at_depth(&self, depth: usize) -> Vec<String> {
        self.variables()
            .into_iter()
            .filter(|v| self.depth(v) == depth)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn energy_tree() -> VariableTree {
        VariableTree::from_variables(
            [
                "Primary Energy",
                "Primary Energy|Coal",
                "Primary Energy|Wind",
                "Primary Energy|Wind|Offshore",
                "Emissions|CO2|Energy",
            ],
            "|",
        )
    }

    #[test]
    fn children_are_direct_and_present() {
        let tree = energy_tree();
        assert_eq!(
            tree.children("Primary Energy"),
            vec!["Primary Energy|Coal", "Primary Energy|Wind"]
        );
        // `Emissions|CO2` is absent, so it is not a component of `Emissions`
        assert!(tree.children("Emissions").is_empty());
        assert_eq!(tree.children("Emissions|CO2"), vec!["Emissions|CO2|Energy"]);
        assert!(tree.children("Population").is_empty());
    }

    #[test]
    fn descendants_cover_all_depths() {
        let tree = energy_tree();
        assert_eq!(
            tree.descendants("Primary Energy"),
            vec![
                "Primary Energy|Coal",
                "Primary Energy|Wind",
                "Primary Energy|Wind|Offshore"
            ]
        );
    }

    #[test]
    fn depth_and_parent() {
        let tree = energy_tree();
        assert_eq!(tree.depth("Primary Energy"), 0);
        assert_eq!(tree.depth("Primary Energy|Wind|Offshore"), 2);
        assert_eq!(tree.parent("Primary Energy|Wind|Offshore"), Some("Primary Energy|Wind"));
        assert_eq!(tree.parent("Primary Energy"), None);
        assert_eq!(tree.max_depth(), Some(2));
        assert_eq!(tree.len(), 5);
        assert!(!tree.contains("Emissions"));
        assert_eq!(
            tree.variables_at_depth(2),
            vec!["Emissions|CO2|Energy", "Primary Energy|Wind|Offshore"]
        );
    }

    #[test]
    fn custom_delimiter() {
        let tree = VariableTree::from_variables(["a::b", "a::c", "a"], "::");
        assert_eq!(tree.children("a"), vec!["a::b", "a::c"]);
        assert_eq!(tree.parent("a::b"), Some("a"));
    }
}

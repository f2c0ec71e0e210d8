//! Component resolution for a parent variable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tree::VariableTree;
use crate::{HierarchyError, HierarchyResult};

/// Caller-supplied components as they arrive from configuration.
///
/// Only the flat list form is valid; the mapping form is accepted by the
/// parser so that it can be rejected with a clear message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComponentsArg {
    List(Vec<String>),
    Mapping(BTreeMap<String, String>),
}

impl ComponentsArg {
    pub fn list<S: Into<String>>(items: impl IntoIterator<Item = S>) -> Self {
        ComponentsArg::List(items.into_iter().map(Into::into).collect())
    }

    pub fn as_list(&self) -> HierarchyResult<&[String]> {
        match self {
            ComponentsArg::List(items) => Ok(items),
            ComponentsArg::Mapping(map) => Err(HierarchyError::ComponentsNotList {
                found: format!("{map:?}"),
            }),
        }
    }
}

impl From<Vec<String>> for ComponentsArg {
    fn from(items: Vec<String>) -> Self {
        ComponentsArg::List(items)
    }
}

/// Components of `variable`: the explicit list verbatim when given,
/// otherwise the present direct children in `tree`.
pub fn components_of(
    tree: &VariableTree,
    variable: &str,
    explicit: Option<&ComponentsArg>,
) -> HierarchyResult<Vec<String>> {
    match explicit {
        Some(arg) => Ok(arg.as_list()?.to_vec()),
        None => Ok(tree.children(variable)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> VariableTree {
        VariableTree::from_variables(
            ["Primary Energy", "Primary Energy|Coal", "foo"],
            "|",
        )
    }

    #[test]
    fn explicit_list_is_verbatim() {
        let arg = ComponentsArg::list(["Primary Energy|Coal", "foo"]);
        let comps = components_of(&tree(), "Primary Energy", Some(&arg)).unwrap();
        assert_eq!(comps, vec!["Primary Energy|Coal", "foo"]);
    }

    #[test]
    fn mapping_is_a_usage_error() {
        let arg = ComponentsArg::Mapping(BTreeMap::from([(
            "Primary Energy|Coal".to_string(),
            "foo".to_string(),
        )]));
        let err = components_of(&tree(), "Primary Energy", Some(&arg)).unwrap_err();
        assert!(err.to_string().starts_with("Value for `components` must be a list"));
    }

    #[test]
    fn inferred_from_tree() {
        let comps = components_of(&tree(), "Primary Energy", None).unwrap();
        assert_eq!(comps, vec!["Primary Energy|Coal"]);
        assert!(components_of(&tree(), "foo", None).unwrap().is_empty());
    }

    #[test]
    fn untagged_parsing_keeps_both_shapes() {
        let list: ComponentsArg = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(list, ComponentsArg::list(["a", "b"]));
        let map: ComponentsArg = serde_json::from_str(r#"{"a": "b"}"#).unwrap();
        assert!(matches!(map, ComponentsArg::Mapping(_)));
    }
}

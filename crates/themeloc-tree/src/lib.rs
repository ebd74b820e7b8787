use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use themeloc_domain::ChangeSet;

/// A locale document. The leaf/branch distinction is structural from the
/// moment the document is parsed; nothing downstream inspects runtime
/// shapes. Arrays are leaves at this layer; per-element paths would make
/// numeric segments ambiguous with object keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Branch(IndexMap<String, Node>),
    Leaf(Value),
}

impl Node {
    pub fn empty() -> Self {
        Node::Branch(IndexMap::new())
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, Node::Branch(_))
    }

    pub fn as_leaf(&self) -> Option<&Value> {
        match self {
            Node::Leaf(v) => Some(v),
            Node::Branch(_) => None,
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Node::empty()
    }
}

/// Address of a leaf or subtree inside a tree. Serialized dot-joined;
/// `from_dotted` and `Display` round-trip exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    pub fn root() -> Self {
        KeyPath(Vec::new())
    }

    pub fn from_dotted(dotted: &str) -> Self {
        KeyPath(dotted.split('.').map(str::to_string).collect())
    }

    pub fn child(&self, segment: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.to_string());
        KeyPath(segments)
    }

    pub fn join(&self, other: &KeyPath) -> Self {
        let mut segments = self.0.clone();
        segments.extend(other.0.iter().cloned());
        KeyPath(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Flattens a tree into a path → leaf-value mapping.
pub fn flatten(tree: &Node) -> BTreeMap<KeyPath, Value> {
    let mut flat = BTreeMap::new();
    flatten_into(tree, &KeyPath::root(), &mut flat);
    flat
}

fn flatten_into(node: &Node, prefix: &KeyPath, out: &mut BTreeMap<KeyPath, Value>) {
    match node {
        Node::Leaf(value) => {
            out.insert(prefix.clone(), value.clone());
        }
        Node::Branch(map) => {
            for (key, child) in map {
                flatten_into(child, &prefix.child(key), out);
            }
        }
    }
}

/// Inverse of `flatten`. Insertion-order independent: the same mapping
/// yields a structurally identical tree no matter how it was assembled.
pub fn unflatten(flat: &BTreeMap<KeyPath, Value>) -> Node {
    let mut root = Node::empty();
    for (path, value) in flat {
        set_leaf(&mut root, path, value.clone());
    }
    root
}

/// Returns a copy with every level's keys in raw code-point order.
/// Idempotent; leaves are untouched.
pub fn sort_keys(tree: &Node) -> Node {
    match tree {
        Node::Leaf(value) => Node::Leaf(value.clone()),
        Node::Branch(map) => {
            let mut entries: Vec<(&String, &Node)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Node::Branch(
                entries
                    .into_iter()
                    .map(|(key, child)| (key.clone(), sort_keys(child)))
                    .collect(),
            )
        }
    }
}

/// Resolves `path` to the node it addresses, if any.
pub fn node_at<'a>(tree: &'a Node, path: &KeyPath) -> Option<&'a Node> {
    let mut cur = tree;
    for segment in path.segments() {
        match cur {
            Node::Branch(map) => cur = map.get(segment)?,
            Node::Leaf(_) => return None,
        }
    }
    Some(cur)
}

/// Resolves `path` to a leaf value; `None` if absent or a subtree.
pub fn leaf_at<'a>(tree: &'a Node, path: &KeyPath) -> Option<&'a Value> {
    node_at(tree, path).and_then(Node::as_leaf)
}

fn as_branch_mut(node: &mut Node) -> &mut IndexMap<String, Node> {
    if !node.is_branch() {
        *node = Node::empty();
    }
    match node {
        Node::Branch(map) => map,
        Node::Leaf(_) => unreachable!("node was just normalized to a branch"),
    }
}

/// Sets a leaf at `path`, creating intermediate branches as needed. A
/// non-branch intermediate is replaced by a branch: on shape conflicts
/// the authoritative side wins.
pub fn set_leaf(tree: &mut Node, path: &KeyPath, value: Value) {
    let Some((last, parents)) = path.segments().split_last() else {
        *tree = Node::Leaf(value);
        return;
    };
    let mut cur = tree;
    for segment in parents {
        cur = as_branch_mut(cur)
            .entry(segment.clone())
            .or_insert_with(Node::empty);
    }
    as_branch_mut(cur).insert(last.clone(), Node::Leaf(value));
}

/// Removes the node at `path`, a leaf or a whole subtree. Returns
/// whether anything was removed. Parents emptied by the removal are left
/// in place.
pub fn remove_path(tree: &mut Node, path: &KeyPath) -> bool {
    let Some((last, parents)) = path.segments().split_last() else {
        return false;
    };
    let mut cur = tree;
    for segment in parents {
        match cur {
            Node::Branch(map) => match map.get_mut(segment) {
                Some(next) => cur = next,
                None => return false,
            },
            Node::Leaf(_) => return false,
        }
    }
    match cur {
        Node::Branch(map) => map.shift_remove(last).is_some(),
        Node::Leaf(_) => false,
    }
}

/// Compares the previous snapshot against the current authoritative tree
/// and classifies every differing path. Recursive co-traversal with an
/// explicit accumulator; single pass over the union of both trees.
pub fn diff(previous: &Node, current: &Node) -> ChangeSet {
    let mut changes = ChangeSet::default();
    diff_into(previous, current, &KeyPath::root(), &mut changes);
    changes.added.sort();
    changes.removed.sort();
    changes.changed.sort();
    changes
}

fn diff_into(previous: &Node, current: &Node, prefix: &KeyPath, out: &mut ChangeSet) {
    let (Node::Branch(prev), Node::Branch(cur)) = (previous, current) else {
        return;
    };
    for (key, prev_child) in prev {
        let path = prefix.child(key);
        match cur.get(key) {
            // The parent path alone marks a removed subtree; the sync
            // delete step takes the whole subtree down from it.
            None => out.removed.push(path.to_string()),
            Some(cur_child) => match (prev_child, cur_child) {
                (Node::Branch(_), Node::Branch(_)) => {
                    diff_into(prev_child, cur_child, &path, out)
                }
                (Node::Leaf(a), Node::Leaf(b)) => {
                    if a != b {
                        out.changed.push(path.to_string());
                    }
                }
                // Leaf/subtree flip collapses to a single change at this
                // level; no recursion below the flip.
                _ => out.changed.push(path.to_string()),
            },
        }
    }
    for (key, cur_child) in cur {
        if !prev.contains_key(key) {
            added_leaves(cur_child, &prefix.child(key), out);
        }
    }
}

// Added subtrees list every descendant leaf, since each leaf needs its
// own translation decision.
fn added_leaves(node: &Node, path: &KeyPath, out: &mut ChangeSet) {
    match node {
        Node::Leaf(_) => out.added.push(path.to_string()),
        Node::Branch(map) => {
            for (key, child) in map {
                added_leaves(child, &path.child(key), out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(value: Value) -> Node {
        serde_json::from_value(value).expect("valid tree")
    }

    #[test]
    fn keypath_round_trips_through_join_and_split() {
        let path = KeyPath::from_dotted("general.cart.empty");
        assert_eq!(path.segments().len(), 3);
        assert_eq!(path.to_string(), "general.cart.empty");
        assert_eq!(KeyPath::from_dotted(&path.to_string()), path);
    }

    #[test]
    fn flatten_then_unflatten_is_identity_for_array_free_trees() {
        let t = tree(json!({
            "b": {"inner": "2", "deep": {"x": "3"}},
            "a": "1",
            "n": 7,
            "flag": true
        }));
        assert_eq!(unflatten(&flatten(&t)), t);
        // The same law holds on normalized serialized form.
        assert_eq!(
            serde_json::to_string(&sort_keys(&unflatten(&flatten(&t)))).unwrap(),
            serde_json::to_string(&sort_keys(&t)).unwrap()
        );
    }

    #[test]
    fn flatten_treats_arrays_as_leaves() {
        let t = tree(json!({"list": ["a", "b"], "k": "v"}));
        let flat = flatten(&t);
        assert_eq!(flat.len(), 2);
        assert_eq!(flat.get(&KeyPath::from_dotted("list")), Some(&json!(["a", "b"])));
    }

    #[test]
    fn sort_keys_orders_every_level_and_is_idempotent() {
        let t = tree(json!({"b": {"z": "1", "a": "2"}, "a": "3"}));
        let sorted = sort_keys(&t);
        assert_eq!(
            serde_json::to_string(&sorted).unwrap(),
            r#"{"a":"3","b":{"a":"2","z":"1"}}"#
        );
        assert_eq!(
            serde_json::to_string(&sort_keys(&sorted)).unwrap(),
            serde_json::to_string(&sorted).unwrap()
        );
    }

    #[test]
    fn unflatten_is_insertion_order_independent() {
        let mut forward = BTreeMap::new();
        forward.insert(KeyPath::from_dotted("a.b"), json!("1"));
        forward.insert(KeyPath::from_dotted("a.c"), json!("2"));
        let mut reverse = BTreeMap::new();
        reverse.insert(KeyPath::from_dotted("a.c"), json!("2"));
        reverse.insert(KeyPath::from_dotted("a.b"), json!("1"));
        assert_eq!(unflatten(&forward), unflatten(&reverse));
    }

    #[test]
    fn set_leaf_replaces_conflicting_shapes() {
        let mut t = tree(json!({"a": "leaf"}));
        set_leaf(&mut t, &KeyPath::from_dotted("a.b"), json!("1"));
        assert_eq!(t, tree(json!({"a": {"b": "1"}})));

        let mut t = tree(json!({"a": {"b": "1"}}));
        set_leaf(&mut t, &KeyPath::from_dotted("a"), json!("leaf"));
        assert_eq!(t, tree(json!({"a": "leaf"})));
    }

    #[test]
    fn remove_path_takes_whole_subtrees() {
        let mut t = tree(json!({"a": {"x": "1", "y": "2"}, "b": "3"}));
        assert!(remove_path(&mut t, &KeyPath::from_dotted("a")));
        assert_eq!(t, tree(json!({"b": "3"})));
        assert!(!remove_path(&mut t, &KeyPath::from_dotted("a")));
    }

    #[test]
    fn diff_classifies_added_removed_and_changed() {
        let previous = tree(json!({"a": "1", "b": {"c": "2"}}));
        let current = tree(json!({"a": "1", "b": {"c": "3"}, "d": "4"}));
        let changes = diff(&previous, &current);
        assert_eq!(changes.added, vec!["d"]);
        assert!(changes.removed.is_empty());
        assert_eq!(changes.changed, vec!["b.c"]);
    }

    #[test]
    fn removed_subtree_collapses_to_parent_path() {
        let previous = tree(json!({"a": {"x": "1", "y": "2"}}));
        let current = tree(json!({}));
        let changes = diff(&previous, &current);
        assert_eq!(changes.removed, vec!["a"]);
        assert!(changes.added.is_empty());
        assert!(changes.changed.is_empty());
    }

    #[test]
    fn added_subtree_enumerates_descendant_leaves() {
        let previous = tree(json!({}));
        let current = tree(json!({"a": {"x": "1", "deep": {"y": "2"}}}));
        let changes = diff(&previous, &current);
        assert_eq!(changes.added, vec!["a.deep.y", "a.x"]);
    }

    #[test]
    fn leaf_to_subtree_flip_is_one_change_at_the_flip_level() {
        let previous = tree(json!({"a": "1"}));
        let current = tree(json!({"a": {"b": "2"}}));
        let changes = diff(&previous, &current);
        assert_eq!(changes.changed, vec!["a"]);
        assert!(changes.added.is_empty());
        assert!(changes.removed.is_empty());
    }
}

// src/section/tree.rs

//! Tree addressing inside a record
//!
//! A [`RefPath`] names exactly one node of a record. Its text form is an
//! RFC 6901 JSON pointer (`/scripts/3/data`), which is the contract between
//! extraction on export and re-inlining on import.
//!
//! [`find_owner`] walks a path upward until it meets an object carrying an
//! identity attribute, which is how extracted files get meaningful names and
//! how facets find the object they belong to.

use serde_json::{Map, Value};

/// Identity attributes considered on export
pub const OUTBOUND_IDENTITY: &[&str] = &["code", "name", "label"];

/// Identity attributes considered on import; `resource` also counts
pub const INBOUND_IDENTITY: &[&str] = &["code", "name", "label", "resource"];

/// One step into a record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key(k) => write!(f, "{}", k),
            Self::Index(i) => write!(f, "{}", i),
        }
    }
}

/// Address of one node inside a record tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RefPath {
    segments: Vec<Segment>,
}

impl RefPath {
    /// The record root
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn push_key(&mut self, key: impl Into<String>) {
        self.segments.push(Segment::Key(key.into()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.segments.push(Segment::Index(index));
    }

    pub fn pop(&mut self) -> Option<Segment> {
        self.segments.pop()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    pub fn child_key(&self, key: impl Into<String>) -> Self {
        let mut child = self.clone();
        child.push_key(key);
        child
    }

    pub fn child_index(&self, index: usize) -> Self {
        let mut child = self.clone();
        child.push_index(index);
        child
    }

    /// Path of the parent node; the root is its own parent
    pub fn parent(&self) -> Self {
        let mut parent = self.clone();
        parent.pop();
        parent
    }

    /// Same path with the final segment replaced by a key
    pub fn with_last_key(&self, key: &str) -> Self {
        self.parent().child_key(key)
    }

    /// Prefix every segment of `other` with this path
    pub fn join(&self, other: &RefPath) -> Self {
        let mut joined = self.clone();
        joined.segments.extend(other.segments.iter().cloned());
        joined
    }

    /// Dotted form used in generated names (`scripts.0.script`)
    pub fn dotted(&self) -> String {
        self.segments
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// JSON pointer text form
    pub fn to_pointer(&self) -> String {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Key(k) => format!("/{}", k.replace('~', "~0").replace('/', "~1")),
                Segment::Index(i) => format!("/{}", i),
            })
            .collect()
    }

    /// Parse a JSON pointer; all-digit tokens become indices
    pub fn parse(pointer: &str) -> Option<Self> {
        if pointer.is_empty() {
            return Some(Self::root());
        }
        let rest = pointer.strip_prefix('/')?;
        let segments = rest
            .split('/')
            .map(|token| {
                let token = token.replace("~1", "/").replace("~0", "~");
                match token.parse::<usize>() {
                    Ok(i) if !token.starts_with('+') => Segment::Index(i),
                    _ => Segment::Key(token),
                }
            })
            .collect();
        Some(Self { segments })
    }

    /// Borrow the addressed node
    pub fn get<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut node = root;
        for segment in &self.segments {
            node = match (segment, node) {
                (Segment::Key(k), Value::Object(map)) => map.get(k)?,
                (Segment::Index(i), Value::Array(items)) => items.get(*i)?,
                (Segment::Index(i), Value::Object(map)) => map.get(&i.to_string())?,
                _ => return None,
            };
        }
        Some(node)
    }

    /// Mutably borrow the addressed node
    pub fn get_mut<'a>(&self, root: &'a mut Value) -> Option<&'a mut Value> {
        let mut node = root;
        for segment in &self.segments {
            node = match (segment, node) {
                (Segment::Key(k), Value::Object(map)) => map.get_mut(k)?,
                (Segment::Index(i), Value::Array(items)) => items.get_mut(*i)?,
                (Segment::Index(i), Value::Object(map)) => map.get_mut(&i.to_string())?,
                _ => return None,
            };
        }
        Some(node)
    }

    /// Store a value at this path
    ///
    /// The parent must already exist. A missing final key on an object is
    /// inserted. Returns `false` when the path cannot be reached.
    pub fn set(&self, root: &mut Value, value: Value) -> bool {
        let Some(last) = self.last() else {
            *root = value;
            return true;
        };
        match (last, self.parent().get_mut(root)) {
            (Segment::Key(k), Some(Value::Object(map))) => {
                map.insert(k.clone(), value);
                true
            }
            (Segment::Index(i), Some(Value::Array(items))) if *i < items.len() => {
                items[*i] = value;
                true
            }
            (Segment::Index(i), Some(Value::Object(map))) => {
                map.insert(i.to_string(), value);
                true
            }
            _ => false,
        }
    }
}

impl std::fmt::Display for RefPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "/")
        } else {
            write!(f, "{}", self.to_pointer())
        }
    }
}

/// Every node named `name` below `root`, in document order
///
/// Matches nested inside other matches are reported too.
pub fn find_nodes<'a>(root: &'a Value, name: &str) -> Vec<(RefPath, &'a Value)> {
    let mut found = Vec::new();
    let mut path = RefPath::root();
    collect(root, name, &mut path, &mut found);
    found
}

fn collect<'a>(
    node: &'a Value,
    name: &str,
    path: &mut RefPath,
    found: &mut Vec<(RefPath, &'a Value)>,
) {
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                path.push_key(key.as_str());
                if key == name {
                    found.push((path.clone(), child));
                }
                collect(child, name, path, found);
                path.pop();
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                path.push_index(i);
                collect(child, name, path, found);
                path.pop();
            }
        }
        _ => {}
    }
}

/// First node named `name` below `root` whose value is an array
pub fn first_array<'a>(root: &'a Value, name: &str) -> Option<(RefPath, &'a Vec<Value>)> {
    find_nodes(root, name)
        .into_iter()
        .find_map(|(path, value)| value.as_array().map(|items| (path, items)))
}

/// Result of an upward identity search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ancestor {
    /// An identity-bearing object was found
    Found(Owner),
    /// The search reached the root without finding one
    NotFound,
}

impl Ancestor {
    pub fn found(self) -> Option<Owner> {
        match self {
            Self::Found(owner) => Some(owner),
            Self::NotFound => None,
        }
    }
}

/// Location of an identity-bearing ancestor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    /// Path of the ancestor object itself
    pub path: RefPath,
    /// The search path at the moment the ancestor matched; its parent is `path`
    pub trail: RefPath,
}

/// Walk upward from `path` until a parent carries one of `identity_keys`
pub fn find_owner(root: &Value, path: &RefPath, identity_keys: &[&str]) -> Ancestor {
    let mut trail = path.clone();
    while !trail.is_empty() {
        let parent_path = trail.parent();
        match parent_path.get(root) {
            Some(parent) if has_identity(parent, identity_keys) => {
                return Ancestor::Found(Owner {
                    path: parent_path,
                    trail,
                });
            }
            Some(_) => {
                trail.pop();
            }
            None => return Ancestor::NotFound,
        }
    }
    Ancestor::NotFound
}

/// Whether an object carries a truthy value for any of `keys`
pub fn has_identity(node: &Value, keys: &[&str]) -> bool {
    identity_of(node, keys).is_some()
}

/// First truthy identity attribute of an object, rendered as text
pub fn identity_of(node: &Value, keys: &[&str]) -> Option<String> {
    let map = node.as_object()?;
    keys.iter()
        .filter_map(|k| map.get(*k))
        .find(|v| is_truthy(v))
        .map(render_scalar)
}

/// Truthiness of a JSON value as the export platform sees it
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text of a scalar value; strings are not quoted
pub fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Non-empty string field of an object
pub fn str_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> Value {
        json!({
            "resource": "object.c_study",
            "name": "c_study",
            "objectTypes": [
                {
                    "properties": [
                        { "name": "c_trigger", "script": "return 1" },
                        { "nested": { "script": "return 2" } }
                    ]
                }
            ]
        })
    }

    #[test]
    fn test_pointer_round_trip() {
        let path = RefPath::parse("/scripts/3/data").unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.segments()[1], Segment::Index(3));
        assert_eq!(path.to_pointer(), "/scripts/3/data");
        assert_eq!(path.dotted(), "scripts.3.data");
    }

    #[test]
    fn test_pointer_escapes() {
        let path = RefPath::root().child_key("a/b").child_key("c~d");
        assert_eq!(path.to_pointer(), "/a~1b/c~0d");
        assert_eq!(RefPath::parse("/a~1b/c~0d").unwrap(), path);
        assert!(RefPath::parse("no-slash").is_none());
        assert!(RefPath::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_get_and_set() {
        let mut value = record();
        let path = RefPath::parse("/objectTypes/0/properties/0/script").unwrap();
        assert_eq!(path.get(&value), Some(&json!("return 1")));

        assert!(path.set(&mut value, json!("/env/js/x.js")));
        assert_eq!(path.get(&value), Some(&json!("/env/js/x.js")));

        let missing_parent = RefPath::parse("/nope/deeper").unwrap();
        assert!(!missing_parent.set(&mut value, json!(1)));
    }

    #[test]
    fn test_set_inserts_missing_key() {
        let mut value = json!({ "image": { "resourceId": "r1" } });
        let path = RefPath::parse("/image/resourceId").unwrap().with_last_key("filePath");
        assert!(path.set(&mut value, json!("/env/assets/a.png")));
        assert_eq!(value["image"]["filePath"], json!("/env/assets/a.png"));
    }

    #[test]
    fn test_find_nodes_document_order() {
        let value = record();
        let nodes = find_nodes(&value, "script");
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].0.to_pointer(), "/objectTypes/0/properties/0/script");
        assert_eq!(nodes[1].0.to_pointer(), "/objectTypes/0/properties/1/nested/script");
    }

    #[test]
    fn test_find_owner_direct_parent() {
        let value = record();
        let path = RefPath::parse("/objectTypes/0/properties/0/script").unwrap();
        let owner = find_owner(&value, &path, OUTBOUND_IDENTITY).found().unwrap();
        assert_eq!(owner.path.to_pointer(), "/objectTypes/0/properties/0");
        assert_eq!(owner.trail, path);
    }

    #[test]
    fn test_find_owner_walks_up_to_root() {
        let value = record();
        let path = RefPath::parse("/objectTypes/0/properties/1/nested/script").unwrap();
        let owner = find_owner(&value, &path, OUTBOUND_IDENTITY).found().unwrap();
        assert!(owner.path.is_empty());
        assert_eq!(owner.trail.to_pointer(), "/objectTypes");
    }

    #[test]
    fn test_find_owner_not_found() {
        let value = json!({ "a": { "b": { "script": "x" } } });
        let path = RefPath::parse("/a/b/script").unwrap();
        assert_eq!(find_owner(&value, &path, OUTBOUND_IDENTITY), Ancestor::NotFound);
        assert_eq!(find_owner(&value, &RefPath::root(), OUTBOUND_IDENTITY), Ancestor::NotFound);
    }

    #[test]
    fn test_inbound_identity_includes_resource() {
        let value = json!({ "img": { "resource": "x.y", "resourceId": "r" } });
        let path = RefPath::parse("/img/resourceId").unwrap();
        assert_eq!(find_owner(&value, &path, OUTBOUND_IDENTITY), Ancestor::NotFound);
        let owner = find_owner(&value, &path, INBOUND_IDENTITY).found().unwrap();
        assert_eq!(owner.path.to_pointer(), "/img");
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(null)));
        assert!(is_truthy(&json!("a")));
        assert!(is_truthy(&json!(7)));
        assert_eq!(identity_of(&json!({"code": 0, "name": "n"}), OUTBOUND_IDENTITY), Some("n".into()));
        assert_eq!(identity_of(&json!({"label": 12}), OUTBOUND_IDENTITY), Some("12".into()));
    }
}

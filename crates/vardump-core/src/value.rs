//! Raw runtime values accepted by the logging ingress.
//!
//! Rust has no runtime reflection, so the console takes an explicit dynamic
//! [`Value`]. Strings and composites live behind `Rc<RefCell<..>>` handles:
//! cloning a `Value` clones the handle, not the storage, which is what lets
//! callers express aliasing, cycles and post-capture mutation — the exact
//! situations the snapshot builder exists to be correct under.
//!
//! Identity of a composite is the allocation address of its shared cell
//! (see [`crate::identity`]), never deep value equality.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::tree::AbstractNode;

/// Shared, interiorly-mutable storage for by-reference values.
pub type Shared<T> = Rc<RefCell<T>>;

/// Wrap a value in fresh shared storage.
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// A raw runtime value as handed to the logging call.
#[derive(Debug, Clone)]
pub enum Value {
    /// Explicit null.
    Null,
    /// Missing/uninitialized value (distinct from null).
    Undefined,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Double-precision float.
    Float(f64),
    /// By-reference string; multiple values may alias the same cell.
    Str(Shared<String>),
    /// Ordered key/value array.
    Arr(Shared<ArrayStorage>),
    /// Object with named properties and behavior.
    Obj(Shared<ObjectData>),
    /// Function or bound-method reference, identified by (owner, name).
    Callable(CallableRef),
    /// Opaque OS-level handle. Never expanded.
    Resource(ResourceHandle),
    /// A previously built abstraction fed back into the ingress.
    Abstracted(Rc<AbstractNode>),
}

impl Value {
    /// Create a by-reference string value with fresh storage.
    #[must_use]
    pub fn string(text: impl Into<String>) -> Self {
        Value::Str(shared(text.into()))
    }

    /// Create an empty array value.
    #[must_use]
    pub fn array() -> Self {
        Value::Arr(shared(ArrayStorage::new()))
    }

    /// Create an array from a sequence of values (auto-indexed keys).
    #[must_use]
    pub fn array_of(values: impl IntoIterator<Item = Value>) -> Self {
        let mut storage = ArrayStorage::new();
        for value in values {
            storage.push(value);
        }
        Value::Arr(shared(storage))
    }

    /// Wrap object data in shared storage.
    #[must_use]
    pub fn object(data: ObjectData) -> Self {
        Value::Obj(shared(data))
    }

    /// True for array and object values (the identity-tracked kinds).
    #[must_use]
    pub fn is_composite(&self) -> bool {
        matches!(self, Value::Arr(_) | Value::Obj(_))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::string(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::string(v)
    }
}

/// Key of an array entry. Unique within one array, insertion order preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum MapKey {
    /// Integer key.
    Int(i64),
    /// String key.
    Str(String),
}

impl std::fmt::Display for MapKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapKey::Int(i) => write!(f, "{i}"),
            MapKey::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for MapKey {
    fn from(k: i64) -> Self {
        MapKey::Int(k)
    }
}

impl From<&str> for MapKey {
    fn from(k: &str) -> Self {
        MapKey::Str(k.to_owned())
    }
}

/// Backing storage of an array value: ordered entries with unique keys.
#[derive(Debug, Default)]
pub struct ArrayStorage {
    entries: Vec<(MapKey, Value)>,
    next_index: i64,
}

impl ArrayStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append with the next auto-increment integer key. Returns the key used.
    pub fn push(&mut self, value: Value) -> MapKey {
        let key = MapKey::Int(self.next_index);
        self.next_index += 1;
        self.entries.push((key.clone(), value));
        key
    }

    /// Insert under an explicit key. An existing entry with the same key is
    /// replaced in place, preserving its position.
    pub fn insert(&mut self, key: impl Into<MapKey>, value: Value) {
        let key = key.into();
        if let MapKey::Int(i) = key {
            if i >= self.next_index {
                self.next_index = i + 1;
            }
        }
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Look up an entry by key.
    #[must_use]
    pub fn get(&self, key: &MapKey) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the array has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[(MapKey, Value)] {
        &self.entries
    }
}

/// Property visibility on an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Public => f.write_str("public"),
            Visibility::Protected => f.write_str("protected"),
            Visibility::Private => f.write_str("private"),
        }
    }
}

/// One property slot on an object.
///
/// `Unreadable` models a property whose read fails (a throwing accessor);
/// the builder turns it into a placeholder leaf without aborting the build.
#[derive(Debug, Clone)]
pub enum PropertySlot {
    /// A readable property holding a value.
    Value(Value),
    /// A property whose read fails, with the failure reason.
    Unreadable(String),
}

/// A method signature recorded for the optional methods summary.
#[derive(Debug, Clone)]
pub struct MethodSig {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub params: Vec<String>,
}

impl MethodSig {
    /// A public instance method.
    #[must_use]
    pub fn public(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            is_static: false,
            params: Vec::new(),
        }
    }

    /// Set the parameter names.
    #[must_use]
    pub fn with_params(mut self, params: impl IntoIterator<Item = &'static str>) -> Self {
        self.params = params.into_iter().map(str::to_owned).collect();
        self
    }

    /// Set the visibility.
    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Mark as static.
    #[must_use]
    pub fn statik(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Human-readable one-line signature, e.g. `public save(a, b)`.
    #[must_use]
    pub fn signature(&self) -> String {
        let kind = if self.is_static { " static" } else { "" };
        format!(
            "{}{} {}({})",
            self.visibility,
            kind,
            self.name,
            self.params.join(", ")
        )
    }
}

/// Backing data of an object value.
#[derive(Debug)]
pub struct ObjectData {
    class_name: String,
    properties: Vec<(String, Visibility, PropertySlot)>,
    methods: Vec<MethodSig>,
    opaque: bool,
}

impl ObjectData {
    /// Create an object of the given class with no properties.
    #[must_use]
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            properties: Vec::new(),
            methods: Vec::new(),
            opaque: false,
        }
    }

    /// Builder-style: add a readable property.
    #[must_use]
    pub fn with_property(
        mut self,
        name: impl Into<String>,
        visibility: Visibility,
        value: impl Into<Value>,
    ) -> Self {
        self.set_property(name, visibility, value.into());
        self
    }

    /// Builder-style: add a property whose read fails.
    #[must_use]
    pub fn with_unreadable_property(
        mut self,
        name: impl Into<String>,
        visibility: Visibility,
        reason: impl Into<String>,
    ) -> Self {
        self.properties
            .push((name.into(), visibility, PropertySlot::Unreadable(reason.into())));
        self
    }

    /// Builder-style: record a method signature.
    #[must_use]
    pub fn with_method(mut self, sig: MethodSig) -> Self {
        self.methods.push(sig);
        self
    }

    /// Builder-style: declare the object do-not-inspect.
    #[must_use]
    pub fn opaque(mut self) -> Self {
        self.opaque = true;
        self
    }

    /// Add or replace a readable property, preserving position on replace.
    pub fn set_property(
        &mut self,
        name: impl Into<String>,
        visibility: Visibility,
        value: Value,
    ) {
        let name = name.into();
        if let Some(slot) = self.properties.iter_mut().find(|(n, _, _)| *n == name) {
            slot.1 = visibility;
            slot.2 = PropertySlot::Value(value);
        } else {
            self.properties
                .push((name, visibility, PropertySlot::Value(value)));
        }
    }

    /// Declared class name.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Properties in declaration order.
    #[must_use]
    pub fn properties(&self) -> &[(String, Visibility, PropertySlot)] {
        &self.properties
    }

    /// Recorded method signatures.
    #[must_use]
    pub fn methods(&self) -> &[MethodSig] {
        &self.methods
    }

    /// True when the object is declared do-not-inspect.
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.opaque
    }
}

/// Reference to a named callable: a free function or a bound method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallableRef {
    /// Owning type for bound methods, absent for free functions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Callable name.
    pub name: String,
}

impl CallableRef {
    /// A free function reference.
    #[must_use]
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            owner: None,
            name: name.into(),
        }
    }

    /// A bound method reference.
    #[must_use]
    pub fn method(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: Some(owner.into()),
            name: name.into(),
        }
    }
}

/// An OS-level handle (file, socket, stream). Rendered as a label only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceHandle {
    /// Handle kind, e.g. `stream` or `socket`.
    pub kind: String,
    /// Numeric handle id.
    pub id: u32,
}

impl ResourceHandle {
    /// Create a handle of the given kind.
    #[must_use]
    pub fn new(kind: impl Into<String>, id: u32) -> Self {
        Self {
            kind: kind.into(),
            id,
        }
    }

    /// The fixed opaque label renderers show, e.g. `stream #3`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} #{}", self.kind, self.id)
    }
}

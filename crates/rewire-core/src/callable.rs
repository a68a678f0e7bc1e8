//! Callable references and their canonical interpretation.
//!
//! The redefinition engine accepts targets in every shape the host runtime
//! considers callable: a bare function name, a `"Class::method"` string, a
//! method bound to a live instance, or an invokable object. [`interpret`]
//! normalizes all of them into one canonical triple so the rest of the engine
//! never deals with raw caller input.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::registry::{SymbolRegistry, NAMESPACE_SEPARATOR};

/// Method name every invokable object answers to.
pub const CALL_OPERATOR: &str = "__invoke";

/// Scope-resolution token separating a class name from a method name.
pub const SCOPE_OPERATOR: &str = "::";

/// Global counter for generating unique instance IDs
static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
struct InstanceInner {
    id: u64,
    class_name: String,
}

/// Opaque reference to a live object of some runtime class.
///
/// Cheap to clone; two references are equal iff they point at the same
/// object, regardless of class.
#[derive(Debug, Clone)]
pub struct Instance {
    inner: Arc<InstanceInner>,
}

impl Instance {
    /// Create a fresh instance of the named class
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(InstanceInner {
                id: NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed),
                class_name: class_name.into(),
            }),
        }
    }

    /// Process-unique object ID
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Runtime class name of the object
    pub fn class_name(&self) -> &str {
        &self.inner.class_name
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Instance {}

/// A callable reference as supplied by the caller, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallableRef {
    /// A free function name; may carry an unsplit `"Class::method"` string
    Function(String),
    /// A (class name, method name) pair with no bound instance
    StaticMethod(String, String),
    /// A method bound to a live instance
    InstanceMethod(Instance, String),
    /// An object whose class declares the call operator
    Invokable(Instance),
}

impl From<&str> for CallableRef {
    fn from(name: &str) -> Self {
        CallableRef::Function(name.to_string())
    }
}

impl From<String> for CallableRef {
    fn from(name: String) -> Self {
        CallableRef::Function(name)
    }
}

impl From<(&str, &str)> for CallableRef {
    fn from((class, method): (&str, &str)) -> Self {
        CallableRef::StaticMethod(class.to_string(), method.to_string())
    }
}

impl From<(Instance, &str)> for CallableRef {
    fn from((instance, method): (Instance, &str)) -> Self {
        CallableRef::InstanceMethod(instance, method.to_string())
    }
}

impl From<Instance> for CallableRef {
    fn from(instance: Instance) -> Self {
        CallableRef::Invokable(instance)
    }
}

/// The normalized form of a callable: class, method, and bound instance.
///
/// Fully normalized — no leading namespace separators, instance captured
/// whenever it is determinable from the input shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCallable {
    /// Class or trait name; absent for plain functions
    pub class: Option<String>,
    /// Method name, or the function name when no class is present
    pub method: String,
    /// The bound instance, for instance-bound callables only
    pub instance: Option<Instance>,
}

impl fmt::Display for CanonicalCallable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.class {
            Some(class) => write!(f, "{}{}{}", class, SCOPE_OPERATOR, self.method),
            None => f.write_str(&self.method),
        }
    }
}

/// Normalize a callable reference into its canonical triple.
pub fn interpret(callable: &CallableRef) -> CanonicalCallable {
    match callable {
        CallableRef::Invokable(instance) => interpret(&CallableRef::InstanceMethod(
            instance.clone(),
            CALL_OPERATOR.to_string(),
        )),
        CallableRef::InstanceMethod(instance, method) => CanonicalCallable {
            class: Some(strip_leading_separator(instance.class_name()).to_string()),
            method: method.clone(),
            instance: Some(instance.clone()),
        },
        CallableRef::StaticMethod(class, method) => CanonicalCallable {
            class: Some(strip_leading_separator(class).to_string()),
            method: method.clone(),
            instance: None,
        },
        CallableRef::Function(name) => {
            let name = strip_leading_separator(name);
            match name.find(SCOPE_OPERATOR) {
                // a scope token at position 0 carries no class name and
                // leaves the string a plain function reference
                Some(pos) if pos > 0 => CanonicalCallable {
                    class: Some(name[..pos].to_string()),
                    method: name[pos + SCOPE_OPERATOR.len()..].to_string(),
                    instance: None,
                },
                _ => CanonicalCallable {
                    class: None,
                    method: name.to_string(),
                    instance: None,
                },
            }
        }
    }
}

/// Check whether a callable currently resolves to an invokable target.
///
/// Never errors: absence yields `false`, so callers can probe speculatively.
/// A bound instance is assumed callable unconditionally. `allow_autoload`
/// controls whether a class-existence miss may trigger on-demand loading.
pub fn is_defined<R: SymbolRegistry>(
    registry: &mut R,
    callable: &CallableRef,
    allow_autoload: bool,
) -> bool {
    let resolved = interpret(callable);
    if resolved.instance.is_some() {
        return true;
    }
    if let Some(class) = &resolved.class {
        return registry.has_type(class, allow_autoload)
            && registry.type_has_method(class, &resolved.method);
    }
    registry.has_function(&resolved.method)
}

/// Render a callable as `"Class::method"` or a bare function name.
///
/// Diagnostics only; the result is not guaranteed to parse back into an
/// equivalent callable.
pub fn render(callable: &CallableRef) -> String {
    interpret(callable).to_string()
}

fn strip_leading_separator(name: &str) -> &str {
    name.trim_start_matches(NAMESPACE_SEPARATOR)
}

//! In-process symbol registry: the runtime's function, class, and trait tables.
//!
//! The host runtime populates a [`ProcessRegistry`] as it loads code. Tables
//! are append-only and keep declaration order, which the definition tracker
//! relies on: everything declared before application code starts loading is
//! platform territory, and a single boundary index separates the two.
//!
//! The probing surface used by callable resolution is the [`SymbolRegistry`]
//! trait, so tests can substitute a stub for the full registry.

use std::fmt;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::value::Value;

/// Separator between namespace segments in qualified names.
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Where a definition came from: the platform baseline or application code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Bundled with the runtime or loaded before any application code
    Platform,
    /// Declared by application code
    User,
}

/// Whether a type definition is a class or a trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Instantiable class
    Class,
    /// Trait (method bundle, not instantiable)
    Trait,
}

/// A method declared by a class or trait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDef {
    /// Method name
    pub name: String,
    /// Declaring-source origin of the method body
    pub origin: Origin,
}

/// A class or trait definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    /// Type name, fully qualified
    pub name: String,
    /// Class or trait
    pub kind: TypeKind,
    /// Declaring-source origin
    pub origin: Origin,
    /// Declared methods, in declaration order
    pub methods: Vec<MethodDef>,
}

impl TypeDef {
    /// Create a class definition with no methods
    pub fn class(name: impl Into<String>, origin: Origin) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Class,
            origin,
            methods: Vec::new(),
        }
    }

    /// Create a trait definition with no methods
    pub fn trait_def(name: impl Into<String>, origin: Origin) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Trait,
            origin,
            methods: Vec::new(),
        }
    }

    /// Add a declared method; its origin follows the type's
    pub fn with_method(mut self, name: impl Into<String>) -> Self {
        self.methods.push(MethodDef {
            name: name.into(),
            origin: self.origin,
        });
        self
    }
}

/// Native function implementation stored in the registry.
pub type NativeFn = Box<dyn Fn(&[Value]) -> Value>;

/// Body of a registered function.
pub enum FunctionBody {
    /// Directly invokable implementation
    Native(NativeFn),
    /// Forwarder: all arguments are passed to the named target, result
    /// returned unchanged
    Forward(String),
}

impl fmt::Debug for FunctionBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionBody::Native(_) => f.write_str("Native(..)"),
            FunctionBody::Forward(target) => f.debug_tuple("Forward").field(target).finish(),
        }
    }
}

/// A registered free function.
#[derive(Debug)]
pub struct FunctionDef {
    /// Function name, fully qualified
    pub name: String,
    /// Declaring-source origin
    pub origin: Origin,
    body: FunctionBody,
}

/// Errors raised by the symbol tables.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A function with this name is already defined. Redefinition is fatal;
    /// there is no recovery path.
    #[error("function '{0}' is already defined")]
    DuplicateFunction(String),

    /// A class or trait with this name is already declared
    #[error("type '{0}' is already declared")]
    DuplicateType(String),

    /// Invocation of a name with no resolvable definition
    #[error("call to undefined function '{0}'")]
    UndefinedFunction(String),
}

/// Lazy-load hook consulted when an existence probe misses with autoloading
/// enabled. Returning a definition installs it and the probe succeeds.
pub type Autoloader = Box<dyn Fn(&str) -> Option<TypeDef>>;

/// Probing and symbol-installation surface used by callable resolution.
pub trait SymbolRegistry {
    /// Check whether a free function with this name exists
    fn has_function(&self, name: &str) -> bool;

    /// Check whether a class or trait with this name exists, optionally
    /// triggering on-demand loading on a miss
    fn has_type(&mut self, name: &str, trigger_lazy_load: bool) -> bool;

    /// Check whether the named type declares the named method
    fn type_has_method(&self, ty: &str, method: &str) -> bool;

    /// Install a forwarding function `namespace\alias` that delegates every
    /// call to `target`. Duplicate names are a fatal caller error.
    fn define_forwarding_function(
        &mut self,
        namespace: &str,
        alias: &str,
        target: &str,
    ) -> Result<(), RegistryError>;
}

/// The process-wide symbol registry.
///
/// Single-threaded by design: all state is plain mutable data owned by the
/// embedder, mirroring the execution model of the runtime being patched.
#[derive(Default)]
pub struct ProcessRegistry {
    functions: Vec<FunctionDef>,
    function_ids: FxHashMap<String, usize>,
    classes: Vec<TypeDef>,
    class_ids: FxHashMap<String, usize>,
    traits: Vec<TypeDef>,
    trait_ids: FxHashMap<String, usize>,
    autoloader: Option<Autoloader>,
}

impl fmt::Debug for ProcessRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessRegistry")
            .field("functions", &self.functions.len())
            .field("classes", &self.classes.len())
            .field("traits", &self.traits.len())
            .field("autoloader", &self.autoloader.is_some())
            .finish()
    }
}

impl ProcessRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a native function. Returns its declaration index.
    pub fn define_function(
        &mut self,
        name: &str,
        origin: Origin,
        body: impl Fn(&[Value]) -> Value + 'static,
    ) -> Result<usize, RegistryError> {
        self.insert_function(FunctionDef {
            name: name.to_string(),
            origin,
            body: FunctionBody::Native(Box::new(body)),
        })
    }

    /// Register a class or trait. Returns its declaration index within its
    /// kind's table.
    pub fn define_type(&mut self, def: TypeDef) -> Result<usize, RegistryError> {
        if self.class_ids.contains_key(&def.name) || self.trait_ids.contains_key(&def.name) {
            return Err(RegistryError::DuplicateType(def.name.clone()));
        }
        let (table, ids) = match def.kind {
            TypeKind::Class => (&mut self.classes, &mut self.class_ids),
            TypeKind::Trait => (&mut self.traits, &mut self.trait_ids),
        };
        let id = table.len();
        ids.insert(def.name.clone(), id);
        table.push(def);
        Ok(id)
    }

    /// Install the lazy-load hook consulted by `has_type(_, true)`
    pub fn set_autoloader(&mut self, loader: impl Fn(&str) -> Option<TypeDef> + 'static) {
        self.autoloader = Some(Box::new(loader));
    }

    /// Declared classes, in declaration order
    pub fn declared_classes(&self) -> &[TypeDef] {
        &self.classes
    }

    /// Declared traits, in declaration order
    pub fn declared_traits(&self) -> &[TypeDef] {
        &self.traits
    }

    /// Look up a class or trait by name (classes first)
    pub fn type_def(&self, name: &str) -> Option<&TypeDef> {
        self.class_ids
            .get(name)
            .map(|&id| &self.classes[id])
            .or_else(|| self.trait_ids.get(name).map(|&id| &self.traits[id]))
    }

    /// Methods declared by the named class or trait
    pub fn methods_of(&self, name: &str) -> Option<&[MethodDef]> {
        self.type_def(name).map(|def| def.methods.as_slice())
    }

    /// Look up a function definition by name
    pub fn function_def(&self, name: &str) -> Option<&FunctionDef> {
        self.function_ids.get(name).map(|&id| &self.functions[id])
    }

    /// Names of user-origin functions, in declaration order
    pub fn user_defined_functions(&self) -> Vec<String> {
        self.functions
            .iter()
            .filter(|def| def.origin == Origin::User)
            .map(|def| def.name.clone())
            .collect()
    }

    /// Invoke the named function with the given arguments.
    ///
    /// Forwarding bodies are resolved by repeated lookup; the chain length is
    /// bounded by the table size, so a cycle terminates as
    /// [`RegistryError::UndefinedFunction`] rather than looping.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, RegistryError> {
        let mut current = name;
        for _ in 0..=self.functions.len() {
            let Some(&id) = self.function_ids.get(current) else {
                return Err(RegistryError::UndefinedFunction(current.to_string()));
            };
            match &self.functions[id].body {
                FunctionBody::Native(body) => return Ok(body(args)),
                FunctionBody::Forward(target) => current = target,
            }
        }
        Err(RegistryError::UndefinedFunction(name.to_string()))
    }

    fn insert_function(&mut self, def: FunctionDef) -> Result<usize, RegistryError> {
        if self.function_ids.contains_key(&def.name) {
            return Err(RegistryError::DuplicateFunction(def.name.clone()));
        }
        let id = self.functions.len();
        self.function_ids.insert(def.name.clone(), id);
        self.functions.push(def);
        Ok(id)
    }
}

impl SymbolRegistry for ProcessRegistry {
    fn has_function(&self, name: &str) -> bool {
        self.function_ids.contains_key(name)
    }

    fn has_type(&mut self, name: &str, trigger_lazy_load: bool) -> bool {
        if self.class_ids.contains_key(name) || self.trait_ids.contains_key(name) {
            return true;
        }
        if !trigger_lazy_load {
            return false;
        }
        let loaded = match self.autoloader.as_ref() {
            Some(loader) => loader(name),
            None => None,
        };
        match loaded {
            // the hook may load anything; only a definition answering to the
            // probed name satisfies the probe
            Some(def) => {
                let _ = self.define_type(def);
                self.class_ids.contains_key(name) || self.trait_ids.contains_key(name)
            }
            None => false,
        }
    }

    fn type_has_method(&self, ty: &str, method: &str) -> bool {
        self.methods_of(ty)
            .is_some_and(|methods| methods.iter().any(|m| m.name == method))
    }

    fn define_forwarding_function(
        &mut self,
        namespace: &str,
        alias: &str,
        target: &str,
    ) -> Result<(), RegistryError> {
        self.insert_function(FunctionDef {
            name: qualify(namespace, alias),
            origin: Origin::User,
            body: FunctionBody::Forward(target.to_string()),
        })
        .map(|_| ())
    }
}

/// Join a namespace and a name with the namespace separator, stripping any
/// leading separator from the result.
pub fn qualify(namespace: &str, name: &str) -> String {
    let joined = format!("{}{}{}", namespace, NAMESPACE_SEPARATOR, name);
    joined.trim_start_matches(NAMESPACE_SEPARATOR).to_string()
}

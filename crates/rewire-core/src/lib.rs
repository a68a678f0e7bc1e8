//! Rewire Core
//!
//! Identity-resolution and introspection primitives for a runtime
//! code-redefinition engine:
//! - **Callable interpretation**: normalize any supported callable shape into
//!   a canonical (class, method, bound instance) triple (`callable` module)
//! - **Symbol registry**: the process function/class/trait tables the rest of
//!   the engine probes and mutates (`registry` module)
//! - **Reflection**: metadata handles over resolved targets (`reflect`)
//! - **Definition tracking**: incremental enumeration of user-defined
//!   callables for patch-target discovery (`tracker`)
//! - **Aliasing**: one-time installation of forwarding functions (`alias`)
//!
//! # Example
//!
//! ```rust,ignore
//! use rewire_core::{interpret, is_defined, CallableRef, ProcessRegistry};
//!
//! let mut registry = ProcessRegistry::new();
//! let target = CallableRef::from("App\\Cache::get");
//!
//! let resolved = interpret(&target);
//! assert_eq!(resolved.class.as_deref(), Some("App\\Cache"));
//!
//! if is_defined(&mut registry, &target, true) {
//!     // safe to install a patch
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Forwarding-alias installation
pub mod alias;

/// Callable references and canonical interpretation
pub mod callable;

/// Reflective handles over resolved callables
pub mod reflect;

/// The process symbol registry and its probing trait
pub mod registry;

/// Incremental user-defined definition tracking
pub mod tracker;

/// Misc helpers: binary search, string condensation, path and wildcard
/// handling, ownership-name classification
pub mod util;

/// Dynamic values for registry function calls
pub mod value;

pub use alias::alias;
pub use callable::{
    interpret, is_defined, render, CallableRef, CanonicalCallable, Instance, CALL_OPERATOR,
    SCOPE_OPERATOR,
};
pub use reflect::{reflect, FunctionReflection, MethodReflection, ReflectError, ReflectionHandle};
pub use registry::{
    FunctionBody, FunctionDef, MethodDef, Origin, ProcessRegistry, RegistryError, SymbolRegistry,
    TypeDef, TypeKind, NAMESPACE_SEPARATOR,
};
pub use tracker::DefinitionTracker;
pub use value::Value;

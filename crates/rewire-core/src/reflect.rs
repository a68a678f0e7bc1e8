//! Reflective handles over resolved callables.
//!
//! Unlike [`crate::callable::is_defined`], reflection demands that the target
//! actually exists: asking for a handle over a missing function or method is
//! the one place this layer surfaces an error.

use thiserror::Error;

use crate::callable::{interpret, CallableRef, SCOPE_OPERATOR};
use crate::registry::{Origin, ProcessRegistry};

/// Errors raised when reflecting over a callable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReflectError {
    /// The interpreted callable does not resolve to any declared target
    #[error("cannot reflect '{0}': no such function or method")]
    TargetNotFound(String),
}

/// Reflective metadata over a resolved free function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionReflection {
    name: String,
    origin: Origin,
}

impl FunctionReflection {
    /// Function name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declaring-source origin
    pub fn origin(&self) -> Origin {
        self.origin
    }
}

/// Reflective metadata over a resolved class or trait method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodReflection {
    class: String,
    method: String,
    origin: Origin,
}

impl MethodReflection {
    /// Declaring class or trait name
    pub fn class_name(&self) -> &str {
        &self.class
    }

    /// Method name
    pub fn name(&self) -> &str {
        &self.method
    }

    /// Declaring-source origin of the method body
    pub fn origin(&self) -> Origin {
        self.origin
    }
}

/// A reflective handle over either shape of callable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReflectionHandle {
    /// Handle over a free function
    Function(FunctionReflection),
    /// Handle over a class or trait method
    Method(MethodReflection),
}

impl ReflectionHandle {
    /// Name of the reflected function or method
    pub fn name(&self) -> &str {
        match self {
            ReflectionHandle::Function(func) => func.name(),
            ReflectionHandle::Method(method) => method.name(),
        }
    }

    /// Declaring class name, for method handles
    pub fn class_name(&self) -> Option<&str> {
        match self {
            ReflectionHandle::Function(_) => None,
            ReflectionHandle::Method(method) => Some(method.class_name()),
        }
    }

    /// Declaring-source origin of the reflected target
    pub fn origin(&self) -> Origin {
        match self {
            ReflectionHandle::Function(func) => func.origin(),
            ReflectionHandle::Method(method) => method.origin(),
        }
    }

    /// Fully-qualified display name (`Class::method` or the function name)
    pub fn qualified_name(&self) -> String {
        match self {
            ReflectionHandle::Function(func) => func.name().to_string(),
            ReflectionHandle::Method(method) => {
                format!("{}{}{}", method.class_name(), SCOPE_OPERATOR, method.name())
            }
        }
    }

    /// Whether this handle reflects a method rather than a free function
    pub fn is_method(&self) -> bool {
        matches!(self, ReflectionHandle::Method(_))
    }
}

/// Obtain a reflective handle over a callable's resolved target.
///
/// The callable is interpreted first; the handle shape follows the canonical
/// form, not the input shape. Existence is checked here and nowhere earlier.
pub fn reflect(
    registry: &ProcessRegistry,
    callable: &CallableRef,
) -> Result<ReflectionHandle, ReflectError> {
    let resolved = interpret(callable);
    if let Some(class) = &resolved.class {
        let method = registry
            .methods_of(class)
            .and_then(|methods| methods.iter().find(|m| m.name == resolved.method))
            .ok_or_else(|| ReflectError::TargetNotFound(resolved.to_string()))?;
        return Ok(ReflectionHandle::Method(MethodReflection {
            class: class.clone(),
            method: method.name.clone(),
            origin: method.origin,
        }));
    }
    let def = registry
        .function_def(&resolved.method)
        .ok_or_else(|| ReflectError::TargetNotFound(resolved.to_string()))?;
    Ok(ReflectionHandle::Function(FunctionReflection {
        name: def.name.clone(),
        origin: def.origin,
    }))
}

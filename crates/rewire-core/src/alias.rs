//! One-time installation of forwarding aliases into a namespace.
//!
//! Each alias becomes a real entry in the process function table that
//! forwards every call, arguments in order, to the original and returns its
//! result unchanged. Installation is permanent: the function table rejects
//! redefinition, so aliasing the same name twice is a caller error that
//! propagates as-is.

use crate::registry::{qualify, RegistryError, SymbolRegistry};

/// Install forwarding functions for every (original, aliases) pair.
///
/// The original is qualified with `namespace` (leading separator stripped),
/// and each alias is defined inside `namespace` at the moment of the call.
pub fn alias<R: SymbolRegistry>(
    registry: &mut R,
    namespace: &str,
    mapping: &[(&str, &[&str])],
) -> Result<(), RegistryError> {
    for (original, aliases) in mapping {
        let target = qualify(namespace, original);
        for alias_name in *aliases {
            registry.define_forwarding_function(namespace, alias_name, &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Origin, ProcessRegistry};
    use crate::value::Value;

    fn registry_with_original() -> ProcessRegistry {
        let mut registry = ProcessRegistry::new();
        registry
            .define_function("App\\concat", Origin::User, |args| {
                let joined: String = args
                    .iter()
                    .filter_map(|value| value.as_str().map(str::to_string))
                    .collect();
                Value::Str(joined)
            })
            .unwrap();
        registry
    }

    #[test]
    fn test_alias_forwards_arguments_and_result() {
        let mut registry = registry_with_original();
        alias(&mut registry, "App", &[("concat", &["join"])]).unwrap();

        let direct = registry
            .call("App\\concat", &[Value::from("a"), Value::from("b")])
            .unwrap();
        let via_alias = registry
            .call("App\\join", &[Value::from("a"), Value::from("b")])
            .unwrap();
        assert_eq!(direct, via_alias);
    }

    #[test]
    fn test_alias_multiple_names_for_one_original() {
        let mut registry = registry_with_original();
        alias(&mut registry, "App", &[("concat", &["join", "glue"])]).unwrap();
        assert!(registry.has_function("App\\join"));
        assert!(registry.has_function("App\\glue"));
    }

    #[test]
    fn test_alias_strips_leading_separator_from_namespace() {
        let mut registry = registry_with_original();
        alias(&mut registry, "\\App", &[("concat", &["join"])]).unwrap();
        assert_eq!(
            registry.call("App\\join", &[Value::from("x")]).unwrap(),
            Value::Str("x".to_string())
        );
    }

    #[test]
    fn test_overlapping_alias_is_fatal() {
        let mut registry = registry_with_original();
        alias(&mut registry, "App", &[("concat", &["join"])]).unwrap();
        let err = alias(&mut registry, "App", &[("concat", &["join"])]).unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateFunction("App\\join".to_string())
        );
    }

    #[test]
    fn test_alias_void_result_propagates() {
        let mut registry = ProcessRegistry::new();
        registry
            .define_function("App\\touch", Origin::User, |_| Value::Unit)
            .unwrap();
        alias(&mut registry, "App", &[("touch", &["poke"])]).unwrap();
        assert!(registry.call("App\\poke", &[]).unwrap().is_unit());
    }
}

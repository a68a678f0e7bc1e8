//! Incremental discovery of user-defined classes, traits, and methods.
//!
//! Platform definitions are always declared before any application code runs,
//! so a single boundary index per listing separates "platform, ignore" from
//! "application, track". The cutoffs are computed once per tracker lifetime;
//! afterwards only the suffix of newly-declared types is ever scanned, so
//! each type's methods are enumerated exactly once no matter how often the
//! enumeration is called.

use crate::callable::SCOPE_OPERATOR;
use crate::registry::{Origin, ProcessRegistry, TypeDef};

/// Incrementally-updated snapshot of user-defined definitions.
///
/// One long-lived instance per process under normal use. All state is plain
/// mutable data; [`reset`](DefinitionTracker::reset) returns the tracker to
/// its initial state for tests.
#[derive(Debug, Default)]
pub struct DefinitionTracker {
    class_cutoff: Option<usize>,
    trait_cutoff: Option<usize>,
    methods: Vec<String>,
    classes_seen: usize,
    traits_seen: usize,
}

impl DefinitionTracker {
    /// Create a tracker with no computed baseline
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard the memoized cutoffs and the discovered-method cache
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Names of all user-defined classes and traits declared so far.
    ///
    /// Classes first (declaration order), then traits. The first call fixes
    /// the platform/user boundary for each listing; the listings are
    /// append-only, so later user declarations always land past the boundary.
    pub fn user_defined_types(&mut self, registry: &ProcessRegistry) -> Vec<String> {
        let (class_cutoff, trait_cutoff) = self.cutoffs(registry);
        registry.declared_classes()[class_cutoff..]
            .iter()
            .chain(&registry.declared_traits()[trait_cutoff..])
            .map(|def| def.name.clone())
            .collect()
    }

    /// `"Type::method"` entries for every user-defined class and trait.
    ///
    /// Only types that appeared since the previous call are scanned; repeated
    /// calls with no new declarations append nothing. Classes and traits are
    /// tracked with separate counters: a class declared after traits have
    /// already been scanned is still new, while the scanned traits are not.
    pub fn user_defined_methods(&mut self, registry: &ProcessRegistry) -> &[String] {
        let (class_cutoff, trait_cutoff) = self.cutoffs(registry);
        let new_classes = &registry.declared_classes()[class_cutoff + self.classes_seen..];
        let new_traits = &registry.declared_traits()[trait_cutoff + self.traits_seen..];
        for def in new_classes.iter().chain(new_traits) {
            for method in &def.methods {
                self.methods
                    .push(format!("{}{}{}", def.name, SCOPE_OPERATOR, method.name));
            }
        }
        self.classes_seen += new_classes.len();
        self.traits_seen += new_traits.len();
        &self.methods
    }

    /// All user-defined callables: free functions (declaration order), then
    /// discovered methods (discovery order).
    pub fn user_defined_callables(&mut self, registry: &ProcessRegistry) -> Vec<String> {
        let mut names = registry.user_defined_functions();
        self.user_defined_methods(registry);
        names.extend(self.methods.iter().cloned());
        names
    }

    /// Platform/user boundary index per listing, computed on first use.
    fn cutoffs(&mut self, registry: &ProcessRegistry) -> (usize, usize) {
        let classes = registry.declared_classes();
        let traits = registry.declared_traits();
        let class_cutoff = *self.class_cutoff.get_or_insert_with(|| {
            classes
                .iter()
                .position(|class| class.origin == Origin::User)
                .unwrap_or(classes.len())
        });
        let trait_cutoff = *self.trait_cutoff.get_or_insert_with(|| {
            traits
                .iter()
                .position(is_user_defined_trait)
                .unwrap_or(traits.len())
        });
        (class_cutoff, trait_cutoff)
    }
}

/// A trait with no methods carries nothing to classify and never decides the
/// boundary; otherwise its first method's origin decides.
fn is_user_defined_trait(def: &TypeDef) -> bool {
    def.methods
        .first()
        .is_some_and(|method| method.origin == Origin::User)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn seeded_registry() -> ProcessRegistry {
        let mut registry = ProcessRegistry::new();
        registry
            .define_type(TypeDef::class("ArrayObject", Origin::Platform).with_method("count"))
            .unwrap();
        registry
            .define_type(TypeDef::class("SplStack", Origin::Platform).with_method("push"))
            .unwrap();
        registry
            .define_type(
                TypeDef::class("App\\Cache", Origin::User)
                    .with_method("get")
                    .with_method("set"),
            )
            .unwrap();
        registry
            .define_type(TypeDef::trait_def("Countable", Origin::Platform))
            .unwrap();
        registry
            .define_type(TypeDef::trait_def("App\\Loggable", Origin::User).with_method("log"))
            .unwrap();
        registry
    }

    #[test]
    fn test_cutoff_excludes_platform_types() {
        let registry = seeded_registry();
        let mut tracker = DefinitionTracker::new();
        let types = tracker.user_defined_types(&registry);
        assert_eq!(types, vec!["App\\Cache", "App\\Loggable"]);
    }

    #[test]
    fn test_cutoff_with_no_user_types() {
        let mut registry = ProcessRegistry::new();
        registry
            .define_type(TypeDef::class("stdClass", Origin::Platform))
            .unwrap();
        let mut tracker = DefinitionTracker::new();
        assert!(tracker.user_defined_types(&registry).is_empty());
        assert!(tracker.user_defined_methods(&registry).is_empty());
    }

    #[test]
    fn test_zero_method_trait_does_not_decide_cutoff() {
        let mut registry = ProcessRegistry::new();
        // an unclassifiable empty trait sits before the first user trait
        registry
            .define_type(TypeDef::trait_def("Marker", Origin::User))
            .unwrap();
        registry
            .define_type(TypeDef::trait_def("App\\Greets", Origin::User).with_method("hello"))
            .unwrap();
        let mut tracker = DefinitionTracker::new();
        assert_eq!(tracker.user_defined_types(&registry), vec!["App\\Greets"]);
    }

    #[test]
    fn test_incremental_method_discovery() {
        let mut registry = seeded_registry();
        let mut tracker = DefinitionTracker::new();

        let first = tracker.user_defined_methods(&registry).to_vec();
        assert_eq!(
            first,
            vec!["App\\Cache::get", "App\\Cache::set", "App\\Loggable::log"]
        );

        // no new declarations: nothing appended
        assert_eq!(tracker.user_defined_methods(&registry), first.as_slice());

        registry
            .define_type(TypeDef::class("App\\Queue", Origin::User).with_method("pop"))
            .unwrap();
        let second = tracker.user_defined_methods(&registry).to_vec();
        assert_eq!(second.len(), first.len() + 1);
        assert_eq!(second.last().map(String::as_str), Some("App\\Queue::pop"));

        // idempotent again after the growth
        assert_eq!(tracker.user_defined_methods(&registry), second.as_slice());
    }

    #[test]
    fn test_late_class_after_scanned_trait() {
        let mut registry = seeded_registry();
        let mut tracker = DefinitionTracker::new();

        // baseline scan covers App\Cache and the trait App\Loggable
        let baseline = tracker.user_defined_methods(&registry).to_vec();
        assert!(baseline.contains(&"App\\Loggable::log".to_string()));

        // a class declared now lands before the traits in combined order;
        // it must still be picked up, and the trait must not be rescanned
        registry
            .define_type(TypeDef::class("App\\Queue", Origin::User).with_method("pop"))
            .unwrap();
        let rescanned = tracker.user_defined_methods(&registry).to_vec();
        assert_eq!(rescanned.len(), baseline.len() + 1);
        assert_eq!(rescanned.last().map(String::as_str), Some("App\\Queue::pop"));
        assert_eq!(
            rescanned
                .iter()
                .filter(|name| *name == "App\\Loggable::log")
                .count(),
            1
        );
    }

    #[test]
    fn test_user_defined_callables_functions_first() {
        let mut registry = seeded_registry();
        registry
            .define_function("array_map", Origin::Platform, |_| Value::Unit)
            .unwrap();
        registry
            .define_function("App\\helper", Origin::User, |_| Value::Unit)
            .unwrap();

        let mut tracker = DefinitionTracker::new();
        let callables = tracker.user_defined_callables(&registry);
        assert_eq!(
            callables,
            vec![
                "App\\helper",
                "App\\Cache::get",
                "App\\Cache::set",
                "App\\Loggable::log"
            ]
        );
    }

    #[test]
    fn test_reset_recomputes_baseline() {
        let mut registry = seeded_registry();
        let mut tracker = DefinitionTracker::new();
        tracker.user_defined_methods(&registry);

        registry
            .define_type(TypeDef::class("App\\Late", Origin::User).with_method("run"))
            .unwrap();
        tracker.reset();
        let methods = tracker.user_defined_methods(&registry).to_vec();
        assert!(methods.contains(&"App\\Late::run".to_string()));
        assert!(methods.contains(&"App\\Cache::get".to_string()));
    }
}

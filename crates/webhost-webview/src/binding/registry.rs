use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use super::Handler;

/// Ownership table for the host's bindings, keyed by name.
///
/// The registry holds the only long-lived references to handlers. The
/// native side knows bindings by name alone, and a dispatch clones the
/// `Rc` for the duration of the call, so removing a binding while it is
/// executing does not free it mid-call.
#[derive(Debug, Default)]
pub struct BindingRegistry {
    handlers: HashMap<String, Rc<Handler>>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `handler` under `name`, returning the handler it replaced.
    pub fn register(&mut self, name: impl Into<String>, handler: Handler) -> Option<Rc<Handler>> {
        let name = name.into();
        debug!(name = %name, arity = ?handler.arity(), "binding registered");
        self.handlers.insert(name, Rc::new(handler))
    }

    /// Remove the binding for `name`. Absent names are a no-op.
    pub fn unregister(&mut self, name: &str) -> Option<Rc<Handler>> {
        let removed = self.handlers.remove(name);
        if removed.is_some() {
            debug!(name, "binding unregistered");
        }
        removed
    }

    pub fn resolve(&self, name: &str) -> Option<Rc<Handler>> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Drop every binding, returning the names that were registered (sorted).
    pub fn clear(&mut self) -> Vec<String> {
        let names = self.names();
        self.handlers.clear();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::IntoHandler;
    use serde_json::Value;

    fn noop(arity: usize) -> Handler {
        Handler::with_arity(arity, |_| Ok(Value::Null))
    }

    #[test]
    fn resolve_returns_registered_handler() {
        let mut registry = BindingRegistry::new();
        registry.register("add", noop(2));

        let first = registry.resolve("add").unwrap();
        let second = registry.resolve("add").unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(first.arity().expected(), Some(2));
    }

    #[test]
    fn unknown_name_resolves_to_none() {
        let registry = BindingRegistry::new();
        assert!(registry.resolve("missing").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn re_registering_replaces_previous_entry() {
        let mut registry = BindingRegistry::new();
        assert!(registry.register("f", noop(1)).is_none());
        let replaced = registry.register("f", noop(3)).unwrap();

        assert_eq!(replaced.arity().expected(), Some(1));
        assert_eq!(registry.resolve("f").unwrap().arity().expected(), Some(3));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unregister_removes_and_tolerates_absent_names() {
        let mut registry = BindingRegistry::new();
        registry.register("f", noop(0));

        assert!(registry.unregister("f").is_some());
        assert!(registry.resolve("f").is_none());
        assert!(registry.unregister("f").is_none());
        assert!(registry.unregister("never").is_none());
    }

    #[test]
    fn in_flight_reference_survives_unregister() {
        let mut registry = BindingRegistry::new();
        registry.register("slow", (|x: i64| Ok::<_, String>(x)).into_handler());

        let in_flight = registry.resolve("slow").unwrap();
        registry.unregister("slow");

        assert_eq!(Rc::strong_count(&in_flight), 1);
        assert_eq!(in_flight.arity().expected(), Some(1));
    }

    #[test]
    fn clear_returns_sorted_names_and_empties() {
        let mut registry = BindingRegistry::new();
        registry.register("zeta", noop(0));
        registry.register("alpha", noop(0));
        registry.register("mid", noop(0));

        assert!(registry.contains("mid"));
        assert_eq!(registry.clear(), vec!["alpha", "mid", "zeta"]);
        assert!(registry.is_empty());
        assert!(registry.resolve("alpha").is_none());
    }
}

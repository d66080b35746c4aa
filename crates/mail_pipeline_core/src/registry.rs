//! Name-keyed lookup of steps, used when a step list arrives as names.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{event, Level};

use crate::step::{Step, StepSlot};

pub struct StepRegistry<T: Send + 'static> {
    steps: BTreeMap<String, Arc<dyn Step<T>>>,
}

impl<T: Send + 'static> StepRegistry<T> {
    pub fn new() -> Self {
        Self {
            steps: BTreeMap::new(),
        }
    }

    /// Registers `step` under its own name, replacing any earlier entry.
    pub fn register(&mut self, step: impl Step<T> + 'static) -> &mut Self {
        let step: Arc<dyn Step<T>> = Arc::new(step);
        self.steps.insert(step.name().to_string(), step);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Step<T>>> {
        self.steps.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.steps.keys().map(String::as_str)
    }

    /// Maps each name onto a slot. Names with no registered step become
    /// unresolved slots so the pipeline can report them.
    pub fn resolve<I, S>(&self, names: I) -> Vec<StepSlot<T>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| {
                let name = name.as_ref().trim();
                match self.get(name) {
                    Some(step) => StepSlot::Resolved(step),
                    None => {
                        event!(Level::WARN, step = name, "No step registered under this name.");
                        StepSlot::Unresolved(name.to_string())
                    }
                }
            })
            .collect()
    }
}

impl<T: Send + 'static> Default for StepRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::step_fn;

    fn registry() -> StepRegistry<u32> {
        let mut registry = StepRegistry::new();
        registry
            .register(step_fn("inc", |v: u32| async move { Ok(v + 1) }))
            .register(step_fn("square", |v: u32| async move { Ok(v * v) }));
        registry
    }

    #[test]
    fn resolves_known_names_and_marks_unknown_ones() {
        let slots = registry().resolve(["inc", " square ", "cube"]);

        assert_eq!(slots.len(), 3);
        assert!(slots[0].is_resolved());
        assert_eq!(slots[1].label(), "square");
        assert!(matches!(&slots[2], StepSlot::Unresolved(name) if name == "cube"));
    }

    #[test]
    fn lists_registered_names_sorted() {
        let registry = registry();

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["inc", "square"]);
        assert!(registry.get("inc").is_some());
        assert!(registry.get("missing").is_none());
    }
}

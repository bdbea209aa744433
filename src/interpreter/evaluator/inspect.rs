use std::collections::HashMap;

use crate::interpreter::{
    evaluator::{core::Interpreter, modules::ModuleState},
    value::core::Value,
};

impl Interpreter {
    /// Returns a copy of the global variable bindings.
    ///
    /// Container values in the snapshot still alias the live storage;
    /// callers that only render them see a consistent picture.
    #[must_use]
    pub fn globals_snapshot(&self) -> HashMap<String, Value> {
        self.globals.clone()
    }

    /// Returns the names of all user-defined functions, sorted.
    #[must_use]
    pub fn function_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns module paths grouped by state as `(loading, loaded)`, each
    /// sorted.
    ///
    /// `loading` is non-empty only while imports are executing, which makes
    /// it useful for rendering cycle situations in external drivers.
    #[must_use]
    pub fn modules_snapshot(&self) -> (Vec<String>, Vec<String>) {
        let mut loading = Vec::new();
        let mut loaded = Vec::new();

        for (path, state) in &self.modules {
            match state {
                ModuleState::Loading => loading.push(path.clone()),
                ModuleState::Loaded => loaded.push(path.clone()),
            }
        }

        loading.sort();
        loaded.sort();
        (loading, loaded)
    }
}

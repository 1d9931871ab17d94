use crate::{FunctionDefinition, FunctionType};
use data::DataType;

/// The set of all registered function/operator overloads, scanned to find
/// a match during planning. Operators (`+`, `==`, ...) are just functions
/// registered under their symbol, resolved through the exact same path as
/// named calls like `ago`.
#[derive(Debug)]
pub struct Registry {
    functions: Vec<FunctionDefinition>,
}

impl Registry {
    pub fn new() -> Self {
        let mut registry = Registry {
            functions: Vec::new(),
        };
        crate::register_builtins(&mut registry);
        registry
    }

    pub fn register_function(&mut self, definition: FunctionDefinition) {
        self.functions.push(definition);
    }

    /// Finds the first overload of `name` whose parameter types accept
    /// `arg_types`, scanning registrations in the order they were added.
    /// A `Null` actual type matches any parameter (an untyped literal
    /// `null` unifies with whichever overload is tried first).
    pub fn resolve(&self, name: &str, arg_types: &[DataType]) -> Option<&FunctionDefinition> {
        self.functions.iter().find(|def| {
            def.signature.name == name
                && def.signature.args.len() == arg_types.len()
                && def
                    .signature
                    .args
                    .iter()
                    .zip(arg_types.iter())
                    .all(|(expected, actual)| *actual == DataType::Null || actual == expected)
        })
    }

    /// All registered overloads of `name`, regardless of arity - used by
    /// the planner to build a "no matching overload" error that lists
    /// what was available.
    pub fn overloads(&self, name: &str) -> Vec<&FunctionDefinition> {
        self.functions
            .iter()
            .filter(|def| def.signature.name == name)
            .collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}

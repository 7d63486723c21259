use crate::Expr;
use rustc_hash::FxHashMap;
use std::ops::RangeInclusive;
use std::sync::OnceLock;

/// Definition of a mathematical function including its evaluation and differentiation logic
#[derive(Clone)]
pub(crate) struct FunctionDefinition {
    /// Canonical name of the function (e.g., "sin", "atan2")
    pub name: &'static str,

    /// Acceptable argument count (arity)
    pub arity: RangeInclusive<usize>,

    /// Numerical evaluation function; `None` means the arguments are outside
    /// the function's real domain
    pub eval: fn(&[f64]) -> Option<f64>,

    /// Symbolic differentiation function
    /// Arguments: (args of the function call, derivatives of the arguments)
    /// Returns the total derivative dA/dx = sum( (dA/d_arg_i) * (d_arg_i/dx) )
    pub derivative: fn(&[Expr], &[Expr]) -> Expr,
}

impl FunctionDefinition {
    /// Helper to check if argument count is valid
    pub(crate) fn validate_arity(&self, args: usize) -> bool {
        self.arity.contains(&args)
    }

    /// Human-readable arity for error messages
    pub(crate) fn arity_description(&self) -> String {
        if self.arity.start() == self.arity.end() {
            format!("{}", self.arity.start())
        } else {
            format!("{} to {}", self.arity.start(), self.arity.end())
        }
    }
}

/// Static registry storing all function definitions
static REGISTRY: OnceLock<FxHashMap<&'static str, FunctionDefinition>> = OnceLock::new();

/// Initialize the registry with all function definitions
fn init_registry() -> FxHashMap<&'static str, FunctionDefinition> {
    let defs = crate::functions::definitions::all_definitions();
    let mut map = FxHashMap::with_capacity_and_hasher(defs.len(), Default::default());

    for def in defs {
        map.insert(def.name, def);
    }

    map
}

/// Central registry for getting function definitions
pub(crate) struct Registry;

impl Registry {
    /// Get a function definition by name - O(1) HashMap lookup
    pub(crate) fn get(name: &str) -> Option<&'static FunctionDefinition> {
        REGISTRY.get_or_init(init_registry).get(name)
    }
}

/// Whether `name` is an allow-listed function
pub fn is_allowed_function(name: &str) -> bool {
    Registry::get(name).is_some()
}

/// All allow-listed function names, sorted
pub fn function_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = REGISTRY
        .get_or_init(init_registry)
        .keys()
        .copied()
        .collect();
    names.sort_unstable();
    names
}

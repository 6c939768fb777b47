pub mod complex;
pub mod math;

use crate::ast::{Number, Real};
use num_complex::Complex;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

pub type Function<N> = Arc<dyn Fn(N) -> N + Send + Sync>;

/// Unary functions an expression may call, looked up by name at compile time.
#[derive(Clone)]
pub struct FunctionTable<N> {
    functions: HashMap<String, Function<N>>,
}

impl<N> Default for FunctionTable<N> {
    fn default() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }
}

impl<N: Number> FunctionTable<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `function` under `name`, replacing any previous entry.
    pub fn register_function<F>(&mut self, name: &str, function: F)
    where
        F: Fn(N) -> N + Send + Sync + 'static,
    {
        self.functions.insert(name.to_string(), Arc::new(function));
    }

    pub fn get(&self, name: &str) -> Option<&Function<N>> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl<N> fmt::Debug for FunctionTable<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.functions.keys().collect();
        names.sort();
        f.debug_set().entries(names).finish()
    }
}

pub fn register_functions<N: Real>(table: &mut FunctionTable<N>) {
    math::register(table);
}

/// Builds the default table: `sqr`, `sin`, `cos`, `exp`, `log` and `sqrt`.
pub fn default_functions<N: Real>() -> FunctionTable<N> {
    let mut table = FunctionTable::new();
    register_functions(&mut table);
    table
}

/// Builds the table for domains without transcendental functions, such as
/// integers: just `sqr`.
pub fn arithmetic_functions<N: Number>() -> FunctionTable<N> {
    let mut table = FunctionTable::new();
    math::register_arithmetic(&mut table);
    table
}

/// The default table over complex numbers.
pub fn complex_functions<T: Real>() -> FunctionTable<Complex<T>> {
    let mut table = FunctionTable::new();
    complex::register(&mut table);
    table
}

pub static DEFAULT_FUNCTIONS: LazyLock<FunctionTable<f64>> = LazyLock::new(default_functions::<f64>);

use crate::ast::{strip_whitespace, CompiledExpression, ConstantTable, Number};
use crate::error::Result;
use crate::functions::FunctionTable;
use log::debug;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Keeps the most recently used compiled expressions, keyed by their text.
pub struct ExpressionCache<N: Number = f64> {
    functions: FunctionTable<N>,
    constants: ConstantTable<N>,
    optimize: bool,
    entries: LruCache<String, CompiledExpression<N>>,
}

impl<N: Number> ExpressionCache<N> {
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize, functions: FunctionTable<N>, constants: ConstantTable<N>) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            functions,
            constants,
            optimize: false,
            entries: LruCache::new(capacity),
        }
    }

    /// Optimize expressions as they are compiled.
    pub fn with_optimization(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    /// Returns the compiled form of `expression`, compiling it on a miss.
    ///
    /// Whitespace is stripped first, so `"x + 1"` and `"x+1"` share an entry.
    /// Failed compilations are not cached.
    pub fn get_or_compile(&mut self, expression: &str) -> Result<&mut CompiledExpression<N>> {
        let key = strip_whitespace(expression);
        let (functions, constants, optimize) = (&self.functions, &self.constants, self.optimize);
        self.entries.try_get_or_insert_mut_ref(key.as_str(), || {
            debug!("Cache miss: {}", key);
            let mut compiled = CompiledExpression::compile(&key, functions, constants)?;
            if optimize {
                compiled.optimize();
            }
            Ok(compiled)
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

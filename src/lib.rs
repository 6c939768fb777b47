pub mod ast;
pub mod cache;
pub mod error;
pub mod functions;

pub use ast::{CompiledExpression, ConstantTable, Node, NodeKind, Number, Real};
pub use cache::ExpressionCache;
pub use error::{CalcError, Result};
pub use functions::{
    arithmetic_functions, complex_functions, default_functions, FunctionTable, DEFAULT_FUNCTIONS,
};

use std::collections::HashMap;

/// Compiles and evaluates `expression` in one go with the default functions.
///
/// Whitespace is stripped before compiling. Every variable of the expression
/// must be present in `context`.
pub fn evaluate_expression(expression: &str, context: &HashMap<String, f64>) -> Result<f64> {
    let expression = ast::strip_whitespace(expression);
    let mut compiled = CompiledExpression::compile_default(&expression)?;
    compiled.set_variables(context)?;
    compiled.evaluate()
}

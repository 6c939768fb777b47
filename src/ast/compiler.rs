use crate::ast::{
    is_numeric_literal, scan_number, CompiledExpression, ConstantTable, Node, Number, VariableTable,
};
use crate::error::{CalcError, Result};
use crate::functions::FunctionTable;
use log::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chain {
    Sum,
    Product,
}

impl Chain {
    fn inverse_operator(self) -> u8 {
        match self {
            Chain::Sum => b'-',
            Chain::Product => b'/',
        }
    }
}

/// Top-level operator positions of one expression level.
#[derive(Debug, Default)]
struct Split {
    additive: Vec<usize>,
    multiplicative: Vec<usize>,
}

/// Scans `expression` once, recording `+ - * /` outside parentheses.
fn split_operators(expression: &str) -> Result<Split> {
    let mut split = Split::default();
    let mut depth = 0usize;

    for (i, byte) in expression.bytes().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| CalcError::bad_expression(expression))?;
            }
            b'+' | b'-' if depth == 0 => split.additive.push(i),
            b'*' | b'/' if depth == 0 => split.multiplicative.push(i),
            _ => {}
        }
    }

    if depth != 0 {
        return Err(CalcError::bad_expression(expression));
    }
    Ok(split)
}

/// Index of the `)` closing the `(` at `open`.
fn matching_close(expression: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, byte) in expression.bytes().enumerate().skip(open) {
        match byte {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Builds an expression tree from whitespace-free text.
///
/// Each level is split at its top-level additive operators, or failing that
/// its multiplicative ones, and every segment is compiled recursively. A
/// level with no top-level operator is a parenthesized group, a function
/// call, a number, a constant or a variable, tried in that order.
pub struct Compiler<'a, N: Number> {
    functions: &'a FunctionTable<N>,
    constants: &'a ConstantTable<N>,
    variables: VariableTable<N>,
}

impl<'a, N: Number> Compiler<'a, N> {
    fn new(functions: &'a FunctionTable<N>, constants: &'a ConstantTable<N>) -> Self {
        Self {
            functions,
            constants,
            variables: VariableTable::new(),
        }
    }

    pub fn compile(
        expression: &str,
        functions: &'a FunctionTable<N>,
        constants: &'a ConstantTable<N>,
    ) -> Result<CompiledExpression<N>> {
        debug!("Compiling expression: {}", expression);
        let mut compiler = Self::new(functions, constants);
        let root = compiler.build(expression)?;
        debug!(
            "Compiled into {} nodes with {} variables",
            root.size(),
            compiler.variables.len()
        );
        Ok(CompiledExpression::new(root, compiler.variables))
    }

    fn build(&mut self, expression: &str) -> Result<Node<N>> {
        trace!("Building: {}", expression);
        if expression.is_empty() {
            return Err(CalcError::bad_expression(expression));
        }

        let split = split_operators(expression)?;
        if !split.additive.is_empty() {
            return self.build_chain(expression, &split.additive, Chain::Sum);
        }
        if !split.multiplicative.is_empty() {
            return self.build_chain(expression, &split.multiplicative, Chain::Product);
        }
        self.build_primary(expression)
    }

    fn build_chain(&mut self, expression: &str, operators: &[usize], chain: Chain) -> Result<Node<N>> {
        let bytes = expression.as_bytes();
        let mut children = Vec::with_capacity(operators.len() + 1);
        let mut start = 0;
        let mut inverted = false;

        for &end in operators.iter().chain(std::iter::once(&expression.len())) {
            let segment = &expression[start..end];
            let child = if !segment.is_empty() {
                self.build(segment)?
            } else if start == 0 && chain == Chain::Sum {
                // leading sign: "-x" is "0-x"
                Node::literal(N::zero())
            } else {
                return Err(CalcError::bad_expression(expression));
            };
            children.push(child.inverted(inverted));

            if end < bytes.len() {
                inverted = bytes[end] == chain.inverse_operator();
                start = end + 1;
            }
        }

        Ok(match chain {
            Chain::Sum => Node::sum(children),
            Chain::Product => Node::product(children),
        })
    }

    fn build_primary(&mut self, expression: &str) -> Result<Node<N>> {
        if !expression.ends_with(')') {
            return self.build_value(expression);
        }

        let last = expression.len() - 1;
        if expression.starts_with('(') && matching_close(expression, 0) == Some(last) {
            let inner = &expression[1..last];
            if inner.is_empty() {
                return Err(CalcError::bad_expression(expression));
            }
            return self.build(inner);
        }
        self.build_call(expression)
    }

    fn build_call(&mut self, expression: &str) -> Result<Node<N>> {
        let last = expression.len() - 1;
        let open = expression
            .find('(')
            .ok_or_else(|| CalcError::bad_expression(expression))?;
        let name = &expression[..open];
        if name.is_empty() || matching_close(expression, open) != Some(last) {
            return Err(CalcError::bad_expression(expression));
        }

        let function = self
            .functions
            .get(name)
            .ok_or_else(|| CalcError::UnknownFunction(name.to_string()))?
            .clone();

        let argument = &expression[open + 1..last];
        if argument.is_empty() {
            return Err(CalcError::bad_expression(expression));
        }
        let argument = self.build(argument)?;
        Ok(Node::call(name, function, argument))
    }

    fn build_value(&mut self, token: &str) -> Result<Node<N>> {
        if token.contains(['(', ')']) {
            return Err(CalcError::bad_expression(token));
        }
        if is_numeric_literal(token) {
            // "2.5" has no integer reading
            return scan_number(token)
                .map(Node::literal)
                .ok_or_else(|| CalcError::bad_expression(token));
        }
        if let Some(&value) = self.constants.get(token) {
            return Ok(Node::literal(value));
        }
        Ok(Node::variable(self.variables.intern(token)))
    }
}

use crate::ast::{Node, NodeKind, Number, VariableTable};
use crate::error::Result;

/// Walks a tree, reading variables from slot values.
pub struct Evaluator<'a, N> {
    variables: &'a VariableTable<N>,
    values: &'a [Option<N>],
}

impl<'a, N: Number> Evaluator<'a, N> {
    /// Reads the values bound in `variables` itself.
    pub fn new(variables: &'a VariableTable<N>) -> Self {
        Self::with_values(variables, variables.values())
    }

    /// Reads `values`, as returned by [`VariableTable::resolve`]. The table
    /// only supplies names for errors.
    pub fn with_values(variables: &'a VariableTable<N>, values: &'a [Option<N>]) -> Self {
        Self { variables, values }
    }

    pub fn evaluate(&self, node: &Node<N>) -> Result<N> {
        match &node.kind {
            NodeKind::Sum(children) => children.iter().try_fold(N::zero(), |acc, child| {
                let value = self.evaluate(child)?;
                Ok(if child.inverted { acc - value } else { acc + value })
            }),
            // Division by zero is left to N.
            NodeKind::Product(children) => children.iter().try_fold(N::one(), |acc, child| {
                let value = self.evaluate(child)?;
                Ok(if child.inverted { acc / value } else { acc * value })
            }),
            NodeKind::FunctionCall {
                function, argument, ..
            } => Ok(function(self.evaluate(argument)?)),
            NodeKind::Literal(value) => Ok(*value),
            NodeKind::VariableRef(index) => self.variables.read_slot(self.values, *index),
        }
    }
}

use crate::functions::Function;
use std::collections::HashMap;
use std::fmt;

mod compiler;
mod evaluator;
mod expression;
mod normalize;
mod number;
mod optimizer;
mod variables;

pub use compiler::Compiler;
pub use evaluator::Evaluator;
pub use expression::CompiledExpression;
pub use normalize::{strip_chars, strip_whitespace};
pub use number::{is_numeric_literal, scan_number, Number, Real};
pub use optimizer::optimize;
pub use variables::VariableTable;

/// Named values substituted as literals during compilation.
pub type ConstantTable<N> = HashMap<String, N>;

#[derive(Clone)]
pub enum NodeKind<N> {
    /// Children are added, or subtracted when `inverted`.
    Sum(Vec<Node<N>>),
    /// Children are multiplied, or divided by when `inverted`.
    Product(Vec<Node<N>>),
    FunctionCall {
        name: String,
        function: Function<N>,
        argument: Box<Node<N>>,
    },
    Literal(N),
    /// Slot in the owning expression's variable table.
    VariableRef(usize),
}

#[derive(Clone, PartialEq)]
pub struct Node<N> {
    pub kind: NodeKind<N>,
    /// Only meaningful for children of `Sum` and `Product`.
    pub inverted: bool,
    /// Set by the optimizer; literals start out constant.
    pub constant: bool,
}

impl<N: Number> Node<N> {
    fn with_kind(kind: NodeKind<N>) -> Self {
        Self {
            kind,
            inverted: false,
            constant: false,
        }
    }

    pub fn literal(value: N) -> Self {
        Self {
            constant: true,
            ..Self::with_kind(NodeKind::Literal(value))
        }
    }

    pub fn variable(index: usize) -> Self {
        Self::with_kind(NodeKind::VariableRef(index))
    }

    pub fn sum(children: Vec<Node<N>>) -> Self {
        Self::with_kind(NodeKind::Sum(children))
    }

    pub fn product(children: Vec<Node<N>>) -> Self {
        Self::with_kind(NodeKind::Product(children))
    }

    pub fn call(name: &str, function: Function<N>, argument: Node<N>) -> Self {
        Self::with_kind(NodeKind::FunctionCall {
            name: name.to_string(),
            function,
            argument: Box::new(argument),
        })
    }

    pub fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    pub fn as_literal(&self) -> Option<N> {
        match self.kind {
            NodeKind::Literal(value) => Some(value),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Node<N>] {
        match &self.kind {
            NodeKind::Sum(children) | NodeKind::Product(children) => children,
            NodeKind::FunctionCall { argument, .. } => std::slice::from_ref(argument.as_ref()),
            NodeKind::Literal(_) | NodeKind::VariableRef(_) => &[],
        }
    }

    /// Number of nodes in this subtree, itself included.
    pub fn size(&self) -> usize {
        1 + self.children().iter().map(Node::size).sum::<usize>()
    }
}

// Functions compare by name: two calls resolved from the same table are equal.
impl<N: PartialEq> PartialEq for NodeKind<N> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NodeKind::Sum(a), NodeKind::Sum(b)) => a == b,
            (NodeKind::Product(a), NodeKind::Product(b)) => a == b,
            (
                NodeKind::FunctionCall { name, argument, .. },
                NodeKind::FunctionCall {
                    name: other_name,
                    argument: other_argument,
                    ..
                },
            ) => name == other_name && argument == other_argument,
            (NodeKind::Literal(a), NodeKind::Literal(b)) => a == b,
            (NodeKind::VariableRef(a), NodeKind::VariableRef(b)) => a == b,
            _ => false,
        }
    }
}

impl<N: fmt::Debug> fmt::Debug for NodeKind<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Sum(children) => f.debug_tuple("Sum").field(children).finish(),
            NodeKind::Product(children) => f.debug_tuple("Product").field(children).finish(),
            NodeKind::FunctionCall { name, argument, .. } => f
                .debug_struct("FunctionCall")
                .field("name", name)
                .field("argument", argument)
                .finish(),
            NodeKind::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            NodeKind::VariableRef(index) => f.debug_tuple("VariableRef").field(index).finish(),
        }
    }
}

impl<N: fmt::Debug> fmt::Debug for Node<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverted {
            write!(f, "~")?;
        }
        if self.constant {
            write!(f, "#")?;
        }
        fmt::Debug::fmt(&self.kind, f)
    }
}

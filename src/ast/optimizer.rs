use crate::ast::{Evaluator, Node, NodeKind, Number, VariableTable};
use log::trace;
use std::mem;

/// Folds constant subtrees in place.
///
/// Children of sums and products are stably partitioned so that variable
/// children keep their relative order and constants move to the end. A node
/// whose children are all constant becomes a literal; two or more trailing
/// constants are folded into a single literal child. Running it again on its
/// own output changes nothing.
pub fn optimize<N: Number>(node: &mut Node<N>) {
    match &mut node.kind {
        NodeKind::Literal(_) => node.constant = true,
        NodeKind::VariableRef(_) => node.constant = false,
        NodeKind::FunctionCall { argument, .. } => {
            optimize(argument);
            if argument.constant {
                fold(node);
            }
        }
        NodeKind::Sum(children) | NodeKind::Product(children) => {
            children.iter_mut().for_each(optimize);
            let (mut variable, constant): (Vec<_>, Vec<_>) =
                mem::take(children).into_iter().partition(|child| !child.constant);

            if variable.is_empty() {
                *children = constant;
                fold(node);
                return;
            }

            if constant.len() > 1 {
                let suffix = match node.kind {
                    NodeKind::Sum(_) => Node::sum(constant),
                    _ => Node::product(constant),
                };
                match constant_value(&suffix) {
                    Some(value) => variable.push(Node::literal(value)),
                    None => variable.extend(suffix.children().iter().cloned()),
                }
            } else {
                variable.extend(constant);
            }

            node.constant = false;
            if let NodeKind::Sum(children) | NodeKind::Product(children) = &mut node.kind {
                *children = variable;
            }
        }
    }
}

fn constant_value<N: Number>(node: &Node<N>) -> Option<N> {
    Evaluator::new(&VariableTable::new()).evaluate(node).ok()
}

/// Replaces `node` by its value, keeping its inversion flag.
fn fold<N: Number>(node: &mut Node<N>) {
    if let Some(value) = constant_value(node) {
        trace!("Folded {:?} into {:?}", node, value);
        node.kind = NodeKind::Literal(value);
        node.constant = true;
    }
}

use crate::ast::{Number, Real};
use crate::functions::FunctionTable;

/// Functions every numeric domain supports.
pub fn register_arithmetic<N: Number>(table: &mut FunctionTable<N>) {
    table.register_function("sqr", sqr);
}

pub fn register<N: Real>(table: &mut FunctionTable<N>) {
    register_arithmetic(table);
    table.register_function("sin", N::sin);
    table.register_function("cos", N::cos);
    table.register_function("exp", N::exp);
    table.register_function("log", N::ln);
    table.register_function("sqrt", N::sqrt);
}

pub fn sqr<N: Number>(x: N) -> N {
    x * x
}

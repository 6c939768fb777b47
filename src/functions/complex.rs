use crate::ast::Real;
use crate::functions::{math, FunctionTable};
use num_complex::Complex;

/// Registers the math table over complex numbers. `log` and `sqrt` take the
/// principal branch.
pub fn register<T: Real>(table: &mut FunctionTable<Complex<T>>) {
    math::register_arithmetic(table);
    table.register_function("sin", |z: Complex<T>| z.sin());
    table.register_function("cos", |z: Complex<T>| z.cos());
    table.register_function("exp", |z: Complex<T>| z.exp());
    table.register_function("log", |z: Complex<T>| z.ln());
    table.register_function("sqrt", |z: Complex<T>| z.sqrt());
}

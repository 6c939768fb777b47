use crate::ast::{optimize, Compiler, ConstantTable, Evaluator, Node, Number, VariableTable};
use crate::error::Result;
use crate::functions::{FunctionTable, DEFAULT_FUNCTIONS};
use log::debug;
use rayon::prelude::*;
use std::collections::HashMap;

/// A compiled expression: its tree plus the variables it references.
///
/// Compile once, then bind variables and evaluate as often as needed.
#[derive(Debug, Clone)]
pub struct CompiledExpression<N = f64> {
    root: Node<N>,
    variables: VariableTable<N>,
}

impl<N: Number> CompiledExpression<N> {
    pub(crate) fn new(root: Node<N>, variables: VariableTable<N>) -> Self {
        Self { root, variables }
    }

    /// Compiles whitespace-free `expression`.
    ///
    /// Names found in `constants` become literals; any other name that is
    /// not a number becomes a variable.
    pub fn compile(
        expression: &str,
        functions: &FunctionTable<N>,
        constants: &ConstantTable<N>,
    ) -> Result<Self> {
        Compiler::compile(expression, functions, constants)
    }

    pub fn root(&self) -> &Node<N> {
        &self.root
    }

    pub fn variables(&self) -> &VariableTable<N> {
        &self.variables
    }

    /// Variable names in order of first appearance.
    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.names()
    }

    /// Folds constant subtrees. Calling it again is a no-op.
    pub fn optimize(&mut self) {
        let before = self.root.size();
        optimize(&mut self.root);
        debug!("Optimized {} nodes down to {}", before, self.root.size());
    }

    pub fn set_variable(&mut self, name: &str, value: N) {
        self.variables.bind(name, value);
    }

    /// Binds every variable of the expression from `bindings`.
    ///
    /// Fails, binding nothing, if one of them is missing.
    pub fn set_variables(&mut self, bindings: &HashMap<String, N>) -> Result<()> {
        self.variables.bind_all(bindings)
    }

    pub fn clear_variables(&mut self) {
        self.variables.clear_all();
    }

    pub fn evaluate(&self) -> Result<N> {
        self.variables.ensure_bound()?;
        Evaluator::new(&self.variables).evaluate(&self.root)
    }

    /// Evaluates against `bindings` without touching the stored bindings.
    pub fn evaluate_with(&self, bindings: &HashMap<String, N>) -> Result<N> {
        let values = self.variables.resolve(bindings)?;
        Evaluator::with_values(&self.variables, &values).evaluate(&self.root)
    }

    /// Evaluates each binding set in parallel, in input order.
    pub fn evaluate_batch(&self, bindings: &[HashMap<String, N>]) -> Vec<Result<N>> {
        debug!("Evaluating batch of {}", bindings.len());
        bindings
            .par_iter()
            .map(|set| self.evaluate_with(set))
            .collect()
    }
}

impl CompiledExpression<f64> {
    /// Compiles with the default function table and no constants.
    pub fn compile_default(expression: &str) -> Result<Self> {
        Self::compile(expression, &DEFAULT_FUNCTIONS, &ConstantTable::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalcError;
    use crate::functions::{arithmetic_functions, complex_functions, default_functions};
    use num_complex::Complex64;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const TOLERANCE: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= TOLERANCE * expected.abs().max(1.0),
            "{} != {}",
            actual,
            expected
        );
    }

    fn eval(expression: &str) -> f64 {
        CompiledExpression::compile_default(expression)
            .unwrap()
            .evaluate()
            .unwrap()
    }

    fn bindings(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("3+5*4+7"), 30.0);
        assert_close(eval("3-6/5"), 1.8);
        assert_eq!(eval("5+10-8+15+3+2+8-7-5-6-3+4+3*5*1*6/2/3"), 33.0);
    }

    #[test]
    fn test_parenthesized_groups() {
        assert_eq!(eval("(5)*(6)"), 30.0);
        assert_eq!(eval("((2+3)*(4-1))/5"), 3.0);
        assert_eq!(eval("2*(3+4*(1+1))"), 22.0);
    }

    #[test]
    fn test_decimal_separators() {
        assert_eq!(eval("1.5+2,5"), 4.0);
    }

    #[test]
    fn test_unary_minus_with_constant() {
        let constants = ConstantTable::from([("a".to_string(), 3.0)]);
        let compile = |expression| {
            CompiledExpression::compile(expression, &DEFAULT_FUNCTIONS, &constants).unwrap()
        };
        assert_eq!(compile("-a").evaluate(), Ok(-3.0));
        assert_eq!(compile("5*(-a)").evaluate(), Ok(-15.0));
        assert!(compile("-a").variables().is_empty());
    }

    #[test]
    fn test_functions_with_variables() {
        let mut compiled = CompiledExpression::compile_default("sin(x)*sin(x)+cos(x)*cos(x)").unwrap();
        compiled.set_variable("x", 5.0);
        assert_close(compiled.evaluate().unwrap(), 1.0);

        assert_close(eval("exp(1)"), std::f64::consts::E);
        assert_eq!(eval("sqrt(sqr(3)+sqr(4))"), 5.0);
    }

    #[test]
    fn test_nested_negations() {
        let mut compiled = CompiledExpression::compile_default("-(-1*9-5*(4+3*(4+8))/(-4*y))").unwrap();
        compiled.set_variables(&bindings(&[("y", 3.0), ("x", 5.0)])).unwrap();
        assert_close(compiled.evaluate().unwrap(), -7.666666666666667);
    }

    #[test]
    fn test_rebinding_between_evaluations() {
        let mut compiled = CompiledExpression::compile_default("x*x+y").unwrap();
        compiled.set_variables(&bindings(&[("x", 2.0), ("y", 1.0)])).unwrap();
        assert_eq!(compiled.evaluate(), Ok(5.0));
        compiled.set_variable("x", 3.0);
        assert_eq!(compiled.evaluate(), Ok(10.0));
        compiled.set_variable("unused", 100.0);
        assert_eq!(compiled.evaluate(), Ok(10.0));
    }

    #[test]
    fn test_unbound_variable_is_named() {
        let mut compiled = CompiledExpression::compile_default("x+y").unwrap();
        compiled.set_variable("x", 1.0);
        assert_eq!(
            compiled.evaluate(),
            Err(CalcError::UnknownVariable("y".into()))
        );

        compiled.set_variable("y", 1.0);
        assert_eq!(compiled.evaluate(), Ok(2.0));
        compiled.clear_variables();
        assert_eq!(
            compiled.evaluate(),
            Err(CalcError::UnknownVariable("x".into()))
        );
    }

    #[test]
    fn test_set_variables_missing_entry_binds_nothing() {
        let mut compiled = CompiledExpression::compile_default("x+y").unwrap();
        assert_eq!(
            compiled.set_variables(&bindings(&[("x", 1.0)])),
            Err(CalcError::UnknownVariable("y".into()))
        );
        compiled.set_variable("y", 1.0);
        assert_eq!(
            compiled.evaluate(),
            Err(CalcError::UnknownVariable("x".into()))
        );
    }

    #[test]
    fn test_division_by_zero_follows_floats() {
        let mut compiled = CompiledExpression::compile_default("1/x").unwrap();
        compiled.set_variable("x", 0.0);
        assert_eq!(compiled.evaluate(), Ok(f64::INFINITY));
        assert!(eval("0/0").is_nan());
    }

    #[test]
    fn test_optimized_matches_unoptimized() {
        let expressions = [
            "x+(2*3)+5",
            "10-x-4-y+1",
            "8/x/2*3*y",
            "-(-1*9-5*(4+3*(4+8))/(-4*y))",
            "sin(x)*sin(x)+cos(x)*cos(x)+sqr(2)",
            "exp(1)*x/(3-y)+log(10)-sqrt(x*y)",
            "2*x*3/y/4+exp(1)-x",
        ];
        let mut rng = StdRng::seed_from_u64(7);

        for expression in expressions {
            let plain = CompiledExpression::compile_default(expression).unwrap();
            let mut folded = plain.clone();
            folded.optimize();
            assert!(folded.root().size() <= plain.root().size());

            for _ in 0..50 {
                let set = bindings(&[
                    ("x", rng.random_range(0.1..10.0)),
                    ("y", rng.random_range(3.5..10.0)),
                ]);
                let expected = plain.evaluate_with(&set).unwrap();
                assert_close(folded.evaluate_with(&set).unwrap(), expected);
                assert_eq!(plain.evaluate_with(&set).unwrap(), expected);
            }
        }
    }

    #[test]
    fn test_evaluate_with_leaves_bindings_alone() {
        let compiled = CompiledExpression::compile_default("x*2").unwrap();
        assert_eq!(compiled.evaluate_with(&bindings(&[("x", 4.0)])), Ok(8.0));
        assert_eq!(
            compiled.evaluate(),
            Err(CalcError::UnknownVariable("x".into()))
        );
    }

    #[test]
    fn test_evaluate_batch_keeps_order() {
        let compiled = CompiledExpression::compile_default("a*10+b").unwrap();
        let sets: Vec<_> = (0..100)
            .map(|i| bindings(&[("a", i as f64), ("b", 1.0)]))
            .collect();

        let results = compiled.evaluate_batch(&sets);
        assert_eq!(results.len(), 100);
        for (i, result) in results.into_iter().enumerate() {
            assert_eq!(result, Ok(i as f64 * 10.0 + 1.0));
        }

        let missing = compiled.evaluate_batch(&[bindings(&[("a", 1.0)])]);
        assert_eq!(missing, vec![Err(CalcError::UnknownVariable("b".into()))]);
    }

    #[test]
    fn test_independent_units_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                std::thread::spawn(move || {
                    let mut compiled = CompiledExpression::compile_default("x*x").unwrap();
                    compiled.set_variable("x", i as f64);
                    compiled.evaluate().unwrap()
                })
            })
            .collect();
        let results: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, vec![0.0, 1.0, 4.0, 9.0]);
    }

    #[test]
    fn test_single_precision() {
        let functions = default_functions::<f32>();
        let mut compiled =
            CompiledExpression::<f32>::compile("sqr(x)/2", &functions, &ConstantTable::new()).unwrap();
        compiled.set_variable("x", 3.0);
        assert_eq!(compiled.evaluate(), Ok(4.5f32));
    }

    #[test]
    fn test_custom_function_table() {
        let mut functions = FunctionTable::new();
        functions.register_function("double", |x: f64| x * 2.0);

        let compiled =
            CompiledExpression::compile("double(double(3))", &functions, &ConstantTable::new()).unwrap();
        assert_eq!(compiled.evaluate(), Ok(12.0));
        assert_eq!(
            CompiledExpression::compile("sin(1)", &functions, &ConstantTable::new()).unwrap_err(),
            CalcError::UnknownFunction("sin".into())
        );
    }

    #[test]
    fn test_integer_domain() {
        let functions = arithmetic_functions::<i64>();
        let mut compiled =
            CompiledExpression::<i64>::compile("7/2*x-sqr(3)", &functions, &ConstantTable::new()).unwrap();
        compiled.set_variable("x", 4);
        assert_eq!(compiled.evaluate(), Ok(3));
        assert_eq!(
            compiled.evaluate_with(&HashMap::from([("x".to_string(), -1)])),
            Ok(-12)
        );

        compiled.optimize();
        assert_eq!(compiled.evaluate(), Ok(3));
    }

    #[test]
    fn test_integer_domain_has_no_transcendentals() {
        let functions = arithmetic_functions::<i64>();
        assert_eq!(
            CompiledExpression::<i64>::compile("sqrt(4)", &functions, &ConstantTable::new()).unwrap_err(),
            CalcError::UnknownFunction("sqrt".into())
        );
    }

    #[test]
    #[should_panic]
    fn test_integer_division_by_zero_panics() {
        let functions = arithmetic_functions::<i64>();
        let mut compiled =
            CompiledExpression::<i64>::compile("10/x", &functions, &ConstantTable::new()).unwrap();
        compiled.set_variable("x", 0);
        let _ = compiled.evaluate();
    }

    #[test]
    fn test_complex_domain() {
        let functions = complex_functions::<f64>();
        let constants = ConstantTable::from([
            ("i".to_string(), Complex64::i()),
            ("pi".to_string(), Complex64::new(std::f64::consts::PI, 0.0)),
        ]);
        let compile = |expression| {
            CompiledExpression::<Complex64>::compile(expression, &functions, &constants).unwrap()
        };

        assert_eq!(compile("sqr(i)+1").evaluate(), Ok(Complex64::new(0.0, 0.0)));
        assert_eq!(compile("(1+i)*(1-i)").evaluate(), Ok(Complex64::new(2.0, 0.0)));
        assert!(compile("exp(i*pi)+1").evaluate().unwrap().norm() < 1e-12);

        let mut compiled = compile("z*i");
        compiled.set_variable("z", Complex64::new(2.0, 3.0));
        assert_eq!(compiled.evaluate(), Ok(Complex64::new(-3.0, 2.0)));
    }
}

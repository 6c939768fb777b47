use calctree::ast::strip_whitespace;
use calctree::CompiledExpression;
use log::debug;

fn main() {
    pretty_env_logger::init();

    let expression = strip_whitespace("3 + 5 * 4 + 7");
    let compiled = CompiledExpression::compile_default(&expression).expect("Failed to compile");
    debug!("tree: {:?}", compiled.root());

    match compiled.evaluate() {
        Ok(result) => println!("{} = {}", expression, result),
        Err(err) => println!("Error: {}", err),
    }

    for bad in ["3 +", "foo(1)", "x * 2"] {
        let text = strip_whitespace(bad);
        let outcome = CompiledExpression::compile_default(&text).and_then(|c| c.evaluate());
        println!("{} -> {:?}", bad, outcome);
    }
}

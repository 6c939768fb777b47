use calctree::{CompiledExpression, ConstantTable, ExpressionCache};
use calctree::functions::default_functions;

fn main() {
    pretty_env_logger::init();

    let mut functions = default_functions::<f64>();
    functions.register_function("deg", |x| x.to_radians());
    let constants = ConstantTable::from([
        ("pi".to_string(), std::f64::consts::PI),
        ("g".to_string(), 9.81),
    ]);

    let mut compiled = CompiledExpression::compile("sin(deg(angle))*g*2/pi", &functions, &constants)
        .expect("Failed to compile");
    println!("before optimize: {:?}", compiled.root());
    compiled.optimize();
    println!("after optimize: {:?}", compiled.root());

    for angle in [0.0, 30.0, 90.0] {
        compiled.set_variable("angle", angle);
        println!("angle={} -> {:?}", angle, compiled.evaluate());
    }

    let mut cache = ExpressionCache::new(16, functions, constants).with_optimization(true);
    for _ in 0..3 {
        let compiled = cache.get_or_compile("g * t * t / 2").expect("Failed to compile");
        compiled.set_variable("t", 2.0);
        println!("fall distance: {:?}", compiled.evaluate());
    }
    println!("cached expressions: {}", cache.len());
}

use calctree::CompiledExpression;
use std::collections::HashMap;

fn main() {
    pretty_env_logger::init();

    let contexts = vec![
        HashMap::from([("price".to_string(), 120.0), ("volume".to_string(), 3000.0)]),
        HashMap::from([("price".to_string(), 80.0), ("volume".to_string(), 6000.0)]),
        HashMap::from([("price".to_string(), 95.5)]),
    ];

    let mut compiled =
        CompiledExpression::compile_default("price*volume/1000-log(volume)").unwrap();
    compiled.optimize();

    for (i, result) in compiled.evaluate_batch(&contexts).into_iter().enumerate() {
        println!("Result {}: {:?}", i, result);
    }
}

//! Generate a few ObjectMeta records with the safe fuzzer functions
//!
//! Usage:
//!   fuzz_object_meta [seed] [count]
//!
//! Example:
//!   fuzz_object_meta 42 3

use meta_fuzzer::{metafuzzer, safe_fuzzer_funcs, CodecFactory, Fuzzer, FuzzerConfig, ObjectMeta};
use std::env;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(42);
    let count = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(3);

    let codecs = CodecFactory::default();
    let funcs = safe_fuzzer_funcs(vec![Some(metafuzzer::funcs())]);

    let mut fuzzer = match Fuzzer::new(&FuzzerConfig::new().with_seed(seed)) {
        Ok(fuzzer) => fuzzer.with_funcs(&codecs, &funcs),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    for i in 0..count {
        let meta: ObjectMeta = fuzzer.generate();
        println!("=== Record {} ===", i);
        match serde_json::to_string_pretty(&meta) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Serialization error: {}", e),
        }
    }
}

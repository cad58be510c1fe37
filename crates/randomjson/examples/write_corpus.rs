//! Writes a small fuzzing corpus: for each seed, the generated document and a
//! few mutated variants of it.
//!
//! ```text
//! cargo run --example write_corpus -- <dir> [count] [size]
//! ```
#![allow(missing_docs)]

use std::{env, fs, path::PathBuf};

use randomjson::{Document, GeneratorOptions};

const VARIANTS: usize = 4;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let dir = PathBuf::from(args.next().unwrap_or_else(|| "corpus".into()));
    let count: u64 = args.next().map_or(Ok(16), |s| s.parse())?;
    let size: usize = args.next().map_or(Ok(256), |s| s.parse())?;
    fs::create_dir_all(&dir)?;

    for seed in 0..count {
        let options = GeneratorOptions::sized(size, seed).with_mutation_seed(seed);
        let mut doc = Document::new(options)?;
        doc.save(dir.join(format!("seed-{seed:04}.json")))?;

        for variant in 0..VARIANTS {
            let mutation = doc.mutate();
            doc.save(dir.join(format!("seed-{seed:04}-m{variant}.json")))?;
            println!("seed {seed} variant {variant}: {mutation:?}");
        }
    }
    println!("wrote {} files to {}", count as usize * (VARIANTS + 1), dir.display());
    Ok(())
}

#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use randomjson::{Document, GeneratorOptions, Mutation};

#[derive(Debug, Arbitrary)]
enum Step {
    Mutate,
    Structure,
    Bytes(u8),
    Revert,
}

#[derive(Debug, Arbitrary)]
enum Source {
    Generated { size: u16, seed: u64 },
    Raw(Vec<u8>),
}

#[derive(Debug, Arbitrary)]
struct Input {
    source: Source,
    mutation_seed: u64,
    max_depth: u8,
    steps: Vec<Step>,
}

fn run(input: Input) {
    let options = GeneratorOptions {
        mutation_seed: input.mutation_seed,
        max_depth: 1 + usize::from(input.max_depth),
        ..Default::default()
    };
    let doc = match input.source {
        Source::Generated { size, seed } => Document::new(GeneratorOptions {
            size: 2 + usize::from(size),
            generation_seed: seed,
            ..options
        }),
        Source::Raw(bytes) => Document::from_bytes(options, bytes),
    };
    let mut doc = doc.expect("options are in range");
    let len = doc.len();

    for step in input.steps {
        let before = doc.as_bytes().to_vec();
        let mutation = match step {
            Step::Mutate => doc.mutate(),
            Step::Structure => doc.mutate_structure(),
            Step::Bytes(count) => doc.mutate_bytes(usize::from(count)),
            Step::Revert => {
                doc.revert_last_mutation();
                continue;
            }
        };
        assert_eq!(doc.len(), len);
        match mutation {
            Mutation::Bytes { count } => {
                assert_eq!(doc.saved_bytes().len(), count);
                assert!(doc.revert_last_mutation());
                assert_eq!(doc.as_bytes(), &before[..]);
            }
            Mutation::Structure { range } => {
                assert!(range.len() >= 2 && range.end <= len);
                assert_eq!(doc.as_bytes()[..range.start], before[..range.start]);
                assert_eq!(doc.as_bytes()[range.end..], before[range.end..]);
            }
            Mutation::Noop => {
                assert!(doc.is_empty() || matches!(step, Step::Bytes(0)));
                assert_eq!(doc.as_bytes(), &before[..]);
            }
        }
    }
}

fuzz_target!(|input: Input| run(input));

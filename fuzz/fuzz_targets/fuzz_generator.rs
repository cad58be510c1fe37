#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use randomjson::{BOM, GeneratorOptions, generate};

#[derive(Debug, Arbitrary)]
struct Input {
    size: u16,
    generation_seed: u64,
    bom: bool,
    max_number_exponent: u16,
    max_string_size: u8,
    max_whitespace_size: u8,
    max_depth: u8,
}

impl Input {
    fn options(&self) -> GeneratorOptions {
        GeneratorOptions {
            size: usize::from(self.size),
            generation_seed: self.generation_seed,
            bom: self.bom,
            max_number_exponent: u32::from(self.max_number_exponent),
            max_string_size: usize::from(self.max_string_size),
            max_whitespace_size: usize::from(self.max_whitespace_size),
            // serde_json refuses to nest past 128 levels.
            max_depth: usize::from(self.max_depth % 120),
            ..Default::default()
        }
    }
}

fn check(input: &Input) {
    let options = input.options();
    let Ok(bytes) = generate(&options) else {
        // Rejected options must really be out of range.
        assert!(
            options.size < options.min_size() || options.max_depth == 0 || options.max_string_size < 2,
            "{options:?}"
        );
        return;
    };
    assert_eq!(bytes.len(), options.size);

    let body = if options.bom {
        assert_eq!(&bytes[..BOM.len()], BOM);
        &bytes[BOM.len()..]
    } else {
        &bytes[..]
    };
    if let Err(e) = serde_json::from_slice::<serde_json::Value>(body) {
        panic!("{e}: {:?} from {options:?}", String::from_utf8_lossy(body));
    }
    assert_eq!(generate(&options).ok().as_deref(), Some(&bytes[..]));
}

fuzz_target!(|input: Input| check(&input));

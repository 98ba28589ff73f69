#![no_main]

use libfuzzer_sys::fuzz_target;
use sassafras::Dialect;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        for dialect in Dialect::ALL {
            let parse = sassafras::parse(text, dialect);
            assert_eq!(parse.syntax_node().text().to_string(), text);
        }
    }
});

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|source: &str| {
    let skipped = egg::skip(source);
    assert_eq!(egg::skip(skipped), skipped);

    if let Ok(expression) = egg::parse(source) {
        let (prefix, rest) = egg::parse_expression(source).expect("a whole program is also a prefix");
        assert_eq!(prefix, expression);
        assert_eq!(rest, "");
    }
});

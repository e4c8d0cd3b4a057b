#![no_main]
use libfuzzer_sys::fuzz_target;
use parabreak::text::{display_width, format};
use parabreak::{Item, LineBreakOptions};

fuzz_target!(|input: (u8, String)| {
    let width = input.0;
    if width == 0 {
        return;
    }
    let options = LineBreakOptions::monospace(width as f64);
    let formatted = format(
        &options,
        |word| display_width(word) as f64,
        Item::monospace_glue(),
        10.0,
        |word| vec![1u8; word.chars().count().saturating_sub(1)],
        &input.1,
    )
    .unwrap();

    // Formatting only rearranges whitespace and hyphens: the
    // non-whitespace input must survive in order.
    let mut expected: String = input.1.split_whitespace().collect();
    expected.retain(|ch| ch != '\r');
    let mut actual: String = formatted.split_whitespace().collect();
    actual.retain(|ch| ch != '-');
    expected.retain(|ch| ch != '-');
    assert_eq!(actual, expected);
});

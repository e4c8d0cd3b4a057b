#[cfg(not(feature = "hyphenation"))]
fn main() {
    println!("Please run this example as");
    println!();
    println!("  cargo run --example hyphenation --features hyphenation");
}

#[cfg(feature = "hyphenation")]
fn main() {
    use hyphenation::{Language, Load, Standard};
    use parabreak::text::{dictionary_priorities, display_width, format};
    use parabreak::{Item, LineBreakOptions};

    let text = "parabreak: a small library for breaking paragraphs.";
    let dictionary = Standard::from_embedded(Language::EnglishUS).unwrap();
    let formatted = format(
        &LineBreakOptions::monospace(15.0),
        |word| display_width(word) as f64,
        Item::monospace_glue(),
        10.0,
        |word| dictionary_priorities(&dictionary, word),
        text,
    )
    .unwrap();
    println!("{}", formatted);
}

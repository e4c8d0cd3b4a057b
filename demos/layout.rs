use parabreak::text::{display_width, format};
use parabreak::{Item, LineBreakOptions};

fn main() {
    let example = "Memory safety without garbage collection. \
                   Concurrency without data races. \
                   Zero-cost abstractions.";
    let mut prev_layout = String::new();
    for width in 15..60 {
        let options = LineBreakOptions::monospace(width as f64);
        let layout = format(
            &options,
            |word| display_width(word) as f64,
            Item::monospace_glue(),
            10.0,
            |_| Vec::new(),
            example,
        )
        .unwrap();
        if layout != prev_layout {
            let title = format!(" Width: {} ", width);
            println!(".{:-^1$}.", title, width + 2);
            for line in layout.lines() {
                println!("| {:1$} |", line, width);
            }
            prev_layout = layout;
        }
    }
}

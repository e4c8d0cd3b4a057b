use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

// The benchmarks here verify that the complexity grows as O(*n*)
// where *n* is the number of items in the paragraph: a 10_000-item
// paragraph has to come in well under a second.

use lipsum::lipsum_words_from_seed;

use parabreak::text::{display_width, format};
use parabreak::{break_lines, Item, LineBreakOptions};

const LINE_LENGTH: f64 = 60.0;

/// Generate a lorem ipsum text with the given number of characters.
fn lorem_ipsum(length: usize) -> String {
    // The average word length in the lorem ipsum text is somewhere
    // between 6 and 7. So we conservatively divide by 5 to have a
    // long enough text that we can truncate below.
    let mut text = lipsum_words_from_seed(length / 5, 42);
    text.truncate(length);
    text
}

/// A paragraph of `n` items with mildly varying word widths.
fn word_items(n: usize) -> Vec<Item> {
    let mut items = Vec::with_capacity(n);
    for k in 0..n / 2 {
        items.push(Item::box_(4.0 + (k % 7) as f64));
        items.push(Item::glue(2.0, 1.0, 0.5));
    }
    items.truncate(n);
    items
}

pub fn benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("break_lines");
    for n in [100, 200, 400, 800, 1600, 3200, 10_000] {
        let items = word_items(n);
        let options = LineBreakOptions::new(LINE_LENGTH);
        group.bench_with_input(BenchmarkId::from_parameter(format!("{n:05}")), &items, |b, items| {
            b.iter(|| break_lines(&options, items).unwrap());
        });
    }
    group.finish();

    let mut group = c.benchmark_group("format");
    for length in [100, 200, 400, 800, 1600, 3200, 6400] {
        let text = lorem_ipsum(length);
        let options = LineBreakOptions::monospace(LINE_LENGTH);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{length:04}")),
            &text,
            |b, text| {
                b.iter(|| {
                    format(
                        &options,
                        |word| display_width(word) as f64,
                        Item::monospace_glue(),
                        10.0,
                        |_| Vec::new(),
                        text,
                    )
                    .unwrap()
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, benchmark);
criterion_main!(benches);

#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use parabreak::{break_lines, is_valid_break, Item, LineBreakOptions};

#[derive(Arbitrary, Debug)]
enum FuzzItem {
    Box { width: u16 },
    Glue { width: u16, stretch: u16, shrink: u16 },
    Penalty { width: u8, cost: i16, forced: bool, forbidden: bool, flagged: bool },
}

impl From<&FuzzItem> for Item {
    fn from(item: &FuzzItem) -> Item {
        match *item {
            FuzzItem::Box { width } => Item::box_(width as f64),
            FuzzItem::Glue { width, stretch, shrink } => {
                Item::glue(width as f64, stretch as f64, shrink as f64)
            }
            FuzzItem::Penalty { width, cost, forced, forbidden, flagged } => {
                let cost = if forced {
                    f64::NEG_INFINITY
                } else if forbidden {
                    f64::INFINITY
                } else {
                    cost as f64
                };
                Item::penalty(width as f64, cost, flagged)
            }
        }
    }
}

fuzz_target!(|input: (u16, Vec<FuzzItem>)| {
    let width = input.0;
    if width == 0 {
        return;
    }
    let items: Vec<Item> = input.1.iter().map(Item::from).collect();
    let options = LineBreakOptions::new(width as f64);

    let lines = break_lines(&options, &items).unwrap();

    // The lines must partition the items with legal boundaries.
    if items.is_empty() {
        assert!(lines.is_empty());
        return;
    }
    assert_eq!(lines.first().unwrap().start, 0);
    assert_eq!(lines.last().unwrap().end, items.len());
    for pair in lines.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }
    for line in &lines {
        assert!(line.end > line.start);
        assert!(is_valid_break(&items, line.end));
    }
});

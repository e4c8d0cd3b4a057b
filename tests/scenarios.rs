//! End-to-end paragraphs with hand-checked expected breaks.

use parabreak::{break_lines, Item, LineBreakOptions};

fn ranges(options: &LineBreakOptions, items: &[Item]) -> Vec<(usize, usize)> {
    break_lines(options, items)
        .unwrap()
        .iter()
        .map(|l| (l.start, l.end))
        .collect()
}

#[test]
fn single_word_fits() {
    let items = [Item::box_(50.0)];
    let lines = break_lines(&LineBreakOptions::new(100.0), &items).unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!((lines[0].start, lines[0].end), (0, 1));
    assert!(lines[0].adjustment_ratio >= 0.0);
}

#[test]
fn two_words_on_one_line() {
    let items = [Item::box_(30.0), Item::glue(10.0, 5.0, 3.0), Item::box_(40.0)];
    assert_eq!(ranges(&LineBreakOptions::new(100.0), &items), vec![(0, 3)]);
}

#[test]
fn empty_paragraph() {
    assert_eq!(ranges(&LineBreakOptions::new(100.0), &[]), vec![]);
}

#[test]
fn oversized_box_is_reported_overfull() {
    let items = [Item::box_(150.0)];
    let lines = break_lines(&LineBreakOptions::new(100.0), &items).unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!((lines[0].start, lines[0].end), (0, 1));
    assert_eq!(lines[0].adjustment_ratio, -1.0);
}

#[test]
fn forced_break_in_the_middle() {
    let items = [
        Item::box_(30.0),
        Item::glue(10.0, 5.0, 3.0),
        Item::box_(20.0),
        Item::forced_break(),
        Item::box_(40.0),
    ];
    assert_eq!(
        ranges(&LineBreakOptions::new(100.0), &items),
        vec![(0, 4), (4, 5)]
    );
}

#[test]
fn shrink_absorbs_part_of_an_overflow() {
    let items = [Item::box_(80.0), Item::glue(0.0, 0.0, 5.0), Item::forced_break()];
    let lines = break_lines(&LineBreakOptions::new(50.0), &items).unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!((lines[0].start, lines[0].end), (0, 3));
    assert_eq!(lines[0].adjustment_ratio, -1.0);
}

#[test]
fn six_words_balance_onto_two_lines() {
    let mut items = Vec::new();
    for k in 0..6 {
        if k > 0 {
            items.push(Item::glue(2.0, 1.0, 1.0));
        }
        items.push(Item::box_(8.0));
    }
    let options = LineBreakOptions::new(30.0);
    let lines = break_lines(&options, &items).unwrap();
    assert_eq!(lines.len(), 2);
    for line in &lines {
        assert!(line.adjustment_ratio.abs() < 2.0);
    }
    assert!((lines[0].adjustment_ratio - lines[1].adjustment_ratio).abs() < 1.0);
}

#[test]
fn exact_fit_has_ratio_zero() {
    let items = [Item::box_(40.0), Item::glue(20.0, 10.0, 5.0), Item::box_(40.0)];
    let lines = break_lines(&LineBreakOptions::new(100.0), &items).unwrap();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].adjustment_ratio.abs() < 1e-6);
}

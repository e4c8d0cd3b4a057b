//! Laying out plain text.
//!
//! This module connects strings to the item stream that
//! [`break_lines`](crate::break_lines) works on. [`format`] splits a
//! text into paragraphs and whitespace-separated words, measures the
//! words with a caller-supplied width function, asks a hyphenation
//! oracle for in-word break opportunities, breaks each paragraph
//! optimally, and reassembles the result with one line per output
//! line.
//!
//! The hyphenation oracle is a plain callback: given a word, it
//! returns one Liang priority per inter-letter position (so a word of
//! `n` characters yields `n - 1` entries). Odd priorities mark valid
//! hyphenation points. Pass `|_| Vec::new()` to disable hyphenation,
//! or use [`dictionary_priorities`] to consult a [`hyphenation`]
//! dictionary (Cargo feature `hyphenation`).

use crate::core::{Item, Line};
use crate::knuth_plass::break_lines;
use crate::line_ending::LineEnding;
use crate::{Error, LineBreakOptions};

/// The CSI or “Control Sequence Introducer” introduces an ANSI escape
/// sequence. This is typically used for colored text and will be
/// ignored when computing the text width.
const CSI: (char, char) = ('\x1b', '[');
/// The final bytes of an ANSI escape sequence must be in this range.
const ANSI_FINAL_BYTE: std::ops::RangeInclusive<char> = '\x40'..='\x7e';

/// Skip ANSI escape sequences. The `ch` is the current `char`, the
/// `chars` provide the following characters. The `chars` will be
/// modified if `ch` is the start of an ANSI escape sequence.
#[inline]
fn skip_ansi_escape_sequence<I: Iterator<Item = char>>(ch: char, chars: &mut I) -> bool {
    if ch == CSI.0 && chars.next() == Some(CSI.1) {
        // We have found the start of an ANSI escape code, typically
        // used for colored terminal text. We skip until we find a
        // "final byte" in the range 0x40–0x7E.
        for ch in chars {
            if ANSI_FINAL_BYTE.contains(&ch) {
                return true;
            }
        }
    }
    false
}

#[cfg(feature = "unicode-width")]
#[inline]
fn ch_width(ch: char) -> usize {
    unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0)
}

/// First character which [`ch_width`] will classify as double-width.
#[cfg(not(feature = "unicode-width"))]
const DOUBLE_WIDTH_CUTOFF: char = '\u{1100}';

#[cfg(not(feature = "unicode-width"))]
#[inline]
fn ch_width(ch: char) -> usize {
    if ch < DOUBLE_WIDTH_CUTOFF {
        1
    } else {
        2
    }
}

/// Compute the display width of `text` while skipping over ANSI
/// escape sequences.
///
/// This is the natural `word_width` for monospace output:
///
/// ```
/// use parabreak::text::display_width;
///
/// assert_eq!(display_width("Café Plain"), 10);
/// assert_eq!(display_width("\u{1b}[31mCafé Rouge\u{1b}[0m"), 10);
/// ```
///
/// **Note:** When the `unicode-width` Cargo feature is disabled, the
/// width of a `char` is determined by a crude approximation which
/// simply counts chars below U+1100 as 1 column wide, and all other
/// characters as 2 columns wide.
pub fn display_width(text: &str) -> usize {
    let mut chars = text.chars();
    let mut width = 0;
    while let Some(ch) = chars.next() {
        if skip_ansi_escape_sequence(ch, &mut chars) {
            continue;
        }
        width += ch_width(ch);
    }
    width
}

/// Builds the items of one hyphenatable word from its fragments.
///
/// Emits a box per fragment and a flagged penalty of width
/// `hyphen_width` between consecutive fragments, with the given
/// costs. This is the item shape [`format`] produces for words the
/// oracle can hyphenate.
///
/// # Errors
///
/// Returns [`Error::PenaltyCountMismatch`] unless
/// `penalties.len() == fragments.len() - 1`.
///
/// # Examples
///
/// ```
/// use parabreak::text::hyphenated_word;
/// use parabreak::Item;
///
/// let items = hyphenated_word(
///     &["hy", "phen"],
///     &[50.0],
///     |w| w.len() as f64,
///     1.0,
/// )
/// .unwrap();
/// assert_eq!(
///     items,
///     vec![
///         Item::box_(2.0),
///         Item::penalty(1.0, 50.0, true),
///         Item::box_(4.0),
///     ]
/// );
/// ```
pub fn hyphenated_word<W>(
    fragments: &[&str],
    penalties: &[f64],
    word_width: W,
    hyphen_width: f64,
) -> Result<Vec<Item>, Error>
where
    W: Fn(&str) -> f64,
{
    if penalties.len() != fragments.len().saturating_sub(1) {
        return Err(Error::PenaltyCountMismatch {
            fragments: fragments.len(),
            penalties: penalties.len(),
        });
    }
    let mut items = Vec::with_capacity(fragments.len() * 2);
    for (k, fragment) in fragments.iter().enumerate() {
        if k > 0 {
            items.push(Item::penalty(hyphen_width, penalties[k - 1], true));
        }
        items.push(Item::box_(word_width(fragment)));
    }
    Ok(items)
}

/// Adapts a [`hyphenation`] dictionary to the oracle callback shape.
///
/// Every break opportunity the dictionary reports becomes priority 1
/// (odd, therefore valid); all other positions are 0.
///
/// **Note:** Only available when the `hyphenation` Cargo feature is
/// enabled.
#[cfg(feature = "hyphenation")]
pub fn dictionary_priorities(dictionary: &hyphenation::Standard, word: &str) -> Vec<u8> {
    use hyphenation::Hyphenator;

    let boundaries: Vec<usize> = word.char_indices().map(|(b, _)| b).skip(1).collect();
    let mut priorities = vec![0u8; boundaries.len()];
    for offset in dictionary.hyphenate(word).breaks {
        if let Some(k) = boundaries.iter().position(|&b| b == offset) {
            priorities[k] = 1;
        }
    }
    priorities
}

/// One paragraph's items plus the text of each box.
struct ParagraphStream<'a> {
    items: Vec<Item>,
    texts: Vec<Option<&'a str>>,
}

impl<'a> ParagraphStream<'a> {
    fn push(&mut self, item: Item, text: Option<&'a str>) {
        self.items.push(item);
        self.texts.push(text);
    }
}

fn itemize_paragraph<'a, W, H>(
    word_width: &W,
    glue_preset: Item,
    hyphen_base_penalty: f64,
    hyphenate: &H,
    paragraph: &'a str,
) -> ParagraphStream<'a>
where
    W: Fn(&str) -> f64,
    H: Fn(&str) -> Vec<u8>,
{
    let mut stream = ParagraphStream { items: Vec::new(), texts: Vec::new() };
    let hyphen_width = word_width("-");

    for (k, word) in paragraph.split_whitespace().enumerate() {
        if k > 0 {
            stream.push(glue_preset, None);
        }

        let priorities = hyphenate(word);
        // Byte offset of each inter-letter position.
        let boundaries: Vec<usize> = word.char_indices().map(|(b, _)| b).skip(1).collect();
        let mut cuts: Vec<(usize, u8)> = Vec::new();
        for (pos, &boundary) in boundaries.iter().enumerate() {
            match priorities.get(pos) {
                Some(&p) if p % 2 == 1 => cuts.push((boundary, p)),
                _ => {}
            }
        }

        if cuts.is_empty() {
            stream.push(Item::box_(word_width(word)), Some(word));
        } else {
            let mut start = 0;
            for &(boundary, priority) in &cuts {
                let fragment = &word[start..boundary];
                stream.push(Item::box_(word_width(fragment)), Some(fragment));
                stream.push(
                    Item::penalty(hyphen_width, hyphen_base_penalty * priority as f64, true),
                    None,
                );
                start = boundary;
            }
            let fragment = &word[start..];
            stream.push(Item::box_(word_width(fragment)), Some(fragment));
        }
    }

    if !stream.items.is_empty() {
        // The closing glue lets the last line end short for free; the
        // paragraph end itself is a forced break.
        stream.push(Item::glue(0.0, f64::INFINITY, 0.0), None);
        stream.push(Item::forced_break(), None);
    }
    stream
}

fn render_line(stream: &ParagraphStream<'_>, line: &Line) -> String {
    let mut out = String::new();
    let mut pending_space = false;
    for idx in line.start..line.end {
        match stream.items[idx] {
            Item::Box { .. } => {
                if pending_space {
                    out.push(' ');
                }
                out.push_str(stream.texts[idx].unwrap_or(""));
                pending_space = false;
            }
            Item::Glue { .. } => {
                if !out.is_empty() {
                    pending_space = true;
                }
            }
            Item::Penalty { .. } => {}
        }
    }
    if let Item::Penalty { width, flagged: true, .. } = stream.items[line.end - 1] {
        if width > 0.0 {
            out.push('-');
        }
    }
    out
}

/// Breaks a text into lines and returns it re-joined.
///
/// The text is split into paragraphs on `'\n'` (any `'\r'` is
/// stripped first); each paragraph is split into whitespace-separated
/// words, itemized, and broken independently. Both the lines within a
/// paragraph and the paragraphs themselves are joined with the
/// platform-native line separator, so blank input lines survive.
///
/// `word_width` measures a word or word fragment; `glue_preset` is
/// the glue inserted between words (for terminal output use
/// [`Item::monospace_glue`]); `hyphenate` is the hyphenation oracle
/// described in the [module docs](self), and a break at one of its
/// opportunities costs `hyphen_base_penalty` times the opportunity's
/// priority. A line that ends at such a break gets a `-` appended.
///
/// # Errors
///
/// Returns [`Error::GluePresetNotGlue`] if `glue_preset` is not a
/// [`Item::Glue`], and [`Error::NonPositiveLineWidth`] if
/// `options.line_width <= 0`.
///
/// # Examples
///
/// ```
/// use parabreak::text::{display_width, format};
/// use parabreak::{Item, LineBreakOptions};
///
/// let formatted = format(
///     &LineBreakOptions::monospace(18.0),
///     |word| display_width(word) as f64,
///     Item::monospace_glue(),
///     10.0,
///     |_| Vec::new(),
///     "parabreak: a small library for breaking paragraphs.",
/// )
/// .unwrap();
/// assert_eq!(
///     formatted.lines().collect::<Vec<_>>(),
///     vec!["parabreak: a", "small library", "for breaking", "paragraphs."],
/// );
/// ```
pub fn format<W, H>(
    options: &LineBreakOptions,
    word_width: W,
    glue_preset: Item,
    hyphen_base_penalty: f64,
    hyphenate: H,
    text: &str,
) -> Result<String, Error>
where
    W: Fn(&str) -> f64,
    H: Fn(&str) -> Vec<u8>,
{
    if !matches!(glue_preset, Item::Glue { .. }) {
        return Err(Error::GluePresetNotGlue);
    }
    let separator = LineEnding::native().as_str();
    let text = text.replace('\r', "");

    let mut blocks: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        let stream = itemize_paragraph(
            &word_width,
            glue_preset,
            hyphen_base_penalty,
            &hyphenate,
            paragraph,
        );
        let lines = break_lines(options, &stream.items)?;
        let rendered: Vec<String> = lines.iter().map(|l| render_line(&stream, l)).collect();
        blocks.push(rendered.join(separator));
    }
    Ok(blocks.join(separator))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono(options: &LineBreakOptions, text: &str) -> String {
        format(
            options,
            |word| display_width(word) as f64,
            Item::monospace_glue(),
            10.0,
            |_| Vec::new(),
            text,
        )
        .unwrap()
    }

    #[test]
    fn display_width_works() {
        assert_eq!("Café Plain".len(), 11); // “é” is two bytes
        assert_eq!(display_width("Café Plain"), 10);
        assert_eq!(display_width("\u{1b}[31mCafé Rouge\u{1b}[0m"), 10);
    }

    #[cfg(feature = "unicode-width")]
    #[test]
    fn display_width_emojis() {
        assert_eq!(display_width("😂😭🥺🤣"), 8);
        assert_eq!(display_width("你好"), 4);
    }

    #[test]
    fn pairs_words_per_line() {
        let options = LineBreakOptions::monospace(5.0);
        assert_eq!(mono(&options, "aa bb cc dd"), "aa bb\ncc dd");
    }

    #[test]
    fn empty_text_stays_empty() {
        let options = LineBreakOptions::monospace(10.0);
        assert_eq!(mono(&options, ""), "");
    }

    #[test]
    fn blank_lines_survive_and_cr_is_stripped() {
        let options = LineBreakOptions::monospace(10.0);
        assert_eq!(mono(&options, "aa bb\r\n\r\ncc"), "aa bb\n\ncc");
    }

    #[test]
    fn paragraphs_break_independently() {
        let options = LineBreakOptions::monospace(5.0);
        assert_eq!(mono(&options, "aa bb cc\ndd"), "aa bb\ncc\ndd");
    }

    #[test]
    fn oracle_breaks_get_a_hyphen() {
        let options = LineBreakOptions::monospace(4.0);
        let formatted = format(
            &options,
            |word| display_width(word) as f64,
            Item::monospace_glue(),
            10.0,
            |word| {
                // One opportunity, in the middle of "abcdef".
                let mut priorities = vec![0u8; word.chars().count() - 1];
                priorities[2] = 1;
                priorities
            },
            "abcdef",
        )
        .unwrap();
        assert_eq!(formatted, "abc-\ndef");
    }

    #[test]
    fn unneeded_hyphen_opportunities_stay_invisible() {
        let options = LineBreakOptions::monospace(10.0);
        let formatted = format(
            &options,
            |word| display_width(word) as f64,
            Item::monospace_glue(),
            10.0,
            |word| {
                let mut priorities = vec![0u8; word.chars().count() - 1];
                priorities[2] = 1;
                priorities
            },
            "abcdef",
        )
        .unwrap();
        assert_eq!(formatted, "abcdef");
    }

    #[test]
    fn even_priorities_are_not_break_points() {
        let options = LineBreakOptions::monospace(4.0);
        let formatted = format(
            &options,
            |word| display_width(word) as f64,
            Item::monospace_glue(),
            10.0,
            |word| vec![2u8; word.chars().count() - 1],
            "abcdef",
        )
        .unwrap();
        // No odd priority, so the word stays whole (and overfull).
        assert_eq!(formatted, "abcdef");
    }

    #[test]
    fn hyphenated_word_checks_the_penalty_count() {
        let err = hyphenated_word(&["a", "b", "c"], &[1.0], |w| w.len() as f64, 1.0);
        assert_eq!(
            err,
            Err(Error::PenaltyCountMismatch { fragments: 3, penalties: 1 })
        );
        assert_eq!(hyphenated_word(&[], &[], |w| w.len() as f64, 1.0), Ok(Vec::new()));
    }

    #[test]
    fn glue_preset_must_be_glue() {
        let err = format(
            &LineBreakOptions::monospace(10.0),
            |word| display_width(word) as f64,
            Item::box_(1.0),
            10.0,
            |_| Vec::new(),
            "aa",
        );
        assert_eq!(err, Err(Error::GluePresetNotGlue));
    }
}

//! The parabreak library breaks paragraphs into lines using the
//! Knuth-Plass optimal-fit algorithm, the line breaker of TeX.
//!
//! Unlike a greedy word wrapper, the algorithm considers the whole
//! paragraph at once: it may end a line early so that a later line
//! avoids an ugly gap, it balances how much the whitespace of
//! neighbouring lines is stretched or shrunk, and it discourages
//! hyphens on consecutive lines. A quick example:
//!
//! ```
//! use parabreak::text::{display_width, format};
//! use parabreak::{Item, LineBreakOptions};
//!
//! let text = "parabreak: a small library for breaking paragraphs.";
//! let formatted = format(
//!     &LineBreakOptions::monospace(18.0),
//!     |word| display_width(word) as f64,
//!     Item::monospace_glue(),
//!     10.0,
//!     |_| Vec::new(),
//!     text,
//! )
//! .unwrap();
//! println!("{}", formatted);
//! ```
//!
//! When you run this program, it will display the following output —
//! note how the first three lines come out evenly filled, where a
//! greedy wrapper would have crammed `small` onto the first line and
//! left `breaking` stranded:
//!
//! ```text
//! parabreak: a
//! small library
//! for breaking
//! paragraphs.
//! ```
//!
//! # Architecture
//!
//! `parabreak` is layered, and every layer is public:
//!
//! - A paragraph is described as a sequence of [`Item`]s — boxes
//!   (content), glue (elastic whitespace), and penalties (break
//!   opportunities). The [`text`] module builds item sequences from
//!   strings; anything else (a shaped glyph run, a table row, a
//!   sequence of tasks) can be described the same way by hand.
//! - [`break_lines`] turns items plus [`LineBreakOptions`] into
//!   [`Line`]s: item ranges with the adjustment ratio to render each
//!   line at.
//! - The [`core`] module exposes the arithmetic in between —
//!   [`line_ratio`], [`badness`], [`Fitness`], [`demerits`], and
//!   [`is_valid_break`] — so results can be scored and audited
//!   outside the breaker.
//!
//! # Cargo Features
//!
//! The parabreak library has two optional features:
//!
//! * `unicode-width`: enables accurate display-width computation via
//!   the [unicode-width] crate (default). Without it,
//!   [`text::display_width`] falls back to a crude approximation.
//!
//! * `hyphenation`: enables the [`text::dictionary_priorities`]
//!   adapter for the [hyphenation] crate's embedded Knuth-Liang
//!   pattern dictionaries.
//!
//! [unicode-width]: https://docs.rs/unicode-width/
//! [hyphenation]: https://docs.rs/hyphenation/

#![doc(html_root_url = "https://docs.rs/parabreak/0.1.0")]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

use std::fmt;

mod active_list;
pub mod core;
mod knuth_plass;
mod line_ending;
pub mod text;

pub use crate::core::{
    badness, demerits, displayed_ratio, is_valid_break, line_ratio, Fitness, Item, Line,
    INFINITELY_BAD,
};
pub use crate::knuth_plass::break_lines;
pub use crate::line_ending::{LineEnding, UnsupportedLineEnding};

/// Holds the parameters of the breaking algorithm.
///
/// Construct the options with one of the factories and adjust single
/// knobs with the builder methods:
///
/// ```
/// use parabreak::LineBreakOptions;
///
/// let options = LineBreakOptions::new(65.0)
///     .tolerance(800.0)
///     .double_hyphen_demerits(50_000.0);
/// ```
///
/// The defaults of [`LineBreakOptions::new`] follow plain TeX.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineBreakOptions {
    /// The target width of every line. Must be positive.
    pub line_width: f64,
    /// The largest [`badness`] a line may have to be considered,
    /// except at forced breaks. The default of 200 corresponds to an
    /// adjustment ratio of roughly 1.26.
    pub tolerance: f64,
    /// Added to the badness of every line before squaring, making
    /// extra lines expensive. Default 10.
    pub line_penalty: f64,
    /// Surcharge when two consecutive breaks are both flagged
    /// (hyphenated). Default 10_000.
    pub double_hyphen_demerits: f64,
    /// Surcharge when the penultimate line ends hyphenated. Default
    /// 5_000.
    pub final_hyphen_demerits: f64,
    /// Surcharge when consecutive lines' [`Fitness`] classes are more
    /// than one step apart. Default 10_000.
    pub adjacent_loose_tight_demerits: f64,
    /// Multiplier historically applied to fitness-class mismatches.
    /// The demerits model applies the flat
    /// [`adjacent_loose_tight_demerits`](Self::adjacent_loose_tight_demerits)
    /// surcharge instead; this knob is retained in the options but
    /// not consulted. Default 100.
    pub fitness_class_difference_penalty: f64,
    /// Stretch of the conceptual glue at every line's right edge.
    /// A positive value gives even a single-word line a finite
    /// adjustment ratio. Default 0.
    pub right_skip_stretch: f64,
}

impl LineBreakOptions {
    /// Creates options with plain TeX defaults for the given line
    /// width.
    pub const fn new(line_width: f64) -> LineBreakOptions {
        LineBreakOptions {
            line_width,
            tolerance: 200.0,
            line_penalty: 10.0,
            double_hyphen_demerits: 10_000.0,
            final_hyphen_demerits: 5_000.0,
            adjacent_loose_tight_demerits: 10_000.0,
            fitness_class_difference_penalty: 100.0,
            right_skip_stretch: 0.0,
        }
    }

    /// Creates options tuned for monospace output: every line that is
    /// not overfull is acceptable (the tolerance sits just above
    /// [`INFINITELY_BAD`]), and a right-skip stretch of 4 columns
    /// keeps ratios finite on short lines.
    pub const fn monospace(line_width: f64) -> LineBreakOptions {
        let mut options = LineBreakOptions::new(line_width);
        options.tolerance = INFINITELY_BAD + 1.0;
        options.right_skip_stretch = 4.0;
        options
    }

    /// Creates TeX-default options with the given right-skip stretch.
    pub const fn with_right_skip(line_width: f64, stretch: f64) -> LineBreakOptions {
        let mut options = LineBreakOptions::new(line_width);
        options.right_skip_stretch = stretch;
        options
    }

    /// Overrides the badness tolerance.
    pub const fn tolerance(mut self, tolerance: f64) -> LineBreakOptions {
        self.tolerance = tolerance;
        self
    }

    /// Overrides the per-line penalty.
    pub const fn line_penalty(mut self, line_penalty: f64) -> LineBreakOptions {
        self.line_penalty = line_penalty;
        self
    }

    /// Overrides the surcharge for consecutive hyphenated breaks.
    pub const fn double_hyphen_demerits(mut self, demerits: f64) -> LineBreakOptions {
        self.double_hyphen_demerits = demerits;
        self
    }

    /// Overrides the surcharge for a hyphen on the penultimate line.
    pub const fn final_hyphen_demerits(mut self, demerits: f64) -> LineBreakOptions {
        self.final_hyphen_demerits = demerits;
        self
    }

    /// Overrides the surcharge for fitness jumps of more than one
    /// class.
    pub const fn adjacent_loose_tight_demerits(mut self, demerits: f64) -> LineBreakOptions {
        self.adjacent_loose_tight_demerits = demerits;
        self
    }

    /// Overrides the retained legacy fitness-mismatch multiplier.
    pub const fn fitness_class_difference_penalty(mut self, penalty: f64) -> LineBreakOptions {
        self.fitness_class_difference_penalty = penalty;
        self
    }

    /// Overrides the right-skip stretch.
    pub const fn right_skip_stretch(mut self, stretch: f64) -> LineBreakOptions {
        self.right_skip_stretch = stretch;
        self
    }
}

/// Errors returned by [`break_lines`] and the [`text`] layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The configured line width was zero, negative, or NaN.
    NonPositiveLineWidth,
    /// [`text::hyphenated_word`] was given a penalty list whose
    /// length does not match the fragment list.
    PenaltyCountMismatch {
        /// Number of word fragments passed.
        fragments: usize,
        /// Number of penalties passed; must be `fragments - 1`.
        penalties: usize,
    },
    /// The word glue passed to [`text::format`] was not a
    /// [`Item::Glue`].
    GluePresetNotGlue,
    /// No breaking exists. Unreachable through the public API: the
    /// paragraph end is a forced break and the rescue pass accepts
    /// an overfull line rather than fail.
    NoFeasibleBreaking,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::NonPositiveLineWidth => write!(f, "line width must be positive"),
            Error::PenaltyCountMismatch { fragments, penalties } => write!(
                f,
                "{} fragments require {} penalties between them, got {}",
                fragments,
                fragments.saturating_sub(1),
                penalties
            ),
            Error::GluePresetNotGlue => write!(f, "the word glue preset must be a glue item"),
            Error::NoFeasibleBreaking => write!(f, "no feasible line breaking exists"),
        }
    }
}

impl std::error::Error for Error {}

/*!
 * Bounded-size text segmentation.
 *
 * Splits a text blob into segments that stay under a backend's maximum
 * request size without ever breaking an atomic unit (a line or a
 * paragraph, depending on the backend). Joining the resulting segment
 * texts with the boundary delimiter reconstructs the input exactly, which
 * is what lets the orchestrator reassemble translations by index.
 */

use std::fmt;

/// The atomic-unit boundary a backend wants its requests split along.
///
/// Line-oriented engines translate a line at a time and tolerate segments
/// glued from many lines; document-oriented generative backends keep more
/// context when fed whole paragraphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentBoundary {
    /// Split along single line breaks
    #[default]
    Line,
    /// Split along blank lines (double line break)
    Paragraph,
}

impl SegmentBoundary {
    /// The delimiter string this boundary splits on and reassembles with.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Line => "\n",
            Self::Paragraph => "\n\n",
        }
    }
}

impl fmt::Display for SegmentBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line => write!(f, "line"),
            Self::Paragraph => write!(f, "paragraph"),
        }
    }
}

/// A bounded-size slice of text sent in one translation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// 0-based position in the segment sequence; indices are dense
    pub index: usize,

    /// Segment text; never carries a trailing boundary delimiter
    pub text: String,
}

/// Split `text` into segments of at most `max_chars` characters along the
/// given boundary.
///
/// Atomic units are accumulated greedily: a segment is closed as soon as
/// appending the next unit would push it past `max_chars` (and the
/// segment already has content). A single unit longer than `max_chars`
/// becomes its own oversized segment; corrupting a line or paragraph by
/// splitting it mid-way is never acceptable.
///
/// Empty input yields an empty sequence. For any input,
/// `segments.join(boundary.delimiter()) == text` holds exactly.
pub fn segment(text: &str, max_chars: usize, boundary: SegmentBoundary) -> Vec<Segment> {
    if text.is_empty() {
        return Vec::new();
    }

    let max_chars = max_chars.max(1);
    if text.chars().count() <= max_chars {
        return vec![Segment {
            index: 0,
            text: text.to_string(),
        }];
    }

    let delim = boundary.delimiter();
    let delim_chars = delim.chars().count();

    let mut segments: Vec<Segment> = Vec::new();
    // (accumulated text, its char count); None until the first unit lands
    let mut buffer: Option<(String, usize)> = None;

    for unit in text.split(delim) {
        let unit_chars = unit.chars().count();

        match buffer.take() {
            None => {
                buffer = Some((unit.to_string(), unit_chars));
            }
            Some((mut acc, acc_chars)) => {
                if acc_chars + delim_chars + unit_chars > max_chars {
                    close_segment(&mut segments, acc);
                    buffer = Some((unit.to_string(), unit_chars));
                } else {
                    acc.push_str(delim);
                    acc.push_str(unit);
                    buffer = Some((acc, acc_chars + delim_chars + unit_chars));
                }
            }
        }
    }

    if let Some((acc, _)) = buffer {
        close_segment(&mut segments, acc);
    }

    segments
}

fn close_segment(segments: &mut Vec<Segment>, text: String) {
    let index = segments.len();
    segments.push(Segment { index, text });
}

/*!
 * Tests for boundary-preserving text segmentation
 */

use tamil_pdf_ocr::segmenter::{segment, SegmentBoundary};

/// Join segment texts back with the boundary delimiter
fn reassemble(text: &str, max_chars: usize, boundary: SegmentBoundary) -> String {
    segment(text, max_chars, boundary)
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(boundary.delimiter())
}

#[test]
fn test_segment_withEmptyInput_shouldReturnEmptySequence() {
    assert!(segment("", 100, SegmentBoundary::Line).is_empty());
    assert!(segment("", 1, SegmentBoundary::Paragraph).is_empty());
}

#[test]
fn test_segment_withTextUnderLimit_shouldReturnSingleSegment() {
    let segments = segment("short text", 100, SegmentBoundary::Line);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].index, 0);
    assert_eq!(segments[0].text, "short text");
}

#[test]
fn test_segment_withLineBoundary_shouldKeepLinesWhole() {
    // Each line is its own unbreakable unit, kept whole per policy
    let segments = segment("Line1\nLine2\nLine3", 6, SegmentBoundary::Line);
    let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["Line1", "Line2", "Line3"]);
}

#[test]
fn test_segment_withGreedyAccumulation_shouldFillSegments() {
    // "aa\nbb" fits in 5 chars; "cc" starts the next segment
    let segments = segment("aa\nbb\ncc", 5, SegmentBoundary::Line);
    let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["aa\nbb", "cc"]);
}

#[test]
fn test_segment_withOversizedUnit_shouldKeepUnitWhole() {
    let long_line = "x".repeat(50);
    let text = format!("ab\n{}\ncd", long_line);
    let segments = segment(&text, 10, SegmentBoundary::Line);

    // The oversized line is its own segment, never split mid-line
    assert!(segments.iter().any(|s| s.text == long_line));
    for seg in &segments {
        assert!(seg.text.chars().count() <= 10 || seg.text == long_line);
    }
}

#[test]
fn test_segment_withAnyInput_shouldRoundTripExactly() {
    let inputs = [
        "Line1\nLine2\nLine3",
        "a\n\nb\n\nc",
        "trailing newline\n",
        "\nleading newline",
        "blank\n\n\nlines",
        "single",
        "several words on one line that is quite long",
        "தமிழ் எழுத்து\nஇரண்டாவது வரி\nமூன்றாவது வரி",
    ];

    for input in inputs {
        for max in [1, 3, 8, 1000] {
            assert_eq!(
                reassemble(input, max, SegmentBoundary::Line),
                input,
                "line round-trip failed for {:?} at max {}",
                input,
                max
            );
            assert_eq!(
                reassemble(input, max, SegmentBoundary::Paragraph),
                input,
                "paragraph round-trip failed for {:?} at max {}",
                input,
                max
            );
        }
    }
}

#[test]
fn test_segment_withSplitting_shouldProduceDenseIndices() {
    let text = (0..20).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
    let segments = segment(&text, 15, SegmentBoundary::Line);

    assert!(segments.len() > 1);
    for (expected, seg) in segments.iter().enumerate() {
        assert_eq!(seg.index, expected);
    }
}

#[test]
fn test_segment_withSizeBound_shouldRespectLimitExceptOversizedUnits() {
    let text = "aaaa\nbb\ncccccc\ndd\ne";
    let max = 5;
    for seg in segment(text, max, SegmentBoundary::Line) {
        let is_single_oversized_unit =
            !seg.text.contains('\n') && seg.text.chars().count() > max;
        assert!(
            seg.text.chars().count() <= max || is_single_oversized_unit,
            "segment {:?} violates the size bound",
            seg.text
        );
    }
}

#[test]
fn test_segment_withParagraphBoundary_shouldSplitOnBlankLines() {
    let text = "para one line a\npara one line b\n\npara two\n\npara three";
    let segments = segment(text, 15, SegmentBoundary::Paragraph);
    let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();

    // Paragraphs are atomic: the two-line paragraph stays together
    assert_eq!(
        texts,
        vec!["para one line a\npara one line b", "para two", "para three"]
    );
}

#[test]
fn test_segment_withUnicodeText_shouldCountCharsNotBytes() {
    // Three Tamil characters per line, well over the limit in bytes
    let text = "அஆஇ\nஈஉஊ";
    let segments = segment(text, 7, SegmentBoundary::Line);
    assert_eq!(segments.len(), 1, "7 chars should fit in one segment");
}

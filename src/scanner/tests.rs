use super::*;
use std::io::Cursor;

fn scan(input: &str, policy: ScanPolicy) -> Vec<Result<Chunk, ExtractError>> {
    scan_chunks(Cursor::new(input.as_bytes()), Markers::default(), policy).collect()
}

fn scan_ok(input: &str) -> Vec<Chunk> {
    scan(input, ScanPolicy::Lenient)
        .into_iter()
        .map(|r| r.unwrap())
        .collect()
}

// ========================================================================
// Line classification
// ========================================================================

#[test]
fn test_classify_header_line() {
    let markers = Markers::default();
    assert_eq!(classify(b"#define xbm_width 10\n", &markers), LineKind::Start);
    assert_eq!(
        classify(b"[12:01:03] #define xbm_width 64\r\n", &markers),
        LineKind::Start
    );
}

#[test]
fn test_classify_closing_line() {
    let markers = Markers::default();
    assert_eq!(classify(b"};\n", &markers), LineKind::End);
    assert_eq!(classify(b"0xff, 0x00 };\n", &markers), LineKind::End);
    assert_eq!(classify(b"};\r\n", &markers), LineKind::End);
}

#[test]
fn test_classify_closing_line_with_lone_cr() {
    let markers = Markers::default();
    assert_eq!(classify(b"};\r", &markers), LineKind::End);
    assert_eq!(classify(b"\r\n", &markers), LineKind::Other);
}

#[test]
fn test_classify_closing_marker_needs_newline() {
    let markers = Markers::default();
    assert_eq!(classify(b"};", &markers), LineKind::Other);
    assert_eq!(classify(b"}; // trailing\n", &markers), LineKind::Other);
}

#[test]
fn test_classify_header_wins_over_closer() {
    let markers = Markers::default();
    assert_eq!(classify(b"#define xbm_width 1 };\n", &markers), LineKind::Start);
}

// ========================================================================
// Chunk capture
// ========================================================================

#[test]
fn test_single_chunk_example() {
    let input = "x\n#define xbm_width 10\ndata1\ndata2\n};\ny\n";
    let chunks = scan_ok(input);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].start_line, 2);
    assert_eq!(chunks[0].end_line, 5);
    assert_eq!(chunks[0].line_count(), 4);
    assert_eq!(chunks[0].as_text(), "#define xbm_width 10\ndata1\ndata2\n};\n");
}

#[test]
fn test_multiple_chunks_in_order() {
    let input = "boot\n\
                 #define xbm_width 8\n\
                 a\n\
                 };\n\
                 noise\n\
                 #define xbm_width 16\n\
                 b\n\
                 c\n\
                 };\n\
                 #define xbm_width 4\n\
                 };\n";
    let chunks = scan_ok(input);

    assert_eq!(chunks.len(), 3);
    let spans: Vec<_> = chunks.iter().map(|c| (c.start_line, c.end_line)).collect();
    assert_eq!(spans, vec![(2, 4), (6, 9), (10, 11)]);
    assert_eq!(chunks[1].as_text(), "#define xbm_width 16\nb\nc\n};\n");
}

#[test]
fn test_content_is_verbatim() {
    let input = "#define xbm_width 2\r\n\t0x01,  0x02 \r\n};\r\n";
    let chunks = scan_ok(input);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].content, input.as_bytes());
}

#[test]
fn test_double_cr_line_endings() {
    let input = "#define xbm_width 1\r\r\n0x00\r\r\n};\r\r\n";
    let chunks = scan_ok(input);

    // each "\r\r\n" is a lone CR line end followed by an empty CRLF line
    assert_eq!(chunks.len(), 1);
    assert_eq!((chunks[0].start_line, chunks[0].end_line), (1, 5));
    assert_eq!(chunks[0].as_text(), "#define xbm_width 1\r\r\n0x00\r\r\n};\r");
}

#[test]
fn test_cr_only_line_endings() {
    let input = "noise\r#define xbm_width 1\r0x00\r};\rtail\r";
    let chunks = scan_ok(input);

    assert_eq!(chunks.len(), 1);
    assert_eq!((chunks[0].start_line, chunks[0].end_line), (2, 4));
    assert_eq!(chunks[0].as_text(), "#define xbm_width 1\r0x00\r};\r");
}

#[test]
fn test_read_line_splits_on_every_terminator() {
    let mut reader = Cursor::new(b"a\nb\r\nc\rd".to_vec());
    let mut lines = Vec::new();
    loop {
        let mut buf = Vec::new();
        if read_line(&mut reader, &mut buf).unwrap() == 0 {
            break;
        }
        lines.push(buf);
    }

    assert_eq!(
        lines,
        vec![b"a\n".to_vec(), b"b\r\n".to_vec(), b"c\r".to_vec(), b"d".to_vec()]
    );
}

#[test]
fn test_read_line_crlf_across_buffer_boundary() {
    let inner = Cursor::new(b"x\r\ny\n".to_vec());
    let mut reader = std::io::BufReader::with_capacity(2, inner);

    let mut first = Vec::new();
    read_line(&mut reader, &mut first).unwrap();
    let mut second = Vec::new();
    read_line(&mut reader, &mut second).unwrap();

    assert_eq!(first, b"x\r\n");
    assert_eq!(second, b"y\n");
}

#[test]
fn test_line_count_never_underflows() {
    let chunk = Chunk {
        start_line: 9,
        end_line: 3,
        content: Vec::new(),
    };
    assert_eq!(chunk.line_count(), 1);
}

#[test]
fn test_non_utf8_bytes_survive() {
    let mut input = b"#define xbm_width 1\n".to_vec();
    input.extend_from_slice(&[0xff, 0xfe, b'\n']);
    input.extend_from_slice(b"};\n");

    let chunks: Vec<_> = scan_chunks(Cursor::new(&input), Markers::default(), ScanPolicy::Lenient)
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].content, input);
}

#[test]
fn test_no_markers_no_chunks() {
    assert!(scan_ok("just\nsome\nlog output\n").is_empty());
    assert!(scan_ok("").is_empty());
}

#[test]
fn test_custom_markers() {
    let markers = Markers {
        start: "BEGIN".to_string(),
        end: "END".to_string(),
    };
    let chunks: Vec<_> = scan_chunks(Cursor::new("BEGIN\nbody\nEND\n"), markers, ScanPolicy::Strict)
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].as_text(), "BEGIN\nbody\nEND\n");
}

// ========================================================================
// Unpaired markers, lenient policy
// ========================================================================

#[test]
fn test_unterminated_tail_is_dropped() {
    let input = "#define xbm_width 8\na\n};\n#define xbm_width 9\nb\n";
    let mut scanner = scan_chunks(Cursor::new(input), Markers::default(), ScanPolicy::Lenient);

    let first = scanner.next().unwrap().unwrap();
    assert_eq!((first.start_line, first.end_line), (1, 3));
    assert!(scanner.next().is_none());
    assert_eq!(scanner.stats().dropped_tail, Some(4));
    assert_eq!(scanner.stats().lines, 5);
}

#[test]
fn test_final_closer_without_newline_does_not_close() {
    let chunks = scan_ok("#define xbm_width 8\na\n};");
    assert!(chunks.is_empty());
}

#[test]
fn test_orphan_end_is_ignored() {
    let input = "struct foo = {\n};\n#define xbm_width 8\na\n};\n";
    let mut scanner = scan_chunks(Cursor::new(input), Markers::default(), ScanPolicy::Lenient);
    let chunks: Vec<_> = scanner.by_ref().map(|r| r.unwrap()).collect();

    assert_eq!(chunks.len(), 1);
    assert_eq!((chunks[0].start_line, chunks[0].end_line), (3, 5));
    assert_eq!(scanner.stats().orphan_ends, 1);
}

#[test]
fn test_orphan_end_after_chunk_does_not_reuse_header() {
    let chunks = scan_ok("#define xbm_width 8\na\n};\nb\n};\n");
    assert_eq!(chunks.len(), 1);
}

#[test]
fn test_nested_header_restarts_capture() {
    let input = "#define xbm_width 8\nstale\n#define xbm_width 9\nfresh\n};\n";
    let mut scanner = scan_chunks(Cursor::new(input), Markers::default(), ScanPolicy::Lenient);
    let chunks: Vec<_> = scanner.by_ref().map(|r| r.unwrap()).collect();

    assert_eq!(chunks.len(), 1);
    assert_eq!((chunks[0].start_line, chunks[0].end_line), (3, 5));
    assert_eq!(chunks[0].as_text(), "#define xbm_width 9\nfresh\n};\n");
    assert_eq!(scanner.stats().restarted_headers, 1);
}

// ========================================================================
// Unpaired markers, strict policy
// ========================================================================

#[test]
fn test_strict_rejects_nested_header() {
    let results = scan(
        "#define xbm_width 8\n#define xbm_width 9\n};\n",
        ScanPolicy::Strict,
    );

    assert_eq!(results.len(), 1);
    assert!(matches!(
        results[0],
        Err(ExtractError::NestedStart { open_line: 1, line: 2 })
    ));
}

#[test]
fn test_strict_rejects_orphan_end() {
    let results = scan("noise\n};\n", ScanPolicy::Strict);

    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], Err(ExtractError::OrphanEnd { line: 2 })));
}

#[test]
fn test_strict_rejects_unterminated_tail() {
    let results = scan(
        "#define xbm_width 8\na\n};\n#define xbm_width 9\n",
        ScanPolicy::Strict,
    );

    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    let err = results[1].as_ref().unwrap_err();
    assert!(matches!(err, ExtractError::Unterminated { start_line: 4 }));
    assert!(err.to_string().contains("never closed"));
}

#[test]
fn test_scanner_is_fused_after_error() {
    let mut scanner = scan_chunks(
        Cursor::new("};\n#define xbm_width 8\n};\n"),
        Markers::default(),
        ScanPolicy::Strict,
    );

    assert!(scanner.next().unwrap().is_err());
    assert!(scanner.next().is_none());
}

mod common;

use common::*;
use vellum_interpret::Diagnostic;
use vellum_interpret::vellum_syntax::XRef;
use vellum_interpret::vellum_syntax::object::{Dict, ObjRef, Object};

fn helvetica() -> Dict {
    Dict::new()
        .with("Type", name("Font"))
        .with("Subtype", name("Type1"))
        .with("BaseFont", name("Helvetica"))
        .with("FirstChar", 65)
        .with("Widths", vec![500, 600])
}

fn fonts() -> Dict {
    resources("Font", vec![("F1", Object::Dict(helvetica()))])
}

fn chars(recorder: &Recorder) -> Vec<(f64, f64, f64, u32, String)> {
    recorder
        .calls
        .iter()
        .filter_map(|c| match c {
            Call::Char {
                x,
                y,
                dx,
                code,
                unicode,
            } => Some((*x, *y, *dx, *code, unicode.clone())),
            _ => None,
        })
        .collect()
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

#[test]
fn show_text() {
    let (recorder, diagnostics) =
        run_with(&XRef::new(), fonts(), b"BT /F1 10 Tf 20 30 Td (AB) Tj ET");

    assert!(diagnostics.is_empty());
    assert_eq!(
        &recorder.calls[..5],
        [
            Call::TextPosition(0.0, 0.0),
            Call::BeginText,
            Call::TextPosition(20.0, 30.0),
            Call::UpdateFont,
            Call::BeginString(b"AB".to_vec()),
        ]
    );
    assert_eq!(recorder.count(|c| *c == Call::EndString), 1);
    assert_eq!(recorder.count(|c| *c == Call::EndText), 1);

    let chars = chars(&recorder);
    assert_eq!(chars.len(), 2);
    assert_eq!((chars[0].3, chars[0].4.as_str()), (65, "A"));
    assert_eq!((chars[1].3, chars[1].4.as_str()), (66, "B"));
    assert_close(chars[0].0, 20.0);
    assert_close(chars[0].1, 30.0);
    assert_close(chars[0].2, 5.0);
    assert_close(chars[1].0, 25.0);
    assert_close(chars[1].2, 6.0);
}

#[test]
fn font_is_reported_once() {
    let (recorder, _) = run_with(&XRef::new(), fonts(), b"BT /F1 10 Tf (A) Tj (B) Tj ET");

    assert_eq!(recorder.count(|c| *c == Call::UpdateFont), 1);
}

#[test]
fn show_space_text() {
    let (recorder, _) = run_with(&XRef::new(), fonts(), b"BT /F1 10 Tf [(A) -1000 (B)] TJ ET");

    assert_eq!(recorder.count(|c| *c == Call::TextShift(-1000.0)), 1);

    let chars = chars(&recorder);
    assert_close(chars[0].0, 0.0);
    // The advance of `A` plus the adjustment of one em.
    assert_close(chars[1].0, 15.0);
}

#[test]
fn spacing_and_scaling() {
    let (recorder, _) = run_with(&XRef::new(), fonts(), b"BT /F1 10 Tf 2 Tc 50 Tz (AA) Tj ET");

    assert_eq!(recorder.count(|c| *c == Call::UpdateTextMatrix), 1);

    let chars = chars(&recorder);
    assert_close(chars[0].2, 3.5);
    assert_close(chars[1].0, 3.5);
}

#[test]
fn next_line_operators() {
    let (recorder, _) = run_with(
        &XRef::new(),
        fonts(),
        b"BT /F1 10 Tf 12 TL 5 50 Td (A) ' 0 -20 TD T* 1 2 (B) \" ET",
    );

    let positions = recorder
        .calls
        .iter()
        .filter_map(|c| match c {
            Call::TextPosition(x, y) => Some((*x, *y)),
            _ => None,
        })
        .collect::<Vec<_>>();

    assert_eq!(
        positions,
        [(0.0, 0.0), (5.0, 50.0), (5.0, 38.0), (5.0, 18.0), (5.0, -2.0), (5.0, -22.0)]
    );
}

#[test]
fn text_matrix() {
    let (recorder, _) = run_with(&XRef::new(), fonts(), b"BT /F1 10 Tf 2 0 0 2 100 100 Tm (AB) Tj ET");

    let chars = chars(&recorder);
    assert_close(chars[0].0, 100.0);
    assert_close(chars[0].1, 100.0);
    // The advance is given in text space, the pen moves in user space.
    assert_close(chars[0].2, 5.0);
    assert_close(chars[1].0, 110.0);
}

#[test]
fn no_font() {
    let (recorder, diagnostics) = run(b"BT (A) Tj [(A)] TJ ET");

    assert_eq!(diagnostics, [Diagnostic::NoFont("Tj"), Diagnostic::NoFont("TJ")]);
    assert!(chars(&recorder).is_empty());
}

#[test]
fn missing_font() {
    let (_, diagnostics) = run_with(&XRef::new(), fonts(), b"BT /F9 10 Tf (A) Tj ET");

    assert_eq!(
        diagnostics,
        [
            Diagnostic::MissingResource {
                category: "font",
                name: "F9".to_string(),
            },
            Diagnostic::NoFont("Tj"),
        ]
    );
}

#[test]
fn type3_glyphs_are_drawn() {
    let procs = Dict::new().with("a", stream(Dict::new(), b"0 0 1000 1000 re f"));
    let encoding = Dict::new().with("Differences", Object::from(vec![Object::from(65), name("a")]));
    let font = Dict::new()
        .with("Type", name("Font"))
        .with("Subtype", name("Type3"))
        .with("FontMatrix", vec![0.001, 0.0, 0.0, 0.001, 0.0, 0.0])
        .with("FontBBox", vec![0, 0, 1000, 1000])
        .with("FirstChar", 65)
        .with("Widths", vec![1000])
        .with("Encoding", encoding)
        .with("CharProcs", procs);
    let resources = resources("Font", vec![("T3", Object::Dict(font))]);

    let (recorder, diagnostics) =
        run_with(&XRef::new(), resources, b"BT /T3 10 Tf 5 5 Td (AA) Tj ET");

    assert!(diagnostics.is_empty());
    assert!(chars(&recorder).is_empty());
    assert_eq!(recorder.paths(), 2);
    assert_eq!(
        recorder.count(|c| *c == Call::Save),
        recorder.count(|c| *c == Call::Restore) - 1
    );
}

#[test]
fn recursive_type3_glyph() {
    let mut xref = XRef::new();
    let id = ObjRef::new(1, 0);
    let procs = Dict::new().with(
        "a",
        stream(Dict::new(), b"0 0 1000 1000 re f BT /T3 1 Tf (A) Tj ET"),
    );
    let font = Dict::new()
        .with("Type", name("Font"))
        .with("Subtype", name("Type3"))
        .with("FontMatrix", vec![0.001, 0.0, 0.0, 0.001, 0.0, 0.0])
        .with("FontBBox", vec![0, 0, 1000, 1000])
        .with("FirstChar", 65)
        .with("Widths", vec![1000])
        .with(
            "Encoding",
            Dict::new().with("Differences", Object::from(vec![Object::from(65), name("a")])),
        )
        .with("CharProcs", procs)
        .with("Resources", resources("Font", vec![("T3", Object::Ref(id))]));
    xref.insert(id, Object::Dict(font));

    let (recorder, _) = run_with(
        &xref,
        resources("Font", vec![("T3", Object::Ref(id))]),
        b"BT /T3 10 Tf (A) Tj ET",
    );

    // The page shows the glyph, which nests 20 more levels, like forms do.
    assert_eq!(recorder.paths(), 21);
}

#[test]
fn text_render_mode() {
    let xref = XRef::new();
    let (_, diagnostics) = inspect(
        &xref,
        fonts(),
        b"BT 7 Tr 9 Tr ET",
        Recorder::default(),
        |interpreter| {
            assert!(interpreter.state().text.render_mode.is_clip());
            assert!(!interpreter.state().text.render_mode.is_fill());
        },
    );

    assert!(diagnostics.is_empty());
}

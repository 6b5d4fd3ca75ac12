mod common;

use common::*;
use kurbo::{Affine, PathEl, Point, Rect};
use vellum_interpret::state::FillRule;
use vellum_interpret::vellum_syntax::XRef;
use vellum_interpret::vellum_syntax::object::{Array, Dict, Object};
use vellum_interpret::{Diagnostic, InterpretError, Interpreter, PageParams};

#[test]
fn fill_rectangle() {
    let (recorder, diagnostics) = run(b"1 0 0 rg 10 10 100 100 re f");

    assert!(diagnostics.is_empty());
    assert_eq!(
        recorder.styles(),
        ["fill:#ff0000;fill-opacity:1;fill-rule:nonzero;stroke:none"]
    );
}

#[test]
fn stroke_color_is_separate() {
    let (recorder, _) = run(b"1 0 0 RG 10 10 100 100 re f");

    assert_eq!(
        recorder.styles(),
        ["fill:#000000;fill-opacity:1;fill-rule:nonzero;stroke:none"]
    );
}

#[test]
fn restore_undoes_transform() {
    let (recorder, _) = run(b"q 2 0 0 2 0 0 cm 0 0 1 rg 0 0 10 10 re f Q 0 0 10 10 re f");

    assert_eq!(recorder.paths(), 2);
    assert_eq!(recorder.ctms(), [PAGE_CTM * Affine::scale(2.0), PAGE_CTM]);

    let styles = recorder.styles();
    assert!(styles[0].starts_with("fill:#0000ff;"));
    assert!(styles[1].starts_with("fill:#000000;"));

    // A transform directly after `q` goes to the group opened by the save.
    assert_eq!(
        &recorder.calls[..2],
        [Call::Save, Call::SetTransform(Affine::scale(2.0))]
    );
}

#[test]
fn concatenated_transforms() {
    let (recorder, _) = run(b"q 2 0 0 2 0 0 cm 1 0 0 1 5 5 cm 0 0 1 1 re f 3 0 0 3 0 0 cm 0 0 1 1 re f Q");

    let transforms = recorder
        .calls
        .iter()
        .filter(|c| matches!(c, Call::SetTransform(_) | Call::PushGroup))
        .cloned()
        .collect::<Vec<_>>();

    assert_eq!(
        transforms,
        [
            Call::SetTransform(Affine::scale(2.0)),
            Call::SetTransform(Affine::scale(2.0) * Affine::translate((5.0, 5.0))),
            Call::PushGroup,
            Call::SetTransform(Affine::scale(3.0)),
        ]
    );
}

#[test]
fn stroke_open_path() {
    let (recorder, _) = run(b"3 4 m 5 6 l S");

    let styles = recorder.styles();
    assert_eq!(styles.len(), 1);
    assert!(styles[0].starts_with("fill:none;stroke:#000000;stroke-opacity:1;stroke-width:1;"));
}

#[test]
fn unresolved_pattern() {
    let (recorder, diagnostics) = run(b"/Pattern cs /P0 scn 0 0 10 10 re f 0 g 0 0 5 5 re f");

    assert_eq!(recorder.paths(), 1);
    assert_eq!(
        diagnostics,
        [Diagnostic::MissingResource {
            category: "pattern",
            name: "P0".to_string(),
        }]
    );
}

#[test]
fn save_restore_balance() {
    let xref = XRef::new();
    let (recorder, _) = inspect(
        &xref,
        Dict::new(),
        b"q q q 0 0 1 1 re W n Q",
        Recorder::default(),
        |interpreter| {
            assert_eq!(interpreter.saved_states(), 2);
            assert_eq!(interpreter.clip_depth(), 2);
        },
    );

    // The page setup saves once, too.
    let saves = recorder.count(|c| *c == Call::Save) + 1;
    assert_eq!(saves, 4);
    assert_eq!(recorder.count(|c| *c == Call::Restore), saves);
}

#[test]
fn unbalanced_restore() {
    let xref = XRef::new();
    let (recorder, diagnostics) = inspect(
        &xref,
        Dict::new(),
        b"Q Q q",
        Recorder::default(),
        |interpreter| assert_eq!(interpreter.saved_states(), 1),
    );

    assert_eq!(
        diagnostics,
        [Diagnostic::UnbalancedRestore, Diagnostic::UnbalancedRestore]
    );
    assert_eq!(recorder.calls, [Call::Save, Call::Restore, Call::Restore]);
}

#[test]
fn too_few_arguments() {
    let xref = XRef::new();
    let (_, diagnostics) = inspect(
        &xref,
        Dict::new(),
        b"10 10 m 20 l",
        Recorder::default(),
        |interpreter| {
            assert_eq!(interpreter.state().path().elements().len(), 1);
            assert_eq!(interpreter.state().cur_pt(), Some(Point::new(10.0, 10.0)));
        },
    );

    assert_eq!(
        diagnostics,
        [Diagnostic::TooFewArguments {
            op: "l",
            expected: 2,
            found: 1,
        }]
    );
}

#[test]
fn extra_arguments_are_dropped() {
    let xref = XRef::new();
    let (_, diagnostics) = inspect(
        &xref,
        Dict::new(),
        b"1 2 3 4 m",
        Recorder::default(),
        |interpreter| {
            assert_eq!(interpreter.state().cur_pt(), Some(Point::new(3.0, 4.0)));
        },
    );

    assert!(diagnostics.is_empty());
}

#[test]
fn wrong_argument_type() {
    let xref = XRef::new();
    let (_, diagnostics) = inspect(
        &xref,
        Dict::new(),
        b"(a) 1 m 5 w",
        Recorder::default(),
        |interpreter| {
            assert!(interpreter.state().cur_pt().is_none());
            assert_eq!(interpreter.state().line_width, 5.0);
        },
    );

    assert_eq!(
        diagnostics,
        [Diagnostic::ArgumentType {
            op: "m",
            index: 0,
            found: "string",
        }]
    );
}

#[test]
fn unknown_operators() {
    let (_, diagnostics) = run(b"foo BX bar baz EX");

    assert_eq!(diagnostics, [Diagnostic::UnknownOperator("foo".to_string())]);
}

#[test]
fn operand_overflow() {
    let mut content = "0 ".repeat(34);
    content.push_str("n 1 2");

    let (_, diagnostics) = run(content.as_bytes());

    assert!(matches!(
        diagnostics.as_slice(),
        [
            Diagnostic::OperandOverflow { .. },
            Diagnostic::LeftoverOperands(2)
        ]
    ));
}

#[test]
fn paint_without_current_point() {
    let xref = XRef::new();
    let (recorder, diagnostics) = inspect(
        &xref,
        Dict::new(),
        b"f S B b* n",
        Recorder::default(),
        |interpreter| assert!(interpreter.state().path().elements().is_empty()),
    );

    assert_eq!(
        diagnostics,
        [
            Diagnostic::NoCurrentPoint("fill"),
            Diagnostic::NoCurrentPoint("stroke"),
            Diagnostic::NoCurrentPoint("fillstroke"),
            Diagnostic::NoCurrentPoint("closeeofillstroke"),
        ]
    );
    // Only the restore of the page setup.
    assert_eq!(recorder.calls, [Call::Restore]);
}

#[test]
fn path_without_current_point() {
    let (_, diagnostics) = run(b"5 5 l 1 2 3 4 5 6 c h");

    assert_eq!(
        diagnostics,
        [
            Diagnostic::NoCurrentPoint("lineto"),
            Diagnostic::NoCurrentPoint("curveto"),
            Diagnostic::NoCurrentPoint("closepath"),
        ]
    );
}

#[test]
fn curve_shorthands() {
    let xref = XRef::new();
    inspect(
        &xref,
        Dict::new(),
        b"0 0 m 1 1 2 2 v 3 3 4 4 y",
        Recorder::default(),
        |interpreter| {
            let elements = interpreter.state().path().elements().to_vec();

            assert_eq!(
                elements,
                [
                    PathEl::MoveTo(Point::new(0.0, 0.0)),
                    PathEl::CurveTo(
                        Point::new(0.0, 0.0),
                        Point::new(1.0, 1.0),
                        Point::new(2.0, 2.0)
                    ),
                    PathEl::CurveTo(
                        Point::new(3.0, 3.0),
                        Point::new(4.0, 4.0),
                        Point::new(4.0, 4.0)
                    ),
                ]
            );
        },
    );
}

#[test]
fn pending_clip() {
    let xref = XRef::new();
    inspect(
        &xref,
        Dict::new(),
        b"0 0 10 10 re W*",
        Recorder::default(),
        |interpreter| assert_eq!(interpreter.pending_clip(), Some(FillRule::EvenOdd)),
    );

    inspect(
        &xref,
        Dict::new(),
        b"0 0 10 10 re W n",
        Recorder::default(),
        |interpreter| assert_eq!(interpreter.pending_clip(), None),
    );
}

#[test]
fn clip_is_applied_once() {
    let (recorder, _) = run(b"0 0 10 10 re W n 0 0 5 5 re n");
    assert_eq!(recorder.clips(), 1);
    assert_eq!(recorder.calls[0], Call::Clip(false));

    let (recorder, _) = run(b"0 0 10 10 re n");
    assert_eq!(recorder.clips(), 0);

    let (recorder, _) = run(b"0 0 10 10 re W* f");
    assert_eq!(recorder.paths(), 1);
    assert_eq!(recorder.calls[1], Call::Clip(true));
}

#[test]
fn fill_and_stroke_variants() {
    let (recorder, _) = run(b"0 0 m 10 0 l 10 10 l b 0 0 10 10 re B* 0 0 10 10 re s");

    let styles = recorder.styles();
    assert_eq!(styles.len(), 3);
    assert!(styles[0].contains("fill-rule:nonzero") && styles[0].contains("stroke:#000000"));
    assert!(styles[1].contains("fill-rule:evenodd"));
    assert!(styles[2].starts_with("fill:none;"));

    // `b` closes the path before painting it.
    let Call::AddPath { path, .. } = &recorder.calls[0] else {
        panic!("expected a path");
    };
    assert_eq!(path.elements().last(), Some(&PathEl::ClosePath));
}

#[test]
fn line_style() {
    let (recorder, _) = run(b"4 w 1 J 2 j 7 M [3 1] 2 d 0 0 m 10 10 l S");

    assert_eq!(
        recorder.styles(),
        ["fill:none;stroke:#000000;stroke-opacity:1;stroke-width:4;stroke-linecap:round;\
          stroke-linejoin:bevel;stroke-miterlimit:7;stroke-dasharray:3,1;stroke-dashoffset:2"]
    );
}

#[test]
fn device_colors() {
    let (recorder, _) = run(b"0.5 g 0 0 1 1 re f 0 0 0 1 k 0 0 1 1 re f 1 1 0 0 K 0 0 1 1 re S");

    let styles = recorder.styles();
    assert!(styles[0].starts_with("fill:#808080;"));
    assert!(styles[1].starts_with("fill:#000000;"));
    assert!(styles[2].contains("stroke:#0000ff"));
}

#[test]
fn color_component_count() {
    let (recorder, diagnostics) = run(b"/DeviceRGB cs 1 0 sc 0 0 1 1 re f");

    assert_eq!(
        diagnostics,
        [Diagnostic::ColorComponentCount {
            op: "sc",
            expected: 3,
            found: 2,
        }]
    );
    assert!(recorder.styles()[0].starts_with("fill:#000000;"));
}

#[test]
fn marked_content() {
    let (_, diagnostics) = run(b"/Span BMC /P <</MCID 0>> BDC EMC EMC EMC /Tag MP EMC");

    assert_eq!(
        diagnostics,
        [
            Diagnostic::UnbalancedMarkedContent,
            Diagnostic::UnbalancedMarkedContent
        ]
    );
}

#[test]
fn stray_image_operators() {
    let (_, diagnostics) = run(b"EI");

    assert_eq!(diagnostics, [Diagnostic::UnexpectedOperator("EI")]);
}

#[test]
fn content_arrays() {
    let xref = XRef::new();
    let mut recorder = Recorder::default();

    {
        let params = PageParams::new(PAGE, 0, Dict::new());
        let mut interpreter =
            Interpreter::new(&xref, &mut recorder, params, settings().0);
        let contents = Object::Array(Array::new(vec![
            stream(Dict::new(), b"0 0 10 10"),
            stream(Dict::new(), b"re f"),
        ]));

        assert_eq!(interpreter.parse(&contents), Ok(()));
        assert_eq!(
            interpreter.parse(&Object::from(1)),
            Err(InterpretError::WeirdPageContents)
        );
        assert_eq!(
            interpreter.parse(&Object::Array(Array::new(vec![Object::from(1)]))),
            Err(InterpretError::WeirdPageContents)
        );
    }

    assert_eq!(recorder.paths(), 1);
}

#[test]
fn page_setup() {
    let xref = XRef::new();
    let mut recorder = Recorder::default();
    let page = Rect::new(0.0, 0.0, 200.0, 100.0);

    {
        let params = PageParams::new(page, 90, Dict::new());
        Interpreter::new(&xref, &mut recorder, params, settings().0);
    }

    assert_eq!(
        recorder.calls,
        [
            Call::DocumentSize(125.0, 250.0),
            Call::Save,
            Call::SetTransform(Affine::scale(1.25) * Affine::new([0.0, 1.0, 1.0, 0.0, 0.0, 0.0])),
            Call::Restore,
        ]
    );
}

#[test]
fn crop_box_clip() {
    let xref = XRef::new();
    let mut recorder = Recorder::default();

    {
        let params = PageParams::new(PAGE, 0, Dict::new())
            .with_crop_box(Rect::new(10.0, 10.0, 100.0, 100.0));
        let interpreter = Interpreter::new(&xref, &mut recorder, params, settings().0);

        assert_eq!(interpreter.saved_states(), 0);
        assert!(interpreter.state().path().elements().is_empty());
    }

    assert_eq!(recorder.calls[SETUP_CALLS], Call::SetClipPath(false));

    // A crop box that matches the page doesn't clip.
    let mut recorder = Recorder::default();

    {
        let params = PageParams::new(PAGE, 0, Dict::new()).with_crop_box(PAGE);
        Interpreter::new(&xref, &mut recorder, params, settings().0);
    }

    assert_eq!(recorder.clips(), 0);
}

#[test]
fn path_survives_restore() {
    let (recorder, _) = run(b"0 0 m q 10 10 l Q 20 0 l S");

    let Call::AddPath { path, .. } = &recorder.calls[2] else {
        panic!("expected a path");
    };
    assert_eq!(path.elements().len(), 3);
}

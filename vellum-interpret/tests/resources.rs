mod common;

use common::*;
use kurbo::{Affine, Cap, Rect};
use vellum_interpret::Diagnostic;
use vellum_interpret::state::BlendMode;
use vellum_interpret::vellum_syntax::XRef;
use vellum_interpret::vellum_syntax::object::{Dict, ObjRef, Object};

fn x_objects(entries: Vec<(&str, Object)>) -> Dict {
    resources("XObject", entries)
}

fn ext_g_states(entries: Vec<(&str, Dict)>) -> Dict {
    resources(
        "ExtGState",
        entries
            .into_iter()
            .map(|(k, v)| (k, Object::Dict(v)))
            .collect(),
    )
}

#[test]
fn draw_form() {
    let form = stream(
        form_dict([0, 0, 100, 100]).with("Matrix", vec![2, 0, 0, 2, 0, 0]),
        b"1 0 0 rg 0 0 10 10 re f",
    );
    let (recorder, diagnostics) =
        run_with(&XRef::new(), x_objects(vec![("Fm0", form)]), b"/Fm0 Do");

    assert!(diagnostics.is_empty());
    assert_eq!(
        recorder.calls[..3],
        [
            Call::Save,
            Call::SetTransform(Affine::scale(2.0)),
            Call::Clip(false),
        ]
    );
    assert_eq!(recorder.ctms(), [PAGE_CTM * Affine::scale(2.0)]);
    assert!(recorder.styles()[0].starts_with("fill:#ff0000;"));
    assert_eq!(recorder.calls[4..], [Call::Restore, Call::Restore]);
}

#[test]
fn form_state_is_isolated() {
    let form = form([0, 0, 100, 100], b"q q 5 w Q Q Q");
    let xref = XRef::new();
    let (_, diagnostics) = inspect(
        &xref,
        x_objects(vec![("Fm0", form)]),
        b"q /Fm0 Do",
        Recorder::default(),
        |interpreter| {
            assert_eq!(interpreter.saved_states(), 1);
            assert_eq!(interpreter.resource_depth(), 1);
            assert_eq!(interpreter.state().line_width, 1.0);
        },
    );

    // The form can't restore the state saved by the page.
    assert_eq!(diagnostics, [Diagnostic::UnbalancedRestore]);
}

#[test]
fn form_resources() {
    let inner = form([0, 0, 10, 10], b"0 0 1 1 re f");
    let outer = stream(
        form_dict([0, 0, 100, 100]).with("Resources", x_objects(vec![("Inner", inner)])),
        b"/Inner Do",
    );
    let (recorder, diagnostics) = run_with(
        &XRef::new(),
        x_objects(vec![("Outer", outer)]),
        b"/Outer Do /Inner Do",
    );

    assert_eq!(recorder.paths(), 1);
    assert_eq!(
        diagnostics,
        [Diagnostic::MissingResource {
            category: "xobject",
            name: "Inner".to_string(),
        }]
    );
}

#[test]
fn recursive_form() {
    let mut xref = XRef::new();
    let id = ObjRef::new(1, 0);
    let form = stream(
        form_dict([0, 0, 100, 100]).with("Resources", x_objects(vec![("Fm0", Object::Ref(id))])),
        b"0 0 10 10 re f /Fm0 Do",
    );
    xref.insert(id, form);

    let (recorder, diagnostics) = inspect(
        &xref,
        x_objects(vec![("Fm0", Object::Ref(id))]),
        b"/Fm0 Do",
        Recorder::default(),
        |interpreter| {
            assert_eq!(interpreter.saved_states(), 0);
            assert_eq!(interpreter.resource_depth(), 1);
        },
    );

    assert!(diagnostics.is_empty());
    // The page draws the form, which nests 20 more levels.
    assert_eq!(recorder.paths(), 21);
}

#[test]
fn bad_forms() {
    let no_bbox = stream(
        Dict::new().with("Subtype", name("Form")),
        b"0 0 1 1 re f",
    );
    let postscript = stream(Dict::new().with("Subtype", name("PS")), b"");
    let (recorder, diagnostics) = run_with(
        &XRef::new(),
        x_objects(vec![("A", no_bbox), ("B", postscript)]),
        b"/A Do /B Do /C Do",
    );

    assert_eq!(recorder.paths(), 0);
    assert_eq!(
        diagnostics,
        [
            Diagnostic::BadForm("bad form bounding box"),
            Diagnostic::MissingResource {
                category: "xobject",
                name: "C".to_string(),
            },
        ]
    );
}

#[test]
fn transparency_group() {
    let group = Dict::new()
        .with("S", name("Transparency"))
        .with("I", Object::Boolean(true));
    let form = stream(
        form_dict([0, 0, 100, 100]).with("Group", group),
        b"0 0 10 10 re f",
    );
    let resources = x_objects(vec![("Fm0", form)]).with(
        "ExtGState",
        Dict::new().with("GS0", Dict::new().with("ca", 0.5)),
    );
    let (recorder, _) = run_with(&XRef::new(), resources, b"/GS0 gs /Fm0 Do");
    let calls = recorder
        .calls
        .iter()
        .filter(|c| !matches!(c, Call::AddPath { .. }))
        .cloned()
        .collect::<Vec<_>>();

    assert_eq!(
        calls,
        [
            Call::Save,
            Call::ClearSoftMask,
            Call::PushTransparencyGroup {
                for_soft_mask: false,
                isolated: true,
            },
            Call::SetTransform(Affine::IDENTITY),
            Call::Clip(false),
            Call::GroupOpacity(0.5),
            Call::PopTransparencyGroup,
            Call::Restore,
            Call::PaintTransparencyGroup(Rect::new(0.0, 0.0, 100.0, 100.0)),
            Call::Restore,
        ]
    );
    // The group opacity replaces the fill opacity inside of the group.
    assert!(recorder.styles()[0].contains("fill-opacity:1;"));
}

#[test]
fn ext_g_state() {
    let gs = Dict::new()
        .with("Type", name("ExtGState"))
        .with("LW", 3)
        .with("LC", 1)
        .with("ca", 0.5)
        .with("CA", 0.25)
        .with("BM", name("Multiply"))
        .with("D", Object::from(vec![Object::from(vec![2]), Object::from(1)]));
    let xref = XRef::new();
    let (recorder, diagnostics) = inspect(
        &xref,
        ext_g_states(vec![("GS0", gs)]),
        b"/GS0 gs 0 0 1 1 re B",
        Recorder::default(),
        |interpreter| {
            let state = interpreter.state();

            assert_eq!(state.line_width, 3.0);
            assert_eq!(state.line_cap, Cap::Round);
            assert_eq!(state.blend_mode, BlendMode::Multiply);
            assert_eq!(state.dash_array.as_slice(), [2.0]);
            assert_eq!(state.dash_phase, 1.0);
        },
    );

    assert!(diagnostics.is_empty());

    let style = recorder.styles()[0];
    assert!(style.contains("fill-opacity:0.5;"));
    assert!(style.contains("stroke-opacity:0.25;"));
    assert!(style.contains("stroke-width:3;"));
}

#[test]
fn bad_ext_g_state() {
    let resources = ext_g_states(vec![("GS0", Dict::new().with("BM", name("Bogus")))]);
    let (_, diagnostics) = run_with(&XRef::new(), resources, b"/GS0 gs /GS1 gs");

    assert_eq!(
        diagnostics,
        [
            Diagnostic::BadExtGState("invalid blend mode"),
            Diagnostic::MissingResource {
                category: "ExtGState",
                name: "GS1".to_string(),
            },
        ]
    );
}

#[test]
fn soft_mask() {
    let group = Dict::new()
        .with("S", name("Transparency"))
        .with("CS", name("DeviceGray"));
    let mask_form = stream(
        form_dict([0, 0, 50, 50]).with("Group", group),
        b"1 g 0 0 50 50 re f",
    );
    let mask = Dict::new()
        .with("S", name("Luminosity"))
        .with("G", mask_form);
    let resources = ext_g_states(vec![
        ("Mask", Dict::new().with("SMask", mask)),
        ("NoMask", Dict::new().with("SMask", name("None"))),
    ]);
    let xref = XRef::new();
    let (recorder, diagnostics) = inspect(
        &xref,
        resources.clone(),
        b"/Mask gs",
        Recorder::default(),
        |interpreter| assert!(interpreter.state().soft_mask.is_some()),
    );

    assert!(diagnostics.is_empty());
    assert_eq!(
        recorder.calls[2],
        Call::PushTransparencyGroup {
            for_soft_mask: true,
            isolated: false,
        }
    );
    assert!(recorder.calls.contains(&Call::SetSoftMask(false)));
    assert_eq!(recorder.paths(), 1);

    inspect(
        &xref,
        resources,
        b"/Mask gs /NoMask gs",
        Recorder::default(),
        |interpreter| assert!(interpreter.state().soft_mask.is_none()),
    );
}

#[test]
fn soft_mask_sees_other_parameters() {
    let group = Dict::new()
        .with("S", name("Transparency"))
        .with("CS", name("DeviceGray"));
    let mask_form = stream(
        form_dict([0, 0, 50, 50]).with("Group", group),
        b"0 0 5 5 re S",
    );
    let mask = Dict::new()
        .with("S", name("Luminosity"))
        .with("G", mask_form);
    let ext_g_state = Dict::new()
        .with("SMask", mask)
        .with("LW", 7)
        .with("ca", 0.5)
        .with("CA", 0.5)
        .with("BM", name("Multiply"));
    let xref = XRef::new();
    let (recorder, diagnostics) = inspect(
        &xref,
        ext_g_states(vec![("GS0", ext_g_state)]),
        b"/GS0 gs",
        Recorder::default(),
        |interpreter| {
            let state = interpreter.state();
            assert_eq!(state.line_width, 7.0);
            assert_eq!(state.fill_opacity, 0.5);
            assert_eq!(state.blend_mode, BlendMode::Multiply);
            assert!(state.soft_mask.is_some());
        },
    );

    assert!(diagnostics.is_empty());
    assert_eq!(recorder.count(|c| *c == Call::GroupOpacity(0.5)), 1);
    assert_eq!(recorder.paths(), 1);
    assert!(recorder.styles()[0].contains("stroke-width:7;"));
}

#[test]
fn soft_mask_without_group() {
    let mask = Dict::new()
        .with("S", name("Alpha"))
        .with("G", form([0, 0, 10, 10], b""));
    let (recorder, diagnostics) = run_with(
        &XRef::new(),
        ext_g_states(vec![("GS0", Dict::new().with("SMask", mask))]),
        b"/GS0 gs",
    );

    assert_eq!(
        diagnostics,
        [Diagnostic::BadExtGState("soft mask is missing its group")]
    );
    assert_eq!(recorder.count(|c| matches!(c, Call::SetSoftMask(_))), 0);
}

fn image(dict: Dict, data: &[u8]) -> Object {
    stream(dict.with("Type", name("XObject")).with("Subtype", name("Image")), data)
}

fn rgb_image() -> Dict {
    Dict::new()
        .with("Width", 2)
        .with("Height", 1)
        .with("BitsPerComponent", 8)
        .with("ColorSpace", name("DeviceRGB"))
}

#[test]
fn images() {
    let plain = image(rgb_image(), &[0, 0, 0, 255, 255, 255]);
    let keyed = image(
        rgb_image().with("Mask", vec![0, 10, 0, 10, 0, 10]),
        &[0, 0, 0, 255, 255, 255],
    );
    let stencil = image(
        Dict::new()
            .with("Width", 8)
            .with("Height", 1)
            .with("ImageMask", Object::Boolean(true))
            .with("Decode", vec![1, 0]),
        &[0xf0],
    );
    let (recorder, diagnostics) = run_with(
        &XRef::new(),
        x_objects(vec![("Im0", plain), ("Im1", keyed), ("Im2", stencil)]),
        b"/Im0 Do /Im1 Do /Im2 Do",
    );

    assert!(diagnostics.is_empty());
    assert_eq!(
        recorder.calls[..3],
        [
            Call::Image {
                width: 2,
                height: 1,
                mask_colors: None,
            },
            Call::Image {
                width: 2,
                height: 1,
                mask_colors: Some(vec![0, 10, 0, 10, 0, 10]),
            },
            Call::ImageMask(true),
        ]
    );
}

#[test]
fn masked_images() {
    let soft_mask = stream(
        Dict::new()
            .with("Width", 2)
            .with("Height", 1)
            .with("BitsPerComponent", 8)
            .with("ColorSpace", name("DeviceGray")),
        &[0, 255],
    );
    let stencil = stream(
        Dict::new()
            .with("Width", 2)
            .with("Height", 1)
            .with("ImageMask", Object::Boolean(true)),
        &[0x80],
    );
    let soft = image(rgb_image().with("SMask", soft_mask), &[0; 6]);
    let hard = image(rgb_image().with("Mask", stencil), &[0; 6]);
    let (recorder, diagnostics) = run_with(
        &XRef::new(),
        x_objects(vec![("Soft", soft), ("Hard", hard)]),
        b"/Soft Do /Hard Do",
    );

    assert!(diagnostics.is_empty());
    assert_eq!(
        recorder.calls[..2],
        [Call::SoftMaskedImage, Call::MaskedImage(false)]
    );
}

#[test]
fn bad_images() {
    let no_color_space = image(
        Dict::new()
            .with("Width", 1)
            .with("Height", 1)
            .with("BitsPerComponent", 8),
        &[0],
    );
    let deep_mask = image(
        Dict::new()
            .with("Width", 1)
            .with("Height", 1)
            .with("BitsPerComponent", 8)
            .with("ImageMask", Object::Boolean(true)),
        &[0],
    );
    let (recorder, diagnostics) = run_with(
        &XRef::new(),
        x_objects(vec![("A", no_color_space), ("B", deep_mask)]),
        b"/A Do /B Do",
    );

    assert!(recorder.calls.iter().all(|c| *c == Call::Restore));
    assert_eq!(
        diagnostics,
        [
            Diagnostic::BadImage("missing color space"),
            Diagnostic::BadImage("image masks must have 1 bit per component"),
        ]
    );
}

#[test]
fn inline_image() {
    let (recorder, diagnostics) = run(b"BI /W 2 /H 1 /BPC 8 /CS /G ID ab EI 0 0 1 1 re f");

    assert!(diagnostics.is_empty());
    assert_eq!(
        recorder.calls[0],
        Call::Image {
            width: 2,
            height: 1,
            mask_colors: None,
        }
    );
    assert_eq!(recorder.paths(), 1);
}

#[test]
fn inline_image_color_space_resource() {
    let resources = resources("ColorSpace", vec![("CS0", name("DeviceRGB"))]);
    let (recorder, diagnostics) =
        run_with(&XRef::new(), resources, b"BI /W 1 /H 1 /BPC 8 /CS /CS0 ID abc EI");

    assert!(diagnostics.is_empty());
    assert_eq!(recorder.count(|c| matches!(c, Call::Image { .. })), 1);
}

#[test]
fn unterminated_inline_image() {
    let (recorder, diagnostics) = run(b"BI /W 1 /H 1 /BPC 8 /CS /G ID a");

    assert_eq!(diagnostics, [Diagnostic::InlineImageEof]);
    assert_eq!(recorder.calls, [Call::Restore]);
}

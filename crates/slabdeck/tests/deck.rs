//! End-to-end checks on the public slabdeck API.

use approx::assert_relative_eq;
use slabdeck::{
    build_solid, build_solid_with, cross_view, default_segments, horizontal_view,
    longitudinal_view, max_width, scene_to_glb, section_solid, slice, top_view, total_length,
    BridgeConfig, DeckError, ModelError, NodeRole, Point3, Reinforcement, ReinforcementZone,
    SectionPlane, Segment, SolidOptions, Vec3, ViewError,
};

fn three_span_deck() -> Vec<Segment> {
    vec![
        Segment::new(4.0, 3.0, 4.0, 0.8, 1.2, 0.0),
        Segment::new(5.0, 3.0, 4.5, 0.9, 1.2, 8.0),
        Segment::new(5.0, 2.5, 4.5, 0.9, 1.1, 12.0),
        Segment::new(4.0, 2.5, 4.0, 0.8, 1.0, 8.0),
    ]
}

#[test]
fn test_triangle_count_scales_with_spans() {
    for n in 2..=6 {
        let segments: Vec<Segment> = (0..n)
            .map(|i| Segment::new(3.0, 2.0, 3.0, 0.5, 0.7, if i == 0 { 0.0 } else { 5.0 }))
            .collect();
        let solid = build_solid(&segments).unwrap();
        assert_eq!(solid.num_triangles(), 36 * (n - 1), "{n} segments");
    }
}

#[test]
fn test_default_deck_summary() {
    let segments = default_segments();
    let solid = build_solid(&segments).unwrap();
    assert_eq!(solid.num_triangles(), 36);
    assert_relative_eq!(total_length(&segments), 10.0);
    assert_relative_eq!(max_width(&segments), 30.0);
}

#[test]
fn test_build_is_deterministic() {
    let a = build_solid(&three_span_deck()).unwrap();
    let b = build_solid(&three_span_deck()).unwrap();
    assert_eq!(a.deck().num_vertices(), b.deck().num_vertices());
    assert_eq!(a.deck().num_triangles(), b.deck().num_triangles());
    assert_eq!(a.deck(), b.deck());
}

#[test]
fn test_invalid_input_is_rejected() {
    let reference = default_segments();
    let one = &reference[..1];
    assert!(matches!(
        build_solid(one),
        Err(ModelError::InvalidGeometry(_))
    ));

    let mut segments = default_segments();
    segments[1].zone1_width = 0.0;
    let err = build_solid(&segments).unwrap_err();
    assert!(err.to_string().contains("D2"), "{err}");

    assert!(matches!(
        cross_view(one, 0.0),
        Err(ViewError::Model(ModelError::InvalidGeometry(_)))
    ));
}

#[test]
fn test_horizontal_slices_inside_outer_thickness() {
    let segments = three_span_deck();
    let solid = build_solid(&segments).unwrap();
    for z in [-0.05, -0.3, -0.6, -0.79] {
        let entities = slice(&solid, Point3::new(0.0, 0.0, z), Vec3::z()).unwrap();
        assert!(!entities.is_empty(), "z = {z}");
        assert!(entities.iter().all(|e| !e.is_empty()));
    }
}

#[test]
fn test_cross_view_at_both_ends() {
    let segments = three_span_deck();
    let length = total_length(&segments);
    for x in [0.0, length - 1e-6] {
        let plot = cross_view(&segments, x).unwrap();
        assert!(!plot.line_segments.is_empty(), "x = {x}");
    }
    // past the end is clamped onto the deck
    assert!(!cross_view(&segments, length + 5.0).unwrap().line_segments.is_empty());
}

#[test]
fn test_reference_views() {
    let segments = default_segments();

    let horizontal = horizontal_view(&segments, -1.0).unwrap();
    assert_eq!(horizontal.annotations_starting_with("l = ").count(), 1);
    assert_eq!(horizontal.annotations_starting_with("Z").count(), 3);

    let cross = cross_view(&segments, 5.0).unwrap();
    assert!(!cross.line_segments.is_empty());
    assert_relative_eq!(cross.axis_ranges.x[0], -19.5, epsilon = 1e-9);
    assert_relative_eq!(cross.axis_ranges.x[1], 14.5, epsilon = 1e-9);

    let longitudinal = longitudinal_view(&segments, 0.0).unwrap();
    assert!(!longitudinal.line_segments.is_empty());
}

#[test]
fn test_empty_slice_is_not_an_error() {
    let plot = horizontal_view(&default_segments(), 50.0).unwrap();
    assert!(plot.line_segments.is_empty());
    assert!(plot.annotations.is_empty());
    assert!(plot.axis_ranges.x[1] > plot.axis_ranges.x[0]);
}

#[test]
fn test_section_scene_keeps_markers_out_of_the_cut() {
    let solid = build_solid(&default_segments()).unwrap();
    let section = section_solid(&solid, &SectionPlane::cross(5.0)).unwrap();
    assert!(!section.entities.is_empty());
    assert_eq!(section.decoration.len(), 4);
    for p in section.entities.iter().flat_map(|e| e.points.iter()) {
        assert_relative_eq!(p.x, 5.0, epsilon = 1e-6);
    }

    let bare = build_solid_with(&default_segments(), &SolidOptions::bare()).unwrap();
    assert!(section_solid(&bare, &SectionPlane::cross(5.0))
        .unwrap()
        .decoration
        .is_empty());
}

#[test]
fn test_top_view_and_glb_from_config() {
    let config = BridgeConfig::with_segments(three_span_deck());
    config.validate().unwrap();

    let plot = top_view(&config.segments).unwrap();
    assert_eq!(plot.fills.len(), 9);
    assert_eq!(plot.annotations_starting_with("D").count(), 4);

    let solid = config.build_solid(true, true).unwrap();
    let bytes = scene_to_glb(&solid.scene).unwrap();
    assert_eq!(&bytes[..4], b"glTF");
}

#[test]
fn test_config_errors_surface_as_deck_errors() {
    let err = BridgeConfig::from_json_str(r#"{"segments": [{"bz1": 1}]}"#).unwrap_err();
    assert!(matches!(err, DeckError::Json(_)));

    let config = BridgeConfig::with_segments(default_segments()[..1].to_vec());
    assert!(matches!(config.validate(), Err(DeckError::Model(_))));
}

#[test]
fn test_reinforcement_stays_out_of_sections() {
    let segments = three_span_deck();
    let zones = (1..=3)
        .flat_map(|span| (1..=3).map(move |zone| format!("{zone}-{span}")))
        .map(|number| ReinforcementZone::uniform(number, 16.0, 150.0))
        .collect();
    let options = SolidOptions {
        reinforcement: Some(Reinforcement {
            zones,
            ..Reinforcement::default()
        }),
        ..SolidOptions::bare()
    };
    let reinforced = build_solid_with(&segments, &options).unwrap();
    let plain = build_solid_with(&segments, &SolidOptions::bare()).unwrap();

    assert_eq!(reinforced.scene.nodes_with_role(NodeRole::Reinforcement).count(), 9);
    assert_eq!(reinforced.num_triangles(), plain.num_triangles());
    for plane in [
        SectionPlane::cross(6.0),
        SectionPlane::longitudinal(0.0),
        SectionPlane::horizontal(-0.4),
    ] {
        let with_bars = section_solid(&reinforced, &plane).unwrap();
        let without = section_solid(&plain, &plane).unwrap();
        assert_eq!(with_bars.entities, without.entities);
        assert!(with_bars.decoration.is_empty());
    }

    let bytes = scene_to_glb(&reinforced.scene).unwrap();
    assert_eq!(&bytes[..4], b"glTF");
}

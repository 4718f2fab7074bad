//! Two-column arrangement against the memory host.

use glam::{DAffine2, DVec2, dvec2};
use tagalign::commands::arrange_selection;
use tagalign::host::memory::{MemoryAnnotation, MemoryHost};
use tagalign::layout::arrange::{TagLeader, count_crossings, decross_pass};
use tagalign::layout::{AnchoredTag, FreeNote, Side};
use tagalign::{
    ArrangeMode, ArrangeSettings, BBox, Command, CropRegion, ElbowPolicy, ElementId, LayoutSettings,
    LeaderEndCondition, Outcome, SlotInset,
};

fn view() -> BBox {
    BBox::from_corners(dvec2(0.0, 0.0), dvec2(100.0, 100.0))
}

/// A 4×2 leaderless tag on a point
fn add_tag(host: &mut MemoryHost, up_left: DVec2, anchor: DVec2) -> ElementId {
    let target = host.add_point(anchor);
    host.add_annotation(MemoryAnnotation::new(AnchoredTag, up_left, dvec2(4.0, 2.0)).tagging(target))
}

fn pt(p: DVec2) -> String {
    format!("({:.2}, {:.2})", p.x, p.y)
}

fn listing(host: &MemoryHost) -> String {
    host.annotations()
        .map(|(id, a)| match a.leader {
            Some(l) => format!(
                "{id} head {} elbow {} end {} {:?}",
                pt(a.head),
                l.elbow.map_or_else(|| "-".to_string(), pt),
                pt(l.end),
                l.condition
            ),
            None => format!("{id} head {}", pt(a.head)),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Two tags whose anchors sit in the right half of the view, placed so the
/// nearest-slot pass hands them crossing leaders
fn crossing_scene(offset: DVec2) -> (MemoryHost, ElementId, ElementId) {
    let mut host = MemoryHost::new();
    let a = add_tag(&mut host, dvec2(60.0, 30.0) + offset, dvec2(70.0, 80.0) + offset);
    let b = add_tag(&mut host, dvec2(66.0, 70.0) + offset, dvec2(80.0, 20.0) + offset);
    let crop = CropRegion { bounds: view(), transform: DAffine2::from_translation(offset) };
    host.set_crop(Some(crop));
    host.select(&[a, b]);
    (host, a, b)
}

#[test]
fn arrangement_untangles_left_column() {
    let (mut host, a, b) = crossing_scene(DVec2::ZERO);

    let report = arrange_selection(&mut host, ArrangeMode::BothSides, &LayoutSettings::default())
        .unwrap();
    assert_eq!(report.left, vec![b, a]);
    assert!(report.right.is_empty());
    assert_eq!(report.swaps, 1);
    assert_eq!(report.remaining_crossings, 0);
    assert_eq!(host.committed_scopes(), ["Arrange Tags".to_string()]);

    insta::assert_snapshot!(listing(&host), @r"
    #2 head (0.00, 51.15) elbow (40.15, 50.15) end (70.00, 80.00) Attached
    #4 head (0.00, 50.85) elbow (50.15, 49.85) end (80.00, 20.00) Attached
    ");
}

#[test]
fn arrangement_follows_crop_transform() {
    let offset = dvec2(1000.0, -500.0);
    let (mut local, a, b) = crossing_scene(DVec2::ZERO);
    let (mut moved, _, _) = crossing_scene(offset);
    let settings = LayoutSettings::default();

    assert_eq!(Command::Arrange(ArrangeMode::BothSides).execute(&mut local, &settings), Outcome::Succeeded);
    assert_eq!(Command::Arrange(ArrangeMode::BothSides).execute(&mut moved, &settings), Outcome::Succeeded);

    for id in [a, b] {
        let expected = local.annotation(id).unwrap();
        let actual = moved.annotation(id).unwrap();
        assert!(actual.head.distance(expected.head + offset) < 1e-9);
        let (el, al) = (expected.leader.unwrap(), actual.leader.unwrap());
        assert!(al.elbow.unwrap().distance(el.elbow.unwrap() + offset) < 1e-9);
    }
}

#[test]
fn forced_side_uses_one_column() {
    let (mut host, a, b) = crossing_scene(DVec2::ZERO);
    let report = arrange_selection(&mut host, ArrangeMode::RightOnly, &LayoutSettings::default())
        .unwrap();
    assert!(report.left.is_empty());
    assert_eq!(report.right.len(), 2);
    // slot centres at 100 − 8, heads a half width left of that, pushed 6 outward
    for id in [a, b] {
        let head = host.annotation(id).unwrap().head;
        assert!((head.x - 96.0).abs() < 1e-9, "{id} at {head}");
    }
}

#[test]
fn margin_inset_alternate() {
    let (mut host, a, _) = crossing_scene(DVec2::ZERO);
    let mut settings = LayoutSettings::default();
    settings.arrange.slot_inset = SlotInset::view_margin();

    arrange_selection(&mut host, ArrangeMode::BothSides, &settings).unwrap();
    // slot centre at X 5, head = centre − half width − 1.5 widths
    let head = host.annotation(a).unwrap().head;
    assert!((head.x - (-3.0)).abs() < 1e-9);
}

#[test]
fn missing_crop_fails_without_mutation() {
    let (mut host, _, _) = crossing_scene(DVec2::ZERO);
    host.set_crop(None);
    let before = host.clone();

    let outcome = Command::Arrange(ArrangeMode::BothSides).execute(&mut host, &LayoutSettings::default());
    assert_eq!(outcome, Outcome::Failed("Please set a crop box to the view".into()));
    assert!(host.same_document(&before));
    assert!(host.committed_scopes().is_empty());
}

#[test]
fn empty_crop_fails_without_mutation() {
    let (mut host, _, _) = crossing_scene(DVec2::ZERO);
    let flat = BBox::from_corners(dvec2(0.0, 0.0), dvec2(100.0, 0.0));
    host.set_crop(Some(CropRegion::axis_aligned(flat)));
    let before = host.clone();

    let outcome = Command::Arrange(ArrangeMode::BothSides).execute(&mut host, &LayoutSettings::default());
    assert!(matches!(outcome, Outcome::Failed(_)));
    assert!(host.same_document(&before));
}

#[test]
fn non_tags_are_skipped() {
    let (mut host, a, b) = crossing_scene(DVec2::ZERO);
    let note = host.add_annotation(MemoryAnnotation::new(FreeNote, dvec2(40.0, 40.0), dvec2(3.0, 1.0)));
    host.select(&[a, note, b]);

    let report = arrange_selection(&mut host, ArrangeMode::BothSides, &LayoutSettings::default())
        .unwrap();
    assert_eq!(report.skipped, vec![note]);
    assert_eq!(host.annotation(note).unwrap().head, dvec2(40.0, 40.0));
}

#[test]
fn only_non_tags_is_a_validation_failure() {
    let mut host = MemoryHost::new();
    host.set_crop(Some(CropRegion::axis_aligned(view())));
    let note = host.add_annotation(MemoryAnnotation::new(FreeNote, dvec2(1.0, 1.0), dvec2(1.0, 1.0)));
    host.select(&[note]);

    let outcome = Command::Arrange(ArrangeMode::BothSides).execute(&mut host, &LayoutSettings::default());
    assert_eq!(outcome, Outcome::Failed("Please select at least one tag.".into()));
}

#[test]
fn tag_with_deleted_geometry_moves_but_keeps_its_leader() {
    let mut host = MemoryHost::new();
    host.set_crop(Some(CropRegion::axis_aligned(view())));
    let target = host.add_point(dvec2(30.0, 30.0));
    let orphan = host.add_annotation(
        MemoryAnnotation::new(AnchoredTag, dvec2(20.0, 60.0), dvec2(4.0, 2.0))
            .tagging(target)
            .with_leader(dvec2(30.0, 30.0), Some(dvec2(30.0, 40.0))),
    );
    host.delete_geometry(target);
    host.select(&[orphan]);

    let report = arrange_selection(&mut host, ArrangeMode::BothSides, &LayoutSettings::default())
        .unwrap();
    // stand-in anchor just right of the view centre: left column
    assert_eq!(report.left, vec![orphan]);
    assert!(report.right.is_empty());

    // slot centre (8, 50), head offset (−2, 1), pushed 6 outward
    let moved = host.annotation(orphan).unwrap();
    assert_eq!(moved.head, dvec2(0.0, 51.0));
    let leader = moved.leader.unwrap();
    assert_eq!(leader.end, dvec2(30.0, 30.0));
    assert_eq!(leader.elbow, Some(dvec2(30.0, 40.0)));
    assert_eq!(leader.condition, LeaderEndCondition::Free);
}

#[test]
fn decrossing_does_not_add_crossings() {
    let settings = ArrangeSettings::default();
    let leader = |anchor: DVec2, center: DVec2| {
        let extent = BBox::from_corners(center - dvec2(2.0, 1.0), center + dvec2(2.0, 1.0));
        TagLeader::new(ElementId(0), Side::Left, anchor, extent, center, &settings)
    };
    // anchors fanned out to the right, slots stacked in reverse order
    let mut column: Vec<_> = (0..4)
        .map(|i| {
            let i = i as f64;
            leader(dvec2(60.0 + 5.0 * i, 20.0 + 20.0 * i), dvec2(10.0, 60.0 - 6.0 * i))
        })
        .collect();

    let before = count_crossings(&column);
    assert!(before > 0);
    decross_pass(&mut column);
    let after_one = count_crossings(&column);
    decross_pass(&mut column);
    let after_two = count_crossings(&column);
    assert!(after_one <= before);
    assert!(after_two <= after_one);
}

#[test]
fn angle_threshold_policy_bends_at_right_angles() {
    let (mut host, a, b) = crossing_scene(DVec2::ZERO);
    let mut settings = LayoutSettings::default();
    settings.arrange.elbow_policy = ElbowPolicy::angle_threshold();

    arrange_selection(&mut host, ArrangeMode::BothSides, &settings).unwrap();
    // both anchors are steep relative to their slots: corner right under or over the anchor
    for (id, anchor_x) in [(a, 70.0), (b, 80.0)] {
        let leader = host.annotation(id).and_then(|t| t.leader).unwrap();
        assert_eq!(leader.elbow.map(|e| e.x), Some(anchor_x));
    }
}

//! End-to-end align and distribute runs against the memory host.
//!
//! Run with: RUST_LOG=debug cargo test --features tracing --test align_tests -- --nocapture

use glam::{DVec2, dvec2};
use tagalign::host::memory::{MemoryAnnotation, MemoryHost, Pick};
use tagalign::layout::adapter::prepare;
use tagalign::layout::{AnchoredTag, FreeNote};
use tagalign::{AlignKind, Command, ElementId, Host, LayoutSettings, Length, Outcome};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A 2×1 tag with its upper-left corner at `up_left`, leadered to a point
fn add_tag(host: &mut MemoryHost, up_left: DVec2, anchor: DVec2) -> ElementId {
    let target = host.add_point(anchor);
    host.add_annotation(
        MemoryAnnotation::new(AnchoredTag, up_left, dvec2(2.0, 1.0))
            .tagging(target)
            .with_leader(anchor, None),
    )
}

fn add_note(host: &mut MemoryHost, up_left: DVec2) -> ElementId {
    host.add_annotation(MemoryAnnotation::new(FreeNote, up_left, dvec2(2.0, 1.0)))
}

fn head(host: &MemoryHost, id: ElementId) -> DVec2 {
    host.annotation(id).map(|a| a.head).unwrap()
}

fn run(host: &mut MemoryHost, kind: AlignKind) -> Outcome {
    Command::Align(kind).execute(host, &LayoutSettings::default())
}

// ============================================================================
// Alignment
// ============================================================================

#[test]
fn align_left_stacks_on_reference_line() {
    init_tracing();
    let mut host = MemoryHost::new();
    let a = add_tag(&mut host, dvec2(-1.0, 10.0), dvec2(4.0, 0.0));
    let b = add_tag(&mut host, dvec2(2.0, 10.0), dvec2(20.0, 0.0));
    let c = add_tag(&mut host, dvec2(5.0, 10.0), dvec2(9.0, 0.0));
    host.select(&[a, b, c]);

    assert_eq!(run(&mut host, AlignKind::Left), Outcome::Succeeded);

    // farthest anchor first: b (21 away), c (10), a (5)
    assert_eq!(head(&host, b), dvec2(-1.0, 10.0));
    assert_eq!(head(&host, c), dvec2(-1.0, 8.0));
    assert_eq!(head(&host, a), dvec2(-1.0, 6.0));
    assert_eq!(host.committed_scopes(), ["Align Left".to_string()]);
    assert_eq!(host.selection(), vec![a, b, c]);

    let leader = host.annotation(b).and_then(|t| t.leader).unwrap();
    assert_eq!(leader.end, dvec2(20.0, 0.0));
    assert_eq!(leader.elbow, Some(dvec2(20.0, 2.0)));
}

#[test]
fn align_left_moves_heads_not_corners() {
    let mut host = MemoryHost::new();
    // heads at the box centre, upper-left X −1, 2 and 5
    let ids: Vec<_> = [(-1.0, 4.0), (2.0, 20.0), (5.0, 9.0)]
        .into_iter()
        .map(|(x, anchor_x)| {
            let target = host.add_point(dvec2(anchor_x, 0.0));
            host.add_annotation(
                MemoryAnnotation::new(AnchoredTag, dvec2(x + 1.0, 9.5), dvec2(2.0, 1.0))
                    .with_head_offset(dvec2(1.0, -0.5))
                    .tagging(target)
                    .with_leader(dvec2(anchor_x, 0.0), None),
            )
        })
        .collect();
    host.select(&ids);

    assert_eq!(run(&mut host, AlignKind::Left), Outcome::Succeeded);
    assert_eq!(head(&host, ids[1]), dvec2(-1.0, 10.0));
    assert_eq!(head(&host, ids[2]), dvec2(-1.0, 8.0));
    assert_eq!(head(&host, ids[0]), dvec2(-1.0, 6.0));
}

#[test]
fn align_left_keeps_untagged_selection_order() {
    let mut host = MemoryHost::new();
    let narrow =
        host.add_annotation(MemoryAnnotation::new(FreeNote, dvec2(10.0, 10.0), dvec2(1.0, 1.0)));
    let wide =
        host.add_annotation(MemoryAnnotation::new(FreeNote, dvec2(0.0, 4.0), dvec2(5.0, 1.0)));
    host.select(&[narrow, wide]);

    assert_eq!(run(&mut host, AlignKind::Left), Outcome::Succeeded);
    let once = host.clone();
    assert_eq!(head(&host, narrow), dvec2(0.0, 10.0));
    assert_eq!(head(&host, wide), dvec2(0.0, 8.0));

    assert_eq!(run(&mut host, AlignKind::Left), Outcome::Succeeded);
    assert!(host.same_document(&once));
}

#[test]
fn align_is_idempotent() {
    for kind in [
        AlignKind::Left,
        AlignKind::Right,
        AlignKind::Top,
        AlignKind::Bottom,
        AlignKind::Middle,
    ] {
        let mut host = MemoryHost::new();
        let ids = [
            add_tag(&mut host, dvec2(3.0, 4.0), dvec2(30.0, -2.0)),
            add_tag(&mut host, dvec2(-2.0, 8.0), dvec2(-5.0, 1.0)),
            add_tag(&mut host, dvec2(7.0, 1.0), dvec2(12.0, -9.0)),
        ];
        host.select(&ids);

        assert_eq!(run(&mut host, kind), Outcome::Succeeded);
        let once = host.clone();
        assert_eq!(run(&mut host, kind), Outcome::Succeeded);
        assert!(host.same_document(&once), "{kind:?} moved tags on the second run");
    }
}

#[test]
fn picked_selection_is_left_empty() {
    let mut host = MemoryHost::new();
    let a = add_note(&mut host, dvec2(0.0, 4.0));
    let b = add_note(&mut host, dvec2(5.0, 1.0));
    host.queue_pick(Pick::Elements(vec![a, b]));

    assert_eq!(run(&mut host, AlignKind::Top), Outcome::Succeeded);
    assert_eq!(head(&host, b), dvec2(5.0, 4.0));
    assert!(host.selection().is_empty());
}

#[test]
fn single_selection_fails_without_mutation() {
    let mut host = MemoryHost::new();
    let a = add_note(&mut host, dvec2(0.0, 0.0));
    host.select(&[a]);
    let before = host.clone();

    assert_eq!(
        run(&mut host, AlignKind::Center),
        Outcome::Failed("Please select at least 2 elements to align.".into())
    );
    assert!(host.same_document(&before));
    assert!(host.committed_scopes().is_empty());
}

#[test]
fn cancelled_pick_is_cancelled() {
    let mut host = MemoryHost::new();
    add_note(&mut host, dvec2(0.0, 0.0));
    host.queue_pick(Pick::Cancel);
    let before = host.clone();

    assert_eq!(run(&mut host, AlignKind::Left), Outcome::Cancelled);
    assert!(host.same_document(&before));
}

#[test]
fn failed_write_rolls_everything_back() {
    let mut host = MemoryHost::new();
    let ids = [
        add_tag(&mut host, dvec2(0.0, 4.0), dvec2(10.0, 0.0)),
        add_tag(&mut host, dvec2(6.0, 9.0), dvec2(-10.0, 0.0)),
    ];
    host.select(&ids);
    host.fail_writes_to(ids[1]);
    let before = host.clone();

    let outcome = run(&mut host, AlignKind::Left);
    assert_eq!(outcome, Outcome::Failed(format!("write to {} rejected", ids[1])));
    assert!(host.same_document(&before));
    assert!(!host.in_scope());
    assert!(host.committed_scopes().is_empty());
}

#[test]
fn invalid_settings_fail_before_touching_the_host() {
    let mut host = MemoryHost::new();
    host.queue_pick(Pick::Cancel);
    let settings = LayoutSettings { pitch: Length(-2.0), ..Default::default() };

    let outcome = Command::Align(AlignKind::Left).execute(&mut host, &settings);
    assert_eq!(outcome, Outcome::Failed("invalid setting `pitch`: value is negative".into()));
}

#[test]
fn measured_box_ignores_leader() {
    let mut with = MemoryHost::new();
    let leadered = add_tag(&mut with, dvec2(0.0, 3.0), dvec2(40.0, -12.0));
    let mut without = MemoryHost::new();
    let target = without.add_point(dvec2(40.0, -12.0));
    let bare = without.add_annotation(
        MemoryAnnotation::new(AnchoredTag, dvec2(0.0, 3.0), dvec2(2.0, 1.0)).tagging(target),
    );

    let measured = prepare(&mut with, &[leadered]).unwrap();
    let reference = prepare(&mut without, &[bare]).unwrap();
    assert_eq!(measured[0].bounds, reference[0].bounds);
    assert!(with.has_leader(leadered).unwrap());
}

// ============================================================================
// Distribution
// ============================================================================

#[test]
fn distribute_horizontally_spaces_interior_heads() {
    let mut host = MemoryHost::new();
    let ids: Vec<_> = [0.0, 1.0, 2.0, 3.0, 10.0]
        .into_iter()
        .map(|x| add_tag(&mut host, dvec2(x, 0.0), dvec2(x, -5.0)))
        .collect();
    host.select(&ids);

    assert_eq!(run(&mut host, AlignKind::DistributeHorizontal), Outcome::Succeeded);
    let xs: Vec<f64> = ids.iter().map(|&id| head(&host, id).x).collect();
    assert_eq!(xs, vec![0.0, 2.5, 5.0, 7.5, 10.0]);
    assert_eq!(host.committed_scopes(), ["Distribute Horizontally".to_string()]);
}

#[test]
fn distribute_vertically_leaves_leaders_alone() {
    let mut host = MemoryHost::new();
    let ids = [
        add_tag(&mut host, dvec2(0.0, 0.0), dvec2(5.0, 5.0)),
        add_tag(&mut host, dvec2(3.0, 9.0), dvec2(8.0, 5.0)),
        add_tag(&mut host, dvec2(1.0, 12.0), dvec2(9.0, 5.0)),
    ];
    host.select(&ids);

    assert_eq!(run(&mut host, AlignKind::DistributeVertical), Outcome::Succeeded);
    assert_eq!(head(&host, ids[1]), dvec2(3.0, 6.0));
    let leader = host.annotation(ids[1]).and_then(|t| t.leader).unwrap();
    assert_eq!(leader.end, dvec2(8.0, 5.0));
    assert_eq!(leader.elbow, None);
}

#[test]
fn distribute_ignores_untagged_elements() {
    let mut host = MemoryHost::new();
    let a = add_tag(&mut host, dvec2(0.0, 0.0), dvec2(0.0, -5.0));
    let note = add_note(&mut host, dvec2(1.0, 0.0));
    let b = add_tag(&mut host, dvec2(3.0, 0.0), dvec2(3.0, -5.0));
    let c = add_tag(&mut host, dvec2(8.0, 0.0), dvec2(8.0, -5.0));
    host.select(&[a, note, b, c]);

    assert_eq!(run(&mut host, AlignKind::DistributeHorizontal), Outcome::Succeeded);
    assert_eq!(head(&host, b), dvec2(4.0, 0.0));
    assert_eq!(head(&host, note), dvec2(1.0, 0.0));
}

#[test]
fn distribute_needs_three() {
    let mut host = MemoryHost::new();
    let ids = [
        add_tag(&mut host, dvec2(0.0, 0.0), dvec2(0.0, -5.0)),
        add_note(&mut host, dvec2(2.0, 0.0)),
        add_tag(&mut host, dvec2(4.0, 0.0), dvec2(4.0, -5.0)),
    ];
    host.select(&ids);
    let before = host.clone();

    assert_eq!(
        run(&mut host, AlignKind::DistributeVertical),
        Outcome::Failed("Please select at least 3 tags to distribute.".into())
    );
    assert!(host.same_document(&before));
}

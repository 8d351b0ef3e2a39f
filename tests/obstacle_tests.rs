#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use flappy_evo::simulation::agent::Agent;
use flappy_evo::simulation::collision::{
    Barrier, BarrierSide, BoundingBox, CollisionKind, CollisionShape, Mask, PixelMask,
};
use flappy_evo::simulation::obstacle::Obstacle;
use flappy_evo::simulation::params::Params;
use rand::SeedableRng;
use rand_pcg::Pcg64;

fn create_test_params() -> Params {
    Params::default()
}

#[test]
fn test_gap_geometry() {
    let params = create_test_params();
    let obstacle = Obstacle::new(0, 600.0, 150.0, &params);

    assert_eq!(obstacle.gap_top(), 150.0);
    assert_eq!(obstacle.gap_bottom(), 350.0);

    let [top, bottom] = obstacle.barriers(&params);
    assert_eq!(top.side, BarrierSide::Top);
    assert_eq!(top.y + top.height, 150.0);
    assert_eq!(bottom.side, BarrierSide::Bottom);
    assert_eq!(bottom.y, 350.0);
    assert_eq!(bottom.width, params.obstacle_width);
}

#[test]
fn test_random_gap_within_range() {
    let params = create_test_params();
    let mut rng = Pcg64::seed_from_u64(7);
    for id in 0..200 {
        let obstacle = Obstacle::new_random(id, 600.0, &params, &mut rng);
        assert!(obstacle.gap_top() >= params.gap_top_min);
        assert!(obstacle.gap_top() < params.gap_top_max);
        assert!((obstacle.gap_bottom() - obstacle.gap_top() - params.obstacle_gap).abs() < 1e-3);
    }
}

#[test]
fn test_has_passed_fires_once() {
    let params = create_test_params();
    let mut obstacle = Obstacle::new(0, 210.0, 200.0, &params);

    assert!(!obstacle.has_passed(200.0));
    assert!(!obstacle.is_passed());

    obstacle.advance(&params);
    obstacle.advance(&params);
    assert_eq!(obstacle.x, 200.0);
    // strictly beyond the left edge
    assert!(!obstacle.has_passed(200.0));

    obstacle.advance(&params);
    assert!(obstacle.has_passed(200.0));
    assert!(obstacle.is_passed());

    for _ in 0..10 {
        obstacle.advance(&params);
        assert!(!obstacle.has_passed(200.0));
        assert!(obstacle.is_passed());
    }
}

#[test]
fn test_offscreen_after_right_edge_leaves() {
    let params = create_test_params();
    let mut obstacle = Obstacle::new(0, 600.0, 200.0, &params);

    let mut ticks = 0;
    while !obstacle.is_offscreen(&params) {
        obstacle.advance(&params);
        ticks += 1;
    }
    // (600 + 104) / 5 = 140.8
    assert_eq!(ticks, 141);
    assert!(obstacle.x + params.obstacle_width < 0.0);
}

#[test]
fn test_agent_in_gap_does_not_collide() {
    let params = create_test_params();
    let obstacle = Obstacle::new(0, 180.0, 250.0, &params);
    let agent = Agent::new(200.0, 300.0);

    for kind in [CollisionKind::BoundingBox, CollisionKind::PixelMask] {
        let shape = kind.build(&params);
        assert!(!obstacle.collides_with(&agent, shape.as_ref(), &params));
    }
}

#[test]
fn test_agent_in_barrier_collides() {
    let params = create_test_params();
    let obstacle = Obstacle::new(0, 180.0, 250.0, &params);

    let low = Agent::new(200.0, 430.0);
    let high = Agent::new(200.0, 230.0);
    for kind in [CollisionKind::BoundingBox, CollisionKind::PixelMask] {
        let shape = kind.build(&params);
        assert!(obstacle.collides_with(&low, shape.as_ref(), &params), "{}", shape.name());
        assert!(obstacle.collides_with(&high, shape.as_ref(), &params), "{}", shape.name());
    }
}

#[test]
fn test_no_collision_when_horizontally_apart() {
    let params = create_test_params();
    let obstacle = Obstacle::new(0, 400.0, 250.0, &params);
    // vertically inside the bottom barrier, but far to the left
    let agent = Agent::new(200.0, 500.0);

    for kind in [CollisionKind::BoundingBox, CollisionKind::PixelMask] {
        let shape = kind.build(&params);
        assert!(!obstacle.collides_with(&agent, shape.as_ref(), &params));
    }
}

#[test]
fn test_touching_edges() {
    let params = create_test_params();
    let agent = Agent::new(200.0, 352.0);
    let barrier = Barrier {
        side: BarrierSide::Bottom,
        x: 180.0,
        y: 400.0,
        width: params.obstacle_width,
        height: params.barrier_height,
    };

    // rectangles sharing an edge intersect, disjoint pixel rows do not
    assert!(BoundingBox.overlaps(&agent, &barrier, &params));
    assert!(!PixelMask::from_params(&params).overlaps(&agent, &barrier, &params));
}

#[test]
fn test_pixel_mask_ignores_empty_corners() {
    let params = create_test_params();
    let agent = Agent::new(200.0, 280.0);
    // barrier corner clipping the bottom-right corner of the footprint
    let barrier = Barrier {
        side: BarrierSide::Bottom,
        x: 260.0,
        y: 320.0,
        width: params.obstacle_width,
        height: params.barrier_height,
    };

    assert!(BoundingBox.overlaps(&agent, &barrier, &params));
    assert!(!PixelMask::from_params(&params).overlaps(&agent, &barrier, &params));
}

#[test]
fn test_mask_construction() {
    let filled = Mask::filled(4, 3);
    assert_eq!(filled.count(), 12);
    assert!(filled.get(3, 2));
    assert!(!filled.get(4, 2));
    assert!(!filled.get(-1, 0));

    let ellipse = Mask::ellipse(68, 48);
    assert!(ellipse.get(34, 24));
    assert!(!ellipse.get(0, 0));
    assert!(!ellipse.get(67, 47));
    assert!(ellipse.count() < 68 * 48);

    assert!(Mask::from_alpha(2, 2, &[0, 255, 255], 0).is_none());
    let from_alpha = Mask::from_alpha(2, 2, &[0, 255, 10, 200], 100).expect("sized alpha");
    assert!(!from_alpha.get(0, 0));
    assert!(from_alpha.get(1, 0));
    assert!(!from_alpha.get(0, 1));
    assert!(from_alpha.get(1, 1));

    let flipped = from_alpha.flipped_vertical();
    assert!(flipped.get(1, 0));
    assert!(!flipped.get(0, 0));
    assert_eq!(flipped.count(), from_alpha.count());
}

#[test]
fn test_mask_overlap_offsets() {
    let a = Mask::filled(10, 10);
    let b = Mask::filled(5, 5);

    assert!(a.overlap(&b, (0, 0)));
    assert!(a.overlap(&b, (9, 9)));
    assert!(a.overlap(&b, (-4, -4)));
    assert!(!a.overlap(&b, (10, 0)));
    assert!(!a.overlap(&b, (-5, 0)));
    assert!(!a.overlap(&b, (0, 10)));
}

#[test]
fn test_custom_sprite_masks() {
    let params = create_test_params();
    // agent sprite solid only in its top row
    let mut alpha = vec![0u8; 4 * 4];
    alpha[..4].fill(255);
    let agent_mask = Mask::from_alpha(4, 4, &alpha, 0).expect("sized alpha");
    let shape = PixelMask::new(agent_mask, Mask::filled(4, 4));

    let agent = Agent::new(0.0, 0.0);
    let below = Barrier {
        side: BarrierSide::Bottom,
        x: 0.0,
        y: 2.0,
        width: 4.0,
        height: 4.0,
    };
    let above = Barrier {
        side: BarrierSide::Top,
        x: 0.0,
        y: -3.0,
        width: 4.0,
        height: 4.0,
    };
    assert!(!shape.overlaps(&agent, &below, &params));
    assert!(shape.overlaps(&agent, &above, &params));
}

// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

mod common;

use approx::assert_abs_diff_eq;
use nalgebra::Vector3;

use polyhull::contact::{CollisionInfo, CollisionType, TrackingInfo};

use common::MockSimplex;

fn v3(x: f32, y: f32, z: f32) -> Vector3<f32> {
    Vector3::new(x, y, z)
}

fn simplex() -> MockSimplex {
    MockSimplex::new(vec![v3(1.0, 0.0, 0.0)], v3(0.0, 0.0, 1.0))
}

fn square_simplex() -> MockSimplex {
    MockSimplex::new(
        vec![
            v3(0.0, 0.0, 1.0),
            v3(2.0, 0.0, 1.0),
            v3(2.0, 2.0, 1.0),
            v3(0.0, 2.0, 1.0),
        ],
        v3(0.0, 0.0, 1.0),
    )
}

/* Collision types */
#[test]
fn collision_type_certainty() {
    assert!(!CollisionType::NoCollision.is_uncertain());
    assert!(!CollisionType::SlidingCollision.is_uncertain());
    assert!(!CollisionType::Collision.is_uncertain());
    assert!(CollisionType::PossibleSlidingCollision.is_uncertain());
    assert!(CollisionType::PossibleCollision.is_uncertain());

    assert_eq!(
        CollisionType::PossibleSlidingCollision.to_certain(),
        CollisionType::SlidingCollision
    );
    assert_eq!(
        CollisionType::PossibleCollision.to_certain(),
        CollisionType::Collision
    );
    assert_eq!(
        CollisionType::NoCollision.to_certain(),
        CollisionType::NoCollision
    );
    assert_eq!(
        CollisionType::Collision.to_certain(),
        CollisionType::Collision
    );
}

/* Collision info */
#[test]
fn repeated_collision_switches_to_sliding() {
    let mut info = CollisionInfo::new(simplex(), simplex(), 0.5, CollisionType::Collision);

    /* One repeat could still be a new collision */
    assert!(!info.switch_to_sliding());
    assert_eq!(info.kind(), CollisionType::Collision);

    assert!(info.switch_to_sliding());
    assert_eq!(info.kind(), CollisionType::SlidingCollision);
}

#[test]
fn advancing_collision_resets_repeats() {
    let mut info = CollisionInfo::new(simplex(), simplex(), 0.5, CollisionType::Collision);
    assert!(!info.switch_to_sliding());

    /* The time of impact moved, the debounce starts over */
    info.update(simplex(), simplex(), 0.9, CollisionType::Collision);
    assert_eq!(info.time(), 0.9);
    assert!(!info.switch_to_sliding());
    assert!(info.switch_to_sliding());
}

#[test]
fn repeated_time_keeps_repeats() {
    let mut info = CollisionInfo::new(simplex(), simplex(), 0.5, CollisionType::Collision);
    assert!(!info.switch_to_sliding());

    /* Within the epsilon the repeat count survives the update */
    info.update(simplex(), simplex(), 0.5 + 1e-7, CollisionType::Collision);
    assert!(info.switch_to_sliding());
}

#[test]
fn uncertain_collision_hides_contact() {
    let info = CollisionInfo::new(simplex(), simplex(), 0.5, CollisionType::PossibleCollision);

    assert_abs_diff_eq!(info.normal_of_collision(), Vector3::zeros());
    assert_abs_diff_eq!(info.point_of_collision(), Vector3::zeros());
}

#[test]
fn retest_promotes_to_certain() {
    let mut info = CollisionInfo::new(simplex(), simplex(), 0.5, CollisionType::PossibleCollision);
    info.successful_retest_update(simplex(), simplex());

    assert_eq!(info.kind(), CollisionType::Collision);
    assert_eq!(info.time(), 0.5);
    assert_abs_diff_eq!(info.normal_of_collision(), v3(0.0, 0.0, 1.0));
    assert_abs_diff_eq!(info.point_of_collision(), v3(1.0, 0.0, 0.0));
}

#[test]
fn point_of_collision_is_manifold_center() {
    let info = CollisionInfo::new(square_simplex(), simplex(), 0.5, CollisionType::Collision);

    assert_abs_diff_eq!(info.point_of_collision(), v3(1.0, 1.0, 1.0));
}

#[test]
fn voided_collision_never_happens() {
    let mut info = CollisionInfo::new(simplex(), simplex(), 0.5, CollisionType::Collision);
    info.void_collision();

    assert_eq!(info.time(), f32::MAX);
    assert_eq!(info.kind(), CollisionType::NoCollision);
}

/* Tracking info */
#[test]
fn earlier_collision_takes_first_place() {
    let mut t = TrackingInfo::new(1, simplex(), simplex(), 0.5, CollisionType::Collision);
    assert_eq!(t.first_collision(), Some(1));
    assert_eq!(t.first_collision_time(), 0.5);

    t.update(2, simplex(), simplex(), 0.2, CollisionType::SlidingCollision);
    assert_eq!(t.first_collision(), Some(2));
    assert_eq!(t.first_collision_time(), 0.2);
    assert_eq!(t.first_collision_kind(), CollisionType::SlidingCollision);

    /* A later collision leaves the first one alone */
    t.update(3, simplex(), simplex(), 0.7, CollisionType::Collision);
    assert_eq!(t.first_collision(), Some(2));
}

#[test]
fn first_collision_moving_later_rescans() {
    let mut t = TrackingInfo::new(1, simplex(), simplex(), 0.5, CollisionType::Collision);
    t.update(2, simplex(), simplex(), 0.2, CollisionType::Collision);

    /* Push the first collision past the other, the other takes over */
    t.update(2, simplex(), simplex(), 0.9, CollisionType::Collision);
    assert_eq!(t.first_collision(), Some(1));
    assert_eq!(t.first_collision_time(), 0.5);
}

#[test]
fn voiding_first_collision_rescans() {
    let mut t = TrackingInfo::new(1, simplex(), simplex(), 0.5, CollisionType::Collision);
    t.update(2, simplex(), simplex(), 0.9, CollisionType::Collision);

    t.void_collision(1);
    assert_eq!(t.first_collision(), Some(2));
    assert_eq!(t.first_collision_time(), 0.9);

    t.void_collision(2);
    assert_eq!(t.first_collision(), None);
    assert_eq!(t.first_collision_time(), f32::MAX);
    assert_eq!(t.first_collision_kind(), CollisionType::NoCollision);
}

#[test]
fn void_all_clears_everything() {
    let mut t = TrackingInfo::new(1, simplex(), simplex(), 0.5, CollisionType::Collision);
    t.update(2, simplex(), simplex(), 0.2, CollisionType::Collision);
    t.void_all();

    assert_eq!(t.first_collision(), None);
    assert_eq!(t.get(1).unwrap().time(), f32::MAX);
    assert_eq!(t.get(2).unwrap().time(), f32::MAX);
    assert_eq!(t.get(1).unwrap().kind(), CollisionType::NoCollision);
}

#[test]
fn tracking_retest_promotes() {
    let mut t = TrackingInfo::new(
        1,
        simplex(),
        simplex(),
        0.5,
        CollisionType::PossibleSlidingCollision,
    );
    t.successful_retest_update(1, simplex(), simplex());

    assert_eq!(t.first_collision_kind(), CollisionType::SlidingCollision);
    assert_eq!(t.get(1).unwrap().kind(), CollisionType::SlidingCollision);

    /* The time of impact is untouched by a retest */
    assert_eq!(t.first_collision_time(), 0.5);
    assert_eq!(t.get(1).unwrap().time(), 0.5);
}

#[test]
fn unknown_body_lookups_miss() {
    let mut t = TrackingInfo::new(1, simplex(), simplex(), 0.5, CollisionType::Collision);

    assert!(t.get(3).is_none());
    assert!(t.get_mut(3).is_none());
    assert!(t.get(1).is_some());
    assert_eq!(t.iter().count(), 1);
}

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

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use polyhull::geometry::Point2;
use polyhull::geometry::predicates::winding;
use polyhull::hull::hull2::{Hull2, build, clean_points};

const POINT_0: &[(i64, i64)] = &[(0, 0)];
const POINT_1: &[(i64, i64)] = &[(9, 0)];
const LINE_H0: &[(i64, i64)] = &[(1, 0), (3, 0)];
const LINE_H1: &[(i64, i64)] = &[(5, 0), (7, 0)];
const LINE_V0: &[(i64, i64)] = &[(0, 2), (0, -2)];
const LINE_V1: &[(i64, i64)] = &[(1, -2), (1, 2)];
const CURVE_LEFT: &[(i64, i64)] = &[(0, 3), (1, 3), (2, 2), (2, 1), (1, 0), (0, 0)];
const CURVE_RIGHT: &[(i64, i64)] = &[(5, 0), (4, 0), (3, 1), (3, 2), (4, 3), (5, 3)];
const CURVE_LEFT_REV: &[(i64, i64)] = &[(2, 0), (1, 0), (0, 1), (0, 2), (1, 3), (2, 3)];
const CURVE_RIGHT_REV: &[(i64, i64)] = &[(3, 3), (4, 3), (5, 2), (5, 1), (4, 0), (3, 0)];
const CURVE_LEFT_ROT: &[(i64, i64)] = &[(1, 0), (0, 0), (0, 3), (1, 3), (2, 2), (2, 1)];
const CURVE_RIGHT_ROT: &[(i64, i64)] = &[(4, 3), (5, 3), (5, 0), (4, 0), (3, 1), (3, 2)];
const CURVE_LEFT_ROT_REV: &[(i64, i64)] = &[(1, 3), (2, 3), (2, 0), (1, 0), (0, 1), (0, 2)];
const CURVE_RIGHT_ROT_REV: &[(i64, i64)] = &[(4, 0), (3, 0), (3, 3), (4, 3), (5, 2), (5, 1)];

fn points_of(data: &[(i64, i64)]) -> Vec<Point2<i64>> {
    data.iter().map(|&(x, y)| Point2::new(x, y)).collect()
}

/// Lay two polygons out in one buffer and window them as hulls.
fn prepare_polygons(
    l: &[(i64, i64)],
    r: &[(i64, i64)],
) -> (Vec<Point2<i64>>, Hull2, Hull2) {
    let mut data = points_of(l);
    data.extend(points_of(r));
    (
        data,
        Hull2::new(0, l.len()),
        Hull2::new(l.len(), l.len() + r.len()),
    )
}

fn merge_polygons(l: &[(i64, i64)], r: &[(i64, i64)]) -> Vec<(i64, i64)> {
    let (mut data, mut lh, rh) = prepare_polygons(l, r);
    let mut scratch = vec![Point2::new(0, 0); 100];
    lh.merge(&mut data, &mut scratch, &rh);
    lh.points(&data).iter().map(|p| (p.x, p.y)).collect()
}

/* Find tangent */
#[test]
fn point_tangent() {
    let data = points_of(POINT_0);
    let h = Hull2::new(0, 1);

    assert_eq!(h.find_tangent(&data, &h, 0, 0, 1), (0, 0));
    assert_eq!(h.find_tangent(&data, &h, 0, 0, -1), (0, 0));
}

#[test]
fn point_line_h_tangent() {
    let (data, l, r) = prepare_polygons(POINT_0, LINE_H0);

    assert_eq!(l.find_tangent(&data, &r, 0, 0, 1), (0, 1));
    assert_eq!(l.find_tangent(&data, &r, 0, 0, -1), (0, 1));
    assert_eq!(l.find_tangent(&data, &r, 0, 1, 1), (0, 1));
    assert_eq!(l.find_tangent(&data, &r, 0, 1, -1), (0, 1));
}

#[test]
fn line_h_point_tangent() {
    let (data, l, r) = prepare_polygons(LINE_H0, POINT_1);

    assert_eq!(l.find_tangent(&data, &r, 0, 0, 1), (0, 0));
    assert_eq!(l.find_tangent(&data, &r, 0, 0, -1), (0, 0));
    assert_eq!(l.find_tangent(&data, &r, 1, 0, 1), (0, 0));
    assert_eq!(l.find_tangent(&data, &r, 1, 0, -1), (0, 0));
}

#[test]
fn line_h_0_line_h_1_tangent() {
    let (data, l, r) = prepare_polygons(LINE_H0, LINE_H1);

    for a_start in 0..2 {
        for b_start in 0..2 {
            assert_eq!(l.find_tangent(&data, &r, a_start, b_start, 1), (0, 1));
            assert_eq!(l.find_tangent(&data, &r, a_start, b_start, -1), (0, 1));
        }
    }
}

#[test]
fn point_line_v_tangent() {
    let (data, l, r) = prepare_polygons(POINT_0, LINE_V1);

    assert_eq!(l.find_tangent(&data, &r, 0, 0, 1), (0, 1));
    assert_eq!(l.find_tangent(&data, &r, 0, 0, -1), (0, 0));
}

#[test]
fn line_v_line_v_tangent() {
    let (data, l, r) = prepare_polygons(LINE_V0, LINE_V1);

    /* The starting vertices must not change the tangent */
    for a_start in 0..2 {
        for b_start in 0..2 {
            assert_eq!(l.find_tangent(&data, &r, a_start, b_start, 1), (0, 1));
            assert_eq!(l.find_tangent(&data, &r, a_start, b_start, -1), (1, 0));
        }
    }
}

#[test]
fn curve_tangent_top() {
    let (data, l, r) = prepare_polygons(CURVE_LEFT, CURVE_RIGHT);

    /* Cant move past the flat start */
    assert_eq!(l.find_tangent(&data, &r, 5, 0, 1), (5, 0));

    assert_eq!(l.find_tangent(&data, &r, 4, 1, 1), (0, 5));
    assert_eq!(l.find_tangent(&data, &r, 3, 2, 1), (0, 5));
    assert_eq!(l.find_tangent(&data, &r, 2, 3, 1), (0, 5));
    assert_eq!(l.find_tangent(&data, &r, 1, 4, 1), (0, 5));
    assert_eq!(l.find_tangent(&data, &r, 0, 5, 1), (0, 5));
}

#[test]
fn curve_tangent_bottom() {
    let (data, l, r) = prepare_polygons(CURVE_LEFT, CURVE_RIGHT);

    assert_eq!(l.find_tangent(&data, &r, 5, 0, -1), (5, 0));
    assert_eq!(l.find_tangent(&data, &r, 4, 1, -1), (5, 0));
    assert_eq!(l.find_tangent(&data, &r, 3, 2, -1), (5, 0));
    assert_eq!(l.find_tangent(&data, &r, 2, 3, -1), (5, 0));
    assert_eq!(l.find_tangent(&data, &r, 1, 4, -1), (5, 0));

    /* Cant move past the flat start */
    assert_eq!(l.find_tangent(&data, &r, 0, 5, -1), (0, 5));
}

/* Merge */
#[test]
fn point_merge() {
    assert_eq!(merge_polygons(POINT_0, POINT_1), [(9, 0), (0, 0)]);
}

#[test]
fn point_line_h_merge() {
    assert_eq!(merge_polygons(POINT_0, LINE_H0), [(3, 0), (0, 0)]);
}

#[test]
fn line_h_point_merge() {
    assert_eq!(merge_polygons(LINE_H0, POINT_1), [(1, 0), (9, 0)]);
}

#[test]
fn line_h_0_line_h_1_merge() {
    assert_eq!(merge_polygons(LINE_H0, LINE_H1), [(1, 0), (7, 0)]);
}

#[test]
fn point0_line_v1_merge() {
    assert_eq!(
        merge_polygons(POINT_0, LINE_V1),
        [(1, 2), (1, -2), (0, 0)]
    );
}

#[test]
fn point1_line_v0_merge() {
    assert_eq!(
        merge_polygons(LINE_V0, POINT_1),
        [(0, 2), (9, 0), (0, -2)]
    );
}

#[test]
fn line_v0_line_v1_merge() {
    assert_eq!(
        merge_polygons(LINE_V0, LINE_V1),
        [(0, 2), (1, 2), (1, -2), (0, -2)]
    );
}

#[test]
fn curve_merge() {
    assert_eq!(
        merge_polygons(CURVE_LEFT, CURVE_RIGHT),
        [(0, 3), (5, 3), (5, 0), (0, 0)]
    );
}

#[test]
fn curve_merge_rev() {
    assert_eq!(
        merge_polygons(CURVE_LEFT_REV, CURVE_RIGHT_REV),
        [
            (5, 2),
            (5, 1),
            (4, 0),
            (1, 0),
            (0, 1),
            (0, 2),
            (1, 3),
            (4, 3)
        ]
    );
}

#[test]
fn curve_merge_rot() {
    assert_eq!(
        merge_polygons(CURVE_LEFT_ROT, CURVE_RIGHT_ROT),
        [(0, 0), (0, 3), (5, 3), (5, 0)]
    );
}

#[test]
fn curve_merge_rot_rev() {
    assert_eq!(
        merge_polygons(CURVE_LEFT_ROT_REV, CURVE_RIGHT_ROT_REV),
        [
            (1, 3),
            (4, 3),
            (5, 2),
            (5, 1),
            (4, 0),
            (1, 0),
            (0, 1),
            (0, 2)
        ]
    );
}

/* Clean points */
#[test]
fn clean_points_co_incident() {
    let mut data = points_of(&[(0, 0), (0, 0), (0, 0), (0, 0)]);
    clean_points(&mut data);

    assert_eq!(data, points_of(&[(0, 0)]));
}

#[test]
fn clean_points_range() {
    let mut data = points_of(&[(0, -1), (0, 1)]);
    clean_points(&mut data);

    assert_eq!(data, points_of(&[(0, -1), (0, 1)]));
}

#[test]
fn clean_points_co_linear() {
    let mut data = points_of(&[(0, 3), (0, -1), (0, 1), (0, -2)]);
    clean_points(&mut data);

    assert_eq!(data, points_of(&[(0, -2), (0, 3)]));
}

#[test]
fn clean_points_co_linear_co_incident() {
    let mut data = points_of(&[(0, 3), (0, -2), (0, -1), (0, 1), (0, -2)]);
    clean_points(&mut data);

    assert_eq!(data, points_of(&[(0, -2), (0, 3)]));
}

#[test]
fn clean_points_x_co_linear_co_incident() {
    let mut data = points_of(&[
        (0, 3),
        (0, -2),
        (0, -1),
        (0, 1),
        (0, -2),
        (4, 3),
        (4, -2),
        (4, -1),
        (4, 1),
        (4, -2),
        (1, 3),
        (1, -2),
        (1, -1),
        (1, 1),
        (1, -2),
        (-1, 3),
        (-1, -2),
        (-1, -1),
        (-1, 1),
        (-1, -2),
    ]);
    clean_points(&mut data);

    assert_eq!(
        data,
        points_of(&[
            (-1, -2),
            (-1, 3),
            (0, -2),
            (0, 3),
            (1, -2),
            (1, 3),
            (4, -2),
            (4, 3)
        ])
    );
}

/* Special cases caught in the wild */
#[test]
fn special_0() {
    let mut data = points_of(&[
        (-2233, 998),
        (-2228, 967),
        (-2233, -969),
        (-2234, -997),
        (-2245, -1000),
        (-2264, 999),
        (-2200, -989),
        (-2212, -995),
        (-2227, 995),
    ]);
    let mut scratch = vec![Point2::new(0, 0); 100];
    let mut l = Hull2::new(0, 6);
    let r = Hull2::new(6, 9);
    l.merge(&mut data, &mut scratch, &r);

    assert_eq!(l.size(), 6);
    assert_eq!(
        l.points(&data),
        points_of(&[
            (-2233, 998),
            (-2227, 995),
            (-2200, -989),
            (-2212, -995),
            (-2245, -1000),
            (-2264, 999)
        ])
    );
}

#[test]
fn special_1() {
    let mut data = points_of(&[
        (-9996, 97),
        (-9995, -98),
        (-9994, -91),
        (-9995, 100),
        (-9994, 73),
    ]);
    let mut scratch = vec![Point2::new(0, 0); 100];
    let mut l = Hull2::new(0, 2);
    let r = Hull2::new(2, 5);
    l.merge(&mut data, &mut scratch, &r);

    assert_eq!(l.size(), 5);
    assert_eq!(
        l.points(&data),
        points_of(&[
            (-9996, 97),
            (-9995, 100),
            (-9994, 73),
            (-9994, -91),
            (-9995, -98)
        ])
    );
}

/* Full builds */
#[test]
fn square_point_cloud_build() {
    let mut rng = StdRng::seed_from_u64(0x1234);
    let mut data: Vec<Point2<i64>> = (0..500)
        .map(|_| {
            Point2::new(
                rng.random_range(-1_000_000..=1_000_000),
                rng.random_range(-1_000_000..=1_000_000),
            )
        })
        .collect();
    let original = data.clone();

    let hull = build(&mut data);
    let pts = hull.points(&data);
    assert!(pts.len() >= 3);

    /* Clockwise all the way around */
    for i in 0..pts.len() {
        let a = &pts[i];
        let b = &pts[(i + 1) % pts.len()];
        let c = &pts[(i + 2) % pts.len()];
        assert!(winding(a, b, c) <= 0, "left turn at vertex {}", i);
    }

    /* Nothing outside the hull */
    for p in &original {
        for i in 0..pts.len() {
            let a = &pts[i];
            let b = &pts[(i + 1) % pts.len()];
            assert!(winding(a, b, p) <= 0, "point {:?} outside the hull", p);
        }
    }
}

#[test]
fn small_cloud_build() {
    let mut data = points_of(&[
        (0, 0),
        (10, 0),
        (10, 10),
        (0, 10),
        (5, 5),
        (2, 3),
        (7, 1),
        (1, 9),
    ]);
    let hull = build(&mut data);

    assert_eq!(
        hull.points(&data),
        points_of(&[(10, 10), (10, 0), (0, 0), (0, 10)])
    );
}

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

use crate::geometry::{Coord, Point2, Point3};

fn wide<T: Coord>(v: T) -> i128 {
    v.into()
}

/// Cross product of ab with bc.
///
/// Positive when abc turns left, negative when it turns right, zero when
/// collinear. Hulls in this crate are wound so that adjacent triples never
/// turn left.
pub fn winding<T: Coord>(a: &Point2<T>, b: &Point2<T>, c: &Point2<T>) -> i128 {
    let ab_x = wide(b.x) - wide(a.x);
    let ab_y = wide(b.y) - wide(a.y);
    let bc_x = wide(c.x) - wide(b.x);
    let bc_y = wide(c.y) - wide(b.y);
    ab_x * bc_y - ab_y * bc_x
}

/// Squared distance between a and b.
pub fn distance_sq<T: Coord>(a: &Point2<T>, b: &Point2<T>) -> i128 {
    let dx = wide(a.x) - wide(b.x);
    let dy = wide(a.y) - wide(b.y);
    dx * dx + dy * dy
}

/// Widened component-wise difference a - b.
pub fn sub3<T: Coord>(a: &Point3<T>, b: &Point3<T>) -> [i128; 3] {
    [
        wide(a.x) - wide(b.x),
        wide(a.y) - wide(b.y),
        wide(a.z) - wide(b.z),
    ]
}

pub fn cross3(a: &[i128; 3], b: &[i128; 3]) -> [i128; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub fn dot3(a: &[i128; 3], b: &[i128; 3]) -> i128 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn scale3(a: &[i128; 3], s: i128) -> [i128; 3] {
    [a[0] * s, a[1] * s, a[2] * s]
}

/// Six times the signed volume of the tetrahedron abcd.
pub fn tetrahedron_volume<T: Coord>(
    a: &Point3<T>,
    b: &Point3<T>,
    c: &Point3<T>,
    d: &Point3<T>,
) -> i128 {
    dot3(&cross3(&sub3(b, a), &sub3(c, a)), &sub3(d, a))
}

/// Squared twice-area of the triangle abc.
pub fn triangle_area_sq<T: Coord>(a: &Point3<T>, b: &Point3<T>, c: &Point3<T>) -> i128 {
    let n = cross3(&sub3(b, a), &sub3(c, a));
    dot3(&n, &n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn winding_left_turn() {
        let a = Point2::new(0i64, 0);
        let b = Point2::new(1, 0);
        let c = Point2::new(1, 1);

        assert!(winding(&a, &b, &c) > 0);
    }

    #[test]
    fn winding_right_turn() {
        let a = Point2::new(0i64, 0);
        let b = Point2::new(1, 0);
        let c = Point2::new(1, -1);

        assert!(winding(&a, &b, &c) < 0);
    }

    #[test]
    fn winding_collinear() {
        let a = Point2::new(0i64, 0);
        let b = Point2::new(1, 0);
        let c = Point2::new(2, 0);

        assert_eq!(winding(&a, &b, &c), 0);
    }

    #[test]
    fn distance_sq_diagonal() {
        let a = Point2::new(1i64, 2);
        let b = Point2::new(4, 6);

        assert_eq!(distance_sq(&a, &b), 25);
    }

    #[test]
    fn tetrahedron_volume_signs() {
        let a = Point3::new(0i64, 0, 0);
        let b = Point3::new(1, 0, 0);
        let c = Point3::new(0, 1, 0);

        assert!(tetrahedron_volume(&a, &b, &c, &Point3::new(0, 0, 1)) > 0);
        assert!(tetrahedron_volume(&a, &b, &c, &Point3::new(0, 0, -1)) < 0);
        assert_eq!(tetrahedron_volume(&a, &b, &c, &Point3::new(1, 1, 0)), 0);
    }

    #[test]
    fn triangle_area_sq_right_triangle() {
        let a = Point3::new(0i64, 0, 0);
        let b = Point3::new(3, 0, 0);
        let c = Point3::new(0, 4, 0);

        // Twice the area is 12.
        assert_eq!(triangle_area_sq(&a, &b, &c), 144);
    }

    #[test]
    fn triangle_area_sq_degenerate() {
        let a = Point3::new(0i64, 0, 0);
        let b = Point3::new(1, 1, 1);
        let c = Point3::new(2, 2, 2);

        assert_eq!(triangle_area_sq(&a, &b, &c), 0);
    }
}

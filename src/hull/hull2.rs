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

//! Divide-and-conquer 2D convex hull.
//!
//! A hull is a contiguous window `[begin, end)` over a shared point buffer,
//! navigated cyclically. Merging two adjacent windows splices the right hull
//! into the left one in place; a scratch buffer sized to the full point count
//! absorbs the shuffling when the splice needs more room than the windows
//! free up.

use crate::geometry::{Coord, Point2, predicates::winding};

/// Convex polygon window over a shared point buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hull2 {
    begin: usize,
    end: usize,
}

impl Hull2 {
    pub fn new(begin: usize, end: usize) -> Self {
        Hull2 { begin, end }
    }

    pub fn size(&self) -> usize {
        self.end - self.begin
    }

    pub fn begin(&self) -> usize {
        self.begin
    }

    pub fn at<'a, T>(&self, points: &'a [Point2<T>], i: usize) -> &'a Point2<T> {
        &points[self.begin + i]
    }

    /// The hull's points in cyclic order.
    pub fn points<'a, T>(&self, points: &'a [Point2<T>]) -> &'a [Point2<T>] {
        &points[self.begin..self.end]
    }

    /// Splice `rhs` into this hull. Both windows must lie in `points` with
    /// `rhs` to the right of `self`.
    pub fn merge<T: Coord>(
        &mut self,
        points: &mut [Point2<T>],
        scratch: &mut [Point2<T>],
        rhs: &Hull2,
    ) {
        /* Find the closest points */
        let a_idx = self.rightmost(points);
        let b_idx = rhs.leftmost(points);

        /* Move line up to find top tangent */
        let (a_top, b_top) = self.find_tangent_top(points, rhs, a_idx, b_idx);

        /* Move line down to find bottom tangent */
        let (a_bot, b_bot) = self.find_tangent_bottom(points, rhs, a_idx, b_idx);

        /* Merge vertices, copying what fits into the freed span of a */
        let mut a_top = self.increment(a_top);
        let mut b_top = b_top;
        let mut wrote_last_b = false;
        let b_end = rhs.increment(b_bot);
        if a_top != a_bot {
            loop {
                points[self.begin + a_top] = points[rhs.begin + b_top];
                wrote_last_b = b_top == b_bot;
                a_top = self.increment(a_top);
                b_top = rhs.increment(b_top);
                if (a_top == a_bot) || (b_top == b_end) {
                    break;
                }
            }
        }

        /* Need more space */
        if (a_top == a_bot) && !wrote_last_b {
            let scratch_size = self.end - (self.begin + a_top);
            scratch[..scratch_size].copy_from_slice(&points[self.begin + a_top..self.end]);
            if b_top <= b_bot {
                points.copy_within(rhs.begin + b_top..rhs.begin + b_bot + 1, self.begin + a_top);

                let move_end = self.begin + a_top + (b_bot - b_top) + 1;
                points[move_end..move_end + scratch_size]
                    .copy_from_slice(&scratch[..scratch_size]);
                self.end = move_end + scratch_size;
            }
            /* Wrap around in b needs two inserts */
            else {
                scratch[scratch_size..scratch_size + b_end]
                    .copy_from_slice(&points[rhs.begin..rhs.begin + b_end]);

                points.copy_within(rhs.begin + b_top..rhs.end, self.begin + a_top);
                let wrapped = self.begin + a_top + rhs.size() - b_top;
                points[wrapped..wrapped + b_end]
                    .copy_from_slice(&scratch[scratch_size..scratch_size + b_end]);

                let move_end = wrapped + b_end;
                points[move_end..move_end + scratch_size]
                    .copy_from_slice(&scratch[..scratch_size]);
                self.end = move_end + scratch_size;
            }
        }
        /* Too much space */
        else if b_top == b_end {
            if a_top < a_bot {
                let tail = self.end - (self.begin + a_bot);
                points.copy_within(self.begin + a_bot..self.end, self.begin + a_top);
                self.end = self.begin + a_top + tail;
            }
            /* Wrap around, cant just update the end */
            else if a_top > a_bot {
                self.end = self.begin + a_top;
                self.begin += a_bot;
            }
        }
    }

    /// Tangent between this hull and `rhs`, walked from any pair of starting
    /// vertices; `dir > 0` for the top tangent, otherwise the bottom.
    /// Returns window-relative indices.
    pub fn find_tangent<T: Coord>(
        &self,
        points: &[Point2<T>],
        rhs: &Hull2,
        a_idx: usize,
        b_idx: usize,
        dir: i64,
    ) -> (usize, usize) {
        if dir > 0 {
            self.find_tangent_top(points, rhs, a_idx, b_idx)
        } else {
            self.find_tangent_bottom(points, rhs, a_idx, b_idx)
        }
    }

    fn rightmost<T: Coord>(&self, points: &[Point2<T>]) -> usize {
        let mut best = 0;
        for i in 1..self.size() {
            if self.at(points, i).x > self.at(points, best).x {
                best = i;
            }
        }

        best
    }

    fn leftmost<T: Coord>(&self, points: &[Point2<T>]) -> usize {
        let mut best = 0;
        for i in 1..self.size() {
            if self.at(points, i).x < self.at(points, best).x {
                best = i;
            }
        }

        best
    }

    fn find_tangent_top<T: Coord>(
        &self,
        points: &[Point2<T>],
        rhs: &Hull2,
        mut a_idx: usize,
        mut b_idx: usize,
    ) -> (usize, usize) {
        /* Move the a and b indices towards the tangent one step at a time */
        let mut advanced = true;
        while advanced {
            advanced = false;
            let next_a = self.decrement(a_idx);
            let wa = winding(self.at(points, a_idx), rhs.at(points, b_idx), self.at(points, next_a));
            if (wa > 0) || ((wa == 0) && (self.at(points, next_a).x < self.at(points, a_idx).x)) {
                advanced = true;
                a_idx = next_a;
            }

            let next_b = rhs.increment(b_idx);
            let wb = winding(self.at(points, a_idx), rhs.at(points, b_idx), rhs.at(points, next_b));
            if (wb > 0) || ((wb == 0) && (rhs.at(points, next_b).x > rhs.at(points, b_idx).x)) {
                advanced = true;
                b_idx = next_b;
            }
        }

        (a_idx, b_idx)
    }

    fn find_tangent_bottom<T: Coord>(
        &self,
        points: &[Point2<T>],
        rhs: &Hull2,
        mut a_idx: usize,
        mut b_idx: usize,
    ) -> (usize, usize) {
        let mut advanced = true;
        while advanced {
            advanced = false;
            let next_a = self.increment(a_idx);
            let wa = -winding(self.at(points, a_idx), rhs.at(points, b_idx), self.at(points, next_a));
            if (wa > 0) || ((wa == 0) && (self.at(points, next_a).x < self.at(points, a_idx).x)) {
                advanced = true;
                a_idx = next_a;
            }

            let next_b = rhs.decrement(b_idx);
            let wb = -winding(self.at(points, a_idx), rhs.at(points, b_idx), rhs.at(points, next_b));
            if (wb > 0) || ((wb == 0) && (rhs.at(points, next_b).x > rhs.at(points, b_idx).x)) {
                advanced = true;
                b_idx = next_b;
            }
        }

        (a_idx, b_idx)
    }

    fn increment(&self, idx: usize) -> usize {
        let idx = idx + 1;
        if idx == self.size() { 0 } else { idx }
    }

    fn decrement(&self, idx: usize) -> usize {
        if idx == 0 { self.size() - 1 } else { idx - 1 }
    }
}

/// Sort by (x, y) and keep only the extreme-y point per x, dropping
/// co-incident points. Required pre-pass for `build`.
pub fn clean_points<T: Coord>(vertices: &mut Vec<Point2<T>>) {
    if vertices.is_empty() {
        return;
    }

    vertices.sort_by(|lhs, rhs| (lhs.x, lhs.y).cmp(&(rhs.x, rhs.y)));

    let mut wr_idx = 0;
    let mut rd_idx = 0;
    while rd_idx < vertices.len() {
        let first = rd_idx;
        let x = vertices[first].x;
        while (rd_idx < vertices.len()) && (vertices[rd_idx].x == x) {
            rd_idx += 1;
        }

        let last = rd_idx - 1;
        vertices[wr_idx] = vertices[first];
        wr_idx += 1;
        if vertices[last].y != vertices[first].y {
            vertices[wr_idx] = vertices[last];
            wr_idx += 1;
        }
    }

    vertices.truncate(wr_idx);
}

/// Build the hull of `vertices[begin..end)` recursively, merging into the
/// left half's window.
pub fn build_range<T: Coord>(
    vertices: &mut [Point2<T>],
    scratch: &mut [Point2<T>],
    begin: usize,
    end: usize,
) -> Hull2 {
    let size = end - begin;
    if size < 4 {
        /* Check winding for triangles */
        if size == 3 {
            let w = winding(&vertices[begin], &vertices[begin + 1], &vertices[begin + 2]);
            if w > 0 {
                vertices.swap(begin, begin + 1);
            }
        }

        return Hull2::new(begin, end);
    }

    /* Recurse */
    let mid = (begin + end) >> 1;
    let mut left = build_range(vertices, scratch, begin, mid);
    let right = build_range(vertices, scratch, mid, end);

    /* Return merged */
    left.merge(vertices, scratch, &right);
    left
}

/// Clean the input points and build their convex hull.
pub fn build<T: Coord>(vertices: &mut Vec<Point2<T>>) -> Hull2 {
    /* Clean up the points a bit */
    clean_points(vertices);

    /* Recurse */
    let len = vertices.len();
    let mut scratch = vec![Point2::new(T::zero(), T::zero()); len];
    build_range(vertices, &mut scratch, 0, len)
}

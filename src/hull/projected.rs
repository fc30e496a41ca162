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

//! Silhouette hulls of partial 3D hulls.
//!
//! Same divide-and-conquer merge as `hull2`, but each point remembers the 3D
//! vertex it projects and collinear ties are broken on distance to the
//! opposite tangent point instead of on x, so the tangent always lands on the
//! outermost of a collinear run.

use crate::geometry::{
    Coord, Point2,
    predicates::{distance_sq, winding},
};

/// A 2D projection of a 3D vertex, remembering the source index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectedVertex<T> {
    pos: Point2<T>,
    index: usize,
}

impl<T: Coord> ProjectedVertex<T> {
    pub fn new(pos: Point2<T>, index: usize) -> Self {
        ProjectedVertex { pos, index }
    }

    pub fn position(&self) -> &Point2<T> {
        &self.pos
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Co-incident projections are equal regardless of source vertex.
    pub fn coincident(&self, rhs: &ProjectedVertex<T>) -> bool {
        self.pos == rhs.pos
    }
}

/// Silhouette polygon window over a shared projected-vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectedHull {
    begin: usize,
    end: usize,
}

impl ProjectedHull {
    pub fn new(begin: usize, end: usize) -> Self {
        ProjectedHull { begin, end }
    }

    pub fn size(&self) -> usize {
        self.end - self.begin
    }

    pub fn begin(&self) -> usize {
        self.begin
    }

    pub fn at<'a, T>(&self, points: &'a [ProjectedVertex<T>], i: usize) -> &'a ProjectedVertex<T> {
        &points[self.begin + i]
    }

    /// Splice `rhs` into this hull, exactly as `Hull2::merge`.
    pub fn merge<T: Coord>(
        &mut self,
        points: &mut [ProjectedVertex<T>],
        scratch: &mut [ProjectedVertex<T>],
        rhs: &ProjectedHull,
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

    /// Tangent between this hull and `rhs`; `dir > 0` for the top tangent.
    /// Returns the source indices of the tangent vertices.
    pub fn find_tangent<T: Coord>(
        &self,
        points: &[ProjectedVertex<T>],
        rhs: &ProjectedHull,
        dir: i64,
    ) -> (usize, usize) {
        let a_idx = self.rightmost(points);
        let b_idx = rhs.leftmost(points);
        let (a_tang, b_tang) = if dir > 0 {
            self.find_tangent_top(points, rhs, a_idx, b_idx)
        } else {
            self.find_tangent_bottom(points, rhs, a_idx, b_idx)
        };

        (self.at(points, a_tang).index(), rhs.at(points, b_tang).index())
    }

    fn rightmost<T: Coord>(&self, points: &[ProjectedVertex<T>]) -> usize {
        let mut best = 0;
        for i in 1..self.size() {
            let p = self.at(points, i).position();
            let b = self.at(points, best).position();
            if (p.x > b.x) || ((p.x == b.x) && (p.y > b.y)) {
                best = i;
            }
        }

        best
    }

    fn leftmost<T: Coord>(&self, points: &[ProjectedVertex<T>]) -> usize {
        let mut best = 0;
        for i in 1..self.size() {
            if self.at(points, i).position().x < self.at(points, best).position().x {
                best = i;
            }
        }

        best
    }

    fn find_tangent_top<T: Coord>(
        &self,
        points: &[ProjectedVertex<T>],
        rhs: &ProjectedHull,
        mut a_idx: usize,
        mut b_idx: usize,
    ) -> (usize, usize) {
        /* Move the a and b indices towards the tangent one step at a time */
        let mut advanced = true;
        while advanced {
            advanced = false;
            let next_a = self.decrement(a_idx);
            let wa = winding(
                self.at(points, a_idx).position(),
                rhs.at(points, b_idx).position(),
                self.at(points, next_a).position(),
            );
            if (wa > 0)
                || ((wa == 0)
                    && (distance_sq(rhs.at(points, b_idx).position(), self.at(points, next_a).position())
                        > distance_sq(rhs.at(points, b_idx).position(), self.at(points, a_idx).position())))
            {
                advanced = true;
                a_idx = next_a;
            }

            let next_b = rhs.increment(b_idx);
            let wb = winding(
                self.at(points, a_idx).position(),
                rhs.at(points, b_idx).position(),
                rhs.at(points, next_b).position(),
            );
            if (wb > 0)
                || ((wb == 0)
                    && (distance_sq(self.at(points, a_idx).position(), rhs.at(points, next_b).position())
                        > distance_sq(self.at(points, a_idx).position(), rhs.at(points, b_idx).position())))
            {
                advanced = true;
                b_idx = next_b;
            }
        }

        (a_idx, b_idx)
    }

    fn find_tangent_bottom<T: Coord>(
        &self,
        points: &[ProjectedVertex<T>],
        rhs: &ProjectedHull,
        mut a_idx: usize,
        mut b_idx: usize,
    ) -> (usize, usize) {
        let mut advanced = true;
        while advanced {
            advanced = false;
            let next_a = self.increment(a_idx);
            let wa = -winding(
                self.at(points, a_idx).position(),
                rhs.at(points, b_idx).position(),
                self.at(points, next_a).position(),
            );
            if (wa > 0)
                || ((wa == 0)
                    && (distance_sq(rhs.at(points, b_idx).position(), self.at(points, next_a).position())
                        > distance_sq(rhs.at(points, b_idx).position(), self.at(points, a_idx).position())))
            {
                advanced = true;
                a_idx = next_a;
            }

            let next_b = rhs.decrement(b_idx);
            let wb = -winding(
                self.at(points, a_idx).position(),
                rhs.at(points, b_idx).position(),
                rhs.at(points, next_b).position(),
            );
            if (wb > 0)
                || ((wb == 0)
                    && (distance_sq(self.at(points, a_idx).position(), rhs.at(points, next_b).position())
                        > distance_sq(self.at(points, a_idx).position(), rhs.at(points, b_idx).position())))
            {
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

/// Build the silhouette hull of `points[begin..end)` recursively.
pub fn build_range<T: Coord>(
    points: &mut [ProjectedVertex<T>],
    scratch: &mut [ProjectedVertex<T>],
    begin: usize,
    end: usize,
) -> ProjectedHull {
    /* Small enough to start merging */
    let size = end - begin;
    if size < 4 {
        /* Flip incorrectly wound triangles */
        if size == 3 {
            let w = winding(
                points[begin].position(),
                points[begin + 1].position(),
                points[begin + 2].position(),
            );
            if w > 0 {
                points.swap(begin, begin + 1);
            }
        }

        return ProjectedHull::new(begin, end);
    }

    /* Recurse */
    let mid = begin + (size >> 1);
    let mut left = build_range(points, scratch, begin, mid);
    let right = build_range(points, scratch, mid, end);

    /* Return merged */
    left.merge(points, scratch, &right);
    left
}

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

//! Index arena for the partial-hull mesh.
//!
//! Vertices, edges and faces live in flat vectors and refer to each other by
//! index. Absorbed vertices are tombstoned with a `removed` flag; detached
//! faces simply become unreachable from the surviving vertices.

use std::collections::HashSet;

use smallvec::SmallVec;

use crate::geometry::{
    Coord, Point3,
    predicates::{cross3, sub3},
};

/// Placeholder for a face edge slot that has not been wired yet.
pub const NO_EDGE: usize = usize::MAX;

#[derive(Debug, Clone)]
pub struct Vertex<T> {
    pub position: Point3<T>,
    pub edges: SmallVec<[usize; 8]>,
    pub removed: bool,
}

impl<T> Vertex<T> {
    pub fn new(position: Point3<T>) -> Self {
        Vertex {
            position,
            edges: SmallVec::new(),
            removed: false,
        }
    }

    pub fn erase_edge(&mut self, e: usize) {
        if let Some(i) = self.edges.iter().position(|&x| x == e) {
            self.edges.remove(i);
        }
    }
}

/// An undirected edge with its two incident face slots.
///
/// Endpoints are canonicalized `v0 < v1`. `f0` is the face to the left when
/// walking v0 to v1, `f1` the face to the left when walking v1 to v0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub v0: usize,
    pub v1: usize,
    pub f0: Option<usize>,
    pub f1: Option<usize>,
}

impl Edge {
    pub fn new(a: usize, b: usize) -> Self {
        Edge {
            v0: a.min(b),
            v1: a.max(b),
            f0: None,
            f1: None,
        }
    }

    pub fn start(&self) -> usize {
        self.v0
    }

    pub fn end(&self) -> usize {
        self.v1
    }

    pub fn contains(&self, v: usize) -> bool {
        (v == self.v0) || (v == self.v1)
    }

    pub fn next_vertex(&self, v: usize) -> usize {
        if v == self.v0 {
            self.v1
        } else {
            debug_assert_eq!(v, self.v1);
            self.v0
        }
    }

    /// The face to the left when leaving `v` along this edge.
    pub fn left_face(&self, v: usize) -> Option<usize> {
        if v == self.v0 {
            self.f0
        } else {
            debug_assert_eq!(v, self.v1);
            self.f1
        }
    }

    pub fn set_left_face(&mut self, v: usize, f: Option<usize>) {
        if v == self.v0 {
            self.f0 = f;
        } else {
            debug_assert_eq!(v, self.v1);
            self.f1 = f;
        }
    }

    /// The face to the right when leaving `v` along this edge.
    pub fn right_face(&self, v: usize) -> Option<usize> {
        if v == self.v0 {
            self.f1
        } else {
            debug_assert_eq!(v, self.v1);
            self.f0
        }
    }

    pub fn set_right_face(&mut self, v: usize, f: Option<usize>) {
        if v == self.v0 {
            self.f1 = f;
        } else {
            debug_assert_eq!(v, self.v1);
            self.f0 = f;
        }
    }

    /// Clear whichever face slot holds `from`, if any.
    pub fn replace_face(&mut self, from: usize, to: Option<usize>) {
        if self.f0 == Some(from) {
            self.f0 = to;
            return;
        }

        if self.f1 == Some(from) {
            self.f1 = to;
        }
    }

    pub fn check(&self) -> bool {
        (self.v0 != self.v1) && self.f0.is_some() && self.f1.is_some()
    }
}

/// A triangle: 3 vertices in winding order and 3 edges in matching order
/// (edge i joins vertex i to vertex (i + 1) % 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub vertices: [usize; 3],
    pub edges: [usize; 3],
}

impl Face {
    pub fn contains(&self, v: usize) -> bool {
        self.vertices.contains(&v)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Mesh<T> {
    pub vertices: Vec<Vertex<T>>,
    pub edges: Vec<Edge>,
    pub faces: Vec<Face>,
}

impl<T: Coord> Mesh<T> {
    pub fn new() -> Self {
        Mesh {
            vertices: Vec::new(),
            edges: Vec::new(),
            faces: Vec::new(),
        }
    }

    pub fn from_points(points: &[Point3<T>]) -> Self {
        let mut mesh = Mesh::new();
        mesh.vertices = points.iter().map(|&p| Vertex::new(p)).collect();
        mesh
    }

    pub fn add_vertex(&mut self, position: Point3<T>) -> usize {
        self.vertices.push(Vertex::new(position));
        self.vertices.len() - 1
    }

    pub fn vertex(&self, v: usize) -> &Vertex<T> {
        &self.vertices[v]
    }

    pub fn vertex_mut(&mut self, v: usize) -> &mut Vertex<T> {
        &mut self.vertices[v]
    }

    pub fn edge(&self, e: usize) -> &Edge {
        &self.edges[e]
    }

    pub fn edge_mut(&mut self, e: usize) -> &mut Edge {
        &mut self.edges[e]
    }

    pub fn face(&self, f: usize) -> &Face {
        &self.faces[f]
    }

    /// Allocate an edge and register it on both endpoints.
    pub fn create_edge(&mut self, v0: usize, v1: usize) -> usize {
        debug_assert_ne!(v0, v1);
        self.edges.push(Edge::new(v0, v1));
        let e = self.edges.len() - 1;
        self.vertices[v0].edges.push(e);
        self.vertices[v1].edges.push(e);
        e
    }

    /// Allocate a face with unwired edge slots; `add_new_faces` threads the
    /// edges in as it walks the wrap boundary.
    pub fn add_face(&mut self, v0: usize, v1: usize, v2: usize) -> usize {
        self.faces.push(Face {
            vertices: [v0, v1, v2],
            edges: [NO_EDGE; 3],
        });
        self.faces.len() - 1
    }

    pub fn set_face_edge(&mut self, f: usize, i: usize, e: usize) {
        self.faces[f].edges[i] = e;
    }

    /// Allocate a fully wired face over three existing edges, taking the left
    /// slot of each.
    pub fn create_face(
        &mut self,
        v0: usize,
        v1: usize,
        v2: usize,
        e0: usize,
        e1: usize,
        e2: usize,
    ) -> usize {
        self.faces.push(Face {
            vertices: [v0, v1, v2],
            edges: [e0, e1, e2],
        });
        let f = self.faces.len() - 1;

        /* Add the face to its edges */
        self.edges[e0].set_left_face(v0, Some(f));
        self.edges[e1].set_left_face(v1, Some(f));
        self.edges[e2].set_left_face(v2, Some(f));

        debug_assert!(self.check_face(f));
        f
    }

    /// Build a double-sided triangle, the smallest closed mesh.
    pub fn create_triangles(&mut self, v0: usize, v1: usize, v2: usize) {
        /* Create edges */
        let e0 = self.create_edge(v0, v1);
        let e1 = self.create_edge(v1, v2);
        let e2 = self.create_edge(v2, v0);

        /* Create front face */
        self.create_face(v0, v1, v2, e0, e1, e2);

        /* Create back face */
        self.create_face(v0, v2, v1, e2, e1, e0);
    }

    /// Outward normal for a correctly wound face.
    pub fn face_normal(&self, f: usize) -> [i128; 3] {
        let face = &self.faces[f];
        let a = &self.vertices[face.vertices[0]].position;
        let e0 = sub3(&self.vertices[face.vertices[1]].position, a);
        let e1 = sub3(&self.vertices[face.vertices[2]].position, a);
        cross3(&e1, &e0)
    }

    /// The next edge of `f` after `e`, cyclically, skipping one visited edge.
    /// Returns None if the face has no unvisited edge to offer.
    pub fn next_live_edge(&self, f: usize, e: usize, visited: &HashSet<usize>) -> Option<usize> {
        let edges = &self.faces[f].edges;
        let next = if e == edges[0] {
            if visited.contains(&edges[1]) { edges[2] } else { edges[1] }
        } else if e == edges[1] {
            if visited.contains(&edges[2]) { edges[0] } else { edges[2] }
        } else {
            debug_assert_eq!(e, edges[2]);
            if visited.contains(&edges[0]) { edges[1] } else { edges[0] }
        };

        if visited.contains(&next) { None } else { Some(next) }
    }

    pub fn check_face(&self, f: usize) -> bool {
        let face = &self.faces[f];
        for i in 0..3 {
            let e = &self.edges[face.edges[i]];
            if e.left_face(face.vertices[i]) != Some(f) {
                return false;
            }

            if !e.contains(face.vertices[i]) {
                return false;
            }
        }

        true
    }
}

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

//! Divide-and-conquer 3D convex hull.
//!
//! Partial hulls are windows over one shared vertex arena plus the silhouette
//! of the window in the x-y plane. Merging gift-wraps a band of new triangles
//! around the two hulls (`wrap`), flood-deletes everything the band hides
//! (`remove_hidden_features`), stitches the band in (`add_new_faces`) and then
//! merges the silhouettes.

use std::collections::{BTreeSet, HashSet};

use tracing::trace;

use crate::geometry::{
    Coord, Point2, Point3,
    predicates::{cross3, dot3, scale3, sub3, tetrahedron_volume, triangle_area_sq, winding},
};
use crate::hull::HullError;
use crate::hull::mesh::{Mesh, Vertex};
use crate::hull::projected::{self, ProjectedHull, ProjectedVertex};

/// A partial 3D hull: a `[begin, end)` window over the vertex arena plus the
/// window's silhouette.
#[derive(Debug, Clone, Copy)]
pub struct Hull3 {
    proj: ProjectedHull,
    begin: usize,
    end: usize,
}

impl Hull3 {
    pub fn new(proj: ProjectedHull, begin: usize, end: usize) -> Self {
        Hull3 { proj, begin, end }
    }

    pub fn begin(&self) -> usize {
        self.begin
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn projected(&self) -> &ProjectedHull {
        &self.proj
    }

    /// Absorb `rhs` into this hull.
    pub fn merge<T: Coord>(
        &mut self,
        mesh: &mut Mesh<T>,
        proj_points: &mut [ProjectedVertex<T>],
        scratch: &mut [ProjectedVertex<T>],
        rhs: &Hull3,
    ) -> Result<(), HullError> {
        /* Get the top tangent from the silhouettes */
        let (a_top_idx, b_top_idx) = self.proj.find_tangent(proj_points, &rhs.proj, 1);
        trace!(left = a_top_idx, right = b_top_idx, "merging from top tangent");

        /* Wrap */
        let mut l = a_top_idx;
        let mut r = b_top_idx;
        let wrapping_edges = wrap(mesh, &mut l, &mut r)?;

        /* Remove hidden faces */
        remove_hidden_features(mesh, &wrapping_edges, l, r);

        /* Add new faces */
        add_new_faces(mesh, &wrapping_edges, l, r);

        /* Merge silhouettes */
        self.proj.merge(proj_points, scratch, &rhs.proj);
        self.end = self.end.max(rhs.end);
        self.begin = self.begin.min(rhs.begin);
        Ok(())
    }

    fn live_vertices<T: Coord>(&self, mesh: &Mesh<T>) -> Vec<usize> {
        (self.begin..self.end)
            .filter(|&v| !mesh.vertices[v].removed)
            .collect()
    }

    /// Faces reachable from the surviving vertices of the window.
    fn live_faces<T: Coord>(&self, mesh: &Mesh<T>) -> BTreeSet<usize> {
        let mut faces = BTreeSet::new();
        for v in self.live_vertices(mesh) {
            for &e in &mesh.vertices[v].edges {
                if let Some(f) = mesh.edge(e).left_face(v) {
                    faces.insert(f);
                }

                if let Some(f) = mesh.edge(e).right_face(v) {
                    faces.insert(f);
                }
            }
        }

        faces
    }

    /// Positions of the surviving vertices.
    pub fn hull_vertices<T: Coord>(&self, mesh: &Mesh<T>) -> Vec<Point3<T>> {
        self.live_vertices(mesh)
            .into_iter()
            .map(|v| mesh.vertices[v].position)
            .collect()
    }

    /// Triangles as index triples into the vertex arena.
    pub fn hull_face_indices<T: Coord>(&self, mesh: &Mesh<T>) -> Vec<[usize; 3]> {
        self.live_faces(mesh)
            .into_iter()
            .map(|f| mesh.face(f).vertices)
            .collect()
    }

    /// Exhaustive verification that every surviving vertex lies on the
    /// non-positive side of every face.
    pub fn is_convex<T: Coord>(&self, mesh: &Mesh<T>) -> bool {
        let verts = self.live_vertices(mesh);
        for f in self.live_faces(mesh) {
            let normal = mesh.face_normal(f);
            let a = mesh.vertices[mesh.face(f).vertices[0]].position;
            for &v in &verts {
                if dot3(&normal, &sub3(&mesh.vertices[v].position, &a)) > 0 {
                    return false;
                }
            }
        }

        true
    }
}

/// Gift-wrap a boundary of edges around the two hulls, starting from the top
/// tangent vertices `l` and `r`. On return `l` and `r` are the frontier
/// vertices where the wrap closed.
pub fn wrap<T: Coord>(
    mesh: &Mesh<T>,
    l: &mut usize,
    r: &mut usize,
) -> Result<Vec<usize>, HullError> {
    let l_top = *l;
    let r_top = *r;
    let mut l_iter = l_top;
    let mut r_iter = r_top;
    let mut normal_left = [0i128; 3];
    let mut normal_right = [0i128; 3];
    let mut done_left = mesh.vertex(l_top).edges.is_empty();
    let mut done_right = mesh.vertex(r_top).edges.is_empty();
    let mut iter = 0;
    let mut ret = Vec::new();
    let mut visited = vec![(l_top, r_top)];
    loop {
        let mut next_left = None;
        let mut next_right = None;
        let mut area_left = None;
        let mut area_right = None;
        if !done_left {
            next_left =
                find_wrapping_edge(mesh, &mut area_left, l_top, r_top, l_iter, r_iter, &mut normal_left, 1);
            if next_left.is_none() || area_left.is_some() {
                next_right = find_wrapping_edge(
                    mesh, &mut area_right, r_top, l_top, r_iter, l_iter, &mut normal_right, -1,
                );
            }
        } else {
            next_right =
                find_wrapping_edge(mesh, &mut area_right, r_top, l_top, r_iter, l_iter, &mut normal_right, -1);
            if next_right.is_none() || area_right.is_some() {
                next_left = find_wrapping_edge(
                    mesh, &mut area_left, l_top, r_top, l_iter, r_iter, &mut normal_left, 1,
                );
            }
        }

        /* Prefer the right candidate unless the left wins an area tie */
        let nxt = if let Some(e) =
            next_right.filter(|_| area_right.is_none() || (area_right > area_left))
        {
            normal_left = normal_right;
            r_iter = mesh.edge(e).next_vertex(r_iter);
            done_right = r_iter == r_top;
            trace!(vertex = r_iter, "wrapped on right");
            e
        } else if let Some(e) = next_left {
            normal_right = normal_left;
            l_iter = mesh.edge(e).next_vertex(l_iter);
            done_left = l_iter == l_top;
            trace!(vertex = l_iter, "wrapped on left");
            e
        } else {
            return Err(HullError::NoWrappingEdge);
        };

        ret.push(nxt);
        iter += 1;
        if iter >= 100 {
            return Err(HullError::WrapLimitExceeded);
        }

        visited.push((l_iter, r_iter));
        if visited.iter().filter(|&&p| p == (l_iter, r_iter)).count() >= 2 {
            break;
        }
    }

    /* Trim the lap before the loop closed */
    let first = visited
        .iter()
        .position(|&p| p == (l_iter, r_iter))
        .unwrap_or(0);
    ret.drain(..first);
    *l = l_iter;
    *r = r_iter;
    Ok(ret)
}

/// Scan the edges of `this_iter` for one whose far vertex can extend the wrap
/// towards `that_iter`. An untied candidate returns with `area_out` still
/// None; an area-tied winner also reports the tie area so the caller can
/// compare against the other hull's candidate.
#[allow(clippy::too_many_arguments)]
fn find_wrapping_edge<T: Coord>(
    mesh: &Mesh<T>,
    area_out: &mut Option<i128>,
    this_top: usize,
    that_top: usize,
    this_iter: usize,
    that_iter: usize,
    normal: &mut [i128; 3],
    sign: i128,
) -> Option<usize> {
    let mut guess_idx = 0;
    /* Cant rule out 0 area triangles so -1 marks no tied candidate */
    let mut max_area: i128 = -1;
    let mut max_area_idx = 0;
    let mut failed = true;
    let lp = mesh.vertex(this_iter).position;
    let rp = mesh.vertex(that_iter).position;
    while failed && (guess_idx < mesh.vertex(this_iter).edges.len()) {
        /* Check the guess against the current vertex's neighbours */
        failed = false;
        let mut area = i128::MAX;
        let e = mesh.vertex(this_iter).edges[guess_idx];
        let guess = mesh.edge(e).next_vertex(this_iter);
        let gp = mesh.vertex(guess).position;
        for i in 0..mesh.vertex(this_iter).edges.len() {
            if i == guess_idx {
                continue;
            }

            let te = mesh.vertex(this_iter).edges[i];
            let test = mesh.edge(te).next_vertex(this_iter);
            let tp = mesh.vertex(test).position;
            if !can_wrap(
                mesh, &mut area, e, te, &lp, &rp, &gp, &tp, normal, sign,
                test == this_top,
                guess == this_top,
            ) {
                failed = true;
                guess_idx += 1;
                break;
            }
        }

        /* Check the guess against the neighbours in the other hull */
        if !failed {
            for i in 0..mesh.vertex(that_iter).edges.len() {
                let te = mesh.vertex(that_iter).edges[i];
                let test = mesh.edge(te).next_vertex(that_iter);
                let tp = mesh.vertex(test).position;
                if !can_wrap(
                    mesh, &mut area, e, te, &lp, &rp, &gp, &tp, normal, sign,
                    test == that_top,
                    guess == this_top,
                ) {
                    failed = true;
                    guess_idx += 1;
                    break;
                }
            }
        }

        /* Area ties keep scanning for the biggest tied candidate */
        if !failed && (area < i128::MAX) {
            if area > max_area {
                max_area = area;
                max_area_idx = guess_idx;
            }

            guess_idx += 1;
            failed = true;
        }
    }

    if failed && (max_area > -1) {
        failed = false;
        *area_out = Some(max_area);
        guess_idx = max_area_idx;
    }

    if !failed {
        let e = mesh.vertex(this_iter).edges[guess_idx];
        let g = mesh.edge(e).next_vertex(this_iter);
        *normal = scale3(
            &cross3(&sub3(&lp, &rp), &sub3(&lp, &mesh.vertex(g).position)),
            sign,
        );
        return Some(e);
    }

    None
}

/// Can the face (l, r, guess) extend the wrap past the test vertex?
#[allow(clippy::too_many_arguments)]
fn can_wrap<T: Coord>(
    mesh: &Mesh<T>,
    area: &mut i128,
    ge: usize,
    te: usize,
    l: &Point3<T>,
    r: &Point3<T>,
    guess: &Point3<T>,
    test: &Point3<T>,
    normal: &[i128; 3],
    sign: i128,
    fail_area_check: bool,
    succeed_area_check: bool,
) -> bool {
    /* Try to exclude by point outside face */
    let volume = tetrahedron_volume(l, r, guess, test) * sign;
    if volume < 0 {
        return false;
    }

    /* Tie break for flat meshes */
    if volume == 0 {
        /* Reject the edge if its faces face the opposite way to the new face */
        let guess_normal = scale3(&cross3(&sub3(l, r), &sub3(l, guess)), sign);
        let gedge = mesh.edge(ge);
        if let (Some(lf), Some(rf)) = (gedge.f0, gedge.f1) {
            if (dot3(&guess_normal, &mesh.face_normal(lf)) < 0)
                && (dot3(&guess_normal, &mesh.face_normal(rf)) < 0)
            {
                return false;
            }
        }

        let test_normal = scale3(&cross3(&sub3(l, r), &sub3(l, test)), sign);
        let tedge = mesh.edge(te);
        if let (Some(lf), Some(rf)) = (tedge.f0, tedge.f1) {
            if (dot3(&test_normal, &mesh.face_normal(lf)) < 0)
                && (dot3(&test_normal, &mesh.face_normal(rf)) < 0)
            {
                return true;
            }
        }

        /* Reject if the normal flips but a test vertex keeps it unflipped */
        let test_flip = dot3(&test_normal, normal) <= 0;
        let guess_flip = dot3(&guess_normal, normal) <= 0;
        if guess_flip && !test_flip {
            return false;
        }

        let guess_area = triangle_area_sq(l, r, guess);
        if fail_area_check && !succeed_area_check && (guess_flip == test_flip) {
            return false;
        }

        *area = (*area).min(guess_area);
    }

    true
}

fn remove_vertex<T: Coord>(mesh: &mut Mesh<T>, e: usize, v: usize, boundary: &HashSet<usize>) {
    /* A wrapping vertex lives but must not connect to a hidden feature */
    if boundary.contains(&v) {
        mesh.vertex_mut(v).erase_edge(e);
    }
    /* Remove interior vertices we didnt get already */
    else if !mesh.vertex(v).removed {
        let vert = mesh.vertex_mut(v);
        vert.removed = true;
        vert.edges.clear();
    }
}

fn remove_region<T: Coord>(
    mesh: &mut Mesh<T>,
    e: usize,
    visited_edges: &mut HashSet<usize>,
    boundary_vertices: &HashSet<usize>,
) {
    /* Kill vertices or at least unlink them from removed edges */
    remove_vertex(mesh, e, mesh.edge(e).end(), boundary_vertices);
    remove_vertex(mesh, e, mesh.edge(e).start(), boundary_vertices);

    /* Search for live edges through the connected faces */
    visited_edges.insert(e);
    if let Some(f) = mesh.edge(e).f0 {
        for i in 0..3 {
            let n = mesh.face(f).edges[i];
            if !visited_edges.contains(&n) {
                remove_region(mesh, n, visited_edges, boundary_vertices);
            } else {
                mesh.edge_mut(n).replace_face(f, None);
            }
        }
    }

    if let Some(f) = mesh.edge(e).f1 {
        for i in 0..3 {
            let n = mesh.face(f).edges[i];
            if !visited_edges.contains(&n) {
                remove_region(mesh, n, visited_edges, boundary_vertices);
            } else {
                mesh.edge_mut(n).replace_face(f, None);
            }
        }
    }

    /* Drop the faces */
    mesh.edge_mut(e).f0 = None;
    mesh.edge_mut(e).f1 = None;
}

/// Delete everything the wrap boundary hides: faces and edges strictly inside
/// the boundary on both hulls, and the vertices they strand.
pub fn remove_hidden_features<T: Coord>(mesh: &mut Mesh<T>, edges: &[usize], l: usize, r: usize) {
    /* Nothing wrapped, nothing to remove */
    if edges.is_empty() {
        return;
    }

    /* Flag the boundary */
    let mut visited_edges: HashSet<usize> = edges.iter().copied().collect();
    let mut boundary_vertices = HashSet::new();
    for &e in edges {
        boundary_vertices.insert(mesh.edge(e).start());
        boundary_vertices.insert(mesh.edge(e).end());
    }

    /* Search for a start edge in the hidden regions */
    let mut l_wrapped = false;
    let mut r_wrapped = false;
    let mut l_start = None;
    let mut r_start = None;
    for &e in edges {
        if !l_wrapped && mesh.edge(e).contains(l) {
            l_wrapped = true;
            if let Some(f) = mesh.edge(e).left_face(l) {
                l_start = mesh.next_live_edge(f, e, &visited_edges);
            }
        } else if !r_wrapped && mesh.edge(e).contains(r) {
            r_wrapped = true;
            if let Some(f) = mesh.edge(e).right_face(r) {
                r_start = mesh.next_live_edge(f, e, &visited_edges);
            }
        }
    }

    /* If we didnt wrap on one hull only its start vertex can live */
    if !l_wrapped && !mesh.vertex(l).edges.is_empty() {
        l_start = Some(mesh.vertex(l).edges[0]);
        mesh.vertex_mut(l).edges.clear();
        boundary_vertices.insert(l);
    }

    if !r_wrapped && !mesh.vertex(r).edges.is_empty() {
        r_start = Some(mesh.vertex(r).edges[0]);
        mesh.vertex_mut(r).edges.clear();
        boundary_vertices.insert(r);
    }

    /* Clean each region with a start edge */
    if let Some(s) = l_start {
        trace!("removing hidden features on left");
        remove_region(mesh, s, &mut visited_edges, &boundary_vertices);
    }

    if let Some(s) = r_start {
        trace!("removing hidden features on right");
        remove_region(mesh, s, &mut visited_edges, &boundary_vertices);
    }
}

/// Stitch a fan of new faces over the wrap boundary, threading rung edges
/// between successive frontier pairs.
pub fn add_new_faces<T: Coord>(mesh: &mut Mesh<T>, edges: &[usize], l: usize, r: usize) {
    let mut l = l;
    let mut r = r;

    /* No edges wrapped means two lone points joined by an edge */
    if edges.is_empty() {
        debug_assert!(mesh.vertex(l).edges.is_empty());
        debug_assert!(mesh.vertex(r).edges.is_empty());
        mesh.create_edge(l, r);
        return;
    }

    let first_edge = mesh.create_edge(l, r);
    let mut last_edge = first_edge;
    for (i, &e) in edges.iter().enumerate() {
        /* Advance on whichever hull the boundary edge walks */
        let advance_left = mesh.edge(e).contains(l);
        let new_face;
        if advance_left {
            let next = mesh.edge(e).next_vertex(l);
            new_face = mesh.add_face(r, l, next);
            mesh.edge_mut(e).set_left_face(l, Some(new_face));
            mesh.edge_mut(last_edge).set_right_face(l, Some(new_face));
            l = next;
        } else {
            debug_assert!(mesh.edge(e).contains(r));
            let next = mesh.edge(e).next_vertex(r);
            new_face = mesh.add_face(r, l, next);
            mesh.edge_mut(e).set_right_face(r, Some(new_face));
            mesh.edge_mut(last_edge).set_right_face(l, Some(new_face));
            r = next;
        }

        if i < edges.len() - 1 {
            let nxt_edge = mesh.create_edge(l, r);
            if advance_left {
                mesh.set_face_edge(new_face, 0, last_edge);
                mesh.set_face_edge(new_face, 1, e);
                mesh.set_face_edge(new_face, 2, nxt_edge);
            } else {
                mesh.set_face_edge(new_face, 0, last_edge);
                mesh.set_face_edge(new_face, 1, nxt_edge);
                mesh.set_face_edge(new_face, 2, e);
            }

            last_edge = nxt_edge;
            mesh.edge_mut(last_edge).set_left_face(l, Some(new_face));
        }
        /* Back at the start, the first edge takes its leading face */
        else {
            if advance_left {
                mesh.set_face_edge(new_face, 0, last_edge);
                mesh.set_face_edge(new_face, 1, e);
                mesh.set_face_edge(new_face, 2, first_edge);
            } else {
                mesh.set_face_edge(new_face, 0, last_edge);
                mesh.set_face_edge(new_face, 1, first_edge);
                mesh.set_face_edge(new_face, 2, e);
            }

            mesh.edge_mut(first_edge).set_left_face(l, Some(new_face));
        }

        debug_assert!(mesh.check_face(new_face));
    }
}

/// Sort the arena by (x, y, z), keep only the extreme-z vertex per (x, y)
/// column, and emit the x-y silhouette points.
pub fn project_points<T: Coord>(mesh: &mut Mesh<T>, proj: &mut Vec<ProjectedVertex<T>>) {
    proj.clear();
    if mesh.vertices.is_empty() {
        return;
    }

    /* Sort vertices by x then y then z */
    mesh.vertices.sort_by(|lhs, rhs| {
        let lp = &lhs.position;
        let rp = &rhs.position;
        (lp.x, lp.y, lp.z).cmp(&(rp.x, rp.y, rp.z))
    });

    /* Keep the extreme z per x-y column, dropping co-incident points */
    let mut wr_idx = 0;
    let mut rd_idx = 0;
    while rd_idx < mesh.vertices.len() {
        let first = rd_idx;
        let x = mesh.vertices[first].position.x;
        let y = mesh.vertices[first].position.y;
        while (rd_idx < mesh.vertices.len())
            && (mesh.vertices[rd_idx].position.x == x)
            && (mesh.vertices[rd_idx].position.y == y)
        {
            rd_idx += 1;
        }

        let last = rd_idx - 1;
        let lowest = mesh.vertices[first].clone();
        let highest = if mesh.vertices[last].position.z != lowest.position.z {
            Some(mesh.vertices[last].clone())
        } else {
            None
        };

        mesh.vertices[wr_idx] = lowest;
        wr_idx += 1;
        if let Some(v) = highest {
            mesh.vertices[wr_idx] = v;
            wr_idx += 1;
        }
    }

    mesh.vertices.truncate(wr_idx);

    /* Project to x-y */
    proj.reserve(mesh.vertices.len());
    for (i, v) in mesh.vertices.iter().enumerate() {
        proj.push(ProjectedVertex::new(
            Point2::new(v.position.x, v.position.y),
            i,
        ));
    }
}

/// Build the hull of the arena window `[begin, end)` recursively.
pub fn build_range<T: Coord>(
    mesh: &mut Mesh<T>,
    proj: &mut [ProjectedVertex<T>],
    scratch: &mut [ProjectedVertex<T>],
    begin: usize,
    end: usize,
) -> Result<Hull3, HullError> {
    /* Small enough to start merging */
    let size = end - begin;
    if size < 4 {
        if size > 2 {
            mesh.create_triangles(begin, begin + 1, begin + 2);
        } else if size > 1 {
            mesh.create_edge(begin, begin + 1);
        }

        /* Check winding for silhouette triangles */
        let mut proj_end = end;
        if size == 3 {
            let w = winding(
                proj[begin].position(),
                proj[begin + 1].position(),
                proj[begin + 2].position(),
            );
            /* Flip incorrect winding */
            if w > 0 {
                proj.swap(begin, begin + 1);
            }
            /* Crush co-linear points */
            else if w == 0 {
                proj[begin + 1] = proj[begin + 2];
                proj_end -= 1;
            }
        }
        /* Crush co-incident points */
        else if (size == 2) && proj[begin].coincident(&proj[begin + 1]) {
            proj_end -= 1;
        }

        return Ok(Hull3::new(ProjectedHull::new(begin, proj_end), begin, end));
    }

    /* A busy x co-ordinate, hull the whole band in the y-z plane */
    if mesh.vertices[begin].position.x == mesh.vertices[end - 1].position.x {
        return build_coplanar_band(mesh, proj, scratch, begin, end);
    }

    /* Recurse, nudging the split off an equal-x run */
    let mut mid = begin + (size >> 1);
    while mesh.vertices[mid].position.x == mesh.vertices[mid - 1].position.x {
        if mesh.vertices[mid].position.x == mesh.vertices[end - 1].position.x {
            mid -= 1;
        } else {
            mid += 1;
        }
    }

    let mut left = build_range(mesh, proj, scratch, begin, mid)?;
    let right = build_range(mesh, proj, scratch, mid, end)?;

    /* Return merged */
    left.merge(mesh, proj, scratch, &right)?;
    Ok(left)
}

/// Hull a band of equal-x vertices in the y-z projection and stitch the flat
/// silhouette as front and back triangle fans.
fn build_coplanar_band<T: Coord>(
    mesh: &mut Mesh<T>,
    proj: &mut [ProjectedVertex<T>],
    scratch: &mut [ProjectedVertex<T>],
    begin: usize,
    end: usize,
) -> Result<Hull3, HullError> {
    /* Reproject to y-z and hull in 2D */
    for i in begin..end {
        let p = mesh.vertices[i].position;
        proj[i] = ProjectedVertex::new(Point2::new(p.y, p.z), i);
    }

    let yz_hull = projected::build_range(proj, scratch, begin, end);

    /* Keep the survivors, tracking the extreme y vertices as we go */
    let n = yz_hull.size();
    let mut max_y_idx = 0;
    let mut min_y_idx = 0;
    let mut tmp: Vec<Vertex<T>> = Vec::with_capacity(n);
    for i in 0..n {
        let src = proj[yz_hull.begin() + i].index();
        tmp.push(mesh.vertices[src].clone());
        if tmp[i].position.y > tmp[max_y_idx].position.y {
            max_y_idx = i;
        }

        if tmp[i].position.y < tmp[min_y_idx].position.y {
            min_y_idx = i;
        }
    }

    for (i, v) in tmp.iter().enumerate() {
        mesh.vertices[begin + i] = v.clone();
    }

    for i in (begin + n)..end {
        mesh.vertices[i].removed = true;
    }

    /* The band's silhouette is its two extreme y vertices */
    proj[begin] = ProjectedVertex::new(
        Point2::new(tmp[max_y_idx].position.x, tmp[max_y_idx].position.y),
        begin + max_y_idx,
    );
    proj[begin + 1] = ProjectedVertex::new(
        Point2::new(tmp[min_y_idx].position.x, tmp[min_y_idx].position.y),
        begin + min_y_idx,
    );

    /* Build edges and faces */
    let v0 = begin;
    let mut front_last = 0;
    let mut back_last = 0;

    /* First triangle with 2 outside edges */
    if n > 3 {
        let v1 = begin + 1;
        let v2 = begin + 2;
        let e0 = mesh.create_edge(v0, v1);
        let e1 = mesh.create_edge(v1, v2);
        front_last = mesh.create_edge(v2, v0);
        back_last = mesh.create_edge(v2, v0);

        /* Create front and back faces */
        mesh.create_face(v0, v1, v2, e0, e1, front_last);
        mesh.create_face(v0, v2, v1, back_last, e1, e0);
    } else if n == 3 {
        mesh.create_triangles(v0, begin + 1, begin + 2);
    } else if n == 2 {
        mesh.create_edge(v0, begin + 1);
    }

    /* Middle triangles with 1 outside edge */
    for i in (begin + 3)..(begin + n).saturating_sub(1) {
        let v_last = i - 1;
        let v_next = i;
        let e0 = mesh.create_edge(v_last, v_next);
        let e1 = mesh.create_edge(v_next, v0);
        let e2 = mesh.create_edge(v_next, v0);

        /* Create front and back faces */
        mesh.create_face(v0, v_last, v_next, front_last, e0, e1);
        mesh.create_face(v0, v_next, v_last, e2, e0, back_last);

        front_last = e1;
        back_last = e2;
    }

    /* Last triangle with 1 outside edge */
    if n > 3 {
        let vm2 = begin + n - 2;
        let vm1 = begin + n - 1;
        let e0 = mesh.create_edge(vm2, vm1);
        let e1 = mesh.create_edge(vm1, v0);

        /* Create front and back faces */
        mesh.create_face(v0, vm2, vm1, front_last, e0, e1);
        mesh.create_face(v0, vm1, vm2, e1, e0, back_last);
    }

    Ok(Hull3::new(
        ProjectedHull::new(begin, begin + 1),
        begin,
        begin + n,
    ))
}

/// Clean and project the arena, then build its full hull.
pub fn build<T: Coord>(
    mesh: &mut Mesh<T>,
    proj: &mut Vec<ProjectedVertex<T>>,
) -> Result<Hull3, HullError> {
    /* Clean up the points a bit */
    project_points(mesh, proj);

    /* Recurse */
    let len = proj.len();
    let mut scratch = vec![ProjectedVertex::new(Point2::new(T::zero(), T::zero()), 0); len];
    build_range(mesh, proj, &mut scratch, 0, len)
}

/// A finished convex hull owning its mesh.
#[derive(Debug, Clone)]
pub struct ConvexHull3<T> {
    mesh: Mesh<T>,
    hull: Hull3,
}

impl<T: Coord> ConvexHull3<T> {
    pub fn from_points(points: &[Point3<T>]) -> Result<Self, HullError> {
        let mut mesh = Mesh::from_points(points);
        let mut proj = Vec::new();
        let hull = build(&mut mesh, &mut proj)?;
        Ok(ConvexHull3 { mesh, hull })
    }

    pub fn mesh(&self) -> &Mesh<T> {
        &self.mesh
    }

    pub fn vertices(&self) -> Vec<Point3<T>> {
        self.hull.hull_vertices(&self.mesh)
    }

    pub fn face_indices(&self) -> Vec<[usize; 3]> {
        self.hull.hull_face_indices(&self.mesh)
    }

    pub fn is_convex(&self) -> bool {
        self.hull.is_convex(&self.mesh)
    }
}

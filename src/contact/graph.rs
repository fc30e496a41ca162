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

//! Contact graph and two-stage resting-contact resolution.
//!
//! The graph is the connected component of sliding contacts around a root
//! body. Resolution first minimises impulses that cancel closing velocities,
//! then resting forces (with 8 friction directions per contact) that cancel
//! closing accelerations. Both stages share the solver boundary and either
//! may fail recoverably.

use std::collections::BTreeMap;

use nalgebra::{DMatrix, DVector, Vector3};
use smallvec::SmallVec;
use tracing::trace;

use crate::contact::BodyHandle;
use crate::contact::body::RigidBody;
use crate::contact::collision::{CollisionInfo, CollisionType, ContactManifold};
use crate::contact::solver::LcpSolver;
use crate::contact::tracking::TrackingInfo;

pub const SPANNING_VECTORS: usize = 8;

/// Dynamic friction coefficients keyed by unordered physical-type pair.
pub type FrictionMap = BTreeMap<(u32, u32), f32>;

fn dynamic_friction(friction: &FrictionMap, i: u32, j: u32) -> f32 {
    match friction.get(&(i.min(j), i.max(j))) {
        Some(&mu) => mu,
        None => {
            trace!(i, j, "dynamic friction defaulted");
            0.0
        }
    }
}

fn perpendicular(v: &Vector3<f32>) -> Vector3<f32> {
    Vector3::new(v.z, v.y, -v.x)
}

/// A directed contact between two graph vertices, snapshotting everything
/// force resolution needs from the collision records.
#[derive(Debug, Clone)]
pub struct ContactEdge {
    to: usize,
    edge_id: usize,
    normal: Vector3<f32>,
    dn_dt: Vector3<f32>,
    manifold: SmallVec<[Vector3<f32>; 4]>,
    span: [Vector3<f32>; SPANNING_VECTORS],
}

impl ContactEdge {
    fn new<S: ContactManifold>(
        info: &CollisionInfo<S>,
        other_info: &CollisionInfo<S>,
        to: usize,
        edge_id: usize,
    ) -> Self {
        let normal = info.normal_of_collision();
        let simplex = info.simplex();
        let manifold = (0..simplex.contact_manifold_size())
            .map(|i| simplex.contact_manifold_point(i))
            .collect();
        let dn_dt = simplex.rate_of_change_of_normal_of_impact(other_info.simplex(), &normal);

        /* A perpendicular pair, their negations and the 4 diagonals span the
         * contact plane */
        let mut span = [Vector3::zeros(); SPANNING_VECTORS];
        span[0] = perpendicular(&normal);
        span[1] = normal.cross(&span[0]);
        span[2] = -span[0];
        span[3] = -span[1];
        span[4] = ((span[0] + span[1]) * 0.5).normalize();
        span[5] = ((span[1] + span[2]) * 0.5).normalize();
        span[6] = ((span[2] + span[3]) * 0.5).normalize();
        span[7] = ((span[3] + span[0]) * 0.5).normalize();

        ContactEdge {
            to,
            edge_id,
            normal,
            dn_dt,
            manifold,
            span,
        }
    }

    /// The same contact seen from the other body; spans are negated rather
    /// than rebuilt so the two directions agree exactly.
    fn reverse<S: ContactManifold>(
        &self,
        info: &CollisionInfo<S>,
        other_info: &CollisionInfo<S>,
        to: usize,
    ) -> Self {
        let normal = info.normal_of_collision();
        let simplex = info.simplex();
        let manifold = (0..simplex.contact_manifold_size())
            .map(|i| simplex.contact_manifold_point(i))
            .collect();
        let dn_dt = simplex.rate_of_change_of_normal_of_impact(other_info.simplex(), &normal);

        let mut span = [Vector3::zeros(); SPANNING_VECTORS];
        for (s, r) in span.iter_mut().zip(&self.span) {
            *s = -r;
        }

        ContactEdge {
            to,
            edge_id: self.edge_id,
            normal,
            dn_dt,
            manifold,
            span,
        }
    }

    pub fn to(&self) -> usize {
        self.to
    }

    /// First flattened contact index of this edge's manifold.
    pub fn edge_id(&self) -> usize {
        self.edge_id
    }

    pub fn normal(&self) -> &Vector3<f32> {
        &self.normal
    }

    pub fn manifold_size(&self) -> usize {
        self.manifold.len()
    }

    /// Span `i` as seen from the vertex `from`; the far end sees it negated.
    pub fn span_vector(&self, i: usize, from: Option<usize>) -> Vector3<f32> {
        if from == Some(self.to) {
            self.span[i]
        } else {
            -self.span[i]
        }
    }
}

/// The connected component of resting contacts around a root body.
#[derive(Debug, Default)]
pub struct ContactGraph {
    vertices: Vec<BodyHandle>,
    adjacency: Vec<Vec<ContactEdge>>,
    edges: usize,
    contacts: usize,
}

impl ContactGraph {
    pub fn build<B: RigidBody, S: ContactManifold>(
        bodies: &[B],
        tracking: &BTreeMap<BodyHandle, TrackingInfo<S>>,
        root: BodyHandle,
    ) -> Self {
        let mut graph = ContactGraph::default();
        graph.start_build(bodies, tracking, root);
        graph
    }

    /// Rebuild in place around a new root.
    pub fn rebuild<B: RigidBody, S: ContactManifold>(
        &mut self,
        bodies: &[B],
        tracking: &BTreeMap<BodyHandle, TrackingInfo<S>>,
        root: BodyHandle,
    ) {
        self.vertices.clear();
        self.adjacency.clear();
        self.edges = 0;
        self.contacts = 0;
        self.start_build(bodies, tracking, root);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges
    }

    /// Total manifold points over all edges; the number of LCP contact rows.
    pub fn contact_count(&self) -> usize {
        self.contacts
    }

    pub fn vertices(&self) -> &[BodyHandle] {
        &self.vertices
    }

    pub fn adjacent(&self, v: usize) -> &[ContactEdge] {
        &self.adjacency[v]
    }

    fn start_build<B: RigidBody, S: ContactManifold>(
        &mut self,
        bodies: &[B],
        tracking: &BTreeMap<BodyHandle, TrackingInfo<S>>,
        root: BodyHandle,
    ) {
        self.vertices.push(root);
        self.adjacency.push(Vec::new());
        self.build_from(bodies, tracking, root, 0);
        trace!(
            vertices = self.vertices.len(),
            edges = self.edges,
            "built contact graph"
        );
    }

    fn build_from<B: RigidBody, S: ContactManifold>(
        &mut self,
        bodies: &[B],
        tracking: &BTreeMap<BodyHandle, TrackingInfo<S>>,
        body: BodyHandle,
        from_idx: usize,
    ) {
        let Some(t) = tracking.get(&body) else {
            return;
        };

        for (other, info) in t.iter() {
            if (info.kind() != CollisionType::SlidingCollision) || (info.time() >= f32::MAX) {
                continue;
            }

            let to_idx = match self.vertices.iter().position(|&b| b == other) {
                Some(i) => {
                    /* Edge already walked from the other end */
                    if self.find_edge(from_idx, i).is_some() {
                        continue;
                    }

                    i
                }
                None => {
                    self.vertices.push(other);
                    self.adjacency.push(Vec::new());
                    self.vertices.len() - 1
                }
            };

            /* An edge needs the collision seen from both sides */
            let Some(rev_info) = tracking.get(&other).and_then(|ti| ti.get(body)) else {
                continue;
            };

            let forward = ContactEdge::new(info, rev_info, to_idx, self.contacts);
            let reverse = forward.reverse(rev_info, info, from_idx);
            debug_assert!(
                forward
                    .normal()
                    .dot(&(bodies[body].center_of_mass() - bodies[other].center_of_mass()))
                    > 0.0
            );
            debug_assert!(
                reverse
                    .normal()
                    .dot(&(bodies[other].center_of_mass() - bodies[body].center_of_mass()))
                    > 0.0
            );

            self.contacts += forward.manifold_size();
            self.edges += 1;
            self.adjacency[from_idx].push(forward);
            self.adjacency[to_idx].push(reverse);
            trace!(from = from_idx, to = to_idx, "added contact edge");

            self.build_from(bodies, tracking, other, to_idx);
        }
    }

    fn find_edge(&self, from: usize, to: usize) -> Option<&ContactEdge> {
        self.adjacency[from].iter().find(|e| e.to == to)
    }

    /// Resolve resting contacts in two stages: impulses cancelling closing
    /// velocities, then forces cancelling closing accelerations. A failed
    /// solve skips that stage only.
    pub fn resolve_forces<B: RigidBody>(
        &self,
        bodies: &mut [B],
        friction: &FrictionMap,
        solver: &mut dyn LcpSolver,
    ) {
        /* Minimise impulses cancelling the closing velocities */
        let m = self.contact_matrix(bodies, friction, false);
        let q = self.closing_velocities(bodies);
        let impulses = solver.solve(&m, &q);
        if let Some(x) = &impulses {
            let mut force_idx = 0;
            for (from_idx, adj) in self.adjacency.iter().enumerate() {
                for e in adj {
                    if from_idx < e.to {
                        continue;
                    }

                    let a_id = self.vertices[from_idx];
                    let b_id = self.vertices[e.to];
                    for poc in &e.manifold {
                        let impulse = e.normal * x[force_idx];
                        force_idx += 1;
                        trace!(from = from_idx, to = e.to, "applying impulse");
                        bodies[a_id].apply_impulse(&impulse, poc, false);
                        bodies[b_id].apply_impulse(&-impulse, poc, false);
                    }
                }
            }
        }

        /* Solve for resting forces, 8 friction directions per contact */
        let m = self.contact_matrix(bodies, friction, true);
        let q = self.closing_accelerations(bodies);
        let forces = solver.solve(&m, &q);
        if let Some(x) = &forces {
            let mut force_idx = 0;
            let mut fric_idx = self.contacts << 1;
            for (from_idx, adj) in self.adjacency.iter().enumerate() {
                for e in adj {
                    if from_idx < e.to {
                        continue;
                    }

                    let a_id = self.vertices[from_idx];
                    let b_id = self.vertices[e.to];
                    for poc in &e.manifold {
                        let force = e.normal * x[force_idx];
                        force_idx += 1;
                        trace!(from = from_idx, to = e.to, "applying force");
                        let at_a = poc - bodies[a_id].center_of_mass();
                        let at_b = poc - bodies[b_id].center_of_mass();
                        bodies[a_id].apply_internal_force(&at_a, &force);
                        bodies[b_id].apply_internal_force(&at_b, &-force);

                        for s in 0..SPANNING_VECTORS {
                            let span = e.span_vector(s, Some(e.to));
                            let force = span * x[fric_idx];
                            fric_idx += 1;
                            bodies[a_id].apply_internal_force(&at_a, &force);
                            bodies[b_id].apply_internal_force(&at_b, &-force);
                        }
                    }
                }
            }
        }

        /* Refresh bounds on everything that was touched */
        if impulses.is_some() || forces.is_some() {
            for (from_idx, adj) in self.adjacency.iter().enumerate() {
                for e in adj {
                    if from_idx < e.to {
                        continue;
                    }

                    bodies[self.vertices[from_idx]].update_bounds();
                    bodies[self.vertices[e.to]].update_bounds();
                }
            }
        }
    }

    /// Void the tracked collisions between every pair of bodies that took
    /// part in the graph.
    pub fn void_collisions<S: ContactManifold>(
        &self,
        tracking: &mut BTreeMap<BodyHandle, TrackingInfo<S>>,
    ) {
        for info in tracking.values_mut() {
            for &v in &self.vertices {
                info.void_collision(v);
            }
        }
    }

    /// The contact coupling matrix. `ext` widens the system with the
    /// coefficient-of-friction column block, the lambda/beta unit blocks and
    /// the span couplings for the force stage.
    fn contact_matrix<B: RigidBody>(
        &self,
        bodies: &[B],
        friction: &FrictionMap,
        ext: bool,
    ) -> DMatrix<f32> {
        let width = if ext {
            self.contacts * (SPANNING_VECTORS + 2)
        } else {
            self.contacts
        };

        let mut m = DMatrix::zeros(width, width);
        for (from_idx, adj) in self.adjacency.iter().enumerate() {
            let a = &bodies[self.vertices[from_idx]];
            for e_i in adj {
                if from_idx < e_i.to {
                    continue;
                }

                let b = &bodies[self.vertices[e_i.to]];
                for (pt_i, poc_i) in e_i.manifold.iter().enumerate() {
                    let row = e_i.edge_id + pt_i;
                    if ext {
                        m[(row, self.contacts + row)] =
                            dynamic_friction(friction, a.physical_type(), b.physical_type());
                    }

                    /* Couple through everything in contact with a, then b */
                    let ra_n_i = (poc_i - a.center_of_mass()).cross(&e_i.normal);
                    self.couple_contacts(&mut m, a, from_idx, row, &e_i.normal, &ra_n_i, 1.0, ext);

                    let rb_n_i = (poc_i - b.center_of_mass()).cross(&e_i.normal);
                    self.couple_contacts(&mut m, b, e_i.to, row, &e_i.normal, &rb_n_i, -1.0, ext);
                }
            }
        }

        /* Unit blocks tying the friction magnitudes to their contact's
         * lambda */
        if ext {
            for i in 0..self.contacts {
                for j in 0..SPANNING_VECTORS {
                    let beta = (self.contacts << 1) + (i * SPANNING_VECTORS) + j;
                    m[(self.contacts + i, beta)] = 1.0;
                    m[(beta, self.contacts + i)] = -1.0;
                }
            }
        }

        m
    }

    /// Accumulate how the normal and friction forces of every contact of
    /// `body` change the closing acceleration of the contact at `row`.
    #[allow(clippy::too_many_arguments)]
    fn couple_contacts<B: RigidBody>(
        &self,
        m: &mut DMatrix<f32>,
        body: &B,
        vertex: usize,
        row: usize,
        noc_i: &Vector3<f32>,
        r_n_i: &Vector3<f32>,
        sign: f32,
        ext: bool,
    ) {
        let inv_mass = 1.0 / body.mass();
        let inv_tensor = body.inverse_orientated_tensor();
        let com = body.center_of_mass();
        for e_j in &self.adjacency[vertex] {
            let lin = noc_i.dot(&e_j.normal) * inv_mass;
            for (pt_j, poc_j) in e_j.manifold.iter().enumerate() {
                let col = e_j.edge_id + pt_j;
                let r_n_j = (poc_j - com).cross(&e_j.normal);
                let rot = r_n_i.dot(&(inv_tensor * r_n_j));
                m[(row, col)] += sign * (lin + rot);

                if ext {
                    for s in 0..SPANNING_VECTORS {
                        let span = e_j.span_vector(s, Some(e_j.to));
                        let lin = noc_i.dot(&span) * inv_mass;
                        let r_n_f = (poc_j - com).cross(&span);
                        let rot = r_n_i.dot(&(inv_tensor * r_n_f));
                        let fric = (self.contacts << 1) + (col * SPANNING_VECTORS) + s;
                        m[(fric, row)] += sign * (lin + rot);
                    }
                }
            }
        }
    }

    /// Pre-impulse closing velocities, one entry per contact point.
    fn closing_velocities<B: RigidBody>(&self, bodies: &[B]) -> DVector<f32> {
        let mut q = DVector::zeros(self.contacts);
        let mut idx = 0;
        for (from_idx, adj) in self.adjacency.iter().enumerate() {
            for e in adj {
                if from_idx < e.to {
                    continue;
                }

                let a = &bodies[self.vertices[from_idx]];
                let b = &bodies[self.vertices[e.to]];
                for poc in &e.manifold {
                    q[idx] = e.normal.dot(&(a.velocity_at(poc) - b.velocity_at(poc)));
                    idx += 1;
                }
            }
        }

        q
    }

    /// Closing accelerations per contact point, plus the relative tangential
    /// velocities in the friction rows.
    fn closing_accelerations<B: RigidBody>(&self, bodies: &[B]) -> DVector<f32> {
        let mut q = DVector::zeros(self.contacts * (SPANNING_VECTORS + 2));
        let mut accel_idx = 0;
        let mut relvel_idx = self.contacts << 1;
        for (from_idx, adj) in self.adjacency.iter().enumerate() {
            for e in adj {
                if from_idx < e.to {
                    continue;
                }

                let a = &bodies[self.vertices[from_idx]];
                let b = &bodies[self.vertices[e.to]];
                let at1 = a.force() / a.mass();
                let bt1 = b.force() / b.mass();
                for poc in &e.manifold {
                    let ra = poc - a.center_of_mass();
                    let wa_x_ra = a.angular_velocity().cross(&ra);
                    let at2 = (a.inverse_orientated_tensor()
                        * (a.torque() + a.angular_momentum().cross(&a.angular_velocity())))
                    .cross(&ra);
                    let at3 = a.angular_velocity().cross(&wa_x_ra);
                    let at4 = a.velocity() + wa_x_ra;

                    let rb = poc - b.center_of_mass();
                    let wb_x_rb = b.angular_velocity().cross(&rb);
                    let bt2 = (b.inverse_orientated_tensor()
                        * (b.torque() + b.angular_momentum().cross(&b.angular_velocity())))
                    .cross(&rb);
                    let bt3 = b.angular_velocity().cross(&wb_x_rb);
                    let bt4 = b.velocity() + wb_x_rb;

                    q[accel_idx] = e.normal.dot(&(at1 + at2 + at3 - bt1 - bt2 - bt3))
                        + (2.0 * e.dn_dt.dot(&(at4 - bt4)));
                    accel_idx += 1;

                    let va = a.velocity_at(poc);
                    let vb = b.velocity_at(poc);
                    for s in 0..SPANNING_VECTORS {
                        q[relvel_idx] = e.span_vector(s, Some(e.to)).dot(&(va - vb));
                        relvel_idx += 1;
                    }
                }
            }
        }

        q
    }
}

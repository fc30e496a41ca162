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

#![allow(dead_code)]

//! Mock bodies, manifolds and solvers shared by the contact tests.

use nalgebra::{DMatrix, DVector, Matrix3, Vector3};

use polyhull::contact::{ContactManifold, LcpSolver, RigidBody};

/// A rigid body that just accumulates whatever is applied to it.
#[derive(Debug, Clone)]
pub struct MockBody {
    pub mass: f32,
    pub com: Vector3<f32>,
    pub tensor: Matrix3<f32>,
    pub v: Vector3<f32>,
    pub w: Vector3<f32>,
    pub f: Vector3<f32>,
    pub tor: Vector3<f32>,
    pub bounds_updates: usize,
}

impl MockBody {
    pub fn new(tensor_diag: f32, com: Vector3<f32>, mass: f32) -> Self {
        MockBody {
            mass,
            com,
            tensor: Matrix3::from_diagonal_element(tensor_diag),
            v: Vector3::zeros(),
            w: Vector3::zeros(),
            f: Vector3::zeros(),
            tor: Vector3::zeros(),
            bounds_updates: 0,
        }
    }
}

impl RigidBody for MockBody {
    fn mass(&self) -> f32 {
        self.mass
    }

    fn center_of_mass(&self) -> Vector3<f32> {
        self.com
    }

    fn orientated_tensor(&self) -> Matrix3<f32> {
        self.tensor
    }

    fn inverse_orientated_tensor(&self) -> Matrix3<f32> {
        if self.mass.is_infinite() {
            Matrix3::zeros()
        } else {
            self.tensor.try_inverse().unwrap_or_else(Matrix3::zeros)
        }
    }

    fn velocity(&self) -> Vector3<f32> {
        self.v
    }

    fn angular_velocity(&self) -> Vector3<f32> {
        self.w
    }

    fn force(&self) -> Vector3<f32> {
        self.f
    }

    fn torque(&self) -> Vector3<f32> {
        self.tor
    }

    fn apply_impulse(&mut self, impulse: &Vector3<f32>, poc: &Vector3<f32>, _update_bounds: bool) {
        let l = (poc - self.com).cross(impulse);
        self.v += impulse / self.mass;
        self.w += self.inverse_orientated_tensor() * l;
    }

    fn apply_internal_force(&mut self, at: &Vector3<f32>, force: &Vector3<f32>) {
        if self.mass.is_finite() {
            self.f += force;
            self.tor += at.cross(force);
        }
    }

    fn update_bounds(&mut self) {
        self.bounds_updates += 1;
    }

    fn angular_momentum(&self) -> Vector3<f32> {
        if self.mass.is_infinite() {
            Vector3::zeros()
        } else {
            self.tensor * self.w
        }
    }
}

/// A contact surface with a fixed manifold and normal.
#[derive(Debug, Clone)]
pub struct MockSimplex {
    points: Vec<Vector3<f32>>,
    noc: Vector3<f32>,
    dn_dt: Vector3<f32>,
}

impl MockSimplex {
    pub fn new(points: Vec<Vector3<f32>>, noc: Vector3<f32>) -> Self {
        MockSimplex {
            points,
            noc,
            dn_dt: Vector3::zeros(),
        }
    }

    pub fn with_dn_dt(mut self, dn_dt: Vector3<f32>) -> Self {
        self.dn_dt = dn_dt;
        self
    }
}

impl ContactManifold for MockSimplex {
    fn normal_of_impact(&self, _other: &Self) -> Vector3<f32> {
        self.noc
    }

    fn contact_manifold_size(&self) -> usize {
        self.points.len()
    }

    fn contact_manifold_point(&self, i: usize) -> Vector3<f32> {
        self.points[i]
    }

    fn center_of_impact(&self, _other: &Self, _noc: &Vector3<f32>) -> Vector3<f32> {
        self.points.iter().sum::<Vector3<f32>>() / (self.points.len() as f32)
    }

    fn rate_of_change_of_normal_of_impact(
        &self,
        _other: &Self,
        _noc: &Vector3<f32>,
    ) -> Vector3<f32> {
        self.dn_dt
    }
}

/// Records every system it is asked to solve and replays canned answers.
#[derive(Debug, Default)]
pub struct CapturingSolver {
    pub systems: Vec<(DMatrix<f32>, DVector<f32>)>,
    pub answers: Vec<Option<DVector<f32>>>,
}

impl CapturingSolver {
    pub fn new() -> Self {
        CapturingSolver::default()
    }
}

impl LcpSolver for CapturingSolver {
    fn solve(&mut self, m: &DMatrix<f32>, q: &DVector<f32>) -> Option<DVector<f32>> {
        self.systems.push((m.clone(), q.clone()));
        if self.answers.is_empty() {
            None
        } else {
            self.answers.remove(0)
        }
    }
}

/// Projected Gauss-Seidel iteration. Enough for the near-diagonal systems the
/// fixtures build; rows with a zero diagonal stay clamped at zero.
#[derive(Debug)]
pub struct GaussSeidelSolver {
    pub iterations: usize,
}

impl GaussSeidelSolver {
    pub fn new() -> Self {
        GaussSeidelSolver { iterations: 100 }
    }
}

impl LcpSolver for GaussSeidelSolver {
    fn solve(&mut self, m: &DMatrix<f32>, q: &DVector<f32>) -> Option<DVector<f32>> {
        let n = q.len();
        let mut x: DVector<f32> = DVector::zeros(n);
        for _ in 0..self.iterations {
            for i in 0..n {
                if m[(i, i)].abs() < 1e-9 {
                    continue;
                }

                let mut w = q[i];
                for j in 0..n {
                    w += m[(i, j)] * x[j];
                }

                x[i] = (x[i] - (w / m[(i, i)])).max(0.0);
            }
        }

        Some(x)
    }
}

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

use nalgebra::{Matrix3, Vector3};

/// What the contact-graph solver needs from a rigid body.
///
/// Infinite-mass bodies report `f32::INFINITY` from `mass` and a zero matrix
/// from `inverse_orientated_tensor`, which zeroes their coupling terms.
pub trait RigidBody {
    fn mass(&self) -> f32;
    fn center_of_mass(&self) -> Vector3<f32>;

    /// Inertia tensor in world orientation.
    fn orientated_tensor(&self) -> Matrix3<f32>;

    /// Inverse of the world-orientation inertia tensor. Zero matrix for
    /// infinite mass.
    fn inverse_orientated_tensor(&self) -> Matrix3<f32>;

    fn velocity(&self) -> Vector3<f32>;
    fn angular_velocity(&self) -> Vector3<f32>;
    fn force(&self) -> Vector3<f32>;
    fn torque(&self) -> Vector3<f32>;

    /// Apply an impulse at a point of collision, immediately changing the
    /// linear and angular velocities.
    fn apply_impulse(&mut self, impulse: &Vector3<f32>, poc: &Vector3<f32>, update_bounds: bool);

    /// Accumulate a force applied at `at`, relative to the center of mass.
    fn apply_internal_force(&mut self, at: &Vector3<f32>, force: &Vector3<f32>);

    fn update_bounds(&mut self);

    /// Friction table key.
    fn physical_type(&self) -> u32 {
        0
    }

    fn angular_momentum(&self) -> Vector3<f32> {
        self.orientated_tensor() * self.angular_velocity()
    }

    /// Velocity of the body at the point `p`.
    fn velocity_at(&self, p: &Vector3<f32>) -> Vector3<f32> {
        self.velocity() + self.angular_velocity().cross(&(p - self.center_of_mass()))
    }
}

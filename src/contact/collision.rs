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

//! Per-pair collision state.

use nalgebra::Vector3;

/// Times of impact within this range are considered repeats of the same
/// collision.
pub const TIME_EPSILON: f32 = 1e-6;

/// The contact surface between two colliding bodies, seen from one side.
pub trait ContactManifold {
    /// Normal of the impact, pointing away from the other body.
    fn normal_of_impact(&self, other: &Self) -> Vector3<f32>;

    fn contact_manifold_size(&self) -> usize;
    fn contact_manifold_point(&self, i: usize) -> Vector3<f32>;

    /// Representative point of the impact.
    fn center_of_impact(&self, other: &Self, noc: &Vector3<f32>) -> Vector3<f32>;

    /// dN/dt of the contact normal.
    fn rate_of_change_of_normal_of_impact(&self, other: &Self, noc: &Vector3<f32>)
    -> Vector3<f32>;
}

/// Bit 0x4 marks a collision that retesting has not yet confirmed.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    NoCollision = 0,
    SlidingCollision = 1,
    Collision = 2,
    PossibleSlidingCollision = 5,
    PossibleCollision = 6,
}

impl CollisionType {
    pub fn is_uncertain(self) -> bool {
        ((self as u8) & 0x4) != 0
    }

    pub fn to_certain(self) -> Self {
        match self {
            CollisionType::PossibleSlidingCollision => CollisionType::SlidingCollision,
            CollisionType::PossibleCollision => CollisionType::Collision,
            t => t,
        }
    }
}

/// The state of a collision between one ordered pair of bodies.
#[derive(Debug, Clone)]
pub struct CollisionInfo<S> {
    simplex: S,
    other_simplex: S,
    time: f32,
    last_time: f32,
    repeats: u32,
    kind: CollisionType,
}

impl<S: ContactManifold> CollisionInfo<S> {
    pub fn new(simplex: S, other_simplex: S, time: f32, kind: CollisionType) -> Self {
        CollisionInfo {
            simplex,
            other_simplex,
            time,
            last_time: time,
            repeats: 0,
            kind,
        }
    }

    pub fn update(&mut self, simplex: S, other_simplex: S, time: f32, kind: CollisionType) {
        self.simplex = simplex;
        self.other_simplex = other_simplex;

        /* A changed time of impact means the collision is advancing again */
        if (time - self.last_time).abs() > TIME_EPSILON {
            self.repeats = 0;
        }

        self.time = time;
        self.last_time = time;
        self.kind = kind;
    }

    /// A retest confirmed the collision; promote it without touching the
    /// time of impact.
    pub fn successful_retest_update(&mut self, simplex: S, other_simplex: S) {
        self.simplex = simplex;
        self.other_simplex = other_simplex;
        self.kind = self.kind.to_certain();
    }

    pub fn void_collision(&mut self) {
        self.time = f32::MAX;
        self.kind = CollisionType::NoCollision;
    }

    /// A collision whose time of impact repeats is not advancing; after more
    /// than one repeat treat it as sliding.
    pub fn switch_to_sliding(&mut self) -> bool {
        self.repeats += 1;
        if self.repeats > 1 {
            self.kind = CollisionType::SlidingCollision;
            return true;
        }

        false
    }

    /// Zero until the collision is certain.
    pub fn normal_of_collision(&self) -> Vector3<f32> {
        if self.kind.is_uncertain() {
            Vector3::zeros()
        } else {
            self.simplex.normal_of_impact(&self.other_simplex)
        }
    }

    /// Zero until the collision is certain.
    pub fn point_of_collision(&self) -> Vector3<f32> {
        if self.kind.is_uncertain() {
            Vector3::zeros()
        } else {
            let noc = self.simplex.normal_of_impact(&self.other_simplex);
            self.simplex.center_of_impact(&self.other_simplex, &noc)
        }
    }

    pub fn simplex(&self) -> &S {
        &self.simplex
    }

    pub fn other_simplex(&self) -> &S {
        &self.other_simplex
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn kind(&self) -> CollisionType {
        self.kind
    }
}

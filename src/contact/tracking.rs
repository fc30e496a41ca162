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

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::contact::BodyHandle;
use crate::contact::collision::{CollisionInfo, CollisionType, ContactManifold};

/// All collisions tracked for one body, with the temporally first one
/// maintained incrementally.
#[derive(Debug, Clone)]
pub struct TrackingInfo<S> {
    collisions: BTreeMap<BodyHandle, CollisionInfo<S>>,
    collide: Option<BodyHandle>,
    time: f32,
    kind: CollisionType,
}

impl<S: ContactManifold> TrackingInfo<S> {
    pub fn new(
        other: BodyHandle,
        simplex: S,
        other_simplex: S,
        time: f32,
        kind: CollisionType,
    ) -> Self {
        let mut collisions = BTreeMap::new();
        collisions.insert(other, CollisionInfo::new(simplex, other_simplex, time, kind));
        TrackingInfo {
            collisions,
            collide: Some(other),
            time,
            kind,
        }
    }

    pub fn update(
        &mut self,
        other: BodyHandle,
        simplex: S,
        other_simplex: S,
        time: f32,
        kind: CollisionType,
    ) {
        match self.collisions.entry(other) {
            Entry::Occupied(mut e) => e.get_mut().update(simplex, other_simplex, time, kind),
            Entry::Vacant(e) => {
                e.insert(CollisionInfo::new(simplex, other_simplex, time, kind));
            }
        }

        /* Earlier than the current first collision, take its place */
        if self.collide.is_none() || (time < self.time) {
            self.collide = Some(other);
            self.time = time;
            self.kind = kind;
        }
        /* The first collision moved later, rescan */
        else if self.collide == Some(other) {
            self.find_first_collision();
        }
    }

    /// A retest confirmed the collision with `other`.
    pub fn successful_retest_update(&mut self, other: BodyHandle, simplex: S, other_simplex: S) {
        debug_assert!(self.collisions.contains_key(&other));
        if let Some(info) = self.collisions.get_mut(&other) {
            info.successful_retest_update(simplex, other_simplex);
        }

        self.kind = self.kind.to_certain();
    }

    pub fn void_collision(&mut self, other: BodyHandle) {
        if let Some(info) = self.collisions.get_mut(&other) {
            info.void_collision();
        }

        if self.collide == Some(other) {
            self.find_first_collision();
        }
    }

    pub fn void_all(&mut self) {
        for info in self.collisions.values_mut() {
            info.void_collision();
        }

        self.collide = None;
        self.time = f32::MAX;
        self.kind = CollisionType::NoCollision;
    }

    fn find_first_collision(&mut self) {
        self.collide = None;
        self.time = f32::MAX;
        self.kind = CollisionType::NoCollision;
        for (&other, info) in &self.collisions {
            if info.time() < self.time {
                self.collide = Some(other);
                self.time = info.time();
                self.kind = info.kind();
            }
        }
    }

    pub fn get(&self, other: BodyHandle) -> Option<&CollisionInfo<S>> {
        self.collisions.get(&other)
    }

    pub fn get_mut(&mut self, other: BodyHandle) -> Option<&mut CollisionInfo<S>> {
        self.collisions.get_mut(&other)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &CollisionInfo<S>)> {
        self.collisions.iter().map(|(&other, info)| (other, info))
    }

    pub fn first_collision(&self) -> Option<BodyHandle> {
        self.collide
    }

    pub fn first_collision_time(&self) -> f32 {
        self.time
    }

    pub fn first_collision_kind(&self) -> CollisionType {
        self.kind
    }
}

//! Procedural cherry tree: branch and blossom geometry derived from age.

use crate::config::{
    ShapeMode, AGE_PER_DEPTH, BRANCH_SHRINK, GROUND_HEIGHT, MAX_GEN_DEPTH, MIN_GEN_DEPTH,
    SPREAD_BASE, SPREAD_JITTER, TRIM_RADIUS, TRUNK_LENGTH, WORLD_HEIGHT, WORLD_WIDTH,
};
use rand::Rng;
use std::f32::consts::FRAC_PI_2;

/// Number of entries in the blossom palette
pub const BLOSSOM_COUNT: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Branch {
    pub origin: (f32, f32),
    pub end: (f32, f32),
    pub thickness: u32,
    pub depth: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Leaf {
    pub x: f32,
    pub y: f32,
    pub color_index: usize,
}

#[derive(Clone, Debug, Default)]
pub struct TreeGeometry {
    /// Pre-order: a branch is always followed by its first child's subtree
    pub branches: Vec<Branch>,
    pub leaves: Vec<Leaf>,
}

/// A branch waiting to be grown
struct BranchTask {
    x: f32,
    y: f32,
    length: f32,
    angle: f32,
    depth: u32,
}

/// Deepest recursion level reachable at `age`
pub fn max_gen_depth(age: u64) -> u32 {
    let steps = (age / AGE_PER_DEPTH).min(MAX_GEN_DEPTH as u64) as u32;
    (steps + MIN_GEN_DEPTH).min(MAX_GEN_DEPTH)
}

/// Base of the trunk, centred on the ground line
pub fn trunk_origin() -> (f32, f32) {
    (WORLD_WIDTH / 2.0, WORLD_HEIGHT - GROUND_HEIGHT)
}

/// Grow a tree for `age` from a trunk segment.
///
/// Every branch above the deepest level forks into two children, each 25%
/// shorter and turned away from the parent by its own random spread. Branches
/// at the deepest level carry one blossom.
pub fn generate<R: Rng>(
    age: u64,
    origin: (f32, f32),
    length: f32,
    angle: f32,
    rng: &mut R,
) -> TreeGeometry {
    let max_depth = max_gen_depth(age);
    let tips = 1usize << (max_depth - 1);
    let mut geometry = TreeGeometry {
        branches: Vec::with_capacity(tips * 2),
        leaves: Vec::with_capacity(tips),
    };

    // Use a stack instead of recursion
    let mut stack: Vec<BranchTask> = Vec::with_capacity(max_depth as usize * 2);
    stack.push(BranchTask {
        x: origin.0,
        y: origin.1,
        length,
        angle,
        depth: 1,
    });

    while let Some(task) = stack.pop() {
        let end_x = task.x + task.angle.cos() * task.length;
        let end_y = task.y + task.angle.sin() * task.length;

        geometry.branches.push(Branch {
            origin: (task.x, task.y),
            end: (end_x, end_y),
            thickness: 6u32.saturating_sub(task.depth).max(1),
            depth: task.depth,
        });

        if task.depth < max_depth {
            let sub_length = task.length * BRANCH_SHRINK;
            let left = task.angle - (SPREAD_BASE + rng.gen_range(0.0..SPREAD_JITTER));
            let right = task.angle + (SPREAD_BASE + rng.gen_range(0.0..SPREAD_JITTER));

            // Pushed second so it is grown first
            stack.push(BranchTask {
                x: end_x,
                y: end_y,
                length: sub_length,
                angle: right,
                depth: task.depth + 1,
            });
            stack.push(BranchTask {
                x: end_x,
                y: end_y,
                length: sub_length,
                angle: left,
                depth: task.depth + 1,
            });
        } else {
            geometry.leaves.push(Leaf {
                x: end_x,
                y: end_y,
                color_index: rng.gen_range(0..BLOSSOM_COUNT),
            });
        }
    }

    geometry
}

/// The tree currently on screen, regenerated as it ages
pub struct Canopy {
    mode: ShapeMode,
    geometry: TreeGeometry,
    grown_for: Option<u64>,
}

impl Canopy {
    pub fn new(mode: ShapeMode) -> Self {
        Self {
            mode,
            geometry: TreeGeometry::default(),
            grown_for: None,
        }
    }

    /// Bring the geometry up to date with `age`.
    ///
    /// Age 0 is a seed and has no geometry at all.
    pub fn refresh<R: Rng>(&mut self, age: u64, rng: &mut R) {
        if age == 0 {
            self.geometry = TreeGeometry::default();
            self.grown_for = Some(0);
            return;
        }

        let aged = self.grown_for != Some(age);
        if aged || self.mode == ShapeMode::Living {
            if aged {
                tracing::debug!(age, depth = max_gen_depth(age), "regrowing tree");
            }
            self.geometry = generate(age, trunk_origin(), TRUNK_LENGTH, -FRAC_PI_2, rng);
            self.grown_for = Some(age);
        }
    }

    /// Drop cached geometry so the next refresh regrows from scratch
    pub fn invalidate(&mut self) {
        self.grown_for = None;
    }

    /// Snip the newest blossom within reach of (x, y)
    pub fn try_trim(&mut self, x: f32, y: f32) -> bool {
        let reach = TRIM_RADIUS * TRIM_RADIUS;
        let hit = self.geometry.leaves.iter().rposition(|leaf| {
            let dx = x - leaf.x;
            let dy = y - leaf.y;
            dx * dx + dy * dy < reach
        });

        match hit {
            Some(i) => {
                self.geometry.leaves.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn geometry(&self) -> &TreeGeometry {
        &self.geometry
    }
}

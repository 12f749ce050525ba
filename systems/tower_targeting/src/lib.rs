#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that picks the nearest in-range enemy for every tower.
//!
//! Targets are recomputed from scratch each tick. Distances are compared
//! squared, and ties keep whichever enemy appears first in the input list.

use ninja_defense_core::{
    geometry::distance_squared, EnemyId, EnemyTarget, TowerId, TowerInstance, Vec2,
};

/// Target assignment for a single tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that acquired the target.
    pub tower: TowerId,
    /// Enemy chosen as the target.
    pub enemy: EnemyId,
    /// Pixel position of the tower.
    pub tower_position: Vec2,
    /// Pixel position of the enemy when it was chosen.
    pub enemy_position: Vec2,
}

/// Finds the nearest enemy within `range_px` of `origin`.
#[must_use]
pub fn nearest_in_range(
    origin: Vec2,
    range_px: f32,
    enemies: &[EnemyTarget],
) -> Option<EnemyTarget> {
    let range_sq = range_px * range_px;
    let mut best: Option<BestCandidate> = None;

    for (order, enemy) in enemies.iter().enumerate() {
        let distance_sq = distance_squared(origin, enemy.position);
        if distance_sq > range_sq {
            continue;
        }

        let current = BestCandidate {
            distance_sq,
            order,
            enemy: *enemy,
        };
        match &mut best {
            Some(existing) => {
                if current.precedes(existing) {
                    *existing = current;
                }
            }
            None => best = Some(current),
        }
    }

    best.map(|candidate| candidate.enemy)
}

/// Tower targeting system that reuses its output scratch buffer.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    enemy_workspace: Vec<EnemyTarget>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes one target per tower that has an enemy in range.
    ///
    /// The output buffer is cleared before populating it.
    pub fn handle(
        &mut self,
        towers: &[TowerInstance],
        enemies: &[EnemyTarget],
        out: &mut Vec<TowerTarget>,
    ) {
        out.clear();
        if towers.is_empty() || enemies.is_empty() {
            return;
        }

        self.enemy_workspace.clear();
        self.enemy_workspace
            .extend(enemies.iter().filter(|enemy| enemy.position.is_finite()));

        for tower in towers {
            let nearest = nearest_in_range(tower.position, tower.range_px, &self.enemy_workspace);
            if let Some(enemy) = nearest {
                out.push(TowerTarget {
                    tower: tower.id,
                    enemy: enemy.id,
                    tower_position: tower.position,
                    enemy_position: enemy.position,
                });
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    distance_sq: f32,
    order: usize,
    enemy: EnemyTarget,
}

impl BestCandidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.distance_sq != other.distance_sq {
            return self.distance_sq < other.distance_sq;
        }

        self.order < other.order
    }
}

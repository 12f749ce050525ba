//! Fixed-order simulation pipeline executed by `Command::Tick`.
//!
//! Order: spawn, move enemies, home projectiles, fire towers against the
//! post-movement positions, apply damage, settle rewards and lives, then
//! resolve defeat, wave clears, and victory.

use std::time::Duration;

use ninja_defense_core::{
    DamageEvent, EnemyId, EnemyInstance, EnemyTarget, Event, Outcome, ProjectileId, SpeedMode,
};
use ninja_defense_system_enemies as enemies;
use ninja_defense_system_projectiles as projectiles;
use ninja_defense_system_spawning::{Advance, SpawnOrder};
use ninja_defense_system_tower_combat::Delivery;

use crate::{query, World};

impl World {
    pub(crate) fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.outcome.is_some() || self.speed == SpeedMode::Paused {
            return;
        }

        let dt = dt
            .min(self.level.rules.max_frame_dt())
            .saturating_mul(self.speed.multiplier());
        let seconds = dt.as_secs_f32();
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced { dt });

        let mut orders = Vec::new();
        self.director.handle(&self.level.waves, dt, &mut orders);
        for order in orders {
            self.spawn(order, out_events);
        }

        let mut escaped = Vec::new();
        enemies::update_enemies(&mut self.enemies, seconds, &self.waypoints, &mut escaped);

        let targets: Vec<EnemyTarget> = self.enemies.iter().map(EnemyInstance::target).collect();
        let mut damage = Vec::new();
        projectiles::update_projectiles(&mut self.projectiles, &targets, seconds, &mut damage);

        self.fire_towers(&targets, seconds, &mut damage, out_events);

        let mut killed = Vec::new();
        enemies::apply_enemy_damage(&mut self.enemies, &damage, &mut killed);
        self.settle(killed, escaped, out_events);
        self.resolve_progress(out_events);
    }

    fn spawn(&mut self, order: SpawnOrder, out_events: &mut Vec<Event>) {
        let start = match self.waypoints.as_slice() {
            [first, _, ..] => *first,
            _ => {
                tracing::warn!(
                    enemy = %order.enemy,
                    "route has fewer than two waypoints; spawn skipped"
                );
                return;
            }
        };
        let Some(enemy_type) = self.level.enemy_type(&order.enemy) else {
            tracing::warn!(
                enemy = %order.enemy,
                wave = order.wave_index,
                "unknown enemy type; spawn skipped"
            );
            return;
        };

        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.saturating_add(1);
        enemies::spawn_enemy(
            &mut self.enemies,
            id,
            enemy_type,
            start,
            self.layout.tile_size(),
        );
        out_events.push(Event::EnemySpawned {
            enemy: id,
            kind: order.enemy,
        });
    }

    fn fire_towers(
        &mut self,
        targets: &[EnemyTarget],
        seconds: f32,
        damage: &mut Vec<DamageEvent>,
        out_events: &mut Vec<Event>,
    ) {
        let mut assignments = Vec::new();
        self.targeting
            .handle(self.towers.as_slice(), targets, &mut assignments);

        let mut shots = Vec::new();
        self.combat
            .handle(self.towers.as_mut_slice(), &assignments, seconds, &mut shots);

        for shot in shots {
            match shot.delivery {
                Delivery::Instant => {
                    damage.extend(shot.damage_event());
                    out_events.push(Event::TowerFired {
                        tower: shot.tower,
                        enemy: shot.enemy,
                    });
                }
                Delivery::Projectile(kind) => {
                    let projectile = ProjectileId::new(self.next_projectile_id);
                    self.next_projectile_id = self.next_projectile_id.saturating_add(1);
                    projectiles::spawn_projectile(
                        &mut self.projectiles,
                        projectile,
                        kind,
                        shot.origin,
                        shot.target_position,
                        shot.enemy,
                        shot.damage,
                    );
                    out_events.push(Event::ProjectileLaunched {
                        projectile,
                        tower: shot.tower,
                        enemy: shot.enemy,
                    });
                }
            }
        }
    }

    fn settle(
        &mut self,
        killed: Vec<EnemyInstance>,
        escaped: Vec<EnemyId>,
        out_events: &mut Vec<Event>,
    ) {
        for enemy in killed {
            let reward = query::kill_reward(self, &enemy.kind);
            self.money = self.money.saturating_add(reward);
            out_events.push(Event::EnemyKilled {
                enemy: enemy.id,
                kind: enemy.kind,
                reward,
            });
        }

        for enemy in escaped {
            self.lives = self.lives.saturating_sub(1);
            tracing::debug!(enemy = enemy.get(), lives = self.lives, "enemy escaped");
            out_events.push(Event::EnemyEscaped {
                enemy,
                lives_remaining: self.lives,
            });
        }
    }

    fn resolve_progress(&mut self, out_events: &mut Vec<Event>) {
        if self.lives == 0 {
            self.finish(Outcome::Defeat, out_events);
            return;
        }

        match self
            .director
            .try_advance(&self.level.waves, self.enemies.is_empty())
        {
            Advance::Holding => {}
            Advance::NextWave { cleared } => {
                let bonus = self.level.rules.wave_clear_bonus;
                self.money = self.money.saturating_add(bonus);
                tracing::info!(wave = cleared + 1, bonus, "wave cleared");
                out_events.push(Event::WaveCleared {
                    wave_index: cleared,
                    bonus,
                });
            }
            Advance::Finished { cleared } => {
                tracing::info!(wave = cleared + 1, "final wave cleared");
                out_events.push(Event::WaveCleared {
                    wave_index: cleared,
                    bonus: 0,
                });
            }
        }

        if self.director.is_finished(&self.level.waves) {
            self.finish(Outcome::Victory, out_events);
        }
    }

    fn finish(&mut self, outcome: Outcome, out_events: &mut Vec<Event>) {
        self.outcome = Some(outcome);
        tracing::info!(
            ?outcome,
            money = self.money,
            lives = self.lives,
            "game over"
        );
        out_events.push(Event::GameStateChanged {
            state: self.game_state(),
        });
    }
}

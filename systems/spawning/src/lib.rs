#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave director that turns wave scripts into timed spawn orders.
//!
//! The director only decides *what* should spawn and *when*; the world owns
//! the enemy list and decides whether a spawn order can be honoured.

use std::time::Duration;

use ninja_defense_core::{EnemyTypeId, WaveDefinition};

/// Request to place one enemy of the given type at the route start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnOrder {
    /// Zero-based index of the wave that issued the order.
    pub wave_index: usize,
    /// Enemy type to spawn.
    pub enemy: EnemyTypeId,
}

/// Result of asking the director to move past the current wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// The current wave is still spawning or enemies remain on the board.
    Holding,
    /// The wave was cleared and another wave is now active.
    NextWave {
        /// Zero-based index of the wave that was cleared.
        cleared: usize,
    },
    /// The final wave was cleared.
    Finished {
        /// Zero-based index of the wave that was cleared.
        cleared: usize,
    },
}

/// Deterministic state machine tracking progress through the wave list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WaveDirector {
    wave_index: usize,
    group_index: usize,
    spawned_in_group: u32,
    spawned_in_wave: u32,
    accumulator: Duration,
}

impl WaveDirector {
    /// Creates a director positioned at the start of the first wave.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero-based index of the active wave; equals the wave count once every
    /// wave has been cleared.
    #[must_use]
    pub const fn wave_index(&self) -> usize {
        self.wave_index
    }

    /// Number of enemies the active wave has spawned so far.
    #[must_use]
    pub const fn spawned_in_wave(&self) -> u32 {
        self.spawned_in_wave
    }

    /// Reports whether every wave has been cleared.
    #[must_use]
    pub fn is_finished(&self, waves: &[WaveDefinition]) -> bool {
        self.wave_index >= waves.len()
    }

    /// Reports whether the active wave has issued all of its spawn orders.
    #[must_use]
    pub fn done_spawning(&self, waves: &[WaveDefinition]) -> bool {
        waves
            .get(self.wave_index)
            .map_or(true, |wave| self.spawned_in_wave >= wave.total_count())
    }

    /// Accumulates `dt` and emits one order per elapsed spawn interval.
    ///
    /// A zero interval releases every remaining enemy of the wave at once.
    pub fn handle(&mut self, waves: &[WaveDefinition], dt: Duration, out: &mut Vec<SpawnOrder>) {
        let Some(wave) = waves.get(self.wave_index) else {
            return;
        };

        let remaining = wave.total_count().saturating_sub(self.spawned_in_wave);
        if remaining == 0 {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(dt);
        let interval = interval_of(wave);
        let attempts = self.resolve_spawn_attempts(interval, remaining);

        for _ in 0..attempts {
            match self.next_enemy(wave) {
                Some(enemy) => out.push(SpawnOrder {
                    wave_index: self.wave_index,
                    enemy: enemy.clone(),
                }),
                None => break,
            }
        }
    }

    /// Moves to the next wave once the active wave finished spawning and the
    /// board is clear.
    pub fn try_advance(&mut self, waves: &[WaveDefinition], board_empty: bool) -> Advance {
        if self.is_finished(waves) || !board_empty || !self.done_spawning(waves) {
            return Advance::Holding;
        }

        let cleared = self.wave_index;
        self.wave_index += 1;
        self.group_index = 0;
        self.spawned_in_group = 0;
        self.spawned_in_wave = 0;
        self.accumulator = Duration::ZERO;

        if self.is_finished(waves) {
            Advance::Finished { cleared }
        } else {
            Advance::NextWave { cleared }
        }
    }

    fn resolve_spawn_attempts(&mut self, interval: Duration, remaining: u32) -> u32 {
        if interval.is_zero() {
            self.accumulator = Duration::ZERO;
            return remaining;
        }

        let mut attempts = 0;
        while attempts < remaining && self.accumulator >= interval {
            self.accumulator -= interval;
            attempts += 1;
        }
        attempts
    }

    fn next_enemy<'a>(&mut self, wave: &'a WaveDefinition) -> Option<&'a EnemyTypeId> {
        while let Some((enemy, count)) = wave.group(self.group_index) {
            if self.spawned_in_group < count {
                self.spawned_in_group += 1;
                self.spawned_in_wave += 1;
                return Some(enemy);
            }
            self.group_index += 1;
            self.spawned_in_group = 0;
        }
        None
    }
}

fn interval_of(wave: &WaveDefinition) -> Duration {
    Duration::try_from_secs_f32(wave.interval_sec().max(0.0)).unwrap_or(Duration::ZERO)
}

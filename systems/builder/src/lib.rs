#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that maps pointer input on the board to placement and
//! selection commands.

use ninja_defense_core::{
    BoardLayout, CellCoord, Command, Event, GameState, PlacementError, TowerId, Vec2,
};

/// Hover feedback describing whether the armed tower could be built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementPreview {
    /// Cell under the cursor.
    pub cell: CellCoord,
    /// Reason the placement would fail, or `None` when it would succeed.
    pub rejection: Option<PlacementError>,
}

impl PlacementPreview {
    /// Creates a new placement preview descriptor.
    #[must_use]
    pub const fn new(cell: CellCoord, rejection: Option<PlacementError>) -> Self {
        Self { cell, rejection }
    }

    /// Indicates whether the preview represents a valid placement location.
    #[must_use]
    pub const fn placeable(&self) -> bool {
        self.rejection.is_none()
    }
}

/// Builds a preview for the cell under `cursor`.
///
/// `check` should mirror the world's placement validation so the preview
/// agrees with the outcome of a click.
pub fn placement_preview<F>(
    layout: &BoardLayout,
    cursor: Vec2,
    check: F,
) -> Option<PlacementPreview>
where
    F: FnOnce(CellCoord) -> Result<(), PlacementError>,
{
    let cell = layout.pixel_to_cell(cursor)?;
    Some(PlacementPreview::new(cell, check(cell).err()))
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BuilderInput {
    /// Pixel position of a primary click made on this frame.
    pub click: Option<Vec2>,
}

impl BuilderInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(click: Option<Vec2>) -> Self {
        Self { click }
    }
}

/// System that translates board clicks into world commands.
#[derive(Debug, Clone)]
pub struct Builder {
    game_state: GameState,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// Creates a new builder system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            game_state: GameState::Paused,
        }
    }

    /// Consumes world events and adapter-derived input to emit commands.
    ///
    /// A click on a tower selects it, a click on a free cell requests a
    /// placement, and a click outside the grid clears the selection. Nothing
    /// is emitted once the session has ended. The `tower_at` closure should
    /// mirror the semantics of the world's `query::tower_at` helper.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        layout: &BoardLayout,
        input: BuilderInput,
        mut tower_at: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(CellCoord) -> Option<TowerId>,
    {
        for event in events {
            if let Event::GameStateChanged { state } = event {
                self.game_state = *state;
            }
        }

        if self.game_state.is_terminal() {
            return;
        }

        let Some(click) = input.click else {
            return;
        };

        match layout.pixel_to_cell(click) {
            None => out.push(Command::SelectTower { tower: None }),
            Some(cell) => match tower_at(cell) {
                Some(tower) => out.push(Command::SelectTower { tower: Some(tower) }),
                None => out.push(Command::PlaceTower { cell }),
            },
        }
    }

    /// Game state last observed through world events.
    #[must_use]
    pub const fn game_state(&self) -> GameState {
        self.game_state
    }
}

use ninja_defense_core::{
    BoardLayout, CellCoord, CellKind, Command, Event, GameState, PlacementError, TowerId, Vec2,
};
use ninja_defense_system_builder::{placement_preview, Builder, BuilderInput, PlacementPreview};

fn layout() -> BoardLayout {
    BoardLayout::with_tile_size(40.0, 10, 8)
}

fn click_at(x: f32, y: f32) -> BuilderInput {
    BuilderInput::new(Some(Vec2::new(x, y)))
}

#[test]
fn click_on_free_cell_requests_placement() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    builder.handle(&[], &layout(), click_at(85.0, 130.0), |_| None, &mut commands);

    assert_eq!(
        commands,
        vec![Command::PlaceTower {
            cell: CellCoord::new(2, 3),
        }],
        "builder should emit a placement command when clicking a free cell",
    );
}

#[test]
fn click_on_tower_selects_it() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();
    let occupied = CellCoord::new(1, 1);

    builder.handle(
        &[],
        &layout(),
        click_at(50.0, 50.0),
        |cell| (cell == occupied).then_some(TowerId::new(4)),
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::SelectTower {
            tower: Some(TowerId::new(4)),
        }]
    );
}

#[test]
fn click_outside_grid_clears_selection() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    builder.handle(&[], &layout(), click_at(1000.0, 5.0), |_| None, &mut commands);

    assert_eq!(commands, vec![Command::SelectTower { tower: None }]);
}

#[test]
fn terminal_states_silence_the_builder() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    builder.handle(
        &[Event::GameStateChanged {
            state: GameState::Defeat,
        }],
        &layout(),
        click_at(85.0, 130.0),
        |_| None,
        &mut commands,
    );
    assert!(commands.is_empty(), "no commands after defeat");
    assert_eq!(builder.game_state(), GameState::Defeat);

    builder.handle(
        &[Event::GameStateChanged {
            state: GameState::Paused,
        }],
        &layout(),
        click_at(85.0, 130.0),
        |_| None,
        &mut commands,
    );
    assert_eq!(commands.len(), 1, "restart re-enables input");
}

#[test]
fn frames_without_clicks_emit_nothing() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();
    builder.handle(&[], &layout(), BuilderInput::default(), |_| None, &mut commands);
    assert!(commands.is_empty());
}

#[test]
fn preview_reports_validation_outcome() {
    let preview = placement_preview(&layout(), Vec2::new(10.0, 10.0), |_| {
        Err(PlacementError::Blocked {
            kind: CellKind::Path,
        })
    });
    assert_eq!(
        preview,
        Some(PlacementPreview::new(
            CellCoord::new(0, 0),
            Some(PlacementError::Blocked {
                kind: CellKind::Path
            }),
        ))
    );
    assert!(!preview.is_some_and(|preview| preview.placeable()));

    let preview = placement_preview(&layout(), Vec2::new(45.0, 10.0), |_| Ok(()));
    assert!(preview.is_some_and(|preview| preview.placeable()));

    assert!(placement_preview(&layout(), Vec2::new(-1.0, 0.0), |_| Ok(())).is_none());
}

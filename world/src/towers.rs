//! Authoritative tower state management utilities.

use ninja_defense_core::{BoardLayout, CellCoord, TowerId, TowerInstance, TowerType};

/// Registry that stores towers in identifier order and manages allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: Vec<TowerInstance>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Builds a tower of `tower_type` on `cell` and returns its identifier.
    ///
    /// Validation is the caller's responsibility.
    pub(crate) fn place(
        &mut self,
        tower_type: &TowerType,
        cell: CellCoord,
        layout: &BoardLayout,
    ) -> TowerId {
        let id = self.allocate_id();
        self.entries.push(TowerInstance::from_type(
            id,
            tower_type,
            cell,
            layout.cell_center(cell),
            layout.tile_size(),
        ));
        id
    }

    /// Removes a tower, returning it if it existed.
    pub(crate) fn remove(&mut self, tower: TowerId) -> Option<TowerInstance> {
        let index = self.index_of(tower)?;
        Some(self.entries.remove(index))
    }

    pub(crate) fn get(&self, tower: TowerId) -> Option<&TowerInstance> {
        self.index_of(tower).map(|index| &self.entries[index])
    }

    pub(crate) fn get_mut(&mut self, tower: TowerId) -> Option<&mut TowerInstance> {
        self.index_of(tower).map(move |index| &mut self.entries[index])
    }

    /// Tower standing on `cell`, if any.
    pub(crate) fn tower_at(&self, cell: CellCoord) -> Option<&TowerInstance> {
        self.entries.iter().find(|tower| tower.cell == cell)
    }

    pub(crate) fn as_slice(&self) -> &[TowerInstance] {
        &self.entries
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [TowerInstance] {
        &mut self.entries
    }

    /// Moves every tower onto the cell centres of a new layout and rescales
    /// its range.
    pub(crate) fn relayout(&mut self, layout: &BoardLayout) {
        for tower in &mut self.entries {
            tower.position = layout.cell_center(tower.cell);
            tower.recompute_stats(layout.tile_size());
        }
    }

    fn index_of(&self, tower: TowerId) -> Option<usize> {
        self.entries
            .binary_search_by_key(&tower, |entry| entry.id)
            .ok()
    }

    fn allocate_id(&mut self) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        id
    }
}

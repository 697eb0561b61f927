use std::collections::{BTreeMap, HashMap};

use bevy::log::debug;

use super::plant::{Plant, PlantColor, PlantId, PlantPosition, PositionPatch};

#[derive(Clone)]
struct Slot {
    seq: u64,
    plant: Plant,
}

/// Keyed store of plants.
///
/// Iteration follows insertion order so that every consumer reading the
/// store within one frame sees the same sequence. Re-adding an existing id
/// replaces the plant in place without moving it.
#[derive(Clone, Default)]
pub struct PlantStore {
    plants: HashMap<PlantId, Slot>,
    order: BTreeMap<u64, PlantId>,
    next_seq: u64,
    revision: u64,
}

impl std::fmt::Debug for PlantStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlantStore")
            .field("plants", &self.plant_list().collect::<Vec<_>>())
            .field("revision", &self.revision)
            .finish()
    }
}

impl PlantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumped by every mutation that changed at least one plant.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.plants.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }

    pub fn contains(&self, id: &PlantId) -> bool {
        self.plants.contains_key(id)
    }

    pub fn add_plant(&mut self, plant: Plant) {
        match self.plants.get_mut(plant.id()) {
            Some(slot) => slot.plant = plant,
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.order.insert(seq, plant.id().clone());
                self.plants.insert(plant.id().clone(), Slot { seq, plant });
            }
        }
        self.revision += 1;
    }

    pub fn remove_plant(&mut self, id: &PlantId) -> Option<Plant> {
        let slot = self.plants.remove(id)?;
        self.order.remove(&slot.seq);
        self.revision += 1;
        Some(slot.plant)
    }

    pub fn get_plant(&self, id: &PlantId) -> Option<&Plant> {
        self.plants.get(id).map(|slot| &slot.plant)
    }

    pub fn create_plant(
        &mut self,
        name: impl Into<String>,
        position: PlantPosition,
        color: Option<PlantColor>,
    ) -> &Plant {
        let id = PlantId::generate();
        let plant = Plant::new(id.clone(), name, position, color.unwrap_or_default());
        debug!("created plant {} ({})", id, plant.name());
        self.add_plant(plant);
        &self.plants[&id].plant
    }

    /// Exclusive select: afterwards exactly `id` is selected, or nothing if
    /// `id` is unknown.
    pub fn select_plant(&mut self, id: &PlantId) {
        let mut changed = self.clear_selection();
        if let Some(slot) = self.plants.get_mut(id) {
            changed |= slot.plant.set_selected(true);
        }
        self.touch(changed);
    }

    /// Clears both `selected` and `is_moving` on every plant.
    pub fn deselect_all(&mut self) {
        let changed = self.clear_selection();
        self.touch(changed);
    }

    /// Deselect `id` if it is selected, otherwise make it the only selection.
    /// Unknown ids are ignored.
    pub fn toggle_plant_selection(&mut self, id: &PlantId) {
        let Some(selected) = self.get_plant(id).map(Plant::is_selected) else {
            return;
        };

        if selected {
            if let Some(slot) = self.plants.get_mut(id) {
                slot.plant.toggle_selected();
            }
            self.touch(true);
        } else {
            self.select_plant(id);
        }
    }

    pub fn update_plant_position(&mut self, id: &PlantId, patch: PositionPatch) -> bool {
        let Some(slot) = self.plants.get_mut(id) else {
            return false;
        };
        let changed = slot.plant.set_position(patch);
        self.touch(changed);
        true
    }

    pub fn set_plant_moving(&mut self, id: &PlantId, is_moving: bool) -> bool {
        let Some(slot) = self.plants.get_mut(id) else {
            return false;
        };
        let changed = slot.plant.set_is_moving(is_moving);
        self.touch(changed);
        true
    }

    /// All plants in insertion order.
    pub fn plant_list(&self) -> impl Iterator<Item = &Plant> + '_ {
        self.order.values().filter_map(|id| self.get_plant(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = &PlantId> + '_ {
        self.order.values()
    }

    /// First selected plant in insertion order.
    pub fn selected_plant(&self) -> Option<&Plant> {
        self.plant_list().find(|p| p.is_selected())
    }

    pub fn selected_plants(&self) -> Vec<&Plant> {
        self.plant_list().filter(|p| p.is_selected()).collect()
    }

    fn clear_selection(&mut self) -> bool {
        let mut changed = false;
        for slot in self.plants.values_mut() {
            changed |= slot.plant.set_selected(false);
            changed |= slot.plant.set_is_moving(false);
        }
        changed
    }

    #[inline]
    fn touch(&mut self, changed: bool) {
        if changed {
            self.revision += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected_ids(store: &PlantStore) -> Vec<PlantId> {
        store
            .selected_plants()
            .into_iter()
            .map(|p| p.id().clone())
            .collect()
    }

    fn two_plants() -> (PlantStore, PlantId, PlantId) {
        let mut store = PlantStore::new();
        let a = store
            .create_plant("A", PlantPosition::new(0.0, 0.0, 0.0), None)
            .id()
            .clone();
        let b = store
            .create_plant("B", PlantPosition::new(1.0, 0.0, 1.0), None)
            .id()
            .clone();
        (store, a, b)
    }

    #[test]
    fn create_assigns_id_and_default_color() {
        let mut store = PlantStore::new();
        let plant = store.create_plant("Rose", PlantPosition::ORIGIN, None).clone();

        assert_eq!(plant.color(), PlantColor::DEFAULT);
        assert_eq!(store.get_plant(plant.id()), Some(&plant));
        assert!(!plant.is_selected());
    }

    #[test]
    fn list_keeps_insertion_order() {
        let mut store = PlantStore::new();
        for name in ["a", "b", "c", "d"] {
            store.add_plant(Plant::new(
                PlantId::new(name),
                name,
                PlantPosition::ORIGIN,
                PlantColor::DEFAULT,
            ));
        }
        store.remove_plant(&PlantId::new("b"));
        store.add_plant(Plant::new(
            PlantId::new("a"),
            "renamed",
            PlantPosition::ORIGIN,
            PlantColor::DEFAULT,
        ));

        let names: Vec<_> = store.plant_list().map(|p| p.name().to_string()).collect();
        assert_eq!(names, ["renamed", "c", "d"]);
    }

    #[test]
    fn select_is_exclusive() {
        let (mut store, a, b) = two_plants();
        store.select_plant(&a);
        store.select_plant(&b);
        assert_eq!(selected_ids(&store), vec![b]);
    }

    #[test]
    fn select_unknown_clears_selection() {
        let (mut store, a, _) = two_plants();
        store.select_plant(&a);
        store.select_plant(&PlantId::new("missing"));
        assert!(store.selected_plants().is_empty());
        assert!(store.selected_plant().is_none());
    }

    #[test]
    fn toggle_moves_selection_to_target() {
        let (mut store, a, b) = two_plants();
        store.select_plant(&a);
        store.toggle_plant_selection(&b);
        assert_eq!(selected_ids(&store), vec![b.clone()]);

        store.toggle_plant_selection(&b);
        assert!(store.selected_plants().is_empty());
    }

    #[test]
    fn toggle_unknown_is_noop() {
        let (mut store, a, _) = two_plants();
        store.select_plant(&a);
        let before = store.revision();
        store.toggle_plant_selection(&PlantId::new("missing"));
        assert_eq!(selected_ids(&store), vec![a]);
        assert_eq!(store.revision(), before);
    }

    #[test]
    fn deselect_all_clears_moving() {
        let (mut store, a, _) = two_plants();
        store.select_plant(&a);
        store.set_plant_moving(&a, true);
        store.deselect_all();

        let plant = store.get_plant(&a).unwrap();
        assert!(!plant.is_selected());
        assert!(!plant.is_moving());
    }

    #[test]
    fn update_position_changes_one_axis() {
        let mut store = PlantStore::new();
        let id = store
            .create_plant("P", PlantPosition::new(1.0, 2.0, 3.0), None)
            .id()
            .clone();

        assert!(store.update_plant_position(&id, PositionPatch::x(5.0)));
        assert_eq!(
            store.get_plant(&id).unwrap().position(),
            PlantPosition::new(5.0, 2.0, 3.0)
        );
        assert!(!store.update_plant_position(&PlantId::new("missing"), PositionPatch::x(1.0)));
    }

    #[test]
    fn revision_ignores_reads_and_noops() {
        let (mut store, a, _) = two_plants();
        let before = store.revision();

        let _ = store.plant_list().count();
        let _ = store.selected_plant();
        store.deselect_all();
        store.update_plant_position(&a, PositionPatch::x(0.0));
        store.remove_plant(&PlantId::new("missing"));

        assert_eq!(store.revision(), before);
    }

    #[test]
    fn remove_returns_the_plant() {
        let (mut store, a, b) = two_plants();
        let removed = store.remove_plant(&a).unwrap();
        assert_eq!(removed.id(), &a);
        assert_eq!(store.ids().cloned().collect::<Vec<_>>(), vec![b]);
        assert_eq!(store.len(), 1);
    }
}

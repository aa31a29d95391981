//! Connectivity of occupied cells and removal of stacks cut off from every Source

use crate::board::{Board, Hex, DIRECTIONS, NUM_CELLS};

impl Board {
    /// Playable cells adjacent to `hex`, in direction order
    pub fn neighbors(&self, hex: Hex) -> impl Iterator<Item = Hex> {
        (0..DIRECTIONS.len())
            .map(move |dir| hex.neighbor(dir))
            .filter(Hex::is_valid)
    }

    /// True if all six neighbors are on the board and occupied.
    /// A surrounded stack cannot move.
    pub fn is_surrounded(&self, hex: Hex) -> bool {
        (0..DIRECTIONS.len()).all(|dir| self.is_occupied(hex.neighbor(dir)))
    }

    /// Maximal set of occupied cells connected to `start`, in index order.
    /// Empty if `start` itself is empty.
    pub fn component(&self, start: Hex) -> Vec<Hex> {
        let mut visited = [false; NUM_CELLS];
        self.collect_component(start, &mut visited)
    }

    /// Partition all occupied cells into components
    pub fn all_components(&self) -> Vec<Vec<Hex>> {
        let mut visited = [false; NUM_CELLS];
        let mut components = Vec::new();
        for (hex, _) in self.stacks() {
            let Some(idx) = hex.index() else { continue };
            if !visited[idx] {
                components.push(self.collect_component(hex, &mut visited));
            }
        }
        components
    }

    fn collect_component(&self, start: Hex, visited: &mut [bool; NUM_CELLS]) -> Vec<Hex> {
        let Some(start_idx) = start.index() else {
            return Vec::new();
        };
        if !self.is_occupied(start) || visited[start_idx] {
            return Vec::new();
        }

        visited[start_idx] = true;
        let mut component = Vec::new();
        let mut frontier = vec![start];

        while let Some(hex) = frontier.pop() {
            component.push(hex);
            for next in self.neighbors(hex) {
                let Some(idx) = next.index() else { continue };
                if !visited[idx] && self.is_occupied(next) {
                    visited[idx] = true;
                    frontier.push(next);
                }
            }
        }

        component.sort_by_key(|hex| hex.index());
        component
    }

    /// Discard every component without a Source piece.
    /// Returns the number of pieces discarded.
    pub fn cleanup(&mut self) -> usize {
        let before = self.discarded_pieces();
        for component in self.all_components() {
            let has_source = component
                .iter()
                .any(|&hex| self.get(hex).is_some_and(|stack| stack.contains_source()));
            if !has_source {
                self.discard_cells(&component);
            }
        }
        self.discarded_pieces() - before
    }
}

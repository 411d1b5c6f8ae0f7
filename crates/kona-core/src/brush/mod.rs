//! Interactive brush: outline, selection, painting, flood fill, undo
//!
//! The brush owns no cells. Every operation takes `&mut Grid` and goes
//! through the grid's bounds-checked setters, so a brush hanging over
//! the grid edge simply paints the part that is in bounds.

mod shape;

use ahash::AHashSet;
use glam::IVec2;
use kona_simulation::{ParticleKind, ParticleState};
use std::collections::VecDeque;
use std::f32::consts::PI;
use thiserror::Error;

use crate::grid::Grid;

pub const MIN_BRUSH_RADIUS: i32 = 0;
pub const MAX_BRUSH_RADIUS: i32 = 64;
/// Rotation applied per scroll notch when resizing is shift-modified
pub const ROTATION_STEP: f32 = PI / 24.0;

const NEIGHBORS_4: [IVec2; 4] = [
    IVec2::new(1, 0),
    IVec2::new(-1, 0),
    IVec2::new(0, 1),
    IVec2::new(0, -1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushShape {
    Circle,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushKey {
    Undo,
    Fill,
    ToggleShape,
}

bitflags::bitflags! {
    /// Keyboard modifiers held during a pointer or key event
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ModifierFlags: u8 {
        const SHIFT = 1 << 0;
    }
}

#[derive(Debug, Error)]
pub enum UndoError {
    /// The restored snapshot was taken against a differently sized grid
    #[error("undo snapshot covers {found} cells, grid has {expected}")]
    SnapshotMismatch { expected: usize, found: usize },
}

pub struct Brush {
    shape: BrushShape,
    radius: i32,
    rotation: f32,
    position: IVec2,
    primary_kind: ParticleKind,
    secondary_kind: ParticleKind,
    outline: AHashSet<IVec2>,
    selection: Vec<IVec2>,
    painting: bool,
    secondary_held: bool,
    undo_stack: Vec<Vec<ParticleState>>,
}

impl Brush {
    pub fn new(
        grid: &mut Grid,
        shape: BrushShape,
        radius: i32,
        primary_kind: ParticleKind,
        secondary_kind: ParticleKind,
    ) -> Self {
        let mut brush = Self {
            shape,
            radius: radius.clamp(MIN_BRUSH_RADIUS, MAX_BRUSH_RADIUS),
            rotation: 0.0,
            position: IVec2::new(grid.width() / 2, grid.height() / 2),
            primary_kind,
            secondary_kind,
            outline: AHashSet::new(),
            selection: Vec::new(),
            painting: false,
            secondary_held: false,
            undo_stack: Vec::new(),
        };
        brush.rebuild(grid);
        brush
    }

    pub fn shape(&self) -> BrushShape {
        self.shape
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn position(&self) -> IVec2 {
        self.position
    }

    pub fn primary_kind(&self) -> ParticleKind {
        self.primary_kind
    }

    pub fn secondary_kind(&self) -> ParticleKind {
        self.secondary_kind
    }

    pub fn is_painting(&self) -> bool {
        self.painting
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn set_primary_kind(&mut self, kind: ParticleKind) {
        self.primary_kind = kind;
    }

    pub fn set_secondary_kind(&mut self, kind: ParticleKind) {
        self.secondary_kind = kind;
    }

    pub fn set_shape(&mut self, grid: &mut Grid, shape: BrushShape) {
        if self.shape != shape {
            self.shape = shape;
            self.rebuild(grid);
        }
    }

    pub fn set_radius(&mut self, grid: &mut Grid, radius: i32) {
        let radius = radius.clamp(MIN_BRUSH_RADIUS, MAX_BRUSH_RADIUS);
        if self.radius != radius {
            self.radius = radius;
            self.rebuild(grid);
        }
    }

    /// Rotation only affects the square shape; the circle ignores it
    pub fn set_rotation(&mut self, grid: &mut Grid, rotation: f32) {
        if self.rotation != rotation {
            self.rotation = rotation;
            if self.shape == BrushShape::Square {
                self.rebuild(grid);
            }
        }
    }

    pub fn set_position(&mut self, grid: &mut Grid, position: IVec2) {
        if self.position != position {
            self.position = position;
            self.rebuild(grid);
        }
    }

    /// Recompute outline and selection and republish both as cell flags,
    /// clearing the previous footprint first
    fn rebuild(&mut self, grid: &mut Grid) {
        for point in self.outline.drain() {
            grid.set_brush_outline(point.x, point.y, false);
        }
        for point in self.selection.drain(..) {
            grid.set_brush_selected(point.x, point.y, false);
        }

        self.outline = match self.shape {
            BrushShape::Circle => shape::circle_outline(self.position, self.radius),
            BrushShape::Square => {
                shape::square_outline(self.position, self.radius, self.rotation)
            }
        };
        self.selection = self.select_fill(grid);

        for point in &self.outline {
            grid.set_brush_outline(point.x, point.y, true);
        }
        for point in &self.selection {
            grid.set_brush_selected(point.x, point.y, true);
        }
    }

    /// In-bounds cells enclosed by the outline, found by flooding
    /// outward from the brush center and stopping at outline cells
    fn select_fill(&self, grid: &Grid) -> Vec<IVec2> {
        if self.outline.contains(&self.position) {
            return vec![self.position];
        }

        let mut selection = Vec::new();
        let mut visited = AHashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(self.position);
        queue.push_back(self.position);

        while let Some(point) = queue.pop_front() {
            selection.push(point);
            for offset in NEIGHBORS_4 {
                let next = point + offset;
                if visited.contains(&next) || self.outline.contains(&next) {
                    continue;
                }
                if grid.get_cell(next.x, next.y).is_none() {
                    continue;
                }
                visited.insert(next);
                queue.push_back(next);
            }
        }
        selection
    }

    /// Overwrite every selected cell with the primary material
    pub fn paint(&self, grid: &mut Grid) {
        for point in &self.selection {
            grid.set_kind(point.x, point.y, self.primary_kind);
        }
    }

    /// Per-frame hook: keeps painting while the primary button is held
    pub fn update(&self, grid: &mut Grid) {
        if self.painting {
            self.paint(grid);
        }
    }

    /// Replace the connected same-kind region under `at` with the
    /// primary material. Filling a region that already is the primary
    /// material is a no-op, which also rules out unbounded re-expansion.
    pub fn flood_fill(&self, grid: &mut Grid, at: IVec2) {
        let Some(cell) = grid.get_cell(at.x, at.y) else {
            return;
        };
        let original = cell.particle_state().kind;
        if original == self.primary_kind {
            return;
        }

        let mut visited = AHashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(at);
        queue.push_back(at);

        while let Some(point) = queue.pop_front() {
            grid.set_kind(point.x, point.y, self.primary_kind);
            for offset in NEIGHBORS_4 {
                let next = point + offset;
                if visited.contains(&next) {
                    continue;
                }
                let Some(cell) = grid.get_cell(next.x, next.y) else {
                    continue;
                };
                if cell.particle_state().kind != original {
                    continue;
                }
                visited.insert(next);
                queue.push_back(next);
            }
        }
    }

    /// Snapshot the whole grid onto the undo stack
    pub fn push_state(&mut self, grid: &Grid) {
        self.undo_stack.push(grid.snapshot_states());
    }

    /// Restore the most recent snapshot. An empty stack is a silent
    /// no-op; a snapshot taken against a different grid size is
    /// discarded and reported.
    pub fn undo(&mut self, grid: &mut Grid) -> Result<(), UndoError> {
        let Some(snapshot) = self.undo_stack.pop() else {
            return Ok(());
        };
        if snapshot.len() != grid.cell_count() {
            log::warn!(
                "discarding undo snapshot of {} cells for a {}-cell grid",
                snapshot.len(),
                grid.cell_count()
            );
            return Err(UndoError::SnapshotMismatch {
                expected: grid.cell_count(),
                found: snapshot.len(),
            });
        }
        grid.restore_states(&snapshot);
        Ok(())
    }

    pub fn on_pointer_down(&mut self, grid: &mut Grid, button: PointerButton) {
        match button {
            PointerButton::Primary => {
                self.push_state(grid);
                self.painting = true;
                self.paint(grid);
            }
            PointerButton::Secondary => {
                if !self.secondary_held {
                    self.secondary_held = true;
                    std::mem::swap(&mut self.primary_kind, &mut self.secondary_kind);
                }
            }
        }
    }

    pub fn on_pointer_up(&mut self, _grid: &mut Grid, button: PointerButton) {
        match button {
            PointerButton::Primary => self.painting = false,
            PointerButton::Secondary => {
                if self.secondary_held {
                    self.secondary_held = false;
                    std::mem::swap(&mut self.primary_kind, &mut self.secondary_kind);
                }
            }
        }
    }

    pub fn on_pointer_move(&mut self, grid: &mut Grid, position: IVec2) {
        self.set_position(grid, position);
        if self.painting {
            self.paint(grid);
        }
    }

    /// Scroll resizes the brush; with shift held, a square brush rotates
    /// instead
    pub fn on_scroll(&mut self, grid: &mut Grid, amount: f32, modifiers: ModifierFlags) {
        if modifiers.contains(ModifierFlags::SHIFT) && self.shape == BrushShape::Square {
            self.set_rotation(grid, self.rotation + amount * ROTATION_STEP);
        } else {
            self.set_radius(grid, self.radius + amount.round() as i32);
        }
    }

    pub fn on_key(&mut self, grid: &mut Grid, key: BrushKey, _modifiers: ModifierFlags) {
        match key {
            BrushKey::Undo => {
                // A stale snapshot is already logged and dropped
                let _ = self.undo(grid);
            }
            BrushKey::Fill => {
                self.push_state(grid);
                self.flood_fill(grid, self.position);
            }
            BrushKey::ToggleShape => {
                let toggled = match self.shape {
                    BrushShape::Circle => BrushShape::Square,
                    BrushShape::Square => BrushShape::Circle,
                };
                self.set_shape(grid, toggled);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kona_simulation::MaterialCatalog;

    fn grid(width: i32, height: i32) -> Grid {
        Grid::new(width, height, MaterialCatalog::with_defaults()).unwrap()
    }

    fn brush(grid: &mut Grid, shape: BrushShape, radius: i32) -> Brush {
        Brush::new(grid, shape, radius, ParticleKind::Sand, ParticleKind::Water)
    }

    fn kind_at(grid: &Grid, x: i32, y: i32) -> ParticleKind {
        grid.get_cell(x, y).unwrap().particle_state().kind
    }

    #[test]
    fn test_radius_zero_selects_only_the_center() {
        let mut grid = grid(9, 9);
        let brush = brush(&mut grid, BrushShape::Circle, 0);
        assert_eq!(brush.selection, vec![brush.position()]);
        assert!(grid.get_cell(4, 4).unwrap().is_brush_outline());
        assert!(grid.get_cell(4, 4).unwrap().is_brush_selected());
    }

    #[test]
    fn test_selection_stays_inside_the_outline() {
        let mut grid = grid(21, 21);
        let brush = brush(&mut grid, BrushShape::Circle, 4);
        for point in &brush.selection {
            assert!(!brush.outline.contains(point), "{point:?} on the outline");
            let distance = (*point - brush.position()).as_vec2().length();
            assert!(distance < 4.5, "{point:?} outside the circle");
        }
        // Interior of a radius-4 circle is substantial
        assert!(brush.selection.len() > 20);
    }

    #[test]
    fn test_selection_flags_follow_the_brush() {
        let mut grid = grid(21, 21);
        let mut brush = brush(&mut grid, BrushShape::Circle, 2);
        assert!(grid.get_cell(10, 10).unwrap().is_brush_selected());

        brush.on_pointer_move(&mut grid, IVec2::new(4, 4));
        assert!(!grid.get_cell(10, 10).unwrap().is_brush_selected());
        assert!(grid.get_cell(4, 4).unwrap().is_brush_selected());
    }

    #[test]
    fn test_larger_radius_selects_more_cells() {
        let mut grid = grid(41, 41);
        let mut brush = brush(&mut grid, BrushShape::Circle, 1);
        let mut previous = brush.selection.len();
        for radius in 2..10 {
            brush.set_radius(&mut grid, radius);
            assert!(brush.selection.len() > previous);
            previous = brush.selection.len();
        }
    }

    #[test]
    fn test_radius_is_clamped() {
        let mut grid = grid(9, 9);
        let mut brush = brush(&mut grid, BrushShape::Circle, 3);
        brush.set_radius(&mut grid, 10_000);
        assert_eq!(brush.radius(), MAX_BRUSH_RADIUS);
        brush.set_radius(&mut grid, -5);
        assert_eq!(brush.radius(), MIN_BRUSH_RADIUS);
    }

    #[test]
    fn test_pointer_down_paints_the_selection() {
        let mut grid = grid(15, 15);
        let mut brush = brush(&mut grid, BrushShape::Circle, 2);
        brush.on_pointer_down(&mut grid, PointerButton::Primary);

        assert!(brush.is_painting());
        assert_eq!(kind_at(&grid, 7, 7), ParticleKind::Sand);
        for point in &brush.selection {
            assert_eq!(kind_at(&grid, point.x, point.y), ParticleKind::Sand);
        }
    }

    #[test]
    fn test_drag_paints_along_the_path() {
        let mut grid = grid(15, 15);
        let mut brush = brush(&mut grid, BrushShape::Circle, 0);
        brush.on_pointer_down(&mut grid, PointerButton::Primary);
        brush.on_pointer_move(&mut grid, IVec2::new(2, 2));
        brush.on_pointer_move(&mut grid, IVec2::new(2, 3));
        brush.on_pointer_up(&mut grid, PointerButton::Primary);
        brush.on_pointer_move(&mut grid, IVec2::new(2, 4));

        assert_eq!(kind_at(&grid, 7, 7), ParticleKind::Sand);
        assert_eq!(kind_at(&grid, 2, 2), ParticleKind::Sand);
        assert_eq!(kind_at(&grid, 2, 3), ParticleKind::Sand);
        assert_eq!(kind_at(&grid, 2, 4), ParticleKind::Air, "released");
    }

    #[test]
    fn test_brush_overhanging_the_edge_paints_in_bounds_only() {
        let mut grid = grid(9, 9);
        let mut brush = brush(&mut grid, BrushShape::Circle, 2);
        brush.on_pointer_move(&mut grid, IVec2::new(0, 0));
        brush.on_pointer_down(&mut grid, PointerButton::Primary);
        assert_eq!(kind_at(&grid, 0, 0), ParticleKind::Sand);
        assert_eq!(kind_at(&grid, 1, 0), ParticleKind::Sand);
    }

    #[test]
    fn test_flood_fill_respects_region_boundary() {
        let mut grid = grid(5, 5);
        // Stone wall down column 2, with one hole at (2, 2)
        for y in 0..5 {
            grid.set_kind(2, y, ParticleKind::Stone);
        }
        grid.set_kind(2, 2, ParticleKind::Air);

        let brush = brush(&mut grid, BrushShape::Circle, 0);
        brush.flood_fill(&mut grid, IVec2::new(0, 0));

        // The hole connects both halves, so all air becomes sand
        for y in 0..5 {
            for x in 0..5 {
                let expected = if x == 2 && y != 2 {
                    ParticleKind::Stone
                } else {
                    ParticleKind::Sand
                };
                assert_eq!(kind_at(&grid, x, y), expected, "at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_flood_fill_sealed_region_stays_sealed() {
        let mut grid = grid(5, 5);
        for y in 0..5 {
            grid.set_kind(2, y, ParticleKind::Stone);
        }
        let brush = brush(&mut grid, BrushShape::Circle, 0);
        brush.flood_fill(&mut grid, IVec2::new(0, 0));

        assert_eq!(kind_at(&grid, 1, 1), ParticleKind::Sand);
        assert_eq!(kind_at(&grid, 3, 1), ParticleKind::Air, "behind the wall");
    }

    #[test]
    fn test_flood_fill_into_own_kind_is_a_noop() {
        let mut grid = grid(4, 4);
        let brush = brush(&mut grid, BrushShape::Circle, 0);
        grid.set_kind(0, 0, ParticleKind::Sand);
        grid.dirty_cells();

        brush.flood_fill(&mut grid, IVec2::new(0, 0));
        assert!(grid.dirty_cells().is_empty());
    }

    #[test]
    fn test_undo_restores_the_snapshot() {
        let mut grid = grid(9, 9);
        let mut brush = brush(&mut grid, BrushShape::Circle, 2);
        brush.on_pointer_down(&mut grid, PointerButton::Primary);
        brush.on_pointer_up(&mut grid, PointerButton::Primary);
        assert_eq!(kind_at(&grid, 4, 4), ParticleKind::Sand);

        brush.on_key(&mut grid, BrushKey::Undo, ModifierFlags::empty());
        assert_eq!(kind_at(&grid, 4, 4), ParticleKind::Air);
        assert_eq!(brush.undo_depth(), 0);
    }

    #[test]
    fn test_undo_on_empty_stack_is_ok() {
        let mut grid = grid(4, 4);
        let mut brush = brush(&mut grid, BrushShape::Circle, 1);
        assert!(brush.undo(&mut grid).is_ok());
    }

    #[test]
    fn test_undo_rejects_mismatched_snapshot() {
        let mut small = grid(3, 3);
        let mut brush = brush(&mut small, BrushShape::Circle, 1);
        brush.push_state(&small);

        let mut large = grid(4, 4);
        let result = brush.undo(&mut large);
        assert!(matches!(
            result,
            Err(UndoError::SnapshotMismatch { expected: 16, found: 9 })
        ));
        assert_eq!(brush.undo_depth(), 0, "stale snapshot discarded");
    }

    #[test]
    fn test_fill_key_is_undoable() {
        let mut grid = grid(6, 6);
        let mut brush = brush(&mut grid, BrushShape::Circle, 1);
        brush.on_key(&mut grid, BrushKey::Fill, ModifierFlags::empty());
        assert_eq!(kind_at(&grid, 0, 0), ParticleKind::Sand);

        brush.on_key(&mut grid, BrushKey::Undo, ModifierFlags::empty());
        assert_eq!(kind_at(&grid, 0, 0), ParticleKind::Air);
    }

    #[test]
    fn test_secondary_button_swaps_materials_while_held() {
        let mut grid = grid(9, 9);
        let mut brush = brush(&mut grid, BrushShape::Circle, 0);

        brush.on_pointer_down(&mut grid, PointerButton::Secondary);
        assert_eq!(brush.primary_kind(), ParticleKind::Water);
        brush.on_pointer_down(&mut grid, PointerButton::Primary);
        assert_eq!(kind_at(&grid, 4, 4), ParticleKind::Water);
        brush.on_pointer_up(&mut grid, PointerButton::Primary);

        brush.on_pointer_up(&mut grid, PointerButton::Secondary);
        assert_eq!(brush.primary_kind(), ParticleKind::Sand);
        assert_eq!(brush.secondary_kind(), ParticleKind::Water);
    }

    #[test]
    fn test_scroll_resizes_and_shift_scroll_rotates_square() {
        let mut grid = grid(31, 31);
        let mut brush = brush(&mut grid, BrushShape::Square, 3);

        brush.on_scroll(&mut grid, 2.0, ModifierFlags::empty());
        assert_eq!(brush.radius(), 5);

        brush.on_scroll(&mut grid, 1.0, ModifierFlags::SHIFT);
        assert_eq!(brush.radius(), 5, "shift-scroll leaves the radius alone");
        assert!((brush.rotation() - ROTATION_STEP).abs() < 1e-6);
    }

    #[test]
    fn test_shift_scroll_on_circle_resizes() {
        let mut grid = grid(31, 31);
        let mut brush = brush(&mut grid, BrushShape::Circle, 3);
        brush.on_scroll(&mut grid, 1.0, ModifierFlags::SHIFT);
        assert_eq!(brush.radius(), 4);
        assert_eq!(brush.rotation(), 0.0);
    }

    #[test]
    fn test_toggle_shape_key() {
        let mut grid = grid(21, 21);
        let mut brush = brush(&mut grid, BrushShape::Circle, 3);
        brush.on_key(&mut grid, BrushKey::ToggleShape, ModifierFlags::empty());
        assert_eq!(brush.shape(), BrushShape::Square);
        brush.on_key(&mut grid, BrushKey::ToggleShape, ModifierFlags::empty());
        assert_eq!(brush.shape(), BrushShape::Circle);
    }

    #[test]
    fn test_redundant_setters_leave_no_dirt() {
        let mut grid = grid(21, 21);
        let mut brush = brush(&mut grid, BrushShape::Circle, 3);
        grid.dirty_cells();

        brush.set_radius(&mut grid, 3);
        brush.set_position(&mut grid, brush.position());
        brush.set_shape(&mut grid, BrushShape::Circle);
        assert!(grid.dirty_cells().is_empty());
    }
}

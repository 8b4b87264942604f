//! Terrain contract and a grid-backed reference terrain
//!
//! The ball only ever talks to terrain through [`Terrain`]: material lookup,
//! surface normals, a circle overlap test and destructive cell removal.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::{EventBus, GameEvent};

/// Physical behaviour of a terrain cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Material {
    #[default]
    Normal,
    Bouncy,
    Slow,
    Sticky,
    /// Breakable when hit hard enough (doors)
    Thin,
    /// Water: sends the ball back to its last rest position
    Kill,
}

impl Material {
    /// Level glyph for this material
    pub fn glyph(self) -> char {
        match self {
            Material::Normal => '#',
            Material::Bouncy => 'B',
            Material::Slow => 'S',
            Material::Sticky => 'G',
            Material::Thin => 'D',
            Material::Kill => '~',
        }
    }

    pub fn from_glyph(c: char) -> Option<Self> {
        match c {
            '#' => Some(Material::Normal),
            'B' => Some(Material::Bouncy),
            'S' => Some(Material::Slow),
            'G' => Some(Material::Sticky),
            'D' => Some(Material::Thin),
            '~' => Some(Material::Kill),
            _ => None,
        }
    }

    /// Whether the ball collides with this material (water is entered, not hit)
    pub fn is_solid(self) -> bool {
        self != Material::Kill
    }
}

/// Result of a circle/terrain overlap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Point on the terrain surface that was touched
    pub point: Vec2,
    /// Circle centre moved out of the terrain
    pub corrected: Vec2,
}

/// What a ball needs from the terrain
pub trait Terrain {
    /// Material at `point`, `None` for empty space
    fn material_at(&self, point: Vec2) -> Option<Material>;

    /// Unit surface normal near `contact`, pointing out of the terrain
    fn normal_at(&self, contact: Vec2) -> Vec2;

    /// Overlap test for a moving circle
    fn intersects_circle(&self, position: Vec2, velocity: Vec2, radius: f32) -> Option<Contact>;

    /// Destroy the cell at `point` (and whatever it is part of)
    fn remove_cell_at(&mut self, point: Vec2);
}

/// Square-cell terrain, authored from ASCII rows
#[derive(Debug, Clone)]
pub struct GridTerrain {
    width: usize,
    height: usize,
    cell_size: f32,
    /// World position of the top-left corner
    origin: Vec2,
    cells: Vec<Option<Material>>,
    bus: Option<EventBus>,
}

impl GridTerrain {
    pub fn new(width: usize, height: usize, cell_size: f32) -> Self {
        Self {
            width,
            height,
            cell_size,
            origin: Vec2::ZERO,
            cells: vec![None; width * height],
            bus: None,
        }
    }

    /// Parse a level; unknown glyphs are empty space. Rows may differ in length.
    pub fn from_ascii(rows: &str, cell_size: f32) -> Self {
        let lines: Vec<&str> = rows.lines().filter(|l| !l.trim().is_empty()).collect();
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let mut terrain = Self::new(width, lines.len(), cell_size);
        for (y, line) in lines.iter().enumerate() {
            for (x, c) in line.chars().enumerate() {
                terrain.set(x, y, Material::from_glyph(c));
            }
        }
        terrain
    }

    /// Raise [`GameEvent::TerrainChanged`] on `bus` whenever cells are removed
    pub fn with_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn set(&mut self, x: usize, y: usize, material: Option<Material>) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = material;
        }
    }

    pub fn get(&self, x: i64, y: i64) -> Option<Material> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        self.cells[y as usize * self.width + x as usize]
    }

    /// Number of cells of the given material
    pub fn count(&self, material: Material) -> usize {
        self.cells.iter().filter(|c| **c == Some(material)).count()
    }

    /// World centre of cell (x, y)
    pub fn cell_center(&self, x: i64, y: i64) -> Vec2 {
        self.origin + (Vec2::new(x as f32, y as f32) + 0.5) * self.cell_size
    }

    fn cell_coords(&self, point: Vec2) -> (i64, i64) {
        let local = (point - self.origin) / self.cell_size;
        (local.x.floor() as i64, local.y.floor() as i64)
    }

    fn is_solid(&self, x: i64, y: i64) -> bool {
        self.get(x, y).is_some_and(Material::is_solid)
    }

    /// Smoothed solid density around `p` (cone kernel over nearby cell centres)
    fn density(&self, p: Vec2) -> f32 {
        let reach = self.cell_size * 2.0;
        let (cx, cy) = self.cell_coords(p);
        let mut total = 0.0;
        for y in cy - 3..=cy + 3 {
            for x in cx - 3..=cx + 3 {
                if self.is_solid(x, y) {
                    let d = (self.cell_center(x, y) - p).length();
                    total += (reach - d).max(0.0);
                }
            }
        }
        total
    }
}

impl Terrain for GridTerrain {
    fn material_at(&self, point: Vec2) -> Option<Material> {
        let (x, y) = self.cell_coords(point);
        self.get(x, y)
    }

    fn normal_at(&self, contact: Vec2) -> Vec2 {
        // Central differences on the density field; normal points toward emptiness
        let eps = self.cell_size * 0.5;
        let dx = self.density(contact + Vec2::new(eps, 0.0))
            - self.density(contact - Vec2::new(eps, 0.0));
        let dy = self.density(contact + Vec2::new(0.0, eps))
            - self.density(contact - Vec2::new(0.0, eps));
        let normal = -Vec2::new(dx, dy).normalize_or_zero();
        if normal == Vec2::ZERO {
            Vec2::NEG_Y
        } else {
            normal
        }
    }

    fn intersects_circle(&self, position: Vec2, velocity: Vec2, radius: f32) -> Option<Contact> {
        let (x0, y0) = self.cell_coords(position - Vec2::splat(radius));
        let (x1, y1) = self.cell_coords(position + Vec2::splat(radius));

        // Deepest overlapping solid cell wins
        let mut best: Option<(f32, Vec2, Vec2, Vec2)> = None;
        for y in y0..=y1 {
            for x in x0..=x1 {
                if !self.is_solid(x, y) {
                    continue;
                }
                let min = self.origin + Vec2::new(x as f32, y as f32) * self.cell_size;
                let max = min + Vec2::splat(self.cell_size);
                let closest = position.clamp(min, max);
                let dist = (position - closest).length();
                if dist < radius && best.is_none_or(|(d, ..)| dist < d) {
                    best = Some((dist, closest, min, max));
                }
            }
        }

        let (dist, closest, cell_min, cell_max) = best?;
        let corrected = if dist > 1e-4 {
            closest + (position - closest) / dist * radius
        } else if velocity != Vec2::ZERO {
            // Centre is inside the cell: back out along the path we came in on
            position - velocity
        } else {
            Vec2::new(position.x, cell_min.y - radius)
        };

        // Far faces belong to the neighbouring cell; keep the point inside this one
        let inset = Vec2::splat(self.cell_size * 1e-4);
        Some(Contact {
            point: closest.clamp(cell_min + inset, cell_max - inset),
            corrected,
        })
    }

    fn remove_cell_at(&mut self, point: Vec2) {
        let (sx, sy) = self.cell_coords(point);
        let Some(material) = self.get(sx, sy) else {
            return;
        };

        // Flood fill the connected region of this material
        let mut removed = 0usize;
        let mut queue = VecDeque::from([(sx, sy)]);
        while let Some((x, y)) = queue.pop_front() {
            if self.get(x, y) != Some(material) {
                continue;
            }
            self.set(x as usize, y as usize, None);
            removed += 1;
            queue.extend([(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)]);
        }

        log::debug!("removed {} {:?} cells at {:?}", removed, material, point);
        if let Some(bus) = &self.bus {
            bus.notify(&GameEvent::TerrainChanged);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::EventLog;

    const LEVEL: &str = "
..........
..........
....DD....
....DD....
~~~~######
##########
";

    fn level() -> GridTerrain {
        GridTerrain::from_ascii(LEVEL, 16.0)
    }

    #[test]
    fn test_parse_dimensions_and_materials() {
        let t = level();
        assert_eq!(t.width(), 10);
        assert_eq!(t.height(), 6);
        assert_eq!(t.count(Material::Thin), 4);
        assert_eq!(t.count(Material::Kill), 4);
        assert_eq!(t.material_at(Vec2::new(8.0, 8.0)), None);
        assert_eq!(t.material_at(Vec2::new(8.0, 72.0)), Some(Material::Kill));
        assert_eq!(t.material_at(Vec2::new(100.0, 72.0)), Some(Material::Normal));
        assert_eq!(t.material_at(Vec2::new(-5.0, 0.0)), None);
    }

    #[test]
    fn test_glyph_roundtrip() {
        for m in [
            Material::Normal,
            Material::Bouncy,
            Material::Slow,
            Material::Sticky,
            Material::Thin,
            Material::Kill,
        ] {
            assert_eq!(Material::from_glyph(m.glyph()), Some(m));
        }
        assert_eq!(Material::from_glyph('.'), None);
    }

    #[test]
    fn test_floor_normal_points_up() {
        let t = level();
        // Top face of the solid floor row (y = 4 * 16)
        let n = t.normal_at(Vec2::new(130.0, 64.0));
        assert!(n.y < -0.9, "normal {:?}", n);
        assert!((n.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_circle_resting_on_floor() {
        let t = level();
        // Ball centre 5 units above the floor, radius 8
        let hit = t
            .intersects_circle(Vec2::new(130.0, 59.0), Vec2::new(0.0, 2.0), 8.0)
            .expect("should touch the floor");
        assert!((hit.point.y - 64.0).abs() < 1e-2);
        assert_eq!(t.material_at(hit.point), Some(Material::Normal));
        assert!((hit.corrected.y - 56.0).abs() < 1e-4);
    }

    #[test]
    fn test_contact_on_far_face_stays_in_cell() {
        let t = level();
        // Right of the door (cells x=4..5), its right face at x = 96
        let hit = t
            .intersects_circle(Vec2::new(100.0, 40.0), Vec2::new(-3.0, 0.0), 8.0)
            .expect("should touch the door");
        assert!(hit.point.x < 96.0);
        assert_eq!(t.material_at(hit.point), Some(Material::Thin));
        assert!((hit.corrected.x - 104.0).abs() < 1e-2);
    }

    #[test]
    fn test_offset_origin_shifts_lookups() {
        let t = level().with_origin(Vec2::new(100.0, 50.0));
        assert_eq!(t.cell_size(), 16.0);
        assert_eq!(t.cell_center(0, 0), Vec2::new(108.0, 58.0));
        // Same local point as the unshifted water/floor probes
        assert_eq!(t.material_at(Vec2::new(108.0, 122.0)), Some(Material::Kill));
        assert_eq!(t.material_at(Vec2::new(8.0, 72.0)), None);

        // Floor top now at y = 50 + 64
        let hit = t
            .intersects_circle(Vec2::new(230.0, 109.0), Vec2::new(0.0, 2.0), 8.0)
            .expect("should touch the shifted floor");
        assert!((hit.corrected.y - 106.0).abs() < 1e-3);
        assert_eq!(t.material_at(hit.point), Some(Material::Normal));
    }

    #[test]
    fn test_circle_miss_in_open_air() {
        let t = level();
        assert!(t
            .intersects_circle(Vec2::new(20.0, 20.0), Vec2::ZERO, 8.0)
            .is_none());
    }

    #[test]
    fn test_water_is_not_solid() {
        let t = level();
        assert!(t
            .intersects_circle(Vec2::new(24.0, 72.0), Vec2::ZERO, 4.0)
            .is_none());
    }

    #[test]
    fn test_remove_floods_whole_door_and_notifies() {
        let bus = EventBus::new();
        let log = EventLog::attach(&bus);
        let mut t = level().with_bus(bus);

        t.remove_cell_at(Vec2::new(70.0, 40.0));
        assert_eq!(t.count(Material::Thin), 0);
        assert_eq!(t.count(Material::Normal), 16);
        assert_eq!(log.borrow().events, vec![GameEvent::TerrainChanged]);

        // Empty space: nothing to remove, nothing raised
        t.remove_cell_at(Vec2::new(8.0, 8.0));
        assert_eq!(log.borrow().events.len(), 1);
    }
}

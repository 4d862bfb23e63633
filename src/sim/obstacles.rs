//! Procedural obstacle streaming
//!
//! The world is cut into square chunks. Obstacles are generated a chunk at a
//! time around the player and evicted once their chunk drifts outside the
//! keep radius, so the resident set stays bounded however far the player goes.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::geometry::{Rect, circle_intersects_rect, point_in_rect};
use crate::consts::*;
use crate::rand_range;

/// Chunk coordinates: floor(world / CHUNK_SIZE) on each axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkKey {
    pub cx: i32,
    pub cy: i32,
}

impl ChunkKey {
    pub fn new(cx: i32, cy: i32) -> Self {
        Self { cx, cy }
    }

    /// Chunk containing a world position
    pub fn containing(pos: Vec2) -> Self {
        Self {
            cx: (pos.x / CHUNK_SIZE).floor() as i32,
            cy: (pos.y / CHUNK_SIZE).floor() as i32,
        }
    }

    /// Chebyshev distance in chunks
    pub fn distance(&self, other: ChunkKey) -> i32 {
        (self.cx - other.cx).abs().max((self.cy - other.cy).abs())
    }

    /// Per-chunk seed so a chunk always regenerates the same layout
    fn seed(&self, world_seed: u64) -> u64 {
        (self.cx as i64 as u64)
            .wrapping_mul(2654435761)
            .wrapping_add((self.cy as i64 as u64).wrapping_mul(40503))
            .wrapping_add(world_seed)
    }
}

/// Cosmetic obstacle variety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Rock,
    Pillar,
    Ruin,
    Totem,
}

impl ObstacleKind {
    const ALL: [ObstacleKind; 4] = [
        ObstacleKind::Rock,
        ObstacleKind::Pillar,
        ObstacleKind::Ruin,
        ObstacleKind::Totem,
    ];
}

/// A solid rectangle in world space
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub rect: Rect,
    pub kind: ObstacleKind,
    pub chunk: ChunkKey,
}

/// Resident obstacles plus the bookkeeping needed to stream them
#[derive(Debug, Clone)]
pub struct ObstacleGrid {
    world_seed: u64,
    obstacles: Vec<Obstacle>,
    generated: FxHashSet<ChunkKey>,
    current: Option<ChunkKey>,
    streaming: bool,
}

impl ObstacleGrid {
    pub fn new(world_seed: u64) -> Self {
        Self {
            world_seed,
            obstacles: Vec::new(),
            generated: FxHashSet::default(),
            current: None,
            streaming: true,
        }
    }

    /// Grid that only holds hand-placed obstacles (scripted arenas, tests)
    pub fn fixed(world_seed: u64) -> Self {
        Self {
            streaming: false,
            ..Self::new(world_seed)
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn is_generated(&self, key: ChunkKey) -> bool {
        self.generated.contains(&key)
    }

    pub fn rects(&self) -> impl Iterator<Item = &Rect> + '_ {
        self.obstacles.iter().map(|o| &o.rect)
    }

    /// Place obstacles in a chunk; no-op if the chunk is already resident
    pub fn generate_chunk(&mut self, key: ChunkKey) {
        if self.is_generated(key) {
            return;
        }
        self.generated.insert(key);

        let mut rng = Pcg32::seed_from_u64(key.seed(self.world_seed));
        let origin = Vec2::new(key.cx as f32 * CHUNK_SIZE, key.cy as f32 * CHUNK_SIZE);
        let inner = CHUNK_SIZE - 2.0 * CHUNK_MARGIN;

        for _ in 0..OBSTACLES_PER_CHUNK {
            let w = rand_range(&mut rng, OBSTACLE_MIN_SIZE, OBSTACLE_MAX_SIZE);
            let h = rand_range(&mut rng, OBSTACLE_MIN_SIZE, OBSTACLE_MAX_SIZE);
            let x = origin.x + CHUNK_MARGIN + rand_range(&mut rng, 0.0, inner - w);
            let y = origin.y + CHUNK_MARGIN + rand_range(&mut rng, 0.0, inner - h);
            let kind = ObstacleKind::ALL[rng.random_range(0..ObstacleKind::ALL.len())];
            self.obstacles.push(Obstacle {
                rect: Rect::new(x, y, w, h),
                kind,
                chunk: key,
            });
        }

        log::debug!("Generated chunk ({}, {})", key.cx, key.cy);
    }

    /// Keep the 3x3 neighborhood around `player_pos` resident and evict far chunks
    ///
    /// Cheap when the player has not crossed a chunk border since the last call.
    pub fn ensure_around(&mut self, player_pos: Vec2) {
        if !self.streaming {
            return;
        }
        let key = ChunkKey::containing(player_pos);
        if self.current == Some(key) {
            return;
        }
        self.current = Some(key);

        for dy in -1..=1 {
            for dx in -1..=1 {
                self.generate_chunk(ChunkKey::new(key.cx + dx, key.cy + dy));
            }
        }

        let before = self.obstacles.len();
        self.obstacles
            .retain(|o| o.chunk.distance(key) <= CHUNK_KEEP_RADIUS);
        self.generated
            .retain(|k| k.distance(key) <= CHUNK_KEEP_RADIUS);
        let evicted = before - self.obstacles.len();
        if evicted > 0 {
            log::debug!(
                "Entered chunk ({}, {}), evicted {} obstacles",
                key.cx,
                key.cy,
                evicted
            );
        }
    }

    /// Would a circle at `center` overlap any obstacle?
    pub fn blocks_circle(&self, center: Vec2, radius: f32) -> bool {
        self.obstacles
            .iter()
            .any(|o| circle_intersects_rect(&o.rect, center, radius))
    }

    /// Is a world point inside any obstacle?
    pub fn blocks_point(&self, p: Vec2) -> bool {
        self.obstacles.iter().any(|o| point_in_rect(&o.rect, p))
    }

    /// Test/debug hook: insert a hand-placed obstacle
    pub fn insert(&mut self, rect: Rect, kind: ObstacleKind) {
        let chunk = ChunkKey::containing(rect.center());
        self.obstacles.push(Obstacle { rect, kind, chunk });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_chunk_key_floor() {
        assert_eq!(ChunkKey::containing(Vec2::new(0.0, 0.0)), ChunkKey::new(0, 0));
        assert_eq!(ChunkKey::containing(Vec2::new(899.9, 900.0)), ChunkKey::new(0, 1));
        assert_eq!(ChunkKey::containing(Vec2::new(-0.1, -901.0)), ChunkKey::new(-1, -2));
    }

    #[test]
    fn test_generate_chunk_idempotent() {
        let mut grid = ObstacleGrid::new(42);
        let key = ChunkKey::new(3, -2);
        grid.generate_chunk(key);
        assert_eq!(grid.len(), OBSTACLES_PER_CHUNK);
        grid.generate_chunk(key);
        assert_eq!(grid.len(), OBSTACLES_PER_CHUNK);
    }

    #[test]
    fn test_obstacles_stay_inside_chunk_margin() {
        let mut grid = ObstacleGrid::new(7);
        let key = ChunkKey::new(-1, 2);
        grid.generate_chunk(key);
        let x0 = -CHUNK_SIZE;
        let y0 = 2.0 * CHUNK_SIZE;
        for o in grid.obstacles() {
            assert!(o.rect.x >= x0 + CHUNK_MARGIN);
            assert!(o.rect.y >= y0 + CHUNK_MARGIN);
            assert!(o.rect.right() <= x0 + CHUNK_SIZE - CHUNK_MARGIN + 1e-3);
            assert!(o.rect.bottom() <= y0 + CHUNK_SIZE - CHUNK_MARGIN + 1e-3);
            assert_eq!(o.chunk, key);
        }
    }

    #[test]
    fn test_ensure_around_generates_neighborhood() {
        let mut grid = ObstacleGrid::new(1);
        grid.ensure_around(Vec2::new(450.0, 450.0));
        assert_eq!(grid.len(), 9 * OBSTACLES_PER_CHUNK);
        for dy in -1..=1 {
            for dx in -1..=1 {
                assert!(grid.is_generated(ChunkKey::new(dx, dy)));
            }
        }
        // Same chunk: nothing changes
        grid.ensure_around(Vec2::new(10.0, 880.0));
        assert_eq!(grid.len(), 9 * OBSTACLES_PER_CHUNK);
    }

    #[test]
    fn test_fixed_grid_never_streams() {
        let mut grid = ObstacleGrid::fixed(3);
        grid.ensure_around(Vec2::new(5000.0, -5000.0));
        assert!(grid.is_empty());
        grid.insert(Rect::new(0.0, 0.0, 10.0, 10.0), ObstacleKind::Rock);
        assert!(grid.blocks_point(Vec2::new(5.0, 5.0)));
        assert!(grid.blocks_circle(Vec2::new(15.0, 5.0), 6.0));
        assert!(!grid.blocks_circle(Vec2::new(25.0, 5.0), 6.0));
    }

    #[test]
    fn test_revisited_chunk_regenerates_identically() {
        let mut grid = ObstacleGrid::new(99);
        grid.ensure_around(Vec2::new(100.0, 100.0));
        let original: Vec<Rect> = grid
            .obstacles()
            .iter()
            .filter(|o| o.chunk == ChunkKey::new(0, 0))
            .map(|o| o.rect)
            .collect();

        // Walk far enough that chunk (0, 0) is evicted, then come back
        grid.ensure_around(Vec2::new(100.0 + 5.0 * CHUNK_SIZE, 100.0));
        assert!(!grid.is_generated(ChunkKey::new(0, 0)));
        grid.ensure_around(Vec2::new(100.0, 100.0));

        let again: Vec<Rect> = grid
            .obstacles()
            .iter()
            .filter(|o| o.chunk == ChunkKey::new(0, 0))
            .map(|o| o.rect)
            .collect();
        assert_eq!(original, again);
    }

    proptest! {
        #[test]
        fn resident_set_is_bounded(steps in 1usize..60, dir_x in -1i32..=1, dir_y in -1i32..=1) {
            let mut grid = ObstacleGrid::new(5);
            let max_chunks = ((2 * CHUNK_KEEP_RADIUS + 1) * (2 * CHUNK_KEEP_RADIUS + 1)) as usize;
            let mut pos = Vec2::new(10.0, 10.0);
            for _ in 0..steps {
                pos += Vec2::new(dir_x as f32, dir_y as f32) * (CHUNK_SIZE * 0.7);
                grid.ensure_around(pos);
                prop_assert!(grid.len() <= max_chunks * OBSTACLES_PER_CHUNK);
                let here = ChunkKey::containing(pos);
                prop_assert!(grid.obstacles().iter().all(|o| o.chunk.distance(here) <= CHUNK_KEEP_RADIUS));
            }
        }
    }
}

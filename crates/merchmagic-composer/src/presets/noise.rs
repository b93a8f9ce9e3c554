//! Seeded noise tiles for the gradient preset.

use std::collections::HashMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tiny_skia::{ColorU8, Pixmap};

/// Edge length of a noise tile in pixels.
pub const NOISE_TILE_SIZE: u32 = 120;

const NOISE_BASE: u8 = 220;
const NOISE_SPREAD: u8 = 40;
const NOISE_ALPHA: u8 = 25;

/// Light grey speckle: each pixel is `220 + n` (n in `0..40`, saturating)
/// at alpha 25. The same seed always yields the same tile.
pub fn generate_noise_tile(seed: u32) -> Option<Pixmap> {
    let mut rng = StdRng::seed_from_u64(seed as u64);
    let mut tile = Pixmap::new(NOISE_TILE_SIZE, NOISE_TILE_SIZE)?;
    for px in tile.pixels_mut() {
        let v = NOISE_BASE.saturating_add(rng.gen_range(0..NOISE_SPREAD));
        *px = ColorU8::from_rgba(v, v, v, NOISE_ALPHA).premultiply();
    }
    Some(tile)
}

/// Noise tiles owned by one session, keyed by seed.
#[derive(Debug, Default)]
pub struct NoiseCache {
    tiles: HashMap<u32, Arc<Pixmap>>,
}

impl NoiseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached tile for `key`, generating it on first use.
    pub fn get_or_generate(&mut self, key: u32) -> Option<Arc<Pixmap>> {
        if let Some(tile) = self.tiles.get(&key) {
            return Some(Arc::clone(tile));
        }
        let tile = Arc::new(generate_noise_tile(key)?);
        self.tiles.insert(key, Arc::clone(&tile));
        Some(tile)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiles_are_deterministic() {
        let a = generate_noise_tile(1).unwrap();
        let b = generate_noise_tile(1).unwrap();
        let c = generate_noise_tile(2).unwrap();
        assert_eq!(a.data(), b.data());
        assert_ne!(a.data(), c.data());
    }

    #[test]
    fn test_tile_value_range() {
        let tile = generate_noise_tile(3).unwrap();
        assert_eq!(tile.width(), NOISE_TILE_SIZE);
        for px in tile.pixels() {
            assert_eq!(px.alpha(), NOISE_ALPHA);
            let c = px.demultiply();
            assert_eq!(c.red(), c.green());
            assert!(c.red() >= 200);
        }
    }

    #[test]
    fn test_cache_reuses_tiles() {
        let mut cache = NoiseCache::new();
        let first = cache.get_or_generate(1).unwrap();
        let again = cache.get_or_generate(1).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        cache.get_or_generate(2).unwrap();
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }
}

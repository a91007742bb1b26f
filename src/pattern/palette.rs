//! Analogous hue palettes, precomputed once at startup.

use rand::Rng;

use crate::params::PaletteConfig;

/// Ordered analogous hues (degrees, 0 - 360), never empty
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    hues: Vec<f32>,
}

impl Palette {
    /// Draw one palette: a random base hue followed by evenly stepped neighbours
    fn generate<R: Rng + ?Sized>(rng: &mut R, config: &PaletteConfig) -> Self {
        let base = rng.gen_range(0.0..360.0_f32);
        let count = rng.gen_range(config.hue_count_range.clone());
        let step = rng.gen_range(config.hue_step_range.clone());

        let hues = (0..count)
            .map(|j| (base + j as f32 * step).rem_euclid(360.0))
            .collect();

        Self { hues }
    }

    pub fn hues(&self) -> &[f32] {
        &self.hues
    }

    /// Hue for a layer, cycling through the palette
    pub fn hue(&self, layer_index: usize) -> f32 {
        self.hues[layer_index % self.hues.len()]
    }
}

/// Fixed set of palettes built once and never modified
#[derive(Debug, Clone)]
pub struct PaletteLibrary {
    palettes: Vec<Palette>,
}

impl PaletteLibrary {
    /// Build `config.library_size` palettes from the given random source
    pub fn build<R: Rng + ?Sized>(rng: &mut R, config: &PaletteConfig) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid palette config");

        let palettes = (0..config.library_size)
            .map(|_| Palette::generate(rng, config))
            .collect();

        Self { palettes }
    }

    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }

    pub fn palettes(&self) -> &[Palette] {
        &self.palettes
    }

    /// Uniformly pick one palette
    pub fn select_random<R: Rng + ?Sized>(&self, rng: &mut R) -> &Palette {
        &self.palettes[rng.gen_range(0..self.palettes.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn library(seed: u64) -> PaletteLibrary {
        PaletteLibrary::build(&mut StdRng::seed_from_u64(seed), &PaletteConfig::default())
    }

    #[test]
    fn test_library_size() {
        assert_eq!(library(1).len(), 1000);

        let config = PaletteConfig {
            library_size: 17,
            ..Default::default()
        };
        let small = PaletteLibrary::build(&mut StdRng::seed_from_u64(1), &config);
        assert_eq!(small.len(), 17);
    }

    #[test]
    fn test_palette_shape() {
        for palette in library(5).palettes() {
            let hues = palette.hues();
            assert!((3..7).contains(&hues.len()));
            assert!(hues.iter().all(|h| (0.0..360.0).contains(h)));

            // Neighbours are one constant step apart, modulo the hue circle
            let step = (hues[1] - hues[0]).rem_euclid(360.0);
            assert!((15.0..35.0).contains(&step), "step {}", step);
            for pair in hues.windows(2) {
                let d = (pair[1] - pair[0]).rem_euclid(360.0);
                assert!((d - step).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_selection_is_member() {
        let library = library(11);
        let mut rng = StdRng::seed_from_u64(99);

        for _ in 0..200 {
            let selected = library.select_random(&mut rng);
            assert!(library.palettes().contains(selected));
        }
    }

    #[test]
    fn test_hue_cycles_by_layer() {
        let palette = Palette {
            hues: vec![10.0, 40.0, 70.0],
        };
        assert_eq!(palette.hue(0), 10.0);
        assert_eq!(palette.hue(4), 40.0);
    }
}

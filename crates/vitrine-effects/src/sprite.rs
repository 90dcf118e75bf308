//! Point sprite textures.

/// Square single-channel alpha texture.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    size: usize,
    alpha: Vec<f32>,
}

impl Sprite {
    /// Radial gradient: opaque at the center, fading linearly to fully
    /// transparent at the inscribed circle.
    pub fn radial(size: usize) -> Self {
        let size = size.max(1);
        let center = size as f32 / 2.0;
        let alpha = (0..size * size)
            .map(|i| {
                let x = (i % size) as f32 + 0.5 - center;
                let y = (i / size) as f32 + 0.5 - center;
                (1.0 - (x * x + y * y).sqrt() / center).max(0.0)
            })
            .collect();
        Self { size, alpha }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Nearest-texel alpha at texture coordinates in `0.0..=1.0`.
    /// Coordinates outside the texture are transparent.
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return 0.0;
        }
        let last = self.size - 1;
        let x = ((u * self.size as f32) as usize).min(last);
        let y = ((v * self.size as f32) as usize).min(last);
        self.alpha[y * self.size + x]
    }
}

impl Default for Sprite {
    fn default() -> Self {
        Self::radial(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radial_falloff() {
        let sprite = Sprite::default();
        assert_eq!(sprite.size(), 64);
        let center = sprite.sample(0.5, 0.5);
        let mid = sprite.sample(0.75, 0.5);
        let rim = sprite.sample(1.0, 0.5);
        assert!(center > 0.95);
        assert!(mid < center && mid > rim);
        assert!(rim < 0.05);
        assert_eq!(sprite.sample(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_outside_is_transparent() {
        let sprite = Sprite::radial(8);
        assert_eq!(sprite.sample(-0.1, 0.5), 0.0);
        assert_eq!(sprite.sample(0.5, 1.2), 0.0);
    }
}

//! Procedural stand-ins for the demo's texture set.
//!
//! Every function returns a `SIZE` x `SIZE` RGBA8 image.  The patterns are
//! deterministic (hash-based noise, no RNG state) so the scene looks the same
//! on every run.  The tree sprite is the only one with meaningful alpha.

pub const SIZE: u32 = 64;

/// Integer finaliser used as a cheap per-pixel noise source.
fn hash(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^ (x >> 16)
}

/// 0.0..1.0 noise for pixel (x, y) with a per-texture seed.
fn noise(x: u32, y: u32, seed: u32) -> f32 {
    hash(x.wrapping_mul(374_761_393) ^ y.wrapping_mul(668_265_263) ^ seed) as f32
        / u32::MAX as f32
}

fn fill(mut pixel: impl FnMut(u32, u32) -> [u8; 4]) -> Vec<u8> {
    let mut out = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for y in 0..SIZE {
        for x in 0..SIZE {
            out.extend_from_slice(&pixel(x, y));
        }
    }
    out
}

fn lerp(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t) as u8
}

pub fn grass() -> Vec<u8> {
    fill(|x, y| {
        let n = noise(x, y, 1);
        [lerp(40, 70, n), lerp(110, 160, n), lerp(35, 60, n), 255]
    })
}

pub fn water() -> Vec<u8> {
    fill(|x, y| {
        // soft horizontal banding plus a little shimmer
        let band = ((y as f32 * 0.4).sin() * 0.5 + 0.5) * 0.3;
        let n = noise(x, y, 2) * 0.2 + band;
        [lerp(20, 60, n), lerp(80, 130, n), lerp(160, 220, n), 255]
    })
}

pub fn wire_fence() -> Vec<u8> {
    fill(|x, y| {
        let on_wire = x % 8 < 2 || y % 8 < 2;
        if on_wire {
            [120, 120, 125, 255]
        } else {
            [0, 0, 0, 0]
        }
    })
}

pub fn stone() -> Vec<u8> {
    fill(|x, y| {
        let n = noise(x / 2, y / 2, 4);
        let g = lerp(105, 140, n);
        [g, g, lerp(100, 135, n), 255]
    })
}

pub fn marble() -> Vec<u8> {
    fill(|x, y| {
        // diagonal veins over an off-white base
        let vein = ((x as f32 * 0.35 + y as f32 * 0.22).sin().abs()).powf(8.0);
        let n = noise(x, y, 5) * 0.1;
        let base = 225.0 - vein * 70.0 - n * 20.0;
        [base as u8, base as u8, (base * 0.97) as u8, 255]
    })
}

pub fn sun() -> Vec<u8> {
    fill(|x, y| {
        let cx = x as f32 - SIZE as f32 / 2.0;
        let cy = y as f32 - SIZE as f32 / 2.0;
        let r = (cx * cx + cy * cy).sqrt() / (SIZE as f32 / 2.0);
        let t = r.min(1.0);
        [255, lerp(230, 160, t), lerp(120, 30, t), 255]
    })
}

pub fn diamond() -> Vec<u8> {
    fill(|x, y| {
        let facet = (x / 8 + y / 8) % 2 == 0;
        let n = noise(x, y, 7) * 0.15;
        let b = if facet { 0.9 } else { 0.7 } - n;
        [
            (150.0 * b) as u8,
            (230.0 * b) as u8,
            (255.0 * b) as u8,
            255,
        ]
    })
}

pub fn bush() -> Vec<u8> {
    fill(|x, y| {
        let n = noise(x, y, 8);
        [lerp(20, 45, n), lerp(70, 110, n), lerp(25, 45, n), 255]
    })
}

pub fn wood() -> Vec<u8> {
    fill(|x, y| {
        // vertical grain
        let grain = ((x as f32 * 0.8).sin() * 0.5 + 0.5) * 0.3 + noise(x, y, 9) * 0.15;
        [
            lerp(95, 130, grain),
            lerp(60, 85, grain),
            lerp(30, 45, grain),
            255,
        ]
    })
}

/// Tree silhouette: triangular canopy over a trunk, transparent elsewhere.
pub fn tree() -> Vec<u8> {
    fill(|x, y| {
        let fx = x as f32 / SIZE as f32;
        let fy = y as f32 / SIZE as f32;

        // canopy occupies the top ~70%, widening toward its base
        let canopy = fy < 0.7 && (fx - 0.5).abs() < 0.08 + fy * 0.5;
        // trunk below it
        let trunk = fy >= 0.7 && (fx - 0.5).abs() < 0.06;

        if canopy {
            let n = noise(x, y, 10);
            [lerp(20, 40, n), lerp(80, 120, n), lerp(30, 50, n), 255]
        } else if trunk {
            [90, 60, 35, 255]
        } else {
            [0, 0, 0, 0]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn images_are_rgba8_of_declared_size() {
        for (name, img) in [
            ("grass", grass()),
            ("water", water()),
            ("tree", tree()),
            ("marble", marble()),
        ] {
            assert_eq!(img.len(), (SIZE * SIZE * 4) as usize, "{name}");
        }
    }

    #[test]
    fn tree_has_transparent_and_opaque_texels() {
        let img = tree();
        let alphas: Vec<u8> = img.chunks_exact(4).map(|p| p[3]).collect();
        assert!(alphas.iter().any(|&a| a == 0));
        assert!(alphas.iter().any(|&a| a == 255));
    }
}

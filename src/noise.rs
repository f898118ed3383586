//! Deterministic hashing and noise.
//!
//! No function here draws from a true RNG: everything is a pure function of
//! its inputs so that repeated evaluation of the same vector at the same time
//! reproduces the same frame.
//!
//! # Available Functions
//!
//! ## Hash
//! - [`hash`], [`hash2`], [`hash3`] - integer avalanche hashes
//! - [`hash_str`] - 32-bit FNV-1a over a string
//! - [`rand01`] - hash to a float in `[0, 1)`
//!
//! ## Noise
//! - [`trig_noise`] - cheap sine/cosine product pseudo-noise in `[-1, 1]`
//! - [`noise3`] - 3D gradient noise in roughly `[-1, 1]`
//! - [`fbm3`] - fractal Brownian motion over [`noise3`]

/// Hash a u32 to a pseudo-random u32.
#[inline]
pub fn hash(n: u32) -> u32 {
    let mut x = n;
    x ^= x >> 17;
    x = x.wrapping_mul(0xed5a_d4bb);
    x ^= x >> 11;
    x = x.wrapping_mul(0xac4c_1b51);
    x ^= x >> 15;
    x = x.wrapping_mul(0x3184_8bab);
    x ^= x >> 14;
    x
}

/// Hash a 2D integer coordinate.
#[inline]
pub fn hash2(x: u32, y: u32) -> u32 {
    hash(x.wrapping_add(hash(y)))
}

/// Hash a 3D integer coordinate.
#[inline]
pub fn hash3(x: u32, y: u32, z: u32) -> u32 {
    hash(x.wrapping_add(hash(y.wrapping_add(hash(z)))))
}

/// 32-bit FNV-1a hash of a string.
pub fn hash_str(s: &str) -> u32 {
    let mut h: u32 = 0x811c_9dc5;
    for byte in s.bytes() {
        h ^= byte as u32;
        h = h.wrapping_mul(0x0100_0193);
    }
    h
}

/// Map a hash to a float in `[0, 1)`.
#[inline]
pub fn rand01(seed: u32) -> f64 {
    hash(seed) as f64 / 4_294_967_296.0
}

/// Map a hash to a float in `[-1, 1)`.
#[inline]
pub fn rand_signed(seed: u32) -> f64 {
    rand01(seed) * 2.0 - 1.0
}

/// Cheap pseudo-noise from a product of sines and cosines at three
/// incommensurate frequencies. Bounded to `[-1, 1]`.
pub fn trig_noise(x: f64, y: f64, t: f64) -> f64 {
    let a = (x * 1.0 + t).sin() * (y * 1.3 - t * 0.7).cos();
    let b = (x * 2.7 - y * 1.9 + t * 1.3).sin() * 0.5;
    let c = (x * 0.6 + y * 3.1 - t * 0.4).cos() * 0.25;
    ((a + b + c) / 1.75).clamp(-1.0, 1.0)
}

const GRADIENTS: [[f64; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn corner(ix: i64, iy: i64, iz: i64, seed: u32, dx: f64, dy: f64, dz: f64) -> f64 {
    let h = hash3(ix as u32, iy as u32, (iz as u32).wrapping_add(seed));
    let g = GRADIENTS[(h % 12) as usize];
    g[0] * dx + g[1] * dy + g[2] * dz
}

/// 3D gradient noise on a hashed integer lattice.
///
/// Returns values in roughly `[-1, 1]`, exactly `0.0` on lattice points.
/// `seed` selects an independent noise field.
pub fn noise3(x: f64, y: f64, z: f64, seed: u32) -> f64 {
    if !(x.is_finite() && y.is_finite() && z.is_finite()) {
        return 0.0;
    }
    let (fx, fy, fz) = (x.floor(), y.floor(), z.floor());
    let (ix, iy, iz) = (fx as i64, fy as i64, fz as i64);
    let (dx, dy, dz) = (x - fx, y - fy, z - fz);
    let (u, v, w) = (fade(dx), fade(dy), fade(dz));

    let lerp = crate::easing::lerp;
    let x00 = lerp(
        corner(ix, iy, iz, seed, dx, dy, dz),
        corner(ix + 1, iy, iz, seed, dx - 1.0, dy, dz),
        u,
    );
    let x10 = lerp(
        corner(ix, iy + 1, iz, seed, dx, dy - 1.0, dz),
        corner(ix + 1, iy + 1, iz, seed, dx - 1.0, dy - 1.0, dz),
        u,
    );
    let x01 = lerp(
        corner(ix, iy, iz + 1, seed, dx, dy, dz - 1.0),
        corner(ix + 1, iy, iz + 1, seed, dx - 1.0, dy, dz - 1.0),
        u,
    );
    let x11 = lerp(
        corner(ix, iy + 1, iz + 1, seed, dx, dy - 1.0, dz - 1.0),
        corner(ix + 1, iy + 1, iz + 1, seed, dx - 1.0, dy - 1.0, dz - 1.0),
        u,
    );
    let y0 = lerp(x00, x10, v);
    let y1 = lerp(x01, x11, v);
    lerp(y0, y1, w).clamp(-1.0, 1.0)
}

/// Fractal Brownian motion: `octaves` layers of [`noise3`], each at double
/// frequency and half amplitude. Normalized back into roughly `[-1, 1]`.
pub fn fbm3(x: f64, y: f64, z: f64, octaves: u32, seed: u32) -> f64 {
    let octaves = octaves.clamp(1, 8);
    let mut value = 0.0;
    let mut amplitude = 0.5;
    let mut total = 0.0;
    let mut frequency = 1.0;
    for octave in 0..octaves {
        value += amplitude * noise3(x * frequency, y * frequency, z * frequency, seed.wrapping_add(octave));
        total += amplitude;
        frequency *= 2.0;
        amplitude *= 0.5;
    }
    value / total
}

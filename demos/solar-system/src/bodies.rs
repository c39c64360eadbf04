use std::f32::consts::TAU;

use glam::Vec3;
use orrery::{BodyDesc, BodyKind, CameraPreset, SystemManifest};

pub const SUN: &str = "The Sun";
pub const EARTH: &str = "Earth";

pub const ASTEROID_COUNT: u32 = 100;
pub const STAR_COUNT: u32 = 15_000;
pub const STARFIELD_RADIUS: f32 = 400.0;

/// Preset names, in the order the page's preset buttons index them.
pub const PRESETS: [&str; 3] = ["overview", "top", "side"];

/// Hash a seed to a pseudo-random u32 (deterministic).
fn asteroid_hash(seed: u32) -> u32 {
    let mut h = seed.wrapping_mul(2654435761);
    h ^= h >> 16;
    h = h.wrapping_mul(2246822519);
    h ^= h >> 13;
    h
}

/// Deterministic value in [0, 1] for a seed.
fn frac(seed: u32) -> f32 {
    (asteroid_hash(seed) as f64 / u32::MAX as f64) as f32
}

/// 0xRRGGBB to RGB in [0, 1].
pub fn hex_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    ]
}

fn texture(name: &str) -> Option<String> {
    Some(format!("textures/{}.jpg", name.to_lowercase()))
}

fn sun() -> BodyDesc {
    BodyDesc {
        spin_speed: 0.001,
        color: hex_rgb(0xFFA500),
        texture: texture("sun"),
        distance_au: Some(0.0),
        info: Some("The center of our solar system.".into()),
        ..BodyDesc::new(SUN, BodyKind::Star, 1.5)
    }
}

/// (name, radius, color, distance, orbit speed, spin speed, AU)
const PLANETS: [(&str, f32, u32, f32, f32, f32, f64); 3] = [
    ("Mercury", 0.2, 0xAAAAAA, 3.0, 0.015, 0.02, 0.39),
    ("Venus", 0.4, 0xCC7722, 5.0, 0.008, 0.01, 0.72),
    (EARTH, 0.5, 0x0000FF, 8.0, 0.005, 0.007, 1.00),
];

fn planets() -> impl Iterator<Item = BodyDesc> {
    PLANETS
        .iter()
        .map(|&(name, radius, color, distance, orbit_speed, spin_speed, au)| BodyDesc {
            distance,
            orbit_speed,
            spin_speed,
            distance_au: Some(au),
            color: hex_rgb(color),
            texture: texture(name),
            ..BodyDesc::new(name, BodyKind::Planet, radius)
        })
}

fn moon() -> BodyDesc {
    BodyDesc {
        distance: 1.5,
        orbit_speed: 0.05,
        spin_speed: 0.015,
        distance_au: Some(1.0),
        parent: Some(EARTH.into()),
        color: hex_rgb(0xCCCCCC),
        texture: texture("moon"),
        info: Some("Orbits Earth at 384,400 km".into()),
        ..BodyDesc::new("Moon", BodyKind::Moon, 0.15)
    }
}

/// Belt between Venus and Earth. Each asteroid draws four values from the
/// hash so the belt is identical on every load.
fn asteroids() -> impl Iterator<Item = BodyDesc> {
    (0..ASTEROID_COUNT).map(|i| {
        let seed = i * 4;
        BodyDesc {
            distance: 4.0 + frac(seed + 1) * 3.0,
            z_offset: (frac(seed + 2) - 0.5) * 0.5,
            initial_orbit_angle: frac(seed + 3) * TAU,
            orbit_speed: 0.0005 + frac(seed + 4) * 0.0002,
            color: hex_rgb(0x555555),
            selectable: false,
            ..BodyDesc::new(format!("Asteroid {i}"), BodyKind::Asteroid, 0.05 + frac(seed) * 0.05)
        }
    })
}

fn presets() -> Vec<CameraPreset> {
    let preset = |name: &str, position: Vec3| CameraPreset {
        name: name.into(),
        position,
        target: Vec3::ZERO,
    };
    vec![
        preset(PRESETS[0], Vec3::new(0.0, 10.0, 35.0)),
        // Slightly off the pole so the Y-up look-at stays defined
        preset(PRESETS[1], Vec3::new(0.0, 40.0, 0.1)),
        preset(PRESETS[2], Vec3::new(40.0, 2.0, 0.0)),
    ]
}

/// The inner solar system: Sun, three planets, the Moon and the belt.
pub fn system_manifest() -> SystemManifest {
    let bodies = std::iter::once(sun())
        .chain(planets())
        .chain(std::iter::once(moon()))
        .chain(asteroids())
        .collect();
    SystemManifest {
        bodies,
        presets: presets(),
    }
}

/// Points uniformly distributed on a sphere, packed as xyz triples.
pub fn starfield(count: u32, radius: f32) -> Vec<f32> {
    let mut points = Vec::with_capacity(count as usize * 3);
    for i in 0..count {
        // Offset keeps star seeds clear of the asteroid seeds
        let seed = 1_000_003 + i * 2;
        let theta = TAU * frac(seed);
        let phi = (2.0 * frac(seed + 1) - 1.0).clamp(-1.0, 1.0).acos();
        points.push(radius * phi.sin() * theta.cos());
        points.push(radius * phi.sin() * theta.sin());
        points.push(radius * phi.cos());
    }
    points
}

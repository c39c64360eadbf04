//! Ray picking against body spheres.
//!
//! Pure functions: a ray and a candidate set in, the nearest hit out.
//! Pointer plumbing and camera unprojection live elsewhere.

use glam::Vec3;

use crate::api::types::BodyId;

/// A half-line in world space. `dir` is unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    /// Build a ray; the direction is normalized. Returns `None` for a
    /// zero or non-finite direction.
    pub fn new(origin: Vec3, dir: Vec3) -> Option<Self> {
        let dir = dir.try_normalize()?;
        Some(Self { origin, dir })
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.dir * distance
    }
}

/// Distance along `ray` to the first intersection with a sphere, if any.
/// Hits behind the origin are ignored; an origin inside the sphere reports
/// the exit point.
pub fn intersect_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    if !(radius > 0.0) {
        return None;
    }
    let oc = ray.origin - center;
    let b = oc.dot(ray.dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let near = -b - sqrt_disc;
    if near >= 0.0 {
        return Some(near);
    }
    let far = -b + sqrt_disc;
    (far >= 0.0).then_some(far)
}

/// A selectable sphere in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickCandidate {
    pub body: BodyId,
    pub center: Vec3,
    pub radius: f32,
}

/// Result of a successful pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pick {
    pub body: BodyId,
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
}

/// Nearest candidate hit by `ray`. Ties go to the earlier candidate.
pub fn pick<'a>(ray: &Ray, candidates: impl IntoIterator<Item = &'a PickCandidate>) -> Option<Pick> {
    let mut best: Option<Pick> = None;
    for candidate in candidates {
        let Some(distance) = intersect_sphere(ray, candidate.center, candidate.radius) else {
            continue;
        };
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(Pick {
                body: candidate.body,
                distance,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn down_z() -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, 20.0), Vec3::NEG_Z).unwrap()
    }

    #[test]
    fn hits_sphere_in_front() {
        let d = intersect_sphere(&down_z(), Vec3::ZERO, 1.5).unwrap();
        assert_abs_diff_eq!(d, 18.5, epsilon = 1e-5);
        assert!(down_z().at(d).abs_diff_eq(Vec3::new(0.0, 0.0, 1.5), 1e-5));
    }

    #[test]
    fn misses_sphere_off_axis_and_behind() {
        assert!(intersect_sphere(&down_z(), Vec3::new(3.0, 0.0, 0.0), 1.0).is_none());
        assert!(intersect_sphere(&down_z(), Vec3::new(0.0, 0.0, 30.0), 1.0).is_none());
        assert!(intersect_sphere(&down_z(), Vec3::ZERO, 0.0).is_none());
    }

    #[test]
    fn origin_inside_reports_exit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X).unwrap();
        let d = intersect_sphere(&ray, Vec3::ZERO, 2.0).unwrap();
        assert_abs_diff_eq!(d, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn nearest_candidate_wins() {
        let candidates = [
            PickCandidate { body: BodyId(0), center: Vec3::ZERO, radius: 1.5 },
            PickCandidate { body: BodyId(1), center: Vec3::new(0.0, 0.0, 8.0), radius: 0.5 },
            PickCandidate { body: BodyId(2), center: Vec3::new(5.0, 0.0, 0.0), radius: 0.4 },
        ];
        let hit = pick(&down_z(), &candidates).unwrap();
        assert_eq!(hit.body, BodyId(1));
        assert_abs_diff_eq!(hit.distance, 11.5, epsilon = 1e-5);
    }

    #[test]
    fn empty_space_picks_nothing() {
        let candidates = [PickCandidate { body: BodyId(0), center: Vec3::new(5.0, 5.0, 0.0), radius: 1.0 }];
        assert!(pick(&down_z(), &candidates).is_none());
        assert!(pick(&down_z(), &[]).is_none());
    }

    #[test]
    fn degenerate_direction_is_rejected() {
        assert!(Ray::new(Vec3::ZERO, Vec3::ZERO).is_none());
    }
}

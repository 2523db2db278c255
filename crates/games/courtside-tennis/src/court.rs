use serde::{Deserialize, Serialize};

use courtside_core::player::Side;
use rand::Rng;

use crate::config::CourtConfig;

/// A point in world space. `z` is height above the ground.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// An axis-aligned rectangle on the court plane.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Zone {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Zone {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.w && y >= self.y && y <= self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Zone rectangle expressed in fractions of one half of the court, seen
/// from the hitter: `lateral` runs from the hitter's left (0) to right (1),
/// `depth` from the target baseline (0) toward the net (1).
#[derive(Debug, Clone, Copy, PartialEq)]
struct ZoneLayout {
    name: &'static str,
    lateral: f32,
    depth: f32,
    width: f32,
    length: f32,
}

const THIRD: f32 = 1.0 / 3.0;

/// Aim zones. Three bands (back, mid, front) stopping short of the net
/// line so no zone ever touches it.
const ZONES: &[ZoneLayout] = &[
    ZoneLayout {
        name: "deep_back_left",
        lateral: 0.0,
        depth: 0.0,
        width: THIRD,
        length: 0.3,
    },
    ZoneLayout {
        name: "center_back",
        lateral: THIRD,
        depth: 0.0,
        width: THIRD,
        length: 0.3,
    },
    ZoneLayout {
        name: "deep_back_right",
        lateral: 2.0 * THIRD,
        depth: 0.0,
        width: THIRD,
        length: 0.3,
    },
    ZoneLayout {
        name: "back_left",
        lateral: 0.0,
        depth: 0.3,
        width: 0.5,
        length: 0.3,
    },
    ZoneLayout {
        name: "back_right",
        lateral: 0.5,
        depth: 0.3,
        width: 0.5,
        length: 0.3,
    },
    ZoneLayout {
        name: "front_left",
        lateral: 0.0,
        depth: 0.6,
        width: THIRD,
        length: 0.35,
    },
    ZoneLayout {
        name: "center_front",
        lateral: THIRD,
        depth: 0.6,
        width: THIRD,
        length: 0.35,
    },
    ZoneLayout {
        name: "front_right",
        lateral: 2.0 * THIRD,
        depth: 0.6,
        width: THIRD,
        length: 0.35,
    },
];

/// Static description of the playable area. Immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourtGeometry {
    pub width: f32,
    pub height: f32,
    pub net_y: f32,
    pub line_margin: f32,
}

impl CourtGeometry {
    pub fn new(width: f32, height: f32, net_y: f32, line_margin: f32) -> Self {
        Self {
            width,
            height,
            net_y,
            line_margin,
        }
    }

    pub fn from_config(config: &CourtConfig) -> Self {
        Self::new(config.width, config.height, config.net_y, config.line_margin)
    }

    /// Whether a ground contact at `(x, y)` is in.
    ///
    /// The court rectangle is shrunk by `line_margin` on every side; if the
    /// margin would leave nothing, the full rectangle is used.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let mut m = self.line_margin.max(0.0);
        if 2.0 * m >= self.width || 2.0 * m >= self.height {
            m = 0.0;
        }
        x >= m && x <= self.width - m && y >= m && y <= self.height - m
    }

    /// Which player owns the half containing `y`. The net line belongs to P2.
    pub fn half_of(&self, y: f32) -> Side {
        if y > self.net_y { Side::P1 } else { Side::P2 }
    }

    /// Depth of `side`'s half along y.
    fn half_length(&self, side: Side) -> f32 {
        match side {
            Side::P1 => self.height - self.net_y,
            Side::P2 => self.net_y,
        }
    }

    /// World rectangle of the named zone on `side`'s half, or `None` for an
    /// unknown name.
    ///
    /// Names read from the hitter's point of view: P2's half is seen by P1
    /// looking toward -y, so the hitter's left is low x; P1's half is the
    /// mirror image.
    pub fn zone(&self, side: Side, name: &str) -> Option<Zone> {
        let layout = ZONES.iter().find(|z| z.name == name)?;
        let half = self.half_length(side);
        let w = layout.width * self.width;
        let h = layout.length * half;
        Some(match side {
            Side::P2 => Zone::new(layout.lateral * self.width, layout.depth * half, w, h),
            Side::P1 => Zone::new(
                self.width - (layout.lateral + layout.width) * self.width,
                self.height - (layout.depth + layout.length) * half,
                w,
                h,
            ),
        })
    }

    /// All zone names, in declaration order.
    pub fn zone_names(&self) -> impl Iterator<Item = &'static str> {
        ZONES.iter().map(|z| z.name)
    }

    /// Uniform point inside `zone`, using fractional offsets in `[lo, hi]`
    /// of its width and height.
    pub fn sample_in_zone<R: Rng + ?Sized>(
        &self,
        zone: &Zone,
        rng: &mut R,
        lo: f32,
        hi: f32,
    ) -> (f32, f32) {
        let fx = sample_range(rng, lo, hi);
        let fy = sample_range(rng, lo, hi);
        (zone.x + fx * zone.w, zone.y + fy * zone.h)
    }

    /// Centre of `side`'s half.
    pub fn center_of_half(&self, side: Side) -> (f32, f32) {
        let y = match side {
            Side::P1 => (self.net_y + self.height) / 2.0,
            Side::P2 => self.net_y / 2.0,
        };
        (self.width / 2.0, y)
    }

    /// Starting spot for `side`, `inset` in front of its baseline.
    pub fn baseline_spot(&self, side: Side, inset: f32) -> (f32, f32) {
        let y = match side {
            Side::P1 => self.height - inset,
            Side::P2 => inset,
        };
        (self.width / 2.0, y)
    }
}

/// Uniform sample in `[lo, hi]`. An empty, degenerate or unbounded range
/// yields `lo`.
pub fn sample_range<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if lo.is_finite() && hi.is_finite() && hi > lo {
        rng.random_range(lo..=hi)
    } else {
        lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CourtConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn court() -> CourtGeometry {
        CourtGeometry::from_config(&CourtConfig::default())
    }

    #[test]
    fn contains_respects_line_margin() {
        let c = court();
        assert!(c.contains(120.0, 100.0));
        assert!(!c.contains(1.0, 100.0), "painted line counts as out");
        assert!(!c.contains(-5.0, 100.0));
        assert!(!c.contains(120.0, c.height + 1.0));
    }

    #[test]
    fn oversized_margin_falls_back_to_full_rect() {
        let c = CourtGeometry::new(10.0, 10.0, 5.0, 50.0);
        assert!(c.contains(1.0, 1.0));
        assert!(!c.contains(11.0, 1.0));
    }

    #[test]
    fn half_of_splits_at_net() {
        let c = court();
        assert_eq!(c.half_of(c.net_y + 1.0), Side::P1);
        assert_eq!(c.half_of(c.net_y - 1.0), Side::P2);
    }

    #[test]
    fn zones_stay_on_their_half_and_off_the_net() {
        let c = court();
        for name in c.zone_names() {
            let far = c.zone(Side::P2, name).unwrap();
            assert!(far.y >= 0.0 && far.y + far.h < c.net_y, "{name}: {far:?}");
            let near = c.zone(Side::P1, name).unwrap();
            assert!(near.y > c.net_y && near.y + near.h <= c.height + 1e-3, "{name}: {near:?}");
        }
    }

    #[test]
    fn zones_on_a_half_do_not_overlap() {
        let c = court();
        let zones: Vec<Zone> = c.zone_names().map(|n| c.zone(Side::P2, n).unwrap()).collect();
        for (i, a) in zones.iter().enumerate() {
            for b in &zones[i + 1..] {
                let overlap_x = a.x + 1e-3 < b.x + b.w && b.x + 1e-3 < a.x + a.w;
                let overlap_y = a.y + 1e-3 < b.y + b.h && b.y + 1e-3 < a.y + a.h;
                assert!(!(overlap_x && overlap_y), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn near_half_is_mirror_of_far_half() {
        let c = court();
        let far = c.zone(Side::P2, "deep_back_left").unwrap();
        let near = c.zone(Side::P1, "deep_back_left").unwrap();
        // Hitter's left flips with the viewing direction.
        assert!(far.x < c.width / 2.0);
        assert!(near.x > c.width / 2.0);
        // Deep means next to the target's baseline.
        assert_eq!(far.y, 0.0);
        assert!((near.y + near.h - c.height).abs() < 1e-3);
    }

    #[test]
    fn unknown_zone_is_none() {
        assert!(court().zone(Side::P2, "tramlines").is_none());
    }

    #[test]
    fn samples_land_inside_zone_interior() {
        let c = court();
        let zone = c.zone(Side::P2, "front_right").unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let (x, y) = c.sample_in_zone(&zone, &mut rng, 0.2, 0.8);
            assert!(x >= zone.x + 0.2 * zone.w - 1e-3 && x <= zone.x + 0.8 * zone.w + 1e-3);
            assert!(y >= zone.y + 0.2 * zone.h - 1e-3 && y <= zone.y + 0.8 * zone.h + 1e-3);
        }
    }

    #[test]
    fn degenerate_range_yields_lower_bound() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sample_range(&mut rng, 3.0, 3.0), 3.0);
        assert_eq!(sample_range(&mut rng, 5.0, 2.0), 5.0);
        assert_eq!(sample_range(&mut rng, 8.0, f32::INFINITY), 8.0);
    }
}

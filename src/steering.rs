//! Steering forces and the brute-force neighborhood query.
//!
//! Everything here is a pure function over `Vec2` so the behavior systems
//! stay thin and the math stays testable without an ECS world. Degenerate
//! directions (zero-length deltas) uniformly resolve to `Vec2::ZERO` via
//! `normalize_or_zero`; no steering function can return NaN or panic.

use crate::config::GainTier;
use bevy::prelude::*;

/// A candidate entity as seen by the neighborhood query: identity plus a
/// position/velocity snapshot taken at the start of the tick.
pub type Flockmate = (Entity, Vec2, Vec2);

/// A neighbor returned by [`neighbors_within`].
#[derive(Clone, Copy, Debug)]
pub struct Neighbor {
    pub position: Vec2,
    pub velocity: Vec2,
    pub distance: f32,
}

/// Brute-force scan of `candidates` for entries within `radius` of `origin`,
/// excluding `myself`. O(n) per call; output order follows input order.
pub fn neighbors_within(
    origin: Vec2,
    radius: f32,
    myself: Entity,
    candidates: &[Flockmate],
) -> Vec<Neighbor> {
    candidates
        .iter()
        .filter(|(entity, _, _)| *entity != myself)
        .filter_map(|&(_, position, velocity)| {
            let distance = origin.distance(position);
            (distance < radius).then_some(Neighbor {
                position,
                velocity,
                distance,
            })
        })
        .collect()
}

/// Looks up the gain for a distance in a descending-`min_dist` tier table.
/// First matching entry wins; a distance below every tier yields zero.
pub fn gain_for_distance(tiers: &[GainTier], distance: f32) -> f32 {
    tiers
        .iter()
        .find(|tier| distance >= tier.min_dist)
        .map(|tier| tier.gain)
        .unwrap_or(0.0)
}

/// Steer toward a target position, with a distance-tiered gain.
pub fn seek(position: Vec2, target: Vec2, tiers: &[GainTier]) -> Vec2 {
    let gain = gain_for_distance(tiers, position.distance(target));
    (target - position).normalize_or_zero() * gain
}

/// Steer directly away from a threat, with a distance-tiered gain (a close
/// pursuer can warrant a stronger push than a distant one). Coincident
/// positions yield zero force.
pub fn flee(position: Vec2, threat: Vec2, tiers: &[GainTier]) -> Vec2 {
    let gain = gain_for_distance(tiers, position.distance(threat));
    (position - threat).normalize_or_zero() * gain
}

/// Steer toward the average position of the neighborhood. Zero with no
/// neighbors in range.
pub fn cohere(position: Vec2, neighbors: &[Neighbor], gain: f32) -> Vec2 {
    if neighbors.is_empty() {
        return Vec2::ZERO;
    }
    let center: Vec2 =
        neighbors.iter().map(|n| n.position).sum::<Vec2>() / neighbors.len() as f32;
    (center - position) * gain
}

/// Steer along the average velocity of the neighborhood. Zero with no
/// neighbors in range.
pub fn align(neighbors: &[Neighbor], gain: f32) -> Vec2 {
    if neighbors.is_empty() {
        return Vec2::ZERO;
    }
    let heading: Vec2 =
        neighbors.iter().map(|n| n.velocity).sum::<Vec2>() / neighbors.len() as f32;
    heading * gain
}

/// Steer away from every neighbor in range. Deliberately unaveraged, so the
/// push grows with crowding density.
pub fn separate(position: Vec2, neighbors: &[Neighbor], gain: f32) -> Vec2 {
    neighbors
        .iter()
        .map(|n| position - n.position)
        .sum::<Vec2>()
        * gain
}

/// Piecewise-constant inward push near the arena edges, independent per axis
/// so both components can be active at a corner.
pub fn wall_repel(position: Vec2, arena: Vec2, margin: f32, force: f32) -> Vec2 {
    let mut out = Vec2::ZERO;
    if position.x < margin {
        out.x += force;
    } else if position.x > arena.x - margin {
        out.x -= force;
    }
    if position.y < margin {
        out.y += force;
    } else if position.y > arena.y - margin {
        out.y -= force;
    }
    out
}

/// Caps a single force to `max_force` before accumulation, when configured.
pub fn clamp_force(force: Vec2, max_force: Option<f32>) -> Vec2 {
    match max_force {
        Some(max) => force.clamp_length_max(max),
        None => force,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiers(entries: &[(f32, f32)]) -> Vec<GainTier> {
        entries
            .iter()
            .map(|&(min_dist, gain)| GainTier { min_dist, gain })
            .collect()
    }

    #[test]
    fn neighborhood_excludes_self_and_far_candidates() {
        let me = Entity::from_raw(0);
        let candidates = vec![
            (me, Vec2::ZERO, Vec2::ZERO),
            (Entity::from_raw(1), Vec2::new(30.0, 0.0), Vec2::X),
            (Entity::from_raw(2), Vec2::new(500.0, 0.0), Vec2::Y),
        ];
        let hood = neighbors_within(Vec2::ZERO, 100.0, me, &candidates);
        assert_eq!(hood.len(), 1);
        assert_eq!(hood[0].distance, 30.0);
        assert_eq!(hood[0].velocity, Vec2::X);
    }

    #[test]
    fn gain_table_first_match_wins() {
        let table = tiers(&[(200.0, 0.3), (50.0, 0.2), (0.0, 0.1)]);
        assert_eq!(gain_for_distance(&table, 500.0), 0.3);
        assert_eq!(gain_for_distance(&table, 60.0), 0.2);
        assert_eq!(gain_for_distance(&table, 10.0), 0.1);
        assert_eq!(gain_for_distance(&[], 10.0), 0.0);
    }

    #[test]
    fn seek_points_at_target() {
        let force = seek(Vec2::ZERO, Vec2::new(10.0, 0.0), &tiers(&[(0.0, 0.1)]));
        assert!((force - Vec2::new(0.1, 0.0)).length() < 1e-6);
    }

    #[test]
    fn seek_on_own_position_is_zero() {
        let at = Vec2::new(7.0, -3.0);
        assert_eq!(seek(at, at, &tiers(&[(0.0, 0.1)])), Vec2::ZERO);
    }

    #[test]
    fn flee_points_away_from_threat() {
        let table = tiers(&[(0.0, 0.1)]);
        let force = flee(Vec2::new(645.0, 360.0), Vec2::new(640.0, 360.0), &table);
        assert!(force.x > 0.0);
        assert_eq!(force.y, 0.0);
        // coincident threat resolves to zero, not NaN
        assert_eq!(flee(Vec2::ONE, Vec2::ONE, &table), Vec2::ZERO);
    }

    #[test]
    fn flee_gain_switches_with_pursuer_distance() {
        // sprint from a close pursuer, amble away from a distant one
        let table = tiers(&[(300.0, 0.02), (0.0, 0.1)]);
        let threat = Vec2::ZERO;
        let near = flee(Vec2::new(5.0, 0.0), threat, &table);
        let far = flee(Vec2::new(400.0, 0.0), threat, &table);
        assert!((near.length() - 0.1).abs() < 1e-6);
        assert!((far.length() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn cohere_and_align_are_zero_without_neighbors() {
        assert_eq!(cohere(Vec2::ZERO, &[], 0.01), Vec2::ZERO);
        assert_eq!(align(&[], 0.1), Vec2::ZERO);
    }

    #[test]
    fn cohere_pulls_toward_center_of_mass() {
        let hood = [
            Neighbor {
                position: Vec2::new(10.0, 0.0),
                velocity: Vec2::ZERO,
                distance: 10.0,
            },
            Neighbor {
                position: Vec2::new(30.0, 0.0),
                velocity: Vec2::ZERO,
                distance: 30.0,
            },
        ];
        let force = cohere(Vec2::ZERO, &hood, 0.01);
        assert!((force - Vec2::new(0.2, 0.0)).length() < 1e-6);
    }

    #[test]
    fn separation_scales_with_crowding() {
        let close = Neighbor {
            position: Vec2::new(1.0, 0.0),
            velocity: Vec2::ZERO,
            distance: 1.0,
        };
        let one = separate(Vec2::ZERO, &[close], 0.05);
        let two = separate(Vec2::ZERO, &[close, close], 0.05);
        assert!(two.length() > one.length());
        assert!(one.x < 0.0);
    }

    #[test]
    fn wall_repel_is_inward_and_per_axis() {
        let arena = Vec2::new(1280.0, 720.0);
        assert_eq!(wall_repel(Vec2::new(640.0, 360.0), arena, 5.0, 2.0), Vec2::ZERO);
        assert_eq!(
            wall_repel(Vec2::new(1.0, 360.0), arena, 5.0, 2.0),
            Vec2::new(2.0, 0.0)
        );
        assert_eq!(
            wall_repel(Vec2::new(1279.0, 719.0), arena, 5.0, 2.0),
            Vec2::new(-2.0, -2.0)
        );
    }

    #[test]
    fn force_clamp_only_applies_when_configured() {
        let big = Vec2::new(10.0, 0.0);
        assert_eq!(clamp_force(big, None), big);
        assert_eq!(clamp_force(big, Some(1.0)), Vec2::new(1.0, 0.0));
    }
}

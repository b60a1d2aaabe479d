//! Ray casts against collider bounds.

use glam::Vec3;
use shapeshift_core::Ray;
use shapeshift_entity::{tag_of, Collider, Entity, Tag, Transform, World};

/// Result of a raycast against colliders.
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    pub entity: Entity,
    pub tag: Tag,
    pub position: Vec3,
    pub distance: f32,
}

/// Cast a ray and return the nearest hit within `max_distance`.
///
/// Colliders that contain the ray origin are not reported, and neither are
/// the entities listed in `exclude`.
pub fn raycast(
    world: &World,
    ray: &Ray,
    max_distance: f32,
    exclude: &[Entity],
) -> Option<RaycastHit> {
    let mut nearest: Option<(Entity, f32)> = None;

    for (entity, (transform, collider)) in world.query::<(&Transform, &Collider)>().iter() {
        if exclude.contains(&entity) {
            continue;
        }

        let bounds = collider.world_bounds(transform);
        if bounds.contains_point(ray.origin) {
            continue;
        }

        let Some((t_near, _)) = bounds.intersect_ray(ray) else {
            continue;
        };
        if t_near > max_distance {
            continue;
        }

        if nearest.map_or(true, |(_, best)| t_near < best) {
            nearest = Some((entity, t_near));
        }
    }

    nearest.map(|(entity, distance)| RaycastHit {
        entity,
        tag: tag_of(world, entity),
        position: ray.at(distance),
        distance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use shapeshift_entity::Name;

    fn wall(world: &mut World, center: Vec3, tag: Tag) -> Entity {
        world.spawn((
            Transform::from_position(center),
            Collider::centered(Vec3::ONE),
            tag,
            Name::new("wall"),
        ))
    }

    #[test]
    fn nearest_hit_wins() {
        let mut world = World::new();
        let far = wall(&mut world, Vec3::new(0.0, 0.0, -6.0), Tag::Obstacle);
        let near = wall(&mut world, Vec3::new(0.0, 0.0, -3.0), Tag::Terminal);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = raycast(&world, &ray, f32::INFINITY, &[]).expect("should hit");
        assert_eq!(hit.entity, near);
        assert_eq!(hit.tag, Tag::Terminal);
        assert_relative_eq!(hit.distance, 2.5);

        let hit = raycast(&world, &ray, f32::INFINITY, &[near]).expect("should hit");
        assert_eq!(hit.entity, far);
        assert_relative_eq!(hit.distance, 5.5);
    }

    #[test]
    fn max_distance_limits_hits() {
        let mut world = World::new();
        wall(&mut world, Vec3::new(0.0, 5.0, 0.0), Tag::Obstacle);
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        assert!(raycast(&world, &ray, 4.0, &[]).is_none());
        assert!(raycast(&world, &ray, 4.5, &[]).is_some());
    }

    #[test]
    fn origin_inside_collider_is_ignored() {
        let mut world = World::new();
        wall(&mut world, Vec3::ZERO, Tag::Obstacle);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(raycast(&world, &ray, f32::INFINITY, &[]).is_none());
    }
}

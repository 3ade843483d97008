//! State marker components.
//!
//! These markers mirror the per-tick contact classification so game code can
//! filter queries (`With<Grounded>`, `Added<ClimbingWall>`) instead of reading
//! [`ContactState`](crate::contact::ContactState) fields. They are added and
//! removed automatically after the controller pipeline runs.

use bevy::prelude::*;

use crate::config::ControllerConfig;
use crate::contact::ContactState;

/// Marker component indicating the character is grounded.
///
/// Mutually exclusive with [`Airborne`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Grounded;

/// Marker component indicating the character has no ground contact.
///
/// Mutually exclusive with [`Grounded`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Airborne;

/// Marker component indicating the character stands on a walkable slope
/// (angle strictly between zero and the configured maximum).
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct OnSlope;

/// Marker component indicating the character is in contact with a climbable
/// wall.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct ClimbingWall;

/// Sync state marker components from the contact classification.
pub fn sync_state_markers(
    mut commands: Commands,
    q_controllers: Query<(
        Entity,
        &ControllerConfig,
        &ContactState,
        Has<Grounded>,
        Has<Airborne>,
        Has<OnSlope>,
        Has<ClimbingWall>,
    )>,
) {
    for (entity, config, contact, has_grounded, has_airborne, has_slope, has_climb) in
        &q_controllers
    {
        if contact.grounded {
            if !has_grounded {
                commands.entity(entity).insert(Grounded).remove::<Airborne>();
            }
        } else if has_grounded || !has_airborne {
            commands.entity(entity).remove::<Grounded>().insert(Airborne);
        }

        let on_slope = contact.is_on_slope(config);
        if on_slope && !has_slope {
            commands.entity(entity).insert(OnSlope);
        } else if !on_slope && has_slope {
            commands.entity(entity).remove::<OnSlope>();
        }

        if contact.climbable && !has_climb {
            commands.entity(entity).insert(ClimbingWall);
        } else if !contact.climbable && has_climb {
            commands.entity(entity).remove::<ClimbingWall>();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_sync(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(sync_state_markers);
        schedule.run(world);
    }

    #[test]
    fn grounded_and_airborne_are_exclusive() {
        let mut world = World::new();
        let entity = world
            .spawn((ControllerConfig::default(), ContactState::default()))
            .id();

        run_sync(&mut world);
        assert!(world.get::<Airborne>(entity).is_some());
        assert!(world.get::<Grounded>(entity).is_none());

        world.get_mut::<ContactState>(entity).unwrap().grounded = true;
        run_sync(&mut world);
        assert!(world.get::<Grounded>(entity).is_some());
        assert!(world.get::<Airborne>(entity).is_none());
    }

    #[test]
    fn slope_marker_follows_contact() {
        let mut world = World::new();
        let entity = world
            .spawn((ControllerConfig::default(), ContactState::default()))
            .id();

        world
            .get_mut::<ContactState>(entity)
            .unwrap()
            .set_ground_probe(Vec3::new(0.5, 0.866, 0.0));
        run_sync(&mut world);
        assert!(world.get::<OnSlope>(entity).is_some());

        world.get_mut::<ContactState>(entity).unwrap().reset();
        run_sync(&mut world);
        assert!(world.get::<OnSlope>(entity).is_none());
    }

    #[test]
    fn climbing_marker_follows_contact() {
        let mut world = World::new();
        let entity = world
            .spawn((ControllerConfig::default(), ContactState::default()))
            .id();

        world
            .get_mut::<ContactState>(entity)
            .unwrap()
            .set_climbable_wall(Vec3::X);
        run_sync(&mut world);
        assert!(world.get::<ClimbingWall>(entity).is_some());
    }
}

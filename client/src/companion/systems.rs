use bevy::prelude::*;

use super::agent::{NavAgent, PathAgent};
use super::brain::CompanionBrain;

/// Entity the companion follows; cleared or dangling targets are tolerated.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct FollowTarget(pub Option<Entity>);

type CompanionQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static mut Transform,
        &'static mut CompanionBrain,
        &'static FollowTarget,
        Option<&'static mut NavAgent>,
    ),
>;

fn target_position(
    follow: &FollowTarget,
    targets: &Query<&Transform, Without<CompanionBrain>>,
) -> Option<Vec3> {
    follow
        .0
        .and_then(|entity| targets.get(entity).ok())
        .map(|transform| transform.translation)
}

pub fn start_companions(
    mut companions: Query<
        (&mut CompanionBrain, &FollowTarget, Option<&mut NavAgent>),
        Added<CompanionBrain>,
    >,
    targets: Query<&Transform, Without<CompanionBrain>>,
) {
    for (mut brain, follow, agent) in &mut companions {
        let target = target_position(follow, &targets);
        match agent {
            Some(mut agent) => brain.start(target, Some(&mut *agent as &mut dyn PathAgent)),
            None => brain.start(target, None),
        }
    }
}

pub fn update_companions(
    time: Res<Time>,
    mut companions: CompanionQuery,
    targets: Query<&Transform, Without<CompanionBrain>>,
) {
    let dt = time.delta_secs();
    for (mut transform, mut brain, follow, agent) in &mut companions {
        let target = target_position(follow, &targets);
        match agent {
            Some(mut agent) => brain.update(
                &mut transform,
                target,
                Some(&mut *agent as &mut dyn PathAgent),
                dt,
            ),
            None => brain.update(&mut transform, target, None, dt),
        }
    }
}

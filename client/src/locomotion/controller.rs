use bevy::prelude::*;

use super::config::LocomotionConfig;
use super::mover::Mover;

/// Edge and level state of one logical button for the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonSample {
    pub pressed: bool,
    pub released: bool,
    pub held: bool,
}

impl ButtonSample {
    pub const IDLE: Self = Self {
        pressed: false,
        released: false,
        held: false,
    };

    pub fn press() -> Self {
        Self {
            pressed: true,
            released: false,
            held: true,
        }
    }

    pub fn hold() -> Self {
        Self {
            pressed: false,
            released: false,
            held: true,
        }
    }

    pub fn release() -> Self {
        Self {
            pressed: false,
            released: true,
            held: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementInput {
    /// x = strafe right, y = forward; raw, not normalised.
    pub axes: Vec2,
    pub jump: ButtonSample,
    pub sprint: ButtonSample,
    pub crouch: ButtonSample,
}

/// Planar facing of the entity for this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementBasis {
    pub forward: Vec3,
    pub right: Vec3,
}

impl MovementBasis {
    pub fn from_transform(transform: &Transform) -> Self {
        Self {
            forward: *transform.forward(),
            right: *transform.right(),
        }
    }
}

impl Default for MovementBasis {
    fn default() -> Self {
        Self {
            forward: Vec3::NEG_Z,
            right: Vec3::X,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrouchTransition {
    pub elapsed: f32,
    pub start_height: f32,
    pub target_height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocomotionState {
    pub vertical_velocity: f32,
    pub speed: f32,
    pub stamina: f32,
    pub crouch: Option<CrouchTransition>,
    pub crouching: bool,
    pub sprinting: bool,
    pub movement_enabled: bool,
    pub gravity: f32,
    pub jump_force: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    pub jumped: bool,
    pub sprint_exhausted: bool,
}

/// Per-entity locomotion: gravity, jump, crouch, sprint and stamina.
#[derive(Component, Debug, Clone)]
pub struct LocomotionController {
    config: LocomotionConfig,
    state: LocomotionState,
    default_gravity: f32,
    default_jump_force: f32,
    standing_height: f32,
    missing_mover_logged: bool,
}

impl LocomotionController {
    pub fn new(config: LocomotionConfig, standing_height: f32) -> Self {
        let state = LocomotionState {
            vertical_velocity: 0.0,
            speed: config.default_speed,
            stamina: 1.0,
            crouch: None,
            crouching: false,
            sprinting: false,
            movement_enabled: true,
            gravity: config.gravity,
            jump_force: config.jump_force,
        };

        Self {
            default_gravity: config.gravity,
            default_jump_force: config.jump_force,
            standing_height,
            config,
            state,
            missing_mover_logged: false,
        }
    }

    pub fn state(&self) -> &LocomotionState {
        &self.state
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn gravity(&self) -> f32 {
        self.state.gravity
    }

    pub fn jump_force(&self) -> f32 {
        self.state.jump_force
    }

    pub fn stamina(&self) -> f32 {
        self.state.stamina
    }

    pub fn speed(&self) -> f32 {
        self.state.speed
    }

    pub fn is_sprinting(&self) -> bool {
        self.state.sprinting
    }

    pub fn is_crouching(&self) -> bool {
        self.state.crouching
    }

    pub fn movement_enabled(&self) -> bool {
        self.state.movement_enabled
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.state.vertical_velocity
    }

    /// Advances one frame: gravity and jump first, then input intent, then
    /// the single move request, then crouch and stamina timers.
    pub fn tick(
        &mut self,
        mover: Option<&mut dyn Mover>,
        input: &MovementInput,
        basis: MovementBasis,
        dt: f32,
    ) -> TickReport {
        let mut report = TickReport::default();

        let Some(mover) = mover else {
            self.warn_missing_mover();
            report.sprint_exhausted = self.stamina_tick(dt);
            return report;
        };

        self.integrate_gravity(mover, dt);

        if self.state.movement_enabled {
            if self.config.sprint_enabled {
                self.process_sprint_input(mover, input.sprint);
            }
            self.process_crouch_input(mover, input.crouch);
            report.jumped = self.try_jump(mover, input.jump);
            self.apply_movement(mover, Some((input.axes, basis)), dt);
        } else {
            self.apply_movement(mover, None, dt);
        }

        self.crouch_tick(mover, dt);
        report.sprint_exhausted = self.stamina_tick(dt);
        report
    }

    pub fn toggle_sprint(&mut self, mover: Option<&mut dyn Mover>, on: bool) -> bool {
        match mover {
            Some(mover) => self.sprint_to(mover, on),
            None => {
                self.warn_missing_mover();
                false
            }
        }
    }

    pub fn toggle_crouch(&mut self, mover: Option<&mut dyn Mover>, on: bool) -> bool {
        match mover {
            Some(mover) => self.crouch_to(mover, on),
            None => {
                self.warn_missing_mover();
                false
            }
        }
    }

    /// Drains stamina while sprinting and recharges it otherwise. Returns
    /// true when sprint was forced off by running out.
    pub fn stamina_tick(&mut self, dt: f32) -> bool {
        if !self.state.sprinting {
            if self.state.stamina < 1.0 {
                self.state.stamina =
                    (self.state.stamina + self.config.stamina_charge_rate * dt).min(1.0);
            }
            return false;
        }

        self.state.stamina = (self.state.stamina - self.config.stamina_drain_rate * dt).max(0.0);
        if self.state.stamina > 0.0 {
            return false;
        }
        self.state.sprinting = false;
        self.state.speed = self.config.default_speed;
        true
    }

    /// Overrides gravity and jump force when both are given; anything else
    /// restores the values captured at construction.
    pub fn modify_gravity(&mut self, gravity: Option<f32>, jump_force: Option<f32>) {
        match (gravity, jump_force) {
            (Some(gravity), Some(jump_force)) => {
                self.state.gravity = gravity;
                self.state.jump_force = jump_force;
            }
            _ => {
                self.state.gravity = self.default_gravity;
                self.state.jump_force = self.default_jump_force;
            }
        }
    }

    /// Repositions without sweeping through geometry on the way.
    pub fn teleport(&mut self, mover: Option<&mut dyn Mover>, position: Vec3) -> bool {
        let Some(mover) = mover else {
            self.warn_missing_mover();
            return false;
        };

        mover.set_enabled(false);
        mover.detach_from_parent();
        mover.set_position(position);
        mover.set_enabled(true);
        true
    }

    /// Returns true when the flag actually changed.
    pub fn set_movement_enabled(&mut self, enabled: bool) -> bool {
        if self.state.movement_enabled == enabled {
            return false;
        }
        self.state.movement_enabled = enabled;
        true
    }

    fn integrate_gravity(&mut self, mover: &mut dyn Mover, dt: f32) {
        if mover.is_grounded() {
            self.state.vertical_velocity = -self.state.gravity * dt;
        } else {
            self.state.vertical_velocity -= self.state.gravity * dt;
        }

        if self.state.vertical_velocity > 0.0
            && mover.probe_ceiling(self.config.head_detection_range)
        {
            self.state.vertical_velocity = -1.0 / self.state.vertical_velocity;
        }
    }

    fn process_sprint_input(&mut self, mover: &mut dyn Mover, sprint: ButtonSample) {
        if !self.state.sprinting && sprint.pressed {
            self.sprint_to(mover, true);
        } else if self.state.sprinting && sprint.released {
            self.sprint_to(mover, false);
        } else if mover.is_grounded() && self.state.sprinting && !sprint.held {
            self.sprint_to(mover, false);
        }
    }

    fn process_crouch_input(&mut self, mover: &mut dyn Mover, crouch: ButtonSample) {
        if !self.state.crouching && crouch.held {
            self.crouch_to(mover, true);
        } else if self.state.crouching && crouch.released {
            self.crouch_to(mover, false);
        }
        if mover.is_grounded() && self.state.crouching && !crouch.held {
            self.crouch_to(mover, false);
        }
    }

    fn try_jump(&mut self, mover: &mut dyn Mover, jump: ButtonSample) -> bool {
        if self.config.jump_disabled || !jump.pressed || !mover.is_grounded() {
            return false;
        }
        self.state.vertical_velocity = self.state.jump_force;
        true
    }

    fn apply_movement(&mut self, mover: &mut dyn Mover, intent: Option<(Vec2, MovementBasis)>, dt: f32) {
        let mut step = Vec3::ZERO;
        if let Some((axes, basis)) = intent {
            step += basis.forward * axes.y;
            step += basis.right * axes.x;
            step = step.normalize_or_zero() * self.state.speed;
        }
        step.y += self.state.vertical_velocity;
        mover.move_by(step * dt);
    }

    fn sprint_to(&mut self, mover: &mut dyn Mover, on: bool) -> bool {
        if !mover.is_grounded() || self.state.sprinting == on {
            return false;
        }
        if on && self.state.stamina <= 0.0 {
            return false;
        }

        if on {
            self.crouch_to(mover, false);
            self.state.sprinting = true;
            self.state.speed = self.config.default_speed * self.config.sprint_multiplier;
        } else {
            self.state.sprinting = false;
            self.state.speed = self.config.default_speed;
        }
        true
    }

    fn crouch_to(&mut self, mover: &mut dyn Mover, on: bool) -> bool {
        if !mover.is_grounded() || self.state.crouching == on {
            return false;
        }

        let target_height = if on {
            self.sprint_to(mover, false);
            self.state.speed = self.config.default_speed * self.config.crouch_multiplier;
            self.standing_height * 0.5
        } else {
            self.state.speed = self.config.default_speed;
            self.standing_height
        };

        self.state.crouching = on;
        self.state.crouch = Some(CrouchTransition {
            elapsed: 0.0,
            start_height: mover.height(),
            target_height,
        });
        true
    }

    fn crouch_tick(&mut self, mover: &mut dyn Mover, dt: f32) {
        let Some(transition) = self.state.crouch.as_mut() else {
            return;
        };

        transition.elapsed += dt;
        let progress = transition.elapsed / self.config.crouch_time;
        if progress >= 1.0 {
            mover.set_height(transition.target_height);
            self.state.crouch = None;
        } else {
            let height = transition.start_height
                + (transition.target_height - transition.start_height) * progress.max(0.0);
            mover.set_height(height);
        }
    }

    fn warn_missing_mover(&mut self) {
        if self.missing_mover_logged {
            return;
        }
        self.missing_mover_logged = true;
        warn!("Locomotion controller has no character body; physics operations are disabled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingMover {
        grounded: bool,
        ceiling: bool,
        height: f32,
        enabled: bool,
        position: Vec3,
        moves: Vec<Vec3>,
        detached: bool,
        enable_history: Vec<bool>,
    }

    impl RecordingMover {
        fn grounded(height: f32) -> Self {
            Self {
                grounded: true,
                height,
                enabled: true,
                ..Default::default()
            }
        }
    }

    impl Mover for RecordingMover {
        fn move_by(&mut self, displacement: Vec3) {
            self.moves.push(displacement);
            self.position += displacement;
        }

        fn is_grounded(&self) -> bool {
            self.grounded
        }

        fn probe_ceiling(&self, _range: f32) -> bool {
            self.ceiling
        }

        fn height(&self) -> f32 {
            self.height
        }

        fn set_height(&mut self, height: f32) {
            self.height = height;
        }

        fn set_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
            self.enable_history.push(enabled);
        }

        fn set_position(&mut self, position: Vec3) {
            self.position = position;
        }

        fn detach_from_parent(&mut self) {
            self.detached = true;
        }
    }

    fn controller() -> LocomotionController {
        LocomotionController::new(LocomotionConfig::default(), 2.0)
    }

    #[test]
    fn grounded_gravity_resets_each_tick() {
        let mut controller = controller();
        let mut mover = RecordingMover::grounded(2.0);

        controller.tick(Some(&mut mover), &MovementInput::default(), MovementBasis::default(), 0.1);
        controller.tick(Some(&mut mover), &MovementInput::default(), MovementBasis::default(), 0.1);

        assert!((controller.vertical_velocity() + 2.0).abs() < 1e-6);
    }

    #[test]
    fn airborne_gravity_accumulates() {
        let mut controller = controller();
        let mut mover = RecordingMover::grounded(2.0);
        mover.grounded = false;

        for _ in 0..3 {
            controller.tick(Some(&mut mover), &MovementInput::default(), MovementBasis::default(), 0.1);
        }

        assert!((controller.vertical_velocity() + 6.0).abs() < 1e-5);
    }

    #[test]
    fn jump_press_while_grounded_sets_jump_velocity() {
        let mut controller = controller();
        let mut mover = RecordingMover::grounded(2.0);
        let input = MovementInput {
            jump: ButtonSample::press(),
            ..Default::default()
        };

        let report = controller.tick(Some(&mut mover), &input, MovementBasis::default(), 0.1);

        assert!(report.jumped);
        assert_eq!(controller.vertical_velocity(), controller.jump_force());
        let last = mover.moves.last().copied().unwrap_or_default();
        assert!((last.y - controller.jump_force() * 0.1).abs() < 1e-6);
    }

    #[test]
    fn jump_is_ignored_when_disabled_or_held() {
        let mut config = LocomotionConfig::default();
        config.jump_disabled = true;
        let mut disabled = LocomotionController::new(config, 2.0);
        let mut mover = RecordingMover::grounded(2.0);
        let press = MovementInput {
            jump: ButtonSample::press(),
            ..Default::default()
        };
        assert!(!disabled.tick(Some(&mut mover), &press, MovementBasis::default(), 0.1).jumped);

        let mut held_only = controller();
        let hold = MovementInput {
            jump: ButtonSample::hold(),
            ..Default::default()
        };
        assert!(!held_only.tick(Some(&mut mover), &hold, MovementBasis::default(), 0.1).jumped);
    }

    #[test]
    fn ceiling_contact_turns_rising_velocity_downward() {
        let mut controller = controller();
        let mut mover = RecordingMover::grounded(2.0);
        let jump = MovementInput {
            jump: ButtonSample::press(),
            ..Default::default()
        };
        controller.tick(Some(&mut mover), &jump, MovementBasis::default(), 0.01);

        mover.grounded = false;
        mover.ceiling = true;
        controller.tick(Some(&mut mover), &MovementInput::default(), MovementBasis::default(), 0.01);

        assert!(controller.vertical_velocity() < 0.0);
    }

    #[test]
    fn horizontal_step_is_normalised_and_scaled_by_speed() {
        let mut controller = controller();
        let mut mover = RecordingMover::grounded(2.0);
        let input = MovementInput {
            axes: Vec2::new(1.0, 1.0),
            ..Default::default()
        };

        controller.tick(Some(&mut mover), &input, MovementBasis::default(), 0.5);

        let step = mover.moves[0];
        let planar = Vec2::new(step.x, step.z).length();
        assert!((planar - controller.speed() * 0.5).abs() < 1e-5);
        assert!(step.x > 0.0 && step.z < 0.0);
    }

    #[test]
    fn disabled_movement_applies_only_gravity() {
        let mut controller = controller();
        let mut mover = RecordingMover::grounded(2.0);
        assert!(controller.set_movement_enabled(false));
        assert!(!controller.set_movement_enabled(false));

        let input = MovementInput {
            axes: Vec2::new(0.0, 1.0),
            jump: ButtonSample::press(),
            ..Default::default()
        };
        let report = controller.tick(Some(&mut mover), &input, MovementBasis::default(), 0.1);

        assert!(!report.jumped);
        let step = mover.moves[0];
        assert_eq!(step.x, 0.0);
        assert_eq!(step.z, 0.0);
        assert!(step.y < 0.0);
    }

    #[test]
    fn sprint_while_airborne_is_rejected() {
        let mut controller = controller();
        let mut mover = RecordingMover::grounded(2.0);
        mover.grounded = false;
        let speed = controller.speed();

        assert!(!controller.toggle_sprint(Some(&mut mover), true));
        assert_eq!(controller.speed(), speed);
        assert!(!controller.is_sprinting());
    }

    #[test]
    fn sprint_raises_speed_and_cancels_crouch() {
        let mut controller = controller();
        let mut mover = RecordingMover::grounded(2.0);

        assert!(controller.toggle_crouch(Some(&mut mover), true));
        assert!(controller.toggle_sprint(Some(&mut mover), true));
        assert!(!controller.toggle_sprint(Some(&mut mover), true));

        assert!(controller.is_sprinting());
        assert!(!controller.is_crouching());
        let config = controller.config();
        assert_eq!(controller.speed(), config.default_speed * config.sprint_multiplier);
    }

    #[test]
    fn crouch_cancels_sprint_and_slows_down() {
        let mut controller = controller();
        let mut mover = RecordingMover::grounded(2.0);

        assert!(controller.toggle_sprint(Some(&mut mover), true));
        assert!(controller.toggle_crouch(Some(&mut mover), true));

        assert!(!controller.is_sprinting());
        let config = controller.config();
        assert_eq!(controller.speed(), config.default_speed * config.crouch_multiplier);
    }

    #[test]
    fn crouch_interpolation_lands_exactly_on_target() {
        let mut controller = controller();
        let mut mover = RecordingMover::grounded(2.0);
        assert!(controller.toggle_crouch(Some(&mut mover), true));

        let crouch_input = MovementInput {
            crouch: ButtonSample::hold(),
            ..Default::default()
        };
        let mut previous = mover.height;
        for _ in 0..7 {
            controller.tick(Some(&mut mover), &crouch_input, MovementBasis::default(), 0.033);
            assert!(mover.height <= previous);
            assert!(mover.height >= 1.0);
            previous = mover.height;
        }

        assert_eq!(mover.height, 1.0);
        assert!(controller.state().crouch.is_none());
    }

    #[test]
    fn releasing_crouch_stands_back_up() {
        let mut controller = controller();
        let mut mover = RecordingMover::grounded(2.0);
        let hold = MovementInput {
            crouch: ButtonSample::hold(),
            ..Default::default()
        };
        controller.tick(Some(&mut mover), &hold, MovementBasis::default(), 0.5);
        assert!(controller.is_crouching());
        assert_eq!(mover.height, 1.0);

        let release = MovementInput {
            crouch: ButtonSample::release(),
            ..Default::default()
        };
        controller.tick(Some(&mut mover), &release, MovementBasis::default(), 0.5);

        assert!(!controller.is_crouching());
        assert_eq!(mover.height, 2.0);
        assert_eq!(controller.speed(), controller.config().default_speed);
    }

    #[test]
    fn stamina_stays_within_unit_range() {
        let mut controller = controller();
        let mut mover = RecordingMover::grounded(2.0);
        let steps = [0.3, 1.7, 0.01, 4.0, 0.25, 2.5, 0.0, 0.9];

        for (index, dt) in steps.iter().enumerate() {
            if index % 2 == 0 {
                controller.toggle_sprint(Some(&mut mover), true);
            } else {
                controller.toggle_sprint(Some(&mut mover), false);
            }
            controller.stamina_tick(*dt);
            assert!((0.0..=1.0).contains(&controller.stamina()));
        }
    }

    #[test]
    fn exhausting_stamina_forces_sprint_off() {
        let mut controller = controller();
        let mut mover = RecordingMover::grounded(2.0);
        assert!(controller.toggle_sprint(Some(&mut mover), true));
        assert_eq!(controller.stamina(), 1.0);

        let mut exhausted = false;
        for _ in 0..4 {
            exhausted |= controller.stamina_tick(0.5);
        }

        assert!(exhausted);
        assert_eq!(controller.stamina(), 0.0);
        assert!(!controller.is_sprinting());
        assert_eq!(controller.speed(), controller.config().default_speed);
    }

    #[test]
    fn sprint_cannot_restart_on_empty_stamina() {
        let mut controller = controller();
        let mut mover = RecordingMover::grounded(2.0);
        assert!(controller.toggle_sprint(Some(&mut mover), true));
        for _ in 0..4 {
            controller.stamina_tick(0.5);
        }
        assert_eq!(controller.stamina(), 0.0);

        assert!(!controller.toggle_sprint(Some(&mut mover), true));
        assert!(!controller.is_sprinting());
        assert_eq!(controller.speed(), controller.config().default_speed);

        controller.stamina_tick(0.5);
        assert!(controller.stamina() > 0.0);
        assert!(controller.toggle_sprint(Some(&mut mover), true));
    }

    #[test]
    fn modify_gravity_reset_restores_initial_values() {
        let mut controller = controller();
        let gravity = controller.gravity();
        let jump_force = controller.jump_force();

        for scale in [0.25, 0.5, 3.0] {
            let (g, j) = (controller.gravity() * scale, controller.jump_force() * 1.25);
            controller.modify_gravity(Some(g), Some(j));
        }
        assert_ne!(controller.gravity(), gravity);

        controller.modify_gravity(None, None);
        assert_eq!(controller.gravity(), gravity);
        assert_eq!(controller.jump_force(), jump_force);

        controller.modify_gravity(Some(1.0), None);
        assert_eq!(controller.gravity(), gravity);
    }

    #[test]
    fn teleport_disables_collision_around_the_move() {
        let mut controller = controller();
        let mut mover = RecordingMover::grounded(2.0);

        assert!(controller.teleport(Some(&mut mover), Vec3::new(5.0, 2.0, -1.0)));

        assert_eq!(mover.position, Vec3::new(5.0, 2.0, -1.0));
        assert!(mover.detached);
        assert_eq!(mover.enable_history, vec![false, true]);
        assert!(mover.enabled);
    }

    #[test]
    fn missing_mover_degrades_to_no_ops() {
        let mut controller = controller();
        let input = MovementInput {
            jump: ButtonSample::press(),
            sprint: ButtonSample::press(),
            ..Default::default()
        };

        let report = controller.tick(None, &input, MovementBasis::default(), 0.1);

        assert!(!report.jumped);
        assert!(!controller.toggle_sprint(None, true));
        assert!(!controller.toggle_crouch(None, true));
        assert!(!controller.teleport(None, Vec3::ONE));
        assert_eq!(controller.vertical_velocity(), 0.0);
    }
}

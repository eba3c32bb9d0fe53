use super::state::{MovementState, PlayerConfig};

/// Vertical velocity held while grounded so the body stays pressed to the floor
pub const GROUNDED_VERTICAL_VELOCITY: f32 = -2.0;

/// Sensor readings and requests for one state machine step
#[derive(Debug, Clone, Copy, Default)]
pub struct MachineInput {
    /// Result of the grounded check this tick
    pub grounded: bool,
    /// Jump is requested (held or buffered)
    pub jump_requested: bool,
    /// The ledge detector found a grabbable edge this tick
    pub ledge_grabbed: bool,
    /// Tick duration in seconds
    pub dt: f32,
}

/// What happened during one step, for event emission
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepOutcome {
    pub jumped: bool,
    /// The jump request was used or discarded and should be cleared
    pub jump_consumed: bool,
    /// Downward speed at touchdown, when the character landed this step
    pub landed: Option<f32>,
    pub grabbed_ledge: bool,
    pub released_ledge: bool,
    pub free_fall_started: bool,
}

/// Grounded / airborne / hanging transitions with gravity and jump integration.
///
/// Timers count down in simulation time and never drop below zero.
#[derive(Debug, Clone)]
pub struct MovementStateMachine {
    state: MovementState,
    vertical_velocity: f32,
    jump_timeout_remaining: f32,
    fall_timeout_remaining: f32,
}

impl MovementStateMachine {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            state: MovementState::Grounded,
            vertical_velocity: 0.0,
            jump_timeout_remaining: config.jump_timeout,
            fall_timeout_remaining: config.fall_timeout,
        }
    }

    pub fn state(&self) -> MovementState {
        self.state
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    pub fn jump_timeout_remaining(&self) -> f32 {
        self.jump_timeout_remaining
    }

    pub fn fall_timeout_remaining(&self) -> f32 {
        self.fall_timeout_remaining
    }

    /// Airborne long enough that the fall animation should play
    pub fn is_free_falling(&self) -> bool {
        self.state == MovementState::Airborne && self.fall_timeout_remaining <= 0.0
    }

    /// Ledges are only grabbed while falling, never on the rising arc of a jump
    pub fn can_grab_ledge(&self) -> bool {
        self.state == MovementState::Airborne && self.vertical_velocity < 0.0
    }

    /// Places the machine mid-air with the given vertical velocity.
    pub fn launch(&mut self, vertical_velocity: f32, config: &PlayerConfig) {
        self.state = MovementState::Airborne;
        self.vertical_velocity = vertical_velocity;
        self.jump_timeout_remaining = config.jump_timeout;
    }

    /// Advances the machine by one tick.
    pub fn step(&mut self, input: MachineInput, config: &PlayerConfig) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        if input.dt <= 0.0 {
            return outcome;
        }
        let dt = input.dt;
        let was_free_falling = self.is_free_falling();

        // Sensor driven transitions
        match self.state {
            MovementState::Airborne if input.ledge_grabbed => {
                self.state = MovementState::Hanging;
                self.vertical_velocity = 0.0;
                outcome.grabbed_ledge = true;
            }
            MovementState::Airborne if input.grounded && self.vertical_velocity <= 0.0 => {
                self.state = MovementState::Grounded;
                outcome.landed = Some(-self.vertical_velocity);
            }
            MovementState::Grounded if !input.grounded => {
                self.state = MovementState::Airborne;
            }
            _ => {}
        }

        match self.state {
            MovementState::Grounded | MovementState::Hanging => {
                self.fall_timeout_remaining = config.fall_timeout;

                if self.state == MovementState::Grounded && self.vertical_velocity < 0.0 {
                    self.vertical_velocity = GROUNDED_VERTICAL_VELOCITY;
                }

                let hanging = self.state == MovementState::Hanging;
                if input.jump_requested && (hanging || self.jump_timeout_remaining <= 0.0) {
                    self.launch(config.jump_launch_velocity(), config);
                    outcome.jumped = true;
                    outcome.jump_consumed = true;
                    outcome.released_ledge = hanging;
                } else {
                    self.jump_timeout_remaining = (self.jump_timeout_remaining - dt).max(0.0);
                }
            }
            MovementState::Airborne => {
                self.jump_timeout_remaining = config.jump_timeout;

                self.fall_timeout_remaining = (self.fall_timeout_remaining - dt).max(0.0);

                // No jumping mid-air
                outcome.jump_consumed = input.jump_requested;

                self.vertical_velocity = (self.vertical_velocity + config.gravity * dt)
                    .max(-config.terminal_velocity);
            }
        }

        outcome.free_fall_started = !was_free_falling && self.is_free_falling();
        outcome
    }
}

//! Abstract action events and per-tick action state.
//!
//! The simulation never sees keyboards or mice. The host translates raw
//! device input into [`ActionEvent`]s and feeds them in; [`ActionState`]
//! accumulates them so gameplay code reads one coherent view per tick.

use glam::Vec2;

/// A single abstracted input action from the host.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionEvent {
    /// Movement axes: x = strafe (right positive), y = forward (positive).
    /// Values outside [-1, 1] are clamped.
    Move(Vec2),
    /// Look delta in radians: x = yaw, y = pitch.
    Look(Vec2),
    /// Fire trigger state changed.
    Fire { held: bool },
    Jump,
    Sprint { held: bool },
    Reload,
    /// Purchase request by catalog name. Unknown names are ignored by the
    /// simulation, matching the no-op policy for malformed actions.
    Buy { item: String },
    Plant,
    Defuse { held: bool },
    /// Weapon slot selection, 1..=6.
    SelectSlot(u8),
    ToggleScoreboard,
    ToggleMap,
}

/// Accumulated action state for the current tick.
///
/// Held flags persist across ticks; one-shot presses and accumulated
/// deltas are cleared by [`ActionState::begin_tick`].
#[derive(Debug, Default, Clone)]
pub struct ActionState {
    move_axes: Vec2,
    look_delta: Vec2,
    accumulated_look: Vec2,

    fire_held: bool,
    sprint_held: bool,
    defuse_held: bool,

    jump_pressed: bool,
    reload_pressed: bool,
    plant_pressed: bool,
    scoreboard_toggled: bool,
    map_toggled: bool,

    selected_slot: Option<u8>,
    buy_requests: Vec<String>,
}

impl ActionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-tick state. Call at the start of each simulation tick,
    /// before applying newly queued events.
    pub fn begin_tick(&mut self) {
        self.jump_pressed = false;
        self.reload_pressed = false;
        self.plant_pressed = false;
        self.scoreboard_toggled = false;
        self.map_toggled = false;
        self.selected_slot = None;
        self.buy_requests.clear();
        self.look_delta = self.accumulated_look;
        self.accumulated_look = Vec2::ZERO;
    }

    /// Fold one event into the state.
    pub fn process(&mut self, event: ActionEvent) {
        match event {
            ActionEvent::Move(axes) => {
                self.move_axes = axes.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
            }
            ActionEvent::Look(delta) => {
                self.accumulated_look += delta;
            }
            ActionEvent::Fire { held } => self.fire_held = held,
            ActionEvent::Jump => self.jump_pressed = true,
            ActionEvent::Sprint { held } => self.sprint_held = held,
            ActionEvent::Reload => self.reload_pressed = true,
            ActionEvent::Buy { item } => self.buy_requests.push(item),
            ActionEvent::Plant => self.plant_pressed = true,
            ActionEvent::Defuse { held } => self.defuse_held = held,
            ActionEvent::SelectSlot(slot) => {
                if (1..=6).contains(&slot) {
                    self.selected_slot = Some(slot);
                }
            }
            ActionEvent::ToggleScoreboard => self.scoreboard_toggled = true,
            ActionEvent::ToggleMap => self.map_toggled = true,
        }
    }

    // Query methods

    /// Movement axes, normalized so diagonals are not faster.
    pub fn movement(&self) -> Vec2 {
        if self.move_axes.length_squared() > 1.0 {
            self.move_axes.normalize()
        } else {
            self.move_axes
        }
    }

    /// Look delta accumulated since the previous tick, in radians.
    pub fn look_delta(&self) -> Vec2 {
        self.look_delta
    }

    pub fn is_fire_held(&self) -> bool {
        self.fire_held
    }

    pub fn is_sprint_held(&self) -> bool {
        self.sprint_held
    }

    pub fn is_defuse_held(&self) -> bool {
        self.defuse_held
    }

    pub fn is_jump_pressed(&self) -> bool {
        self.jump_pressed
    }

    pub fn is_reload_pressed(&self) -> bool {
        self.reload_pressed
    }

    pub fn is_plant_pressed(&self) -> bool {
        self.plant_pressed
    }

    pub fn was_scoreboard_toggled(&self) -> bool {
        self.scoreboard_toggled
    }

    pub fn was_map_toggled(&self) -> bool {
        self.map_toggled
    }

    /// Slot selected this tick (1..=6), if any.
    pub fn selected_slot(&self) -> Option<u8> {
        self.selected_slot
    }

    /// Purchase requests queued this tick, in arrival order.
    pub fn buy_requests(&self) -> &[String] {
        &self.buy_requests
    }

    /// Drop all held state, e.g. when the controlled entity dies.
    pub fn release_held(&mut self) {
        self.fire_held = false;
        self.sprint_held = false;
        self.defuse_held = false;
        self.move_axes = Vec2::ZERO;
    }
}

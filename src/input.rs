use std::collections::HashMap;

use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::orchestrator::CameraAction;

/// Radians of heading or pitch per dragged pixel
pub const DRAG_SENSITIVITY: f32 = 0.01;
/// Radius fraction per wheel line
pub const WHEEL_ZOOM: f32 = 0.1;
/// Pixels treated as one wheel line on touchpads
const PIXELS_PER_LINE: f64 = 40.0;

/// What a key press asks the application to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Camera(CameraAction),
    ResetCamera,
    Exit,
}

/// Key to command table, remappable at runtime
#[derive(Debug, Clone)]
pub struct Bindings {
    keys: HashMap<KeyCode, Command>,
}

impl Default for Bindings {
    fn default() -> Self {
        use CameraAction::*;

        let keys = HashMap::from([
            (KeyCode::KeyW, Command::Camera(MoveForward(0.045))),
            (KeyCode::KeyS, Command::Camera(MoveForward(-0.045))),
            (KeyCode::KeyA, Command::Camera(Strafe(-0.025))),
            (KeyCode::KeyD, Command::Camera(Strafe(0.025))),
            (KeyCode::ArrowLeft, Command::Camera(ChangeHeading(-0.017))),
            (KeyCode::ArrowRight, Command::Camera(ChangeHeading(0.017))),
            (KeyCode::ArrowUp, Command::Camera(ChangePitch(0.017))),
            (KeyCode::ArrowDown, Command::Camera(ChangePitch(-0.017))),
            (KeyCode::KeyQ, Command::Camera(ChangeAltitude(-0.05))),
            (KeyCode::KeyE, Command::Camera(ChangeAltitude(0.05))),
            (KeyCode::PageUp, Command::Camera(ChangeRadius(-0.1))),
            (KeyCode::PageDown, Command::Camera(ChangeRadius(0.1))),
            (KeyCode::BracketLeft, Command::Camera(ChangeAperture(-0.01))),
            (KeyCode::BracketRight, Command::Camera(ChangeAperture(0.01))),
            (KeyCode::Minus, Command::Camera(ChangeFocalDistance(-0.1))),
            (KeyCode::Equal, Command::Camera(ChangeFocalDistance(0.1))),
            (KeyCode::Space, Command::ResetCamera),
            (KeyCode::Escape, Command::Exit),
        ]);

        Self { keys }
    }
}

impl Bindings {
    pub fn empty() -> Self {
        Self {
            keys: HashMap::new(),
        }
    }

    /// Binds `key`, returning the command it replaced.
    pub fn bind(&mut self, key: KeyCode, command: Command) -> Option<Command> {
        self.keys.insert(key, command)
    }

    pub fn unbind(&mut self, key: KeyCode) -> Option<Command> {
        self.keys.remove(&key)
    }

    pub fn command_for(&self, key: KeyCode) -> Option<Command> {
        self.keys.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Turns window events into commands.
///
/// Keys fire on press and on every auto-repeat. A drag rotates (left button),
/// raises the pivot (middle) or zooms (right), measured from the last cursor position.
#[derive(Debug, Clone, Default)]
pub struct InputMapper {
    bindings: Bindings,
    active_button: Option<MouseButton>,
    last_cursor: Option<(f64, f64)>,
}

impl InputMapper {
    pub fn new(bindings: Bindings) -> Self {
        Self {
            bindings,
            active_button: None,
            last_cursor: None,
        }
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn active_button(&self) -> Option<MouseButton> {
        self.active_button
    }

    pub fn key_pressed(&self, key: KeyCode) -> Option<Command> {
        self.bindings.command_for(key)
    }

    pub fn mouse_input(&mut self, state: ElementState, button: MouseButton) {
        match state {
            ElementState::Pressed => self.active_button = Some(button),
            ElementState::Released if self.active_button == Some(button) => {
                self.active_button = None
            }
            ElementState::Released => {}
        }
    }

    /// Records the cursor and returns the drag actions for the movement, if any.
    pub fn cursor_moved(&mut self, x: f64, y: f64) -> Vec<CameraAction> {
        let previous = self.last_cursor.replace((x, y));

        let (Some((last_x, last_y)), Some(button)) = (previous, self.active_button) else {
            return Vec::new();
        };

        let dx = (last_x - x) as f32;
        let dy = (last_y - y) as f32;
        if dx == 0.0 && dy == 0.0 {
            return Vec::new();
        }

        match button {
            MouseButton::Left => vec![
                CameraAction::ChangeHeading(dx * DRAG_SENSITIVITY),
                CameraAction::ChangePitch(-dy * DRAG_SENSITIVITY),
            ],
            MouseButton::Middle => vec![CameraAction::ChangeAltitude(-dy * DRAG_SENSITIVITY)],
            MouseButton::Right => vec![CameraAction::ChangeRadius(-dy * DRAG_SENSITIVITY)],
            _ => Vec::new(),
        }
    }

    /// Forgets the cursor so re-entering the window does not register as a drag.
    pub fn cursor_left(&mut self) {
        self.last_cursor = None;
    }

    /// Scrolling up zooms in.
    pub fn mouse_wheel(&self, delta: MouseScrollDelta) -> Option<CameraAction> {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(position) => (position.y / PIXELS_PER_LINE) as f32,
        };
        (lines != 0.0).then(|| CameraAction::ChangeRadius(-lines * WHEEL_ZOOM))
    }

    pub fn process_event(&mut self, event: &WindowEvent) -> Vec<Command> {
        match event {
            WindowEvent::KeyboardInput { event, .. } if event.state.is_pressed() => {
                match event.physical_key {
                    PhysicalKey::Code(key) => self.key_pressed(key).into_iter().collect(),
                    PhysicalKey::Unidentified(_) => Vec::new(),
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.mouse_input(*state, *button);
                Vec::new()
            }
            WindowEvent::CursorMoved { position, .. } => self
                .cursor_moved(position.x, position.y)
                .into_iter()
                .map(Command::Camera)
                .collect(),
            WindowEvent::CursorLeft { .. } => {
                self.cursor_left();
                Vec::new()
            }
            WindowEvent::MouseWheel { delta, .. } => self
                .mouse_wheel(*delta)
                .map(Command::Camera)
                .into_iter()
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Tracks an event the overlay consumed without producing commands.
    ///
    /// A drag released over the overlay must still end here, and the cursor keeps
    /// being followed so the drag does not jump when it leaves the overlay.
    pub fn observe_consumed(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput {
                state: ElementState::Released,
                button,
                ..
            } => self.mouse_input(ElementState::Released, *button),
            WindowEvent::CursorMoved { position, .. } => {
                self.last_cursor = Some((position.x, position.y));
            }
            WindowEvent::CursorLeft { .. } => self.cursor_left(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;
    use winit::event::DeviceId;

    fn device() -> DeviceId {
        unsafe { DeviceId::dummy() }
    }

    fn mouse(state: ElementState, button: MouseButton) -> WindowEvent {
        WindowEvent::MouseInput {
            device_id: device(),
            state,
            button,
        }
    }

    fn cursor(x: f64, y: f64) -> WindowEvent {
        WindowEvent::CursorMoved {
            device_id: device(),
            position: PhysicalPosition::new(x, y),
        }
    }

    fn dragging(button: MouseButton) -> InputMapper {
        let mut mapper = InputMapper::default();
        mapper.cursor_moved(100.0, 100.0);
        mapper.mouse_input(ElementState::Pressed, button);
        mapper
    }

    #[test]
    fn test_default_bindings() {
        let bindings = Bindings::default();
        assert_eq!(
            bindings.command_for(KeyCode::KeyW),
            Some(Command::Camera(CameraAction::MoveForward(0.045)))
        );
        assert_eq!(
            bindings.command_for(KeyCode::KeyA),
            Some(Command::Camera(CameraAction::Strafe(-0.025)))
        );
        assert_eq!(bindings.command_for(KeyCode::Space), Some(Command::ResetCamera));
        assert_eq!(bindings.command_for(KeyCode::Escape), Some(Command::Exit));
        assert_eq!(bindings.command_for(KeyCode::KeyZ), None);
    }

    #[test]
    fn test_rebind() {
        let mut bindings = Bindings::default();
        let previous = bindings.bind(KeyCode::KeyW, Command::Exit);
        assert_eq!(previous, Some(Command::Camera(CameraAction::MoveForward(0.045))));
        assert_eq!(bindings.command_for(KeyCode::KeyW), Some(Command::Exit));
        bindings.unbind(KeyCode::KeyW);
        assert_eq!(bindings.command_for(KeyCode::KeyW), None);
    }

    #[test]
    fn test_left_drag_rotates() {
        let mut mapper = dragging(MouseButton::Left);
        let actions = mapper.cursor_moved(90.0, 104.0);
        assert_eq!(
            actions,
            vec![
                CameraAction::ChangeHeading(10.0 * DRAG_SENSITIVITY),
                CameraAction::ChangePitch(4.0 * DRAG_SENSITIVITY),
            ]
        );
    }

    #[test]
    fn test_middle_and_right_drag() {
        let mut mapper = dragging(MouseButton::Middle);
        assert_eq!(
            mapper.cursor_moved(100.0, 110.0),
            vec![CameraAction::ChangeAltitude(10.0 * DRAG_SENSITIVITY)]
        );

        let mut mapper = dragging(MouseButton::Right);
        assert_eq!(
            mapper.cursor_moved(100.0, 95.0),
            vec![CameraAction::ChangeRadius(-5.0 * DRAG_SENSITIVITY)]
        );
    }

    #[test]
    fn test_no_drag_without_button() {
        let mut mapper = InputMapper::default();
        mapper.cursor_moved(0.0, 0.0);
        assert!(mapper.cursor_moved(50.0, 50.0).is_empty());

        let mut mapper = dragging(MouseButton::Left);
        mapper.mouse_input(ElementState::Released, MouseButton::Left);
        assert_eq!(mapper.active_button(), None);
        assert!(mapper.cursor_moved(120.0, 80.0).is_empty());
    }

    #[test]
    fn test_wheel_zoom() {
        let mapper = InputMapper::default();
        assert_eq!(
            mapper.mouse_wheel(MouseScrollDelta::LineDelta(0.0, 1.0)),
            Some(CameraAction::ChangeRadius(-WHEEL_ZOOM))
        );
        assert_eq!(mapper.mouse_wheel(MouseScrollDelta::LineDelta(0.0, 0.0)), None);
    }

    #[test]
    fn test_consumed_release_ends_drag() {
        for button in [MouseButton::Left, MouseButton::Middle, MouseButton::Right] {
            let mut mapper = dragging(button);
            mapper.observe_consumed(&mouse(ElementState::Released, button));
            assert_eq!(mapper.active_button(), None, "{button:?}");
            assert!(mapper.process_event(&cursor(80.0, 100.0)).is_empty());
        }
    }

    #[test]
    fn test_consumed_press_does_not_start_drag() {
        let mut mapper = InputMapper::default();
        mapper.process_event(&cursor(100.0, 100.0));
        mapper.observe_consumed(&mouse(ElementState::Pressed, MouseButton::Left));
        assert_eq!(mapper.active_button(), None);
        assert!(mapper.process_event(&cursor(50.0, 100.0)).is_empty());
    }

    #[test]
    fn test_consumed_motion_moves_drag_origin() {
        let mut mapper = dragging(MouseButton::Left);
        mapper.observe_consumed(&cursor(60.0, 100.0));
        assert_eq!(
            mapper.process_event(&cursor(50.0, 100.0)),
            vec![
                Command::Camera(CameraAction::ChangeHeading(10.0 * DRAG_SENSITIVITY)),
                Command::Camera(CameraAction::ChangePitch(0.0)),
            ]
        );
    }
}

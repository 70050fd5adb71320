//! Pointer and keyboard handling: terminal events become garden actions.

use crate::render::Viewport;
use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Water,
    Trim,
    Shield,
}

impl Tool {
    pub fn label(&self) -> &'static str {
        match self {
            Tool::Water => "Water",
            Tool::Trim => "Trim",
            Tool::Shield => "Shield",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Start,
    Move,
    End,
}

/// A pointer gesture in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEvent {
    pub kind: PointerKind,
    pub position: Option<(f32, f32)>,
    pub tool: Tool,
}

/// Keyboard commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Help,
    SelectTool(Tool),
    SkipDay,
    WarpTwoYears,
    HardReset,
    PlantSeed,
}

pub fn action_for_key(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::Help),
        KeyCode::Char('1') => Some(Action::SelectTool(Tool::Water)),
        KeyCode::Char('2') => Some(Action::SelectTool(Tool::Trim)),
        KeyCode::Char('3') => Some(Action::SelectTool(Tool::Shield)),
        KeyCode::Char('s') => Some(Action::SkipDay),
        KeyCode::Char('w') => Some(Action::WarpTwoYears),
        KeyCode::Char('r') => Some(Action::HardReset),
        KeyCode::Char('p') => Some(Action::PlantSeed),
        _ => None,
    }
}

/// Tracks the active tool and whether the left button is held
#[derive(Debug, Default)]
pub struct Pointer {
    pub tool: Tool,
    down: bool,
}

impl Pointer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate a mouse event; drags only count while the button is held
    pub fn translate(&mut self, event: MouseEvent, viewport: &Viewport) -> Option<InputEvent> {
        let position = || viewport.to_world(event.column, event.row);
        let kind = match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.down = true;
                PointerKind::Start
            }
            MouseEventKind::Drag(MouseButton::Left) if self.down => PointerKind::Move,
            MouseEventKind::Up(MouseButton::Left) if self.down => {
                self.down = false;
                return Some(InputEvent {
                    kind: PointerKind::End,
                    position: None,
                    tool: self.tool,
                });
            }
            _ => return None,
        };

        Some(InputEvent {
            kind,
            position: Some(position()),
            tool: self.tool,
        })
    }
}

use crossterm::event::{KeyCode, KeyEvent};

use crate::keymap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Answer {
    Yes,
    No,
}

impl Answer {
    fn flipped(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfirmSignal {
    Pending,
    Answered(Answer),
    Back,
}

/// A Yes/No question with a highlighted answer. Space and the arrow keys move
/// the highlight, Enter submits it, `y` and `n` answer at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Confirm {
    highlighted: Answer,
}

impl Confirm {
    pub(crate) fn defaulting_to(answer: Answer) -> Self {
        Self {
            highlighted: answer,
        }
    }

    pub(crate) fn highlighted(&self) -> Answer {
        self.highlighted
    }

    pub(crate) fn on_key(&mut self, key: KeyEvent) -> ConfirmSignal {
        match key.code {
            KeyCode::Char('y') => ConfirmSignal::Answered(Answer::Yes),
            KeyCode::Char('n') => ConfirmSignal::Answered(Answer::No),
            KeyCode::Left | KeyCode::Right => {
                self.highlighted = self.highlighted.flipped();
                ConfirmSignal::Pending
            }
            _ if keymap::is_back(key) => ConfirmSignal::Back,
            _ if keymap::is_confirm(key) => ConfirmSignal::Answered(self.highlighted),
            _ if keymap::is_toggle(key) => {
                self.highlighted = self.highlighted.flipped();
                ConfirmSignal::Pending
            }
            _ => ConfirmSignal::Pending,
        }
    }
}

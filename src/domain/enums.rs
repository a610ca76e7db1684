use serde::{Deserialize, Serialize};

/// AM/PM half of a 12-hour clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Meridiem {
    AM,
    PM,
}

impl Meridiem {
    /// Parse "AM"/"PM" (case-insensitive)
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_uppercase().as_str() {
            "AM" => Some(Self::AM),
            "PM" => Some(Self::PM),
            _ => None,
        }
    }

    pub fn to_tag(&self) -> &'static str {
        match self {
            Self::AM => "AM",
            Self::PM => "PM",
        }
    }

    /// Flip AM <-> PM (the format toggle in the alarm form)
    pub fn toggled(&self) -> Self {
        match self {
            Self::AM => Self::PM,
            Self::PM => Self::AM,
        }
    }
}

/// Mouse button used by the auto-clicker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickButton {
    Left,
    Right,
    Middle,
}

impl ClickButton {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
            Self::Middle => "Middle",
        }
    }

    /// Cycle Left -> Right -> Middle -> Left
    pub fn next(&self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Middle,
            Self::Middle => Self::Left,
        }
    }
}

/// Single or double click per interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickKind {
    Single,
    Double,
}

impl ClickKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Double => "Double",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Single => Self::Double,
            Self::Double => Self::Single,
        }
    }
}

/// UI mode for the application. One enumerated value instead of
/// parallel modal-visibility flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    EditingNote,
    AlarmForm,
    RingtonePrompt,
    TimerEdit,
    Ringing,
    ConfirmClear,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meridiem_from_tag() {
        assert_eq!(Meridiem::from_tag("AM"), Some(Meridiem::AM));
        assert_eq!(Meridiem::from_tag("pm"), Some(Meridiem::PM));
        assert_eq!(Meridiem::from_tag("XX"), None);
    }

    #[test]
    fn test_meridiem_toggled() {
        assert_eq!(Meridiem::AM.toggled(), Meridiem::PM);
        assert_eq!(Meridiem::PM.toggled(), Meridiem::AM);
    }

    #[test]
    fn test_click_button_cycle() {
        assert_eq!(ClickButton::Left.next(), ClickButton::Right);
        assert_eq!(ClickButton::Right.next(), ClickButton::Middle);
        assert_eq!(ClickButton::Middle.next(), ClickButton::Left);
    }
}

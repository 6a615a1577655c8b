/// Most lines a message window shows at once.
pub const MAX_LINES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageOptions {
    pub transparent: bool,
    /// 0 top, 1 middle, 2 bottom.
    pub position: i32,
    pub fixed_position: bool,
    pub continue_events: bool,
}

impl Default for MessageOptions {
    fn default() -> MessageOptions {
        MessageOptions {
            transparent: false,
            position: 2,
            fixed_position: false,
            continue_events: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Face {
    pub name: String,
    pub index: i32,
    pub right: bool,
    pub flipped: bool,
}

/// ## Message window contents
///
/// The interpreter fills this in and sets `waiting`. The front end shows
/// it, writes `choice_result` or the number variable, then calls
/// `close`.

#[derive(Debug, Clone, Default)]
pub struct Message {
    pub texts: Vec<String>,
    /// Line where the choices begin, if the message carries choices.
    pub choice_start: Option<usize>,
    pub choice_max: usize,
    pub choice_disabled: Vec<bool>,
    /// 0 disallows cancel, `1..=4` picks that choice, 5 routes to the
    /// cancel branch, whose result is 4.
    pub choice_cancel_type: i32,
    pub choice_result: i32,
    pub num_input_start: Option<usize>,
    pub num_input_variable: i32,
    pub num_input_digits: i32,
    pub waiting: bool,
    pub visible: bool,
    pub options: MessageOptions,
    pub face: Face,
}

impl Message {
    pub fn clear(&mut self) {
        self.texts.clear();
        self.choice_start = None;
        self.choice_max = 0;
        self.choice_disabled.clear();
        self.choice_cancel_type = 0;
        self.num_input_start = None;
        self.num_input_variable = 0;
        self.num_input_digits = 0;
    }

    pub fn push_line<S: Into<String>>(&mut self, line: S) {
        self.texts.push(line.into());
    }

    pub fn has_choices(&self) -> bool {
        self.choice_start.is_some()
    }

    pub fn set_choices(&mut self, choices: &[String], cancel_type: i32) {
        self.choice_start = Some(self.texts.len());
        self.choice_max = choices.len();
        self.choice_disabled = vec![false; choices.len()];
        self.choice_cancel_type = cancel_type;
        for choice in choices {
            self.texts.push(choice.clone());
        }
    }

    pub fn choices(&self) -> &[String] {
        match self.choice_start {
            Some(start) => self.texts.get(start..).unwrap_or(&[]),
            None => &[],
        }
    }

    pub fn set_number_input(&mut self, variable: i32, digits: i32) {
        self.num_input_start = Some(self.texts.len());
        self.num_input_variable = variable;
        self.num_input_digits = digits;
    }

    /// Shown and no longer blocking events.
    pub fn close(&mut self) {
        self.waiting = false;
        self.visible = false;
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choices_follow_text() {
        let mut m = Message::default();
        m.push_line("Which?");
        m.set_choices(&["Yes".to_string(), "No".to_string()], 2);
        assert_eq!(m.choice_start, Some(1));
        assert_eq!(m.choices(), &["Yes".to_string(), "No".to_string()]);
        m.close();
        assert!(m.texts.is_empty());
        assert!(!m.has_choices());
    }
}

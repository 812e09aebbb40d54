use serde::{Deserialize, Serialize};

use crate::dashboard::{DEPARTMENTS, SEMESTERS};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatPanel {
    pub open: bool,
    pub maximized: bool,
}

/// Everything the page needs besides the static figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub theme: Theme,
    pub semester: String,
    pub department: String,
    pub chat: ChatPanel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum ViewAction {
    ToggleTheme,
    SelectSemester(String),
    SelectDepartment(String),
    OpenChat,
    ToggleChat,
    CloseChat,
    ToggleMaximized,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            theme: Theme::Light,
            semester: "Semester 3".to_string(),
            department: "Computer Science Engineering".to_string(),
            chat: ChatPanel::default(),
        }
    }
}

impl ViewState {
    pub fn apply(&self, action: ViewAction) -> AppResult<ViewState> {
        let mut next = self.clone();
        match action {
            ViewAction::ToggleTheme => next.theme = self.theme.toggled(),
            ViewAction::SelectSemester(semester) => {
                next.semester = pick("semester", &SEMESTERS, semester)?;
            }
            ViewAction::SelectDepartment(department) => {
                next.department = pick("department", &DEPARTMENTS, department)?;
            }
            ViewAction::OpenChat => next.chat.open = true,
            ViewAction::ToggleChat => {
                next.chat.open = !self.chat.open;
                if !next.chat.open {
                    next.chat.maximized = false;
                }
            }
            ViewAction::CloseChat => next.chat = ChatPanel::default(),
            ViewAction::ToggleMaximized => {
                if self.chat.open {
                    next.chat.maximized = !self.chat.maximized;
                }
            }
        }
        Ok(next)
    }

    pub fn is_dark(&self) -> bool {
        self.theme == Theme::Dark
    }
}

fn pick(kind: &'static str, options: &[&str], value: String) -> AppResult<String> {
    if options.contains(&value.as_str()) {
        Ok(value)
    } else {
        Err(AppError::UnknownOption { kind, value })
    }
}

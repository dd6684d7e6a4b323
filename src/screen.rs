//! Screens and their routes.

use std::fmt;

/// The three screens of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Landing page listing the two actions.
    Home,
    /// Student enrollment with webcam capture.
    AddStudent,
    /// Attendance marking from a group photograph.
    MarkAttendance,
}

impl Screen {
    pub const ALL: [Screen; 3] = [Screen::Home, Screen::AddStudent, Screen::MarkAttendance];

    /// Actions offered on the landing page, in display order.
    pub const ACTIONS: [Screen; 2] = [Screen::AddStudent, Screen::MarkAttendance];

    pub fn route(self) -> &'static str {
        match self {
            Screen::Home => "/",
            Screen::AddStudent => "/add_student",
            Screen::MarkAttendance => "/mark_attendance",
        }
    }

    /// Resolves a route path, ignoring a trailing slash.
    pub fn from_route(route: &str) -> Option<Self> {
        let route = match route.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        Self::ALL.into_iter().find(|s| s.route() == route)
    }

    pub fn title(self) -> &'static str {
        match self {
            Screen::Home => "Attendance System",
            Screen::AddStudent => "Add Student",
            Screen::MarkAttendance => "Mark Attendance",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Screen::Home => "Enroll students and mark attendance from group photos.",
            Screen::AddStudent => {
                "Add new students to the attendance system by providing their details."
            }
            Screen::MarkAttendance => {
                "Mark attendance for the students in your class or session."
            }
        }
    }

    /// CLI subcommand that opens this screen.
    pub fn command(self) -> &'static str {
        match self {
            Screen::Home => "home",
            Screen::AddStudent => "enroll",
            Screen::MarkAttendance => "mark",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Renders the landing page as plain text.
pub fn render_home() -> String {
    let mut out = format!("{}\n\n", Screen::Home.title());
    for screen in Screen::ACTIONS {
        out.push_str(&format!(
            "  {:<16} {}\n  {:<16} run `attendance-client {}`\n\n",
            screen.title(),
            screen.description(),
            "",
            screen.command()
        ));
    }
    out
}

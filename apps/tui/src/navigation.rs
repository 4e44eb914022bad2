//! Navigation and route management

/// Page of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Workflows,
    Agents,
    Steps,
    Executions,
    ContentReview,
}

impl Route {
    /// Sidebar order; the number key of a route is its index plus one.
    pub const ALL: [Self; 6] =
        [Self::Home, Self::Workflows, Self::Agents, Self::Steps, Self::Executions, Self::ContentReview];

    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Workflows => "/workflows",
            Self::Agents => "/agents",
            Self::Steps => "/steps",
            Self::Executions => "/executions",
            Self::ContentReview => "/content-reviews",
        }
    }

    /// Resolves a path; a trailing slash is ignored.
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let path = if trimmed.is_empty() { "/" } else { trimmed };
        Self::ALL.into_iter().find(|route| route.path() == path)
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Workflows => "Workflows",
            Self::Agents => "Agents",
            Self::Steps => "Steps",
            Self::Executions => "Executions",
            Self::ContentReview => "Content Review",
        }
    }

    /// Route bound to a number key (`1`..`6`).
    pub fn from_digit(digit: char) -> Option<Self> {
        let index = digit.to_digit(10)? as usize;
        index.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|r| *r == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Navigation state
#[derive(Debug)]
pub struct Navigation {
    current: Route,
}

impl Navigation {
    pub fn new() -> Self {
        Self { current: Route::Home }
    }

    pub fn current(&self) -> Route {
        self.current
    }

    pub fn set_route(&mut self, route: Route) {
        self.current = route;
    }
}

impl Default for Navigation {
    fn default() -> Self {
        Self::new()
    }
}

//! Navigation between the gallery and the review screen.

/// A screen and its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Gallery. `is_load: Some(true)` asks it to reload on arrival.
    Home { is_load: Option<bool> },
    /// Disabled review.
    Disabled,
}

impl Route {
    #[must_use]
    pub const fn home() -> Self {
        Self::Home { is_load: None }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Home { .. } => "Home",
            Self::Disabled => "Disabled",
        }
    }
}

/// Route history. Never empty.
#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    /// Start on the gallery.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stack: vec![Route::home()],
        }
    }

    #[must_use]
    pub fn current(&self) -> &Route {
        // `stack` always holds at least one route.
        &self.stack[self.stack.len() - 1]
    }

    /// Push a route.
    pub fn navigate(&mut self, route: Route) {
        tracing::debug!(route = route.name(), "navigate");
        self.stack.push(route);
    }

    /// Pop back one route. Returns `false` at the root.
    pub fn back(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    /// Replace the whole history with a single route.
    pub fn reset(&mut self, route: Route) {
        tracing::debug!(route = route.name(), "reset navigation");
        self.stack.clear();
        self.stack.push(route);
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Consume the reload flag of the current home route.
    ///
    /// Returns `true` once per `Home { is_load: Some(true) }` arrival.
    pub fn take_reload(&mut self) -> bool {
        let last = self.stack.len() - 1;
        match &mut self.stack[last] {
            Route::Home { is_load } => is_load.take().unwrap_or(false),
            Route::Disabled => false,
        }
    }
}

use std::fmt;

use uuid::Uuid;

/// Logical destinations of the directory surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// `/`
    List,
    /// `/employee/new`
    Create,
    /// `/employee/:id/edit`
    Edit(Uuid),
    NotFound(String),
}

impl Route {
    /// Resolves a path. Query strings, fragments and trailing slashes are
    /// ignored; an edit path whose id is not a UUID is not found.
    pub fn parse(path: &str) -> Route {
        let clean = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let segments: Vec<&str> = clean.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::List,
            ["employee", "new"] => Route::Create,
            ["employee", id, "edit"] => match Uuid::parse_str(id) {
                Ok(id) => Route::Edit(id),
                Err(_) => Route::NotFound(path.to_string()),
            },
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::List => "/".to_string(),
            Route::Create => "/employee/new".to_string(),
            Route::Edit(id) => format!("/employee/{id}/edit"),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// The record addressed by the route, if any.
    pub fn record_id(&self) -> Option<Uuid> {
        match self {
            Route::Edit(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

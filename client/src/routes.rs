//! Console locations and the authentication guard in front of them.

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::session::SessionEvent;
use crate::storage::DurableStorage;

pub const ROOT: &str = "/";
pub const LOGIN: &str = "/user/login";
pub const REGISTER: &str = "/user/register";
pub const STUDENT_REGISTER: &str = "/user/student-register";
pub const DASHBOARD: &str = "/dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub name: &'static str,
    pub requires_auth: bool,
}

const fn route(path: &'static str, name: &'static str, requires_auth: bool) -> Route {
    Route {
        path,
        name,
        requires_auth,
    }
}

/// Every location the console knows. Dashboard children inherit its
/// authentication requirement.
pub const ROUTES: &[Route] = &[
    route(ROOT, "Root", false),
    route(LOGIN, "Login", false),
    route(REGISTER, "Register", false),
    route(STUDENT_REGISTER, "StudentRegister", false),
    route(DASHBOARD, "Dashboard", true),
    route("/dashboard/course-selection", "CourseSelection", true),
    route("/dashboard/course-management", "CourseManagement", true),
    route("/dashboard/major-management", "MajorManagement", true),
    route("/dashboard/account-management", "AccountManagement", true),
    route("/dashboard/enrollment-query", "EnrollmentQuery", true),
];

pub fn find(path: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|r| r.path == path)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Allow(String),
    Redirect(String),
}

impl Navigation {
    pub fn target(&self) -> &str {
        match self {
            Self::Allow(path) | Self::Redirect(path) => path,
        }
    }
}

/// Decide where an attempt to open `path` actually lands.
///
/// Unknown paths pass through untouched.
pub fn guard<S: DurableStorage + ?Sized>(path: &str, storage: &S) -> Navigation {
    if path == ROOT {
        return Navigation::Redirect(LOGIN.to_string());
    }

    let requires_auth = find(path).is_some_and(|r| r.requires_auth);
    if requires_auth && storage.token().is_none() {
        debug!("No token for {}, redirecting to login", path);
        return Navigation::Redirect(LOGIN.to_string());
    }

    Navigation::Allow(path.to_string())
}

// ---------------------------------------------------------------------------
// Navigator
// ---------------------------------------------------------------------------

pub struct Navigator<S: DurableStorage + ?Sized> {
    storage: std::sync::Arc<S>,
    location: String,
}

impl<S: DurableStorage + ?Sized> Navigator<S> {
    /// Starts at `/`, which the guard immediately turns into the login page.
    pub fn new(storage: std::sync::Arc<S>) -> Self {
        let location = guard(ROOT, storage.as_ref()).target().to_string();
        Self { storage, location }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn push(&mut self, path: &str) -> Navigation {
        let navigation = guard(path, self.storage.as_ref());
        if let Navigation::Redirect(to) = &navigation {
            debug!("Navigation to {} redirected to {}", path, to);
        }
        self.location = navigation.target().to_string();
        navigation
    }

    /// Send the console back to login every time the session ends.
    /// Returns once the sender side is gone.
    pub async fn follow(&mut self, mut events: broadcast::Receiver<SessionEvent>) {
        loop {
            match events.recv().await {
                Ok(SessionEvent::Ended) => {
                    info!("Session ended, returning to {}", LOGIN);
                    self.location = LOGIN.to_string();
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!("Navigator missed {} session events", missed);
                    self.location = LOGIN.to_string();
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, TOKEN_KEY};
    use std::sync::Arc;

    fn storage_with_token(token: Option<&str>) -> Arc<MemoryStorage> {
        let storage = Arc::new(MemoryStorage::new());
        if let Some(t) = token {
            storage.set(TOKEN_KEY, t).unwrap();
        }
        storage
    }

    #[test]
    fn root_redirects_to_login() {
        let storage = storage_with_token(Some("t"));
        assert_eq!(
            guard("/", storage.as_ref()),
            Navigation::Redirect(LOGIN.into())
        );
    }

    #[test]
    fn dashboard_children_need_a_token() {
        let anonymous = storage_with_token(None);
        let signed_in = storage_with_token(Some("t"));

        for route in ROUTES.iter().filter(|r| r.path.starts_with(DASHBOARD)) {
            assert!(route.requires_auth, "{} should require auth", route.path);
            assert_eq!(
                guard(route.path, anonymous.as_ref()),
                Navigation::Redirect(LOGIN.into())
            );
            assert_eq!(
                guard(route.path, signed_in.as_ref()),
                Navigation::Allow(route.path.into())
            );
        }
    }

    #[test]
    fn empty_token_counts_as_absent() {
        let storage = storage_with_token(Some(""));
        assert!(matches!(
            guard(DASHBOARD, storage.as_ref()),
            Navigation::Redirect(_)
        ));
    }

    #[test]
    fn public_and_unknown_paths_pass() {
        let storage = storage_with_token(None);
        for path in [LOGIN, REGISTER, STUDENT_REGISTER, "/nowhere"] {
            assert_eq!(guard(path, storage.as_ref()), Navigation::Allow(path.into()));
        }
    }

    #[test]
    fn navigator_starts_on_login_and_applies_guard() {
        let storage = storage_with_token(None);
        let mut nav = Navigator::new(storage.clone());
        assert_eq!(nav.location(), LOGIN);

        nav.push("/dashboard/course-selection");
        assert_eq!(nav.location(), LOGIN);

        storage.set(TOKEN_KEY, "t").unwrap();
        let nav_result = nav.push("/dashboard/course-selection");
        assert_eq!(nav_result, Navigation::Allow("/dashboard/course-selection".into()));
        assert_eq!(nav.location(), "/dashboard/course-selection");
    }

    #[test]
    fn navigator_works_over_trait_object_storage() {
        let storage: Arc<dyn DurableStorage> = storage_with_token(Some("t"));
        let mut nav = Navigator::new(storage.clone());

        assert_eq!(
            nav.push("/dashboard/major-management"),
            Navigation::Allow("/dashboard/major-management".into())
        );

        storage.remove(TOKEN_KEY).unwrap();
        assert_eq!(
            nav.push("/dashboard/major-management"),
            Navigation::Redirect(LOGIN.into())
        );
        assert_eq!(nav.location(), LOGIN);
    }

    #[tokio::test]
    async fn ended_session_returns_to_login() {
        let storage = storage_with_token(Some("t"));
        let mut nav = Navigator::new(storage);
        nav.push(DASHBOARD);
        assert_eq!(nav.location(), DASHBOARD);

        let (tx, rx) = broadcast::channel(4);
        tx.send(SessionEvent::Ended).unwrap();
        drop(tx);

        nav.follow(rx).await;
        assert_eq!(nav.location(), LOGIN);
    }
}

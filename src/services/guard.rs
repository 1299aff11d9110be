use crate::models::identity::Identity;

/// Where denied navigations are sent.
pub const LOGIN_PATH: &str = "/login";

/// Who may open a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    User,
    Admin,
}

/// Outcome of a route guard evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Render,
    Redirect(&'static str),
}

/// One entry of the navigational contract.
#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub path: &'static str,
    pub access: Access,
    pub purpose: &'static str,
}

/// Every page view the platform exposes.
pub const ROUTES: [Route; 6] = [
    Route { path: "/", access: Access::Public, purpose: "landing page" },
    Route { path: "/simulations", access: Access::Public, purpose: "catalog browse" },
    Route { path: "/login", access: Access::Public, purpose: "authenticate" },
    Route { path: "/register", access: Access::Public, purpose: "create identity" },
    Route { path: "/dashboard", access: Access::User, purpose: "learner progress view" },
    Route { path: "/admin", access: Access::Admin, purpose: "catalog/user management" },
];

/// Access level of a page path. Unknown paths are public.
pub fn access_for(path: &str) -> Access {
    ROUTES
        .iter()
        .find(|route| route.path == path)
        .map(|route| route.access)
        .unwrap_or(Access::Public)
}

/// Decides whether a view renders for the given identity.
///
/// Evaluated on every navigation; never cached. A signed-in non-admin asking
/// for an admin view goes to the login page, not to a "forbidden" page.
pub fn evaluate(required: Access, identity: Option<&Identity>) -> Decision {
    let allowed = match required {
        Access::Public => true,
        Access::User => identity.is_some(),
        Access::Admin => identity.is_some_and(Identity::is_admin),
    };

    if allowed {
        Decision::Render
    } else {
        Decision::Redirect(LOGIN_PATH)
    }
}

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
    Extension,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    handlers::respond,
    models::{
        enrollment::{EnrollmentRecord, EnrollmentStatus},
        identity::Identity,
        session::CurrentSession,
        simulation::{Category, Level, SimulationRecord},
    },
    services::{
        catalog::{duration_hours, FilterCriteria},
        guard::LOGIN_PATH,
    },
    state::AppState,
    validation::simulation::CatalogQuery,
};

const NO_RESULTS_MESSAGE: &str = "No simulations found matching your criteria.";
const SUPPORT_EMAIL: &str = "support@blixoralabs.dev";

/// One navbar entry.
#[derive(Serialize, Debug, PartialEq)]
pub struct NavLink {
    pub label: &'static str,
    /// A view path, or an API endpoint for actions such as logout.
    pub href: &'static str,
}

/// Builds the navbar for the current identity.
pub fn nav_links(identity: Option<&Identity>) -> Vec<NavLink> {
    let mut links = vec![
        NavLink { label: "Home", href: "/" },
        NavLink { label: "Simulations", href: "/simulations" },
    ];

    match identity {
        Some(identity) => {
            links.push(NavLink { label: "Dashboard", href: "/dashboard" });
            if identity.is_admin() {
                links.push(NavLink { label: "Admin", href: "/admin" });
            }
            links.push(NavLink { label: "Logout", href: "/api/auth/logout" });
        }
        None => {
            links.push(NavLink { label: "Login", href: "/login" });
            links.push(NavLink { label: "Get Started", href: "/register" });
        }
    }

    links
}

/// Fields every page carries.
#[derive(Serialize)]
struct Page<'a, T> {
    view: &'static str,
    identity: Option<&'a Identity>,
    nav: Vec<NavLink>,
    #[serde(flatten)]
    content: T,
}

fn render<T: Serialize>(view: &'static str, session: &CurrentSession, content: T) -> Result<Response> {
    respond::json(
        StatusCode::OK,
        &Page {
            view,
            identity: session.identity.as_ref(),
            nav: nav_links(session.identity.as_ref()),
            content,
        },
    )
}

#[derive(Serialize)]
struct Highlight {
    title: &'static str,
    description: &'static str,
}

#[derive(Serialize)]
struct Stat {
    value: &'static str,
    label: &'static str,
}

#[derive(Serialize)]
struct Landing {
    headline: &'static str,
    tagline: &'static str,
    features: [Highlight; 3],
    stats: [Stat; 4],
    support_email: &'static str,
    support_hours: &'static str,
}

/// The landing page.
#[axum::debug_handler]
pub async fn landing(Extension(session): Extension<CurrentSession>) -> Result<Response> {
    render(
        "landing",
        &session,
        Landing {
            headline: "Simulate. Solve. Succeed.",
            tagline: "Welcome to Blixora Labs - Your gateway to futuristic digital R&D simulations for tech students and developers",
            features: [
                Highlight {
                    title: "AI Mini Projects",
                    description: "Build and deploy AI models with hands-on simulations",
                },
                Highlight {
                    title: "Cybersecurity Puzzles",
                    description: "Master security concepts through interactive challenges",
                },
                Highlight {
                    title: "Cloud Deployment",
                    description: "Learn cloud architecture with real-world scenarios",
                },
            ],
            stats: [
                Stat { value: "500+", label: "Active Simulations" },
                Stat { value: "10K+", label: "Students Enrolled" },
                Stat { value: "95%", label: "Success Rate" },
                Stat { value: "24/7", label: "Lab Access" },
            ],
            support_email: SUPPORT_EMAIL,
            support_hours: "Mon-Fri: 11:00 AM - 8:00 PM",
        },
    )
}

#[derive(Serialize)]
struct SelectOption {
    value: &'static str,
    label: &'static str,
}

fn category_options() -> Vec<SelectOption> {
    std::iter::once(SelectOption { value: "all", label: "All Categories" })
        .chain(Category::ALL.iter().map(|c| SelectOption { value: c.as_str(), label: c.label() }))
        .collect()
}

fn level_options() -> Vec<SelectOption> {
    std::iter::once(SelectOption { value: "all", label: "All Levels" })
        .chain(Level::ALL.iter().map(|l| SelectOption { value: l.as_str(), label: l.label() }))
        .collect()
}

#[derive(Serialize)]
struct CriteriaEcho {
    search: String,
    category: String,
    level: String,
}

#[derive(Serialize)]
struct Catalog {
    criteria: CriteriaEcho,
    categories: Vec<SelectOption>,
    levels: Vec<SelectOption>,
    simulations: Vec<SimulationRecord>,
    count: usize,
    empty: bool,
    empty_message: Option<&'static str>,
}

/// The catalog browse view with search/category/level filtering.
#[axum::debug_handler]
pub async fn simulations(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Query(query): Query<CatalogQuery>,
) -> Result<Response> {
    let criteria = FilterCriteria::try_from(query)?;
    let visible = state.catalog.filtered(&criteria).await;
    tracing::debug!("🔎 Catalog filter matched {} simulations", visible.len());

    render(
        "simulations",
        &session,
        Catalog {
            criteria: CriteriaEcho {
                search: criteria.search_text.clone(),
                category: criteria.category.to_string(),
                level: criteria.level.to_string(),
            },
            categories: category_options(),
            levels: level_options(),
            count: visible.len(),
            empty: visible.is_empty(),
            empty_message: visible.is_empty().then_some(NO_RESULTS_MESSAGE),
            simulations: visible,
        },
    )
}

#[derive(Serialize)]
struct FormField {
    name: &'static str,
    label: &'static str,
    kind: &'static str,
    required: bool,
    min_length: Option<u8>,
}

#[derive(Serialize)]
struct FormView {
    title: &'static str,
    description: &'static str,
    action: &'static str,
    submit_label: &'static str,
    fields: Vec<FormField>,
    alternate: NavLink,
}

fn field(name: &'static str, label: &'static str, kind: &'static str, min_length: Option<u8>) -> FormField {
    FormField { name, label, kind, required: true, min_length }
}

/// The login form.
#[axum::debug_handler]
pub async fn login_form(Extension(session): Extension<CurrentSession>) -> Result<Response> {
    render(
        "login",
        &session,
        FormView {
            title: "Welcome Back",
            description: "Login to access your simulations",
            action: "/api/auth/login",
            submit_label: "Login",
            fields: vec![
                field("email", "Email", "email", None),
                field("password", "Password", "password", None),
            ],
            alternate: NavLink { label: "Register here", href: "/register" },
        },
    )
}

/// The registration form.
#[axum::debug_handler]
pub async fn register_form(Extension(session): Extension<CurrentSession>) -> Result<Response> {
    render(
        "register",
        &session,
        FormView {
            title: "Create Account",
            description: "Join Blixora Labs and start learning",
            action: "/api/auth/register",
            submit_label: "Create Account",
            fields: vec![
                field("name", "Full Name", "text", None),
                field("email", "Email", "email", None),
                field("password", "Password", "password", Some(6)),
                field("confirm_password", "Confirm Password", "password", Some(6)),
            ],
            alternate: NavLink { label: "Login here", href: "/login" },
        },
    )
}

/// Which enrollments the dashboard lists.
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DashboardTab {
    #[default]
    All,
    InProgress,
    Completed,
}

impl DashboardTab {
    fn includes(&self, status: EnrollmentStatus) -> bool {
        match self {
            DashboardTab::All => true,
            DashboardTab::InProgress => status == EnrollmentStatus::InProgress,
            DashboardTab::Completed => status == EnrollmentStatus::Completed,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct DashboardQuery {
    #[serde(default)]
    pub tab: DashboardTab,
}

#[derive(Serialize)]
struct DashboardEntry {
    #[serde(flatten)]
    enrollment: EnrollmentRecord,
    title: String,
    category: Category,
    level: Level,
    duration: String,
    action: &'static str,
}

#[derive(Serialize, Debug, Default, PartialEq)]
pub struct DashboardStats {
    pub total_enrolled: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub total_hours: f64,
}

#[derive(Serialize)]
struct Dashboard {
    greeting: String,
    tab: DashboardTab,
    stats: DashboardStats,
    enrollments: Vec<DashboardEntry>,
}

fn action_label(status: EnrollmentStatus) -> &'static str {
    match status {
        EnrollmentStatus::Completed => "Completed",
        EnrollmentStatus::InProgress => "Continue Learning",
        EnrollmentStatus::Enrolled => "Start Learning",
    }
}

/// The learner dashboard. Requires a signed-in identity.
#[axum::debug_handler]
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response> {
    let identity = session
        .identity
        .as_ref()
        .ok_or(AppError::Unauthorized { redirect_to: LOGIN_PATH })?;

    let mut stats = DashboardStats::default();
    let mut entries = Vec::new();

    for enrollment in state.enrollments.for_user(identity.id).await {
        let Some(simulation) = state.catalog.find(enrollment.simulation_id).await else {
            continue;
        };

        let status = enrollment.status();
        stats.total_enrolled += 1;
        stats.total_hours += duration_hours(&simulation.duration).unwrap_or(0.0);
        match status {
            EnrollmentStatus::Completed => stats.completed += 1,
            EnrollmentStatus::InProgress => stats.in_progress += 1,
            EnrollmentStatus::Enrolled => {}
        }

        if query.tab.includes(status) {
            entries.push(DashboardEntry {
                action: action_label(status),
                enrollment,
                title: simulation.title,
                category: simulation.category,
                level: simulation.level,
                duration: simulation.duration,
            });
        }
    }

    render(
        "dashboard",
        &session,
        Dashboard {
            greeting: format!("Welcome back, {}!", identity.name),
            tab: query.tab,
            stats,
            enrollments: entries,
        },
    )
}

#[derive(Serialize, Debug, PartialEq)]
pub struct AdminStats {
    pub total_simulations: usize,
    pub total_users: usize,
    pub active_enrollments: usize,
    pub completion_rate: u32,
}

/// Percentage of completed enrollments, rounded; 0 when there are none.
pub fn completion_rate(active: usize, completed: usize) -> u32 {
    let total = active + completed;
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}

#[derive(Serialize)]
struct AdminConsole {
    stats: AdminStats,
    categories: Vec<SelectOption>,
    levels: Vec<SelectOption>,
    simulations: Vec<SimulationRecord>,
    users: Vec<Identity>,
}

/// The admin console. Requires an administrator.
#[axum::debug_handler]
pub async fn admin(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
) -> Result<Response> {
    let simulations = state.catalog.all().await;
    let users = state.authenticator.identities()?;
    let (active, completed) = state.enrollments.totals().await;

    render(
        "admin",
        &session,
        AdminConsole {
            stats: AdminStats {
                total_simulations: simulations.len(),
                total_users: users.len(),
                active_enrollments: active,
                completion_rate: completion_rate(active, completed),
            },
            categories: category_options().into_iter().skip(1).collect(),
            levels: level_options().into_iter().skip(1).collect(),
            simulations,
            users,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::identity::Role;

    fn hrefs(links: &[NavLink]) -> Vec<&'static str> {
        links.iter().map(|link| link.href).collect()
    }

    #[test]
    fn anonymous_nav_offers_login_and_register() {
        assert_eq!(
            hrefs(&nav_links(None)),
            vec!["/", "/simulations", "/login", "/register"]
        );
    }

    #[test]
    fn user_nav_has_dashboard_but_no_admin() {
        let user = Identity::new("Ada", "ada@example.com", Role::User);
        assert_eq!(
            hrefs(&nav_links(Some(&user))),
            vec!["/", "/simulations", "/dashboard", "/api/auth/logout"]
        );
    }

    #[test]
    fn admin_nav_has_admin_link() {
        let admin = Identity::new("Admin User", "admin@example.com", Role::Admin);
        assert!(hrefs(&nav_links(Some(&admin))).contains(&"/admin"));
    }

    #[test]
    fn completion_rate_handles_empty_and_rounds() {
        assert_eq!(completion_rate(0, 0), 0);
        assert_eq!(completion_rate(1, 1), 50);
        assert_eq!(completion_rate(2, 1), 33);
        assert_eq!(completion_rate(0, 4), 100);
    }

    #[test]
    fn dashboard_tabs_select_by_status() {
        assert!(DashboardTab::All.includes(EnrollmentStatus::Enrolled));
        assert!(DashboardTab::InProgress.includes(EnrollmentStatus::InProgress));
        assert!(!DashboardTab::InProgress.includes(EnrollmentStatus::Completed));
        assert!(DashboardTab::Completed.includes(EnrollmentStatus::Completed));
    }
}

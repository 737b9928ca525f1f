use common_session::Role;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub label: &'static str,
    pub path: &'static str,
}

const fn item(label: &'static str, path: &'static str) -> MenuItem {
    MenuItem { label, path }
}

const ADMIN_MENU: &[MenuItem] = &[
    item("Dashboard", "/admin"),
    item("Users", "/manage-users"),
    item("States", "/manage-states"),
    item("Centers", "/manage-centers"),
    item("Courses", "/courses"),
    item("Reports", "/reports"),
];

const SUPER_ADMIN_MENU: &[MenuItem] = &[
    item("Dashboard", "/super-admin"),
    item("Administrators", "/manage-admins"),
    item("Users", "/manage-users"),
    item("States", "/manage-states"),
    item("Audit log", "/audit-log"),
];

const MANAGER_MENU: &[MenuItem] = &[
    item("Dashboard", "/manager"),
    item("Centers", "/manage-centers"),
    item("Enquiries", "/enquiries"),
    item("Reports", "/reports"),
];

const FINANCIAL_MENU: &[MenuItem] = &[
    item("Dashboard", "/financial"),
    item("Fees", "/fees"),
    item("Invoices", "/invoices"),
    item("Payouts", "/payouts"),
];

const ACADEMIC_COORDINATOR_MENU: &[MenuItem] = &[
    item("Dashboard", "/academic"),
    item("Courses", "/courses"),
    item("Batches", "/batches"),
    item("Assessments", "/assessments"),
    item("Assignments", "/assignments"),
];

const STATE_ADMIN_MENU: &[MenuItem] = &[
    item("Dashboard", "/state-admin"),
    item("Users", "/manage-users"),
    item("States", "/manage-states"),
    item("Centers", "/manage-centers"),
];

const CENTER_ADMIN_MENU: &[MenuItem] = &[
    item("Dashboard", "/center-admin"),
    item("Students", "/students"),
    item("Batches", "/batches"),
    item("Attendance", "/attendance"),
    item("Chat", "/chat"),
];

const TEACHER_MENU: &[MenuItem] = &[
    item("Dashboard", "/teacher"),
    item("Attendance", "/attendance"),
    item("Assignments", "/assignments"),
    item("Chat", "/chat"),
];

const CARD_ADMIN_MENU: &[MenuItem] = &[item("Dashboard", "/card-admin"), item("Cards", "/cards")];

/// Navigation entries for a role; empty for roles outside the closed set.
pub fn menu_for(role: &Role) -> &'static [MenuItem] {
    match role {
        Role::Admin => ADMIN_MENU,
        Role::SuperAdmin => SUPER_ADMIN_MENU,
        Role::Manager => MANAGER_MENU,
        Role::Financial => FINANCIAL_MENU,
        Role::AcademicCoordinator => ACADEMIC_COORDINATOR_MENU,
        Role::StateAdmin => STATE_ADMIN_MENU,
        Role::CenterAdmin => CENTER_ADMIN_MENU,
        Role::Teacher => TEACHER_MENU,
        Role::CardAdmin => CARD_ADMIN_MENU,
        Role::Unknown(_) => &[],
    }
}

use crate::api::asset::{AssetFilter, AssetRow, AssetStats, AssignAsset, CreateAsset};
use crate::api::attendance::{AttendanceStats, CheckInReq, HistoryEntry, HistoryFilter, StatsFilter};
use crate::api::dashboard::Activity;
use crate::api::employee::{CreateEmployee, EmployeeListResponse, EmployeeQuery};
use crate::api::leave_request::{
    ApproveLeave, CreateLeave, LeaveFilter, LeaveListResponse, LeaveResponse,
};
use crate::api::task::{
    CommentRow, CreateTask, NewComment, ProgressUpdate, StatusUpdate, TaskFilter, TaskRow, TaskStats,
};
use crate::api::work_report::{ApproveReport, CreateReport, ReportFilter, ReportRow, ReportStats};
use crate::domain::leave::{LeaveBalance, TypeBalance};
use crate::model::employee::Employee;
use crate::models::{LoginReqDto, RegisterReq};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM System API",
        version = "1.0.0",
        description = r#"
## Human Resource Management (HRM) System

This API powers a **Human Resource Management (HRM)** system designed to manage core HR operations within an organization.

### 🔹 Key Features
- **Employee Management**
  - Create, update, list, and view employee profiles
- **Attendance Management**
  - Daily check-in/check-out with late and overtime tracking
- **Leave Management**
  - Apply for leave, approve/reject requests, and track balances
- **Task Management**
  - Assignment, progress tracking, and comments
- **Asset Management**
  - Inventory, assignment, and return of company assets
- **Work Reports**
  - Submission, drafts, and approval workflow
- **Dashboard**
  - Role-shaped statistics and recent activity

### 🔐 Security
Most endpoints are protected using **JWT Bearer authentication**.
Only authorized roles such as **Admin** or **HR** can access sensitive operations.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::history,
        crate::api::attendance::stats,

        crate::api::leave_request::leave_list,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::my_balance,
        crate::api::leave_request::employee_balance,

        crate::api::task::create_task,
        crate::api::task::task_list,
        crate::api::task::update_progress,
        crate::api::task::update_status,
        crate::api::task::add_comment,
        crate::api::task::task_stats,

        crate::api::asset::asset_list,
        crate::api::asset::create_asset,
        crate::api::asset::update_asset,
        crate::api::asset::assign_asset,
        crate::api::asset::return_asset,
        crate::api::asset::asset_stats,

        crate::api::work_report::create_report,
        crate::api::work_report::create_draft,
        crate::api::work_report::report_list,
        crate::api::work_report::approve_report,
        crate::api::work_report::report_stats,

        crate::api::dashboard::dashboard_stats,
        crate::api::dashboard::recent_activities,
    ),
    components(
        schemas(
            RegisterReq,
            LoginReqDto,
            CreateEmployee,
            EmployeeQuery,
            EmployeeListResponse,
            Employee,
            CheckInReq,
            HistoryFilter,
            HistoryEntry,
            StatsFilter,
            AttendanceStats,
            CreateLeave,
            LeaveFilter,
            LeaveResponse,
            LeaveListResponse,
            ApproveLeave,
            TypeBalance,
            LeaveBalance,
            CreateTask,
            TaskFilter,
            TaskRow,
            CommentRow,
            ProgressUpdate,
            StatusUpdate,
            NewComment,
            TaskStats,
            CreateAsset,
            AssetFilter,
            AssetRow,
            AssignAsset,
            AssetStats,
            CreateReport,
            ReportFilter,
            ReportRow,
            ApproveReport,
            ReportStats,
            Activity,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Authentication APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Leave", description = "Leave management APIs"),
        (name = "Task", description = "Task management APIs"),
        (name = "Asset", description = "Asset management APIs"),
        (name = "Report", description = "Work report APIs"),
        (name = "Dashboard", description = "Dashboard APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

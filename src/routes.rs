use crate::{
    api::{asset, attendance, dashboard, employee, leave_request, task, work_report},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    governor::middleware::NoOpMiddleware, Governor, GovernorConfigBuilder, PeerIpKeyExtractor,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes. Register still checks the caller's token inside the
    // handler; it sits here so it shares the public limiter tier.
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(register_limiter.clone())
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(web::resource("/auth/me").route(web::get().to(handlers::me)))
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(employee::update_employee))
                            .route(web::get().to(employee::get_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    .service(
                        web::resource("/check-in").route(web::post().to(attendance::check_in)),
                    )
                    .service(
                        web::resource("/check-out").route(web::post().to(attendance::check_out)),
                    )
                    .service(web::resource("/history").route(web::get().to(attendance::history)))
                    .service(web::resource("/stats").route(web::get().to(attendance::stats))),
            )
            .service(
                web::scope("/leaves")
                    // fixed paths registered before /{id} so they never match as ids
                    .service(
                        web::resource("/balance")
                            .route(web::get().to(leave_request::my_balance)),
                    )
                    .service(
                        web::resource("/balance/{employee_id}")
                            .route(web::get().to(leave_request::employee_balance)),
                    )
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_list))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(leave_request::approve_leave)),
                    ),
            )
            .service(
                web::scope("/tasks")
                    .service(web::resource("/stats").route(web::get().to(task::task_stats)))
                    .service(
                        web::resource("")
                            .route(web::get().to(task::task_list))
                            .route(web::post().to(task::create_task)),
                    )
                    .service(
                        web::resource("/{id}/progress")
                            .route(web::put().to(task::update_progress)),
                    )
                    .service(
                        web::resource("/{id}/status").route(web::put().to(task::update_status)),
                    )
                    .service(
                        web::resource("/{id}/comments").route(web::post().to(task::add_comment)),
                    ),
            )
            .service(
                web::scope("/assets")
                    .service(web::resource("/stats").route(web::get().to(asset::asset_stats)))
                    .service(
                        web::resource("")
                            .route(web::get().to(asset::asset_list))
                            .route(web::post().to(asset::create_asset)),
                    )
                    .service(
                        web::resource("/{id}/assign").route(web::put().to(asset::assign_asset)),
                    )
                    .service(
                        web::resource("/{id}/return").route(web::put().to(asset::return_asset)),
                    )
                    .service(web::resource("/{id}").route(web::put().to(asset::update_asset))),
            )
            .service(
                web::scope("/reports")
                    .service(web::resource("/stats").route(web::get().to(work_report::report_stats)))
                    .service(
                        web::resource("/draft").route(web::post().to(work_report::create_draft)),
                    )
                    .service(
                        web::resource("")
                            .route(web::get().to(work_report::report_list))
                            .route(web::post().to(work_report::create_report)),
                    )
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(work_report::approve_report)),
                    ),
            )
            .service(
                web::scope("/dashboard")
                    .service(
                        web::resource("/stats").route(web::get().to(dashboard::dashboard_stats)),
                    )
                    .service(
                        web::resource("/recent-activities")
                            .route(web::get().to(dashboard::recent_activities)),
                    ),
            ),
    );
}

// LOGIN
//  ├─ access_token (15 min)
//  └─ refresh_token (7 days)
//
// API REQUEST
//  └─ Authorization: Bearer access_token
//
// ACCESS EXPIRED
//  └─ POST /refresh with refresh_token
//       └─ returns new access_token

use crate::{
    api::{analytics, attendance, dashboard, employee},
    config::Config,
};
use actix_governor::governor::{clock::QuantaInstant, middleware::NoOpMiddleware};
use actix_governor::{Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-scope limiter
    fn build_limiter(
        requests_per_min: u32,
    ) -> GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap()
    }

    let api_limiter = build_limiter(config.rate_api_per_min);

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(Governor::new(&api_limiter))
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{id}/attendance-summary
                    .service(
                        web::resource("/{id}/attendance-summary")
                            .route(web::get().to(employee::attendance_summary)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(
                        web::resource("")
                            .route(web::post().to(attendance::mark_attendance))
                            .route(web::get().to(attendance::list_attendance)),
                    )
                    // /attendance/filter — registered before the {id} matcher
                    .service(
                        web::resource("/filter")
                            .route(web::get().to(attendance::filter_attendance)),
                    )
                    // /attendance/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(attendance::update_attendance))
                            .route(web::delete().to(attendance::delete_attendance)),
                    ),
            )
            .service(
                web::resource("/dashboard").route(web::get().to(dashboard::dashboard_metrics)),
            )
            .service(
                web::scope("/analytics")
                    .service(
                        web::resource("/attendance-trends")
                            .route(web::get().to(analytics::attendance_trends)),
                    )
                    .service(
                        web::resource("/department-stats")
                            .route(web::get().to(analytics::department_stats)),
                    )
                    .service(
                        web::resource("/monthly-attendance")
                            .route(web::get().to(analytics::monthly_attendance)),
                    ),
            ),
    );
}

use crate::{
    api::{cash, checkin, employee, loan, payroll},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

// Per-scope limiter; a zero rate degrades to the slowest allowed limiter
// instead of an unbuildable config.
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        60_000 / requests_per_min as u64
    };
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("limiter config must be buildable");
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(build_limiter(config.rate_api_per_min))
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
                            .route(web::get().to(employee::get_employee))
                            .route(web::put().to(employee::update_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/loans")
                    .service(
                        web::resource("")
                            .route(web::get().to(loan::list_loans))
                            .route(web::post().to(loan::create_loan)),
                    )
                    .service(web::resource("/{id}").route(web::delete().to(loan::delete_loan))),
            )
            .service(
                web::scope("/payrollBatches")
                    .service(
                        web::resource("")
                            .route(web::get().to(payroll::list_batches))
                            .route(web::post().to(payroll::create_batch)),
                    )
                    .service(
                        web::resource("/preview").route(web::post().to(payroll::preview_batch)),
                    )
                    .service(
                        web::resource("/metrics").route(web::get().to(payroll::batch_metrics)),
                    )
                    .service(
                        web::resource("/export").route(web::get().to(payroll::export_batches)),
                    ),
            )
            .service(
                web::scope("/checkins")
                    .service(
                        web::resource("")
                            .route(web::get().to(checkin::list_checkins))
                            .route(web::post().to(checkin::create_checkins)),
                    )
                    .service(
                        web::resource("/closeWeek").route(web::post().to(checkin::close_week)),
                    ),
            )
            .service(
                web::scope("/cashLedger")
                    .service(
                        web::resource("")
                            .route(web::get().to(cash::list_entries))
                            .route(web::post().to(cash::create_entry)),
                    )
                    .service(web::resource("/preset").route(web::get().to(cash::preset)))
                    .service(web::resource("/{id}").route(web::delete().to(cash::delete_entry))),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limiter_builds_for_zero_and_normal_rates() {
        let _ = build_limiter(0);
        let _ = build_limiter(1);
        let _ = build_limiter(1000);
    }
}

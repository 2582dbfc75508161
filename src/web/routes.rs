use actix_web::web;
use crate::web::handlers;

// Single endpoint: every method on every path goes to the relay.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/{tail:.*}", web::to(handlers::relay));
}

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::handlers::{agencies, auth, catalog, reservations, rules, trips, users};
use crate::middleware::auth::{auth_middleware, require_admin};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Public routes
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // Reservation lifecycle (any authenticated role; agency users are
    // scoped to their own agency inside the service layer)
    let reservation_routes = Router::new()
        .route("/", post(reservations::create).get(reservations::list))
        .route("/quote", post(reservations::quote))
        .route("/{code}", get(reservations::get_by_code))
        .route("/{code}/payments", post(reservations::register_payment))
        .route("/{code}/cancel", post(reservations::cancel))
        .route("/{code}/reprogram", post(reservations::reprogram))
        .route(
            "/{code}/baggage/{passenger_id}",
            post(reservations::register_baggage),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Lookups available to every authenticated user
    let staff_routes = Router::new()
        .route("/trips", get(trips::list))
        .route("/trips/search", get(trips::search))
        .route("/baggage/tariff", get(reservations::baggage_tariff))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Admin routes (requires auth + admin role)
    let admin_routes = Router::new()
        // Catalog
        .route("/ports", post(catalog::create_port).get(catalog::list_ports))
        .route(
            "/vessels",
            post(catalog::create_vessel).get(catalog::list_vessels),
        )
        .route(
            "/routes",
            post(catalog::create_route).get(catalog::list_routes),
        )
        .route("/fares", post(catalog::open_fare))
        .route("/routes/{id}/fare", get(catalog::current_fare))
        // Trips
        .route("/trips", post(trips::create))
        .route("/trips/{id}/status", put(trips::update_status))
        // Pricing and penalty rules
        .route(
            "/discount-rules",
            post(rules::create_discount_rule).get(rules::list_discount_rules),
        )
        .route("/discount-rules/{id}/active", put(rules::set_discount_active))
        .route(
            "/penalty-rules",
            post(rules::create_penalty_rule).get(rules::list_penalty_rules),
        )
        .route("/penalty-rules/{id}/active", put(rules::set_penalty_active))
        // Agencies and users
        .route("/agencies", post(agencies::create).get(agencies::list))
        .route("/agencies/{id}/status", put(agencies::set_status))
        .route("/users", post(users::create).get(users::list))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/reservations", reservation_routes)
        .nest("/api", staff_routes)
        .nest("/api/admin", admin_routes)
        .with_state(state)
}

//! Route definitions
//!
//! API routes are mounted under /api/v1; health routes live at the root.

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::handlers::{admin, auth, health, kitchen, tickets, users};
use crate::state::AppState;

pub const API_PREFIX: &str = "/api/v1";

/// All API routes (health excluded so it can skip rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new().nest(API_PREFIX, api_v1_routes())
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(admin_routes())
        .merge(helpdesk_routes())
        .merge(kitchen_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/auth/logout", post(auth::logout))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/@me", get(users::get_current_user))
        .route("/users/@me/preferences", patch(users::update_preferences))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(admin::list_users).post(admin::create_user))
        .route(
            "/admin/users/:id",
            get(admin::get_user)
                .patch(admin::update_user)
                .delete(admin::delete_user),
        )
        .route("/admin/agents", get(admin::list_agents).post(admin::create_agent))
        .route(
            "/admin/agents/:id",
            get(admin::get_agent)
                .patch(admin::update_agent)
                .delete(admin::delete_agent),
        )
        .route("/admin/queues", get(admin::list_queues).post(admin::create_queue))
        .route(
            "/admin/queues/:id",
            patch(admin::update_queue).delete(admin::delete_queue),
        )
        .route("/admin/tags", post(admin::create_tag))
}

fn helpdesk_routes() -> Router<AppState> {
    Router::new()
        .route("/queues", get(tickets::list_queues))
        // Agent desk
        .route("/agent", get(tickets::agent_dashboard))
        .route("/agent/tickets", get(tickets::agent_tickets))
        .route("/agent/tickets/:id/claim", post(tickets::claim_ticket))
        .route("/agent/tickets/:id/close", post(tickets::close_ticket))
        // Ticket owners
        .route("/user/tickets", get(tickets::user_tickets).post(tickets::create_ticket))
        .route("/ratings", post(tickets::rate_ticket))
        // Shared views
        .route("/tickets/:id", get(tickets::get_ticket))
        .route("/tickets/:id/messages", post(tickets::post_message))
        .route("/tickets/:id/rating", get(tickets::get_rating))
        .route("/tickets/:id/stream", get(tickets::stream_ticket))
}

fn kitchen_routes() -> Router<AppState> {
    Router::new()
        .route("/ingredients", get(kitchen::list_ingredients))
        .route("/tags", get(kitchen::list_tags))
        .route("/recipes", get(kitchen::list_recipes).post(kitchen::create_recipe))
        .route(
            "/recipes/:id",
            get(kitchen::get_recipe)
                .put(kitchen::update_recipe)
                .delete(kitchen::delete_recipe),
        )
        .route("/mealplan", get(kitchen::meal_plan_for_day).post(kitchen::plan_meal))
        .route("/mealplan/summary", get(kitchen::meal_plan_summary))
        .route("/mealplan/:id", delete(kitchen::delete_meal))
        .route("/shopping", get(kitchen::shopping_list))
}

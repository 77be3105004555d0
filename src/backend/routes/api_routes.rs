/**
 * API Routes
 *
 * # Routes
 *
 * ## Public
 * - `POST /user/register` - create an account
 * - `POST /user/login` - exchange credentials for a token
 *
 * ## Authenticated
 * - `GET|PUT|DELETE /user`, `GET /user/all`
 * - `GET|POST|PUT|DELETE /board`
 * - `GET|POST|DELETE /column`, `PUT /column/modify`
 * - `GET|POST|DELETE /card`, `PUT /card/modify`, `PUT /card/move`
 *
 * Authenticated routes sit behind `auth_middleware`, which rejects the
 * request with 401 before the handler runs.
 */

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::backend::auth::{delete_user, get_user, list_users, login, register, update_user};
use crate::backend::boards::{create_board, delete_board, list_boards, update_board};
use crate::backend::cards::{create_card, delete_card, list_cards, modify_card, move_card};
use crate::backend::columns::{create_column, delete_column, list_columns, modify_column};
use crate::backend::middleware::auth_middleware;
use crate::backend::server::state::AppState;

/// Add every API route to `router`
pub fn configure_api_routes(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/user", get(get_user).put(update_user).delete(delete_user))
        .route("/user/all", get(list_users))
        .route(
            "/board",
            get(list_boards)
                .post(create_board)
                .put(update_board)
                .delete(delete_board),
        )
        .route(
            "/column",
            get(list_columns).post(create_column).delete(delete_column),
        )
        .route("/column/modify", put(modify_column))
        .route("/card", get(list_cards).post(create_card).delete(delete_card))
        .route("/card/modify", put(modify_card))
        .route("/card/move", put(move_card))
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            auth_middleware,
        ));

    router
        .route("/user/register", post(register))
        .route("/user/login", post(login))
        .merge(protected)
}

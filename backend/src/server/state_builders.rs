//! Builders wiring Diesel adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;

use foodgram::domain::SharedPasswordLoginService;
use foodgram::domain::ports::Repositories;
use foodgram::inbound::http::state::HttpState;
use foodgram::outbound::persistence::diesel_repositories;

use super::ServerConfig;

/// Login adapter over the user repository.
///
/// Without a configured password the adapter refuses every login.
fn build_login(config: &ServerConfig, repositories: &Repositories) -> SharedPasswordLoginService {
    SharedPasswordLoginService::new(
        repositories.users.clone(),
        config.login_password.clone(),
    )
}

pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let repositories = diesel_repositories(config.db_pool.clone());
    let login = Arc::new(build_login(config, &repositories));
    web::Data::new(HttpState::new(login, &repositories))
}

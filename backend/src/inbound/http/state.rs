//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data`. It holds the domain
//! services, which in turn hold only port trait objects, so the whole HTTP
//! surface can run against the in-memory store in tests.

use std::sync::Arc;

use crate::domain::ports::{LoginService, Repositories};
use crate::domain::{CatalogueService, RecipeService, UserService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: UserService,
    pub catalogue: CatalogueService,
    pub recipes: RecipeService,
}

impl HttpState {
    /// Build every service from one repository bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use foodgram::domain::SharedPasswordLoginService;
    /// use foodgram::inbound::http::state::HttpState;
    /// use foodgram::outbound::memory::InMemoryStore;
    ///
    /// let repositories = InMemoryStore::new().repositories();
    /// let login = Arc::new(SharedPasswordLoginService::new(repositories.users.clone(), None));
    /// let state = HttpState::new(login, &repositories);
    /// let _recipes = state.recipes.clone();
    /// ```
    #[must_use]
    pub fn new(login: Arc<dyn LoginService>, repositories: &Repositories) -> Self {
        Self {
            login,
            users: UserService::from_repositories(repositories),
            catalogue: CatalogueService::from_repositories(repositories),
            recipes: RecipeService::from_repositories(repositories),
        }
    }
}

use std::time::Duration;

use orderly_infra::HttpErrorHandler;

use crate::catalog::UserErrorCatalog;
use crate::service::UserService;

#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub errors: HttpErrorHandler<UserErrorCatalog>,
    pub request_timeout: Duration,
}

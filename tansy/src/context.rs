use crate::http::RequestClient;
use crate::permissions::PermissionChecker;
use std::sync::Arc;
use tansy_model::types::UserId;

#[derive(Derivative)]
#[derivative(Debug)]
pub(crate) struct ClientContextData {
    pub self_user: UserId,
    #[derivative(Debug = "ignore")]
    pub request_client: Box<dyn RequestClient>,
    #[derivative(Debug = "ignore")]
    pub permission_checker: Box<dyn PermissionChecker>,
}

/// Handles all state shared between API calls made on behalf of a particular user.
///
/// The [`Clone`] implementation creates a new handle to the same context.
#[derive(Clone, Debug)]
pub struct ClientContext {
    pub(crate) data: Arc<ClientContextData>,
}
impl ClientContext {
    /// Creates a new client context for the given user and collaborators.
    pub fn new(
        self_user: impl Into<UserId>,
        request_client: impl RequestClient,
        permission_checker: impl PermissionChecker,
    ) -> Self {
        ClientContext {
            data: Arc::new(ClientContextData {
                self_user: self_user.into(),
                request_client: Box::new(request_client),
                permission_checker: Box::new(permission_checker),
            }),
        }
    }

    /// Returns the id of the user this context acts as.
    pub fn self_user(&self) -> UserId {
        self.data.self_user
    }

    /// Returns the client used to make raw requests to the API.
    pub fn raw(&self) -> &dyn RequestClient {
        &*self.data.request_client
    }

    /// Returns the permission checker used to pre-flight state-changing calls.
    pub fn permissions(&self) -> &dyn PermissionChecker {
        &*self.data.permission_checker
    }
}

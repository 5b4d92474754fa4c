//! Request context threaded through every entity operation.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Identity and locale of the caller for one request.
///
/// Passed explicitly as the first argument of every entity operation and
/// never stored inside an entity.
#[derive(Debug, Clone)]
pub struct RequestContext {
    owner_id: String,
    language: String,
    user: String,
    request_id: Uuid,
    cancellation: CancellationToken,
}

impl RequestContext {
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            language: "en".to_string(),
            user: String::new(),
            request_id: Uuid::now_v7(),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Tie this request to a caller-owned cancellation token.
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Headers propagated to the persistence collaborator.
    pub fn headers(&self) -> Headers {
        Headers {
            language: self.language.clone(),
            owner_id: self.owner_id.clone(),
            user: self.user.clone(),
            request_id: self.request_id,
        }
    }
}

/// Per-call headers understood by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headers {
    pub language: String,
    pub owner_id: String,
    pub user: String,
    pub request_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_mirror_the_context() {
        let ctx = RequestContext::new("0").with_language("zh-cn").with_user("admin");
        let headers = ctx.headers();
        assert_eq!(headers.owner_id, "0");
        assert_eq!(headers.language, "zh-cn");
        assert_eq!(headers.user, "admin");
        assert_eq!(headers.request_id, ctx.request_id());
    }

    #[test]
    fn clones_share_the_cancellation_signal() {
        let ctx = RequestContext::new("0");
        let cloned = ctx.clone();
        ctx.cancellation().cancel();
        assert!(cloned.cancellation().is_cancelled());
    }
}

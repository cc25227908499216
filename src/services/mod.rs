pub mod auth;
pub mod composer;
pub mod diagnostics;
pub mod queue;
pub mod submitter;

pub use auth::Authenticator;
pub use composer::ComposerLocator;
pub use diagnostics::Diagnostics;
pub use queue::{FileQueueStore, PostRotator, QueueStore};
pub use submitter::PostSubmitter;

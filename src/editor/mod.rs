//! Page controller: the single owner of document mutation while a page is
//! being edited.

pub mod collab;
pub mod events;
pub mod pending;
pub mod session;

pub use collab::{
    Collaborators, Letter, LetterId, LetterTransport, OutgoingLetter, PageStore, UserId,
};
pub use events::{Listener, PageChange, SubscriptionId};
pub use pending::PendingImage;
pub use session::{Session, SessionMode, load_session};

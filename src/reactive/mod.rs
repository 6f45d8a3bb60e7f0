pub mod effect;
pub mod invalidation;
pub mod owner;
pub mod runtime;
pub mod signal;

pub use effect::{create_effect, Effect};
pub use invalidation::{request_frame, take_frame_request};
pub use owner::{
    current_owner, dispose_owner, live_owners, on_cleanup, owner_is_alive, with_owner,
    with_root_owner, OwnerId,
};
pub use runtime::{batch, subscriber_count, SignalId};
pub use signal::{create_signal, Signal};

pub mod channel;
pub mod gateway;

pub use channel::{ChannelError, Envelope, MessageReceiver, MessageSender, ReplyHandle};
pub use gateway::{Dispatch, Gateway, serve};

//! Protocol types shared by the codecs and the connection layer.
//!
//! - **Message Handling** ([`Message`], [`PayloadItem`], [`PayloadSize`]): the
//!   items produced by the response decoder and how a body is framed
//! - **Requests** ([`ClientRequest`], [`RequestHead`]): what the caller asks for
//! - **Responses** ([`ResponseHead`], [`FullResponse`]): what the daemon answered
//! - **Errors** ([`HttpError`], [`ParseError`], [`SendError`])

mod message;
pub use message::Message;
pub use message::PayloadItem;
pub use message::PayloadSize;

mod request;
pub use request::ClientRequest;
pub use request::RequestHead;

mod response;
pub use response::FullResponse;
pub use response::ResponseHead;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;

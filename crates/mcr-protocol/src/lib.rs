//! JSON-RPC wire protocol for MultiChain nodes.
//!
//! Defines the request/response envelopes, the command vocabulary used by the
//! repository, and the codec that maps them to and from HTTP bodies:
//!
//! ```text
//! Request:  {"jsonrpc":"1.0","id":"<hex128>","method":"<command>","params":[...]}
//! Response: {"id":"<string>","error":null|{"code":int,"message":string},"result":<T>|null}
//! ```

pub mod codec;
pub mod command;
pub mod error;
pub mod message;

pub use codec::{JsonRpcCodec, JSONRPC_VERSION};
pub use command::{Command, LIST_ITEMS_LIMIT};
pub use error::{ProtocolError, ProtocolResult};
pub use message::{ErrorInfo, Request, Response};

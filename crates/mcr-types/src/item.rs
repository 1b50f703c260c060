use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::encoding::EntityEncoding;

/// One item published to a stream, as returned by `liststreamkeyitems`.
///
/// Wire names follow the node: `txid`, `key`, `blocktime`, `data`. The
/// block time is Unix-epoch seconds on the wire. Items that are not yet
/// confirmed in a block carry no block time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamItem {
    #[serde(rename = "txid")]
    pub transaction_id: String,
    pub key: String,
    #[serde(
        rename = "blocktime",
        with = "chrono::serde::ts_seconds_option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data: EntityEncoding,
}

impl StreamItem {
    pub fn is_confirmed(&self) -> bool {
        self.time.is_some()
    }
}

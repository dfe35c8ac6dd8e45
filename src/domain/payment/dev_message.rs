//! Classified payment errors.
//!
//! Every failure the callback flow can reach maps to exactly one of these
//! codes. The codes are stable strings shared with the front end, which uses
//! them to pick a localized message.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Closed set of error codes surfaced on the payment failure page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DevMessage {
    /// Callback carried no transaction id.
    TransMissing,
    /// Callback did not match the transaction active in the session.
    NoActiveTrans,
    /// User backed out of the payment.
    UserCancelled,
    /// Provider cannot handle this payment method or carrier.
    UnsupportedPay,
    /// Provider sent a response code outside its documented vocabulary.
    BadBangoCode,
    /// Bango reported a fatal error on its error redirect.
    BangoError,
    /// Provider said the notice is not authentic.
    NoticeError,
    /// Provider could not be asked whether the notice is authentic.
    NoticeException,
    /// Non-Bango provider reported a fatal error.
    ExtError,
}

impl DevMessage {
    /// Every code, in display order.
    pub const ALL: [DevMessage; 9] = [
        DevMessage::TransMissing,
        DevMessage::NoActiveTrans,
        DevMessage::UserCancelled,
        DevMessage::UnsupportedPay,
        DevMessage::BadBangoCode,
        DevMessage::BangoError,
        DevMessage::NoticeError,
        DevMessage::NoticeException,
        DevMessage::ExtError,
    ];

    /// Returns the stable wire code.
    pub fn as_str(&self) -> &'static str {
        match self {
            DevMessage::TransMissing => "TRANS_MISSING",
            DevMessage::NoActiveTrans => "NO_ACTIVE_TRANS",
            DevMessage::UserCancelled => "USER_CANCELLED",
            DevMessage::UnsupportedPay => "UNSUPPORTED_PAY",
            DevMessage::BadBangoCode => "BAD_BANGO_CODE",
            DevMessage::BangoError => "BANGO_ERROR",
            DevMessage::NoticeError => "NOTICE_ERROR",
            DevMessage::NoticeException => "NOTICE_EXCEPTION",
            DevMessage::ExtError => "EXT_ERROR",
        }
    }
}

impl fmt::Display for DevMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DevMessage {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DevMessage::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| ValidationError::invalid_format("error_code", format!("unknown code '{}'", s)))
    }
}

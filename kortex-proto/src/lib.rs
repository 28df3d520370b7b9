//! Schemas of the Kortex API messages.

use kortex_message::MessageDescriptor;

pub mod base;
pub mod common;

/// Every message schema of the crate.
pub static MESSAGES: &[&MessageDescriptor] = &[
    &common::USER_PROFILE_HANDLE,
    &base::USER_PROFILE,
    &base::FULL_USER_PROFILE,
    &base::LIMITATION_TYPE_IDENTIFIER,
    &base::SEQUENCE,
    &base::SEQUENCE_HANDLE,
    &base::SEQUENCE_TASK,
    &base::ACTION,
    &base::ACTION_HANDLE,
    &base::SSID,
];

/// Find a message schema by its full name (`Kinova.Api.Base.Ssid`) or by
/// its short name (`Ssid`).
pub fn descriptor_by_name(name: &str) -> Option<&'static MessageDescriptor> {
    MESSAGES
        .iter()
        .copied()
        .find(|descriptor| descriptor.full_name == name || descriptor.name() == name)
}

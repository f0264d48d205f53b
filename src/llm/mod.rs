pub mod chat;
pub mod cleanup;
pub mod details;
pub mod ingredients;
pub mod suggest;

pub(crate) const JSON_ONLY_SYSTEM: &str = "You are a helpful assistant. Respond with valid JSON only.";
pub(crate) const JSON_ONLY_SYSTEM_COOKING: &str =
    "You are a helpful cooking assistant. Respond with valid JSON only.";

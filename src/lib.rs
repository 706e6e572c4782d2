//! # Gardi (Credential & Session Security)
//!
//! `gardi` is the credential and session security subsystem of a password
//! vault backend. It owns master-password hashing, recovery keys, bearer
//! tokens, and the narrow persistence gateway those flows need.
//!
//! ## Accounts
//!
//! An account is a single master-credential record: username, salted
//! password hash, and the hash of a 128-bit recovery key. Plaintext secrets
//! never persist and never appear in logs; the recovery key is shown to the
//! caller exactly once, at registration.
//!
//! ## Sessions
//!
//! Successful register/login returns a signed bearer token valid for 24
//! hours. Validation distinguishes an expired token from a malformed or
//! forged one, so clients can tell "log in again" apart from "go away".
//!
//! ## Recovery
//!
//! A lost master password is reset by presenting the recovery key. The key
//! is not rotated by a successful recovery; only the password hash and salt
//! change.

pub mod auth;
pub mod cli;
pub mod gardi;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

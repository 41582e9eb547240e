mod credential;

pub use credential::{extract_credential, AuthOutcome, CredentialGate, API_KEY_HEADER};

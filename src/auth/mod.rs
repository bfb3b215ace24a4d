// ABOUTME: Credential lookup and request signing.
// ABOUTME: Exports the AuthProvider seam, the file-backed store, and the signer.

mod credentials;
mod signer;

pub use credentials::{
    ApiKeyCredentials, AuthProvider, CredentialError, CredentialFile, CredentialStore,
};
pub use signer::{BodySigning, RequestSigner};

//! Auth gate: register and login on behalf of a connection.

use tracing::{debug, info, warn};

use termchat_auth::store::{CredentialStore, LoginError, RegisterError};

use crate::message::types::{
    INVALID_CREDENTIALS, LoginRequest, OutboundMessage, RegisterRequest, USERNAME_EXISTS,
};

use super::registry::{ConnectionSession, SessionIdentity};

/// What a login attempt did to the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Identity bound; the caller announces `display_name` to everyone.
    Authenticated {
        /// Display name to announce.
        display_name: String,
    },
    /// Credentials refused; the error was sent and the connection is closing.
    Rejected,
    /// Credentials checked out, but the connection already has an identity.
    /// The binding is unchanged and nothing is announced.
    AlreadyAuthenticated,
}

/// Stateless logic in front of the credential store.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthGate;

impl AuthGate {
    /// Registers an identity and replies on `session`.
    ///
    /// Registration never authenticates the connection.
    pub fn register(
        store: &mut CredentialStore,
        session: &ConnectionSession,
        req: &RegisterRequest,
    ) {
        let reply = match store.register(&req.username, &req.nickname, &req.password) {
            Ok(()) => OutboundMessage::registered(),
            Err(RegisterError::AlreadyExists) => OutboundMessage::error(USERNAME_EXISTS),
            Err(RegisterError::Persistence(e)) => {
                // Nothing durable happened, so no acknowledgement goes out.
                warn!(conn_id = %session.id(), error = %e, "Registration not acknowledged");
                return;
            }
        };
        session.handle.send(&reply);
    }

    /// Verifies credentials, binds the identity, and replies on `session`.
    ///
    /// A refused login sends `{"error": "Invalid credentials"}` and then
    /// closes the connection, whether or not the connection is already
    /// authenticated. An accepted login on a bound connection is acknowledged
    /// with the bound display name and never rebinds.
    pub fn login(
        store: &mut CredentialStore,
        session: &mut ConnectionSession,
        req: &LoginRequest,
    ) -> LoginOutcome {
        if let Some(bound) = session.identity().cloned() {
            return match store.verify(&req.username, &req.password) {
                Ok(_) => {
                    session
                        .handle
                        .send(&OutboundMessage::logged_in(&bound.display_name));
                    debug!(
                        conn_id = %session.id(),
                        identity = %bound.identity,
                        "Repeated login acknowledged, binding kept"
                    );
                    LoginOutcome::AlreadyAuthenticated
                }
                Err(e) => Self::reject(session, e),
            };
        }

        match store.login(&req.username, &req.password) {
            Ok(display_name) => {
                session.bind(SessionIdentity {
                    identity: req.username.clone(),
                    display_name: display_name.clone(),
                });
                session.handle.send(&OutboundMessage::logged_in(&display_name));
                info!(conn_id = %session.id(), identity = %req.username, "Login succeeded");
                LoginOutcome::Authenticated { display_name }
            }
            Err(e) => Self::reject(session, e),
        }
    }

    fn reject(session: &ConnectionSession, err: LoginError) -> LoginOutcome {
        match err {
            LoginError::InvalidCredentials => {
                session.handle.send(&OutboundMessage::error(INVALID_CREDENTIALS));
            }
        }
        session.handle.close();
        info!(conn_id = %session.id(), "Login refused, closing connection");
        LoginOutcome::Rejected
    }
}

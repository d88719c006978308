//! Session state: the current credential, the identity it resolves to, and
//! the bootstrap pass that validates a persisted credential on startup.

use tracing::{debug, error, info, warn};

use crate::api::{ApiClient, ApiError, ApiResult, RegisterRequest};
use crate::models::User;

use super::credentials::{Credential, TokenStore};

/// Anything that can answer "is there an authenticated user right now".
pub trait AuthState {
    fn is_authenticated(&self) -> bool;
}

/// A pending validation of one credential value.
///
/// Produced by [`SessionStore::begin_validation`]. It owns everything it needs,
/// so it can be moved into a background task while the session keeps changing.
#[derive(Debug)]
pub struct Validation {
    generation: u64,
    client: ApiClient,
}

impl Validation {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Fetch the profile behind the credential being validated
    pub async fn run(self) -> ValidationOutcome {
        let result = self.client.fetch_profile().await;
        ValidationOutcome {
            generation: self.generation,
            result,
        }
    }
}

/// Result of a [`Validation`], to be handed back to [`SessionStore::apply_validation`].
#[derive(Debug)]
pub struct ValidationOutcome {
    generation: u64,
    result: ApiResult<User>,
}

impl ValidationOutcome {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Holds the credential and identity for the running client.
///
/// Invariants:
/// - identity is only ever `Some` while credential is `Some`
/// - a credential that fails validation is cleared together with the identity,
///   both in memory and in durable storage
/// - `generation` changes every time the credential changes
pub struct SessionStore {
    api: ApiClient,
    store: Box<dyn TokenStore>,
    credential: Option<Credential>,
    identity: Option<User>,
    loading: bool,
    generation: u64,
    /// Generation for which a validation has already been started
    validated_generation: Option<u64>,
}

impl SessionStore {
    /// Create the session, reading any persisted credential.
    ///
    /// `loading` starts out true only when a credential was found and still
    /// needs validating.
    pub fn new(api: ApiClient, store: Box<dyn TokenStore>) -> Self {
        let credential = match store.load() {
            Ok(credential) => credential,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted credential, starting logged out");
                None
            }
        };
        debug!(has_credential = credential.is_some(), "Session created");

        Self {
            api: api.anonymous(),
            store,
            loading: credential.is_some(),
            credential,
            identity: None,
            generation: 0,
            validated_generation: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn identity(&self) -> Option<&User> {
        self.identity.as_ref()
    }

    /// True only while the initial validation pass is outstanding
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A client that mirrors the current credential.
    ///
    /// Take a fresh one after every login/logout; a client obtained earlier
    /// keeps the credential it was created with.
    pub fn client(&self) -> ApiClient {
        match self.credential {
            Some(ref credential) => self.api.with_token(credential.clone()),
            None => self.api.anonymous(),
        }
    }

    // =========================================================================
    // Bootstrap
    // =========================================================================

    /// Start validating the current credential, once per credential value.
    ///
    /// Returns `None` when there is nothing to validate: no credential, or this
    /// credential value already had its validation started.
    pub fn begin_validation(&mut self) -> Option<Validation> {
        if self.validated_generation == Some(self.generation) {
            return None;
        }
        self.validated_generation = Some(self.generation);

        let Some(ref credential) = self.credential else {
            self.loading = false;
            return None;
        };

        debug!(generation = self.generation, "Validating credential");
        Some(Validation {
            generation: self.generation,
            client: self.api.with_token(credential.clone()),
        })
    }

    /// Commit a validation result. Returns false if it was discarded as stale.
    ///
    /// A result whose generation no longer matches belongs to a credential
    /// that has since been replaced or logged out, and is dropped.
    pub fn apply_validation(&mut self, outcome: ValidationOutcome) -> bool {
        if outcome.generation != self.generation {
            warn!(
                outcome_generation = outcome.generation,
                current_generation = self.generation,
                "Discarding stale credential validation"
            );
            return false;
        }

        match outcome.result {
            Ok(user) => {
                debug!(user_id = user.id, "Credential valid");
                self.identity = Some(user);
            }
            Err(e) => {
                // Expired token and unreachable server are treated alike
                warn!(error = %e, "Credential validation failed, clearing session");
                self.clear();
            }
        }
        self.loading = false;
        true
    }

    /// Validate the current credential and apply the result in one step.
    ///
    /// A no-op when this credential's validation is already under way
    /// elsewhere; `loading` then stays set until that result is applied.
    pub async fn bootstrap(&mut self) {
        if let Some(validation) = self.begin_validation() {
            let outcome = validation.run().await;
            self.apply_validation(outcome);
        }
    }

    // =========================================================================
    // Auth operations
    // =========================================================================

    /// Exchange email and password for a credential. Returns whether it worked;
    /// on failure the session is untouched.
    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        match self.api.login(email, password).await {
            Ok(response) => {
                let credential = Credential::new(response.access_token);
                if let Err(e) = self.store.save(&credential) {
                    warn!(error = %e, "Failed to persist credential");
                }
                info!(user_id = response.user.id, "Login successful");

                self.credential = Some(credential);
                self.identity = Some(response.user);
                self.loading = false;
                self.generation += 1;
                true
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                false
            }
        }
    }

    /// Create an account. Never touches the session; the new user still has to log in.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        is_freelancer: bool,
    ) -> bool {
        let request = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            is_freelancer,
        };
        match self.api.register(&request).await {
            Ok(()) => {
                info!(username = username, "Registration successful");
                true
            }
            Err(e) => {
                error!(error = %e, "Registration failed");
                false
            }
        }
    }

    /// Drop the credential and identity. No network call; safe to call repeatedly.
    pub fn logout(&mut self) {
        if self.credential.is_some() {
            info!("Logging out");
        }
        self.clear();
        self.loading = false;
    }

    /// Re-fetch the identity, e.g. after the user edited their profile.
    ///
    /// On failure the session is left as it was.
    pub async fn refresh_identity(&mut self) -> ApiResult<()> {
        if self.credential.is_none() {
            return Err(ApiError::Unauthorized);
        }
        let generation = self.generation;
        let user = self.client().fetch_profile().await?;
        if generation == self.generation {
            self.identity = Some(user);
        }
        Ok(())
    }

    fn clear(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear persisted credential");
        }
        if self.credential.take().is_some() {
            self.generation += 1;
        }
        self.identity = None;
    }
}

impl AuthState for SessionStore {
    fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

//! Live form sessions of one host.
//!
//! The registry is explicit state owned by whatever hosts several forms at
//! once. Sessions enter through `create_session` and leave through
//! `destroy_session`; two live sessions sharing a form id get a warning,
//! since their submissions cannot be told apart.

use std::sync::Arc;

use form_config::FormConfig;
use form_core::Value;
use form_schema::{ValidateFormOptions, Validator, validate_form};
use tracing::{debug, warn};

use crate::error::SessionError;
use crate::session::FormSession;

struct Entry<V> {
    /// Form id at creation; later id changes do not move the entry.
    id: String,
    session: Arc<FormSession<V>>,
}

pub struct SessionRegistry<V> {
    config: FormConfig,
    sessions: Vec<Entry<V>>,
}

impl<V: Validator> Default for SessionRegistry<V> {
    fn default() -> Self {
        Self::new(FormConfig::default())
    }
}

impl<V: Validator> SessionRegistry<V> {
    /// Sessions created here share `config`.
    #[must_use]
    pub const fn new(config: FormConfig) -> Self {
        Self {
            config,
            sessions: Vec::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Register a session for an already validated form.
    ///
    /// # Errors
    ///
    /// Returns any error from [`FormSession::new`].
    pub fn create_session(
        &mut self,
        validator: Arc<V>,
        form: form_schema::Validated,
    ) -> Result<Arc<FormSession<V>>, SessionError> {
        let session = FormSession::new(validator, form, self.config.clone())?;
        Ok(self.track(session))
    }

    /// Validate `data` (or the schema defaults) and register a session for
    /// the result.
    ///
    /// # Errors
    ///
    /// Propagates validator failures and any error from [`FormSession::new`].
    pub async fn open_session(
        &mut self,
        validator: Arc<V>,
        data: Option<&Value>,
        options: &ValidateFormOptions,
    ) -> Result<Arc<FormSession<V>>, SessionError> {
        let form = validate_form(validator.as_ref(), data, options).await?;
        self.create_session(validator, form)
    }

    /// Register a session for raw, unvalidated data.
    ///
    /// # Errors
    ///
    /// Returns any error from [`FormSession::from_data`].
    pub fn create_from_data(&mut self, validator: Arc<V>, data: Value) -> Result<Arc<FormSession<V>>, SessionError> {
        let session = FormSession::from_data(validator, data, self.config.clone())?;
        Ok(self.track(session))
    }

    fn track(&mut self, session: FormSession<V>) -> Arc<FormSession<V>> {
        let id = session.form_id();
        if self.config.warnings.duplicate_id && self.contains(&id) {
            warn!(
                form = %id,
                "duplicate form id; give each form a unique id or set warnings.duplicate_id = false"
            );
        }
        debug!(form = %id, live = self.sessions.len() + 1, "session created");

        let session = Arc::new(session);
        self.sessions.push(Entry {
            id,
            session: Arc::clone(&session),
        });
        session
    }

    /// Drop a session from the registry. Returns `false` if it was not
    /// registered here.
    pub fn destroy_session(&mut self, session: &Arc<FormSession<V>>) -> bool {
        let before = self.sessions.len();
        self.sessions
            .retain(|entry| !Arc::ptr_eq(&entry.session, session));
        let removed = before != self.sessions.len();
        if removed {
            debug!(form = %session.form_id(), "session destroyed");
        }
        removed
    }

    /// The oldest live session created with `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<FormSession<V>>> {
        self.sessions
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| Arc::clone(&entry.session))
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.sessions.iter().any(|entry| entry.id == id)
    }

    /// Form ids of live sessions, in creation order. Duplicates repeat.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.sessions.iter().map(|entry| entry.id.as_str()).collect()
    }

    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

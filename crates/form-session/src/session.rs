//! Form sessions.
//!
//! A [`FormSession`] owns the live trees of one form and decides, on every
//! data mutation, which fields changed, how their taint moves, and which of
//! them to re-validate.
//!
//! ## Mutation flow
//!
//! ```text
//! set_form / update_form
//!   -> diff against the last settled data (the baseline)
//!   -> taint update per directive
//!   -> per changed path, in order: validate if the method validates on
//!      every input, or if the path already has an error entry
//!   -> if no path was validated: refresh aggregate (`_errors`) messages
//! ```
//!
//! Validations of one mutation run one after another and each re-reads
//! the current data when it starts, so a late result reports against the
//! newest edits instead of a stale copy.

use std::sync::Arc;

use form_config::{DataType, FormConfig, ValidationMethod};
use form_core::traversal::{set_paths, walk};
use form_core::{
    ClearOptions, CoreError, ErrorTree, FORM_ERRORS_KEY, FlatError, Path, Segment, TaintTree,
    Value, Visit, diff,
};
use form_schema::{ValidateFormOptions, Validated, Validation, Validator, map_native_errors};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::directive::TaintDirective;
use crate::error::SessionError;
use crate::nested::check_flat_data;
use crate::options::{ResetOptions, ValidateOptions, ValidateOutcome};
use crate::snapshot::Snapshot;
use crate::store::Store;

/// What happens to taint when the whole form is replaced.
enum TaintReset {
    Keep,
    Clear,
    Restore(TaintTree),
}

pub struct FormSession<V> {
    validator: Arc<V>,
    config: FormConfig,
    initial: Validated,
    data: Store<Value>,
    /// Last settled data; the next diff runs against it.
    baseline: Store<Value>,
    errors: Store<ErrorTree>,
    tainted: Store<TaintTree>,
    message: Store<Option<String>>,
    posted: Store<bool>,
    form_id: Store<String>,
    last_changes: Store<Vec<Path>>,
    submitting: Store<bool>,
}

impl<V: Validator> FormSession<V> {
    /// Start a session from a validated form.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NestedData` when the form posts flat fields
    /// and `form.data` holds an object in one of them.
    pub fn new(validator: Arc<V>, form: Validated, config: FormConfig) -> Result<Self, SessionError> {
        if config.data.data_type == DataType::Form {
            check_flat_data(&form.data)?;
        }
        debug!(form = %form.id, valid = form.valid, "starting form session");

        Ok(Self {
            data: Store::new(form.data.clone()),
            baseline: Store::new(form.data.clone()),
            errors: Store::new(form.errors.clone()),
            tainted: Store::new(TaintTree::new()),
            message: Store::new(form.message.clone()),
            posted: Store::new(form.posted),
            form_id: Store::new(form.id.clone()),
            last_changes: Store::new(Vec::new()),
            submitting: Store::new(false),
            validator,
            config,
            initial: form,
        })
    }

    /// Start a session from raw data that never went through
    /// [`form_schema::validate_form`]. No initial validation is made.
    ///
    /// # Errors
    ///
    /// Same as [`FormSession::new`].
    pub fn from_data(validator: Arc<V>, data: Value, config: FormConfig) -> Result<Self, SessionError> {
        if config.warnings.no_validation_and_constraints {
            warn!(
                schema = validator.id(),
                "form data passed to a session directly, no initial validation was made; \
                 set warnings.no_validation_and_constraints = false to silence this"
            );
        }
        let form = Validated {
            id: validator.id().to_string(),
            valid: false,
            posted: false,
            errors: ErrorTree::new(),
            data,
            message: None,
        };
        Self::new(validator, form, config)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn data(&self) -> Value {
        self.data.get()
    }

    /// Subscribe to data changes. Writes go through [`FormSession::set_form`].
    #[must_use]
    pub fn subscribe_data(&self) -> watch::Receiver<Value> {
        self.data.subscribe()
    }

    #[must_use]
    pub const fn errors(&self) -> &Store<ErrorTree> {
        &self.errors
    }

    #[must_use]
    pub const fn tainted(&self) -> &Store<TaintTree> {
        &self.tainted
    }

    #[must_use]
    pub const fn message(&self) -> &Store<Option<String>> {
        &self.message
    }

    #[must_use]
    pub fn posted(&self) -> bool {
        self.posted.get()
    }

    #[must_use]
    pub fn form_id(&self) -> String {
        self.form_id.get()
    }

    /// Paths changed by the last mutation that was not ignored.
    #[must_use]
    pub fn last_changes(&self) -> Vec<Path> {
        self.last_changes.get()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting.get()
    }

    #[must_use]
    pub const fn config(&self) -> &FormConfig {
        &self.config
    }

    #[must_use]
    pub fn validator(&self) -> &V {
        &self.validator
    }

    /// Every current message with its path.
    #[must_use]
    pub fn all_errors(&self) -> Vec<FlatError> {
        self.errors.with(ErrorTree::flatten)
    }

    #[must_use]
    pub fn is_tainted(&self) -> bool {
        self.tainted.with(TaintTree::is_tainted)
    }

    #[must_use]
    pub fn is_path_tainted(&self, path: &Path) -> bool {
        self.tainted.with(|tainted| tainted.is_path_tainted(path))
    }

    /// The leave-page prompt, when one is configured, a field is touched,
    /// and no submission is in flight.
    #[must_use]
    pub fn tainted_message(&self) -> Option<&str> {
        if self.is_submitting() || !self.is_tainted() {
            return None;
        }
        self.config.tainted_message.as_deref()
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Replace the form data. Returns the paths the mutation changed.
    ///
    /// # Errors
    ///
    /// Propagates validator failures and error-tree writes through a
    /// message list.
    pub async fn set_form(&self, value: Value, directive: TaintDirective) -> Result<Vec<Path>, SessionError> {
        let changed = self.commit(value, directive);
        if !changed.is_empty() && self.config.validation.method.validates_on_update() {
            self.validate_changed(&changed).await?;
        }
        Ok(changed)
    }

    /// Modify a copy of the form data, then apply it as [`FormSession::set_form`] does.
    ///
    /// # Errors
    ///
    /// Same as [`FormSession::set_form`].
    pub async fn update_form<F>(&self, modify: F, directive: TaintDirective) -> Result<Vec<Path>, SessionError>
    where
        F: FnOnce(&mut Value) + Send,
    {
        let mut next = self.data.get();
        modify(&mut next);
        self.set_form(next, directive).await
    }

    /// Write data, diff it against the baseline and move taint. Returns
    /// the changed paths; nothing is validated here.
    fn commit(&self, value: Value, directive: TaintDirective) -> Vec<Path> {
        let (paths, directive) = match directive {
            TaintDirective::Ignore => {
                self.baseline.set(value.clone());
                self.data.set(value);
                return Vec::new();
            }
            TaintDirective::Fields(fields) => (fields, TaintDirective::Taint),
            other => (self.baseline.with(|old| diff(&value, old)), other),
        };

        self.baseline.set(value.clone());
        self.data.set(value);
        self.last_changes.set(paths.clone());
        if paths.is_empty() {
            return paths;
        }

        match directive {
            TaintDirective::UntaintAll => self.tainted.update(TaintTree::untaint_all),
            TaintDirective::Untaint => self.tainted.update(|tainted| {
                let cleared = tainted.untaint(&paths);
                debug!(cleared = cleared.len(), "untainted reverted fields");
            }),
            TaintDirective::Taint | TaintDirective::Fields(_) => {
                self.tainted.update(|tainted| tainted.taint(&paths));
            }
            TaintDirective::Ignore => {}
        }
        debug!(form = %self.form_id(), changed = paths.len(), "applied data mutation");
        paths
    }

    /// Validate the changed paths that qualify, one at a time and in order.
    /// When none does, refresh aggregate messages instead.
    async fn validate_changed(&self, paths: &[Path]) -> Result<(), SessionError> {
        let mut validated: Vec<Path> = Vec::new();
        for path in paths {
            let Some(target) = self.validation_target(path) else {
                continue;
            };
            if validated.contains(&target) {
                continue;
            }
            self.validate_field(&target, ValidateOptions::default()).await?;
            validated.push(target);
        }
        if validated.is_empty() {
            self.validate_object_errors().await?;
        }
        Ok(())
    }

    /// The field to validate for a changed path, if any.
    ///
    /// A path under a field whose entry is a message list (an object the
    /// schema treats as one value) resolves to that field, which always
    /// has an error. Otherwise the path itself qualifies on every input,
    /// or when it has an error entry, cleared ones included: a field that
    /// once showed an error is re-checked while typing, one that never did
    /// is left alone.
    fn validation_target(&self, path: &Path) -> Option<Path> {
        let on_input = self.config.validation.method == ValidationMethod::OnInput;
        self.errors.with(|errors| {
            if let Some(field) = errors.enclosing_field(path) {
                return Some(field);
            }
            let present = matches!(errors.entry(path), Ok(Some(_)));
            (on_input || present).then(|| path.clone())
        })
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Validate one field, or the whole form when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Propagates validator failures and error-tree writes through a
    /// message list.
    pub async fn validate(
        &self,
        path: Option<&Path>,
        options: ValidateOptions,
    ) -> Result<ValidateOutcome, SessionError> {
        match path {
            Some(path) => Ok(ValidateOutcome::Field(self.validate_field(path, options).await?)),
            None => Ok(ValidateOutcome::Form(Box::new(self.validate_form().await?))),
        }
    }

    /// Validate the current data as a whole. Stores are not touched.
    ///
    /// # Errors
    ///
    /// Propagates validator failures.
    pub async fn validate_form(&self) -> Result<Validated, SessionError> {
        let data = self.data.get();
        let options = ValidateFormOptions {
            id: Some(self.form_id()),
            ..ValidateFormOptions::default()
        };
        Ok(form_schema::validate_form(self.validator.as_ref(), Some(&data), &options).await?)
    }

    /// Validate one field and return its messages, `None` when it is valid.
    ///
    /// The whole form is run through the validator. On success every error
    /// is cleared and the field's entry is left `Undefined`. On failure the
    /// field's entry is written (or cleared), aggregate messages are
    /// refreshed, and touched fields get their messages too.
    ///
    /// # Errors
    ///
    /// Propagates validator failures and error-tree writes through a
    /// message list.
    pub async fn validate_field(
        &self,
        path: &Path,
        options: ValidateOptions,
    ) -> Result<Option<Vec<String>>, SessionError> {
        let ValidateOptions {
            value,
            update,
            taint,
            errors: custom,
        } = options;

        let checked = match value {
            Some(value) => {
                let mut next = self.data.get();
                set_paths(&mut next, [path], &value);
                if update.writes_value() {
                    self.commit(next.clone(), taint.unwrap_or(TaintDirective::Untaint));
                }
                next
            }
            None => self.data.get(),
        };

        debug!(form = %self.form_id(), path = %path, "validating field");
        match self.validator.parse_async(&checked).await? {
            Validation::Valid(_) => {
                if update.writes_errors() {
                    self.errors.update(|errors| {
                        errors.clear(&ClearOptions {
                            clear_form_level_errors: true,
                            undefine_path: Some(path),
                        });
                    });
                }
                Ok(None)
            }
            Validation::Invalid(native) => {
                let mapped = map_native_errors(&native, self.validator.shape());
                let messages = mapped.messages(path).map(|found| custom.unwrap_or(found));
                if update.writes_errors() {
                    let tainted = self.tainted.get();
                    self.errors.try_update(|errors| {
                        merge_aggregates(errors, &mapped, &tainted)?;
                        errors.set_messages(path, messages.clone())
                    })?;
                }
                Ok(messages)
            }
        }
    }

    /// Refresh aggregate (`_errors`) messages across the tree, plus the
    /// messages of touched fields, without singling out a field.
    ///
    /// # Errors
    ///
    /// Propagates validator failures and error-tree writes through a
    /// message list.
    pub async fn validate_object_errors(&self) -> Result<(), SessionError> {
        let data = self.data.get();
        match self.validator.parse_async(&data).await? {
            Validation::Valid(_) => self.errors.update(ErrorTree::clear_aggregates),
            Validation::Invalid(native) => {
                let mapped = map_native_errors(&native, self.validator.shape());
                let tainted = self.tainted.get();
                self.errors
                    .try_update(|errors| merge_aggregates(errors, &mapped, &tainted))?;
            }
        }
        debug!(form = %self.form_id(), "refreshed aggregate errors");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Errors
    // -----------------------------------------------------------------------

    /// Add messages at a field, or at form level when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotAField` when the path passes through a
    /// message list.
    pub fn set_error(&self, path: Option<&Path>, messages: Vec<String>, overwrite: bool) -> Result<(), SessionError> {
        self.errors
            .try_update(|errors| errors.set_error(path, messages, overwrite))?;
        Ok(())
    }

    /// Clear every message, form-level ones included. Keys stay in place.
    pub fn clear_errors(&self) {
        self.errors.update(|errors| {
            errors.clear(&ClearOptions {
                clear_form_level_errors: true,
                undefine_path: None,
            });
        });
    }

    // -----------------------------------------------------------------------
    // Submission and rebinding
    // -----------------------------------------------------------------------

    /// Mark a submission as started and clear what `submit.clear_on_submit`
    /// asks for.
    pub fn begin_submit(&self) {
        let clear = self.config.submit.clear_on_submit;
        self.submitting.set(true);
        if clear.clears_errors() {
            self.clear_errors();
        }
        if clear.clears_message() {
            self.message.set(None);
        }
        debug!(form = %self.form_id(), ?clear, "submission started");
    }

    /// Take a validated form back from the server.
    ///
    /// `untaint` marks the round-trip as successful: taint is dropped, and a
    /// valid form is reset to its initial data when `submit.reset_form` is
    /// set, keeping the returned message.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NestedData` for nested data in a flat form.
    pub fn update_from_validation(&self, form: Validated, untaint: bool) -> Result<(), SessionError> {
        if form.valid && untaint && self.config.submit.reset_form {
            return self.reset_to(form.message, None, None);
        }
        let taint = if untaint { TaintReset::Clear } else { TaintReset::Keep };
        self.rebind(form, taint, None)
    }

    /// Put the form back to its initial state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NestedData` for nested data in a flat form.
    pub fn reset(&self, options: ResetOptions) -> Result<(), SessionError> {
        let message = if options.keep_message {
            self.message.get()
        } else {
            None
        };
        self.reset_to(message, options.data, options.id)
    }

    fn reset_to(&self, message: Option<String>, data: Option<Value>, id: Option<String>) -> Result<(), SessionError> {
        let mut form = self.initial.clone();
        if let Some(data) = data {
            form.data = merge_top_level(form.data, data);
        }
        if let Some(id) = id {
            form.id = id;
        }
        debug!(form = %form.id, "resetting form");
        self.rebind(form, TaintReset::Clear, message)
    }

    #[must_use]
    pub fn capture(&self) -> Snapshot {
        Snapshot {
            id: self.form_id(),
            valid: self.initial.valid,
            posted: self.posted(),
            errors: self.errors.get(),
            data: self.data(),
            message: self.message.get(),
            tainted: Some(self.tainted.get()),
        }
    }

    /// # Errors
    ///
    /// Returns `SessionError::NestedData` for nested data in a flat form.
    pub fn restore(&self, snapshot: Snapshot) -> Result<(), SessionError> {
        let taint = snapshot
            .tainted
            .map_or(TaintReset::Clear, TaintReset::Restore);
        let form = Validated {
            id: snapshot.id,
            valid: snapshot.valid,
            posted: snapshot.posted,
            errors: snapshot.errors,
            data: snapshot.data,
            message: snapshot.message,
        };
        self.rebind(form, taint, None)
    }

    /// Replace every store from `form`. The data write is ignored for taint
    /// and validation, so aggregate errors the form carries stay visible.
    fn rebind(&self, form: Validated, taint: TaintReset, message: Option<String>) -> Result<(), SessionError> {
        if self.config.data.data_type == DataType::Form {
            check_flat_data(&form.data)?;
        }
        match taint {
            TaintReset::Keep => {}
            TaintReset::Clear => self.tainted.set(TaintTree::new()),
            TaintReset::Restore(tainted) => self.tainted.set(tainted),
        }
        self.commit(form.data, TaintDirective::Ignore);
        self.message.set(message.or(form.message));
        self.errors.set(form.errors);
        self.form_id.set(form.id);
        self.posted.set(form.posted);
        self.submitting.set(false);
        Ok(())
    }
}

/// Replace every `_errors` list in `current` with those of `fresh`, and
/// copy the messages of touched fields. Untouched fields keep whatever
/// they showed before.
fn merge_aggregates(current: &mut ErrorTree, fresh: &ErrorTree, tainted: &TaintTree) -> Result<(), CoreError> {
    current.clear_aggregates();

    let mut copy = Vec::new();
    walk(fresh.as_value(), |node| {
        if !matches!(node.value, Some(Value::Array(_))) {
            return Visit::Continue;
        }
        let aggregate = matches!(node.key, Segment::Key(key) if key == FORM_ERRORS_KEY);
        if aggregate || tainted.is_path_tainted(node.path) {
            copy.push(Path::from(node.path));
        }
        Visit::Skip
    });

    for path in copy {
        current.set_messages(&path, fresh.messages(&path))?;
    }
    Ok(())
}

fn merge_top_level(base: Value, overrides: Value) -> Value {
    match (base, overrides) {
        (Value::Object(mut fields), Value::Object(extra)) => {
            fields.extend(extra);
            Value::Object(fields)
        }
        (_, overrides) => overrides,
    }
}

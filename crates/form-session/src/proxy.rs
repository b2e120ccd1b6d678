//! Field proxies.
//!
//! A proxy binds one path of a data tree so it can be read and written as
//! if it were its own value. [`FieldProxy`] works on any `Store<Value>`;
//! [`SessionField`] works on a [`FormSession`] and writes through
//! [`FormSession::set_form`], so edits are diffed, tainted and validated
//! like any other mutation.
//!
//! Text inputs only hold strings. A [`TextFormat`] converts between the
//! text of an input and the typed value of its field: integers, numbers,
//! booleans and dates.
//!
//! ```no_run
//! use form_core::Value;
//! use form_session::{FieldProxy, Store, TextFormat};
//! use serde_json::json;
//!
//! # fn run() -> Result<(), form_session::SessionError> {
//! let form = Store::new(Value::from(json!({"age": 0})));
//! let age = FieldProxy::new(form.clone(), "age")?;
//! age.set_text(&TextFormat::int(), "42")?;
//! assert_eq!(age.get(), Value::from(42));
//! # Ok(())
//! # }
//! ```

use chrono::SecondsFormat;
use form_core::traversal::set_paths;
use form_core::{Path, Value};
use form_schema::Validator;
use form_schema::dates::{parse_calendar_date, parse_date_time};
use tokio::sync::watch;

use crate::directive::TaintDirective;
use crate::error::SessionError;
use crate::session::FormSession;
use crate::store::Store;

// ---------------------------------------------------------------------------
// Text conversion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    Int,
    Number,
    Boolean,
    /// RFC 3339 instants, rendered with milliseconds in UTC.
    Date,
    /// `YYYY-MM-DD` days, stored as midnight UTC.
    CalendarDate,
}

/// What an empty input stores. Booleans ignore this: empty is `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyAs {
    #[default]
    Undefined,
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextFormat {
    pub kind: TextKind,
    pub empty: EmptyAs,
}

impl TextFormat {
    #[must_use]
    pub const fn new(kind: TextKind) -> Self {
        Self {
            kind,
            empty: EmptyAs::Undefined,
        }
    }

    #[must_use]
    pub const fn int() -> Self {
        Self::new(TextKind::Int)
    }

    #[must_use]
    pub const fn number() -> Self {
        Self::new(TextKind::Number)
    }

    #[must_use]
    pub const fn boolean() -> Self {
        Self::new(TextKind::Boolean)
    }

    #[must_use]
    pub const fn date() -> Self {
        Self::new(TextKind::Date)
    }

    #[must_use]
    pub const fn calendar_date() -> Self {
        Self::new(TextKind::CalendarDate)
    }

    #[must_use]
    pub const fn empty_as(mut self, empty: EmptyAs) -> Self {
        self.empty = empty;
        self
    }

    /// The input text for `value`. Missing and null values are empty.
    #[must_use]
    pub fn render(&self, value: &Value) -> String {
        match (self.kind, value) {
            (_, Value::Undefined | Value::Null) => String::new(),
            (_, Value::String(text)) => text.clone(),
            (_, Value::Number(n)) => n.to_string(),
            (_, Value::Bool(b)) => b.to_string(),
            (TextKind::CalendarDate, Value::Date(date)) => date.format("%Y-%m-%d").to_string(),
            (_, Value::Date(date)) => date.to_rfc3339_opts(SecondsFormat::Millis, true),
            _ => String::new(),
        }
    }

    /// The field value for input `text`, or `None` when the text does not
    /// read as this kind.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn parse(&self, text: &str) -> Option<Value> {
        let text = text.trim();
        if self.kind == TextKind::Boolean {
            return match text {
                "true" | "on" | "1" => Some(Value::Bool(true)),
                "" | "false" | "off" | "0" => Some(Value::Bool(false)),
                _ => None,
            };
        }
        if text.is_empty() {
            return Some(match self.empty {
                EmptyAs::Undefined => Value::Undefined,
                EmptyAs::Null => Value::Null,
            });
        }
        match self.kind {
            TextKind::Int => text.parse::<i64>().ok().map(|n| Value::Number(n as f64)),
            TextKind::Number => text
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Value::Number),
            TextKind::Date => parse_date_time(text)
                .or_else(|| parse_calendar_date(text))
                .map(Value::Date),
            TextKind::CalendarDate => parse_calendar_date(text)
                .or_else(|| parse_date_time(text))
                .map(Value::Date),
            TextKind::Boolean => None,
        }
    }

    const fn expected(&self) -> &'static str {
        match self.kind {
            TextKind::Int => "integer",
            TextKind::Number => "number",
            TextKind::Boolean => "boolean",
            TextKind::Date => "date-time",
            TextKind::CalendarDate => "date",
        }
    }

    fn read(&self, path: &Path, text: &str) -> Result<Value, SessionError> {
        self.parse(text).ok_or_else(|| SessionError::InvalidFieldText {
            path: path.to_string(),
            text: text.to_string(),
            expected: self.expected(),
        })
    }
}

fn field_path(path: &str) -> Result<Path, SessionError> {
    Ok(Path::parse(path)?)
}

fn value_at(root: &Value, path: &Path) -> Value {
    root.pointer(path).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Store-backed proxy
// ---------------------------------------------------------------------------

/// One field of a `Store<Value>`.
#[derive(Debug, Clone)]
pub struct FieldProxy {
    store: Store<Value>,
    path: Path,
}

impl FieldProxy {
    /// Bind the field at string path `path` (`"test[2]"`, `"address.city"`).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Core` when the path does not parse.
    pub fn new(store: Store<Value>, path: &str) -> Result<Self, SessionError> {
        Ok(Self::at(store, field_path(path)?))
    }

    #[must_use]
    pub const fn at(store: Store<Value>, path: Path) -> Self {
        Self { store, path }
    }

    #[must_use]
    pub const fn path(&self) -> &Path {
        &self.path
    }

    /// The field's value, `Undefined` when it is missing.
    #[must_use]
    pub fn get(&self) -> Value {
        self.store.with(|root| value_at(root, &self.path))
    }

    /// Write the field, creating missing parents.
    pub fn set(&self, value: Value) {
        self.store.update(|root| set_paths(root, [&self.path], &value));
    }

    pub fn update(&self, modify: impl FnOnce(&mut Value)) {
        let mut value = self.get();
        modify(&mut value);
        self.set(value);
    }

    #[must_use]
    pub fn get_text(&self, format: &TextFormat) -> String {
        format.render(&self.get())
    }

    /// Convert `text` and write it. Text that does not convert leaves the
    /// store untouched.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidFieldText` when `text` does not read
    /// as `format`.
    pub fn set_text(&self, format: &TextFormat, text: &str) -> Result<(), SessionError> {
        let value = format.read(&self.path, text)?;
        self.set(value);
        Ok(())
    }

    #[must_use]
    pub fn watch(&self) -> FieldWatch {
        FieldWatch::new(self.store.subscribe(), self.path.clone())
    }
}

// ---------------------------------------------------------------------------
// Session-backed proxy
// ---------------------------------------------------------------------------

/// One field of a [`FormSession`]. Writes taint the field and run the
/// session's validation.
pub struct SessionField<'s, V> {
    session: &'s FormSession<V>,
    path: Path,
}

impl<V: Validator> FormSession<V> {
    /// Bind the field at string path `path`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Core` when the path does not parse.
    pub fn field(&self, path: &str) -> Result<SessionField<'_, V>, SessionError> {
        Ok(SessionField {
            session: self,
            path: field_path(path)?,
        })
    }
}

impl<V: Validator> SessionField<'_, V> {
    #[must_use]
    pub const fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn get(&self) -> Value {
        value_at(&self.session.data(), &self.path)
    }

    /// Write the field and taint it. Returns the paths that changed.
    ///
    /// # Errors
    ///
    /// Same as [`FormSession::set_form`].
    pub async fn set(&self, value: Value) -> Result<Vec<Path>, SessionError> {
        self.set_with(value, TaintDirective::Taint).await
    }

    /// Write the field, moving taint per `directive`.
    ///
    /// # Errors
    ///
    /// Same as [`FormSession::set_form`].
    pub async fn set_with(&self, value: Value, directive: TaintDirective) -> Result<Vec<Path>, SessionError> {
        let path = self.path.clone();
        self.session
            .update_form(move |root| set_paths(root, [&path], &value), directive)
            .await
    }

    #[must_use]
    pub fn get_text(&self, format: &TextFormat) -> String {
        format.render(&self.get())
    }

    /// Convert `text` and write it as [`SessionField::set`] does.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidFieldText` when `text` does not read
    /// as `format`; the session is left untouched. Otherwise same as
    /// [`FormSession::set_form`].
    pub async fn set_text(&self, format: &TextFormat, text: &str) -> Result<Vec<Path>, SessionError> {
        let value = format.read(&self.path, text)?;
        self.set(value).await
    }

    #[must_use]
    pub fn watch(&self) -> FieldWatch {
        FieldWatch::new(self.session.subscribe_data(), self.path.clone())
    }
}

// ---------------------------------------------------------------------------
// Change notifications
// ---------------------------------------------------------------------------

/// Notifies when one field's value changes. Writes elsewhere in the tree
/// are skipped.
#[derive(Debug)]
pub struct FieldWatch {
    rx: watch::Receiver<Value>,
    path: Path,
    last: Value,
}

impl FieldWatch {
    fn new(rx: watch::Receiver<Value>, path: Path) -> Self {
        let last = value_at(&rx.borrow(), &path);
        Self { rx, path, last }
    }

    /// Wait for the field to hold a different value and return it.
    /// `None` once the data store is gone.
    pub async fn changed(&mut self) -> Option<Value> {
        loop {
            self.rx.changed().await.ok()?;
            let current = value_at(&self.rx.borrow_and_update(), &self.path);
            if current != self.last {
                self.last = current.clone();
                return Some(current);
            }
        }
    }
}

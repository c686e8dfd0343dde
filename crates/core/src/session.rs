use std::collections::HashMap;
use std::sync::Mutex;

/// Multi-step form in progress for one customer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormState {
    pub title: String,
    pub fields: Vec<String>,
    pub cursor: usize,
    pub collected: Vec<(String, String)>,
    pub completion_message: String,
}

impl FormState {
    pub fn new(title: String, fields: Vec<String>, completion_message: String) -> Self {
        Self { title, fields, cursor: 0, collected: Vec::new(), completion_message }
    }

    pub fn current_field(&self) -> Option<&str> {
        self.fields.get(self.cursor).map(String::as_str)
    }

    /// Records `answer` for the field at the cursor and advances. No effect
    /// once the form is complete.
    pub fn answer(&mut self, answer: &str) {
        if let Some(field) = self.fields.get(self.cursor) {
            self.collected.push((field.clone(), answer.to_string()));
            self.cursor += 1;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.fields.len()
    }
}

/// Per-customer conversation state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub awaiting_card: bool,
    pub form: Option<FormState>,
}

/// Process-wide map from customer id to [`Session`].
///
/// Sets merge non-destructively against any existing record: setting one
/// field never clears the other. Entries are created lazily and live for the
/// process lifetime — no expiry, no capacity bound.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: Mutex<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn awaiting_card(&self, customer_id: &str) -> bool {
        self.lock().get(customer_id).map(|session| session.awaiting_card).unwrap_or(false)
    }

    pub fn set_awaiting_card(&self, customer_id: &str, value: bool) {
        self.lock().entry(customer_id.to_string()).or_default().awaiting_card = value;
    }

    pub fn form(&self, customer_id: &str) -> Option<FormState> {
        self.lock().get(customer_id).and_then(|session| session.form.clone())
    }

    pub fn set_form(&self, customer_id: &str, form: FormState) {
        self.lock().entry(customer_id.to_string()).or_default().form = Some(form);
    }

    pub fn clear_form(&self, customer_id: &str) {
        if let Some(session) = self.lock().get_mut(customer_id) {
            session.form = None;
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Session>> {
        self.inner.lock().expect("session store lock poisoned")
    }
}

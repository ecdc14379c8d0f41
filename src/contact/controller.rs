use std::cell::{Cell, RefCell};

use super::{ContactForm, Field, Outcome, SubmitStatus, Transport};
use crate::error::TransportError;

/// Snapshot handed to the view on every state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactView {
    pub form: ContactForm,
    pub submitting: bool,
    pub status: Option<SubmitStatus>,
}

type Observer = Box<dyn Fn(&ContactView)>;

/// Owns the form state and runs at most one submission at a time.
///
/// Once [`ContactController::detach`] has been called, a response that is still
/// in flight ends the busy state but its outcome is dropped.
pub struct ContactController<T: Transport> {
    endpoint: String,
    transport: T,
    form: RefCell<ContactForm>,
    status: RefCell<Option<SubmitStatus>>,
    submitting: Cell<bool>,
    attached: Cell<bool>,
    observer: RefCell<Option<Observer>>,
}

impl<T: Transport> ContactController<T> {
    pub fn new(endpoint: impl Into<String>, transport: T) -> Self {
        Self {
            endpoint: endpoint.into(),
            transport,
            form: RefCell::new(ContactForm::default()),
            status: RefCell::new(None),
            submitting: Cell::new(false),
            attached: Cell::new(true),
            observer: RefCell::new(None),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn on_change(&self, observer: impl Fn(&ContactView) + 'static) {
        *self.observer.borrow_mut() = Some(Box::new(observer));
    }

    pub fn view(&self) -> ContactView {
        ContactView {
            form: self.form.borrow().clone(),
            submitting: self.submitting.get(),
            status: self.status.borrow().clone(),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.get()
    }

    pub fn status(&self) -> Option<SubmitStatus> {
        self.status.borrow().clone()
    }

    pub fn form(&self) -> ContactForm {
        self.form.borrow().clone()
    }

    pub fn set_field(&self, field: Field, value: impl Into<String>) {
        self.form.borrow_mut().set(field, value);
    }

    /// Stop applying results and notifying the view.
    pub fn detach(&self) {
        self.attached.set(false);
        self.observer.borrow_mut().take();
    }

    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }

    /// Post the current fields once and apply the outcome.
    ///
    /// Returns `None` without sending anything while another submission is
    /// outstanding, and also when the result arrives after detaching.
    pub async fn submit(&self) -> Option<SubmitStatus> {
        if self.submitting.get() {
            log::debug!("submission already in flight; ignoring");
            return None;
        }
        let _busy = Busy::enter(self);
        *self.status.borrow_mut() = None;
        self.notify();

        let form = self.form.borrow().clone();
        let result = match serde_json::to_string(&form) {
            Ok(body) => self.transport.post_json(&self.endpoint, body).await,
            Err(e) => Err(TransportError::Request(e.to_string())),
        };
        let outcome = Outcome::classify(result);

        if !self.attached.get() {
            log::info!("contact form detached; discarding late result {outcome:?}");
            return None;
        }
        match &outcome {
            Outcome::Success { .. } => log::info!("contact message delivered"),
            other => log::error!("contact form submission error: {other:?}"),
        }
        if outcome.is_success() {
            self.form.borrow_mut().clear();
        }
        let status = outcome.status();
        *self.status.borrow_mut() = Some(status.clone());
        Some(status)
    }

    fn notify(&self) {
        if !self.attached.get() {
            return;
        }
        let view = self.view();
        if let Some(observer) = self.observer.borrow().as_ref() {
            observer(&view);
        }
    }
}

/// Holds the busy flag for the duration of a submission, on every exit path.
struct Busy<'a, T: Transport> {
    ctl: &'a ContactController<T>,
}

impl<'a, T: Transport> Busy<'a, T> {
    fn enter(ctl: &'a ContactController<T>) -> Self {
        ctl.submitting.set(true);
        Self { ctl }
    }
}

impl<T: Transport> Drop for Busy<'_, T> {
    fn drop(&mut self) {
        self.ctl.submitting.set(false);
        self.ctl.notify();
    }
}

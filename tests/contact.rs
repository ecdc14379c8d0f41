use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::executor::block_on;
use portfolio_wasm::contact::{
    ContactController, ContactForm, ContactView, Field, HttpResponse, StatusKind, SubmitStatus,
    Transport, CONNECT_FAILURE_MESSAGE, DEFAULT_SUCCESS_MESSAGE,
};
use portfolio_wasm::error::TransportError;

type Reply = Result<HttpResponse, TransportError>;

enum Scripted {
    Now(Reply),
    Later(oneshot::Receiver<Reply>),
}

/// Transport that records requests and answers from a script.
#[derive(Default)]
struct ScriptedTransport {
    sent: RefCell<Vec<(String, String)>>,
    replies: RefCell<VecDeque<Scripted>>,
}

impl ScriptedTransport {
    fn replying(replies: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            sent: RefCell::default(),
            replies: RefCell::new(replies.into_iter().collect()),
        }
    }
}

impl Transport for ScriptedTransport {
    async fn post_json(&self, url: &str, body: String) -> Result<HttpResponse, TransportError> {
        self.sent.borrow_mut().push((url.to_string(), body));
        let next = self.replies.borrow_mut().pop_front();
        match next.expect("unscripted request") {
            Scripted::Now(reply) => reply,
            Scripted::Later(rx) => match rx.await {
                Ok(reply) => reply,
                Err(_) => Err(TransportError::NoResponse("dropped".into())),
            },
        }
    }
}

const ENDPOINT: &str = "https://example.test/api/contact";

fn reply(status: u16, body: &str) -> Reply {
    Ok(HttpResponse {
        status,
        body: body.to_string(),
    })
}

fn http(status: u16, body: &str) -> Scripted {
    Scripted::Now(reply(status, body))
}

fn submit_now(ctl: &ContactController<ScriptedTransport>) -> Option<SubmitStatus> {
    block_on(ctl.submit())
}

fn filled(transport: ScriptedTransport) -> ContactController<ScriptedTransport> {
    let ctl = ContactController::new(ENDPOINT, transport);
    ctl.set_field(Field::Name, "Ada Lovelace");
    ctl.set_field(Field::Email, "ada@example.com");
    ctl.set_field(Field::Message, "Let's build something.");
    ctl
}

#[test]
fn sends_exactly_one_post_with_current_fields() {
    let ctl = filled(ScriptedTransport::replying([http(200, "{}")]));
    submit_now(&ctl);

    let sent = ctl.transport().sent.borrow();
    assert_eq!(sent.len(), 1);
    let (url, body) = &sent[0];
    assert_eq!(url, ENDPOINT);
    let body: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "message": "Let's build something.",
        })
    );
}

#[test]
fn success_sets_server_message_and_clears_fields() {
    let ctl = filled(ScriptedTransport::replying([http(200, r#"{"message": "ok"}"#)]));
    let status = submit_now(&ctl);

    assert_eq!(status, Some(SubmitStatus::success("ok")));
    assert_eq!(ctl.status(), Some(SubmitStatus::success("ok")));
    assert_eq!(ctl.form(), ContactForm::default());
    assert!(!ctl.is_submitting());
}

#[test]
fn success_without_message_thanks_the_sender() {
    let ctl = filled(ScriptedTransport::replying([http(204, "")]));
    let thanks = SubmitStatus::success(DEFAULT_SUCCESS_MESSAGE);
    assert_eq!(submit_now(&ctl), Some(thanks));
}

#[test]
fn server_error_keeps_fields() {
    let ctl = filled(ScriptedTransport::replying([http(500, r#"{"message": "boom"}"#)]));
    let before = ctl.form();
    let status = submit_now(&ctl);

    assert_eq!(status, Some(SubmitStatus::error("boom")));
    assert_eq!(ctl.form(), before);
    assert!(!ctl.is_submitting());
}

#[test]
fn server_error_without_message_reports_code() {
    let ctl = filled(ScriptedTransport::replying([http(422, "{}")]));
    let status = submit_now(&ctl);
    assert_eq!(status, Some(SubmitStatus::error("Server error: 422")));
}

#[test]
fn network_failure_reports_connectivity() {
    let failed = TransportError::NoResponse("Failed to fetch".into());
    let ctl = filled(ScriptedTransport::replying([Scripted::Now(Err(failed))]));
    let status = submit_now(&ctl).unwrap();
    assert_eq!(status.kind, StatusKind::Error);
    assert_eq!(status.message, CONNECT_FAILURE_MESSAGE);
    assert_eq!(ctl.form().name, "Ada Lovelace");
}

#[test]
fn local_failure_reports_its_description() {
    let failed = TransportError::Request("Invalid URL".into());
    let ctl = filled(ScriptedTransport::replying([Scripted::Now(Err(failed))]));
    assert_eq!(submit_now(&ctl), Some(SubmitStatus::error("Invalid URL")));
}

#[test]
fn resubmit_while_outstanding_is_a_noop() {
    let (tx, rx) = oneshot::channel();
    let ctl = filled(ScriptedTransport::replying([Scripted::Later(rx)]));

    block_on(async {
        let first = ctl.submit();
        futures::pin_mut!(first);
        assert!(futures::poll!(first.as_mut()).is_pending());
        assert!(ctl.is_submitting());

        assert_eq!(ctl.submit().await, None);
        assert_eq!(ctl.transport().sent.borrow().len(), 1);
        assert!(ctl.is_submitting());

        tx.send(reply(200, "{}")).unwrap();
        let thanks = SubmitStatus::success(DEFAULT_SUCCESS_MESSAGE);
        assert_eq!(first.await, Some(thanks));
    });
    assert!(!ctl.is_submitting());
}

#[test]
fn control_re_enables_after_error_and_allows_retry() {
    let ok = http(200, r#"{"message": "ok"}"#);
    let ctl = filled(ScriptedTransport::replying([http(503, "{}"), ok]));
    let first = submit_now(&ctl).map(|s| s.kind);
    assert_eq!(first, Some(StatusKind::Error));
    assert!(!ctl.is_submitting());
    assert_eq!(submit_now(&ctl), Some(SubmitStatus::success("ok")));
    assert_eq!(ctl.transport().sent.borrow().len(), 2);
}

#[test]
fn new_attempt_clears_previous_status() {
    let (tx, rx) = oneshot::channel();
    let ctl = filled(ScriptedTransport::replying([http(500, "{}"), Scripted::Later(rx)]));
    submit_now(&ctl);
    assert!(ctl.status().is_some());

    block_on(async {
        let retry = ctl.submit();
        futures::pin_mut!(retry);
        assert!(futures::poll!(retry.as_mut()).is_pending());
        assert_eq!(ctl.status(), None);
        tx.send(reply(500, r#"{"message": "still down"}"#)).unwrap();
        retry.await;
    });
    assert_eq!(ctl.status(), Some(SubmitStatus::error("still down")));
}

#[test]
fn observer_sees_busy_then_result() {
    let ctl = filled(ScriptedTransport::replying([http(200, r#"{"message": "ok"}"#)]));
    let views: Rc<RefCell<Vec<ContactView>>> = Rc::default();
    {
        let views = views.clone();
        ctl.on_change(move |v| views.borrow_mut().push(v.clone()));
    }
    submit_now(&ctl);

    let views = views.borrow();
    assert_eq!(views.len(), 2);
    assert!(views[0].submitting);
    assert_eq!(views[0].status, None);
    assert_eq!(views[0].form.name, "Ada Lovelace");
    assert!(!views[1].submitting);
    assert_eq!(views[1].status, Some(SubmitStatus::success("ok")));
    assert_eq!(views[1].form.name, "");
}

#[test]
fn late_result_after_detach_is_discarded() {
    let (tx, rx) = oneshot::channel();
    let ctl = filled(ScriptedTransport::replying([Scripted::Later(rx)]));
    let notified = Rc::new(RefCell::new(0));
    {
        let notified = notified.clone();
        ctl.on_change(move |_| *notified.borrow_mut() += 1);
    }

    block_on(async {
        let pending = ctl.submit();
        futures::pin_mut!(pending);
        assert!(futures::poll!(pending.as_mut()).is_pending());
        ctl.detach();
        tx.send(reply(200, r#"{"message": "ok"}"#)).unwrap();
        assert_eq!(pending.await, None);
    });

    assert!(!ctl.is_attached());
    assert!(!ctl.is_submitting());
    assert_eq!(ctl.status(), None);
    assert_eq!(ctl.form().message, "Let's build something.");
    assert_eq!(*notified.borrow(), 1, "only the busy notification before detaching");
}

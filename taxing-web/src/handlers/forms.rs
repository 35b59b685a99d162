//! Contact, enquiry and newsletter forms

use super::pages::render_home;
use crate::{
    content::{ENQUIRY_BUDGETS, ENQUIRY_SERVICES, ENQUIRY_SOURCES, ENQUIRY_TIMELINES},
    render,
    session::PortalSession,
    templates::{ContactTemplate, EnquiryTemplate, EnquiryView, OptionView},
    AppState, WebResult,
};
use axum::{extract::State, response::Html, Form};
use serde::Deserialize;
use taxing_auth::{is_valid_email, Session};
use taxing_backend::{messages, ContactRequest, EnquiryRequest};
use tracing::{info, warn};

const REQUIRED_FIELDS: &str = "Please fill in all required fields";
const INVALID_EMAIL: &str = "Please enter a valid email address";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

pub async fn contact_page(
    State(state): State<AppState>,
    PortalSession(session): PortalSession,
) -> WebResult<Html<String>> {
    render(&ContactTemplate {
        chrome: state.chrome("Contact", &session),
        name: String::new(),
        email: String::new(),
        message: String::new(),
    })
}

pub async fn contact(
    State(state): State<AppState>,
    PortalSession(session): PortalSession,
    Form(form): Form<ContactForm>,
) -> WebResult<Html<String>> {
    let chrome = state.chrome("Contact", &session);
    let request = ContactRequest {
        name: form.name.clone(),
        email: form.email.clone(),
        message: form.message.clone(),
    };

    match state.backend.send_contact(&request).await {
        Ok(record) => {
            info!(id = record.id, "Contact message stored");
            render(&ContactTemplate {
                chrome: chrome.with_success(messages::CONTACT_SENT),
                name: String::new(),
                email: String::new(),
                message: String::new(),
            })
        }
        Err(e) => {
            warn!(error = %e, "Contact message failed");
            render(&ContactTemplate {
                chrome: chrome.with_error(messages::contact_failure(&e)),
                name: form.name,
                email: form.email,
                message: form.message,
            })
        }
    }
}

/// Enquiry form fields, named as the browser form submits them
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnquiryForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub job_title: String,
    pub service_type: String,
    pub budget: String,
    pub timeline: String,
    pub message: String,
    pub how_did_you_hear: String,
    pub franchise_code: String,
}

fn optional(value: &str) -> Option<String> {
    Some(value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

impl EnquiryForm {
    fn problem(&self) -> Option<&'static str> {
        if self.first_name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.message.trim().is_empty()
        {
            return Some(REQUIRED_FIELDS);
        }
        if !is_valid_email(self.email.trim()) {
            return Some(INVALID_EMAIL);
        }
        None
    }

    fn to_request(&self) -> EnquiryRequest {
        EnquiryRequest {
            first_name: self.first_name.trim().to_string(),
            last_name: optional(&self.last_name),
            email: self.email.trim().to_string(),
            phone: optional(&self.phone),
            company: optional(&self.company),
            job_title: optional(&self.job_title),
            service_type: optional(&self.service_type),
            budget: optional(&self.budget),
            timeline: optional(&self.timeline),
            message: self.message.clone(),
            how_did_you_hear: optional(&self.how_did_you_hear),
            franchise_code: optional(&self.franchise_code),
        }
    }

    fn view(&self) -> EnquiryView {
        EnquiryView {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            company: self.company.clone(),
            job_title: self.job_title.clone(),
            message: self.message.clone(),
            franchise_code: self.franchise_code.clone(),
        }
    }
}

fn enquiry_template(
    state: &AppState,
    session: &Session,
    form: &EnquiryForm,
    submitted: bool,
    outcome: Option<Result<String, String>>,
) -> EnquiryTemplate {
    EnquiryTemplate {
        chrome: state.chrome("Place Enquiry", session).with_outcome(outcome),
        form: form.view(),
        submitted,
        services: OptionView::from_choices(&ENQUIRY_SERVICES, &form.service_type),
        budgets: OptionView::from_choices(&ENQUIRY_BUDGETS, &form.budget),
        timelines: OptionView::from_choices(&ENQUIRY_TIMELINES, &form.timeline),
        sources: OptionView::from_choices(&ENQUIRY_SOURCES, &form.how_did_you_hear),
    }
}

pub async fn enquiry_page(
    State(state): State<AppState>,
    PortalSession(session): PortalSession,
) -> WebResult<Html<String>> {
    render(&enquiry_template(&state, &session, &EnquiryForm::default(), false, None))
}

pub async fn enquiry(
    State(state): State<AppState>,
    PortalSession(session): PortalSession,
    Form(form): Form<EnquiryForm>,
) -> WebResult<Html<String>> {
    if let Some(problem) = form.problem() {
        let outcome = Some(Err(problem.to_string()));
        return render(&enquiry_template(&state, &session, &form, false, outcome));
    }

    let outcome = match state.backend.submit_enquiry(&form.to_request()).await {
        Ok(record) => {
            info!(id = record.id, "Enquiry stored");
            Ok(messages::ENQUIRY_SENT.to_string())
        }
        Err(e) => {
            warn!(error = %e, "Enquiry failed");
            Err(messages::enquiry_failure(&e))
        }
    };

    let submitted = outcome.is_ok();
    let form = if submitted { EnquiryForm::default() } else { form };
    render(&enquiry_template(&state, &session, &form, submitted, Some(outcome)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewsletterForm {
    pub email: String,
}

/// Newsletter sign-up from the home page
pub async fn newsletter(
    State(state): State<AppState>,
    PortalSession(session): PortalSession,
    Form(form): Form<NewsletterForm>,
) -> WebResult<Html<String>> {
    let email = form.email.trim().to_string();
    if !is_valid_email(&email) {
        return render_home(&state, &session, Some(Err(INVALID_EMAIL.to_string())), email);
    }

    match state.backend.subscribe_newsletter(&email).await {
        Ok(record) => {
            info!(email = %record.email, status = %record.status, "Newsletter subscription stored");
            render_home(
                &state,
                &session,
                Some(Ok(messages::NEWSLETTER_SUBSCRIBED.to_string())),
                String::new(),
            )
        }
        Err(e) => {
            warn!(email = %email, error = %e, "Newsletter subscription failed");
            render_home(&state, &session, Some(Err(messages::newsletter_failure(&e))), email)
        }
    }
}

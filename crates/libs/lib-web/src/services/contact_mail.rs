//! # Contact Notification
//!
//! Renders the email the team would receive for each contact submission.
//! No mail transport is wired in; the rendered message is written to the log.

use chrono::{DateTime, Utc};
use lib_core::ContactSubmission;
use lib_utils::format_local;
use tracing::info;

const NOT_PROVIDED: &str = "Not provided";

/// Plain-text notification body for `submission`.
pub fn render_notification(submission: &ContactSubmission, received_at: DateTime<Utc>) -> String {
    format!(
        "New Contact Form Submission\n\
         --------------------------\n\
         Name: {name}\n\
         Email: {email}\n\
         Company: {company}\n\
         Phone: {phone}\n\
         \n\
         Message:\n\
         {message}\n\
         \n\
         This submission was received on {received}.\n",
        name = submission.name,
        email = submission.email,
        company = submission.company.as_deref().unwrap_or(NOT_PROVIDED),
        phone = submission.phone.as_deref().unwrap_or(NOT_PROVIDED),
        message = submission.message,
        received = format_local(received_at),
    )
}

/// Log the submission and the email that would be sent to `inbox`.
pub fn notify_new_contact(inbox: &str, submission: &ContactSubmission) {
    info!(id = submission.id, to = %inbox, "[CONTACT] Sending email to {}", inbox);
    info!(
        id = submission.id,
        "[CONTACT] From: {} <{}>",
        submission.name,
        submission.email
    );
    info!(
        id = submission.id,
        "[CONTACT] Company: {}",
        submission.company.as_deref().unwrap_or(NOT_PROVIDED)
    );
    info!(
        id = submission.id,
        "[CONTACT] Phone: {}",
        submission.phone.as_deref().unwrap_or(NOT_PROVIDED)
    );
    info!(id = submission.id, "[CONTACT] Message: {}", submission.message);

    let template = render_notification(submission, submission.created_at);
    info!(id = submission.id, "[CONTACT] Email Template:\n{}", template);
}

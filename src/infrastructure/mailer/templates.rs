use crate::{entities::contact_message::ContactMessage, settings::AppConfig};

use super::Email;

pub const AUTO_REPLY_SUBJECT: &str = "Thank you for your message - I'll get back to you soon!";

/// Alert sent to the site owner; replying goes straight to the sender.
pub fn admin_notification(message: &ContactMessage, config: &AppConfig) -> Email {
    let text = format!(
        "You have received a new {label}.\n\n\
         From: {from}\n\
         Type: {label}{priority}\n\
         Subject: {subject}\n\
         Received: {received}\n\n\
         {body}\n",
        label = message.message_type_label(),
        from = message.from_name_and_email(),
        priority = if message.priority { " (priority)" } else { "" },
        subject = message.subject,
        received = message.created_at.format("%Y-%m-%d %H:%M UTC"),
        body = message.message,
    );

    Email {
        from: config.mailer_from.clone(),
        to: config.admin_email.clone(),
        reply_to: Some(message.email.clone()),
        subject: format!("New {}: {}", message.message_type_label(), message.subject),
        text,
    }
}

pub fn auto_reply(message: &ContactMessage, config: &AppConfig) -> Email {
    let text = format!(
        "Hi {name},\n\n\
         Thanks for getting in touch. Your message has been received and I'll \
         get back to you as soon as possible.\n\n\
         For reference, here is what you sent:\n\n\
         Subject: {subject}\n\
         {snippet}\n",
        name = message.name,
        subject = message.subject,
        snippet = message.snippet(200),
    );

    Email {
        from: config.mailer_from.clone(),
        to: message.email.clone(),
        reply_to: None,
        subject: AUTO_REPLY_SUBJECT.to_string(),
        text,
    }
}

/// Reply written by the site owner to an earlier submission.
pub fn custom_reply(message: &ContactMessage, reply: &str, config: &AppConfig) -> Email {
    Email {
        from: config.admin_email.clone(),
        to: message.email.clone(),
        reply_to: None,
        subject: format!("Re: {}", message.subject),
        text: format!("Hi {},\n\n{}\n", message.name, reply),
    }
}

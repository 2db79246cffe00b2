use crate::config::Config;
use crate::models::ValidatedLead;
use serde::{Deserialize, Serialize};

/// Placeholder shown when the submitter left `details` blank.
pub const DETAILS_PLACEHOLDER: &str = "N/A";

/// Sender and recipient of lead notifications.
#[derive(Debug, Clone)]
pub struct MailSettings {
    pub from: String,
    pub to: String,
}

impl MailSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            from: config.mail_from.clone(),
            to: config.contact_email.clone(),
        }
    }
}

/// E-mail sent to the operator for every accepted lead.
///
/// Serializes to the body of Resend's `POST /emails`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NotificationMessage {
    pub from: String,
    pub to: Vec<String>,
    /// Submitter's address, so the operator can answer directly.
    pub reply_to: String,
    pub subject: String,
    pub html: String,
}

impl NotificationMessage {
    pub fn compose(lead: &ValidatedLead, settings: &MailSettings) -> Self {
        Self {
            from: settings.from.clone(),
            to: vec![settings.to.clone()],
            reply_to: lead.email.clone(),
            subject: subject_for(lead),
            html: render_html(lead),
        }
    }
}

pub fn subject_for(lead: &ValidatedLead) -> String {
    format!("✨ Nuevo Lead ClearHome: {}", lead.name)
}

fn render_html(lead: &ValidatedLead) -> String {
    let details = lead
        .details
        .as_deref()
        .map(escape_html)
        .unwrap_or_else(|| DETAILS_PLACEHOLDER.to_string());

    format!(
        r#"<div style="font-family: sans-serif; max-width: 600px; margin: 0 auto;">
  <h1 style="color: #003b6f;">¡Nueva Solicitud de Cotización!</h1>
  <p>Has recibido un nuevo contacto desde la web.</p>
  <div style="background-color: #f3f4f6; padding: 20px; border-radius: 8px;">
    <p><strong>👤 Nombre:</strong> {name}</p>
    <p><strong>📧 Email:</strong> {email}</p>
    <p><strong>📱 Teléfono:</strong> {phone}</p>
    <p><strong>🧹 Servicio:</strong> {service}</p>
    <p><strong>📝 Detalles:</strong><br/>{details}</p>
  </div>
  <p style="color: #666; font-size: 12px; margin-top: 20px;">
    Enviado automáticamente desde ClearHome Web Landing.
  </p>
</div>"#,
        name = escape_html(&lead.name),
        email = escape_html(&lead.email),
        phone = escape_html(&lead.phone),
        service = escape_html(&lead.service),
        details = details,
    )
}

/// Escapes the characters that are significant in HTML text and attributes.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead() -> ValidatedLead {
        ValidatedLead {
            name: "Ana".to_string(),
            phone: "+56911112222".to_string(),
            email: "ana@x.cl".to_string(),
            service: "Limpieza de Oficinas".to_string(),
            details: None,
            token: None,
        }
    }

    fn settings() -> MailSettings {
        MailSettings {
            from: "ClearHome Web <onboarding@resend.dev>".to_string(),
            to: "contacto@clearhome.cl".to_string(),
        }
    }

    #[test]
    fn test_compose_addresses() {
        let message = NotificationMessage::compose(&lead(), &settings());

        assert_eq!(message.from, "ClearHome Web <onboarding@resend.dev>");
        assert_eq!(message.to, vec!["contacto@clearhome.cl".to_string()]);
        assert_eq!(message.reply_to, "ana@x.cl");
        assert_eq!(message.subject, "✨ Nuevo Lead ClearHome: Ana");
    }

    #[test]
    fn test_body_contains_every_field() {
        let mut lead = lead();
        lead.details = Some("Depto en Ñuñoa".to_string());
        let html = NotificationMessage::compose(&lead, &settings()).html;

        assert!(html.contains("¡Nueva Solicitud de Cotización!"));
        assert!(html.contains("<strong>👤 Nombre:</strong> Ana"));
        assert!(html.contains("<strong>📧 Email:</strong> ana@x.cl"));
        assert!(html.contains("<strong>📱 Teléfono:</strong> +56911112222"));
        assert!(html.contains("<strong>🧹 Servicio:</strong> Limpieza de Oficinas"));
        assert!(html.contains("<br/>Depto en Ñuñoa"));
    }

    #[test]
    fn test_missing_details_use_placeholder() {
        let html = NotificationMessage::compose(&lead(), &settings()).html;

        assert!(html.contains("<br/>N/A</p>"));
    }

    #[test]
    fn test_user_input_is_escaped() {
        let mut lead = lead();
        lead.name = "<script>alert('x')</script>".to_string();
        lead.details = Some("a & b".to_string());
        let html = NotificationMessage::compose(&lead, &settings()).html;

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(html.contains("a &amp; b"));
    }

    #[test]
    fn test_serializes_to_resend_shape() {
        let value = serde_json::to_value(NotificationMessage::compose(&lead(), &settings())).unwrap();

        assert_eq!(value["reply_to"], "ana@x.cl");
        assert_eq!(value["to"][0], "contacto@clearhome.cl");
        assert!(value["html"].is_string());
    }
}

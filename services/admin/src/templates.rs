//! Transactional email content.

use chrono::NaiveDate;

use backoffice_domain::order::FulfillmentStatus;

use crate::domain::types::{OTP_TTL_SECS, OutgoingEmail};

const BRAND: &str = "CS Graphic Meta";

/// Stands in for the renewal date when a payment has failed.
pub const PAYMENT_FAILED_NOTICE: &str = "Payment failed - please update your payment method";

/// Renewal date as shown to customers, e.g. `5 March 2026`.
pub fn format_renewal_date(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}

/// Escape text for interpolation into an HTML body or attribute.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Login code email.
pub fn otp_email(to: &str, code: &str) -> OutgoingEmail {
    let minutes = OTP_TTL_SECS / 60;
    let text = format!(
        "{BRAND} admin login\n\n\
         Your verification code is: {code}\n\n\
         This code expires in {minutes} minutes. If you did not request this, ignore this email.\n"
    );
    let html = format!(
        r#"<div style="font-family: 'Inter', sans-serif; max-width: 480px; margin: 0 auto; padding: 40px 20px;">
  <div style="background: #0a0a0f; border-radius: 12px; padding: 40px; color: #fafafa;">
    <h2 style="margin: 0 0 8px; font-size: 20px; font-weight: 600;">{BRAND}</h2>
    <p style="margin: 0 0 24px; color: #a1a1aa; font-size: 14px;">Admin Login Verification</p>
    <div style="background: #18181b; border-radius: 8px; padding: 24px; text-align: center; margin-bottom: 24px;">
      <p style="margin: 0 0 8px; color: #a1a1aa; font-size: 13px;">Your verification code</p>
      <p style="margin: 0; font-size: 32px; font-weight: 700; letter-spacing: 8px; font-family: monospace;">{code}</p>
    </div>
    <p style="margin: 0; color: #71717a; font-size: 12px;">This code expires in {minutes} minutes. If you did not request this, ignore this email.</p>
  </div>
</div>"#
    );
    OutgoingEmail {
        to: to.to_owned(),
        subject: "Your admin login code".to_owned(),
        text,
        html,
    }
}

/// Fields shown in the renewal reminder.
pub struct RenewalNotice<'a> {
    pub customer_name: &'a str,
    pub domain: &'a str,
    pub plan: &'a str,
    /// Formatted date, or [`PAYMENT_FAILED_NOTICE`].
    pub renewal: &'a str,
}

fn renewal_bodies(notice: &RenewalNotice<'_>) -> (String, String) {
    let RenewalNotice {
        customer_name,
        domain,
        plan,
        renewal,
    } = notice;
    let text = format!(
        "Hi {customer_name},\n\n\
         Your hosting plan is due for renewal soon.\n\n\
         Domain: {domain}\n\
         Plan: {plan}\n\
         Renewal Date: {renewal}\n\n\
         Please contact us if you have any questions about your renewal.\n\n\
         {BRAND}\n"
    );
    let customer_name = escape_html(customer_name);
    let domain = escape_html(domain);
    let plan = escape_html(plan);
    let renewal = escape_html(renewal);
    let html = format!(
        r#"<div style="font-family: 'Inter', sans-serif; max-width: 560px; margin: 0 auto; padding: 40px 20px;">
  <div style="background: #0a0a0f; border-radius: 12px; padding: 40px; color: #fafafa;">
    <h2 style="margin: 0 0 8px; font-size: 20px; font-weight: 600;">{BRAND}</h2>
    <p style="margin: 0 0 24px; color: #a1a1aa; font-size: 14px;">Hosting Renewal Reminder</p>
    <p style="margin: 0 0 16px; color: #d4d4d8;">Hi {customer_name},</p>
    <p style="margin: 0 0 20px; color: #d4d4d8; font-size: 14px;">Your hosting plan is due for renewal soon.</p>
    <div style="background: #18181b; border-radius: 8px; padding: 20px; margin-bottom: 20px;">
      <table style="width: 100%; border-collapse: collapse;">
        <tr><td style="padding: 8px 0; color: #a1a1aa; font-size: 13px;">Domain</td><td style="padding: 8px 0; font-size: 13px; text-align: right;">{domain}</td></tr>
        <tr><td style="padding: 8px 0; color: #a1a1aa; font-size: 13px;">Plan</td><td style="padding: 8px 0; font-size: 13px; text-align: right;">{plan}</td></tr>
        <tr><td style="padding: 8px 0; color: #a1a1aa; font-size: 13px;">Renewal Date</td><td style="padding: 8px 0; color: #f59e0b; font-size: 13px; font-weight: 600; text-align: right;">{renewal}</td></tr>
      </table>
    </div>
    <p style="margin: 0; color: #71717a; font-size: 12px;">Please contact us if you have any questions about your renewal.</p>
  </div>
</div>"#
    );
    (text, html)
}

pub fn renewal_reminder_email(to: &str, notice: &RenewalNotice<'_>) -> OutgoingEmail {
    let (text, html) = renewal_bodies(notice);
    OutgoingEmail {
        to: to.to_owned(),
        subject: format!("Hosting Renewal Reminder - {}", notice.domain),
        text,
        html,
    }
}

/// Renewal template with the failure notice in place of a date.
pub fn payment_failed_email(to: &str, customer_name: &str, domain: &str, plan: &str) -> OutgoingEmail {
    let notice = RenewalNotice {
        customer_name,
        domain,
        plan,
        renewal: PAYMENT_FAILED_NOTICE,
    };
    let (text, html) = renewal_bodies(&notice);
    OutgoingEmail {
        to: to.to_owned(),
        subject: format!("Payment Failed - {domain}"),
        text,
        html,
    }
}

fn status_colour(status: FulfillmentStatus) -> &'static str {
    match status {
        FulfillmentStatus::Pending => "#f59e0b",
        FulfillmentStatus::InProgress => "#3b82f6",
        FulfillmentStatus::Completed => "#22c55e",
        FulfillmentStatus::Cancelled => "#ef4444",
    }
}

/// Fields shown in an order status update.
pub struct OrderNotice<'a> {
    pub customer_name: &'a str,
    /// Short order reference, e.g. `1B2C3D`.
    pub reference: &'a str,
    pub status: FulfillmentStatus,
    pub message: Option<&'a str>,
}

pub fn order_status_email(to: &str, notice: &OrderNotice<'_>) -> OutgoingEmail {
    let label = notice.status.label();

    let mut text = format!(
        "Hi {},\n\n\
         Order #{}\n\
         Status: {label}\n\n",
        notice.customer_name, notice.reference
    );
    if let Some(message) = notice.message {
        text.push_str(message);
        text.push_str("\n\n");
    }
    text.push_str(&format!("Thank you for choosing {BRAND}.\n"));

    let colour = status_colour(notice.status);
    let message_html = notice
        .message
        .map(|m| {
            format!(
                r#"<p style="margin: 0 0 20px; color: #d4d4d8; font-size: 14px;">{}</p>"#,
                escape_html(m)
            )
        })
        .unwrap_or_default();
    let customer_name = escape_html(notice.customer_name);
    let reference = escape_html(notice.reference);
    let html = format!(
        r#"<div style="font-family: 'Inter', sans-serif; max-width: 560px; margin: 0 auto; padding: 40px 20px;">
  <div style="background: #0a0a0f; border-radius: 12px; padding: 40px; color: #fafafa;">
    <h2 style="margin: 0 0 8px; font-size: 20px; font-weight: 600;">{BRAND}</h2>
    <p style="margin: 0 0 24px; color: #a1a1aa; font-size: 14px;">Order Status Update</p>
    <p style="margin: 0 0 16px; color: #d4d4d8;">Hi {customer_name},</p>
    <div style="background: #18181b; border-radius: 8px; padding: 20px; margin-bottom: 20px;">
      <p style="margin: 0 0 8px; color: #a1a1aa; font-size: 13px;">Order #{reference}</p>
      <p style="margin: 0; font-size: 16px; font-weight: 600;">Status: <span style="color: {colour};">{label}</span></p>
    </div>
    {message_html}
    <p style="margin: 0; color: #71717a; font-size: 12px;">Thank you for choosing {BRAND}.</p>
  </div>
</div>"#
    );
    OutgoingEmail {
        to: to.to_owned(),
        subject: format!("Order Update - #{}", notice.reference),
        text,
        html,
    }
}

//! Transactional email templates.
//!
//! Each template returns a ready-to-send [`EmailMessage`] with an HTML body
//! and a plain-text fallback. User-supplied values are HTML-escaped.

use chrono::NaiveDate;

/// Rendered email addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub to_name: Option<String>,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Values shared by every template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branding {
    pub app_name: String,
    pub frontend_url: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            app_name: "EstateHub".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
        }
    }
}

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

/// Formats whole rupees with Indian digit grouping, e.g. `₹12,34,567`.
pub fn format_inr(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut parts: Vec<String> = Vec::new();
        let mut rest = head;
        while rest.len() > 2 {
            let (h, t) = rest.split_at(rest.len() - 2);
            parts.push(t.to_string());
            rest = h;
        }
        if !rest.is_empty() {
            parts.push(rest.to_string());
        }
        parts.reverse();
        format!("{},{}", parts.join(","), tail)
    };
    if amount < 0 {
        format!("-₹{}", grouped)
    } else {
        format!("₹{}", grouped)
    }
}

fn layout(brand: &Branding, heading: &str, body_html: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"></head>
<body style="font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; padding: 20px; color: #333;">
    <h2>{heading}</h2>
    {body_html}
    <p style="color: #999; font-size: 12px; margin-top: 30px;">
        {app} &middot; <a href="{url}" style="color: #0b5cff;">{url}</a>
    </p>
</body>
</html>"#,
        heading = escape_html(heading),
        body_html = body_html,
        app = escape_html(&brand.app_name),
        url = escape_html(&brand.frontend_url),
    )
}

fn message(to: &str, to_name: Option<&str>, subject: String, html: String, text: String) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        to_name: to_name.map(str::to_string),
        subject,
        html,
        text,
    }
}

pub fn verification_otp(brand: &Branding, to: &str, name: &str, code: &str, ttl_minutes: i64) -> EmailMessage {
    let html = layout(
        brand,
        "Verify your email",
        &format!(
            "<p>Hi {name},</p><p>Your verification code is:</p>\
             <p style=\"font-size: 28px; letter-spacing: 6px; font-weight: bold;\">{code}</p>\
             <p>The code expires in {ttl} minutes.</p>",
            name = escape_html(name),
            code = escape_html(code),
            ttl = ttl_minutes
        ),
    );
    let text = format!(
        "Hi {},\n\nYour {} verification code is {}.\nIt expires in {} minutes.",
        name, brand.app_name, code, ttl_minutes
    );
    message(to, Some(name), format!("{} is your {} verification code", code, brand.app_name), html, text)
}

pub fn password_reset_otp(brand: &Branding, to: &str, name: &str, code: &str, ttl_minutes: i64) -> EmailMessage {
    let html = layout(
        brand,
        "Reset your password",
        &format!(
            "<p>Hi {name},</p><p>Use this code to reset your password:</p>\
             <p style=\"font-size: 28px; letter-spacing: 6px; font-weight: bold;\">{code}</p>\
             <p>The code expires in {ttl} minutes. If you did not ask for a reset, ignore this email.</p>",
            name = escape_html(name),
            code = escape_html(code),
            ttl = ttl_minutes
        ),
    );
    let text = format!(
        "Hi {},\n\nYour password reset code is {}.\nIt expires in {} minutes. If you did not ask for a reset, ignore this email.",
        name, code, ttl_minutes
    );
    message(to, Some(name), format!("{} password reset code", brand.app_name), html, text)
}

pub fn welcome(brand: &Branding, to: &str, name: &str) -> EmailMessage {
    let html = layout(
        brand,
        &format!("Welcome to {}", brand.app_name),
        &format!(
            "<p>Hi {name},</p><p>Your account is verified. Start exploring homes, \
             live-group projects and short stays at <a href=\"{url}\">{url}</a>.</p>",
            name = escape_html(name),
            url = escape_html(&brand.frontend_url)
        ),
    );
    let text = format!(
        "Hi {},\n\nYour account is verified. Start exploring at {}.",
        name, brand.frontend_url
    );
    message(to, Some(name), format!("Welcome to {}", brand.app_name), html, text)
}

/// Site-visit request details shown to both parties.
#[derive(Debug, Clone)]
pub struct VisitSummary<'a> {
    pub property_title: &'a str,
    pub visit_date: NaiveDate,
    pub time_slot: &'a str,
}

pub fn booking_received(
    brand: &Branding,
    to: &str,
    owner_name: &str,
    visitor_name: &str,
    contact_phone: &str,
    visit: &VisitSummary<'_>,
) -> EmailMessage {
    let html = layout(
        brand,
        "New site-visit request",
        &format!(
            "<p>Hi {owner},</p><p>{visitor} would like to visit <strong>{title}</strong> \
             on {date} ({slot}).</p><p>Contact: {phone}</p>\
             <p>Confirm or decline from your dashboard.</p>",
            owner = escape_html(owner_name),
            visitor = escape_html(visitor_name),
            title = escape_html(visit.property_title),
            date = visit.visit_date.format("%d %b %Y"),
            slot = escape_html(visit.time_slot),
            phone = escape_html(contact_phone),
        ),
    );
    let text = format!(
        "Hi {},\n\n{} would like to visit {} on {} ({}).\nContact: {}",
        owner_name,
        visitor_name,
        visit.property_title,
        visit.visit_date.format("%d %b %Y"),
        visit.time_slot,
        contact_phone
    );
    message(to, Some(owner_name), format!("Visit request for {}", visit.property_title), html, text)
}

pub fn booking_status(
    brand: &Branding,
    to: &str,
    visitor_name: &str,
    status: &str,
    visit: &VisitSummary<'_>,
) -> EmailMessage {
    let html = layout(
        brand,
        "Site-visit update",
        &format!(
            "<p>Hi {name},</p><p>Your visit to <strong>{title}</strong> on {date} ({slot}) \
             is now <strong>{status}</strong>.</p>",
            name = escape_html(visitor_name),
            title = escape_html(visit.property_title),
            date = visit.visit_date.format("%d %b %Y"),
            slot = escape_html(visit.time_slot),
            status = escape_html(status),
        ),
    );
    let text = format!(
        "Hi {},\n\nYour visit to {} on {} ({}) is now {}.",
        visitor_name,
        visit.property_title,
        visit.visit_date.format("%d %b %Y"),
        visit.time_slot,
        status
    );
    message(to, Some(visitor_name), format!("Your visit is {}", status), html, text)
}

pub fn live_group_unit_booked(
    brand: &Branding,
    to: &str,
    name: &str,
    project_name: &str,
    unit_number: &str,
    amount: i64,
) -> EmailMessage {
    let html = layout(
        brand,
        "Unit booked",
        &format!(
            "<p>Hi {name},</p><p>You have booked unit <strong>{unit}</strong> in \
             <strong>{project}</strong> at the group price of {amount}.</p>",
            name = escape_html(name),
            unit = escape_html(unit_number),
            project = escape_html(project_name),
            amount = format_inr(amount),
        ),
    );
    let text = format!(
        "Hi {},\n\nYou have booked unit {} in {} at the group price of {}.",
        name,
        unit_number,
        project_name,
        format_inr(amount)
    );
    message(to, Some(name), format!("Unit {} booked in {}", unit_number, project_name), html, text)
}

/// Stay details shown in reservation emails.
#[derive(Debug, Clone)]
pub struct StaySummary<'a> {
    pub listing_title: &'a str,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
    pub total: i64,
}

pub fn reservation_confirmed(brand: &Branding, to: &str, name: &str, stay: &StaySummary<'_>) -> EmailMessage {
    let html = layout(
        brand,
        "Reservation confirmed",
        &format!(
            "<p>Hi {name},</p><p>Your stay at <strong>{title}</strong> is confirmed.</p>\
             <p>{check_in} to {check_out} &middot; {guests} guest(s) &middot; {total}</p>",
            name = escape_html(name),
            title = escape_html(stay.listing_title),
            check_in = stay.check_in.format("%d %b %Y"),
            check_out = stay.check_out.format("%d %b %Y"),
            guests = stay.guests,
            total = format_inr(stay.total),
        ),
    );
    let text = format!(
        "Hi {},\n\nYour stay at {} is confirmed: {} to {}, {} guest(s), {}.",
        name,
        stay.listing_title,
        stay.check_in.format("%d %b %Y"),
        stay.check_out.format("%d %b %Y"),
        stay.guests,
        format_inr(stay.total)
    );
    message(to, Some(name), format!("Confirmed: {}", stay.listing_title), html, text)
}

pub fn reservation_cancelled(brand: &Branding, to: &str, name: &str, stay: &StaySummary<'_>) -> EmailMessage {
    let html = layout(
        brand,
        "Reservation cancelled",
        &format!(
            "<p>Hi {name},</p><p>The reservation at <strong>{title}</strong> for \
             {check_in} to {check_out} has been cancelled.</p>",
            name = escape_html(name),
            title = escape_html(stay.listing_title),
            check_in = stay.check_in.format("%d %b %Y"),
            check_out = stay.check_out.format("%d %b %Y"),
        ),
    );
    let text = format!(
        "Hi {},\n\nThe reservation at {} for {} to {} has been cancelled.",
        name,
        stay.listing_title,
        stay.check_in.format("%d %b %Y"),
        stay.check_out.format("%d %b %Y")
    );
    message(to, Some(name), format!("Cancelled: {}", stay.listing_title), html, text)
}

pub fn subscription_activated(
    brand: &Branding,
    to: &str,
    name: &str,
    plan_name: &str,
    amount: i64,
    ends_on: Option<NaiveDate>,
) -> EmailMessage {
    let until = ends_on
        .map(|d| format!("until {}", d.format("%d %b %Y")))
        .unwrap_or_else(|| "with no expiry".to_string());
    let html = layout(
        brand,
        "Subscription active",
        &format!(
            "<p>Hi {name},</p><p>Your <strong>{plan}</strong> plan ({amount}) is active {until}.</p>",
            name = escape_html(name),
            plan = escape_html(plan_name),
            amount = format_inr(amount),
            until = escape_html(&until),
        ),
    );
    let text = format!(
        "Hi {},\n\nYour {} plan ({}) is active {}.",
        name,
        plan_name,
        format_inr(amount),
        until
    );
    message(to, Some(name), format!("Your {} plan is active", plan_name), html, text)
}

pub fn lead_acknowledgement(brand: &Branding, to: &str, name: &str) -> EmailMessage {
    let html = layout(
        brand,
        "Thanks for reaching out",
        &format!(
            "<p>Hi {name},</p><p>We have received your enquiry and our team will contact you shortly.</p>",
            name = escape_html(name)
        ),
    );
    let text = format!(
        "Hi {},\n\nWe have received your enquiry and our team will contact you shortly.",
        name
    );
    message(to, Some(name), format!("We received your enquiry - {}", brand.app_name), html, text)
}

/// Lead fields shown to the admin.
#[derive(Debug, Clone)]
pub struct LeadSummary<'a> {
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub source: &'a str,
    pub interest: Option<&'a str>,
    pub message: Option<&'a str>,
}

pub fn lead_admin_notification(brand: &Branding, to: &str, lead: &LeadSummary<'_>) -> EmailMessage {
    let rows = [
        ("Name", Some(lead.name)),
        ("Email", lead.email),
        ("Phone", lead.phone),
        ("Source", Some(lead.source)),
        ("Interest", lead.interest),
        ("Message", lead.message),
    ];
    let html_rows: String = rows
        .iter()
        .filter_map(|(k, v)| v.map(|v| format!("<tr><td><b>{}</b></td><td>{}</td></tr>", k, escape_html(v))))
        .collect();
    let text_rows: Vec<String> = rows
        .iter()
        .filter_map(|(k, v)| v.map(|v| format!("{}: {}", k, v)))
        .collect();
    let html = layout(brand, "New lead", &format!("<table>{}</table>", html_rows));
    message(to, None, format!("New lead: {}", lead.name), html, text_rows.join("\n"))
}

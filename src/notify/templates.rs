//! Message bodies for the transactional notifications.

use std::fmt::Write as _;

use super::Notification;
use crate::orders::Order;

const BRAND_GREEN: &str = "#143f17";

/// Format minor units the way the storefront shows prices: `₦12,500`.
pub(crate) fn naira(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 3);
    out.push('₦');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn frame(heading: &str, tagline: &str, body: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; border: 1px solid #eee; border-radius: 10px; overflow: hidden;">
<div style="background-color: {BRAND_GREEN}; color: white; padding: 20px; text-align: center;">
<h1 style="margin: 0; font-family: 'Georgia', serif;">{heading}</h1>
<p style="margin: 5px 0 0;">{tagline}</p>
</div>
<div style="padding: 20px;">{body}</div>
</div>"#
    )
}

/// Order confirmation: order id, date, payment method, itemised table, total.
pub fn order_confirmation(order: &Order, site_name: &str) -> Notification {
    let mut rows = String::new();
    for item in &order.items {
        let _ = write!(
            rows,
            r#"<tr><td style="padding: 10px;"><img src="{}" alt="{}" style="width: 50px; height: 50px; object-fit: cover;"></td><td style="padding: 10px;"><strong>{}</strong><br><span style="font-size: 12px; color: #777;">{}</span></td><td style="padding: 10px;">{}</td><td style="padding: 10px;">{}</td></tr>"#,
            escape(&item.image),
            escape(&item.name),
            escape(&item.name),
            escape(&item.unit),
            item.quantity,
            naira(item.price),
        );
    }

    let body = format!(
        r#"<p>Hi <strong>{name}</strong>,</p>
<p>We've received your order and it's being processed. Here are the details:</p>
<div style="background-color: #f9f9f9; padding: 15px; border-radius: 5px; margin: 20px 0;">
<p style="margin: 0;"><strong>Order ID:</strong> {id}</p>
<p style="margin: 5px 0 0;"><strong>Date:</strong> {date}</p>
<p style="margin: 5px 0 0;"><strong>Payment Method:</strong> {payment}</p>
</div>
<table style="width: 100%; border-collapse: collapse;">
<thead><tr style="background-color: #f0f0f0; text-align: left;"><th>Img</th><th>Product</th><th>Qty</th><th>Price</th></tr></thead>
<tbody>{rows}</tbody>
</table>
<div style="margin-top: 20px; text-align: right;"><h2 style="color: {BRAND_GREEN};">Total: {total}</h2></div>"#,
        name = escape(&order.customer_name),
        id = order.id,
        date = order.date,
        payment = escape(&order.payment_method),
        total = naira(order.total),
    );

    Notification {
        recipient_email: order.customer_email.clone(),
        subject: format!("Order Confirmation #{}", order.id),
        plain_text_body: format!(
            "Thank you for your order #{}. Total: {}",
            order.id,
            naira(order.total)
        ),
        html_body: frame(
            "Order Confirmed",
            &format!("Thank you for shopping with {}", escape(site_name)),
            &body,
        ),
    }
}

/// Shipment notice: delivery address and the phone the courier will call.
pub fn shipment_notice(
    order: &Order,
    recipient_email: &str,
    recipient_name: &str,
    public_url: &str,
) -> Notification {
    let address = &order.shipping_address;
    let body = format!(
        r#"<p>Hi <strong>{name}</strong>,</p>
<p>Good news! Your order <strong>#{id}</strong> has been shipped and is on its way to you.</p>
<div style="background-color: #f9f9f9; padding: 15px; border-radius: 5px; margin: 20px 0; text-align: center;">
<p style="font-size: 14px; color: #555;">Delivery Address:</p>
<p style="margin: 5px 0; font-weight: bold;">{street}, {city}<br>{lga}, {state}</p>
</div>
<p>Our delivery partner will contact you at <strong>{phone}</strong> when they are close.</p>
<div style="margin-top: 30px; text-align: center;"><a href="{url}/#/contact" style="background-color: {BRAND_GREEN}; color: white; padding: 12px 24px; text-decoration: none; border-radius: 5px;">Track Order</a></div>"#,
        name = escape(recipient_name),
        id = order.id,
        street = escape(&address.street),
        city = escape(address.city.as_deref().unwrap_or_default()),
        lga = escape(&address.lga),
        state = escape(&address.state),
        phone = escape(&address.phone),
        url = public_url.trim_end_matches('/'),
    );

    Notification {
        recipient_email: recipient_email.to_string(),
        subject: format!("Order Shipped #{}", order.id),
        plain_text_body: format!(
            "Your order #{} has been shipped! Our delivery partner will call {}.",
            order.id, address.phone
        ),
        html_body: frame(
            "Your Order has Shipped!",
            "Get ready for some fresh goodness.",
            &body,
        ),
    }
}

/// Email verification link for a new (or re-requested) account.
pub fn verification(name: &str, email: &str, link: &str) -> Notification {
    let body = format!(
        r#"<h2 style="color: #333;">Verify Your Email</h2>
<p>Hello {name},</p>
<p>Welcome to Farmers Market! Please click the button below to verify your email address and activate your account.</p>
<div style="text-align: center; margin: 30px 0;"><a href="{link}" style="background-color: {BRAND_GREEN}; color: white; padding: 12px 24px; text-decoration: none; border-radius: 5px;">Verify Account</a></div>
<p style="color: #777; font-size: 12px; word-break: break-all;">Or paste this link: {link}</p>"#,
        name = escape(name),
        link = escape(link),
    );

    Notification {
        recipient_email: email.to_string(),
        subject: "Verify your FreshFarm Account".to_string(),
        plain_text_body: format!("Verify your account here: {}", link),
        html_body: frame("Farmers Market", "Fresh from the farm", &body),
    }
}

/// Password reset link, valid for a limited time.
pub fn password_reset(email: &str, link: &str) -> Notification {
    let body = format!(
        r#"<h2 style="color: #333;">Password Reset Request</h2>
<p>You are receiving this email because a password reset request was initiated for your account.</p>
<div style="text-align: center; margin: 30px 0;"><a href="{link}" style="background-color: #f49f17; color: white; padding: 12px 24px; text-decoration: none; border-radius: 5px;">Reset Password</a></div>
<p style="color: #777; font-size: 12px; word-break: break-all;">{link}</p>
<p style="color: #999; font-size: 12px;">If you did not request this, please ignore this email.</p>"#,
        link = escape(link),
    );

    Notification {
        recipient_email: email.to_string(),
        subject: "Password Reset Request - Farmers Market".to_string(),
        plain_text_body: format!(
            "You are receiving this email because you (or someone else) has requested the reset of a password. \
             Please click on the link below to set a new password:\n\n{}\n\nIf you did not request this, please ignore this email.",
            link
        ),
        html_body: frame("Farmers Market", "Account security", &body),
    }
}

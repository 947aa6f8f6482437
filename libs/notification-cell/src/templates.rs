//! Email bodies for booking and payment events. Each template returns
//! (subject, text, html).

use crate::mailer::BookingEmail;

fn long_date(details: &BookingEmail) -> String {
    details.date.format("%-d %B %Y").to_string()
}

fn manage_link(base_url: &str, booking_id: i64) -> String {
    format!("{}/profile/{}", base_url, booking_id)
}

pub fn payment_confirmation(
    details: &BookingEmail,
    base_url: &str,
) -> (String, String, String) {
    let subject = "Payment Confirmation and Booking Details".to_string();
    let patient = details.patient_name.as_deref().unwrap_or("-");
    let address = details.address.as_deref().unwrap_or("-");
    let date = long_date(details);
    let link = manage_link(base_url, details.booking_id);

    let text = format!(
        "Dear {dentist},\n\n\
         Your payment for booking ID: {id} has been successfully processed.\n\n\
         Here are your booking details:\n\
         - Booking ID: {id}\n\
         - Dentist: {dentist}\n\
         - Patient Name: {patient}\n\
         - Email: {email}\n\
         - Phone: {phone}\n\
         - Date: {date}\n\
         - Time: {time}\n\
         - Address: {address}\n\
         - Payment Status: Completed\n\n\
         If you would like to cancel or reschedule your booking, please visit:\n\
         {link}\n\n\
         Thank you for choosing our service!\n\n\
         Best regards,\n\
         The DNH Dental Team",
        dentist = details.dentist_name,
        id = details.booking_id,
        patient = patient,
        email = details.email,
        phone = details.phone,
        date = date,
        time = details.time,
        address = address,
        link = link,
    );

    let html = format!(
        "<p>Dear {dentist},</p>\
         <p>Your payment for booking ID: <strong>{id}</strong> has been successfully processed.</p>\
         <p>Here are your booking details:</p>\
         <ul>\
         <li><strong>Booking ID:</strong> {id}</li>\
         <li><strong>Dentist:</strong> {dentist}</li>\
         <li><strong>Patient Name:</strong> {patient}</li>\
         <li><strong>Email:</strong> {email}</li>\
         <li><strong>Phone:</strong> {phone}</li>\
         <li><strong>Date:</strong> {date}</li>\
         <li><strong>Time:</strong> {time}</li>\
         <li><strong>Address:</strong> {address}</li>\
         <li><strong>Payment Status:</strong> Completed</li>\
         </ul>\
         <p><a href=\"{link}\">Cancel or Reschedule Booking</a></p>\
         <p>Thank you for choosing our service!</p>\
         <p>Best regards,<br>The DNH Dental Team</p>",
        dentist = details.dentist_name,
        id = details.booking_id,
        patient = patient,
        email = details.email,
        phone = details.phone,
        date = date,
        time = details.time,
        address = address,
        link = link,
    );

    (subject, text, html)
}

pub fn admin_payment_notice(booking_id: i64, payment_id: &str) -> (String, String, String) {
    let subject = "New Booking Payment Received".to_string();

    let text = format!(
        "A new payment has been received for booking ID: {booking_id}.\n\
         Payment ID: {payment_id}.\n\
         Please review the booking details in the admin portal.",
    );

    let html = format!(
        "<p>A new payment has been received for booking ID: <strong>{booking_id}</strong>.</p>\
         <p><strong>Payment ID:</strong> {payment_id}</p>\
         <p>Please review the booking details in the admin portal.</p>",
    );

    (subject, text, html)
}

pub fn reschedule_notice(details: &BookingEmail, base_url: &str) -> (String, String, String) {
    let subject = "Your Booking Has Been Rescheduled".to_string();
    let date = long_date(details);
    let link = manage_link(base_url, details.booking_id);

    let text = format!(
        "Dear {dentist},\n\n\
         Your booking (ID: {id}) has been rescheduled.\n\n\
         New appointment:\n\
         - Date: {date}\n\
         - Time: {time}\n\n\
         If this is not right, you can manage your booking here:\n\
         {link}\n\n\
         Best regards,\n\
         The DNH Dental Team",
        dentist = details.dentist_name,
        id = details.booking_id,
        date = date,
        time = details.time,
        link = link,
    );

    let html = format!(
        "<p>Dear {dentist},</p>\
         <p>Your booking (ID: <strong>{id}</strong>) has been rescheduled.</p>\
         <p>New appointment: <strong>{date}</strong> at <strong>{time}</strong>.</p>\
         <p><a href=\"{link}\">Manage your booking</a></p>\
         <p>Best regards,<br>The DNH Dental Team</p>",
        dentist = details.dentist_name,
        id = details.booking_id,
        date = date,
        time = details.time,
        link = link,
    );

    (subject, text, html)
}

pub fn cancellation_notice(details: &BookingEmail) -> (String, String, String) {
    let subject = "Your Booking Has Been Canceled".to_string();
    let date = long_date(details);

    let text = format!(
        "Dear {dentist},\n\n\
         Your booking (ID: {id}) for {date} at {time} has been canceled.\n\n\
         If you did not request this, please contact us.\n\n\
         Best regards,\n\
         The DNH Dental Team",
        dentist = details.dentist_name,
        id = details.booking_id,
        date = date,
        time = details.time,
    );

    let html = format!(
        "<p>Dear {dentist},</p>\
         <p>Your booking (ID: <strong>{id}</strong>) for <strong>{date}</strong> at \
         <strong>{time}</strong> has been canceled.</p>\
         <p>If you did not request this, please contact us.</p>\
         <p>Best regards,<br>The DNH Dental Team</p>",
        dentist = details.dentist_name,
        id = details.booking_id,
        date = date,
        time = details.time,
    );

    (subject, text, html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn details() -> BookingEmail {
        BookingEmail {
            booking_id: 12,
            dentist_name: "Dr. Molar".to_string(),
            patient_name: None,
            email: "pat@example.com".to_string(),
            phone: "07000000000".to_string(),
            address: None,
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn payment_confirmation_includes_booking_details_and_link() {
        let (subject, text, html) = payment_confirmation(&details(), "http://localhost:3000");
        assert_eq!(subject, "Payment Confirmation and Booking Details");
        assert!(text.contains("Booking ID: 12"));
        assert!(text.contains("10 March 2025"));
        assert!(html.contains("http://localhost:3000/profile/12"));
    }

    #[test]
    fn missing_optional_fields_render_as_placeholders() {
        let (_, text, _) = payment_confirmation(&details(), "http://localhost:3000");
        assert!(text.contains("Patient Name: -"));
        assert!(text.contains("Address: -"));
    }

    #[test]
    fn admin_notice_names_both_ids() {
        let (_, text, html) = admin_payment_notice(12, "pi_abc");
        assert!(text.contains("booking ID: 12"));
        assert!(html.contains("pi_abc"));
    }
}

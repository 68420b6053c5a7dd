use crate::weather::WeatherSnapshot;

/// Welcome email sent after registration. Returns (subject, html body).
pub fn welcome_email(to_email: &str, city: &str) -> (String, String) {
    let subject = format!("🌊 Welcome to Smart Flood Alert System - {city}");
    let html = format!(
        r#"<html><body>
    <h2 style="color:#2e86c1;">Welcome to Smart Flood Alert System</h2>
    <p>Thank you for registering to receive flood alerts for <strong>{city}</strong>.</p>
    <div style="background-color:#f2f4f4; padding:15px; border-radius:5px;">
        <h3 style="color:#2e86c1;">Your Account Details:</h3>
        <ul>
            <li><strong>Registered City:</strong> {city}</li>
            <li><strong>Notification Email:</strong> {to_email}</li>
        </ul>
    </div>
    <p>You will now receive automated alerts when flood risks are detected in your area.</p>
    <p style="color:#5d6d7e;"><em>This is an automated message - please do not reply</em></p>
</body></html>"#
    );
    (subject, html)
}

/// Flood alert email. Returns (subject, html body).
pub fn alert_email(city: &str, alert_message: &str) -> (String, String) {
    let subject = format!("🚨 Flood Alert for {city}");
    let html = format!(
        r#"<html><body>
    <h2 style="color:#e74c3c;">Flood Alert Notification</h2>
    <p><strong>Location:</strong> {city}</p>
    <div style="background-color:#fdebd0; padding:15px; border-radius:5px;">
        <h3 style="color:#e67e22;">Alert Message:</h3>
        <p>{alert_message}</p>
    </div>
    <p>Please take necessary precautions.</p>
    <p style="color:#5d6d7e;"><em>This is an automated alert - do not reply</em></p>
</body></html>"#
    );
    (subject, html)
}

/// Body used for the non-flood ("all clear") individual email: the update
/// message plus a current-conditions block.
pub fn safe_weather_report(message: &str, snapshot: &WeatherSnapshot) -> String {
    format!(
        "Dear Resident,\n\n{message}\n\nCurrent Weather Conditions:\n\
         - Temperature: {}°C\n\
         - Humidity: {}%\n\
         - Rainfall: {:.1}mm\n\
         - Conditions: {}\n\nStay safe,\nFlood Alert System",
        snapshot.temperature_c,
        snapshot.humidity_pct,
        snapshot.rainfall_1h_mm,
        snapshot.description
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welcome_email_carries_city_and_address() {
        let (subject, html) = welcome_email("user@test.com", "Pune");
        assert!(subject.contains("Pune"));
        assert!(html.contains("user@test.com"));
        assert!(html.contains("<strong>Pune</strong>"));
    }

    #[test]
    fn alert_email_carries_location_and_message() {
        let (subject, html) = alert_email("Chennai", "URGENT: move to higher ground");
        assert!(subject.contains("Chennai"));
        assert!(html.contains("URGENT: move to higher ground"));
    }

    #[test]
    fn safe_report_includes_conditions() {
        let snapshot = WeatherSnapshot {
            temperature_c: 29.0,
            humidity_pct: 70.0,
            pressure_hpa: 1008.0,
            wind_speed_mps: 3.0,
            rainfall_1h_mm: 2.5,
            description: "light rain".into(),
            icon: "10d".into(),
        };
        let body = safe_weather_report("No flood risk currently.", &snapshot);
        assert!(body.contains("No flood risk currently."));
        assert!(body.contains("2.5mm"));
        assert!(body.contains("light rain"));
    }
}

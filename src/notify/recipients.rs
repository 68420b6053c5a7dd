use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

/// One row of an uploaded recipient list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub name: String,
    pub email: String,
}

/// Parses an uploaded CSV of recipients. Headers are matched
/// case-insensitively; `name` and `email` are required. Emails are trimmed
/// and lowercased here, validity is only checked at dispatch time.
pub fn parse_recipients(data: &[u8]) -> anyhow::Result<Vec<Recipient>> {
    let mut reader = csv::Reader::from_reader(data);
    let headers = reader.headers().context("read CSV headers")?.clone();

    let position = |wanted: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted))
    };
    let (name_idx, email_idx) = match (position("name"), position("email")) {
        (Some(n), Some(e)) => (n, e),
        _ => bail!("CSV file must contain these columns: name, email"),
    };

    let mut recipients = Vec::new();
    for record in reader.records() {
        let record = record.context("read CSV record")?;
        recipients.push(Recipient {
            name: record.get(name_idx).unwrap_or("").trim().to_string(),
            email: record
                .get(email_idx)
                .unwrap_or("")
                .trim()
                .to_lowercase(),
        });
    }
    Ok(recipients)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_and_normalizes_emails() {
        let data = b"name,email\nAsha,ASHA@Example.COM\nRavi, ravi@example.com \n";
        let recipients = parse_recipients(data).unwrap();
        assert_eq!(recipients.len(), 2);
        assert_eq!(recipients[0].name, "Asha");
        assert_eq!(recipients[0].email, "asha@example.com");
        assert_eq!(recipients[1].email, "ravi@example.com");
    }

    #[test]
    fn headers_match_case_insensitively() {
        let data = b"Name,EMAIL\nAsha,asha@example.com\n";
        let recipients = parse_recipients(data).unwrap();
        assert_eq!(recipients.len(), 1);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let data = b"phone,email,name\n+911234,asha@example.com,Asha\n";
        let recipients = parse_recipients(data).unwrap();
        assert_eq!(recipients[0].name, "Asha");
        assert_eq!(recipients[0].email, "asha@example.com");
    }

    #[test]
    fn missing_column_is_a_descriptive_error() {
        let data = b"name,phone\nAsha,+911234\n";
        let err = parse_recipients(data).unwrap_err();
        assert!(err.to_string().contains("name, email"));
    }
}

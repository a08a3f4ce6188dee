mod types;

pub use types::{EmailAddress, SyntaxError};

use std::sync::LazyLock;

use regex::Regex;

// local@labels.tld, tld alphabétique >= 2
static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .unwrap_or_else(|err| panic!("email pattern must compile: {err}"))
});

/// Returns `true` when `address` has the shape `local@domain.tld`.
///
/// Purely syntactic: a match says nothing about whether the domain exists.
pub fn is_valid_syntax(address: &str) -> bool {
    EMAIL_SHAPE.is_match(address)
}

/// Substring after the last `@`. Empty when there is none.
pub fn extract_domain(address: &str) -> &str {
    split_address(address).map(|(_, domain)| domain).unwrap_or("")
}

/// Splits on the last `@` into `(local, domain)`.
pub fn split_address(address: &str) -> Option<(&str, &str)> {
    address.rsplit_once('@')
}

impl EmailAddress {
    pub fn parse(address: &str) -> Result<Self, SyntaxError> {
        if !is_valid_syntax(address) {
            return Err(SyntaxError::InvalidFormat);
        }
        let (local, domain) = split_address(address).ok_or(SyntaxError::InvalidFormat)?;
        Ok(Self {
            local: local.to_string(),
            domain: domain.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_basic() {
        assert!(is_valid_syntax("alice@example.com"));
        assert!(is_valid_syntax("first.last+tag%x_y-z@mail.sub-domain.example.org"));
        assert!(is_valid_syntax("user@nonexistent-domain-xyz123.invalid"));
    }

    #[test]
    fn rejects_malformed() {
        for input in [
            "",
            "plainaddress",
            "@example.com",
            "alice@",
            "alice@example",
            "alice@example.c",
            "alice@example.c0m",
            "a@@example.com",
            "alice smith@example.com",
            "alice@exa mple.com",
            "alice@exämple.com",
            "alice@example.com\n",
            " alice@example.com",
        ] {
            assert!(!is_valid_syntax(input), "{input:?} should be rejected");
        }
    }

    #[test]
    fn domain_is_suffix_after_last_at() {
        assert_eq!(extract_domain("alice@example.com"), "example.com");
        assert_eq!(extract_domain("no-at-sign"), "");
        assert_eq!(split_address("a@b@c.io"), Some(("a@b", "c.io")));
    }

    #[test]
    fn parse_splits_valid_address() {
        let email = EmailAddress::parse("bob.smith@Example.ORG").expect("valid");
        assert_eq!(email.local(), "bob.smith");
        assert_eq!(email.domain(), "Example.ORG");
        assert_eq!(email.to_string(), "bob.smith@Example.ORG");
    }

    #[test]
    fn parse_rejects_invalid() {
        assert_eq!(
            EmailAddress::parse("not an email"),
            Err(SyntaxError::InvalidFormat)
        );
    }

    proptest! {
        #[test]
        fn strings_without_at_never_validate(s in "[^@]*") {
            prop_assert!(!is_valid_syntax(&s));
        }

        #[test]
        fn well_formed_addresses_validate(
            local in "[A-Za-z0-9._%+-]{1,20}",
            label in "[A-Za-z0-9-]{1,15}",
            tld in "[A-Za-z]{2,6}",
        ) {
            let address = format!("{local}@{label}.{tld}");
            prop_assert!(is_valid_syntax(&address));
            let domain = format!("{label}.{tld}");
            prop_assert_eq!(extract_domain(&address), domain.as_str());
        }

        #[test]
        fn extract_domain_is_idempotent(
            local in "[A-Za-z0-9._%+-]{1,20}",
            domain in "[A-Za-z0-9-]{1,15}\\.[A-Za-z]{2,6}",
        ) {
            let address = format!("{local}@{domain}");
            let first = extract_domain(&address);
            prop_assert_eq!(first, extract_domain(&address));
            prop_assert_eq!(extract_domain(first), "");
        }
    }
}

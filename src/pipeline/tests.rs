use std::thread;

use super::*;
use crate::disposable::DisposableDomains;
use crate::mx::tests::StubResolver;
use crate::mx::{MxError, MxRecord};
use crate::probe::tests::{ACCEPTING, REJECTING, Script, ScriptedDialer};
use crate::probe::ProbeOptions;

fn untouchable_resolver() -> StubResolver {
    StubResolver::new(|domain| panic!("DNS must not be queried (asked for {domain})"))
}

fn two_hosts() -> StubResolver {
    StubResolver::fixed(vec![
        MxRecord::new(20, "b.example"),
        MxRecord::new(10, "a.example"),
    ])
}

fn verifier(resolver: StubResolver, dialer: ScriptedDialer) -> Verifier<StubResolver, ScriptedDialer> {
    Verifier::with_parts(VerifierConfig::default(), resolver, dialer)
}

#[test]
fn invalid_syntax_stops_before_any_io() {
    let v = verifier(untouchable_resolver(), ScriptedDialer::new());
    for input in ["", "not-an-email", "a@b", "user@@example.com", "user@example.c"] {
        let result = v.verify(input);
        assert!(!result.syntax_valid, "{input:?}");
        assert!(!result.deliverable);
        assert_eq!(result.verdict, Verdict::InvalidSyntax);
        assert_eq!(result.status_message, "invalid syntax");
        assert_eq!(result.domain, None);
        assert!(result.mx_records.is_empty());
        assert!(result.attempts.is_empty());
    }
    assert!(v.dialer.dialed().is_empty());
}

#[test]
fn surrounding_whitespace_is_ignored() {
    let v = verifier(two_hosts(), ScriptedDialer::new().host("a.example", Script::Serve(ACCEPTING)));
    let result = v.verify("  user@example.com\n");
    assert_eq!(result.email, "user@example.com");
    assert!(result.deliverable);
    assert!(v.dialer.sent().contains("RCPT TO:<user@example.com>\r\n"));
}

#[test]
fn no_mx_records_skip_the_probe() {
    let v = verifier(StubResolver::fixed(Vec::new()), ScriptedDialer::new());
    let result = v.verify("user@example.com");

    assert!(result.syntax_valid);
    assert_eq!(result.domain.as_deref(), Some("example.com"));
    assert!(result.mx_records.is_empty());
    assert!(!result.deliverable);
    assert!(result.is_conclusive());
    assert!(matches!(result.verdict, Verdict::NoMailExchanger { .. }));
    insta::assert_snapshot!(result.status_message, @"no mail exchanger: no MX records for example.com");
    assert!(v.dialer.dialed().is_empty());
}

#[test]
fn dns_failures_read_as_no_mail_exchanger() {
    let v = verifier(
        StubResolver::new(|domain| Err(MxError::timeout(domain))),
        ScriptedDialer::new(),
    );
    let result = v.verify("user@example.com");
    assert!(result.status_message.starts_with("no mail exchanger"));
    assert!(v.dialer.dialed().is_empty());
}

#[test]
fn unusable_resolver_is_an_internal_error() {
    let v = verifier(
        StubResolver::new(|_| {
            Err(MxError::resolver_init(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no resolv.conf",
            )))
        }),
        ScriptedDialer::new(),
    );
    let result = v.verify("user@example.com");

    assert!(!result.deliverable);
    assert!(!result.is_conclusive());
    assert!(matches!(result.verdict, Verdict::Error { .. }));
    insta::assert_snapshot!(
        result.status_message,
        @"verification error: DNS resolver unavailable: resolver initialization failed: no resolv.conf"
    );
}

#[test]
fn fallback_then_acceptance_is_deliverable() {
    let dialer = ScriptedDialer::new()
        .host("a.example", Script::Refuse)
        .host("b.example", Script::Serve(ACCEPTING));
    let v = Verifier::with_parts(
        VerifierConfig::default(),
        StubResolver::fixed(vec![
            MxRecord::new(10, "a.example"),
            MxRecord::new(20, "b.example"),
        ]),
        dialer,
    );
    let result = v.verify("user@example.com");

    assert!(result.deliverable);
    assert!(result.is_conclusive());
    assert_eq!(v.dialer.dialed(), ["a.example", "b.example"]);
    assert_eq!(result.attempts.len(), 2);
    insta::assert_snapshot!(
        result.status_message,
        @"deliverable: b.example accepted recipient (250 2.1.5 Ok)"
    );
}

#[test]
fn hosts_are_probed_in_preference_order() {
    let v = verifier(two_hosts(), ScriptedDialer::new());
    let result = v.verify("user@example.com");

    let order: Vec<&str> = result.mx_records.iter().map(|r| r.exchange.as_str()).collect();
    assert_eq!(order, ["a.example", "b.example"]);
    assert_eq!(v.dialer.dialed(), ["a.example", "b.example"]);
}

#[test]
fn rejection_is_confirmed_invalid() {
    let v = verifier(two_hosts(), ScriptedDialer::new().host("a.example", Script::Serve(REJECTING)));
    let result = v.verify("ghost@example.com");

    assert!(!result.deliverable);
    assert!(result.is_conclusive());
    insta::assert_snapshot!(
        result.status_message,
        @"rejected: a.example refused recipient (550 5.1.1 User unknown)"
    );
}

#[test]
fn all_hosts_unreachable_is_unconfirmed_not_rejected() {
    let v = verifier(two_hosts(), ScriptedDialer::new());
    let result = v.verify("user@example.com");

    assert!(!result.deliverable);
    assert!(!result.is_conclusive());
    assert!(matches!(result.verdict, Verdict::Unconfirmed { tried: 2, .. }));
    assert!(result.status_message.contains("could not confirm"));
    assert!(!result.status_message.contains("rejected"));
    insta::assert_snapshot!(
        result.status_message,
        @"could not confirm: none of 2 exchange host(s) answered (last error: connection failed: connection refused)"
    );
}

#[test]
fn disposable_flag_never_changes_deliverability() {
    let accepting = verifier(
        two_hosts(),
        ScriptedDialer::new().host("a.example", Script::Serve(ACCEPTING)),
    )
    .verify("someone@mailinator.com");
    assert!(accepting.disposable);
    assert!(accepting.deliverable);

    let rejecting = verifier(
        two_hosts(),
        ScriptedDialer::new().host("a.example", Script::Serve(REJECTING)),
    )
    .verify("someone@mailinator.com");
    assert!(rejecting.disposable);
    assert!(!rejecting.deliverable);

    let regular = verifier(
        two_hosts(),
        ScriptedDialer::new().host("a.example", Script::Serve(ACCEPTING)),
    )
    .verify("someone@example.com");
    assert!(!regular.disposable);
    assert!(regular.deliverable);
}

#[test]
fn disposable_list_comes_from_config() {
    let config = VerifierConfig::default()
        .with_disposable_domains(DisposableDomains::from_domains(["burner.test"]));
    let v = Verifier::with_parts(config, StubResolver::fixed(Vec::new()), ScriptedDialer::new());

    assert!(v.verify("x@burner.test").disposable);
    assert!(!v.verify("x@mailinator.com").disposable);
}

#[test]
fn multiline_sender_is_a_configuration_error() {
    let config = VerifierConfig::default().with_probe_options(ProbeOptions {
        mail_from: "a@b.c\r\nRSET".to_string(),
        ..ProbeOptions::default()
    });
    let v = Verifier::with_parts(config, untouchable_resolver(), ScriptedDialer::new());
    let result = v.verify("user@example.com");

    assert!(result.syntax_valid);
    assert!(matches!(result.verdict, Verdict::Error { .. }));
    assert!(result.status_message.starts_with("verification error: invalid probe configuration"));
}

#[test]
fn nonexistent_domain_end_to_end() {
    let v = verifier(
        StubResolver::new(|domain| {
            Err(MxError::DomainNotFound {
                domain: domain.to_string(),
            })
        }),
        ScriptedDialer::new(),
    );
    let result = v.verify("user@nonexistent-domain-xyz123.invalid");

    assert!(result.syntax_valid);
    assert_eq!(result.domain.as_deref(), Some("nonexistent-domain-xyz123.invalid"));
    assert!(result.mx_records.is_empty());
    assert!(!result.deliverable);
    assert!(result.status_message.starts_with("no mail exchanger"));
}

#[test]
#[ignore = "requires system DNS resolver"]
fn nonexistent_domain_against_real_dns() {
    let result = verify_email("user@nonexistent-domain-xyz123.invalid");

    assert!(result.syntax_valid);
    assert_eq!(result.domain.as_deref(), Some("nonexistent-domain-xyz123.invalid"));
    assert!(result.mx_records.is_empty());
    assert!(!result.deliverable);
    assert!(result.status_message.starts_with("no mail exchanger"), "{}", result.status_message);
}

#[test]
fn verifier_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Verifier>();

    let v = verifier(
        two_hosts(),
        ScriptedDialer::new().host("a.example", Script::Serve(ACCEPTING)),
    );
    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let v = &v;
                scope.spawn(move || v.verify(&format!("user{i}@example.com")))
            })
            .collect();
        for handle in handles {
            let result = handle.join().expect("verification thread");
            assert!(result.deliverable, "{}", result.status_message);
        }
    });
}
